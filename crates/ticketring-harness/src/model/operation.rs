//! Operations for model-based testing.
//!
//! Operations represent all possible actions on a key holder. They are
//! generated randomly by proptest (or by the fuzzer via `Arbitrary`) and
//! applied to both the model and real implementation.

use arbitrary::Arbitrary;
use ticketring_core::Slot;

/// Key identifier (uses u8 to keep test space manageable).
///
/// Maps to a 16-byte key name filled with this byte in the real system.
pub type ModelKeyId = u8;

/// Operations that can be applied to the holder.
#[derive(Debug, Clone, Arbitrary)]
pub enum Operation {
    /// Replace all three slots. Absent slots model missing configuration.
    Install {
        /// Key for the previous slot.
        previous: Option<ModelKeyId>,
        /// Key for the current slot.
        current: Option<ModelKeyId>,
        /// Key for the next slot.
        next: Option<ModelKeyId>,
    },

    /// Advance the rotation with a fresh key.
    Rotate {
        /// Key that becomes `next`.
        fresh: ModelKeyId,
    },

    /// Advance the rotation with a key name of the wrong length.
    RotateMalformed {
        /// Key name length hint, reduced below the valid length.
        name_len: u8,
    },

    /// Switch rotation off.
    Disable,

    /// Look up the slot for a ticket issued under `key`.
    Lookup {
        /// Key name carried by the ticket.
        key: ModelKeyId,
    },
}

/// Lookup outcome with key material stripped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelLookup {
    /// Rotation is off.
    Disabled,
    /// No slot carries the key name.
    NoMatch,
    /// A slot matched.
    Matched {
        /// Slot that matched.
        slot: Slot,
        /// Whether a fresh ticket should be issued.
        renew: bool,
    },
}

/// Result of applying an operation.
///
/// Used to compare model and real system behavior.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OperationResult {
    /// Operation succeeded.
    Ok,

    /// Lookup completed.
    Lookup(ModelLookup),

    /// Operation failed with expected error.
    Error(OperationError),
}

/// Expected errors that can occur during operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OperationError {
    /// One or two slots were supplied.
    PartialConfiguration {
        /// Number of slots supplied.
        present: usize,
    },

    /// Rotation is disabled.
    Disabled,

    /// Key material had the wrong shape.
    InvalidKeyMaterial,

    /// No fresh key could be generated. The model never produces this.
    EntropyUnavailable,
}

impl OperationResult {
    /// Check if operation succeeded.
    pub fn is_ok(&self) -> bool {
        !self.is_err()
    }

    /// Check if operation failed.
    pub fn is_err(&self) -> bool {
        matches!(self, OperationResult::Error(_))
    }
}
