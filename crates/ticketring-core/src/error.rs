//! Rotation error types.

use thiserror::Error;
use ticketring_crypto::InvalidKeyMaterial;

use crate::env::EntropyError;

/// Errors from building or replacing rotation state.
///
/// A rejected state is never published: the holder keeps serving the state
/// it had before the failed call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SlotError {
    /// Only some of the three slots were supplied.
    #[error("partial slot configuration: {present} of 3 slots present, need 0 or 3")]
    PartialConfiguration {
        /// Number of slots that were present.
        present: usize,
    },

    /// Rotation requested while the feature is disabled.
    #[error("cannot rotate: ticket key rotation is disabled")]
    Disabled,

    /// Key material for a slot was rejected.
    #[error(transparent)]
    KeyMaterial(#[from] InvalidKeyMaterial),

    /// A fresh key set could not be generated.
    #[error(transparent)]
    Entropy(#[from] EntropyError),
}

#[cfg(test)]
mod tests {
    use ticketring_crypto::KeyField;

    use super::*;

    #[test]
    fn error_display() {
        let err = SlotError::PartialConfiguration { present: 2 };
        assert_eq!(err.to_string(), "partial slot configuration: 2 of 3 slots present, need 0 or 3");
    }

    #[test]
    fn key_material_converts() {
        let inner = InvalidKeyMaterial::Missing { field: KeyField::MacKey };
        let err: SlotError = inner.clone().into();
        assert_eq!(err, SlotError::KeyMaterial(inner));
        assert_eq!(err.to_string(), "invalid key material: MAC key is missing");
    }
}
