//! Model ring - the reference implementation of slot rotation.
//!
//! Keys are plain ids and the enabled state is a three-element array. There
//! is no shared state and no key material, so the rules can be read off
//! directly.

use ticketring_core::Slot;

use super::operation::{ModelKeyId, ModelLookup, Operation, OperationError, OperationResult};

/// Observable state for oracle comparison.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObservableState {
    /// Key ids in `[previous, current, next]` order, or `None` when disabled.
    pub slots: Option<[ModelKeyId; 3]>,
    /// Number of successful publications so far.
    pub generation: u64,
}

/// Model ring - the oracle.
#[derive(Debug, Clone, Default)]
pub struct ModelRing {
    slots: Option<[ModelKeyId; 3]>,
    generation: u64,
}

impl ModelRing {
    /// Disabled ring at generation 0.
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply an operation and return the result.
    ///
    /// The result should match the real implementation's result.
    pub fn apply(&mut self, op: &Operation) -> OperationResult {
        match op {
            Operation::Install { previous, current, next } => {
                self.apply_install(*previous, *current, *next)
            },
            Operation::Rotate { fresh } => self.apply_rotate(*fresh),
            Operation::RotateMalformed { .. } => {
                OperationResult::Error(OperationError::InvalidKeyMaterial)
            },
            Operation::Disable => {
                self.slots = None;
                self.generation += 1;
                OperationResult::Ok
            },
            Operation::Lookup { key } => OperationResult::Lookup(self.lookup(*key)),
        }
    }

    /// Extract observable state for comparison.
    pub fn observable_state(&self) -> ObservableState {
        ObservableState { slots: self.slots, generation: self.generation }
    }

    /// Which slot a ticket named `key` decrypts under.
    pub fn lookup(&self, key: ModelKeyId) -> ModelLookup {
        let Some([previous, current, next]) = self.slots else {
            return ModelLookup::Disabled;
        };

        let slot = if current == key {
            Slot::Current
        } else if next == key {
            Slot::Next
        } else if previous == key {
            Slot::Previous
        } else {
            return ModelLookup::NoMatch;
        };

        let renew = slot == Slot::Previous && previous != current && previous != next;
        ModelLookup::Matched { slot, renew }
    }

    fn apply_install(
        &mut self,
        previous: Option<ModelKeyId>,
        current: Option<ModelKeyId>,
        next: Option<ModelKeyId>,
    ) -> OperationResult {
        self.slots = match (previous, current, next) {
            (None, None, None) => None,
            (Some(p), Some(c), Some(n)) => Some([p, c, n]),
            _ => {
                let present = [previous, current, next].iter().filter(|s| s.is_some()).count();
                return OperationResult::Error(OperationError::PartialConfiguration { present });
            },
        };
        self.generation += 1;
        OperationResult::Ok
    }

    fn apply_rotate(&mut self, fresh: ModelKeyId) -> OperationResult {
        let Some([_, current, next]) = self.slots else {
            return OperationResult::Error(OperationError::Disabled);
        };
        self.slots = Some([current, next, fresh]);
        self.generation += 1;
        OperationResult::Ok
    }
}
