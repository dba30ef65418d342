//! Real ring - a [`TicketKeyHolder`] behind the model's interface.

use std::sync::Arc;

use ticketring_core::{
    ENCRYPTION_KEY_LEN, EntropyError, Environment, KEY_NAME_LEN, Lookup, MAC_KEY_LEN,
    RotationSlots, SlotError, TicketKeyHolder, TicketKeySet,
};

use super::{
    operation::{ModelKeyId, ModelLookup, Operation, OperationError, OperationResult},
    ring::ObservableState,
};
use crate::seeded_env::SeededEnv;

/// Real holder wrapper that mirrors [`super::ModelRing`].
///
/// Model key `k` becomes a key set named `[k; 16]` with secrets drawn from a
/// seeded environment.
#[derive(Debug)]
pub struct RealRing {
    holder: Arc<TicketKeyHolder>,
    env: SeededEnv,
}

impl RealRing {
    /// Disabled holder with secrets drawn from `seed`.
    pub fn new(seed: u64) -> Self {
        Self { holder: Arc::new(TicketKeyHolder::new()), env: SeededEnv::with_seed(seed) }
    }

    /// The wrapped holder.
    pub fn holder(&self) -> &Arc<TicketKeyHolder> {
        &self.holder
    }

    /// Apply an operation and return the result.
    pub fn apply(&mut self, op: &Operation) -> OperationResult {
        if let Operation::Lookup { key } = op {
            return OperationResult::Lookup(self.lookup(*key));
        }

        match self.publish(op) {
            Ok(()) => OperationResult::Ok,
            Err(e) => OperationResult::Error(to_model_error(&e)),
        }
    }

    /// Extract observable state for comparison.
    pub fn observable_state(&self) -> ObservableState {
        let snapshot = self.holder.snapshot();
        let slots = match snapshot.slots() {
            RotationSlots::Disabled => None,
            RotationSlots::Enabled(active) => Some([
                model_id(&active.previous),
                model_id(&active.current),
                model_id(&active.next),
            ]),
        };
        ObservableState { slots, generation: snapshot.generation() }
    }

    fn lookup(&self, key: ModelKeyId) -> ModelLookup {
        match self.holder.snapshot().slots().lookup(&[key; KEY_NAME_LEN]) {
            Lookup::Disabled => ModelLookup::Disabled,
            Lookup::NoMatch => ModelLookup::NoMatch,
            Lookup::Matched { slot, renew, .. } => ModelLookup::Matched { slot, renew },
        }
    }

    fn publish(&self, op: &Operation) -> Result<(), SlotError> {
        match op {
            Operation::Install { previous, current, next } => {
                let previous = previous.map(|k| self.key_set(k)).transpose()?;
                let current = current.map(|k| self.key_set(k)).transpose()?;
                let next = next.map(|k| self.key_set(k)).transpose()?;
                self.holder.install_optional(previous, current, next)?;
            },
            Operation::Rotate { fresh } => {
                self.holder.rotate(self.key_set(*fresh)?)?;
            },
            Operation::RotateMalformed { name_len } => {
                let name = vec![0xA5; usize::from(*name_len) % KEY_NAME_LEN];
                self.holder.rotate_with_material(
                    &name,
                    &[0; ENCRYPTION_KEY_LEN],
                    &[0; MAC_KEY_LEN],
                )?;
            },
            Operation::Disable => {
                self.holder.disable();
            },
            Operation::Lookup { .. } => {},
        }
        Ok(())
    }

    /// Fresh secrets from the seeded environment under the name `[key; 16]`.
    fn key_set(&self, key: ModelKeyId) -> Result<Arc<TicketKeySet>, EntropyError> {
        let generated = self.env.generate_key_set()?;
        Ok(Arc::new(TicketKeySet::new(
            [key; KEY_NAME_LEN],
            *generated.encryption_key(),
            *generated.mac_key(),
        )))
    }
}

fn model_id(keys: &TicketKeySet) -> ModelKeyId {
    keys.key_name().as_bytes()[0]
}

fn to_model_error(error: &SlotError) -> OperationError {
    match error {
        SlotError::PartialConfiguration { present } => {
            OperationError::PartialConfiguration { present: *present }
        },
        SlotError::Disabled => OperationError::Disabled,
        SlotError::KeyMaterial(_) => OperationError::InvalidKeyMaterial,
        SlotError::Entropy(_) => OperationError::EntropyUnavailable,
    }
}
