//! Ticket Key Holder
//!
//! Publishes [`RotationSlots`] to concurrent handshakes.
//!
//! ## Responsibilities
//!
//! - Snapshots: readers load all three slots together, lock-free, and never
//!   observe a new `current` paired with a stale `previous`
//! - Replacement: administrative actions (install, rotate, disable) swap the
//!   whole state at once
//! - All-or-nothing: a rejected replacement leaves the published state as it
//!   was
//!
//! ## Design
//!
//! - `ArcSwap` holds the state. Readers pay one atomic load.
//! - Rotations are compare-and-swap loops, so two racing rotations both land
//!   and neither is lost.
//! - Every successful replacement bumps a generation counter stored inside
//!   the snapshot itself.

use std::sync::Arc;

use arc_swap::ArcSwap;
use ticketring_crypto::TicketKeySet;

use crate::{
    env::Environment,
    error::SlotError,
    slots::{RotationSlots, Slot},
};

/// Consistent view of the rotation state at one instant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    slots: RotationSlots,
    generation: u64,
}

impl Snapshot {
    /// The three slots (or the disabled state).
    pub fn slots(&self) -> &RotationSlots {
        &self.slots
    }

    /// Number of replacements published before this snapshot, inclusive.
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// Shared holder of the ticket key rotation state.
///
/// Cheap to share behind an `Arc`. All methods take `&self`.
#[derive(Debug)]
pub struct TicketKeyHolder {
    state: ArcSwap<Snapshot>,
}

impl Default for TicketKeyHolder {
    fn default() -> Self {
        Self::new()
    }
}

impl TicketKeyHolder {
    /// Holder in the disabled state at generation 0.
    pub fn new() -> Self {
        Self::with_slots(RotationSlots::Disabled)
    }

    /// Holder publishing `slots` at generation 0.
    pub fn with_slots(slots: RotationSlots) -> Self {
        Self { state: ArcSwap::from_pointee(Snapshot { slots, generation: 0 }) }
    }

    /// Load a consistent snapshot of all three slots.
    pub fn snapshot(&self) -> Arc<Snapshot> {
        self.state.load_full()
    }

    /// Generation of the currently published state.
    pub fn generation(&self) -> u64 {
        self.state.load().generation
    }

    /// Returns true if the published state is enabled.
    pub fn is_enabled(&self) -> bool {
        self.state.load().slots.is_enabled()
    }

    /// Replace the whole state with `slots`.
    ///
    /// Returns the new generation.
    pub fn install(&self, slots: RotationSlots) -> u64 {
        let generation = self.publish(slots.clone());
        log_installed("ticket key slots installed", generation, &slots);
        generation
    }

    /// Replace the whole state from three optional slots.
    ///
    /// A partial configuration is rejected and nothing is published.
    pub fn install_optional(
        &self,
        previous: Option<Arc<TicketKeySet>>,
        current: Option<Arc<TicketKeySet>>,
        next: Option<Arc<TicketKeySet>>,
    ) -> Result<u64, SlotError> {
        let slots = RotationSlots::from_optional(previous, current, next).inspect_err(|e| {
            tracing::warn!(error = %e, "rejected ticket key installation");
        })?;
        Ok(self.install(slots))
    }

    /// Switch ticket key rotation off.
    ///
    /// Hard cutover: every outstanding ticket issued through these slots
    /// becomes undecryptable by this path.
    pub fn disable(&self) -> u64 {
        let generation = self.publish(RotationSlots::Disabled);
        tracing::info!(generation, "ticket key rotation disabled");
        generation
    }

    /// Bootstrap an enabled state with three freshly generated key sets.
    ///
    /// Nothing is published if any of the three cannot be generated.
    pub fn enable_with<E: Environment>(&self, env: &E) -> Result<u64, SlotError> {
        let slots = RotationSlots::enabled(
            env.generate_key_set()?,
            env.generate_key_set()?,
            env.generate_key_set()?,
        );
        Ok(self.install(slots))
    }

    /// Advance the rotation by one step with `fresh` as the new `next`.
    ///
    /// Fails with [`SlotError::Disabled`] if rotation is off.
    pub fn rotate(&self, fresh: impl Into<Arc<TicketKeySet>>) -> Result<u64, SlotError> {
        let fresh = fresh.into();
        let generation = self
            .replace(|current| current.rotate(Arc::clone(&fresh)))
            .inspect_err(|e| tracing::warn!(error = %e, "rejected ticket key rotation"))?;

        tracing::info!(
            generation,
            next = %fresh.key_name(),
            "ticket keys rotated"
        );
        Ok(generation)
    }

    /// Advance the rotation with a key set generated from `env`.
    pub fn rotate_with<E: Environment>(&self, env: &E) -> Result<u64, SlotError> {
        if !self.is_enabled() {
            return Err(SlotError::Disabled);
        }
        self.rotate(env.generate_key_set()?)
    }

    /// Advance the rotation with raw key material.
    ///
    /// Mis-sized material is rejected before anything is published.
    pub fn rotate_with_material(
        &self,
        key_name: &[u8],
        encryption_key: &[u8],
        mac_key: &[u8],
    ) -> Result<u64, SlotError> {
        let fresh = TicketKeySet::try_from_slices(key_name, encryption_key, mac_key)
            .inspect_err(|e| tracing::warn!(error = %e, "rejected ticket key material"))?;
        self.rotate(fresh)
    }

    /// Unconditionally publish `slots` with a bumped generation.
    fn publish(&self, slots: RotationSlots) -> u64 {
        let replaced = self.state.rcu(|observed| Snapshot {
            slots: slots.clone(),
            generation: observed.generation.wrapping_add(1),
        });
        replaced.generation.wrapping_add(1)
    }

    /// Compare-and-swap loop publishing `build(observed)` with a bumped
    /// generation. Nothing is published if `build` fails.
    fn replace(
        &self,
        mut build: impl FnMut(&RotationSlots) -> Result<RotationSlots, SlotError>,
    ) -> Result<u64, SlotError> {
        let mut observed = self.state.load_full();
        loop {
            let generation = observed.generation.wrapping_add(1);
            let next = Arc::new(Snapshot { slots: build(&observed.slots)?, generation });

            let witnessed = self.state.compare_and_swap(&observed, next);
            if Arc::ptr_eq(&*witnessed, &observed) {
                return Ok(generation);
            }
            observed = arc_swap::Guard::into_inner(witnessed);
        }
    }
}

fn log_installed(message: &'static str, generation: u64, slots: &RotationSlots) {
    match slots.active() {
        Some(active) => tracing::info!(
            generation,
            previous = %active.get(Slot::Previous).key_name(),
            current = %active.get(Slot::Current).key_name(),
            next = %active.get(Slot::Next).key_name(),
            "{message}"
        ),
        None => tracing::info!(generation, "{message} (disabled)"),
    }
}
