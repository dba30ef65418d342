//! Rotation slots
//!
//! Three key sets (previous, current, next) give zero-downtime rotation:
//! tickets are issued under `current`, and decryption accepts any of the
//! three so tickets issued just before a rotation stay valid for one more
//! rotation interval.
//!
//! ## Design
//!
//! - Tagged variant: the feature is either fully `Disabled` or `Enabled` with
//!   all three slots filled. Partial configurations cannot be represented.
//! - Value semantics: rotation returns a new `RotationSlots`; nothing is
//!   updated in place. Callers publish the result atomically (see
//!   [`crate::TicketKeyHolder`]).
//!
//! ## Rotation
//!
//! ```text
//! (previous, current, next) + fresh  ->  (current, next, fresh)
//!
//!   A  B  C       D
//!      B  C  D          A is no longer decryptable
//! ```

use std::{fmt, sync::Arc};

use ticketring_crypto::TicketKeySet;

use crate::error::SlotError;

/// One of the three rotation slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Slot {
    /// Key that was current before the last rotation. Decrypt only.
    Previous,
    /// Key used for all new tickets.
    Current,
    /// Key that becomes current on the next rotation. Decrypt only.
    Next,
}

impl Slot {
    /// All slots, oldest first.
    pub const ALL: [Self; 3] = [Self::Previous, Self::Current, Self::Next];
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Previous => f.write_str("previous"),
            Self::Current => f.write_str("current"),
            Self::Next => f.write_str("next"),
        }
    }
}

/// The three key sets of an enabled rotation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveSlots {
    /// Oldest retained key.
    pub previous: Arc<TicketKeySet>,
    /// Issuing key.
    pub current: Arc<TicketKeySet>,
    /// Pre-distributed upcoming key.
    pub next: Arc<TicketKeySet>,
}

impl ActiveSlots {
    /// Key set held in `slot`.
    pub fn get(&self, slot: Slot) -> &Arc<TicketKeySet> {
        match slot {
            Slot::Previous => &self.previous,
            Slot::Current => &self.current,
            Slot::Next => &self.next,
        }
    }
}

/// Ticket key rotation state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum RotationSlots {
    /// Feature off: the TLS library's default ticket handling applies.
    ///
    /// Switching to this state is a hard cutover. Every ticket issued under
    /// the previous key sets stops being decryptable here.
    #[default]
    Disabled,
    /// Feature on with all three slots filled.
    Enabled(ActiveSlots),
}

/// A successful slot lookup for decryption.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotMatch {
    /// Which slot the ticket's key name matched.
    pub slot: Slot,
    /// Key set to decrypt with.
    pub key: Arc<TicketKeySet>,
}

/// Outcome of looking up a ticket's key name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup {
    /// Rotation is disabled; this path cannot decrypt anything.
    Disabled,
    /// No slot carries the key name. The caller rejects the ticket and falls
    /// back to a full handshake. Not an error.
    NoMatch,
    /// A slot matched.
    Matched {
        /// Slot that matched.
        slot: Slot,
        /// Key set to decrypt with.
        key: Arc<TicketKeySet>,
        /// Session resumed under an ageing key: issue a fresh ticket on this
        /// connection.
        renew: bool,
    },
}

impl RotationSlots {
    /// Enabled state from three key sets.
    pub fn enabled(
        previous: impl Into<Arc<TicketKeySet>>,
        current: impl Into<Arc<TicketKeySet>>,
        next: impl Into<Arc<TicketKeySet>>,
    ) -> Self {
        Self::Enabled(ActiveSlots {
            previous: previous.into(),
            current: current.into(),
            next: next.into(),
        })
    }

    /// Build from three independently optional slots.
    ///
    /// All absent yields [`RotationSlots::Disabled`], all present yields
    /// [`RotationSlots::Enabled`]. One or two present is rejected.
    pub fn from_optional(
        previous: Option<Arc<TicketKeySet>>,
        current: Option<Arc<TicketKeySet>>,
        next: Option<Arc<TicketKeySet>>,
    ) -> Result<Self, SlotError> {
        match (previous, current, next) {
            (None, None, None) => Ok(Self::Disabled),
            (Some(previous), Some(current), Some(next)) => {
                Ok(Self::Enabled(ActiveSlots { previous, current, next }))
            },
            (previous, current, next) => {
                let present = [previous.is_some(), current.is_some(), next.is_some()]
                    .into_iter()
                    .filter(|&p| p)
                    .count();
                Err(SlotError::PartialConfiguration { present })
            },
        }
    }

    /// Returns true if tickets are issued and decrypted through these slots.
    pub fn is_enabled(&self) -> bool {
        matches!(self, Self::Enabled(_))
    }

    /// The three slots, if enabled.
    pub fn active(&self) -> Option<&ActiveSlots> {
        match self {
            Self::Disabled => None,
            Self::Enabled(active) => Some(active),
        }
    }

    /// Key set held in `slot`, if enabled.
    pub fn slot(&self, slot: Slot) -> Option<&Arc<TicketKeySet>> {
        self.active().map(|active| active.get(slot))
    }

    /// Returns true if `slot` holds a key set.
    pub fn is_present(&self, slot: Slot) -> bool {
        self.slot(slot).is_some()
    }

    /// Key set used to issue every new ticket.
    ///
    /// `None` when disabled.
    pub fn current(&self) -> Option<&Arc<TicketKeySet>> {
        self.slot(Slot::Current)
    }

    /// Find the slot whose key name equals `key_name`.
    ///
    /// Every slot is compared on every call so lookup time does not depend on
    /// which slot matched. If several slots share the name, `current` wins
    /// over `next`, and `next` over `previous`.
    pub fn find_for_decryption(&self, key_name: &[u8]) -> Option<SlotMatch> {
        let active = self.active()?;

        let previous = active.previous.matches_name(key_name);
        let current = active.current.matches_name(key_name);
        let next = active.next.matches_name(key_name);

        let slot = if current {
            Slot::Current
        } else if next {
            Slot::Next
        } else if previous {
            Slot::Previous
        } else {
            return None;
        };

        Some(SlotMatch { slot, key: Arc::clone(active.get(slot)) })
    }

    /// Returns true if a session resumed via `matched` needs a fresh ticket.
    ///
    /// True iff the match is the `previous` slot and the previous key name
    /// differs from both the current and next names. When previous shares a
    /// name with a newer slot the ticket is not ageing out, so it is not
    /// stale. A match that does not belong to these slots is never stale.
    pub fn is_stale(&self, matched: &SlotMatch) -> bool {
        let Some(active) = self.active() else {
            return false;
        };

        matched.slot == Slot::Previous
            && active.previous.same_key_name(&matched.key)
            && !active.previous.same_key_name(&active.current)
            && !active.previous.same_key_name(&active.next)
    }

    /// Look up `key_name` and decide whether the resumed session needs a new
    /// ticket.
    pub fn lookup(&self, key_name: &[u8]) -> Lookup {
        if !self.is_enabled() {
            return Lookup::Disabled;
        }

        match self.find_for_decryption(key_name) {
            Some(matched) => {
                let renew = self.is_stale(&matched);
                Lookup::Matched { slot: matched.slot, key: matched.key, renew }
            },
            None => Lookup::NoMatch,
        }
    }

    /// Advance the rotation by one step.
    ///
    /// `current` becomes `previous`, `next` becomes `current`, and `fresh`
    /// becomes `next`. The old `previous` is dropped. Fails if disabled: a
    /// rotation needs three existing keys to shift.
    pub fn rotate(&self, fresh: impl Into<Arc<TicketKeySet>>) -> Result<Self, SlotError> {
        let active = self.active().ok_or(SlotError::Disabled)?;

        Ok(Self::Enabled(ActiveSlots {
            previous: Arc::clone(&active.current),
            current: Arc::clone(&active.next),
            next: fresh.into(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(byte: u8) -> Arc<TicketKeySet> {
        Arc::new(TicketKeySet::new([byte; 16], [byte; 16], [byte; 32]))
    }

    fn abc() -> RotationSlots {
        RotationSlots::enabled(key(0xA), key(0xB), key(0xC))
    }

    #[test]
    fn default_is_disabled() {
        let slots = RotationSlots::default();
        assert!(!slots.is_enabled());
        assert!(slots.current().is_none());
        for slot in Slot::ALL {
            assert!(!slots.is_present(slot));
        }
    }

    #[test]
    fn from_optional_all_absent_is_disabled() {
        let slots = RotationSlots::from_optional(None, None, None).unwrap();
        assert_eq!(slots, RotationSlots::Disabled);
    }

    #[test]
    fn from_optional_all_present_is_enabled() {
        let slots = RotationSlots::from_optional(Some(key(1)), Some(key(2)), Some(key(3))).unwrap();
        assert!(slots.is_enabled());
        assert_eq!(slots.current().unwrap().key_name().as_bytes(), &[2; 16]);
    }

    #[test]
    fn from_optional_only_current_rejected() {
        let result = RotationSlots::from_optional(None, Some(key(2)), None);
        assert_eq!(result.unwrap_err(), SlotError::PartialConfiguration { present: 1 });
    }

    #[test]
    fn from_optional_two_present_rejected() {
        let result = RotationSlots::from_optional(Some(key(1)), Some(key(2)), None);
        assert_eq!(result.unwrap_err(), SlotError::PartialConfiguration { present: 2 });

        let result = RotationSlots::from_optional(Some(key(1)), None, Some(key(3)));
        assert_eq!(result.unwrap_err(), SlotError::PartialConfiguration { present: 2 });
    }

    #[test]
    fn find_for_decryption_each_slot() {
        let slots = abc();

        assert_eq!(slots.find_for_decryption(&[0xA; 16]).unwrap().slot, Slot::Previous);
        assert_eq!(slots.find_for_decryption(&[0xB; 16]).unwrap().slot, Slot::Current);
        assert_eq!(slots.find_for_decryption(&[0xC; 16]).unwrap().slot, Slot::Next);
        assert!(slots.find_for_decryption(&[0xD; 16]).is_none());
    }

    #[test]
    fn find_for_decryption_rejects_wrong_length() {
        let slots = abc();
        assert!(slots.find_for_decryption(&[0xB; 15]).is_none());
        assert!(slots.find_for_decryption(&[]).is_none());
    }

    #[test]
    fn disabled_never_matches() {
        assert!(RotationSlots::Disabled.find_for_decryption(&[0; 16]).is_none());
        assert_eq!(RotationSlots::Disabled.lookup(&[0; 16]), Lookup::Disabled);
    }

    #[test]
    fn previous_match_is_stale() {
        let slots = abc();
        let matched = slots.find_for_decryption(&[0xA; 16]).unwrap();
        assert!(slots.is_stale(&matched));
    }

    #[test]
    fn current_and_next_matches_are_fresh() {
        let slots = abc();
        for name in [[0xB; 16], [0xC; 16]] {
            let matched = slots.find_for_decryption(&name).unwrap();
            assert!(!slots.is_stale(&matched));
        }
    }

    #[test]
    fn previous_equal_to_current_is_not_stale() {
        let slots = RotationSlots::enabled(key(0xA), key(0xA), key(0xC));

        let matched = slots.find_for_decryption(&[0xA; 16]).unwrap();
        assert_eq!(matched.slot, Slot::Current);

        let forced = SlotMatch { slot: Slot::Previous, key: key(0xA) };
        assert!(!slots.is_stale(&forced));
    }

    #[test]
    fn previous_equal_to_next_prefers_next() {
        let slots = RotationSlots::enabled(key(0xA), key(0xB), key(0xA));
        let lookup = slots.lookup(&[0xA; 16]);
        assert!(matches!(lookup, Lookup::Matched { slot: Slot::Next, renew: false, .. }));
    }

    #[test]
    fn foreign_match_is_not_stale() {
        let slots = abc();
        let foreign = SlotMatch { slot: Slot::Previous, key: key(0xE) };
        assert!(!slots.is_stale(&foreign));
    }

    #[test]
    fn lookup_reports_renew() {
        let slots = abc();
        assert!(matches!(slots.lookup(&[0xA; 16]), Lookup::Matched { renew: true, .. }));
        assert!(matches!(slots.lookup(&[0xB; 16]), Lookup::Matched { renew: false, .. }));
        assert_eq!(slots.lookup(&[0xF; 16]), Lookup::NoMatch);
    }

    #[test]
    fn rotate_shifts_slots() {
        let rotated = abc().rotate(key(0xD)).unwrap();
        let active = rotated.active().unwrap();

        assert_eq!(active.previous.key_name().as_bytes(), &[0xB; 16]);
        assert_eq!(active.current.key_name().as_bytes(), &[0xC; 16]);
        assert_eq!(active.next.key_name().as_bytes(), &[0xD; 16]);
    }

    #[test]
    fn rotate_ages_out_oldest() {
        let rotated = abc().rotate(key(0xD)).unwrap();

        assert_eq!(rotated.lookup(&[0xA; 16]), Lookup::NoMatch);
        assert!(matches!(
            rotated.lookup(&[0xB; 16]),
            Lookup::Matched { slot: Slot::Previous, renew: true, .. }
        ));
    }

    #[test]
    fn rotate_does_not_touch_original() {
        let original = abc();
        let _rotated = original.rotate(key(0xD)).unwrap();
        assert_eq!(original.current().unwrap().key_name().as_bytes(), &[0xB; 16]);
    }

    #[test]
    fn rotate_disabled_fails() {
        assert_eq!(RotationSlots::Disabled.rotate(key(1)).unwrap_err(), SlotError::Disabled);
    }
}
