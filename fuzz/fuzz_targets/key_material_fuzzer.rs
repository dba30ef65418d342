//! Fuzz target for [`TicketKeySet`] construction and key name matching
//!
//! Malformed configuration must be rejected, never truncated or padded.
//!
//! # Strategy
//!
//! - Optional fields: each of the three fields may be absent
//! - Arbitrary lengths: fields of any length including empty
//! - Ticket prefixes: arbitrary bytes looked up against a built key set
//!
//! # Invariants
//!
//! - Construction succeeds IFF all fields are present with exact lengths
//! - The reported field is the FIRST bad one in name, encryption, MAC order
//! - Accepted material is stored byte-for-byte
//! - `matches_name` is true IFF the candidate equals the key name
//! - NEVER panic on any input

#![no_main]

use std::sync::Arc;

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use ticketring_core::{Lookup, RotationSlots, Slot};
use ticketring_crypto::{InvalidKeyMaterial, KeyField, TicketKeySet};

#[derive(Debug, Arbitrary)]
struct FuzzInput {
    key_name: Option<Vec<u8>>,
    encryption_key: Option<Vec<u8>>,
    mac_key: Option<Vec<u8>>,
    /// Key name carried by a ticket.
    candidate: Vec<u8>,
}

/// First field that should be rejected, mirroring the construction order.
fn first_bad(input: &FuzzInput) -> Option<InvalidKeyMaterial> {
    let fields = [
        (KeyField::KeyName, &input.key_name),
        (KeyField::EncryptionKey, &input.encryption_key),
        (KeyField::MacKey, &input.mac_key),
    ];
    fields.into_iter().find_map(|(field, bytes)| match bytes {
        None => Some(InvalidKeyMaterial::Missing { field }),
        Some(b) if b.len() != field.expected_len() => Some(InvalidKeyMaterial::Length {
            field,
            expected: field.expected_len(),
            actual: b.len(),
        }),
        Some(_) => None,
    })
}

fuzz_target!(|input: FuzzInput| {
    let result = TicketKeySet::try_from_parts(
        input.key_name.as_deref(),
        input.encryption_key.as_deref(),
        input.mac_key.as_deref(),
    );

    let keys = match (result, first_bad(&input)) {
        (Err(actual), Some(expected)) => {
            assert_eq!(actual, expected);
            return;
        },
        (Ok(keys), None) => keys,
        (result, expected) => panic!("construction disagrees: {result:?} vs {expected:?}"),
    };

    assert_eq!(Some(keys.key_name().as_bytes().as_slice()), input.key_name.as_deref());
    assert_eq!(Some(keys.encryption_key().as_slice()), input.encryption_key.as_deref());
    assert_eq!(Some(keys.mac_key().as_slice()), input.mac_key.as_deref());

    let equal = input.candidate.as_slice() == keys.key_name().as_bytes().as_slice();
    assert_eq!(keys.matches_name(&input.candidate), equal);

    let keys = Arc::new(keys);
    let slots = RotationSlots::enabled(Arc::clone(&keys), Arc::clone(&keys), keys);
    match slots.lookup(&input.candidate) {
        Lookup::Matched { slot, renew, .. } => {
            assert!(equal);
            assert_eq!(slot, Slot::Current);
            assert!(!renew);
        },
        Lookup::NoMatch => assert!(!equal),
        Lookup::Disabled => panic!("enabled slots reported disabled"),
    }
});
