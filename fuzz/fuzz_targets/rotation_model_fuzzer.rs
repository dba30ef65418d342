//! Fuzz target for [`TicketKeyHolder`] against the reference rotation model
//!
//! # Strategy
//!
//! - Operation sequences: installs (including partial), rotations,
//!   malformed rotations, disables and lookups in any order
//!
//! # Invariants
//!
//! - Every operation returns the same result on model and holder
//! - Observable slots and generation match after every operation
//! - A rejected operation publishes nothing
//! - NEVER panic on any sequence

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use ticketring_harness::{ModelRing, Operation, RealRing};

#[derive(Debug, Arbitrary)]
struct FuzzInput {
    seed: u64,
    operations: Vec<Operation>,
}

fuzz_target!(|input: FuzzInput| {
    let mut model = ModelRing::new();
    let mut real = RealRing::new(input.seed);

    for (i, op) in input.operations.iter().enumerate() {
        let before = real.observable_state();

        let expected = model.apply(op);
        let actual = real.apply(op);
        assert_eq!(expected, actual, "divergence at operation {i}: {op:?}");
        assert_eq!(model.observable_state(), real.observable_state());

        if actual.is_err() {
            assert_eq!(before, real.observable_state(), "rejected {op:?} published state");
        }
    }
});
