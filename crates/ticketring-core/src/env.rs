//! Environment abstraction for deterministic testing.
//!
//! The `Environment` trait decouples rotation logic from the system's
//! entropy source. This enables:
//!
//! - Deterministic Tests: a seeded RNG produces the same key sequence on every
//!   run, so rotation bugs reproduce exactly.
//!
//! - Production Runtime: the OS entropy pool backs key generation without any
//!   change to the rotation logic.
//!
//! # Invariants
//!
//! - Determinism: Given the same seed, `random_bytes()` produces the same
//!   sequence
//! - Isolation: Implementations must not share global state

use thiserror::Error;
use ticketring_crypto::{ENCRYPTION_KEY_LEN, KEY_NAME_LEN, MAC_KEY_LEN, TicketKeySet};
use zeroize::Zeroize;

/// The entropy source could not fill a buffer.
///
/// Key generation stops rather than fall back to predictable bytes.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("entropy source failed: {reason}")]
pub struct EntropyError {
    /// Description of the underlying failure.
    pub reason: String,
}

/// Abstract environment providing randomness.
///
/// # Safety
///
/// Implementations MUST guarantee:
///
/// 1. RNG quality: `random_bytes()` uses cryptographically secure entropy in
///    production
/// 2. No silent fallback: if entropy is unavailable, `random_bytes()` returns
///    an error instead of filling the buffer with anything predictable
pub trait Environment: Clone + Send + Sync + 'static {
    /// Fills the provided buffer with random bytes.
    ///
    /// # Security
    ///
    /// Production implementations MUST use:
    /// - `getrandom::fill()` (OS entropy pool)
    /// - NOT `rand::thread_rng()` (not crypto-secure)
    ///
    /// Test implementations SHOULD use a seeded RNG and log the seed for
    /// reproducibility.
    fn random_bytes(&self, buffer: &mut [u8]) -> Result<(), EntropyError>;

    /// Generates a fresh ticket key set.
    ///
    /// Name and both keys are drawn independently. Temporary buffers are
    /// zeroed once the key set owns its copy.
    fn generate_key_set(&self) -> Result<TicketKeySet, EntropyError> {
        let mut key_name = [0u8; KEY_NAME_LEN];
        let mut encryption_key = [0u8; ENCRYPTION_KEY_LEN];
        let mut mac_key = [0u8; MAC_KEY_LEN];

        let filled = self
            .random_bytes(&mut key_name)
            .and_then(|()| self.random_bytes(&mut encryption_key))
            .and_then(|()| self.random_bytes(&mut mac_key))
            .map(|()| TicketKeySet::new(key_name, encryption_key, mac_key));

        encryption_key.zeroize();
        mac_key.zeroize();

        filled
    }
}
