//! Production Environment implementation using OS randomness.
//!
//! This module provides `SystemEnv`, the production implementation of the
//! `Environment` trait that draws key material from the OS entropy pool.

use ticketring_core::{EntropyError, Environment};

use crate::error::ServerError;

/// Production environment using cryptographic RNG.
///
/// # Security
///
/// The RNG uses `getrandom` which provides OS-level cryptographic randomness.
/// This is suitable for ticket key names, encryption keys and MAC keys.
/// Failures are reported, never papered over with fixed bytes.
#[derive(Debug, Clone, Default)]
pub struct SystemEnv;

impl SystemEnv {
    /// Create a new system environment.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Create a system environment after checking the entropy source works.
    pub fn probed() -> Result<Self, ServerError> {
        let env = Self;
        let mut probe = [0u8; 16];
        env.random_bytes(&mut probe)?;
        Ok(env)
    }
}

impl Environment for SystemEnv {
    fn random_bytes(&self, buffer: &mut [u8]) -> Result<(), EntropyError> {
        getrandom::fill(buffer).map_err(|e| {
            tracing::error!("getrandom failed: {}", e);
            EntropyError { reason: e.to_string() }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn system_env_random_bytes_are_random() {
        let env = SystemEnv::new();

        let mut bytes1 = [0u8; 32];
        let mut bytes2 = [0u8; 32];

        env.random_bytes(&mut bytes1).unwrap();
        env.random_bytes(&mut bytes2).unwrap();

        // Extremely unlikely to be equal if random
        assert_ne!(bytes1, bytes2, "Random bytes should differ");
    }

    #[test]
    fn system_env_random_bytes_fills_buffer() {
        let env = SystemEnv::new();

        let mut bytes = [0u8; 64];
        env.random_bytes(&mut bytes).unwrap();

        // Check that at least some bytes are non-zero
        let non_zero_count = bytes.iter().filter(|&&b| b != 0).count();
        assert!(non_zero_count > 32, "Most bytes should be non-zero");
    }

    #[test]
    fn system_env_generates_distinct_key_sets() {
        let env = SystemEnv::probed().unwrap();

        let a = env.generate_key_set().unwrap();
        let b = env.generate_key_set().unwrap();

        assert_ne!(a, b, "Fresh key names should differ");
    }
}
