//! Server error types.

use thiserror::Error;
use ticketring_core::{EntropyError, SlotError};

/// Errors that can occur while setting up ticket issuance.
#[derive(Debug, Error)]
pub enum ServerError {
    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// Entropy source unavailable
    #[error(transparent)]
    Entropy(#[from] EntropyError),

    /// Rotation state rejected
    #[error("ticket key error: {0}")]
    Slots(#[from] SlotError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = ServerError::Config("lifetime must be non-zero".to_string());
        assert_eq!(err.to_string(), "configuration error: lifetime must be non-zero");

        let err = ServerError::from(SlotError::Disabled);
        assert_eq!(
            err.to_string(),
            "ticket key error: cannot rotate: ticket key rotation is disabled"
        );
    }

    #[test]
    fn every_variant_comes_from_setup() {
        let errors = [
            ServerError::Config("bad".to_string()),
            ServerError::from(EntropyError { reason: "drained".to_string() }),
            ServerError::from(SlotError::PartialConfiguration { present: 1 }),
        ];

        for err in errors {
            let source = match &err {
                ServerError::Config(_) => "config",
                ServerError::Entropy(_) => "entropy",
                ServerError::Slots(_) => "slots",
            };
            assert!(!err.to_string().is_empty(), "{source} error has no message");
        }
    }
}
