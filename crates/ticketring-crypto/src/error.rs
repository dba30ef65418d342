//! Key material error types.

use std::fmt;

use thiserror::Error;

/// Which field of a [`crate::TicketKeySet`] was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyField {
    /// The 16-byte key name.
    KeyName,
    /// The 16-byte symmetric encryption key.
    EncryptionKey,
    /// The 32-byte MAC key.
    MacKey,
}

impl KeyField {
    /// Length in bytes this field must have.
    pub const fn expected_len(self) -> usize {
        match self {
            Self::KeyName => crate::KEY_NAME_LEN,
            Self::EncryptionKey => crate::ENCRYPTION_KEY_LEN,
            Self::MacKey => crate::MAC_KEY_LEN,
        }
    }
}

impl fmt::Display for KeyField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::KeyName => f.write_str("key name"),
            Self::EncryptionKey => f.write_str("encryption key"),
            Self::MacKey => f.write_str("MAC key"),
        }
    }
}

/// Key material was absent or mis-sized at construction.
///
/// This is the only error the key material layer produces. It is not
/// recoverable for that construction attempt: the caller must supply
/// corrected bytes.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidKeyMaterial {
    /// A field was not supplied at all.
    #[error("invalid key material: {field} is missing")]
    Missing {
        /// The absent field.
        field: KeyField,
    },

    /// A field had the wrong length.
    #[error("invalid key material: {field} must be {expected} bytes, got {actual}")]
    Length {
        /// The mis-sized field.
        field: KeyField,
        /// Required length.
        expected: usize,
        /// Supplied length.
        actual: usize,
    },
}

impl InvalidKeyMaterial {
    /// The field that caused the rejection.
    pub fn field(&self) -> KeyField {
        match self {
            Self::Missing { field } | Self::Length { field, .. } => *field,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn length_error_display() {
        let err = InvalidKeyMaterial::Length { field: KeyField::MacKey, expected: 32, actual: 31 };
        assert_eq!(err.to_string(), "invalid key material: MAC key must be 32 bytes, got 31");
    }

    #[test]
    fn missing_error_display() {
        let err = InvalidKeyMaterial::Missing { field: KeyField::KeyName };
        assert_eq!(err.to_string(), "invalid key material: key name is missing");
        assert_eq!(err.field(), KeyField::KeyName);
    }

    #[test]
    fn expected_lengths() {
        assert_eq!(KeyField::KeyName.expected_len(), 16);
        assert_eq!(KeyField::EncryptionKey.expected_len(), 16);
        assert_eq!(KeyField::MacKey.expected_len(), 32);
    }
}
