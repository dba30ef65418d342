//! Session-ticket key set.
//!
//! One [`TicketKeySet`] fills one rotation slot (previous, current or next).
//! The enclosing TLS context encrypts new tickets under the current slot and
//! decrypts with whichever slot's [`KeyName`] the ticket carries.
//!
//! # Wire Contract
//!
//! ```text
//! TicketKeySet {
//!     key_name:       [u8; 16]   // embedded in the ticket, not secret
//!     encryption_key: [u8; 16]   // AES-128 class
//!     mac_key:        [u8; 32]   // HMAC-SHA256 class
//! }
//! ```
//!
//! These lengths are part of the contract with the ticket encryption service
//! and must not change without versioning.

use std::{
    fmt,
    hash::{Hash, Hasher},
};

use subtle::ConstantTimeEq;
use zeroize::ZeroizeOnDrop;

use crate::error::{InvalidKeyMaterial, KeyField};

/// Length of a ticket key name in bytes.
pub const KEY_NAME_LEN: usize = 16;

/// Length of the symmetric ticket encryption key in bytes.
pub const ENCRYPTION_KEY_LEN: usize = 16;

/// Length of the ticket MAC key in bytes.
pub const MAC_KEY_LEN: usize = 32;

/// Opaque identifier embedded in every ticket issued under a key set.
///
/// Key names are not secret, but comparison is still constant time so a
/// lookup leaks nothing about how many leading bytes of a candidate matched.
#[derive(Clone, Copy)]
pub struct KeyName([u8; KEY_NAME_LEN]);

impl KeyName {
    /// Wrap a 16-byte key name.
    pub const fn new(bytes: [u8; KEY_NAME_LEN]) -> Self {
        Self(bytes)
    }

    /// Raw key name bytes.
    pub const fn as_bytes(&self) -> &[u8; KEY_NAME_LEN] {
        &self.0
    }

    /// Returns true iff `candidate` is byte-for-byte equal to this name.
    ///
    /// Runs in time independent of where the first differing byte is. A
    /// candidate of a different length never matches.
    pub fn matches(&self, candidate: &[u8]) -> bool {
        bool::from(self.0[..].ct_eq(candidate))
    }
}

impl From<[u8; KEY_NAME_LEN]> for KeyName {
    fn from(bytes: [u8; KEY_NAME_LEN]) -> Self {
        Self(bytes)
    }
}

impl TryFrom<&[u8]> for KeyName {
    type Error = InvalidKeyMaterial;

    fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
        fixed::<KEY_NAME_LEN>(KeyField::KeyName, bytes).map(Self)
    }
}

impl PartialEq for KeyName {
    fn eq(&self, other: &Self) -> bool {
        self.matches(&other.0)
    }
}

impl Eq for KeyName {}

impl Hash for KeyName {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.hash(state);
    }
}

impl AsRef<[u8]> for KeyName {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Display for KeyName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

impl fmt::Debug for KeyName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "KeyName({self})")
    }
}

/// Immutable key material for one session-ticket rotation slot.
///
/// # Invariants
///
/// - All three fields are present and exactly [`KEY_NAME_LEN`],
///   [`ENCRYPTION_KEY_LEN`] and [`MAC_KEY_LEN`] bytes long. An instance with
///   any other shape cannot be constructed.
/// - Fields are never mutated after construction. Accessors hand out shared
///   references only.
/// - Equality is by key name alone: two key sets with the same name are the
///   same logical key, whatever their secret bytes.
///
/// # Security
///
/// - **Zeroize on Drop**: encryption and MAC keys are overwritten when the
///   value is dropped.
/// - **Debug Redaction**: the `Debug` impl prints the key name only.
#[derive(Clone, ZeroizeOnDrop)]
pub struct TicketKeySet {
    #[zeroize(skip)]
    key_name: KeyName,
    encryption_key: [u8; ENCRYPTION_KEY_LEN],
    mac_key: [u8; MAC_KEY_LEN],
}

impl TicketKeySet {
    /// Build a key set from fixed-size arrays.
    ///
    /// Infallible: every length invariant is already carried by the types.
    pub fn new(
        key_name: impl Into<KeyName>,
        encryption_key: [u8; ENCRYPTION_KEY_LEN],
        mac_key: [u8; MAC_KEY_LEN],
    ) -> Self {
        Self { key_name: key_name.into(), encryption_key, mac_key }
    }

    /// Build a key set from byte slices of unchecked length.
    ///
    /// Fields are checked in order (key name, encryption key, MAC key) and the
    /// first mis-sized one is reported.
    pub fn try_from_slices(
        key_name: &[u8],
        encryption_key: &[u8],
        mac_key: &[u8],
    ) -> Result<Self, InvalidKeyMaterial> {
        Self::try_from_parts(Some(key_name), Some(encryption_key), Some(mac_key))
    }

    /// Build a key set from fields that may be absent.
    ///
    /// Any `None` fails with [`InvalidKeyMaterial::Missing`], regardless of
    /// whether the other fields are valid.
    pub fn try_from_parts(
        key_name: Option<&[u8]>,
        encryption_key: Option<&[u8]>,
        mac_key: Option<&[u8]>,
    ) -> Result<Self, InvalidKeyMaterial> {
        let key_name = KeyName(fixed(KeyField::KeyName, present(KeyField::KeyName, key_name)?)?);
        let encryption_key = fixed(
            KeyField::EncryptionKey,
            present(KeyField::EncryptionKey, encryption_key)?,
        )?;
        let mac_key = fixed(KeyField::MacKey, present(KeyField::MacKey, mac_key)?)?;

        Ok(Self { key_name, encryption_key, mac_key })
    }

    /// Name embedded in tickets issued under this key set.
    pub fn key_name(&self) -> &KeyName {
        &self.key_name
    }

    /// Symmetric ticket encryption key. Sensitive.
    pub fn encryption_key(&self) -> &[u8; ENCRYPTION_KEY_LEN] {
        &self.encryption_key
    }

    /// Ticket MAC key. Sensitive.
    pub fn mac_key(&self) -> &[u8; MAC_KEY_LEN] {
        &self.mac_key
    }

    /// Returns true iff `candidate` equals this key set's name.
    ///
    /// This is the only comparison used to pick a decryption slot.
    pub fn matches_name(&self, candidate: &[u8]) -> bool {
        self.key_name.matches(candidate)
    }

    /// Returns true iff both key sets carry the same key name.
    pub fn same_key_name(&self, other: &Self) -> bool {
        self.key_name == other.key_name
    }
}

impl PartialEq for TicketKeySet {
    fn eq(&self, other: &Self) -> bool {
        self.same_key_name(other)
    }
}

impl Eq for TicketKeySet {}

impl fmt::Debug for TicketKeySet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TicketKeySet")
            .field("key_name", &self.key_name)
            .field("encryption_key", &format_args!("<redacted {ENCRYPTION_KEY_LEN} bytes>"))
            .field("mac_key", &format_args!("<redacted {MAC_KEY_LEN} bytes>"))
            .finish()
    }
}

fn present(field: KeyField, bytes: Option<&[u8]>) -> Result<&[u8], InvalidKeyMaterial> {
    bytes.ok_or(InvalidKeyMaterial::Missing { field })
}

fn fixed<const N: usize>(field: KeyField, bytes: &[u8]) -> Result<[u8; N], InvalidKeyMaterial> {
    <[u8; N]>::try_from(bytes).map_err(|_| InvalidKeyMaterial::Length {
        field,
        expected: N,
        actual: bytes.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> TicketKeySet {
        TicketKeySet::new([0xAA; 16], [0xBB; 16], [0xCC; 32])
    }

    #[test]
    fn construct_and_read_verbatim() {
        let keys =
            TicketKeySet::try_from_slices(&[0xAA; 16], &[0xBB; 16], &[0xCC; 32]).unwrap();

        assert_eq!(keys.key_name().as_bytes(), &[0xAA; 16]);
        assert_eq!(keys.encryption_key(), &[0xBB; 16]);
        assert_eq!(keys.mac_key(), &[0xCC; 32]);
    }

    #[test]
    fn short_key_name_rejected() {
        let result = TicketKeySet::try_from_slices(&[0xAA; 15], &[0xBB; 16], &[0xCC; 32]);
        assert_eq!(
            result.unwrap_err(),
            InvalidKeyMaterial::Length { field: KeyField::KeyName, expected: 16, actual: 15 }
        );
    }

    #[test]
    fn short_mac_key_rejected() {
        let result = TicketKeySet::try_from_slices(&[0xAA; 16], &[0xBB; 16], &[0xCC; 31]);
        assert_eq!(
            result.unwrap_err(),
            InvalidKeyMaterial::Length { field: KeyField::MacKey, expected: 32, actual: 31 }
        );
    }

    #[test]
    fn long_encryption_key_rejected() {
        let result = TicketKeySet::try_from_slices(&[0xAA; 16], &[0xBB; 32], &[0xCC; 32]);
        assert_eq!(result.unwrap_err().field(), KeyField::EncryptionKey);
    }

    #[test]
    fn missing_field_rejected_even_if_others_valid() {
        let err = TicketKeySet::try_from_parts(None, Some(&[0; 16]), Some(&[0; 32])).unwrap_err();
        assert_eq!(err, InvalidKeyMaterial::Missing { field: KeyField::KeyName });

        let err = TicketKeySet::try_from_parts(Some(&[0; 16]), None, Some(&[0; 32])).unwrap_err();
        assert_eq!(err, InvalidKeyMaterial::Missing { field: KeyField::EncryptionKey });

        let err = TicketKeySet::try_from_parts(Some(&[0; 16]), Some(&[0; 16]), None).unwrap_err();
        assert_eq!(err, InvalidKeyMaterial::Missing { field: KeyField::MacKey });
    }

    #[test]
    fn first_invalid_field_reported() {
        let err = TicketKeySet::try_from_parts(Some(&[0; 3]), None, Some(&[0; 1])).unwrap_err();
        assert_eq!(err.field(), KeyField::KeyName);
    }

    #[test]
    fn all_zero_material_accepted() {
        assert!(TicketKeySet::try_from_slices(&[0; 16], &[0; 16], &[0; 32]).is_ok());
    }

    #[test]
    fn matches_name_exact_only() {
        let keys = sample();

        assert!(keys.matches_name(&[0xAA; 16]));
        assert!(!keys.matches_name(&[0xAA; 15]));
        assert!(!keys.matches_name(&[0xAA; 17]));
        assert!(!keys.matches_name(&[]));

        let mut last_byte_differs = [0xAA; 16];
        last_byte_differs[15] = 0xAB;
        assert!(!keys.matches_name(&last_byte_differs));
    }

    #[test]
    fn equality_uses_key_name_only() {
        let a = sample();
        let b = TicketKeySet::new([0xAA; 16], [0x01; 16], [0x02; 32]);
        let c = TicketKeySet::new([0xAB; 16], [0xBB; 16], [0xCC; 32]);

        assert_eq!(a, b);
        assert!(a.same_key_name(&b));
        assert_ne!(a, c);
    }

    #[test]
    fn debug_redacts_secrets() {
        let rendered = format!("{:?}", sample());

        assert!(rendered.contains(&"aa".repeat(16)));
        assert!(!rendered.to_lowercase().contains("bbbb"));
        assert!(!rendered.to_lowercase().contains("cccc"));
        assert!(rendered.contains("<redacted 16 bytes>"));
        assert!(rendered.contains("<redacted 32 bytes>"));
    }

    #[test]
    fn key_name_display_is_hex() {
        let name = KeyName::new([0x0F; 16]);
        assert_eq!(name.to_string(), "0f".repeat(16));
    }

    #[test]
    fn key_name_try_from_checks_length() {
        assert!(KeyName::try_from(&[1u8; 16][..]).is_ok());
        assert_eq!(
            KeyName::try_from(&[1u8; 8][..]).unwrap_err(),
            InvalidKeyMaterial::Length { field: KeyField::KeyName, expected: 16, actual: 8 }
        );
    }
}
