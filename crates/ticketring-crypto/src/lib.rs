//! Ticketring Key Material
//!
//! This crate provides the key material handed to a TLS session-ticket
//! encryption service.
//!
//! # Design
//!
//! A [`TicketKeySet`] is an immutable value: a 16-byte key name, a 16-byte
//! symmetric encryption key and a 32-byte MAC key. It performs no cryptography
//! itself. Sealing and opening tickets belongs to the consuming service.
//!
//! - Fixed-size arrays: lengths are enforced by the type system wherever the
//!   caller already holds arrays. Slice constructors exist for bytes that
//!   cross a boundary and are checked at runtime.
//! - Matching by name: two key sets are the same logical key iff their key
//!   names are equal.
//!
//! # Security Properties
//!
//! - Constant-time name matching: [`KeyName::matches`] never short-circuits
//! - Secret hygiene: encryption and MAC keys are zeroed on drop and redacted
//!   from `Debug` output

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod error;
pub mod key_set;

pub use error::{InvalidKeyMaterial, KeyField};
pub use key_set::{ENCRYPTION_KEY_LEN, KEY_NAME_LEN, KeyName, MAC_KEY_LEN, TicketKeySet};
