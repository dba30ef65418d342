//! Ticketring rotation core.
//!
//! Three-slot session-ticket key rotation: new tickets are encrypted under
//! `current`, decryption accepts `previous`, `current` and `next`.
//!
//! ## Architecture
//!
//! ```text
//! ticketring-core
//!   ├─ RotationSlots      (Disabled | Enabled { previous, current, next })
//!   ├─ TicketKeyHolder    (atomic snapshot publication)
//!   └─ Environment        (entropy for fresh key sets)
//! ```
//!
//! The key material itself lives in `ticketring-crypto`.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod env;
mod error;
mod holder;
mod slots;

pub use env::{EntropyError, Environment};
pub use error::SlotError;
pub use holder::{Snapshot, TicketKeyHolder};
pub use slots::{ActiveSlots, Lookup, RotationSlots, Slot, SlotMatch};
pub use ticketring_crypto::{
    ENCRYPTION_KEY_LEN, InvalidKeyMaterial, KEY_NAME_LEN, KeyField, KeyName, MAC_KEY_LEN,
    TicketKeySet,
};
