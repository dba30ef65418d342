//! Rotating Ticketer
//!
//! Bridges [`TicketKeyHolder`] into rustls as a [`ProducesTickets`]
//! implementation, replacing the TLS library's built-in ticket keys.
//!
//! ## Responsibilities
//!
//! - Issuance: seal new tickets under the `current` slot
//! - Decryption: pick the slot by the ticket's key name, open with its keys
//! - Renewal: report when a resumption used the ageing `previous` key
//!
//! ## Ticket Framing
//!
//! ```text
//! ticket = key_name[16] || TicketCipher::seal(keys, plaintext)
//! ```
//!
//! The key name is written and parsed here. Everything after it (IV,
//! ciphertext, MAC) is owned by the [`TicketCipher`].

use std::{fmt, sync::Arc};

use rustls::server::{ProducesTickets, ServerConfig};
use ticketring_core::{KEY_NAME_LEN, Lookup, Slot, TicketKeyHolder, TicketKeySet};

use crate::error::ServerError;

/// Longest ticket lifetime a TLS 1.3 server may advertise (7 days).
pub const MAX_TICKET_LIFETIME_SECS: u32 = 7 * 24 * 60 * 60;

/// Ticket issuance configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TicketerConfig {
    /// Ticket lifetime hint sent to clients, in seconds.
    pub lifetime_secs: u32,
}

impl Default for TicketerConfig {
    fn default() -> Self {
        Self { lifetime_secs: 24 * 60 * 60 }
    }
}

impl TicketerConfig {
    /// Check the configuration is usable.
    pub fn validate(&self) -> Result<(), ServerError> {
        if self.lifetime_secs == 0 {
            return Err(ServerError::Config("ticket lifetime must be non-zero".to_string()));
        }
        if self.lifetime_secs > MAX_TICKET_LIFETIME_SECS {
            return Err(ServerError::Config(format!(
                "ticket lifetime {}s exceeds maximum {}s",
                self.lifetime_secs, MAX_TICKET_LIFETIME_SECS
            )));
        }
        Ok(())
    }
}

/// The external ticket encryption service.
///
/// Implementations perform the actual symmetric encryption and MAC using the
/// key material they are handed. Returning `None` means the operation failed
/// (for `open`: authentication failed or the ticket is malformed).
pub trait TicketCipher: fmt::Debug + Send + Sync {
    /// Encrypt and authenticate `plaintext` under `keys`.
    fn seal(&self, keys: &TicketKeySet, plaintext: &[u8]) -> Option<Vec<u8>>;

    /// Verify and decrypt `sealed` under `keys`.
    fn open(&self, keys: &TicketKeySet, sealed: &[u8]) -> Option<Vec<u8>>;
}

/// A successfully decrypted ticket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resumption {
    /// Decrypted session state.
    pub plaintext: Vec<u8>,
    /// Slot whose key opened the ticket.
    pub slot: Slot,
    /// The ticket was opened with the ageing `previous` key; a fresh ticket
    /// should be issued on this connection.
    pub renew: bool,
}

/// Session-ticket producer backed by three rotating key slots.
#[derive(Debug)]
pub struct RotatingTicketer<C> {
    holder: Arc<TicketKeyHolder>,
    cipher: C,
    config: TicketerConfig,
}

impl<C: TicketCipher> RotatingTicketer<C> {
    /// Create a ticketer reading keys from `holder`.
    pub fn new(
        holder: Arc<TicketKeyHolder>,
        cipher: C,
        config: TicketerConfig,
    ) -> Result<Self, ServerError> {
        config.validate()?;
        Ok(Self { holder, cipher, config })
    }

    /// Holder this ticketer reads from.
    pub fn holder(&self) -> &Arc<TicketKeyHolder> {
        &self.holder
    }

    /// Seal `plaintext` into a ticket under the current key.
    ///
    /// `None` if rotation is disabled or the cipher fails.
    pub fn issue(&self, plaintext: &[u8]) -> Option<Vec<u8>> {
        let snapshot = self.holder.snapshot();
        let current = snapshot.slots().current()?;

        let sealed = self.cipher.seal(current, plaintext)?;

        let mut ticket = Vec::with_capacity(KEY_NAME_LEN + sealed.len());
        ticket.extend_from_slice(current.key_name().as_bytes());
        ticket.extend_from_slice(&sealed);
        Some(ticket)
    }

    /// Open a ticket and report which slot it matched.
    ///
    /// `None` means the ticket cannot be used: the caller falls back to a
    /// full handshake.
    pub fn decrypt_with_outcome(&self, ticket: &[u8]) -> Option<Resumption> {
        if ticket.len() < KEY_NAME_LEN {
            tracing::debug!(len = ticket.len(), "ticket too short for key name");
            return None;
        }
        let (key_name, sealed) = ticket.split_at(KEY_NAME_LEN);

        let snapshot = self.holder.snapshot();
        match snapshot.slots().lookup(key_name) {
            Lookup::Disabled => None,
            Lookup::NoMatch => {
                tracing::debug!(generation = snapshot.generation(), "no ticket key matches");
                None
            },
            Lookup::Matched { slot, key, renew } => {
                let Some(plaintext) = self.cipher.open(&key, sealed) else {
                    tracing::debug!(%slot, "ticket failed to open");
                    return None;
                };
                if renew {
                    tracing::debug!(
                        key_name = %key.key_name(),
                        "resumed under previous key, renewing"
                    );
                }
                Some(Resumption { plaintext, slot, renew })
            },
        }
    }

    /// Install this ticketer into a rustls server configuration.
    pub fn install(self, config: &mut ServerConfig)
    where
        C: 'static,
    {
        config.ticketer = Arc::new(self);
    }
}

impl<C: TicketCipher> ProducesTickets for RotatingTicketer<C> {
    fn enabled(&self) -> bool {
        self.holder.is_enabled()
    }

    fn lifetime(&self) -> u32 {
        self.config.lifetime_secs
    }

    fn encrypt(&self, plain: &[u8]) -> Option<Vec<u8>> {
        self.issue(plain)
    }

    fn decrypt(&self, cipher: &[u8]) -> Option<Vec<u8>> {
        self.decrypt_with_outcome(cipher).map(|resumption| resumption.plaintext)
    }
}
