//! Ticketring server integration.
//!
//! This crate connects the rotation core to a production TLS stack:
//! - rustls for the session-ticket hook
//! - OS randomness for fresh key sets
//!
//! ## Architecture
//!
//! ```text
//! ticketring-server
//!   ├─ SystemEnv          (production Environment impl)
//!   ├─ RotatingTicketer   (rustls ProducesTickets over TicketKeyHolder)
//!   └─ TicketCipher       (external AES/HMAC service, supplied by caller)
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod error;
mod system_env;
mod ticketer;

use std::sync::Arc;

pub use error::ServerError;
pub use system_env::SystemEnv;
pub use ticketer::{
    MAX_TICKET_LIFETIME_SECS, Resumption, RotatingTicketer, TicketCipher, TicketerConfig,
};
use ticketring_core::TicketKeyHolder;

/// Build a holder with three fresh key sets and a ticketer reading from it.
///
/// The returned holder is the handle for later rotations.
pub fn bootstrap<C: TicketCipher>(
    cipher: C,
    config: TicketerConfig,
) -> Result<(Arc<TicketKeyHolder>, RotatingTicketer<C>), ServerError> {
    let env = SystemEnv::probed()?;
    let holder = Arc::new(TicketKeyHolder::new());
    let generation = holder.enable_with(&env)?;

    tracing::info!(generation, lifetime_secs = config.lifetime_secs, "ticket keys bootstrapped");

    let ticketer = RotatingTicketer::new(Arc::clone(&holder), cipher, config)?;
    Ok((holder, ticketer))
}
