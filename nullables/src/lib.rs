//! Nullable collaborators for deterministic testing of the foundation
//! module.
//!
//! Everything the keeper expects from its host (a token ledger, a router
//! for foreign messages, a block clock) is provided here in a form that:
//! - Keeps all state in the context store, so branches roll it back
//! - Can be controlled programmatically
//! - Never touches the filesystem or network
//!
//! Usage: build a [`NullApp`] in integration tests and drive it with
//! messages and block hooks.

pub mod app;
pub mod bank;
pub mod clock;
pub mod router;

pub use app::{genesis_with_members, NullApp, GENESIS_TIME};
pub use bank::NullBank;
pub use clock::NullClock;
pub use router::{has_validator, MsgSend, NullRouter};
