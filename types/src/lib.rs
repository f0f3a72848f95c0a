//! Fundamental types for the foundation module.
//!
//! This crate defines the primitive values shared across every other crate
//! in the workspace: addresses, block timestamps, fixed-point decimals and
//! multi-denomination coin amounts.

pub mod address;
pub mod coins;
pub mod decimal;
pub mod error;
pub mod time;

pub use address::Address;
pub use coins::{validate_denom, Coin, Coins};
pub use decimal::{Dec, DEC_PRECISION};
pub use error::TypesError;
pub use time::Timestamp;
