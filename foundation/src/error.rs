use foundation_store::StoreError;
use foundation_types::{Address, TypesError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FoundationError {
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("invalid address: {0}")]
    InvalidAddress(String),

    #[error("{0} is not a member")]
    NotAMember(Address),

    #[error("unauthorized: {0}")]
    Unauthorized(String),

    #[error("{0} not found")]
    NotFound(String),

    #[error("invalid foundation version: {0}")]
    InvalidVersion(u64),

    #[error("insufficient funds: have {available}, need {needed}")]
    InsufficientFunds { available: String, needed: String },

    #[error("unknown request: no handler for {0}")]
    UnknownRequest(String),

    #[error("{0}")]
    Types(#[from] TypesError),

    #[error("storage error: {0}")]
    Store(#[from] StoreError),
}

impl FoundationError {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        FoundationError::InvalidRequest(msg.into())
    }

    pub(crate) fn unauthorized(msg: impl Into<String>) -> Self {
        FoundationError::Unauthorized(msg.into())
    }
}
