//! Account address type.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::TypesError;

/// An opaque account identity.
///
/// The module never interprets the address beyond equality and ordering;
/// derivation and encoding belong to the host chain.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Address(String);

impl Address {
    /// Upper bound on the encoded length of an address.
    pub const MAX_LEN: usize = 255;

    /// Create an address from a raw string without validating it.
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Create an address, rejecting malformed input.
    pub fn parse(raw: impl Into<String>) -> Result<Self, TypesError> {
        let addr = Self::new(raw);
        addr.validate()?;
        Ok(addr)
    }

    /// Return the raw address string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Length-prefixed byte encoding, used where an address is one
    /// component of a composite store key.
    pub fn to_key_bytes(&self) -> Vec<u8> {
        let raw = self.0.as_bytes();
        let mut out = Vec::with_capacity(raw.len() + 1);
        out.push(raw.len() as u8);
        out.extend_from_slice(raw);
        out
    }

    /// Whether this address is well-formed.
    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }

    pub fn validate(&self) -> Result<(), TypesError> {
        if self.0.is_empty() {
            return Err(TypesError::InvalidAddress("empty address".to_string()));
        }
        if self.0.len() > Self::MAX_LEN {
            return Err(TypesError::InvalidAddress(format!(
                "address longer than {} bytes",
                Self::MAX_LEN
            )));
        }
        if !self
            .0
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
        {
            return Err(TypesError::InvalidAddress(self.0.clone()));
        }
        Ok(())
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for Address {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for Address {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}
