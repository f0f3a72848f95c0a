//! On-chain module parameters, updatable by the governance authority.

use serde::{Deserialize, Serialize};

use foundation_types::Dec;

use crate::FoundationError;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Params {
    /// Share of the fee collector's balance moved to the treasury every
    /// block. Once it reaches zero it can never be raised again.
    pub foundation_tax: Dec,
}

impl Params {
    pub fn validate(&self) -> Result<(), FoundationError> {
        if self.foundation_tax > Dec::ONE {
            return Err(FoundationError::invalid(format!(
                "foundation tax must be at most 1: {}",
                self.foundation_tax
            )));
        }
        Ok(())
    }

    /// Check that moving from `self` to `next` only ever lowers the tax.
    pub fn validate_transition(&self, next: &Params) -> Result<(), FoundationError> {
        next.validate()?;
        if next.foundation_tax > self.foundation_tax {
            return Err(FoundationError::invalid(format!(
                "cannot raise foundation tax from {} to {}",
                self.foundation_tax, next.foundation_tax
            )));
        }
        Ok(())
    }
}

impl Default for Params {
    fn default() -> Self {
        Self {
            foundation_tax: Dec::ZERO,
        }
    }
}
