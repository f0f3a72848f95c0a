//! Censorship records and the capability grants they gate.

use serde::{Deserialize, Serialize};

use foundation_types::Address;

use crate::msgs::{AnyMsg, Msg, MsgCreateValidator, MsgWithdrawFromTreasury};
use crate::FoundationError;

/// Who may grant, revoke and relax the censorship of a message type.
///
/// Variants are declared in ascending strength, so the derived ordering
/// is the strength ordering.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum CensorshipAuthority {
    /// Not censored.
    Unspecified,
    /// The foundation authority.
    Foundation,
    /// The governance module account.
    Governance,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Censorship {
    pub msg_type_url: String,
    pub authority: CensorshipAuthority,
}

impl Censorship {
    pub fn new(msg_type_url: impl Into<String>, authority: CensorshipAuthority) -> Self {
        Self {
            msg_type_url: msg_type_url.into(),
            authority,
        }
    }

    pub fn is_censored(&self) -> bool {
        self.authority != CensorshipAuthority::Unspecified
    }
}

/// Outcome of [`Authorization::accept`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AcceptResponse {
    pub accept: bool,
    /// Remove the grant after this use.
    pub delete: bool,
    /// Replace the stored grant with this one.
    pub updated: Option<Authorization>,
}

impl AcceptResponse {
    fn accepted() -> Self {
        Self {
            accept: true,
            delete: false,
            updated: None,
        }
    }

    fn denied() -> Self {
        Self {
            accept: false,
            delete: false,
            updated: None,
        }
    }
}

/// A capability to have messages of one censored type accepted.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Authorization {
    /// Receive payouts from the treasury.
    ReceiveFromTreasury,
    /// Create one validator with the given operator address.
    CreateValidator { validator_address: Address },
}

impl Authorization {
    /// Type URL of the messages this authorization covers.
    pub fn msg_type_url(&self) -> &'static str {
        match self {
            Authorization::ReceiveFromTreasury => MsgWithdrawFromTreasury::TYPE_URL,
            Authorization::CreateValidator { .. } => MsgCreateValidator::TYPE_URL,
        }
    }

    pub fn validate_basic(&self) -> Result<(), FoundationError> {
        match self {
            Authorization::ReceiveFromTreasury => Ok(()),
            Authorization::CreateValidator { validator_address } => validator_address
                .validate()
                .map_err(|e| FoundationError::InvalidAddress(format!("validator: {e}"))),
        }
    }

    pub fn accept(&self, msg: &AnyMsg) -> Result<AcceptResponse, FoundationError> {
        if msg.type_url != self.msg_type_url() {
            return Err(FoundationError::invalid(format!(
                "authorization for {} cannot accept {}",
                self.msg_type_url(),
                msg.type_url
            )));
        }
        match self {
            Authorization::ReceiveFromTreasury => Ok(AcceptResponse::accepted()),
            Authorization::CreateValidator { validator_address } => {
                let create = MsgCreateValidator::from_any(msg)?;
                if create.validator_address != *validator_address {
                    return Ok(AcceptResponse::denied());
                }
                Ok(AcceptResponse {
                    delete: true,
                    ..AcceptResponse::accepted()
                })
            }
        }
    }
}

/// A stored grant.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GrantAuthorization {
    pub grantee: Address,
    pub authorization: Authorization,
}
