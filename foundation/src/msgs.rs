//! Messages: typed requests and their self-describing wire envelope.
//!
//! Proposals carry arbitrary messages as [`AnyMsg`]: a type URL plus a
//! bincode body. Messages owned by this module decode into
//! [`FoundationMsg`]; anything else is dispatched through the host's
//! message router.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use foundation_store::{decode, encode};
use foundation_types::{Address, Coin, Coins};

use crate::authorization::{Authorization, Censorship};
use crate::config::FoundationConfig;
use crate::member::MemberRequest;
use crate::params::Params;
use crate::policy::DecisionPolicy;
use crate::tally::VoteOption;
use crate::FoundationError;

/// An opaque, self-describing message.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnyMsg {
    pub type_url: String,
    pub value: Vec<u8>,
}

/// Data returned by a successfully handled message.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgResponse {
    pub data: Vec<u8>,
}

/// Behaviour shared by every typed message.
pub trait Msg: Serialize + DeserializeOwned {
    const TYPE_URL: &'static str;

    /// Addresses that must have signed the message.
    fn signers(&self) -> Vec<Address>;

    /// Stateless validation.
    fn validate_basic(&self, config: &FoundationConfig) -> Result<(), FoundationError>;

    fn to_any(&self) -> Result<AnyMsg, FoundationError> {
        Ok(AnyMsg {
            type_url: Self::TYPE_URL.to_string(),
            value: encode(self)?,
        })
    }

    fn from_any(any: &AnyMsg) -> Result<Self, FoundationError> {
        if any.type_url != Self::TYPE_URL {
            return Err(FoundationError::invalid(format!(
                "expected {}, got {}",
                Self::TYPE_URL,
                any.type_url
            )));
        }
        Ok(decode(any.type_url.as_bytes(), &any.value)?)
    }
}

/// Whether to try executing a proposal right after submitting or voting.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Exec {
    #[default]
    Unspecified,
    Try,
}

fn validate_address(address: &Address, field: &str) -> Result<(), FoundationError> {
    address
        .validate()
        .map_err(|e| FoundationError::InvalidAddress(format!("{field}: {e}")))
}

fn validate_proposal_id(id: u64) -> Result<(), FoundationError> {
    if id == 0 {
        return Err(FoundationError::invalid("proposal id must be positive"));
    }
    Ok(())
}

fn validate_amount(amount: &Coins) -> Result<(), FoundationError> {
    if amount.is_zero() {
        return Err(FoundationError::invalid("amount must be positive"));
    }
    Ok(())
}

fn validate_type_url(url: &str) -> Result<(), FoundationError> {
    if url.is_empty() {
        return Err(FoundationError::invalid("empty message type url"));
    }
    Ok(())
}

// ── Messages of this module ────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgUpdateParams {
    /// Must be the governance authority.
    pub authority: Address,
    pub params: Params,
}

impl Msg for MsgUpdateParams {
    const TYPE_URL: &'static str = "/foundation.v1.MsgUpdateParams";

    fn signers(&self) -> Vec<Address> {
        vec![self.authority.clone()]
    }

    fn validate_basic(&self, _config: &FoundationConfig) -> Result<(), FoundationError> {
        validate_address(&self.authority, "authority")?;
        self.params.validate()
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgFundTreasury {
    pub from: Address,
    pub amount: Coins,
}

impl Msg for MsgFundTreasury {
    const TYPE_URL: &'static str = "/foundation.v1.MsgFundTreasury";

    fn signers(&self) -> Vec<Address> {
        vec![self.from.clone()]
    }

    fn validate_basic(&self, _config: &FoundationConfig) -> Result<(), FoundationError> {
        validate_address(&self.from, "from")?;
        validate_amount(&self.amount)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgWithdrawFromTreasury {
    pub authority: Address,
    pub to: Address,
    pub amount: Coins,
}

impl Msg for MsgWithdrawFromTreasury {
    const TYPE_URL: &'static str = "/foundation.v1.MsgWithdrawFromTreasury";

    fn signers(&self) -> Vec<Address> {
        vec![self.authority.clone()]
    }

    fn validate_basic(&self, _config: &FoundationConfig) -> Result<(), FoundationError> {
        validate_address(&self.authority, "authority")?;
        validate_address(&self.to, "to")?;
        validate_amount(&self.amount)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgUpdateMembers {
    pub authority: Address,
    pub member_updates: Vec<MemberRequest>,
}

impl Msg for MsgUpdateMembers {
    const TYPE_URL: &'static str = "/foundation.v1.MsgUpdateMembers";

    fn signers(&self) -> Vec<Address> {
        vec![self.authority.clone()]
    }

    fn validate_basic(&self, config: &FoundationConfig) -> Result<(), FoundationError> {
        validate_address(&self.authority, "authority")?;
        if self.member_updates.is_empty() {
            return Err(FoundationError::invalid("empty member updates"));
        }
        let mut seen = BTreeSet::new();
        for request in &self.member_updates {
            validate_address(&request.address, "member")?;
            config.validate_metadata(&request.metadata)?;
            if !seen.insert(&request.address) {
                return Err(FoundationError::invalid(format!(
                    "duplicate member update for {}",
                    request.address
                )));
            }
        }
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgUpdateDecisionPolicy {
    pub authority: Address,
    pub decision_policy: DecisionPolicy,
}

impl Msg for MsgUpdateDecisionPolicy {
    const TYPE_URL: &'static str = "/foundation.v1.MsgUpdateDecisionPolicy";

    fn signers(&self) -> Vec<Address> {
        vec![self.authority.clone()]
    }

    fn validate_basic(&self, _config: &FoundationConfig) -> Result<(), FoundationError> {
        validate_address(&self.authority, "authority")?;
        self.decision_policy.validate_basic()
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgSubmitProposal {
    pub proposers: Vec<Address>,
    pub metadata: String,
    pub messages: Vec<AnyMsg>,
    pub exec: Exec,
}

impl Msg for MsgSubmitProposal {
    const TYPE_URL: &'static str = "/foundation.v1.MsgSubmitProposal";

    fn signers(&self) -> Vec<Address> {
        self.proposers.clone()
    }

    fn validate_basic(&self, config: &FoundationConfig) -> Result<(), FoundationError> {
        if self.proposers.is_empty() {
            return Err(FoundationError::invalid("empty proposers"));
        }
        let mut seen = BTreeSet::new();
        for proposer in &self.proposers {
            validate_address(proposer, "proposer")?;
            if !seen.insert(proposer) {
                return Err(FoundationError::invalid(format!(
                    "duplicate proposer {proposer}"
                )));
            }
        }
        config.validate_metadata(&self.metadata)?;
        if self.messages.is_empty() {
            return Err(FoundationError::invalid("no messages"));
        }
        for msg in &self.messages {
            validate_type_url(&msg.type_url)?;
        }
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgWithdrawProposal {
    pub proposal_id: u64,
    /// A proposer or the foundation authority.
    pub address: Address,
}

impl Msg for MsgWithdrawProposal {
    const TYPE_URL: &'static str = "/foundation.v1.MsgWithdrawProposal";

    fn signers(&self) -> Vec<Address> {
        vec![self.address.clone()]
    }

    fn validate_basic(&self, _config: &FoundationConfig) -> Result<(), FoundationError> {
        validate_proposal_id(self.proposal_id)?;
        validate_address(&self.address, "address")
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgVote {
    pub proposal_id: u64,
    pub voter: Address,
    pub option: VoteOption,
    pub metadata: String,
    pub exec: Exec,
}

impl Msg for MsgVote {
    const TYPE_URL: &'static str = "/foundation.v1.MsgVote";

    fn signers(&self) -> Vec<Address> {
        vec![self.voter.clone()]
    }

    fn validate_basic(&self, config: &FoundationConfig) -> Result<(), FoundationError> {
        validate_proposal_id(self.proposal_id)?;
        validate_address(&self.voter, "voter")?;
        config.validate_metadata(&self.metadata)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgExec {
    pub proposal_id: u64,
    pub signer: Address,
}

impl Msg for MsgExec {
    const TYPE_URL: &'static str = "/foundation.v1.MsgExec";

    fn signers(&self) -> Vec<Address> {
        vec![self.signer.clone()]
    }

    fn validate_basic(&self, _config: &FoundationConfig) -> Result<(), FoundationError> {
        validate_proposal_id(self.proposal_id)?;
        validate_address(&self.signer, "signer")
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgLeaveFoundation {
    pub address: Address,
}

impl Msg for MsgLeaveFoundation {
    const TYPE_URL: &'static str = "/foundation.v1.MsgLeaveFoundation";

    fn signers(&self) -> Vec<Address> {
        vec![self.address.clone()]
    }

    fn validate_basic(&self, _config: &FoundationConfig) -> Result<(), FoundationError> {
        validate_address(&self.address, "address")
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgUpdateCensorship {
    /// Must match the current censorship authority of the message type.
    pub authority: Address,
    pub censorship: Censorship,
}

impl Msg for MsgUpdateCensorship {
    const TYPE_URL: &'static str = "/foundation.v1.MsgUpdateCensorship";

    fn signers(&self) -> Vec<Address> {
        vec![self.authority.clone()]
    }

    fn validate_basic(&self, _config: &FoundationConfig) -> Result<(), FoundationError> {
        validate_address(&self.authority, "authority")?;
        validate_type_url(&self.censorship.msg_type_url)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgGrant {
    pub authority: Address,
    pub grantee: Address,
    pub authorization: Authorization,
}

impl Msg for MsgGrant {
    const TYPE_URL: &'static str = "/foundation.v1.MsgGrant";

    fn signers(&self) -> Vec<Address> {
        vec![self.authority.clone()]
    }

    fn validate_basic(&self, _config: &FoundationConfig) -> Result<(), FoundationError> {
        validate_address(&self.authority, "authority")?;
        validate_address(&self.grantee, "grantee")?;
        self.authorization.validate_basic()
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgRevoke {
    pub authority: Address,
    pub grantee: Address,
    pub msg_type_url: String,
}

impl Msg for MsgRevoke {
    const TYPE_URL: &'static str = "/foundation.v1.MsgRevoke";

    fn signers(&self) -> Vec<Address> {
        vec![self.authority.clone()]
    }

    fn validate_basic(&self, _config: &FoundationConfig) -> Result<(), FoundationError> {
        validate_address(&self.authority, "authority")?;
        validate_address(&self.grantee, "grantee")?;
        validate_type_url(&self.msg_type_url)
    }
}

// ── Messages of other modules inspected by this one ────────────────────

/// Validator creation request of the staking module, gated by
/// [`Authorization::CreateValidator`] grants.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgCreateValidator {
    pub delegator_address: Address,
    pub validator_address: Address,
    pub value: Coin,
}

impl Msg for MsgCreateValidator {
    const TYPE_URL: &'static str = "/cosmos.staking.v1beta1.MsgCreateValidator";

    fn signers(&self) -> Vec<Address> {
        vec![self.delegator_address.clone()]
    }

    fn validate_basic(&self, _config: &FoundationConfig) -> Result<(), FoundationError> {
        validate_address(&self.delegator_address, "delegator")?;
        validate_address(&self.validator_address, "validator")?;
        Ok(self.value.validate()?)
    }
}

// ── Dispatch ───────────────────────────────────────────────────────────

/// Every message handled by this module.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FoundationMsg {
    UpdateParams(MsgUpdateParams),
    FundTreasury(MsgFundTreasury),
    WithdrawFromTreasury(MsgWithdrawFromTreasury),
    UpdateMembers(MsgUpdateMembers),
    UpdateDecisionPolicy(MsgUpdateDecisionPolicy),
    SubmitProposal(MsgSubmitProposal),
    WithdrawProposal(MsgWithdrawProposal),
    Vote(MsgVote),
    Exec(MsgExec),
    LeaveFoundation(MsgLeaveFoundation),
    UpdateCensorship(MsgUpdateCensorship),
    Grant(MsgGrant),
    Revoke(MsgRevoke),
}

impl FoundationMsg {
    /// Decode an envelope owned by this module. `None` means the type URL
    /// belongs to some other module.
    pub fn from_any(any: &AnyMsg) -> Option<Result<Self, FoundationError>> {
        let msg = match any.type_url.as_str() {
            MsgUpdateParams::TYPE_URL => MsgUpdateParams::from_any(any).map(Self::UpdateParams),
            MsgFundTreasury::TYPE_URL => MsgFundTreasury::from_any(any).map(Self::FundTreasury),
            MsgWithdrawFromTreasury::TYPE_URL => {
                MsgWithdrawFromTreasury::from_any(any).map(Self::WithdrawFromTreasury)
            }
            MsgUpdateMembers::TYPE_URL => MsgUpdateMembers::from_any(any).map(Self::UpdateMembers),
            MsgUpdateDecisionPolicy::TYPE_URL => {
                MsgUpdateDecisionPolicy::from_any(any).map(Self::UpdateDecisionPolicy)
            }
            MsgSubmitProposal::TYPE_URL => {
                MsgSubmitProposal::from_any(any).map(Self::SubmitProposal)
            }
            MsgWithdrawProposal::TYPE_URL => {
                MsgWithdrawProposal::from_any(any).map(Self::WithdrawProposal)
            }
            MsgVote::TYPE_URL => MsgVote::from_any(any).map(Self::Vote),
            MsgExec::TYPE_URL => MsgExec::from_any(any).map(Self::Exec),
            MsgLeaveFoundation::TYPE_URL => {
                MsgLeaveFoundation::from_any(any).map(Self::LeaveFoundation)
            }
            MsgUpdateCensorship::TYPE_URL => {
                MsgUpdateCensorship::from_any(any).map(Self::UpdateCensorship)
            }
            MsgGrant::TYPE_URL => MsgGrant::from_any(any).map(Self::Grant),
            MsgRevoke::TYPE_URL => MsgRevoke::from_any(any).map(Self::Revoke),
            _ => return None,
        };
        Some(msg)
    }

    pub fn signers(&self) -> Vec<Address> {
        match self {
            Self::UpdateParams(m) => m.signers(),
            Self::FundTreasury(m) => m.signers(),
            Self::WithdrawFromTreasury(m) => m.signers(),
            Self::UpdateMembers(m) => m.signers(),
            Self::UpdateDecisionPolicy(m) => m.signers(),
            Self::SubmitProposal(m) => m.signers(),
            Self::WithdrawProposal(m) => m.signers(),
            Self::Vote(m) => m.signers(),
            Self::Exec(m) => m.signers(),
            Self::LeaveFoundation(m) => m.signers(),
            Self::UpdateCensorship(m) => m.signers(),
            Self::Grant(m) => m.signers(),
            Self::Revoke(m) => m.signers(),
        }
    }

    pub fn validate_basic(&self, config: &FoundationConfig) -> Result<(), FoundationError> {
        match self {
            Self::UpdateParams(m) => m.validate_basic(config),
            Self::FundTreasury(m) => m.validate_basic(config),
            Self::WithdrawFromTreasury(m) => m.validate_basic(config),
            Self::UpdateMembers(m) => m.validate_basic(config),
            Self::UpdateDecisionPolicy(m) => m.validate_basic(config),
            Self::SubmitProposal(m) => m.validate_basic(config),
            Self::WithdrawProposal(m) => m.validate_basic(config),
            Self::Vote(m) => m.validate_basic(config),
            Self::Exec(m) => m.validate_basic(config),
            Self::LeaveFoundation(m) => m.validate_basic(config),
            Self::UpdateCensorship(m) => m.validate_basic(config),
            Self::Grant(m) => m.validate_basic(config),
            Self::Revoke(m) => m.validate_basic(config),
        }
    }
}
