//! Genesis state of the module.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use foundation_types::Coins;

use crate::authorization::{Censorship, CensorshipAuthority, GrantAuthorization};
use crate::member::{FoundationInfo, Member};
use crate::msgs::{Msg, MsgCreateValidator, MsgWithdrawFromTreasury};
use crate::params::Params;
use crate::policy::DecisionPolicy;
use crate::proposal::{Proposal, Vote};
use crate::FoundationError;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenesisState {
    pub params: Params,
    pub foundation: FoundationInfo,
    pub members: Vec<Member>,
    pub previous_proposal_id: u64,
    pub proposals: Vec<Proposal>,
    pub votes: Vec<Vote>,
    pub censorships: Vec<Censorship>,
    pub authorizations: Vec<GrantAuthorization>,
    pub pool: Coins,
}

impl Default for GenesisState {
    fn default() -> Self {
        Self {
            params: Params::default(),
            foundation: FoundationInfo::new(DecisionPolicy::default()),
            members: Vec::new(),
            previous_proposal_id: 0,
            proposals: Vec::new(),
            votes: Vec::new(),
            censorships: vec![
                Censorship::new(
                    MsgWithdrawFromTreasury::TYPE_URL,
                    CensorshipAuthority::Foundation,
                ),
                Censorship::new(MsgCreateValidator::TYPE_URL, CensorshipAuthority::Governance),
            ],
            authorizations: Vec::new(),
            pool: Coins::new(),
        }
    }
}

impl GenesisState {
    /// Parse a genesis document from JSON.
    pub fn from_json(json: &str) -> Result<Self, FoundationError> {
        serde_json::from_str(json).map_err(|e| FoundationError::invalid(format!("genesis: {e}")))
    }

    pub fn to_json(&self) -> Result<String, FoundationError> {
        serde_json::to_string_pretty(self)
            .map_err(|e| FoundationError::invalid(format!("genesis: {e}")))
    }

    pub fn validate(&self) -> Result<(), FoundationError> {
        self.params.validate()?;
        self.foundation.validate()?;

        let mut members = BTreeSet::new();
        for member in &self.members {
            member
                .address
                .validate()
                .map_err(|e| FoundationError::InvalidAddress(e.to_string()))?;
            if !members.insert(&member.address) {
                return Err(FoundationError::invalid(format!(
                    "duplicate member {}",
                    member.address
                )));
            }
        }
        // Every member weighs one unit.
        let expected_weight = u64::try_from(members.len())
            .map(foundation_types::Dec::from_int)
            .map_err(|_| FoundationError::invalid("too many members"))?;
        if self.foundation.total_weight != expected_weight {
            return Err(FoundationError::invalid(format!(
                "total weight {} does not match {} members",
                self.foundation.total_weight,
                members.len()
            )));
        }

        let mut proposal_ids = BTreeSet::new();
        for proposal in &self.proposals {
            if proposal.id == 0 || proposal.id > self.previous_proposal_id {
                return Err(FoundationError::invalid(format!(
                    "proposal id {} out of range (previous id {})",
                    proposal.id, self.previous_proposal_id
                )));
            }
            if !proposal_ids.insert(proposal.id) {
                return Err(FoundationError::invalid(format!(
                    "duplicate proposal {}",
                    proposal.id
                )));
            }
            if proposal.foundation_version == 0 {
                return Err(FoundationError::InvalidVersion(0));
            }
        }

        let mut votes = BTreeSet::new();
        for vote in &self.votes {
            if !proposal_ids.contains(&vote.proposal_id) {
                return Err(FoundationError::invalid(format!(
                    "vote for unknown proposal {}",
                    vote.proposal_id
                )));
            }
            if !votes.insert((vote.proposal_id, &vote.voter)) {
                return Err(FoundationError::invalid(format!(
                    "duplicate vote of {} on proposal {}",
                    vote.voter, vote.proposal_id
                )));
            }
        }

        let mut censored = BTreeSet::new();
        for censorship in &self.censorships {
            if !censorship.is_censored() {
                return Err(FoundationError::invalid(format!(
                    "censorship of {} has no authority",
                    censorship.msg_type_url
                )));
            }
            if !censored.insert(censorship.msg_type_url.as_str()) {
                return Err(FoundationError::invalid(format!(
                    "duplicate censorship of {}",
                    censorship.msg_type_url
                )));
            }
        }

        let mut grants = BTreeSet::new();
        for grant in &self.authorizations {
            grant.authorization.validate_basic()?;
            let url = grant.authorization.msg_type_url();
            if !censored.contains(url) {
                return Err(FoundationError::invalid(format!(
                    "grant for {url} which is not censored"
                )));
            }
            if !grants.insert((&grant.grantee, url)) {
                return Err(FoundationError::invalid(format!(
                    "duplicate grant of {url} to {}",
                    grant.grantee
                )));
            }
        }

        Ok(())
    }
}
