//! Proposals, votes and their lifecycle states.

use serde::{Deserialize, Serialize};

use foundation_types::{Address, Timestamp};

use crate::msgs::AnyMsg;
use crate::tally::{TallyResult, VoteOption};

/// Lifecycle state of a proposal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProposalStatus {
    /// Open for voting.
    Submitted,
    /// The decision policy accepted the tally; messages may be executed.
    Accepted,
    /// The decision policy rejected the tally.
    Rejected,
    /// The foundation version moved on; the proposal can never pass.
    Aborted,
    /// Withdrawn by a proposer or the authority.
    Withdrawn,
}

/// Result of executing the proposal's messages.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExecutorResult {
    NotRun,
    Success,
    Failure,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Proposal {
    pub id: u64,
    pub metadata: String,
    pub proposers: Vec<Address>,
    pub submit_time: Timestamp,
    /// Foundation version at submission time.
    pub foundation_version: u64,
    pub status: ProposalStatus,
    /// Only meaningful once the status is final.
    pub final_tally_result: TallyResult,
    pub voting_period_end: Timestamp,
    pub executor_result: ExecutorResult,
    /// Executed in order, all signed by the foundation authority.
    pub messages: Vec<AnyMsg>,
}

impl Proposal {
    pub fn is_proposer(&self, address: &Address) -> bool {
        self.proposers.contains(address)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vote {
    pub proposal_id: u64,
    pub voter: Address,
    pub option: VoteOption,
    pub metadata: String,
    pub submit_time: Timestamp,
}
