//! Events emitted by the module for external observers.

use serde::{Deserialize, Serialize};

use foundation_types::{Address, Coins};

use crate::authorization::{Authorization, Censorship};
use crate::member::MemberRequest;
use crate::params::Params;
use crate::policy::DecisionPolicy;
use crate::proposal::{ExecutorResult, Proposal, Vote};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Event {
    UpdatedParams {
        params: Params,
    },
    FundedTreasury {
        from: Address,
        amount: Coins,
    },
    WithdrewFromTreasury {
        to: Address,
        amount: Coins,
    },
    UpdatedMembers {
        member_updates: Vec<MemberRequest>,
    },
    UpdatedDecisionPolicy {
        decision_policy: DecisionPolicy,
    },
    SubmitProposal {
        proposal: Proposal,
    },
    WithdrawProposal {
        proposal_id: u64,
    },
    Vote {
        vote: Vote,
    },
    Exec {
        proposal_id: u64,
        result: ExecutorResult,
        logs: String,
    },
    LeaveFoundation {
        address: Address,
    },
    UpdatedCensorship {
        censorship: Censorship,
    },
    Grant {
        grantee: Address,
        authorization: Authorization,
    },
    Revoke {
        grantee: Address,
        msg_type_url: String,
    },
    CollectedFoundationTax {
        amount: Coins,
    },
}
