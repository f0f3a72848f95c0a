//! Members and the foundation-wide record.

use serde::{Deserialize, Serialize};

use foundation_types::{Address, Dec, Timestamp};

use crate::policy::DecisionPolicy;
use crate::FoundationError;

/// A member of the foundation. Every member carries one unit of weight.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    pub address: Address,
    pub metadata: String,
    pub added_at: Timestamp,
}

/// One entry of a membership update.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberRequest {
    pub address: Address,
    /// Remove the member instead of adding or updating it.
    pub remove: bool,
    pub metadata: String,
}

/// Foundation-wide state.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FoundationInfo {
    /// Bumped on every membership or decision policy change. Proposals
    /// submitted under an older version are aborted.
    pub version: u64,
    /// Always equal to the number of members.
    pub total_weight: Dec,
    pub decision_policy: DecisionPolicy,
}

impl FoundationInfo {
    /// A fresh foundation with no members.
    pub fn new(decision_policy: DecisionPolicy) -> Self {
        Self {
            version: 1,
            total_weight: Dec::ZERO,
            decision_policy,
        }
    }

    pub fn validate(&self) -> Result<(), FoundationError> {
        if self.version == 0 {
            return Err(FoundationError::InvalidVersion(self.version));
        }
        self.decision_policy.validate_basic()
    }

    /// Advance the version, invalidating every open proposal.
    pub(crate) fn bump_version(&mut self) {
        self.version += 1;
    }
}
