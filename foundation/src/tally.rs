//! Vote options and tally counters.

use serde::{Deserialize, Serialize};

use foundation_types::Dec;

use crate::FoundationError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VoteOption {
    Yes,
    Abstain,
    No,
    NoWithVeto,
}

/// Weighted vote counts of a proposal. Every member weighs one unit.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TallyResult {
    pub yes_count: Dec,
    pub abstain_count: Dec,
    pub no_count: Dec,
    pub no_with_veto_count: Dec,
}

impl TallyResult {
    /// Add one unit of weight for `option`.
    pub fn add(&mut self, option: VoteOption) -> Result<(), FoundationError> {
        let slot = match option {
            VoteOption::Yes => &mut self.yes_count,
            VoteOption::Abstain => &mut self.abstain_count,
            VoteOption::No => &mut self.no_count,
            VoteOption::NoWithVeto => &mut self.no_with_veto_count,
        };
        *slot = slot
            .checked_add(Dec::ONE)
            .ok_or_else(|| FoundationError::invalid("tally overflow"))?;
        Ok(())
    }

    /// Sum of all four counters.
    pub fn total_counts(&self) -> Dec {
        [self.abstain_count, self.no_count, self.no_with_veto_count]
            .into_iter()
            .fold(self.yes_count, |acc, c| acc.checked_add(c).unwrap_or(Dec::from_raw(u128::MAX)))
    }
}
