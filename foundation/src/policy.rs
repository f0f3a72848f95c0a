//! Decision policies: how a tally turns into a final accept/reject.
//!
//! Both variants resolve a proposal early as soon as the outcome is
//! mathematically settled: accepted once enough yes weight is in, rejected
//! once the yes side can no longer win even if every undecided member
//! votes yes. `min_execution_period_secs` is a cool-down measured from
//! submission during which `allow` refuses to decide at all.

use serde::{Deserialize, Serialize};

use foundation_types::Dec;
use foundation_utils::format_duration;

use crate::config::FoundationConfig;
use crate::member::FoundationInfo;
use crate::tally::TallyResult;
use crate::FoundationError;

/// Time windows shared by every policy variant.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecisionPolicyWindows {
    /// Duration of the voting period, counted from submission.
    pub voting_period_secs: u64,
    /// Minimum time after submission before a proposal may be executed.
    pub min_execution_period_secs: u64,
}

/// Outcome of evaluating a tally against a policy.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DecisionPolicyResult {
    /// Whether the proposal passes.
    pub allow: bool,
    /// Whether the outcome can no longer change.
    pub is_final: bool,
}

impl DecisionPolicyResult {
    const ACCEPTED: Self = Self {
        allow: true,
        is_final: true,
    };
    const REJECTED: Self = Self {
        allow: false,
        is_final: true,
    };
    const PENDING: Self = Self {
        allow: false,
        is_final: false,
    };
}

/// The decision policy of the foundation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum DecisionPolicy {
    /// Pass once the yes weight reaches an absolute threshold.
    Threshold {
        threshold: Dec,
        windows: DecisionPolicyWindows,
    },
    /// Pass once the yes weight reaches a fraction of the total weight.
    Percentage {
        percentage: Dec,
        windows: DecisionPolicyWindows,
    },
}

impl Default for DecisionPolicy {
    /// A single yes vote passes; one day of voting; no cool-down.
    fn default() -> Self {
        DecisionPolicy::Threshold {
            threshold: Dec::ONE,
            windows: DecisionPolicyWindows {
                voting_period_secs: 24 * 3600,
                min_execution_period_secs: 0,
            },
        }
    }
}

impl DecisionPolicy {
    pub fn windows(&self) -> &DecisionPolicyWindows {
        match self {
            DecisionPolicy::Threshold { windows, .. } => windows,
            DecisionPolicy::Percentage { windows, .. } => windows,
        }
    }

    pub fn voting_period_secs(&self) -> u64 {
        self.windows().voting_period_secs
    }

    /// Structural checks that need no configuration or state.
    pub fn validate_basic(&self) -> Result<(), FoundationError> {
        if self.windows().voting_period_secs == 0 {
            return Err(FoundationError::invalid("voting period must be positive"));
        }
        match self {
            DecisionPolicy::Threshold { threshold, .. } => {
                if !threshold.is_positive() {
                    return Err(FoundationError::invalid("threshold must be positive"));
                }
            }
            DecisionPolicy::Percentage { percentage, .. } => {
                if !percentage.is_positive() || *percentage > Dec::ONE {
                    return Err(FoundationError::invalid(format!(
                        "percentage must be in (0, 1]: {percentage}"
                    )));
                }
            }
        }
        Ok(())
    }

    /// Semantic checks against the configured bounds and the current
    /// foundation.
    pub fn validate(
        &self,
        info: &FoundationInfo,
        config: &FoundationConfig,
    ) -> Result<(), FoundationError> {
        self.validate_basic()?;

        let windows = self.windows();
        let execution_deadline = windows
            .voting_period_secs
            .saturating_add(config.max_execution_period_secs);
        if windows.min_execution_period_secs >= execution_deadline {
            return Err(FoundationError::invalid(format!(
                "min execution period ({}) must be shorter than voting period plus max execution period ({})",
                format_duration(windows.min_execution_period_secs),
                format_duration(execution_deadline),
            )));
        }

        match self {
            DecisionPolicy::Threshold { threshold, .. } => {
                if *threshold < config.min_threshold {
                    return Err(FoundationError::invalid(format!(
                        "threshold {threshold} is below the minimum {}",
                        config.min_threshold
                    )));
                }
            }
            DecisionPolicy::Percentage { percentage, .. } => {
                if *percentage < config.min_percentage {
                    return Err(FoundationError::invalid(format!(
                        "percentage {percentage} is below the minimum {}",
                        config.min_percentage
                    )));
                }
            }
        }

        if info.total_weight.is_zero() {
            return Err(FoundationError::invalid(
                "decision policy cannot be satisfied by an empty foundation",
            ));
        }
        Ok(())
    }

    /// Decide a tally, refusing while the minimum execution period is still
    /// running.
    pub fn allow(
        &self,
        tally: &TallyResult,
        total_weight: Dec,
        since_submission_secs: u64,
    ) -> Result<DecisionPolicyResult, FoundationError> {
        let min_execution = self.windows().min_execution_period_secs;
        if since_submission_secs < min_execution {
            return Err(FoundationError::unauthorized(format!(
                "must wait {} after submission before execution, currently at {}",
                format_duration(min_execution),
                format_duration(since_submission_secs),
            )));
        }
        self.evaluate(tally, total_weight)
    }

    /// Decide a tally without the execution-window gate.
    pub fn evaluate(
        &self,
        tally: &TallyResult,
        total_weight: Dec,
    ) -> Result<DecisionPolicyResult, FoundationError> {
        if total_weight.is_zero() {
            return Ok(DecisionPolicyResult::REJECTED);
        }
        let undecided = total_weight.saturating_sub(tally.total_counts());
        let max_yes = tally
            .yes_count
            .checked_add(undecided)
            .ok_or_else(|| FoundationError::invalid("tally overflow"))?;

        match self {
            DecisionPolicy::Threshold { threshold, .. } => {
                // Clamp so a foundation that shrank below the threshold can
                // still pass a proposal unanimously.
                let effective = (*threshold).min(total_weight);
                if tally.yes_count >= effective {
                    Ok(DecisionPolicyResult::ACCEPTED)
                } else if max_yes < effective {
                    Ok(DecisionPolicyResult::REJECTED)
                } else {
                    Ok(DecisionPolicyResult::PENDING)
                }
            }
            DecisionPolicy::Percentage { percentage, .. } => {
                let ratio = |yes: Dec| {
                    yes.checked_quo(total_weight)
                        .ok_or_else(|| FoundationError::invalid("tally overflow"))
                };
                if ratio(tally.yes_count)? >= *percentage {
                    Ok(DecisionPolicyResult::ACCEPTED)
                } else if ratio(max_yes)? < *percentage {
                    Ok(DecisionPolicyResult::REJECTED)
                } else {
                    Ok(DecisionPolicyResult::PENDING)
                }
            }
        }
    }
}
