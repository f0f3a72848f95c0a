//! Static module configuration with TOML file support.
//!
//! The configuration is fixed for the lifetime of the chain binary and is
//! handed to the keeper at construction. On-chain, governance-updatable
//! values live in [`crate::params::Params`] instead.

use serde::{Deserialize, Serialize};

use foundation_types::Dec;

use crate::FoundationError;

/// Configuration for the foundation module.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FoundationConfig {
    /// How long after the end of its voting period an accepted proposal may
    /// still be executed before it is pruned.
    #[serde(default = "default_max_execution_period_secs")]
    pub max_execution_period_secs: u64,

    /// Maximum length in bytes of any metadata string.
    #[serde(default = "default_max_metadata_len")]
    pub max_metadata_len: usize,

    /// Floor for threshold decision policies.
    #[serde(default = "default_min_threshold")]
    pub min_threshold: Dec,

    /// Floor for percentage decision policies (zero disables the floor).
    #[serde(default)]
    pub min_percentage: Dec,

    /// Module account whose balance is taxed every block.
    #[serde(default = "default_fee_collector")]
    pub fee_collector: String,

    /// Module whose account acts as the governance authority.
    #[serde(default = "default_governance_module")]
    pub governance_module: String,
}

// ── Serde default helpers ──────────────────────────────────────────────

fn default_max_execution_period_secs() -> u64 {
    14 * 24 * 3600
}

fn default_max_metadata_len() -> usize {
    255
}

fn default_min_threshold() -> Dec {
    Dec::ONE
}

fn default_fee_collector() -> String {
    "fee_collector".to_string()
}

fn default_governance_module() -> String {
    "gov".to_string()
}

// ── Impl ───────────────────────────────────────────────────────────────

impl FoundationConfig {
    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: &str) -> Result<Self, FoundationError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| FoundationError::invalid(format!("config: {e}")))?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, FoundationError> {
        let config: Self =
            toml::from_str(s).map_err(|e| FoundationError::invalid(format!("config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize the configuration to a TOML string.
    pub fn to_toml_string(&self) -> String {
        toml::to_string_pretty(self).expect("FoundationConfig is always serializable to TOML")
    }

    pub fn validate(&self) -> Result<(), FoundationError> {
        if self.max_execution_period_secs == 0 {
            return Err(FoundationError::invalid(
                "config: max execution period must be positive",
            ));
        }
        if self.min_percentage > Dec::ONE {
            return Err(FoundationError::invalid(
                "config: min percentage must not exceed 1",
            ));
        }
        Ok(())
    }

    /// Validate the length of a metadata string.
    pub fn validate_metadata(&self, metadata: &str) -> Result<(), FoundationError> {
        if metadata.len() > self.max_metadata_len {
            return Err(FoundationError::invalid(format!(
                "metadata is too large: {} > {}",
                metadata.len(),
                self.max_metadata_len
            )));
        }
        Ok(())
    }
}

impl Default for FoundationConfig {
    fn default() -> Self {
        Self {
            max_execution_period_secs: default_max_execution_period_secs(),
            max_metadata_len: default_max_metadata_len(),
            min_threshold: default_min_threshold(),
            min_percentage: Dec::ZERO,
            fee_collector: default_fee_collector(),
            governance_module: default_governance_module(),
        }
    }
}
