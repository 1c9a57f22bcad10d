use crate::core::constants::{DEFAULT_DEBOUNCE_MS, GOVERNANCE_PROGRAM_ID, SQUADS_V4_PROGRAM_ID};
use crate::error::Result;
use serde::{Deserialize, Serialize};
use solana_sdk::pubkey::Pubkey;
use std::time::Duration;

/// Cluster-specific settings for the add-member form.
///
/// Every field is optional in JSON and falls back to the mainnet defaults.
/// Program ids are given as base58 strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FormConfig {
    #[serde(with = "crate::utils::pubkey_string")]
    pub squads_program_id: Pubkey,

    #[serde(with = "crate::utils::pubkey_string")]
    pub governance_program_id: Pubkey,

    /// Quiet period before a blurred domain name is resolved
    pub debounce_ms: u64,
}

impl Default for FormConfig {
    fn default() -> Self {
        Self {
            squads_program_id: SQUADS_V4_PROGRAM_ID,
            governance_program_id: GOVERNANCE_PROGRAM_ID,
            debounce_ms: DEFAULT_DEBOUNCE_MS,
        }
    }
}

impl FormConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    pub fn with_squads_program_id(mut self, program_id: Pubkey) -> Self {
        self.squads_program_id = program_id;
        self
    }

    pub fn with_debounce_ms(mut self, debounce_ms: u64) -> Self {
        self.debounce_ms = debounce_ms;
        self
    }
}
