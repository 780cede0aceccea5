//! Pairing history configuration

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PairingConfig {
    /// Count drawn matches towards partnered/opposed totals
    pub record_draws: bool,
}

impl Default for PairingConfig {
    fn default() -> Self {
        Self { record_draws: true }
    }
}
