//! Court rotation configuration

use crate::error::{Result, RotationError};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RotationConfig {
    pub num_courts: usize,
    /// Players per team: 1 for singles, 2 for doubles
    pub team_size: usize,
    /// Consecutive games after which a player must sit out; `None` disables
    pub rest_threshold: Option<u32>,
}

impl Default for RotationConfig {
    fn default() -> Self {
        Self {
            num_courts: 2,
            team_size: 2,
            rest_threshold: Some(3),
        }
    }
}

impl RotationConfig {
    pub fn players_per_court(&self) -> usize {
        self.team_size * 2
    }

    pub fn validate(&self) -> Result<()> {
        if self.num_courts == 0 {
            return Err(RotationError::ConfigurationError {
                message: "At least one court is required".to_string(),
            }
            .into());
        }

        if !(1..=2).contains(&self.team_size) {
            return Err(RotationError::ConfigurationError {
                message: format!("Unsupported team size: {}", self.team_size),
            }
            .into());
        }

        if self.rest_threshold == Some(0) {
            return Err(RotationError::ConfigurationError {
                message: "Rest threshold must be at least 1".to_string(),
            }
            .into());
        }

        Ok(())
    }
}
