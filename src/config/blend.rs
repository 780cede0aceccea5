//! Skill blending configuration

use crate::error::{Result, RotationError};
use serde::{Deserialize, Serialize};

/// How quickly the learned rating takes over from the baseline skill
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlendConfig {
    /// Rating weight for a player with no games
    pub rating_weight_floor: f64,
    /// Rating weight once the ramp is complete
    pub rating_weight_ceiling: f64,
    /// Games over which the rating weight ramps up
    pub ramp_games: u32,
}

impl Default for BlendConfig {
    fn default() -> Self {
        Self {
            rating_weight_floor: 0.1,
            rating_weight_ceiling: 0.9,
            ramp_games: 30,
        }
    }
}

impl BlendConfig {
    pub fn validate(&self) -> Result<()> {
        let in_unit = |w: f64| (0.0..=1.0).contains(&w);
        if !in_unit(self.rating_weight_floor) || !in_unit(self.rating_weight_ceiling) {
            return Err(RotationError::ConfigurationError {
                message: "Rating weights must lie within [0, 1]".to_string(),
            }
            .into());
        }

        if self.rating_weight_floor > self.rating_weight_ceiling {
            return Err(RotationError::ConfigurationError {
                message: "Rating weight floor cannot exceed the ceiling".to_string(),
            }
            .into());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blend_config_validation() {
        assert!(BlendConfig::default().validate().is_ok());

        let inverted = BlendConfig {
            rating_weight_floor: 0.8,
            rating_weight_ceiling: 0.2,
            ..Default::default()
        };
        assert!(inverted.validate().is_err());

        let out_of_range = BlendConfig {
            rating_weight_ceiling: 1.5,
            ..Default::default()
        };
        assert!(out_of_range.validate().is_err());
    }
}
