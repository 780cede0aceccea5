//! Rating system configuration

use crate::error::{Result, RotationError};
use serde::{Deserialize, Serialize};

/// Elo parameters and rating bounds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RatingConfig {
    /// Rating of a player with an average (50) baseline
    pub default_rating: f64,
    pub min_rating: f64,
    pub max_rating: f64,
    /// K-factor while a player is still provisional
    pub k_new_player: f64,
    pub k_regular: f64,
    /// Games below which the new-player K applies
    pub provisional_games: u32,
    /// Rating points per baseline point away from 50 for new players
    pub baseline_rating_spread: f64,
    /// Whether a draw still increments games played
    pub draw_counts_as_game: bool,
}

impl Default for RatingConfig {
    fn default() -> Self {
        Self {
            default_rating: 1500.0,
            min_rating: 1100.0,
            max_rating: 1900.0,
            k_new_player: 32.0,
            k_regular: 24.0,
            provisional_games: 10,
            baseline_rating_spread: 4.0,
            draw_counts_as_game: true,
        }
    }
}

impl RatingConfig {
    /// Clamp a rating into the configured bounds
    pub fn clamp(&self, rating: f64) -> f64 {
        rating.clamp(self.min_rating, self.max_rating)
    }

    /// Starting rating derived from a 0-100 baseline skill
    pub fn initial_rating(&self, baseline_skill: u8) -> f64 {
        let offset = (baseline_skill as f64 - 50.0) * self.baseline_rating_spread;
        self.clamp(self.default_rating + offset)
    }

    /// Validate configuration parameters
    pub fn validate(&self) -> Result<()> {
        if !(self.min_rating < self.max_rating) {
            return Err(RotationError::ConfigurationError {
                message: "Minimum rating must be below maximum rating".to_string(),
            }
            .into());
        }

        if self.default_rating < self.min_rating || self.default_rating > self.max_rating {
            return Err(RotationError::ConfigurationError {
                message: "Default rating must lie within the rating bounds".to_string(),
            }
            .into());
        }

        if self.k_new_player <= 0.0 || self.k_regular <= 0.0 {
            return Err(RotationError::ConfigurationError {
                message: "K-factors must be positive".to_string(),
            }
            .into());
        }

        if self.baseline_rating_spread < 0.0 {
            return Err(RotationError::ConfigurationError {
                message: "Baseline rating spread must be non-negative".to_string(),
            }
            .into());
        }

        Ok(())
    }
}
