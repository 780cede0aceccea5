//! Composite skill calculation
//!
//! A new player's manually entered baseline is all we know about them; as games
//! accumulate the learned rating takes over. The composite is only used for
//! ordering and balancing and is never written back as a rating.

use crate::config::{BlendConfig, RatingConfig};
use crate::types::{Player, BASELINE_SKILL_MAX, BASELINE_SKILL_MIN};
use serde::{Deserialize, Serialize};

/// Linear map of `value` from `[min, max]` into `[0, 1]`, clamped
pub fn normalize(value: f64, min: f64, max: f64) -> f64 {
    if max <= min {
        return 0.0;
    }
    ((value - min) / (max - min)).clamp(0.0, 1.0)
}

/// Weights applied to rating and baseline; they always sum to 1
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExperienceWeight {
    pub rating_weight: f64,
    pub baseline_weight: f64,
}

#[derive(Debug, Clone, Default)]
pub struct SkillBlender {
    blend: BlendConfig,
    rating: RatingConfig,
}

impl SkillBlender {
    pub fn new(blend: BlendConfig, rating: RatingConfig) -> Self {
        Self { blend, rating }
    }

    /// Rating weight ramps linearly from the floor to the ceiling over
    /// `ramp_games`, then holds.
    pub fn experience_weight(&self, games_played: u32) -> ExperienceWeight {
        let progress = if self.blend.ramp_games == 0 {
            1.0
        } else {
            (games_played as f64 / self.blend.ramp_games as f64).min(1.0)
        };

        let floor = self.blend.rating_weight_floor;
        let rating_weight = floor + (self.blend.rating_weight_ceiling - floor) * progress;

        ExperienceWeight {
            rating_weight,
            baseline_weight: 1.0 - rating_weight,
        }
    }

    /// Blended skill in `[0, 1]`
    pub fn composite_skill(&self, player: &Player) -> f64 {
        let weight = self.experience_weight(player.games_played);
        let baseline = normalize(
            player.baseline_skill as f64,
            BASELINE_SKILL_MIN as f64,
            BASELINE_SKILL_MAX as f64,
        );
        let rating = normalize(player.rating, self.rating.min_rating, self.rating.max_rating);

        weight.baseline_weight * baseline + weight.rating_weight * rating
    }

    /// Sum of composite skill over a team
    pub fn team_skill<'a>(&self, team: impl IntoIterator<Item = &'a Player>) -> f64 {
        team.into_iter().map(|p| self.composite_skill(p)).sum()
    }
}
