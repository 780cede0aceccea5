//! Rating calculator trait and rating deltas
//!
//! This module defines the interface for rating calculations. Calculators never
//! mutate players; they return per-player deltas for the caller to persist.

use crate::types::{Player, PlayerId, TeamSide};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Post-match values for one participant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatingDelta {
    pub player_id: PlayerId,
    pub old_rating: f64,
    pub new_rating: f64,
    pub new_games_played: u32,
    pub new_win_count: u32,
}

impl RatingDelta {
    /// Signed rating change
    pub fn rating_change(&self) -> f64 {
        self.new_rating - self.old_rating
    }

    /// Write the post-match values onto the player
    pub fn apply_to(&self, player: &mut Player) {
        player.rating = self.new_rating;
        player.games_played = self.new_games_played;
        player.win_count = self.new_win_count;
    }
}

/// Trait for calculating rating changes after matches
pub trait RatingCalculator: Send + Sync {
    /// Calculate rating deltas for a completed match
    ///
    /// # Arguments
    /// * `team1` - Players on the first team
    /// * `team2` - Players on the second team
    /// * `winning_team` - Winning side, `None` for a draw
    ///
    /// # Returns
    /// Map of player id to post-match values; empty when either team is empty
    fn apply_match_result(
        &self,
        team1: &[Player],
        team2: &[Player],
        winning_team: Option<TeamSide>,
    ) -> HashMap<PlayerId, RatingDelta>;

    /// Get the initial rating for a new player with the given baseline skill
    fn initial_rating(&self, baseline_skill: u8) -> f64;

    /// Quality score of a pairing (0.0 to 1.0, higher is more even)
    fn match_quality(&self, team1: &[Player], team2: &[Player]) -> f64;

    /// Get current configuration as JSON
    fn config(&self) -> serde_json::Value;

    /// Update configuration from JSON
    fn update_config(&mut self, config: serde_json::Value) -> crate::error::Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RatingConfig;

    #[test]
    fn test_delta_applies_to_player() {
        let mut player = Player::new("p1", 50, &RatingConfig::default());
        let delta = RatingDelta {
            player_id: "p1".to_string(),
            old_rating: 1500.0,
            new_rating: 1516.0,
            new_games_played: 1,
            new_win_count: 1,
        };

        assert_eq!(delta.rating_change(), 16.0);
        delta.apply_to(&mut player);

        assert_eq!(player.rating, 1516.0);
        assert_eq!(player.games_played, 1);
        assert_eq!(player.win_count, 1);
    }
}
