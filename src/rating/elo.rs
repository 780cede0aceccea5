//! Elo rating model for team matches
//!
//! Each player is rated against the average rating of the opposing team and
//! moved by their own K-factor, so newer players converge faster.

use crate::config::RatingConfig;
use crate::error::RotationError;
use crate::rating::calculator::{RatingCalculator, RatingDelta};
use crate::types::{Player, PlayerId, TeamSide};
use skillratings::elo::EloRating;
use std::collections::HashMap;
use tracing::debug;

/// Probability that a player rated `rating_a` beats one rated `rating_b`.
///
/// `expected_score(a, b) + expected_score(b, a) == 1`.
pub fn expected_score(rating_a: f64, rating_b: f64) -> f64 {
    let (expected_a, _) = skillratings::elo::expected_score(
        &EloRating { rating: rating_a },
        &EloRating { rating: rating_b },
    );
    expected_a
}

/// Posterior rating, clamped to `[min, max]`
pub fn update_rating(
    rating: f64,
    actual_score: f64,
    expected_score: f64,
    k: f64,
    min: f64,
    max: f64,
) -> f64 {
    (rating + k * (actual_score - expected_score)).clamp(min, max)
}

fn average_rating(team: &[Player]) -> f64 {
    team.iter().map(|p| p.rating).sum::<f64>() / team.len() as f64
}

/// Elo calculator driven by [`RatingConfig`]
#[derive(Debug, Clone)]
pub struct EloRatingModel {
    config: RatingConfig,
}

impl EloRatingModel {
    pub fn new(config: RatingConfig) -> crate::error::Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn rating_config(&self) -> &RatingConfig {
        &self.config
    }

    /// K-factor for a player with the given number of games
    pub fn k_factor(&self, games_played: u32) -> f64 {
        if games_played < self.config.provisional_games {
            self.config.k_new_player
        } else {
            self.config.k_regular
        }
    }

    fn team_deltas(
        &self,
        team: &[Player],
        opponent_average: f64,
        actual_score: Option<f64>,
        deltas: &mut HashMap<PlayerId, RatingDelta>,
    ) {
        for player in team {
            let (new_rating, won) = match actual_score {
                Some(actual) => {
                    let expected = expected_score(player.rating, opponent_average);
                    let k = self.k_factor(player.games_played);
                    let new_rating = update_rating(
                        player.rating,
                        actual,
                        expected,
                        k,
                        self.config.min_rating,
                        self.config.max_rating,
                    );
                    (new_rating, actual >= 1.0)
                }
                None => (player.rating, false),
            };

            let counts_game = actual_score.is_some() || self.config.draw_counts_as_game;

            deltas.insert(
                player.id.clone(),
                RatingDelta {
                    player_id: player.id.clone(),
                    old_rating: player.rating,
                    new_rating,
                    new_games_played: player
                        .games_played
                        .saturating_add(u32::from(counts_game)),
                    new_win_count: player.win_count.saturating_add(u32::from(won)),
                },
            );
        }
    }
}

impl Default for EloRatingModel {
    fn default() -> Self {
        Self {
            config: RatingConfig::default(),
        }
    }
}

impl RatingCalculator for EloRatingModel {
    fn apply_match_result(
        &self,
        team1: &[Player],
        team2: &[Player],
        winning_team: Option<TeamSide>,
    ) -> HashMap<PlayerId, RatingDelta> {
        let mut deltas = HashMap::new();
        if team1.is_empty() || team2.is_empty() {
            return deltas;
        }

        let team1_average = average_rating(team1);
        let team2_average = average_rating(team2);

        let (team1_score, team2_score) = match winning_team {
            Some(TeamSide::Team1) => (Some(1.0), Some(0.0)),
            Some(TeamSide::Team2) => (Some(0.0), Some(1.0)),
            None => (None, None),
        };

        self.team_deltas(team1, team2_average, team1_score, &mut deltas);
        self.team_deltas(team2, team1_average, team2_score, &mut deltas);

        debug!(
            "Rated match: team1 avg {:.1} vs team2 avg {:.1}, winner {:?}",
            team1_average, team2_average, winning_team
        );

        deltas
    }

    fn initial_rating(&self, baseline_skill: u8) -> f64 {
        self.config.initial_rating(baseline_skill)
    }

    fn match_quality(&self, team1: &[Player], team2: &[Player]) -> f64 {
        if team1.is_empty() || team2.is_empty() {
            return 0.0;
        }

        let expected = expected_score(average_rating(team1), average_rating(team2));
        1.0 - (2.0 * expected - 1.0).abs()
    }

    fn config(&self) -> serde_json::Value {
        serde_json::to_value(&self.config).unwrap_or(serde_json::Value::Null)
    }

    fn update_config(&mut self, config: serde_json::Value) -> crate::error::Result<()> {
        let new_config: RatingConfig = serde_json::from_value(config).map_err(|e| {
            RotationError::ConfigurationError {
                message: format!("Invalid rating configuration: {}", e),
            }
        })?;

        new_config.validate()?;
        self.config = new_config;
        Ok(())
    }
}
