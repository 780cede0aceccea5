//! Common types used throughout the rotation engine

use crate::config::RatingConfig;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for players. Ordered byte-wise, which is the total order
/// used for canonical pair keys.
pub type PlayerId = String;

/// Unique identifier for groups
pub type GroupId = String;

/// Unique identifier for matches
pub type MatchId = Uuid;

/// Court number within a group, starting at 1
pub type CourtId = u32;

pub const BASELINE_SKILL_MIN: u8 = 0;
pub const BASELINE_SKILL_MAX: u8 = 100;
pub const DEFAULT_BASELINE_SKILL: u8 = 50;

/// One side of a court
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TeamSide {
    Team1,
    Team2,
}

impl TeamSide {
    pub fn opposite(self) -> Self {
        match self {
            TeamSide::Team1 => TeamSide::Team2,
            TeamSide::Team2 => TeamSide::Team1,
        }
    }
}

impl std::fmt::Display for TeamSide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TeamSide::Team1 => write!(f, "team1"),
            TeamSide::Team2 => write!(f, "team2"),
        }
    }
}

/// Loosely populated player record as supplied by the persistence layer.
///
/// Everything except the id may be missing; [`Player::from_profile`] turns it
/// into a fully populated [`Player`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlayerProfile {
    pub id: PlayerId,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub baseline_skill: Option<i32>,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub games_played: Option<u32>,
    #[serde(default)]
    pub win_count: Option<u32>,
    #[serde(default)]
    pub play_count: Option<u32>,
    #[serde(default)]
    pub consecutive_games: Option<u32>,
    #[serde(default)]
    pub rest_counter: Option<u32>,
    #[serde(default)]
    pub last_finish_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub active: Option<bool>,
    #[serde(default)]
    pub is_playing: Option<bool>,
    #[serde(default)]
    pub is_resting: Option<bool>,
}

impl PlayerProfile {
    pub fn new(id: impl Into<PlayerId>) -> Self {
        Self {
            id: id.into(),
            ..Default::default()
        }
    }

    pub fn with_baseline(mut self, baseline_skill: i32) -> Self {
        self.baseline_skill = Some(baseline_skill);
        self
    }

    pub fn with_rating(mut self, rating: f64) -> Self {
        self.rating = Some(rating);
        self
    }
}

/// Fully populated player state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub display_name: String,
    pub baseline_skill: u8,
    pub rating: f64,
    pub games_played: u32,
    pub win_count: u32,
    pub play_count: u32,
    pub consecutive_games: u32,
    pub rest_counter: u32,
    pub last_finish_time: Option<DateTime<Utc>>,
    pub rest_started_at: Option<DateTime<Utc>>,
    /// Soft deactivation flag; inactive players keep their history
    pub active: bool,
    /// Session-scoped, not persisted history
    #[serde(default)]
    pub is_playing: bool,
    /// Session-scoped, not persisted history
    #[serde(default)]
    pub is_resting: bool,
}

impl Player {
    /// Create a new player with a baseline skill and a rating derived from it
    pub fn new(id: impl Into<PlayerId>, baseline_skill: i32, config: &RatingConfig) -> Self {
        Self::from_profile(PlayerProfile::new(id).with_baseline(baseline_skill), config)
    }

    /// Single defaulting step from a partial profile to a complete player.
    ///
    /// The baseline is clamped to [0,100]; a missing rating is derived from the
    /// baseline, and any rating is clamped to the configured bounds.
    pub fn from_profile(profile: PlayerProfile, config: &RatingConfig) -> Self {
        let baseline_skill = profile
            .baseline_skill
            .unwrap_or(DEFAULT_BASELINE_SKILL as i32)
            .clamp(BASELINE_SKILL_MIN as i32, BASELINE_SKILL_MAX as i32)
            as u8;

        let rating = match profile.rating {
            Some(rating) if rating.is_finite() => config.clamp(rating),
            _ => config.initial_rating(baseline_skill),
        };

        let display_name = profile
            .display_name
            .filter(|name| !name.trim().is_empty())
            .unwrap_or_else(|| profile.id.clone());

        Self {
            display_name,
            baseline_skill,
            rating,
            games_played: profile.games_played.unwrap_or(0),
            win_count: profile.win_count.unwrap_or(0),
            play_count: profile.play_count.unwrap_or(0),
            consecutive_games: profile.consecutive_games.unwrap_or(0),
            rest_counter: profile.rest_counter.unwrap_or(0),
            last_finish_time: profile.last_finish_time,
            rest_started_at: None,
            active: profile.active.unwrap_or(true),
            is_playing: profile.is_playing.unwrap_or(false),
            is_resting: profile.is_resting.unwrap_or(false),
            id: profile.id,
        }
    }

    /// Fraction of games won, 0 when no games have been played
    pub fn win_rate(&self) -> f64 {
        if self.games_played == 0 {
            return 0.0;
        }
        self.win_count as f64 / self.games_played as f64
    }
}

/// Final score of a match
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Score {
    pub team1: u32,
    pub team2: u32,
}

impl Score {
    pub fn new(team1: u32, team2: u32) -> Self {
        Self { team1, team2 }
    }

    /// Winning side, `None` for a draw
    pub fn winning_team(&self) -> Option<TeamSide> {
        match self.team1.cmp(&self.team2) {
            std::cmp::Ordering::Greater => Some(TeamSide::Team1),
            std::cmp::Ordering::Less => Some(TeamSide::Team2),
            std::cmp::Ordering::Equal => None,
        }
    }
}

/// A completed match; never mutated after creation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Match {
    pub id: MatchId,
    pub group_id: GroupId,
    pub team1: Vec<PlayerId>,
    pub team2: Vec<PlayerId>,
    pub score: Score,
    /// `None` for a draw
    pub winning_team: Option<TeamSide>,
    pub completed_at: DateTime<Utc>,
}

/// Court working state for a round in progress
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Court {
    pub court_id: CourtId,
    pub team1: Vec<PlayerId>,
    pub team2: Vec<PlayerId>,
    pub score: Score,
    pub serving: TeamSide,
}

impl Court {
    pub fn new(court_id: CourtId, team1: Vec<PlayerId>, team2: Vec<PlayerId>) -> Self {
        Self {
            court_id,
            team1,
            team2,
            score: Score::default(),
            serving: TeamSide::Team1,
        }
    }

    pub fn contains(&self, player_id: &str) -> bool {
        self.team1.iter().chain(self.team2.iter()).any(|id| id == player_id)
    }

    pub fn player_ids(&self) -> impl Iterator<Item = &PlayerId> {
        self.team1.iter().chain(self.team2.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_profile_defaults() {
        let config = RatingConfig::default();
        let player = Player::from_profile(PlayerProfile::new("p1"), &config);

        assert_eq!(player.display_name, "p1");
        assert_eq!(player.baseline_skill, DEFAULT_BASELINE_SKILL);
        assert_eq!(player.rating, 1500.0);
        assert_eq!(player.games_played, 0);
        assert!(player.active);
        assert!(!player.is_playing);
        assert!(!player.is_resting);
    }

    #[test]
    fn test_from_profile_clamps_values() {
        let config = RatingConfig::default();

        let high = Player::from_profile(
            PlayerProfile::new("p1").with_baseline(250).with_rating(5000.0),
            &config,
        );
        assert_eq!(high.baseline_skill, 100);
        assert_eq!(high.rating, config.max_rating);

        let low = Player::from_profile(
            PlayerProfile::new("p2").with_baseline(-10).with_rating(-40.0),
            &config,
        );
        assert_eq!(low.baseline_skill, 0);
        assert_eq!(low.rating, config.min_rating);
    }

    #[test]
    fn test_initial_rating_follows_baseline() {
        let config = RatingConfig::default();
        let strong = Player::new("strong", 90, &config);
        let weak = Player::new("weak", 10, &config);

        assert!(strong.rating > weak.rating);
        assert!(strong.rating <= config.max_rating);
        assert!(weak.rating >= config.min_rating);
    }

    #[test]
    fn test_score_winner() {
        assert_eq!(Score::new(21, 15).winning_team(), Some(TeamSide::Team1));
        assert_eq!(Score::new(18, 21).winning_team(), Some(TeamSide::Team2));
        assert_eq!(Score::new(20, 20).winning_team(), None);
    }

    #[test]
    fn test_court_membership() {
        let court = Court::new(1, vec!["a".into(), "b".into()], vec!["c".into(), "d".into()]);
        assert!(court.contains("c"));
        assert!(!court.contains("e"));
        assert_eq!(court.player_ids().count(), 4);
        assert_eq!(court.serving, TeamSide::Team1);
    }
}
