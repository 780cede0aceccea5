//! Utility functions for the rotation engine

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Generate a new unique match ID
pub fn generate_match_id() -> Uuid {
    Uuid::new_v4()
}

/// Get the current UTC timestamp
pub fn current_timestamp() -> DateTime<Utc> {
    Utc::now()
}

/// Outcome label used in logs and metrics
pub fn outcome_label(winning_team: Option<crate::types::TeamSide>) -> &'static str {
    match winning_team {
        Some(crate::types::TeamSide::Team1) => "team1",
        Some(crate::types::TeamSide::Team2) => "team2",
        None => "draw",
    }
}
