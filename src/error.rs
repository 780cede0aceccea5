//! Error types for the rotation engine
//!
//! This module defines all error types using anyhow for consistent error handling
//! throughout the crate.

/// Result type alias for convenience
pub type Result<T> = anyhow::Result<T>;

/// Custom error types for specific scheduling and rating scenarios
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RotationError {
    #[error("Insufficient players: {required} required, {available} available")]
    InsufficientPlayers { required: usize, available: usize },

    #[error("Invalid team composition: {reason}")]
    InvalidTeamComposition { reason: String },

    #[error("Unknown player: {player_id}")]
    UnknownPlayer { player_id: String },

    #[error("Duplicate player: {player_id}")]
    DuplicatePlayer { player_id: String },

    #[error("Invalid match: {reason}")]
    InvalidMatch { reason: String },

    #[error("Configuration error: {message}")]
    ConfigurationError { message: String },

    #[error("Internal error: {message}")]
    InternalError { message: String },
}
