//! Court Rotation - Rotation and balancing core for recreational court sports
//!
//! This crate provides fair court rotation, skill-balanced team splitting,
//! Elo ratings with experience-weighted skill blending, and pairwise
//! partner/opponent history for doubles and singles play.

pub mod balance;
pub mod config;
pub mod error;
pub mod metrics;
pub mod pairing;
pub mod rating;
pub mod rotation;
pub mod session;
pub mod skill;
pub mod types;
pub mod utils;

// Re-export commonly used types and traits
pub use error::{Result, RotationError};
pub use types::*;

// Re-export key components
pub use balance::{TeamBalancer, TeamSplit};
pub use pairing::{order_pair, PairingHistoryTracker, PairingRecord};
pub use rating::{EloRatingModel, RatingCalculator};
pub use rotation::{RotationPlan, RotationScheduler};
pub use session::GroupSession;
pub use skill::SkillBlender;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
