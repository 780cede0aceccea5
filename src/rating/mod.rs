//! Rating system using an Elo model with team averages
//!
//! This module provides expected-score and posterior-rating calculations and
//! integration with the skillratings crate for the Elo win expectation.

pub mod calculator;
pub mod elo;

// Re-export commonly used types
pub use calculator::{RatingCalculator, RatingDelta};
pub use elo::{expected_score, update_rating, EloRatingModel};
