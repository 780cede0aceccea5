//! Group sessions
//!
//! This module holds the in-memory state of one playing group and applies
//! the deltas produced by rotation, rating and pairing as single units.

pub mod group;

pub use group::{GroupSession, LeaderboardEntry, PlayerStatistics, SessionStats};
