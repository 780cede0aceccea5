//! Pairwise relationship history
//!
//! This module keeps one record per unordered pair of players per group,
//! counting matches as partners and as opponents, and derives reporting
//! statistics from those records.

pub mod key;
pub mod stats;
pub mod tracker;

pub use key::{order_pair, PairKey};
pub use stats::{OpponentSummary, PartnerSummary};
pub use tracker::{PairingDelta, PairingHistoryTracker, PairingLedger, PairingRecord};
