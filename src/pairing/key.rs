//! Canonical keys for unordered player pairs

use crate::types::PlayerId;
use serde::{Deserialize, Serialize};

/// Unordered pair stored as `(low, high)` under `PlayerId`'s byte-wise order
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PairKey {
    pub low: PlayerId,
    pub high: PlayerId,
}

impl PairKey {
    pub fn contains(&self, player_id: &str) -> bool {
        self.low == player_id || self.high == player_id
    }

    /// The other member of the pair, `None` if `player_id` is not in it
    pub fn other(&self, player_id: &str) -> Option<&PlayerId> {
        if self.low == player_id {
            Some(&self.high)
        } else if self.high == player_id {
            Some(&self.low)
        } else {
            None
        }
    }

    pub fn is_low(&self, player_id: &str) -> bool {
        self.low == player_id
    }
}

impl std::fmt::Display for PairKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}|{}", self.low, self.high)
    }
}

/// Canonical key for `a` and `b`, independent of argument order
pub fn order_pair(a: &str, b: &str) -> PairKey {
    let (low, high) = if a <= b { (a, b) } else { (b, a) };
    PairKey {
        low: low.to_string(),
        high: high.to_string(),
    }
}
