//! Pairing history tracking
//!
//! Every match produces one delta per teammate pair and one per cross-team
//! pair. Deltas are plain increments; [`PairingLedger`] creates records lazily
//! and folds deltas into them.

use crate::config::PairingConfig;
use crate::error::{Result, RotationError};
use crate::pairing::key::{order_pair, PairKey};
use crate::types::{GroupId, PlayerId, TeamSide};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use tracing::debug;

/// Accumulated history between two players in one group
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PairingRecord {
    pub group_id: GroupId,
    pub player_low: PlayerId,
    pub player_high: PlayerId,
    pub times_partnered: u32,
    pub wins_together: u32,
    pub times_opposed: u32,
    pub low_wins_vs_high: u32,
    pub high_wins_vs_low: u32,
}

impl PairingRecord {
    pub fn new(group_id: GroupId, key: PairKey) -> Self {
        Self {
            group_id,
            player_low: key.low,
            player_high: key.high,
            times_partnered: 0,
            wins_together: 0,
            times_opposed: 0,
            low_wins_vs_high: 0,
            high_wins_vs_low: 0,
        }
    }

    pub fn key(&self) -> PairKey {
        PairKey {
            low: self.player_low.clone(),
            high: self.player_high.clone(),
        }
    }

    pub fn apply(&mut self, delta: &PairingDelta) {
        self.times_partnered += delta.times_partnered;
        self.wins_together += delta.wins_together;
        self.times_opposed += delta.times_opposed;
        self.low_wins_vs_high += delta.low_wins_vs_high;
        self.high_wins_vs_low += delta.high_wins_vs_low;
    }
}

/// Increments for one pair produced by one match
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PairingDelta {
    pub key: PairKey,
    pub times_partnered: u32,
    pub wins_together: u32,
    pub times_opposed: u32,
    pub low_wins_vs_high: u32,
    pub high_wins_vs_low: u32,
}

impl PairingDelta {
    fn teammates(key: PairKey, won: bool) -> Self {
        Self {
            key,
            times_partnered: 1,
            wins_together: u32::from(won),
            times_opposed: 0,
            low_wins_vs_high: 0,
            high_wins_vs_low: 0,
        }
    }

    /// `low_won` is `None` for a draw
    fn opponents(key: PairKey, low_won: Option<bool>) -> Self {
        Self {
            key,
            times_partnered: 0,
            wins_together: 0,
            times_opposed: 1,
            low_wins_vs_high: u32::from(low_won == Some(true)),
            high_wins_vs_low: u32::from(low_won == Some(false)),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct PairingHistoryTracker {
    config: PairingConfig,
}

impl PairingHistoryTracker {
    pub fn new(config: PairingConfig) -> Self {
        Self { config }
    }

    /// Relationship deltas for one completed match
    pub fn record_pairing_outcome(
        &self,
        team1: &[PlayerId],
        team2: &[PlayerId],
        winning_team: Option<TeamSide>,
    ) -> Result<Vec<PairingDelta>> {
        let mut seen = HashSet::new();
        for id in team1.iter().chain(team2.iter()) {
            if !seen.insert(id.as_str()) {
                return Err(RotationError::InvalidTeamComposition {
                    reason: format!("Player {} appears more than once in the match", id),
                }
                .into());
            }
        }

        if winning_team.is_none() && !self.config.record_draws {
            debug!("Draw not recorded in pairing history");
            return Ok(Vec::new());
        }

        let mut deltas = Vec::new();

        for (team, side) in [(team1, TeamSide::Team1), (team2, TeamSide::Team2)] {
            let won = winning_team == Some(side);
            for (i, a) in team.iter().enumerate() {
                for b in &team[i + 1..] {
                    deltas.push(PairingDelta::teammates(order_pair(a, b), won));
                }
            }
        }

        for a in team1 {
            for b in team2 {
                let key = order_pair(a, b);
                // The low side won iff the low id sits on the winning team
                let low_won = winning_team.map(|winner| {
                    let low_side = if key.is_low(a) {
                        TeamSide::Team1
                    } else {
                        TeamSide::Team2
                    };
                    low_side == winner
                });
                deltas.push(PairingDelta::opponents(key, low_won));
            }
        }

        Ok(deltas)
    }
}

/// All pairing records for one group
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PairingLedger {
    pub group_id: GroupId,
    records: BTreeMap<PairKey, PairingRecord>,
}

impl PairingLedger {
    pub fn new(group_id: impl Into<GroupId>) -> Self {
        Self {
            group_id: group_id.into(),
            records: BTreeMap::new(),
        }
    }

    pub fn apply(&mut self, deltas: &[PairingDelta]) {
        for delta in deltas {
            let group_id = &self.group_id;
            self.records
                .entry(delta.key.clone())
                .or_insert_with(|| PairingRecord::new(group_id.clone(), delta.key.clone()))
                .apply(delta);
        }
    }

    /// Record for `a` and `b` in either order
    pub fn get(&self, a: &str, b: &str) -> Option<&PairingRecord> {
        self.records.get(&order_pair(a, b))
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> impl Iterator<Item = &PairingRecord> {
        self.records.values()
    }

    /// Records involving `player_id`, in key order
    pub fn records_for<'a>(
        &'a self,
        player_id: &'a str,
    ) -> impl Iterator<Item = &'a PairingRecord> + 'a {
        self.records
            .values()
            .filter(move |r| r.player_low == player_id || r.player_high == player_id)
    }
}
