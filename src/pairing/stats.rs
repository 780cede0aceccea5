//! Reporting statistics derived from pairing records
//!
//! Nothing here is persisted. Wins and losses against an opponent are read
//! from the two directional counters; a player's losses against someone are
//! that opponent's wins, never a subtraction from meetings (draws exist).

use crate::pairing::tracker::PairingRecord;
use crate::types::PlayerId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartnerSummary {
    pub partner_id: PlayerId,
    pub times_partnered: u32,
    pub wins_together: u32,
    pub win_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpponentSummary {
    pub opponent_id: PlayerId,
    pub times_opposed: u32,
    pub wins_against: u32,
    pub losses_against: u32,
}

/// `wins_together / times_partnered`, `None` if they never partnered
pub fn partner_win_rate(record: &PairingRecord) -> Option<f64> {
    if record.times_partnered == 0 {
        return None;
    }
    Some(record.wins_together as f64 / record.times_partnered as f64)
}

/// Wins `player_id` has recorded against the other member of the pair
pub fn wins_against(record: &PairingRecord, player_id: &str) -> u32 {
    if record.player_low == player_id {
        record.low_wins_vs_high
    } else if record.player_high == player_id {
        record.high_wins_vs_low
    } else {
        0
    }
}

/// Losses `player_id` has recorded against the other member of the pair
pub fn losses_against(record: &PairingRecord, player_id: &str) -> u32 {
    if record.player_low == player_id {
        record.high_wins_vs_low
    } else if record.player_high == player_id {
        record.low_wins_vs_high
    } else {
        0
    }
}

/// Everyone `player_id` has partnered with at least once
pub fn partners<'a>(
    player_id: &str,
    records: impl IntoIterator<Item = &'a PairingRecord>,
) -> Vec<PartnerSummary> {
    records
        .into_iter()
        .filter(|r| r.times_partnered > 0)
        .filter_map(|r| {
            let partner_id = r.key().other(player_id)?.clone();
            Some(PartnerSummary {
                partner_id,
                times_partnered: r.times_partnered,
                wins_together: r.wins_together,
                win_rate: partner_win_rate(r).unwrap_or(0.0),
            })
        })
        .collect()
}

/// Everyone `player_id` has faced at least once
pub fn opponents<'a>(
    player_id: &str,
    records: impl IntoIterator<Item = &'a PairingRecord>,
) -> Vec<OpponentSummary> {
    records
        .into_iter()
        .filter(|r| r.times_opposed > 0)
        .filter_map(|r| {
            let opponent_id = r.key().other(player_id)?.clone();
            Some(OpponentSummary {
                opponent_id,
                times_opposed: r.times_opposed,
                wins_against: wins_against(r, player_id),
                losses_against: losses_against(r, player_id),
            })
        })
        .collect()
}

/// Highest win rate together, then most games together; first wins ties
pub fn best_partner<'a>(
    player_id: &str,
    records: impl IntoIterator<Item = &'a PairingRecord>,
) -> Option<PartnerSummary> {
    let mut best: Option<PartnerSummary> = None;
    for candidate in partners(player_id, records) {
        let better = match &best {
            None => true,
            Some(current) => {
                candidate.win_rate > current.win_rate
                    || (candidate.win_rate == current.win_rate
                        && candidate.times_partnered > current.times_partnered)
            }
        };
        if better {
            best = Some(candidate);
        }
    }
    best
}

/// Most losses against, then most meetings; `None` if never beaten
pub fn toughest_opponent<'a>(
    player_id: &str,
    records: impl IntoIterator<Item = &'a PairingRecord>,
) -> Option<OpponentSummary> {
    let mut toughest: Option<OpponentSummary> = None;
    for candidate in opponents(player_id, records) {
        if candidate.losses_against == 0 {
            continue;
        }
        let tougher = match &toughest {
            None => true,
            Some(current) => {
                candidate.losses_against > current.losses_against
                    || (candidate.losses_against == current.losses_against
                        && candidate.times_opposed > current.times_opposed)
            }
        };
        if tougher {
            toughest = Some(candidate);
        }
    }
    toughest
}

/// Distinct partners divided by everyone else on the roster
pub fn rotation_coverage<'a>(
    player_id: &str,
    records: impl IntoIterator<Item = &'a PairingRecord>,
    roster_size: usize,
) -> f64 {
    if roster_size <= 1 {
        return 0.0;
    }
    let distinct = partners(player_id, records).len();
    (distinct as f64 / (roster_size - 1) as f64).min(1.0)
}
