//! Round generation across courts
//!
//! The scheduler never touches the roster it is given. It returns a
//! [`RotationPlan`] holding the court assignments and per-player updates, which
//! the caller applies in one step.

use crate::balance::{TeamBalancer, TeamSplit};
use crate::error::{Result, RotationError};
use crate::rotation::queue::{build_queue, order_players, QueueEntry};
use crate::skill::SkillBlender;
use crate::types::{Court, CourtId, Player, PlayerId};
use crate::utils::current_timestamp;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use tracing::{debug, info, warn};

/// Teams drawn for one court
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CourtAssignment {
    pub court_id: CourtId,
    pub team1: Vec<PlayerId>,
    pub team2: Vec<PlayerId>,
    pub team1_skill: f64,
    pub team2_skill: f64,
}

impl CourtAssignment {
    fn from_split(court_id: CourtId, split: TeamSplit) -> Self {
        Self {
            court_id,
            team1: split.team1,
            team2: split.team2,
            team1_skill: split.team1_skill,
            team2_skill: split.team2_skill,
        }
    }

    pub fn imbalance(&self) -> f64 {
        (self.team1_skill - self.team2_skill).abs()
    }

    pub fn to_court(&self) -> Court {
        Court::new(self.court_id, self.team1.clone(), self.team2.clone())
    }

    pub fn player_ids(&self) -> impl Iterator<Item = &PlayerId> {
        self.team1.iter().chain(self.team2.iter())
    }
}

/// State change for one player produced by a round
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RotationUpdate {
    /// Drawn onto a court
    Drawn {
        court_id: CourtId,
        play_count: u32,
        consecutive_games: u32,
    },
    /// Sat out with a live streak; the streak is broken
    StreakReset {
        rest_counter: u32,
        rest_started_at: DateTime<Utc>,
    },
}

impl RotationUpdate {
    pub fn apply_to(&self, player: &mut Player) {
        match self {
            RotationUpdate::Drawn {
                play_count,
                consecutive_games,
                ..
            } => {
                player.is_playing = true;
                player.play_count = *play_count;
                player.consecutive_games = *consecutive_games;
            }
            RotationUpdate::StreakReset {
                rest_counter,
                rest_started_at,
            } => {
                player.consecutive_games = 0;
                player.rest_counter = *rest_counter;
                player.rest_started_at = Some(*rest_started_at);
            }
        }
    }
}

/// Why a round filled fewer courts than requested
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shortfall {
    /// First court that could not be filled
    pub court_id: CourtId,
    pub required: usize,
    pub available: usize,
}

impl Shortfall {
    pub fn to_error(&self) -> RotationError {
        RotationError::InsufficientPlayers {
            required: self.required,
            available: self.available,
        }
    }
}

/// Outcome of one generation pass
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RotationPlan {
    pub courts: Vec<CourtAssignment>,
    pub updates: BTreeMap<PlayerId, RotationUpdate>,
    pub shortfall: Option<Shortfall>,
    pub generated_at: DateTime<Utc>,
}

impl RotationPlan {
    /// Apply every update to the matching players in `players`
    pub fn apply_to(&self, players: &mut [Player]) {
        for player in players.iter_mut() {
            if let Some(update) = self.updates.get(&player.id) {
                update.apply_to(player);
            }
        }
    }

    pub fn is_complete(&self) -> bool {
        self.shortfall.is_none()
    }
}

#[derive(Debug, Clone, Default)]
pub struct RotationScheduler {
    balancer: TeamBalancer,
}

impl RotationScheduler {
    pub fn new(balancer: TeamBalancer) -> Self {
        Self { balancer }
    }

    pub fn blender(&self) -> &SkillBlender {
        self.balancer.blender()
    }

    pub fn balancer(&self) -> &TeamBalancer {
        &self.balancer
    }

    /// Queue view of the roster
    pub fn build_queue(&self, players: &[Player]) -> Vec<QueueEntry> {
        build_queue(players, self.blender())
    }

    /// Draw players for up to `num_courts` courts
    pub fn generate_matchups(
        &self,
        players: &[Player],
        num_courts: usize,
        team_size: usize,
        rest_threshold: Option<u32>,
    ) -> Result<RotationPlan> {
        self.generate_matchups_at(
            players,
            num_courts,
            team_size,
            rest_threshold,
            current_timestamp(),
        )
    }

    /// Same as [`generate_matchups`](Self::generate_matchups) with an explicit clock
    pub fn generate_matchups_at(
        &self,
        players: &[Player],
        num_courts: usize,
        team_size: usize,
        rest_threshold: Option<u32>,
        now: DateTime<Utc>,
    ) -> Result<RotationPlan> {
        if team_size == 0 {
            return Err(RotationError::InvalidTeamComposition {
                reason: "Team size must be at least 1".to_string(),
            }
            .into());
        }

        let mut ids = HashSet::new();
        for player in players {
            if !ids.insert(player.id.as_str()) {
                return Err(RotationError::DuplicatePlayer {
                    player_id: player.id.clone(),
                }
                .into());
            }
        }

        let mut plan = RotationPlan {
            courts: Vec::new(),
            updates: BTreeMap::new(),
            shortfall: None,
            generated_at: now,
        };
        if num_courts == 0 {
            return Ok(plan);
        }

        let eligible: Vec<&Player> = order_players(players, self.blender())
            .into_iter()
            .map(|(player, _)| player)
            .filter(|p| p.active && !p.is_playing && !p.is_resting)
            .filter(|p| match rest_threshold {
                Some(threshold) if p.consecutive_games >= threshold => {
                    debug!(
                        "Player {} forced to rest after {} consecutive games",
                        p.id, p.consecutive_games
                    );
                    false
                }
                _ => true,
            })
            .collect();

        let needed = team_size * 2;
        let mut remaining = eligible.as_slice();

        for court_index in 0..num_courts {
            let court_id = (court_index + 1) as CourtId;
            if remaining.len() < needed {
                warn!(
                    "Court {} left empty: {} players required, {} available",
                    court_id,
                    needed,
                    remaining.len()
                );
                plan.shortfall = Some(Shortfall {
                    court_id,
                    required: needed,
                    available: remaining.len(),
                });
                break;
            }

            let (drawn, rest) = remaining.split_at(needed);
            remaining = rest;

            let pool: Vec<Player> = drawn.iter().map(|p| (*p).clone()).collect();
            let split = self.balancer.balance_teams(&pool, team_size)?;

            debug!(
                "Court {}: {:?} vs {:?} (imbalance {:.4})",
                court_id,
                split.team1,
                split.team2,
                split.imbalance()
            );

            for player in drawn {
                plan.updates.insert(
                    player.id.clone(),
                    RotationUpdate::Drawn {
                        court_id,
                        play_count: player.play_count.saturating_add(1),
                        consecutive_games: player.consecutive_games.saturating_add(1),
                    },
                );
            }

            plan.courts.push(CourtAssignment::from_split(court_id, split));
        }

        if !plan.courts.is_empty() {
            for player in players {
                if player.is_playing
                    || player.consecutive_games == 0
                    || plan.updates.contains_key(&player.id)
                {
                    continue;
                }
                plan.updates.insert(
                    player.id.clone(),
                    RotationUpdate::StreakReset {
                        rest_counter: player.rest_counter.saturating_add(1),
                        rest_started_at: now,
                    },
                );
            }
        }

        info!(
            "Generated {} of {} courts from {} eligible players",
            plan.courts.len(),
            num_courts,
            eligible.len()
        );

        Ok(plan)
    }
}
