//! Team balancing by exhaustive partition search
//!
//! Pools are at most a handful of players, so every distinct split is scored
//! and the smallest composite-skill gap wins. Ties keep the first split found.

use crate::balance::partition::Partitions;
use crate::error::{Result, RotationError};
use crate::skill::SkillBlender;
use crate::types::{Player, PlayerId};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::debug;

/// Two balanced teams drawn from one pool
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamSplit {
    pub team1: Vec<PlayerId>,
    pub team2: Vec<PlayerId>,
    pub team1_skill: f64,
    pub team2_skill: f64,
}

impl TeamSplit {
    /// Absolute composite-skill gap between the teams
    pub fn imbalance(&self) -> f64 {
        (self.team1_skill - self.team2_skill).abs()
    }
}

#[derive(Debug, Clone, Default)]
pub struct TeamBalancer {
    blender: SkillBlender,
}

impl TeamBalancer {
    pub fn new(blender: SkillBlender) -> Self {
        Self { blender }
    }

    pub fn blender(&self) -> &SkillBlender {
        &self.blender
    }

    /// Split exactly `team_size * 2` players into the most even two teams
    pub fn balance_teams(&self, players: &[Player], team_size: usize) -> Result<TeamSplit> {
        if team_size == 0 {
            return Err(RotationError::InvalidTeamComposition {
                reason: "Team size must be at least 1".to_string(),
            }
            .into());
        }

        if players.len() != team_size * 2 {
            return Err(RotationError::InvalidTeamComposition {
                reason: format!(
                    "Expected {} players for team size {}, got {}",
                    team_size * 2,
                    team_size,
                    players.len()
                ),
            }
            .into());
        }

        let mut seen = HashSet::new();
        for player in players {
            if !seen.insert(player.id.as_str()) {
                return Err(RotationError::InvalidTeamComposition {
                    reason: format!("Player {} appears more than once", player.id),
                }
                .into());
            }
        }

        let skills: Vec<f64> = players
            .iter()
            .map(|p| self.blender.composite_skill(p))
            .collect();
        let sum = |indices: &[usize]| indices.iter().map(|&i| skills[i]).sum::<f64>();

        let mut best: Option<(f64, f64, Vec<usize>, Vec<usize>)> = None;
        for partition in Partitions::new(team_size) {
            let team1_skill = sum(&partition.team1);
            let team2_skill = sum(&partition.team2);
            let imbalance = (team1_skill - team2_skill).abs();

            debug!(
                "Partition {:?} vs {:?}: imbalance {:.4}",
                partition.team1, partition.team2, imbalance
            );

            let better = match &best {
                Some((best_t1, best_t2, _, _)) => imbalance < (best_t1 - best_t2).abs(),
                None => true,
            };
            if better {
                best = Some((team1_skill, team2_skill, partition.team1, partition.team2));
            }
        }

        let (team1_skill, team2_skill, team1, team2) =
            best.ok_or_else(|| RotationError::InternalError {
                message: "No partition produced for a non-empty pool".to_string(),
            })?;

        let ids = |indices: Vec<usize>| {
            indices
                .into_iter()
                .map(|i| players[i].id.clone())
                .collect::<Vec<_>>()
        };

        Ok(TeamSplit {
            team1: ids(team1),
            team2: ids(team2),
            team1_skill,
            team2_skill,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RatingConfig;

    fn player(id: &str, baseline: i32) -> Player {
        Player::new(id, baseline, &RatingConfig::default())
    }

    fn downcast(err: anyhow::Error) -> RotationError {
        err.downcast::<RotationError>().unwrap()
    }

    #[test]
    fn test_strongest_pairs_with_weakest() {
        let balancer = TeamBalancer::default();
        let players = vec![
            player("a", 90),
            player("b", 80),
            player("c", 30),
            player("d", 20),
        ];

        let split = balancer.balance_teams(&players, 2).unwrap();
        assert_eq!(split.team1, vec!["a".to_string(), "d".to_string()]);
        assert_eq!(split.team2, vec!["b".to_string(), "c".to_string()]);
    }

    #[test]
    fn test_split_beats_every_other_partition() {
        let balancer = TeamBalancer::default();
        let players = vec![
            player("a", 71),
            player("b", 12),
            player("c", 55),
            player("d", 98),
        ];

        let split = balancer.balance_teams(&players, 2).unwrap();
        let blender = balancer.blender();
        for partition in Partitions::new(2) {
            let t1 = blender.team_skill(partition.team1.iter().map(|&i| &players[i]));
            let t2 = blender.team_skill(partition.team2.iter().map(|&i| &players[i]));
            assert!(split.imbalance() <= (t1 - t2).abs() + 1e-12);
        }
    }

    #[test]
    fn test_teams_are_disjoint_and_complete() {
        let balancer = TeamBalancer::default();
        let players: Vec<_> = (0..4).map(|i| player(&format!("p{}", i), 40 + i)).collect();

        let split = balancer.balance_teams(&players, 2).unwrap();
        assert_eq!(split.team1.len(), 2);
        assert_eq!(split.team2.len(), 2);
        assert!(split.team1.iter().all(|id| !split.team2.contains(id)));
    }

    #[test]
    fn test_ties_keep_first_partition() {
        let balancer = TeamBalancer::default();
        let players: Vec<_> = ["w", "x", "y", "z"].iter().map(|id| player(id, 50)).collect();

        let split = balancer.balance_teams(&players, 2).unwrap();
        assert_eq!(split.team1, vec!["w".to_string(), "x".to_string()]);
        assert_eq!(split.team2, vec!["y".to_string(), "z".to_string()]);
        assert_eq!(split.imbalance(), 0.0);
    }

    #[test]
    fn test_singles() {
        let balancer = TeamBalancer::default();
        let players = vec![player("a", 60), player("b", 40)];

        let split = balancer.balance_teams(&players, 1).unwrap();
        assert_eq!(split.team1, vec!["a".to_string()]);
        assert_eq!(split.team2, vec!["b".to_string()]);
        assert!(split.team1_skill > split.team2_skill);
    }

    #[test]
    fn test_wrong_pool_size_rejected() {
        let balancer = TeamBalancer::default();
        let players = vec![player("a", 60), player("b", 40), player("c", 50)];

        let err = downcast(balancer.balance_teams(&players, 2).unwrap_err());
        assert!(matches!(err, RotationError::InvalidTeamComposition { .. }));

        let err = downcast(balancer.balance_teams(&players[..2], 0).unwrap_err());
        assert!(matches!(err, RotationError::InvalidTeamComposition { .. }));
    }

    #[test]
    fn test_duplicate_player_rejected() {
        let balancer = TeamBalancer::default();
        let players = vec![player("a", 60), player("a", 60)];

        let err = downcast(balancer.balance_teams(&players, 1).unwrap_err());
        assert!(matches!(err, RotationError::InvalidTeamComposition { .. }));
    }
}
