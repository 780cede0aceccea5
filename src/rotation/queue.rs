//! Rotation queue ordering
//!
//! Players who have played least go first. Among equals, whoever has the
//! shorter current streak goes first, then the stronger player, then the
//! lower id so the order is total.

use crate::skill::SkillBlender;
use crate::types::{Player, PlayerId};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// One row of the queue view
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueueEntry {
    /// 1-based position, 1 plays next
    pub position: usize,
    pub player_id: PlayerId,
    pub display_name: String,
    pub play_count: u32,
    pub consecutive_games: u32,
    pub composite_skill: f64,
}

/// Queue comparison given precomputed composite skills
pub fn queue_cmp(a: (&Player, f64), b: (&Player, f64)) -> Ordering {
    let (pa, skill_a) = a;
    let (pb, skill_b) = b;
    pa.play_count
        .cmp(&pb.play_count)
        .then(pa.consecutive_games.cmp(&pb.consecutive_games))
        .then(skill_b.total_cmp(&skill_a))
        .then_with(|| pa.id.cmp(&pb.id))
}

/// Players in queue order paired with their composite skill
pub fn order_players<'a>(players: &'a [Player], blender: &SkillBlender) -> Vec<(&'a Player, f64)> {
    let mut ordered: Vec<(&Player, f64)> = players
        .iter()
        .map(|p| (p, blender.composite_skill(p)))
        .collect();
    ordered.sort_by(|a, b| queue_cmp(*a, *b));
    ordered
}

/// Queue view of the roster
pub fn build_queue(players: &[Player], blender: &SkillBlender) -> Vec<QueueEntry> {
    order_players(players, blender)
        .into_iter()
        .enumerate()
        .map(|(i, (player, composite_skill))| QueueEntry {
            position: i + 1,
            player_id: player.id.clone(),
            display_name: player.display_name.clone(),
            play_count: player.play_count,
            consecutive_games: player.consecutive_games,
            composite_skill,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RatingConfig;

    fn player(id: &str, baseline: i32, play_count: u32, consecutive: u32) -> Player {
        let mut player = Player::new(id, baseline, &RatingConfig::default());
        player.play_count = play_count;
        player.consecutive_games = consecutive;
        player
    }

    fn ids(queue: &[QueueEntry]) -> Vec<&str> {
        queue.iter().map(|e| e.player_id.as_str()).collect()
    }

    #[test]
    fn test_fewest_plays_first() {
        let blender = SkillBlender::default();
        let players = vec![
            player("a", 50, 3, 0),
            player("b", 50, 1, 0),
            player("c", 50, 2, 0),
        ];

        let queue = build_queue(&players, &blender);
        assert_eq!(ids(&queue), vec!["b", "c", "a"]);
        assert_eq!(queue[0].position, 1);
        assert_eq!(queue[2].position, 3);
    }

    #[test]
    fn test_rested_players_before_streaking_players() {
        let blender = SkillBlender::default();
        let players = vec![player("a", 90, 2, 2), player("b", 10, 2, 0)];

        assert_eq!(ids(&build_queue(&players, &blender)), vec!["b", "a"]);
    }

    #[test]
    fn test_stronger_player_surfaces_first() {
        let blender = SkillBlender::default();
        let players = vec![player("weak", 20, 1, 1), player("strong", 80, 1, 1)];

        assert_eq!(ids(&build_queue(&players, &blender)), vec!["strong", "weak"]);
    }

    #[test]
    fn test_identical_players_ordered_by_id() {
        let blender = SkillBlender::default();
        let players = vec![player("c", 50, 0, 0), player("a", 50, 0, 0), player("b", 50, 0, 0)];

        let forward = build_queue(&players, &blender);
        let mut reversed = players.clone();
        reversed.reverse();
        let backward = build_queue(&reversed, &blender);

        assert_eq!(ids(&forward), vec!["a", "b", "c"]);
        assert_eq!(ids(&forward), ids(&backward));
    }
}
