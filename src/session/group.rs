//! In-memory group session
//!
//! `GroupSession` is the calling layer around the pure core: it owns the
//! roster, pairing ledger and match history of one group, applies rotation
//! plans, and commits each match completion as a single unit under the
//! group's write lock.

use crate::balance::TeamBalancer;
use crate::config::AppConfig;
use crate::error::{Result, RotationError};
use crate::metrics::MetricsCollector;
use crate::pairing::stats::{self, OpponentSummary, PartnerSummary};
use crate::pairing::{PairingHistoryTracker, PairingLedger, PairingRecord};
use crate::rating::{EloRatingModel, RatingCalculator};
use crate::rotation::{QueueEntry, RotationPlan, RotationScheduler, RotationUpdate};
use crate::skill::SkillBlender;
use crate::types::{Court, CourtId, GroupId, Match, Player, PlayerId, PlayerProfile, Score};
use crate::utils::{current_timestamp, generate_match_id, outcome_label};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::{debug, info, warn};

/// Statistics about session operations
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionStats {
    pub players_registered: u64,
    pub rounds_generated: u64,
    pub courts_filled: u64,
    pub matches_completed: u64,
    pub completions_rejected: u64,
}

/// One row of the leaderboard
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub rank: usize,
    pub player_id: PlayerId,
    pub display_name: String,
    pub rating: f64,
    pub games_played: u32,
    pub win_count: u32,
    pub win_rate: f64,
}

/// Reporting view of one player's history in the group
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerStatistics {
    pub player_id: PlayerId,
    pub rating: f64,
    pub games_played: u32,
    pub win_count: u32,
    pub win_rate: f64,
    pub best_partner: Option<PartnerSummary>,
    pub toughest_opponent: Option<OpponentSummary>,
    pub rotation_coverage: f64,
    pub partners: Vec<PartnerSummary>,
    pub opponents: Vec<OpponentSummary>,
}

#[derive(Debug, Clone)]
struct GroupState {
    players: BTreeMap<PlayerId, Player>,
    pairings: PairingLedger,
    matches: Vec<Match>,
    courts: Vec<Court>,
}

pub struct GroupSession {
    group_id: GroupId,
    config: AppConfig,
    rating_calculator: Arc<dyn RatingCalculator>,
    scheduler: RotationScheduler,
    tracker: PairingHistoryTracker,
    state: RwLock<GroupState>,
    stats: RwLock<SessionStats>,
    metrics_collector: Arc<MetricsCollector>,
}

impl GroupSession {
    /// Create a new session with its own metrics collector
    pub fn new(group_id: impl Into<GroupId>, config: AppConfig) -> Result<Self> {
        let metrics_collector = Arc::new(MetricsCollector::new()?);
        Self::with_metrics(group_id, config, metrics_collector)
    }

    /// Create a new session reporting into an existing metrics collector
    pub fn with_metrics(
        group_id: impl Into<GroupId>,
        config: AppConfig,
        metrics_collector: Arc<MetricsCollector>,
    ) -> Result<Self> {
        crate::config::validate_config(&config)?;

        let group_id = group_id.into();
        let rating_calculator = Arc::new(EloRatingModel::new(config.rating.clone())?);
        let blender = SkillBlender::new(config.blend.clone(), config.rating.clone());
        let scheduler = RotationScheduler::new(TeamBalancer::new(blender));
        let tracker = PairingHistoryTracker::new(config.pairing.clone());

        info!("Created session for group {}", group_id);

        Ok(Self {
            state: RwLock::new(GroupState {
                players: BTreeMap::new(),
                pairings: PairingLedger::new(group_id.clone()),
                matches: Vec::new(),
                courts: Vec::new(),
            }),
            group_id,
            config,
            rating_calculator,
            scheduler,
            tracker,
            stats: RwLock::new(SessionStats::default()),
            metrics_collector,
        })
    }

    pub fn group_id(&self) -> &GroupId {
        &self.group_id
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn metrics(&self) -> Arc<MetricsCollector> {
        self.metrics_collector.clone()
    }

    fn read_state(&self) -> Result<RwLockReadGuard<'_, GroupState>> {
        self.state.read().map_err(|_| {
            RotationError::InternalError {
                message: "Failed to acquire group state read lock".to_string(),
            }
            .into()
        })
    }

    fn write_state(&self) -> Result<RwLockWriteGuard<'_, GroupState>> {
        self.state.write().map_err(|_| {
            RotationError::InternalError {
                message: "Failed to acquire group state write lock".to_string(),
            }
            .into()
        })
    }

    fn update_stats(&self, f: impl FnOnce(&mut SessionStats)) {
        let mut stats = self.stats.write().unwrap_or_else(|poisoned| {
            warn!("Session stats lock poisoned, recovering counters");
            poisoned.into_inner()
        });
        f(&mut stats);
    }

    /// Register a player, filling in defaults for anything missing
    pub fn add_player(&self, profile: PlayerProfile) -> Result<Player> {
        let mut state = self.write_state()?;
        if state.players.contains_key(&profile.id) {
            return Err(RotationError::DuplicatePlayer {
                player_id: profile.id,
            }
            .into());
        }

        let player = Player::from_profile(profile, &self.config.rating);
        info!(
            "Registered player {} in group {} (baseline {}, rating {:.1})",
            player.id, self.group_id, player.baseline_skill, player.rating
        );
        state.players.insert(player.id.clone(), player.clone());
        drop(state);

        self.update_stats(|s| s.players_registered += 1);
        Ok(player)
    }

    fn with_player_mut<T>(&self, player_id: &str, f: impl FnOnce(&mut Player) -> T) -> Result<T> {
        let mut state = self.write_state()?;
        let player =
            state
                .players
                .get_mut(player_id)
                .ok_or_else(|| RotationError::UnknownPlayer {
                    player_id: player_id.to_string(),
                })?;
        Ok(f(player))
    }

    /// Soft-deactivate a player; their history is kept
    pub fn deactivate_player(&self, player_id: &str) -> Result<()> {
        self.with_player_mut(player_id, |p| p.active = false)?;
        info!("Deactivated player {} in group {}", player_id, self.group_id);
        Ok(())
    }

    /// Mark a player as taking a break (or returning from one)
    pub fn set_resting(&self, player_id: &str, resting: bool) -> Result<()> {
        self.with_player_mut(player_id, |p| p.is_resting = resting)?;
        debug!("Player {} resting = {}", player_id, resting);
        Ok(())
    }

    pub fn player(&self, player_id: &str) -> Result<Option<Player>> {
        Ok(self.read_state()?.players.get(player_id).cloned())
    }

    pub fn players(&self) -> Result<Vec<Player>> {
        Ok(self.read_state()?.players.values().cloned().collect())
    }

    /// Queue view over active players
    pub fn queue(&self) -> Result<Vec<QueueEntry>> {
        let state = self.read_state()?;
        let active: Vec<Player> = state
            .players
            .values()
            .filter(|p| p.active)
            .cloned()
            .collect();
        Ok(self.scheduler.build_queue(&active))
    }

    /// Courts currently in play
    pub fn courts(&self) -> Result<Vec<Court>> {
        Ok(self.read_state()?.courts.clone())
    }

    /// Fill free courts for the next round and apply the resulting plan.
    ///
    /// `num_courts` defaults to the configured court count minus courts still
    /// in play.
    pub fn start_round(&self, num_courts: Option<usize>) -> Result<RotationPlan> {
        let timer = self.metrics_collector.start_timer();
        let mut state = self.write_state()?;

        let free_courts = num_courts.unwrap_or_else(|| {
            self.config
                .rotation
                .num_courts
                .saturating_sub(state.courts.len())
        });

        let roster: Vec<Player> = state.players.values().cloned().collect();
        let mut plan = self.scheduler.generate_matchups(
            &roster,
            free_courts,
            self.config.rotation.team_size,
            self.config.rotation.rest_threshold,
        )?;

        // Number new courts after the ones still in play
        let in_use: HashSet<_> = state.courts.iter().map(|c| c.court_id).collect();
        let mut next_id: CourtId = 1;
        let mut renumbered = BTreeMap::new();
        for court in plan.courts.iter_mut() {
            while in_use.contains(&next_id) {
                next_id += 1;
            }
            renumbered.insert(court.court_id, next_id);
            court.court_id = next_id;
            next_id += 1;
        }
        for update in plan.updates.values_mut() {
            if let RotationUpdate::Drawn { court_id, .. } = update {
                if let Some(new_id) = renumbered.get(&*court_id) {
                    *court_id = *new_id;
                }
            }
        }
        if let Some(shortfall) = plan.shortfall.as_mut() {
            while in_use.contains(&next_id) {
                next_id += 1;
            }
            shortfall.court_id = next_id;
        }

        for (player_id, update) in &plan.updates {
            if let Some(player) = state.players.get_mut(player_id) {
                update.apply_to(player);
            }
        }
        state.courts.extend(plan.courts.iter().map(|c| c.to_court()));

        let waiting = state
            .players
            .values()
            .filter(|p| p.active && !p.is_playing && !p.is_resting)
            .count();
        drop(state);

        info!(
            "Group {}: started {} court(s), {} player(s) waiting",
            self.group_id,
            plan.courts.len(),
            waiting
        );

        self.update_stats(|s| {
            s.rounds_generated += 1;
            s.courts_filled += plan.courts.len() as u64;
        });
        self.metrics_collector.record_round(&plan, waiting, timer.stop());

        Ok(plan)
    }

    fn reject(&self, reason: &str, error: RotationError) -> anyhow::Error {
        warn!("Group {}: match completion rejected: {}", self.group_id, error);
        self.update_stats(|s| s.completions_rejected += 1);
        self.metrics_collector.record_completion_rejected(reason);
        error.into()
    }

    /// Commit a finished match.
    ///
    /// Ratings, counters, pairing records and the match record are all
    /// computed before anything is written; any unknown or repeated player
    /// rejects the whole call with no state changed.
    pub fn complete_match(
        &self,
        team1: &[PlayerId],
        team2: &[PlayerId],
        score: Score,
    ) -> Result<Match> {
        let timer = self.metrics_collector.start_timer();

        if team1.is_empty() || team2.is_empty() || team1.len() != team2.len() || team1.len() > 2 {
            return Err(self.reject(
                "invalid_match",
                RotationError::InvalidMatch {
                    reason: format!(
                        "Teams must both have 1 or 2 players, got {} and {}",
                        team1.len(),
                        team2.len()
                    ),
                },
            ));
        }

        let mut state = self.write_state()?;

        let resolve = |ids: &[PlayerId]| -> std::result::Result<Vec<Player>, RotationError> {
            ids.iter()
                .map(|id| {
                    state
                        .players
                        .get(id)
                        .cloned()
                        .ok_or_else(|| RotationError::UnknownPlayer {
                            player_id: id.clone(),
                        })
                })
                .collect()
        };
        let players1 = match resolve(team1) {
            Ok(players) => players,
            Err(e) => return Err(self.reject("unknown_player", e)),
        };
        let players2 = match resolve(team2) {
            Ok(players) => players,
            Err(e) => return Err(self.reject("unknown_player", e)),
        };

        let winning_team = score.winning_team();
        let pairing_deltas = match self
            .tracker
            .record_pairing_outcome(team1, team2, winning_team)
        {
            Ok(deltas) => deltas,
            Err(e) => {
                let error = e.downcast::<RotationError>().unwrap_or_else(|e| {
                    RotationError::InternalError {
                        message: e.to_string(),
                    }
                });
                return Err(self.reject("invalid_team", error));
            }
        };
        let rating_deltas =
            self.rating_calculator
                .apply_match_result(&players1, &players2, winning_team);
        let quality = self.rating_calculator.match_quality(&players1, &players2);

        // Everything validated; commit
        let now = current_timestamp();
        for player_id in team1.iter().chain(team2.iter()) {
            if let Some(player) = state.players.get_mut(player_id) {
                if let Some(delta) = rating_deltas.get(player_id) {
                    delta.apply_to(player);
                }
                player.is_playing = false;
                player.last_finish_time = Some(now);
            }
        }
        state.pairings.apply(&pairing_deltas);

        // A court touched by this result is finished; release everyone on it
        let participants: HashSet<&PlayerId> = team1.iter().chain(team2.iter()).collect();
        let (finished, in_play): (Vec<Court>, Vec<Court>) = std::mem::take(&mut state.courts)
            .into_iter()
            .partition(|court| court.player_ids().any(|id| participants.contains(&id)));
        state.courts = in_play;
        for court in &finished {
            for player_id in court.player_ids() {
                if let Some(player) = state.players.get_mut(player_id) {
                    if player.is_playing {
                        debug!("Released player {} from court {}", player_id, court.court_id);
                        player.is_playing = false;
                    }
                }
            }
        }

        let record = Match {
            id: generate_match_id(),
            group_id: self.group_id.clone(),
            team1: team1.to_vec(),
            team2: team2.to_vec(),
            score,
            winning_team,
            completed_at: now,
        };
        state.matches.push(record.clone());
        drop(state);

        info!(
            "Group {}: match {} completed {}-{} ({}), {} rating updates, {} pairing updates",
            self.group_id,
            record.id,
            score.team1,
            score.team2,
            outcome_label(winning_team),
            rating_deltas.len(),
            pairing_deltas.len()
        );

        self.update_stats(|s| s.matches_completed += 1);
        self.metrics_collector.record_match_completed(
            winning_team,
            quality,
            rating_deltas.values().map(|d| d.new_rating),
            timer.stop(),
        );

        Ok(record)
    }

    /// Active players by rating, then win rate, then id
    pub fn leaderboard(&self) -> Result<Vec<LeaderboardEntry>> {
        let state = self.read_state()?;
        let mut players: Vec<&Player> = state.players.values().filter(|p| p.active).collect();
        players.sort_by(|a, b| {
            b.rating
                .total_cmp(&a.rating)
                .then(b.win_rate().total_cmp(&a.win_rate()))
                .then_with(|| a.id.cmp(&b.id))
        });

        Ok(players
            .into_iter()
            .enumerate()
            .map(|(i, p)| LeaderboardEntry {
                rank: i + 1,
                player_id: p.id.clone(),
                display_name: p.display_name.clone(),
                rating: p.rating,
                games_played: p.games_played,
                win_count: p.win_count,
                win_rate: p.win_rate(),
            })
            .collect())
    }

    /// Partner and opponent statistics for one player
    pub fn player_statistics(&self, player_id: &str) -> Result<PlayerStatistics> {
        let state = self.read_state()?;
        let player = state
            .players
            .get(player_id)
            .ok_or_else(|| RotationError::UnknownPlayer {
                player_id: player_id.to_string(),
            })?;

        let records: Vec<&PairingRecord> = state.pairings.records_for(player_id).collect();
        let roster_size = state.players.len();

        Ok(PlayerStatistics {
            player_id: player.id.clone(),
            rating: player.rating,
            games_played: player.games_played,
            win_count: player.win_count,
            win_rate: player.win_rate(),
            best_partner: stats::best_partner(player_id, records.iter().copied()),
            toughest_opponent: stats::toughest_opponent(player_id, records.iter().copied()),
            rotation_coverage: stats::rotation_coverage(
                player_id,
                records.iter().copied(),
                roster_size,
            ),
            partners: stats::partners(player_id, records.iter().copied()),
            opponents: stats::opponents(player_id, records.iter().copied()),
        })
    }

    pub fn pairing_records(&self) -> Result<Vec<PairingRecord>> {
        Ok(self.read_state()?.pairings.records().cloned().collect())
    }

    pub fn pairing_record(&self, a: &str, b: &str) -> Result<Option<PairingRecord>> {
        Ok(self.read_state()?.pairings.get(a, b).cloned())
    }

    pub fn matches(&self) -> Result<Vec<Match>> {
        Ok(self.read_state()?.matches.clone())
    }

    pub fn stats(&self) -> SessionStats {
        let stats = self.stats.read().unwrap_or_else(|poisoned| {
            warn!("Session stats lock poisoned, recovering counters");
            poisoned.into_inner()
        });
        stats.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(names: &[&str]) -> Vec<PlayerId> {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn session_with(names: &[&str]) -> GroupSession {
        let session = GroupSession::new("club", AppConfig::default()).unwrap();
        for name in names {
            session.add_player(PlayerProfile::new(*name)).unwrap();
        }
        session
    }

    fn rejection(err: anyhow::Error) -> RotationError {
        err.downcast::<RotationError>().unwrap()
    }

    #[test]
    fn test_add_player_rejects_duplicates() {
        let session = session_with(&["a"]);
        let err = session.add_player(PlayerProfile::new("a")).unwrap_err();
        assert_eq!(
            rejection(err),
            RotationError::DuplicatePlayer {
                player_id: "a".to_string()
            }
        );
        assert_eq!(session.stats().players_registered, 1);
    }

    #[test]
    fn test_start_round_marks_players_and_courts() {
        let session = session_with(&["a", "b", "c", "d", "e"]);
        let plan = session.start_round(None).unwrap();

        assert_eq!(plan.courts.len(), 1);
        assert!(plan.shortfall.is_some());
        assert_eq!(session.courts().unwrap().len(), 1);

        let playing = session
            .players()
            .unwrap()
            .into_iter()
            .filter(|p| p.is_playing)
            .count();
        assert_eq!(playing, 4);
        assert_eq!(session.stats().rounds_generated, 1);
        assert_eq!(session.stats().courts_filled, 1);
    }

    #[test]
    fn test_complete_match_commits_everything() {
        let session = session_with(&["a", "b", "c", "d"]);
        session.start_round(None).unwrap();

        let record = session
            .complete_match(&ids(&["a", "b"]), &ids(&["c", "d"]), Score::new(21, 15))
            .unwrap();
        assert_eq!(record.winning_team, Some(crate::types::TeamSide::Team1));
        assert_eq!(record.group_id, "club");

        let a = session.player("a").unwrap().unwrap();
        let c = session.player("c").unwrap().unwrap();
        assert!((a.rating - 1516.0).abs() < 1e-9);
        assert!((c.rating - 1484.0).abs() < 1e-9);
        assert_eq!(a.games_played, 1);
        assert_eq!(a.win_count, 1);
        assert_eq!(c.win_count, 0);
        assert!(!a.is_playing);
        assert!(a.last_finish_time.is_some());

        assert!(session.courts().unwrap().is_empty());
        assert_eq!(session.matches().unwrap().len(), 1);
        assert_eq!(session.pairing_records().unwrap().len(), 6);
        assert_eq!(session.stats().matches_completed, 1);
    }

    #[test]
    fn test_unknown_player_leaves_state_untouched() {
        let session = session_with(&["a", "b", "c"]);

        let err = session
            .complete_match(&ids(&["a", "b"]), &ids(&["c", "ghost"]), Score::new(21, 3))
            .unwrap_err();
        assert_eq!(
            rejection(err),
            RotationError::UnknownPlayer {
                player_id: "ghost".to_string()
            }
        );

        let a = session.player("a").unwrap().unwrap();
        assert_eq!(a.rating, 1500.0);
        assert_eq!(a.games_played, 0);
        assert!(session.pairing_records().unwrap().is_empty());
        assert!(session.matches().unwrap().is_empty());
        assert_eq!(session.stats().completions_rejected, 1);
    }

    #[test]
    fn test_repeated_player_rejected_without_changes() {
        let session = session_with(&["a", "b", "c"]);
        let err = session
            .complete_match(&ids(&["a", "b"]), &ids(&["b", "c"]), Score::new(21, 3))
            .unwrap_err();
        assert!(matches!(
            rejection(err),
            RotationError::InvalidTeamComposition { .. }
        ));
        assert_eq!(session.player("b").unwrap().unwrap().games_played, 0);
    }

    #[test]
    fn test_uneven_teams_rejected() {
        let session = session_with(&["a", "b", "c"]);
        let err = session
            .complete_match(&ids(&["a", "b"]), &ids(&["c"]), Score::new(21, 3))
            .unwrap_err();
        assert!(matches!(rejection(err), RotationError::InvalidMatch { .. }));

        let err = session
            .complete_match(&[], &[], Score::new(0, 0))
            .unwrap_err();
        assert!(matches!(rejection(err), RotationError::InvalidMatch { .. }));
    }

    #[test]
    fn test_draw_counts_game_without_rating_change() {
        let session = session_with(&["a", "b"]);
        session
            .complete_match(&ids(&["a"]), &ids(&["b"]), Score::new(11, 11))
            .unwrap();

        let a = session.player("a").unwrap().unwrap();
        assert_eq!(a.rating, 1500.0);
        assert_eq!(a.games_played, 1);
        assert_eq!(a.win_count, 0);
        assert_eq!(session.pairing_record("b", "a").unwrap().unwrap().times_opposed, 1);
    }

    #[test]
    fn test_freed_court_is_refilled_with_lowest_id() {
        let session = session_with(&["a", "b", "c", "d", "e", "f", "g", "h"]);
        let first = session.start_round(None).unwrap();
        assert_eq!(first.courts.len(), 2);

        let court1 = first.courts[0].clone();
        session
            .complete_match(&court1.team1, &court1.team2, Score::new(21, 19))
            .unwrap();
        assert_eq!(session.courts().unwrap().len(), 1);

        let second = session.start_round(None).unwrap();
        assert_eq!(second.courts.len(), 1);
        assert_eq!(second.courts[0].court_id, 1);
        assert!(second
            .courts[0]
            .player_ids()
            .all(|id| court1.player_ids().any(|p| p == id)));
        assert_eq!(session.courts().unwrap().len(), 2);
    }

    #[test]
    fn test_poisoned_stats_lock_keeps_counting() {
        let session = session_with(&["a"]);
        std::thread::scope(|s| {
            let handle = s.spawn(|| {
                let _guard = session.stats.write().unwrap();
                panic!("stats writer failed");
            });
            assert!(handle.join().is_err());
        });
        assert!(session.stats.is_poisoned());

        session.add_player(PlayerProfile::new("b")).unwrap();
        assert_eq!(session.stats().players_registered, 2);
    }

    #[test]
    fn test_partial_result_releases_whole_court() {
        let session = session_with(&["a", "b", "c", "d", "e", "f"]);
        let plan = session.start_round(Some(1)).unwrap();
        let court = plan.courts[0].clone();

        session
            .complete_match(
                &[court.team1[0].clone()],
                &[court.team2[0].clone()],
                Score::new(11, 7),
            )
            .unwrap();

        assert!(session.courts().unwrap().is_empty());
        assert!(session.players().unwrap().iter().all(|p| !p.is_playing));
    }

    #[test]
    fn test_leaderboard_and_statistics() {
        let session = session_with(&["a", "b", "c", "d"]);
        session
            .complete_match(&ids(&["a", "b"]), &ids(&["c", "d"]), Score::new(21, 10))
            .unwrap();
        session.deactivate_player("d").unwrap();

        let board = session.leaderboard().unwrap();
        assert_eq!(board.len(), 3);
        assert_eq!(board[0].player_id, "a");
        assert_eq!(board[0].rank, 1);
        assert_eq!(board[1].player_id, "b");
        assert_eq!(board[2].player_id, "c");

        let stats = session.player_statistics("c").unwrap();
        assert_eq!(stats.partners.len(), 1);
        assert_eq!(stats.opponents.len(), 2);
        assert_eq!(stats.best_partner.unwrap().partner_id, "d");
        assert_eq!(stats.toughest_opponent.unwrap().opponent_id, "a");
        assert!((stats.rotation_coverage - 1.0 / 3.0).abs() < 1e-9);

        assert!(session.player_statistics("zz").is_err());
    }

    #[test]
    fn test_inactive_and_resting_players_leave_queue() {
        let session = session_with(&["a", "b", "c"]);
        session.deactivate_player("a").unwrap();
        session.set_resting("b", true).unwrap();

        let queue = session.queue().unwrap();
        assert_eq!(queue.len(), 2);
        assert!(queue.iter().all(|e| e.player_id != "a"));
        assert!(session.set_resting("ghost", true).is_err());
    }
}
