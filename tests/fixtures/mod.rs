//! Test fixtures and roster builders for integration testing

#![allow(dead_code)]

use court_rotation::config::AppConfig;
use court_rotation::rotation::RotationPlan;
use court_rotation::session::GroupSession;
use court_rotation::types::{PlayerId, PlayerProfile, Score};

/// Players of mixed ability, as a Tuesday-night club might look
pub const CLUB_ROSTER: &[(&str, i32)] = &[
    ("alice", 85),
    ("bruno", 40),
    ("chen", 70),
    ("dana", 55),
    ("eli", 30),
    ("farah", 65),
    ("gus", 50),
    ("hana", 75),
    ("ivan", 45),
    ("jo", 60),
];

pub fn ids(names: &[&str]) -> Vec<PlayerId> {
    names.iter().map(|s| s.to_string()).collect()
}

/// Session with the given players registered at their baselines
pub fn session_with_roster(config: AppConfig, roster: &[(&str, i32)]) -> GroupSession {
    let session = GroupSession::new("club", config).expect("Failed to create session");
    for (id, baseline) in roster {
        session
            .add_player(PlayerProfile::new(*id).with_baseline(*baseline))
            .expect("Failed to register player");
    }
    session
}

/// Session with `n` identical players named `p00`, `p01`, ...
pub fn session_with_equal_players(config: AppConfig, n: usize) -> GroupSession {
    let session = GroupSession::new("club", config).expect("Failed to create session");
    for i in 0..n {
        session
            .add_player(PlayerProfile::new(format!("p{:02}", i)))
            .expect("Failed to register player");
    }
    session
}

/// Finish every court in `plan`, team 1 winning each
pub fn complete_round(session: &GroupSession, plan: &RotationPlan) {
    for court in &plan.courts {
        session
            .complete_match(&court.team1, &court.team2, Score::new(21, 17))
            .expect("Failed to complete match");
    }
}

pub fn doubles_config(num_courts: usize, rest_threshold: Option<u32>) -> AppConfig {
    let mut config = AppConfig::default();
    config.rotation.num_courts = num_courts;
    config.rotation.team_size = 2;
    config.rotation.rest_threshold = rest_threshold;
    config
}

pub fn singles_config(num_courts: usize, rest_threshold: Option<u32>) -> AppConfig {
    let mut config = doubles_config(num_courts, rest_threshold);
    config.rotation.team_size = 1;
    config
}
