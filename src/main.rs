//! Command line entry point for court-rotation
//!
//! Loads a roster file, runs one operation of the rotation core over it and
//! prints the result as JSON.

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use court_rotation::config::AppConfig;
use court_rotation::session::GroupSession;
use court_rotation::types::{PlayerId, PlayerProfile, Score};
use serde::Deserialize;
use serde_json::json;
use std::path::{Path, PathBuf};
use tracing::{error, info};

/// Court Rotation - fair court rotation and balanced teams for pickup groups
#[derive(Parser)]
#[command(
    name = "court-rotation",
    version,
    about = "Court rotation, team balancing and ratings for pickup racket-sport groups",
    long_about = "Court Rotation orders a group's roster into a fair play queue, draws \
                 balanced teams for each free court, and updates Elo ratings and \
                 partner/opponent history when matches finish."
)]
struct Args {
    /// Configuration file path
    #[arg(
        short,
        long,
        value_name = "FILE",
        help = "Path to configuration file (TOML format)"
    )]
    config: Option<PathBuf>,

    /// Roster file path
    #[arg(
        short,
        long,
        value_name = "FILE",
        help = "Path to roster file (TOML or JSON)"
    )]
    roster: PathBuf,

    /// Log level override
    #[arg(
        short,
        long,
        value_name = "LEVEL",
        help = "Override log level (trace, debug, info, warn, error)"
    )]
    log_level: Option<String>,

    /// Enable debug mode
    #[arg(short, long, help = "Enable debug mode with verbose logging")]
    debug: bool,

    /// Print Prometheus metrics after the command
    #[arg(long, help = "Print collected metrics in Prometheus text format")]
    metrics: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Show the play queue
    Queue,

    /// Draw players and teams for the next round
    Schedule {
        /// Number of free courts
        #[arg(long)]
        courts: Option<usize>,

        /// Players per team (1 for singles, 2 for doubles)
        #[arg(long)]
        team_size: Option<usize>,

        /// Consecutive games before a forced rest, 0 disables
        #[arg(long)]
        rest_threshold: Option<u32>,
    },

    /// Record a finished match and print updated standings
    Record {
        /// Comma-separated player ids for team 1
        #[arg(long, value_delimiter = ',', required = true)]
        team1: Vec<PlayerId>,

        /// Comma-separated player ids for team 2
        #[arg(long, value_delimiter = ',', required = true)]
        team2: Vec<PlayerId>,

        /// Final score as TEAM1-TEAM2, e.g. 21-17
        #[arg(long, value_parser = parse_score)]
        score: Score,
    },
}

#[derive(Debug, Deserialize)]
struct Roster {
    #[serde(default = "default_group_id")]
    group_id: String,
    players: Vec<PlayerProfile>,
}

fn default_group_id() -> String {
    "default".to_string()
}

fn parse_score(value: &str) -> Result<Score> {
    let (team1, team2) = value
        .split_once('-')
        .ok_or_else(|| anyhow!("Score must look like 21-17, got {}", value))?;
    Ok(Score::new(
        team1.trim().parse().context("Invalid team 1 score")?,
        team2.trim().parse().context("Invalid team 2 score")?,
    ))
}

/// Initialize structured logging with the configured level
fn init_logging(log_level: &str) -> Result<()> {
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| log_level.into()),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| anyhow!("Failed to initialize logging: {}", e))?;

    Ok(())
}

/// Load and merge configuration from environment and CLI arguments
fn load_config(args: &Args) -> Result<AppConfig> {
    let mut config = if let Some(config_path) = &args.config {
        AppConfig::from_file(config_path)?
    } else {
        AppConfig::from_env()?
    };

    if let Some(log_level) = &args.log_level {
        config.service.log_level = log_level.clone();
    }

    if args.debug {
        config.service.log_level = "debug".to_string();
    }

    if let Command::Schedule {
        courts,
        team_size,
        rest_threshold,
    } = &args.command
    {
        if let Some(courts) = courts {
            config.rotation.num_courts = *courts;
        }
        if let Some(team_size) = team_size {
            config.rotation.team_size = *team_size;
        }
        if let Some(threshold) = rest_threshold {
            config.rotation.rest_threshold = (*threshold > 0).then_some(*threshold);
        }
    }

    court_rotation::config::validate_config(&config)?;
    Ok(config)
}

/// Read a roster, picking the format from the file extension
fn load_roster(path: &Path) -> Result<Roster> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read roster file {}", path.display()))?;

    let roster = match path.extension().and_then(|e| e.to_str()) {
        Some("json") => serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse roster file {}", path.display()))?,
        _ => toml::from_str(&contents)
            .with_context(|| format!("Failed to parse roster file {}", path.display()))?,
    };

    Ok(roster)
}

fn run(args: &Args, config: AppConfig) -> Result<()> {
    let roster = load_roster(&args.roster)?;
    info!(
        "Loaded {} player(s) for group {}",
        roster.players.len(),
        roster.group_id
    );

    let session = GroupSession::new(roster.group_id, config)?;
    for profile in roster.players {
        session.add_player(profile)?;
    }

    let output = match &args.command {
        Command::Queue => json!({ "queue": session.queue()? }),
        Command::Schedule { .. } => {
            let plan = session.start_round(None)?;
            let message = plan.shortfall.as_ref().map(|s| s.to_error().to_string());
            json!({
                "courts": plan.courts,
                "shortfall": plan.shortfall,
                "message": message,
                "players": session.players()?,
            })
        }
        Command::Record {
            team1,
            team2,
            score,
        } => {
            let record = session.complete_match(team1, team2, *score)?;
            json!({
                "match": record,
                "leaderboard": session.leaderboard()?,
                "players": session.players()?,
            })
        }
    };

    println!("{}", serde_json::to_string_pretty(&output)?);

    if args.metrics {
        print!("{}", session.metrics().gather_text()?);
    }

    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();

    let config = load_config(&args).unwrap_or_else(|e| {
        eprintln!("Configuration error: {}", e);
        std::process::exit(1);
    });

    if let Err(e) = init_logging(&config.service.log_level) {
        eprintln!("Failed to initialize logging: {}", e);
        std::process::exit(1);
    }

    if let Err(e) = run(&args, config) {
        error!("{:#}", e);
        std::process::exit(1);
    }

    Ok(())
}
