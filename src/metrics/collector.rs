//! Metrics collection using Prometheus
//!
//! This module provides metrics collection for court-rotation using
//! Prometheus metrics.

use crate::rotation::RotationPlan;
use crate::types::TeamSide;
use crate::utils::outcome_label;
use anyhow::Result;
use prometheus::{
    Encoder, Histogram, HistogramOpts, IntCounter, IntCounterVec, IntGauge, Opts, Registry,
    TextEncoder,
};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Main metrics collector for the rotation engine
#[derive(Clone)]
pub struct MetricsCollector {
    /// Prometheus registry
    registry: Arc<Registry>,

    /// Round generation metrics
    rotation_metrics: RotationMetrics,

    /// Match completion metrics
    match_metrics: MatchMetrics,

    /// Performance metrics
    performance_metrics: PerformanceMetrics,
}

/// Round generation metrics
#[derive(Clone)]
pub struct RotationMetrics {
    /// Total rounds generated
    pub rounds_generated_total: IntCounter,

    /// Total courts filled
    pub courts_filled_total: IntCounter,

    /// Rounds that filled fewer courts than requested
    pub court_shortfalls_total: IntCounter,

    /// Players left waiting after the latest round
    pub players_waiting: IntGauge,

    /// Composite-skill gap between the two teams on a court
    pub team_imbalance: Histogram,
}

/// Match completion metrics
#[derive(Clone)]
pub struct MatchMetrics {
    /// Completed matches by outcome
    pub matches_completed_total: IntCounterVec,

    /// Completions rejected before any state changed
    pub completions_rejected_total: IntCounterVec,

    /// Pre-match quality (1.0 = even)
    pub match_quality: Histogram,

    /// Ratings after each completed match
    pub rating_distribution: Histogram,
}

/// Performance metrics
#[derive(Clone)]
pub struct PerformanceMetrics {
    /// Round generation time
    pub scheduling_duration: Histogram,

    /// Match completion time
    pub completion_duration: Histogram,
}

impl MetricsCollector {
    /// Create a new metrics collector with default registry
    pub fn new() -> Result<Self> {
        let registry = Arc::new(Registry::new());
        Self::with_registry(registry)
    }

    /// Create a new metrics collector with custom registry
    pub fn with_registry(registry: Arc<Registry>) -> Result<Self> {
        let rotation_metrics = RotationMetrics::new(&registry)?;
        let match_metrics = MatchMetrics::new(&registry)?;
        let performance_metrics = PerformanceMetrics::new(&registry)?;

        Ok(Self {
            registry,
            rotation_metrics,
            match_metrics,
            performance_metrics,
        })
    }

    /// Get the Prometheus registry
    pub fn registry(&self) -> Arc<Registry> {
        self.registry.clone()
    }

    pub fn rotation(&self) -> &RotationMetrics {
        &self.rotation_metrics
    }

    pub fn matches(&self) -> &MatchMetrics {
        &self.match_metrics
    }

    pub fn performance(&self) -> &PerformanceMetrics {
        &self.performance_metrics
    }

    /// Record a generated round
    pub fn record_round(&self, plan: &RotationPlan, players_waiting: usize, duration: Duration) {
        self.rotation_metrics.rounds_generated_total.inc();
        self.rotation_metrics
            .courts_filled_total
            .inc_by(plan.courts.len() as u64);

        if plan.shortfall.is_some() {
            self.rotation_metrics.court_shortfalls_total.inc();
        }

        for court in &plan.courts {
            self.rotation_metrics.team_imbalance.observe(court.imbalance());
        }

        self.rotation_metrics
            .players_waiting
            .set(players_waiting as i64);

        self.performance_metrics
            .scheduling_duration
            .observe(duration.as_secs_f64());
    }

    /// Record a committed match
    pub fn record_match_completed(
        &self,
        winning_team: Option<TeamSide>,
        match_quality: f64,
        new_ratings: impl IntoIterator<Item = f64>,
        duration: Duration,
    ) {
        self.match_metrics
            .matches_completed_total
            .with_label_values(&[outcome_label(winning_team)])
            .inc();

        self.match_metrics.match_quality.observe(match_quality);

        for rating in new_ratings {
            self.match_metrics.rating_distribution.observe(rating);
        }

        self.performance_metrics
            .completion_duration
            .observe(duration.as_secs_f64());
    }

    /// Record a rejected completion
    pub fn record_completion_rejected(&self, reason: &str) {
        self.match_metrics
            .completions_rejected_total
            .with_label_values(&[reason])
            .inc();
    }

    /// Render all metrics in the Prometheus text format
    pub fn gather_text(&self) -> Result<String> {
        let mut buffer = Vec::new();
        TextEncoder::new().encode(&self.registry.gather(), &mut buffer)?;
        Ok(String::from_utf8(buffer)?)
    }

    /// Create a timer for measuring operation duration
    pub fn start_timer(&self) -> MetricsTimer {
        MetricsTimer::new()
    }
}

/// Timer for measuring operation durations
pub struct MetricsTimer {
    start: Instant,
}

impl MetricsTimer {
    fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    /// Get the elapsed duration
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    /// Stop the timer and return the duration
    pub fn stop(self) -> Duration {
        self.elapsed()
    }
}

impl RotationMetrics {
    fn new(registry: &Registry) -> Result<Self> {
        let rounds_generated_total = IntCounter::new(
            "court_rotation_rounds_generated_total",
            "Total rounds generated",
        )?;
        registry.register(Box::new(rounds_generated_total.clone()))?;

        let courts_filled_total = IntCounter::new(
            "court_rotation_courts_filled_total",
            "Total courts filled",
        )?;
        registry.register(Box::new(courts_filled_total.clone()))?;

        let court_shortfalls_total = IntCounter::new(
            "court_rotation_court_shortfalls_total",
            "Rounds with too few eligible players",
        )?;
        registry.register(Box::new(court_shortfalls_total.clone()))?;

        let players_waiting = IntGauge::new(
            "court_rotation_players_waiting",
            "Players waiting after the latest round",
        )?;
        registry.register(Box::new(players_waiting.clone()))?;

        let team_imbalance = Histogram::with_opts(
            HistogramOpts::new(
                "court_rotation_team_imbalance",
                "Composite skill gap between teams",
            )
            .buckets(vec![0.01, 0.05, 0.1, 0.2, 0.3, 0.5, 1.0]),
        )?;
        registry.register(Box::new(team_imbalance.clone()))?;

        Ok(Self {
            rounds_generated_total,
            courts_filled_total,
            court_shortfalls_total,
            players_waiting,
            team_imbalance,
        })
    }
}

impl MatchMetrics {
    fn new(registry: &Registry) -> Result<Self> {
        let matches_completed_total = IntCounterVec::new(
            Opts::new(
                "court_rotation_matches_completed_total",
                "Total matches completed",
            ),
            &["outcome"],
        )?;
        registry.register(Box::new(matches_completed_total.clone()))?;

        let completions_rejected_total = IntCounterVec::new(
            Opts::new(
                "court_rotation_completions_rejected_total",
                "Match completions rejected",
            ),
            &["reason"],
        )?;
        registry.register(Box::new(completions_rejected_total.clone()))?;

        let match_quality = Histogram::with_opts(
            HistogramOpts::new("court_rotation_match_quality", "Pre-match quality")
                .buckets(vec![0.1, 0.25, 0.5, 0.75, 0.9, 0.95, 1.0]),
        )?;
        registry.register(Box::new(match_quality.clone()))?;

        let rating_distribution = Histogram::with_opts(
            HistogramOpts::new(
                "court_rotation_rating_distribution",
                "Player rating distribution",
            )
            .buckets(vec![
                1100.0, 1200.0, 1300.0, 1400.0, 1500.0, 1600.0, 1700.0, 1800.0, 1900.0,
            ]),
        )?;
        registry.register(Box::new(rating_distribution.clone()))?;

        Ok(Self {
            matches_completed_total,
            completions_rejected_total,
            match_quality,
            rating_distribution,
        })
    }
}

impl PerformanceMetrics {
    fn new(registry: &Registry) -> Result<Self> {
        let scheduling_duration = Histogram::with_opts(
            HistogramOpts::new(
                "court_rotation_scheduling_duration_seconds",
                "Round generation time",
            )
            .buckets(vec![0.00001, 0.0001, 0.001, 0.005, 0.01, 0.05, 0.1]),
        )?;
        registry.register(Box::new(scheduling_duration.clone()))?;

        let completion_duration = Histogram::with_opts(
            HistogramOpts::new(
                "court_rotation_completion_duration_seconds",
                "Match completion time",
            )
            .buckets(vec![0.00001, 0.0001, 0.001, 0.005, 0.01, 0.05, 0.1]),
        )?;
        registry.register(Box::new(completion_duration.clone()))?;

        Ok(Self {
            scheduling_duration,
            completion_duration,
        })
    }
}
