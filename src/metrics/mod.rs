//! Metrics for the rotation engine
//!
//! This module provides Prometheus metrics for round generation, match
//! completion and timing.

pub mod collector;

pub use collector::{MatchMetrics, MetricsCollector, MetricsTimer, PerformanceMetrics, RotationMetrics};
