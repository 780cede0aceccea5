//! Court rotation
//!
//! This module orders the roster into a play queue and draws disjoint,
//! balanced groups of players for each court in a round.

pub mod queue;
pub mod scheduler;

pub use queue::{build_queue, QueueEntry};
pub use scheduler::{CourtAssignment, RotationPlan, RotationScheduler, RotationUpdate, Shortfall};
