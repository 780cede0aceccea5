//! Team balancing
//!
//! This module splits a drawn pool of players into two teams with the
//! smallest composite-skill difference.

pub mod balancer;
pub mod partition;

pub use balancer::{TeamBalancer, TeamSplit};
pub use partition::{Partition, Partitions};
