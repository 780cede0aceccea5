//! Configuration management for the rotation engine
//!
//! This module handles configuration loading from environment variables and
//! TOML files, validation, and default values for every engine component.

pub mod app;
pub mod blend;
pub mod pairing;
pub mod rating;
pub mod rotation;

// Re-export commonly used types
pub use app::{validate_config, AppConfig, ServiceSettings};
pub use blend::BlendConfig;
pub use pairing::PairingConfig;
pub use rating::RatingConfig;
pub use rotation::RotationConfig;
