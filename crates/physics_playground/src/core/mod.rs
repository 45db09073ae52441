//! # Core Playground Module
//!
//! Shared abstractions used by every subsystem.
//!
//! ## Organization
//!
//! - **Config**: the complete playground configuration and its categories

pub mod config;

// Re-export commonly used config types
pub use config::{
    PlaygroundConfig,
    Variant,
    PhysicsConfig,
    SpawnConfig,
    PoolConfig,
    AudioConfig,
    TurretConfig,
    DisplayConfig,
    CameraConfig,
};
pub use crate::config::{Config, ConfigError};
