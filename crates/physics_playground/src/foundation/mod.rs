//! Foundation module - Core utilities and types
//!
//! This module provides fundamental utilities used throughout the playground:
//! - Math types and operations
//! - Handle collections
//! - Frame timing and the fixed-timestep accumulator
//! - Logging utilities

pub mod math;
pub mod collections;
pub mod time;
pub mod logging;
