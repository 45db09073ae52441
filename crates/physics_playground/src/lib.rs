//! # Physics Playground
//!
//! A rigid-body sandbox: spheres and boxes fall into a walled pool, an impact
//! cue plays when they hit hard enough, and an optional turret orbits the pool
//! launching projectiles.
//!
//! ## Features
//!
//! - **Rapier Physics**: fixed-step simulation with first-contact events
//! - **Render Scene**: mesh and light graph, frustum culling, batched render queue
//! - **Timers**: virtual-clock scheduler for spawn waves and turret fire
//! - **Control Panel**: named buttons, sliders and toggles driving the app
//! - **Audio**: optional rodio playback behind the `audio` feature
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use physics_playground::prelude::*;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut config = PlaygroundConfig::for_variant(Variant::Turret);
//!     config.display.max_frames = Some(600);
//!
//!     let mut app = PlaygroundApp::new(config.clone())?;
//!     HostLoop::from_config(&config.display).run(&mut app)?;
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

// Shared building blocks
pub mod foundation;
pub mod config;
pub mod core;

// Subsystems
pub mod physics;
pub mod scene;
pub mod audio;
pub mod objects;
pub mod scheduler;
pub mod turret;
pub mod ui;
pub mod scenery;

// Application and its driver
pub mod app;
pub mod host;

pub use app::{PlaygroundApp, PlaygroundError, Task};
pub use host::HostLoop;

/// Common imports for playground users
pub mod prelude {
    pub use crate::{
        PlaygroundApp, PlaygroundError, Task, HostLoop,
        config::{Config, ConfigError},
        core::{PlaygroundConfig, Variant},
        foundation::math::{Vec3, Quat, Transform},
        physics::{PhysicsWorld, RapierWorld, BodyDesc, ColliderShape, CollisionEvent},
        scene::{Camera, FrameStats, HeadlessRenderer, RenderScene, Renderer},
        objects::{ManagedObject, ShapeKind, SpawnRequest},
        ui::{ControlChange, ControlValue, ParamId},
        audio::{AudioCue, SilentCue},
    };
}
