//! Spawned objects
//!
//! The [`Spawner`] creates mesh + body pairs and the [`ObjectRegistry`]
//! remembers them so the frame loop can sync poses and a reset can tear them
//! all down again.

pub mod registry;
pub mod spawner;

pub use registry::{ManagedObject, ObjectRegistry, ShapeKind};
pub use spawner::{random_box_request, random_launch_force, random_sphere_request, SpawnError, SpawnRequest, Spawner};
