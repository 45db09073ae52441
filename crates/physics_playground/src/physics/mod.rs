//! Physics module
//!
//! The rigid-body simulation itself is delegated to [rapier](https://rapier.rs/);
//! this module defines the narrow seam the playground talks to
//! ([`PhysicsWorld`]), the descriptors used to build bodies, and the queue that
//! carries collision events from a physics step to the frame loop.

pub mod collision_events;
pub mod conversions;
pub mod rapier_world;

use thiserror::Error;

use crate::foundation::collections::BodyHandle;
use crate::foundation::math::{Quat, Vec3};

pub use collision_events::{CollisionEvent, CollisionEvents};
pub use rapier_world::RapierWorld;

/// Physics errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PhysicsError {
    /// The handle does not name a body in this world
    #[error("Unknown body handle {0:?}")]
    UnknownBody(BodyHandle),

    /// A body description cannot be turned into a body
    #[error("Invalid body description: {0}")]
    InvalidBody(String),
}

/// Geometric shape of one collider
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ColliderShape {
    /// Sphere of the given radius
    Ball {
        /// Sphere radius
        radius: f32,
    },
    /// Axis-aligned box (in body space) with the given half-extents
    Cuboid {
        /// Half the box size along each axis
        half_extents: Vec3,
    },
    /// Infinite plane; everything behind the normal is solid
    HalfSpace {
        /// Outward normal in body space
        normal: Vec3,
    },
}

impl ColliderShape {
    /// Check the shape has usable dimensions
    pub fn validate(&self) -> Result<(), PhysicsError> {
        let valid = match self {
            Self::Ball { radius } => radius.is_finite() && *radius > 0.0,
            Self::Cuboid { half_extents } => half_extents.iter().all(|e| e.is_finite() && *e > 0.0),
            Self::HalfSpace { normal } => normal.iter().all(|c| c.is_finite()) && normal.norm() > 0.0,
        };

        if valid {
            Ok(())
        } else {
            Err(PhysicsError::InvalidBody(format!("degenerate shape {self:?}")))
        }
    }
}

/// One collider of a (possibly compound) body, offset in body space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShapePart {
    /// Collider geometry
    pub shape: ColliderShape,
    /// Offset from the body origin
    pub offset: Vec3,
}

/// Surface properties applied to every contact of a body
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContactMaterial {
    /// Coulomb friction coefficient
    pub friction: f32,
    /// Restitution (bounciness)
    pub restitution: f32,
}

impl Default for ContactMaterial {
    fn default() -> Self {
        Self {
            friction: 0.2,
            restitution: 0.5,
        }
    }
}

/// How a body takes part in the simulation
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BodyKind {
    /// Moves under gravity, forces and contacts
    Dynamic {
        /// Total mass, split evenly between the body's shape parts
        mass: f32,
    },
    /// Never moves (floor, pool walls)
    Static,
}

/// Everything needed to create a body
#[derive(Debug, Clone, PartialEq)]
pub struct BodyDesc {
    /// Dynamic or static
    pub kind: BodyKind,
    /// Initial position
    pub position: Vec3,
    /// Initial orientation
    pub rotation: Quat,
    /// Colliders attached to the body
    pub parts: Vec<ShapePart>,
    /// Contact material of every part
    pub material: ContactMaterial,
    /// Whether the body may fall asleep when resting
    pub can_sleep: bool,
}

impl BodyDesc {
    /// Dynamic body with a single shape at its origin
    pub fn dynamic(mass: f32, position: Vec3, shape: ColliderShape) -> Self {
        Self {
            kind: BodyKind::Dynamic { mass },
            position,
            rotation: Quat::identity(),
            parts: vec![ShapePart { shape, offset: Vec3::zeros() }],
            material: ContactMaterial::default(),
            can_sleep: true,
        }
    }

    /// Static body without shapes; add them with [`BodyDesc::with_part`]
    pub fn fixed(position: Vec3) -> Self {
        Self {
            kind: BodyKind::Static,
            position,
            rotation: Quat::identity(),
            parts: Vec::new(),
            material: ContactMaterial::default(),
            can_sleep: true,
        }
    }

    /// Attach another collider at `offset`
    pub fn with_part(mut self, shape: ColliderShape, offset: Vec3) -> Self {
        self.parts.push(ShapePart { shape, offset });
        self
    }

    /// Set the initial orientation
    pub fn with_rotation(mut self, rotation: Quat) -> Self {
        self.rotation = rotation;
        self
    }

    /// Set the contact material
    pub fn with_material(mut self, material: ContactMaterial) -> Self {
        self.material = material;
        self
    }

    /// Allow or forbid sleeping
    pub fn with_sleep(mut self, can_sleep: bool) -> Self {
        self.can_sleep = can_sleep;
        self
    }

    /// Check the description can be built
    pub fn validate(&self) -> Result<(), PhysicsError> {
        if self.parts.is_empty() {
            return Err(PhysicsError::InvalidBody("body has no shapes".to_string()));
        }
        if let BodyKind::Dynamic { mass } = self.kind {
            if !(mass.is_finite() && mass > 0.0) {
                return Err(PhysicsError::InvalidBody(format!("dynamic body mass must be positive, got {mass}")));
            }
        }
        self.parts.iter().try_for_each(|part| part.shape.validate())
    }
}

/// World-space position and orientation of a body
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pose {
    /// Position of the body origin
    pub position: Vec3,
    /// Orientation
    pub rotation: Quat,
}

/// Start of a contact between two bodies
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContactImpact {
    /// First body of the pair
    pub body_a: BodyHandle,
    /// Second body of the pair
    pub body_b: BodyHandle,
    /// Relative approach speed along the contact normal (always >= 0)
    pub impact_velocity: f32,
}

/// Rigid-body world the playground drives
///
/// Implementations own their bodies and hand out [`BodyHandle`]s. `step`
/// advances exactly one fixed step; sub-stepping is the caller's business.
pub trait PhysicsWorld {
    /// Create a body
    fn add_body(&mut self, desc: &BodyDesc) -> Result<BodyHandle, PhysicsError>;

    /// Destroy a body and its colliders
    fn remove_body(&mut self, body: BodyHandle) -> Result<(), PhysicsError>;

    /// Whether the handle names a live body
    fn contains_body(&self, body: BodyHandle) -> bool;

    /// Number of live bodies (static ones included)
    fn body_count(&self) -> usize;

    /// Current pose of a body
    fn body_pose(&self, body: BodyHandle) -> Option<Pose>;

    /// Current linear velocity of a body
    fn body_velocity(&self, body: BodyHandle) -> Option<Vec3>;

    /// Apply a force given in the body's local frame at a local point.
    /// The force acts during the next step only.
    fn apply_local_force(&mut self, body: BodyHandle, force: Vec3, local_point: Vec3) -> Result<(), PhysicsError>;

    /// Advance the simulation by `dt` seconds and report contacts that started
    fn step(&mut self, dt: f32) -> Vec<ContactImpact>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_body_desc_validation() {
        let ball = BodyDesc::dynamic(1.0, Vec3::zeros(), ColliderShape::Ball { radius: 0.5 });
        assert!(ball.validate().is_ok());

        let weightless = BodyDesc::dynamic(0.0, Vec3::zeros(), ColliderShape::Ball { radius: 0.5 });
        assert!(weightless.validate().is_err());

        let flat = BodyDesc::dynamic(
            1.0,
            Vec3::zeros(),
            ColliderShape::Cuboid { half_extents: Vec3::new(1.0, 0.0, 1.0) },
        );
        assert!(flat.validate().is_err());

        assert!(BodyDesc::fixed(Vec3::zeros()).validate().is_err());
    }
}
