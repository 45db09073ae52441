//! Turret: an orbiting launcher aimed at the pool
//!
//! The turret circles the pool centre at `orbit_radius`, looks towards the
//! centre offset by `horizontal_orientation`, and pitches its barrel up by
//! `vertical_orientation`. Projectiles leave the muzzle with a one-step force
//! of `shooting_power` along the aim direction.

pub mod fire_control;

use std::time::Duration;

use crate::core::config::TurretConfig;
use crate::foundation::collections::NodeHandle;
use crate::foundation::math::{constants, utils, Quat, Transform, Vec3};
use crate::objects::SpawnRequest;
use crate::scene::{color_from_hex, Geometry, MeshNode, RenderScene, StandardMaterial};

pub use fire_control::{clamp_interval, FireControl, FireState, MIN_FIRE_INTERVAL};

const BARREL_LENGTH: f32 = 1.0;
const BARREL_RADIUS: f32 = 0.15;

/// Live turret parameters, edited from the control panel
#[derive(Debug, Clone, PartialEq)]
pub struct TurretParams {
    /// Height of the turret above the ground
    pub altitude: f32,
    /// Yaw offset from facing the pool centre (radians)
    pub horizontal_orientation: f32,
    /// Barrel elevation (radians)
    pub vertical_orientation: f32,
    /// Current position on the orbit (radians)
    pub orbit_angle: f32,
    /// Distance from the pool centre
    pub orbit_radius: f32,
    /// Orbit angular speed (radians per second)
    pub orbit_speed: f32,
    /// Launch force magnitude
    pub shooting_power: f32,
    /// Requested fire period (clamped by [`FireControl`])
    pub shooting_interval: Duration,
    /// Repeating fire switched on
    pub shooting_enabled: bool,
    /// Orbit running
    pub rotation_enabled: bool,
    /// Radius of launched spheres
    pub projectile_radius: f32,
}

impl TurretParams {
    /// Initial parameters from configuration
    pub fn from_config(config: &TurretConfig) -> Self {
        Self {
            altitude: config.altitude,
            horizontal_orientation: config.horizontal_orientation,
            vertical_orientation: config.vertical_orientation,
            orbit_angle: config.orbit_angle,
            orbit_radius: config.orbit_radius,
            orbit_speed: config.orbit_speed,
            shooting_power: config.shooting_power,
            shooting_interval: Duration::from_millis(config.shooting_interval_ms),
            shooting_enabled: config.shooting_enabled,
            rotation_enabled: config.rotation_enabled,
            projectile_radius: config.projectile_radius,
        }
    }

    /// Advance the orbit by `delta` seconds when rotation is enabled
    pub fn advance_orbit(&mut self, delta: f32) {
        if self.rotation_enabled {
            self.orbit_angle = utils::wrap_angle(self.orbit_angle + self.orbit_speed * delta);
        }
    }

    /// Turret position on its orbit
    pub fn position(&self) -> Vec3 {
        Vec3::new(
            self.orbit_radius * self.orbit_angle.cos(),
            self.altitude,
            self.orbit_radius * self.orbit_angle.sin(),
        )
    }

    /// Heading of the barrel; zero offset points at the orbit centre
    pub fn yaw(&self) -> f32 {
        self.orbit_angle + constants::PI + self.horizontal_orientation
    }

    /// Unit vector the barrel points along
    pub fn aim_direction(&self) -> Vec3 {
        utils::direction_from_yaw_pitch(self.yaw(), self.vertical_orientation)
    }

    /// Where projectiles appear: just past the barrel tip
    pub fn muzzle_position(&self) -> Vec3 {
        self.position() + self.aim_direction() * (BARREL_LENGTH * 0.5 + self.projectile_radius + 0.05)
    }

    /// Force giving a projectile its launch velocity
    pub fn launch_force(&self) -> Vec3 {
        self.aim_direction() * self.shooting_power
    }

    /// Spawn request for one projectile
    pub fn projectile_request(&self) -> SpawnRequest {
        SpawnRequest::sphere(self.projectile_radius, self.muzzle_position()).with_force(self.launch_force())
    }

    /// Barrel transform: a Y-aligned cylinder turned onto the aim direction
    pub fn barrel_transform(&self) -> Transform {
        let rotation = Quat::rotation_between(&Vec3::y(), &self.aim_direction()).unwrap_or_else(Quat::identity);
        Transform {
            position: self.position(),
            rotation,
            scale: Vec3::repeat(1.0),
        }
    }
}

/// Turret parameters plus the mesh that shows them
#[derive(Debug, Clone)]
pub struct Turret {
    /// Live parameters
    pub params: TurretParams,
    mesh: NodeHandle,
}

impl Turret {
    /// Add the turret mesh to `scene`
    pub fn new(params: TurretParams, scene: &mut RenderScene) -> Self {
        let material = scene.add_material(StandardMaterial {
            color: color_from_hex(0x55_5F_6B),
            metalness: 0.6,
            roughness: 0.3,
            ..StandardMaterial::default()
        });
        let mesh = scene.add_mesh(
            MeshNode::new(
                Geometry::Cylinder { radius: BARREL_RADIUS, length: BARREL_LENGTH },
                material,
                params.barrel_transform(),
            )
            .casting_shadow(),
        );

        Self { params, mesh }
    }

    /// Handle of the barrel mesh
    pub fn mesh(&self) -> NodeHandle {
        self.mesh
    }

    /// Move the orbit along and make the mesh follow
    pub fn update(&mut self, delta: f32, scene: &mut RenderScene) {
        self.params.advance_orbit(delta);
        self.sync_mesh(scene);
    }

    /// Copy position and aim onto the mesh
    pub fn sync_mesh(&self, scene: &mut RenderScene) {
        if let Some(mesh) = scene.mesh_mut(self.mesh) {
            mesh.transform = self.params.barrel_transform();
        }
    }
}
