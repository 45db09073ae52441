//! # Playground Configuration
//!
//! Every tunable of the playground lives in [`PlaygroundConfig`]. The defaults
//! reproduce the classic pool demo; a TOML or RON file may override any subset
//! of fields (missing fields keep their defaults).
//!
//! ## Configuration Categories
//!
//! - **Physics**: gravity, fixed step, sub-step cap, contact material
//! - **Spawn**: spawn-on-load schedule and launch forces
//! - **Pool**: dimensions of the walled pool
//! - **Audio**: impact cue asset and thresholds
//! - **Turret**: initial turret parameters (turret variant)
//! - **Display / Camera**: viewport, refresh rate, projection

use serde::{Serialize, Deserialize};

use crate::config::{Config, ConfigError};
use crate::foundation::math::Vec3;

/// Which flavour of the playground to run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Variant {
    /// Spheres and boxes rain into the pool, spawned from the control panel
    #[default]
    Basic,
    /// An orbiting turret launches spheres into the pool
    Turret,
}

/// Physics world parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Gravity acceleration (m/s²)
    pub gravity: [f32; 3],
    /// Fixed simulation step in seconds
    pub fixed_step: f32,
    /// Maximum catch-up steps per frame
    pub max_sub_steps: u32,
    /// Let resting bodies fall asleep
    pub allow_sleep: bool,
    /// Default contact friction
    pub friction: f32,
    /// Default contact restitution (bounciness)
    pub restitution: f32,
    /// Mass of every spawned object
    pub body_mass: f32,
    /// Collision events buffered between two drains
    pub collision_queue_capacity: usize,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: [0.0, -9.81, 0.0],
            fixed_step: 1.0 / 60.0,
            max_sub_steps: 3,
            allow_sleep: true,
            friction: 0.2,
            restitution: 0.5,
            body_mass: 1.0,
            collision_queue_capacity: 256,
        }
    }
}

impl PhysicsConfig {
    /// Gravity as a vector
    pub fn gravity(&self) -> Vec3 {
        Vec3::from(self.gravity)
    }
}

/// Spawn behaviour
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnConfig {
    /// Spheres (and boxes) dropped automatically after startup
    pub on_load_count: u32,
    /// Delay between two automatic drops in milliseconds
    pub on_load_interval_ms: u64,
    /// Where automatic spheres appear
    pub sphere_drop_point: [f32; 3],
    /// Where automatic boxes appear
    pub box_drop_point: [f32; 3],
    /// Height of objects spawned from the control panel
    pub spawn_height: f32,
    /// Side of the square (centred on the origin) panel spawns land in
    pub spawn_spread: f32,
    /// Upper bound of the random horizontal launch force
    pub launch_force_horizontal: f32,
    /// Vertical launch force
    pub launch_force_vertical: f32,
}

impl Default for SpawnConfig {
    fn default() -> Self {
        Self {
            on_load_count: 12,
            on_load_interval_ms: 500,
            sphere_drop_point: [5.0, 3.0, 5.0],
            box_drop_point: [-5.0, 3.0, -5.0],
            spawn_height: 3.0,
            spawn_spread: 5.0,
            launch_force_horizontal: 400.0,
            launch_force_vertical: 300.0,
        }
    }
}

/// Walled pool dimensions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PoolConfig {
    /// Half the outer side length
    pub width: f32,
    /// Wall thickness
    pub wall_thickness: f32,
    /// Wall height
    pub wall_height: f32,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            width: 8.0,
            wall_thickness: 0.5,
            wall_height: 1.5,
        }
    }
}

/// Impact sound settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioConfig {
    /// Play the impact cue at all
    pub enabled: bool,
    /// Sound asset played on impact
    pub sound_path: String,
    /// Impacts at or below this normal velocity stay silent
    pub impact_threshold: f32,
    /// Impact velocity mapped to full volume
    pub volume_divisor: f32,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            sound_path: "static/sounds/hit.mp3".to_string(),
            impact_threshold: 1.5,
            volume_divisor: 10.0,
        }
    }
}

/// Initial turret parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TurretConfig {
    /// Height of the muzzle above the ground
    pub altitude: f32,
    /// Yaw offset from "facing the pool centre" (radians)
    pub horizontal_orientation: f32,
    /// Elevation of the barrel (radians)
    pub vertical_orientation: f32,
    /// Starting orbit angle (radians)
    pub orbit_angle: f32,
    /// Distance from the pool centre
    pub orbit_radius: f32,
    /// Orbit angular speed (radians per second)
    pub orbit_speed: f32,
    /// Launch force along the aim direction
    pub shooting_power: f32,
    /// Period of the repeating fire in milliseconds
    pub shooting_interval_ms: u64,
    /// Start with repeating fire on
    pub shooting_enabled: bool,
    /// Start with the orbit running
    pub rotation_enabled: bool,
    /// Radius of launched spheres
    pub projectile_radius: f32,
}

impl Default for TurretConfig {
    fn default() -> Self {
        Self {
            altitude: 3.0,
            horizontal_orientation: 0.0,
            vertical_orientation: 0.4,
            orbit_angle: 0.0,
            orbit_radius: 6.0,
            orbit_speed: 0.5,
            shooting_power: 400.0,
            shooting_interval_ms: 300,
            shooting_enabled: false,
            rotation_enabled: true,
            projectile_radius: 0.25,
        }
    }
}

/// Viewport and frame pacing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Viewport width in CSS pixels
    pub width: u32,
    /// Viewport height in CSS pixels
    pub height: u32,
    /// Device pixel ratio reported by the host (clamped to 2 when rendering)
    pub device_pixel_ratio: f32,
    /// Frame requests per second issued by the host loop
    pub refresh_rate_hz: u32,
    /// Stop the host after this many frames (runs forever when unset)
    pub max_frames: Option<u64>,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
            device_pixel_ratio: 1.0,
            refresh_rate_hz: 60,
            max_frames: None,
        }
    }
}

/// Perspective camera and orbit controls
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Vertical field of view in degrees
    pub fov_degrees: f32,
    /// Near clip plane
    pub near: f32,
    /// Far clip plane
    pub far: f32,
    /// Initial camera position
    pub position: [f32; 3],
    /// Fraction of the pending orbit motion applied (and shed) each update
    pub damping_factor: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov_degrees: 75.0,
            near: 0.1,
            far: 100.0,
            position: [-5.0, 5.0, 5.0],
            damping_factor: 0.05,
        }
    }
}

/// # Complete Playground Configuration
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaygroundConfig {
    /// Which demo to run
    pub variant: Variant,
    /// Seed for spawn randomness (entropy when unset)
    pub seed: Option<u64>,
    /// Physics world parameters
    pub physics: PhysicsConfig,
    /// Spawn behaviour
    pub spawn: SpawnConfig,
    /// Pool dimensions
    pub pool: PoolConfig,
    /// Impact sound
    pub audio: AudioConfig,
    /// Turret parameters
    pub turret: TurretConfig,
    /// Viewport and pacing
    pub display: DisplayConfig,
    /// Camera
    pub camera: CameraConfig,
}

impl PlaygroundConfig {
    /// Defaults for the given variant
    pub fn for_variant(variant: Variant) -> Self {
        Self {
            variant,
            ..Self::default()
        }
    }

    /// Parse a TOML document and validate it
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(contents).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }
}

fn require(condition: bool, field: &'static str, reason: impl Into<String>) -> Result<(), ConfigError> {
    if condition {
        Ok(())
    } else {
        Err(ConfigError::Invalid { field, reason: reason.into() })
    }
}

impl Config for PlaygroundConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        let physics = &self.physics;
        require(
            physics.fixed_step.is_finite() && physics.fixed_step > 0.0,
            "physics.fixed_step",
            "must be a positive number of seconds",
        )?;
        require(physics.max_sub_steps >= 1, "physics.max_sub_steps", "must be at least 1")?;
        require(physics.body_mass > 0.0, "physics.body_mass", "must be positive")?;
        require(
            physics.collision_queue_capacity > 0,
            "physics.collision_queue_capacity",
            "must be at least 1",
        )?;

        let pool = &self.pool;
        require(pool.width > 0.0, "pool.width", "must be positive")?;
        require(pool.wall_height > 0.0, "pool.wall_height", "must be positive")?;
        require(
            pool.wall_thickness > 0.0 && pool.wall_thickness < pool.width,
            "pool.wall_thickness",
            format!("must be in (0, {})", pool.width),
        )?;

        require(self.audio.impact_threshold >= 0.0, "audio.impact_threshold", "must not be negative")?;
        require(self.audio.volume_divisor > 0.0, "audio.volume_divisor", "must be positive")?;

        require(self.turret.projectile_radius > 0.0, "turret.projectile_radius", "must be positive")?;
        require(self.turret.orbit_radius >= 0.0, "turret.orbit_radius", "must not be negative")?;

        require(self.display.refresh_rate_hz > 0, "display.refresh_rate_hz", "must be positive")?;
        require(
            self.display.width > 0 && self.display.height > 0,
            "display.width",
            "width and height must both be positive",
        )?;
        require(
            self.camera.near > 0.0 && self.camera.near < self.camera.far,
            "camera.near",
            "must be positive and below camera.far",
        )?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_classic_demo() {
        let config = PlaygroundConfig::default();
        assert_eq!(config.variant, Variant::Basic);
        assert_eq!(config.physics.max_sub_steps, 3);
        assert!((config.physics.fixed_step - 1.0 / 60.0).abs() < f32::EPSILON);
        assert_eq!(config.spawn.on_load_count, 12);
        assert_eq!(config.spawn.on_load_interval_ms, 500);
        assert_eq!(config.pool.width, 8.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = PlaygroundConfig::from_toml_str(
            r#"
            variant = "turret"

            [turret]
            orbit_radius = 4.0
            shooting_enabled = true
            "#,
        )
        .unwrap();

        assert_eq!(config.variant, Variant::Turret);
        assert_eq!(config.turret.orbit_radius, 4.0);
        assert!(config.turret.shooting_enabled);
        assert_eq!(config.turret.shooting_interval_ms, 300);
        assert_eq!(config.physics, PhysicsConfig::default());
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        let err = PlaygroundConfig::from_toml_str("[physics]\nmax_sub_steps = 0\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "physics.max_sub_steps", .. }));

        let err = PlaygroundConfig::from_toml_str("[pool]\nwall_thickness = 9.0\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "pool.wall_thickness", .. }));
    }

    #[test]
    fn test_zero_sized_display_is_rejected() {
        for section in ["[display]\nheight = 0\n", "[display]\nwidth = 0\n"] {
            let err = PlaygroundConfig::from_toml_str(section).unwrap_err();
            assert!(matches!(err, ConfigError::Invalid { field: "display.width", .. }));
        }
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let path = std::env::temp_dir().join(format!("playground-config-{}.toml", std::process::id()));
        let mut config = PlaygroundConfig::for_variant(Variant::Turret);
        config.seed = Some(7);
        config.display.max_frames = Some(120);

        config.save_to_file(&path).unwrap();
        let loaded = PlaygroundConfig::load_from_file(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(loaded, config);
    }

    #[test]
    fn test_unsupported_extension() {
        let err = PlaygroundConfig::default().save_to_file("playground.yaml").unwrap_err();
        assert!(matches!(err, ConfigError::UnsupportedFormat(_)));
    }
}
