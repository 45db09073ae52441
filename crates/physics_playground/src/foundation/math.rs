//! nalgebra aliases, mesh transforms and angle helpers
//!
//! Provides fundamental math types for the render scene and the spawn logic.
//! Physics-engine math is converted at the boundary in `physics::conversions`.

pub use nalgebra::{Matrix4, Quaternion, Unit, Vector3, Vector4};

/// Single-precision 3-vector
pub type Vec3 = Vector3<f32>;

/// Homogeneous 4-vector
pub type Vec4 = Vector4<f32>;

/// Homogeneous transform matrix
pub type Mat4 = Matrix4<f32>;

/// Position in space
pub type Point3 = nalgebra::Point3<f32>;

/// Unit quaternion
pub type Quat = Unit<Quaternion<f32>>;

/// Placement of a mesh: translation, then rotation, then scale applied first
#[derive(Debug, Clone, PartialEq)]
pub struct Transform {
    /// World position
    pub position: Vec3,
    /// Orientation
    pub rotation: Quat,
    /// Per-axis scale
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self::from_position_scale(Vec3::zeros(), 1.0)
    }
}

impl Transform {
    /// No translation, rotation or scaling
    pub fn identity() -> Self {
        Self::default()
    }

    /// Unit-scale, unrotated placement at `position`
    pub fn from_position(position: Vec3) -> Self {
        Self::from_position_scale(position, 1.0)
    }

    /// Unrotated placement at `position` scaled uniformly
    pub fn from_position_scale(position: Vec3, scale: f32) -> Self {
        Self { position, rotation: Quat::identity(), scale: Vec3::repeat(scale) }
    }

    /// Model matrix `T * R * S`
    pub fn to_matrix(&self) -> Mat4 {
        let scaled = Mat4::new_nonuniform_scaling(&self.scale);
        self.rotation.to_homogeneous().append_translation(&self.position) * scaled
    }
}

/// Angle constants in `f32`
pub mod constants {
    /// Half turn
    pub const PI: f32 = std::f32::consts::PI;
    /// Full turn
    pub const TAU: f32 = std::f32::consts::TAU;
    /// Quarter turn
    pub const HALF_PI: f32 = std::f32::consts::FRAC_PI_2;
    /// Radians per degree
    pub const DEG_TO_RAD: f32 = PI / 180.0;
}

/// Angle and direction helpers
pub mod utils {
    use super::{constants, Vec3};

    /// Degrees to radians
    pub fn deg_to_rad(degrees: f32) -> f32 {
        degrees * constants::DEG_TO_RAD
    }

    /// Wrap an angle into `[0, TAU)`
    pub fn wrap_angle(angle: f32) -> f32 {
        angle.rem_euclid(constants::TAU)
    }

    /// Unit direction from a yaw (around +Y, measured from +X towards +Z)
    /// and a pitch (elevation above the XZ plane)
    pub fn direction_from_yaw_pitch(yaw: f32, pitch: f32) -> Vec3 {
        let (sin_pitch, cos_pitch) = pitch.sin_cos();
        let (sin_yaw, cos_yaw) = yaw.sin_cos();
        Vec3::new(cos_pitch * cos_yaw, sin_pitch, cos_pitch * sin_yaw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_transform_matrix_applies_scale_then_translation() {
        let transform = Transform::from_position_scale(Vec3::new(1.0, 2.0, 3.0), 2.0);
        let point = transform.to_matrix().transform_point(&Point3::new(1.0, 0.0, 0.0));
        assert_relative_eq!(point, Point3::new(3.0, 2.0, 3.0), epsilon = 1e-6);
    }

    #[test]
    fn test_direction_from_yaw_pitch() {
        let forward = utils::direction_from_yaw_pitch(0.0, 0.0);
        assert_relative_eq!(forward, Vec3::new(1.0, 0.0, 0.0), epsilon = 1e-6);

        let up = utils::direction_from_yaw_pitch(1.3, constants::HALF_PI);
        assert_relative_eq!(up, Vec3::new(0.0, 1.0, 0.0), epsilon = 1e-6);

        let side = utils::direction_from_yaw_pitch(constants::HALF_PI, 0.0);
        assert_relative_eq!(side, Vec3::new(0.0, 0.0, 1.0), epsilon = 1e-6);
    }

    #[test]
    fn test_wrap_angle() {
        assert_relative_eq!(utils::wrap_angle(-constants::HALF_PI), 3.0 * constants::HALF_PI, epsilon = 1e-5);
        assert_relative_eq!(utils::wrap_angle(constants::TAU + 0.5), 0.5, epsilon = 1e-5);
    }
}
