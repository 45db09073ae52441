//! Perspective camera and damped orbit controls
//!
//! Right-handed, Y-up view space with OpenGL-style clip space, which is what
//! [`Frustum::from_matrix`](crate::scene::bounds::Frustum::from_matrix) expects.

use crate::foundation::math::{utils, Mat4, Point3, Vec3};

/// Perspective camera looking at a target point
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    /// Camera position in world space
    pub position: Vec3,

    /// Point the camera is looking at in world space
    pub target: Vec3,

    /// Up vector for camera orientation
    pub up: Vec3,

    /// Vertical field of view in radians
    pub fov: f32,

    /// Aspect ratio (width / height)
    pub aspect: f32,

    /// Distance to near clipping plane
    pub near: f32,

    /// Distance to far clipping plane
    pub far: f32,
}

impl Camera {
    /// Create a perspective camera looking at the origin
    pub fn perspective(position: Vec3, fov_degrees: f32, aspect: f32, near: f32, far: f32) -> Self {
        Self {
            position,
            target: Vec3::zeros(),
            up: Vec3::y(),
            fov: utils::deg_to_rad(fov_degrees),
            aspect,
            near,
            far,
        }
    }

    /// Update the aspect ratio after a viewport change
    pub fn set_aspect(&mut self, aspect: f32) {
        if (self.aspect - aspect).abs() > 0.01 {
            log::debug!("Camera aspect ratio changed: {:.3} -> {:.3}", self.aspect, aspect);
        }
        self.aspect = aspect;
    }

    /// World-to-view matrix
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(&Point3::from(self.position), &Point3::from(self.target), &self.up)
    }

    /// View-to-clip matrix
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::new_perspective(self.aspect, self.fov, self.near, self.far)
    }

    /// Combined projection * view
    pub fn view_projection_matrix(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }
}

/// Orbit controls with damping
///
/// Rotation requests accumulate as a spherical delta; every [`update`](Self::update)
/// applies `damping_factor` of the remaining delta and keeps the rest, so the
/// camera eases out instead of stopping dead.
#[derive(Debug, Clone, PartialEq)]
pub struct OrbitControls {
    /// Orbit centre
    pub target: Vec3,
    /// Fraction of the pending rotation applied per update, in `(0, 1]`
    pub damping_factor: f32,
    delta_theta: f32,
    delta_phi: f32,
}

/// Keeps the camera off the poles so `look_at` stays well defined
const MIN_POLAR: f32 = 1e-3;

impl OrbitControls {
    /// Orbit around `target`
    pub fn new(target: Vec3, damping_factor: f32) -> Self {
        Self {
            target,
            damping_factor: damping_factor.clamp(f32::EPSILON, 1.0),
            delta_theta: 0.0,
            delta_phi: 0.0,
        }
    }

    /// Queue a rotation around the vertical axis
    pub fn rotate_left(&mut self, angle: f32) {
        self.delta_theta -= angle;
    }

    /// Queue a rotation towards the top pole
    pub fn rotate_up(&mut self, angle: f32) {
        self.delta_phi -= angle;
    }

    /// Rotation still waiting to be applied, as (theta, phi)
    pub fn pending_rotation(&self) -> (f32, f32) {
        (self.delta_theta, self.delta_phi)
    }

    /// Apply one damping step to `camera`; returns whether it moved
    pub fn update(&mut self, camera: &mut Camera) -> bool {
        camera.target = self.target;
        let offset = camera.position - self.target;
        let radius = offset.norm();
        if radius <= f32::EPSILON || (self.delta_theta == 0.0 && self.delta_phi == 0.0) {
            return false;
        }

        let mut theta = offset.x.atan2(offset.z);
        let mut phi = (offset.y / radius).clamp(-1.0, 1.0).acos();

        let step_theta = self.delta_theta * self.damping_factor;
        let step_phi = self.delta_phi * self.damping_factor;
        theta += step_theta;
        phi = (phi + step_phi).clamp(MIN_POLAR, std::f32::consts::PI - MIN_POLAR);

        let sin_phi = phi.sin();
        let position = self.target
            + Vec3::new(radius * sin_phi * theta.sin(), radius * phi.cos(), radius * sin_phi * theta.cos());

        self.delta_theta *= 1.0 - self.damping_factor;
        self.delta_phi *= 1.0 - self.damping_factor;

        let moved = (position - camera.position).norm() > 1e-6;
        camera.position = position;
        moved
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::Vec4;
    use approx::assert_relative_eq;

    fn default_camera() -> Camera {
        Camera::perspective(Vec3::new(-5.0, 5.0, 5.0), 75.0, 16.0 / 9.0, 0.1, 100.0)
    }

    #[test]
    fn test_origin_projects_to_screen_centre() {
        let camera = default_camera();
        let clip = camera.view_projection_matrix() * Vec4::new(0.0, 0.0, 0.0, 1.0);
        assert_relative_eq!(clip.x / clip.w, 0.0, epsilon = 1e-5);
        assert_relative_eq!(clip.y / clip.w, 0.0, epsilon = 1e-5);
    }

    #[test]
    fn test_update_without_input_keeps_camera() {
        let mut camera = default_camera();
        let mut controls = OrbitControls::new(Vec3::zeros(), 0.05);
        assert!(!controls.update(&mut camera));
        assert_relative_eq!(camera.position, Vec3::new(-5.0, 5.0, 5.0), epsilon = 1e-4);
    }

    #[test]
    fn test_damping_spreads_rotation_over_updates() {
        let mut camera = default_camera();
        let mut controls = OrbitControls::new(Vec3::zeros(), 0.05);
        let radius = camera.position.norm();

        controls.rotate_left(1.0);
        assert!(controls.update(&mut camera));
        let (remaining, _) = controls.pending_rotation();
        assert_relative_eq!(remaining, -0.95, epsilon = 1e-6);

        for _ in 0..200 {
            controls.update(&mut camera);
        }
        let (remaining, _) = controls.pending_rotation();
        assert!(remaining.abs() < 1e-3);
        assert_relative_eq!(camera.position.norm(), radius, epsilon = 1e-3);
    }

    #[test]
    fn test_polar_angle_is_clamped() {
        let mut camera = default_camera();
        let mut controls = OrbitControls::new(Vec3::zeros(), 1.0);
        controls.rotate_up(10.0);
        controls.update(&mut camera);
        assert!(camera.position.y > 0.0);
        assert!(camera.position.x.abs() + camera.position.z.abs() > 0.0);
    }
}
