//! Bounds used by the headless renderer to cull meshes outside the camera view

use crate::foundation::math::{Mat4, Point3, Transform, Vec3, Vec4};

/// Axis-aligned box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AABB {
    /// Lowest corner
    pub min: Vec3,
    /// Highest corner
    pub max: Vec3,
}

impl AABB {
    /// Box spanning `min` to `max`
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Box around the origin with the given half-size
    pub fn centered(half_size: Vec3) -> Self {
        Self::new(-half_size, half_size)
    }

    /// Midpoint
    pub fn center(&self) -> Vec3 {
        self.min.lerp(&self.max, 0.5)
    }

    /// Half-size along each axis
    pub fn extents(&self) -> Vec3 {
        (self.max - self.min) / 2.0
    }

    /// Corner reached by moving towards +`direction` on every axis
    fn corner_along(&self, direction: &Vec3) -> Vec3 {
        Vec3::from_fn(|axis, _| if direction[axis] >= 0.0 { self.max[axis] } else { self.min[axis] })
    }

    /// Box enclosing this one once `transform` has been applied to it
    pub fn transformed(&self, transform: &Transform) -> Self {
        let matrix = transform.to_matrix();
        let corners = (0..8).map(|bits: usize| {
            let pick = |axis: usize| if bits & (1 << axis) == 0 { self.min[axis] } else { self.max[axis] };
            matrix.transform_point(&Point3::new(pick(0), pick(1), pick(2))).coords
        });

        corners.fold(
            Self::new(Vec3::repeat(f32::INFINITY), Vec3::repeat(f32::NEG_INFINITY)),
            |bounds, corner| Self::new(bounds.min.inf(&corner), bounds.max.sup(&corner)),
        )
    }
}

/// Plane `normal · p + offset = 0`, normal of unit length
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane {
    /// Unit normal; the positive half-space is "inside"
    pub normal: Vec3,
    /// Offset along the normal
    pub offset: f32,
}

impl Plane {
    /// Plane from the homogeneous coefficients `(a, b, c, d)`, rescaled to a unit normal
    pub fn from_coefficients(coefficients: Vec4) -> Self {
        let normal = coefficients.xyz();
        let scale = match normal.norm() {
            length if length > 0.0 => length.recip(),
            _ => 1.0,
        };
        Self { normal: normal * scale, offset: coefficients.w * scale }
    }

    /// Signed distance, positive on the inside
    pub fn signed_distance(&self, point: &Vec3) -> f32 {
        self.normal.dot(point) + self.offset
    }
}

/// View volume of a camera as six inward-facing planes
#[derive(Debug, Clone)]
pub struct Frustum {
    /// Left, right, bottom, top, near, far
    pub planes: [Plane; 6],
}

impl Frustum {
    /// Planes of a combined view-projection matrix (clip space `-w <= z <= w`)
    pub fn from_matrix(view_projection: &Mat4) -> Self {
        let row = |i: usize| -> Vec4 { view_projection.row(i).transpose() };
        let w = row(3);

        let planes = [(0, 1.0), (0, -1.0), (1, 1.0), (1, -1.0), (2, 1.0), (2, -1.0)]
            .map(|(axis, sign)| Plane::from_coefficients(w + row(axis) * sign));
        Self { planes }
    }

    /// False only when the box lies entirely outside one of the planes
    pub fn intersects_aabb(&self, bounds: &AABB) -> bool {
        self.planes
            .iter()
            .all(|plane| plane.signed_distance(&bounds.corner_along(&plane.normal)) >= 0.0)
    }
}
