//! Conversions between playground math types and rapier's nalgebra types.
//!
//! rapier pins its own nalgebra release, so values cross the boundary
//! component by component.

use rapier3d::na;
use rapier3d::prelude::{Isometry, Point, Real, Rotation, Vector};

use crate::foundation::math::{Quat, Quaternion, Vec3};

/// Playground vector → rapier vector
pub fn to_rapier_vector(v: &Vec3) -> Vector<Real> {
    Vector::new(v.x, v.y, v.z)
}

/// rapier vector → playground vector
pub fn from_rapier_vector(v: &Vector<Real>) -> Vec3 {
    Vec3::new(v.x, v.y, v.z)
}

/// Playground vector → rapier point
pub fn to_rapier_point(v: &Vec3) -> Point<Real> {
    Point::new(v.x, v.y, v.z)
}

/// Playground rotation → rapier rotation
pub fn to_rapier_rotation(q: &Quat) -> Rotation<Real> {
    Rotation::new_normalize(na::Quaternion::new(q.w, q.i, q.j, q.k))
}

/// rapier rotation → playground rotation
pub fn from_rapier_rotation(r: &Rotation<Real>) -> Quat {
    Quat::new_normalize(Quaternion::new(r.w, r.i, r.j, r.k))
}

/// Position + rotation → rapier isometry
pub fn to_rapier_isometry(position: &Vec3, rotation: &Quat) -> Isometry<Real> {
    Isometry::from_parts(to_rapier_vector(position).into(), to_rapier_rotation(rotation))
}
