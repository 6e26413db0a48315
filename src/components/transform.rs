//! Position, rotation and scale of an entity.
//!
//! Rotation is stored as Euler angles in radians. The orientation quaternion
//! is built in Z, Y, X order, so a rotation around Z alone turns the
//! entity within the 2D plane.

use bevy_ecs::prelude::Component;
use glam::{EulerRot, Mat4, Quat, Vec3};

/// Local transform of an entity.
#[derive(Component, Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    pub position: Vec3,
    /// Euler angles in radians.
    pub rotation: Vec3,
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Vec3::ZERO,
            scale: Vec3::ONE,
        }
    }
}

impl Transform {
    pub fn new(position: Vec3, rotation: Vec3, scale: Vec3) -> Self {
        Self {
            position,
            rotation,
            scale,
        }
    }

    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    pub fn orientation(&self) -> Quat {
        Quat::from_euler(EulerRot::ZYX, self.rotation.z, self.rotation.y, self.rotation.x)
    }

    /// Local +Y rotated into world space.
    pub fn up(&self) -> Vec3 {
        self.orientation() * Vec3::Y
    }

    /// Local +X rotated into world space.
    pub fn right(&self) -> Vec3 {
        self.orientation() * Vec3::X
    }

    /// Local +Z rotated into world space.
    pub fn forward(&self) -> Vec3 {
        self.orientation() * Vec3::Z
    }

    pub fn matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.orientation(), self.position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    const EPSILON: f32 = 1e-5;

    fn approx_vec(a: Vec3, b: Vec3) -> bool {
        (a - b).length() < EPSILON
    }

    #[test]
    fn test_default_is_identity() {
        let t = Transform::default();
        assert_eq!(t.scale, Vec3::ONE);
        assert!(approx_vec(t.up(), Vec3::Y));
        assert!(approx_vec(t.right(), Vec3::X));
        assert!(approx_vec(t.forward(), Vec3::Z));
    }

    #[test]
    fn test_rotation_around_z_turns_up_left() {
        let t = Transform::new(Vec3::ZERO, Vec3::new(0.0, 0.0, FRAC_PI_2), Vec3::ONE);
        assert!(approx_vec(t.up(), Vec3::new(-1.0, 0.0, 0.0)));
        assert!(approx_vec(t.right(), Vec3::Y));
    }

    #[test]
    fn test_matrix_translates() {
        let t = Transform::from_position(Vec3::new(1.0, 2.0, 3.0));
        let p = t.matrix().transform_point3(Vec3::ZERO);
        assert!(approx_vec(p, Vec3::new(1.0, 2.0, 3.0)));
    }
}
