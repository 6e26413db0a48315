//! Three-component vector value shared with the native engine.

use std::fmt;
use std::ops::{Add, AddAssign, Div, DivAssign, Mul, MulAssign, Neg, Sub, SubAssign};

use serde::{Deserialize, Serialize};

use super::{Vector2, Vector4};
use crate::interop::internal_calls;

/// A 3D vector with `f32` components, laid out exactly like three packed floats.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vector3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vector3 {
    pub const ZERO: Self = Self::splat(0.0);
    pub const ONE: Self = Self::splat(1.0);
    pub const RIGHT: Self = Self::new(1.0, 0.0, 0.0);
    pub const LEFT: Self = Self::new(-1.0, 0.0, 0.0);
    pub const UP: Self = Self::new(0.0, 1.0, 0.0);
    pub const DOWN: Self = Self::new(0.0, -1.0, 0.0);
    /// Forward is +Z, matching the native transform's forward direction.
    pub const FORWARD: Self = Self::new(0.0, 0.0, 1.0);
    pub const BACK: Self = Self::new(0.0, 0.0, -1.0);
    pub const POSITIVE_INFINITY: Self = Self::splat(f32::INFINITY);
    pub const NEGATIVE_INFINITY: Self = Self::splat(f32::NEG_INFINITY);

    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub const fn splat(scalar: f32) -> Self {
        Self::new(scalar, scalar, scalar)
    }

    /// Builds a vector from an `xy` pair and an explicit `z`.
    pub const fn from_xy(xy: Vector2, z: f32) -> Self {
        Self::new(xy.x, xy.y, z)
    }

    /// Drops `z`.
    pub const fn xy(self) -> Vector2 {
        Vector2::new(self.x, self.y)
    }

    /// Appends a `w` component.
    pub const fn extend(self, w: f32) -> Vector4 {
        Vector4::new(self.x, self.y, self.z, w)
    }

    /// Widens to four components, filling `w` with zero.
    pub const fn to_vector4(self) -> Vector4 {
        self.extend(0.0)
    }

    pub fn magnitude(&self) -> f32 {
        internal_calls::vector3_magnitude(self)
    }

    pub fn sqr_magnitude(&self) -> f32 {
        internal_calls::vector3_sqr_magnitude(self)
    }

    /// Normalizes in place and returns the result. A zero vector stays zero.
    pub fn normalize(&mut self) -> Self {
        internal_calls::vector3_normalize(self);
        *self
    }

    pub fn normalized(self) -> Self {
        let mut copy = self;
        copy.normalize()
    }

    /// Rotates in place by `angle` radians around `axis` and returns the result.
    pub fn rotate_around_axis(&mut self, angle: f32, axis: Vector3) -> Self {
        internal_calls::vector3_rotate_around_axis(self, angle, &axis);
        *self
    }

    pub fn dot(self, other: Self) -> f32 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    pub fn cross(self, other: Self) -> Self {
        Self::new(
            self.y * other.z - self.z * other.y,
            self.z * other.x - self.x * other.z,
            self.x * other.y - self.y * other.x,
        )
    }

    pub fn lerp(a: Self, b: Self, t: f32) -> Self {
        a + (b - a) * t
    }
}

impl fmt::Display for Vector3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

impl Add for Vector3 {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Sub for Vector3 {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl Mul for Vector3 {
    type Output = Self;
    fn mul(self, rhs: Self) -> Self {
        Self::new(self.x * rhs.x, self.y * rhs.y, self.z * rhs.z)
    }
}

impl Mul<f32> for Vector3 {
    type Output = Self;
    fn mul(self, rhs: f32) -> Self {
        Self::new(self.x * rhs, self.y * rhs, self.z * rhs)
    }
}

impl Mul<Vector3> for f32 {
    type Output = Vector3;
    fn mul(self, rhs: Vector3) -> Vector3 {
        rhs * self
    }
}

impl Div<f32> for Vector3 {
    type Output = Self;
    fn div(self, rhs: f32) -> Self {
        Self::new(self.x / rhs, self.y / rhs, self.z / rhs)
    }
}

impl Neg for Vector3 {
    type Output = Self;
    fn neg(self) -> Self {
        Self::new(-self.x, -self.y, -self.z)
    }
}

impl AddAssign for Vector3 {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl SubAssign for Vector3 {
    fn sub_assign(&mut self, rhs: Self) {
        *self = *self - rhs;
    }
}

impl MulAssign<f32> for Vector3 {
    fn mul_assign(&mut self, rhs: f32) {
        *self = *self * rhs;
    }
}

impl DivAssign<f32> for Vector3 {
    fn div_assign(&mut self, rhs: f32) {
        *self = *self / rhs;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    const EPSILON: f32 = 1e-5;

    fn approx_eq(a: f32, b: f32) -> bool {
        (a - b).abs() < EPSILON
    }

    #[test]
    fn test_forward_is_positive_z() {
        assert_eq!(Vector3::FORWARD, Vector3::new(0.0, 0.0, 1.0));
        assert_eq!(-Vector3::FORWARD, Vector3::BACK);
    }

    #[test]
    fn test_display_format() {
        assert_eq!(Vector3::new(1.0, 2.0, 3.0).to_string(), "(1, 2, 3)");
    }

    #[test]
    fn test_rotate_around_z() {
        let mut v = Vector3::RIGHT;
        let r = v.rotate_around_axis(FRAC_PI_2, Vector3::FORWARD);
        assert!(approx_eq(r.x, 0.0));
        assert!(approx_eq(r.y, 1.0));
        assert!(approx_eq(r.z, 0.0));
        assert_eq!(r, v);
    }

    #[test]
    fn test_narrowing_and_widening() {
        let v = Vector3::new(1.0, 2.0, 3.0);
        assert_eq!(v.xy(), Vector2::new(1.0, 2.0));
        assert_eq!(v.to_vector4(), Vector4::new(1.0, 2.0, 3.0, 0.0));
        assert_eq!(Vector3::from_xy(Vector2::ONE, 4.0), Vector3::new(1.0, 1.0, 4.0));
    }

    #[test]
    fn test_cross_and_dot() {
        assert_eq!(Vector3::RIGHT.cross(Vector3::UP), Vector3::FORWARD);
        assert!(approx_eq(Vector3::new(1.0, 2.0, 3.0).dot(Vector3::ONE), 6.0));
    }

    #[test]
    fn test_normalize_zero_stays_zero() {
        let mut v = Vector3::ZERO;
        assert_eq!(v.normalize(), Vector3::ZERO);
    }
}
