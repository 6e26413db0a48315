//! Four-component vector value shared with the native engine. Also used for RGBA colors.

use std::fmt;
use std::ops::{Add, AddAssign, Div, Mul, MulAssign, Neg, Sub, SubAssign};

use serde::{Deserialize, Serialize};

use super::{Vector2, Vector3};
use crate::interop::internal_calls;

#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vector4 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub w: f32,
}

impl Vector4 {
    pub const ZERO: Self = Self::splat(0.0);
    pub const ONE: Self = Self::splat(1.0);
    pub const POSITIVE_INFINITY: Self = Self::splat(f32::INFINITY);
    pub const NEGATIVE_INFINITY: Self = Self::splat(f32::NEG_INFINITY);

    pub const fn new(x: f32, y: f32, z: f32, w: f32) -> Self {
        Self { x, y, z, w }
    }

    pub const fn splat(scalar: f32) -> Self {
        Self::new(scalar, scalar, scalar, scalar)
    }

    pub const fn from_xyz(xyz: Vector3, w: f32) -> Self {
        Self::new(xyz.x, xyz.y, xyz.z, w)
    }

    /// Drops `w`.
    pub const fn xyz(self) -> Vector3 {
        Vector3::new(self.x, self.y, self.z)
    }

    /// Drops `z` and `w`.
    pub const fn xy(self) -> Vector2 {
        Vector2::new(self.x, self.y)
    }

    pub fn magnitude(&self) -> f32 {
        internal_calls::vector4_magnitude(self)
    }

    pub fn sqr_magnitude(&self) -> f32 {
        internal_calls::vector4_sqr_magnitude(self)
    }

    /// Normalizes all four components in place. A zero vector stays zero.
    pub fn normalize(&mut self) -> Self {
        internal_calls::vector4_normalize(self);
        *self
    }

    pub fn normalized(self) -> Self {
        let mut copy = self;
        copy.normalize()
    }

    /// Rotates the `xyz` part around `axis`; `w` is left unchanged.
    pub fn rotate_around_axis(&mut self, angle: f32, axis: Vector3) -> Self {
        internal_calls::vector4_rotate_around_axis(self, angle, &axis);
        *self
    }

    pub fn dot(self, other: Self) -> f32 {
        self.x * other.x + self.y * other.y + self.z * other.z + self.w * other.w
    }

    pub fn lerp(a: Self, b: Self, t: f32) -> Self {
        a + (b - a) * t
    }
}

impl fmt::Display for Vector4 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {}, {})", self.x, self.y, self.z, self.w)
    }
}

impl Add for Vector4 {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z, self.w + rhs.w)
    }
}

impl Sub for Vector4 {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z, self.w - rhs.w)
    }
}

impl Mul for Vector4 {
    type Output = Self;
    fn mul(self, rhs: Self) -> Self {
        Self::new(self.x * rhs.x, self.y * rhs.y, self.z * rhs.z, self.w * rhs.w)
    }
}

impl Mul<f32> for Vector4 {
    type Output = Self;
    fn mul(self, rhs: f32) -> Self {
        Self::new(self.x * rhs, self.y * rhs, self.z * rhs, self.w * rhs)
    }
}

impl Mul<Vector4> for f32 {
    type Output = Vector4;
    fn mul(self, rhs: Vector4) -> Vector4 {
        rhs * self
    }
}

impl Div<f32> for Vector4 {
    type Output = Self;
    fn div(self, rhs: f32) -> Self {
        Self::new(self.x / rhs, self.y / rhs, self.z / rhs, self.w / rhs)
    }
}

impl Neg for Vector4 {
    type Output = Self;
    fn neg(self) -> Self {
        Self::new(-self.x, -self.y, -self.z, -self.w)
    }
}

impl AddAssign for Vector4 {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl SubAssign for Vector4 {
    fn sub_assign(&mut self, rhs: Self) {
        *self = *self - rhs;
    }
}

impl MulAssign<f32> for Vector4 {
    fn mul_assign(&mut self, rhs: f32) {
        *self = *self * rhs;
    }
}
