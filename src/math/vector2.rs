//! Two-component vector value shared with the native engine.
//!
//! Arithmetic runs on the script side. Length and normalization go through
//! the internal call table so both sides agree on the exact numerics.

use std::fmt;
use std::ops::{Add, AddAssign, Div, DivAssign, Mul, MulAssign, Neg, Sub, SubAssign};

use serde::{Deserialize, Serialize};

use super::{Vector3, Vector4};
use crate::interop::internal_calls;

/// A 2D vector with `f32` components, laid out exactly like two packed floats.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vector2 {
    pub x: f32,
    pub y: f32,
}

impl Vector2 {
    pub const ZERO: Self = Self::splat(0.0);
    pub const ONE: Self = Self::splat(1.0);
    pub const RIGHT: Self = Self::new(1.0, 0.0);
    pub const LEFT: Self = Self::new(-1.0, 0.0);
    pub const UP: Self = Self::new(0.0, 1.0);
    pub const DOWN: Self = Self::new(0.0, -1.0);
    pub const POSITIVE_INFINITY: Self = Self::splat(f32::INFINITY);
    pub const NEGATIVE_INFINITY: Self = Self::splat(f32::NEG_INFINITY);

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Builds a vector with every component set to `scalar`.
    pub const fn splat(scalar: f32) -> Self {
        Self::new(scalar, scalar)
    }

    /// Appends a `z` component.
    pub const fn extend(self, z: f32) -> Vector3 {
        Vector3::new(self.x, self.y, z)
    }

    /// Widens to three components, filling `z` with zero.
    pub const fn to_vector3(self) -> Vector3 {
        self.extend(0.0)
    }

    /// Widens to four components, filling `z` and `w` with zero.
    pub const fn to_vector4(self) -> Vector4 {
        Vector4::new(self.x, self.y, 0.0, 0.0)
    }

    pub fn magnitude(&self) -> f32 {
        internal_calls::vector2_magnitude(self)
    }

    pub fn sqr_magnitude(&self) -> f32 {
        internal_calls::vector2_sqr_magnitude(self)
    }

    /// Normalizes in place and returns the result. A zero vector stays zero.
    pub fn normalize(&mut self) -> Self {
        internal_calls::vector2_normalize(self);
        *self
    }

    /// Returns a normalized copy, leaving `self` untouched.
    pub fn normalized(self) -> Self {
        let mut copy = self;
        copy.normalize()
    }

    pub fn dot(self, other: Self) -> f32 {
        self.x * other.x + self.y * other.y
    }

    /// Unclamped linear interpolation between `a` and `b`.
    pub fn lerp(a: Self, b: Self, t: f32) -> Self {
        a + (b - a) * t
    }
}

impl fmt::Display for Vector2 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

impl Add for Vector2 {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Vector2 {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

/// Component-wise product.
impl Mul for Vector2 {
    type Output = Self;
    fn mul(self, rhs: Self) -> Self {
        Self::new(self.x * rhs.x, self.y * rhs.y)
    }
}

impl Mul<f32> for Vector2 {
    type Output = Self;
    fn mul(self, rhs: f32) -> Self {
        Self::new(self.x * rhs, self.y * rhs)
    }
}

impl Mul<Vector2> for f32 {
    type Output = Vector2;
    fn mul(self, rhs: Vector2) -> Vector2 {
        rhs * self
    }
}

impl Div<f32> for Vector2 {
    type Output = Self;
    fn div(self, rhs: f32) -> Self {
        Self::new(self.x / rhs, self.y / rhs)
    }
}

impl Neg for Vector2 {
    type Output = Self;
    fn neg(self) -> Self {
        Self::new(-self.x, -self.y)
    }
}

impl AddAssign for Vector2 {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl SubAssign for Vector2 {
    fn sub_assign(&mut self, rhs: Self) {
        *self = *self - rhs;
    }
}

impl MulAssign<f32> for Vector2 {
    fn mul_assign(&mut self, rhs: f32) {
        *self = *self * rhs;
    }
}

impl DivAssign<f32> for Vector2 {
    fn div_assign(&mut self, rhs: f32) {
        *self = *self / rhs;
    }
}
