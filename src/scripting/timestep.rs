//! Frame delta handed to update callbacks.

use std::fmt;
use std::ops::{Add, Div, Mul, Sub};

/// Elapsed time of one frame, in seconds.
#[derive(Debug, Clone, Copy, Default, PartialEq, PartialOrd)]
pub struct Timestep(f32);

impl Timestep {
    pub const fn new(seconds: f32) -> Self {
        Self(seconds)
    }

    pub fn seconds(self) -> f32 {
        self.0
    }

    pub fn milliseconds(self) -> f32 {
        self.0 * 1000.0
    }
}

impl From<f32> for Timestep {
    fn from(seconds: f32) -> Self {
        Self(seconds)
    }
}

impl From<Timestep> for f32 {
    fn from(ts: Timestep) -> Self {
        ts.0
    }
}

impl fmt::Display for Timestep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Timestep: {}", self.0)
    }
}

impl Add<Timestep> for f32 {
    type Output = f32;
    fn add(self, ts: Timestep) -> f32 {
        self + ts.0
    }
}

impl Sub<Timestep> for f32 {
    type Output = f32;
    fn sub(self, ts: Timestep) -> f32 {
        self - ts.0
    }
}

impl Mul<Timestep> for f32 {
    type Output = f32;
    fn mul(self, ts: Timestep) -> f32 {
        self * ts.0
    }
}

impl Div<Timestep> for f32 {
    type Output = f32;
    fn div(self, ts: Timestep) -> f32 {
        self / ts.0
    }
}

impl Mul<f32> for Timestep {
    type Output = f32;
    fn mul(self, rhs: f32) -> f32 {
        self.0 * rhs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 1e-6;

    fn approx_eq(a: f32, b: f32) -> bool {
        (a - b).abs() < EPSILON
    }

    #[test]
    fn test_accessors() {
        let ts = Timestep::new(0.016);
        assert!(approx_eq(ts.seconds(), 0.016));
        assert!(approx_eq(ts.milliseconds(), 16.0));
        assert_eq!(ts.to_string(), "Timestep: 0.016");
    }

    #[test]
    fn test_float_arithmetic() {
        let ts = Timestep::from(0.5);
        assert!(approx_eq(2.0 + ts, 2.5));
        assert!(approx_eq(2.0 - ts, 1.5));
        assert!(approx_eq(4.0 * ts, 2.0));
        assert!(approx_eq(ts * 4.0, 2.0));
        assert!(approx_eq(1.0 / ts, 2.0));
    }
}
