//! Random numbers. Seeded variants are pure functions of their arguments.

use crate::interop::internal_calls as ic;

pub struct Random;

impl Random {
    /// In `[0, 1)`.
    pub fn float() -> f32 {
        ic::random_float()
    }

    pub fn float_seeded(seed: u32) -> f32 {
        ic::random_float_seed(seed)
    }

    pub fn int() -> i32 {
        ic::random_int()
    }

    pub fn int_seeded(seed: u32) -> i32 {
        ic::random_int_seed(seed)
    }

    /// In `[min, max)`.
    pub fn range_f32(min: f32, max: f32) -> f32 {
        ic::random_range_float(min, max)
    }

    pub fn range_f32_seeded(min: f32, max: f32, seed: u32) -> f32 {
        ic::random_range_float_seed(min, max, seed)
    }

    /// In `[min, max]`.
    pub fn range_i32(min: i32, max: i32) -> i32 {
        ic::random_range_int(min, max)
    }

    pub fn range_i32_seeded(min: i32, max: i32, seed: u32) -> i32 {
        ic::random_range_int_seed(min, max, seed)
    }
}
