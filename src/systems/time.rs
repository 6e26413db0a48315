//! Scene clock advance.
//!
//! Runs once per frame before the physics step so bodies integrate with this
//! frame's [`WorldTime::delta`].
use bevy_ecs::prelude::*;

use crate::resources::worldtime::WorldTime;

/// Advance the clock by `dt` unscaled seconds and count the frame.
///
/// Negative or non-finite deltas count as a zero-length frame.
pub fn update_world_time(world: &mut World, dt: f32) {
    let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
    let mut clock = world.resource_mut::<WorldTime>();
    clock.delta = dt * clock.time_scale;
    clock.elapsed += clock.delta;
    clock.frame_count += 1;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn world_with_scale(time_scale: f32) -> World {
        let mut world = World::new();
        world.insert_resource(WorldTime {
            time_scale,
            ..Default::default()
        });
        world
    }

    #[test]
    fn test_time_scale_applies() {
        let mut world = world_with_scale(0.5);
        update_world_time(&mut world, 0.2);
        let clock = world.resource::<WorldTime>();
        assert!((clock.delta - 0.1).abs() < 1e-6);
        assert!((clock.elapsed - 0.1).abs() < 1e-6);
        assert_eq!(clock.frame_count, 1);
        assert!((clock.timestep().milliseconds() - 100.0).abs() < 1e-3);
    }

    #[test]
    fn test_bad_delta_is_a_zero_frame() {
        let mut world = world_with_scale(1.0);
        update_world_time(&mut world, f32::NAN);
        update_world_time(&mut world, -1.0);
        let clock = world.resource::<WorldTime>();
        assert_eq!(clock.elapsed, 0.0);
        assert_eq!(clock.frame_count, 2);
    }
}
