//! Scene clock.

use bevy_ecs::prelude::Resource;

use crate::scripting::Timestep;

/// Simulation clock, advanced once per scene frame.
///
/// `delta` already has `time_scale` applied; physics integrates with it.
#[derive(Resource, Clone, Copy, Debug, PartialEq)]
pub struct WorldTime {
    pub elapsed: f32,
    pub delta: f32,
    pub time_scale: f32,
    pub frame_count: u64,
}

impl Default for WorldTime {
    fn default() -> Self {
        WorldTime {
            elapsed: 0.0,
            delta: 0.0,
            time_scale: 1.0,
            frame_count: 0,
        }
    }
}

impl WorldTime {
    /// The scaled delta of the current frame as handed to behaviors.
    pub fn timestep(&self) -> Timestep {
        Timestep::new(self.delta)
    }
}
