//! Orthographic scene camera.

use bevy_ecs::prelude::Component;

#[derive(Component, Clone, Copy, Debug, PartialEq)]
pub struct Camera {
    /// Visible height in world units.
    pub orthographic_size: f32,
    pub near_clip: f32,
    pub far_clip: f32,
    /// The primary camera is the one the host renders the scene through.
    pub primary: bool,
    pub fixed_aspect_ratio: bool,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            orthographic_size: 10.0,
            near_clip: -1.0,
            far_clip: 1.0,
            primary: true,
            fixed_aspect_ratio: false,
        }
    }
}
