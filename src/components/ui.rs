//! Screen-space counterparts of the renderer components.

use bevy_ecs::prelude::Component;
use glam::Vec4;

#[derive(Component, Clone, Debug, PartialEq)]
pub struct UiImage {
    pub color: Vec4,
    pub texture: Option<String>,
    pub tiling_factor: f32,
}

impl Default for UiImage {
    fn default() -> Self {
        Self {
            color: Vec4::ONE,
            texture: None,
            tiling_factor: 1.0,
        }
    }
}

#[derive(Component, Clone, Copy, Debug, PartialEq)]
pub struct UiCircle {
    pub color: Vec4,
    pub thickness: f32,
    pub fade: f32,
}

impl Default for UiCircle {
    fn default() -> Self {
        Self {
            color: Vec4::ONE,
            thickness: 1.0,
            fade: 0.005,
        }
    }
}

#[derive(Component, Clone, Debug, PartialEq)]
pub struct UiText {
    pub text: String,
    pub color: Vec4,
    pub kerning: f32,
    pub line_spacing: f32,
}

impl Default for UiText {
    fn default() -> Self {
        Self {
            text: String::new(),
            color: Vec4::ONE,
            kerning: 0.0,
            line_spacing: 0.0,
        }
    }
}
