//! Renderable components. Scripts only read and write their data; drawing
//! them is the host renderer's job.

use bevy_ecs::prelude::Component;
use glam::Vec4;

/// Textured (or flat colored) quad.
#[derive(Component, Clone, Debug, PartialEq)]
pub struct SpriteRenderer {
    /// RGBA tint.
    pub color: Vec4,
    pub texture: Option<String>,
    pub tiling_factor: f32,
}

impl Default for SpriteRenderer {
    fn default() -> Self {
        Self {
            color: Vec4::ONE,
            texture: None,
            tiling_factor: 1.0,
        }
    }
}

/// Filled or hollow circle.
#[derive(Component, Clone, Copy, Debug, PartialEq)]
pub struct CircleRenderer {
    pub color: Vec4,
    pub radius: f32,
    /// 1.0 draws a filled disc, smaller values draw a ring.
    pub thickness: f32,
    pub fade: f32,
}

impl Default for CircleRenderer {
    fn default() -> Self {
        Self {
            color: Vec4::ONE,
            radius: 0.5,
            thickness: 1.0,
            fade: 0.005,
        }
    }
}

#[derive(Component, Clone, Debug, PartialEq)]
pub struct TextRenderer {
    pub text: String,
    pub color: Vec4,
    pub kerning: f32,
    pub line_spacing: f32,
}

impl Default for TextRenderer {
    fn default() -> Self {
        Self {
            text: String::new(),
            color: Vec4::ONE,
            kerning: 0.0,
            line_spacing: 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        assert_eq!(SpriteRenderer::default().color, Vec4::ONE);
        assert_eq!(SpriteRenderer::default().tiling_factor, 1.0);
        let circle = CircleRenderer::default();
        assert_eq!(circle.thickness, 1.0);
        assert_eq!(circle.fade, 0.005);
        assert!(TextRenderer::default().text.is_empty());
    }
}
