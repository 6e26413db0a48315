//! 2D collision shapes attached to rigid bodies.
//!
//! Shapes are axis aligned: entity rotation does not rotate them. Extents are
//! multiplied by the transform scale, offsets are not.

use bevy_ecs::prelude::Component;
use glam::Vec2;

/// Box shape. `size` holds half extents.
#[derive(Component, Clone, Copy, Debug, PartialEq)]
pub struct BoxCollider2D {
    pub offset: Vec2,
    pub size: Vec2,
    pub density: f32,
    pub friction: f32,
    pub restitution: f32,
    pub restitution_threshold: f32,
    /// Sensors report trigger contacts instead of collisions.
    pub is_sensor: bool,
}

impl Default for BoxCollider2D {
    fn default() -> Self {
        Self {
            offset: Vec2::ZERO,
            size: Vec2::splat(0.5),
            density: 1.0,
            friction: 0.5,
            restitution: 0.0,
            restitution_threshold: 0.5,
            is_sensor: false,
        }
    }
}

#[derive(Component, Clone, Copy, Debug, PartialEq)]
pub struct CircleCollider2D {
    pub offset: Vec2,
    pub radius: f32,
    pub density: f32,
    pub friction: f32,
    pub restitution: f32,
    pub restitution_threshold: f32,
    pub is_sensor: bool,
}

impl Default for CircleCollider2D {
    fn default() -> Self {
        Self {
            offset: Vec2::ZERO,
            radius: 0.5,
            density: 1.0,
            friction: 0.5,
            restitution: 0.0,
            restitution_threshold: 0.5,
            is_sensor: false,
        }
    }
}
