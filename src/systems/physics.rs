//! Rigid body integration.
//!
//! One call of [`rigidbody_step`] advances every [`Rigidbody2D`] by
//! `WorldTime::delta` using semi-implicit Euler:
//!
//! 1. queued impulses change velocity (`v += J / m`, `w += (r x J) / I`)
//! 2. queued forces and scaled gravity accelerate the body
//! 3. the transform moves by the new velocity
//!
//! Static bodies never move. Kinematic bodies move with their velocity and
//! ignore gravity, forces and impulses. Sleeping dynamic bodies are skipped.

use bevy_ecs::prelude::*;
use glam::Vec2;

use crate::components::colliders::{BoxCollider2D, CircleCollider2D};
use crate::components::rigidbody2d::{BodyType, PendingCommand, Rigidbody2D};
use crate::components::transform::Transform;
use crate::resources::physics::PhysicsSettings;
use crate::resources::worldtime::WorldTime;

/// Mass properties derived from the attached colliders.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MassData {
    pub mass: f32,
    /// Rotational inertia about the center of mass. Zero disables rotation.
    pub inertia: f32,
    /// Center of mass relative to the body position.
    pub center: Vec2,
}

impl Default for MassData {
    fn default() -> Self {
        Self {
            mass: 1.0,
            inertia: 0.0,
            center: Vec2::ZERO,
        }
    }
}

/// Computes mass from collider density and area.
///
/// A body without colliders, or with zero total mass, gets unit mass and no
/// rotational inertia.
pub fn mass_data(
    transform: &Transform,
    boxc: Option<&BoxCollider2D>,
    circle: Option<&CircleCollider2D>,
) -> MassData {
    let scale = transform.scale.truncate().abs();
    // (mass, center, inertia about own center)
    let mut parts: [Option<(f32, Vec2, f32)>; 2] = [None, None];

    if let Some(b) = boxc {
        let half = b.size * scale;
        let mass = b.density * 4.0 * half.x * half.y;
        let inertia = mass * (half.x * half.x + half.y * half.y) / 3.0;
        parts[0] = Some((mass, b.offset, inertia));
    }
    if let Some(c) = circle {
        let radius = c.radius * scale.x;
        let mass = c.density * std::f32::consts::PI * radius * radius;
        let inertia = 0.5 * mass * radius * radius;
        parts[1] = Some((mass, c.offset, inertia));
    }

    let total: f32 = parts.iter().flatten().map(|p| p.0).sum();
    if total <= 0.0 {
        return MassData::default();
    }
    let center = parts
        .iter()
        .flatten()
        .fold(Vec2::ZERO, |acc, p| acc + p.1 * p.0)
        / total;
    let inertia = parts
        .iter()
        .flatten()
        .map(|p| p.2 + p.0 * (p.1 - center).length_squared())
        .sum();

    MassData {
        mass: total,
        inertia,
        center,
    }
}

fn cross(a: Vec2, b: Vec2) -> f32 {
    a.x * b.y - a.y * b.x
}

/// Integrate all rigid bodies by one step.
pub fn rigidbody_step(
    time: Res<WorldTime>,
    settings: Res<PhysicsSettings>,
    mut query: Query<(
        &mut Transform,
        &mut Rigidbody2D,
        Option<&BoxCollider2D>,
        Option<&CircleCollider2D>,
    )>,
) {
    let dt = time.delta;

    for (mut transform, mut body, boxc, circle) in query.iter_mut() {
        match body.body_type {
            BodyType::Static => {
                body.pending.clear();
                continue;
            }
            BodyType::Kinematic => {
                body.pending.clear();
            }
            BodyType::Dynamic => {
                if !body.awake {
                    continue;
                }
                let mass = mass_data(&transform, boxc, circle);
                let center = transform.position.truncate() + mass.center;
                let can_rotate = !body.fixed_rotation && mass.inertia > 0.0;

                let mut force = settings.gravity * body.gravity_scale * mass.mass;
                let mut torque = 0.0;
                for cmd in body.take_pending() {
                    match cmd {
                        PendingCommand::Impulse { impulse, point } => {
                            body.linear_velocity += impulse / mass.mass;
                            if let (Some(p), true) = (point, can_rotate) {
                                body.angular_velocity += cross(p - center, impulse) / mass.inertia;
                            }
                        }
                        PendingCommand::Force { force: f, point } => {
                            force += f;
                            if let Some(p) = point {
                                torque += cross(p - center, f);
                            }
                        }
                    }
                }

                body.linear_velocity += force / mass.mass * dt;
                if can_rotate {
                    body.angular_velocity += torque / mass.inertia * dt;
                } else {
                    body.angular_velocity = 0.0;
                }
            }
        }

        let v = body.linear_velocity;
        transform.position.x += v.x * dt;
        transform.position.y += v.y * dt;
        if !body.fixed_rotation {
            transform.rotation.z += body.angular_velocity * dt;
        }
    }
}
