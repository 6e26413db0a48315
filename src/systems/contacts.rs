//! Overlap detection between collider shapes.
//!
//! [`detect_contacts`] tests every pair of rigid bodies that carry a
//! collider, updates the [`ContactTracker`] and writes a [`ContactEvent`] for
//! each pair that started or stopped touching. Sensor and solid overlaps of
//! one pair are separate contacts. Pairs without a dynamic body
//! are never tested.

use bevy_ecs::prelude::*;
use glam::Vec2;
use rustc_hash::FxHashSet;
use smallvec::SmallVec;

use crate::components::colliders::{BoxCollider2D, CircleCollider2D};
use crate::components::id::EntityId;
use crate::components::rigidbody2d::{BodyType, Rigidbody2D};
use crate::components::transform::Transform;
use crate::events::contact::ContactEvent;
use crate::resources::physics::{ContactKey, ContactTracker};

/// A collider resolved into world space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Shape {
    Aabb { center: Vec2, half: Vec2, sensor: bool },
    Circle { center: Vec2, radius: f32, sensor: bool },
}

impl Shape {
    pub fn is_sensor(&self) -> bool {
        match *self {
            Shape::Aabb { sensor, .. } | Shape::Circle { sensor, .. } => sensor,
        }
    }

    pub fn overlaps(&self, other: &Shape) -> bool {
        match (*self, *other) {
            (Shape::Aabb { center: ca, half: ha, .. }, Shape::Aabb { center: cb, half: hb, .. }) => {
                let d = (ca - cb).abs();
                d.x < ha.x + hb.x && d.y < ha.y + hb.y
            }
            (
                Shape::Circle { center: ca, radius: ra, .. },
                Shape::Circle { center: cb, radius: rb, .. },
            ) => ca.distance_squared(cb) < (ra + rb) * (ra + rb),
            (Shape::Aabb { center, half, .. }, Shape::Circle { center: cc, radius, .. })
            | (Shape::Circle { center: cc, radius, .. }, Shape::Aabb { center, half, .. }) => {
                let closest = cc.clamp(center - half, center + half);
                closest.distance_squared(cc) < radius * radius
            }
        }
    }
}

/// World-space shapes of one entity.
pub fn shapes_of(
    transform: &Transform,
    boxc: Option<&BoxCollider2D>,
    circle: Option<&CircleCollider2D>,
) -> SmallVec<[Shape; 2]> {
    let position = transform.position.truncate();
    let scale = transform.scale.truncate().abs();
    let mut shapes = SmallVec::new();
    if let Some(b) = boxc {
        shapes.push(Shape::Aabb {
            center: position + b.offset,
            half: b.size * scale,
            sensor: b.is_sensor,
        });
    }
    if let Some(c) = circle {
        shapes.push(Shape::Circle {
            center: position + c.offset,
            radius: c.radius * scale.x,
            sensor: c.is_sensor,
        });
    }
    shapes
}

type ColliderQuery<'w, 's> = Query<
    'w,
    's,
    (
        &'static EntityId,
        &'static Transform,
        &'static Rigidbody2D,
        Option<&'static BoxCollider2D>,
        Option<&'static CircleCollider2D>,
    ),
>;

/// Detect overlapping collider pairs and emit begin/end contact events.
pub fn detect_contacts(
    query: ColliderQuery,
    mut tracker: ResMut<ContactTracker>,
    mut writer: MessageWriter<ContactEvent>,
) {
    let mut current: FxHashSet<ContactKey> = FxHashSet::default();

    for [(id_a, t_a, body_a, box_a, circle_a), (id_b, t_b, body_b, box_b, circle_b)] in
        query.iter_combinations()
    {
        if body_a.body_type != BodyType::Dynamic && body_b.body_type != BodyType::Dynamic {
            continue;
        }
        let shapes_a = shapes_of(t_a, box_a, circle_a);
        if shapes_a.is_empty() {
            continue;
        }
        let shapes_b = shapes_of(t_b, box_b, circle_b);

        let (a, b) = ContactTracker::key(id_a.0, id_b.0);
        for sa in &shapes_a {
            for sb in &shapes_b {
                if sa.overlaps(sb) {
                    current.insert((a, b, sa.is_sensor() || sb.is_sensor()));
                }
            }
        }
    }

    writer.write_batch(tracker.update(current));
}
