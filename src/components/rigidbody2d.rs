//! 2D rigid body simulated by the physics step.
//!
//! Scripts never move bodies directly through forces: impulses and forces are
//! queued on the component and consumed by
//! [`rigidbody_step`](crate::systems::physics::rigidbody_step) on the next
//! physics step. Velocity writes take effect immediately.

use bevy_ecs::prelude::Component;
use glam::Vec2;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// How the physics step treats a body.
#[repr(i32)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BodyType {
    /// Never moves.
    #[default]
    Static = 0,
    /// Affected by gravity, forces and impulses.
    Dynamic = 1,
    /// Moves with its velocity only.
    Kinematic = 2,
}

impl BodyType {
    /// Maps a boundary value back to a body type. Unknown values become `Static`.
    pub fn from_i32(value: i32) -> Self {
        match value {
            1 => BodyType::Dynamic,
            2 => BodyType::Kinematic,
            _ => BodyType::Static,
        }
    }
}

/// A velocity change waiting for the next physics step.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PendingCommand {
    /// Instant momentum change. `point` is in world space; `None` means the center of mass.
    Impulse { impulse: Vec2, point: Option<Vec2> },
    /// Force applied for the duration of one step.
    Force { force: Vec2, point: Option<Vec2> },
}

#[derive(Component, Clone, Debug, PartialEq)]
pub struct Rigidbody2D {
    pub body_type: BodyType,
    pub linear_velocity: Vec2,
    /// Radians per second around Z.
    pub angular_velocity: f32,
    pub gravity_scale: f32,
    pub fixed_rotation: bool,
    /// Sleeping bodies are skipped by the physics step.
    pub awake: bool,
    pub pending: SmallVec<[PendingCommand; 4]>,
}

impl Default for Rigidbody2D {
    fn default() -> Self {
        Self {
            body_type: BodyType::Static,
            linear_velocity: Vec2::ZERO,
            angular_velocity: 0.0,
            gravity_scale: 1.0,
            fixed_rotation: false,
            awake: true,
            pending: SmallVec::new(),
        }
    }
}

impl Rigidbody2D {
    pub fn new(body_type: BodyType) -> Self {
        Self {
            body_type,
            ..Default::default()
        }
    }

    /// Queues an impulse. Only dynamic bodies accept it.
    ///
    /// With `wake` the body is woken first; without it a sleeping body
    /// ignores the impulse.
    pub fn queue_impulse(&mut self, impulse: Vec2, point: Option<Vec2>, wake: bool) {
        if self.accepts(wake) {
            self.pending.push(PendingCommand::Impulse { impulse, point });
        }
    }

    /// Queues a force. Same acceptance rules as [`Rigidbody2D::queue_impulse`].
    pub fn queue_force(&mut self, force: Vec2, point: Option<Vec2>, wake: bool) {
        if self.accepts(wake) {
            self.pending.push(PendingCommand::Force { force, point });
        }
    }

    pub fn take_pending(&mut self) -> SmallVec<[PendingCommand; 4]> {
        std::mem::take(&mut self.pending)
    }

    fn accepts(&mut self, wake: bool) -> bool {
        if self.body_type != BodyType::Dynamic {
            return false;
        }
        if wake {
            self.awake = true;
        }
        self.awake
    }
}
