//! Contact transitions produced by the physics step.

use bevy_ecs::message::Message;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ContactPhase {
    Begin,
    End,
}

/// A pair of entities started or stopped touching.
///
/// When `sensor` is set the contact is delivered to behaviors as a trigger,
/// otherwise as a collision. Both participants receive it.
#[derive(Message, Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContactEvent {
    pub a: u64,
    pub b: u64,
    pub phase: ContactPhase,
    pub sensor: bool,
}

impl ContactEvent {
    /// The participant that is not `id`.
    pub fn other(&self, id: u64) -> u64 {
        if self.a == id { self.b } else { self.a }
    }
}
