//! Physics world settings and contact bookkeeping.

use bevy_ecs::prelude::*;
use glam::Vec2;
use rustc_hash::FxHashSet;

use crate::events::contact::{ContactEvent, ContactPhase};

/// Global physics parameters.
#[derive(Resource, Clone, Copy, Debug, PartialEq)]
pub struct PhysicsSettings {
    pub gravity: Vec2,
}

impl Default for PhysicsSettings {
    fn default() -> Self {
        Self {
            gravity: Vec2::new(0.0, -9.8),
        }
    }
}

/// One touching pair: both handles with the smaller first, and whether the
/// overlap is between a sensor and another shape.
pub type ContactKey = (u64, u64, bool);

/// Remembers which entity pairs were touching after the last step so that
/// begin and end transitions can be reported exactly once.
///
/// Sensor overlaps and solid overlaps of the same pair are tracked as two
/// separate contacts, so a pair can be in a trigger and a collision at once.
#[derive(Resource, Debug, Default)]
pub struct ContactTracker {
    active: FxHashSet<ContactKey>,
}

impl ContactTracker {
    pub fn key(a: u64, b: u64) -> (u64, u64) {
        if a <= b { (a, b) } else { (b, a) }
    }

    /// Whether the pair touches in any way, sensor or solid.
    pub fn is_touching(&self, a: u64, b: u64) -> bool {
        let (a, b) = Self::key(a, b);
        self.active.contains(&(a, b, true)) || self.active.contains(&(a, b, false))
    }

    /// Replaces the active set with `current` and returns the transitions.
    pub fn update(&mut self, current: FxHashSet<ContactKey>) -> Vec<ContactEvent> {
        let begun = current
            .difference(&self.active)
            .map(|&key| transition(key, ContactPhase::Begin));
        let ended = self
            .active
            .difference(&current)
            .map(|&key| transition(key, ContactPhase::End));
        let mut events: Vec<ContactEvent> = begun.chain(ended).collect();
        // Hash order is arbitrary; keep dispatch reproducible.
        events.sort_by_key(|e| (e.phase, e.a, e.b, e.sensor));
        self.active = current;
        events
    }

    /// Forgets every contact involving `id` and returns them as end
    /// transitions, in the same order [`ContactTracker::update`] uses.
    pub fn forget(&mut self, id: u64) -> Vec<ContactEvent> {
        let mut events = Vec::new();
        self.active.retain(|&(a, b, sensor)| {
            if a != id && b != id {
                return true;
            }
            events.push(transition((a, b, sensor), ContactPhase::End));
            false
        });
        events.sort_by_key(|e| (e.a, e.b, e.sensor));
        events
    }
}

fn transition((a, b, sensor): ContactKey, phase: ContactPhase) -> ContactEvent {
    ContactEvent {
        a,
        b,
        sensor,
        phase,
    }
}
