//! Stable identity components every scene entity carries.
//!
//! [`EntityId`] is the 64-bit handle scripts see. It never changes for the
//! lifetime of the entity and `0` is reserved as the invalid handle.
//! [`Tag`] is the human readable name used by name lookup.

use bevy_ecs::prelude::Component;

/// The handle value no live entity ever receives.
pub const INVALID_ENTITY_ID: u64 = 0;

/// 64-bit handle exposed across the scripting boundary.
#[derive(Component, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct EntityId(pub u64);

impl EntityId {
    pub fn is_valid(&self) -> bool {
        self.0 != INVALID_ENTITY_ID
    }
}

/// Display name of an entity. Not required to be unique.
#[derive(Component, Clone, Debug, Default, PartialEq, Eq)]
pub struct Tag(pub String);

impl Tag {
    /// Name given to entities created with an empty name.
    pub const DEFAULT_NAME: &'static str = "Entity";

    /// Creates a tag, substituting [`Tag::DEFAULT_NAME`] for an empty name.
    pub fn new(name: &str) -> Self {
        if name.is_empty() {
            Self(Self::DEFAULT_NAME.to_string())
        } else {
            Self(name.to_string())
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}
