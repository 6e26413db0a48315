//! Marks an entity as driven by a script class.

use bevy_ecs::prelude::Component;

/// Name of the behavior class instantiated for this entity at runtime start.
///
/// An empty class name leaves the entity without an instance.
#[derive(Component, Clone, Debug, Default, PartialEq, Eq)]
pub struct Script {
    pub class_name: String,
}

impl Script {
    pub fn new(class_name: impl Into<String>) -> Self {
        Self {
            class_name: class_name.into(),
        }
    }
}

/// Marker for entities scheduled for removal at the end of the frame.
#[derive(Component, Clone, Copy, Debug, Default)]
pub struct PendingDestroy;
