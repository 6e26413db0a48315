//! Component type registry.
//!
//! Every component kind scripts can ask for has a stable numeric id in
//! [`ComponentKind`]. Generic has/add/remove against the world goes through a
//! static table of monomorphized function pointers, so no type inspection
//! happens at the boundary: the kind is a plain integer.

use std::fmt;

use bevy_ecs::prelude::*;
use serde::{Deserialize, Serialize};

use crate::components::audiosource::AudioSource;
use crate::components::camera::Camera;
use crate::components::colliders::{BoxCollider2D, CircleCollider2D};
use crate::components::id::Tag;
use crate::components::renderers::{CircleRenderer, SpriteRenderer, TextRenderer};
use crate::components::rigidbody2d::Rigidbody2D;
use crate::components::script::Script;
use crate::components::transform::Transform;
use crate::components::ui::{UiCircle, UiImage, UiText};

/// Closed set of component kinds known to the bridge.
///
/// The discriminants are part of the boundary contract and must not change.
#[repr(u32)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ComponentKind {
    /// Sentinel that never resolves to a component.
    Invalid = 0,
    Tag = 1,
    Transform = 2,
    SpriteRenderer = 3,
    CircleRenderer = 4,
    TextRenderer = 5,
    Camera = 6,
    Script = 7,
    Rigidbody2D = 8,
    BoxCollider2D = 9,
    CircleCollider2D = 10,
    AudioSource = 11,
    UiImage = 12,
    UiCircle = 13,
    UiText = 14,
}

/// Storage operations for one native component type.
pub struct NativeComponentOps {
    pub has: fn(&World, Entity) -> bool,
    /// Inserts the default value. Callers check `has` first.
    pub add: fn(&mut World, Entity),
    pub remove: fn(&mut World, Entity),
}

fn has_native<C: Component>(world: &World, entity: Entity) -> bool {
    world.get::<C>(entity).is_some()
}

fn add_native<C: Component + Default>(world: &mut World, entity: Entity) {
    if let Ok(mut e) = world.get_entity_mut(entity) {
        e.insert(C::default());
    }
}

fn remove_native<C: Component>(world: &mut World, entity: Entity) {
    if let Ok(mut e) = world.get_entity_mut(entity) {
        e.remove::<C>();
    }
}

const fn ops<C: Component + Default>() -> NativeComponentOps {
    NativeComponentOps {
        has: has_native::<C>,
        add: add_native::<C>,
        remove: remove_native::<C>,
    }
}

/// Indexed by `kind id - 1`.
static NATIVE_OPS: [NativeComponentOps; 14] = [
    ops::<Tag>(),
    ops::<Transform>(),
    ops::<SpriteRenderer>(),
    ops::<CircleRenderer>(),
    ops::<TextRenderer>(),
    ops::<Camera>(),
    ops::<Script>(),
    ops::<Rigidbody2D>(),
    ops::<BoxCollider2D>(),
    ops::<CircleCollider2D>(),
    ops::<AudioSource>(),
    ops::<UiImage>(),
    ops::<UiCircle>(),
    ops::<UiText>(),
];

impl ComponentKind {
    /// Every kind except [`ComponentKind::Invalid`], in id order.
    pub const ALL: [ComponentKind; 14] = [
        ComponentKind::Tag,
        ComponentKind::Transform,
        ComponentKind::SpriteRenderer,
        ComponentKind::CircleRenderer,
        ComponentKind::TextRenderer,
        ComponentKind::Camera,
        ComponentKind::Script,
        ComponentKind::Rigidbody2D,
        ComponentKind::BoxCollider2D,
        ComponentKind::CircleCollider2D,
        ComponentKind::AudioSource,
        ComponentKind::UiImage,
        ComponentKind::UiCircle,
        ComponentKind::UiText,
    ];

    pub fn id(self) -> u32 {
        self as u32
    }

    /// Unknown ids map to [`ComponentKind::Invalid`].
    pub fn from_id(id: u32) -> Self {
        match id {
            1..=14 => Self::ALL[id as usize - 1],
            _ => ComponentKind::Invalid,
        }
    }

    /// Script-facing type name, e.g. `"TransformComponent"`.
    pub fn type_name(self) -> &'static str {
        match self {
            ComponentKind::Invalid => "Invalid",
            ComponentKind::Tag => "TagComponent",
            ComponentKind::Transform => "TransformComponent",
            ComponentKind::SpriteRenderer => "SpriteRendererComponent",
            ComponentKind::CircleRenderer => "CircleRendererComponent",
            ComponentKind::TextRenderer => "TextRendererComponent",
            ComponentKind::Camera => "CameraComponent",
            ComponentKind::Script => "ScriptComponent",
            ComponentKind::Rigidbody2D => "Rigidbody2DComponent",
            ComponentKind::BoxCollider2D => "BoxCollider2DComponent",
            ComponentKind::CircleCollider2D => "CircleCollider2DComponent",
            ComponentKind::AudioSource => "AudioSourceComponent",
            ComponentKind::UiImage => "UIImageComponent",
            ComponentKind::UiCircle => "UICircleComponent",
            ComponentKind::UiText => "UITextComponent",
        }
    }

    /// Resolves a type name with or without the `Component` suffix.
    pub fn from_type_name(name: &str) -> Self {
        let wanted = name.strip_suffix("Component").unwrap_or(name);
        Self::ALL
            .into_iter()
            .find(|kind| {
                let full = kind.type_name();
                full.strip_suffix("Component").unwrap_or(full) == wanted
            })
            .unwrap_or(ComponentKind::Invalid)
    }

    /// Storage operations, or `None` for [`ComponentKind::Invalid`].
    pub fn native_ops(self) -> Option<&'static NativeComponentOps> {
        match self {
            ComponentKind::Invalid => None,
            kind => NATIVE_OPS.get(kind.id() as usize - 1),
        }
    }

    /// Kinds every scene entity carries from creation on.
    pub fn is_intrinsic(self) -> bool {
        matches!(self, ComponentKind::Tag | ComponentKind::Transform)
    }
}

impl fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_name())
    }
}
