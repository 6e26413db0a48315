//! Typed component views.
//!
//! A view holds nothing but its owning [`Entity`]. Every property access is
//! one internal call, so a view never goes stale: once the entity or the
//! component is gone, getters return zero/empty values and setters do nothing.

use super::entity::Entity;
use crate::components::rigidbody2d::BodyType;
use crate::interop::internal_calls as ic;
use crate::math::{Vector2, Vector3, Vector4};
use crate::scene::ComponentKind;

/// Implemented by every view type. `KIND` ties the view to its registry entry.
pub trait ComponentView: Sized {
    const KIND: ComponentKind;

    /// Binds a view to `entity` without checking the component exists.
    /// Use [`Entity::get_component`] to get a checked view.
    fn bind(entity: Entity) -> Self;

    fn entity(&self) -> Entity;
}

macro_rules! component_view {
    ($(#[$meta:meta])* $name:ident, $kind:expr) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub struct $name {
            entity: Entity,
        }

        impl ComponentView for $name {
            const KIND: ComponentKind = $kind;

            fn bind(entity: Entity) -> Self {
                Self { entity }
            }

            fn entity(&self) -> Entity {
                self.entity
            }
        }
    };
}

/// `get`/`set` pair for a vector property read through an out-parameter.
macro_rules! vector_property {
    ($get:ident, $set:ident, $ty:ty, $ic_get:path, $ic_set:path) => {
        pub fn $get(&self) -> $ty {
            let mut out = <$ty>::ZERO;
            $ic_get(self.entity.id(), &mut out);
            out
        }

        pub fn $set(&self, value: $ty) {
            $ic_set(self.entity.id(), &value);
        }
    };
}

macro_rules! value_property {
    ($get:ident, $set:ident, $ty:ty, $ic_get:path, $ic_set:path) => {
        pub fn $get(&self) -> $ty {
            $ic_get(self.entity.id())
        }

        pub fn $set(&self, value: $ty) {
            $ic_set(self.entity.id(), value);
        }
    };
}

macro_rules! text_property {
    ($get:ident, $set:ident, $ic_get:path, $ic_set:path) => {
        pub fn $get(&self) -> String {
            $ic_get(self.entity.id())
        }

        pub fn $set(&self, value: &str) {
            $ic_set(self.entity.id(), value);
        }
    };
}

// ==================== Tag / Transform ====================

component_view!(TagComponent, ComponentKind::Tag);

impl TagComponent {
    text_property!(tag, set_tag, ic::tag_component_get_tag, ic::tag_component_set_tag);
}

component_view!(
    /// Position, Euler rotation in radians, and scale.
    TransformComponent,
    ComponentKind::Transform
);

impl TransformComponent {
    vector_property!(position, set_position, Vector3,
        ic::transform_component_get_position, ic::transform_component_set_position);
    vector_property!(rotation, set_rotation, Vector3,
        ic::transform_component_get_rotation, ic::transform_component_set_rotation);
    vector_property!(scale, set_scale, Vector3,
        ic::transform_component_get_scale, ic::transform_component_set_scale);

    pub fn up(&self) -> Vector3 {
        let mut out = Vector3::ZERO;
        ic::transform_component_get_up(self.entity.id(), &mut out);
        out
    }

    pub fn right(&self) -> Vector3 {
        let mut out = Vector3::ZERO;
        ic::transform_component_get_right(self.entity.id(), &mut out);
        out
    }

    pub fn forward(&self) -> Vector3 {
        let mut out = Vector3::ZERO;
        ic::transform_component_get_forward(self.entity.id(), &mut out);
        out
    }

    /// Moves by `delta` with a single read and write.
    pub fn translate(&self, delta: Vector3) {
        self.set_position(self.position() + delta);
    }
}

// ==================== Renderers ====================

component_view!(SpriteRendererComponent, ComponentKind::SpriteRenderer);

impl SpriteRendererComponent {
    vector_property!(color, set_color, Vector4,
        ic::sprite_renderer_component_get_color, ic::sprite_renderer_component_set_color);
    value_property!(tiling_factor, set_tiling_factor, f32,
        ic::sprite_renderer_component_get_tiling_factor,
        ic::sprite_renderer_component_set_tiling_factor);
}

component_view!(CircleRendererComponent, ComponentKind::CircleRenderer);

impl CircleRendererComponent {
    vector_property!(color, set_color, Vector4,
        ic::circle_renderer_component_get_color, ic::circle_renderer_component_set_color);
    value_property!(radius, set_radius, f32,
        ic::circle_renderer_component_get_radius, ic::circle_renderer_component_set_radius);
    value_property!(thickness, set_thickness, f32,
        ic::circle_renderer_component_get_thickness, ic::circle_renderer_component_set_thickness);
    value_property!(fade, set_fade, f32,
        ic::circle_renderer_component_get_fade, ic::circle_renderer_component_set_fade);
}

component_view!(TextRendererComponent, ComponentKind::TextRenderer);

impl TextRendererComponent {
    text_property!(text, set_text,
        ic::text_renderer_component_get_text, ic::text_renderer_component_set_text);
    vector_property!(color, set_color, Vector4,
        ic::text_renderer_component_get_color, ic::text_renderer_component_set_color);
    value_property!(kerning, set_kerning, f32,
        ic::text_renderer_component_get_kerning, ic::text_renderer_component_set_kerning);
    value_property!(line_spacing, set_line_spacing, f32,
        ic::text_renderer_component_get_line_spacing,
        ic::text_renderer_component_set_line_spacing);
}

// ==================== UI ====================

component_view!(UiImageComponent, ComponentKind::UiImage);

impl UiImageComponent {
    vector_property!(color, set_color, Vector4,
        ic::ui_image_component_get_color, ic::ui_image_component_set_color);
    value_property!(tiling_factor, set_tiling_factor, f32,
        ic::ui_image_component_get_tiling_factor, ic::ui_image_component_set_tiling_factor);
}

component_view!(UiCircleComponent, ComponentKind::UiCircle);

impl UiCircleComponent {
    vector_property!(color, set_color, Vector4,
        ic::ui_circle_component_get_color, ic::ui_circle_component_set_color);
    value_property!(thickness, set_thickness, f32,
        ic::ui_circle_component_get_thickness, ic::ui_circle_component_set_thickness);
    value_property!(fade, set_fade, f32,
        ic::ui_circle_component_get_fade, ic::ui_circle_component_set_fade);
}

component_view!(UiTextComponent, ComponentKind::UiText);

impl UiTextComponent {
    text_property!(text, set_text, ic::ui_text_component_get_text, ic::ui_text_component_set_text);
    vector_property!(color, set_color, Vector4,
        ic::ui_text_component_get_color, ic::ui_text_component_set_color);
    value_property!(kerning, set_kerning, f32,
        ic::ui_text_component_get_kerning, ic::ui_text_component_set_kerning);
    value_property!(line_spacing, set_line_spacing, f32,
        ic::ui_text_component_get_line_spacing, ic::ui_text_component_set_line_spacing);
}

// ==================== Camera / Script ====================

component_view!(CameraComponent, ComponentKind::Camera);

impl CameraComponent {
    value_property!(orthographic_size, set_orthographic_size, f32,
        ic::camera_component_get_orthographic_size, ic::camera_component_set_orthographic_size);
    value_property!(primary, set_primary, bool,
        ic::camera_component_get_primary, ic::camera_component_set_primary);
    value_property!(fixed_aspect_ratio, set_fixed_aspect_ratio, bool,
        ic::camera_component_get_fixed_aspect_ratio,
        ic::camera_component_set_fixed_aspect_ratio);
}

component_view!(ScriptComponent, ComponentKind::Script);

impl ScriptComponent {
    text_property!(class_name, set_class_name,
        ic::script_component_get_class_name, ic::script_component_set_class_name);
}

// ==================== Physics ====================

component_view!(
    /// 2D rigid body. The `apply_*` methods queue commands that the next
    /// physics step consumes; they do not change velocity immediately.
    Rigidbody2DComponent,
    ComponentKind::Rigidbody2D
);

impl Rigidbody2DComponent {
    value_property!(body_type, set_body_type, BodyType,
        ic::rigidbody2d_component_get_type, ic::rigidbody2d_component_set_type);
    vector_property!(linear_velocity, set_linear_velocity, Vector2,
        ic::rigidbody2d_component_get_linear_velocity,
        ic::rigidbody2d_component_set_linear_velocity);
    value_property!(angular_velocity, set_angular_velocity, f32,
        ic::rigidbody2d_component_get_angular_velocity,
        ic::rigidbody2d_component_set_angular_velocity);
    value_property!(gravity_scale, set_gravity_scale, f32,
        ic::rigidbody2d_component_get_gravity_scale, ic::rigidbody2d_component_set_gravity_scale);
    value_property!(fixed_rotation, set_fixed_rotation, bool,
        ic::rigidbody2d_component_get_fixed_rotation,
        ic::rigidbody2d_component_set_fixed_rotation);
    value_property!(is_awake, set_awake, bool,
        ic::rigidbody2d_component_is_awake, ic::rigidbody2d_component_set_awake);

    pub fn apply_linear_impulse(&self, impulse: Vector2, world_position: Vector2, wake: bool) {
        ic::rigidbody2d_component_apply_linear_impulse(
            self.entity.id(),
            &impulse,
            &world_position,
            wake,
        );
    }

    pub fn apply_linear_impulse_to_center(&self, impulse: Vector2, wake: bool) {
        ic::rigidbody2d_component_apply_linear_impulse_to_center(self.entity.id(), &impulse, wake);
    }

    pub fn apply_force(&self, force: Vector2, world_position: Vector2, wake: bool) {
        ic::rigidbody2d_component_apply_force(self.entity.id(), &force, &world_position, wake);
    }

    pub fn apply_force_to_center(&self, force: Vector2, wake: bool) {
        ic::rigidbody2d_component_apply_force_to_center(self.entity.id(), &force, wake);
    }
}

component_view!(BoxCollider2DComponent, ComponentKind::BoxCollider2D);

impl BoxCollider2DComponent {
    vector_property!(offset, set_offset, Vector2,
        ic::box_collider2d_component_get_offset, ic::box_collider2d_component_set_offset);
    vector_property!(size, set_size, Vector2,
        ic::box_collider2d_component_get_size, ic::box_collider2d_component_set_size);
    value_property!(density, set_density, f32,
        ic::box_collider2d_component_get_density, ic::box_collider2d_component_set_density);
    value_property!(friction, set_friction, f32,
        ic::box_collider2d_component_get_friction, ic::box_collider2d_component_set_friction);
    value_property!(restitution, set_restitution, f32,
        ic::box_collider2d_component_get_restitution,
        ic::box_collider2d_component_set_restitution);
    value_property!(restitution_threshold, set_restitution_threshold, f32,
        ic::box_collider2d_component_get_restitution_threshold,
        ic::box_collider2d_component_set_restitution_threshold);
    value_property!(is_sensor, set_sensor, bool,
        ic::box_collider2d_component_is_sensor, ic::box_collider2d_component_set_sensor);
}

component_view!(CircleCollider2DComponent, ComponentKind::CircleCollider2D);

impl CircleCollider2DComponent {
    vector_property!(offset, set_offset, Vector2,
        ic::circle_collider2d_component_get_offset, ic::circle_collider2d_component_set_offset);
    value_property!(radius, set_radius, f32,
        ic::circle_collider2d_component_get_radius, ic::circle_collider2d_component_set_radius);
    value_property!(density, set_density, f32,
        ic::circle_collider2d_component_get_density, ic::circle_collider2d_component_set_density);
    value_property!(friction, set_friction, f32,
        ic::circle_collider2d_component_get_friction,
        ic::circle_collider2d_component_set_friction);
    value_property!(restitution, set_restitution, f32,
        ic::circle_collider2d_component_get_restitution,
        ic::circle_collider2d_component_set_restitution);
    value_property!(restitution_threshold, set_restitution_threshold, f32,
        ic::circle_collider2d_component_get_restitution_threshold,
        ic::circle_collider2d_component_set_restitution_threshold);
    value_property!(is_sensor, set_sensor, bool,
        ic::circle_collider2d_component_is_sensor, ic::circle_collider2d_component_set_sensor);
}

// ==================== Audio ====================

component_view!(AudioSourceComponent, ComponentKind::AudioSource);

impl AudioSourceComponent {
    text_property!(clip, set_clip,
        ic::audio_source_component_get_clip, ic::audio_source_component_set_clip);
    value_property!(volume, set_volume, f32,
        ic::audio_source_component_get_volume, ic::audio_source_component_set_volume);
    value_property!(pitch, set_pitch, f32,
        ic::audio_source_component_get_pitch, ic::audio_source_component_set_pitch);
    value_property!(looping, set_looping, bool,
        ic::audio_source_component_get_looping, ic::audio_source_component_set_looping);
    value_property!(auto_play_on_start, set_auto_play_on_start, bool,
        ic::audio_source_component_get_auto_play_on_start,
        ic::audio_source_component_set_auto_play_on_start);

    pub fn play(&self) {
        ic::audio_source_component_play(self.entity.id());
    }

    pub fn stop(&self) {
        ic::audio_source_component_stop(self.entity.id());
    }

    pub fn is_playing(&self) -> bool {
        ic::audio_source_component_is_playing(self.entity.id())
    }
}
