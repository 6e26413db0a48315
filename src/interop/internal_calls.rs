//! Internal calls: the complete set of operations scripts may perform on the
//! native scene.
//!
//! Every function is synchronous and addressed by entity handle. Getters of
//! struct values write through an `out` reference; setters take the value by
//! reference and never keep it. A stale handle, a missing component or an
//! unbound context never faults: setters and commands do nothing, getters
//! produce zero, `false`, an empty string or the invalid handle `0`.

use std::any::type_name;
use std::rc::Rc;

use bevy_ecs::component::{Component, Mutable};
use glam::{Quat, Vec2, Vec3, Vec4};
use log::{debug, error, info, trace, warn};

use super::context::{with_instances, with_scene};
use crate::components::audiosource::AudioSource;
use crate::components::camera::Camera;
use crate::components::colliders::{BoxCollider2D, CircleCollider2D};
use crate::components::id::{INVALID_ENTITY_ID, Tag};
use crate::components::renderers::{CircleRenderer, SpriteRenderer, TextRenderer};
use crate::components::rigidbody2d::{BodyType, Rigidbody2D};
use crate::components::script::Script;
use crate::components::transform::Transform;
use crate::components::ui::{UiCircle, UiImage, UiText};
use crate::events::audio::AudioCmd;
use crate::math::{Vector2, Vector3, Vector4};
use crate::scene::ComponentKind;
use crate::scripting::instance::ScriptInstance;

fn with_component<C: Component, R>(entity_id: u64, f: impl FnOnce(&C) -> R) -> Option<R> {
    let result = with_scene(|scene| scene.component::<C>(entity_id).map(f)).flatten();
    if result.is_none() {
        trace!("read of {} on entity {} absorbed", type_name::<C>(), entity_id);
    }
    result
}

fn with_component_mut<C, R>(entity_id: u64, f: impl FnOnce(&mut C) -> R) -> Option<R>
where
    C: Component<Mutability = Mutable>,
{
    let result = with_scene(|scene| {
        scene
            .component_mut::<C>(entity_id)
            .map(|mut component| f(&mut component))
    })
    .flatten();
    if result.is_none() {
        debug!("write of {} on entity {} ignored", type_name::<C>(), entity_id);
    }
    result
}

/// Getter/setter pair for a field stored as a glam vector and exchanged as a
/// boundary vector.
macro_rules! vector_field_calls {
    ($component:ty, $field:ident, $vector:ty, $get:ident, $set:ident) => {
        pub fn $get(entity_id: u64, out: &mut $vector) {
            *out = with_component::<$component, _>(entity_id, |c| <$vector>::from(c.$field))
                .unwrap_or_default();
        }

        pub fn $set(entity_id: u64, value: &$vector) {
            with_component_mut::<$component, _>(entity_id, |c| c.$field = (*value).into());
        }
    };
}

/// Getter/setter pair for a `Copy` scalar field.
macro_rules! scalar_field_calls {
    ($component:ty, $field:ident, $ty:ty, $get:ident, $set:ident) => {
        pub fn $get(entity_id: u64) -> $ty {
            with_component::<$component, _>(entity_id, |c| c.$field).unwrap_or_default()
        }

        pub fn $set(entity_id: u64, value: $ty) {
            with_component_mut::<$component, _>(entity_id, |c| c.$field = value);
        }
    };
}

/// Getter/setter pair for a `String` field.
macro_rules! text_field_calls {
    ($component:ty, $field:ident, $get:ident, $set:ident) => {
        pub fn $get(entity_id: u64) -> String {
            with_component::<$component, _>(entity_id, |c| c.$field.clone()).unwrap_or_default()
        }

        pub fn $set(entity_id: u64, value: &str) {
            with_component_mut::<$component, _>(entity_id, |c| c.$field = value.to_string());
        }
    };
}

// ==================== Log ====================

pub fn log_trace(message: &str) {
    trace!(target: "script", "{}", message);
}

pub fn log_info(message: &str) {
    info!(target: "script", "{}", message);
}

pub fn log_warn(message: &str) {
    warn!(target: "script", "{}", message);
}

pub fn log_error(message: &str) {
    error!(target: "script", "{}", message);
}

/// `log` has no level above error; critical messages get their own target.
pub fn log_critical(message: &str) {
    error!(target: "script::critical", "{}", message);
}

// ==================== Input ====================

pub fn input_is_key_pressed(key: i32) -> bool {
    with_scene(|scene| scene.input().is_key_pressed(key)).unwrap_or(false)
}

pub fn input_is_mouse_button_pressed(button: i32) -> bool {
    with_scene(|scene| scene.input().is_mouse_button_pressed(button)).unwrap_or(false)
}

pub fn input_get_mouse_position(out_x: &mut f32, out_y: &mut f32) {
    let position = with_scene(|scene| scene.input().mouse_position).unwrap_or(Vec2::ZERO);
    *out_x = position.x;
    *out_y = position.y;
}

pub fn input_get_mouse_x() -> f32 {
    with_scene(|scene| scene.input().mouse_position.x).unwrap_or(0.0)
}

pub fn input_get_mouse_y() -> f32 {
    with_scene(|scene| scene.input().mouse_position.y).unwrap_or(0.0)
}

// ==================== Random ====================
//
// Seeded variants build a fresh generator from the seed on every call, so the
// same seed always produces the same value.

fn range_float(rng: &mut fastrand::Rng, min: f32, max: f32) -> f32 {
    if !min.is_finite() || !max.is_finite() {
        return 0.0;
    }
    let (lo, hi) = if min <= max { (min, max) } else { (max, min) };
    if lo == hi {
        return lo;
    }
    let value = lo + rng.f32() * (hi - lo);
    // rounding can land exactly on the excluded bound
    if value < hi { value } else { lo }
}

fn range_int(rng: &mut fastrand::Rng, min: i32, max: i32) -> i32 {
    let (lo, hi) = if min <= max { (min, max) } else { (max, min) };
    rng.i32(lo..=hi)
}

/// Uniform in `[0, 1)`.
pub fn random_float() -> f32 {
    fastrand::f32()
}

pub fn random_float_seed(seed: u32) -> f32 {
    fastrand::Rng::with_seed(u64::from(seed)).f32()
}

/// Any `i32`.
pub fn random_int() -> i32 {
    fastrand::i32(..)
}

pub fn random_int_seed(seed: u32) -> i32 {
    fastrand::Rng::with_seed(u64::from(seed)).i32(..)
}

/// Uniform in `[min, max)`. Reversed bounds are swapped; non-finite bounds give `0`.
pub fn random_range_float(min: f32, max: f32) -> f32 {
    range_float(&mut fastrand::Rng::new(), min, max)
}

pub fn random_range_float_seed(min: f32, max: f32, seed: u32) -> f32 {
    range_float(&mut fastrand::Rng::with_seed(u64::from(seed)), min, max)
}

/// Uniform in `[min, max]`. Reversed bounds are swapped.
pub fn random_range_int(min: i32, max: i32) -> i32 {
    range_int(&mut fastrand::Rng::new(), min, max)
}

pub fn random_range_int_seed(min: i32, max: i32, seed: u32) -> i32 {
    range_int(&mut fastrand::Rng::with_seed(u64::from(seed)), min, max)
}

// ==================== Entity ====================

pub fn entity_is_valid(entity_id: u64) -> bool {
    entity_id != INVALID_ENTITY_ID && with_scene(|scene| scene.contains(entity_id)).unwrap_or(false)
}

pub fn entity_get_name(entity_id: u64) -> String {
    with_component::<Tag, _>(entity_id, |tag| tag.0.clone()).unwrap_or_default()
}

pub fn entity_set_name(entity_id: u64, name: &str) {
    with_component_mut::<Tag, _>(entity_id, |tag| *tag = Tag::new(name));
}

pub fn entity_has_component(entity_id: u64, kind: ComponentKind) -> bool {
    with_scene(|scene| scene.has_component(entity_id, kind)).unwrap_or(false)
}

/// Adding a kind the entity already has is logged natively and changes nothing.
pub fn entity_add_component(entity_id: u64, kind: ComponentKind) {
    with_scene(|scene| scene.add_component(entity_id, kind));
}

/// Handle of the first entity named `name`, or `0`.
pub fn entity_find_entity_by_name(name: &str) -> u64 {
    with_scene(|scene| scene.find_entity_by_name(name))
        .flatten()
        .unwrap_or(INVALID_ENTITY_ID)
}

pub fn entity_create_entity(name: &str) -> u64 {
    with_scene(|scene| scene.create_entity(name)).unwrap_or(INVALID_ENTITY_ID)
}

/// Creates an entity with its transform already set; no other script can
/// observe it with a default transform.
pub fn entity_create_entity_with_transform(
    name: &str,
    position: &Vector3,
    rotation: &Vector3,
    scale: &Vector3,
) -> u64 {
    let transform = Transform::new((*position).into(), (*rotation).into(), (*scale).into());
    with_scene(|scene| scene.create_entity_with_transform(name, transform))
        .unwrap_or(INVALID_ENTITY_ID)
}

pub fn entity_destroy_entity(entity_id: u64) {
    with_scene(|scene| scene.destroy_entity(entity_id));
}

pub fn entity_get_parent(entity_id: u64) -> u64 {
    with_scene(|scene| scene.parent(entity_id))
        .flatten()
        .unwrap_or(INVALID_ENTITY_ID)
}

/// Reparents immediately. A parent handle of `0` detaches.
pub fn entity_set_parent(entity_id: u64, parent_id: u64) {
    let parent = (parent_id != INVALID_ENTITY_ID).then_some(parent_id);
    with_scene(|scene| scene.set_parent(entity_id, parent));
}

/// Snapshot of the direct children.
pub fn entity_get_children(entity_id: u64) -> Vec<u64> {
    with_scene(|scene| scene.children(entity_id)).unwrap_or_default()
}

pub fn entity_get_script_instance(entity_id: u64) -> Option<Rc<ScriptInstance>> {
    with_instances(|instances| instances.get(entity_id))
        .flatten()
        .filter(|instance| !instance.is_destroyed())
}

/// Resolves a contact participant: the handle if it is still alive, else `0`.
pub fn physics2d_contact_get_entity_by_id(entity_id: u64) -> u64 {
    if entity_is_valid(entity_id) {
        entity_id
    } else {
        INVALID_ENTITY_ID
    }
}

// ==================== TagComponent ====================

pub fn tag_component_get_tag(entity_id: u64) -> String {
    entity_get_name(entity_id)
}

pub fn tag_component_set_tag(entity_id: u64, tag: &str) {
    entity_set_name(entity_id, tag);
}

// ==================== TransformComponent ====================

vector_field_calls!(Transform, position, Vector3,
    transform_component_get_position, transform_component_set_position);
vector_field_calls!(Transform, rotation, Vector3,
    transform_component_get_rotation, transform_component_set_rotation);
vector_field_calls!(Transform, scale, Vector3,
    transform_component_get_scale, transform_component_set_scale);

pub fn transform_component_get_up(entity_id: u64, out: &mut Vector3) {
    *out = with_component::<Transform, _>(entity_id, |t| t.up().into()).unwrap_or_default();
}

pub fn transform_component_get_right(entity_id: u64, out: &mut Vector3) {
    *out = with_component::<Transform, _>(entity_id, |t| t.right().into()).unwrap_or_default();
}

pub fn transform_component_get_forward(entity_id: u64, out: &mut Vector3) {
    *out = with_component::<Transform, _>(entity_id, |t| t.forward().into()).unwrap_or_default();
}

// ==================== Renderers ====================

vector_field_calls!(SpriteRenderer, color, Vector4,
    sprite_renderer_component_get_color, sprite_renderer_component_set_color);
scalar_field_calls!(SpriteRenderer, tiling_factor, f32,
    sprite_renderer_component_get_tiling_factor, sprite_renderer_component_set_tiling_factor);

vector_field_calls!(CircleRenderer, color, Vector4,
    circle_renderer_component_get_color, circle_renderer_component_set_color);
scalar_field_calls!(CircleRenderer, radius, f32,
    circle_renderer_component_get_radius, circle_renderer_component_set_radius);
scalar_field_calls!(CircleRenderer, thickness, f32,
    circle_renderer_component_get_thickness, circle_renderer_component_set_thickness);
scalar_field_calls!(CircleRenderer, fade, f32,
    circle_renderer_component_get_fade, circle_renderer_component_set_fade);

text_field_calls!(TextRenderer, text,
    text_renderer_component_get_text, text_renderer_component_set_text);
vector_field_calls!(TextRenderer, color, Vector4,
    text_renderer_component_get_color, text_renderer_component_set_color);
scalar_field_calls!(TextRenderer, kerning, f32,
    text_renderer_component_get_kerning, text_renderer_component_set_kerning);
scalar_field_calls!(TextRenderer, line_spacing, f32,
    text_renderer_component_get_line_spacing, text_renderer_component_set_line_spacing);

// ==================== UI ====================

vector_field_calls!(UiImage, color, Vector4,
    ui_image_component_get_color, ui_image_component_set_color);
scalar_field_calls!(UiImage, tiling_factor, f32,
    ui_image_component_get_tiling_factor, ui_image_component_set_tiling_factor);

vector_field_calls!(UiCircle, color, Vector4,
    ui_circle_component_get_color, ui_circle_component_set_color);
scalar_field_calls!(UiCircle, thickness, f32,
    ui_circle_component_get_thickness, ui_circle_component_set_thickness);
scalar_field_calls!(UiCircle, fade, f32,
    ui_circle_component_get_fade, ui_circle_component_set_fade);

text_field_calls!(UiText, text, ui_text_component_get_text, ui_text_component_set_text);
vector_field_calls!(UiText, color, Vector4,
    ui_text_component_get_color, ui_text_component_set_color);
scalar_field_calls!(UiText, kerning, f32,
    ui_text_component_get_kerning, ui_text_component_set_kerning);
scalar_field_calls!(UiText, line_spacing, f32,
    ui_text_component_get_line_spacing, ui_text_component_set_line_spacing);

// ==================== CameraComponent ====================

scalar_field_calls!(Camera, orthographic_size, f32,
    camera_component_get_orthographic_size, camera_component_set_orthographic_size);
scalar_field_calls!(Camera, primary, bool,
    camera_component_get_primary, camera_component_set_primary);
scalar_field_calls!(Camera, fixed_aspect_ratio, bool,
    camera_component_get_fixed_aspect_ratio, camera_component_set_fixed_aspect_ratio);

// ==================== ScriptComponent ====================

text_field_calls!(Script, class_name,
    script_component_get_class_name, script_component_set_class_name);

// ==================== Rigidbody2DComponent ====================

pub fn rigidbody2d_component_get_type(entity_id: u64) -> BodyType {
    with_component::<Rigidbody2D, _>(entity_id, |body| body.body_type).unwrap_or_default()
}

/// Switching away from dynamic drops any queued impulses and forces.
pub fn rigidbody2d_component_set_type(entity_id: u64, body_type: BodyType) {
    with_component_mut::<Rigidbody2D, _>(entity_id, |body| {
        body.body_type = body_type;
        if body_type != BodyType::Dynamic {
            body.pending.clear();
        }
    });
}

vector_field_calls!(Rigidbody2D, linear_velocity, Vector2,
    rigidbody2d_component_get_linear_velocity, rigidbody2d_component_set_linear_velocity);
scalar_field_calls!(Rigidbody2D, angular_velocity, f32,
    rigidbody2d_component_get_angular_velocity, rigidbody2d_component_set_angular_velocity);
scalar_field_calls!(Rigidbody2D, gravity_scale, f32,
    rigidbody2d_component_get_gravity_scale, rigidbody2d_component_set_gravity_scale);
scalar_field_calls!(Rigidbody2D, fixed_rotation, bool,
    rigidbody2d_component_get_fixed_rotation, rigidbody2d_component_set_fixed_rotation);
scalar_field_calls!(Rigidbody2D, awake, bool,
    rigidbody2d_component_is_awake, rigidbody2d_component_set_awake);

/// Queues an impulse at a world point. Takes effect on the next physics step.
pub fn rigidbody2d_component_apply_linear_impulse(
    entity_id: u64,
    impulse: &Vector2,
    world_position: &Vector2,
    wake: bool,
) {
    with_component_mut::<Rigidbody2D, _>(entity_id, |body| {
        body.queue_impulse((*impulse).into(), Some((*world_position).into()), wake)
    });
}

pub fn rigidbody2d_component_apply_linear_impulse_to_center(
    entity_id: u64,
    impulse: &Vector2,
    wake: bool,
) {
    with_component_mut::<Rigidbody2D, _>(entity_id, |body| {
        body.queue_impulse((*impulse).into(), None, wake)
    });
}

/// Queues a force at a world point for the next physics step.
pub fn rigidbody2d_component_apply_force(
    entity_id: u64,
    force: &Vector2,
    world_position: &Vector2,
    wake: bool,
) {
    with_component_mut::<Rigidbody2D, _>(entity_id, |body| {
        body.queue_force((*force).into(), Some((*world_position).into()), wake)
    });
}

pub fn rigidbody2d_component_apply_force_to_center(entity_id: u64, force: &Vector2, wake: bool) {
    with_component_mut::<Rigidbody2D, _>(entity_id, |body| {
        body.queue_force((*force).into(), None, wake)
    });
}

// ==================== Colliders ====================

vector_field_calls!(BoxCollider2D, offset, Vector2,
    box_collider2d_component_get_offset, box_collider2d_component_set_offset);
vector_field_calls!(BoxCollider2D, size, Vector2,
    box_collider2d_component_get_size, box_collider2d_component_set_size);
scalar_field_calls!(BoxCollider2D, density, f32,
    box_collider2d_component_get_density, box_collider2d_component_set_density);
scalar_field_calls!(BoxCollider2D, friction, f32,
    box_collider2d_component_get_friction, box_collider2d_component_set_friction);
scalar_field_calls!(BoxCollider2D, restitution, f32,
    box_collider2d_component_get_restitution, box_collider2d_component_set_restitution);
scalar_field_calls!(BoxCollider2D, restitution_threshold, f32,
    box_collider2d_component_get_restitution_threshold,
    box_collider2d_component_set_restitution_threshold);
scalar_field_calls!(BoxCollider2D, is_sensor, bool,
    box_collider2d_component_is_sensor, box_collider2d_component_set_sensor);

vector_field_calls!(CircleCollider2D, offset, Vector2,
    circle_collider2d_component_get_offset, circle_collider2d_component_set_offset);
scalar_field_calls!(CircleCollider2D, radius, f32,
    circle_collider2d_component_get_radius, circle_collider2d_component_set_radius);
scalar_field_calls!(CircleCollider2D, density, f32,
    circle_collider2d_component_get_density, circle_collider2d_component_set_density);
scalar_field_calls!(CircleCollider2D, friction, f32,
    circle_collider2d_component_get_friction, circle_collider2d_component_set_friction);
scalar_field_calls!(CircleCollider2D, restitution, f32,
    circle_collider2d_component_get_restitution, circle_collider2d_component_set_restitution);
scalar_field_calls!(CircleCollider2D, restitution_threshold, f32,
    circle_collider2d_component_get_restitution_threshold,
    circle_collider2d_component_set_restitution_threshold);
scalar_field_calls!(CircleCollider2D, is_sensor, bool,
    circle_collider2d_component_is_sensor, circle_collider2d_component_set_sensor);

// ==================== AudioSourceComponent ====================

text_field_calls!(AudioSource, clip,
    audio_source_component_get_clip, audio_source_component_set_clip);
scalar_field_calls!(AudioSource, volume, f32,
    audio_source_component_get_volume, audio_source_component_set_volume);
scalar_field_calls!(AudioSource, pitch, f32,
    audio_source_component_get_pitch, audio_source_component_set_pitch);
scalar_field_calls!(AudioSource, looping, bool,
    audio_source_component_get_looping, audio_source_component_set_looping);
scalar_field_calls!(AudioSource, auto_play_on_start, bool,
    audio_source_component_get_auto_play_on_start, audio_source_component_set_auto_play_on_start);

pub fn audio_source_component_is_playing(entity_id: u64) -> bool {
    with_component::<AudioSource, _>(entity_id, |source| source.playing).unwrap_or(false)
}

/// Sends the source's clip to the audio backend. Sources without a clip are ignored.
pub fn audio_source_component_play(entity_id: u64) {
    with_scene(|scene| {
        let Some(source) = scene.component::<AudioSource>(entity_id).cloned() else {
            debug!("play ignored: entity {} has no audio source", entity_id);
            return;
        };
        if !source.has_clip() {
            warn!("audio source on entity {} has no clip", entity_id);
            return;
        }
        scene.audio().send(AudioCmd::Play {
            entity_id,
            clip: source.clip,
            volume: source.volume,
            pitch: source.pitch,
            looping: source.looping,
        });
        if let Some(mut source) = scene.component_mut::<AudioSource>(entity_id) {
            source.playing = true;
        }
    });
}

pub fn audio_source_component_stop(entity_id: u64) {
    with_scene(|scene| {
        match scene.component_mut::<AudioSource>(entity_id) {
            Some(mut source) => source.playing = false,
            None => return,
        }
        scene.audio().send(AudioCmd::Stop { entity_id });
    });
}

// ==================== AudioEngine ====================

pub fn audio_engine_get_master_volume() -> f32 {
    with_scene(|scene| scene.audio().master_volume()).unwrap_or(0.0)
}

pub fn audio_engine_set_master_volume(volume: f32) {
    with_scene(|scene| scene.audio_mut().set_master_volume(volume));
}

pub fn audio_engine_is_master_volume_muted() -> bool {
    with_scene(|scene| scene.audio().is_muted()).unwrap_or(false)
}

pub fn audio_engine_set_master_volume_muted(muted: bool) {
    with_scene(|scene| scene.audio_mut().set_muted(muted));
}

pub fn audio_engine_toggle_mute_master_volume() {
    with_scene(|scene| scene.audio_mut().toggle_mute());
}

// ==================== Vector math ====================
//
// Computed with the same glam routines the native side uses, so both sides
// agree bit for bit.

pub fn vector2_magnitude(vector: &Vector2) -> f32 {
    Vec2::from(*vector).length()
}

pub fn vector2_sqr_magnitude(vector: &Vector2) -> f32 {
    Vec2::from(*vector).length_squared()
}

pub fn vector2_normalize(vector: &mut Vector2) {
    *vector = Vec2::from(*vector).normalize_or_zero().into();
}

pub fn vector3_magnitude(vector: &Vector3) -> f32 {
    Vec3::from(*vector).length()
}

pub fn vector3_sqr_magnitude(vector: &Vector3) -> f32 {
    Vec3::from(*vector).length_squared()
}

pub fn vector3_normalize(vector: &mut Vector3) {
    *vector = Vec3::from(*vector).normalize_or_zero().into();
}

fn axis_rotation(angle: f32, axis: &Vector3) -> Option<Quat> {
    let axis = Vec3::from(*axis).normalize_or_zero();
    (axis != Vec3::ZERO).then(|| Quat::from_axis_angle(axis, angle))
}

/// A zero axis leaves the vector unchanged.
pub fn vector3_rotate_around_axis(vector: &mut Vector3, angle: f32, axis: &Vector3) {
    if let Some(rotation) = axis_rotation(angle, axis) {
        *vector = (rotation * Vec3::from(*vector)).into();
    }
}

pub fn vector4_magnitude(vector: &Vector4) -> f32 {
    Vec4::from(*vector).length()
}

pub fn vector4_sqr_magnitude(vector: &Vector4) -> f32 {
    Vec4::from(*vector).length_squared()
}

pub fn vector4_normalize(vector: &mut Vector4) {
    *vector = Vec4::from(*vector).normalize_or_zero().into();
}

/// Rotates `xyz`; `w` is kept.
pub fn vector4_rotate_around_axis(vector: &mut Vector4, angle: f32, axis: &Vector3) {
    if let Some(rotation) = axis_rotation(angle, axis) {
        let xyz = rotation * Vec3::new(vector.x, vector.y, vector.z);
        *vector = Vector4::new(xyz.x, xyz.y, xyz.z, vector.w);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interop::context::{ScriptContext, bind};
    use crate::scene::Scene;

    const EPSILON: f32 = 1e-6;

    fn approx_eq(a: f32, b: f32) -> bool {
        (a - b).abs() < EPSILON
    }

    // ==================== Random ====================

    #[test]
    fn test_seeded_random_is_deterministic() {
        let a: Vec<i32> = (0..10).map(|_| random_range_int_seed(1, 100, 1234)).collect();
        let b: Vec<i32> = (0..10).map(|_| random_range_int_seed(1, 100, 1234)).collect();
        assert_eq!(a, b);
        assert_eq!(random_float_seed(7), random_float_seed(7));
        assert_eq!(random_int_seed(7), random_int_seed(7));
    }

    #[test]
    fn test_random_ranges() {
        for _ in 0..200 {
            let f = random_range_float(2.0, 3.0);
            assert!((2.0..3.0).contains(&f));
            let i = random_range_int(1, 3);
            assert!((1..=3).contains(&i));
            let u = random_float();
            assert!((0.0..1.0).contains(&u));
        }
    }

    #[test]
    fn test_random_reversed_and_degenerate_bounds() {
        let f = random_range_float_seed(10.0, 5.0, 3);
        assert!((5.0..10.0).contains(&f));
        let i = random_range_int_seed(10, 5, 3);
        assert!((5..=10).contains(&i));
        assert_eq!(random_range_float(f32::NAN, 1.0), 0.0);
        assert_eq!(random_range_float(1.0, f32::INFINITY), 0.0);
        assert_eq!(random_range_float(4.0, 4.0), 4.0);
        assert_eq!(random_range_int(4, 4), 4);
    }

    // ==================== Stale handles ====================

    #[test]
    fn test_calls_without_context_are_absorbed() {
        let mut out = Vector3::ONE;
        transform_component_get_position(42, &mut out);
        assert_eq!(out, Vector3::ZERO);
        transform_component_set_position(42, &Vector3::ONE);
        assert_eq!(entity_create_entity("x"), 0);
        assert!(!entity_is_valid(42));
        assert!(entity_get_name(42).is_empty());
        assert!(!input_is_key_pressed(32));
    }

    #[test]
    fn test_stale_handle_reads_zero() {
        let context = ScriptContext::new(Scene::new("stale"));
        let _guard = bind(&context);
        let id = entity_create_entity("Doomed");
        entity_add_component(id, ComponentKind::SpriteRenderer);
        let mut color = Vector4::ZERO;
        sprite_renderer_component_get_color(id, &mut color);
        assert_eq!(color, Vector4::ONE);

        entity_destroy_entity(id);
        assert!(!entity_is_valid(id));
        sprite_renderer_component_get_color(id, &mut color);
        assert_eq!(color, Vector4::ZERO);
        assert_eq!(sprite_renderer_component_get_tiling_factor(id), 0.0);
        assert_eq!(physics2d_contact_get_entity_by_id(id), 0);
        sprite_renderer_component_set_tiling_factor(id, 3.0);
    }

    // ==================== Entity ====================

    #[test]
    fn test_create_with_transform_is_atomic() {
        let context = ScriptContext::new(Scene::new("create"));
        let _guard = bind(&context);
        let id = entity_create_entity_with_transform(
            "Enemy",
            &Vector3::new(1.0, 2.0, 3.0),
            &Vector3::ZERO,
            &Vector3::splat(2.0),
        );
        let mut position = Vector3::ZERO;
        transform_component_get_position(id, &mut position);
        assert_eq!(position, Vector3::new(1.0, 2.0, 3.0));
        let mut scale = Vector3::ZERO;
        transform_component_get_scale(id, &mut scale);
        assert_eq!(scale, Vector3::splat(2.0));
        assert_eq!(entity_get_name(id), "Enemy");
    }

    #[test]
    fn test_parent_round_trip() {
        let context = ScriptContext::new(Scene::new("family"));
        let _guard = bind(&context);
        let parent = entity_create_entity("parent");
        let child = entity_create_entity("child");
        entity_set_parent(child, parent);
        assert_eq!(entity_get_parent(child), parent);
        assert_eq!(entity_get_children(parent), vec![child]);
        entity_set_parent(child, 0);
        assert_eq!(entity_get_parent(child), 0);
    }

    #[test]
    fn test_find_missing_returns_invalid() {
        let context = ScriptContext::new(Scene::new("find"));
        let _guard = bind(&context);
        assert_eq!(entity_find_entity_by_name("DoesNotExist"), 0);
    }

    // ==================== Components ====================

    #[test]
    fn test_rigidbody_type_change_clears_queue() {
        let context = ScriptContext::new(Scene::new("body"));
        let _guard = bind(&context);
        let id = entity_create_entity("body");
        entity_add_component(id, ComponentKind::Rigidbody2D);
        rigidbody2d_component_set_type(id, BodyType::Dynamic);
        rigidbody2d_component_apply_linear_impulse_to_center(id, &Vector2::RIGHT, true);
        assert_eq!(
            context.scene().component::<Rigidbody2D>(id).unwrap().pending.len(),
            1
        );
        rigidbody2d_component_set_type(id, BodyType::Static);
        assert!(context.scene().component::<Rigidbody2D>(id).unwrap().pending.is_empty());
    }

    #[test]
    fn test_audio_play_requires_clip() {
        let context = ScriptContext::new(Scene::new("audio"));
        let _guard = bind(&context);
        let id = entity_create_entity("speaker");
        entity_add_component(id, ComponentKind::AudioSource);
        audio_source_component_play(id);
        assert!(!audio_source_component_is_playing(id));
        audio_source_component_set_clip(id, "theme");
        audio_source_component_play(id);
        assert!(audio_source_component_is_playing(id));
        audio_source_component_stop(id);
        assert!(!audio_source_component_is_playing(id));
    }

    #[test]
    fn test_master_volume_calls() {
        let context = ScriptContext::new(Scene::new("volume"));
        let _guard = bind(&context);
        audio_engine_set_master_volume(0.5);
        assert!(approx_eq(audio_engine_get_master_volume(), 0.5));
        audio_engine_toggle_mute_master_volume();
        assert!(audio_engine_is_master_volume_muted());
        audio_engine_set_master_volume_muted(false);
        assert!(!audio_engine_is_master_volume_muted());
    }

    // ==================== Vector math ====================

    #[test]
    fn test_rotate_with_zero_axis_is_noop() {
        let mut v = Vector3::new(1.0, 2.0, 3.0);
        vector3_rotate_around_axis(&mut v, 1.0, &Vector3::ZERO);
        assert_eq!(v, Vector3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn test_magnitude_matches_glam() {
        let v = Vector3::new(1.0, 2.0, 2.0);
        assert!(approx_eq(vector3_magnitude(&v), 3.0));
        assert_eq!(vector3_magnitude(&v), Vec3::new(1.0, 2.0, 2.0).length());
    }
}
