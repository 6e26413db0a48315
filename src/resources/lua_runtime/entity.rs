//! `Entity` and component userdata exposed to Lua.
//!
//! Both hold only a handle. Every method and property access is one internal
//! call, so Lua sees the same absorption rules as native behaviors: stale
//! handles read as zero/empty and ignore writes.
//!
//! ```lua
//! local transform = entity:get_component("Transform")
//! transform.position = { x = 1, y = 2, z = 0 }
//! local body = entity:get_component("Rigidbody2D")
//! if body then body:apply_linear_impulse_to_center({ x = 1, y = 0 }, true) end
//! ```

use mlua::prelude::*;

use super::convert::*;
use crate::interop::internal_calls as ic;
use crate::scene::ComponentKind;
use crate::scripting::Entity;

/// Lua view of an entity handle. Compares equal by handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LuaEntity(pub Entity);

impl From<Entity> for LuaEntity {
    fn from(entity: Entity) -> Self {
        Self(entity)
    }
}

/// Extracts an entity handle from an `Entity` userdata. `nil` maps to the
/// invalid handle.
pub fn entity_arg(value: &LuaValue) -> LuaResult<Entity> {
    match value {
        LuaValue::Nil => Ok(Entity::INVALID),
        LuaValue::UserData(ud) => Ok(ud.borrow::<LuaEntity>()?.0),
        other => Err(LuaError::runtime(format!(
            "expected an Entity, got {}",
            other.type_name()
        ))),
    }
}

fn kind_arg(name: &str) -> LuaResult<ComponentKind> {
    match ComponentKind::from_type_name(name) {
        ComponentKind::Invalid => {
            Err(LuaError::runtime(format!("unknown component type '{}'", name)))
        }
        kind => Ok(kind),
    }
}

impl LuaUserData for LuaEntity {
    fn add_methods<M: LuaUserDataMethods<Self>>(methods: &mut M) {
        // Handles do not fit a Lua number; expose them as strings for logging.
        methods.add_method("id", |_, this, ()| Ok(this.0.id().to_string()));
        methods.add_method("is_valid", |_, this, ()| Ok(this.0.is_valid()));
        methods.add_method("name", |_, this, ()| Ok(this.0.name()));
        methods.add_method("set_name", |_, this, name: String| {
            this.0.set_name(&name);
            Ok(())
        });

        methods.add_method("has_component", |_, this, kind: String| {
            Ok(ic::entity_has_component(this.0.id(), kind_arg(&kind)?))
        });
        // :get_component(kind) - nil when the entity has no such component
        methods.add_method("get_component", |_, this, kind: String| {
            let kind = kind_arg(&kind)?;
            Ok(ic::entity_has_component(this.0.id(), kind).then_some(LuaComponent {
                entity: this.0,
                kind,
            }))
        });
        methods.add_method("add_component", |_, this, kind: String| {
            let kind = kind_arg(&kind)?;
            ic::entity_add_component(this.0.id(), kind);
            Ok(ic::entity_has_component(this.0.id(), kind).then_some(LuaComponent {
                entity: this.0,
                kind,
            }))
        });

        methods.add_method("destroy", |_, this, ()| {
            this.0.destroy();
            Ok(())
        });
        methods.add_method("parent", |_, this, ()| Ok(this.0.parent().map(LuaEntity)));
        // :set_parent(entity_or_nil) - nil detaches
        methods.add_method("set_parent", |_, this, parent: LuaValue| {
            let parent = entity_arg(&parent)?;
            this.0.set_parent((parent != Entity::INVALID).then_some(parent));
            Ok(())
        });
        methods.add_method("children", |_, this, ()| {
            Ok(this
                .0
                .children()
                .into_iter()
                .map(LuaEntity)
                .collect::<Vec<_>>())
        });

        methods.add_meta_method(LuaMetaMethod::Eq, |_, this, other: LuaValue| {
            Ok(matches!(entity_arg(&other), Ok(other) if other == this.0))
        });
        methods.add_meta_method(LuaMetaMethod::ToString, |_, this, ()| Ok(this.0.to_string()));
    }
}

/// Lua view of one component on one entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LuaComponent {
    pub entity: Entity,
    pub kind: ComponentKind,
}

impl LuaComponent {
    fn get(&self, lua: &Lua, key: &str) -> LuaResult<LuaValue> {
        use ComponentKind as K;
        let id = self.entity.id();
        let value = match (self.kind, key) {
            (_, "entity") => LuaEntity(self.entity).into_lua(lua)?,

            (K::Tag, "tag") => ic::tag_component_get_tag(id).into_lua(lua)?,

            (K::Transform, "position") => {
                let mut v = Default::default();
                ic::transform_component_get_position(id, &mut v);
                LuaValue::Table(vec3_to_lua(lua, v)?)
            }
            (K::Transform, "rotation") => {
                let mut v = Default::default();
                ic::transform_component_get_rotation(id, &mut v);
                LuaValue::Table(vec3_to_lua(lua, v)?)
            }
            (K::Transform, "scale") => {
                let mut v = Default::default();
                ic::transform_component_get_scale(id, &mut v);
                LuaValue::Table(vec3_to_lua(lua, v)?)
            }
            (K::Transform, "up") => {
                let mut v = Default::default();
                ic::transform_component_get_up(id, &mut v);
                LuaValue::Table(vec3_to_lua(lua, v)?)
            }
            (K::Transform, "right") => {
                let mut v = Default::default();
                ic::transform_component_get_right(id, &mut v);
                LuaValue::Table(vec3_to_lua(lua, v)?)
            }
            (K::Transform, "forward") => {
                let mut v = Default::default();
                ic::transform_component_get_forward(id, &mut v);
                LuaValue::Table(vec3_to_lua(lua, v)?)
            }

            (K::SpriteRenderer, "color") => {
                let mut v = Default::default();
                ic::sprite_renderer_component_get_color(id, &mut v);
                LuaValue::Table(vec4_to_lua(lua, v)?)
            }
            (K::SpriteRenderer, "tiling_factor") => {
                ic::sprite_renderer_component_get_tiling_factor(id).into_lua(lua)?
            }

            (K::CircleRenderer, "color") => {
                let mut v = Default::default();
                ic::circle_renderer_component_get_color(id, &mut v);
                LuaValue::Table(vec4_to_lua(lua, v)?)
            }
            (K::CircleRenderer, "radius") => ic::circle_renderer_component_get_radius(id).into_lua(lua)?,
            (K::CircleRenderer, "thickness") => {
                ic::circle_renderer_component_get_thickness(id).into_lua(lua)?
            }
            (K::CircleRenderer, "fade") => ic::circle_renderer_component_get_fade(id).into_lua(lua)?,

            (K::TextRenderer, "text") => ic::text_renderer_component_get_text(id).into_lua(lua)?,
            (K::TextRenderer, "color") => {
                let mut v = Default::default();
                ic::text_renderer_component_get_color(id, &mut v);
                LuaValue::Table(vec4_to_lua(lua, v)?)
            }
            (K::TextRenderer, "kerning") => ic::text_renderer_component_get_kerning(id).into_lua(lua)?,
            (K::TextRenderer, "line_spacing") => {
                ic::text_renderer_component_get_line_spacing(id).into_lua(lua)?
            }

            (K::Camera, "orthographic_size") => {
                ic::camera_component_get_orthographic_size(id).into_lua(lua)?
            }
            (K::Camera, "primary") => ic::camera_component_get_primary(id).into_lua(lua)?,

            (K::Script, "class_name") => ic::script_component_get_class_name(id).into_lua(lua)?,

            (K::Rigidbody2D, "type") => {
                body_type_name(ic::rigidbody2d_component_get_type(id)).into_lua(lua)?
            }
            (K::Rigidbody2D, "linear_velocity") => {
                let mut v = Default::default();
                ic::rigidbody2d_component_get_linear_velocity(id, &mut v);
                LuaValue::Table(vec2_to_lua(lua, v)?)
            }
            (K::Rigidbody2D, "angular_velocity") => {
                ic::rigidbody2d_component_get_angular_velocity(id).into_lua(lua)?
            }
            (K::Rigidbody2D, "gravity_scale") => {
                ic::rigidbody2d_component_get_gravity_scale(id).into_lua(lua)?
            }
            (K::Rigidbody2D, "fixed_rotation") => {
                ic::rigidbody2d_component_get_fixed_rotation(id).into_lua(lua)?
            }
            (K::Rigidbody2D, "awake") => ic::rigidbody2d_component_is_awake(id).into_lua(lua)?,

            (K::BoxCollider2D, "offset") => {
                let mut v = Default::default();
                ic::box_collider2d_component_get_offset(id, &mut v);
                LuaValue::Table(vec2_to_lua(lua, v)?)
            }
            (K::BoxCollider2D, "size") => {
                let mut v = Default::default();
                ic::box_collider2d_component_get_size(id, &mut v);
                LuaValue::Table(vec2_to_lua(lua, v)?)
            }
            (K::BoxCollider2D, "is_sensor") => ic::box_collider2d_component_is_sensor(id).into_lua(lua)?,

            (K::CircleCollider2D, "offset") => {
                let mut v = Default::default();
                ic::circle_collider2d_component_get_offset(id, &mut v);
                LuaValue::Table(vec2_to_lua(lua, v)?)
            }
            (K::CircleCollider2D, "radius") => {
                ic::circle_collider2d_component_get_radius(id).into_lua(lua)?
            }
            (K::CircleCollider2D, "is_sensor") => {
                ic::circle_collider2d_component_is_sensor(id).into_lua(lua)?
            }

            (K::AudioSource, "clip") => ic::audio_source_component_get_clip(id).into_lua(lua)?,
            (K::AudioSource, "volume") => ic::audio_source_component_get_volume(id).into_lua(lua)?,
            (K::AudioSource, "pitch") => ic::audio_source_component_get_pitch(id).into_lua(lua)?,
            (K::AudioSource, "looping") => ic::audio_source_component_get_looping(id).into_lua(lua)?,
            (K::AudioSource, "is_playing") => {
                ic::audio_source_component_is_playing(id).into_lua(lua)?
            }

            (K::UiImage, "color") => {
                let mut v = Default::default();
                ic::ui_image_component_get_color(id, &mut v);
                LuaValue::Table(vec4_to_lua(lua, v)?)
            }
            (K::UiCircle, "color") => {
                let mut v = Default::default();
                ic::ui_circle_component_get_color(id, &mut v);
                LuaValue::Table(vec4_to_lua(lua, v)?)
            }
            (K::UiText, "text") => ic::ui_text_component_get_text(id).into_lua(lua)?,
            (K::UiText, "color") => {
                let mut v = Default::default();
                ic::ui_text_component_get_color(id, &mut v);
                LuaValue::Table(vec4_to_lua(lua, v)?)
            }

            _ => LuaValue::Nil,
        };
        Ok(value)
    }

    fn set(&self, lua: &Lua, key: &str, value: LuaValue) -> LuaResult<()> {
        use ComponentKind as K;
        let id = self.entity.id();
        match (self.kind, key) {
            (K::Tag, "tag") => ic::tag_component_set_tag(id, &lua.unpack::<String>(value)?),

            (K::Transform, "position") => {
                ic::transform_component_set_position(id, &lua_to_vec3(&expect_table(value, key)?)?)
            }
            (K::Transform, "rotation") => {
                ic::transform_component_set_rotation(id, &lua_to_vec3(&expect_table(value, key)?)?)
            }
            (K::Transform, "scale") => {
                ic::transform_component_set_scale(id, &lua_to_vec3(&expect_table(value, key)?)?)
            }

            (K::SpriteRenderer, "color") => ic::sprite_renderer_component_set_color(
                id,
                &lua_to_vec4(&expect_table(value, key)?)?,
            ),
            (K::SpriteRenderer, "tiling_factor") => {
                ic::sprite_renderer_component_set_tiling_factor(id, lua.unpack(value)?)
            }

            (K::CircleRenderer, "color") => ic::circle_renderer_component_set_color(
                id,
                &lua_to_vec4(&expect_table(value, key)?)?,
            ),
            (K::CircleRenderer, "radius") => {
                ic::circle_renderer_component_set_radius(id, lua.unpack(value)?)
            }
            (K::CircleRenderer, "thickness") => {
                ic::circle_renderer_component_set_thickness(id, lua.unpack(value)?)
            }
            (K::CircleRenderer, "fade") => ic::circle_renderer_component_set_fade(id, lua.unpack(value)?),

            (K::TextRenderer, "text") => {
                ic::text_renderer_component_set_text(id, &lua.unpack::<String>(value)?)
            }
            (K::TextRenderer, "color") => ic::text_renderer_component_set_color(
                id,
                &lua_to_vec4(&expect_table(value, key)?)?,
            ),
            (K::TextRenderer, "kerning") => {
                ic::text_renderer_component_set_kerning(id, lua.unpack(value)?)
            }
            (K::TextRenderer, "line_spacing") => {
                ic::text_renderer_component_set_line_spacing(id, lua.unpack(value)?)
            }

            (K::Camera, "orthographic_size") => {
                ic::camera_component_set_orthographic_size(id, lua.unpack(value)?)
            }
            (K::Camera, "primary") => ic::camera_component_set_primary(id, lua.unpack(value)?),

            (K::Script, "class_name") => {
                ic::script_component_set_class_name(id, &lua.unpack::<String>(value)?)
            }

            (K::Rigidbody2D, "type") => {
                ic::rigidbody2d_component_set_type(id, parse_body_type(&lua.unpack::<String>(value)?)?)
            }
            (K::Rigidbody2D, "linear_velocity") => ic::rigidbody2d_component_set_linear_velocity(
                id,
                &lua_to_vec2(&expect_table(value, key)?)?,
            ),
            (K::Rigidbody2D, "angular_velocity") => {
                ic::rigidbody2d_component_set_angular_velocity(id, lua.unpack(value)?)
            }
            (K::Rigidbody2D, "gravity_scale") => {
                ic::rigidbody2d_component_set_gravity_scale(id, lua.unpack(value)?)
            }
            (K::Rigidbody2D, "fixed_rotation") => {
                ic::rigidbody2d_component_set_fixed_rotation(id, lua.unpack(value)?)
            }
            (K::Rigidbody2D, "awake") => ic::rigidbody2d_component_set_awake(id, lua.unpack(value)?),

            (K::BoxCollider2D, "offset") => ic::box_collider2d_component_set_offset(
                id,
                &lua_to_vec2(&expect_table(value, key)?)?,
            ),
            (K::BoxCollider2D, "size") => ic::box_collider2d_component_set_size(
                id,
                &lua_to_vec2(&expect_table(value, key)?)?,
            ),
            (K::BoxCollider2D, "is_sensor") => {
                ic::box_collider2d_component_set_sensor(id, lua.unpack(value)?)
            }

            (K::CircleCollider2D, "offset") => ic::circle_collider2d_component_set_offset(
                id,
                &lua_to_vec2(&expect_table(value, key)?)?,
            ),
            (K::CircleCollider2D, "radius") => {
                ic::circle_collider2d_component_set_radius(id, lua.unpack(value)?)
            }
            (K::CircleCollider2D, "is_sensor") => {
                ic::circle_collider2d_component_set_sensor(id, lua.unpack(value)?)
            }

            (K::AudioSource, "clip") => {
                ic::audio_source_component_set_clip(id, &lua.unpack::<String>(value)?)
            }
            (K::AudioSource, "volume") => ic::audio_source_component_set_volume(id, lua.unpack(value)?),
            (K::AudioSource, "pitch") => ic::audio_source_component_set_pitch(id, lua.unpack(value)?),
            (K::AudioSource, "looping") => {
                ic::audio_source_component_set_looping(id, lua.unpack(value)?)
            }

            (K::UiImage, "color") => ic::ui_image_component_set_color(
                id,
                &lua_to_vec4(&expect_table(value, key)?)?,
            ),
            (K::UiCircle, "color") => ic::ui_circle_component_set_color(
                id,
                &lua_to_vec4(&expect_table(value, key)?)?,
            ),
            (K::UiText, "text") => ic::ui_text_component_set_text(id, &lua.unpack::<String>(value)?),
            (K::UiText, "color") => ic::ui_text_component_set_color(
                id,
                &lua_to_vec4(&expect_table(value, key)?)?,
            ),

            _ => {
                return Err(LuaError::runtime(format!(
                    "{} has no writable property '{}'",
                    self.kind, key
                )));
            }
        }
        Ok(())
    }
}

impl LuaUserData for LuaComponent {
    fn add_methods<M: LuaUserDataMethods<Self>>(methods: &mut M) {
        // Rigidbody2D commands; they take effect on the next physics step.
        methods.add_method(
            "apply_linear_impulse",
            |_, this, (impulse, point, wake): (LuaTable, LuaTable, bool)| {
                ic::rigidbody2d_component_apply_linear_impulse(
                    this.entity.id(),
                    &lua_to_vec2(&impulse)?,
                    &lua_to_vec2(&point)?,
                    wake,
                );
                Ok(())
            },
        );
        methods.add_method(
            "apply_linear_impulse_to_center",
            |_, this, (impulse, wake): (LuaTable, bool)| {
                ic::rigidbody2d_component_apply_linear_impulse_to_center(
                    this.entity.id(),
                    &lua_to_vec2(&impulse)?,
                    wake,
                );
                Ok(())
            },
        );
        methods.add_method(
            "apply_force",
            |_, this, (force, point, wake): (LuaTable, LuaTable, bool)| {
                ic::rigidbody2d_component_apply_force(
                    this.entity.id(),
                    &lua_to_vec2(&force)?,
                    &lua_to_vec2(&point)?,
                    wake,
                );
                Ok(())
            },
        );
        methods.add_method(
            "apply_force_to_center",
            |_, this, (force, wake): (LuaTable, bool)| {
                ic::rigidbody2d_component_apply_force_to_center(
                    this.entity.id(),
                    &lua_to_vec2(&force)?,
                    wake,
                );
                Ok(())
            },
        );

        // AudioSource playback
        methods.add_method("play", |_, this, ()| {
            ic::audio_source_component_play(this.entity.id());
            Ok(())
        });
        methods.add_method("stop", |_, this, ()| {
            ic::audio_source_component_stop(this.entity.id());
            Ok(())
        });

        methods.add_meta_method(LuaMetaMethod::Index, |lua, this, key: String| this.get(lua, &key));
        methods.add_meta_method(
            LuaMetaMethod::NewIndex,
            |lua, this, (key, value): (String, LuaValue)| this.set(lua, &key, value),
        );
        methods.add_meta_method(LuaMetaMethod::ToString, |_, this, ()| {
            Ok(format!("{}({})", this.kind, this.entity.id()))
        });
    }
}
