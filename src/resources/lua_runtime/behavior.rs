//! Adapter that runs a Lua class as a [`Behavior`].
//!
//! A Lua class is a table of methods; each scripted entity gets its own
//! instance table copied from it. Callbacks are looked up by name on the
//! instance and called as `instance:on_update(entity, seconds)`, so a class
//! only defines the callbacks it cares about.
//!
//! ```lua
//! local Spinner = { speed = 90.0 }
//!
//! function Spinner:on_update(entity, dt)
//!     local t = entity:get_component("Transform")
//!     local r = t.rotation
//!     r.z = r.z + self.speed * dt
//!     t.rotation = r
//! end
//!
//! return Spinner
//! ```

use std::rc::Rc;

use mlua::prelude::*;

use super::convert::*;
use super::entity::{LuaEntity, entity_arg};
use super::runtime::LuaRuntime;
use crate::interop::Physics2DContact;
use crate::scripting::{
    Behavior, Entity, ScriptError, ScriptField, ScriptFieldValue, ScriptResult, Timestep,
};

pub struct LuaBehavior {
    runtime: Rc<LuaRuntime>,
    class_name: String,
    instance: Result<LuaTable, String>,
}

impl LuaBehavior {
    /// Instantiates `class_name`. A failed instantiation is kept and
    /// reported from `on_create`.
    pub fn new(runtime: Rc<LuaRuntime>, class_name: &str) -> Self {
        let instance = runtime
            .instantiate(class_name)
            .map_err(|err| err.to_string());
        Self {
            runtime,
            class_name: class_name.to_string(),
            instance,
        }
    }

    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    /// The instance table, if instantiation succeeded.
    pub fn instance(&self) -> Option<&LuaTable> {
        self.instance.as_ref().ok()
    }

    fn method(&self, name: &str) -> ScriptResult<Option<(LuaTable, LuaFunction)>> {
        let Ok(instance) = &self.instance else {
            return Ok(None);
        };
        match instance.get::<LuaValue>(name)? {
            LuaValue::Function(f) => Ok(Some((instance.clone(), f))),
            LuaValue::Nil => Ok(None),
            other => Err(ScriptError::Lua(format!(
                "{}.{} is a {}, not a function",
                self.class_name,
                name,
                other.type_name()
            ))),
        }
    }

    fn call(&self, name: &str, args: impl IntoLuaMulti) -> ScriptResult {
        if let Some((this, f)) = self.method(name)? {
            f.call::<()>((this, args))?;
        }
        Ok(())
    }

    fn call_contact(&self, name: &str, entity: Entity, contact: Physics2DContact) -> ScriptResult {
        self.call(
            name,
            (LuaEntity(entity), contact.other_entity().map(LuaEntity)),
        )
    }
}

fn field_value(value: &LuaValue) -> Option<ScriptFieldValue> {
    match value {
        LuaValue::Boolean(b) => Some(ScriptFieldValue::Bool(*b)),
        LuaValue::Integer(i) => Some(ScriptFieldValue::Long(*i)),
        LuaValue::Number(n) => Some(ScriptFieldValue::Double(*n)),
        LuaValue::String(s) => Some(ScriptFieldValue::String(s.to_string_lossy().to_string())),
        LuaValue::Table(t) => {
            let has = |key: &str| t.contains_key(key).unwrap_or(false);
            match (has("x") && has("y"), has("z"), has("w")) {
                (true, true, true) => lua_to_vec4(t).ok().map(ScriptFieldValue::Vector4),
                (true, true, false) => lua_to_vec3(t).ok().map(ScriptFieldValue::Vector3),
                (true, false, false) => lua_to_vec2(t).ok().map(ScriptFieldValue::Vector2),
                _ => None,
            }
        }
        LuaValue::UserData(_) => entity_arg(value)
            .ok()
            .map(|entity| ScriptFieldValue::Entity(entity.id())),
        _ => None,
    }
}

fn to_lua_value(lua: &Lua, value: &ScriptFieldValue) -> LuaResult<LuaValue> {
    Ok(match value {
        ScriptFieldValue::Float(v) => LuaValue::Number(*v as f64),
        ScriptFieldValue::Double(v) => LuaValue::Number(*v),
        ScriptFieldValue::Bool(v) => LuaValue::Boolean(*v),
        ScriptFieldValue::Char(c) => c.to_string().into_lua(lua)?,
        ScriptFieldValue::String(s) => s.as_str().into_lua(lua)?,
        ScriptFieldValue::Byte(v) => LuaValue::Number(*v as f64),
        ScriptFieldValue::Short(v) => LuaValue::Number(*v as f64),
        ScriptFieldValue::Int(v) => LuaValue::Number(*v as f64),
        ScriptFieldValue::Long(v) => LuaValue::Number(*v as f64),
        ScriptFieldValue::UByte(v) => LuaValue::Number(*v as f64),
        ScriptFieldValue::UShort(v) => LuaValue::Number(*v as f64),
        ScriptFieldValue::UInt(v) => LuaValue::Number(*v as f64),
        ScriptFieldValue::ULong(v) => LuaValue::Number(*v as f64),
        ScriptFieldValue::Vector2(v) => LuaValue::Table(vec2_to_lua(lua, *v)?),
        ScriptFieldValue::Vector3(v) => LuaValue::Table(vec3_to_lua(lua, *v)?),
        ScriptFieldValue::Vector4(v) => LuaValue::Table(vec4_to_lua(lua, *v)?),
        ScriptFieldValue::Entity(id) => LuaEntity(Entity::from_id(*id)).into_lua(lua)?,
    })
}

/// Numbers are interchangeable across the boundary; everything else must
/// keep its kind.
fn same_kind(current: &LuaValue, new: &LuaValue) -> bool {
    match (current, new) {
        (
            LuaValue::Integer(_) | LuaValue::Number(_),
            LuaValue::Integer(_) | LuaValue::Number(_),
        ) => true,
        (current, new) => current.type_name() == new.type_name(),
    }
}

impl Behavior for LuaBehavior {
    fn on_create(&mut self, entity: Entity) -> ScriptResult {
        if let Err(err) = &self.instance {
            return Err(ScriptError::Lua(err.clone()));
        }
        self.call("on_create", LuaEntity(entity))
    }

    fn on_start(&mut self, entity: Entity) -> ScriptResult {
        self.call("on_start", LuaEntity(entity))
    }

    fn on_update(&mut self, entity: Entity, ts: Timestep) -> ScriptResult {
        self.call("on_update", (LuaEntity(entity), ts.seconds()))
    }

    fn on_late_update(&mut self, entity: Entity, ts: Timestep) -> ScriptResult {
        self.call("on_late_update", (LuaEntity(entity), ts.seconds()))
    }

    fn on_destroy(&mut self, entity: Entity) -> ScriptResult {
        self.call("on_destroy", LuaEntity(entity))
    }

    fn on_trigger_enter_2d(&mut self, entity: Entity, contact: Physics2DContact) -> ScriptResult {
        self.call_contact("on_trigger_enter_2d", entity, contact)
    }

    fn on_trigger_exit_2d(&mut self, entity: Entity, contact: Physics2DContact) -> ScriptResult {
        self.call_contact("on_trigger_exit_2d", entity, contact)
    }

    fn on_collision_enter_2d(&mut self, entity: Entity, contact: Physics2DContact) -> ScriptResult {
        self.call_contact("on_collision_enter_2d", entity, contact)
    }

    fn on_collision_exit_2d(&mut self, entity: Entity, contact: Physics2DContact) -> ScriptResult {
        self.call_contact("on_collision_exit_2d", entity, contact)
    }

    /// Non-function entries whose names do not start with `_`, sorted by name.
    fn fields(&self) -> Vec<ScriptField> {
        let Some(instance) = self.instance() else {
            return Vec::new();
        };
        let mut fields: Vec<ScriptField> = instance
            .pairs::<String, LuaValue>()
            .filter_map(Result::ok)
            .filter(|(name, _)| !name.starts_with('_'))
            .filter_map(|(name, value)| field_value(&value).map(|v| ScriptField::new(name, v)))
            .collect();
        fields.sort_by(|a, b| a.name.cmp(&b.name));
        fields
    }

    fn set_field(&mut self, name: &str, value: &ScriptFieldValue) -> bool {
        let Some(instance) = self.instance() else {
            return false;
        };
        let Ok(current) = instance.get::<LuaValue>(name) else {
            return false;
        };
        if matches!(current, LuaValue::Nil | LuaValue::Function(_)) {
            return false;
        }
        let Ok(new) = to_lua_value(self.runtime.lua(), value) else {
            return false;
        };
        same_kind(&current, &new) && instance.set(name, new).is_ok()
    }
}
