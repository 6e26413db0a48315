//! Lua interpreter state and the global `engine` table.
//!
//! `engine` carries the static facades (log, input, random, audio) plus entity
//! lookup and creation. Everything else is reached through the `Entity`
//! userdata handed to each callback.

use std::cell::RefCell;
use std::path::Path;
use std::rc::Rc;

use log::{error, info, warn};
use mlua::prelude::*;
use rustc_hash::FxHashMap;

use super::behavior::LuaBehavior;
use super::convert::*;
use super::entity::LuaEntity;
use crate::interop::internal_calls as ic;
use crate::math::Vector3;
use crate::scripting::{Entity, KeyCode, MouseCode, ScriptRegistry};

/// Owns the Lua state and the loaded script classes.
///
/// Not `Send`: the Lua state and the script context live on the frame thread.
pub struct LuaRuntime {
    lua: Lua,
    classes: RefCell<FxHashMap<String, LuaTable>>,
}

/// Registers a Lua function on `engine` whose body is a single expression.
macro_rules! register_fn {
    ($engine:expr, $lua:expr, $name:expr, |$args:pat_param| $arg_ty:ty, $body:expr) => {
        $engine.set(
            $name,
            $lua.create_function(|_, $args: $arg_ty| Ok($body))?,
        )?;
    };
}

const KEY_NAMES: &[(&str, KeyCode)] = &[
    ("space", KeyCode::Space),
    ("escape", KeyCode::Escape),
    ("enter", KeyCode::Enter),
    ("tab", KeyCode::Tab),
    ("backspace", KeyCode::Backspace),
    ("right", KeyCode::Right),
    ("left", KeyCode::Left),
    ("down", KeyCode::Down),
    ("up", KeyCode::Up),
    ("left_shift", KeyCode::LeftShift),
    ("left_control", KeyCode::LeftControl),
    ("left_alt", KeyCode::LeftAlt),
    ("right_shift", KeyCode::RightShift),
    ("right_control", KeyCode::RightControl),
    ("right_alt", KeyCode::RightAlt),
    ("f1", KeyCode::F1),
    ("f12", KeyCode::F12),
];

const MOUSE_NAMES: &[(&str, MouseCode)] = &[
    ("left", MouseCode::Left),
    ("right", MouseCode::Right),
    ("middle", MouseCode::Middle),
];

impl LuaRuntime {
    /// Creates a runtime whose `require` path points at `./assets/scripts`.
    ///
    /// # Errors
    ///
    /// Returns an error if Lua initialization or API registration fails.
    pub fn new() -> LuaResult<Self> {
        Self::with_script_dir("./assets/scripts")
    }

    pub fn with_script_dir(dir: impl AsRef<Path>) -> LuaResult<Self> {
        let lua = Lua::new();

        let dir = dir.as_ref().display().to_string();
        let package: LuaTable = lua.globals().get("package")?;
        let path: String = package.get("path")?;
        package.set("path", format!("{dir}/?.lua;{dir}/?/init.lua;{path}"))?;

        let runtime = Self {
            lua,
            classes: RefCell::new(FxHashMap::default()),
        };
        let engine = runtime.lua.create_table()?;
        runtime.register_log_api(&engine)?;
        runtime.register_input_api(&engine)?;
        runtime.register_random_api(&engine)?;
        runtime.register_entity_api(&engine)?;
        runtime.register_audio_api(&engine)?;
        runtime.lua.globals().set("engine", engine)?;
        Ok(runtime)
    }

    fn register_log_api(&self, engine: &LuaTable) -> LuaResult<()> {
        let lua = &self.lua;
        register_fn!(engine, lua, "log", |msg| String, ic::log_info(&msg));
        register_fn!(engine, lua, "log_trace", |msg| String, ic::log_trace(&msg));
        register_fn!(engine, lua, "log_info", |msg| String, ic::log_info(&msg));
        register_fn!(engine, lua, "log_warn", |msg| String, ic::log_warn(&msg));
        register_fn!(engine, lua, "log_error", |msg| String, ic::log_error(&msg));
        register_fn!(engine, lua, "log_critical", |msg| String, ic::log_critical(&msg));
        Ok(())
    }

    fn register_input_api(&self, engine: &LuaTable) -> LuaResult<()> {
        let lua = &self.lua;
        register_fn!(engine, lua, "is_key_pressed", |key| i32, ic::input_is_key_pressed(key));
        register_fn!(engine, lua, "is_mouse_button_pressed", |button| i32,
            ic::input_is_mouse_button_pressed(button));
        // engine.mouse_position() -> x, y
        register_fn!(engine, lua, "mouse_position", |()| (), {
            let (mut x, mut y) = (0.0, 0.0);
            ic::input_get_mouse_position(&mut x, &mut y);
            (x, y)
        });
        register_fn!(engine, lua, "mouse_x", |()| (), ic::input_get_mouse_x());
        register_fn!(engine, lua, "mouse_y", |()| (), ic::input_get_mouse_y());

        // engine.key.a .. engine.key.z, engine.key.d0 .. engine.key.d9, named keys
        let keys = lua.create_table()?;
        for (i, letter) in ('a'..='z').enumerate() {
            keys.set(letter.to_string(), KeyCode::A.code() + i as i32)?;
        }
        for digit in 0..10 {
            keys.set(format!("d{digit}"), KeyCode::D0.code() + digit)?;
        }
        for (name, key) in KEY_NAMES {
            keys.set(*name, key.code())?;
        }
        engine.set("key", keys)?;

        let mouse = lua.create_table()?;
        for (name, button) in MOUSE_NAMES {
            mouse.set(*name, button.code())?;
        }
        engine.set("mouse", mouse)?;
        Ok(())
    }

    /// Every random function takes an optional trailing seed.
    fn register_random_api(&self, engine: &LuaTable) -> LuaResult<()> {
        let lua = &self.lua;
        register_fn!(engine, lua, "random_float", |seed| Option<u32>, match seed {
            Some(seed) => ic::random_float_seed(seed),
            None => ic::random_float(),
        });
        register_fn!(engine, lua, "random_int", |seed| Option<u32>, match seed {
            Some(seed) => ic::random_int_seed(seed),
            None => ic::random_int(),
        });
        register_fn!(engine, lua, "random_range_float", |(min, max, seed)| (f32, f32, Option<u32>),
            match seed {
                Some(seed) => ic::random_range_float_seed(min, max, seed),
                None => ic::random_range_float(min, max),
            });
        register_fn!(engine, lua, "random_range_int", |(min, max, seed)| (i32, i32, Option<u32>),
            match seed {
                Some(seed) => ic::random_range_int_seed(min, max, seed),
                None => ic::random_range_int(min, max),
            });
        Ok(())
    }

    fn register_entity_api(&self, engine: &LuaTable) -> LuaResult<()> {
        let lua = &self.lua;
        // engine.find_entity_by_name(name) -> Entity or nil
        register_fn!(engine, lua, "find_entity_by_name", |name| String,
            Entity::find_entity_by_name(&name).map(LuaEntity));

        // engine.create_entity(name, position?, rotation?, scale?) -> Entity or nil
        engine.set(
            "create_entity",
            lua.create_function(
                |_, (name, position, rotation, scale): (String, Option<LuaTable>, Option<LuaTable>, Option<LuaTable>)| {
                    if position.is_none() && rotation.is_none() && scale.is_none() {
                        return Ok(Entity::create_entity(&name).map(LuaEntity));
                    }
                    let read = |table: Option<LuaTable>, default: Vector3| {
                        table.map_or(Ok(default), |t| lua_to_vec3(&t))
                    };
                    Ok(Entity::create_entity_with_transform(
                        &name,
                        read(position, Vector3::ZERO)?,
                        read(rotation, Vector3::ZERO)?,
                        read(scale, Vector3::ONE)?,
                    )
                    .map(LuaEntity))
                },
            )?,
        )?;
        Ok(())
    }

    fn register_audio_api(&self, engine: &LuaTable) -> LuaResult<()> {
        let lua = &self.lua;
        register_fn!(engine, lua, "master_volume", |()| (), ic::audio_engine_get_master_volume());
        register_fn!(engine, lua, "set_master_volume", |volume| f32,
            ic::audio_engine_set_master_volume(volume));
        register_fn!(engine, lua, "is_muted", |()| (), ic::audio_engine_is_master_volume_muted());
        register_fn!(engine, lua, "set_muted", |muted| bool,
            ic::audio_engine_set_master_volume_muted(muted));
        register_fn!(engine, lua, "toggle_mute", |()| (), ic::audio_engine_toggle_mute_master_volume());
        Ok(())
    }

    /// Runs `source` and stores the table it returns as class `name`.
    /// Loading a name twice replaces the class for future instances.
    pub fn load_class(&self, name: &str, source: &str) -> LuaResult<()> {
        let value: LuaValue = self.lua.load(source).set_name(name).eval()?;
        let LuaValue::Table(class) = value else {
            return Err(LuaError::runtime(format!(
                "script '{}' must return a class table, got {}",
                name,
                value.type_name()
            )));
        };
        if self
            .classes
            .borrow_mut()
            .insert(name.to_string(), class)
            .is_some()
        {
            warn!(target: "lua", "class '{}' reloaded", name);
        }
        Ok(())
    }

    /// Loads a script file as a class named after the file stem.
    pub fn load_class_file(&self, path: impl AsRef<Path>) -> LuaResult<String> {
        let path = path.as_ref();
        let name = path
            .file_stem()
            .and_then(|stem| stem.to_str())
            .ok_or_else(|| LuaError::runtime(format!("bad script path {}", path.display())))?
            .to_string();
        let source = std::fs::read_to_string(path)
            .map_err(|e| LuaError::ExternalError(std::sync::Arc::new(e)))?;
        self.load_class(&name, &source)?;
        info!(target: "lua", "loaded class '{}' from {}", name, path.display());
        Ok(name)
    }

    /// Loads every `*.lua` file in `dir`, in file name order. A script that
    /// fails to load is logged and skipped.
    pub fn load_scripts_dir(&self, dir: impl AsRef<Path>) -> LuaResult<Vec<String>> {
        let mut paths: Vec<_> = std::fs::read_dir(dir.as_ref())
            .map_err(|e| LuaError::ExternalError(std::sync::Arc::new(e)))?
            .filter_map(Result::ok)
            .map(|entry| entry.path())
            .filter(|path| path.extension().is_some_and(|ext| ext == "lua"))
            .collect();
        paths.sort();

        let mut loaded = Vec::with_capacity(paths.len());
        for path in paths {
            match self.load_class_file(&path) {
                Ok(name) => loaded.push(name),
                Err(err) => error!(target: "lua", "{}: {}", path.display(), err),
            }
        }
        Ok(loaded)
    }

    pub fn has_class(&self, name: &str) -> bool {
        self.classes.borrow().contains_key(name)
    }

    /// Loaded class names, sorted.
    pub fn class_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.classes.borrow().keys().cloned().collect();
        names.sort();
        names
    }

    /// Builds a fresh instance table from class `name`.
    ///
    /// Table-valued defaults are copied one level deep, so instances never
    /// share a vector table. `_class` holds the class name.
    pub fn instantiate(&self, name: &str) -> LuaResult<LuaTable> {
        let class = self
            .classes
            .borrow()
            .get(name)
            .cloned()
            .ok_or_else(|| LuaError::runtime(format!("unknown Lua class '{}'", name)))?;

        let instance = self.lua.create_table()?;
        for pair in class.pairs::<LuaValue, LuaValue>() {
            let (key, value) = pair?;
            let value = match value {
                LuaValue::Table(table) => {
                    let copy = self.lua.create_table()?;
                    for inner in table.pairs::<LuaValue, LuaValue>() {
                        let (k, v) = inner?;
                        copy.set(k, v)?;
                    }
                    LuaValue::Table(copy)
                }
                other => other,
            };
            instance.set(key, value)?;
        }
        instance.set("_class", name)?;
        Ok(instance)
    }

    /// Runs a Lua script file for its side effects.
    pub fn run_script(&self, path: &str) -> LuaResult<()> {
        let script = std::fs::read_to_string(path)
            .map_err(|e| LuaError::ExternalError(std::sync::Arc::new(e)))?;
        self.lua.load(&script).set_name(path).exec()
    }

    /// Calls a global Lua function by name with the given arguments.
    ///
    /// # Errors
    ///
    /// Returns an error if the function doesn't exist or execution fails.
    pub fn call_function<A, R>(&self, name: &str, args: A) -> LuaResult<R>
    where
        A: IntoLuaMulti,
        R: FromLuaMulti,
    {
        let func: LuaFunction = self.lua.globals().get(name)?;
        func.call(args)
    }

    pub fn has_function(&self, name: &str) -> bool {
        self.lua.globals().get::<LuaFunction>(name).is_ok()
    }

    pub fn lua(&self) -> &Lua {
        &self.lua
    }
}

/// Makes every loaded class instantiable through `registry`. Native classes
/// registered under the same name are replaced.
pub fn register_classes(runtime: &Rc<LuaRuntime>, registry: &mut ScriptRegistry) {
    for name in runtime.class_names() {
        let runtime = Rc::clone(runtime);
        let class_name = name.clone();
        registry.register_with(&name, move || {
            Box::new(LuaBehavior::new(Rc::clone(&runtime), &class_name))
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ==================== Classes ====================

    #[test]
    fn test_load_class_requires_a_table() {
        let runtime = LuaRuntime::new().unwrap();
        assert!(runtime.load_class("Nope", "return 42").is_err());
        assert!(runtime.load_class("Syntax", "return {").is_err());
        assert!(!runtime.has_class("Nope"));
        runtime.load_class("Ok", "return {}").unwrap();
        assert_eq!(runtime.class_names(), vec!["Ok".to_string()]);
    }

    #[test]
    fn test_instances_copy_table_defaults() {
        let runtime = LuaRuntime::new().unwrap();
        runtime
            .load_class("Mover", "return { dir = { x = 1, y = 0 } }")
            .unwrap();
        let a = runtime.instantiate("Mover").unwrap();
        let b = runtime.instantiate("Mover").unwrap();
        let dir: LuaTable = a.get("dir").unwrap();
        dir.set("x", 9).unwrap();
        let other: LuaTable = b.get("dir").unwrap();
        assert_eq!(other.get::<f32>("x").unwrap(), 1.0);
        assert_eq!(a.get::<String>("_class").unwrap(), "Mover");
        assert!(runtime.instantiate("Missing").is_err());
    }

    #[test]
    fn test_register_classes_feeds_the_registry() {
        let runtime = Rc::new(LuaRuntime::new().unwrap());
        runtime.load_class("A", "return {}").unwrap();
        runtime.load_class("B", "return {}").unwrap();
        let mut registry = ScriptRegistry::default();
        register_classes(&runtime, &mut registry);
        assert!(registry.contains("A"));
        assert!(registry.instantiate("B").is_some());
    }

    // ==================== engine table ====================

    #[test]
    fn test_engine_api_without_a_scene() {
        let runtime = LuaRuntime::new().unwrap();
        runtime
            .lua()
            .load(
                r#"
                engine.log("hello")
                assert(engine.find_entity_by_name("Player") == nil)
                assert(engine.create_entity("Ghost") == nil)
                assert(engine.is_key_pressed(engine.key.space) == false)
                assert(engine.key.a == 65 and engine.key.d0 == 48)
                assert(engine.mouse.left == 0)
                local a = engine.random_range_int(1, 6, 42)
                local b = engine.random_range_int(1, 6, 42)
                assert(a == b and a >= 1 and a <= 6)
                "#,
            )
            .exec()
            .unwrap();
    }

    #[test]
    fn test_call_function() {
        let runtime = LuaRuntime::new().unwrap();
        runtime
            .lua()
            .load("function double(x) return x * 2 end")
            .exec()
            .unwrap();
        assert!(runtime.has_function("double"));
        assert!(!runtime.has_function("triple"));
        let result: i32 = runtime.call_function("double", 21).unwrap();
        assert_eq!(result, 42);
    }
}
