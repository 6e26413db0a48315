//! Lua scripting for behaviors.
//!
//! A Lua script returns a class table; [`register_classes`] makes each loaded
//! class available to the [`ScriptRegistry`](crate::scripting::ScriptRegistry)
//! next to the native ones, so a `Script` component does not care which
//! language its class is written in.
//!
//! - [`runtime`] - interpreter state, class loading, the `engine` table
//! - [`entity`] - `Entity` and component userdata
//! - [`behavior`] - runs a Lua instance through the `Behavior` callbacks
//! - [`convert`] - vector tables and enum names
//!
//! # Example
//!
//! ```lua
//! local Player = { speed = 5.0 }
//!
//! function Player:on_update(entity, dt)
//!     local body = entity:get_component("Rigidbody2D")
//!     if body and engine.is_key_pressed(engine.key.d) then
//!         body:apply_linear_impulse_to_center({ x = self.speed * dt, y = 0 }, true)
//!     end
//! end
//!
//! return Player
//! ```

pub mod behavior;
pub mod convert;
pub mod entity;
pub mod runtime;

pub use behavior::LuaBehavior;
pub use entity::{LuaComponent, LuaEntity};
pub use runtime::{LuaRuntime, register_classes};
