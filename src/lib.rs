//! Scriptcore library.
//!
//! The scripting bridge of a 2D entity-component engine: a native scene
//! built on `bevy_ecs`, the flat call surface scripts reach it through, and
//! the script-side object model (entities, component views, behaviors) with
//! an optional Lua frontend.

pub mod components;
pub mod events;
pub mod interop;
pub mod math;
pub mod resources;
pub mod sandbox;
pub mod scene;
pub mod scripting;
pub mod systems;
