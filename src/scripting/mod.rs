//! The script-facing object model.
//!
//! Behaviors see the scene only through this module: [`Entity`] handles,
//! typed component views, and the static facades ([`Log`], [`Input`],
//! [`Random`], [`Audio`]). Everything here goes through
//! [`internal_calls`](crate::interop::internal_calls); nothing holds native
//! state between calls.

pub mod audio;
pub mod behavior;
pub mod components;
pub mod engine;
pub mod entity;
pub mod error;
pub mod fields;
pub mod input;
pub mod instance;
pub mod log;
pub mod random;
pub mod timestep;

pub use audio::Audio;
pub use behavior::{AsAny, Behavior};
pub use components::*;
pub use engine::{ScriptEngine, ScriptRegistry};
pub use entity::Entity;
pub use error::{ScriptError, ScriptResult};
pub use fields::{ScriptField, ScriptFieldType, ScriptFieldValue};
pub use input::{Input, KeyCode, MouseCode};
pub use instance::ScriptInstance;
pub use self::log::Log;
pub use random::Random;
pub use timestep::Timestep;
