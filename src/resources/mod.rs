//! ECS resources held by the [`Scene`](crate::scene::Scene).
//!
//! Overview
//! - `audio` – bridge and channels for the background audio thread, master volume
//! - `bridgeconfig` – INI-backed runtime settings for the headless runner
//! - `input` – keyboard and mouse state fed by the host
//! - `lua_runtime` – Lua interpreter and script classes (feature `lua`)
//! - `physics` – 2D physics settings and contact tracking
//! - `worldtime` – simulation time and delta
pub mod audio;
pub mod bridgeconfig;
pub mod input;
#[cfg(feature = "lua")]
pub mod lua_runtime;
pub mod physics;
pub mod worldtime;
