//! Native scene and component type registry.
//!
//! - [`registry`] – stable component kind ids and their storage operations
//! - [`world`] – the [`Scene`] that owns the ECS world and the handle map

pub mod registry;
pub mod world;

pub use registry::ComponentKind;
pub use world::Scene;
