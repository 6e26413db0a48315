//! ECS components stored on scene entities.
//!
//! These are the native representations behind the script-facing component
//! views in [`crate::scripting::components`]. Every scene entity carries an
//! [`id::EntityId`], an [`id::Tag`] and a [`transform::Transform`]; the rest are
//! optional and added by the host or by scripts.
//!
//! Submodules overview:
//! - [`audiosource`] – audio emitter with a clip id and playback parameters
//! - [`camera`] – orthographic camera
//! - [`colliders`] – box and circle collision shapes
//! - [`id`] – stable 64-bit handle and display name
//! - [`renderers`] – sprite, circle and text renderers
//! - [`rigidbody2d`] – 2D rigid body with queued impulses and forces
//! - [`script`] – script class binding and the pending-destroy marker
//! - [`transform`] – position, rotation and scale
//! - [`ui`] – screen-space image, circle and text

pub mod audiosource;
pub mod camera;
pub mod colliders;
pub mod id;
pub mod renderers;
pub mod rigidbody2d;
pub mod script;
pub mod transform;
pub mod ui;
