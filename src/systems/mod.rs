//! Scene systems.
//!
//! Submodules overview
//! - [`audio`] – bridge with the audio thread (poll/forward message queues)
//! - [`contacts`] – overlap tests and begin/end contact tracking
//! - [`physics`] – apply queued impulses and forces, integrate bodies
//! - [`time`] – update simulation time and delta

pub mod audio;
pub mod contacts;
pub mod physics;
pub mod time;
