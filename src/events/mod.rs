//! Message types exchanged between scene systems.
//!
//! Submodules:
//! - [`audio`] – commands and messages for the background audio thread
//! - [`contact`] – begin/end contact notifications produced by the physics step
pub mod audio;
pub mod contact;
