//! The boundary between scripts and the native scene.

pub mod context;
pub mod internal_calls;
pub mod layout;

pub use context::{ContextGuard, ScriptContext, bind};
pub use layout::Physics2DContact;
