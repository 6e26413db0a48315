//! Value types exchanged across the scripting boundary.
//!
//! [`Vector2`], [`Vector3`] and [`Vector4`] are `#[repr(C)]` so the native side
//! can read and write them in place. Conversions between widths are always
//! explicit: narrowing drops trailing components, widening zero-fills them.

pub mod mathf;
pub mod vector2;
pub mod vector3;
pub mod vector4;

pub use vector2::Vector2;
pub use vector3::Vector3;
pub use vector4::Vector4;
