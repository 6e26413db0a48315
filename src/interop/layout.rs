//! Boundary struct layouts and their conversions to the native math types.
//!
//! Field order and sizes below are part of the boundary contract. The
//! assertions fail the build if any of them drifts.

use std::mem::{align_of, offset_of, size_of};

use glam::{Vec2, Vec3, Vec4};
use serde::{Deserialize, Serialize};

use crate::math::{Vector2, Vector3, Vector4};

/// Participants of a physics contact, as handed to contact callbacks.
///
/// `collider_entity_id` is the entity receiving the callback, `other_entity_id`
/// the one it touched.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Physics2DContact {
    pub collider_entity_id: u64,
    pub other_entity_id: u64,
}

const _: () = {
    assert!(size_of::<Vector2>() == 8);
    assert!(align_of::<Vector2>() == 4);
    assert!(offset_of!(Vector2, x) == 0);
    assert!(offset_of!(Vector2, y) == 4);

    assert!(size_of::<Vector3>() == 12);
    assert!(align_of::<Vector3>() == 4);
    assert!(offset_of!(Vector3, x) == 0);
    assert!(offset_of!(Vector3, y) == 4);
    assert!(offset_of!(Vector3, z) == 8);

    assert!(size_of::<Vector4>() == 16);
    assert!(offset_of!(Vector4, x) == 0);
    assert!(offset_of!(Vector4, y) == 4);
    assert!(offset_of!(Vector4, z) == 8);
    assert!(offset_of!(Vector4, w) == 12);

    assert!(size_of::<Physics2DContact>() == 16);
    assert!(offset_of!(Physics2DContact, collider_entity_id) == 0);
    assert!(offset_of!(Physics2DContact, other_entity_id) == 8);

    // Same footprint as the native vectors (Vec4 may be 16-byte aligned, size still matches).
    assert!(size_of::<Vector2>() == size_of::<Vec2>());
    assert!(size_of::<Vector3>() == size_of::<Vec3>());
    assert!(size_of::<Vector4>() == size_of::<Vec4>());
};

impl From<Vec2> for Vector2 {
    fn from(v: Vec2) -> Self {
        Self::new(v.x, v.y)
    }
}

impl From<Vector2> for Vec2 {
    fn from(v: Vector2) -> Self {
        Vec2::new(v.x, v.y)
    }
}

impl From<Vec3> for Vector3 {
    fn from(v: Vec3) -> Self {
        Self::new(v.x, v.y, v.z)
    }
}

impl From<Vector3> for Vec3 {
    fn from(v: Vector3) -> Self {
        Vec3::new(v.x, v.y, v.z)
    }
}

impl From<Vec4> for Vector4 {
    fn from(v: Vec4) -> Self {
        Self::new(v.x, v.y, v.z, v.w)
    }
}

impl From<Vector4> for Vec4 {
    fn from(v: Vector4) -> Self {
        Vec4::new(v.x, v.y, v.z, v.w)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_native_conversions_preserve_components() {
        let v = Vector4::new(1.0, -2.0, 3.5, 0.25);
        assert_eq!(Vector4::from(Vec4::from(v)), v);
        let v = Vector3::new(1.0, 2.0, 3.0);
        assert_eq!(Vec3::from(v), Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(Vector2::from(Vec2::new(4.0, 5.0)), Vector2::new(4.0, 5.0));
    }

    #[test]
    fn test_contact_serializes_by_field_name() {
        let contact = Physics2DContact {
            collider_entity_id: 1,
            other_entity_id: 2,
        };
        let json = serde_json::to_string(&contact).unwrap();
        assert_eq!(json, r#"{"collider_entity_id":1,"other_entity_id":2}"#);
    }
}
