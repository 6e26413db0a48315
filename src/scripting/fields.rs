//! Public behavior fields: typed values a host can inspect and override
//! before `on_create` runs.

use std::fmt;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::math::{Vector2, Vector3, Vector4};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScriptFieldType {
    Float,
    Double,
    Bool,
    Char,
    String,
    Byte,
    Short,
    Int,
    Long,
    UByte,
    UShort,
    UInt,
    ULong,
    Vector2,
    Vector3,
    Vector4,
    Entity,
}

impl ScriptFieldType {
    pub fn name(self) -> &'static str {
        match self {
            ScriptFieldType::Float => "Float",
            ScriptFieldType::Double => "Double",
            ScriptFieldType::Bool => "Bool",
            ScriptFieldType::Char => "Char",
            ScriptFieldType::String => "String",
            ScriptFieldType::Byte => "Byte",
            ScriptFieldType::Short => "Short",
            ScriptFieldType::Int => "Int",
            ScriptFieldType::Long => "Long",
            ScriptFieldType::UByte => "UByte",
            ScriptFieldType::UShort => "UShort",
            ScriptFieldType::UInt => "UInt",
            ScriptFieldType::ULong => "ULong",
            ScriptFieldType::Vector2 => "Vector2",
            ScriptFieldType::Vector3 => "Vector3",
            ScriptFieldType::Vector4 => "Vector4",
            ScriptFieldType::Entity => "Entity",
        }
    }
}

impl fmt::Display for ScriptFieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A field value. `Entity` carries the raw handle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ScriptFieldValue {
    Float(f32),
    Double(f64),
    Bool(bool),
    Char(char),
    String(String),
    Byte(i8),
    Short(i16),
    Int(i32),
    Long(i64),
    UByte(u8),
    UShort(u16),
    UInt(u32),
    ULong(u64),
    Vector2(Vector2),
    Vector3(Vector3),
    Vector4(Vector4),
    Entity(u64),
}

impl ScriptFieldValue {
    pub fn field_type(&self) -> ScriptFieldType {
        match self {
            ScriptFieldValue::Float(_) => ScriptFieldType::Float,
            ScriptFieldValue::Double(_) => ScriptFieldType::Double,
            ScriptFieldValue::Bool(_) => ScriptFieldType::Bool,
            ScriptFieldValue::Char(_) => ScriptFieldType::Char,
            ScriptFieldValue::String(_) => ScriptFieldType::String,
            ScriptFieldValue::Byte(_) => ScriptFieldType::Byte,
            ScriptFieldValue::Short(_) => ScriptFieldType::Short,
            ScriptFieldValue::Int(_) => ScriptFieldType::Int,
            ScriptFieldValue::Long(_) => ScriptFieldType::Long,
            ScriptFieldValue::UByte(_) => ScriptFieldType::UByte,
            ScriptFieldValue::UShort(_) => ScriptFieldType::UShort,
            ScriptFieldValue::UInt(_) => ScriptFieldType::UInt,
            ScriptFieldValue::ULong(_) => ScriptFieldType::ULong,
            ScriptFieldValue::Vector2(_) => ScriptFieldType::Vector2,
            ScriptFieldValue::Vector3(_) => ScriptFieldType::Vector3,
            ScriptFieldValue::Vector4(_) => ScriptFieldType::Vector4,
            ScriptFieldValue::Entity(_) => ScriptFieldType::Entity,
        }
    }

    pub fn as_f32(&self) -> Option<f32> {
        match *self {
            ScriptFieldValue::Float(v) => Some(v),
            ScriptFieldValue::Double(v) => Some(v as f32),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match *self {
            ScriptFieldValue::Bool(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_vector4(&self) -> Option<Vector4> {
        match *self {
            ScriptFieldValue::Vector4(v) => Some(v),
            _ => None,
        }
    }
}

/// A named field as reported by a behavior.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScriptField {
    pub name: String,
    pub value: ScriptFieldValue,
}

impl ScriptField {
    pub fn new(name: impl Into<String>, value: ScriptFieldValue) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }

    pub fn field_type(&self) -> ScriptFieldType {
        self.value.field_type()
    }
}

/// Field overrides keyed by entity name, then field name.
pub type FieldOverrides = FxHashMap<String, FxHashMap<String, ScriptFieldValue>>;

/// Parses overrides such as `{"Player": {"speed": {"Float": 4.0}}}`.
pub fn parse_overrides(json: &str) -> Result<FieldOverrides, serde_json::Error> {
    serde_json::from_str(json)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_reports_its_type() {
        assert_eq!(ScriptFieldValue::Float(1.0).field_type(), ScriptFieldType::Float);
        assert_eq!(ScriptFieldValue::Entity(3).field_type(), ScriptFieldType::Entity);
        assert_eq!(ScriptFieldType::ULong.to_string(), "ULong");
    }

    #[test]
    fn test_parse_overrides() {
        let overrides = parse_overrides(
            r#"{"Player": {"speed": {"Float": 4.0}, "tint": {"Vector4": {"x": 1.0, "y": 0.0, "z": 0.0, "w": 1.0}}}}"#,
        )
        .unwrap();
        let player = &overrides["Player"];
        assert_eq!(player["speed"], ScriptFieldValue::Float(4.0));
        assert_eq!(
            player["tint"].as_vector4(),
            Some(Vector4::new(1.0, 0.0, 0.0, 1.0))
        );
    }

    #[test]
    fn test_parse_overrides_rejects_garbage() {
        assert!(parse_overrides("{not json").is_err());
        assert!(parse_overrides(r#"{"Player": {"speed": {"Quaternion": 1}}}"#).is_err());
    }

    #[test]
    fn test_numeric_accessors() {
        assert_eq!(ScriptFieldValue::Double(2.5).as_f32(), Some(2.5));
        assert_eq!(ScriptFieldValue::Int(2).as_f32(), None);
        assert_eq!(ScriptFieldValue::Bool(true).as_bool(), Some(true));
    }
}
