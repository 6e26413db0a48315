//! Vector <-> Lua table conversions.
//!
//! Vectors cross into Lua as plain `{x=, y=, z=, w=}` tables. Missing axes
//! read back as `0`, the same fill rule the widening conversions use.

use mlua::prelude::*;

use crate::components::rigidbody2d::BodyType;
use crate::math::{Vector2, Vector3, Vector4};

fn axis(table: &LuaTable, key: &str) -> LuaResult<f32> {
    Ok(table.get::<Option<f32>>(key)?.unwrap_or(0.0))
}

pub fn vec2_to_lua(lua: &Lua, v: Vector2) -> LuaResult<LuaTable> {
    let table = lua.create_table()?;
    table.set("x", v.x)?;
    table.set("y", v.y)?;
    Ok(table)
}

pub fn vec3_to_lua(lua: &Lua, v: Vector3) -> LuaResult<LuaTable> {
    let table = vec2_to_lua(lua, v.xy())?;
    table.set("z", v.z)?;
    Ok(table)
}

pub fn vec4_to_lua(lua: &Lua, v: Vector4) -> LuaResult<LuaTable> {
    let table = vec3_to_lua(lua, v.xyz())?;
    table.set("w", v.w)?;
    Ok(table)
}

pub fn lua_to_vec2(table: &LuaTable) -> LuaResult<Vector2> {
    Ok(Vector2::new(axis(table, "x")?, axis(table, "y")?))
}

pub fn lua_to_vec3(table: &LuaTable) -> LuaResult<Vector3> {
    Ok(Vector3::new(
        axis(table, "x")?,
        axis(table, "y")?,
        axis(table, "z")?,
    ))
}

pub fn lua_to_vec4(table: &LuaTable) -> LuaResult<Vector4> {
    Ok(Vector4::new(
        axis(table, "x")?,
        axis(table, "y")?,
        axis(table, "z")?,
        axis(table, "w")?,
    ))
}

/// Reads a vector table out of a Lua value, naming `what` in the error.
pub fn expect_table(value: LuaValue, what: &str) -> LuaResult<LuaTable> {
    match value {
        LuaValue::Table(table) => Ok(table),
        other => Err(LuaError::runtime(format!(
            "{} expects a vector table, got {}",
            what,
            other.type_name()
        ))),
    }
}

pub fn body_type_name(body_type: BodyType) -> &'static str {
    match body_type {
        BodyType::Static => "Static",
        BodyType::Dynamic => "Dynamic",
        BodyType::Kinematic => "Kinematic",
    }
}

pub fn parse_body_type(name: &str) -> LuaResult<BodyType> {
    match name {
        "Static" | "static" => Ok(BodyType::Static),
        "Dynamic" | "dynamic" => Ok(BodyType::Dynamic),
        "Kinematic" | "kinematic" => Ok(BodyType::Kinematic),
        other => Err(LuaError::runtime(format!("unknown body type '{}'", other))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vector_tables_round_trip() {
        let lua = Lua::new();
        let v = Vector4::new(1.0, 2.0, 3.0, 4.0);
        let table = vec4_to_lua(&lua, v).unwrap();
        assert_eq!(lua_to_vec4(&table).unwrap(), v);
    }

    #[test]
    fn test_missing_axes_read_as_zero() {
        let lua = Lua::new();
        let table: LuaTable = lua.load("return { x = 4, y = 5 }").eval().unwrap();
        assert_eq!(lua_to_vec3(&table).unwrap(), Vector3::new(4.0, 5.0, 0.0));
    }

    #[test]
    fn test_body_type_names() {
        assert_eq!(parse_body_type("dynamic").unwrap(), BodyType::Dynamic);
        assert_eq!(body_type_name(BodyType::Kinematic), "Kinematic");
        assert!(parse_body_type("floating").is_err());
    }
}
