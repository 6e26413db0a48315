//! Lua integration tests: Lua classes running as behaviors inside a real scene.

#![cfg(feature = "lua")]

use std::rc::Rc;

use glam::{Vec2, Vec3};

use scriptcore::components::colliders::BoxCollider2D;
use scriptcore::components::rigidbody2d::{BodyType, Rigidbody2D};
use scriptcore::components::script::Script;
use scriptcore::components::transform::Transform;
use scriptcore::resources::lua_runtime::{LuaBehavior, LuaRuntime, register_classes};
use scriptcore::scene::Scene;
use scriptcore::scripting::behavior::downcast_ref;
use scriptcore::scripting::fields::parse_overrides;
use scriptcore::scripting::{ScriptEngine, ScriptFieldValue, ScriptRegistry};

const DT: f32 = 1.0 / 60.0;
const EPSILON: f32 = 1e-4;

fn approx_eq(a: f32, b: f32) -> bool {
    (a - b).abs() < EPSILON
}

const PUSHER: &str = r#"
local Pusher = { force = 2.0, pushes = 0 }

function Pusher:on_create(entity)
    self.body = entity:get_component("Rigidbody2D")
    assert(self.body ~= nil, "missing body")
end

function Pusher:on_update(entity, dt)
    self.body:apply_linear_impulse_to_center({ x = self.force, y = 0 }, true)
    self.pushes = self.pushes + 1
end

return Pusher
"#;

const SPAWNER: &str = r#"
local Spawner = {}

function Spawner:on_start(entity)
    local child = engine.create_entity("Bullet", { x = 4, y = 5, z = 0 }, nil, { x = 2, y = 2, z = 1 })
    child:set_parent(entity)
    local sprite = child:add_component("SpriteRenderer")
    sprite.color = { x = 1, y = 0, z = 0, w = 1 }
    sprite.tiling_factor = 3
    entity:set_name("Gun")
end

return Spawner
"#;

const SENSOR: &str = r#"
local Sensor = { hits = 0, last = "" }

function Sensor:on_trigger_enter_2d(entity, other)
    self.hits = self.hits + 1
    self.last = other:name()
    other:destroy()
end

return Sensor
"#;

const BROKEN: &str = r#"
local Broken = {}
function Broken:on_update(entity, dt) error("broken on purpose") end
return Broken
"#;

fn lua_registry(classes: &[(&str, &str)]) -> (Rc<LuaRuntime>, ScriptRegistry) {
    let runtime = Rc::new(LuaRuntime::new().unwrap());
    for (name, source) in classes {
        runtime.load_class(name, source).unwrap();
    }
    let mut registry = ScriptRegistry::default();
    register_classes(&runtime, &mut registry);
    (runtime, registry)
}

fn lua_field<T: mlua::FromLua>(engine: &ScriptEngine, id: u64, name: &str) -> T {
    let instance = engine.instance(id).unwrap();
    let behavior = instance.try_behavior_mut().unwrap();
    let lua = downcast_ref::<LuaBehavior>(behavior.as_ref()).unwrap();
    lua.instance().unwrap().get(name).unwrap()
}

// =============================================================================
// Physics from Lua
// =============================================================================

#[test]
fn lua_impulse_moves_the_body() {
    let (_runtime, registry) = lua_registry(&[("Pusher", PUSHER)]);
    let mut scene = Scene::new("lua");
    let ball = scene.create_entity("Ball");
    scene.insert(
        ball,
        (
            Rigidbody2D {
                gravity_scale: 0.0,
                ..Rigidbody2D::new(BodyType::Dynamic)
            },
            Script::new("Pusher"),
        ),
    );

    let mut engine = ScriptEngine::with_registry(scene, registry);
    engine.start();
    engine.update(DT);
    engine.update(DT);

    let velocity = engine.scene().component::<Rigidbody2D>(ball).unwrap().linear_velocity;
    assert!(velocity.x > 0.0);
    assert!(approx_eq(velocity.y, 0.0));
    assert_eq!(lua_field::<i64>(&engine, ball, "pushes"), 2);
    engine.stop();
}

// =============================================================================
// Entities and components from Lua
// =============================================================================

#[test]
fn lua_creates_and_parents_entities() {
    let (_runtime, registry) = lua_registry(&[("Spawner", SPAWNER)]);
    let mut scene = Scene::new("lua");
    let gun = scene.create_entity("Spawner");
    scene.insert(gun, Script::new("Spawner"));

    let mut engine = ScriptEngine::with_registry(scene, registry);
    engine.start();

    let scene = engine.scene();
    assert_eq!(scene.name_of(gun), Some("Gun"));
    let bullet = scene.find_entity_by_name("Bullet").unwrap();
    assert_eq!(scene.parent(bullet), Some(gun));
    let transform = scene.component::<Transform>(bullet).unwrap();
    assert_eq!(transform.position, Vec3::new(4.0, 5.0, 0.0));
    assert_eq!(transform.rotation, Vec3::ZERO);
    assert_eq!(transform.scale, Vec3::new(2.0, 2.0, 1.0));
    let sprite = scene
        .component::<scriptcore::components::renderers::SpriteRenderer>(bullet)
        .unwrap();
    assert!(approx_eq(sprite.color.x, 1.0));
    assert!(approx_eq(sprite.tiling_factor, 3.0));
    drop(scene);
    engine.stop();
}

#[test]
fn lua_trigger_receives_the_other_entity() {
    let (_runtime, registry) = lua_registry(&[("Sensor", SENSOR)]);
    let mut scene = Scene::new("lua");

    let pad = scene.create_entity("Pad");
    scene.insert(
        pad,
        (
            Rigidbody2D::new(BodyType::Static),
            BoxCollider2D {
                is_sensor: true,
                ..BoxCollider2D::default()
            },
            Script::new("Sensor"),
        ),
    );
    let crate_id = scene.create_entity("Crate");
    scene.set_position(crate_id, Vec3::new(0.5, 0.0, 0.0));
    scene.insert(
        crate_id,
        (
            Rigidbody2D {
                gravity_scale: 0.0,
                linear_velocity: Vec2::ZERO,
                ..Rigidbody2D::new(BodyType::Dynamic)
            },
            BoxCollider2D::default(),
        ),
    );

    let mut engine = ScriptEngine::with_registry(scene, registry);
    engine.start();
    engine.update(DT);

    assert_eq!(lua_field::<i64>(&engine, pad, "hits"), 1);
    assert_eq!(lua_field::<String>(&engine, pad, "last"), "Crate");
    assert!(!engine.scene().contains(crate_id));
    engine.stop();
}

// =============================================================================
// Fields and failures
// =============================================================================

#[test]
fn field_overrides_reach_lua_instances() {
    let (_runtime, registry) = lua_registry(&[("Pusher", PUSHER)]);
    let mut scene = Scene::new("lua");
    let ball = scene.create_entity("Ball");
    scene.insert(
        ball,
        (Rigidbody2D::new(BodyType::Dynamic), Script::new("Pusher")),
    );

    let mut engine = ScriptEngine::with_registry(scene, registry);
    engine.set_field_overrides(
        parse_overrides(r#"{ "Ball": { "force": { "Float": 7.5 } } }"#).unwrap(),
    );
    engine.start();

    assert!(approx_eq(lua_field::<f32>(&engine, ball, "force"), 7.5));
    let instance = engine.instance(ball).unwrap();
    let fields = instance.try_behavior_mut().unwrap().fields();
    assert!(
        fields
            .iter()
            .any(|f| f.name == "force" && f.value == ScriptFieldValue::Double(7.5))
    );
    drop(instance);
    engine.stop();
}

#[test]
fn lua_errors_are_contained() {
    let (_runtime, registry) = lua_registry(&[("Broken", BROKEN), ("Pusher", PUSHER)]);
    let mut scene = Scene::new("lua");
    let broken = scene.create_entity("Broken");
    scene.insert(broken, Script::new("Broken"));
    let ball = scene.create_entity("Ball");
    scene.insert(
        ball,
        (Rigidbody2D::new(BodyType::Dynamic), Script::new("Pusher")),
    );

    let mut engine = ScriptEngine::with_registry(scene, registry);
    engine.start();
    for _ in 0..3 {
        engine.update(DT);
    }
    assert_eq!(lua_field::<i64>(&engine, ball, "pushes"), 3);
    engine.stop();
}
