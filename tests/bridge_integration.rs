//! Bridge integration tests: script-side handles and views against a real scene.
//!
//! Every test binds a [`ScriptContext`] the way the driver does and talks to
//! the scene only through `Entity` and component views.

use scriptcore::components::rigidbody2d::{BodyType, Rigidbody2D};
use scriptcore::interop::{ScriptContext, bind};
use scriptcore::math::{Vector2, Vector3, Vector4};
use scriptcore::scene::Scene;
use scriptcore::scripting::{
    Audio, CameraComponent, Entity, Rigidbody2DComponent, ScriptError, SpriteRendererComponent,
    TagComponent, TransformComponent,
};

const EPSILON: f32 = 1e-5;

fn approx_eq(a: f32, b: f32) -> bool {
    (a - b).abs() < EPSILON
}

fn player_scene() -> Scene {
    let mut scene = Scene::new("bridge");
    let player = scene.create_entity("Player");
    scene.insert(player, Rigidbody2D::new(BodyType::Dynamic));
    scene
}

// =============================================================================
// Physics through views
// =============================================================================

#[test]
fn impulse_then_step_moves_player() {
    let context = ScriptContext::new(player_scene());
    let _guard = bind(&context);

    let player = Entity::find_entity_by_name("Player").unwrap();
    let body = player.get_component::<Rigidbody2DComponent>().unwrap();
    assert!(approx_eq(body.linear_velocity().x, 0.0));

    body.apply_linear_impulse_to_center(Vector2::new(1.0, 0.0), true);
    {
        let mut scene = context.scene_mut();
        scene.advance_time(1.0 / 60.0);
        scene.step_physics();
    }

    assert!(body.linear_velocity().x > 0.0);
    assert!(body.is_awake());
}

#[test]
fn static_body_ignores_impulses() {
    let context = ScriptContext::new(player_scene());
    let _guard = bind(&context);

    let body = Entity::require_entity_by_name("Player")
        .unwrap()
        .require_component::<Rigidbody2DComponent>()
        .unwrap();
    body.set_body_type(BodyType::Static);
    body.apply_linear_impulse_to_center(Vector2::new(5.0, 0.0), true);
    {
        let mut scene = context.scene_mut();
        scene.advance_time(1.0 / 60.0);
        scene.step_physics();
    }
    assert_eq!(body.linear_velocity(), Vector2::ZERO);
}

// =============================================================================
// Entity lookup and creation
// =============================================================================

#[test]
fn create_with_transform_is_visible_at_once() {
    let context = ScriptContext::new(Scene::new("bridge"));
    let _guard = bind(&context);

    let position = Vector3::new(1.0, 2.0, 3.0);
    let rotation = Vector3::new(0.0, 0.0, 0.5);
    let scale = Vector3::new(2.0, 2.0, 1.0);
    let created = Entity::create_entity_with_transform("Bullet", position, rotation, scale).unwrap();

    let found = Entity::find_entity_by_name("Bullet").unwrap();
    assert_eq!(found, created);
    let transform = found.get_component::<TransformComponent>().unwrap();
    assert_eq!(transform.position(), position);
    assert_eq!(transform.rotation(), rotation);
    assert_eq!(transform.scale(), scale);
}

#[test]
fn find_nonexistent_entity_returns_none() {
    let context = ScriptContext::new(player_scene());
    let _guard = bind(&context);

    assert!(Entity::find_entity_by_name("Nobody").is_none());
    match Entity::require_entity_by_name("Nobody") {
        Err(ScriptError::EntityNotFound { name }) => assert_eq!(name, "Nobody"),
        other => panic!("unexpected {:?}", other),
    }
}

#[test]
fn empty_name_defaults_to_entity() {
    let context = ScriptContext::new(Scene::new("bridge"));
    let _guard = bind(&context);

    let entity = Entity::create_entity("").unwrap();
    assert_eq!(entity.name(), "Entity");
    entity.get_component::<TagComponent>().unwrap().set_tag("Renamed");
    assert_eq!(entity.name(), "Renamed");
}

// =============================================================================
// Components
// =============================================================================

#[test]
fn add_component_then_write_through_view() {
    let context = ScriptContext::new(Scene::new("bridge"));
    let _guard = bind(&context);

    let entity = Entity::create_entity("Tile").unwrap();
    assert!(!entity.has_component::<SpriteRendererComponent>());
    let sprite = entity.add_component::<SpriteRendererComponent>().unwrap();
    assert!(entity.has_component::<SpriteRendererComponent>());

    let red = Vector4::new(1.0, 0.0, 0.0, 1.0);
    sprite.set_color(red);
    sprite.set_tiling_factor(4.0);
    assert_eq!(sprite.color(), red);
    assert!(approx_eq(sprite.tiling_factor(), 4.0));

    match entity.require_component::<CameraComponent>() {
        Err(ScriptError::MissingComponent { entity_id, .. }) => assert_eq!(entity_id, entity.id()),
        other => panic!("unexpected {:?}", other),
    }
}

#[test]
fn views_outlive_their_entity_harmlessly() {
    let context = ScriptContext::new(player_scene());
    let _guard = bind(&context);

    let player = Entity::find_entity_by_name("Player").unwrap();
    let transform = player.get_component::<TransformComponent>().unwrap();
    let body = player.get_component::<Rigidbody2DComponent>().unwrap();
    player.destroy();

    assert!(!player.is_valid());
    assert_eq!(player.name(), "");
    assert_eq!(transform.position(), Vector3::ZERO);
    transform.set_position(Vector3::ONE);
    body.apply_linear_impulse_to_center(Vector2::ONE, true);
    assert_eq!(body.linear_velocity(), Vector2::ZERO);
    assert!(player.get_component::<TransformComponent>().is_none());
}

// =============================================================================
// Hierarchy
// =============================================================================

#[test]
fn destroying_parent_takes_children() {
    let context = ScriptContext::new(Scene::new("bridge"));
    let _guard = bind(&context);

    let ship = Entity::create_entity("Ship").unwrap();
    let gun = Entity::create_entity("Gun").unwrap();
    let barrel = Entity::create_entity("Barrel").unwrap();
    gun.set_parent(Some(ship));
    barrel.set_parent(Some(gun));

    assert_eq!(ship.children(), vec![gun]);
    assert_eq!(barrel.parent(), Some(gun));

    ship.destroy();
    assert!(!ship.is_valid());
    assert!(!gun.is_valid());
    assert!(!barrel.is_valid());
}

#[test]
fn reparenting_detaches_from_old_parent() {
    let context = ScriptContext::new(Scene::new("bridge"));
    let _guard = bind(&context);

    let a = Entity::create_entity("A").unwrap();
    let b = Entity::create_entity("B").unwrap();
    let child = Entity::create_entity("Child").unwrap();
    child.set_parent(Some(a));
    child.set_parent(Some(b));
    assert!(a.children().is_empty());
    assert_eq!(b.children(), vec![child]);

    child.set_parent(None);
    assert_eq!(child.parent(), None);
    assert!(b.children().is_empty());
}

// =============================================================================
// Audio
// =============================================================================

#[test]
fn master_volume_is_clamped_and_mutable() {
    let context = ScriptContext::new(Scene::new("bridge"));
    let _guard = bind(&context);

    Audio::set_master_volume(1.5);
    assert!(approx_eq(Audio::master_volume(), 1.0));
    Audio::set_master_volume(0.25);
    assert!(approx_eq(Audio::master_volume(), 0.25));

    assert!(!Audio::is_muted());
    Audio::toggle_mute();
    assert!(Audio::is_muted());
    assert!(approx_eq(context.scene().audio().output_volume(), 0.0));
}

#[test]
fn unbound_calls_are_absorbed() {
    assert!(Entity::find_entity_by_name("Player").is_none());
    assert!(Entity::create_entity("Ghost").is_none());
    assert!(approx_eq(Audio::master_volume(), 0.0));
    Audio::toggle_mute();
    assert!(!Audio::is_muted());
}
