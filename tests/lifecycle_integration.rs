//! Lifecycle integration tests: callback order, deferred destruction, contacts
//! and fault isolation, driven through `ScriptEngine` frames.

use std::cell::RefCell;
use std::rc::Rc;

use glam::{Vec2, Vec3};

use scriptcore::components::colliders::BoxCollider2D;
use scriptcore::components::rigidbody2d::{BodyType, Rigidbody2D};
use scriptcore::components::script::Script;
use scriptcore::interop::Physics2DContact;
use scriptcore::scene::Scene;
use scriptcore::scripting::{
    Behavior, Entity, ScriptComponent, ScriptEngine, ScriptError, ScriptRegistry, ScriptResult,
    Timestep,
};

const DT: f32 = 1.0 / 60.0;

type Journal = Rc<RefCell<Vec<String>>>;

/// Records every callback as `"<entity name>:<callback>"`.
struct Recorder {
    journal: Journal,
}

impl Recorder {
    fn note(&self, entity: Entity, what: &str) {
        self.journal
            .borrow_mut()
            .push(format!("{}:{}", entity.name(), what));
    }
}

impl Behavior for Recorder {
    fn on_create(&mut self, entity: Entity) -> ScriptResult {
        self.note(entity, "create");
        Ok(())
    }

    fn on_start(&mut self, entity: Entity) -> ScriptResult {
        self.note(entity, "start");
        Ok(())
    }

    fn on_update(&mut self, entity: Entity, _ts: Timestep) -> ScriptResult {
        self.note(entity, "update");
        Ok(())
    }

    fn on_late_update(&mut self, entity: Entity, _ts: Timestep) -> ScriptResult {
        self.note(entity, "late");
        Ok(())
    }

    fn on_destroy(&mut self, entity: Entity) -> ScriptResult {
        self.note(entity, "destroy");
        Ok(())
    }

    fn on_trigger_enter_2d(&mut self, entity: Entity, contact: Physics2DContact) -> ScriptResult {
        let other = contact.other_entity().map(|e| e.name()).unwrap_or_default();
        self.note(entity, &format!("trigger_enter({})", other));
        Ok(())
    }

    fn on_trigger_exit_2d(&mut self, entity: Entity, contact: Physics2DContact) -> ScriptResult {
        let other = contact.other_entity().map(|e| e.name()).unwrap_or_default();
        self.note(entity, &format!("trigger_exit({})", other));
        Ok(())
    }

    fn on_collision_enter_2d(&mut self, entity: Entity, _contact: Physics2DContact) -> ScriptResult {
        self.note(entity, "collision_enter");
        Ok(())
    }
}

/// Destroys itself on its first update.
#[derive(Default)]
struct SelfDestruct;

impl Behavior for SelfDestruct {
    fn on_update(&mut self, entity: Entity, _ts: Timestep) -> ScriptResult {
        entity.destroy();
        Ok(())
    }
}

/// Destroys the entity named "Victim" from its own `on_destroy`, optionally
/// destroying itself on its first update.
struct Killer {
    journal: Journal,
    self_destruct: bool,
}

impl Behavior for Killer {
    fn on_update(&mut self, entity: Entity, _ts: Timestep) -> ScriptResult {
        if self.self_destruct {
            entity.destroy();
        }
        Ok(())
    }

    fn on_destroy(&mut self, entity: Entity) -> ScriptResult {
        self.journal
            .borrow_mut()
            .push(format!("{}:destroy", entity.name()));
        Entity::require_entity_by_name("Victim")?.destroy();
        Ok(())
    }
}

/// Fails or panics on every update.
#[derive(Default)]
struct Faulty {
    panic: bool,
}

impl Behavior for Faulty {
    fn on_update(&mut self, _entity: Entity, _ts: Timestep) -> ScriptResult {
        if self.panic {
            panic!("faulty behavior");
        }
        Err(ScriptError::custom("faulty behavior"))
    }
}

/// Spawns one scripted `Recorder` entity on its first update.
#[derive(Default)]
struct Spawner {
    done: bool,
}

impl Behavior for Spawner {
    fn on_update(&mut self, _entity: Entity, _ts: Timestep) -> ScriptResult {
        if self.done {
            return Ok(());
        }
        self.done = true;
        let spawned = Entity::create_entity("Spawned").ok_or_else(|| ScriptError::custom("no scene"))?;
        spawned
            .add_component::<ScriptComponent>()
            .ok_or_else(|| ScriptError::custom("no script component"))?
            .set_class_name("Recorder");
        Ok(())
    }
}

fn registry(journal: &Journal) -> ScriptRegistry {
    let mut registry = ScriptRegistry::default();
    let journal = journal.clone();
    let recorders = journal.clone();
    registry.register_with("Recorder", move || {
        Box::new(Recorder {
            journal: recorders.clone(),
        })
    });
    registry.register::<SelfDestruct>("SelfDestruct");
    let killers = journal.clone();
    registry.register_with("Killer", move || {
        Box::new(Killer {
            journal: killers.clone(),
            self_destruct: false,
        })
    });
    let killers = journal.clone();
    registry.register_with("ChainKiller", move || {
        Box::new(Killer {
            journal: killers.clone(),
            self_destruct: true,
        })
    });
    registry.register::<Spawner>("Spawner");
    registry.register_with("Failing", || Box::new(Faulty { panic: false }));
    registry.register_with("Panicking", || Box::new(Faulty { panic: true }));
    registry
}

fn scripted(scene: &mut Scene, name: &str, class: &str) -> u64 {
    let id = scene.create_entity(name);
    scene.insert(id, Script::new(class));
    id
}

fn entries(journal: &Journal, suffix: &str) -> Vec<String> {
    journal
        .borrow()
        .iter()
        .filter(|e| e.ends_with(suffix))
        .cloned()
        .collect()
}

fn position(journal: &Journal, entry: &str) -> usize {
    journal
        .borrow()
        .iter()
        .position(|e| e == entry)
        .unwrap_or_else(|| panic!("{} not recorded", entry))
}

// =============================================================================
// Ordering
// =============================================================================

#[test]
fn every_create_runs_before_any_start() {
    let journal = Journal::default();
    let mut scene = Scene::new("lifecycle");
    scripted(&mut scene, "A", "Recorder");
    scripted(&mut scene, "B", "Recorder");
    let mut engine = ScriptEngine::with_registry(scene, registry(&journal));

    engine.start();
    let last_create = position(&journal, "A:create").max(position(&journal, "B:create"));
    let first_start = position(&journal, "A:start").min(position(&journal, "B:start"));
    assert!(last_create < first_start);
    engine.stop();
}

#[test]
fn every_update_runs_before_any_late_update() {
    let journal = Journal::default();
    let mut scene = Scene::new("lifecycle");
    for name in ["A", "B", "C"] {
        scripted(&mut scene, name, "Recorder");
    }
    let mut engine = ScriptEngine::with_registry(scene, registry(&journal));
    engine.start();
    journal.borrow_mut().clear();

    engine.update(DT);
    let frame = journal.borrow().clone();
    assert_eq!(frame.len(), 6);
    assert!(frame[..3].iter().all(|e| e.ends_with(":update")));
    assert!(frame[3..].iter().all(|e| e.ends_with(":late")));
    engine.stop();
}

#[test]
fn stop_destroys_every_instance() {
    let journal = Journal::default();
    let mut scene = Scene::new("lifecycle");
    scripted(&mut scene, "A", "Recorder");
    scripted(&mut scene, "B", "Recorder");
    let mut engine = ScriptEngine::with_registry(scene, registry(&journal));
    engine.start();
    engine.update(DT);
    engine.stop();

    assert_eq!(entries(&journal, ":destroy").len(), 2);
    assert_eq!(engine.instance_count(), 0);
    assert!(!engine.is_running());

    // Stopped: frames do nothing
    journal.borrow_mut().clear();
    engine.update(DT);
    assert!(journal.borrow().is_empty());
}

// =============================================================================
// Destruction and creation while running
// =============================================================================

#[test]
fn destroy_is_deferred_to_frame_end() {
    let journal = Journal::default();
    let mut scene = Scene::new("lifecycle");
    let doomed = scripted(&mut scene, "Doomed", "SelfDestruct");
    scripted(&mut scene, "Watcher", "Recorder");
    let mut engine = ScriptEngine::with_registry(scene, registry(&journal));
    engine.start();

    engine.update(DT);
    assert!(!engine.scene().contains(doomed));
    assert!(engine.instance(doomed).is_none());
    // The watcher still ran its full frame
    assert_eq!(entries(&journal, "Watcher:late").len(), 1);
    engine.stop();
}

#[test]
fn entity_spawned_while_running_starts_next_frame() {
    let journal = Journal::default();
    let mut scene = Scene::new("lifecycle");
    scripted(&mut scene, "Spawner", "Spawner");
    let mut engine = ScriptEngine::with_registry(scene, registry(&journal));
    engine.start();

    engine.update(DT);
    assert!(journal.borrow().is_empty());

    engine.update(DT);
    let frame = journal.borrow().clone();
    assert_eq!(
        frame,
        vec![
            "Spawned:create".to_string(),
            "Spawned:start".to_string(),
            "Spawned:update".to_string(),
            "Spawned:late".to_string(),
        ]
    );
    engine.stop();
}

#[test]
fn destroy_from_on_destroy_is_flushed_in_the_same_frame() {
    let journal = Journal::default();
    let mut scene = Scene::new("lifecycle");
    let killer = scripted(&mut scene, "Killer", "ChainKiller");
    let victim = scripted(&mut scene, "Victim", "Recorder");
    let mut engine = ScriptEngine::with_registry(scene, registry(&journal));
    engine.start();
    journal.borrow_mut().clear();

    engine.update(DT);
    assert!(!engine.scene().contains(killer));
    assert!(!engine.scene().contains(victim));
    assert!(engine.instance(victim).is_none());
    assert_eq!(
        journal.borrow().clone(),
        vec![
            "Victim:update".to_string(),
            "Victim:late".to_string(),
            "Killer:destroy".to_string(),
            "Victim:destroy".to_string(),
        ]
    );
    engine.stop();
}

#[test]
fn destroy_from_on_destroy_during_stop_removes_the_entity() {
    let journal = Journal::default();
    let mut scene = Scene::new("lifecycle");
    scripted(&mut scene, "Killer", "Killer");
    let victim = scene.create_entity("Victim");
    let limb = scene.create_entity("Limb");
    scene.set_parent(limb, Some(victim));
    let mut engine = ScriptEngine::with_registry(scene, registry(&journal));
    engine.start();
    engine.update(DT);
    engine.stop();

    assert_eq!(entries(&journal, "Killer:destroy").len(), 1);
    let scene = engine.scene();
    assert!(!scene.contains(victim));
    assert!(!scene.contains(limb));
    assert!(scene.find_entity_by_name("Victim").is_none());
    assert!(!scene.is_pending_destroy(victim));
}

// =============================================================================
// Fault isolation
// =============================================================================

#[test]
fn failing_behaviors_do_not_stop_the_frame() {
    let journal = Journal::default();
    let mut scene = Scene::new("lifecycle");
    scripted(&mut scene, "Bad", "Failing");
    scripted(&mut scene, "Worse", "Panicking");
    scripted(&mut scene, "Good", "Recorder");
    scripted(&mut scene, "Unknown", "NoSuchClass");
    let mut engine = ScriptEngine::with_registry(scene, registry(&journal));
    engine.start();

    engine.update(DT);
    engine.update(DT);
    assert_eq!(entries(&journal, "Good:update").len(), 2);
    assert_eq!(entries(&journal, "Good:late").len(), 2);
    engine.stop();
}

// =============================================================================
// Pause and step
// =============================================================================

#[test]
fn paused_scene_only_advances_step_frames() {
    let journal = Journal::default();
    let mut scene = Scene::new("lifecycle");
    scripted(&mut scene, "A", "Recorder");
    let mut engine = ScriptEngine::with_registry(scene, registry(&journal));
    engine.start();
    engine.scene_mut().set_paused(true);

    engine.update(DT);
    assert!(entries(&journal, ":update").is_empty());

    engine.scene_mut().step(2);
    for _ in 0..4 {
        engine.update(DT);
    }
    assert_eq!(entries(&journal, ":update").len(), 2);
    assert_eq!(engine.scene().time().frame_count, 2);
    engine.stop();
}

// =============================================================================
// Contacts
// =============================================================================

#[test]
fn sensor_contact_reaches_both_participants() {
    let journal = Journal::default();
    let mut scene = Scene::new("lifecycle");

    let mover = scripted(&mut scene, "Mover", "Recorder");
    scene.insert(
        mover,
        (
            Rigidbody2D {
                gravity_scale: 0.0,
                linear_velocity: Vec2::new(30.0, 0.0),
                ..Rigidbody2D::new(BodyType::Dynamic)
            },
            BoxCollider2D::default(),
        ),
    );
    let zone = scripted(&mut scene, "Zone", "Recorder");
    scene.set_position(zone, Vec3::new(2.0, 0.0, 0.0));
    scene.insert(
        zone,
        (
            Rigidbody2D::new(BodyType::Static),
            BoxCollider2D {
                is_sensor: true,
                ..BoxCollider2D::default()
            },
        ),
    );

    let mut engine = ScriptEngine::with_registry(scene, registry(&journal));
    engine.start();
    for _ in 0..12 {
        engine.update(DT);
    }

    assert_eq!(entries(&journal, "Mover:trigger_enter(Zone)").len(), 1);
    assert_eq!(entries(&journal, "Zone:trigger_enter(Mover)").len(), 1);
    assert_eq!(entries(&journal, "Mover:trigger_exit(Zone)").len(), 1);
    assert!(entries(&journal, "collision_enter").is_empty());

    // Contact callbacks land between update and late update of the same frame
    let journal = journal.borrow();
    let enter = journal
        .iter()
        .position(|e| e.contains("trigger_enter"))
        .unwrap();
    assert!(journal[enter - 1].ends_with(":update"));
    assert!(journal[enter + 2].ends_with(":late"));
    drop(journal);
    engine.stop();
}

#[test]
fn destroying_a_participant_ends_its_contacts() {
    let journal = Journal::default();
    let mut scene = Scene::new("lifecycle");

    let mover = scripted(&mut scene, "Mover", "Recorder");
    scene.insert(
        mover,
        (
            Rigidbody2D {
                gravity_scale: 0.0,
                ..Rigidbody2D::new(BodyType::Dynamic)
            },
            BoxCollider2D::default(),
        ),
    );
    let zone = scripted(&mut scene, "Zone", "Recorder");
    scene.set_position(zone, Vec3::new(0.5, 0.0, 0.0));
    scene.insert(
        zone,
        (
            Rigidbody2D::new(BodyType::Static),
            BoxCollider2D {
                is_sensor: true,
                ..BoxCollider2D::default()
            },
        ),
    );

    let mut engine = ScriptEngine::with_registry(scene, registry(&journal));
    engine.start();
    engine.update(DT);
    assert_eq!(entries(&journal, "Zone:trigger_enter(Mover)").len(), 1);

    engine.scene_mut().destroy_entity(mover);
    for _ in 0..3 {
        engine.update(DT);
    }

    assert!(!engine.scene().contains(mover));
    // The other participant is still readable when the exit arrives
    assert_eq!(entries(&journal, "Zone:trigger_exit(Mover)").len(), 1);
    assert!(entries(&journal, "Mover:trigger_exit(Zone)").is_empty());
    assert!(position(&journal, "Mover:destroy") < position(&journal, "Zone:trigger_exit(Mover)"));
    engine.stop();
}
