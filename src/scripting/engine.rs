//! The driver: owns the scene, instantiates behaviors and runs their
//! callbacks in frame order.
//!
//! One frame of [`ScriptEngine::update`]:
//!
//! 1. instantiate scripted entities created since the last frame
//!    (`on_create` for all of them, then `on_start`)
//! 2. advance world time
//! 3. `on_update` on every live instance
//! 4. physics step, then contact callbacks for every transition it produced
//! 5. `on_late_update` on every live instance
//! 6. flush deferred destruction (`on_destroy`, then removal from the world)
//! 7. apply audio confirmations
//!
//! Every callback runs with the scene unborrowed, so behaviors can use the
//! full internal call surface. A callback that returns an error or panics is
//! logged against its entity; the frame goes on with the next instance.

use std::any::Any;
use std::cell::{Ref, RefMut};
use std::panic::{self, AssertUnwindSafe};
use std::rc::Rc;

use log::{debug, error, info, warn};
use rustc_hash::{FxHashMap, FxHashSet};

use super::behavior::Behavior;
use super::entity::Entity;
use super::error::ScriptResult;
use super::fields::FieldOverrides;
use super::instance::ScriptInstance;
use crate::events::contact::{ContactEvent, ContactPhase};
use crate::interop::{Physics2DContact, ScriptContext, bind};
use crate::interop::internal_calls::{audio_source_component_play, audio_source_component_stop};
use crate::scene::Scene;

/// Builds a fresh behavior for one entity.
pub type BehaviorFactory = Box<dyn Fn() -> Box<dyn Behavior>>;

/// Script class name to behavior factory.
#[derive(Default)]
pub struct ScriptRegistry {
    factories: FxHashMap<String, BehaviorFactory>,
}

impl ScriptRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `T` under `class_name`. A second registration replaces the first.
    pub fn register<T: Behavior + Default>(&mut self, class_name: &str) {
        self.register_with(class_name, || Box::new(T::default()));
    }

    pub fn register_with(
        &mut self,
        class_name: &str,
        factory: impl Fn() -> Box<dyn Behavior> + 'static,
    ) {
        if self
            .factories
            .insert(class_name.to_string(), Box::new(factory))
            .is_some()
        {
            warn!("script class '{}' registered twice, keeping the last one", class_name);
        }
    }

    pub fn contains(&self, class_name: &str) -> bool {
        self.factories.contains_key(class_name)
    }

    pub fn instantiate(&self, class_name: &str) -> Option<Box<dyn Behavior>> {
        self.factories.get(class_name).map(|factory| factory())
    }

    /// Registered names, sorted.
    pub fn class_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.factories.keys().cloned().collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.factories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }
}

pub struct ScriptEngine {
    context: Rc<ScriptContext>,
    registry: ScriptRegistry,
    overrides: FieldOverrides,
    unknown_classes: FxHashSet<String>,
}

impl ScriptEngine {
    pub fn new(scene: Scene) -> Self {
        Self::with_registry(scene, ScriptRegistry::default())
    }

    pub fn with_registry(scene: Scene, registry: ScriptRegistry) -> Self {
        Self {
            context: ScriptContext::new(scene),
            registry,
            overrides: FieldOverrides::default(),
            unknown_classes: FxHashSet::default(),
        }
    }

    pub fn registry(&self) -> &ScriptRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut ScriptRegistry {
        &mut self.registry
    }

    /// Field values applied to new instances before `on_create`, keyed by
    /// entity name.
    pub fn set_field_overrides(&mut self, overrides: FieldOverrides) {
        self.overrides = overrides;
    }

    pub fn context(&self) -> &Rc<ScriptContext> {
        &self.context
    }

    /// Host-side scene access. Must not be held across `start`, `update` or `stop`.
    pub fn scene(&self) -> Ref<'_, Scene> {
        self.context.scene()
    }

    pub fn scene_mut(&self) -> RefMut<'_, Scene> {
        self.context.scene_mut()
    }

    pub fn is_running(&self) -> bool {
        self.context.scene().is_running()
    }

    pub fn instance(&self, entity_id: u64) -> Option<Rc<ScriptInstance>> {
        self.context.instances().get(entity_id)
    }

    pub fn instance_count(&self) -> usize {
        self.context.instances().len()
    }

    // ==================== Runtime ====================

    /// Starts the runtime: instantiates every scripted entity, runs all
    /// `on_create`, then all `on_start`, then starts auto-play audio sources.
    pub fn start(&mut self) {
        if self.is_running() {
            warn!("runtime already running");
            return;
        }
        let _guard = bind(&self.context);
        self.context.scene_mut().set_running(true);
        info!("runtime started for scene '{}'", self.context.scene().name());

        self.instantiate_pending();

        let sources = self.context.scene_mut().auto_play_sources();
        for entity_id in sources {
            audio_source_component_play(entity_id);
        }
    }

    /// Runs one frame. Does nothing while stopped, or while paused with no
    /// step frames left.
    pub fn update(&mut self, dt: f32) {
        if !self.is_running() || !self.context.scene_mut().should_advance() {
            return;
        }
        let _guard = bind(&self.context);

        self.instantiate_pending();
        let ts = {
            let mut scene = self.context.scene_mut();
            scene.advance_time(dt);
            scene.time().timestep()
        };

        for instance in self.live_instances() {
            invoke(&instance, "on_update", |b, e| b.on_update(e, ts));
        }

        let contacts = self.context.scene_mut().step_physics();
        self.dispatch_contacts(&contacts);

        for instance in self.live_instances() {
            invoke(&instance, "on_late_update", |b, e| b.on_late_update(e, ts));
        }

        self.flush_destroyed();
        self.context.scene_mut().pump_audio();
    }

    /// Stops the runtime: `on_destroy` on every live instance, then stops
    /// every playing audio source. Entities destroyed from those callbacks
    /// are removed before this returns.
    pub fn stop(&mut self) {
        if !self.is_running() {
            return;
        }
        let _guard = bind(&self.context);
        let instances = self.context.instances_mut().drain();
        for instance in &instances {
            invoke(instance, "on_destroy", |b, e| b.on_destroy(e));
            instance.mark_destroyed();
        }
        drop(instances);

        let playing = self.context.scene_mut().playing_sources();
        for entity_id in playing {
            audio_source_component_stop(entity_id);
        }
        let mut scene = self.context.scene_mut();
        // Destruction requested from on_destroy above
        let doomed = scene.take_pending_destruction();
        scene.despawn(&doomed);
        scene.set_running(false);
        info!("runtime stopped for scene '{}'", scene.name());
    }

    // ==================== Frame steps ====================

    fn live_instances(&self) -> Vec<Rc<ScriptInstance>> {
        let instances = self.context.instances();
        instances
            .ids()
            .into_iter()
            .filter_map(|id| instances.get(id))
            .filter(|instance| !instance.is_destroyed())
            .collect()
    }

    /// Creates instances for scripted entities that have none yet, then runs
    /// `on_create` on all of them, then `on_start`.
    fn instantiate_pending(&mut self) {
        let candidates = self.context.scene_mut().scripted_entities();
        let mut created = Vec::new();
        for (entity_id, class_name) in candidates {
            if self.context.instances().contains(entity_id)
                || self.context.scene().is_pending_destroy(entity_id)
            {
                continue;
            }
            let Some(mut behavior) = self.registry.instantiate(&class_name) else {
                if self.unknown_classes.insert(class_name.clone()) {
                    error!("script class '{}' is not registered", class_name);
                }
                continue;
            };
            self.apply_overrides(entity_id, behavior.as_mut());
            let instance = ScriptInstance::new(entity_id, class_name, behavior);
            created.push(self.context.instances_mut().insert(instance));
        }
        if created.is_empty() {
            return;
        }
        debug!("instantiated {} script(s)", created.len());
        for instance in &created {
            invoke(instance, "on_create", |b, e| b.on_create(e));
        }
        for instance in &created {
            if !instance.is_destroyed() {
                invoke(instance, "on_start", |b, e| b.on_start(e));
            }
        }
    }

    fn apply_overrides(&self, entity_id: u64, behavior: &mut dyn Behavior) {
        let name = match self.context.scene().name_of(entity_id) {
            Some(name) => name.to_string(),
            None => return,
        };
        let Some(fields) = self.overrides.get(&name) else {
            return;
        };
        for (field, value) in fields {
            if !behavior.set_field(field, value) {
                warn!("entity '{}' has no {} field '{}'", name, value.field_type(), field);
            }
        }
    }

    /// Calls the trigger or collision callback of both participants of each
    /// contact transition.
    fn dispatch_contacts(&self, contacts: &[ContactEvent]) {
        for event in contacts {
            for (collider, other) in [(event.a, event.b), (event.b, event.a)] {
                let Some(instance) = self.instance(collider) else {
                    continue;
                };
                if instance.is_destroyed() {
                    continue;
                }
                let contact = Physics2DContact {
                    collider_entity_id: collider,
                    other_entity_id: other,
                };
                match (event.sensor, event.phase) {
                    (true, ContactPhase::Begin) => invoke(&instance, "on_trigger_enter_2d", |b, e| {
                        b.on_trigger_enter_2d(e, contact)
                    }),
                    (true, ContactPhase::End) => invoke(&instance, "on_trigger_exit_2d", |b, e| {
                        b.on_trigger_exit_2d(e, contact)
                    }),
                    (false, ContactPhase::Begin) => {
                        invoke(&instance, "on_collision_enter_2d", |b, e| {
                            b.on_collision_enter_2d(e, contact)
                        })
                    }
                    (false, ContactPhase::End) => invoke(&instance, "on_collision_exit_2d", |b, e| {
                        b.on_collision_exit_2d(e, contact)
                    }),
                }
            }
        }
    }

    /// Removes every entity marked for destruction this frame. Entities are
    /// still readable while their `on_destroy` runs, and while survivors get
    /// the exit callbacks of contacts that end with them. Destruction
    /// requested from any of those callbacks is handled in the same flush.
    fn flush_destroyed(&mut self) {
        loop {
            let doomed = self.context.scene_mut().take_pending_destruction();
            if doomed.is_empty() {
                return;
            }
            for &entity_id in &doomed {
                let Some(instance) = self.instance(entity_id) else {
                    continue;
                };
                if !instance.is_destroyed() {
                    invoke(&instance, "on_destroy", |b, e| b.on_destroy(e));
                    instance.mark_destroyed();
                }
                self.context.instances_mut().remove(entity_id);
            }
            let ended = self.context.scene_mut().end_contacts(&doomed);
            self.dispatch_contacts(&ended);
            self.context.scene_mut().despawn(&doomed);
        }
    }
}

impl Drop for ScriptEngine {
    fn drop(&mut self) {
        self.stop();
        if let Some(mut scene) = self.context.try_scene_mut() {
            scene.disconnect_audio();
        }
    }
}

/// Runs one callback on `instance`, isolating errors and panics.
fn invoke(
    instance: &ScriptInstance,
    callback: &'static str,
    f: impl FnOnce(&mut dyn Behavior, Entity) -> ScriptResult,
) {
    let entity = Entity::from_id(instance.entity_id());
    let Some(mut behavior) = instance.try_behavior_mut() else {
        warn!(
            "{}::{} skipped for entity {}: behavior is busy",
            instance.class_name(),
            callback,
            entity.id()
        );
        return;
    };
    let outcome = panic::catch_unwind(AssertUnwindSafe(|| f(behavior.as_mut(), entity)));
    match outcome {
        Ok(Ok(())) => {}
        Ok(Err(err)) => error!(
            "{}::{} failed on entity {}: {}",
            instance.class_name(),
            callback,
            entity.id(),
            err
        ),
        Err(payload) => error!(
            "{}::{} panicked on entity {}: {}",
            instance.class_name(),
            callback,
            entity.id(),
            panic_message(payload.as_ref())
        ),
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message
    } else {
        "unknown panic"
    }
}
