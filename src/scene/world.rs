//! The native scene: a `bevy_ecs` world plus the handle map scripts address it through.

use bevy_ecs::component::Mutable;
use bevy_ecs::hierarchy::{ChildOf, Children};
use bevy_ecs::prelude::*;
use glam::Vec3;
use log::{debug, warn};
use rustc_hash::{FxHashMap, FxHashSet};

use super::registry::ComponentKind;
use crate::components::audiosource::AudioSource;
use crate::components::id::{EntityId, INVALID_ENTITY_ID, Tag};
use crate::components::script::{PendingDestroy, Script};
use crate::components::transform::Transform;
use crate::events::audio::AudioMessage;
use crate::events::contact::ContactEvent;
use crate::resources::audio::{AudioBridge, AudioEngine, setup_audio, shutdown_audio};
use crate::resources::bridgeconfig::BridgeConfig;
use crate::resources::input::InputState;
use crate::resources::physics::{ContactTracker, PhysicsSettings};
use crate::resources::worldtime::WorldTime;
use crate::systems::audio::{poll_audio_messages, sync_audio_sources, update_bevy_audio_messages};
use crate::systems::contacts::detect_contacts;
use crate::systems::physics::rigidbody_step;
use crate::systems::time::update_world_time;

/// A scene owns every entity scripts can see.
///
/// Entities are addressed by their [`EntityId`] handle, never by the world's
/// own `Entity` ids, so a handle held by a script stays meaningful (and
/// harmlessly stale) after the entity is gone.
pub struct Scene {
    name: String,
    world: World,
    entity_map: FxHashMap<u64, Entity>,
    physics: Schedule,
    audio: Schedule,
    running: bool,
    paused: bool,
    step_frames: u32,
}

impl Scene {
    pub fn new(name: impl Into<String>) -> Self {
        let mut world = World::new();
        world.init_resource::<WorldTime>();
        world.init_resource::<InputState>();
        world.init_resource::<PhysicsSettings>();
        world.init_resource::<ContactTracker>();
        world.init_resource::<AudioEngine>();
        world.init_resource::<Messages<ContactEvent>>();
        world.init_resource::<Messages<AudioMessage>>();

        let mut physics = Schedule::default();
        physics.add_systems((rigidbody_step, detect_contacts).chain());

        let mut audio = Schedule::default();
        audio.add_systems(
            (poll_audio_messages, sync_audio_sources, update_bevy_audio_messages)
                .chain()
                .run_if(resource_exists::<AudioBridge>),
        );

        Self {
            name: name.into(),
            world,
            entity_map: FxHashMap::default(),
            physics,
            audio,
            running: false,
            paused: false,
            step_frames: 0,
        }
    }

    /// Creates a scene whose gravity and audio levels come from `config`.
    pub fn with_config(name: impl Into<String>, config: &BridgeConfig) -> Self {
        let mut scene = Self::new(name);
        scene.world.insert_resource(PhysicsSettings {
            gravity: config.gravity,
        });
        scene
            .world
            .insert_resource(AudioEngine::new(config.master_volume, config.muted));
        scene.world.insert_resource(config.clone());
        scene
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    // ==================== Creation ====================

    /// Creates an entity with a fresh random handle, a [`Tag`] and a default [`Transform`].
    pub fn create_entity(&mut self, name: &str) -> u64 {
        self.create_entity_with_transform(name, Transform::default())
    }

    /// Creates an entity whose transform is set in the same world write.
    pub fn create_entity_with_transform(&mut self, name: &str, transform: Transform) -> u64 {
        let id = self.fresh_id();
        self.spawn_with_id(id, name, transform);
        id
    }

    /// Creates an entity with a caller-chosen handle. Fails for `0` and for
    /// handles already in use.
    pub fn create_entity_with_id(&mut self, id: u64, name: &str) -> Option<u64> {
        if id == INVALID_ENTITY_ID || self.entity_map.contains_key(&id) {
            warn!("cannot create entity '{}' with handle {}", name, id);
            return None;
        }
        self.spawn_with_id(id, name, Transform::default());
        Some(id)
    }

    fn spawn_with_id(&mut self, id: u64, name: &str, transform: Transform) {
        let entity = self
            .world
            .spawn((EntityId(id), Tag::new(name), transform))
            .id();
        self.entity_map.insert(id, entity);
        debug!("created entity {} '{}'", id, name);
    }

    fn fresh_id(&self) -> u64 {
        loop {
            let id = fastrand::u64(1..);
            if !self.entity_map.contains_key(&id) {
                return id;
            }
        }
    }

    // ==================== Lookup ====================

    pub fn resolve(&self, id: u64) -> Option<Entity> {
        self.entity_map.get(&id).copied()
    }

    pub fn contains(&self, id: u64) -> bool {
        self.entity_map.contains_key(&id)
    }

    pub fn entity_count(&self) -> usize {
        self.entity_map.len()
    }

    /// Every live handle, in no particular order.
    pub fn entity_ids(&self) -> Vec<u64> {
        self.entity_map.keys().copied().collect()
    }

    pub fn component<C: Component>(&self, id: u64) -> Option<&C> {
        self.world.get::<C>(self.resolve(id)?)
    }

    pub fn component_mut<C: Component<Mutability = Mutable>>(&mut self, id: u64) -> Option<Mut<'_, C>> {
        let entity = self.resolve(id)?;
        self.world.get_mut::<C>(entity)
    }

    /// Inserts (or replaces) a bundle on an existing entity. Host-side setup helper.
    pub fn insert<B: Bundle>(&mut self, id: u64, bundle: B) -> bool {
        let Some(entity) = self.resolve(id) else {
            return false;
        };
        match self.world.get_entity_mut(entity) {
            Ok(mut e) => {
                e.insert(bundle);
                true
            }
            Err(_) => false,
        }
    }

    pub fn name_of(&self, id: u64) -> Option<&str> {
        self.component::<Tag>(id).map(Tag::as_str)
    }

    /// Linear scan over all entities. With several matches the one returned
    /// depends on map iteration order and is not stable.
    pub fn find_entity_by_name(&self, name: &str) -> Option<u64> {
        self.entity_map
            .iter()
            .find(|(_, entity)| {
                self.world
                    .get::<Tag>(**entity)
                    .is_some_and(|tag| tag.as_str() == name)
            })
            .map(|(id, _)| *id)
    }

    // ==================== Components by kind ====================

    pub fn has_component(&self, id: u64, kind: ComponentKind) -> bool {
        match (self.resolve(id), kind.native_ops()) {
            (Some(entity), Some(ops)) => (ops.has)(&self.world, entity),
            _ => false,
        }
    }

    /// Attaches a default component of `kind`.
    ///
    /// Adding a kind the entity already has is an error: it is logged and the
    /// existing component is kept. Returns whether a component was added.
    pub fn add_component(&mut self, id: u64, kind: ComponentKind) -> bool {
        let (Some(entity), Some(ops)) = (self.resolve(id), kind.native_ops()) else {
            debug!("add {} ignored for entity {}", kind, id);
            return false;
        };
        if (ops.has)(&self.world, entity) {
            warn!("entity {} already has {}", id, kind);
            return false;
        }
        (ops.add)(&mut self.world, entity);
        true
    }

    /// Detaches a component. Tag and Transform cannot be removed.
    pub fn remove_component(&mut self, id: u64, kind: ComponentKind) -> bool {
        if kind.is_intrinsic() {
            warn!("{} cannot be removed from entity {}", kind, id);
            return false;
        }
        let (Some(entity), Some(ops)) = (self.resolve(id), kind.native_ops()) else {
            return false;
        };
        if !(ops.has)(&self.world, entity) {
            return false;
        }
        (ops.remove)(&mut self.world, entity);
        true
    }

    // ==================== Hierarchy ====================

    pub fn parent(&self, id: u64) -> Option<u64> {
        let entity = self.resolve(id)?;
        let parent = self.world.get::<ChildOf>(entity)?.parent();
        self.world.get::<EntityId>(parent).map(|p| p.0)
    }

    /// Snapshot of the direct children at call time.
    pub fn children(&self, id: u64) -> Vec<u64> {
        let Some(children) = self.resolve(id).and_then(|e| self.world.get::<Children>(e)) else {
            return Vec::new();
        };
        children
            .iter()
            .filter_map(|child| self.world.get::<EntityId>(child).map(|c| c.0))
            .collect()
    }

    /// All descendants, depth first, parents before their children.
    pub fn descendants(&self, id: u64) -> Vec<u64> {
        let mut out = Vec::new();
        let mut stack: Vec<u64> = self.children(id).into_iter().rev().collect();
        while let Some(next) = stack.pop() {
            out.push(next);
            stack.extend(self.children(next).into_iter().rev());
        }
        out
    }

    /// Reparents `id` under `parent`, or detaches it with `None`.
    ///
    /// Attaching to itself or to one of its own descendants is refused.
    pub fn set_parent(&mut self, id: u64, parent: Option<u64>) -> bool {
        let Some(entity) = self.resolve(id) else {
            return false;
        };
        match parent {
            None => {
                if let Ok(mut e) = self.world.get_entity_mut(entity) {
                    e.remove::<ChildOf>();
                }
                true
            }
            Some(parent_id) => {
                let Some(parent_entity) = self.resolve(parent_id) else {
                    debug!("set_parent: parent {} of {} does not exist", parent_id, id);
                    return false;
                };
                if parent_id == id || self.descendants(id).contains(&parent_id) {
                    warn!("set_parent: {} under {} would create a cycle", id, parent_id);
                    return false;
                }
                if let Ok(mut e) = self.world.get_entity_mut(entity) {
                    e.insert(ChildOf(parent_entity));
                }
                true
            }
        }
    }

    // ==================== Destruction ====================

    /// Destroys an entity and all its descendants.
    ///
    /// While the runtime is running the removal is deferred: the entity is
    /// marked and stays readable until [`Scene::take_pending_destruction`]
    /// and [`Scene::despawn`] run at the end of the frame. Otherwise it is
    /// removed right away.
    pub fn destroy_entity(&mut self, id: u64) {
        let Some(entity) = self.resolve(id) else {
            debug!("destroy ignored for stale entity {}", id);
            return;
        };
        if self.running {
            if let Ok(mut e) = self.world.get_entity_mut(entity) {
                e.insert(PendingDestroy);
            }
        } else {
            let mut doomed = vec![id];
            doomed.extend(self.descendants(id));
            self.despawn(&doomed);
        }
    }

    pub fn is_pending_destroy(&self, id: u64) -> bool {
        self.component::<PendingDestroy>(id).is_some()
    }

    /// Handles of every marked entity plus their descendants, each subtree
    /// root before its children. Nothing is removed yet.
    pub fn take_pending_destruction(&mut self) -> Vec<u64> {
        let mut query = self
            .world
            .query_filtered::<&EntityId, With<PendingDestroy>>();
        let mut roots: Vec<u64> = query.iter(&self.world).map(|id| id.0).collect();
        roots.sort_unstable();

        let mut seen = FxHashSet::default();
        let mut out = Vec::new();
        for root in roots {
            for id in std::iter::once(root).chain(self.descendants(root)) {
                if seen.insert(id) {
                    out.push(id);
                }
            }
        }
        out
    }

    /// Ends every contact the given entities are part of and returns the end
    /// transitions. The entities themselves stay in the scene.
    pub fn end_contacts(&mut self, ids: &[u64]) -> Vec<ContactEvent> {
        let mut tracker = self.world.resource_mut::<ContactTracker>();
        ids.iter().flat_map(|id| tracker.forget(*id)).collect()
    }

    /// Removes the given entities from the world and the handle map.
    /// Unknown handles are skipped. Returns the contacts that ended with them.
    pub fn despawn(&mut self, ids: &[u64]) -> Vec<ContactEvent> {
        let mut ended = Vec::new();
        for id in ids {
            let Some(entity) = self.entity_map.remove(id) else {
                continue;
            };
            if self.world.get_entity(entity).is_ok() {
                self.world.despawn(entity);
            }
            ended.extend(self.world.resource_mut::<ContactTracker>().forget(*id));
            debug!("destroyed entity {}", id);
        }
        ended
    }

    // ==================== Runtime ====================

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn set_running(&mut self, running: bool) {
        self.running = running;
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn set_paused(&mut self, paused: bool) {
        self.paused = paused;
    }

    /// While paused, lets the next `frames` updates through.
    pub fn step(&mut self, frames: u32) {
        self.step_frames = frames;
    }

    /// Whether this frame should simulate. Consumes one step frame when paused.
    pub fn should_advance(&mut self) -> bool {
        if !self.paused {
            return true;
        }
        if self.step_frames > 0 {
            self.step_frames -= 1;
            return true;
        }
        false
    }

    pub fn advance_time(&mut self, dt: f32) {
        update_world_time(&mut self.world, dt);
    }

    pub fn time(&self) -> &WorldTime {
        self.world.resource::<WorldTime>()
    }

    /// Runs one physics step and returns the contact transitions it produced.
    pub fn step_physics(&mut self) -> Vec<ContactEvent> {
        self.physics.run(&mut self.world);
        self.world
            .resource_mut::<Messages<ContactEvent>>()
            .drain()
            .collect()
    }

    /// Starts the background audio thread for this scene.
    pub fn connect_audio(&mut self) {
        if !self.world.contains_resource::<AudioBridge>() {
            setup_audio(&mut self.world);
        }
    }

    pub fn disconnect_audio(&mut self) {
        shutdown_audio(&mut self.world);
    }

    /// Applies confirmations from the audio thread. Does nothing when no
    /// thread is connected.
    pub fn pump_audio(&mut self) {
        self.audio.run(&mut self.world);
    }

    /// Handles of every audio source currently flagged as playing.
    pub fn playing_sources(&mut self) -> Vec<u64> {
        let mut query = self.world.query::<(&EntityId, &AudioSource)>();
        query
            .iter(&self.world)
            .filter(|(_, source)| source.playing)
            .map(|(id, _)| id.0)
            .collect()
    }

    /// Handles and class names of every entity with a non-empty script class.
    pub fn scripted_entities(&mut self) -> Vec<(u64, String)> {
        let mut query = self.world.query::<(&EntityId, &Script)>();
        let mut out: Vec<(u64, String)> = query
            .iter(&self.world)
            .filter(|(_, script)| !script.class_name.is_empty())
            .map(|(id, script)| (id.0, script.class_name.clone()))
            .collect();
        out.sort_unstable_by_key(|(id, _)| *id);
        out
    }

    /// Handles of audio sources flagged to play when the runtime starts.
    pub fn auto_play_sources(&mut self) -> Vec<u64> {
        let mut query = self.world.query::<(&EntityId, &AudioSource)>();
        query
            .iter(&self.world)
            .filter(|(_, source)| source.auto_play_on_start && source.has_clip())
            .map(|(id, _)| id.0)
            .collect()
    }

    pub fn input(&self) -> &InputState {
        self.world.resource::<InputState>()
    }

    pub fn input_mut(&mut self) -> Mut<'_, InputState> {
        self.world.resource_mut::<InputState>()
    }

    pub fn audio(&self) -> &AudioEngine {
        self.world.resource::<AudioEngine>()
    }

    pub fn audio_mut(&mut self) -> Mut<'_, AudioEngine> {
        self.world.resource_mut::<AudioEngine>()
    }

    /// World position of an entity; zero for stale handles.
    pub fn position(&self, id: u64) -> Vec3 {
        self.component::<Transform>(id)
            .map(|t| t.position)
            .unwrap_or(Vec3::ZERO)
    }

    pub fn set_position(&mut self, id: u64, position: Vec3) -> bool {
        match self.component_mut::<Transform>(id) {
            Some(mut transform) => {
                transform.position = position;
                true
            }
            None => false,
        }
    }
}
