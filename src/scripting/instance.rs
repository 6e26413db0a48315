//! Live behavior instances, one per scripted entity.

use std::cell::{Cell, RefCell, RefMut};
use std::rc::Rc;

use rustc_hash::FxHashMap;

use super::behavior::Behavior;

/// A behavior object bound to an entity.
///
/// The behavior sits behind a `RefCell`: the driver borrows it mutably for
/// the duration of one callback, and other scripts can only reach it through
/// [`ScriptInstance::try_behavior_mut`] when it is not currently executing.
pub struct ScriptInstance {
    entity_id: u64,
    class_name: String,
    behavior: RefCell<Box<dyn Behavior>>,
    destroyed: Cell<bool>,
}

impl ScriptInstance {
    pub fn new(entity_id: u64, class_name: impl Into<String>, behavior: Box<dyn Behavior>) -> Self {
        Self {
            entity_id,
            class_name: class_name.into(),
            behavior: RefCell::new(behavior),
            destroyed: Cell::new(false),
        }
    }

    pub fn entity_id(&self) -> u64 {
        self.entity_id
    }

    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    /// `None` while the behavior is running one of its own callbacks.
    pub fn try_behavior_mut(&self) -> Option<RefMut<'_, Box<dyn Behavior>>> {
        self.behavior.try_borrow_mut().ok()
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed.get()
    }

    pub(crate) fn mark_destroyed(&self) {
        self.destroyed.set(true);
    }
}

/// Instances keyed by entity handle, remembering creation order so callbacks
/// run in a stable sequence.
#[derive(Default)]
pub struct InstanceTable {
    order: Vec<u64>,
    map: FxHashMap<u64, Rc<ScriptInstance>>,
}

impl InstanceTable {
    pub fn insert(&mut self, instance: ScriptInstance) -> Rc<ScriptInstance> {
        let id = instance.entity_id();
        let instance = Rc::new(instance);
        if self.map.insert(id, instance.clone()).is_none() {
            self.order.push(id);
        }
        instance
    }

    pub fn get(&self, entity_id: u64) -> Option<Rc<ScriptInstance>> {
        self.map.get(&entity_id).cloned()
    }

    pub fn contains(&self, entity_id: u64) -> bool {
        self.map.contains_key(&entity_id)
    }

    pub fn remove(&mut self, entity_id: u64) -> Option<Rc<ScriptInstance>> {
        let removed = self.map.remove(&entity_id)?;
        self.order.retain(|id| *id != entity_id);
        Some(removed)
    }

    /// Snapshot of the handles in creation order.
    pub fn ids(&self) -> Vec<u64> {
        self.order.clone()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Removes every instance, returning them in creation order.
    pub fn drain(&mut self) -> Vec<Rc<ScriptInstance>> {
        let order = std::mem::take(&mut self.order);
        order
            .into_iter()
            .filter_map(|id| self.map.remove(&id))
            .collect()
    }
}
