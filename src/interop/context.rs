//! The scene and instance table internal calls operate on.
//!
//! Internal calls are free functions without a receiver, so the context they
//! act on is bound per thread for the duration of a script run with [`bind`].
//! Every accessor borrows for a single call only; nothing is held across a
//! callback into user code.

use std::cell::{Ref, RefCell, RefMut};
use std::rc::Rc;

use log::trace;

use crate::scene::Scene;
use crate::scripting::instance::InstanceTable;

/// Everything a running script can reach.
pub struct ScriptContext {
    scene: RefCell<Scene>,
    instances: RefCell<InstanceTable>,
}

impl ScriptContext {
    pub fn new(scene: Scene) -> Rc<Self> {
        Rc::new(Self {
            scene: RefCell::new(scene),
            instances: RefCell::new(InstanceTable::default()),
        })
    }

    pub fn scene(&self) -> Ref<'_, Scene> {
        self.scene.borrow()
    }

    pub fn scene_mut(&self) -> RefMut<'_, Scene> {
        self.scene.borrow_mut()
    }

    /// `None` while the scene is borrowed elsewhere.
    pub fn try_scene_mut(&self) -> Option<RefMut<'_, Scene>> {
        self.scene.try_borrow_mut().ok()
    }

    pub fn instances(&self) -> Ref<'_, InstanceTable> {
        self.instances.borrow()
    }

    pub fn instances_mut(&self) -> RefMut<'_, InstanceTable> {
        self.instances.borrow_mut()
    }
}

thread_local! {
    static ACTIVE: RefCell<Option<Rc<ScriptContext>>> = const { RefCell::new(None) };
}

/// Restores the previously bound context when dropped.
#[must_use = "the context is unbound as soon as the guard is dropped"]
pub struct ContextGuard {
    previous: Option<Rc<ScriptContext>>,
}

impl Drop for ContextGuard {
    fn drop(&mut self) {
        let previous = self.previous.take();
        ACTIVE.with(|active| *active.borrow_mut() = previous);
    }
}

/// Makes `context` the target of internal calls on this thread.
pub fn bind(context: &Rc<ScriptContext>) -> ContextGuard {
    let previous = ACTIVE.with(|active| active.borrow_mut().replace(context.clone()));
    ContextGuard { previous }
}

pub fn active() -> Option<Rc<ScriptContext>> {
    ACTIVE.with(|active| active.borrow().clone())
}

pub fn is_bound() -> bool {
    ACTIVE.with(|active| active.borrow().is_some())
}

/// Runs `f` on the bound scene. `None` when nothing is bound or the scene is
/// already borrowed further up the stack.
pub fn with_scene<R>(f: impl FnOnce(&mut Scene) -> R) -> Option<R> {
    let Some(context) = active() else {
        trace!("internal call without a bound scene");
        return None;
    };
    let Ok(mut scene) = context.scene.try_borrow_mut() else {
        trace!("internal call while the scene is borrowed");
        return None;
    };
    Some(f(&mut scene))
}

pub fn with_instances<R>(f: impl FnOnce(&mut InstanceTable) -> R) -> Option<R> {
    let context = active()?;
    let Ok(mut instances) = context.instances.try_borrow_mut() else {
        trace!("internal call while the instance table is borrowed");
        return None;
    };
    Some(f(&mut instances))
}
