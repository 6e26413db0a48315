//! The contract every scripted object implements.

use std::any::Any;

use super::entity::Entity;
use super::error::ScriptResult;
use super::fields::{ScriptField, ScriptFieldValue};
use super::timestep::Timestep;
use crate::interop::Physics2DContact;

/// Upcast to `Any`, so a behavior handed back by the scene can be checked
/// against a concrete type.
pub trait AsAny: Any {
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// A user behavior bound to one entity.
///
/// Every callback has an empty default. The driver calls them in this order:
///
/// - `on_create` once, after the entity and its components exist
/// - `on_start` once, after every instance alive at the time has been created
/// - `on_update` then `on_late_update` every frame; no `on_late_update` of a
///   frame runs before all `on_update` calls of that frame
/// - contact callbacks after the physics step, between the two update passes
/// - `on_destroy` once; the instance is dropped afterwards
///
/// Returning an error (or panicking) is logged against the entity and does
/// not stop the frame.
pub trait Behavior: AsAny {
    fn on_create(&mut self, _entity: Entity) -> ScriptResult {
        Ok(())
    }

    fn on_start(&mut self, _entity: Entity) -> ScriptResult {
        Ok(())
    }

    fn on_update(&mut self, _entity: Entity, _ts: Timestep) -> ScriptResult {
        Ok(())
    }

    fn on_late_update(&mut self, _entity: Entity, _ts: Timestep) -> ScriptResult {
        Ok(())
    }

    fn on_destroy(&mut self, _entity: Entity) -> ScriptResult {
        Ok(())
    }

    fn on_trigger_enter_2d(&mut self, _entity: Entity, _contact: Physics2DContact) -> ScriptResult {
        Ok(())
    }

    fn on_trigger_exit_2d(&mut self, _entity: Entity, _contact: Physics2DContact) -> ScriptResult {
        Ok(())
    }

    fn on_collision_enter_2d(&mut self, _entity: Entity, _contact: Physics2DContact) -> ScriptResult {
        Ok(())
    }

    fn on_collision_exit_2d(&mut self, _entity: Entity, _contact: Physics2DContact) -> ScriptResult {
        Ok(())
    }

    /// Public fields with their current values.
    fn fields(&self) -> Vec<ScriptField> {
        Vec::new()
    }

    /// Overwrites a public field. Returns `false` for unknown names or a
    /// value of the wrong type.
    fn set_field(&mut self, _name: &str, _value: &ScriptFieldValue) -> bool {
        false
    }
}

/// Checked downcast of a type-erased behavior.
pub fn downcast_mut<T: Behavior>(behavior: &mut dyn Behavior) -> Option<&mut T> {
    behavior.as_any_mut().downcast_mut::<T>()
}

pub fn downcast_ref<T: Behavior>(behavior: &dyn Behavior) -> Option<&T> {
    behavior.as_any().downcast_ref::<T>()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Counter {
        ticks: u32,
    }

    impl Behavior for Counter {
        fn on_update(&mut self, _entity: Entity, _ts: Timestep) -> ScriptResult {
            self.ticks += 1;
            Ok(())
        }
    }

    #[derive(Default)]
    struct Silent;

    impl Behavior for Silent {}

    #[test]
    fn test_downcast_to_concrete_type() {
        let mut boxed: Box<dyn Behavior> = Box::new(Counter::default());
        boxed.on_update(Entity::INVALID, Timestep::new(0.1)).unwrap();
        let counter = downcast_mut::<Counter>(boxed.as_mut()).unwrap();
        assert_eq!(counter.ticks, 1);
        assert!(downcast_ref::<Silent>(boxed.as_ref()).is_none());
    }

    #[test]
    fn test_defaults_are_noops() {
        let mut silent = Silent;
        let e = Entity::INVALID;
        let ts = Timestep::new(0.1);
        let contact = Physics2DContact::default();
        assert!(silent.on_create(e).is_ok());
        assert!(silent.on_start(e).is_ok());
        assert!(silent.on_update(e, ts).is_ok());
        assert!(silent.on_late_update(e, ts).is_ok());
        assert!(silent.on_trigger_enter_2d(e, contact).is_ok());
        assert!(silent.on_trigger_exit_2d(e, contact).is_ok());
        assert!(silent.on_collision_enter_2d(e, contact).is_ok());
        assert!(silent.on_collision_exit_2d(e, contact).is_ok());
        assert!(silent.on_destroy(e).is_ok());
        assert!(silent.fields().is_empty());
        assert!(!silent.set_field("x", &ScriptFieldValue::Int(1)));
    }
}
