//! `Entity`: a script's handle on a native entity.
//!
//! An `Entity` is only the 64-bit handle. Name, transform and components are
//! fetched through internal calls on every access, so a view outliving its
//! native entity is harmless: reads come back empty, writes do nothing.

use std::fmt;
use std::rc::Rc;

use super::behavior::{Behavior, downcast_mut};
use super::components::ComponentView;
use super::error::{ScriptError, ScriptResult};
use super::instance::ScriptInstance;
use crate::components::id::INVALID_ENTITY_ID;
use crate::interop::Physics2DContact;
use crate::interop::internal_calls as ic;
use crate::math::Vector3;

/// Equal handles mean equal entities, whatever their component data.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Entity {
    id: u64,
}

impl Entity {
    pub const INVALID: Entity = Entity {
        id: INVALID_ENTITY_ID,
    };

    pub const fn from_id(id: u64) -> Self {
        Self { id }
    }

    pub fn id(self) -> u64 {
        self.id
    }

    /// `Some` for a non-zero handle. Does not check the handle is alive.
    fn from_handle(id: u64) -> Option<Self> {
        (id != INVALID_ENTITY_ID).then_some(Self { id })
    }

    /// Whether the native entity still exists.
    pub fn is_valid(self) -> bool {
        ic::entity_is_valid(self.id)
    }

    pub fn name(self) -> String {
        ic::entity_get_name(self.id)
    }

    pub fn set_name(self, name: &str) {
        ic::entity_set_name(self.id, name);
    }

    // ==================== Components ====================

    pub fn has_component<C: ComponentView>(self) -> bool {
        ic::entity_has_component(self.id, C::KIND)
    }

    /// Attaches a default `C` and returns a view on it. Adding a kind the
    /// entity already has is logged natively; the existing component is kept
    /// and returned.
    pub fn add_component<C: ComponentView>(self) -> Option<C> {
        ic::entity_add_component(self.id, C::KIND);
        self.get_component()
    }

    /// A view on the entity's `C`, or `None` when it has none.
    pub fn get_component<C: ComponentView>(self) -> Option<C> {
        self.has_component::<C>().then(|| C::bind(self))
    }

    /// Like [`Entity::get_component`], for use with `?` inside callbacks.
    pub fn require_component<C: ComponentView>(self) -> ScriptResult<C> {
        self.get_component().ok_or(ScriptError::MissingComponent {
            entity_id: self.id,
            kind: C::KIND,
        })
    }

    // ==================== Scene ====================

    /// Slow path: scans every entity. With several matches, which one is
    /// returned is unspecified and may change between runs.
    pub fn find_entity_by_name(name: &str) -> Option<Entity> {
        Self::from_handle(ic::entity_find_entity_by_name(name))
    }

    /// Like [`Entity::find_entity_by_name`], for use with `?`.
    pub fn require_entity_by_name(name: &str) -> ScriptResult<Entity> {
        Self::find_entity_by_name(name).ok_or_else(|| ScriptError::EntityNotFound {
            name: name.to_string(),
        })
    }

    pub fn create_entity(name: &str) -> Option<Entity> {
        Self::from_handle(ic::entity_create_entity(name))
    }

    /// Creates an entity whose transform is already in place when any other
    /// script can see it.
    pub fn create_entity_with_transform(
        name: &str,
        position: Vector3,
        rotation: Vector3,
        scale: Vector3,
    ) -> Option<Entity> {
        Self::from_handle(ic::entity_create_entity_with_transform(
            name, &position, &rotation, &scale,
        ))
    }

    /// Marks the entity and its children for removal. While the runtime is
    /// running this takes effect at the end of the frame; until then the
    /// entity is still readable.
    pub fn destroy(self) {
        ic::entity_destroy_entity(self.id);
    }

    // ==================== Hierarchy ====================

    pub fn parent(self) -> Option<Entity> {
        Self::from_handle(ic::entity_get_parent(self.id))
    }

    /// Reparents immediately. `None` detaches.
    pub fn set_parent(self, parent: Option<Entity>) {
        ic::entity_set_parent(self.id, parent.map_or(INVALID_ENTITY_ID, Entity::id));
    }

    /// The direct children at call time. Later reparenting does not update
    /// the returned list.
    pub fn children(self) -> Vec<Entity> {
        ic::entity_get_children(self.id)
            .into_iter()
            .map(Entity::from_id)
            .collect()
    }

    // ==================== Script instance ====================

    pub fn script_instance(self) -> Option<Rc<ScriptInstance>> {
        ic::entity_get_script_instance(self.id)
    }

    /// Runs `f` on this entity's behavior if it is a `T`.
    ///
    /// `None` when the entity has no instance, the instance is some other
    /// type, or it is the behavior currently executing (a behavior cannot
    /// re-enter itself through its own entity).
    pub fn with_behavior<T: Behavior, R>(self, f: impl FnOnce(&mut T) -> R) -> Option<R> {
        let instance = self.script_instance()?;
        let mut behavior = instance.try_behavior_mut()?;
        downcast_mut::<T>(behavior.as_mut()).map(f)
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Entity({})", self.id)
    }
}

impl From<Entity> for u64 {
    fn from(entity: Entity) -> Self {
        entity.id
    }
}

impl Physics2DContact {
    /// The entity receiving the callback, if it still exists.
    pub fn collider_entity(&self) -> Option<Entity> {
        Entity::from_handle(ic::physics2d_contact_get_entity_by_id(self.collider_entity_id))
    }

    /// The entity it touched, if it still exists.
    pub fn other_entity(&self) -> Option<Entity> {
        Entity::from_handle(ic::physics2d_contact_get_entity_by_id(self.other_entity_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interop::{ScriptContext, bind};
    use crate::scene::Scene;
    use crate::scripting::components::{Rigidbody2DComponent, TransformComponent};

    #[test]
    fn test_equality_is_by_handle() {
        assert_eq!(Entity::from_id(5), Entity::from_id(5));
        assert_ne!(Entity::from_id(5), Entity::from_id(6));
        assert_eq!(Entity::default(), Entity::INVALID);
        assert_eq!(Entity::from_id(9).to_string(), "Entity(9)");
    }

    #[test]
    fn test_get_component_is_none_without_component() {
        let context = ScriptContext::new(Scene::new("entity"));
        let _guard = bind(&context);
        let entity = Entity::create_entity("Box").unwrap();
        assert!(entity.get_component::<Rigidbody2DComponent>().is_none());
        assert!(entity.require_component::<Rigidbody2DComponent>().is_err());
        assert!(entity.get_component::<TransformComponent>().is_some());

        let body = entity.add_component::<Rigidbody2DComponent>().unwrap();
        assert_eq!(body.entity(), entity);
        assert!(entity.has_component::<Rigidbody2DComponent>());
    }

    #[test]
    fn test_missing_lookups_are_none() {
        let context = ScriptContext::new(Scene::new("entity"));
        let _guard = bind(&context);
        assert_eq!(Entity::find_entity_by_name("DoesNotExist"), None);
        assert!(Entity::require_entity_by_name("DoesNotExist").is_err());
        let orphan = Entity::create_entity("orphan").unwrap();
        assert_eq!(orphan.parent(), None);
        assert!(orphan.children().is_empty());
        assert!(orphan.script_instance().is_none());
    }

    #[test]
    fn test_unbound_entity_degrades() {
        let entity = Entity::from_id(77);
        assert!(!entity.is_valid());
        assert!(entity.name().is_empty());
        assert!(entity.get_component::<TransformComponent>().is_none());
        assert_eq!(Entity::create_entity("nowhere"), None);
        entity.destroy();
    }

    #[test]
    fn test_children_snapshot() {
        let context = ScriptContext::new(Scene::new("entity"));
        let _guard = bind(&context);
        let parent = Entity::create_entity("parent").unwrap();
        let child = Entity::create_entity("child").unwrap();
        child.set_parent(Some(parent));
        let snapshot = parent.children();
        child.set_parent(None);
        assert_eq!(snapshot, vec![child]);
        assert!(parent.children().is_empty());
    }
}
