//! The entity/component store.

use std::any::TypeId;
use std::collections::HashMap;

use cairn_foundation::{Component, EntityId, Error, ErrorKind, FieldSchema, Result};
use tracing::debug;

use crate::config::StoreConfig;
use crate::container::{AnyContainer, Container};
use crate::registry::{Ordinal, TypeRegistry};

/// Owns the entity counter, one container per component type, and the type
/// registry.
///
/// Adding components does not require registration. Walking and
/// serialization do.
pub struct Store {
    config: StoreConfig,
    registry: TypeRegistry,
    containers: HashMap<TypeId, Box<dyn AnyContainer>>,
    /// `None` once the ID space is used up.
    next_entity: Option<u64>,
}

impl Default for Store {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Store {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store")
            .field("config", &self.config)
            .field("registered", &self.registry.len())
            .field("containers", &self.containers.len())
            .field("next_entity", &self.next_entity)
            .finish()
    }
}

impl Store {
    /// Creates an empty store with the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(StoreConfig::default())
    }

    /// Creates an empty store with `config`.
    #[must_use]
    pub fn with_config(config: StoreConfig) -> Self {
        Self {
            config,
            registry: TypeRegistry::new(),
            containers: HashMap::new(),
            next_entity: Some(0),
        }
    }

    /// Returns the store configuration.
    #[must_use]
    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Returns the type registry.
    #[must_use]
    pub fn registry(&self) -> &TypeRegistry {
        &self.registry
    }

    // --- Registration ---

    /// Registers `T` and makes sure it has a container.
    ///
    /// # Errors
    ///
    /// Returns a name collision if another type owns `T::NAME`.
    pub fn register_component<T: Component>(&mut self) -> Result<Ordinal> {
        let ordinal = self.registry.register::<T>()?;
        self.container_entry::<T>();
        Ok(ordinal)
    }

    // --- Entities ---

    /// Allocates a fresh entity ID.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::EntityIdsExhausted`] once `u64::MAX` has been
    /// allocated or observed.
    pub fn new_entity_id(&mut self) -> Result<EntityId> {
        let index = self
            .next_entity
            .ok_or_else(|| Error::new(ErrorKind::EntityIdsExhausted))?;
        self.next_entity = index.checked_add(1);
        Ok(EntityId::new(index))
    }

    /// Advances the entity counter past `id` so it is never handed out.
    pub fn observe_entity_id(&mut self, id: EntityId) {
        self.next_entity = match (self.next_entity, id.index().checked_add(1)) {
            (Some(next), Some(past)) => Some(next.max(past)),
            _ => None,
        };
    }

    /// Returns the number of distinct entities holding at least one component.
    #[must_use]
    pub fn entity_count(&self) -> usize {
        let mut ids: Vec<EntityId> = self
            .containers
            .values()
            .flat_map(|c| c.ids().iter().copied())
            .collect();
        ids.sort_unstable();
        ids.dedup();
        ids.len()
    }

    /// Removes every component keyed by `id`. Returns how many were removed.
    pub fn remove_entity(&mut self, id: EntityId) -> usize {
        self.containers
            .values_mut()
            .map(|c| c.remove_entity(id))
            .sum()
    }

    // --- Components ---

    /// Appends a component for `id`. The container is sorted lazily by
    /// [`Store::renormalize`].
    pub fn add_component<T: Component>(&mut self, id: EntityId, value: T) {
        self.container_entry::<T>().push(id, value);
    }

    /// Returns `id`'s first `T` component.
    #[must_use]
    pub fn get<T: Component>(&self, id: EntityId) -> Option<&T> {
        self.container::<T>()?.get(id)
    }

    /// Returns `id`'s `slot`-th `T` component.
    #[must_use]
    pub fn get_slot<T: Component>(&self, id: EntityId, slot: usize) -> Option<&T> {
        self.container::<T>()?.get_slot(id, slot)
    }

    /// Returns `id`'s first `T` component mutably.
    pub fn get_mut<T: Component>(&mut self, id: EntityId) -> Option<&mut T> {
        self.container_mut::<T>()?.get_slot_mut(id, 0)
    }

    /// Returns `T`'s container, if any component of `T` was ever added or
    /// `T` was registered.
    #[must_use]
    pub fn container<T: Component>(&self) -> Option<&Container<T>> {
        self.containers
            .get(&TypeId::of::<T>())
            .and_then(|c| c.as_any().downcast_ref())
    }

    /// Mutable form of [`Store::container`].
    pub fn container_mut<T: Component>(&mut self) -> Option<&mut Container<T>> {
        self.containers
            .get_mut(&TypeId::of::<T>())
            .and_then(|c| c.as_any_mut().downcast_mut())
    }

    /// Returns the number of stored `T` components.
    #[must_use]
    pub fn len_of<T: Component>(&self) -> usize {
        self.container::<T>().map_or(0, Container::len)
    }

    /// Returns `T`'s container for a walk.
    ///
    /// A registered type that never received a component yields an empty
    /// container.
    ///
    /// # Errors
    ///
    /// Returns unregistered-component if `T` is not registered.
    pub fn registered_container<T: Component>(&self) -> Result<Option<&Container<T>>> {
        if !self.registry.contains::<T>() {
            return Err(Error::unregistered_component(T::NAME));
        }
        Ok(self.container::<T>())
    }

    /// Returns the erased container of a registered type, looked up by
    /// component name.
    ///
    /// # Errors
    ///
    /// Returns unregistered-component if no registered type has `name`.
    pub fn erased_by_name(&self, name: &str) -> Result<&dyn AnyContainer> {
        let descriptor = self
            .registry
            .by_name(name)
            .ok_or_else(|| Error::unregistered_component(name))?;
        self.containers
            .get(&descriptor.type_id())
            .map(|container| &**container)
            .ok_or_else(|| missing_container(name))
    }

    /// Mutable form of [`Store::erased_by_name`].
    ///
    /// # Errors
    ///
    /// Returns unregistered-component if no registered type has `name`.
    pub fn erased_by_name_mut(&mut self, name: &str) -> Result<&mut dyn AnyContainer> {
        let descriptor = self
            .registry
            .by_name(name)
            .ok_or_else(|| Error::unregistered_component(name))?;
        match self.containers.get_mut(&descriptor.type_id()) {
            Some(container) => Ok(&mut **container),
            None => Err(missing_container(name)),
        }
    }

    /// Returns the field schema of a registered type, capturing it from the
    /// first stored component (or a default one) on first use.
    ///
    /// # Errors
    ///
    /// Returns unregistered-component for an unknown name, or whatever the
    /// component's field routine reports during capture.
    pub fn schema_by_name(&self, name: &str) -> Result<&[FieldSchema]> {
        let descriptor = self
            .registry
            .by_name(name)
            .ok_or_else(|| Error::unregistered_component(name))?;
        if let Some(schema) = descriptor.schema() {
            return Ok(schema);
        }
        let captured = self.erased_by_name(name)?.capture_schema()?;
        Ok(descriptor.observe_schema(captured))
    }

    // --- Maintenance ---

    /// Materializes pending clears, then sorts and compacts every container.
    ///
    /// With `force == false`, containers with no out-of-order adds are left
    /// alone.
    ///
    /// # Errors
    ///
    /// Returns a duplicate-entity error under
    /// [`DuplicatePolicy::Reject`](crate::DuplicatePolicy::Reject). Containers
    /// visited before the failing one stay renormalized.
    pub fn renormalize(&mut self, force: bool) -> Result<()> {
        let policy = self.config.duplicates;
        let mut touched = 0usize;
        for container in self.containers.values_mut() {
            if container.renormalize(force, policy)? {
                touched += 1;
            }
        }
        debug!(force, touched, containers = self.containers.len(), "renormalized store");
        Ok(())
    }

    /// Marks every container for clearing at the next renormalize.
    pub fn clear_all_component_containers(&mut self) {
        for container in self.containers.values_mut() {
            container.mark_clear();
        }
    }

    /// Empties every container now.
    pub fn clear_all_component_containers_immediately(&mut self) {
        for container in self.containers.values_mut() {
            container.clear_now();
        }
    }

    fn container_entry<T: Component>(&mut self) -> &mut Container<T> {
        let capacity = self.config.initial_capacity;
        let slot = self
            .containers
            .entry(TypeId::of::<T>())
            .or_insert_with(|| Box::new(Container::<T>::with_capacity(capacity)));
        match slot.as_any_mut().downcast_mut::<Container<T>>() {
            Some(container) => container,
            None => unreachable!("container keyed by TypeId holds another type"),
        }
    }
}

fn missing_container(name: &str) -> Error {
    Error::new(ErrorKind::Internal(format!(
        "registered component {name} has no container"
    )))
}
