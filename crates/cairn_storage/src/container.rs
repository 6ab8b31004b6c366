//! Per-type component containers.
//!
//! A [`Container`] holds `(entity, value)` pairs for one component type in
//! two parallel vectors. Adds append without sorting and mark the container
//! dirty; [`Container::renormalize`] restores ascending entity order and
//! compacts duplicates according to a [`DuplicatePolicy`].
//!
//! [`AnyContainer`] is the type-erased face the store keeps in its map and the
//! serializer drives by component name.

use std::any::Any;
use std::mem;

use cairn_foundation::{
    Component, EntityId, Error, ErrorKind, FieldSchema, Result, Tree, capture_schema,
    decode_fields, encode_fields,
};

use crate::config::DuplicatePolicy;

/// One encoded component: its entity and ordered `(field, node)` pairs.
pub type EncodedEntry = (EntityId, Vec<(String, Tree)>);

/// What a merge did with one entry.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MergeOutcome {
    /// An existing component was patched; carries the number of fields written.
    Patched(usize),
    /// No component was found and a new one was appended.
    Inserted,
}

/// Components of one type, keyed by entity.
#[derive(Clone, Debug)]
pub struct Container<T> {
    ids: Vec<EntityId>,
    values: Vec<T>,
    dirty: bool,
    pending_clear: bool,
}

impl<T> Default for Container<T> {
    fn default() -> Self {
        Self::with_capacity(0)
    }
}

impl<T> Container<T> {
    /// Creates an empty container with room for `capacity` components.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            ids: Vec::with_capacity(capacity),
            values: Vec::with_capacity(capacity),
            dirty: false,
            pending_clear: false,
        }
    }

    /// Appends a component.
    ///
    /// A pending deferred clear is materialized first, so the new component
    /// survives the next renormalize.
    pub fn push(&mut self, id: EntityId, value: T) {
        self.materialize_clear();
        if self.ids.last().is_some_and(|&last| last >= id) {
            self.dirty = true;
        }
        self.ids.push(id);
        self.values.push(value);
    }

    /// Returns the number of stored components.
    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Returns true if nothing is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Returns true if adds since the last renormalize broke ascending order.
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Returns true if a deferred clear is waiting for renormalize.
    #[must_use]
    pub fn is_pending_clear(&self) -> bool {
        self.pending_clear
    }

    /// Entity column, in container order.
    #[must_use]
    pub fn ids(&self) -> &[EntityId] {
        &self.ids
    }

    /// Value column, parallel to [`Container::ids`].
    #[must_use]
    pub fn values(&self) -> &[T] {
        &self.values
    }

    /// Mutable value column.
    pub fn values_mut(&mut self) -> &mut [T] {
        &mut self.values
    }

    /// Iterates `(entity, value)` pairs in container order.
    pub fn iter(&self) -> impl Iterator<Item = (EntityId, &T)> {
        self.ids.iter().copied().zip(self.values.iter())
    }

    /// Marks the container for clearing at the next renormalize.
    pub fn mark_clear(&mut self) {
        self.pending_clear = true;
    }

    /// Empties the container now.
    pub fn clear_now(&mut self) {
        self.ids.clear();
        self.values.clear();
        self.dirty = false;
        self.pending_clear = false;
    }

    /// Performs a pending deferred clear. Returns true if one was pending.
    pub fn materialize_clear(&mut self) -> bool {
        if self.pending_clear {
            self.clear_now();
            true
        } else {
            false
        }
    }

    /// Finds the position of `id`'s `slot`-th component.
    ///
    /// Slots count the entity's components of this type in container order.
    #[must_use]
    pub fn position(&self, id: EntityId, slot: usize) -> Option<usize> {
        if self.dirty {
            return self
                .ids
                .iter()
                .enumerate()
                .filter(|&(_, &candidate)| candidate == id)
                .nth(slot)
                .map(|(pos, _)| pos);
        }
        let start = self.ids.partition_point(|&candidate| candidate < id);
        let pos = start.checked_add(slot)?;
        (self.ids.get(pos) == Some(&id)).then_some(pos)
    }

    /// Returns `id`'s first component.
    #[must_use]
    pub fn get(&self, id: EntityId) -> Option<&T> {
        self.get_slot(id, 0)
    }

    /// Returns `id`'s `slot`-th component.
    #[must_use]
    pub fn get_slot(&self, id: EntityId, slot: usize) -> Option<&T> {
        self.position(id, slot).map(|pos| &self.values[pos])
    }

    /// Returns `id`'s `slot`-th component mutably.
    pub fn get_slot_mut(&mut self, id: EntityId, slot: usize) -> Option<&mut T> {
        self.position(id, slot).map(|pos| &mut self.values[pos])
    }

    /// Removes every component keyed by `id`. Returns how many were removed.
    pub fn remove_entity(&mut self, id: EntityId) -> usize {
        let before = self.ids.len();
        let ids = mem::take(&mut self.ids);
        let values = mem::take(&mut self.values);
        for (candidate, value) in ids.into_iter().zip(values) {
            if candidate != id {
                self.ids.push(candidate);
                self.values.push(value);
            }
        }
        before - self.ids.len()
    }
}

impl<T: Component> Container<T> {
    /// Materializes a pending clear, then sorts by entity and compacts.
    ///
    /// With `force == false` a clean container is left alone. The sort is
    /// stable, so same-entity components keep their insertion order before
    /// `policy` is applied. Returns true if the container was touched.
    ///
    /// # Errors
    ///
    /// Under [`DuplicatePolicy::Reject`], returns a duplicate-entity error and
    /// leaves the container unchanged.
    pub fn renormalize(&mut self, force: bool, policy: DuplicatePolicy) -> Result<bool> {
        let cleared = self.materialize_clear();
        if !force && !self.dirty {
            return Ok(cleared);
        }

        let mut order: Vec<usize> = (0..self.ids.len()).collect();
        order.sort_by_key(|&pos| self.ids[pos]);

        if policy == DuplicatePolicy::Reject {
            let duplicate = order
                .windows(2)
                .map(|pair| (self.ids[pair[0]], self.ids[pair[1]]))
                .find(|(a, b)| a == b);
            if let Some((entity, _)) = duplicate {
                return Err(Error::new(ErrorKind::DuplicateEntity {
                    component: T::NAME.to_owned(),
                    entity,
                }));
            }
        }

        let ids = mem::take(&mut self.ids);
        let mut values: Vec<Option<T>> = mem::take(&mut self.values)
            .into_iter()
            .map(Some)
            .collect();

        for pos in order {
            let id = ids[pos];
            let Some(value) = values[pos].take() else {
                continue;
            };
            let repeat = self.ids.last() == Some(&id);
            match policy {
                DuplicatePolicy::KeepFirst if repeat => {}
                DuplicatePolicy::KeepLast if repeat => {
                    if let Some(last) = self.values.last_mut() {
                        *last = value;
                    }
                }
                _ => {
                    self.ids.push(id);
                    self.values.push(value);
                }
            }
        }

        self.dirty = false;
        Ok(true)
    }
}

/// Type-erased container interface.
pub trait AnyContainer: Any {
    /// Name of the stored component type.
    fn component_name(&self) -> &'static str;

    /// Upcasts for downcasting to [`Container<T>`].
    fn as_any(&self) -> &dyn Any;

    /// Mutable upcast.
    fn as_any_mut(&mut self) -> &mut dyn Any;

    /// Number of stored components.
    fn len(&self) -> usize;

    /// Returns true if nothing is stored.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Entity column.
    fn ids(&self) -> &[EntityId];

    /// See [`Container::renormalize`].
    ///
    /// # Errors
    ///
    /// Duplicate-entity error under the reject policy.
    fn renormalize(&mut self, force: bool, policy: DuplicatePolicy) -> Result<bool>;

    /// See [`Container::mark_clear`].
    fn mark_clear(&mut self);

    /// See [`Container::clear_now`].
    fn clear_now(&mut self);

    /// See [`Container::materialize_clear`].
    fn materialize_clear(&mut self) -> bool;

    /// See [`Container::remove_entity`].
    fn remove_entity(&mut self, id: EntityId) -> usize;

    /// Captures the field schema from the first stored component, or from a
    /// default-constructed one when empty.
    ///
    /// # Errors
    ///
    /// Reserved-field error from the component's routine.
    fn capture_schema(&self) -> Result<Vec<FieldSchema>>;

    /// Encodes every component in container order, checking each against
    /// `schema`.
    ///
    /// # Errors
    ///
    /// Schema mismatch if any component's routine diverges from `schema`.
    fn encode_entries(&self, schema: &[FieldSchema]) -> Result<Vec<EncodedEntry>>;

    /// Appends a default component for `id` patched with `fields`.
    ///
    /// # Errors
    ///
    /// Schema mismatch if a field node has the wrong kind.
    fn create_entry(&mut self, id: EntityId, fields: &[(String, Tree)]) -> Result<()>;

    /// Patches `id`'s component at `slot` (0 when `None`) with `fields`.
    ///
    /// With `insert_missing`, a component is appended when `slot` is the
    /// entity's next free slot.
    ///
    /// # Errors
    ///
    /// Unknown entity if no such component exists and it cannot be
    /// inserted; schema mismatch if a field node has the wrong kind.
    fn merge_entry(
        &mut self,
        id: EntityId,
        slot: Option<usize>,
        fields: &[(String, Tree)],
        insert_missing: bool,
    ) -> Result<MergeOutcome>;
}

impl<T: Component> AnyContainer for Container<T> {
    fn component_name(&self) -> &'static str {
        T::NAME
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn len(&self) -> usize {
        Container::len(self)
    }

    fn ids(&self) -> &[EntityId] {
        Container::ids(self)
    }

    fn renormalize(&mut self, force: bool, policy: DuplicatePolicy) -> Result<bool> {
        Container::renormalize(self, force, policy)
    }

    fn mark_clear(&mut self) {
        Container::mark_clear(self);
    }

    fn clear_now(&mut self) {
        Container::clear_now(self);
    }

    fn materialize_clear(&mut self) -> bool {
        Container::materialize_clear(self)
    }

    fn remove_entity(&mut self, id: EntityId) -> usize {
        Container::remove_entity(self, id)
    }

    fn capture_schema(&self) -> Result<Vec<FieldSchema>> {
        match self.values.first() {
            Some(first) => capture_schema(first),
            None => capture_schema(&T::default()),
        }
    }

    fn encode_entries(&self, schema: &[FieldSchema]) -> Result<Vec<EncodedEntry>> {
        self.iter()
            .enumerate()
            .map(|(pos, (id, value))| {
                encode_fields(value, Some(schema))
                    .map(|fields| (id, fields))
                    .map_err(|e| e.with_frame(format!("entry {pos} ({id})")))
            })
            .collect()
    }

    fn create_entry(&mut self, id: EntityId, fields: &[(String, Tree)]) -> Result<()> {
        let mut value = T::default();
        decode_fields(&mut value, fields)?;
        self.push(id, value);
        Ok(())
    }

    fn merge_entry(
        &mut self,
        id: EntityId,
        slot: Option<usize>,
        fields: &[(String, Tree)],
        insert_missing: bool,
    ) -> Result<MergeOutcome> {
        let target = slot.unwrap_or(0);
        if let Some(value) = self.get_slot_mut(id, target) {
            return decode_fields(value, fields).map(MergeOutcome::Patched);
        }
        // Only the entity's next free slot can be inserted.
        if !insert_missing || self.ids.iter().filter(|&&held| held == id).count() != target {
            return Err(Error::unknown_entity(T::NAME, id, slot));
        }
        self.create_entry(id, fields)?;
        Ok(MergeOutcome::Inserted)
    }
}
