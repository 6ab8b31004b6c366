//! Component type registry.
//!
//! Assigns each registered component type an ordinal in first-registration
//! order. The registry is an explicit value owned by a store; two stores never
//! share ordinal assignment.

use std::any::{TypeId, type_name};
use std::cell::OnceCell;
use std::collections::HashMap;
use std::fmt;

use cairn_foundation::{Component, Error, ErrorKind, FieldSchema, Result};
use tracing::debug;

/// Registration-order position of a component type.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Ordinal(u32);

impl Ordinal {
    /// Returns the raw index of this ordinal.
    #[must_use]
    pub const fn index(self) -> u32 {
        self.0
    }
}

impl fmt::Debug for Ordinal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Ordinal({})", self.0)
    }
}

/// Everything the registry knows about one component type.
#[derive(Debug)]
pub struct ComponentDescriptor {
    name: &'static str,
    ordinal: Ordinal,
    type_id: TypeId,
    rust_type: &'static str,
    schema: OnceCell<Vec<FieldSchema>>,
}

impl ComponentDescriptor {
    /// Namespaced component name.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Registration ordinal.
    #[must_use]
    pub fn ordinal(&self) -> Ordinal {
        self.ordinal
    }

    /// Rust type identity.
    #[must_use]
    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    /// Rust type path, used in diagnostics.
    #[must_use]
    pub fn rust_type(&self) -> &'static str {
        self.rust_type
    }

    /// Field schema, if one has been observed yet.
    #[must_use]
    pub fn schema(&self) -> Option<&[FieldSchema]> {
        self.schema.get().map(Vec::as_slice)
    }

    /// Records the field schema on first observation and returns the
    /// recorded one.
    ///
    /// Later calls keep the first schema and ignore `captured`.
    pub fn observe_schema(&self, captured: Vec<FieldSchema>) -> &[FieldSchema] {
        self.schema.get_or_init(|| captured)
    }
}

/// Registry of component types.
///
/// Not thread-safe; a registry belongs to exactly one store.
#[derive(Debug, Default)]
pub struct TypeRegistry {
    descriptors: Vec<ComponentDescriptor>,
    by_type: HashMap<TypeId, Ordinal>,
    by_name: HashMap<&'static str, Ordinal>,
}

impl TypeRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `T`, returning its ordinal.
    ///
    /// Registering a type twice returns the ordinal from the first call.
    ///
    /// # Errors
    ///
    /// Returns a name collision if another type already owns `T::NAME`.
    pub fn register<T: Component>(&mut self) -> Result<Ordinal> {
        let type_id = TypeId::of::<T>();
        if let Some(&ordinal) = self.by_type.get(&type_id) {
            return Ok(ordinal);
        }

        if let Some(&existing) = self.by_name.get(T::NAME) {
            let existing = self.descriptor(existing).map_or("?", |d| d.rust_type);
            return Err(Error::name_collision(T::NAME, existing, type_name::<T>()));
        }

        let index = u32::try_from(self.descriptors.len())
            .map_err(|_| Error::new(ErrorKind::Internal("too many component types".into())))?;
        let ordinal = Ordinal(index);

        self.descriptors.push(ComponentDescriptor {
            name: T::NAME,
            ordinal,
            type_id,
            rust_type: type_name::<T>(),
            schema: OnceCell::new(),
        });
        self.by_type.insert(type_id, ordinal);
        self.by_name.insert(T::NAME, ordinal);

        debug!(component = T::NAME, ordinal = index, "registered component type");
        Ok(ordinal)
    }

    /// Returns `T`'s ordinal.
    ///
    /// # Errors
    ///
    /// Returns not-registered if `T` was never registered.
    pub fn ordinal_of<T: Component>(&self) -> Result<Ordinal> {
        self.by_type
            .get(&TypeId::of::<T>())
            .copied()
            .ok_or_else(|| Error::not_registered(type_name::<T>()))
    }

    /// Checks whether `T` is registered.
    #[must_use]
    pub fn contains<T: Component>(&self) -> bool {
        self.by_type.contains_key(&TypeId::of::<T>())
    }

    /// Looks up a descriptor by ordinal.
    #[must_use]
    pub fn descriptor(&self, ordinal: Ordinal) -> Option<&ComponentDescriptor> {
        self.descriptors.get(ordinal.0 as usize)
    }

    /// Looks up a descriptor by Rust type.
    #[must_use]
    pub fn get<T: Component>(&self) -> Option<&ComponentDescriptor> {
        self.by_type_id(TypeId::of::<T>())
    }

    /// Looks up a descriptor by [`TypeId`].
    #[must_use]
    pub fn by_type_id(&self, type_id: TypeId) -> Option<&ComponentDescriptor> {
        self.by_type
            .get(&type_id)
            .and_then(|&ordinal| self.descriptor(ordinal))
    }

    /// Looks up a descriptor by component name.
    #[must_use]
    pub fn by_name(&self, name: &str) -> Option<&ComponentDescriptor> {
        self.by_name
            .get(name)
            .and_then(|&ordinal| self.descriptor(ordinal))
    }

    /// Looks up an ordinal by component name.
    #[must_use]
    pub fn ordinal_by_name(&self, name: &str) -> Option<Ordinal> {
        self.by_name.get(name).copied()
    }

    /// Returns the component name for an ordinal.
    #[must_use]
    pub fn name_of(&self, ordinal: Ordinal) -> Option<&'static str> {
        self.descriptor(ordinal).map(|d| d.name)
    }

    /// Iterates descriptors in ascending ordinal order.
    pub fn iter(&self) -> impl Iterator<Item = &ComponentDescriptor> {
        self.descriptors.iter()
    }

    /// Returns the number of registered types.
    #[must_use]
    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    /// Returns true if nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }
}
