//! Error types for Cairn.
//!
//! Uses `thiserror` for ergonomic error definition with rich context.

use std::fmt;

use thiserror::Error;

use crate::entity::EntityId;

/// The main error type for Cairn operations.
#[derive(Debug, Error)]
#[error("{kind}")]
pub struct Error {
    /// The kind of error that occurred.
    pub kind: ErrorKind,
    /// Optional context about where the error occurred.
    pub context: Option<ErrorContext>,
}

impl Error {
    /// Creates a new error with the given kind.
    #[must_use]
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            context: None,
        }
    }

    /// Adds context to this error, replacing any existing context.
    #[must_use]
    pub fn with_context(mut self, context: ErrorContext) -> Self {
        self.context = Some(context);
        self
    }

    /// Pushes a frame onto this error's context, creating one if needed.
    #[must_use]
    pub fn with_frame(mut self, frame: impl Into<String>) -> Self {
        let context = self.context.take().unwrap_or_default();
        self.context = Some(context.with_frame(frame));
        self
    }

    /// Records the operation and component the error occurred in, keeping
    /// any frames already pushed.
    #[must_use]
    pub fn during(mut self, operation: &str, component: &str) -> Self {
        let context = self.context.take().unwrap_or_default();
        self.context = Some(context.with_operation(operation).with_component(component));
        self
    }

    /// Creates a name collision error.
    #[must_use]
    pub fn name_collision(name: &str, existing: &str, incoming: &str) -> Self {
        Self::new(ErrorKind::NameCollision {
            name: name.to_owned(),
            existing: existing.to_owned(),
            incoming: incoming.to_owned(),
        })
    }

    /// Creates an error for a Rust type that was never registered.
    #[must_use]
    pub fn not_registered(type_name: &str) -> Self {
        Self::new(ErrorKind::NotRegistered(type_name.to_owned()))
    }

    /// Creates an error for a component name the registry does not know.
    #[must_use]
    pub fn unregistered_component(name: &str) -> Self {
        Self::new(ErrorKind::UnregisteredComponent(name.to_owned()))
    }

    /// Creates a schema mismatch error.
    #[must_use]
    pub fn schema_mismatch(
        component: &str,
        field: &str,
        expected: impl Into<String>,
        actual: impl Into<String>,
    ) -> Self {
        Self::new(ErrorKind::SchemaMismatch {
            component: component.to_owned(),
            field: field.to_owned(),
            expected: expected.into(),
            actual: actual.into(),
        })
    }

    /// Creates an unknown entity error.
    #[must_use]
    pub fn unknown_entity(component: &str, entity: EntityId, slot: Option<usize>) -> Self {
        Self::new(ErrorKind::UnknownEntity {
            component: component.to_owned(),
            entity,
            slot,
        })
    }

    /// Creates a malformed document error.
    #[must_use]
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::MalformedDocument(message.into()))
    }

    /// Creates an error for a reserved field name emitted by a component.
    #[must_use]
    pub fn reserved_field(component: &str, field: &str) -> Self {
        Self::new(ErrorKind::ReservedField {
            component: component.to_owned(),
            field: field.to_owned(),
        })
    }

    /// Creates a codec error.
    #[must_use]
    pub fn codec(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Codec(message.into()))
    }
}

/// Categorized error kinds for pattern matching.
#[derive(Debug, Error)]
pub enum ErrorKind {
    /// Two distinct types tried to register under one name.
    #[error("component name {name} is bound to {existing}, cannot register {incoming}")]
    NameCollision {
        /// The contested component name.
        name: String,
        /// Rust type already bound to the name.
        existing: String,
        /// Rust type that attempted to register.
        incoming: String,
    },

    /// A Rust type was used where registration is required.
    #[error("type not registered: {0}")]
    NotRegistered(String),

    /// A component name was not found in the registry.
    #[error("unregistered component: {0}")]
    UnregisteredComponent(String),

    /// A field's tagged type disagrees with the component's field routine.
    #[error("schema mismatch in {component}.{field}: expected {expected}, got {actual}")]
    SchemaMismatch {
        /// The component being read or written.
        component: String,
        /// The offending field.
        field: String,
        /// What the component's routine expects.
        expected: String,
        /// What was found.
        actual: String,
    },

    /// A merge targeted an entity or slot absent from the live store.
    #[error("unknown entity: {entity} in {component}{}", slot_suffix(.slot))]
    UnknownEntity {
        /// The component container that was searched.
        component: String,
        /// The entity that was not found.
        entity: EntityId,
        /// The slot requested with `__cindex`, if any.
        slot: Option<usize>,
    },

    /// The document's structure does not match the expected shape.
    #[error("malformed document: {0}")]
    MalformedDocument(String),

    /// Two components of one type share an entity under the reject policy.
    #[error("duplicate {component} component on {entity}")]
    DuplicateEntity {
        /// The component type.
        component: String,
        /// The entity holding more than one.
        entity: EntityId,
    },

    /// A create targeted a container that still holds components.
    #[error("container for {0} is not empty")]
    ContainerNotEmpty(String),

    /// A component's field routine emitted a reserved field name.
    #[error("reserved field name {field} emitted by {component}")]
    ReservedField {
        /// The component type.
        component: String,
        /// The reserved field name.
        field: String,
    },

    /// Every entity ID up to `u64::MAX` has been handed out or observed.
    #[error("entity ids exhausted")]
    EntityIdsExhausted,

    /// Flattening or parsing bytes failed.
    #[error("codec error: {0}")]
    Codec(String),

    /// Internal error (should not happen).
    #[error("internal error: {0}")]
    Internal(String),
}

fn slot_suffix(slot: &Option<usize>) -> String {
    slot.map(|s| format!(" (slot {s})")).unwrap_or_default()
}

/// Context about where an error occurred.
#[derive(Debug, Clone, Default)]
pub struct ErrorContext {
    /// Operation in progress (`snapshot`, `create`, `merge`, ...).
    pub operation: Option<String>,
    /// Component type section being processed.
    pub component: Option<String>,
    /// Innermost-first trail of positions (entry indices, fields).
    pub frames: Vec<String>,
}

impl ErrorContext {
    /// Creates a new empty context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the operation name.
    #[must_use]
    pub fn with_operation(mut self, operation: impl Into<String>) -> Self {
        self.operation = Some(operation.into());
        self
    }

    /// Sets the component name.
    #[must_use]
    pub fn with_component(mut self, component: impl Into<String>) -> Self {
        self.component = Some(component.into());
        self
    }

    /// Adds a frame.
    #[must_use]
    pub fn with_frame(mut self, frame: impl Into<String>) -> Self {
        self.frames.push(frame.into());
        self
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(operation) = &self.operation {
            write!(f, "during {operation}")?;
        }
        if let Some(component) = &self.component {
            write!(f, " of {component}")?;
        }
        for frame in &self.frames {
            write!(f, "\n  at {frame}")?;
        }
        Ok(())
    }
}
