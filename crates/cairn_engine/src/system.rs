//! Systems: callbacks driven by a query join.

use std::any::type_name;

use cairn_foundation::{EntityId, Result};
use cairn_storage::Store;
use tracing::trace;

use crate::join::merge_join;
use crate::query::Query;

/// A callback over every entity holding all of `Query`'s component types.
///
/// Entities holding extra types still qualify. A system carries no iteration
/// state between walks, so one instance can walk any number of stores.
///
/// # Example
///
/// ```
/// use cairn_engine::System;
/// use cairn_foundation::{Component, EntityId, FieldSink, Result};
/// use cairn_storage::Store;
///
/// #[derive(Clone, Default)]
/// struct Health(i32);
///
/// impl Component for Health {
///     const NAME: &'static str = "doc:Health";
///
///     fn fields(&mut self, sink: &mut FieldSink<'_>) -> Result<()> {
///         sink.field("value", &mut self.0)
///     }
/// }
///
/// struct TotalHealth(i64);
///
/// impl System for TotalHealth {
///     type Query = (Health,);
///
///     fn execute(&mut self, _entity: EntityId, (health,): (&Health,)) {
///         self.0 += i64::from(health.0);
///     }
/// }
///
/// let mut store = Store::new();
/// store.register_component::<Health>()?;
/// let e = store.new_entity_id()?;
/// store.add_component(e, Health(7));
/// store.renormalize(true)?;
///
/// let mut total = TotalHealth(0);
/// assert_eq!(total.walk(&store)?, 1);
/// assert_eq!(total.0, 7);
/// # Ok::<(), cairn_foundation::Error>(())
/// ```
pub trait System {
    /// Component types required, in the order `execute` receives them.
    type Query: Query;

    /// Called once per qualifying entity, in ascending entity order.
    fn execute(&mut self, entity: EntityId, item: <Self::Query as Query>::Item<'_>);

    /// Joins the required containers and calls `execute` per match.
    ///
    /// The store must be renormalized. Returns the number of calls.
    ///
    /// # Errors
    ///
    /// Returns unregistered-component if any required type is unregistered.
    fn walk(&mut self, store: &Store) -> Result<usize> {
        let columns = <Self::Query as Query>::columns(store)?;
        let ids = <Self::Query as Query>::ids(&columns);
        let visits = merge_join(&ids, |entity, positions| {
            self.execute(entity, <Self::Query as Query>::fetch(&columns, positions));
        });
        trace!(system = type_name::<Self>(), visits, "walked store");
        Ok(visits)
    }
}
