//! Tuple queries over store columns.
//!
//! A [`Query`] is a tuple of 1 to 8 component types. Resolving it against a
//! store yields one [`Column`] per type, in declared order; the join then
//! reads one value per column at the positions it aligned.

use cairn_foundation::{Component, EntityId, Result};
use cairn_storage::Store;

/// Borrowed entity and value columns of one component type.
pub struct Column<'a, T> {
    /// Entity column, ascending after renormalize.
    pub ids: &'a [EntityId],
    /// Value column, parallel to `ids`.
    pub values: &'a [T],
}

impl<T> Clone for Column<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Column<'_, T> {}

impl<'a, T: Component> Column<'a, T> {
    /// Resolves `T`'s column in `store`.
    ///
    /// A registered type without a container resolves to an empty column.
    ///
    /// # Errors
    ///
    /// Returns unregistered-component if `T` is not registered.
    pub fn of(store: &'a Store) -> Result<Self> {
        Ok(match store.registered_container::<T>()? {
            Some(container) => Self {
                ids: container.ids(),
                values: container.values(),
            },
            None => Self {
                ids: &[],
                values: &[],
            },
        })
    }
}

/// A tuple of component types a system requires.
pub trait Query: 'static {
    /// Resolved columns, one per type.
    type Columns<'a>;

    /// One reference per type, in declared order.
    type Item<'a>;

    /// Resolves every column.
    ///
    /// # Errors
    ///
    /// Returns unregistered-component for the first unregistered type.
    fn columns(store: &Store) -> Result<Self::Columns<'_>>;

    /// Entity columns, in declared order.
    fn ids<'a>(columns: &Self::Columns<'a>) -> Vec<&'a [EntityId]>;

    /// Reads the item at per-column `positions`.
    fn fetch<'a>(columns: &Self::Columns<'a>, positions: &[usize]) -> Self::Item<'a>;
}

macro_rules! impl_query {
    ($($ty:ident => $idx:tt),+) => {
        impl<$($ty: Component),+> Query for ($($ty,)+) {
            type Columns<'a> = ($(Column<'a, $ty>,)+);
            type Item<'a> = ($(&'a $ty,)+);

            fn columns(store: &Store) -> Result<Self::Columns<'_>> {
                Ok(($(Column::<$ty>::of(store)?,)+))
            }

            fn ids<'a>(columns: &Self::Columns<'a>) -> Vec<&'a [EntityId]> {
                vec![$(columns.$idx.ids),+]
            }

            fn fetch<'a>(columns: &Self::Columns<'a>, positions: &[usize]) -> Self::Item<'a> {
                ($(&columns.$idx.values[positions[$idx]],)+)
            }
        }
    };
}

impl_query!(A => 0);
impl_query!(A => 0, B => 1);
impl_query!(A => 0, B => 1, C => 2);
impl_query!(A => 0, B => 1, C => 2, D => 3);
impl_query!(A => 0, B => 1, C => 2, D => 3, E => 4);
impl_query!(A => 0, B => 1, C => 2, D => 3, E => 4, F => 5);
impl_query!(A => 0, B => 1, C => 2, D => 3, E => 4, F => 5, G => 6);
impl_query!(A => 0, B => 1, C => 2, D => 3, E => 4, F => 5, G => 6, H => 7);
