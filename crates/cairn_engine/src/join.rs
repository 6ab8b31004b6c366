//! Sorted merge-join over entity columns.

use cairn_foundation::EntityId;

/// Visits every entity present in all `columns`.
///
/// Each column must be sorted ascending. The cursors advance in lock-step,
/// so the cost is linear in the total column length. `visit` receives the
/// entity and, per column, the position of its first entry for that entity;
/// repeated entries of one entity within a column are skipped. Returns the
/// number of visits.
///
/// An empty `columns` slice visits nothing.
pub fn merge_join<F>(columns: &[&[EntityId]], mut visit: F) -> usize
where
    F: FnMut(EntityId, &[usize]),
{
    if columns.is_empty() {
        return 0;
    }

    let mut cursors = vec![0usize; columns.len()];
    let mut visits = 0;

    'join: loop {
        // The largest head is the smallest entity every column could share.
        let mut target = EntityId::new(0);
        for (column, &cursor) in columns.iter().zip(&cursors) {
            match column.get(cursor) {
                Some(&id) => target = target.max(id),
                None => break 'join,
            }
        }

        let mut aligned = true;
        for (column, cursor) in columns.iter().zip(cursors.iter_mut()) {
            while column.get(*cursor).is_some_and(|&id| id < target) {
                *cursor += 1;
            }
            match column.get(*cursor) {
                Some(&id) if id == target => {}
                Some(_) => aligned = false,
                None => break 'join,
            }
        }
        if !aligned {
            continue;
        }

        visit(target, &cursors);
        visits += 1;

        for (column, cursor) in columns.iter().zip(cursors.iter_mut()) {
            while column.get(*cursor) == Some(&target) {
                *cursor += 1;
            }
        }
    }

    visits
}
