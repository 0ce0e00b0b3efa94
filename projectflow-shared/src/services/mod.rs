/// Referential-integrity services
///
/// Every write that spans more than one statement runs inside a single
/// transaction taken from the pool:
///
/// - natural-key checks (email, project name, cycle name, artifact name) run
///   before the write, excluding the row being updated; a UNIQUE constraint
///   backs them up against concurrent writers
/// - association sets (project ↔ user, phase ↔ artifact) are replaced by
///   delete-then-insert, never by diff
/// - deleting a project or phase removes its links first, then the parent
///
/// A `sqlx::Transaction` that is dropped without `commit` rolls back, so every
/// early return through `?` leaves the store exactly as it was.
///
/// # Modules
///
/// - `users`: registration, profile update, account removal
/// - `projects`: projects and their responsible users
/// - `cycles`: project cycles
/// - `phases`: phases and their artifacts
/// - `artifacts`: artifacts
/// - `cards`: kanban cards with partial update

pub mod artifacts;
pub mod cards;
pub mod cycles;
pub mod phases;
pub mod projects;
pub mod users;

use std::collections::{HashMap, HashSet};
use uuid::Uuid;

/// Removes repeated IDs, keeping the first occurrence of each
///
/// Association inputs may repeat an ID; inserting it twice would collide on
/// the link's primary key.
pub fn dedupe_ids(ids: &[Uuid]) -> Vec<Uuid> {
    let mut seen = HashSet::with_capacity(ids.len());
    ids.iter().copied().filter(|id| seen.insert(*id)).collect()
}

/// Pairs each parent with its child rows, preserving parent order
pub(crate) fn attach<P, C>(
    parents: Vec<P>,
    children: Vec<C>,
    parent_id: impl Fn(&P) -> Uuid,
    child_parent_id: impl Fn(&C) -> Uuid,
) -> Vec<(P, Vec<C>)> {
    let mut grouped: HashMap<Uuid, Vec<C>> = HashMap::new();
    for child in children {
        grouped.entry(child_parent_id(&child)).or_default().push(child);
    }

    parents
        .into_iter()
        .map(|parent| {
            let kids = grouped.remove(&parent_id(&parent)).unwrap_or_default();
            (parent, kids)
        })
        .collect()
}
