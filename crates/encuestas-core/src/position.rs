//! Position sequencing for sibling collections.
//!
//! Sections under a form and questions under a section carry a zero-based
//! `position`. Every function here takes a consistent snapshot of the
//! siblings and returns the full collection renumbered `0..N`, so positions
//! stay dense and unique after appends, moves and deletes. Persisting the
//! result atomically is the adapter's job.

use uuid::Uuid;

use crate::aggregate::Aggregate;
use crate::error::DomainError;

/// An entity ranked among the children of one parent.
pub trait Positioned: Aggregate {
    /// The owning parent.
    fn parent_id(&self) -> Uuid;

    /// Zero-based rank among siblings.
    fn position(&self) -> u32;

    /// Returns a copy of `self` at `position`.
    #[must_use]
    fn with_position(&self, position: u32) -> Self;
}

fn to_position(index: usize) -> u32 {
    u32::try_from(index).unwrap_or(u32::MAX)
}

/// Returns the siblings sorted by `(position, id)`.
///
/// The id tiebreak keeps the result deterministic even when the snapshot
/// already contains duplicate positions.
pub fn ordered<T: Positioned>(siblings: &[T]) -> Vec<T> {
    let mut sorted = siblings.to_vec();
    sorted.sort_by_key(|s| (s.position(), s.aggregate_id()));
    sorted
}

fn renumber<T: Positioned>(items: Vec<T>) -> Vec<T> {
    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| {
            let position = to_position(index);
            if item.position() == position {
                item
            } else {
                item.with_position(position)
            }
        })
        .collect()
}

/// Position for a newly appended child: one past the highest sibling
/// position, or 0 when there are no siblings.
///
/// On a dense snapshot this equals the sibling count. On a gapped one
/// (`{0, 2}`) it still lands after every sibling instead of reusing a
/// taken slot.
pub fn next_position<T: Positioned>(siblings: &[T]) -> u32 {
    siblings
        .iter()
        .map(Positioned::position)
        .max()
        .map_or(0, |highest| highest.saturating_add(1))
}

/// Converts a caller-supplied position to a sequencer position.
///
/// Values beyond `u32::MAX` saturate; the sequencer clamps them anyway.
///
/// # Errors
///
/// Returns `DomainError::InvalidArgument` for a negative position.
pub fn requested_position(raw: i64) -> Result<u32, DomainError> {
    if raw < 0 {
        return Err(DomainError::invalid(format!(
            "position must be >= 0, got {raw}"
        )));
    }
    Ok(u32::try_from(raw).unwrap_or(u32::MAX))
}

/// Checks that every child belongs to `parent_id`.
///
/// # Errors
///
/// Returns `DomainError::OwnershipMismatch` naming the first stray child.
pub fn ensure_owned_by<T: Positioned>(parent_id: Uuid, children: &[T]) -> Result<(), DomainError> {
    match children.iter().find(|c| c.parent_id() != parent_id) {
        Some(stray) => Err(DomainError::OwnershipMismatch {
            child_id: stray.aggregate_id(),
            parent_id,
        }),
        None => Ok(()),
    }
}

/// Moves `child_id` to `new_position` and renumbers every sibling.
///
/// A position past the end clamps to the last slot. Siblings that are not
/// moved keep their relative order.
///
/// # Errors
///
/// Returns `DomainError::OwnershipMismatch` if any sibling belongs to a
/// different parent, and `DomainError::NotFound` if `child_id` is not among
/// the siblings.
pub fn move_to<T: Positioned>(
    parent_id: Uuid,
    siblings: &[T],
    child_id: Uuid,
    new_position: u32,
) -> Result<Vec<T>, DomainError> {
    ensure_owned_by(parent_id, siblings)?;
    let mut items = ordered(siblings);
    let index = items
        .iter()
        .position(|s| s.aggregate_id() == child_id)
        .ok_or_else(|| DomainError::not_found(T::KIND, child_id))?;

    let moving = items.remove(index);
    let target = usize::try_from(new_position)
        .unwrap_or(usize::MAX)
        .min(items.len());
    items.insert(target, moving);
    Ok(renumber(items))
}

/// Removes `child_id` and closes the gap it leaves.
///
/// Returns the removed child and the renumbered remaining siblings.
///
/// # Errors
///
/// Returns `DomainError::NotFound` if `child_id` is not among the siblings.
pub fn remove<T: Positioned>(siblings: &[T], child_id: Uuid) -> Result<(T, Vec<T>), DomainError> {
    let mut items = ordered(siblings);
    let index = items
        .iter()
        .position(|s| s.aggregate_id() == child_id)
        .ok_or_else(|| DomainError::not_found(T::KIND, child_id))?;
    let removed = items.remove(index);
    Ok((removed, renumber(items)))
}

/// Inserts `child` at `position` (clamped to the end) and renumbers.
///
/// If a sibling with the same id is already present it is replaced, so this
/// also repositions an existing child.
///
/// # Errors
///
/// Returns `DomainError::OwnershipMismatch` if `child` or any sibling
/// belongs to a different parent.
pub fn insert_at<T: Positioned>(
    parent_id: Uuid,
    siblings: &[T],
    child: T,
    position: u32,
) -> Result<Vec<T>, DomainError> {
    ensure_owned_by(parent_id, siblings)?;
    ensure_owned_by(parent_id, std::slice::from_ref(&child))?;
    let child_id = child.aggregate_id();
    let mut items: Vec<T> = ordered(siblings)
        .into_iter()
        .filter(|s| s.aggregate_id() != child_id)
        .collect();
    let target = usize::try_from(position)
        .unwrap_or(usize::MAX)
        .min(items.len());
    items.insert(target, child);
    Ok(renumber(items))
}

/// Whether positions are exactly `0..N` with no gaps or duplicates.
pub fn is_dense<T: Positioned>(siblings: &[T]) -> bool {
    ordered(siblings)
        .iter()
        .enumerate()
        .all(|(index, s)| s.position() == to_position(index))
}

/// The members of `after` whose position differs from `before` (or that are
/// new), i.e. the rows a save port actually has to write.
pub fn changed_positions<T: Positioned>(before: &[T], after: &[T]) -> Vec<T> {
    after
        .iter()
        .filter(|a| {
            before
                .iter()
                .find(|b| b.aggregate_id() == a.aggregate_id())
                .is_none_or(|b| b.position() != a.position())
        })
        .cloned()
        .collect()
}
