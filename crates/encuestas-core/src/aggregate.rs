//! Aggregate abstraction.

use uuid::Uuid;

/// An entity persisted as a whole snapshot.
///
/// Mutations never happen in place: every domain method takes `&self` and
/// returns the next snapshot, which the caller hands to a save port.
pub trait Aggregate: Clone + Send + Sync + 'static {
    /// Entity name used in `NotFound` errors and log fields.
    const KIND: &'static str;

    /// Returns the aggregate identifier.
    fn aggregate_id(&self) -> Uuid;
}
