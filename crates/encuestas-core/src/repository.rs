//! Persistence ports.
//!
//! Adapters own transactions, unique constraints and optimistic locking.
//! A save that loses a race reports [`DomainError::ConcurrencyConflict`];
//! callers re-fetch and retry, the domain never does.

use async_trait::async_trait;
use uuid::Uuid;

use crate::aggregate::Aggregate;
use crate::error::DomainError;
use crate::position::Positioned;

/// Load/save/delete port for a snapshot aggregate.
#[async_trait]
pub trait AggregateRepository<A: Aggregate>: Send + Sync {
    /// Loads the aggregate with the given id, if it exists.
    async fn load(&self, id: Uuid) -> Result<Option<A>, DomainError>;

    /// Persists a snapshot, replacing any previous one with the same id.
    async fn save(&self, aggregate: &A) -> Result<(), DomainError>;

    /// Deletes the aggregate. Deleting an absent id is not an error.
    async fn delete(&self, id: Uuid) -> Result<(), DomainError>;
}

/// Port for positioned children (sections of a form, questions of a
/// section).
#[async_trait]
pub trait ChildRepository<C: Positioned>: AggregateRepository<C> {
    /// Lists every child of `parent_id`, in any order.
    async fn list_by_parent(&self, parent_id: Uuid) -> Result<Vec<C>, DomainError>;

    /// Persists several children as one unit of work.
    async fn save_all(&self, children: &[C]) -> Result<(), DomainError>;
}

/// Loads an aggregate or fails with [`DomainError::NotFound`].
///
/// # Errors
///
/// Returns `DomainError::NotFound` if the port has no aggregate for `id`,
/// or whatever error the port itself reports.
pub async fn load_required<A, R>(repo: &R, id: Uuid) -> Result<A, DomainError>
where
    A: Aggregate,
    R: AggregateRepository<A> + ?Sized,
{
    repo.load(id)
        .await?
        .ok_or_else(|| DomainError::not_found(A::KIND, id))
}
