//! Test repositories — in-memory and failing persistence ports.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use encuestas_core::aggregate::Aggregate;
use encuestas_core::error::DomainError;
use encuestas_core::position::Positioned;
use encuestas_core::repository::{AggregateRepository, ChildRepository};
use uuid::Uuid;

/// A map-backed repository that records every save. Works for any
/// aggregate, and as a [`ChildRepository`] for positioned children.
#[derive(Debug)]
pub struct InMemoryRepository<A> {
    items: Mutex<HashMap<Uuid, A>>,
    saves: Mutex<Vec<A>>,
    conflict_on_save: Mutex<bool>,
}

impl<A: Aggregate> Default for InMemoryRepository<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A: Aggregate> InMemoryRepository<A> {
    /// Creates an empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self {
            items: Mutex::new(HashMap::new()),
            saves: Mutex::new(Vec::new()),
            conflict_on_save: Mutex::new(false),
        }
    }

    /// Creates a repository pre-populated with `items` (not recorded as
    /// saves).
    #[must_use]
    pub fn with(items: impl IntoIterator<Item = A>) -> Self {
        let repo = Self::new();
        {
            let mut map = repo.items.lock().unwrap();
            for item in items {
                map.insert(item.aggregate_id(), item);
            }
        }
        repo
    }

    /// Makes every subsequent save fail with `ConcurrencyConflict`.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn fail_saves_with_conflict(&self) {
        *self.conflict_on_save.lock().unwrap() = true;
    }

    /// Returns the stored snapshot for `id`.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[must_use]
    pub fn get(&self, id: Uuid) -> Option<A> {
        self.items.lock().unwrap().get(&id).cloned()
    }

    /// Returns every stored snapshot, in no particular order.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[must_use]
    pub fn all(&self) -> Vec<A> {
        self.items.lock().unwrap().values().cloned().collect()
    }

    /// Returns every snapshot passed to a save, in call order.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[must_use]
    pub fn saved(&self) -> Vec<A> {
        self.saves.lock().unwrap().clone()
    }

    fn store(&self, aggregate: &A) -> Result<(), DomainError> {
        if *self.conflict_on_save.lock().unwrap() {
            return Err(DomainError::ConcurrencyConflict {
                aggregate_id: aggregate.aggregate_id(),
            });
        }
        self.items
            .lock()
            .unwrap()
            .insert(aggregate.aggregate_id(), aggregate.clone());
        self.saves.lock().unwrap().push(aggregate.clone());
        Ok(())
    }
}

#[async_trait]
impl<A: Aggregate> AggregateRepository<A> for InMemoryRepository<A> {
    async fn load(&self, id: Uuid) -> Result<Option<A>, DomainError> {
        Ok(self.get(id))
    }

    async fn save(&self, aggregate: &A) -> Result<(), DomainError> {
        self.store(aggregate)
    }

    async fn delete(&self, id: Uuid) -> Result<(), DomainError> {
        self.items.lock().unwrap().remove(&id);
        Ok(())
    }
}

#[async_trait]
impl<C: Positioned> ChildRepository<C> for InMemoryRepository<C> {
    async fn list_by_parent(&self, parent_id: Uuid) -> Result<Vec<C>, DomainError> {
        Ok(self
            .items
            .lock()
            .unwrap()
            .values()
            .filter(|c| c.parent_id() == parent_id)
            .cloned()
            .collect())
    }

    async fn save_all(&self, children: &[C]) -> Result<(), DomainError> {
        for child in children {
            self.store(child)?;
        }
        Ok(())
    }
}

/// A repository that always returns an infrastructure error. Useful for
/// testing error-handling paths.
#[derive(Debug, Default)]
pub struct FailingRepository;

#[async_trait]
impl<A: Aggregate> AggregateRepository<A> for FailingRepository {
    async fn load(&self, _id: Uuid) -> Result<Option<A>, DomainError> {
        Err(DomainError::Infrastructure("connection refused".into()))
    }

    async fn save(&self, _aggregate: &A) -> Result<(), DomainError> {
        Err(DomainError::Infrastructure("connection refused".into()))
    }

    async fn delete(&self, _id: Uuid) -> Result<(), DomainError> {
        Err(DomainError::Infrastructure("connection refused".into()))
    }
}

#[async_trait]
impl<C: Positioned> ChildRepository<C> for FailingRepository {
    async fn list_by_parent(&self, _parent_id: Uuid) -> Result<Vec<C>, DomainError> {
        Err(DomainError::Infrastructure("connection refused".into()))
    }

    async fn save_all(&self, _children: &[C]) -> Result<(), DomainError> {
        Err(DomainError::Infrastructure("connection refused".into()))
    }
}
