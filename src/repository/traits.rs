//! Repository Layer - Core Traits
//!
//! Defines the abstract interface for the per-domain caches.
//! Implementations can use SQLite, in-memory, etc.

use async_trait::async_trait;
use crate::domain::{DomainResult, Entity};

/// Cache repository mirroring one remote collection
///
/// Generic over any Entity type. All operations are async to support
/// various backends.
#[async_trait]
pub trait CacheRepository<T: Entity>: Send + Sync {
    /// Make the cache an exact mirror of `entities`: keyed upsert by
    /// id, rows whose ids are absent from `entities` are deleted.
    /// Runs in a single transaction.
    async fn replace_all(&self, entities: &[T]) -> DomainResult<()>;

    /// Insert or update a single row, leaving the rest untouched
    async fn upsert(&self, entity: &T) -> DomainResult<()>;

    /// List all cached entities
    async fn list(&self) -> DomainResult<Vec<T>>;

    /// Delete every cached row
    async fn clear(&self) -> DomainResult<()>;
}
