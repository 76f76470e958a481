//! Data access for every [`Resource`]: one trait, a sea-orm backend for
//! PostgreSQL and an in-process backend for tests, fixtures and database-less runs.

use async_trait::async_trait;
use models::{Filter, Resource};
use uuid::Uuid;

use crate::errors::ServiceError;

pub mod memory;
pub mod seaorm;

pub use memory::MemoryRepository;
pub use seaorm::SeaOrmRepository;

#[async_trait]
pub trait Repository<M: Resource>: Send + Sync {
    /// Rows matching `filter`, ordered by `M::SORT`.
    async fn list(&self, filter: Option<Filter>) -> Result<Vec<M>, ServiceError>;
    async fn get(&self, id: Uuid) -> Result<Option<M>, ServiceError>;
    async fn insert(&self, row: M) -> Result<M, ServiceError>;
    /// Overwrite an existing row; `NotFound` if it is gone.
    async fn update(&self, row: M) -> Result<M, ServiceError>;
    async fn delete(&self, id: Uuid) -> Result<bool, ServiceError>;
    /// Overwrite several rows; either all are written or none are.
    async fn update_batch(&self, rows: Vec<M>) -> Result<(), ServiceError>;
}
