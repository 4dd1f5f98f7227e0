//! Persistence collaborators: the `Store` trait plus in-memory and PostgreSQL implementations.

mod memory;
mod pg;

pub use memory::MemoryStore;
pub use pg::PgStore;

use crate::error::AppError;
use crate::model::Instance;
use async_trait::async_trait;

#[async_trait]
pub trait Store: Send + Sync {
    /// Fetch one instance of `kind` by its primary key as it appears in URLs.
    async fn get(&self, kind: &str, pk: &str) -> Result<Option<Instance>, AppError>;

    /// All instances of `kind`, ordered by primary key.
    async fn all(&self, kind: &str) -> Result<Vec<Instance>, AppError>;

    /// Insert (no pk yet) or update (pk set). On insert the assigned pk is written back.
    async fn save(&self, instance: &mut Instance) -> Result<(), AppError>;

    async fn delete(&self, instance: &Instance) -> Result<(), AppError>;
}
