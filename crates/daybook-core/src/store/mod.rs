use crate::error::CoreError;
use crate::models::{Group, Task};
use async_trait::async_trait;
use uuid::Uuid;

pub mod memory;
pub mod sqlite;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

/// Canonical task records. No business rules: callers enforce single focus,
/// group existence and the rest.
#[async_trait]
pub trait TaskStore {
    async fn list_tasks(&self) -> Result<Vec<Task>, CoreError>;
    async fn get_task(&self, id: Uuid) -> Result<Option<Task>, CoreError>;
    async fn put_task(&self, task: &Task) -> Result<(), CoreError>;
    async fn delete_task(&self, id: Uuid) -> Result<(), CoreError>;
}

/// Group records, listed in display order.
#[async_trait]
pub trait GroupStore {
    async fn list_groups(&self) -> Result<Vec<Group>, CoreError>;
    async fn get_group(&self, id: &str) -> Result<Option<Group>, CoreError>;
    async fn put_group(&self, group: &Group) -> Result<(), CoreError>;
    async fn delete_group(&self, id: &str) -> Result<(), CoreError>;
}

/// Main store trait that composes the record stores
pub trait Store: TaskStore + GroupStore + Send + Sync {}

impl Store for MemoryStore {}
impl Store for SqliteStore {}
