use crate::error::CoreError;
use crate::models::{Group, Task};
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

/// Store kept entirely in memory. Snapshots are clones.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tasks: RwLock<HashMap<Uuid, Task>>,
    groups: RwLock<HashMap<String, Group>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl super::TaskStore for MemoryStore {
    async fn list_tasks(&self) -> Result<Vec<Task>, CoreError> {
        Ok(self.tasks.read().await.values().cloned().collect())
    }

    async fn get_task(&self, id: Uuid) -> Result<Option<Task>, CoreError> {
        Ok(self.tasks.read().await.get(&id).cloned())
    }

    async fn put_task(&self, task: &Task) -> Result<(), CoreError> {
        self.tasks.write().await.insert(task.id, task.clone());
        Ok(())
    }

    async fn delete_task(&self, id: Uuid) -> Result<(), CoreError> {
        self.tasks
            .write()
            .await
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| CoreError::NotFound(format!("Task with id {} not found", id)))
    }
}

#[async_trait]
impl super::GroupStore for MemoryStore {
    async fn list_groups(&self) -> Result<Vec<Group>, CoreError> {
        let mut groups: Vec<Group> = self.groups.read().await.values().cloned().collect();
        groups.sort_by(|a, b| a.order.cmp(&b.order).then_with(|| a.id.cmp(&b.id)));
        Ok(groups)
    }

    async fn get_group(&self, id: &str) -> Result<Option<Group>, CoreError> {
        Ok(self.groups.read().await.get(id).cloned())
    }

    async fn put_group(&self, group: &Group) -> Result<(), CoreError> {
        self.groups.write().await.insert(group.id.clone(), group.clone());
        Ok(())
    }

    async fn delete_group(&self, id: &str) -> Result<(), CoreError> {
        self.groups
            .write()
            .await
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| CoreError::NotFound(format!("Group with id {} not found", id)))
    }
}
