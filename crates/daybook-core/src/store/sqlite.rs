use crate::db::DbPool;
use crate::error::CoreError;
use crate::models::{CustomRepeat, Group, Reminder, RepeatType, Task};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use sqlx::FromRow;
use std::collections::BTreeSet;
use uuid::Uuid;

/// SQLite-backed store. Collection-valued fields are kept as JSON text.
pub struct SqliteStore {
    pool: DbPool,
}

impl SqliteStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub(crate) fn pool(&self) -> &DbPool {
        &self.pool
    }
}

#[derive(Debug, FromRow)]
struct TaskRow {
    id: String,
    title: String,
    description: Option<String>,
    completed: bool,
    start_date: NaiveDate,
    end_date: NaiveDate,
    start_time: Option<NaiveTime>,
    group_id: String,
    color: Option<String>,
    tags: String,
    repeat_type: String,
    custom_repeat: Option<String>,
    reminder: String,
    is_focus: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<TaskRow> for Task {
    type Error = CoreError;

    fn try_from(row: TaskRow) -> Result<Self, Self::Error> {
        let id = Uuid::parse_str(&row.id)
            .map_err(|_| CoreError::InvalidInput(format!("Stored task id '{}' is not a UUID", row.id)))?;
        let repeat_type = row
            .repeat_type
            .parse::<RepeatType>()
            .map_err(|e| CoreError::InvalidInput(e.to_string()))?;
        let tags: BTreeSet<String> = serde_json::from_str(&row.tags)?;
        let custom_repeat: Option<CustomRepeat> = row
            .custom_repeat
            .as_deref()
            .map(serde_json::from_str)
            .transpose()?;
        let reminder: Reminder = serde_json::from_str(&row.reminder)?;

        Ok(Task {
            id,
            title: row.title,
            description: row.description,
            completed: row.completed,
            start_date: row.start_date,
            end_date: row.end_date,
            start_time: row.start_time,
            group_id: row.group_id,
            color: row.color,
            tags,
            repeat_type,
            custom_repeat,
            reminder,
            is_focus: row.is_focus,
            parent_task_id: None,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(Debug, FromRow)]
struct GroupRow {
    id: String,
    name: String,
    color: String,
    sort_order: i64,
}

impl From<GroupRow> for Group {
    fn from(row: GroupRow) -> Self {
        Group {
            id: row.id,
            name: row.name,
            color: row.color,
            order: u32::try_from(row.sort_order).unwrap_or(u32::MAX),
        }
    }
}

#[async_trait]
impl super::TaskStore for SqliteStore {
    async fn list_tasks(&self) -> Result<Vec<Task>, CoreError> {
        let rows: Vec<TaskRow> = sqlx::query_as("SELECT * FROM tasks")
            .fetch_all(self.pool())
            .await?;
        rows.into_iter().map(Task::try_from).collect()
    }

    async fn get_task(&self, id: Uuid) -> Result<Option<Task>, CoreError> {
        let row: Option<TaskRow> = sqlx::query_as("SELECT * FROM tasks WHERE id = $1")
            .bind(id.to_string())
            .fetch_optional(self.pool())
            .await?;
        row.map(Task::try_from).transpose()
    }

    async fn put_task(&self, task: &Task) -> Result<(), CoreError> {
        let tags = serde_json::to_string(&task.tags)?;
        let custom_repeat = task
            .custom_repeat
            .as_ref()
            .map(serde_json::to_string)
            .transpose()?;
        let reminder = serde_json::to_string(&task.reminder)?;

        sqlx::query(
            r#"INSERT OR REPLACE INTO tasks
            (id, title, description, completed, start_date, end_date, start_time, group_id, color,
             tags, repeat_type, custom_repeat, reminder, is_focus, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)"#,
        )
        .bind(task.id.to_string())
        .bind(&task.title)
        .bind(&task.description)
        .bind(task.completed)
        .bind(task.start_date)
        .bind(task.end_date)
        .bind(task.start_time)
        .bind(&task.group_id)
        .bind(&task.color)
        .bind(tags)
        .bind(task.repeat_type.to_string())
        .bind(custom_repeat)
        .bind(reminder)
        .bind(task.is_focus)
        .bind(task.created_at)
        .bind(task.updated_at)
        .execute(self.pool())
        .await?;
        Ok(())
    }

    async fn delete_task(&self, id: Uuid) -> Result<(), CoreError> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1")
            .bind(id.to_string())
            .execute(self.pool())
            .await?;

        if result.rows_affected() == 0 {
            return Err(CoreError::NotFound(format!("Task with id {} not found", id)));
        }
        Ok(())
    }
}

#[async_trait]
impl super::GroupStore for SqliteStore {
    async fn list_groups(&self) -> Result<Vec<Group>, CoreError> {
        let rows: Vec<GroupRow> = sqlx::query_as("SELECT * FROM groups ORDER BY sort_order, id")
            .fetch_all(self.pool())
            .await?;
        Ok(rows.into_iter().map(Group::from).collect())
    }

    async fn get_group(&self, id: &str) -> Result<Option<Group>, CoreError> {
        let row: Option<GroupRow> = sqlx::query_as("SELECT * FROM groups WHERE id = $1")
            .bind(id)
            .fetch_optional(self.pool())
            .await?;
        Ok(row.map(Group::from))
    }

    async fn put_group(&self, group: &Group) -> Result<(), CoreError> {
        sqlx::query(
            r#"INSERT OR REPLACE INTO groups (id, name, color, sort_order)
            VALUES ($1, $2, $3, $4)"#,
        )
        .bind(&group.id)
        .bind(&group.name)
        .bind(&group.color)
        .bind(i64::from(group.order))
        .execute(self.pool())
        .await?;
        Ok(())
    }

    async fn delete_group(&self, id: &str) -> Result<(), CoreError> {
        let result = sqlx::query("DELETE FROM groups WHERE id = $1")
            .bind(id)
            .execute(self.pool())
            .await?;

        if result.rows_affected() == 0 {
            return Err(CoreError::NotFound(format!("Group with id {} not found", id)));
        }
        Ok(())
    }
}
