//! Mutations and store-backed queries.
//!
//! [`Planner`] owns a store, a clock and an expander. Every mutation accepts an
//! [`OccurrenceId`] and applies to the stored task behind it, so acting on a
//! virtual occurrence edits its whole series.

use chrono::{NaiveDate, NaiveTime};
use tracing::{debug, info};
use uuid::Uuid;

use crate::clock::Clock;
use crate::conflict::{detect_conflicts, ConflictMap};
use crate::error::CoreError;
use crate::models::{
    default_groups, normalize_tags, Group, NewTaskData, Reminder, RepeatType, Task, UpdateGroupData,
    UpdateTaskData,
};
use crate::occurrence::{Occurrence, OccurrenceId};
use crate::query;
use crate::recurrence::{validate_recurrence, RecurrenceExpander};
use crate::store::Store;
use crate::window::DateWindow;

/// Shortest prefix accepted by [`Planner::resolve_id`].
pub const MIN_PREFIX_LEN: usize = 2;

pub struct Planner<S: Store, C: Clock> {
    store: S,
    clock: C,
    expander: RecurrenceExpander,
}

impl<S: Store, C: Clock> Planner<S, C> {
    pub fn new(store: S, clock: C, expander: RecurrenceExpander) -> Self {
        Self {
            store,
            clock,
            expander,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn expander(&self) -> &RecurrenceExpander {
        &self.expander
    }

    /// Seeds the default groups into a store that has none.
    ///
    /// # Returns
    ///
    /// The number of groups inserted (zero when groups already exist).
    pub async fn ensure_default_groups(&self) -> Result<usize, CoreError> {
        if !self.store.list_groups().await?.is_empty() {
            return Ok(0);
        }
        let defaults = default_groups();
        for group in &defaults {
            self.store.put_group(group).await?;
        }
        info!(count = defaults.len(), "seeded default groups");
        Ok(defaults.len())
    }

    /// Creates and stores a new task.
    ///
    /// # Arguments
    ///
    /// * `data` - New task fields. An empty `group_id` selects the first group
    ///   in display order; a missing `end_date` makes a single-day task.
    ///
    /// # Behavior
    ///
    /// The title is trimmed and may not be empty. The span may not be
    /// inverted, the recurrence must be valid, and the group must exist.
    /// Enabled reminders need a start time. Custom repeat settings are only
    /// kept for custom tasks. Tags are normalized. Timestamps come from the
    /// planner's clock.
    pub async fn add_task(&self, data: NewTaskData) -> Result<Task, CoreError> {
        let title = data.title.trim().to_string();
        if title.is_empty() {
            return Err(CoreError::InvalidInput("Task title cannot be empty".to_string()));
        }
        let end_date = data.end_date.unwrap_or(data.start_date);
        ensure_span(data.start_date, end_date)?;
        let custom_repeat = data.custom_repeat.filter(|_| data.repeat_type == RepeatType::Custom);
        validate_recurrence(data.repeat_type, custom_repeat.as_ref(), data.start_date)?;
        ensure_reminder_time(&data.reminder, data.start_time)?;

        let group_id = if data.group_id.is_empty() {
            self.first_group().await?.id
        } else {
            self.require_group(&data.group_id).await?.id
        };

        let now = self.clock.now();
        let task = Task {
            id: Uuid::now_v7(),
            title,
            description: data.description.as_deref().and_then(clean_description),
            completed: false,
            start_date: data.start_date,
            end_date,
            start_time: data.start_time,
            group_id,
            color: data.color,
            tags: normalize_tags(&data.tags),
            repeat_type: data.repeat_type,
            custom_repeat,
            reminder: data.reminder,
            is_focus: false,
            parent_task_id: None,
            created_at: now,
            updated_at: now,
        };
        self.store.put_task(&task).await?;
        info!(id = %task.id, title = %task.title, repeat = %task.repeat_type, "added task");
        Ok(task)
    }

    /// Applies a partial update to the stored task behind `id`.
    ///
    /// The result is validated exactly like a new task before it is written.
    pub async fn edit_task(&self, id: OccurrenceId, data: UpdateTaskData) -> Result<Task, CoreError> {
        let mut task = self.require_task(id).await?;

        if let Some(title) = data.title {
            let title = title.trim().to_string();
            if title.is_empty() {
                return Err(CoreError::InvalidInput("Task title cannot be empty".to_string()));
            }
            task.title = title;
        }
        if let Some(description) = data.description {
            task.description = description.as_deref().and_then(clean_description);
        }
        if let Some(start_date) = data.start_date {
            task.start_date = start_date;
        }
        if let Some(end_date) = data.end_date {
            task.end_date = end_date;
        }
        if let Some(start_time) = data.start_time {
            task.start_time = start_time;
        }
        if let Some(group_id) = data.group_id {
            task.group_id = self.require_group(&group_id).await?.id;
        }
        if let Some(color) = data.color {
            task.color = color;
        }
        if let Some(add) = data.add_tags {
            task.tags.extend(normalize_tags(&add));
        }
        if let Some(remove) = data.remove_tags {
            for tag in normalize_tags(&remove) {
                task.tags.remove(&tag);
            }
        }
        if let Some(repeat_type) = data.repeat_type {
            task.repeat_type = repeat_type;
        }
        if let Some(custom_repeat) = data.custom_repeat {
            task.custom_repeat = custom_repeat;
        }
        if let Some(reminder) = data.reminder {
            task.reminder = reminder;
        }
        if task.repeat_type != RepeatType::Custom {
            task.custom_repeat = None;
        }

        ensure_span(task.start_date, task.end_date)?;
        validate_recurrence(task.repeat_type, task.custom_repeat.as_ref(), task.start_date)?;
        ensure_reminder_time(&task.reminder, task.start_time)?;

        self.save(&mut task).await?;
        info!(id = %task.id, "edited task");
        Ok(task)
    }

    pub async fn toggle_complete(&self, id: OccurrenceId) -> Result<Task, CoreError> {
        let mut task = self.require_task(id).await?;
        task.completed = !task.completed;
        self.save(&mut task).await?;
        info!(id = %task.id, completed = task.completed, "toggled completion");
        Ok(task)
    }

    /// Toggles focus on the target task and clears it everywhere else, so at
    /// most one stored task is ever focused.
    pub async fn set_focus(&self, id: OccurrenceId) -> Result<Task, CoreError> {
        let mut target = self.require_task(id).await?;
        let focus = !target.is_focus;

        for mut other in self.store.list_tasks().await? {
            if other.id != target.id && other.is_focus {
                other.is_focus = false;
                self.save(&mut other).await?;
            }
        }

        target.is_focus = focus;
        self.save(&mut target).await?;
        info!(id = %target.id, focus, "set focus");
        Ok(target)
    }

    /// Moves the stored task to a new span.
    pub async fn move_task(
        &self,
        id: OccurrenceId,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Task, CoreError> {
        ensure_span(start_date, end_date)?;
        let mut task = self.require_task(id).await?;
        task.start_date = start_date;
        task.end_date = end_date;
        validate_recurrence(task.repeat_type, task.custom_repeat.as_ref(), task.start_date)?;
        self.save(&mut task).await?;
        info!(id = %task.id, start = %start_date, end = %end_date, "moved task");
        Ok(task)
    }

    pub async fn update_task_group(&self, id: OccurrenceId, group_id: &str) -> Result<Task, CoreError> {
        let group = self.require_group(group_id).await?;
        let mut task = self.require_task(id).await?;
        task.group_id = group.id;
        self.save(&mut task).await?;
        info!(id = %task.id, group = %task.group_id, "changed task group");
        Ok(task)
    }

    /// Deletes the stored task; for a virtual id this removes the whole series.
    pub async fn delete_task(&self, id: OccurrenceId) -> Result<Task, CoreError> {
        let task = self.require_task(id).await?;
        self.store.delete_task(task.id).await?;
        info!(id = %task.id, "deleted task");
        Ok(task)
    }

    /// Creates a group placed after every existing one.
    pub async fn add_group(&self, name: &str, color: &str) -> Result<Group, CoreError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(CoreError::InvalidInput("Group name cannot be empty".to_string()));
        }
        let order = self
            .store
            .list_groups()
            .await?
            .iter()
            .map(|g| g.order.saturating_add(1))
            .max()
            .unwrap_or(0);
        let group = Group {
            id: Uuid::now_v7().to_string(),
            name: name.to_string(),
            color: color.to_string(),
            order,
        };
        self.store.put_group(&group).await?;
        info!(id = %group.id, name = %group.name, "added group");
        Ok(group)
    }

    pub async fn update_group(&self, id: &str, data: UpdateGroupData) -> Result<Group, CoreError> {
        let mut group = self.require_group(id).await?;
        if let Some(name) = data.name {
            let name = name.trim().to_string();
            if name.is_empty() {
                return Err(CoreError::InvalidInput("Group name cannot be empty".to_string()));
            }
            group.name = name;
        }
        if let Some(color) = data.color {
            group.color = color;
        }
        if let Some(order) = data.order {
            group.order = order;
        }
        self.store.put_group(&group).await?;
        info!(id = %group.id, "updated group");
        Ok(group)
    }

    /// Deletes a group after moving its tasks to the first remaining group.
    ///
    /// # Returns
    ///
    /// The group that received the reassigned tasks.
    ///
    /// # Errors
    ///
    /// [`CoreError::LastGroup`] when `id` is the only group left.
    pub async fn delete_group(&self, id: &str) -> Result<Group, CoreError> {
        let groups = self.store.list_groups().await?;
        if !groups.iter().any(|g| g.id == id) {
            return Err(CoreError::NotFound(format!("Group with id {} not found", id)));
        }
        let fallback = groups
            .into_iter()
            .find(|g| g.id != id)
            .ok_or(CoreError::LastGroup)?;

        let mut moved = 0usize;
        for mut task in self.store.list_tasks().await? {
            if task.group_id == id {
                task.group_id = fallback.id.clone();
                self.save(&mut task).await?;
                moved += 1;
            }
        }
        self.store.delete_group(id).await?;
        info!(id, fallback = %fallback.id, moved, "deleted group");
        Ok(fallback)
    }

    pub async fn groups(&self) -> Result<Vec<Group>, CoreError> {
        self.store.list_groups().await
    }

    pub async fn tasks(&self) -> Result<Vec<Task>, CoreError> {
        self.store.list_tasks().await
    }

    pub async fn get_task(&self, id: OccurrenceId) -> Result<Task, CoreError> {
        self.require_task(id).await
    }

    pub async fn tasks_for_range(&self, window: &DateWindow) -> Result<Vec<Occurrence>, CoreError> {
        let tasks = self.store.list_tasks().await?;
        Ok(query::tasks_for_range(&tasks, window, &self.expander))
    }

    pub async fn tasks_for_date(&self, date: NaiveDate) -> Result<Vec<Occurrence>, CoreError> {
        let tasks = self.store.list_tasks().await?;
        Ok(query::tasks_for_date(&tasks, date, &self.expander))
    }

    pub async fn todays_tasks(&self) -> Result<Vec<Occurrence>, CoreError> {
        let tasks = self.store.list_tasks().await?;
        Ok(query::todays_tasks(&tasks, &self.clock, &self.expander))
    }

    pub async fn focus_task(&self) -> Result<Option<Occurrence>, CoreError> {
        let tasks = self.store.list_tasks().await?;
        Ok(query::focus_task(&tasks, &self.clock, &self.expander))
    }

    pub async fn conflicts_for_range(&self, window: &DateWindow) -> Result<ConflictMap, CoreError> {
        let occurrences = self.tasks_for_range(window).await?;
        Ok(detect_conflicts(&occurrences))
    }

    pub async fn tag_counts(&self) -> Result<Vec<(String, usize)>, CoreError> {
        let tasks = self.store.list_tasks().await?;
        Ok(query::tag_counts(&tasks))
    }

    /// Resolves user input to an occurrence id.
    ///
    /// Accepts a full id, a full virtual id (`{id}-repeat-{n}`), or a unique
    /// prefix of at least [`MIN_PREFIX_LEN`] characters of a stored task id,
    /// optionally followed by `-repeat-{n}`.
    pub async fn resolve_id(&self, input: &str) -> Result<OccurrenceId, CoreError> {
        let input = input.trim();
        if let Ok(id) = input.parse::<OccurrenceId>() {
            return Ok(id);
        }

        let (prefix, index) = match input.rsplit_once("-repeat-") {
            Some((prefix, index)) => {
                let index = index
                    .parse::<u32>()
                    .map_err(|_| CoreError::InvalidInput(format!("Invalid occurrence index in '{}'", input)))?;
                (prefix, Some(index))
            }
            None => (input, None),
        };
        if prefix.len() < MIN_PREFIX_LEN {
            return Err(CoreError::InvalidInput(format!(
                "Id prefix '{}' is too short, use at least {} characters",
                prefix, MIN_PREFIX_LEN
            )));
        }

        let needle = prefix.to_lowercase();
        let matches: Vec<Uuid> = self
            .store
            .list_tasks()
            .await?
            .into_iter()
            .map(|t| t.id)
            .filter(|id| id.to_string().starts_with(&needle))
            .collect();
        debug!(prefix, matches = matches.len(), "resolved id prefix");

        match matches.as_slice() {
            [] => Err(CoreError::NotFound(format!("No task matches id '{}'", prefix))),
            [id] => Ok(match index {
                Some(index) => OccurrenceId::Virtual { base: *id, index },
                None => OccurrenceId::Base(*id),
            }),
            _ => Err(CoreError::AmbiguousId {
                prefix: prefix.to_string(),
                count: matches.len(),
            }),
        }
    }

    async fn require_task(&self, id: OccurrenceId) -> Result<Task, CoreError> {
        let real_id = id.real_id();
        self.store
            .get_task(real_id)
            .await?
            .ok_or_else(|| CoreError::NotFound(format!("Task with id {} not found", real_id)))
    }

    async fn require_group(&self, id: &str) -> Result<Group, CoreError> {
        self.store
            .get_group(id)
            .await?
            .ok_or_else(|| CoreError::NotFound(format!("Group with id {} not found", id)))
    }

    async fn first_group(&self) -> Result<Group, CoreError> {
        self.store
            .list_groups()
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| CoreError::NotFound("No groups exist".to_string()))
    }

    async fn save(&self, task: &mut Task) -> Result<(), CoreError> {
        task.updated_at = self.clock.now();
        self.store.put_task(task).await
    }
}

fn ensure_span(start: NaiveDate, end: NaiveDate) -> Result<(), CoreError> {
    if start > end {
        return Err(CoreError::InvalidInput(format!(
            "Task end date {} is before its start date {}",
            end, start
        )));
    }
    Ok(())
}

fn ensure_reminder_time(reminder: &Reminder, start_time: Option<NaiveTime>) -> Result<(), CoreError> {
    if reminder.enabled && start_time.is_none() {
        return Err(CoreError::InvalidInput(
            "Reminders need a start time".to_string(),
        ));
    }
    Ok(())
}

fn clean_description(description: &str) -> Option<String> {
    let description = description.trim();
    (!description.is_empty()).then(|| description.to_string())
}
