//! Date-range queries over base tasks and their expanded occurrences.

use chrono::NaiveDate;
use std::cmp::Ordering;
use std::collections::HashMap;
use tracing::debug;

use crate::clock::Clock;
use crate::models::{GroupId, Task};
use crate::occurrence::Occurrence;
use crate::recurrence::RecurrenceExpander;
use crate::window::DateWindow;

/// Everything visible in `window`.
///
/// Stored tasks overlapping the window come first, followed by the virtual
/// occurrences of every repeating task. Repeating tasks are expanded even when
/// their own span lies outside the window.
pub fn tasks_for_range(
    tasks: &[Task],
    window: &DateWindow,
    expander: &RecurrenceExpander,
) -> Vec<Occurrence> {
    let mut result: Vec<Occurrence> = tasks
        .iter()
        .filter(|task| window.overlaps(task.start_date, task.end_date))
        .cloned()
        .map(Occurrence::base)
        .collect();
    let direct = result.len();

    for task in tasks.iter().filter(|task| task.is_repeating()) {
        result.extend(expander.expand(task, window));
    }

    debug!(
        start = %window.start(),
        end = %window.end(),
        direct,
        expanded = result.len() - direct,
        "range query"
    );
    result
}

pub fn tasks_for_date(tasks: &[Task], date: NaiveDate, expander: &RecurrenceExpander) -> Vec<Occurrence> {
    tasks_for_range(tasks, &DateWindow::single_day(date), expander)
}

pub fn todays_tasks(tasks: &[Task], clock: &impl Clock, expander: &RecurrenceExpander) -> Vec<Occurrence> {
    tasks_for_date(tasks, clock.today(), expander)
}

/// The focused entry active today, if any.
///
/// A stored task is preferred over a virtual occurrence of a focused series.
pub fn focus_task(tasks: &[Task], clock: &impl Clock, expander: &RecurrenceExpander) -> Option<Occurrence> {
    todays_tasks(tasks, clock, expander)
        .into_iter()
        .find(|occurrence| occurrence.task.is_focus)
}

/// Represents a filter for narrowing a materialized list.
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    Group(GroupId),
    Tag(String),
    Completed(bool),
}

impl Filter {
    pub fn matches(&self, task: &Task) -> bool {
        match self {
            Filter::Group(group_id) => &task.group_id == group_id,
            Filter::Tag(tag) => task.tags.contains(&tag.trim().to_lowercase()),
            Filter::Completed(completed) => task.completed == *completed,
        }
    }
}

/// Keeps entries matching every filter.
pub fn apply_filters(occurrences: Vec<Occurrence>, filters: &[Filter]) -> Vec<Occurrence> {
    occurrences
        .into_iter()
        .filter(|o| filters.iter().all(|f| f.matches(&o.task)))
        .collect()
}

/// Focus first, open before done, newest first.
pub fn sort_for_display(occurrences: &mut [Occurrence]) {
    occurrences.sort_by(|a, b| {
        b.task
            .is_focus
            .cmp(&a.task.is_focus)
            .then_with(|| a.task.completed.cmp(&b.task.completed))
            .then_with(|| b.task.created_at.cmp(&a.task.created_at))
            .then_with(|| a.start_date().cmp(&b.start_date()))
    });
}

/// Completion counts for a list of entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Progress {
    pub total: usize,
    pub completed: usize,
}

impl Progress {
    pub fn of(occurrences: &[Occurrence]) -> Self {
        Self {
            total: occurrences.len(),
            completed: occurrences.iter().filter(|o| o.task.completed).count(),
        }
    }

    /// Rounded completion percentage; 0 for an empty list.
    pub fn percentage(&self) -> u32 {
        if self.total == 0 {
            return 0;
        }
        ((self.completed as f64 / self.total as f64) * 100.0).round() as u32
    }

    pub fn is_all_done(&self) -> bool {
        self.total > 0 && self.completed == self.total
    }
}

/// Tags with their usage counts, most used first.
pub fn tag_counts(tasks: &[Task]) -> Vec<(String, usize)> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for tag in tasks.iter().flat_map(|t| t.tags.iter()) {
        *counts.entry(tag.as_str()).or_default() += 1;
    }
    let mut result: Vec<(String, usize)> = counts
        .into_iter()
        .map(|(tag, count)| (tag.to_string(), count))
        .collect();
    result.sort_by(|a, b| match b.1.cmp(&a.1) {
        Ordering::Equal => a.0.cmp(&b.0),
        other => other,
    });
    result
}
