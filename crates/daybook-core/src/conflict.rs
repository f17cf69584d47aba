use std::collections::{BTreeSet, HashMap};
use tracing::debug;
use uuid::Uuid;

use crate::occurrence::{Occurrence, OccurrenceId};

/// Same-time conflicts among a materialized list, keyed by real task id.
///
/// Two entries conflict when both are open, both have a start time, their date
/// spans overlap and their start times are equal. Duration within the day is
/// not considered.
#[derive(Debug, Clone, Default)]
pub struct ConflictMap {
    conflicts: HashMap<Uuid, BTreeSet<Uuid>>,
    occurrences: Vec<Occurrence>,
}

/// Computes pairwise conflicts. Quadratic in the list length, which is bounded
/// by the query window.
pub fn detect_conflicts(occurrences: &[Occurrence]) -> ConflictMap {
    let timed: Vec<&Occurrence> = occurrences
        .iter()
        .filter(|o| o.task.start_time.is_some() && !o.task.completed)
        .collect();

    let mut conflicts: HashMap<Uuid, BTreeSet<Uuid>> = HashMap::new();
    for (i, a) in timed.iter().enumerate() {
        for b in &timed[i + 1..] {
            let (a_id, b_id) = (a.real_id(), b.real_id());
            if a_id == b_id {
                continue;
            }
            let dates_overlap = a.start_date() <= b.end_date() && b.start_date() <= a.end_date();
            if dates_overlap && a.task.start_time == b.task.start_time {
                conflicts.entry(a_id).or_default().insert(b_id);
                conflicts.entry(b_id).or_default().insert(a_id);
            }
        }
    }

    debug!(candidates = timed.len(), conflicting = conflicts.len(), "conflict detection");
    ConflictMap {
        conflicts,
        occurrences: occurrences.to_vec(),
    }
}

impl ConflictMap {
    pub fn has_conflict(&self, id: OccurrenceId) -> bool {
        self.conflicts
            .get(&id.real_id())
            .map_or(false, |set| !set.is_empty())
    }

    /// Real ids of the tasks conflicting with `id`.
    pub fn conflicts(&self, id: OccurrenceId) -> BTreeSet<Uuid> {
        self.conflicts.get(&id.real_id()).cloned().unwrap_or_default()
    }

    /// Entries of the analysed list belonging to tasks that conflict with `id`.
    pub fn conflicting_tasks(&self, id: OccurrenceId) -> Vec<&Occurrence> {
        let Some(ids) = self.conflicts.get(&id.real_id()) else {
            return Vec::new();
        };
        self.occurrences
            .iter()
            .filter(|o| ids.contains(&o.real_id()))
            .collect()
    }

    /// The list the map was computed from.
    pub fn occurrences(&self) -> &[Occurrence] {
        &self.occurrences
    }

    /// Number of tasks with at least one conflict.
    pub fn total_conflicts(&self) -> usize {
        self.conflicts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.conflicts.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Uuid, &BTreeSet<Uuid>)> {
        self.conflicts.iter()
    }
}
