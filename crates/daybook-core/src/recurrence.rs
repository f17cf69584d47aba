use chrono::{Days, Months, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::{debug, warn};

use crate::error::CoreError;
use crate::models::{CustomRepeat, RepeatType, RepeatUnit, Task};
use crate::occurrence::Occurrence;
use crate::window::DateWindow;

/// Upper bound on candidate occurrences considered per task per query.
pub const MAX_ITERATIONS: u32 = 365;

/// How far past the window end an open-ended series is allowed to run.
pub const DEFAULT_HORIZON_MONTHS: u32 = 12;

/// Configuration for recurrence expansion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExpansionConfig {
    /// Maximum candidate occurrences per task per call
    pub max_iterations: u32,
    /// Implicit series end for tasks without an explicit end date, in months past the window
    pub horizon_months: u32,
}

impl Default for ExpansionConfig {
    fn default() -> Self {
        Self {
            max_iterations: MAX_ITERATIONS,
            horizon_months: DEFAULT_HORIZON_MONTHS,
        }
    }
}

/// Step between consecutive occurrences.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Cadence {
    Days(u32),
    Weeks(u32),
    Months(u32),
}

impl Cadence {
    fn for_task(task: &Task) -> Option<Self> {
        match task.repeat_type {
            RepeatType::None => None,
            RepeatType::Daily => Some(Cadence::Days(1)),
            RepeatType::Weekly => Some(Cadence::Weeks(1)),
            RepeatType::Monthly => Some(Cadence::Months(1)),
            RepeatType::Custom => {
                let custom = task.custom_repeat.as_ref()?;
                if custom.interval == 0 {
                    return None;
                }
                Some(match custom.unit {
                    RepeatUnit::Days => Cadence::Days(custom.interval),
                    RepeatUnit::Weeks => Cadence::Weeks(custom.interval),
                    RepeatUnit::Months => Cadence::Months(custom.interval),
                })
            }
        }
    }

    /// `origin` advanced by `steps` cadence units, always computed from the
    /// origin so month-end clamping never accumulates.
    fn advance(self, origin: NaiveDate, steps: u32) -> Option<NaiveDate> {
        match self {
            Cadence::Days(n) => {
                let days = u64::from(n).checked_mul(u64::from(steps))?;
                origin.checked_add_days(Days::new(days))
            }
            Cadence::Weeks(n) => {
                let days = u64::from(n)
                    .checked_mul(u64::from(steps))?
                    .checked_mul(7)?;
                origin.checked_add_days(Days::new(days))
            }
            Cadence::Months(n) => {
                let months = n.checked_mul(steps)?;
                origin.checked_add_months(Months::new(months))
            }
        }
    }
}

/// Validates recurrence settings before a task is stored.
///
/// A custom series needs its cadence and a positive interval, and an explicit
/// series end may not precede the task's own start.
pub fn validate_recurrence(
    repeat_type: RepeatType,
    custom_repeat: Option<&CustomRepeat>,
    start_date: NaiveDate,
) -> Result<(), CoreError> {
    if repeat_type != RepeatType::Custom {
        return Ok(());
    }
    let custom = custom_repeat.ok_or_else(|| {
        CoreError::InvalidRecurrence("custom repeat requires an interval and a unit".to_string())
    })?;
    if custom.interval == 0 {
        return Err(CoreError::InvalidRecurrence(
            "custom repeat interval must be at least 1".to_string(),
        ));
    }
    if let Some(end_date) = custom.end_date {
        if end_date < start_date {
            return Err(CoreError::InvalidRecurrence(format!(
                "repeat end date {} is before the task start {}",
                end_date, start_date
            )));
        }
    }
    Ok(())
}

/// RecurrenceExpander: turns one repeating base task into the virtual
/// occurrences that fall inside a date window.
#[derive(Debug, Clone, Default)]
pub struct RecurrenceExpander {
    config: ExpansionConfig,
}

impl RecurrenceExpander {
    pub fn new(config: ExpansionConfig) -> Self {
        Self { config }
    }

    pub fn with_defaults() -> Self {
        Self::new(ExpansionConfig::default())
    }

    pub fn config(&self) -> &ExpansionConfig {
        &self.config
    }

    /// Expands a repeating task over `window`.
    ///
    /// # Arguments
    /// * `task` - The stored base task; non-repeating tasks yield nothing
    /// * `window` - Closed date interval to materialize
    ///
    /// # Returns
    /// * `Vec<Occurrence>` - Virtual occurrences, ascending by occurrence index
    ///
    /// # Behavior
    /// - Occurrence `k` starts `k - 1` cadence steps after the base start and
    ///   keeps the base task's duration
    /// - Iteration stops at the series end (explicit, or the window end plus
    ///   the configured horizon), at the window end, or after
    ///   `max_iterations` candidates
    /// - Candidates ending before the window, starting on the base date, or
    ///   starting on a skip date are not emitted
    /// - Malformed custom settings produce no occurrences
    pub fn expand(&self, task: &Task, window: &DateWindow) -> Vec<Occurrence> {
        let Some(cadence) = Cadence::for_task(task) else {
            if task.repeat_type == RepeatType::Custom {
                warn!(task_id = %task.id, "custom repeat without a usable cadence, no occurrences produced");
            }
            return Vec::new();
        };

        let duration = Days::new(task.duration_days());
        let custom = task.custom_cadence();
        let repeat_end = custom.and_then(|c| c.end_date).unwrap_or_else(|| {
            window
                .end()
                .checked_add_months(Months::new(self.config.horizon_months))
                .unwrap_or(NaiveDate::MAX)
        });
        let empty = BTreeSet::new();
        let skip_dates = custom.map_or(&empty, |c| &c.skip_dates);

        let mut occurrences = Vec::new();
        for k in 1..=self.config.max_iterations {
            let candidate = if k == 1 {
                Some(task.start_date)
            } else {
                cadence.advance(task.start_date, k - 1)
            };
            let Some(start) = candidate else { break };

            if start > repeat_end || start > window.end() {
                break;
            }
            let Some(end) = start.checked_add_days(duration) else { break };

            if end < window.start() || start == task.start_date || skip_dates.contains(&start) {
                continue;
            }

            occurrences.push(Occurrence::virtual_of(task, k, start, end));
        }

        debug!(
            task_id = %task.id,
            repeat = %task.repeat_type,
            count = occurrences.len(),
            "expanded repeating task"
        );
        occurrences
    }
}
