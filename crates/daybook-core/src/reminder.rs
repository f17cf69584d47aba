use chrono::{Duration, NaiveDate, NaiveDateTime};
use std::collections::HashSet;
use tracing::debug;
use uuid::Uuid;

use crate::occurrence::{Occurrence, OccurrenceId};

/// A reminder that should fire now.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DueReminder {
    pub id: OccurrenceId,
    pub title: String,
    pub minutes_before: u32,
    pub starts_at: NaiveDateTime,
}

impl DueReminder {
    pub fn message(&self) -> String {
        format!("{} - {}", self.title, format_reminder_time(self.minutes_before))
    }
}

/// Reminders due at local time `now` among the given entries.
///
/// Only open tasks starting today with a start time and enabled reminders are
/// considered. A reminder `m` minutes before start is due strictly between
/// that point and the start itself.
pub fn due_reminders(occurrences: &[Occurrence], now: NaiveDateTime) -> Vec<DueReminder> {
    let mut due = Vec::new();
    for occurrence in occurrences {
        let task = &occurrence.task;
        if !task.reminder.enabled || task.completed || task.start_date != now.date() {
            continue;
        }
        let Some(start_time) = task.start_time else { continue };
        let starts_at = task.start_date.and_time(start_time);

        for &minutes in &task.reminder.times {
            let fires_at = starts_at - Duration::minutes(i64::from(minutes));
            if fires_at < now && now < starts_at {
                due.push(DueReminder {
                    id: occurrence.id,
                    title: task.title.clone(),
                    minutes_before: minutes,
                    starts_at,
                });
            }
        }
    }
    due
}

/// Remembers which reminders already fired today so repeated polling reports
/// each one once. Entries are keyed by the stored task's id, so a series
/// fires each offset at most once per day. Forgets everything when the date
/// changes.
#[derive(Debug, Default)]
pub struct ReminderTracker {
    day: Option<NaiveDate>,
    fired: HashSet<(Uuid, u32)>,
}

impl ReminderTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn poll(&mut self, occurrences: &[Occurrence], now: NaiveDateTime) -> Vec<DueReminder> {
        if self.day != Some(now.date()) {
            self.day = Some(now.date());
            self.fired.clear();
        }
        let fresh: Vec<DueReminder> = due_reminders(occurrences, now)
            .into_iter()
            .filter(|r| self.fired.insert((r.id.real_id(), r.minutes_before)))
            .collect();
        if !fresh.is_empty() {
            debug!(count = fresh.len(), "reminders due");
        }
        fresh
    }
}

/// Human label for a reminder offset.
pub fn format_reminder_time(minutes: u32) -> String {
    fn plural(n: u32) -> &'static str {
        if n >= 2 {
            "s"
        } else {
            ""
        }
    }

    match minutes {
        0 => "At time of event".to_string(),
        1..=59 => format!("{} min before", minutes),
        60..=1439 => format!("{} hour{} before", minutes / 60, plural(minutes / 60)),
        1440..=10079 => format!("{} day{} before", minutes / 1440, plural(minutes / 1440)),
        _ => format!("{} week{} before", minutes / 10080, plural(minutes / 10080)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Reminder, Task};
    use chrono::NaiveTime;
    use rstest::rstest;

    fn at(date: &str, time: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(&format!("{} {}", date, time), "%Y-%m-%d %H:%M").unwrap()
    }

    fn meeting(times: Vec<u32>) -> Occurrence {
        Occurrence::base(Task {
            title: "Standup".to_string(),
            start_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            start_time: NaiveTime::from_hms_opt(9, 0, 0),
            reminder: Reminder::at(times),
            ..Default::default()
        })
    }

    #[rstest]
    #[case(0, "At time of event")]
    #[case(5, "5 min before")]
    #[case(60, "1 hour before")]
    #[case(120, "2 hours before")]
    #[case(1440, "1 day before")]
    #[case(2880, "2 days before")]
    #[case(10080, "1 week before")]
    #[case(20160, "2 weeks before")]
    fn test_format_reminder_time(#[case] minutes: u32, #[case] expected: &str) {
        assert_eq!(format_reminder_time(minutes), expected);
    }

    #[test]
    fn test_due_inside_reminder_window() {
        let items = vec![meeting(vec![30, 5])];

        let due = due_reminders(&items, at("2024-01-01", "08:45"));
        assert_eq!(due.len(), 1);
        assert_eq!(due[0].minutes_before, 30);
        assert_eq!(due[0].message(), "Standup - 30 min before");

        let both = due_reminders(&items, at("2024-01-01", "08:58"));
        assert_eq!(both.len(), 2);

        assert!(due_reminders(&items, at("2024-01-01", "08:00")).is_empty());
        assert!(due_reminders(&items, at("2024-01-01", "09:00")).is_empty());
    }

    #[test]
    fn test_skips_disabled_completed_and_other_days() {
        let mut disabled = meeting(vec![30]);
        disabled.task.reminder.enabled = false;
        let mut done = meeting(vec![30]);
        done.task.completed = true;
        let items = vec![disabled, done, meeting(vec![30])];

        assert_eq!(due_reminders(&items, at("2024-01-01", "08:45")).len(), 1);
        assert!(due_reminders(&items, at("2024-01-02", "08:45")).is_empty());
    }

    #[test]
    fn test_tracker_reports_once_per_day() {
        let items = vec![meeting(vec![30])];
        let mut tracker = ReminderTracker::new();

        assert_eq!(tracker.poll(&items, at("2024-01-01", "08:40")).len(), 1);
        assert!(tracker.poll(&items, at("2024-01-01", "08:41")).is_empty());

        let mut tomorrow = meeting(vec![30]);
        tomorrow.task.start_date = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
        tomorrow.task.end_date = tomorrow.task.start_date;
        tomorrow.id = items[0].id;
        assert_eq!(tracker.poll(&[tomorrow], at("2024-01-02", "08:40")).len(), 1);
    }

    #[test]
    fn test_tracker_keys_on_stored_task() {
        let base = meeting(vec![30]);
        let mut repeat = base.clone();
        repeat.id = OccurrenceId::Virtual {
            base: base.task.id,
            index: 2,
        };
        let mut tracker = ReminderTracker::new();

        assert_eq!(tracker.poll(&[base], at("2024-01-01", "08:40")).len(), 1);
        assert!(tracker.poll(&[repeat], at("2024-01-01", "08:45")).is_empty());
    }
}
