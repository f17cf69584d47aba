use anyhow::{anyhow, Result};
use daybook_core::clock::Clock;
use daybook_core::error::CoreError;
use daybook_core::models::Group;
use daybook_core::occurrence::OccurrenceId;
use daybook_core::window::DateWindow;
use uuid::Uuid;

use crate::cli::RangeArgs;
use crate::parser::parse_date;
use crate::AppPlanner;

/// Characters of a task id shown in tables; also enough to resolve it back.
const SHORT_ID_LEN: usize = 8;

pub async fn resolve_task_id(planner: &AppPlanner, short_id: &str) -> Result<OccurrenceId> {
    Ok(planner.resolve_id(short_id).await?)
}

/// Finds a group by id, or by name ignoring case.
pub async fn resolve_group(planner: &AppPlanner, input: &str) -> Result<Group> {
    let groups = planner.groups().await?;
    groups
        .iter()
        .find(|g| g.id == input)
        .or_else(|| groups.iter().find(|g| g.name.eq_ignore_ascii_case(input.trim())))
        .cloned()
        .ok_or_else(|| anyhow!(CoreError::NotFound(format!("No group named '{}'", input))))
}

pub fn short_uuid(id: &Uuid) -> String {
    id.to_string()[..SHORT_ID_LEN].to_string()
}

pub fn short_id(id: &OccurrenceId) -> String {
    match id {
        OccurrenceId::Base(id) => short_uuid(id),
        OccurrenceId::Virtual { base, index } => format!("{}-repeat-{}", short_uuid(base), index),
    }
}

/// The window selected by the range flags; a single day when none are given.
pub fn window_from_args(args: &RangeArgs, clock: &impl Clock) -> Result<DateWindow> {
    let today = clock.today();
    if let (Some(from), Some(to)) = (&args.from, &args.to) {
        return Ok(DateWindow::new(parse_date(from, today)?, parse_date(to, today)?)?);
    }
    let day = match &args.date {
        Some(date) => parse_date(date, today)?,
        None => today,
    };
    Ok(if args.week {
        DateWindow::week_of(day)
    } else if args.month {
        DateWindow::month_grid_of(day)
    } else {
        DateWindow::single_day(day)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use daybook_core::clock::FixedClock;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_short_ids() {
        let id = Uuid::now_v7();
        assert_eq!(short_id(&OccurrenceId::Base(id)).len(), SHORT_ID_LEN);
        assert_eq!(
            short_id(&OccurrenceId::Virtual { base: id, index: 4 }),
            format!("{}-repeat-4", &id.to_string()[..SHORT_ID_LEN])
        );
    }

    #[test]
    fn test_window_selection() {
        let clock = FixedClock::on_date(date("2024-01-10"));

        let today = window_from_args(&RangeArgs::default(), &clock).unwrap();
        assert_eq!((today.start(), today.end()), (date("2024-01-10"), date("2024-01-10")));

        let week = window_from_args(
            &RangeArgs {
                week: true,
                ..Default::default()
            },
            &clock,
        )
        .unwrap();
        assert_eq!((week.start(), week.end()), (date("2024-01-07"), date("2024-01-13")));

        let explicit = RangeArgs {
            from: Some("2024-02-01".to_string()),
            to: Some("2024-01-01".to_string()),
            ..Default::default()
        };
        assert!(window_from_args(&explicit, &clock).is_err());
    }
}
