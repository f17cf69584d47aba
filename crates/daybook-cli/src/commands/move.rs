use anyhow::{anyhow, Result};
use chrono::{Days, NaiveDate};
use daybook_core::clock::Clock;

use crate::cli::MoveCommand;
use crate::parser::parse_date;
use crate::util::resolve_task_id;
use crate::AppPlanner;

pub async fn move_task(planner: &AppPlanner, command: MoveCommand) -> Result<()> {
    let id = resolve_task_id(planner, &command.id).await?;
    let today = planner.clock().today();
    let start = parse_date(&command.start, today)?;
    let end = match &command.end {
        Some(end) => parse_date(end, today)?,
        None => {
            let current = planner.get_task(id).await?;
            end_after(start, current.duration_days())?
        }
    };

    let task = planner.move_task(id, start, end).await?;
    if task.start_date == task.end_date {
        println!("Moved '{}' to {}", task.title, task.start_date);
    } else {
        println!(
            "Moved '{}' to {} → {}",
            task.title, task.start_date, task.end_date
        );
    }

    Ok(())
}

/// End date of a span starting at `start` that lasts `days` more days.
fn end_after(start: NaiveDate, days: u64) -> Result<NaiveDate> {
    start
        .checked_add_days(Days::new(days))
        .ok_or_else(|| anyhow!("Moving to {} would end past the last supported date", start))
}
