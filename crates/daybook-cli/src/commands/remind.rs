use anyhow::Result;
use chrono_humanize::HumanTime;
use daybook_core::clock::Clock;
use daybook_core::reminder::{DueReminder, ReminderTracker};
use daybook_core::timezone::get_timezone_offset;
use owo_colors::OwoColorize;
use std::time::Duration;
use tracing::debug;

use crate::cli::RemindCommand;
use crate::util::short_id;
use crate::AppPlanner;

pub async fn remind(planner: &AppPlanner, command: RemindCommand) -> Result<()> {
    let mut tracker = ReminderTracker::new();

    if !command.watch {
        let due = poll(planner, &mut tracker).await?;
        if due.is_empty() {
            println!("No reminders due.");
        }
        return Ok(());
    }

    let tz = planner.clock().timezone();
    println!(
        "Watching for reminders every {}s in {} ({}), press Ctrl-C to stop.",
        command.interval,
        tz,
        get_timezone_offset(&tz, planner.clock().now())
    );
    let mut ticker = tokio::time::interval(Duration::from_secs(command.interval.max(1)));
    loop {
        tokio::select! {
            _ = ticker.tick() => {
                poll(planner, &mut tracker).await?;
            }
            _ = tokio::signal::ctrl_c() => {
                debug!("reminder watch interrupted");
                return Ok(());
            }
        }
    }
}

async fn poll(planner: &AppPlanner, tracker: &mut ReminderTracker) -> Result<Vec<DueReminder>> {
    let today = planner.todays_tasks().await?;
    let now = planner.clock().local_now();
    let due = tracker.poll(&today, now);
    for reminder in &due {
        println!(
            "{} {} ({}, starts {})",
            "⏰".yellow(),
            reminder.message().bold(),
            short_id(&reminder.id),
            HumanTime::from(reminder.starts_at - now)
        );
    }
    Ok(due)
}
