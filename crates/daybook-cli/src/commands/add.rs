use anyhow::{anyhow, Result};
use chrono::NaiveDate;
use daybook_core::clock::Clock;
use daybook_core::models::{CustomRepeat, NewTaskData, Reminder, RepeatType, RepeatUnit};
use owo_colors::{OwoColorize, Style};

use crate::cli::{AddCommand, RepeatArgs};
use crate::config::Config;
use crate::parser::{parse_color, parse_date, parse_time};
use crate::util::{resolve_group, short_uuid};
use crate::AppPlanner;

pub async fn add_task(planner: &AppPlanner, command: AddCommand, config: &Config) -> Result<()> {
    let today = planner.clock().today();
    let start_date = match &command.date {
        Some(date) => parse_date(date, today)?,
        None => today,
    };
    let end_date = command.end.as_deref().map(|d| parse_date(d, today)).transpose()?;
    let start_time = command.at.as_deref().map(parse_time).transpose()?;
    let color = command.color.as_deref().map(parse_color).transpose()?;
    let group_id = match &command.group {
        Some(group) => resolve_group(planner, group).await?.id,
        None => String::new(),
    };
    let (repeat_type, custom_repeat) = build_repeat(&command.repeat, None, today)?;

    let reminder = match command.remind {
        Some(times) if times.is_empty() => Reminder::at(vec![config.default_reminder_minutes]),
        Some(times) => Reminder::at(times),
        None => Reminder::default(),
    };
    let added_task = planner
        .add_task(NewTaskData {
            title: command.title,
            description: command.description,
            start_date,
            end_date,
            start_time,
            group_id,
            color,
            tags: command.tag,
            repeat_type,
            custom_repeat,
            reminder,
        })
        .await?;

    let success_style = Style::new().green().bold();
    let info_style = Style::new().blue();

    println!(
        "{} Added task: {}",
        "✓".style(success_style),
        added_task.title.bright_white().bold()
    );
    println!(
        "  {} Task ID: {}",
        "→".style(info_style),
        short_uuid(&added_task.id).yellow()
    );
    if added_task.is_repeating() {
        println!(
            "  {} Repeats {} from {}",
            "→".style(info_style),
            added_task.repeat_type.label().to_lowercase(),
            added_task.start_date
        );
    }

    Ok(())
}

/// Combines recurrence flags with the task's current settings.
///
/// Any custom-only flag (`--every`, `--unit`, `--until`, `--skip`) switches the
/// task to a custom repetition, starting from `current` when there is one.
/// Other repeat types carry no custom settings.
pub fn build_repeat(
    args: &RepeatArgs,
    current: Option<(RepeatType, Option<CustomRepeat>)>,
    today: NaiveDate,
) -> Result<(RepeatType, Option<CustomRepeat>)> {
    let (current_type, current_custom) = current.unwrap_or_default();

    let repeat_type = match args.repeat {
        Some(repeat) => repeat,
        None if args.touches_custom() => RepeatType::Custom,
        None => current_type,
    };
    if args.touches_custom() && repeat_type != RepeatType::Custom {
        return Err(anyhow!(
            "--every, --unit, --until and --skip only apply to --repeat custom"
        ));
    }

    let custom_repeat = if repeat_type == RepeatType::Custom {
        let mut custom = current_custom.unwrap_or_else(|| CustomRepeat::every(1, RepeatUnit::Days));
        if let Some(interval) = args.every {
            custom.interval = interval;
        }
        if let Some(unit) = args.unit {
            custom.unit = unit;
        }
        if let Some(until) = &args.until {
            custom.end_date = Some(parse_date(until, today)?);
        }
        for skip in &args.skip {
            custom.skip_dates.insert(parse_date(skip, today)?);
        }
        Some(custom)
    } else {
        None
    };

    tracing::debug!(%repeat_type, custom = custom_repeat.is_some(), "recurrence options");
    Ok((repeat_type, custom_repeat))
}
