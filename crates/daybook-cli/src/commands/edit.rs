use anyhow::Result;
use daybook_core::clock::Clock;
use daybook_core::models::{Reminder, UpdateTaskData};
use owo_colors::OwoColorize;

use crate::cli::EditCommand;
use crate::commands::add::build_repeat;
use crate::parser::{parse_color, parse_date, parse_time};
use crate::util::{resolve_group, resolve_task_id};
use crate::views::table::display_task_details;
use crate::AppPlanner;

pub async fn edit_task(planner: &AppPlanner, command: EditCommand) -> Result<()> {
    let id = resolve_task_id(planner, &command.id).await?;
    let current = planner.get_task(id).await?;
    let today = planner.clock().today();

    let mut update_data = UpdateTaskData {
        title: command.title,
        start_date: command.date.as_deref().map(|d| parse_date(d, today)).transpose()?,
        end_date: command.end.as_deref().map(|d| parse_date(d, today)).transpose()?,
        ..Default::default()
    };

    if command.description_clear {
        update_data.description = Some(None);
    } else if let Some(description) = command.description {
        update_data.description = Some(Some(description));
    }

    if command.at_clear {
        update_data.start_time = Some(None);
    } else if let Some(at) = &command.at {
        update_data.start_time = Some(Some(parse_time(at)?));
    }

    if command.color_clear {
        update_data.color = Some(None);
    } else if let Some(color) = &command.color {
        update_data.color = Some(Some(parse_color(color)?));
    }

    if let Some(group) = &command.group {
        update_data.group_id = Some(resolve_group(planner, group).await?.id);
    }

    if !command.add_tag.is_empty() {
        update_data.add_tags = Some(command.add_tag);
    }
    if !command.remove_tag.is_empty() {
        update_data.remove_tags = Some(command.remove_tag);
    }

    if command.repeat.repeat.is_some() || command.repeat.touches_custom() {
        let (repeat_type, custom_repeat) = build_repeat(
            &command.repeat,
            Some((current.repeat_type, current.custom_repeat.clone())),
            today,
        )?;
        update_data.repeat_type = Some(repeat_type);
        update_data.custom_repeat = Some(custom_repeat);
    }

    if command.remind_clear {
        update_data.reminder = Some(Reminder::default());
    } else if let Some(times) = command.remind {
        update_data.reminder = Some(Reminder::at(times));
    }

    let updated_task = planner.edit_task(id, update_data).await?;
    if id.is_virtual() {
        println!(
            "{}",
            "Edited the whole series this occurrence belongs to.".bright_black()
        );
    }
    println!("Updated task: '{}'", updated_task.title);
    display_task_details(&updated_task, &planner.groups().await?);

    Ok(())
}
