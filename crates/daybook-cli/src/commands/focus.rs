use anyhow::Result;
use owo_colors::OwoColorize;

use crate::cli::IdCommand;
use crate::util::resolve_task_id;
use crate::AppPlanner;

pub async fn toggle_focus(planner: &AppPlanner, command: IdCommand) -> Result<()> {
    let id = resolve_task_id(planner, &command.id).await?;
    let task = planner.set_focus(id).await?;

    if task.is_focus {
        println!("{} Focusing on: '{}'", "★".yellow().bold(), task.title);
    } else {
        println!("Cleared focus from '{}'", task.title);
    }

    Ok(())
}
