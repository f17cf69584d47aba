use anyhow::Result;
use owo_colors::OwoColorize;

use crate::cli::IdCommand;
use crate::util::resolve_task_id;
use crate::AppPlanner;

pub async fn toggle_done(planner: &AppPlanner, command: IdCommand) -> Result<()> {
    let id = resolve_task_id(planner, &command.id).await?;
    let task = planner.toggle_complete(id).await?;

    if task.completed {
        println!("{} Completed task: '{}'", "✓".green().bold(), task.title);
    } else {
        println!("Reopened task: '{}'", task.title);
    }
    if id.is_virtual() {
        println!(
            "{}",
            "Completion applies to every occurrence of this repeating task.".bright_black()
        );
    }

    Ok(())
}
