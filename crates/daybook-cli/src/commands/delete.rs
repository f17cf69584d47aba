use anyhow::Result;
use dialoguer::Confirm;

use crate::cli::DeleteCommand;
use crate::util::resolve_task_id;
use crate::AppPlanner;

pub async fn delete_task(planner: &AppPlanner, command: DeleteCommand) -> Result<()> {
    let id = resolve_task_id(planner, &command.id).await?;
    let task = planner.get_task(id).await?;

    if !command.force {
        let prompt = if task.is_repeating() {
            format!(
                "Delete repeating task '{}' and all of its occurrences?",
                task.title
            )
        } else {
            format!("Are you sure you want to delete task '{}'?", task.title)
        };
        let confirmation = Confirm::new()
            .with_prompt(prompt)
            .default(false)
            .interact()
            .unwrap_or(false);

        if !confirmation {
            println!("Deletion cancelled.");
            return Ok(());
        }
    }

    let deleted = planner.delete_task(id).await?;
    println!("Deleted task: '{}'", deleted.title);
    Ok(())
}
