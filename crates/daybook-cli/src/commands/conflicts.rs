use anyhow::Result;
use owo_colors::OwoColorize;

use crate::cli::ConflictsCommand;
use crate::util::window_from_args;
use crate::views::table::display_conflicts;
use crate::AppPlanner;

pub async fn show_conflicts(planner: &AppPlanner, command: ConflictsCommand) -> Result<()> {
    let window = window_from_args(&command.range, planner.clock())?;
    let conflicts = planner.conflicts_for_range(&window).await?;

    if !conflicts.is_empty() {
        println!(
            "{} {} tasks share a start time between {} and {}",
            "⚠".yellow().bold(),
            conflicts.total_conflicts(),
            window.start(),
            window.end()
        );
    }
    display_conflicts(&conflicts);
    Ok(())
}
