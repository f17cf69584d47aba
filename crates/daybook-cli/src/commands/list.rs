use anyhow::Result;
use daybook_core::clock::Clock;
use daybook_core::conflict::detect_conflicts;
use daybook_core::query::{apply_filters, sort_for_display, Filter, Progress};
use owo_colors::OwoColorize;

use crate::cli::ListCommand;
use crate::util::{resolve_group, window_from_args};
use crate::views::table::display_occurrences;
use crate::AppPlanner;

pub async fn list_tasks(planner: &AppPlanner, command: ListCommand) -> Result<()> {
    let window = window_from_args(&command.range, planner.clock())?;

    let mut filters = Vec::new();
    if let Some(group) = &command.group {
        filters.push(Filter::Group(resolve_group(planner, group).await?.id));
    }
    if let Some(tag) = &command.tag {
        filters.push(Filter::Tag(tag.trim().to_lowercase()));
    }

    let all = planner.tasks_for_range(&window).await?;
    let conflicts = detect_conflicts(&all);
    let mut occurrences = apply_filters(all, &filters);

    let single_day = window.start() == window.end();
    if single_day {
        sort_for_display(&mut occurrences);
    } else {
        occurrences.sort_by(|a, b| {
            a.start_date()
                .cmp(&b.start_date())
                .then_with(|| a.task.start_time.cmp(&b.task.start_time))
                .then_with(|| a.task.title.cmp(&b.task.title))
        });
    }

    if single_day {
        println!("{}", window.start().format("%A, %B %-d, %Y").bold());
    } else {
        println!(
            "{}",
            format!("{} → {}", window.start(), window.end()).bold()
        );
    }

    if single_day && window.start() == planner.clock().today() {
        if let Some(focus) = planner.focus_task().await? {
            println!("{} {}", "Focus:".yellow().bold(), focus.task.title);
        }
    }

    display_occurrences(&occurrences, &planner.groups().await?, &conflicts);

    let progress = Progress::of(&occurrences);
    if progress.total > 0 {
        let summary = format!(
            "{}/{} done ({}%)",
            progress.completed,
            progress.total,
            progress.percentage()
        );
        if progress.is_all_done() {
            println!("{}", summary.green());
        } else {
            println!("{}", summary.bright_black());
        }
    }

    Ok(())
}
