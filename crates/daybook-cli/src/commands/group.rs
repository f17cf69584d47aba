use anyhow::Result;
use daybook_core::models::UpdateGroupData;
use dialoguer::Confirm;
use owo_colors::OwoColorize;

use crate::cli::{GroupCommand, GroupSubcommand};
use crate::parser::parse_color;
use crate::util::resolve_group;
use crate::views::table::display_groups;
use crate::AppPlanner;

pub async fn group_command(planner: &AppPlanner, command: GroupCommand) -> Result<()> {
    match command.command {
        GroupSubcommand::Add(add) => {
            let color = parse_color(&add.color)?;
            let group = planner.add_group(&add.name, &color).await?;
            println!("{} Added group: {}", "✓".green().bold(), group.name.bold());
        }
        GroupSubcommand::List => {
            let groups = planner.groups().await?;
            let tasks = planner.tasks().await?;
            let counts: Vec<usize> = groups
                .iter()
                .map(|g| tasks.iter().filter(|t| t.group_id == g.id).count())
                .collect();
            display_groups(&groups, &counts);
        }
        GroupSubcommand::Rename(rename) => {
            let group = resolve_group(planner, &rename.group).await?;
            let old_name = group.name.clone();
            let renamed = planner
                .update_group(
                    &group.id,
                    UpdateGroupData {
                        name: Some(rename.name),
                        ..Default::default()
                    },
                )
                .await?;
            println!("Renamed group '{}' to '{}'", old_name, renamed.name);
        }
        GroupSubcommand::Delete(delete) => {
            let group = resolve_group(planner, &delete.group).await?;
            if !delete.force {
                let confirmation = Confirm::new()
                    .with_prompt(format!(
                        "Delete group '{}'? Its tasks move to another group.",
                        group.name
                    ))
                    .default(false)
                    .interact()
                    .unwrap_or(false);
                if !confirmation {
                    println!("Deletion cancelled.");
                    return Ok(());
                }
            }
            let fallback = planner.delete_group(&group.id).await?;
            println!(
                "Deleted group '{}'; its tasks now belong to '{}'",
                group.name, fallback.name
            );
        }
    }
    Ok(())
}
