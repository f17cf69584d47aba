use comfy_table::{Attribute, Cell, Color, Row, Table};
use daybook_core::conflict::ConflictMap;
use daybook_core::models::{Group, RepeatType, RepeatUnit, Task};
use daybook_core::occurrence::Occurrence;
use daybook_core::reminder::format_reminder_time;

use crate::util::{short_id, short_uuid};

/// Maps `#RRGGBB` to a terminal color; anything else renders uncolored.
pub fn hex_color(hex: &str) -> Option<Color> {
    let hex = hex.strip_prefix('#')?;
    if hex.len() != 6 {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    Some(Color::Rgb {
        r: channel(0)?,
        g: channel(2)?,
        b: channel(4)?,
    })
}

pub fn repeat_label(task: &Task) -> String {
    match (task.repeat_type, task.custom_cadence()) {
        (RepeatType::None, _) => String::new(),
        (RepeatType::Custom, Some(custom)) => {
            let unit = match custom.unit {
                RepeatUnit::Days => "day",
                RepeatUnit::Weeks => "week",
                RepeatUnit::Months => "month",
            };
            if custom.interval == 1 {
                format!("↻ Every {}", unit)
            } else {
                format!("↻ Every {} {}s", custom.interval, unit)
            }
        }
        (repeat, _) => format!("↻ {}", repeat.label()),
    }
}

fn span_label(task: &Task) -> String {
    if task.start_date == task.end_date {
        task.start_date.format("%a %Y-%m-%d").to_string()
    } else {
        format!(
            "{} → {}",
            task.start_date.format("%a %Y-%m-%d"),
            task.end_date.format("%a %Y-%m-%d")
        )
    }
}

fn group_name<'a>(groups: &'a [Group], task: &'a Task) -> &'a str {
    groups
        .iter()
        .find(|g| g.id == task.group_id)
        .map(|g| g.name.as_str())
        .unwrap_or(task.group_id.as_str())
}

pub fn display_occurrences(occurrences: &[Occurrence], groups: &[Group], conflicts: &ConflictMap) {
    if occurrences.is_empty() {
        println!("No tasks found.");
        return;
    }

    let mut table = Table::new();
    table.set_header(vec!["ID", "Title", "Date", "Time", "Group", "Tags", "Repeat"]);

    for occurrence in occurrences {
        let task = &occurrence.task;
        let mut row = Row::new();
        row.add_cell(Cell::new(short_id(&occurrence.id)));

        let mut display_title = String::new();
        if task.is_focus {
            display_title.push_str("★ ");
        }
        display_title.push_str(&task.title);
        if conflicts.has_conflict(occurrence.id) {
            display_title.push_str(" ⚠");
        }

        let mut title_cell = Cell::new(display_title);
        if task.completed {
            title_cell = title_cell
                .add_attribute(Attribute::CrossedOut)
                .fg(Color::DarkGrey);
        } else if task.is_focus {
            title_cell = title_cell.add_attribute(Attribute::Bold);
        }
        row.add_cell(title_cell);

        row.add_cell(Cell::new(span_label(task)));
        row.add_cell(Cell::new(
            task.start_time
                .map(|t| t.format("%H:%M").to_string())
                .unwrap_or_default(),
        ));

        let mut group_cell = Cell::new(group_name(groups, task));
        if let Some(color) = hex_color(task.effective_color(groups)) {
            group_cell = group_cell.fg(color);
        }
        row.add_cell(group_cell);

        row.add_cell(Cell::new(
            task.tags.iter().map(String::as_str).collect::<Vec<_>>().join(", "),
        ));
        row.add_cell(Cell::new(repeat_label(task)));
        table.add_row(row);
    }

    println!("{table}");
}

pub fn display_task_details(task: &Task, groups: &[Group]) {
    let mut table = Table::new();
    table.add_row(vec![Cell::new("ID"), Cell::new(task.id.to_string())]);
    table.add_row(vec![Cell::new("Title"), Cell::new(&task.title)]);
    if let Some(description) = &task.description {
        table.add_row(vec![Cell::new("Description"), Cell::new(description)]);
    }
    table.add_row(vec![Cell::new("Date"), Cell::new(span_label(task))]);
    if let Some(time) = task.start_time {
        table.add_row(vec![Cell::new("Time"), Cell::new(time.format("%H:%M").to_string())]);
    }
    table.add_row(vec![Cell::new("Group"), Cell::new(group_name(groups, task))]);
    if task.is_repeating() {
        table.add_row(vec![Cell::new("Repeat"), Cell::new(repeat_label(task))]);
    }
    if task.reminder.enabled {
        let reminders: Vec<String> = task
            .reminder
            .times
            .iter()
            .map(|m| format_reminder_time(*m))
            .collect();
        table.add_row(vec![Cell::new("Reminders"), Cell::new(reminders.join(", "))]);
    }
    println!("{table}");
}

pub fn display_groups(groups: &[Group], task_counts: &[usize]) {
    if groups.is_empty() {
        println!("No groups found.");
        return;
    }

    let mut table = Table::new();
    table.set_header(vec!["ID", "Name", "Color", "Tasks"]);

    for (group, count) in groups.iter().zip(task_counts) {
        let mut row = Row::new();
        row.add_cell(Cell::new(&group.id));
        row.add_cell(Cell::new(&group.name));
        let mut color_cell = Cell::new(&group.color);
        if let Some(color) = hex_color(&group.color) {
            color_cell = color_cell.fg(color);
        }
        row.add_cell(color_cell);
        row.add_cell(Cell::new(count));
        table.add_row(row);
    }

    println!("{table}");
}

pub fn display_tags(tags: &[(String, usize)]) {
    if tags.is_empty() {
        println!("No tags found.");
        return;
    }

    let mut table = Table::new();
    table.set_header(vec!["Tag", "Tasks"]);
    for (tag, count) in tags {
        table.add_row(vec![Cell::new(format!("#{}", tag)), Cell::new(count)]);
    }
    println!("{table}");
}

pub fn display_conflicts(conflicts: &ConflictMap) {
    if conflicts.is_empty() {
        println!("No conflicts found.");
        return;
    }

    let mut table = Table::new();
    table.set_header(vec!["ID", "Title", "Date", "Time", "Conflicts With"]);

    for occurrence in conflicts.occurrences() {
        if !conflicts.has_conflict(occurrence.id) || occurrence.task.completed {
            continue;
        }
        let Some(time) = occurrence.task.start_time else {
            continue;
        };
        let others: Vec<String> = conflicts
            .conflicting_tasks(occurrence.id)
            .into_iter()
            .filter(|other| {
                other.task.start_time == Some(time)
                    && other.start_date() <= occurrence.end_date()
                    && occurrence.start_date() <= other.end_date()
            })
            .map(|other| format!("{} ({})", other.task.title, short_uuid(&other.real_id())))
            .collect();
        if others.is_empty() {
            continue;
        }

        table.add_row(vec![
            Cell::new(short_id(&occurrence.id)),
            Cell::new(&occurrence.task.title).fg(Color::Yellow),
            Cell::new(span_label(&occurrence.task)),
            Cell::new(time.format("%H:%M").to_string()),
            Cell::new(others.join(", ")),
        ]);
    }

    println!("{table}");
}
