use clap::{Args, Parser, Subcommand};
use daybook_core::models::{RepeatType, RepeatUnit};

/// A personal planner for tasks, repeating events and calendar views
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Add a new task
    Add(AddCommand),
    /// List tasks for a day or a date range
    List(ListCommand),
    /// Edit a task
    Edit(EditCommand),
    /// Toggle a task's completion
    Done(IdCommand),
    /// Toggle focus on a task
    Focus(IdCommand),
    /// Move a task to new dates
    Move(MoveCommand),
    /// Delete a task
    Delete(DeleteCommand),
    /// Manage groups
    Group(GroupCommand),
    /// Show tags and how often they are used
    Tags,
    /// Show tasks that start at the same time
    Conflicts(ConflictsCommand),
    /// Show reminders that are due now
    Remind(RemindCommand),
}

/// Recurrence options shared by `add` and `edit`
#[derive(Args, Debug, Clone, Default)]
pub struct RepeatArgs {
    /// How the task repeats (none, daily, weekly, monthly, custom)
    #[arg(long)]
    pub repeat: Option<RepeatType>,
    /// Custom interval; implies `--repeat custom`
    #[arg(long, value_name = "N")]
    pub every: Option<u32>,
    /// Unit for the custom interval (days, weeks, months)
    #[arg(long)]
    pub unit: Option<RepeatUnit>,
    /// Last date a custom repetition may start on
    #[arg(long, value_name = "DATE")]
    pub until: Option<String>,
    /// Dates to leave out of a custom repetition
    #[arg(long, value_name = "DATE", num_args = 1..)]
    pub skip: Vec<String>,
}

impl RepeatArgs {
    pub fn touches_custom(&self) -> bool {
        self.every.is_some() || self.unit.is_some() || self.until.is_some() || !self.skip.is_empty()
    }
}

#[derive(Parser, Debug, Clone)]
pub struct AddCommand {
    /// The title of the task
    pub title: String,
    /// The description of the task
    #[arg(short, long)]
    pub description: Option<String>,
    /// Start date (e.g. '2024-03-01', 'tomorrow', 'next friday'); defaults to today
    #[arg(long)]
    pub date: Option<String>,
    /// End date for multi-day tasks
    #[arg(long)]
    pub end: Option<String>,
    /// Start time (e.g. '09:30', '2:00 PM')
    #[arg(long)]
    pub at: Option<String>,
    /// Group id or name
    #[arg(short, long)]
    pub group: Option<String>,
    /// Tags to add to the task
    #[arg(short, long, num_args = 1..)]
    pub tag: Vec<String>,
    /// Color override as #RRGGBB
    #[arg(long)]
    pub color: Option<String>,
    #[command(flatten)]
    pub repeat: RepeatArgs,
    /// Remind this many minutes before the start time; uses the configured default when empty
    #[arg(long, value_name = "MINUTES", num_args = 0.., value_delimiter = ',')]
    pub remind: Option<Vec<u32>>,
}

#[derive(Parser, Debug, Clone)]
pub struct EditCommand {
    /// The ID of the task to edit
    pub id: String,

    #[arg(long)]
    pub title: Option<String>,

    #[arg(long)]
    pub description: Option<String>,
    #[arg(long, conflicts_with = "description")]
    pub description_clear: bool,

    #[arg(long)]
    pub date: Option<String>,
    #[arg(long)]
    pub end: Option<String>,

    #[arg(long)]
    pub at: Option<String>,
    #[arg(long, conflicts_with = "at")]
    pub at_clear: bool,

    #[arg(long)]
    pub group: Option<String>,

    #[arg(long)]
    pub color: Option<String>,
    #[arg(long, conflicts_with = "color")]
    pub color_clear: bool,

    /// Add tags to the task
    #[arg(long, num_args = 1..)]
    pub add_tag: Vec<String>,

    /// Remove tags from the task
    #[arg(long, num_args = 1..)]
    pub remove_tag: Vec<String>,

    #[command(flatten)]
    pub repeat: RepeatArgs,

    /// Replace reminder offsets (minutes before start)
    #[arg(long, value_name = "MINUTES", num_args = 1.., value_delimiter = ',')]
    pub remind: Option<Vec<u32>>,
    #[arg(long, conflicts_with = "remind")]
    pub remind_clear: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct IdCommand {
    /// Task ID, unique prefix, or occurrence ID ('<id>-repeat-<n>')
    pub id: String,
}

#[derive(Parser, Debug, Clone)]
pub struct MoveCommand {
    /// The ID of the task to move
    pub id: String,
    /// New start date
    pub start: String,
    /// New end date; keeps the current duration when omitted
    pub end: Option<String>,
}

#[derive(Parser, Debug, Clone)]
pub struct DeleteCommand {
    /// The ID of the task to delete
    pub id: String,
    /// Force deletion without confirmation
    #[arg(short, long)]
    pub force: bool,
}

/// Date range selection shared by `list` and `conflicts`
#[derive(Args, Debug, Clone, Default)]
pub struct RangeArgs {
    /// Day to show, or the reference day for --week/--month; defaults to today
    #[arg(long, conflicts_with_all = ["from", "to"])]
    pub date: Option<String>,
    /// First day of an explicit range
    #[arg(long, requires = "to")]
    pub from: Option<String>,
    /// Last day of an explicit range
    #[arg(long, requires = "from")]
    pub to: Option<String>,
    /// Show the Sunday-to-Saturday week containing the day
    #[arg(long, conflicts_with_all = ["month", "from", "to"])]
    pub week: bool,
    /// Show the month grid containing the day
    #[arg(long, conflicts_with_all = ["from", "to"])]
    pub month: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct ListCommand {
    #[command(flatten)]
    pub range: RangeArgs,
    /// Only tasks in this group (id or name)
    #[arg(short, long)]
    pub group: Option<String>,
    /// Only tasks carrying this tag
    #[arg(short, long)]
    pub tag: Option<String>,
}

#[derive(Parser, Debug, Clone)]
pub struct ConflictsCommand {
    #[command(flatten)]
    pub range: RangeArgs,
}

#[derive(Parser, Debug, Clone)]
pub struct RemindCommand {
    /// Keep running and print reminders as they come due
    #[arg(long)]
    pub watch: bool,
    /// Polling interval in seconds for --watch
    #[arg(long, default_value = "30", requires = "watch")]
    pub interval: u64,
}

#[derive(Parser, Debug, Clone)]
pub struct GroupCommand {
    #[command(subcommand)]
    pub command: GroupSubcommand,
}

#[derive(Subcommand, Debug, Clone)]
pub enum GroupSubcommand {
    /// Add a new group
    Add(AddGroupCommand),
    /// List groups
    List,
    /// Rename a group
    Rename(RenameGroupCommand),
    /// Delete a group, moving its tasks to the first remaining group
    Delete(DeleteGroupCommand),
}

#[derive(Parser, Debug, Clone)]
pub struct AddGroupCommand {
    /// The name of the group
    pub name: String,
    /// Group color as #RRGGBB
    #[arg(long, default_value = "#6B7280")]
    pub color: String,
}

#[derive(Parser, Debug, Clone)]
pub struct RenameGroupCommand {
    /// Group id or current name
    pub group: String,
    /// The new name
    pub name: String,
}

#[derive(Parser, Debug, Clone)]
pub struct DeleteGroupCommand {
    /// Group id or name
    pub group: String,
    /// Force deletion without confirmation
    #[arg(short, long)]
    pub force: bool,
}
