//! # Daybook Core Library
//!
//! A personal task and calendar engine: stored tasks with optional repetition,
//! expanded on demand into the occurrences visible in any date range.
//!
//! ## Features
//!
//! - **On-Demand Recurrence**: Repeating tasks are stored once and expanded
//!   into virtual occurrences per query, so nothing is materialized
//! - **Range Queries**: Day, week and month-grid views over stored and
//!   expanded entries
//! - **Conflict Detection**: Overlapping open tasks sharing a start time
//! - **Reminders**: Due-reminder computation with once-per-day tracking
//! - **Pluggable Storage**: In-memory and SQLite stores behind one trait
//!
//! ## Core Modules
//!
//! - [`models`]: Tasks, groups and transfer objects
//! - [`recurrence`]: Recurrence validation and expansion
//! - [`query`]: Range queries and display helpers
//! - [`conflict`]: Start-time conflict detection
//! - [`planner`]: Validated mutations over a store
//! - [`store`]: Storage traits with memory and SQLite implementations
//! - [`reminder`]: Due reminders
//! - [`error`]: Error types
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use chrono::NaiveDate;
//! use daybook_core::{
//!     clock::SystemClock,
//!     db,
//!     models::{NewTaskData, RepeatType},
//!     planner::Planner,
//!     recurrence::RecurrenceExpander,
//!     store::SqliteStore,
//!     window::DateWindow,
//! };
//!
//! #[tokio::main]
//! async fn main() -> Result<(), daybook_core::error::CoreError> {
//!     let pool = db::establish_connection("daybook.db").await?;
//!     let planner = Planner::new(
//!         SqliteStore::new(pool),
//!         SystemClock::from_timezone_name("Europe/Berlin")?,
//!         RecurrenceExpander::with_defaults(),
//!     );
//!     planner.ensure_default_groups().await?;
//!
//!     let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
//!     planner
//!         .add_task(NewTaskData {
//!             title: "Daily standup".to_string(),
//!             start_date: start,
//!             repeat_type: RepeatType::Daily,
//!             group_id: "work".to_string(),
//!             ..Default::default()
//!         })
//!         .await?;
//!
//!     for occurrence in planner.tasks_for_range(&DateWindow::week_of(start)).await? {
//!         println!("{} {}", occurrence.start_date(), occurrence.task.title);
//!     }
//!     Ok(())
//! }
//! ```

pub mod clock;
pub mod conflict;
pub mod db;
pub mod error;
pub mod models;
pub mod occurrence;
pub mod planner;
pub mod query;
pub mod recurrence;
pub mod reminder;
pub mod store;
pub mod timezone;
pub mod window;
