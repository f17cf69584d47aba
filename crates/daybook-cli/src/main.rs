use clap::Parser;
use daybook_core::clock::SystemClock;
use daybook_core::db;
use daybook_core::error::CoreError;
use daybook_core::planner::Planner;
use daybook_core::recurrence::RecurrenceExpander;
use daybook_core::store::SqliteStore;
use owo_colors::{OwoColorize, Style};
use tracing::debug;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;
mod config;
mod parser;
mod util;
mod views;

pub type AppPlanner = Planner<SqliteStore, SystemClock>;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env("DAYBOOK_LOG").unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = cli::Cli::parse();

    let result = match setup().await {
        Ok((planner, config)) => run(&planner, cli.command, &config).await,
        Err(e) => Err(e),
    };

    if let Err(e) = result {
        handle_error(e);
        std::process::exit(1);
    }
}

async fn setup() -> anyhow::Result<(AppPlanner, config::Config)> {
    let config = config::Config::new()?;
    debug!(?config, "loaded configuration");

    let clock = SystemClock::new(config.tz()?);
    let pool = db::establish_connection(&config.database_path).await?;
    let planner = Planner::new(
        SqliteStore::new(pool),
        clock,
        RecurrenceExpander::new(config.expansion),
    );
    planner.ensure_default_groups().await?;
    Ok((planner, config))
}

async fn run(
    planner: &AppPlanner,
    command: cli::Commands,
    config: &config::Config,
) -> anyhow::Result<()> {
    match command {
        cli::Commands::Add(command) => commands::add::add_task(planner, command, config).await,
        cli::Commands::List(command) => commands::list::list_tasks(planner, command).await,
        cli::Commands::Edit(command) => commands::edit::edit_task(planner, command).await,
        cli::Commands::Done(command) => commands::done::toggle_done(planner, command).await,
        cli::Commands::Focus(command) => commands::focus::toggle_focus(planner, command).await,
        cli::Commands::Move(command) => commands::r#move::move_task(planner, command).await,
        cli::Commands::Delete(command) => commands::delete::delete_task(planner, command).await,
        cli::Commands::Group(command) => commands::group::group_command(planner, command).await,
        cli::Commands::Tags => commands::tags::list_tags(planner).await,
        cli::Commands::Conflicts(command) => {
            commands::conflicts::show_conflicts(planner, command).await
        }
        cli::Commands::Remind(command) => commands::remind::remind(planner, command).await,
    }
}

fn handle_error(err: anyhow::Error) {
    let error_style = Style::new().red().bold();

    if let Some(core_error) = err.downcast_ref::<CoreError>() {
        match core_error {
            CoreError::NotFound(s) => {
                eprintln!("{} {}", "Error:".style(error_style), s);
            }
            CoreError::AmbiguousId { prefix, count } => {
                eprintln!("{}", "Error: Ambiguous ID.".style(error_style));
                eprintln!(
                    "'{}' matches {} tasks, type more characters of the ID.",
                    prefix.yellow(),
                    count
                );
            }
            CoreError::InvalidInput(s) => {
                eprintln!("{} Invalid input: {}", "Error:".style(error_style), s);
            }
            CoreError::InvalidRecurrence(s) => {
                eprintln!("{} Invalid repeat settings: {}", "Error:".style(error_style), s);
            }
            CoreError::LastGroup => {
                eprintln!(
                    "{} At least one group must remain.",
                    "Error:".style(error_style)
                );
            }
            CoreError::Database(e) => {
                eprintln!("{} Database error: {}", "Error:".style(error_style), e);
            }
            _ => eprintln!("{} {}", "Error:".style(error_style), err),
        }
    } else {
        eprintln!("{} {:#}", "Error:".style(error_style), err);
    }
}
