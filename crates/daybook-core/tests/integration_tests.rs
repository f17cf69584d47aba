use chrono::{NaiveDate, NaiveTime};
use daybook_core::clock::FixedClock;
use daybook_core::db::establish_connection;
use daybook_core::error::CoreError;
use daybook_core::models::*;
use daybook_core::occurrence::OccurrenceId;
use daybook_core::planner::Planner;
use daybook_core::query::{apply_filters, sort_for_display, Filter, Progress};
use daybook_core::recurrence::RecurrenceExpander;
use daybook_core::reminder::ReminderTracker;
use daybook_core::store::{MemoryStore, SqliteStore, Store};
use daybook_core::window::DateWindow;
use tempfile::TempDir;
use tokio_test::{assert_err, assert_ok};

fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

/// Helper function to create a planner over a fresh SQLite file
async fn setup_sqlite_planner(today: &str) -> (Planner<SqliteStore, FixedClock>, TempDir) {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp directory");
    let db_path = temp_dir.path().join("test.db");

    let pool = establish_connection(&db_path.to_string_lossy())
        .await
        .expect("Failed to establish test database connection");

    let planner = Planner::new(
        SqliteStore::new(pool),
        FixedClock::on_date(date(today)),
        RecurrenceExpander::with_defaults(),
    );
    planner.ensure_default_groups().await.expect("Failed to seed groups");
    (planner, temp_dir)
}

async fn setup_memory_planner(today: &str) -> Planner<MemoryStore, FixedClock> {
    let planner = Planner::new(
        MemoryStore::new(),
        FixedClock::on_date(date(today)),
        RecurrenceExpander::with_defaults(),
    );
    planner.ensure_default_groups().await.expect("Failed to seed groups");
    planner
}

/// Helper function to create a test task
async fn create_test_task<S: Store>(
    planner: &Planner<S, FixedClock>,
    title: &str,
    start: &str,
    repeat_type: RepeatType,
) -> Task {
    planner
        .add_task(NewTaskData {
            title: title.to_string(),
            start_date: date(start),
            group_id: "work".to_string(),
            repeat_type,
            ..Default::default()
        })
        .await
        .expect("Failed to create test task")
}

#[tokio::test]
async fn test_basic_task_workflow() {
    let (planner, _temp_dir) = setup_sqlite_planner("2024-01-01").await;

    let task = create_test_task(&planner, "Write report", "2024-01-01", RepeatType::None).await;
    assert_eq!(task.group_id, "work");
    assert!(!task.completed);

    let edited = assert_ok!(
        planner
            .edit_task(
                task.id.into(),
                UpdateTaskData {
                    description: Some(Some("Quarterly numbers".to_string())),
                    start_time: Some(NaiveTime::from_hms_opt(14, 0, 0)),
                    add_tags: Some(vec!["Finance".to_string()]),
                    ..Default::default()
                },
            )
            .await
    );
    assert_eq!(edited.description.as_deref(), Some("Quarterly numbers"));
    assert!(edited.tags.contains("finance"));

    let completed = assert_ok!(planner.toggle_complete(task.id.into()).await);
    assert!(completed.completed);

    let today = assert_ok!(planner.todays_tasks().await);
    assert_eq!(today.len(), 1);
    assert_eq!(today[0].task, completed);

    assert_ok!(planner.delete_task(task.id.into()).await);
    assert!(assert_ok!(planner.tasks().await).is_empty());
}

#[tokio::test]
async fn test_data_survives_reconnect() {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp directory");
    let db_path = temp_dir.path().join("persist.db");
    let path = db_path.to_string_lossy().to_string();

    let task_id = {
        let pool = establish_connection(&path).await.unwrap();
        let planner = Planner::new(
            SqliteStore::new(pool.clone()),
            FixedClock::on_date(date("2024-01-01")),
            RecurrenceExpander::with_defaults(),
        );
        planner.ensure_default_groups().await.unwrap();
        let task = create_test_task(&planner, "Gym", "2024-01-01", RepeatType::Weekly).await;
        pool.close().await;
        task.id
    };

    let pool = establish_connection(&path).await.unwrap();
    let planner = Planner::new(
        SqliteStore::new(pool),
        FixedClock::on_date(date("2024-01-08")),
        RecurrenceExpander::with_defaults(),
    );
    assert_eq!(planner.ensure_default_groups().await.unwrap(), 0);

    let today = planner.todays_tasks().await.unwrap();
    assert_eq!(today.len(), 1);
    assert_eq!(
        today[0].id,
        OccurrenceId::Virtual {
            base: task_id,
            index: 2
        }
    );
}

#[tokio::test]
async fn test_weekly_series_in_month_view() {
    let planner = setup_memory_planner("2024-01-10").await;
    let series = planner
        .add_task(NewTaskData {
            title: "Workshop".to_string(),
            start_date: date("2024-01-01"),
            end_date: Some(date("2024-01-03")),
            group_id: "study".to_string(),
            repeat_type: RepeatType::Weekly,
            ..Default::default()
        })
        .await
        .unwrap();

    let window = DateWindow::month_grid_of(date("2024-01-10"));
    let occurrences = planner.tasks_for_range(&window).await.unwrap();

    // Grid runs Sun 2023-12-31 to Sat 2024-02-03
    let starts: Vec<NaiveDate> = occurrences.iter().map(|o| o.start_date()).collect();
    assert_eq!(
        starts,
        vec![
            date("2024-01-01"),
            date("2024-01-08"),
            date("2024-01-15"),
            date("2024-01-22"),
            date("2024-01-29"),
        ]
    );
    assert!(occurrences[0].id == OccurrenceId::Base(series.id));
    assert!(occurrences[1..]
        .iter()
        .all(|o| o.is_virtual() && o.task.duration_days() == 2));
}

#[tokio::test]
async fn test_custom_series_skips_and_ends() {
    let planner = setup_memory_planner("2024-01-01").await;
    let mut custom = CustomRepeat::every(2, RepeatUnit::Days);
    custom.skip_dates.insert(date("2024-01-05"));
    custom.end_date = Some(date("2024-01-09"));

    let series = planner
        .add_task(NewTaskData {
            title: "Water plants".to_string(),
            start_date: date("2024-01-01"),
            group_id: "personal".to_string(),
            repeat_type: RepeatType::Custom,
            custom_repeat: Some(custom),
            ..Default::default()
        })
        .await
        .unwrap();

    let window = DateWindow::new(date("2024-01-01"), date("2024-01-31")).unwrap();
    let starts: Vec<NaiveDate> = planner
        .tasks_for_range(&window)
        .await
        .unwrap()
        .iter()
        .map(|o| o.start_date())
        .collect();
    assert_eq!(
        starts,
        vec![
            date("2024-01-01"),
            date("2024-01-03"),
            date("2024-01-07"),
            date("2024-01-09"),
        ]
    );

    let stopped = planner
        .edit_task(
            series.id.into(),
            UpdateTaskData {
                repeat_type: Some(RepeatType::None),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    // Custom settings stay stored but are ignored once the series stops
    assert!(stopped.custom_repeat.is_some());
    assert_eq!(planner.tasks_for_range(&window).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_invalid_inputs_rejected() {
    let (planner, _temp_dir) = setup_sqlite_planner("2024-01-01").await;

    assert_err!(DateWindow::new(date("2024-01-05"), date("2024-01-01")));

    let missing_custom = planner
        .add_task(NewTaskData {
            title: "Broken".to_string(),
            start_date: date("2024-01-01"),
            group_id: "work".to_string(),
            repeat_type: RepeatType::Custom,
            ..Default::default()
        })
        .await;
    assert!(matches!(missing_custom, Err(CoreError::InvalidRecurrence(_))));
    assert!(planner.tasks().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_focus_is_exclusive_across_stores() {
    let (planner, _temp_dir) = setup_sqlite_planner("2024-01-01").await;
    let a = create_test_task(&planner, "A", "2024-01-01", RepeatType::None).await;
    let b = create_test_task(&planner, "B", "2024-01-01", RepeatType::None).await;
    let c = create_test_task(&planner, "C", "2024-01-01", RepeatType::Daily).await;

    for task in [&a, &b, &c] {
        planner.set_focus(task.id.into()).await.unwrap();
        let focused = planner
            .tasks()
            .await
            .unwrap()
            .into_iter()
            .filter(|t| t.is_focus)
            .count();
        assert_eq!(focused, 1);
    }

    // Focusing through a virtual id lands on the series
    planner.set_focus(a.id.into()).await.unwrap();
    let refocused = planner
        .set_focus(OccurrenceId::Virtual {
            base: c.id,
            index: 4,
        })
        .await
        .unwrap();
    assert_eq!(refocused.id, c.id);
    assert!(refocused.is_focus);

    let focus = planner.focus_task().await.unwrap().expect("focus task");
    assert_eq!(focus.real_id(), c.id);
}

#[tokio::test]
async fn test_group_lifecycle() {
    let (planner, _temp_dir) = setup_sqlite_planner("2024-01-01").await;
    let garden = planner.add_group("Garden", "#84CC16").await.unwrap();
    assert_eq!(garden.order, 3);

    let task = planner
        .add_task(NewTaskData {
            title: "Prune roses".to_string(),
            start_date: date("2024-01-01"),
            group_id: garden.id.clone(),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(task.effective_color(&planner.groups().await.unwrap()), "#84CC16");

    planner.delete_group("work").await.unwrap();
    let fallback = planner.delete_group(&garden.id).await.unwrap();
    assert_eq!(fallback.id, "study");

    let groups = planner.groups().await.unwrap();
    let moved = planner.get_task(task.id.into()).await.unwrap();
    assert_eq!(moved.group_id, "study");
    assert_eq!(moved.effective_color(&groups), "#8B5CF6");

    planner.delete_group("study").await.unwrap();
    assert!(matches!(
        planner.delete_group("personal").await,
        Err(CoreError::LastGroup)
    ));
    assert_eq!(
        planner.get_task(task.id.into()).await.unwrap().group_id,
        "personal"
    );
}

#[tokio::test]
async fn test_conflicts_include_virtual_occurrences() {
    let planner = setup_memory_planner("2024-01-03").await;
    let nine = NaiveTime::from_hms_opt(9, 0, 0);

    let standup = planner
        .add_task(NewTaskData {
            title: "Standup".to_string(),
            start_date: date("2024-01-01"),
            start_time: nine,
            group_id: "work".to_string(),
            repeat_type: RepeatType::Daily,
            ..Default::default()
        })
        .await
        .unwrap();
    let dentist = planner
        .add_task(NewTaskData {
            title: "Dentist".to_string(),
            start_date: date("2024-01-03"),
            start_time: nine,
            group_id: "personal".to_string(),
            ..Default::default()
        })
        .await
        .unwrap();

    let window = DateWindow::week_of(date("2024-01-03"));
    let conflicts = planner.conflicts_for_range(&window).await.unwrap();
    let virtual_id = OccurrenceId::Virtual {
        base: standup.id,
        index: 3,
    };
    assert!(conflicts.has_conflict(virtual_id));
    assert!(conflicts.has_conflict(dentist.id.into()));
    let others = conflicts.conflicting_tasks(dentist.id.into());
    assert!(!others.is_empty());
    assert!(others.iter().all(|o| o.real_id() == standup.id));
    assert_eq!(conflicts.total_conflicts(), 2);
}

#[tokio::test]
async fn test_display_pipeline() {
    let planner = setup_memory_planner("2024-01-01").await;
    let first = create_test_task(&planner, "First", "2024-01-01", RepeatType::None).await;
    let second = create_test_task(&planner, "Second", "2024-01-01", RepeatType::None).await;
    let third = planner
        .add_task(NewTaskData {
            title: "Third".to_string(),
            start_date: date("2024-01-01"),
            group_id: "study".to_string(),
            tags: vec!["reading".to_string()],
            ..Default::default()
        })
        .await
        .unwrap();
    planner.toggle_complete(second.id.into()).await.unwrap();
    planner.set_focus(first.id.into()).await.unwrap();

    let mut today = planner.todays_tasks().await.unwrap();
    sort_for_display(&mut today);
    let titles: Vec<&str> = today.iter().map(|o| o.task.title.as_str()).collect();
    assert_eq!(titles, vec!["First", "Third", "Second"]);

    let progress = Progress::of(&today);
    assert_eq!(progress.percentage(), 33);

    let work = apply_filters(today.clone(), &[Filter::Group("work".to_string())]);
    assert_eq!(work.len(), 2);
    let reading = apply_filters(today, &[Filter::Tag("reading".to_string())]);
    assert_eq!(reading.len(), 1);
    assert_eq!(reading[0].real_id(), third.id);

    assert_eq!(
        planner.tag_counts().await.unwrap(),
        vec![("reading".to_string(), 1)]
    );
}

#[tokio::test]
async fn test_reminders_for_today() {
    let planner = setup_memory_planner("2024-01-01").await;
    planner
        .add_task(NewTaskData {
            title: "Call mom".to_string(),
            start_date: date("2024-01-01"),
            start_time: NaiveTime::from_hms_opt(18, 0, 0),
            group_id: "personal".to_string(),
            reminder: Reminder::at(vec![15, 60]),
            ..Default::default()
        })
        .await
        .unwrap();

    let today = planner.todays_tasks().await.unwrap();
    let mut tracker = ReminderTracker::new();
    let now = date("2024-01-01").and_hms_opt(17, 50, 0).unwrap();

    let due = tracker.poll(&today, now);
    assert_eq!(due.len(), 2);
    assert!(tracker.poll(&today, now).is_empty());
}
