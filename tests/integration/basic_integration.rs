/// Basic integration tests
use chrono::NaiveDate;
use habit_streaks::tools::*;
use habit_streaks::*;
use tempfile::NamedTempFile;

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn today() -> NaiveDate {
    day(2025, 3, 12)
}

fn create(storage: &SqliteStorage, name: &str, cadence: &str) -> HabitId {
    let response = create_habit(
        storage,
        CreateHabitParams {
            name: name.to_string(),
            description: None,
            cadence: cadence.to_string(),
        },
    )
    .expect("Failed to create habit");
    HabitId::from_string(&response.habit_id).unwrap()
}

fn complete(storage: &SqliteStorage, engine: &StreakEngine, habit_id: &HabitId, date: NaiveDate) -> CompleteHabitResponse {
    complete_habit(
        storage,
        engine,
        CompleteHabitParams {
            habit_id: habit_id.to_string(),
            date: Some(date.to_string()),
        },
        today(),
    )
    .expect("Failed to complete habit")
}

fn set_status(storage: &SqliteStorage, engine: &StreakEngine, habit_id: &HabitId, status: &str, on: NaiveDate) -> EditHabitResponse {
    edit_habit(
        storage,
        engine,
        EditHabitParams {
            habit_id: habit_id.to_string(),
            name: None,
            description: None,
            cadence: None,
            status: Some(status.to_string()),
        },
        on,
    )
    .expect("Failed to edit habit")
}

fn current_streak(storage: &SqliteStorage, engine: &StreakEngine, habit_id: &HabitId, on: NaiveDate) -> u32 {
    let response = get_habit_status(
        storage,
        engine,
        StatusParams {
            habit_id: Some(habit_id.to_string()),
            ..Default::default()
        },
        on,
    )
    .expect("Failed to get status");
    response.habits[0].current_streak
}

#[cfg(test)]
mod basic_integration_tests {
    use super::*;

    #[tokio::test]
    async fn test_server_basic_workflow() {
        let temp_file = NamedTempFile::new().expect("Failed to create temp file");
        let server = HabitTrackerServer::new(TrackerConfig::new(temp_file.path()))
            .await
            .expect("Failed to create server");

        let habit_id = create(server.storage(), "Morning Run", "daily");
        for date in [day(2025, 3, 10), day(2025, 3, 11), today()] {
            complete(server.storage(), server.engine(), &habit_id, date);
        }

        assert_eq!(current_streak(server.storage(), server.engine(), &habit_id, today()), 3);
    }

    #[tokio::test]
    async fn test_database_persistence() {
        let temp_file = NamedTempFile::new().expect("Failed to create temp file");
        let config = TrackerConfig::new(temp_file.path());

        let habit_id = {
            let server = HabitTrackerServer::new(config.clone())
                .await
                .expect("Failed to create first server");
            let habit_id = create(server.storage(), "Journal", "weekly");
            complete(server.storage(), server.engine(), &habit_id, today());
            habit_id
        };

        let server = HabitTrackerServer::new(config)
            .await
            .expect("Failed to create second server");
        let habit = server.storage().get_habit(&habit_id).unwrap();
        assert_eq!(habit.cadence, Cadence::Weekly);
        assert_eq!(habit.last_streak, 1);
        assert_eq!(server.storage().load_completions(&habit_id).unwrap().list_valid(), vec![today()]);
    }

    #[tokio::test]
    async fn test_strict_anchor_from_config() {
        let temp_file = NamedTempFile::new().expect("Failed to create temp file");
        let config = TrackerConfig::new(temp_file.path()).with_anchor(AnchorRule::RequireCurrent);
        let server = HabitTrackerServer::new(config).await.expect("Failed to create server");
        assert_eq!(server.engine().anchor(), AnchorRule::RequireCurrent);

        let habit_id = create(server.storage(), "Read", "daily");
        complete(server.storage(), server.engine(), &habit_id, day(2025, 3, 10));
        complete(server.storage(), server.engine(), &habit_id, day(2025, 3, 11));

        assert_eq!(current_streak(server.storage(), server.engine(), &habit_id, today()), 0);
        assert_eq!(server.storage().get_habit(&habit_id).unwrap().best_streak, 2);
    }

    #[test]
    fn test_storage_interface() {
        let temp_file = NamedTempFile::new().expect("Failed to create temp file");
        let storage = SqliteStorage::new(temp_file.path()).expect("Failed to create storage");

        // The trait stays usable as a trait object
        let dynamic: &dyn HabitStorage = &storage;
        assert!(dynamic.list_habits(None, None).unwrap().is_empty());
    }

    #[test]
    fn test_pause_preserves_streak() {
        let storage = SqliteStorage::open_in_memory().unwrap();
        let engine = StreakEngine::default();
        let habit_id = create(&storage, "Stretch", "daily");
        for date in [day(2025, 3, 8), day(2025, 3, 9), day(2025, 3, 10), day(2025, 3, 11), today()] {
            complete(&storage, &engine, &habit_id, date);
        }

        set_status(&storage, &engine, &habit_id, "paused", today());

        // Ten days later without any completion the frozen value is still there
        let later = day(2025, 3, 22);
        assert_eq!(current_streak(&storage, &engine, &habit_id, later), 5);

        // Resuming restores the frozen value until the next live computation
        let resumed = set_status(&storage, &engine, &habit_id, "active", later);
        assert_eq!(resumed.last_streak, 5);
        assert_eq!(current_streak(&storage, &engine, &habit_id, later), 0);
        assert_eq!(storage.get_habit(&habit_id).unwrap().best_streak, 5);
    }

    #[test]
    fn test_inactivate_resets_and_reactivation_starts_fresh() {
        let storage = SqliteStorage::open_in_memory().unwrap();
        let engine = StreakEngine::default();
        let habit_id = create(&storage, "Meditate", "daily");
        for date in [day(2025, 3, 10), day(2025, 3, 11), today()] {
            complete(&storage, &engine, &habit_id, date);
        }

        set_status(&storage, &engine, &habit_id, "inactive", today());
        assert_eq!(current_streak(&storage, &engine, &habit_id, today()), 0);
        assert!(!storage.load_completions(&habit_id).unwrap().is_completed_on(today()));

        set_status(&storage, &engine, &habit_id, "active", today());
        assert_eq!(current_streak(&storage, &engine, &habit_id, today()), 0);

        // Completing today again restores the row and starts a new run of 1
        let response = complete(&storage, &engine, &habit_id, today());
        assert_eq!(response.outcome, RecordOutcome::Restored);
        assert_eq!(response.streak.current_streak, 1);
        assert_eq!(response.streak.best_streak, 3);
    }

    #[test]
    fn test_inactive_habit_cannot_regain_retracted_day() {
        let storage = SqliteStorage::open_in_memory().unwrap();
        let engine = StreakEngine::default();
        let habit_id = create(&storage, "Walk", "daily");
        for date in [day(2025, 3, 10), day(2025, 3, 11), today()] {
            complete(&storage, &engine, &habit_id, date);
        }

        set_status(&storage, &engine, &habit_id, "inactive", today());

        let result = complete_habit(
            &storage,
            &engine,
            CompleteHabitParams {
                habit_id: habit_id.to_string(),
                date: None,
            },
            today(),
        );
        assert!(matches!(result, Err(ToolError::Domain(DomainError::Validation { .. }))));

        set_status(&storage, &engine, &habit_id, "active", today());
        assert_eq!(current_streak(&storage, &engine, &habit_id, today()), 0);
        assert!(!storage.load_completions(&habit_id).unwrap().is_completed_on(today()));
    }

    #[test]
    fn test_weekly_and_monthly_scenarios() {
        let storage = SqliteStorage::open_in_memory().unwrap();
        let engine = StreakEngine::default();

        let weekly = create(&storage, "Call Family", "weekly");
        for date in [day(2025, 2, 26), day(2025, 3, 4), day(2025, 3, 6), day(2025, 3, 11)] {
            complete(&storage, &engine, &weekly, date);
        }
        assert_eq!(current_streak(&storage, &engine, &weekly, today()), 3);

        let monthly = create(&storage, "Budget Review", "monthly");
        let april = day(2025, 4, 20);
        for date in [day(2025, 1, 20), day(2025, 2, 10), day(2025, 4, 1)] {
            complete_habit(
                &storage,
                &engine,
                CompleteHabitParams {
                    habit_id: monthly.to_string(),
                    date: Some(date.to_string()),
                },
                april,
            )
            .unwrap();
        }
        assert_eq!(current_streak(&storage, &engine, &monthly, april), 1);
        assert_eq!(storage.get_habit(&monthly).unwrap().best_streak, 2);
    }

    #[test]
    fn test_report_after_activity() {
        let storage = SqliteStorage::open_in_memory().unwrap();
        let engine = StreakEngine::default();
        let run = create(&storage, "Run", "daily");
        let call = create(&storage, "Call", "weekly");
        for date in [day(2025, 3, 10), day(2025, 3, 11), today()] {
            complete(&storage, &engine, &run, date);
        }
        complete(&storage, &engine, &call, today());
        set_status(&storage, &engine, &call, "paused", today());

        let report = get_habit_report(&storage, &engine, ReportParams::default()).unwrap();

        assert_eq!(report.longest_streak.len(), 1);
        assert_eq!(report.longest_streak[0].name, "Run");
        assert_eq!(report.status_breakdown[&HabitStatus::Paused], 1);
        assert_eq!(report.completions.total, 4);
        assert_eq!(report.completions.active, 3);
        assert_eq!(report.completions.other, 1);
    }
}
