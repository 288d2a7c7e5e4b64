/// Basic unit tests to verify core functionality
use chrono::NaiveDate;
use habit_streaks::*;
use tempfile::NamedTempFile;

#[cfg(test)]
mod basic_unit_tests {
    use super::*;

    #[test]
    fn test_habit_creation() {
        let habit = Habit::new(
            "Test Habit".to_string(),
            Some("A test habit".to_string()),
            Cadence::Daily,
        );

        assert!(habit.is_ok());
        let habit = habit.unwrap();
        assert_eq!(habit.name, "Test Habit");
        assert_eq!(habit.status, HabitStatus::Active);
        assert_eq!((habit.last_streak, habit.best_streak), (0, 0));
        assert_eq!(habit.reset_on, None);
    }

    #[test]
    fn test_habit_name_validation() {
        assert!(matches!(
            Habit::new(String::new(), None, Cadence::Weekly),
            Err(DomainError::InvalidHabitName(_))
        ));
        assert!(Habit::new("x".repeat(256), None, Cadence::Weekly).is_err());
        assert!(Habit::new("x".repeat(255), None, Cadence::Weekly).is_ok());
    }

    #[test]
    fn test_loaded_habit_heals_best_streak() {
        let habit = Habit::from_existing(
            HabitId::new(),
            "Run".to_string(),
            None,
            Cadence::Daily,
            HabitStatus::Paused,
            6,
            2,
            chrono::Utc::now(),
            None,
        );

        assert_eq!((habit.last_streak, habit.best_streak), (6, 6));
    }

    #[test]
    fn test_completion_creation() {
        let habit_id = HabitId::new();
        let date = NaiveDate::from_ymd_opt(2025, 3, 12).unwrap();

        let completion = Completion::new(habit_id.clone(), date);

        assert_eq!(completion.habit_id, habit_id);
        assert_eq!(completion.completion_date, date);
        assert!(completion.is_valid());
    }

    #[test]
    fn test_enum_parsing() {
        assert_eq!("weekly".parse::<Cadence>().unwrap(), Cadence::Weekly);
        assert_eq!("Inactive".parse::<HabitStatus>().unwrap(), HabitStatus::Inactive);
        assert_eq!(HabitStatus::default(), HabitStatus::Active);
        assert!("fortnightly".parse::<Cadence>().is_err());
    }

    #[tokio::test]
    async fn test_server_creation() {
        let temp_file = NamedTempFile::new().expect("Failed to create temp file");
        let server = HabitTrackerServer::new(TrackerConfig::new(temp_file.path())).await;
        assert!(server.is_ok());
    }

    #[test]
    fn test_storage_creation() {
        let temp_file = NamedTempFile::new().expect("Failed to create temp file");
        let storage = SqliteStorage::new(temp_file.path());
        assert!(storage.is_ok());
    }
}
