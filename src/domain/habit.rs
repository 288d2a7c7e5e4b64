/// Habit entity and related functionality
///
/// This module defines the core Habit struct that represents a recurring habit
/// together with its stored streak values and validation rules.

use serde::{Deserialize, Serialize};
use chrono::{DateTime, NaiveDate, Utc};
use crate::domain::{Cadence, DomainError, HabitId, HabitStatus};

const MAX_NAME_LEN: usize = 255;
const MAX_DESCRIPTION_LEN: usize = 500;

/// A habit represents something the user wants to do regularly
///
/// Besides its identity and cadence, a habit stores the most recently computed
/// streak (`last_streak`) and the best streak ever observed (`best_streak`).
/// Both are written by the streak engine, never by callers directly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Habit {
    /// Unique identifier for this habit
    pub id: HabitId,
    /// Display name (e.g., "Morning Run", "Budget Review")
    pub name: String,
    /// Optional detailed description
    pub description: Option<String>,
    /// How often this habit should be performed
    pub cadence: Cadence,
    /// Whether streaks are live, frozen or reset
    pub status: HabitStatus,
    /// The most recently computed or frozen streak
    pub last_streak: u32,
    /// The best streak ever observed
    pub best_streak: u32,
    /// When this habit was created
    pub created_at: DateTime<Utc>,
    /// Day the habit was last made inactive; earlier completions no longer
    /// count towards the current streak
    pub reset_on: Option<NaiveDate>,
}

impl Habit {
    /// Create a new active habit with validation
    ///
    /// Streak values start at zero.
    pub fn new(
        name: String,
        description: Option<String>,
        cadence: Cadence,
    ) -> Result<Self, DomainError> {
        Self::validate_name(&name)?;
        Self::validate_description(&description)?;

        Ok(Self {
            id: HabitId::new(),
            name: name.trim().to_string(),
            description,
            cadence,
            status: HabitStatus::Active,
            last_streak: 0,
            best_streak: 0,
            created_at: Utc::now(),
            reset_on: None,
        })
    }

    /// Create a habit from existing data (used when loading from database)
    ///
    /// Stored streaks are healed on the way in: a best streak lower than the
    /// last streak is raised to match.
    #[allow(clippy::too_many_arguments)]
    pub fn from_existing(
        id: HabitId,
        name: String,
        description: Option<String>,
        cadence: Cadence,
        status: HabitStatus,
        last_streak: u32,
        best_streak: u32,
        created_at: DateTime<Utc>,
        reset_on: Option<NaiveDate>,
    ) -> Self {
        let mut habit = Self {
            id,
            name,
            description,
            cadence,
            status,
            last_streak,
            best_streak,
            created_at,
            reset_on,
        };
        habit.heal_streaks();
        habit
    }

    /// Update the descriptive fields with validation
    ///
    /// Cadence and status are deliberately absent: they change streak
    /// semantics and go through the streak engine instead.
    pub fn rename(
        &mut self,
        name: Option<String>,
        description: Option<Option<String>>,
    ) -> Result<(), DomainError> {
        if let Some(ref new_name) = name {
            Self::validate_name(new_name)?;
        }
        if let Some(ref new_desc) = description {
            Self::validate_description(new_desc)?;
        }

        if let Some(new_name) = name {
            self.name = new_name.trim().to_string();
        }
        if let Some(new_description) = description {
            self.description = new_description;
        }
        Ok(())
    }

    /// Store a freshly computed streak, keeping the best streak monotonic
    pub fn record_streak(&mut self, streak: u32) {
        self.last_streak = streak;
        self.raise_best(streak);
    }

    /// Raise the best streak if `candidate` beats it; never lowers it
    pub fn raise_best(&mut self, candidate: u32) {
        self.best_streak = self.best_streak.max(candidate);
    }

    /// Restore `best_streak >= last_streak`, returning whether anything changed
    pub fn heal_streaks(&mut self) -> bool {
        if self.best_streak < self.last_streak {
            tracing::warn!(
                "Habit {} had best streak {} below last streak {}, raising it",
                self.id, self.best_streak, self.last_streak
            );
            self.best_streak = self.last_streak;
            return true;
        }
        false
    }

    // Validation helper methods

    /// Validate habit name according to business rules
    fn validate_name(name: &str) -> Result<(), DomainError> {
        let trimmed = name.trim();

        if trimmed.is_empty() {
            return Err(DomainError::InvalidHabitName(
                "Habit name cannot be empty".to_string()
            ));
        }

        if trimmed.chars().count() > MAX_NAME_LEN {
            return Err(DomainError::InvalidHabitName(
                format!("Habit name cannot be longer than {} characters", MAX_NAME_LEN)
            ));
        }

        Ok(())
    }

    /// Validate optional description
    fn validate_description(description: &Option<String>) -> Result<(), DomainError> {
        if let Some(desc) = description {
            if desc.chars().count() > MAX_DESCRIPTION_LEN {
                return Err(DomainError::Validation {
                    message: format!("Description cannot be longer than {} characters", MAX_DESCRIPTION_LEN)
                });
            }
        }
        Ok(())
    }
}

impl std::fmt::Display for Habit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.name, self.cadence)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_valid_habit() {
        let habit = Habit::new(
            "  Morning Run ".to_string(),
            Some("30-minute jog around the neighborhood".to_string()),
            Cadence::Daily,
        );

        assert!(habit.is_ok());
        let habit = habit.unwrap();
        assert_eq!(habit.name, "Morning Run");
        assert_eq!(habit.status, HabitStatus::Active);
        assert_eq!(habit.last_streak, 0);
        assert_eq!(habit.best_streak, 0);
        assert_eq!(habit.reset_on, None);
        assert_eq!(habit.to_string(), "Morning Run (daily)");
    }

    #[test]
    fn test_invalid_habit_name() {
        let result = Habit::new("   ".to_string(), None, Cadence::Weekly);
        assert!(matches!(result, Err(DomainError::InvalidHabitName(_))));

        let too_long = "x".repeat(256);
        assert!(Habit::new(too_long, None, Cadence::Daily).is_err());
    }

    #[test]
    fn test_record_streak_keeps_best_monotonic() {
        let mut habit = Habit::new("Read".to_string(), None, Cadence::Daily).unwrap();

        habit.record_streak(4);
        assert_eq!((habit.last_streak, habit.best_streak), (4, 4));

        habit.record_streak(1);
        assert_eq!((habit.last_streak, habit.best_streak), (1, 4));

        habit.raise_best(2);
        assert_eq!(habit.best_streak, 4);
    }

    #[test]
    fn test_from_existing_heals_best_streak() {
        let habit = Habit::from_existing(
            HabitId::new(),
            "Read".to_string(),
            None,
            Cadence::Daily,
            HabitStatus::Paused,
            5,
            3,
            Utc::now(),
            None,
        );

        assert_eq!(habit.last_streak, 5);
        assert_eq!(habit.best_streak, 5);
    }

    #[test]
    fn test_rename_validates_before_applying() {
        let mut habit = Habit::new("Read".to_string(), None, Cadence::Daily).unwrap();

        let result = habit.rename(Some("".to_string()), Some(Some("notes".to_string())));
        assert!(result.is_err());
        assert_eq!(habit.name, "Read");
        assert_eq!(habit.description, None);

        habit.rename(Some("Read News".to_string()), None).unwrap();
        assert_eq!(habit.name, "Read News");
    }
}
