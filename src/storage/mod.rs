/// Storage layer for persisting habits and completions
///
/// This module handles all database operations using SQLite. The streak
/// engine never touches it directly: tools load data through `HabitStorage`,
/// run the engine, and write the results back.

pub mod sqlite;
pub mod migrations;

// Re-export the main storage types
pub use sqlite::*;

use chrono::NaiveDate;
use thiserror::Error;
use crate::domain::{Cadence, Completion, CompletionLog, Habit, HabitId, HabitStatus};
use crate::report::CompletionCounts;

/// Errors that can occur during storage operations
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Database connection error: {0}")]
    Connection(String),

    #[error("Database query error: {0}")]
    Query(#[from] rusqlite::Error),

    #[error("Habit not found: {habit_id}")]
    HabitNotFound { habit_id: String },

    #[error("Duplicate completion: habit {habit_id} already has a completion on {date}")]
    DuplicateCompletion { habit_id: String, date: NaiveDate },

    #[error("Migration error: {0}")]
    Migration(String),
}

/// Trait defining the storage interface for habits and completions
///
/// This trait allows us to potentially swap out SQLite for other databases
/// in the future while keeping the same interface.
pub trait HabitStorage {
    /// Create a new habit
    fn create_habit(&self, habit: &Habit) -> Result<(), StorageError>;

    /// Get a habit by ID
    fn get_habit(&self, habit_id: &HabitId) -> Result<Habit, StorageError>;

    /// Update an existing habit (all mutable fields, streaks included)
    fn update_habit(&self, habit: &Habit) -> Result<(), StorageError>;

    /// Delete a habit together with all of its completions
    fn delete_habit(&self, habit_id: &HabitId) -> Result<(), StorageError>;

    /// List habits, optionally filtered by cadence and status, ordered by name
    fn list_habits(
        &self,
        cadence: Option<Cadence>,
        status: Option<HabitStatus>,
    ) -> Result<Vec<Habit>, StorageError>;

    /// Load every completion of a habit, soft-deleted ones included
    fn load_completions(&self, habit_id: &HabitId) -> Result<CompletionLog, StorageError>;

    /// Insert a completion, or update its soft-delete flag if it already exists
    fn save_completion(&self, completion: &Completion) -> Result<(), StorageError>;

    /// Count non-deleted completions, split by the owning habit's status
    fn completion_counts(&self) -> Result<CompletionCounts, StorageError>;

    /// Non-deleted completions per day across all habits, oldest first
    fn completion_trend(&self) -> Result<Vec<(NaiveDate, u32)>, StorageError>;

    /// Run `f` inside a write transaction
    ///
    /// Everything `f` writes is committed together, or rolled back if it
    /// returns an error. Used around read completions -> compute -> write
    /// streaks so concurrent writers cannot lose updates.
    fn atomically<T, E, F>(&self, f: F) -> Result<T, E>
    where
        Self: Sized,
        E: From<StorageError>,
        F: FnOnce(&Self) -> Result<T, E>;
}
