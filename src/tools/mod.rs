/// MCP tools for habit management
///
/// This module contains all the MCP tools that external clients can call to
/// interact with the habit tracker. Every tool takes the reference date as a
/// parameter instead of reading the clock, and every read -> compute -> write
/// sequence runs inside `HabitStorage::atomically`.

pub mod create;
pub mod complete;
pub mod uncomplete;
pub mod edit;
pub mod delete;
pub mod status;
pub mod report;

// Re-export tool functions for easy access
pub use create::*;
pub use complete::*;
pub use uncomplete::*;
pub use edit::*;
pub use delete::*;
pub use status::*;
pub use report::*;

use chrono::NaiveDate;
use thiserror::Error;

use crate::domain::{Cadence, DomainError, Habit, HabitId, Streak, StreakEngine};
use crate::storage::{HabitStorage, StorageError};

/// Errors returned by the tools
#[derive(Error, Debug)]
pub enum ToolError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Parse a habit id supplied by a client
pub(crate) fn parse_habit_id(raw: &str) -> Result<HabitId, DomainError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(DomainError::Validation {
            message: "Habit ID cannot be empty".to_string(),
        });
    }
    HabitId::from_string(raw)
}

/// Parse an optional `YYYY-MM-DD` date, defaulting to `today`
pub(crate) fn parse_date(raw: Option<&str>, today: NaiveDate) -> Result<NaiveDate, DomainError> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        Some(s) => NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .map_err(|_| DomainError::InvalidDate(format!("'{}' is not a YYYY-MM-DD date", s))),
        None => Ok(today),
    }
}

/// Recompute and store a habit's streaks from its completion log
pub(crate) fn refresh_streak<S: HabitStorage>(
    storage: &S,
    engine: &StreakEngine,
    habit_id: &HabitId,
    today: NaiveDate,
) -> Result<(Habit, Streak), StorageError> {
    let mut habit = storage.get_habit(habit_id)?;
    let log = storage.load_completions(habit_id)?;
    let streak = engine.snapshot(&mut habit, &log, today);
    storage.update_habit(&habit)?;
    Ok((habit, streak))
}

/// "3 days", "1 week", "0 months"
pub(crate) fn streak_label(streak: u32, cadence: Cadence) -> String {
    format!("{} {}", streak, cadence.unit(streak))
}
