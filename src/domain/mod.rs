/// Domain module containing the streak engine and its data types
///
/// This module defines the core entities (Habit, Completion) together with
/// cadence bucketing, the streak calculator and the status state machine that
/// decides when streaks are live, frozen or reset.

pub mod types;
pub mod habit;
pub mod completion;
pub mod cadence;
pub mod streak;
pub mod state;

// Re-export public types for easy access
pub use types::*;
pub use habit::*;
pub use completion::*;
pub use cadence::*;
pub use streak::*;
pub use state::*;

use thiserror::Error;

/// Errors that can occur during domain operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Invalid habit name: {0}")]
    InvalidHabitName(String),

    #[error("Invalid cadence '{0}'. Valid options: daily, weekly, monthly")]
    InvalidCadence(String),

    #[error("Invalid status '{0}'. Valid options: active, paused, inactive")]
    InvalidStatus(String),

    #[error("Invalid date: {0}")]
    InvalidDate(String),

    #[error("Invalid id '{0}'")]
    InvalidId(String),
}
