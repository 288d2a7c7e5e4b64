/// Tool for marking a habit as done
///
/// This module implements the habit_complete MCP tool: an idempotent
/// record-or-restore for one day followed by a streak refresh.

use chrono::NaiveDate;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::domain::{DomainError, HabitStatus, RecordOutcome, Streak, StreakEngine};
use crate::storage::HabitStorage;
use crate::tools::{parse_date, parse_habit_id, streak_label, ToolError};

/// Parameters for completing a habit
#[derive(Debug, Deserialize, JsonSchema)]
pub struct CompleteHabitParams {
    /// ID of the habit to mark as done
    pub habit_id: String,
    /// Day of the completion (YYYY-MM-DD, defaults to today)
    pub date: Option<String>,
}

/// Response from completing a habit
#[derive(Debug, Serialize)]
pub struct CompleteHabitResponse {
    pub success: bool,
    pub date: NaiveDate,
    pub outcome: RecordOutcome,
    pub streak: Streak,
    pub message: String,
}

/// Mark a habit as done on a day and refresh its streaks
///
/// Repeated calls for the same day never create a second completion; a
/// soft-deleted completion for that day is restored instead. Inactive habits
/// accept no completions.
pub fn complete_habit<S: HabitStorage>(
    storage: &S,
    engine: &StreakEngine,
    params: CompleteHabitParams,
    today: NaiveDate,
) -> Result<CompleteHabitResponse, ToolError> {
    let habit_id = parse_habit_id(&params.habit_id)?;
    let date = parse_date(params.date.as_deref(), today)?;
    if date > today {
        return Err(DomainError::InvalidDate(format!(
            "{} is in the future (today is {})", date, today
        )).into());
    }

    storage.atomically(|s| -> Result<_, ToolError> {
        let mut habit = s.get_habit(&habit_id)?;
        if habit.status == HabitStatus::Inactive {
            return Err(DomainError::Validation {
                message: format!("Habit '{}' is inactive, reactivate it before marking it done", habit.name),
            }
            .into());
        }
        let mut log = s.load_completions(&habit_id)?;

        let (completion, outcome) = log.record(date);
        if outcome.is_write() {
            s.save_completion(&completion)?;
        }

        let streak = engine.snapshot(&mut habit, &log, today);
        s.update_habit(&habit)?;

        tracing::debug!("Completion for habit {} on {}: {:?}", habit.id, date, outcome);

        let headline = match outcome {
            RecordOutcome::Created => format!("🔥 Marked '{}' done for {}", habit.name, date),
            RecordOutcome::Restored => format!("🔥 Restored completion of '{}' for {}", habit.name, date),
            RecordOutcome::AlreadyRecorded => format!("'{}' was already done for {}", habit.name, date),
        };
        let status_note = if habit.status == HabitStatus::Paused {
            "Habit is paused, the streak stays frozen until it is resumed.".to_string()
        } else {
            streak.motivational_message()
        };

        Ok(CompleteHabitResponse {
            success: true,
            date,
            outcome,
            message: format!(
                "{}. Current streak: {} (best: {})\n{}",
                headline,
                streak_label(streak.current_streak, habit.cadence),
                streak_label(streak.best_streak, habit.cadence),
                status_note,
            ),
            streak,
        })
    })
}
