/// Tool for retracting a completion
///
/// This module implements the habit_uncomplete MCP tool. The completion is
/// soft-deleted, never removed, so it can be restored later.

use chrono::NaiveDate;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::domain::{Streak, StreakEngine};
use crate::storage::HabitStorage;
use crate::tools::{parse_date, parse_habit_id, refresh_streak, streak_label, ToolError};

/// Parameters for retracting a completion
#[derive(Debug, Deserialize, JsonSchema)]
pub struct UncompleteHabitParams {
    /// ID of the habit
    pub habit_id: String,
    /// Day to retract (YYYY-MM-DD, defaults to today)
    pub date: Option<String>,
}

/// Response from retracting a completion
#[derive(Debug, Serialize)]
pub struct UncompleteHabitResponse {
    pub success: bool,
    pub date: NaiveDate,
    /// Whether a live completion existed for that day
    pub retracted: bool,
    pub streak: Streak,
    pub message: String,
}

/// Soft-delete the completion on a day and refresh the habit's streaks
pub fn uncomplete_habit<S: HabitStorage>(
    storage: &S,
    engine: &StreakEngine,
    params: UncompleteHabitParams,
    today: NaiveDate,
) -> Result<UncompleteHabitResponse, ToolError> {
    let habit_id = parse_habit_id(&params.habit_id)?;
    let date = parse_date(params.date.as_deref(), today)?;

    storage.atomically(|s| -> Result<_, ToolError> {
        // Unknown habits fail before anything is written
        s.get_habit(&habit_id)?;
        let mut log = s.load_completions(&habit_id)?;

        let changed = log.soft_delete_on(date);
        for completion in &changed {
            s.save_completion(completion)?;
        }

        let (habit, streak) = refresh_streak(s, engine, &habit_id, today)?;
        let retracted = !changed.is_empty();

        let message = if retracted {
            format!(
                "↩️ Removed completion of '{}' for {}. Current streak: {}",
                habit.name,
                date,
                streak_label(streak.current_streak, habit.cadence)
            )
        } else {
            format!("'{}' had no completion for {}, nothing to undo", habit.name, date)
        };

        Ok(UncompleteHabitResponse {
            success: true,
            date,
            retracted,
            streak,
            message,
        })
    })
}
