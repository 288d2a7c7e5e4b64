/// Tool for editing existing habits
///
/// This module implements the habit_edit MCP tool. Name and description are
/// plain field updates; cadence and status changes go through the streak
/// engine's state machine. Every input is parsed and validated before
/// anything is written.

use chrono::NaiveDate;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::domain::{Cadence, HabitEdit, HabitStatus, StreakEngine};
use crate::storage::HabitStorage;
use crate::tools::{parse_habit_id, streak_label, ToolError};

/// Parameters for editing a habit
#[derive(Debug, Deserialize, JsonSchema)]
pub struct EditHabitParams {
    /// ID of the habit to edit
    pub habit_id: String,
    /// New name
    pub name: Option<String>,
    /// New description; an empty string clears it
    pub description: Option<String>,
    /// New cadence: daily, weekly or monthly
    pub cadence: Option<String>,
    /// New status: active, paused or inactive
    pub status: Option<String>,
}

/// Response from editing a habit
#[derive(Debug, Serialize)]
pub struct EditHabitResponse {
    pub success: bool,
    pub cadence: Cadence,
    pub status: HabitStatus,
    pub cadence_changed: bool,
    pub previous_status: Option<HabitStatus>,
    pub last_streak: u32,
    pub best_streak: u32,
    /// Completions soft-deleted by the edit
    pub retracted_dates: Vec<NaiveDate>,
    pub message: String,
}

/// Edit a habit, applying cadence first and status second
pub fn edit_habit<S: HabitStorage>(
    storage: &S,
    engine: &StreakEngine,
    params: EditHabitParams,
    today: NaiveDate,
) -> Result<EditHabitResponse, ToolError> {
    let habit_id = parse_habit_id(&params.habit_id)?;
    let edit = HabitEdit {
        cadence: params.cadence.as_deref().map(str::parse).transpose()?,
        status: params.status.as_deref().map(str::parse).transpose()?,
    };
    let description = params.description.map(|d| {
        let trimmed = d.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_string())
    });

    storage.atomically(|s| -> Result<_, ToolError> {
        let mut habit = s.get_habit(&habit_id)?;
        let mut log = s.load_completions(&habit_id)?;

        habit.rename(params.name, description)?;
        let outcome = engine.apply_edit(&mut habit, &mut log, edit, today);

        for completion in outcome.retracted() {
            s.save_completion(completion)?;
        }
        s.update_habit(&habit)?;

        let mut changes = Vec::new();
        if outcome.cadence_changed {
            changes.push(format!("cadence is now {}", habit.cadence));
        }
        if let Some(change) = &outcome.status_change {
            changes.push(format!("status {} → {}", change.from, change.to));
            if !change.retracted.is_empty() {
                changes.push("today's completion was retracted".to_string());
            }
        }
        let message = if changes.is_empty() {
            format!("✅ Updated habit '{}'", habit.name)
        } else {
            format!(
                "✅ Updated habit '{}': {}. Streak: {} (best: {})",
                habit.name,
                changes.join(", "),
                streak_label(habit.last_streak, habit.cadence),
                streak_label(habit.best_streak, habit.cadence),
            )
        };

        Ok(EditHabitResponse {
            success: true,
            cadence: habit.cadence,
            status: habit.status,
            cadence_changed: outcome.cadence_changed,
            previous_status: outcome.status_change.as_ref().map(|change| change.from),
            last_streak: habit.last_streak,
            best_streak: habit.best_streak,
            retracted_dates: outcome.retracted().iter().map(|c| c.completion_date).collect(),
            message,
        })
    })
}
