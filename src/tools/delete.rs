/// Tool for deleting habits
///
/// This module implements the habit_delete MCP tool. Deleting a habit
/// removes all of its completions as well.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::storage::HabitStorage;
use crate::tools::{parse_habit_id, ToolError};

/// Parameters for deleting a habit
#[derive(Debug, Deserialize, JsonSchema)]
pub struct DeleteHabitParams {
    /// ID of the habit to delete
    pub habit_id: String,
}

/// Response from deleting a habit
#[derive(Debug, Serialize)]
pub struct DeleteHabitResponse {
    pub success: bool,
    pub removed_completions: usize,
    pub message: String,
}

/// Delete a habit together with its completion history
pub fn delete_habit<S: HabitStorage>(
    storage: &S,
    params: DeleteHabitParams,
) -> Result<DeleteHabitResponse, ToolError> {
    let habit_id = parse_habit_id(&params.habit_id)?;

    storage.atomically(|s| -> Result<_, ToolError> {
        let habit = s.get_habit(&habit_id)?;
        let removed_completions = s.load_completions(&habit_id)?.entries().len();
        s.delete_habit(&habit_id)?;

        tracing::info!("Deleted habit '{}' ({}) with {} completions", habit.name, habit.id, removed_completions);

        Ok(DeleteHabitResponse {
            success: true,
            removed_completions,
            message: format!("🗑️ Deleted habit '{}' and its {} completion record(s)", habit.name, removed_completions),
        })
    })
}
