/// Tool for creating new habits
///
/// This module implements the habit_create MCP tool.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::domain::{Cadence, Habit};
use crate::storage::HabitStorage;
use crate::tools::ToolError;

/// Parameters for creating a new habit
#[derive(Debug, Deserialize, JsonSchema)]
pub struct CreateHabitParams {
    /// Name of the habit
    pub name: String,
    /// Optional longer description
    pub description: Option<String>,
    /// How often the habit repeats: daily, weekly or monthly
    pub cadence: String,
}

/// Response from creating a habit
#[derive(Debug, Serialize)]
pub struct CreateHabitResponse {
    pub success: bool,
    pub habit_id: String,
    pub cadence: Cadence,
    pub message: String,
}

/// Create a new active habit with zero streaks
pub fn create_habit<S: HabitStorage>(
    storage: &S,
    params: CreateHabitParams,
) -> Result<CreateHabitResponse, ToolError> {
    let cadence: Cadence = params.cadence.parse()?;
    let description = params
        .description
        .map(|d| d.trim().to_string())
        .filter(|d| !d.is_empty());

    let habit = Habit::new(params.name, description, cadence)?;
    storage.create_habit(&habit)?;

    tracing::info!("Created {} habit '{}' ({})", habit.cadence, habit.name, habit.id);

    Ok(CreateHabitResponse {
        success: true,
        habit_id: habit.id.to_string(),
        cadence,
        message: format!("✅ Created {} habit '{}'! Ready to start your streak!", cadence, habit.name),
    })
}
