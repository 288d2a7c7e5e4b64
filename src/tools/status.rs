/// Tool for checking habit status and streaks
///
/// This module implements the habit_status MCP tool. Looking at a habit
/// refreshes its stored streaks, exactly like completing it would.

use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::domain::{Cadence, DomainError, Habit, HabitStatus, Streak, StreakEngine};
use crate::storage::HabitStorage;
use crate::tools::{parse_habit_id, refresh_streak, streak_label, ToolError};

/// How many recent completion days to include when asked for
const RECENT_LIMIT: usize = 7;

/// Parameters for checking habit status
#[derive(Debug, Default, Deserialize, JsonSchema)]
pub struct StatusParams {
    /// ID of a specific habit (shows all habits if omitted)
    pub habit_id: Option<String>,
    /// Only habits with this cadence: daily, weekly or monthly
    pub cadence: Option<String>,
    /// Only habits with this status: active, paused or inactive
    pub status: Option<String>,
    /// Sort by: name, streak, best or created (default: name)
    pub sort_by: Option<String>,
    /// Include the most recent completion days
    pub include_recent: Option<bool>,
}

/// Ordering of the status list
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortBy {
    #[default]
    Name,
    Streak,
    Best,
    Created,
}

impl FromStr for SortBy {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "name" => Ok(SortBy::Name),
            "streak" | "current_streak" => Ok(SortBy::Streak),
            "best" | "best_streak" => Ok(SortBy::Best),
            "created" | "created_at" => Ok(SortBy::Created),
            _ => Err(DomainError::Validation {
                message: format!("Invalid sort order '{}'. Valid options: name, streak, best, created", s),
            }),
        }
    }
}

/// Streak information about a single habit
#[derive(Debug, Serialize)]
pub struct HabitStreakSummary {
    pub habit_id: String,
    pub name: String,
    pub cadence: Cadence,
    pub status: HabitStatus,
    pub current_streak: u32,
    pub best_streak: u32,
    pub best_streak_ever: u32,
    pub total_completions: u32,
    pub last_completed: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recent: Option<Vec<NaiveDate>>,
}

impl HabitStreakSummary {
    fn new(habit: &Habit, streak: Streak, recent: Option<Vec<NaiveDate>>) -> Self {
        Self {
            habit_id: habit.id.to_string(),
            name: habit.name.clone(),
            cadence: habit.cadence,
            status: habit.status,
            current_streak: streak.current_streak,
            best_streak: streak.best_streak,
            best_streak_ever: streak.best_streak_ever,
            total_completions: streak.total_completions,
            last_completed: streak.last_completed,
            created_at: habit.created_at,
            recent,
        }
    }

    fn describe(&self) -> String {
        let paused = match self.status {
            HabitStatus::Active => "",
            HabitStatus::Paused => " ⏸️ (paused)",
            HabitStatus::Inactive => " 💤 (inactive)",
        };
        let mut line = format!(
            "🎯 **{}** ({}){}\n   🔥 Streak: {} | 🏆 Best: {} | ✅ Total: {}",
            self.name,
            self.cadence,
            paused,
            streak_label(self.current_streak, self.cadence),
            streak_label(self.best_streak, self.cadence),
            self.total_completions,
        );
        if let Some(last) = self.last_completed {
            line.push_str(&format!("\n   Last completed: {}", last));
        }
        if let Some(recent) = self.recent.as_ref().filter(|r| !r.is_empty()) {
            let days: Vec<String> = recent.iter().map(|d| d.to_string()).collect();
            line.push_str(&format!("\n   Recent: {}", days.join(", ")));
        }
        line
    }
}

/// Response from checking habit status
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub habits: Vec<HabitStreakSummary>,
    pub message: String,
}

/// Refresh and report streaks for one habit or a filtered, sorted list
pub fn get_habit_status<S: HabitStorage>(
    storage: &S,
    engine: &StreakEngine,
    params: StatusParams,
    today: NaiveDate,
) -> Result<StatusResponse, ToolError> {
    let habit_id = params.habit_id.as_deref().map(parse_habit_id).transpose()?;
    let cadence: Option<Cadence> = params.cadence.as_deref().map(str::parse).transpose()?;
    let status: Option<HabitStatus> = params.status.as_deref().map(str::parse).transpose()?;
    let sort_by: SortBy = params.sort_by.as_deref().map(str::parse).transpose()?.unwrap_or_default();
    let include_recent = params.include_recent.unwrap_or(false);

    let mut habits = storage.atomically(|s| -> Result<_, ToolError> {
        let ids: Vec<_> = match &habit_id {
            Some(id) => vec![id.clone()],
            None => s.list_habits(cadence, status)?.into_iter().map(|h| h.id).collect(),
        };

        let mut summaries = Vec::with_capacity(ids.len());
        for id in ids {
            let (habit, streak) = refresh_streak(s, engine, &id, today)?;
            let recent = if include_recent {
                let mut days = s.load_completions(&id)?.list_valid_desc();
                days.truncate(RECENT_LIMIT);
                Some(days)
            } else {
                None
            };
            summaries.push(HabitStreakSummary::new(&habit, streak, recent));
        }
        Ok(summaries)
    })?;

    sort_summaries(&mut habits, sort_by);

    let message = if habits.is_empty() {
        "No habits found. Create your first habit to get started!".to_string()
    } else {
        let live = habits.iter().filter(|h| h.current_streak > 0).count();
        let header = format!("📊 Status: {} of {} habits on a streak", live, habits.len());
        let details: Vec<String> = habits.iter().map(HabitStreakSummary::describe).collect();
        format!("{}\n\n{}", header, details.join("\n\n"))
    };

    Ok(StatusResponse { habits, message })
}

fn sort_summaries(habits: &mut [HabitStreakSummary], sort_by: SortBy) {
    let by_name = |a: &HabitStreakSummary, b: &HabitStreakSummary| {
        a.name.to_lowercase().cmp(&b.name.to_lowercase())
    };
    match sort_by {
        SortBy::Name => habits.sort_by(by_name),
        SortBy::Streak => habits.sort_by(|a, b| {
            b.current_streak.cmp(&a.current_streak).then_with(|| by_name(a, b))
        }),
        SortBy::Best => habits.sort_by(|a, b| {
            b.best_streak.cmp(&a.best_streak).then_with(|| by_name(a, b))
        }),
        SortBy::Created => habits.sort_by(|a, b| a.created_at.cmp(&b.created_at)),
    }
}
