/// Tool for read-only habit reports
///
/// This module implements the habit_report MCP tool. It reports stored
/// streak values without recomputing them.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::domain::{Cadence, Habit, HabitStatus, StreakEngine};
use crate::report::{self, CompletionCounts, DEFAULT_TOP_N};
use crate::storage::HabitStorage;
use crate::tools::{parse_habit_id, streak_label, ToolError};

/// Parameters for a habit report
#[derive(Debug, Default, Deserialize, JsonSchema)]
pub struct ReportParams {
    /// ID of a habit to add its period-by-period history (optional)
    pub habit_id: Option<String>,
    /// How many habits the top list holds (default: 5)
    pub top: Option<usize>,
}

/// Short description of a habit inside a report
#[derive(Debug, Serialize)]
pub struct HabitBrief {
    pub habit_id: String,
    pub name: String,
    pub cadence: Cadence,
    pub status: HabitStatus,
    pub last_streak: u32,
    pub best_streak: u32,
}

impl From<&Habit> for HabitBrief {
    fn from(habit: &Habit) -> Self {
        Self {
            habit_id: habit.id.to_string(),
            name: habit.name.clone(),
            cadence: habit.cadence,
            status: habit.status,
            last_streak: habit.last_streak,
            best_streak: habit.best_streak,
        }
    }
}

/// Completed days within one period
#[derive(Debug, Serialize)]
pub struct PeriodCount {
    pub period: String,
    pub completions: u32,
}

/// History of a single habit
#[derive(Debug, Serialize)]
pub struct HabitHistory {
    pub habit: HabitBrief,
    pub best_streak_ever: u32,
    pub periods: Vec<PeriodCount>,
}

/// Response from the report tool
#[derive(Debug, Serialize)]
pub struct ReportResponse {
    pub by_cadence: BTreeMap<Cadence, Vec<HabitBrief>>,
    pub longest_streak: Vec<HabitBrief>,
    pub status_breakdown: BTreeMap<HabitStatus, usize>,
    pub top_habits: Vec<HabitBrief>,
    pub completions: CompletionCounts,
    pub trend: Vec<(NaiveDate, u32)>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub habit: Option<HabitHistory>,
    pub message: String,
}

/// Build a report over every habit, plus one habit's history if asked
pub fn get_habit_report<S: HabitStorage>(
    storage: &S,
    engine: &StreakEngine,
    params: ReportParams,
) -> Result<ReportResponse, ToolError> {
    let habit_id = params.habit_id.as_deref().map(parse_habit_id).transpose()?;
    let top = params.top.unwrap_or(DEFAULT_TOP_N);

    let habits = storage.list_habits(None, None)?;
    let completions = storage.completion_counts()?;
    let trend = storage.completion_trend()?;

    let habit = match habit_id {
        Some(id) => {
            let habit = storage.get_habit(&id)?;
            let log = storage.load_completions(&id)?;
            let periods = report::completion_history(&log, habit.cadence)
                .into_iter()
                .map(|(period, completions)| PeriodCount {
                    period: period.to_string(),
                    completions,
                })
                .collect();
            Some(HabitHistory {
                best_streak_ever: engine.best_streak_ever(&habit, &log),
                habit: HabitBrief::from(&habit),
                periods,
            })
        }
        None => None,
    };

    let by_cadence: BTreeMap<Cadence, Vec<HabitBrief>> = report::habits_by_cadence(&habits)
        .into_iter()
        .map(|(cadence, group)| (cadence, group.into_iter().map(HabitBrief::from).collect()))
        .collect();
    let longest_streak: Vec<HabitBrief> = report::habits_with_longest_streak(&habits)
        .into_iter()
        .map(HabitBrief::from)
        .collect();
    let top_habits: Vec<HabitBrief> = report::top_by_best_streak(&habits, top)
        .into_iter()
        .map(HabitBrief::from)
        .collect();
    let status_breakdown = report::status_breakdown(&habits);

    let message = render_message(&habits, &longest_streak, &status_breakdown, completions, habit.as_ref());

    Ok(ReportResponse {
        by_cadence,
        longest_streak,
        status_breakdown,
        top_habits,
        completions,
        trend,
        habit,
        message,
    })
}

fn render_message(
    habits: &[Habit],
    longest: &[HabitBrief],
    breakdown: &BTreeMap<HabitStatus, usize>,
    completions: CompletionCounts,
    history: Option<&HabitHistory>,
) -> String {
    if habits.is_empty() {
        return "Start by creating your first habit to track!".to_string();
    }

    let statuses: Vec<String> = breakdown
        .iter()
        .map(|(status, count)| format!("{} {}", count, status))
        .collect();
    let mut lines = vec![
        format!("📋 **Habit Report** ({} habits: {})", habits.len(), statuses.join(", ")),
        format!(
            "✅ Completions: {} total, {} on active habits, {} on others",
            completions.total, completions.active, completions.other
        ),
    ];

    if !longest.is_empty() {
        let holders: Vec<String> = longest
            .iter()
            .map(|h| format!("{} ({})", h.name, streak_label(h.best_streak, h.cadence)))
            .collect();
        lines.push(format!("🏆 Longest streak: {}", holders.join(", ")));
    }

    if let Some(history) = history {
        lines.push(format!(
            "📈 {}: best streak ever {}, completed in {} period(s)",
            history.habit.name,
            streak_label(history.best_streak_ever, history.habit.cadence),
            history.periods.len()
        ));
    }

    lines.join("\n")
}
