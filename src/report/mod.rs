/// Read-only aggregations over persisted habits and completions
///
/// These are the reporting queries: grouping by cadence, the habits holding
/// the longest streak, status breakdowns and per-period completion history.
/// Nothing here writes; streak values are whatever the engine last stored.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::domain::{period_of, Cadence, CompletionLog, Habit, HabitStatus, PeriodKey};

/// How many habits the "top" list holds by default
pub const DEFAULT_TOP_N: usize = 5;

/// Non-deleted completion counts, split by the owning habit's status
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CompletionCounts {
    /// Every non-deleted completion
    pub total: u32,
    /// Completions of habits that are currently active
    pub active: u32,
    /// Completions of paused or inactive habits
    pub other: u32,
}

/// Group habits by cadence, keeping each group in input order
pub fn habits_by_cadence(habits: &[Habit]) -> BTreeMap<Cadence, Vec<&Habit>> {
    let mut groups: BTreeMap<Cadence, Vec<&Habit>> = BTreeMap::new();
    for habit in habits {
        groups.entry(habit.cadence).or_default().push(habit);
    }
    groups
}

/// Habits whose best streak equals the maximum best streak
///
/// Empty when no habit has a streak yet.
pub fn habits_with_longest_streak(habits: &[Habit]) -> Vec<&Habit> {
    let longest = habits.iter().map(|h| h.best_streak).max().unwrap_or(0);
    if longest == 0 {
        return Vec::new();
    }

    habits.iter().filter(|h| h.best_streak == longest).collect()
}

/// Number of habits per status; every status is present, possibly with 0
pub fn status_breakdown(habits: &[Habit]) -> BTreeMap<HabitStatus, usize> {
    let mut breakdown: BTreeMap<HabitStatus, usize> =
        HabitStatus::ALL.iter().map(|status| (*status, 0)).collect();
    for habit in habits {
        *breakdown.entry(habit.status).or_default() += 1;
    }
    breakdown
}

/// The `n` habits with the highest best streak, ties broken by name
pub fn top_by_best_streak(habits: &[Habit], n: usize) -> Vec<&Habit> {
    let mut ranked: Vec<&Habit> = habits.iter().collect();
    ranked.sort_by(|a, b| {
        b.best_streak
            .cmp(&a.best_streak)
            .then_with(|| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
    });
    ranked.truncate(n);
    ranked
}

/// Completed days per period under `cadence`, oldest period first
///
/// Only periods holding at least one non-deleted completion are listed.
pub fn completion_history(log: &CompletionLog, cadence: Cadence) -> Vec<(PeriodKey, u32)> {
    let mut history: BTreeMap<PeriodKey, u32> = BTreeMap::new();
    for date in log.list_valid() {
        *history.entry(period_of(date, cadence)).or_default() += 1;
    }
    history.into_iter().collect()
}
