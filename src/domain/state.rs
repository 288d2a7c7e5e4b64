/// Habit status state machine and streak dispatch
///
/// `StreakEngine` decides, per habit status, whether the current streak is
/// computed live, returned frozen or forced to zero, and applies the rules for
/// status and cadence edits. It works on passed-in data only: the caller loads
/// the habit and its completion log, and persists whatever the engine changed.

use chrono::NaiveDate;
use serde::Serialize;
use tracing::{debug, info};

use crate::domain::{
    dedupe_by_period, period_of, AnchorRule, Cadence, Completion, CompletionLog, Habit,
    HabitStatus, Streak, StreakCalculator,
};

/// Result of a status transition
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusChange {
    pub from: HabitStatus,
    pub to: HabitStatus,
    /// Completions soft-deleted by the transition (today's, when deactivating)
    pub retracted: Vec<Completion>,
}

/// A requested change of cadence and/or status
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HabitEdit {
    pub cadence: Option<Cadence>,
    pub status: Option<HabitStatus>,
}

/// What applying a `HabitEdit` did
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EditOutcome {
    pub cadence_changed: bool,
    pub status_change: Option<StatusChange>,
}

impl EditOutcome {
    /// Completions that must be persisted after the edit
    pub fn retracted(&self) -> &[Completion] {
        self.status_change
            .as_ref()
            .map(|change| change.retracted.as_slice())
            .unwrap_or(&[])
    }
}

/// Streak engine for a single habit at a time
#[derive(Debug, Clone, Copy, Default)]
pub struct StreakEngine {
    calculator: StreakCalculator,
}

impl StreakEngine {
    pub fn new(anchor: AnchorRule) -> Self {
        Self {
            calculator: StreakCalculator::new(anchor),
        }
    }

    pub fn anchor(&self) -> AnchorRule {
        self.calculator.anchor()
    }

    /// Live streak from the completion history, ignoring status
    ///
    /// Completions after `today` and before the habit's `reset_on` day do not
    /// take part in the walk.
    pub fn live_streak(&self, habit: &Habit, log: &CompletionLog, today: NaiveDate) -> u32 {
        let dates = counted_dates(habit, log, today);
        let periods = dedupe_by_period(&dates, habit.cadence);
        self.calculator.current_streak(&periods, period_of(today, habit.cadence))
    }

    /// Run ending at the latest counted completion
    ///
    /// This is the value a pause freezes, measured with the habit's current
    /// cadence and independent of how long ago the habit was paused.
    fn frozen_streak(&self, habit: &Habit, log: &CompletionLog, today: NaiveDate) -> u32 {
        let dates = counted_dates(habit, log, today);
        let Some(last) = dates.last() else {
            return 0;
        };
        let periods = dedupe_by_period(&dates, habit.cadence);
        self.calculator.current_streak(&periods, period_of(*last, habit.cadence))
    }

    /// Current streak for the habit's status
    ///
    /// - inactive: 0, and `last_streak` is forced to 0
    /// - paused: the stored `last_streak`, untouched
    /// - active: computed live; `last_streak` is overwritten and `best_streak`
    ///   raised to cover both the live value and the history's best run
    pub fn current_streak(&self, habit: &mut Habit, log: &CompletionLog, today: NaiveDate) -> u32 {
        match habit.status {
            HabitStatus::Inactive => {
                habit.last_streak = 0;
                0
            }
            HabitStatus::Paused => habit.last_streak,
            HabitStatus::Active => {
                let streak = self.live_streak(habit, log, today);
                habit.record_streak(streak);
                habit.raise_best(self.best_streak_ever(habit, log));
                debug!("Computed {} streak of {} for habit {}", habit.cadence, streak, habit.id);
                streak
            }
        }
    }

    /// Best streak ever, recomputed from every non-deleted completion
    ///
    /// Independent of status and of `reset_on`.
    pub fn best_streak_ever(&self, habit: &Habit, log: &CompletionLog) -> u32 {
        let periods = dedupe_by_period(&log.list_valid(), habit.cadence);
        self.calculator.best_streak(&periods)
    }

    /// Refresh the habit's streaks and summarize them
    pub fn snapshot(&self, habit: &mut Habit, log: &CompletionLog, today: NaiveDate) -> Streak {
        let current_streak = self.current_streak(habit, log, today);
        Streak {
            habit_id: habit.id.clone(),
            current_streak,
            best_streak: habit.best_streak,
            best_streak_ever: self.best_streak_ever(habit, log),
            last_completed: log.last_completed(),
            total_completions: log.valid_count() as u32,
        }
    }

    /// Move the habit to a new status
    ///
    /// - active -> paused: freeze `max(last_streak, live streak)`
    /// - paused -> active: restore `max(last_streak, live streak)`
    /// - any -> inactive: `last_streak = 0`, today's completion is
    ///   soft-deleted and earlier completions stop counting
    /// - inactive -> active / paused: status change only, the old streak is
    ///   not restored
    pub fn transition(
        &self,
        habit: &mut Habit,
        log: &mut CompletionLog,
        to: HabitStatus,
        today: NaiveDate,
    ) -> StatusChange {
        let from = habit.status;
        let mut retracted = Vec::new();

        match (from, to) {
            (from, to) if from == to => {}
            (HabitStatus::Active, HabitStatus::Paused) | (HabitStatus::Paused, HabitStatus::Active) => {
                let live = self.live_streak(habit, log, today);
                let kept = habit.last_streak.max(live);
                habit.record_streak(kept);
            }
            (_, HabitStatus::Inactive) => {
                habit.last_streak = 0;
                habit.reset_on = Some(today);
                retracted = log.soft_delete_on(today);
            }
            // inactive -> active / paused keeps last_streak at 0
            _ => {}
        }

        habit.status = to;
        if from != to {
            info!(
                "Habit {} moved from {} to {} (last streak {}, best {})",
                habit.id, from, to, habit.last_streak, habit.best_streak
            );
        }

        StatusChange { from, to, retracted }
    }

    /// Switch the habit to a new cadence and recompute its stored streak
    ///
    /// Active habits get a live recompute and inactive habits stay at 0.
    /// Paused habits keep their frozen run, re-bucketed under the new cadence:
    /// the run ending at the last completion, however long the pause lasted.
    pub fn change_cadence(
        &self,
        habit: &mut Habit,
        log: &CompletionLog,
        cadence: Cadence,
        today: NaiveDate,
    ) -> u32 {
        let previous = habit.cadence;
        habit.cadence = cadence;

        let streak = match habit.status {
            HabitStatus::Paused => {
                let frozen = self.frozen_streak(habit, log, today);
                habit.record_streak(frozen);
                frozen
            }
            HabitStatus::Active | HabitStatus::Inactive => self.current_streak(habit, log, today),
        };

        if previous != cadence {
            info!(
                "Habit {} cadence changed from {} to {}, streak is now {}",
                habit.id, previous, cadence, streak
            );
        }
        streak
    }

    /// Apply a combined edit: cadence first, then status
    pub fn apply_edit(
        &self,
        habit: &mut Habit,
        log: &mut CompletionLog,
        edit: HabitEdit,
        today: NaiveDate,
    ) -> EditOutcome {
        let mut cadence_changed = false;
        if let Some(cadence) = edit.cadence {
            cadence_changed = cadence != habit.cadence;
            if cadence_changed {
                self.change_cadence(habit, log, cadence, today);
            }
        }

        let status_change = edit
            .status
            .filter(|status| *status != habit.status)
            .map(|status| self.transition(habit, log, status, today));

        habit.heal_streaks();

        EditOutcome {
            cadence_changed,
            status_change,
        }
    }
}

/// Completions that may take part in a current-streak walk
fn counted_dates(habit: &Habit, log: &CompletionLog, today: NaiveDate) -> Vec<NaiveDate> {
    log.list_valid()
        .into_iter()
        .filter(|date| *date <= today)
        .filter(|date| habit.reset_on.map_or(true, |reset| *date >= reset))
        .collect()
}
