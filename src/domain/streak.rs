/// Streak calculation over bucketed periods
///
/// This module holds the `StreakCalculator`, which turns a deduplicated,
/// ascending sequence of periods into a current streak and a best streak, and
/// the `Streak` summary reported back to callers.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use chrono::NaiveDate;
use crate::domain::{is_adjacent, HabitId, PeriodKey};

/// Where the backward walk of the current streak may start
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnchorRule {
    /// Start at the current period if completed, otherwise at the previous
    /// one; a run ending yesterday (or last week/month) is still current
    #[default]
    AllowPrevious,
    /// The current period must be completed, otherwise the streak is 0
    RequireCurrent,
}

/// Computes current and best streaks from ascending, deduplicated periods
#[derive(Debug, Clone, Copy, Default)]
pub struct StreakCalculator {
    anchor: AnchorRule,
}

impl StreakCalculator {
    pub fn new(anchor: AnchorRule) -> Self {
        Self { anchor }
    }

    pub fn anchor(&self) -> AnchorRule {
        self.anchor
    }

    /// Consecutive run of completed periods ending at `current`
    ///
    /// Walks backward from the anchor period while each period is present.
    pub fn current_streak(&self, periods: &[PeriodKey], current: PeriodKey) -> u32 {
        if periods.is_empty() {
            return 0;
        }

        let completed: HashSet<PeriodKey> = periods.iter().copied().collect();

        let mut cursor = if completed.contains(&current) {
            Some(current)
        } else {
            match self.anchor {
                AnchorRule::AllowPrevious => current.previous(),
                AnchorRule::RequireCurrent => None,
            }
        };

        let mut streak = 0;
        while let Some(period) = cursor.filter(|p| completed.contains(p)) {
            streak += 1;
            cursor = period.previous();
        }
        streak
    }

    /// Longest run of adjacent periods anywhere in the history
    pub fn best_streak(&self, periods: &[PeriodKey]) -> u32 {
        let mut iter = periods.iter();
        let Some(mut previous) = iter.next() else {
            return 0;
        };

        let mut best = 1;
        let mut running = 1;
        for period in iter {
            if is_adjacent(*previous, *period) {
                running += 1;
                best = best.max(running);
            } else if period != previous {
                running = 1;
            }
            previous = period;
        }
        best
    }
}

/// Calculated streak information for a habit
///
/// This is the read model handed to collaborators after a streak refresh.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Streak {
    /// Which habit this streak data is for
    pub habit_id: HabitId,
    /// Current streak, live or frozen depending on status
    pub current_streak: u32,
    /// Stored best streak (monotonic)
    pub best_streak: u32,
    /// Best streak recomputed from the full completion history
    pub best_streak_ever: u32,
    /// Most recent non-deleted completion (None if never completed)
    pub last_completed: Option<NaiveDate>,
    /// Number of distinct days with a non-deleted completion
    pub total_completions: u32,
}

impl Streak {
    /// Create an empty streak record for a habit without completions
    pub fn new(habit_id: HabitId) -> Self {
        Self {
            habit_id,
            current_streak: 0,
            best_streak: 0,
            best_streak_ever: 0,
            last_completed: None,
            total_completions: 0,
        }
    }

    /// Get a motivational message based on current streak status
    pub fn motivational_message(&self) -> String {
        match self.current_streak {
            0 => "Ready to start your streak! Every journey begins with a single step.".to_string(),
            1 => "Great start! Keep the momentum going.".to_string(),
            2..=6 => format!("Nice work! {} in a row. You're building a strong habit.", self.current_streak),
            7..=29 => format!("Excellent! {} in a row. You're in the groove now!", self.current_streak),
            _ => format!("Legendary! {} in a row. You're an inspiration!", self.current_streak),
        }
    }
}
