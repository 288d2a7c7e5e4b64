/// Completion records and the per-habit completion log
///
/// A `Completion` marks a habit as done on one calendar day. Completions are
/// never hard-deleted through normal flows; they are soft-deleted so history
/// stays available for auditing and for recomputing the best streak.

use serde::{Deserialize, Serialize};
use chrono::{DateTime, NaiveDate, Utc};
use crate::domain::{CompletionId, HabitId};

/// A record of completing a habit on a specific day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Completion {
    /// Unique identifier for this completion
    pub id: CompletionId,
    /// Which habit this completion belongs to
    pub habit_id: HabitId,
    /// Which day this completion was for
    pub completion_date: NaiveDate,
    /// Soft-delete flag
    pub deleted: bool,
    /// When this completion was written
    pub recorded_at: DateTime<Utc>,
}

impl Completion {
    /// Create a new, non-deleted completion for the given day
    pub fn new(habit_id: HabitId, completion_date: NaiveDate) -> Self {
        Self {
            id: CompletionId::new(),
            habit_id,
            completion_date,
            deleted: false,
            recorded_at: Utc::now(),
        }
    }

    /// Create a completion from existing data (used when loading from database)
    pub fn from_existing(
        id: CompletionId,
        habit_id: HabitId,
        completion_date: NaiveDate,
        deleted: bool,
        recorded_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            habit_id,
            completion_date,
            deleted,
            recorded_at,
        }
    }

    /// Whether this completion counts towards streaks
    pub fn is_valid(&self) -> bool {
        !self.deleted
    }
}

/// What `CompletionLog::record` did
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordOutcome {
    /// A new completion was created
    Created,
    /// A soft-deleted completion for that day was restored
    Restored,
    /// The day was already completed; nothing changed
    AlreadyRecorded,
}

impl RecordOutcome {
    /// Whether the returned completion needs to be persisted
    pub fn is_write(&self) -> bool {
        !matches!(self, RecordOutcome::AlreadyRecorded)
    }
}

/// All completions of one habit, deleted ones included
///
/// The log keeps at most one non-deleted completion per calendar day:
/// recording an already completed day is a no-op, and recording a day whose
/// completion was soft-deleted restores it instead of adding a second entry.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionLog {
    habit_id: HabitId,
    entries: Vec<Completion>,
}

impl CompletionLog {
    /// Create an empty log for a habit
    pub fn new(habit_id: HabitId) -> Self {
        Self {
            habit_id,
            entries: Vec::new(),
        }
    }

    /// Build a log from stored completions, ordered by date
    pub fn from_entries(habit_id: HabitId, mut entries: Vec<Completion>) -> Self {
        entries.retain(|c| c.habit_id == habit_id);
        entries.sort_by(|a, b| a.completion_date.cmp(&b.completion_date));
        Self { habit_id, entries }
    }

    pub fn habit_id(&self) -> &HabitId {
        &self.habit_id
    }

    /// Every entry, deleted ones included, ascending by date
    pub fn entries(&self) -> &[Completion] {
        &self.entries
    }

    /// Non-deleted completion days, ascending, each day at most once
    pub fn list_valid(&self) -> Vec<NaiveDate> {
        let mut dates: Vec<NaiveDate> = self.entries
            .iter()
            .filter(|c| c.is_valid())
            .map(|c| c.completion_date)
            .collect();
        dates.sort();
        dates.dedup();
        dates
    }

    /// Non-deleted completion days, newest first
    pub fn list_valid_desc(&self) -> Vec<NaiveDate> {
        let mut dates = self.list_valid();
        dates.reverse();
        dates
    }

    /// Number of distinct days with a non-deleted completion
    pub fn valid_count(&self) -> usize {
        self.list_valid().len()
    }

    /// Most recent non-deleted completion day
    pub fn last_completed(&self) -> Option<NaiveDate> {
        self.list_valid().last().copied()
    }

    /// Whether the given day holds a non-deleted completion
    pub fn is_completed_on(&self, date: NaiveDate) -> bool {
        self.entries
            .iter()
            .any(|c| c.completion_date == date && c.is_valid())
    }

    /// Mark the habit done on `date`
    ///
    /// Returns the affected completion together with what happened to it.
    /// Calling this repeatedly for the same day never creates a second entry.
    pub fn record(&mut self, date: NaiveDate) -> (Completion, RecordOutcome) {
        if let Some(existing) = self.entries
            .iter()
            .find(|c| c.completion_date == date && c.is_valid())
        {
            return (existing.clone(), RecordOutcome::AlreadyRecorded);
        }

        if let Some(deleted) = self.entries
            .iter_mut()
            .find(|c| c.completion_date == date)
        {
            deleted.deleted = false;
            return (deleted.clone(), RecordOutcome::Restored);
        }

        let completion = Completion::new(self.habit_id.clone(), date);
        let position = self.entries.partition_point(|c| c.completion_date <= date);
        self.entries.insert(position, completion.clone());
        (completion, RecordOutcome::Created)
    }

    /// Soft-delete the completion on `date`, if there is a live one
    ///
    /// Returns the completions that changed so the caller can persist them.
    pub fn soft_delete_on(&mut self, date: NaiveDate) -> Vec<Completion> {
        self.entries
            .iter_mut()
            .filter(|c| c.completion_date == date && c.is_valid())
            .map(|c| {
                c.deleted = true;
                c.clone()
            })
            .collect()
    }
}
