/// Cadence bucketing: mapping dates to periods
///
/// A period is one day, one ISO week or one calendar month depending on the
/// habit's cadence. Streaks are counted over periods, so two completions in
/// the same period count once.

use std::collections::HashSet;
use std::fmt;

use chrono::{Datelike, Days, NaiveDate, Weekday};
use serde::Serialize;

use crate::domain::Cadence;

/// Identifier of one period under a cadence
///
/// Keys of the same cadence order chronologically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum PeriodKey {
    Day { date: NaiveDate },
    Week { iso_year: i32, week: u32 },
    Month { year: i32, month: u32 },
}

impl PeriodKey {
    /// Cadence this key was bucketed under
    pub fn cadence(&self) -> Cadence {
        match self {
            PeriodKey::Day { .. } => Cadence::Daily,
            PeriodKey::Week { .. } => Cadence::Weekly,
            PeriodKey::Month { .. } => Cadence::Monthly,
        }
    }

    /// First day belonging to this period
    pub fn start(&self) -> Option<NaiveDate> {
        match *self {
            PeriodKey::Day { date } => Some(date),
            PeriodKey::Week { iso_year, week } => NaiveDate::from_isoywd_opt(iso_year, week, Weekday::Mon),
            PeriodKey::Month { year, month } => NaiveDate::from_ymd_opt(year, month, 1),
        }
    }

    /// The period immediately after this one
    ///
    /// Weeks step through the Monday of the ISO week, so years with 53 ISO
    /// weeks roll over correctly. `None` only at the edges of the calendar.
    pub fn next(&self) -> Option<PeriodKey> {
        match *self {
            PeriodKey::Day { date } => date.succ_opt().map(|date| PeriodKey::Day { date }),
            PeriodKey::Week { .. } => self
                .start()?
                .checked_add_days(Days::new(7))
                .map(week_of),
            PeriodKey::Month { year, month } => Some(if month == 12 {
                PeriodKey::Month { year: year.checked_add(1)?, month: 1 }
            } else {
                PeriodKey::Month { year, month: month + 1 }
            }),
        }
    }

    /// The period immediately before this one
    pub fn previous(&self) -> Option<PeriodKey> {
        match *self {
            PeriodKey::Day { date } => date.pred_opt().map(|date| PeriodKey::Day { date }),
            PeriodKey::Week { .. } => self
                .start()?
                .checked_sub_days(Days::new(7))
                .map(week_of),
            PeriodKey::Month { year, month } => Some(if month == 1 {
                PeriodKey::Month { year: year.checked_sub(1)?, month: 12 }
            } else {
                PeriodKey::Month { year, month: month - 1 }
            }),
        }
    }
}

impl fmt::Display for PeriodKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PeriodKey::Day { date } => write!(f, "{}", date.format("%Y-%m-%d")),
            PeriodKey::Week { iso_year, week } => write!(f, "{}-W{:02}", iso_year, week),
            PeriodKey::Month { year, month } => write!(f, "{}-{:02}", year, month),
        }
    }
}

fn week_of(date: NaiveDate) -> PeriodKey {
    let iso = date.iso_week();
    PeriodKey::Week { iso_year: iso.year(), week: iso.week() }
}

/// Bucket a date into its period under `cadence`
pub fn period_of(date: NaiveDate, cadence: Cadence) -> PeriodKey {
    match cadence {
        Cadence::Daily => PeriodKey::Day { date },
        Cadence::Weekly => week_of(date),
        Cadence::Monthly => PeriodKey::Month { year: date.year(), month: date.month() },
    }
}

/// True iff `second` is exactly the period after `first`
pub fn is_adjacent(first: PeriodKey, second: PeriodKey) -> bool {
    first.next() == Some(second)
}

/// Bucket ordered dates and collapse dates sharing a period
///
/// Order is preserved and the first occurrence of each period is kept.
pub fn dedupe_by_period(dates: &[NaiveDate], cadence: Cadence) -> Vec<PeriodKey> {
    let mut seen = HashSet::new();
    dates
        .iter()
        .map(|&date| period_of(date, cadence))
        .filter(|period| seen.insert(*period))
        .collect()
}
