/// Core types and enums used throughout the domain layer
///
/// This module defines the identifier newtypes together with the two closed
/// enums that drive streak semantics: `Cadence` and `HabitStatus`.

use std::fmt;
use std::str::FromStr;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::DomainError;

/// Unique identifier for a habit
///
/// This is a wrapper around UUID to provide type safety - you can't accidentally
/// pass a habit ID where a completion ID is expected.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HabitId(pub Uuid);

impl HabitId {
    /// Generate a new random habit ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse a habit ID from its text form (useful for tool input and database loading)
    pub fn from_string(s: &str) -> Result<Self, DomainError> {
        Uuid::parse_str(s.trim())
            .map(Self)
            .map_err(|_| DomainError::InvalidId(s.to_string()))
    }
}

impl Default for HabitId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for HabitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Unique identifier for a single completion record
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CompletionId(pub Uuid);

impl CompletionId {
    /// Generate a new random completion ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse a completion ID from its text form
    pub fn from_string(s: &str) -> Result<Self, DomainError> {
        Uuid::parse_str(s.trim())
            .map(Self)
            .map_err(|_| DomainError::InvalidId(s.to_string()))
    }
}

impl Default for CompletionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for CompletionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// How often a habit is expected to be repeated
///
/// The cadence decides how completion dates are bucketed into periods
/// before streaks are counted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Cadence {
    /// One period per calendar day
    Daily,
    /// One period per ISO week (Monday to Sunday)
    Weekly,
    /// One period per calendar month
    Monthly,
}

impl Cadence {
    pub const ALL: [Cadence; 3] = [Cadence::Daily, Cadence::Weekly, Cadence::Monthly];

    /// Canonical lowercase name, also used as the storage representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Cadence::Daily => "daily",
            Cadence::Weekly => "weekly",
            Cadence::Monthly => "monthly",
        }
    }

    /// Unit used when talking about a streak of this cadence
    pub fn unit(&self, count: u32) -> &'static str {
        match (self, count) {
            (Cadence::Daily, 1) => "day",
            (Cadence::Daily, _) => "days",
            (Cadence::Weekly, 1) => "week",
            (Cadence::Weekly, _) => "weeks",
            (Cadence::Monthly, 1) => "month",
            (Cadence::Monthly, _) => "months",
        }
    }
}

impl fmt::Display for Cadence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Cadence {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "daily" => Ok(Cadence::Daily),
            "weekly" => Ok(Cadence::Weekly),
            "monthly" => Ok(Cadence::Monthly),
            _ => Err(DomainError::InvalidCadence(s.to_string())),
        }
    }
}

/// Tracking status of a habit
///
/// - `Active`: streaks are computed live from the completion history
/// - `Paused`: the last streak is frozen and returned verbatim
/// - `Inactive`: the streak is reset to zero and stays there
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum HabitStatus {
    Active,
    Paused,
    Inactive,
}

impl HabitStatus {
    pub const ALL: [HabitStatus; 3] = [HabitStatus::Active, HabitStatus::Paused, HabitStatus::Inactive];

    /// Canonical lowercase name, also used as the storage representation
    pub fn as_str(&self) -> &'static str {
        match self {
            HabitStatus::Active => "active",
            HabitStatus::Paused => "paused",
            HabitStatus::Inactive => "inactive",
        }
    }
}

impl Default for HabitStatus {
    fn default() -> Self {
        HabitStatus::Active
    }
}

impl fmt::Display for HabitStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HabitStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "active" => Ok(HabitStatus::Active),
            "paused" => Ok(HabitStatus::Paused),
            "inactive" => Ok(HabitStatus::Inactive),
            _ => Err(DomainError::InvalidStatus(s.to_string())),
        }
    }
}
