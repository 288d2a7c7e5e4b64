/// Runtime configuration of the habit tracker
///
/// The command line fills a `TrackerConfig`; everything below the binary
/// receives its settings from there instead of reading flags or the
/// environment itself.

use std::io;
use std::path::{Path, PathBuf};

use crate::domain::AnchorRule;

const DATA_DIR_NAME: &str = "habit_streaks";
const DATABASE_FILE: &str = "habits.db";

/// Settings for one server instance
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackerConfig {
    /// SQLite database file
    pub database_path: PathBuf,
    /// Where the current streak may be anchored
    pub anchor: AnchorRule,
}

impl TrackerConfig {
    /// Configuration with the default anchor rule
    pub fn new(database_path: impl Into<PathBuf>) -> Self {
        Self {
            database_path: database_path.into(),
            anchor: AnchorRule::default(),
        }
    }

    pub fn with_anchor(mut self, anchor: AnchorRule) -> Self {
        self.anchor = anchor;
        self
    }

    /// Create the parent directory of the database file if it is missing
    pub fn prepare_database_dir(&self) -> io::Result<()> {
        match self.database_path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() && !parent.exists() => {
                std::fs::create_dir_all(parent)
            }
            _ => Ok(()),
        }
    }
}

/// Get the default database path
///
/// Tries the home directory, the platform data directory, the config
/// directory and the working directory in that order, taking the first one
/// that can be written to. Falls back to the temp directory.
pub fn default_database_path() -> io::Result<PathBuf> {
    let candidates = [
        dirs::home_dir().map(|p| p.join(format!(".{}", DATA_DIR_NAME))),
        dirs::data_dir().map(|p| p.join(DATA_DIR_NAME)),
        dirs::config_dir().map(|p| p.join(DATA_DIR_NAME)),
        std::env::current_dir().ok().map(|p| p.join(format!(".{}", DATA_DIR_NAME))),
    ];

    for dir in candidates.iter().flatten() {
        if is_writable_dir(dir) {
            return Ok(dir.join(DATABASE_FILE));
        }
    }

    let temp_dir = std::env::temp_dir().join(DATA_DIR_NAME);
    std::fs::create_dir_all(&temp_dir)?;
    tracing::warn!("Using temporary directory for database: {}", temp_dir.display());
    Ok(temp_dir.join(DATABASE_FILE))
}

fn is_writable_dir(dir: &Path) -> bool {
    if std::fs::create_dir_all(dir).is_err() {
        return false;
    }
    let probe = dir.join(".write_test");
    let writable = std::fs::write(&probe, b"ok").is_ok();
    let _ = std::fs::remove_file(&probe);
    writable
}
