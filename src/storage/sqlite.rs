/// SQLite implementation of the habit storage interface
///
/// This module provides the concrete SQLite implementation for storing
/// and retrieving habits and completions. It handles all SQL queries and
/// conversion between rows and domain types.

use std::path::Path;

use chrono::NaiveDate;
use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use rusqlite::{params, Connection, ErrorCode, OptionalExtension, Row, Transaction, TransactionBehavior};

use crate::domain::{
    Cadence, Completion, CompletionId, CompletionLog, Habit, HabitId, HabitStatus,
};
use crate::report::CompletionCounts;
use crate::storage::{migrations, HabitStorage, StorageError};

const HABIT_COLUMNS: &str =
    "id, name, description, cadence, status, last_streak, best_streak, created_at, reset_on";

const COMPLETION_COLUMNS: &str = "id, habit_id, completion_date, deleted, recorded_at";

/// SQLite-based storage implementation
///
/// This struct holds a connection to the SQLite database and implements
/// all the storage operations defined in the HabitStorage trait.
pub struct SqliteStorage {
    conn: Connection,
}

impl SqliteStorage {
    /// Create a new SQLite storage instance
    ///
    /// This opens the database file and runs any necessary migrations
    /// to ensure the schema is up to date.
    pub fn new(db_path: impl AsRef<Path>) -> Result<Self, StorageError> {
        let db_path = db_path.as_ref();
        let conn = Connection::open(db_path)
            .map_err(|e| StorageError::Connection(format!("Failed to open database: {}", e)))?;

        let storage = Self::with_connection(conn)?;
        tracing::info!("SQLite storage initialized at: {:?}", db_path);
        Ok(storage)
    }

    /// Open a private in-memory database (useful for testing)
    pub fn open_in_memory() -> Result<Self, StorageError> {
        let conn = Connection::open_in_memory()
            .map_err(|e| StorageError::Connection(format!("Failed to open in-memory database: {}", e)))?;
        Self::with_connection(conn)
    }

    fn with_connection(conn: Connection) -> Result<Self, StorageError> {
        // Completions cascade with their habit
        conn.execute("PRAGMA foreign_keys = ON", [])
            .map_err(|e| StorageError::Connection(format!("Failed to enable foreign keys: {}", e)))?;

        migrations::initialize_database(&conn)?;
        Ok(Self { conn })
    }

    fn habit_from_row(row: &Row<'_>) -> rusqlite::Result<Habit> {
        Ok(Habit::from_existing(
            row.get(0)?, // id
            row.get(1)?, // name
            row.get(2)?, // description
            row.get(3)?, // cadence
            row.get(4)?, // status
            row.get(5)?, // last_streak
            row.get(6)?, // best_streak
            row.get(7)?, // created_at
            row.get(8)?, // reset_on
        ))
    }

    fn completion_from_row(row: &Row<'_>) -> rusqlite::Result<Completion> {
        Ok(Completion::from_existing(
            row.get(0)?, // id
            row.get(1)?, // habit_id
            row.get(2)?, // completion_date
            row.get(3)?, // deleted
            row.get(4)?, // recorded_at
        ))
    }

    fn habit_not_found(habit_id: &HabitId) -> StorageError {
        StorageError::HabitNotFound {
            habit_id: habit_id.to_string(),
        }
    }
}

impl HabitStorage for SqliteStorage {
    /// Create a new habit in the database
    fn create_habit(&self, habit: &Habit) -> Result<(), StorageError> {
        self.conn.execute(
            &format!("INSERT INTO habits ({}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)", HABIT_COLUMNS),
            params![
                habit.id,
                habit.name,
                habit.description,
                habit.cadence,
                habit.status,
                habit.last_streak,
                habit.best_streak,
                habit.created_at,
                habit.reset_on,
            ],
        )?;

        tracing::debug!("Created habit: {} ({})", habit.name, habit.id);
        Ok(())
    }

    /// Get a habit by its ID
    fn get_habit(&self, habit_id: &HabitId) -> Result<Habit, StorageError> {
        self.conn
            .query_row(
                &format!("SELECT {} FROM habits WHERE id = ?1", HABIT_COLUMNS),
                params![habit_id],
                Self::habit_from_row,
            )
            .optional()?
            .ok_or_else(|| Self::habit_not_found(habit_id))
    }

    /// Update an existing habit
    fn update_habit(&self, habit: &Habit) -> Result<(), StorageError> {
        let rows_affected = self.conn.execute(
            "UPDATE habits SET
                name = ?2,
                description = ?3,
                cadence = ?4,
                status = ?5,
                last_streak = ?6,
                best_streak = ?7,
                reset_on = ?8
             WHERE id = ?1",
            params![
                habit.id,
                habit.name,
                habit.description,
                habit.cadence,
                habit.status,
                habit.last_streak,
                habit.best_streak,
                habit.reset_on,
            ],
        )?;

        if rows_affected == 0 {
            return Err(Self::habit_not_found(&habit.id));
        }

        tracing::debug!(
            "Updated habit: {} ({}) last streak {} best {}",
            habit.name, habit.id, habit.last_streak, habit.best_streak
        );
        Ok(())
    }

    /// Delete a habit; its completions go with it
    fn delete_habit(&self, habit_id: &HabitId) -> Result<(), StorageError> {
        let rows_affected = self.conn.execute(
            "DELETE FROM habits WHERE id = ?1",
            params![habit_id],
        )?;

        if rows_affected == 0 {
            return Err(Self::habit_not_found(habit_id));
        }

        tracing::debug!("Deleted habit: {}", habit_id);
        Ok(())
    }

    /// List habits with optional filtering
    fn list_habits(
        &self,
        cadence: Option<Cadence>,
        status: Option<HabitStatus>,
    ) -> Result<Vec<Habit>, StorageError> {
        let mut sql = format!("SELECT {} FROM habits WHERE 1 = 1", HABIT_COLUMNS);
        let mut args: Vec<&dyn ToSql> = Vec::new();

        if let Some(ref cadence) = cadence {
            args.push(cadence);
            sql.push_str(&format!(" AND cadence = ?{}", args.len()));
        }
        if let Some(ref status) = status {
            args.push(status);
            sql.push_str(&format!(" AND status = ?{}", args.len()));
        }
        sql.push_str(" ORDER BY name COLLATE NOCASE, created_at");

        let mut stmt = self.conn.prepare(&sql)?;
        let habits = stmt
            .query_map(args.as_slice(), Self::habit_from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(habits)
    }

    /// Load the completion log of a habit
    fn load_completions(&self, habit_id: &HabitId) -> Result<CompletionLog, StorageError> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM completions WHERE habit_id = ?1 ORDER BY completion_date",
            COMPLETION_COLUMNS
        ))?;

        let entries = stmt
            .query_map(params![habit_id], Self::completion_from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(CompletionLog::from_entries(habit_id.clone(), entries))
    }

    /// Insert or update a completion
    fn save_completion(&self, completion: &Completion) -> Result<(), StorageError> {
        let result = self.conn.execute(
            &format!(
                "INSERT INTO completions ({}) VALUES (?1, ?2, ?3, ?4, ?5)
                 ON CONFLICT (id) DO UPDATE SET deleted = excluded.deleted",
                COMPLETION_COLUMNS
            ),
            params![
                completion.id,
                completion.habit_id,
                completion.completion_date,
                completion.deleted,
                completion.recorded_at,
            ],
        );

        match result {
            Ok(_) => {
                tracing::debug!(
                    "Saved completion {} for habit {} on {} (deleted: {})",
                    completion.id, completion.habit_id, completion.completion_date, completion.deleted
                );
                Ok(())
            }
            Err(rusqlite::Error::SqliteFailure(err, _)) if err.code == ErrorCode::ConstraintViolation => {
                // Either the owning habit is gone or the day is already taken
                let habit_exists: bool = self.conn.query_row(
                    "SELECT EXISTS (SELECT 1 FROM habits WHERE id = ?1)",
                    params![completion.habit_id],
                    |row| row.get(0),
                )?;
                if habit_exists {
                    Err(StorageError::DuplicateCompletion {
                        habit_id: completion.habit_id.to_string(),
                        date: completion.completion_date,
                    })
                } else {
                    Err(Self::habit_not_found(&completion.habit_id))
                }
            }
            Err(e) => Err(StorageError::Query(e)),
        }
    }

    fn completion_counts(&self) -> Result<CompletionCounts, StorageError> {
        let (total, active): (u32, u32) = self.conn.query_row(
            "SELECT COUNT(*),
                    COALESCE(SUM(CASE WHEN h.status = 'active' THEN 1 ELSE 0 END), 0)
             FROM completions c
             JOIN habits h ON h.id = c.habit_id
             WHERE c.deleted = 0",
            [],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )?;

        Ok(CompletionCounts {
            total,
            active,
            other: total - active,
        })
    }

    fn completion_trend(&self) -> Result<Vec<(NaiveDate, u32)>, StorageError> {
        let mut stmt = self.conn.prepare(
            "SELECT completion_date, COUNT(*)
             FROM completions
             WHERE deleted = 0
             GROUP BY completion_date
             ORDER BY completion_date",
        )?;

        let trend = stmt
            .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(trend)
    }

    fn atomically<T, E, F>(&self, f: F) -> Result<T, E>
    where
        Self: Sized,
        E: From<StorageError>,
        F: FnOnce(&Self) -> Result<T, E>,
    {
        // IMMEDIATE takes the write lock up front; dropping without commit rolls back
        let tx = Transaction::new_unchecked(&self.conn, TransactionBehavior::Immediate)
            .map_err(StorageError::from)?;
        let value = f(self)?;
        tx.commit().map_err(StorageError::from)?;
        Ok(value)
    }
}

// Column conversions for domain types

impl ToSql for HabitId {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.0.to_string()))
    }
}

impl FromSql for HabitId {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        HabitId::from_string(value.as_str()?).map_err(|e| FromSqlError::Other(Box::new(e)))
    }
}

impl ToSql for CompletionId {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.0.to_string()))
    }
}

impl FromSql for CompletionId {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        CompletionId::from_string(value.as_str()?).map_err(|e| FromSqlError::Other(Box::new(e)))
    }
}

impl ToSql for Cadence {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for Cadence {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value.as_str()?.parse().map_err(|e| FromSqlError::Other(Box::new(e)))
    }
}

impl ToSql for HabitStatus {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for HabitStatus {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value.as_str()?.parse().map_err(|e| FromSqlError::Other(Box::new(e)))
    }
}
