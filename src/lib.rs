/// Public library interface for the habit streak engine
///
/// This module exports the streak engine, its storage layer, the tools built
/// on top of both and the MCP server that serves those tools.

use thiserror::Error;

pub mod config;
pub mod domain;
pub mod storage;
pub mod report;
pub mod tools;
pub mod mcp;

// Re-export public modules and types
pub use config::TrackerConfig;
pub use domain::*;
pub use storage::{HabitStorage, SqliteStorage, StorageError};
pub use tools::ToolError;

/// Errors that can occur during server operation
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("Database error: {0}")]
    Database(#[from] StorageError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Habit tracker server that implements the MCP protocol
///
/// Owns the SQLite storage and the streak engine configured with the
/// anchor rule from `TrackerConfig`.
pub struct HabitTrackerServer {
    storage: SqliteStorage,
    engine: StreakEngine,
}

impl HabitTrackerServer {
    /// Create a server from configuration
    ///
    /// This will initialize the SQLite database with the required schema
    /// if it doesn't already exist.
    pub async fn new(config: TrackerConfig) -> Result<Self, ServerError> {
        tracing::info!(
            "Initializing habit tracker with database {:?} and anchor rule {:?}",
            config.database_path, config.anchor
        );

        config.prepare_database_dir()?;
        let storage = SqliteStorage::new(&config.database_path)?;

        Ok(Self::with_storage(storage, StreakEngine::new(config.anchor)))
    }

    /// Create a server around an already opened storage
    pub fn with_storage(storage: SqliteStorage, engine: StreakEngine) -> Self {
        Self { storage, engine }
    }

    /// Run the MCP server, handling JSON-RPC requests over stdin/stdout
    ///
    /// This method will block until stdin is closed or an error occurs.
    pub async fn run(self) -> Result<(), ServerError> {
        let habits = self.storage.list_habits(None, None)?;
        tracing::info!("Server started, found {} existing habits", habits.len());

        let mut mcp_server = mcp::McpServer::new(self);
        mcp_server.run().await?;

        Ok(())
    }

    /// Get a reference to the storage layer
    pub fn storage(&self) -> &SqliteStorage {
        &self.storage
    }

    /// Get a reference to the streak engine
    pub fn engine(&self) -> &StreakEngine {
        &self.engine
    }
}
