/// Main entry point for the habit streaks MCP server
///
/// This file sets up logging, parses command line arguments, and starts the MCP server.
/// The server listens for JSON-RPC requests over stdin/stdout following the MCP protocol.

use clap::Parser;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

use habit_streaks::config::default_database_path;
use habit_streaks::{AnchorRule, HabitTrackerServer, TrackerConfig};

/// Command line arguments for the habit streaks MCP server
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the SQLite database file
    /// If not provided, uses a default location in the user's home directory
    #[arg(long)]
    database: Option<PathBuf>,

    /// Only count a streak as current when the current day, week or month is completed
    #[arg(long)]
    strict_anchor: bool,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,

    /// Enable verbose output (implies debug)
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let log_level = if args.verbose {
        "debug"
    } else if args.debug {
        "info"
    } else {
        "warn"
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(format!("habit_streaks={}", log_level)))
        .with_writer(std::io::stderr) // stdout carries the protocol
        .init();

    info!("Starting habit streaks MCP server");

    let database_path = match args.database {
        Some(path) => path,
        None => default_database_path()?,
    };
    let anchor = if args.strict_anchor {
        AnchorRule::RequireCurrent
    } else {
        AnchorRule::AllowPrevious
    };
    let config = TrackerConfig::new(database_path).with_anchor(anchor);

    info!("Using database at: {}", config.database_path.display());

    let server = HabitTrackerServer::new(config).await?;
    server.run().await?;

    info!("Habit streaks MCP server shutdown complete");
    Ok(())
}
