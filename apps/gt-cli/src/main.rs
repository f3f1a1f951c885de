//! # gt
//!
//! Terminal front end for the goal tracker.
//!
//! - `gt goal add/list/show/rename/toggle/delete` — manage big goals
//! - `gt small add/remove/toggle` — manage a goal's weekday small goals
//!
//! Goals are kept in one JSON blob in the data directory and written in
//! the background after every change; the process waits for the last
//! write before exiting.

mod commands;
mod config;
mod prompt;
mod time_input;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use gt_goal::{GoalStore, LogSink};
use gt_storage::{JsonFileStore, KeyValueStore, MemoryStore};
use tokio::runtime::Handle;
use tracing_subscriber::EnvFilter;

use crate::config::{GtConfig, LogFormat, LoggingConfig};
use crate::prompt::TerminalConfirm;

/// Goal tracker — big goals broken into weekly small goals.
#[derive(Parser)]
#[command(name = "gt", version, about)]
struct Cli {
    /// Config file (defaults to <config dir>/goaltrack/config.toml).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Data directory (overrides `storage.data_dir`).
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Keep goals in memory only; nothing is read from or written to disk.
    #[arg(long, global = true)]
    ephemeral: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage big goals.
    Goal {
        #[command(subcommand)]
        command: commands::goal::GoalCommands,
    },
    /// Manage the small goals scheduled on each weekday.
    Small {
        #[command(subcommand)]
        command: commands::small::SmallCommands,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => GtConfig::load(path)?,
        None => GtConfig::load_or_default(&GtConfig::default_path())?,
    };
    init_logging(&config.logging)?;

    let mut store = open_store(&cli, &config)?;
    let confirm = TerminalConfirm::stdio();

    let result = match &cli.command {
        Commands::Goal { command } => commands::goal::execute(command, &mut store, &confirm),
        Commands::Small { command } => commands::small::execute(command, &mut store),
    };

    store.flush().await;
    result
}

/// Logs go to stderr so they don't mix with command output.
fn init_logging(config: &LoggingConfig) -> anyhow::Result<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&config.filter)
            .with_context(|| format!("invalid log filter '{}'", config.filter))?,
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(false);
    match config.format {
        LogFormat::Text => builder.init(),
        LogFormat::Json => builder.json().init(),
    }
    Ok(())
}

fn open_store(cli: &Cli, config: &GtConfig) -> anyhow::Result<GoalStore> {
    config.storage.validate()?;
    let storage: Arc<dyn KeyValueStore> = if cli.ephemeral {
        Arc::new(MemoryStore::new())
    } else {
        let dir = cli
            .data_dir
            .clone()
            .unwrap_or_else(|| config.storage.resolved_data_dir());
        tracing::debug!("data directory: {}", dir.display());
        Arc::new(
            JsonFileStore::new(&dir)
                .with_context(|| format!("cannot use data directory {}", dir.display()))?,
        )
    };

    let mut store = GoalStore::new(&Handle::current(), storage, config.storage.key.as_str());
    if let Some(path) = &config.events.log_path {
        store.add_sink(Box::new(LogSink::new(path)));
    }
    store.load();
    Ok(store)
}
