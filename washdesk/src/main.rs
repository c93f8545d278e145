mod backend;
mod commands;
mod config;
mod paths;
mod render;
mod session;

use std::fs::{self, File};
use std::sync::Arc;
use std::time::Instant;

use deskkit::settings::{SettingsProvider, SqliteBackend, StorageError};
use simplelog::{Config, WriteLogger};
use thiserror::Error;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tokio::time::sleep_until;

use crate::backend::CustomerStore;
use crate::config::{ConfigError, ConsoleConfig};
use crate::session::{Outcome, Session, SessionError};

/// Size of the simulated customer base.
const SAMPLE_CUSTOMERS: u32 = 137;

#[derive(Debug, Error)]
enum ConsoleError {
    #[error("config: {0}")]
    Config(#[from] ConfigError),
    #[error("settings: {0}")]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
    #[error("logger: {0}")]
    Logger(#[from] log::SetLoggerError),
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn init_logging(config: &ConsoleConfig) -> Result<(), ConsoleError> {
    let dir = config.resolve_log_dir()?;
    fs::create_dir_all(&dir)?;
    paths::rotate_logs(&dir);
    let log_file = File::create(dir.join(paths::LATEST_LOG))?;
    WriteLogger::init(config.log_level, Config::default(), log_file)?;
    Ok(())
}

/// Sleep until a deadline, or wait forever if None.
async fn sleep_until_optional(deadline: Option<Instant>) {
    match deadline {
        Some(d) => sleep_until(tokio::time::Instant::from_std(d)).await,
        None => std::future::pending::<()>().await,
    }
}

async fn run() -> Result<(), ConsoleError> {
    let config = ConsoleConfig::default().with_env()?;
    init_logging(&config)?;

    let db = config.settings_db()?;
    if let Some(parent) = db.parent() {
        fs::create_dir_all(parent)?;
    }
    log::info!("Opening settings at {}", db.display());
    let settings = SettingsProvider::new(SqliteBackend::open(&db)?);

    let store = Arc::new(CustomerStore::sample(SAMPLE_CUSTOMERS));
    let customers = store.len();
    let (responses_tx, mut responses) = mpsc::unbounded_channel();
    let mut session = Session::new(&config, settings, store, responses_tx)?;

    println!("washdesk: {} customers. Type 'help' for commands.", customers);
    session.start();

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        let deadline = session.next_deadline();
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                match session.handle_line(&line) {
                    Ok(Outcome::Print(text)) => println!("{}", text),
                    Ok(Outcome::Nothing) => {}
                    Ok(Outcome::Quit) => break,
                    Err(e) => {
                        log::warn!("Command '{}' failed: {}", line.trim(), e);
                        println!("error: {}", e);
                    }
                }
            }

            Some(response) = responses.recv() => {
                if let Some(text) = session.apply(response) {
                    println!("{}", text);
                }
            }

            _ = sleep_until_optional(deadline) => {
                if let Some(text) = session.tick() {
                    println!("{}", text);
                }
            }
        }
    }

    log::info!("Session ended on page {}", session.table().page());
    Ok(())
}
