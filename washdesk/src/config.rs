//! Console configuration.

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use deskkit::shell::ViewportConfig;
use deskkit::table::TableConfig;
use simplelog::LevelFilter;
use thiserror::Error;

use crate::paths;

/// Overrides the data directory (settings database and logs).
pub const DATA_DIR_ENV: &str = "WASHDESK_DATA_DIR";

/// Overrides the log level (`off`, `error`, `warn`, `info`, `debug`, `trace`).
pub const LOG_LEVEL_ENV: &str = "WASHDESK_LOG";

/// Overrides the simulated endpoint latency, in milliseconds.
pub const LATENCY_ENV: &str = "WASHDESK_LATENCY_MS";

/// Set to `1` to hold back refetches while a response is outstanding.
pub const GATE_ENV: &str = "WASHDESK_GATE";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid log level '{0}'")]
    InvalidLogLevel(String),
    #[error("invalid latency '{0}', expected milliseconds")]
    InvalidLatency(String),
    #[error("no data directory: set WASHDESK_DATA_DIR")]
    NoDataDir,
}

/// Configuration for one console session.
#[derive(Debug, Clone)]
pub struct ConsoleConfig {
    /// Where the settings database and logs live. Platform default if unset.
    pub data_dir: Option<PathBuf>,

    pub log_level: LevelFilter,

    /// Settings key prefix for the customers table layout.
    pub layout_prefix: String,

    pub table: TableConfig,

    pub viewport: ViewportConfig,

    /// Viewport width the console starts with, in pixels.
    pub initial_width: u32,

    /// Simulated round trip of the customers endpoint.
    pub latency: Duration,

    /// Hold back refetches while a response is outstanding.
    pub gate_while_loading: bool,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            log_level: LevelFilter::Info,
            layout_prefix: "customers".to_string(),
            table: TableConfig::default(),
            viewport: ViewportConfig::default(),
            initial_width: 1280,
            latency: Duration::from_millis(120),
            gate_while_loading: false,
        }
    }
}

impl ConsoleConfig {
    pub fn latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    pub fn gate_while_loading(mut self, gate: bool) -> Self {
        self.gate_while_loading = gate;
        self
    }

    /// Apply overrides from the process environment.
    pub fn with_env(self) -> Result<Self, ConfigError> {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from `lookup`, which maps variable names to values.
    pub fn with_overrides(
        mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        if let Some(dir) = lookup(DATA_DIR_ENV).filter(|dir| !dir.is_empty()) {
            self.data_dir = Some(PathBuf::from(dir));
        }
        if let Some(level) = lookup(LOG_LEVEL_ENV) {
            self.log_level = LevelFilter::from_str(level.trim())
                .map_err(|_| ConfigError::InvalidLogLevel(level))?;
        }
        if let Some(latency) = lookup(LATENCY_ENV) {
            let millis = latency
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidLatency(latency))?;
            self = self.latency(Duration::from_millis(millis));
        }
        if let Some(gate) = lookup(GATE_ENV) {
            self = self.gate_while_loading(matches!(gate.trim(), "1" | "true" | "yes"));
        }
        Ok(self)
    }

    /// Directory for the settings database.
    pub fn resolve_data_dir(&self) -> Result<PathBuf, ConfigError> {
        self.data_dir
            .clone()
            .or_else(paths::data_dir)
            .ok_or(ConfigError::NoDataDir)
    }

    /// Directory for log files. Follows an explicit data directory.
    pub fn resolve_log_dir(&self) -> Result<PathBuf, ConfigError> {
        match &self.data_dir {
            Some(dir) => Ok(dir.join("logs")),
            None => paths::cache_dir().ok_or(ConfigError::NoDataDir),
        }
    }

    pub fn settings_db(&self) -> Result<PathBuf, ConfigError> {
        Ok(self.resolve_data_dir()?.join("settings.db"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env<'a>(pairs: &'a [(&'a str, &'a str)]) -> impl Fn(&str) -> Option<String> + 'a {
        move |key| {
            pairs
                .iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| v.to_string())
        }
    }

    #[test]
    fn test_defaults() {
        let config = ConsoleConfig::default();
        assert_eq!(config.table.debounce, Duration::from_millis(300));
        assert_eq!(config.viewport.breakpoint, 768);
        assert_eq!(config.layout_prefix, "customers");
    }

    #[test]
    fn test_env_overrides() {
        let config = ConsoleConfig::default()
            .with_overrides(env(&[(DATA_DIR_ENV, "/tmp/washdesk"), (LOG_LEVEL_ENV, "debug")]))
            .unwrap();

        assert_eq!(config.log_level, LevelFilter::Debug);
        assert_eq!(
            config.settings_db().unwrap(),
            PathBuf::from("/tmp/washdesk/settings.db")
        );
        assert_eq!(
            config.resolve_log_dir().unwrap(),
            PathBuf::from("/tmp/washdesk/logs")
        );
    }

    #[test]
    fn test_latency_and_gate_overrides() {
        let config = ConsoleConfig::default()
            .with_overrides(env(&[(LATENCY_ENV, "40"), (GATE_ENV, "1")]))
            .unwrap();
        assert_eq!(config.latency, Duration::from_millis(40));
        assert!(config.gate_while_loading);

        let result = ConsoleConfig::default().with_overrides(env(&[(LATENCY_ENV, "fast")]));
        assert_eq!(
            result.err(),
            Some(ConfigError::InvalidLatency("fast".to_string()))
        );
    }

    #[test]
    fn test_invalid_log_level() {
        let result = ConsoleConfig::default().with_overrides(env(&[(LOG_LEVEL_ENV, "loud")]));
        assert_eq!(
            result.err(),
            Some(ConfigError::InvalidLogLevel("loud".to_string()))
        );
    }

    #[test]
    fn test_empty_data_dir_is_ignored() {
        let config = ConsoleConfig::default()
            .with_overrides(env(&[(DATA_DIR_ENV, "")]))
            .unwrap();
        assert!(config.data_dir.is_none());
    }
}
