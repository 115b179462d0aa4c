// ⚙️ Configuration - Where the stores live and which backend reads them
//
// Defaults, then environment variables, then CLI flags (applied by the
// binaries on top of `from_env`).

use crate::backend::{CsvBackend, SqliteBackend, StoreBackend};
use crate::error::{Result, TrackerError};
use crate::models::StoreKind;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

pub const ENV_DATA_DIR: &str = "SHIPMENT_TRACKER_DATA_DIR";
pub const ENV_BACKEND: &str = "SHIPMENT_TRACKER_BACKEND";
pub const ENV_SERVER_ADDR: &str = "SHIPMENT_TRACKER_ADDR";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// Three CSV files (the original format)
    #[default]
    Csv,
    /// One SQLite database holding the three tables
    Sqlite,
}

impl FromStr for BackendKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "csv" => Ok(BackendKind::Csv),
            "sqlite" | "sqlite3" => Ok(BackendKind::Sqlite),
            other => Err(format!("unknown backend \"{}\" (expected csv or sqlite)", other)),
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendKind::Csv => f.write_str("csv"),
            BackendKind::Sqlite => f.write_str("sqlite"),
        }
    }
}

/// File names inside the data directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreFiles {
    pub log_file: String,
    pub user_file: String,
    pub summary_file: String,
    pub database_file: String,
}

impl Default for StoreFiles {
    fn default() -> Self {
        StoreFiles {
            log_file: "shipment_logs.csv".to_string(),
            user_file: "users.csv".to_string(),
            summary_file: "shipments.csv".to_string(),
            database_file: "shipment_tracker.db".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackerConfig {
    pub data_dir: PathBuf,
    pub backend: BackendKind,
    pub files: StoreFiles,
    /// Listen address of the API server
    pub server_addr: String,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        TrackerConfig {
            data_dir: PathBuf::from("data"),
            backend: BackendKind::default(),
            files: StoreFiles::default(),
            server_addr: "0.0.0.0:3000".to_string(),
        }
    }
}

impl TrackerConfig {
    /// Defaults overridden by `SHIPMENT_TRACKER_*` environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as `from_env`, reading variables through `lookup`
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = TrackerConfig::default();

        if let Some(dir) = lookup(ENV_DATA_DIR).filter(|v| !v.trim().is_empty()) {
            config.data_dir = PathBuf::from(dir.trim());
        }
        if let Some(kind) = lookup(ENV_BACKEND).filter(|v| !v.trim().is_empty()) {
            config.backend = kind
                .parse()
                .map_err(|message: String| TrackerError::validation(ENV_BACKEND, message))?;
        }
        if let Some(addr) = lookup(ENV_SERVER_ADDR).filter(|v| !v.trim().is_empty()) {
            config.server_addr = addr.trim().to_string();
        }

        Ok(config)
    }

    pub fn with_data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.data_dir = dir.into();
        self
    }

    pub fn with_backend(mut self, backend: BackendKind) -> Self {
        self.backend = backend;
        self
    }

    /// CSV path of one store
    pub fn store_path(&self, store: StoreKind) -> PathBuf {
        let name = match store {
            StoreKind::Logs => &self.files.log_file,
            StoreKind::Users => &self.files.user_file,
            StoreKind::Summaries => &self.files.summary_file,
        };
        self.data_dir.join(name)
    }

    pub fn database_path(&self) -> PathBuf {
        self.data_dir.join(&self.files.database_file)
    }

    /// Open the configured backend. The data directory must already exist.
    pub fn open_backend(&self) -> Result<Box<dyn StoreBackend + Send>> {
        match self.backend {
            BackendKind::Csv => Ok(Box::new(CsvBackend::new(
                self.store_path(StoreKind::Logs),
                self.store_path(StoreKind::Users),
                self.store_path(StoreKind::Summaries),
            ))),
            BackendKind::Sqlite => Ok(Box::new(SqliteBackend::open(&self.database_path())?)),
        }
    }
}
