//! Runtime locations: where the database lives, where exports go, and where
//! log files are written. Everything defaults to a dot-folder under the
//! user's home, with the export target being the platform Desktop folder.

use std::env;
use std::path::PathBuf;

use anyhow::{anyhow, Result};
use directories::{BaseDirs, UserDirs};

/// Folder name used beneath the user's home directory for application data.
const DATA_DIR_NAME: &str = ".product-export";
/// SQLite file name stored inside the application data directory.
const DB_FILE_NAME: &str = "app.db";
/// Log folder inside the application data directory.
const LOG_DIR_NAME: &str = "logs";

/// Overrides the database file location.
pub const DB_PATH_ENV: &str = "PRODUCT_EXPORT_DB";
/// Overrides the export directory.
pub const EXPORT_DIR_ENV: &str = "PRODUCT_EXPORT_DIR";

#[derive(Debug, Clone)]
pub struct Settings {
    pub db_path: PathBuf,
    /// `None` when the platform has no Desktop folder; exports then fail with
    /// a status message instead of aborting startup.
    pub export_dir: Option<PathBuf>,
    pub log_dir: PathBuf,
}

impl Settings {
    /// Resolve the default locations and apply any environment overrides.
    pub fn from_env() -> Result<Self> {
        let base_dirs = BaseDirs::new().ok_or_else(|| anyhow!("could not locate home directory"))?;
        let data_dir = base_dirs.home_dir().join(DATA_DIR_NAME);
        let desktop = UserDirs::new().and_then(|dirs| dirs.desktop_dir().map(PathBuf::from));

        let defaults = Self {
            db_path: data_dir.join(DB_FILE_NAME),
            export_dir: desktop,
            log_dir: data_dir.join(LOG_DIR_NAME),
        };
        Ok(defaults.with_overrides(env_path(DB_PATH_ENV), env_path(EXPORT_DIR_ENV)))
    }

    fn with_overrides(mut self, db_path: Option<PathBuf>, export_dir: Option<PathBuf>) -> Self {
        if let Some(path) = db_path {
            self.db_path = path;
        }
        if export_dir.is_some() {
            self.export_dir = export_dir;
        }
        self
    }
}

fn env_path(key: &str) -> Option<PathBuf> {
    env::var_os(key)
        .filter(|value| !value.is_empty())
        .map(PathBuf::from)
}
