//! Error types for the two failure domains: reading the store and writing an
//! export. Both are rendered into the status line by the controller, so the
//! `Display` text is what the user ends up reading.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// The store could not be created, opened or queried.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to create data directory {}: {source}", path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),
}

/// Composing or writing the CSV document failed.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("the Desktop folder could not be located")]
    DesktopUnavailable,

    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}
