//! Product list viewer backed by a local SQLite file, with CSV export.
//!
//! The library keeps the pieces separate so the binary, the tests, and any
//! other host can reuse them: the store behind [`ProductStore`], the CSV
//! writer in [`export`], and the [`ListController`] that ties them together
//! and publishes state changes to whatever front end is listening.
pub mod config;
pub mod controller;
pub mod db;
pub mod error;
pub mod export;
pub mod logging;
pub mod models;
pub mod ui;

pub use config::Settings;
pub use controller::{ListController, ListEvent, ListState};
pub use db::{ProductStore, SqliteStore};
pub use error::{ExportError, StoreError};
pub use export::{escape_csv_field, render_csv, Exporter};
pub use logging::init_logging;
pub use models::{seed_products, Product};
pub use ui::{run_app, App};
