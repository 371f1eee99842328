//! Persistence layer around the embedded SQLite database. The rest of the
//! crate only sees the [`ProductStore`] trait, so the controller can be
//! driven by an in-memory store in tests.

mod connection;
mod products;

use std::path::{Path, PathBuf};

use rust_decimal::Decimal;

use crate::error::StoreError;
use crate::models::Product;

/// Read access to the product catalogue.
pub trait ProductStore: Send + Sync {
    /// Create the backing store and its seed rows if they do not exist yet.
    /// Calling it again is a no-op.
    fn ensure_ready(&self) -> Result<(), StoreError>;

    /// Every persisted product, in store order.
    fn fetch_all_products(&self) -> Result<Vec<Product>, StoreError>;
}

/// File-backed store. Each call opens its own connection and closes it
/// before returning; nothing is held between operations.
#[derive(Debug, Clone)]
pub struct SqliteStore {
    path: PathBuf,
}

impl SqliteStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append a product outside the seed set. The application never calls
    /// this; it exists for tooling and tests that need extra rows.
    pub fn insert_product(&self, name: &str, price: Decimal, stock: i64) -> Result<Product, StoreError> {
        let conn = connection::open(&self.path)?;
        products::insert_product(&conn, name, price, stock)
    }
}

impl ProductStore for SqliteStore {
    fn ensure_ready(&self) -> Result<(), StoreError> {
        let mut conn = connection::open(&self.path)?;
        connection::ensure_schema(&mut conn)?;
        Ok(())
    }

    fn fetch_all_products(&self) -> Result<Vec<Product>, StoreError> {
        let conn = connection::open(&self.path)?;
        products::fetch_all_products(&conn)
    }
}
