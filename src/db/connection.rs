use std::fs;
use std::path::Path;

use rusqlite::{params, Connection, OptionalExtension};
use tracing::{debug, info};

use crate::error::StoreError;
use crate::models::seed_products;

/// Open the database file, creating its parent directory first. SQLite
/// creates the file itself on first open.
pub(crate) fn open(path: &Path) -> Result<Connection, StoreError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|source| StoreError::CreateDir {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    debug!(path = %path.display(), "opening product store");
    Ok(Connection::open(path)?)
}

/// Create the `products` table and write the seed rows, but only when the
/// table does not exist yet. An existing table is left alone even if it is
/// empty. Returns `true` when the store was initialised by this call.
pub(crate) fn ensure_schema(conn: &mut Connection) -> Result<bool, StoreError> {
    if table_exists(conn, "products")? {
        return Ok(false);
    }

    let tx = conn.transaction()?;
    tx.execute(
        "CREATE TABLE products (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            price TEXT NOT NULL,
            stock INTEGER NOT NULL
        )",
        [],
    )?;

    {
        let mut insert =
            tx.prepare("INSERT INTO products (id, name, price, stock) VALUES (?1, ?2, ?3, ?4)")?;
        for product in seed_products() {
            insert.execute(params![
                product.id,
                product.name,
                product.price.to_string(),
                product.stock
            ])?;
        }
    }
    tx.commit()?;

    info!("created products table with seed data");
    Ok(true)
}

fn table_exists(conn: &Connection, name: &str) -> Result<bool, StoreError> {
    let found = conn
        .query_row(
            "SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1",
            params![name],
            |_| Ok(()),
        )
        .optional()?;
    Ok(found.is_some())
}
