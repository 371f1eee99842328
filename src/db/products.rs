use std::str::FromStr;

use rusqlite::types::Type;
use rusqlite::{params, Connection, Error as SqlError, Row};
use rust_decimal::Decimal;

use crate::error::StoreError;
use crate::models::Product;

/// Retrieve every product in insertion order.
pub(crate) fn fetch_all_products(conn: &Connection) -> Result<Vec<Product>, StoreError> {
    let mut stmt = conn.prepare("SELECT id, name, price, stock FROM products ORDER BY id")?;

    let products = stmt
        .query_map([], product_from_row)?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(products)
}

/// Insert a product and return it with the id the store assigned.
pub(crate) fn insert_product(
    conn: &Connection,
    name: &str,
    price: Decimal,
    stock: i64,
) -> Result<Product, StoreError> {
    conn.execute(
        "INSERT INTO products (name, price, stock) VALUES (?1, ?2, ?3)",
        params![name, price.to_string(), stock],
    )?;

    Ok(Product::new(conn.last_insert_rowid(), name, price, stock))
}

/// Prices are persisted as decimal text; a value that does not parse is
/// reported as a conversion failure on that column.
fn product_from_row(row: &Row<'_>) -> rusqlite::Result<Product> {
    let raw_price: String = row.get(2)?;
    let price = Decimal::from_str(raw_price.trim())
        .map_err(|err| SqlError::FromSqlConversionFailure(2, Type::Text, Box::new(err)))?;

    Ok(Product {
        id: row.get(0)?,
        name: row.get(1)?,
        price,
        stock: row.get(3)?,
    })
}
