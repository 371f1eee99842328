//! Domain model mirroring the `products` table. `Product` stays a plain data
//! holder so the store, the exporter and the terminal front end can all pass
//! it around without pulling in each other's concerns.

use std::fmt;

use rust_decimal::Decimal;

#[derive(Debug, Clone, PartialEq, Eq)]
/// One row of the product catalogue.
pub struct Product {
    /// Primary key assigned by the store. Never changes once created.
    pub id: i64,
    /// Display name. May contain commas, quotes or newlines; the CSV exporter
    /// is responsible for escaping them.
    pub name: String,
    /// Unit price as a fixed-point amount. The scale is preserved so `25.50`
    /// renders as `25.50` rather than `25.5`.
    pub price: Decimal,
    /// Quantity on hand.
    pub stock: i64,
}

impl Product {
    pub fn new(id: i64, name: impl Into<String>, price: Decimal, stock: i64) -> Self {
        Self {
            id,
            name: name.into(),
            price,
            stock,
        }
    }
}

impl fmt::Display for Product {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{} {}", self.id, self.name)
    }
}

/// The rows written into a freshly created store.
pub fn seed_products() -> Vec<Product> {
    vec![
        Product::new(1, "Laptop", Decimal::new(99999, 2), 50),
        Product::new(2, "Mouse", Decimal::new(2550, 2), 200),
        Product::new(3, "Keyboard", Decimal::new(4500, 2), 150),
        Product::new(4, "Monitor", Decimal::new(19999, 2), 75),
    ]
}
