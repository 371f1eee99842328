//! CSV export of the product list. The document is assembled in memory and
//! written in a single call; there is no streaming path.

use std::borrow::Cow;
use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use tracing::debug;

use crate::error::ExportError;
use crate::models::Product;

/// First line of every exported document.
pub const CSV_HEADER: &str = "Id,Name,Price,Stock";

/// Quote a field when it contains a comma, a double quote or a newline,
/// doubling any quotes inside it. Anything else is passed through.
pub fn escape_csv_field(field: &str) -> Cow<'_, str> {
    if field.contains([',', '"', '\n']) {
        Cow::Owned(format!("\"{}\"", field.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(field)
    }
}

/// Header plus one newline-terminated row per product.
pub fn render_csv(products: &[Product]) -> String {
    let mut document = String::with_capacity(CSV_HEADER.len() + 1 + products.len() * 32);
    document.push_str(CSV_HEADER);
    document.push('\n');

    for product in products {
        // Writing into a String cannot fail.
        let _ = writeln!(
            document,
            "{},{},{},{}",
            product.id,
            escape_csv_field(&product.name),
            product.price,
            product.stock
        );
    }

    document
}

/// `Products_YYYYMMDD_HHMMSS.csv` for the given local time.
pub fn export_file_name(now: DateTime<Local>) -> String {
    format!("Products_{}.csv", now.format("%Y%m%d_%H%M%S"))
}

/// Writes CSV documents into a fixed directory.
#[derive(Debug, Clone)]
pub struct Exporter {
    dir: Option<PathBuf>,
}

impl Exporter {
    /// `None` means the target folder is unknown; every export then fails
    /// with [`ExportError::DesktopUnavailable`].
    pub fn new(dir: Option<PathBuf>) -> Self {
        Self { dir }
    }

    pub fn dir(&self) -> Option<&Path> {
        self.dir.as_deref()
    }

    /// Render `products` and write them to a timestamped file, returning the
    /// file name. A file with the same name is overwritten, so two exports
    /// in the same second leave only the later one on disk.
    pub fn write(&self, products: &[Product], now: DateTime<Local>) -> Result<String, ExportError> {
        let dir = self.dir.as_ref().ok_or(ExportError::DesktopUnavailable)?;
        let file_name = export_file_name(now);
        let path = dir.join(&file_name);

        let document = render_csv(products);
        fs::write(&path, document.as_bytes()).map_err(|source| ExportError::Write {
            path: path.clone(),
            source,
        })?;

        debug!(path = %path.display(), bytes = document.len(), "wrote csv export");
        Ok(file_name)
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use rust_decimal_macros::dec;
    use tempfile::tempdir;

    use super::*;
    use crate::models::seed_products;

    fn at(h: u32, m: u32, s: u32) -> DateTime<Local> {
        Local.with_ymd_and_hms(2024, 3, 7, h, m, s).unwrap()
    }

    #[test]
    fn plain_fields_are_verbatim() {
        assert_eq!(escape_csv_field("Laptop"), "Laptop");
        assert!(matches!(escape_csv_field("Laptop"), Cow::Borrowed(_)));
        assert_eq!(escape_csv_field("it's fine; really"), "it's fine; really");
    }

    #[test]
    fn empty_field_is_not_quoted() {
        assert_eq!(escape_csv_field(""), "");
    }

    #[test]
    fn delimiters_force_quoting() {
        assert_eq!(escape_csv_field("Widget, Pro"), "\"Widget, Pro\"");
        assert_eq!(escape_csv_field("two\nlines"), "\"two\nlines\"");
        assert_eq!(escape_csv_field("27\" screen"), "\"27\"\" screen\"");
        assert_eq!(escape_csv_field("\""), "\"\"\"\"");
    }

    #[test]
    fn carriage_return_alone_is_not_quoted() {
        assert_eq!(escape_csv_field("a\rb"), "a\rb");
    }

    #[test]
    fn document_has_header_and_trailing_newline() {
        let csv = render_csv(&seed_products());
        assert_eq!(
            csv,
            "Id,Name,Price,Stock\n\
             1,Laptop,999.99,50\n\
             2,Mouse,25.50,200\n\
             3,Keyboard,45.00,150\n\
             4,Monitor,199.99,75\n"
        );
    }

    #[test]
    fn escaped_row_matches_expected_layout() {
        let csv = render_csv(&[Product::new(5, "Widget, Pro", dec!(10.00), 3)]);
        assert_eq!(csv.lines().nth(1), Some("5,\"Widget, Pro\",10.00,3"));
    }

    #[test]
    fn large_prices_have_no_thousands_separator() {
        let csv = render_csv(&[Product::new(9, "Server", dec!(12345.60), 1)]);
        assert!(csv.ends_with("9,Server,12345.60,1\n"));
    }

    #[test]
    fn file_name_is_zero_padded_24_hour() {
        assert_eq!(export_file_name(at(9, 5, 3)), "Products_20240307_090503.csv");
        assert_eq!(export_file_name(at(23, 59, 59)), "Products_20240307_235959.csv");
    }

    #[test]
    fn write_without_directory_fails() {
        let err = Exporter::new(None)
            .write(&seed_products(), at(12, 0, 0))
            .unwrap_err();
        assert!(matches!(err, ExportError::DesktopUnavailable));
    }

    #[test]
    fn write_into_missing_directory_fails() {
        let dir = tempdir().unwrap();
        let exporter = Exporter::new(Some(dir.path().join("does-not-exist")));
        let err = exporter.write(&seed_products(), at(12, 0, 0)).unwrap_err();
        assert!(matches!(err, ExportError::Write { .. }));
    }

    #[test]
    fn same_second_export_overwrites() {
        let dir = tempdir().unwrap();
        let exporter = Exporter::new(Some(dir.path().to_path_buf()));
        let now = at(10, 30, 0);

        let first = exporter.write(&seed_products(), now).unwrap();
        let only_mouse = vec![Product::new(2, "Mouse", dec!(25.50), 200)];
        let second = exporter.write(&only_mouse, now).unwrap();

        assert_eq!(first, second);
        let written = fs::read_to_string(dir.path().join(&second)).unwrap();
        assert_eq!(written, "Id,Name,Price,Stock\n2,Mouse,25.50,200\n");
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }
}
