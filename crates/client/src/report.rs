//! Printable product reports.
//!
//! Renders one product as a standalone HTML document: basic information,
//! stock per warehouse with its value, totals and edit history. Turning the
//! HTML into a PDF is left to whatever prints it.

use std::path::Path;

use askama::Template;
use chrono::{DateTime, Utc};
use stockroom_core::types::Money;
use stockroom_core::{Product, StockSeverity, product_value, stock_severity, stock_value, total_stock};
use thiserror::Error;
use tracing::info;

/// Timestamp format used throughout the report.
const DATE_FORMAT: &str = "%Y-%m-%d %H:%M UTC";

/// Errors that can occur when producing a report.
#[derive(Debug, Error)]
pub enum ReportError {
    /// Template rendering error.
    #[error("Template error: {0}")]
    Template(#[from] askama::Error),

    /// Writing the report failed.
    #[error("Failed to write report: {0}")]
    Io(#[from] std::io::Error),
}

/// One row of the stock table.
#[derive(Debug, Clone)]
pub struct StockRow {
    pub warehouse: String,
    pub city: String,
    pub quantity: i64,
    pub value: String,
}

/// One row of the edit history.
#[derive(Debug, Clone)]
pub struct EditRow {
    pub warehouseman: String,
    pub at: String,
}

/// A product rendered for printing.
///
/// Every figure is formatted up front so the template only lays it out.
#[derive(Debug, Clone, Template)]
#[template(path = "product_report.html")]
pub struct ProductReport {
    pub id: String,
    pub name: String,
    pub kind: String,
    pub barcode: String,
    pub supplier: String,
    pub image: String,
    pub price: String,
    pub stocks: Vec<StockRow>,
    pub total_stock: i64,
    pub total_value: String,
    pub severity: StockSeverity,
    pub severity_color: &'static str,
    pub edits: Vec<EditRow>,
    pub generated_at: String,
}

impl ProductReport {
    /// Build the report for `product` as of `generated_at`.
    #[must_use]
    pub fn new(product: &Product, generated_at: DateTime<Utc>) -> Self {
        let total = total_stock(product);
        let severity = stock_severity(total);

        let stocks = product
            .stocks
            .iter()
            .map(|stock| StockRow {
                warehouse: stock.name.clone(),
                city: stock.localisation.city.clone(),
                quantity: stock.quantity,
                value: Money::new(stock_value(stock, product.price)).to_string(),
            })
            .collect();

        let edits = product
            .edited_by
            .iter()
            .map(|edit| EditRow {
                warehouseman: if edit.warehouseman_name.is_empty() {
                    edit.warehouseman_id.to_string()
                } else {
                    edit.warehouseman_name.clone()
                },
                at: edit
                    .at
                    .map_or_else(|| "unknown".to_string(), |at| at.format(DATE_FORMAT).to_string()),
            })
            .collect();

        Self {
            id: product.id.to_string(),
            name: product.name.clone(),
            kind: product.kind.clone(),
            barcode: product.barcode.clone(),
            supplier: product.supplier.clone(),
            image: product.image.clone(),
            price: Money::new(product.price).to_string(),
            stocks,
            total_stock: total,
            total_value: Money::new(product_value(product)).to_string(),
            severity,
            severity_color: severity.color(),
            edits,
            generated_at: generated_at.format(DATE_FORMAT).to_string(),
        }
    }

    /// Suggested file name, derived from the product id.
    #[must_use]
    pub fn file_name(&self) -> String {
        let safe: String = self
            .id
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '-' { c } else { '_' })
            .collect();
        format!("product-{safe}.html")
    }

    /// Render and write the report to `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if rendering or writing fails.
    pub fn write_to(&self, path: &Path) -> Result<(), ReportError> {
        let html = self.render()?;
        std::fs::write(path, html)?;
        info!(path = %path.display(), product_id = %self.id, "Report written");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use rust_decimal::Decimal;
    use stockroom_core::{
        EditRecord, Localisation, ProductId, Stock, WarehouseId, WarehousemanId,
    };

    use super::*;

    fn at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 9, 30, 0).unwrap()
    }

    fn product() -> Product {
        Product {
            id: ProductId::new("42"),
            name: "Apple <Gala>".to_string(),
            kind: "fruit".to_string(),
            barcode: "123".to_string(),
            price: Decimal::new(150, 2),
            supplier: "Orchard Co".to_string(),
            image: String::new(),
            stocks: vec![
                Stock {
                    id: WarehouseId::new(1),
                    name: "North".to_string(),
                    quantity: 10,
                    localisation: Localisation {
                        city: "Lyon".to_string(),
                        ..Localisation::default()
                    },
                },
                Stock {
                    id: WarehouseId::new(2),
                    name: "South".to_string(),
                    quantity: 5,
                    localisation: Localisation::default(),
                },
            ],
            edited_by: vec![EditRecord {
                warehouseman_id: WarehousemanId::new(7),
                warehouseman_name: "Jane".to_string(),
                at: Some(at()),
            }],
        }
    }

    #[test]
    fn test_figures() {
        let report = ProductReport::new(&product(), at());
        assert_eq!(report.price, "$1.50");
        assert_eq!(report.total_stock, 15);
        assert_eq!(report.total_value, "$22.50");
        assert_eq!(report.severity, StockSeverity::Ok);
        assert_eq!(report.stocks[0].value, "$15.00");
        assert_eq!(report.stocks[1].value, "$7.50");
        assert_eq!(report.edits[0].at, "2024-03-01 09:30 UTC");
    }

    #[test]
    fn test_render_contains_sections_and_escapes() {
        let html = ProductReport::new(&product(), at()).render().unwrap();
        assert!(html.contains("Basic Information"));
        assert!(html.contains("Stock Information"));
        assert!(html.contains("Edit History"));
        assert!(html.contains("Apple &#60;Gala&#62;") || html.contains("Apple &lt;Gala&gt;"));
        assert!(!html.contains("Apple <Gala>"));
        assert!(html.contains("Lyon"));
        assert!(html.contains("$22.50"));
        assert!(html.contains("Jane"));
    }

    #[test]
    fn test_empty_product_renders_placeholders() {
        let mut bare = product();
        bare.stocks.clear();
        bare.edited_by.clear();
        let report = ProductReport::new(&bare, at());
        assert_eq!(report.total_value, "$0.00");
        assert_eq!(report.severity, StockSeverity::Critical);

        let html = report.render().unwrap();
        assert!(html.contains("No stock recorded"));
        assert!(html.contains("No edits recorded"));
    }

    #[test]
    fn test_anonymous_edit_falls_back_to_id() {
        let mut p = product();
        p.edited_by[0].warehouseman_name.clear();
        let report = ProductReport::new(&p, at());
        assert_eq!(report.edits[0].warehouseman, "7");
    }

    #[test]
    fn test_undated_edit_is_listed() {
        let mut p = product();
        p.edited_by[0].at = None;
        let report = ProductReport::new(&p, at());
        assert_eq!(report.edits[0].at, "unknown");
    }

    #[test]
    fn test_file_name_is_sanitized() {
        let mut p = product();
        p.id = ProductId::new("a/b c");
        assert_eq!(ProductReport::new(&p, at()).file_name(), "product-a_b_c.html");
    }
}
