//! CLI command implementations.
//!
//! Every command writes its results to the `out` writer it is handed and logs
//! through `tracing`, so output stays pipeable and commands stay testable.

pub mod export;
pub mod login;
pub mod products;
pub mod scan;
pub mod stats;
pub mod stock;
pub mod warehouse;

use std::io::{BufRead, Write};

use stockroom_client::{ClientConfig, Inventory, InventoryError};
use stockroom_core::types::Money;
use stockroom_core::{Product, product_value, stock_severity, total_stock};
use thiserror::Error;

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CommandError {
    /// Inventory flow failed.
    #[error(transparent)]
    Inventory(#[from] InventoryError),

    /// Report could not be produced.
    #[error(transparent)]
    Report(#[from] stockroom_client::ReportError),

    /// Configuration is missing or invalid.
    #[error(transparent)]
    Config(#[from] stockroom_client::ConfigError),

    /// Catalog store request failed.
    #[error(transparent)]
    Catalog(#[from] stockroom_client::CatalogError),

    /// Writing output or reading input failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Connect to the catalog store, logging in when a key is configured.
async fn connect(config: &ClientConfig) -> Result<Inventory, CommandError> {
    Ok(Inventory::connect(config).await?)
}

/// Ask a yes/no question; anything but `y` or `yes` declines.
fn confirm(
    prompt: &str,
    input: &mut impl BufRead,
    out: &mut impl Write,
) -> Result<bool, std::io::Error> {
    write!(out, "{prompt} [y/N] ")?;
    out.flush()?;

    let mut answer = String::new();
    input.read_line(&mut answer)?;
    Ok(matches!(
        answer.trim().to_ascii_lowercase().as_str(),
        "y" | "yes"
    ))
}

/// One line per product: id, name, price, stock, severity.
fn write_product_row(out: &mut impl Write, product: &Product) -> std::io::Result<()> {
    let total = total_stock(product);
    writeln!(
        out,
        "{:<8} {:<32} {:>10} {:>8} {}",
        product.id.as_str(),
        product.name,
        Money::new(product.price).to_string(),
        total,
        stock_severity(total)
    )
}

/// Full product sheet: fields, stock per warehouse, last edit.
fn write_product_detail(out: &mut impl Write, product: &Product) -> std::io::Result<()> {
    let total = total_stock(product);

    writeln!(out, "{} (#{})", product.name, product.id)?;
    writeln!(out, "  Type:     {}", product.kind)?;
    writeln!(out, "  Barcode:  {}", product.barcode)?;
    writeln!(out, "  Price:    {}", Money::new(product.price))?;
    writeln!(out, "  Supplier: {}", product.supplier)?;
    writeln!(out, "  Stock:    {total} units ({})", stock_severity(total))?;
    writeln!(out, "  Value:    {}", Money::new(product_value(product)))?;

    if product.stocks.is_empty() {
        writeln!(out, "  No stock recorded")?;
    } else {
        writeln!(out, "  Warehouses:")?;
        for stock in &product.stocks {
            writeln!(
                out,
                "    #{:<14} {:<24} {:<16} {:>8}",
                stock.id.as_i64(),
                stock.name,
                stock.localisation.city,
                stock.quantity
            )?;
        }
    }

    if let Some(edit) = product.last_edit() {
        match edit.at {
            Some(at) => writeln!(
                out,
                "  Last edited by {} on {}",
                edit.warehouseman_name,
                at.format("%Y-%m-%d %H:%M UTC")
            )?,
            None => writeln!(out, "  Last edited by {}", edit.warehouseman_name)?,
        }
    }
    Ok(())
}
