//! Printable product reports.

use std::io::Write;
use std::path::PathBuf;

use chrono::Utc;
use stockroom_client::{ClientConfig, ProductReport};
use stockroom_core::ProductId;

use super::{CommandError, connect};

/// Write the HTML report for a product to `output`, or to
/// `product-<id>.html` in the working directory.
///
/// # Errors
///
/// Returns an error if the product does not exist or the file cannot be
/// written.
pub async fn run(
    config: &ClientConfig,
    id: &str,
    output: Option<PathBuf>,
    out: &mut impl Write,
) -> Result<(), CommandError> {
    let inventory = connect(config).await?;
    let product = inventory.product(&ProductId::new(id)).await?;

    let report = ProductReport::new(&product, Utc::now());
    let path = output.unwrap_or_else(|| PathBuf::from(report.file_name()));
    report.write_to(&path)?;

    writeln!(out, "Wrote {}", path.display())?;
    Ok(())
}
