//! Barcode lookup.

use std::io::Write;

use stockroom_client::ClientConfig;

use super::{CommandError, connect, write_product_detail};

/// Show the product carrying `barcode`, if any.
///
/// # Errors
///
/// Returns an error if the catalog cannot be fetched.
pub async fn run(config: &ClientConfig, barcode: &str, out: &mut impl Write) -> Result<(), CommandError> {
    let inventory = connect(config).await?;
    match inventory.lookup_barcode(barcode).await? {
        Some(product) => write_product_detail(out, &product)?,
        None => writeln!(out, "No product with barcode {:?}", barcode.trim())?,
    }
    Ok(())
}
