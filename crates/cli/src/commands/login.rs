//! Identify the configured warehouseman.

use std::io::Write;

use stockroom_client::{CatalogClient, ClientConfig, Inventory};

use super::CommandError;

/// Resolve `STOCKROOM_SECRET_KEY` to a warehouseman.
///
/// # Errors
///
/// Returns an error if no key is configured or the key matches nobody.
pub async fn run(config: &ClientConfig, out: &mut impl Write) -> Result<(), CommandError> {
    let key = config.require_secret_key()?;
    let mut inventory = Inventory::new(CatalogClient::new(config)?, config.adjustment_policy);
    let who = inventory.login(key).await?;
    writeln!(out, "Logged in as {} (#{})", who.name, who.id)?;
    Ok(())
}
