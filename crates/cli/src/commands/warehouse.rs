//! Warehouse membership commands.

use std::io::{BufRead, Write};

use stockroom_client::ClientConfig;
use stockroom_core::{ProductId, WarehouseDraft, WarehouseId};
use tracing::info;

use super::{CommandError, confirm, connect};

/// Start holding a product at a new warehouse with zero units.
///
/// # Errors
///
/// Returns an error if the name or city is blank, nobody is logged in, or
/// the store request fails.
pub async fn add(
    config: &ClientConfig,
    id: &str,
    name: &str,
    city: &str,
    latitude: Option<&str>,
    longitude: Option<&str>,
    out: &mut impl Write,
) -> Result<(), CommandError> {
    let draft = WarehouseDraft::parse(name, city, latitude, longitude)
        .map_err(stockroom_client::InventoryError::from)?;

    let inventory = connect(config).await?;
    let (updated, warehouse_id) = inventory.add_warehouse(&ProductId::new(id), draft).await?;
    writeln!(
        out,
        "Added warehouse #{warehouse_id} to {} ({} warehouses)",
        updated.name,
        updated.stocks.len()
    )?;
    Ok(())
}

/// Stop holding a product at a warehouse after confirmation.
///
/// # Errors
///
/// Returns an error if nobody is logged in, the warehouse is unknown, or the
/// store request fails.
pub async fn remove(
    config: &ClientConfig,
    id: &str,
    warehouse: i64,
    yes: bool,
    input: &mut impl BufRead,
    out: &mut impl Write,
) -> Result<(), CommandError> {
    let id = ProductId::new(id);
    let warehouse_id = WarehouseId::new(warehouse);
    let inventory = connect(config).await?;

    if !yes {
        let product = inventory.product(&id).await?;
        let label = product
            .stock(warehouse_id)
            .map_or_else(|| format!("#{warehouse_id}"), |s| format!("{} (#{warehouse_id})", s.name));
        if !confirm(&format!("Remove {label} from {}?", product.name), input, out)? {
            info!(product_id = %id, warehouse_id = %warehouse_id, "Removal cancelled");
            writeln!(out, "Cancelled")?;
            return Ok(());
        }
    }

    let updated = inventory.remove_warehouse(&id, warehouse_id).await?;
    writeln!(
        out,
        "Removed warehouse #{warehouse_id} from {} ({} warehouses left)",
        updated.name,
        updated.stocks.len()
    )?;
    Ok(())
}
