//! Stock adjustment commands.

use std::io::Write;

use stockroom_client::ClientConfig;
use stockroom_core::{ProductId, WarehouseId, total_stock};

use super::{CommandError, connect};

/// Add `delta` units (negative to remove) of a product at one warehouse.
///
/// # Errors
///
/// Returns an error if nobody is logged in, the product does not hold stock
/// at the warehouse, or the store request fails.
pub async fn adjust(
    config: &ClientConfig,
    id: &str,
    warehouse: i64,
    delta: i64,
    out: &mut impl Write,
) -> Result<(), CommandError> {
    let inventory = connect(config).await?;
    let warehouse_id = WarehouseId::new(warehouse);
    let updated = inventory
        .adjust_stock(&ProductId::new(id), warehouse_id, delta)
        .await?;

    let quantity = updated.stock(warehouse_id).map_or(0, |s| s.quantity);
    writeln!(
        out,
        "{}: {quantity} units at warehouse #{warehouse_id} ({} total)",
        updated.name,
        total_stock(&updated)
    )?;
    Ok(())
}
