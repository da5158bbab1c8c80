//! Pure product mutations.
//!
//! Each function takes the current product by reference and returns the
//! updated copy to send back to the catalog store. Every mutation appends
//! exactly one [`EditRecord`] for the acting warehouseman.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::draft::{ProductEdit, WarehouseDraft};
use crate::model::{EditRecord, Product, Stock, Warehouseman};
use crate::types::{ProductId, WarehouseId};

/// Errors that can occur when applying a mutation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MutationError {
    /// The product holds no stock at the given warehouse.
    #[error("product {product} has no stock at warehouse {warehouse}")]
    WarehouseNotFound {
        /// Product being mutated.
        product: ProductId,
        /// Warehouse that was not found.
        warehouse: WarehouseId,
    },
}

/// What to do when an adjustment would take a quantity below zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdjustmentPolicy {
    /// Apply the delta as given; quantities may go negative.
    #[default]
    Permissive,
    /// Floor the resulting quantity at zero.
    ClampAtZero,
}

impl AdjustmentPolicy {
    /// Apply `delta` to `quantity` under this policy.
    #[must_use]
    pub const fn apply(self, quantity: i64, delta: i64) -> i64 {
        let adjusted = quantity.saturating_add(delta);
        match self {
            Self::Permissive => adjusted,
            Self::ClampAtZero => {
                if adjusted < 0 {
                    0
                } else {
                    adjusted
                }
            }
        }
    }
}

fn stamped(product: &Product, actor: &Warehouseman, at: DateTime<Utc>) -> Product {
    let mut updated = product.clone();
    updated.edited_by.push(EditRecord::by(actor, at));
    updated
}

fn not_found(product: &Product, warehouse: WarehouseId) -> MutationError {
    MutationError::WarehouseNotFound {
        product: product.id.clone(),
        warehouse,
    }
}

/// Add a signed delta to one warehouse's quantity.
///
/// # Errors
///
/// Returns [`MutationError::WarehouseNotFound`] if the product has no stock
/// record for `warehouse_id`.
pub fn adjust_stock(
    product: &Product,
    warehouse_id: WarehouseId,
    delta: i64,
    policy: AdjustmentPolicy,
    actor: &Warehouseman,
    at: DateTime<Utc>,
) -> Result<Product, MutationError> {
    let mut updated = stamped(product, actor, at);
    let stock = updated
        .stocks
        .iter_mut()
        .find(|s| s.id == warehouse_id)
        .ok_or_else(|| not_found(product, warehouse_id))?;
    stock.quantity = policy.apply(stock.quantity, delta);
    Ok(updated)
}

/// Start holding the product at a new warehouse, with nothing on hand.
#[must_use]
pub fn add_warehouse(
    product: &Product,
    draft: WarehouseDraft,
    warehouse_id: WarehouseId,
    actor: &Warehouseman,
    at: DateTime<Utc>,
) -> Product {
    let mut updated = stamped(product, actor, at);
    updated.stocks.push(Stock {
        id: warehouse_id,
        name: draft.name,
        quantity: 0,
        localisation: draft.localisation,
    });
    updated
}

/// Stop holding the product at a warehouse.
///
/// # Errors
///
/// Returns [`MutationError::WarehouseNotFound`] if the product has no stock
/// record for `warehouse_id`.
pub fn remove_warehouse(
    product: &Product,
    warehouse_id: WarehouseId,
    actor: &Warehouseman,
    at: DateTime<Utc>,
) -> Result<Product, MutationError> {
    if product.stock(warehouse_id).is_none() {
        return Err(not_found(product, warehouse_id));
    }
    let mut updated = stamped(product, actor, at);
    updated.stocks.retain(|s| s.id != warehouse_id);
    Ok(updated)
}

/// Replace the editable fields of a product.
#[must_use]
pub fn apply_edit(
    product: &Product,
    edit: ProductEdit,
    actor: &Warehouseman,
    at: DateTime<Utc>,
) -> Product {
    let mut updated = stamped(product, actor, at);
    updated.name = edit.name;
    updated.price = edit.price;
    updated.supplier = edit.supplier;
    updated.image = edit.image;
    updated.barcode = edit.barcode;
    updated
}

/// Identifier for a warehouse added at `at`: its Unix time in milliseconds.
#[must_use]
pub fn new_warehouse_id(at: DateTime<Utc>) -> WarehouseId {
    WarehouseId::new(at.timestamp_millis())
}
