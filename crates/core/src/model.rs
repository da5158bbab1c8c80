//! Catalog domain types as the catalog store serves them.
//!
//! Field names follow the store's camelCase JSON. Numeric fields, nested
//! identifiers and edit timestamps go through [`crate::types::lenient`] so a
//! partial record never breaks a product list.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{ProductId, WarehouseId, WarehousemanId, lenient};

// =============================================================================
// Product Types
// =============================================================================

/// A stocked item definition, independent of location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Opaque product identifier.
    pub id: ProductId,
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Free-form category.
    #[serde(rename = "type", default)]
    pub kind: String,
    /// Barcode, empty when unknown.
    #[serde(default)]
    pub barcode: String,
    /// Unit price.
    #[serde(
        default,
        deserialize_with = "lenient::decimal",
        serialize_with = "lenient::decimal_as_number"
    )]
    pub price: Decimal,
    /// Supplier name.
    #[serde(default)]
    pub supplier: String,
    /// Image URI.
    #[serde(default)]
    pub image: String,
    /// Per-warehouse stock records.
    #[serde(default)]
    pub stocks: Vec<Stock>,
    /// Audit trail, oldest first.
    #[serde(default)]
    pub edited_by: Vec<EditRecord>,
}

impl Product {
    /// Find the stock record for a warehouse.
    #[must_use]
    pub fn stock(&self, warehouse_id: WarehouseId) -> Option<&Stock> {
        self.stocks.iter().find(|s| s.id == warehouse_id)
    }

    /// The most recent edit, if the product was ever edited.
    #[must_use]
    pub fn last_edit(&self) -> Option<&EditRecord> {
        self.edited_by.last()
    }
}

/// A product that has not been assigned an identifier yet.
///
/// This is the body of a create request; the store answers with a full
/// [`Product`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProduct {
    /// Display name.
    pub name: String,
    /// Free-form category.
    #[serde(rename = "type")]
    pub kind: String,
    /// Barcode, empty when unknown.
    pub barcode: String,
    /// Unit price.
    #[serde(
        deserialize_with = "lenient::decimal",
        serialize_with = "lenient::decimal_as_number"
    )]
    pub price: Decimal,
    /// Supplier name.
    pub supplier: String,
    /// Image URI.
    pub image: String,
    /// Always empty for a new product.
    pub stocks: Vec<Stock>,
    /// Always empty for a new product.
    pub edited_by: Vec<EditRecord>,
}

// =============================================================================
// Stock Types
// =============================================================================

/// Quantity of a product held at one warehouse.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stock {
    /// Warehouse identifier.
    #[serde(default, deserialize_with = "lenient::id")]
    pub id: WarehouseId,
    /// Warehouse display name.
    #[serde(default)]
    pub name: String,
    /// Units on hand. May be negative after an over-adjustment.
    #[serde(default, deserialize_with = "lenient::quantity")]
    pub quantity: i64,
    /// Where the warehouse is.
    #[serde(default)]
    pub localisation: Localisation,
}

/// Warehouse location.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Localisation {
    /// City name.
    #[serde(default)]
    pub city: String,
    /// Latitude in degrees.
    #[serde(default)]
    pub latitude: f64,
    /// Longitude in degrees.
    #[serde(default)]
    pub longitude: f64,
}

// =============================================================================
// Audit Types
// =============================================================================

/// One entry in a product's audit trail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditRecord {
    /// Who made the change.
    #[serde(default, deserialize_with = "lenient::id")]
    pub warehouseman_id: WarehousemanId,
    /// Their display name at the time of the change.
    #[serde(default)]
    pub warehouseman_name: String,
    /// When the change was made, if the store recorded it.
    #[serde(
        default,
        deserialize_with = "lenient::timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    pub at: Option<DateTime<Utc>>,
}

impl EditRecord {
    /// Stamp an edit by `actor` at `at`.
    #[must_use]
    pub fn by(actor: &Warehouseman, at: DateTime<Utc>) -> Self {
        Self {
            warehouseman_id: actor.id,
            warehouseman_name: actor.name.clone(),
            at: Some(at),
        }
    }
}

/// A warehouse worker as far as the client needs to know.
///
/// The secret key the store keeps alongside is absent here: it is
/// compared once at login and then dropped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Warehouseman {
    /// Identifier stamped into edit records.
    #[serde(deserialize_with = "lenient::id")]
    pub id: WarehousemanId,
    /// Display name stamped into edit records.
    pub name: String,
}
