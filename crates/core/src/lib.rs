//! Stockroom Core - Inventory domain library.
//!
//! This crate provides the catalog types and every calculation the inventory
//! client performs locally:
//! - [`model`] - Products, per-warehouse stock, audit records, warehousemen
//! - [`aggregate`] - Stock totals, severity, monetary value, fleet statistics,
//!   search and ordering
//! - [`mutation`] - Stock adjustments, warehouse changes and field edits
//! - [`draft`] - Validation of form input
//! - [`snapshot`] - Immutable product snapshots
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no HTTP
//! clients, no clocks. Callers pass timestamps in, which keeps every function
//! deterministic and easy to test.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for IDs and money, status enums, lenient serde

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod aggregate;
pub mod draft;
pub mod model;
pub mod mutation;
pub mod snapshot;
pub mod types;

pub use aggregate::{
    FleetStatistics, RemoteStatistics, filter_and_sort, find_by_barcode, fleet_statistics,
    product_value, stock_severity, stock_value, total_stock,
};
pub use draft::{ProductEdit, ProductForm, ValidationError, WarehouseDraft};
pub use model::{EditRecord, Localisation, NewProduct, Product, Stock, Warehouseman};
pub use mutation::{AdjustmentPolicy, MutationError};
pub use snapshot::Snapshot;
pub use types::*;
