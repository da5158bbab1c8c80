//! Stockroom Client library.
//!
//! Everything that talks to the catalog store or has side effects lives here:
//! - [`config`] - Environment-based configuration
//! - [`catalog`] - REST client for the remote catalog store
//! - [`auth`] - Secret-key identification of the acting warehouseman
//! - [`inventory`] - Snapshot ownership and mutate-then-refresh flows
//! - [`report`] - HTML product reports
//!
//! Pure calculations live in `stockroom-core`; this crate only moves data in
//! and out of it.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod auth;
pub mod catalog;
pub mod config;
pub mod inventory;
pub mod report;

pub use catalog::{CatalogClient, CatalogError};
pub use config::{ClientConfig, ConfigError};
pub use inventory::{Inventory, InventoryError};
pub use report::{ProductReport, ReportError};
