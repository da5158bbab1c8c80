//! Remote catalog store REST client.
//!
//! The catalog store owns every product, the identity list, and the
//! store-side statistics. This module speaks its JSON-over-HTTP API:
//!
//! | Method | Path |
//! |---|---|
//! | `GET` | `/products` |
//! | `GET` / `PUT` / `DELETE` | `/products/{id}` |
//! | `POST` | `/products` |
//! | `GET` | `/statistics` |
//! | `GET` | `/warehousemans` |
//!
//! # Architecture
//!
//! - Stateless: every call fetches fresh data, nothing is cached here
//! - Updates send the full product record
//! - Timeouts come from [`crate::config::ClientConfig`]; there is no retry

mod client;

pub use client::{CatalogClient, WarehousemanRecord};

use thiserror::Error;

/// Errors that can occur when talking to the catalog store.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The store answered with an unexpected status.
    #[error("Catalog store returned {status}: {body}")]
    Status {
        /// Response status.
        status: reqwest::StatusCode,
        /// Response body, possibly empty.
        body: String,
    },

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// An endpoint URL could not be built from the configured base.
    #[error("Invalid catalog URL: {0}")]
    InvalidUrl(String),
}
