//! Immutable product snapshots.
//!
//! A [`Snapshot`] is the full product list as fetched at one point in time.
//! It is never edited in place: a refresh builds a new snapshot and swaps it
//! in whole, so readers holding the old one keep a consistent view.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::aggregate::{self, FleetStatistics};
use crate::model::Product;
use crate::types::{ProductId, SortKey};

/// The catalog as fetched at `fetched_at`. Cloning is cheap.
#[derive(Debug, Clone)]
pub struct Snapshot {
    products: Arc<[Product]>,
    fetched_at: DateTime<Utc>,
}

impl Snapshot {
    /// Freeze a freshly fetched product list.
    #[must_use]
    pub fn new(products: Vec<Product>, fetched_at: DateTime<Utc>) -> Self {
        Self {
            products: products.into(),
            fetched_at,
        }
    }

    /// All products, in store order.
    #[must_use]
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// When the snapshot was taken.
    #[must_use]
    pub const fn fetched_at(&self) -> DateTime<Utc> {
        self.fetched_at
    }

    /// Number of products.
    #[must_use]
    pub fn len(&self) -> usize {
        self.products.len()
    }

    /// Whether the catalog is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// Look a product up by identifier.
    #[must_use]
    pub fn get(&self, id: &ProductId) -> Option<&Product> {
        self.products.iter().find(|p| &p.id == id)
    }

    /// See [`aggregate::filter_and_sort`].
    #[must_use]
    pub fn view(&self, query: &str, sort_key: SortKey) -> Vec<&Product> {
        aggregate::filter_and_sort(&self.products, query, sort_key)
    }

    /// See [`aggregate::fleet_statistics`].
    #[must_use]
    pub fn statistics(&self) -> FleetStatistics {
        aggregate::fleet_statistics(&self.products)
    }

    /// See [`aggregate::find_by_barcode`].
    #[must_use]
    pub fn find_by_barcode(&self, code: &str) -> Option<&Product> {
        aggregate::find_by_barcode(&self.products, code)
    }
}
