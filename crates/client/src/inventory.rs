//! Inventory service: snapshot ownership and mutate-then-refresh flows.
//!
//! [`Inventory`] holds the current [`Snapshot`] and the acting warehouseman.
//! Reads go through the snapshot. Writes fetch the freshest copy of the
//! product, apply a pure mutation from `stockroom_core::mutation`, send the
//! full record back, then replace the snapshot with a fresh fetch.
//!
//! Once the store has accepted a write, the write succeeds: if the follow-up
//! fetch fails, the previous snapshot stays in place and the failure is only
//! logged.

use chrono::{DateTime, Utc};
use secrecy::SecretString;
use stockroom_core::mutation;
use stockroom_core::{
    AdjustmentPolicy, FleetStatistics, MutationError, Product, ProductEdit, ProductForm, ProductId,
    Snapshot, ValidationError, WarehouseDraft, WarehouseId, Warehouseman,
};
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::{info, instrument, warn};

use crate::auth;
use crate::catalog::{CatalogClient, CatalogError};
use crate::config::ClientConfig;

/// Errors that can occur in inventory flows.
#[derive(Debug, Error)]
pub enum InventoryError {
    /// Catalog store request failed.
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// Form input was rejected.
    #[error("Invalid input: {0}")]
    Validation(#[from] ValidationError),

    /// The mutation does not apply to the product.
    #[error(transparent)]
    Mutation(#[from] MutationError),

    /// The secret key matched no warehouseman.
    #[error("Secret key not recognized")]
    InvalidSecretKey,

    /// A write was attempted without an acting warehouseman.
    #[error("Not authenticated: set STOCKROOM_SECRET_KEY to record who makes changes")]
    NotAuthenticated,

    /// The product is not in the catalog.
    #[error("Product not found: {0}")]
    ProductNotFound(ProductId),
}

/// Client-side view of the catalog.
#[derive(Debug)]
pub struct Inventory {
    client: CatalogClient,
    policy: AdjustmentPolicy,
    actor: Option<Warehouseman>,
    snapshot: RwLock<Option<Snapshot>>,
}

impl Inventory {
    /// Create an inventory over `client` with no snapshot loaded and no
    /// acting warehouseman.
    #[must_use]
    pub fn new(client: CatalogClient, policy: AdjustmentPolicy) -> Self {
        Self {
            client,
            policy,
            actor: None,
            snapshot: RwLock::new(None),
        }
    }

    /// Build the client from configuration and log in if a secret key is
    /// configured.
    ///
    /// # Errors
    ///
    /// Returns an error if the client cannot be built, the identity list
    /// cannot be fetched, or the configured key matches nobody.
    pub async fn connect(config: &ClientConfig) -> Result<Self, InventoryError> {
        let mut inventory = Self::new(CatalogClient::new(config)?, config.adjustment_policy);
        if let Some(key) = &config.secret_key {
            inventory.login(key).await?;
        }
        Ok(inventory)
    }

    /// Use `actor` for subsequent edits.
    #[must_use]
    pub fn with_actor(mut self, actor: Warehouseman) -> Self {
        self.actor = Some(actor);
        self
    }

    /// Identify the acting warehouseman by secret key.
    ///
    /// # Errors
    ///
    /// Returns `InventoryError::InvalidSecretKey` if the key matches nobody.
    pub async fn login(&mut self, secret_key: &SecretString) -> Result<&Warehouseman, InventoryError> {
        let who = auth::authenticate(&self.client, secret_key)
            .await?
            .ok_or(InventoryError::InvalidSecretKey)?;
        Ok(self.actor.insert(who))
    }

    /// The acting warehouseman, if logged in.
    #[must_use]
    pub const fn actor(&self) -> Option<&Warehouseman> {
        self.actor.as_ref()
    }

    /// The underlying catalog client.
    #[must_use]
    pub const fn client(&self) -> &CatalogClient {
        &self.client
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// Fetch every product and replace the snapshot.
    ///
    /// # Errors
    ///
    /// Returns an error if the product list cannot be fetched; the previous
    /// snapshot is kept in that case.
    #[instrument(skip(self))]
    pub async fn refresh(&self) -> Result<Snapshot, InventoryError> {
        let products = self.client.list_products().await?;
        Ok(self.replace_snapshot(products, Utc::now()).await)
    }

    /// The current snapshot, fetching one if none is loaded.
    ///
    /// # Errors
    ///
    /// Returns an error if a first fetch is needed and fails.
    pub async fn snapshot(&self) -> Result<Snapshot, InventoryError> {
        if let Some(snapshot) = self.snapshot.read().await.as_ref() {
            return Ok(snapshot.clone());
        }
        self.refresh().await
    }

    /// A product from the current snapshot.
    ///
    /// # Errors
    ///
    /// Returns `InventoryError::ProductNotFound` if the snapshot lacks it.
    pub async fn product(&self, id: &ProductId) -> Result<Product, InventoryError> {
        self.snapshot()
            .await?
            .get(id)
            .cloned()
            .ok_or_else(|| InventoryError::ProductNotFound(id.clone()))
    }

    /// The product carrying exactly this barcode, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if a first fetch is needed and fails.
    pub async fn lookup_barcode(&self, code: &str) -> Result<Option<Product>, InventoryError> {
        Ok(self.snapshot().await?.find_by_barcode(code).cloned())
    }

    /// Fleet statistics: local totals merged with store-reported rankings.
    ///
    /// Fetches the store statistics and the product list concurrently and
    /// replaces the snapshot with the products fetched.
    ///
    /// # Errors
    ///
    /// Returns an error if either request fails.
    #[instrument(skip(self))]
    pub async fn statistics(&self) -> Result<FleetStatistics, InventoryError> {
        let (remote, products) = tokio::try_join!(
            self.client.remote_statistics(),
            self.client.list_products()
        )?;
        let snapshot = self.replace_snapshot(products, Utc::now()).await;
        Ok(snapshot.statistics().merge_remote(remote))
    }

    // =========================================================================
    // Writes
    // =========================================================================

    /// Create a product from form input.
    ///
    /// # Errors
    ///
    /// Returns an error if the form is invalid or the store rejects it.
    #[instrument(skip(self, form), fields(name = %form.name))]
    pub async fn create_product(&self, form: &ProductForm<'_>) -> Result<Product, InventoryError> {
        let draft = stockroom_core::draft::new_product(form)?;
        let created = self.client.create_product(&draft).await?;
        info!(product_id = %created.id, "Product created");
        self.refresh_after_write().await;
        Ok(created)
    }

    /// Replace a product's editable fields.
    ///
    /// # Errors
    ///
    /// Returns an error if the form is invalid, nobody is logged in, or the
    /// store request fails.
    #[instrument(skip(self, form), fields(product_id = %id))]
    pub async fn edit_product(
        &self,
        id: &ProductId,
        form: &ProductForm<'_>,
    ) -> Result<Product, InventoryError> {
        let edit = ProductEdit::parse(form)?;
        self.mutate(id, |product, actor, at| {
            Ok(mutation::apply_edit(product, edit, actor, at))
        })
        .await
    }

    /// Add `delta` units (negative to remove) at one warehouse.
    ///
    /// # Errors
    ///
    /// Returns an error if nobody is logged in, the product does not hold
    /// stock at `warehouse_id`, or the store request fails.
    #[instrument(skip(self), fields(product_id = %id, warehouse_id = %warehouse_id))]
    pub async fn adjust_stock(
        &self,
        id: &ProductId,
        warehouse_id: WarehouseId,
        delta: i64,
    ) -> Result<Product, InventoryError> {
        let policy = self.policy;
        self.mutate(id, |product, actor, at| {
            Ok(mutation::adjust_stock(
                product,
                warehouse_id,
                delta,
                policy,
                actor,
                at,
            )?)
        })
        .await
    }

    /// Start holding the product at a new warehouse.
    ///
    /// Returns the updated product and the new warehouse's identifier.
    ///
    /// # Errors
    ///
    /// Returns an error if nobody is logged in or the store request fails.
    #[instrument(skip(self, draft), fields(product_id = %id, warehouse = %draft.name))]
    pub async fn add_warehouse(
        &self,
        id: &ProductId,
        draft: WarehouseDraft,
    ) -> Result<(Product, WarehouseId), InventoryError> {
        let mut warehouse_id = WarehouseId::default();
        let product = self
            .mutate(id, |product, actor, at| {
                warehouse_id = mutation::new_warehouse_id(at);
                Ok(mutation::add_warehouse(
                    product,
                    draft,
                    warehouse_id,
                    actor,
                    at,
                ))
            })
            .await?;
        Ok((product, warehouse_id))
    }

    /// Stop holding the product at a warehouse.
    ///
    /// # Errors
    ///
    /// Returns an error if nobody is logged in, the warehouse is unknown, or
    /// the store request fails.
    #[instrument(skip(self), fields(product_id = %id, warehouse_id = %warehouse_id))]
    pub async fn remove_warehouse(
        &self,
        id: &ProductId,
        warehouse_id: WarehouseId,
    ) -> Result<Product, InventoryError> {
        self.mutate(id, |product, actor, at| {
            Ok(mutation::remove_warehouse(product, warehouse_id, actor, at)?)
        })
        .await
    }

    /// Delete a product.
    ///
    /// # Errors
    ///
    /// Returns `InventoryError::ProductNotFound` if the store has no such
    /// product.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn delete_product(&self, id: &ProductId) -> Result<(), InventoryError> {
        self.client
            .delete_product(id)
            .await
            .map_err(|e| not_found_as_product(e, id))?;
        info!("Product deleted");
        self.refresh_after_write().await;
        Ok(())
    }

    // =========================================================================
    // Internals
    // =========================================================================

    async fn replace_snapshot(&self, products: Vec<Product>, at: DateTime<Utc>) -> Snapshot {
        let snapshot = Snapshot::new(products, at);
        *self.snapshot.write().await = Some(snapshot.clone());
        snapshot
    }

    /// Refresh following an accepted write; a failure leaves the old
    /// snapshot in place.
    async fn refresh_after_write(&self) {
        if let Err(e) = self.refresh().await {
            warn!(error = %e, "Snapshot refresh after write failed");
        }
    }

    /// Fetch, mutate, store, refresh.
    async fn mutate<F>(&self, id: &ProductId, apply: F) -> Result<Product, InventoryError>
    where
        F: FnOnce(&Product, &Warehouseman, DateTime<Utc>) -> Result<Product, InventoryError>,
    {
        let actor = self.actor.as_ref().ok_or(InventoryError::NotAuthenticated)?;
        let current = self
            .client
            .get_product(id)
            .await
            .map_err(|e| not_found_as_product(e, id))?;

        let updated = apply(&current, actor, Utc::now())?;
        self.client
            .update_product(&updated)
            .await
            .map_err(|e| not_found_as_product(e, id))?;
        info!(
            product_id = %id,
            warehouseman_id = %actor.id,
            edits = updated.edited_by.len(),
            "Product updated"
        );

        self.refresh_after_write().await;
        Ok(updated)
    }
}

fn not_found_as_product(err: CatalogError, id: &ProductId) -> InventoryError {
    match err {
        CatalogError::NotFound(_) => InventoryError::ProductNotFound(id.clone()),
        other => InventoryError::Catalog(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(
            InventoryError::ProductNotFound(ProductId::new("42")).to_string(),
            "Product not found: 42"
        );
        assert_eq!(
            InventoryError::Validation(ValidationError::Required("name")).to_string(),
            "Invalid input: name is required"
        );
    }

    #[test]
    fn test_not_found_maps_to_product() {
        let err = not_found_as_product(
            CatalogError::NotFound("/products/42".to_string()),
            &ProductId::new("42"),
        );
        assert!(matches!(err, InventoryError::ProductNotFound(id) if id.as_str() == "42"));

        let err = not_found_as_product(
            CatalogError::InvalidUrl("x".to_string()),
            &ProductId::new("42"),
        );
        assert!(matches!(err, InventoryError::Catalog(_)));
    }
}
