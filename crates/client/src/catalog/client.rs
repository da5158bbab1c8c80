//! Catalog store HTTP client.

use secrecy::SecretString;
use serde::{Deserialize, Deserializer, de::DeserializeOwned};
use stockroom_core::{
    NewProduct, Product, ProductId, RemoteStatistics, Warehouseman, WarehousemanId,
};
use tracing::{debug, instrument};
use url::Url;

use super::CatalogError;
use crate::config::ClientConfig;

/// An identity record as the store serves it, secret key included.
///
/// Implements `Debug` manually to redact the key.
#[derive(Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WarehousemanRecord {
    /// Identifier.
    #[serde(deserialize_with = "stockroom_core::types::lenient::id")]
    pub id: WarehousemanId,
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Shared secret the warehouseman logs in with.
    #[serde(deserialize_with = "secret")]
    pub secret_key: SecretString,
}

impl std::fmt::Debug for WarehousemanRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WarehousemanRecord")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("secret_key", &"[REDACTED]")
            .finish()
    }
}

impl WarehousemanRecord {
    /// Drop the key, keeping only what edit records need.
    #[must_use]
    pub fn into_identity(self) -> Warehouseman {
        Warehouseman {
            id: self.id,
            name: self.name,
        }
    }
}

fn secret<'de, D>(deserializer: D) -> Result<SecretString, D::Error>
where
    D: Deserializer<'de>,
{
    String::deserialize(deserializer).map(SecretString::from)
}

/// Catalog store REST client.
///
/// Cheap to clone; clones share the underlying connection pool.
#[derive(Debug, Clone)]
pub struct CatalogClient {
    client: reqwest::Client,
    base_url: Url,
}

impl CatalogClient {
    /// Create a client for the configured catalog store.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Http` if the HTTP client cannot be built.
    pub fn new(config: &ClientConfig) -> Result<Self, CatalogError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()?;

        let mut base_url = config.api_url.clone();
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        Ok(Self { client, base_url })
    }

    /// The normalized base URL (always ends with `/`).
    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    // =========================================================================
    // Products
    // =========================================================================

    /// Fetch every product.
    ///
    /// # Errors
    ///
    /// Returns an error on network failure, a non-success status, or a body
    /// that is not a product list.
    #[instrument(skip(self))]
    pub async fn list_products(&self) -> Result<Vec<Product>, CatalogError> {
        let products: Vec<Product> = self.get_json(self.endpoint("products")?).await?;
        debug!(count = products.len(), "Fetched products");
        Ok(products)
    }

    /// Fetch one product.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::NotFound` if the store has no such product.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn get_product(&self, id: &ProductId) -> Result<Product, CatalogError> {
        self.get_json(self.product_url(id)?).await
    }

    /// Create a product; the store assigns its identifier.
    ///
    /// # Errors
    ///
    /// Returns an error on network failure or a non-success status.
    #[instrument(skip(self, product), fields(name = %product.name))]
    pub async fn create_product(&self, product: &NewProduct) -> Result<Product, CatalogError> {
        let request = self.client.post(self.endpoint("products")?).json(product);
        let created: Product = Self::read_json(request.send().await?).await?;
        debug!(product_id = %created.id, "Product created");
        Ok(created)
    }

    /// Replace a product with `product`.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::NotFound` if the product was deleted meanwhile.
    #[instrument(skip(self, product), fields(product_id = %product.id))]
    pub async fn update_product(&self, product: &Product) -> Result<Product, CatalogError> {
        let request = self.client.put(self.product_url(&product.id)?).json(product);
        Self::read_json(request.send().await?).await
    }

    /// Delete a product.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::NotFound` if the product does not exist.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn delete_product(&self, id: &ProductId) -> Result<(), CatalogError> {
        let response = self.client.delete(self.product_url(id)?).send().await?;
        Self::check_status(response).await?;
        debug!("Product deleted");
        Ok(())
    }

    // =========================================================================
    // Statistics & Identities
    // =========================================================================

    /// Fetch the statistics the store computes itself.
    ///
    /// # Errors
    ///
    /// Returns an error on network failure or a malformed body.
    #[instrument(skip(self))]
    pub async fn remote_statistics(&self) -> Result<RemoteStatistics, CatalogError> {
        self.get_json(self.endpoint("statistics")?).await
    }

    /// Fetch the identity list.
    ///
    /// # Errors
    ///
    /// Returns an error on network failure or a malformed body.
    #[instrument(skip(self))]
    pub async fn list_warehousemen(&self) -> Result<Vec<WarehousemanRecord>, CatalogError> {
        self.get_json(self.endpoint("warehousemans")?).await
    }

    // =========================================================================
    // Request Plumbing
    // =========================================================================

    fn endpoint(&self, path: &str) -> Result<Url, CatalogError> {
        self.base_url
            .join(path)
            .map_err(|e| CatalogError::InvalidUrl(e.to_string()))
    }

    fn product_url(&self, id: &ProductId) -> Result<Url, CatalogError> {
        let mut url = self.endpoint("products")?;
        url.path_segments_mut()
            .map_err(|()| CatalogError::InvalidUrl(self.base_url.to_string()))?
            .push(id.as_str());
        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, CatalogError> {
        let response = self.client.get(url).send().await?;
        Self::read_json(response).await
    }

    async fn read_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, CatalogError> {
        let body = Self::check_status(response).await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// Map error statuses to errors and return the body of a success.
    async fn check_status(response: reqwest::Response) -> Result<String, CatalogError> {
        let status = response.status();
        let path = response.url().path().to_owned();

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(CatalogError::NotFound(path));
        }

        let body = response.text().await?;
        if !status.is_success() {
            return Err(CatalogError::Status { status, body });
        }
        Ok(body)
    }
}
