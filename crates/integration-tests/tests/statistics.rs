//! Integration tests for fleet statistics.
//!
//! Totals are computed from the product list; the store contributes its
//! product count and rankings.

use axum::http::StatusCode;
use rust_decimal::Decimal;
use serde_json::json;
use stockroom_client::{CatalogClient, CatalogError, Inventory, InventoryError};
use stockroom_core::AdjustmentPolicy;
use stockroom_integration_tests::{FakeStore, StoreState, fixtures};

fn inventory(store: &FakeStore) -> Inventory {
    let client = CatalogClient::new(&store.config()).expect("Failed to build client");
    Inventory::new(client, AdjustmentPolicy::Permissive)
}

fn fruit_state(statistics: serde_json::Value) -> StoreState {
    StoreState {
        products: vec![fixtures::apple(), fixtures::banana()],
        statistics,
        ..StoreState::default()
    }
}

#[tokio::test]
async fn test_local_totals() {
    let store = FakeStore::start_with(fruit_state(json!({}))).await;

    let stats = inventory(&store).statistics().await.unwrap();
    assert_eq!(stats.total_products, 2);
    assert_eq!(stats.out_of_stock, 1);
    assert_eq!(stats.total_stock_value, 15);
    assert_eq!(stats.total_money_value, Decimal::new(2250, 2));
    assert!(stats.most_added_products.is_empty());
    assert!(stats.most_removed_products.is_empty());
}

#[tokio::test]
async fn test_remote_product_count_wins() {
    let store = FakeStore::start_with(fruit_state(json!({
        "totalProducts": 40,
        "mostAddedProducts": [{"name": "Apple", "count": 12}],
        "mostRemovedProducts": [{"name": "Banana", "count": 3}]
    })))
    .await;

    let stats = inventory(&store).statistics().await.unwrap();
    assert_eq!(stats.total_products, 40);
    assert_eq!(stats.out_of_stock, 1);
    assert_eq!(stats.total_money_value, Decimal::new(2250, 2));
    assert_eq!(stats.most_added_products, vec![json!({"name": "Apple", "count": 12})]);
    assert_eq!(stats.most_removed_products, vec![json!({"name": "Banana", "count": 3})]);
}

#[tokio::test]
async fn test_statistics_refreshes_snapshot() {
    let store = FakeStore::start_with(fruit_state(json!({}))).await;
    let inventory = inventory(&store);

    inventory.statistics().await.unwrap();
    assert_eq!(store.count("GET /statistics"), 1);
    assert_eq!(store.count("GET /products"), 1);

    // Already loaded by the statistics call
    inventory.snapshot().await.unwrap();
    assert_eq!(store.count("GET /products"), 1);
}

#[tokio::test]
async fn test_empty_catalog() {
    let store = FakeStore::start_with(StoreState::default()).await;

    let stats = inventory(&store).statistics().await.unwrap();
    assert_eq!(stats.total_products, 0);
    assert_eq!(stats.out_of_stock, 0);
    assert_eq!(stats.total_stock_value, 0);
    assert_eq!(stats.total_money_value, Decimal::ZERO);
}

#[tokio::test]
async fn test_store_failure_propagates() {
    let store = FakeStore::start_with(StoreState {
        statistics_failure: Some(StatusCode::INTERNAL_SERVER_ERROR),
        ..fruit_state(json!({}))
    })
    .await;

    let err = inventory(&store).statistics().await.unwrap_err();
    assert!(matches!(
        err,
        InventoryError::Catalog(CatalogError::Status { status, .. }) if status.as_u16() == 500
    ));
}

#[tokio::test]
async fn test_serializes_with_store_field_names() {
    let store = FakeStore::start_with(fruit_state(json!({"totalProducts": 2}))).await;

    let stats = inventory(&store).statistics().await.unwrap();
    let value = serde_json::to_value(&stats).unwrap();
    assert_eq!(value["totalProducts"], 2);
    assert_eq!(value["outOfStock"], 1);
    assert_eq!(value["totalStockValue"], 15);
}
