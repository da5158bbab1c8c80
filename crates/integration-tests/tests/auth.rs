//! Integration tests for secret-key identification.

use secrecy::SecretString;
use stockroom_client::auth::authenticate;
use stockroom_client::{CatalogClient, Inventory, InventoryError};
use stockroom_core::{AdjustmentPolicy, WarehousemanId};
use stockroom_integration_tests::{FakeStore, fixtures};

fn key(s: &str) -> SecretString {
    SecretString::from(s.to_string())
}

#[tokio::test]
async fn test_authenticate_valid_key() {
    let store = FakeStore::start(vec![]).await;
    let client = CatalogClient::new(&store.config()).unwrap();

    let who = authenticate(&client, &key(fixtures::JOHN_KEY))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(who.id, WarehousemanId::new(1));
    assert_eq!(who.name, "John");
    assert_eq!(store.requests(), vec!["GET /warehousemans"]);
}

#[tokio::test]
async fn test_authenticate_invalid_key() {
    let store = FakeStore::start(vec![]).await;
    let client = CatalogClient::new(&store.config()).unwrap();

    assert!(authenticate(&client, &key("wrongkey")).await.unwrap().is_none());
}

#[tokio::test]
async fn test_login_sets_actor() {
    let store = FakeStore::start(vec![]).await;
    let client = CatalogClient::new(&store.config()).unwrap();
    let mut inventory = Inventory::new(client, AdjustmentPolicy::Permissive);
    assert!(inventory.actor().is_none());

    let who = inventory.login(&key(fixtures::JANE_KEY)).await.unwrap();
    assert_eq!(who.name, "Jane");
    assert_eq!(inventory.actor().unwrap().id, WarehousemanId::new(2));
}

#[tokio::test]
async fn test_login_rejects_unknown_key() {
    let store = FakeStore::start(vec![]).await;
    let client = CatalogClient::new(&store.config()).unwrap();
    let mut inventory = Inventory::new(client, AdjustmentPolicy::Permissive);

    let err = inventory.login(&key("nope")).await.unwrap_err();
    assert!(matches!(err, InventoryError::InvalidSecretKey));
    assert!(inventory.actor().is_none());
}

#[tokio::test]
async fn test_connect_logs_in_with_configured_key() {
    let store = FakeStore::start(vec![fixtures::apple()]).await;
    let mut config = store.config();
    config.secret_key = Some(key(fixtures::JOHN_KEY));

    let inventory = Inventory::connect(&config).await.unwrap();
    assert_eq!(inventory.actor().unwrap().name, "John");

    let updated = inventory
        .adjust_stock(&"1".into(), stockroom_core::WarehouseId::new(1), 2)
        .await
        .unwrap();
    assert_eq!(updated.edited_by[0].warehouseman_name, "John");
}

#[tokio::test]
async fn test_connect_without_key_is_anonymous() {
    let store = FakeStore::start(vec![]).await;

    let inventory = Inventory::connect(&store.config()).await.unwrap();
    assert!(inventory.actor().is_none());
    assert!(store.requests().is_empty());
}
