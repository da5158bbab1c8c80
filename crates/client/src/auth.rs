//! Secret-key identification of warehousemen.
//!
//! The catalog store publishes its identity list, keys included, and the
//! client picks the entry whose key matches. This identifies who is making
//! edits; it is not an access-control boundary.

use secrecy::{ExposeSecret, SecretString};
use stockroom_core::Warehouseman;
use tracing::{info, instrument, warn};

use crate::catalog::{CatalogClient, CatalogError, WarehousemanRecord};

/// Find the warehouseman whose secret key equals `secret_key`.
///
/// Returns `Ok(None)` when no entry matches. The first match wins if the
/// store holds duplicate keys.
///
/// # Errors
///
/// Returns an error if the identity list cannot be fetched.
#[instrument(skip(client, secret_key))]
pub async fn authenticate(
    client: &CatalogClient,
    secret_key: &SecretString,
) -> Result<Option<Warehouseman>, CatalogError> {
    let records = client.list_warehousemen().await?;
    let identity = match_secret_key(records, secret_key);

    match &identity {
        Some(who) => info!(warehouseman_id = %who.id, "Secret key accepted"),
        None => warn!("Secret key rejected"),
    }

    Ok(identity)
}

/// Pick the first record whose key equals `secret_key`.
#[must_use]
pub fn match_secret_key(
    records: Vec<WarehousemanRecord>,
    secret_key: &SecretString,
) -> Option<Warehouseman> {
    let wanted = secret_key.expose_secret();
    if wanted.is_empty() {
        return None;
    }
    records
        .into_iter()
        .find(|record| record.secret_key.expose_secret() == wanted)
        .map(WarehousemanRecord::into_identity)
}

#[cfg(test)]
mod tests {
    use stockroom_core::WarehousemanId;

    use super::*;

    fn records() -> Vec<WarehousemanRecord> {
        serde_json::from_str(
            r#"[
                {"id": 1, "name": "John", "secretKey": "secret123"},
                {"id": 2, "name": "Jane", "secretKey": "key456"},
                {"id": 3, "name": "Jack", "secretKey": "key456"}
            ]"#,
        )
        .unwrap()
    }

    fn key(s: &str) -> SecretString {
        SecretString::from(s.to_string())
    }

    #[test]
    fn test_valid_key() {
        let who = match_secret_key(records(), &key("secret123")).unwrap();
        assert_eq!(who.id, WarehousemanId::new(1));
        assert_eq!(who.name, "John");
    }

    #[test]
    fn test_invalid_key() {
        assert!(match_secret_key(records(), &key("wrongkey")).is_none());
    }

    #[test]
    fn test_keys_are_case_sensitive() {
        assert!(match_secret_key(records(), &key("SECRET123")).is_none());
    }

    #[test]
    fn test_first_duplicate_wins() {
        let who = match_secret_key(records(), &key("key456")).unwrap();
        assert_eq!(who.name, "Jane");
    }

    #[test]
    fn test_empty_key_never_matches() {
        let mut list = records();
        list.push(
            serde_json::from_str(r#"{"id": 9, "name": "Blank", "secretKey": ""}"#).unwrap(),
        );
        assert!(match_secret_key(list, &key("")).is_none());
    }
}
