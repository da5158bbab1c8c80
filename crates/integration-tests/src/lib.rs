//! Integration tests for Stockroom.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p stockroom-integration-tests
//! ```
//!
//! No external services are needed: every test starts a [`FakeStore`], an
//! in-process catalog store served by axum on an ephemeral port, and points
//! the real client at it.
//!
//! # Test Categories
//!
//! - `catalog_client` - REST client against the wire format
//! - `inventory_flows` - Mutate-then-refresh flows and edit records
//! - `statistics` - Local aggregation merged with store statistics
//! - `auth` - Secret-key identification

use std::sync::{Arc, Mutex, MutexGuard};

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::get,
};
use serde_json::{Value, json};
use stockroom_client::ClientConfig;
use url::Url;

// =============================================================================
// Fake Catalog Store
// =============================================================================

/// Everything the fake store holds.
#[derive(Debug, Clone, Default)]
pub struct StoreState {
    /// Product records exactly as the store would serve them.
    pub products: Vec<Value>,
    /// Identity list, secret keys included.
    pub warehousemen: Vec<Value>,
    /// Body of `GET /statistics`; `null` is served as `{}`.
    pub statistics: Value,
    /// When set, `GET /statistics` answers with this status instead.
    pub statistics_failure: Option<StatusCode>,
    /// When set, `GET /products` answers with this status instead.
    pub list_failure: Option<StatusCode>,
    /// `METHOD /path` of every request received, in order.
    pub requests: Vec<String>,
    pub next_id: u64,
}

type Shared = Arc<Mutex<StoreState>>;

/// An in-process catalog store.
///
/// The server runs on the current tokio runtime and stops with it.
#[derive(Debug, Clone)]
pub struct FakeStore {
    url: Url,
    state: Shared,
}

impl FakeStore {
    /// Start a store holding `products` and the default identity list.
    pub async fn start(products: Vec<Value>) -> Self {
        Self::start_with(StoreState {
            products,
            warehousemen: fixtures::warehousemen(),
            statistics: json!({}),
            ..StoreState::default()
        })
        .await
    }

    /// Start a store from a full initial state.
    pub async fn start_with(mut initial: StoreState) -> Self {
        initial.next_id = 1000;
        if initial.statistics.is_null() {
            initial.statistics = json!({});
        }
        let state: Shared = Arc::new(Mutex::new(initial));

        let app = Router::new()
            .route("/products", get(list_products).post(create_product))
            .route(
                "/products/{id}",
                get(get_product).put(update_product).delete(delete_product),
            )
            .route("/statistics", get(statistics))
            .route("/warehousemans", get(warehousemen))
            .with_state(Arc::clone(&state));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind fake store");
        let addr = listener.local_addr().expect("Failed to read fake store address");
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("Fake store failed");
        });

        let url = Url::parse(&format!("http://{addr}")).expect("Invalid fake store URL");
        Self { url, state }
    }

    /// Base URL of the store.
    #[must_use]
    pub const fn url(&self) -> &Url {
        &self.url
    }

    /// Client configuration pointing at this store.
    #[must_use]
    pub fn config(&self) -> ClientConfig {
        ClientConfig::new(self.url.clone())
    }

    /// Lock the store state for inspection or changes.
    pub fn state(&self) -> MutexGuard<'_, StoreState> {
        self.state.lock().expect("Fake store lock poisoned")
    }

    /// Current record of one product, if stored.
    #[must_use]
    pub fn product(&self, id: &str) -> Option<Value> {
        self.state()
            .products
            .iter()
            .find(|p| id_text(&p["id"]) == id)
            .cloned()
    }

    /// Requests received so far.
    #[must_use]
    pub fn requests(&self) -> Vec<String> {
        self.state().requests.clone()
    }

    /// Number of requests received matching `method_and_path` exactly.
    #[must_use]
    pub fn count(&self, method_and_path: &str) -> usize {
        self.state()
            .requests
            .iter()
            .filter(|r| *r == method_and_path)
            .count()
    }
}

/// Identifiers may be stored as strings or numbers.
fn id_text(id: &Value) -> String {
    match id {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn lock(state: &Shared) -> MutexGuard<'_, StoreState> {
    state.lock().expect("Fake store lock poisoned")
}

fn record(store: &mut StoreState, request: String) {
    store.requests.push(request);
}

// =============================================================================
// Handlers
// =============================================================================

async fn list_products(State(state): State<Shared>) -> Result<Json<Value>, (StatusCode, String)> {
    let mut store = lock(&state);
    record(&mut store, "GET /products".to_string());
    match store.list_failure {
        Some(status) => Err((status, "product list unavailable".to_string())),
        None => Ok(Json(Value::Array(store.products.clone()))),
    }
}

async fn get_product(
    State(state): State<Shared>,
    Path(id): Path<String>,
) -> Result<Json<Value>, StatusCode> {
    let mut store = lock(&state);
    record(&mut store, format!("GET /products/{id}"));
    store
        .products
        .iter()
        .find(|p| id_text(&p["id"]) == id)
        .cloned()
        .map(Json)
        .ok_or(StatusCode::NOT_FOUND)
}

async fn create_product(
    State(state): State<Shared>,
    Json(mut body): Json<Value>,
) -> Result<(StatusCode, Json<Value>), StatusCode> {
    let mut store = lock(&state);
    record(&mut store, "POST /products".to_string());

    let Value::Object(fields) = &mut body else {
        return Err(StatusCode::BAD_REQUEST);
    };
    store.next_id += 1;
    fields.insert("id".to_string(), json!(store.next_id));

    store.products.push(body.clone());
    Ok((StatusCode::CREATED, Json(body)))
}

async fn update_product(
    State(state): State<Shared>,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Result<Json<Value>, StatusCode> {
    let mut store = lock(&state);
    record(&mut store, format!("PUT /products/{id}"));

    let slot = store
        .products
        .iter_mut()
        .find(|p| id_text(&p["id"]) == id)
        .ok_or(StatusCode::NOT_FOUND)?;
    *slot = body.clone();
    Ok(Json(body))
}

async fn delete_product(State(state): State<Shared>, Path(id): Path<String>) -> StatusCode {
    let mut store = lock(&state);
    record(&mut store, format!("DELETE /products/{id}"));

    let before = store.products.len();
    store.products.retain(|p| id_text(&p["id"]) != id);
    if store.products.len() == before {
        StatusCode::NOT_FOUND
    } else {
        StatusCode::OK
    }
}

async fn statistics(State(state): State<Shared>) -> Result<Json<Value>, (StatusCode, String)> {
    let mut store = lock(&state);
    record(&mut store, "GET /statistics".to_string());
    match store.statistics_failure {
        Some(status) => Err((status, "statistics unavailable".to_string())),
        None => Ok(Json(store.statistics.clone())),
    }
}

async fn warehousemen(State(state): State<Shared>) -> Json<Value> {
    let mut store = lock(&state);
    record(&mut store, "GET /warehousemans".to_string());
    Json(Value::Array(store.warehousemen.clone()))
}

// =============================================================================
// Fixtures
// =============================================================================

/// Catalog records shaped like the store's own data.
pub mod fixtures {
    use serde_json::{Value, json};

    /// Secret key of warehouseman #1, John.
    pub const JOHN_KEY: &str = "secret123";

    /// Secret key of warehouseman #2, Jane.
    pub const JANE_KEY: &str = "key456";

    /// Price 1.50, 10 units at warehouse 1 and 5 at warehouse 2.
    #[must_use]
    pub fn apple() -> Value {
        json!({
            "id": 1,
            "name": "Apple",
            "type": "fruit",
            "barcode": "1111111111111",
            "price": 1.5,
            "supplier": "Orchard Co",
            "image": "https://example.com/apple.png",
            "stocks": [
                {
                    "id": 1,
                    "name": "North",
                    "quantity": 10,
                    "localisation": {"city": "Lyon", "latitude": 45.76, "longitude": 4.83}
                },
                {
                    "id": 2,
                    "name": "South",
                    "quantity": 5,
                    "localisation": {"city": "Marseille", "latitude": 43.29, "longitude": 5.37}
                }
            ],
            "editedBy": []
        })
    }

    /// Price 0.50, no stock anywhere.
    #[must_use]
    pub fn banana() -> Value {
        json!({
            "id": 2,
            "name": "Banana",
            "type": "fruit",
            "barcode": "2222222222222",
            "price": 0.5,
            "supplier": "Tropico",
            "image": "",
            "stocks": [
                {
                    "id": 1,
                    "name": "North",
                    "quantity": 0,
                    "localisation": {"city": "Lyon", "latitude": 45.76, "longitude": 4.83}
                }
            ],
            "editedBy": [
                {"warehousemanId": 2, "at": "2024-01-15T10:00:00Z"}
            ]
        })
    }

    /// Identity list served at `/warehousemans`.
    #[must_use]
    pub fn warehousemen() -> Vec<Value> {
        vec![
            json!({"id": 1, "name": "John", "secretKey": JOHN_KEY, "city": "Lyon"}),
            json!({"id": 2, "name": "Jane", "secretKey": JANE_KEY, "city": "Paris"}),
        ]
    }
}
