//! Integration test support for StoreDesk.
//!
//! [`FakeBackend`] serves the subset of the store API the client uses from an
//! in-memory state on an ephemeral local port, and records every request it
//! receives so tests can assert on headers and request counts.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p storedesk-integration-tests
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::net::SocketAddr;
use std::sync::{Arc, Mutex, PoisonError};

use axum::extract::{Multipart, Path, Request, State};
use axum::http::{HeaderMap, Method, StatusCode, header};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post, put};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::{Value, json};
use storedesk_client::ClientConfig;

/// Password the fake backend accepts for every account.
pub const VALID_PASSWORD: &str = "secret123";

/// A request the backend received.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedRequest {
    pub method: Method,
    pub path: String,
    pub authorization: Option<String>,
    pub request_id: Option<String>,
}

#[derive(Debug, Default)]
struct BackendState {
    requests: Vec<RecordedRequest>,
    categories: Vec<Value>,
    products: Vec<Value>,
    employees: Vec<Value>,
    users: Vec<Value>,
    last_user_update: Option<Value>,
    next_id: u32,
    verify_success: bool,
    history_down: bool,
}

impl BackendState {
    fn next_id(&mut self, prefix: &str) -> String {
        self.next_id += 1;
        format!("{prefix}{}", self.next_id)
    }
}

type Shared = Arc<Mutex<BackendState>>;

fn lock(state: &Shared) -> std::sync::MutexGuard<'_, BackendState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

/// In-process stand-in for the store backend.
pub struct FakeBackend {
    addr: SocketAddr,
    state: Shared,
    server: tokio::task::JoinHandle<()>,
}

impl FakeBackend {
    /// Start the backend on `127.0.0.1` with an OS-assigned port.
    ///
    /// # Panics
    ///
    /// Panics if the listener cannot be bound.
    #[allow(clippy::unwrap_used)]
    pub async fn start() -> Self {
        let state: Shared = Arc::new(Mutex::new(BackendState {
            verify_success: true,
            ..BackendState::default()
        }));

        let app = Router::new()
            .route("/auth/login", post(login))
            .route("/categories", get(list_categories).post(create_category))
            .route("/categories/{id}", put(update_category).delete(delete_category))
            .route("/class", get(list_products))
            .route("/class/mara", get(list_products))
            .route("/class/create", post(create_product))
            .route("/class/{id}", put(update_product).delete(delete_product))
            .route("/products", post(create_product))
            .route("/uploads", post(upload))
            .route("/employees", get(list_employees).post(create_employee))
            .route("/employees/{id}", put(update_employee).delete(delete_employee))
            .route("/users", get(list_users).post(create_user))
            .route("/users/{id}", put(update_user).delete(delete_user))
            .route("/payments/create-order", post(create_order))
            .route("/payments/verify-payment", post(verify_payment))
            .route("/payments/history", get(payment_history))
            .route("/sales/top-items", get(top_items))
            .route("/sales/transactions-by-hour", get(transactions_by_hour))
            .layer(middleware::from_fn_with_state(state.clone(), record))
            .with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let server = tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Self {
            addr,
            state,
            server,
        }
    }

    #[must_use]
    pub fn url(&self) -> String {
        format!("http://{}/", self.addr)
    }

    /// Client configuration pointing at this backend.
    ///
    /// # Panics
    ///
    /// Panics if the URL does not parse.
    #[must_use]
    #[allow(clippy::unwrap_used)]
    pub fn config(&self, state_dir: &std::path::Path) -> ClientConfig {
        let mut config = ClientConfig::new(&self.url(), state_dir).unwrap();
        config.payments.key_id = Some("rzp_test_key".to_string());
        config
    }

    /// Every request received so far, oldest first.
    #[must_use]
    pub fn requests(&self) -> Vec<RecordedRequest> {
        lock(&self.state).requests.clone()
    }

    /// Requests received for one method and path.
    #[must_use]
    pub fn count(&self, method: &Method, path: &str) -> usize {
        lock(&self.state)
            .requests
            .iter()
            .filter(|r| &r.method == method && r.path == path)
            .count()
    }

    /// Make signature verification succeed or fail.
    pub fn set_verify_success(&self, success: bool) {
        lock(&self.state).verify_success = success;
    }

    /// Make the payment history endpoint answer 500.
    pub fn set_history_down(&self, down: bool) {
        lock(&self.state).history_down = down;
    }

    /// Body of the most recent account update.
    #[must_use]
    pub fn last_user_update(&self) -> Option<Value> {
        lock(&self.state).last_user_update.clone()
    }

    /// Add a shop product.
    pub fn add_product(&self, id: &str, name: &str, price: f64) {
        lock(&self.state).products.push(json!({
            "_id": id,
            "name": name,
            "price": price,
            "description": format!("{name} description"),
            "stockcount": [10],
        }));
    }
}

impl Drop for FakeBackend {
    fn drop(&mut self) {
        self.server.abort();
    }
}

// =============================================================================
// Middleware
// =============================================================================

async fn record(State(state): State<Shared>, request: Request, next: Next) -> Response {
    let header_value = |headers: &HeaderMap, name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(String::from)
    };
    let recorded = RecordedRequest {
        method: request.method().clone(),
        path: request.uri().path().to_string(),
        authorization: header_value(request.headers(), header::AUTHORIZATION.as_str()),
        request_id: header_value(request.headers(), "x-request-id"),
    };
    lock(&state).requests.push(recorded);
    next.run(request).await
}

// =============================================================================
// Handlers
// =============================================================================

#[derive(Deserialize)]
struct LoginBody {
    email: String,
    password: String,
}

async fn login(Json(body): Json<LoginBody>) -> Response {
    if body.password != VALID_PASSWORD {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "error": "Invalid credentials" })),
        )
            .into_response();
    }
    let local = body.email.split('@').next().unwrap_or_default().to_string();
    let role = if local.starts_with("admin") {
        "admin"
    } else if local.starts_with("owner") {
        "owner"
    } else {
        "user"
    };
    Json(json!({
        "token": format!("tok-{local}"),
        "user": { "_id": format!("u-{local}"), "email": body.email, "role": role },
    }))
    .into_response()
}

#[derive(Deserialize)]
struct NameBody {
    name: String,
}

async fn list_categories(State(state): State<Shared>) -> Json<Value> {
    let categories = lock(&state).categories.clone();
    Json(json!({ "data": categories, "totalPages": 1 }))
}

async fn create_category(State(state): State<Shared>, Json(body): Json<NameBody>) -> Json<Value> {
    let mut state = lock(&state);
    let category = json!({ "_id": state.next_id("c"), "name": body.name });
    state.categories.push(category.clone());
    Json(json!({ "message": "Category created", "data": category }))
}

async fn update_category(
    State(state): State<Shared>,
    Path(id): Path<String>,
    Json(body): Json<NameBody>,
) -> Response {
    let mut state = lock(&state);
    match state
        .categories
        .iter_mut()
        .find(|c| c["_id"].as_str() == Some(id.as_str()))
    {
        Some(category) => {
            category["name"] = Value::String(body.name);
            Json(json!({ "message": "Category updated" })).into_response()
        }
        None => (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": "Category not found" })),
        )
            .into_response(),
    }
}

async fn delete_category(State(state): State<Shared>, Path(id): Path<String>) -> StatusCode {
    lock(&state)
        .categories
        .retain(|c| c["_id"].as_str() != Some(id.as_str()));
    StatusCode::NO_CONTENT
}

async fn list_products(State(state): State<Shared>) -> Json<Value> {
    let products = lock(&state).products.clone();
    Json(json!({ "data": products }))
}

// Generic record collections: create stores the body under a fresh `_id`,
// update merges the body's fields, delete drops the record.

fn insert_record(records: &mut Vec<Value>, id: String, mut body: Value) -> Value {
    body["_id"] = Value::String(id);
    records.push(body.clone());
    body
}

fn merge_record(records: &mut [Value], id: &str, body: &Value) -> Response {
    let Some(record) = records
        .iter_mut()
        .find(|r| r["_id"].as_str() == Some(id))
    else {
        return (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": "Record not found" })),
        )
            .into_response();
    };
    if let (Some(target), Some(fields)) = (record.as_object_mut(), body.as_object()) {
        for (key, value) in fields {
            target.insert(key.clone(), value.clone());
        }
    }
    Json(json!({ "message": "Updated" })).into_response()
}

fn remove_record(records: &mut Vec<Value>, id: &str) -> StatusCode {
    records.retain(|r| r["_id"].as_str() != Some(id));
    StatusCode::NO_CONTENT
}

async fn create_product(State(state): State<Shared>, Json(body): Json<Value>) -> Json<Value> {
    let mut state = lock(&state);
    let id = state.next_id("p");
    Json(insert_record(&mut state.products, id, body))
}

async fn update_product(
    State(state): State<Shared>,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Response {
    merge_record(&mut lock(&state).products, &id, &body)
}

async fn delete_product(State(state): State<Shared>, Path(id): Path<String>) -> StatusCode {
    remove_record(&mut lock(&state).products, &id)
}

async fn upload(mut multipart: Multipart) -> Response {
    while let Ok(Some(field)) = multipart.next_field().await {
        if let Some(name) = field.file_name().map(String::from) {
            return Json(json!({ "fileUrl": format!("/uploads/{name}") })).into_response();
        }
    }
    (
        StatusCode::BAD_REQUEST,
        Json(json!({ "error": "No file uploaded" })),
    )
        .into_response()
}

async fn list_employees(State(state): State<Shared>) -> Json<Value> {
    let employees = lock(&state).employees.clone();
    Json(json!({ "data": employees, "totalPages": 1 }))
}

async fn create_employee(State(state): State<Shared>, Json(body): Json<Value>) -> Json<Value> {
    let mut state = lock(&state);
    let id = state.next_id("e");
    Json(insert_record(&mut state.employees, id, body))
}

async fn update_employee(
    State(state): State<Shared>,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Response {
    merge_record(&mut lock(&state).employees, &id, &body)
}

async fn delete_employee(State(state): State<Shared>, Path(id): Path<String>) -> StatusCode {
    remove_record(&mut lock(&state).employees, &id)
}

async fn list_users(State(state): State<Shared>) -> Json<Value> {
    Json(Value::Array(lock(&state).users.clone()))
}

async fn create_user(State(state): State<Shared>, Json(mut body): Json<Value>) -> Json<Value> {
    let mut state = lock(&state);
    if let Some(fields) = body.as_object_mut() {
        fields.remove("password");
    }
    let id = state.next_id("u");
    Json(insert_record(&mut state.users, id, body))
}

async fn update_user(
    State(state): State<Shared>,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Response {
    let mut state = lock(&state);
    state.last_user_update = Some(body.clone());
    let mut fields = body;
    if let Some(object) = fields.as_object_mut() {
        object.remove("password");
    }
    merge_record(&mut state.users, &id, &fields)
}

async fn delete_user(State(state): State<Shared>, Path(id): Path<String>) -> StatusCode {
    remove_record(&mut lock(&state).users, &id)
}

#[derive(Deserialize)]
struct OrderBody {
    amount: f64,
}

#[allow(clippy::cast_possible_truncation)]
async fn create_order(State(state): State<Shared>, Json(body): Json<OrderBody>) -> Json<Value> {
    let mut state = lock(&state);
    Json(json!({
        "order": {
            "id": state.next_id("order_"),
            "amount": (body.amount * 100.0).round() as i64,
            "currency": "INR",
        }
    }))
}

async fn verify_payment(State(state): State<Shared>) -> Json<Value> {
    let success = lock(&state).verify_success;
    Json(json!({ "success": success }))
}

async fn payment_history(State(state): State<Shared>) -> Response {
    if lock(&state).history_down {
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    }
    Json(json!({
        "payments": [{
            "_id": "pay1",
            "orderId": "order_1",
            "paymentId": "pay_abc",
            "amount": 100,
            "status": "paid",
            "createdAt": "2025-01-01T10:00:00Z",
        }]
    }))
    .into_response()
}

async fn top_items() -> Json<Value> {
    Json(json!([
        { "name": "Notebook", "value": 240 },
        { "name": "Pen", "value": 60 },
    ]))
}

async fn transactions_by_hour() -> Json<Value> {
    Json(json!({
        "data": [[0, 4], [8, 2]],
        "days": ["Mon", "Tue"],
        "timeSlots": ["9-12", "12-15"],
    }))
}
