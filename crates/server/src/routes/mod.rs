//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                     - Liveness check
//! GET  /health/ready               - Readiness check (database)
//!
//! # Customers (manager Basic auth)
//! GET  /customers.getAll           - All customers
//! GET  /customers.getAllActive     - Customers that are not blocked
//! GET  /customers.getById?id=      - One customer
//! POST /customers.save             - Create (id = 0) or update
//! POST /customers.removeById?id=   - Delete
//! POST /customers.blockById?id=    - Block
//! POST /customers.unblockById?id=  - Unblock
//!
//! # Tokens
//! POST /customers.token            - Exchange phone + password for a token
//! GET  /customers.me               - Customer behind a bearer token
//! ```

pub mod customers;
pub mod tokens;

use axum::{
    Router,
    extract::State,
    http::StatusCode,
    middleware,
    routing::{get, post},
};

use crate::middleware::require_manager;
use crate::state::AppState;

/// Build the application router with all routes and state attached.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/health/ready", get(readiness))
        .merge(manager_routes(state.clone()))
        .route("/customers.token", post(tokens::issue))
        .route("/customers.me", get(tokens::me))
        .with_state(state)
}

/// Customer management routes, behind the manager guard.
fn manager_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/customers.getAll", get(customers::get_all))
        .route("/customers.getAllActive", get(customers::get_all_active))
        .route("/customers.getById", get(customers::get_by_id))
        .route("/customers.save", post(customers::save))
        .route("/customers.removeById", post(customers::remove_by_id))
        .route("/customers.blockById", post(customers::block_by_id))
        .route("/customers.unblockById", post(customers::unblock_by_id))
        .route_layer(middleware::from_fn_with_state(state, require_manager))
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check dependencies.
async fn health() -> &'static str {
    "ok"
}

/// Readiness health check endpoint.
///
/// Verifies database connectivity before returning OK.
/// Returns 503 Service Unavailable if the database is not reachable.
async fn readiness(State(state): State<AppState>) -> StatusCode {
    match sqlx::query("SELECT 1").fetch_one(state.pool()).await {
        Ok(_) => StatusCode::OK,
        Err(_) => StatusCode::SERVICE_UNAVAILABLE,
    }
}
