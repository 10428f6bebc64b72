//! # mybookmarks-api
//!
//! HTTP surface for per-user bookmark categories.
//!
//! ## Routes
//!
//! | Method | Path | Handler |
//! |--------|------|---------|
//! | GET | `/categories` | list with counts |
//! | POST | `/categories` | create |
//! | PUT | `/categories/:id` | rename |
//! | DELETE | `/categories/:id` | delete, bookmarks become uncategorized |
//! | GET | `/health` | database ping |
//!
//! The web client's POST-only routes (`/category/get`, `/category/add`,
//! `/category/edit/:id`, `/category/delete/:id`) map to the same handlers.

pub mod config;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod services;
pub mod state;
pub mod telemetry;

pub use error::ApiError;
pub use state::AppState;

use axum::{
    routing::{get, post, put},
    Router,
};
use tower_http::{
    limit::RequestBodyLimitLayer,
    request_id::{MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer},
    trace::TraceLayer,
};
use uuid::Uuid;

use handlers::{create_category, delete_category, health_check, list_categories, update_category};

/// Request bodies are a single short name.
pub const MAX_BODY_BYTES: usize = 16 * 1024;

#[derive(Clone, Copy)]
struct MakeRequestUuidV7;

impl MakeRequestId for MakeRequestUuidV7 {
    fn make_request_id<B>(&mut self, _request: &axum::http::Request<B>) -> Option<RequestId> {
        let id = Uuid::now_v7().to_string().parse().ok()?;
        Some(RequestId::new(id))
    }
}

/// Build the application router with its middleware stack.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/categories", get(list_categories).post(create_category))
        .route(
            "/categories/:id",
            put(update_category).delete(delete_category),
        )
        // POST-only routes used by the web client
        .route("/category/get", post(list_categories))
        .route("/category/add", post(create_category))
        .route("/category/edit/:id", post(update_category))
        .route("/category/delete/:id", post(delete_category))
        .route("/health", get(health_check))
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuidV7))
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
        .with_state(state)
}
