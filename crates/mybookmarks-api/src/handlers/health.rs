//! Liveness and storage readiness.

use axum::{extract::State, http::StatusCode, Json};
use serde_json::{json, Value};
use tracing::warn;

use crate::AppState;

/// `GET /health`
///
/// 200 when the database answers a trivial query (or no database is
/// attached), 503 otherwise.
pub async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    if let Some(db) = &state.db {
        if let Err(e) = db.ping().await {
            warn!(subsystem = "api", component = "health", error = %e, "Database ping failed");
            return (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "status": "unavailable",
                    "version": env!("CARGO_PKG_VERSION"),
                })),
            );
        }
    }

    (
        StatusCode::OK,
        Json(json!({
            "status": "healthy",
            "version": env!("CARGO_PKG_VERSION"),
        })),
    )
}
