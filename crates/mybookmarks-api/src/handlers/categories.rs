//! Category HTTP handlers.
//!
//! Mutations always answer 200 with a [`CategoryOutcome`] body when the
//! request reached the service; validation failures are part of that body,
//! not the status code.

use axum::{
    extract::{rejection::JsonRejection, rejection::PathRejection, Path, State},
    Json,
};

use mybookmarks_core::{Category, CategoryId, CategoryNameBody, CategoryOutcome};

use crate::{extract::CurrentUser, ApiError, AppState};

fn name_body(payload: Result<Json<CategoryNameBody>, JsonRejection>) -> Result<CategoryNameBody, ApiError> {
    payload
        .map(|Json(body)| body)
        .map_err(|rejection| ApiError::BadRequest(rejection.body_text()))
}

fn category_id(path: Result<Path<CategoryId>, PathRejection>) -> Result<CategoryId, ApiError> {
    path.map(|Path(id)| id)
        .map_err(|rejection| ApiError::BadRequest(rejection.body_text()))
}

/// List the caller's categories with bookmark counts.
///
/// # Returns
/// - 200 OK with `[{id, name, count}]`, uncategorized bucket last
/// - 503 when no connection is available, 500 on other storage failures
pub async fn list_categories(
    State(state): State<AppState>,
    CurrentUser(owner): CurrentUser,
) -> Result<Json<Vec<Category>>, ApiError> {
    Ok(Json(state.directory.list(owner).await?))
}

/// Create a category from `{"name": ...}`.
pub async fn create_category(
    State(state): State<AppState>,
    CurrentUser(owner): CurrentUser,
    payload: Result<Json<CategoryNameBody>, JsonRejection>,
) -> Result<Json<CategoryOutcome>, ApiError> {
    let body = name_body(payload)?;
    Ok(Json(state.mutator.create(&body.name, owner).await?))
}

/// Rename category `id` to `{"name": ...}`.
///
/// Renaming a category the caller does not have is a 500.
pub async fn update_category(
    State(state): State<AppState>,
    CurrentUser(owner): CurrentUser,
    path: Result<Path<CategoryId>, PathRejection>,
    payload: Result<Json<CategoryNameBody>, JsonRejection>,
) -> Result<Json<CategoryOutcome>, ApiError> {
    let id = category_id(path)?;
    let body = name_body(payload)?;
    Ok(Json(state.mutator.rename(id, &body.name, owner).await?))
}

/// Delete category `id`; its bookmarks become uncategorized.
pub async fn delete_category(
    State(state): State<AppState>,
    CurrentUser(owner): CurrentUser,
    path: Result<Path<CategoryId>, PathRejection>,
) -> Result<Json<CategoryOutcome>, ApiError> {
    let id = category_id(path)?;
    Ok(Json(state.mutator.delete(id, owner).await?))
}
