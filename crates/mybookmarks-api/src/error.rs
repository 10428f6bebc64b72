//! HTTP error mapping.
//!
//! Every failure is reported by status code alone; the body is empty.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::error;

/// Errors a handler can return.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("unauthorized: {0}")]
    Unauthorized(String),

    #[error("storage unavailable: {0}")]
    Unavailable(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<mybookmarks_core::Error> for ApiError {
    fn from(err: mybookmarks_core::Error) -> Self {
        error!(
            subsystem = "api",
            component = "error",
            error = %err,
            "Request failed"
        );
        if err.is_unavailable() {
            ApiError::Unavailable(err.to_string())
        } else {
            ApiError::Internal(err.to_string())
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        self.status().into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mybookmarks_core::Error;

    #[test]
    fn test_pool_exhaustion_maps_to_503() {
        let api: ApiError = Error::Database(sqlx::Error::PoolTimedOut).into();
        assert_eq!(api.status(), StatusCode::SERVICE_UNAVAILABLE);

        let api: ApiError = Error::Database(sqlx::Error::PoolClosed).into();
        assert_eq!(api.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[test]
    fn test_statement_failure_maps_to_500() {
        let api: ApiError = Error::Database(sqlx::Error::RowNotFound).into();
        assert_eq!(api.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_missing_category_maps_to_500() {
        let api: ApiError = Error::CategoryNotFound(7).into();
        assert_eq!(api.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_rejection_statuses() {
        assert_eq!(
            ApiError::BadRequest("id".to_string()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::Unauthorized("no session".to_string()).status(),
            StatusCode::UNAUTHORIZED
        );
    }

    #[test]
    fn test_response_has_empty_body() {
        let response = ApiError::Internal("boom".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(response.headers().get(axum::http::header::CONTENT_TYPE).is_none());
    }
}
