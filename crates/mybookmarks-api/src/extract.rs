//! Request extractors.

use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts, HeaderMap},
};

use mybookmarks_core::UserId;

use crate::{ApiError, AppState};

/// Cookie carrying the session token for browser clients.
pub const SESSION_COOKIE: &str = "session";

/// The authenticated owner of the request.
///
/// Resolved from a `Bearer` Authorization header, falling back to the
/// `session` cookie. Requests without a known session are rejected with 401.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CurrentUser(pub UserId);

/// Pull the session token out of the request headers.
pub fn session_token(headers: &HeaderMap) -> Option<&str> {
    let bearer = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty());
    if bearer.is_some() {
        return bearer;
    }

    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .map(|(_, value)| value.trim())
        .filter(|t| !t.is_empty())
}

#[axum::async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = session_token(&parts.headers)
            .ok_or_else(|| ApiError::Unauthorized("missing session".to_string()))?;

        match state.sessions.user_for_token(token).await? {
            Some(user_id) => Ok(CurrentUser(user_id)),
            None => Err(ApiError::Unauthorized("unknown session".to_string())),
        }
    }
}
