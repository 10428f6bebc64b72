//! Session lookup backed by the `session` table.

use async_trait::async_trait;
use sqlx::{Pool, Postgres};

use mybookmarks_core::{Error, Result, SessionStore, UserId};

/// PostgreSQL implementation of SessionStore.
///
/// Sessions are written by the login flow, which lives outside this service;
/// this side only reads them.
#[derive(Clone)]
pub struct PgSessionStore {
    pool: Pool<Postgres>,
}

impl PgSessionStore {
    /// Create a new PgSessionStore with the given connection pool.
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SessionStore for PgSessionStore {
    async fn user_for_token(&self, token: &str) -> Result<Option<UserId>> {
        let user_id = sqlx::query_scalar::<_, i64>(
            "SELECT user_id FROM session
             WHERE token = $1 AND (expires_at IS NULL OR expires_at > now())",
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await
        .map_err(Error::Database)?;
        Ok(user_id)
    }
}
