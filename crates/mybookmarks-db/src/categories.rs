//! Category repository implementation.

use async_trait::async_trait;
use sqlx::{Pool, Postgres, Row};
use tracing::{debug, info};

use mybookmarks_core::{Category, CategoryId, CategoryRepository, Error, Result, UserId};

/// PostgreSQL implementation of CategoryRepository.
#[derive(Clone)]
pub struct PgCategoryRepository {
    pool: Pool<Postgres>,
}

impl PgCategoryRepository {
    /// Create a new PgCategoryRepository with the given connection pool.
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

/// Map a write error, turning a `(user_id, category)` unique violation into
/// [`Error::DuplicateCategory`].
fn map_write_error(err: sqlx::Error, name: &str) -> Error {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.is_unique_violation() {
            return Error::DuplicateCategory(name.to_string());
        }
    }
    Error::Database(err)
}

#[async_trait]
impl CategoryRepository for PgCategoryRepository {
    async fn find_id_by_name(&self, name: &str, owner: UserId) -> Result<Option<CategoryId>> {
        let id = sqlx::query_scalar::<_, i64>(
            "SELECT id FROM category WHERE category = $1 AND user_id = $2",
        )
        .bind(name)
        .bind(owner)
        .fetch_optional(&self.pool)
        .await
        .map_err(Error::Database)?;
        Ok(id)
    }

    async fn get_name(&self, id: CategoryId, owner: UserId) -> Result<Option<String>> {
        let name = sqlx::query_scalar::<_, String>(
            "SELECT category FROM category WHERE id = $1 AND user_id = $2",
        )
        .bind(id)
        .bind(owner)
        .fetch_optional(&self.pool)
        .await
        .map_err(Error::Database)?;
        Ok(name)
    }

    async fn insert(&self, name: &str, owner: UserId) -> Result<CategoryId> {
        let id = sqlx::query_scalar::<_, i64>(
            "INSERT INTO category (category, user_id) VALUES ($1, $2) RETURNING id",
        )
        .bind(name)
        .bind(owner)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_write_error(e, name))?;

        debug!(
            subsystem = "db",
            component = "categories",
            op = "insert",
            user_id = owner,
            category_id = id,
            "Category inserted"
        );
        Ok(id)
    }

    async fn list_with_counts(&self, owner: UserId) -> Result<Vec<Category>> {
        let rows = sqlx::query(
            "SELECT id, category, count FROM categories WHERE user_id = $1 ORDER BY id",
        )
        .bind(owner)
        .fetch_all(&self.pool)
        .await
        .map_err(Error::Database)?;

        Ok(rows
            .into_iter()
            .map(|r| Category {
                id: r.get("id"),
                name: r.get("category"),
                count: r.get("count"),
            })
            .collect())
    }

    async fn count_uncategorized(&self, owner: UserId) -> Result<i64> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT count(*) FROM bookmark WHERE category_id = 0 AND user_id = $1",
        )
        .bind(owner)
        .fetch_one(&self.pool)
        .await
        .map_err(Error::Database)?;
        Ok(count)
    }

    async fn rename(&self, id: CategoryId, name: &str, owner: UserId) -> Result<u64> {
        let result = sqlx::query("UPDATE category SET category = $1 WHERE id = $2 AND user_id = $3")
            .bind(name)
            .bind(id)
            .bind(owner)
            .execute(&self.pool)
            .await
            .map_err(|e| map_write_error(e, name))?;
        Ok(result.rows_affected())
    }

    async fn delete_and_reassign(&self, id: CategoryId, owner: UserId) -> Result<u64> {
        let mut tx = self.pool.begin().await.map_err(Error::Database)?;

        let deleted = sqlx::query("DELETE FROM category WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(owner)
            .execute(&mut *tx)
            .await
            .map_err(Error::Database)?
            .rows_affected();

        // Move bookmarks to uncategorized
        let reassigned =
            sqlx::query("UPDATE bookmark SET category_id = 0 WHERE category_id = $1 AND user_id = $2")
                .bind(id)
                .bind(owner)
                .execute(&mut *tx)
                .await
                .map_err(Error::Database)?
                .rows_affected();

        tx.commit().await.map_err(Error::Database)?;

        info!(
            subsystem = "db",
            component = "categories",
            op = "delete",
            user_id = owner,
            category_id = id,
            deleted,
            reassigned,
            "Category deleted"
        );
        Ok(reassigned)
    }
}
