//! # mybookmarks-db
//!
//! PostgreSQL storage gateway for mybookmarks.
//!
//! This crate provides:
//! - Connection pool management
//! - The category repository (per-owner names, counts, delete cascade)
//! - Session lookup for the HTTP layer
//! - In-memory implementations of both for tests
//!
//! ## Example
//!
//! ```rust,ignore
//! use mybookmarks_db::{CategoryRepository, Database};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let db = Database::connect("postgres://localhost/mybookmarks").await?;
//!
//!     let id = db.categories.insert("Reading", 1).await?;
//!     println!("Created category: {}", id);
//!     Ok(())
//! }
//! ```
pub mod categories;
pub mod mock;
pub mod pool;
pub mod sessions;

// Test fixtures for integration tests
pub mod test_fixtures;

// Re-export core types
pub use mybookmarks_core::*;

// Re-export repository implementations
pub use categories::PgCategoryRepository;
pub use pool::{create_pool, create_pool_with_config, log_pool_metrics, PoolConfig};
pub use sessions::PgSessionStore;

/// Combined database context with all repositories.
#[derive(Clone)]
pub struct Database {
    /// The underlying connection pool.
    pub pool: sqlx::Pool<sqlx::Postgres>,
    /// Category repository.
    pub categories: PgCategoryRepository,
    /// Session lookup.
    pub sessions: PgSessionStore,
}

impl Database {
    /// Create a new Database instance from a connection pool.
    pub fn new(pool: sqlx::Pool<sqlx::Postgres>) -> Self {
        Self {
            categories: PgCategoryRepository::new(pool.clone()),
            sessions: PgSessionStore::new(pool.clone()),
            pool,
        }
    }

    /// Create a new Database instance by connecting to the given URL.
    pub async fn connect(url: &str) -> Result<Self> {
        let pool = create_pool(url).await?;
        Ok(Self::new(pool))
    }

    /// Create with custom pool configuration.
    pub async fn connect_with_config(url: &str, config: PoolConfig) -> Result<Self> {
        let pool = create_pool_with_config(url, config).await?;
        Ok(Self::new(pool))
    }

    /// Run pending migrations.
    #[cfg(feature = "migrations")]
    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("../../migrations")
            .run(&self.pool)
            .await
            .map_err(|e| Error::Database(sqlx::Error::Migrate(Box::new(e))))?;
        Ok(())
    }

    /// Check that the database answers a trivial query.
    pub async fn ping(&self) -> Result<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(Error::Database)?;
        Ok(())
    }

    /// Get the underlying connection pool.
    pub fn pool(&self) -> &sqlx::Pool<sqlx::Postgres> {
        &self.pool
    }

    /// Close every pooled connection. Pending acquires fail with `PoolClosed`.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}
