//! Shared application state.

use std::sync::Arc;

use mybookmarks_core::{CategoryRepository, SessionStore};
use mybookmarks_db::Database;

use crate::services::{CategoryDirectory, CategoryMutator};

/// Handles shared by every request. Cloning is cheap.
#[derive(Clone)]
pub struct AppState {
    pub directory: CategoryDirectory,
    pub mutator: CategoryMutator,
    pub sessions: Arc<dyn SessionStore>,
    /// Present when backed by Postgres; used by the health check.
    pub db: Option<Database>,
}

impl AppState {
    /// Build state over any repository and session store.
    pub fn new(repo: Arc<dyn CategoryRepository>, sessions: Arc<dyn SessionStore>) -> Self {
        Self {
            directory: CategoryDirectory::new(repo.clone()),
            mutator: CategoryMutator::new(repo),
            sessions,
            db: None,
        }
    }

    /// Build state over a connected database.
    pub fn from_database(db: Database) -> Self {
        let mut state = Self::new(
            Arc::new(db.categories.clone()),
            Arc::new(db.sessions.clone()),
        );
        state.db = Some(db);
        state
    }
}
