//! In-memory storage for deterministic testing.
//!
//! [`MockCategoryStore`] enforces the same `(owner, name)` uniqueness rule as
//! the Postgres schema, assigns ids from a sequence, rolls back a failed
//! delete cascade, and can inject failures or a lost insert race.
//!
//! ## Usage
//!
//! ```rust
//! use mybookmarks_db::mock::MockCategoryStore;
//! use mybookmarks_db::CategoryRepository;
//!
//! # tokio_test_block_on(async {
//! let store = MockCategoryStore::new();
//! let work = store.with_category(1, "Work");
//! store.add_bookmark(1, work);
//!
//! let listed = store.list_with_counts(1).await.unwrap();
//! assert_eq!(listed[0].count, 1);
//! # });
//! # fn tokio_test_block_on<F: std::future::Future>(f: F) -> F::Output {
//! #     tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(f)
//! # }
//! ```

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use mybookmarks_core::{
    Category, CategoryId, CategoryRepository, Error, Result, SessionStore, UserId,
    UNCATEGORIZED_ID,
};

/// A recorded repository call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockCall {
    pub operation: String,
    pub owner: UserId,
}

/// How an injected failure surfaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MockFailure {
    /// A failed statement (HTTP 500).
    Statement,
    /// No connection available (HTTP 503).
    Unavailable,
}

impl MockFailure {
    fn to_error(self) -> Error {
        match self {
            MockFailure::Statement => {
                Error::Database(sqlx::Error::Protocol("injected failure".to_string()))
            }
            MockFailure::Unavailable => Error::Database(sqlx::Error::PoolTimedOut),
        }
    }
}

#[derive(Debug, Clone)]
struct StoredCategory {
    id: CategoryId,
    owner: UserId,
    name: String,
}

#[derive(Debug, Clone)]
struct StoredBookmark {
    owner: UserId,
    category_id: CategoryId,
}

#[derive(Debug, Default)]
struct MockState {
    next_id: CategoryId,
    categories: Vec<StoredCategory>,
    bookmarks: Vec<StoredBookmark>,
    failures: HashMap<String, MockFailure>,
    /// `(owner, name)` pairs a concurrent request inserts just before ours.
    racing_inserts: HashSet<(UserId, String)>,
}

/// In-memory category repository.
#[derive(Clone, Default)]
pub struct MockCategoryStore {
    state: Arc<Mutex<MockState>>,
    call_log: Arc<Mutex<Vec<MockCall>>>,
}

impl MockCategoryStore {
    /// Create an empty store. Ids are assigned starting at 1.
    pub fn new() -> Self {
        let store = Self::default();
        store.state.lock().unwrap().next_id = 1;
        store
    }

    /// Seed a category and return its id.
    pub fn with_category(&self, owner: UserId, name: &str) -> CategoryId {
        let mut state = self.state.lock().unwrap();
        let id = state.next_id;
        state.next_id += 1;
        state.categories.push(StoredCategory {
            id,
            owner,
            name: name.to_string(),
        });
        id
    }

    /// Seed a category with a fixed id. Later ids continue after it.
    pub fn with_category_id(&self, id: CategoryId, owner: UserId, name: &str) {
        let mut state = self.state.lock().unwrap();
        state.next_id = state.next_id.max(id + 1);
        state.categories.push(StoredCategory {
            id,
            owner,
            name: name.to_string(),
        });
    }

    /// Seed a bookmark referencing `category_id` (`0` for uncategorized).
    pub fn add_bookmark(&self, owner: UserId, category_id: CategoryId) {
        self.state.lock().unwrap().bookmarks.push(StoredBookmark { owner, category_id });
    }

    /// Category references of the owner's bookmarks, in insertion order.
    pub fn bookmark_categories(&self, owner: UserId) -> Vec<CategoryId> {
        self.state
            .lock()
            .unwrap()
            .bookmarks
            .iter()
            .filter(|b| b.owner == owner)
            .map(|b| b.category_id)
            .collect()
    }

    /// Names of the owner's stored categories, in insertion order.
    pub fn category_names(&self, owner: UserId) -> Vec<String> {
        self.state
            .lock()
            .unwrap()
            .categories
            .iter()
            .filter(|c| c.owner == owner)
            .map(|c| c.name.clone())
            .collect()
    }

    /// Make every call of `operation` fail.
    pub fn fail_on(&self, operation: &str, failure: MockFailure) {
        self.state
            .lock()
            .unwrap()
            .failures
            .insert(operation.to_string(), failure);
    }

    /// Simulate a concurrent request creating `(owner, name)` between our
    /// lookup and our insert. The next insert of that pair loses the race.
    pub fn race_next_insert(&self, owner: UserId, name: &str) {
        self.state
            .lock()
            .unwrap()
            .racing_inserts
            .insert((owner, name.to_string()));
    }

    /// Get all logged calls for assertion.
    pub fn get_calls(&self) -> Vec<MockCall> {
        self.call_log.lock().unwrap().clone()
    }

    /// Number of insert, rename and delete calls.
    pub fn write_call_count(&self) -> usize {
        self.call_log
            .lock()
            .unwrap()
            .iter()
            .filter(|c| matches!(c.operation.as_str(), "insert" | "rename" | "delete_and_reassign"))
            .count()
    }

    fn log_call(&self, operation: &str, owner: UserId) -> Result<()> {
        self.call_log.lock().unwrap().push(MockCall {
            operation: operation.to_string(),
            owner,
        });
        match self.state.lock().unwrap().failures.get(operation) {
            Some(failure) => Err(failure.to_error()),
            None => Ok(()),
        }
    }
}

impl MockState {
    fn name_taken(&self, owner: UserId, name: &str, except: Option<CategoryId>) -> bool {
        self.categories
            .iter()
            .any(|c| c.owner == owner && c.name == name && Some(c.id) != except)
    }
}

#[async_trait]
impl CategoryRepository for MockCategoryStore {
    async fn find_id_by_name(&self, name: &str, owner: UserId) -> Result<Option<CategoryId>> {
        self.log_call("find_id_by_name", owner)?;
        let state = self.state.lock().unwrap();
        Ok(state
            .categories
            .iter()
            .find(|c| c.owner == owner && c.name == name)
            .map(|c| c.id))
    }

    async fn get_name(&self, id: CategoryId, owner: UserId) -> Result<Option<String>> {
        self.log_call("get_name", owner)?;
        let state = self.state.lock().unwrap();
        Ok(state
            .categories
            .iter()
            .find(|c| c.owner == owner && c.id == id)
            .map(|c| c.name.clone()))
    }

    async fn insert(&self, name: &str, owner: UserId) -> Result<CategoryId> {
        self.log_call("insert", owner)?;
        let mut state = self.state.lock().unwrap();
        if state.racing_inserts.remove(&(owner, name.to_string())) {
            let id = state.next_id;
            state.next_id += 1;
            state.categories.push(StoredCategory {
                id,
                owner,
                name: name.to_string(),
            });
        }
        if state.name_taken(owner, name, None) {
            return Err(Error::DuplicateCategory(name.to_string()));
        }
        let id = state.next_id;
        state.next_id += 1;
        state.categories.push(StoredCategory {
            id,
            owner,
            name: name.to_string(),
        });
        Ok(id)
    }

    async fn list_with_counts(&self, owner: UserId) -> Result<Vec<Category>> {
        self.log_call("list_with_counts", owner)?;
        let state = self.state.lock().unwrap();
        let mut listed: Vec<Category> = state
            .categories
            .iter()
            .filter(|c| c.owner == owner)
            .map(|c| Category {
                id: c.id,
                name: c.name.clone(),
                count: state
                    .bookmarks
                    .iter()
                    .filter(|b| b.owner == owner && b.category_id == c.id)
                    .count() as i64,
            })
            .collect();
        listed.sort_by_key(|c| c.id);
        Ok(listed)
    }

    async fn count_uncategorized(&self, owner: UserId) -> Result<i64> {
        self.log_call("count_uncategorized", owner)?;
        let state = self.state.lock().unwrap();
        Ok(state
            .bookmarks
            .iter()
            .filter(|b| b.owner == owner && b.category_id == UNCATEGORIZED_ID)
            .count() as i64)
    }

    async fn rename(&self, id: CategoryId, name: &str, owner: UserId) -> Result<u64> {
        self.log_call("rename", owner)?;
        let mut state = self.state.lock().unwrap();
        if state.name_taken(owner, name, Some(id)) {
            return Err(Error::DuplicateCategory(name.to_string()));
        }
        let mut affected = 0;
        for c in state
            .categories
            .iter_mut()
            .filter(|c| c.owner == owner && c.id == id)
        {
            c.name = name.to_string();
            affected += 1;
        }
        Ok(affected)
    }

    async fn delete_and_reassign(&self, id: CategoryId, owner: UserId) -> Result<u64> {
        // A failure here leaves the state untouched, like a rolled back transaction.
        self.log_call("delete_and_reassign", owner)?;
        let mut state = self.state.lock().unwrap();
        state.categories.retain(|c| !(c.owner == owner && c.id == id));
        let mut reassigned = 0;
        for b in state
            .bookmarks
            .iter_mut()
            .filter(|b| b.owner == owner && b.category_id == id)
        {
            b.category_id = UNCATEGORIZED_ID;
            reassigned += 1;
        }
        Ok(reassigned)
    }
}

/// In-memory session store mapping tokens to users.
#[derive(Clone, Default)]
pub struct MockSessionStore {
    sessions: Arc<Mutex<HashMap<String, UserId>>>,
    fail: Arc<Mutex<Option<MockFailure>>>,
}

impl MockSessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a session token for a user.
    pub fn with_session(self, token: impl Into<String>, user_id: UserId) -> Self {
        self.sessions.lock().unwrap().insert(token.into(), user_id);
        self
    }

    /// Make every lookup fail.
    pub fn fail_with(&self, failure: MockFailure) {
        *self.fail.lock().unwrap() = Some(failure);
    }
}

#[async_trait]
impl SessionStore for MockSessionStore {
    async fn user_for_token(&self, token: &str) -> Result<Option<UserId>> {
        if let Some(failure) = *self.fail.lock().unwrap() {
            return Err(failure.to_error());
        }
        Ok(self.sessions.lock().unwrap().get(token).copied())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_insert_enforces_owner_scoped_uniqueness() {
        let store = MockCategoryStore::new();
        store.insert("Work", 1).await.unwrap();

        let err = store.insert("Work", 1).await.unwrap_err();
        assert!(matches!(err, Error::DuplicateCategory(ref n) if n == "Work"));

        // Same name for another owner is fine.
        assert!(store.insert("Work", 2).await.is_ok());
        // Case sensitive.
        assert!(store.insert("work", 1).await.is_ok());
    }

    #[tokio::test]
    async fn test_ids_continue_after_fixed_seed() {
        let store = MockCategoryStore::new();
        store.with_category_id(5, 1, "Work");
        let id = store.insert("Home", 1).await.unwrap();
        assert_eq!(id, 6);
    }

    #[tokio::test]
    async fn test_racing_insert_loses() {
        let store = MockCategoryStore::new();
        store.race_next_insert(1, "News");

        assert_eq!(store.find_id_by_name("News", 1).await.unwrap(), None);
        let err = store.insert("News", 1).await.unwrap_err();
        assert!(matches!(err, Error::DuplicateCategory(_)));
        assert!(store.find_id_by_name("News", 1).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_failed_delete_leaves_state_untouched() {
        let store = MockCategoryStore::new();
        let id = store.with_category(1, "Work");
        store.add_bookmark(1, id);
        store.fail_on("delete_and_reassign", MockFailure::Statement);

        assert!(store.delete_and_reassign(id, 1).await.is_err());
        assert_eq!(store.category_names(1), vec!["Work".to_string()]);
        assert_eq!(store.bookmark_categories(1), vec![id]);
    }

    #[tokio::test]
    async fn test_delete_is_owner_scoped() {
        let store = MockCategoryStore::new();
        let id = store.with_category(1, "Work");
        store.add_bookmark(2, id);

        let reassigned = store.delete_and_reassign(id, 2).await.unwrap();
        assert_eq!(reassigned, 1);
        // Owner 1's category survives a delete issued by owner 2.
        assert_eq!(store.category_names(1), vec!["Work".to_string()]);
    }

    #[tokio::test]
    async fn test_session_store_lookup() {
        let sessions = MockSessionStore::new().with_session("tok", 7);
        assert_eq!(sessions.user_for_token("tok").await.unwrap(), Some(7));
        assert_eq!(sessions.user_for_token("other").await.unwrap(), None);

        sessions.fail_with(MockFailure::Unavailable);
        assert!(sessions.user_for_token("tok").await.unwrap_err().is_unavailable());
    }
}
