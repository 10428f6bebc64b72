//! Get-or-create resolution of category names to ids.
//!
//! ## Resolution Order
//!
//! 1. Empty name: uncategorized (id 0), storage is not touched
//! 2. Name longer than the limit or holding NUL: invalid sentinel, storage
//!    is not touched
//! 3. Exact lookup of `(name, owner)`
//! 4. Insert when absent
//! 5. Insert lost a race on the unique constraint: look up once more
//!
//! No result is cached; every call sees the current state of storage.

use std::sync::Arc;

use tracing::{debug, warn};

use mybookmarks_core::{
    has_unstorable_chars, name_length, CategoryRepository, Error, ResolvedCategory, Result,
    UserId, MAX_CATEGORY_NAME_LEN,
};

/// Maps category names to durable ids, creating categories on first use.
#[derive(Clone)]
pub struct CategoryResolver {
    repo: Arc<dyn CategoryRepository>,
}

impl CategoryResolver {
    pub fn new(repo: Arc<dyn CategoryRepository>) -> Self {
        Self { repo }
    }

    /// Resolve `name` for `owner`, creating the category if it does not exist.
    pub async fn resolve(&self, name: &str, owner: UserId) -> Result<ResolvedCategory> {
        if name.is_empty() {
            return Ok(ResolvedCategory::Uncategorized);
        }
        if name_length(name) > MAX_CATEGORY_NAME_LEN || has_unstorable_chars(name) {
            debug!(
                subsystem = "api",
                component = "category_resolver",
                op = "resolve",
                user_id = owner,
                "Category name cannot be stored, treating as invalid"
            );
            return Ok(ResolvedCategory::Invalid);
        }

        if let Some(id) = self.repo.find_id_by_name(name, owner).await? {
            return Ok(ResolvedCategory::Existing(id));
        }

        match self.repo.insert(name, owner).await {
            Ok(id) => {
                debug!(
                    subsystem = "api",
                    component = "category_resolver",
                    op = "resolve",
                    user_id = owner,
                    category_id = id,
                    "Category created on resolve"
                );
                Ok(ResolvedCategory::Created(id))
            }
            Err(Error::DuplicateCategory(dup)) => {
                warn!(
                    subsystem = "api",
                    component = "category_resolver",
                    op = "resolve",
                    user_id = owner,
                    "Concurrent create of the same category, retrying lookup"
                );
                self.repo
                    .find_id_by_name(name, owner)
                    .await?
                    .map(ResolvedCategory::Existing)
                    .ok_or(Error::DuplicateCategory(dup))
            }
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mybookmarks_db::mock::{MockCategoryStore, MockFailure};

    fn resolver(store: &MockCategoryStore) -> CategoryResolver {
        CategoryResolver::new(Arc::new(store.clone()))
    }

    #[tokio::test]
    async fn test_empty_name_is_uncategorized_without_storage() {
        let store = MockCategoryStore::new();
        for owner in [1, 2, 99] {
            let resolved = resolver(&store).resolve("", owner).await.unwrap();
            assert_eq!(resolved, ResolvedCategory::Uncategorized);
            assert_eq!(resolved.as_id(), 0);
        }
        assert!(store.get_calls().is_empty());
    }

    #[tokio::test]
    async fn test_overlong_name_is_invalid_without_storage() {
        let store = MockCategoryStore::new();
        let resolved = resolver(&store)
            .resolve("a name that is far too long", 1)
            .await
            .unwrap();
        assert_eq!(resolved, ResolvedCategory::Invalid);
        assert_eq!(resolved.as_id(), -1);
        assert!(store.get_calls().is_empty());
    }

    #[tokio::test]
    async fn test_nul_name_is_invalid_without_storage() {
        let store = MockCategoryStore::new();
        let resolved = resolver(&store).resolve("a\0b", 1).await.unwrap();
        assert_eq!(resolved, ResolvedCategory::Invalid);
        assert!(store.get_calls().is_empty());
    }

    #[tokio::test]
    async fn test_existing_name_returns_its_id() {
        let store = MockCategoryStore::new();
        let id = store.with_category(1, "Work");

        let resolved = resolver(&store).resolve("Work", 1).await.unwrap();
        assert_eq!(resolved, ResolvedCategory::Existing(id));
        assert_eq!(store.write_call_count(), 0);
    }

    #[tokio::test]
    async fn test_missing_name_is_created_once() {
        let store = MockCategoryStore::new();
        let r = resolver(&store);

        let first = r.resolve("Reading", 1).await.unwrap();
        let ResolvedCategory::Created(id) = first else {
            panic!("expected Created, got {:?}", first);
        };
        let second = r.resolve("Reading", 1).await.unwrap();
        assert_eq!(second, ResolvedCategory::Existing(id));
        assert_eq!(store.category_names(1), vec!["Reading".to_string()]);
    }

    #[tokio::test]
    async fn test_names_are_scoped_by_owner() {
        let store = MockCategoryStore::new();
        let theirs = store.with_category(2, "Work");

        let mine = resolver(&store).resolve("Work", 1).await.unwrap();
        assert!(matches!(mine, ResolvedCategory::Created(id) if id != theirs));
    }

    #[tokio::test]
    async fn test_lost_insert_race_falls_back_to_lookup() {
        let store = MockCategoryStore::new();
        store.race_next_insert(1, "News");

        let resolved = resolver(&store).resolve("News", 1).await.unwrap();
        assert!(matches!(resolved, ResolvedCategory::Existing(_)));
        assert_eq!(store.category_names(1), vec!["News".to_string()]);
    }

    #[tokio::test]
    async fn test_storage_failure_propagates() {
        let store = MockCategoryStore::new();
        store.fail_on("insert", MockFailure::Statement);

        let err = resolver(&store).resolve("Work", 1).await.unwrap_err();
        assert!(matches!(err, Error::Database(_)));
        assert!(store.category_names(1).is_empty());
    }
}
