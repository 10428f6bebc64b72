//! Read-only listing of a user's categories.

use std::sync::Arc;

use tracing::debug;

use mybookmarks_core::{Category, CategoryRepository, Result, UserId};

/// Lists categories with live bookmark counts.
#[derive(Clone)]
pub struct CategoryDirectory {
    repo: Arc<dyn CategoryRepository>,
}

impl CategoryDirectory {
    pub fn new(repo: Arc<dyn CategoryRepository>) -> Self {
        Self { repo }
    }

    /// Stored categories in insertion order, followed by the synthetic
    /// "Uncategorized" entry when at least one bookmark has no category.
    pub async fn list(&self, owner: UserId) -> Result<Vec<Category>> {
        let mut categories = self.repo.list_with_counts(owner).await?;

        let uncategorized = self.repo.count_uncategorized(owner).await?;
        if uncategorized != 0 {
            categories.push(Category::uncategorized(uncategorized));
        }

        debug!(
            subsystem = "api",
            component = "category_directory",
            op = "list",
            user_id = owner,
            result_count = categories.len(),
            "Listed categories"
        );
        Ok(categories)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mybookmarks_core::Error;
    use mybookmarks_db::mock::{MockCategoryStore, MockFailure};

    fn directory(store: &MockCategoryStore) -> CategoryDirectory {
        CategoryDirectory::new(Arc::new(store.clone()))
    }

    #[tokio::test]
    async fn test_only_uncategorized_when_no_categories() {
        let store = MockCategoryStore::new();
        for _ in 0..3 {
            store.add_bookmark(2, 0);
        }

        let listed = directory(&store).list(2).await.unwrap();
        assert_eq!(listed, vec![Category::uncategorized(3)]);
    }

    #[tokio::test]
    async fn test_uncategorized_omitted_when_zero() {
        let store = MockCategoryStore::new();
        let work = store.with_category(1, "Work");
        store.add_bookmark(1, work);

        let listed = directory(&store).list(1).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert!(listed.iter().all(|c| !c.is_uncategorized()));
    }

    #[tokio::test]
    async fn test_synthetic_entry_is_last_and_counts_match() {
        let store = MockCategoryStore::new();
        let work = store.with_category(1, "Work");
        let home = store.with_category(1, "Home");
        store.add_bookmark(1, home);
        store.add_bookmark(1, 0);
        store.add_bookmark(1, work);
        store.add_bookmark(1, home);
        store.add_bookmark(1, 0);
        // Another owner's bookmarks never leak into the counts.
        store.add_bookmark(9, 0);

        let listed = directory(&store).list(1).await.unwrap();
        assert_eq!(
            listed,
            vec![
                Category { id: work, name: "Work".to_string(), count: 1 },
                Category { id: home, name: "Home".to_string(), count: 2 },
                Category::uncategorized(2),
            ]
        );
    }

    #[tokio::test]
    async fn test_list_does_not_write() {
        let store = MockCategoryStore::new();
        store.with_category(1, "Work");
        directory(&store).list(1).await.unwrap();
        assert_eq!(store.write_call_count(), 0);
    }

    #[tokio::test]
    async fn test_count_failure_fails_whole_listing() {
        let store = MockCategoryStore::new();
        store.with_category(1, "Work");
        store.fail_on("count_uncategorized", MockFailure::Statement);

        let err = directory(&store).list(1).await.unwrap_err();
        assert!(matches!(err, Error::Database(_)));
    }
}
