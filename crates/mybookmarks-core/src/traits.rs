//! Core traits for mybookmarks storage and session collaborators.

use async_trait::async_trait;

use crate::{Category, CategoryId, Result, UserId};

// =============================================================================
// CATEGORY REPOSITORY TRAITS
// =============================================================================

/// Storage gateway for categories and the bookmark references to them.
///
/// Every operation is scoped by owner. Implementations must enforce
/// uniqueness of `(owner, name)` and report a collision on insert or rename
/// as [`crate::Error::DuplicateCategory`].
#[async_trait]
pub trait CategoryRepository: Send + Sync {
    /// Look up the id of the category with this exact name.
    async fn find_id_by_name(&self, name: &str, owner: UserId) -> Result<Option<CategoryId>>;

    /// Current name of a category, if the owner has it.
    async fn get_name(&self, id: CategoryId, owner: UserId) -> Result<Option<String>>;

    /// Insert a new category and return the id storage assigned to it.
    async fn insert(&self, name: &str, owner: UserId) -> Result<CategoryId>;

    /// Stored categories with their usage counts, in insertion order.
    async fn list_with_counts(&self, owner: UserId) -> Result<Vec<Category>>;

    /// Number of the owner's bookmarks with category reference `0`.
    async fn count_uncategorized(&self, owner: UserId) -> Result<i64>;

    /// Rename a category. Returns the number of rows updated.
    async fn rename(&self, id: CategoryId, name: &str, owner: UserId) -> Result<u64>;

    /// Delete a category and reassign its bookmarks to `0` atomically.
    ///
    /// Returns the number of bookmarks reassigned. A missing id is not an
    /// error.
    async fn delete_and_reassign(&self, id: CategoryId, owner: UserId) -> Result<u64>;
}

// =============================================================================
// SESSION TRAITS
// =============================================================================

/// External session collaborator: maps a session token to its user.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Returns `None` for unknown or expired tokens.
    async fn user_for_token(&self, token: &str) -> Result<Option<UserId>>;
}
