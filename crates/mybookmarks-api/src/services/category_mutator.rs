//! Create, rename and delete of categories.
//!
//! Validation failures come back as `Ok(CategoryOutcome::Rejected(..))`;
//! `Err` is reserved for storage failures and a rename of a category the
//! owner does not have.

use std::sync::Arc;

use tracing::{debug, info};

use mybookmarks_core::{
    has_unstorable_chars, name_length, CategoryId, CategoryName, CategoryOutcome,
    CategoryRejection, CategoryRepository, Error, Result, UserId, MAX_CATEGORY_NAME_LEN,
};

/// Validating mutations over a [`CategoryRepository`].
#[derive(Clone)]
pub struct CategoryMutator {
    repo: Arc<dyn CategoryRepository>,
}

fn rejected(op: &'static str, owner: UserId, rejection: CategoryRejection) -> CategoryOutcome {
    debug!(
        subsystem = "api",
        component = "category_mutator",
        op,
        user_id = owner,
        reason = %rejection,
        "Category request rejected"
    );
    CategoryOutcome::Rejected(rejection)
}

impl CategoryMutator {
    pub fn new(repo: Arc<dyn CategoryRepository>) -> Self {
        Self { repo }
    }

    /// Create a category.
    ///
    /// Rules, first match wins: empty, too long, unstorable characters,
    /// already exists.
    pub async fn create(&self, name: &str, owner: UserId) -> Result<CategoryOutcome> {
        let name = match CategoryName::parse(name) {
            Ok(name) => name,
            Err(rejection) => return Ok(rejected("create", owner, rejection)),
        };

        if self.repo.find_id_by_name(name.as_str(), owner).await?.is_some() {
            return Ok(rejected(
                "create",
                owner,
                CategoryRejection::AlreadyExists(name.into_inner()),
            ));
        }

        match self.repo.insert(name.as_str(), owner).await {
            Ok(id) => {
                info!(
                    subsystem = "api",
                    component = "category_mutator",
                    op = "create",
                    user_id = owner,
                    category_id = id,
                    "Category created"
                );
                Ok(CategoryOutcome::Success)
            }
            // A concurrent request created it between lookup and insert.
            Err(Error::DuplicateCategory(_)) => Ok(rejected(
                "create",
                owner,
                CategoryRejection::AlreadyExists(name.into_inner()),
            )),
            Err(e) => Err(e),
        }
    }

    /// Rename a category the owner has.
    ///
    /// Rules, first match wins: empty, same as current, too long, unstorable
    /// characters, taken by another category.
    pub async fn rename(
        &self,
        id: CategoryId,
        new_name: &str,
        owner: UserId,
    ) -> Result<CategoryOutcome> {
        let current = self
            .repo
            .get_name(id, owner)
            .await?
            .ok_or(Error::CategoryNotFound(id))?;

        if new_name.is_empty() {
            return Ok(rejected("rename", owner, CategoryRejection::EmptyNewName));
        }
        if new_name == current {
            return Ok(rejected("rename", owner, CategoryRejection::SameAsOld));
        }
        if name_length(new_name) > MAX_CATEGORY_NAME_LEN {
            return Ok(rejected("rename", owner, CategoryRejection::LengthExceeded));
        }
        if has_unstorable_chars(new_name) {
            return Ok(rejected("rename", owner, CategoryRejection::InvalidCharacters));
        }
        if let Some(existing) = self.repo.find_id_by_name(new_name, owner).await? {
            if existing != id {
                return Ok(rejected(
                    "rename",
                    owner,
                    CategoryRejection::AlreadyExists(new_name.to_string()),
                ));
            }
        }

        match self.repo.rename(id, new_name, owner).await {
            Ok(0) => Err(Error::CategoryNotFound(id)),
            Ok(_) => {
                info!(
                    subsystem = "api",
                    component = "category_mutator",
                    op = "rename",
                    user_id = owner,
                    category_id = id,
                    "Category renamed"
                );
                Ok(CategoryOutcome::Success)
            }
            Err(Error::DuplicateCategory(_)) => Ok(rejected(
                "rename",
                owner,
                CategoryRejection::AlreadyExists(new_name.to_string()),
            )),
            Err(e) => Err(e),
        }
    }

    /// Delete a category and move its bookmarks to uncategorized.
    ///
    /// Deleting an id the owner does not have succeeds without effect.
    pub async fn delete(&self, id: CategoryId, owner: UserId) -> Result<CategoryOutcome> {
        let reassigned = self.repo.delete_and_reassign(id, owner).await?;
        info!(
            subsystem = "api",
            component = "category_mutator",
            op = "delete",
            user_id = owner,
            category_id = id,
            result_count = reassigned,
            "Category deleted"
        );
        Ok(CategoryOutcome::Success)
    }
}
