//! Category domain types.
//!
//! A category is identified by `(id, owner)`. Id `0` never exists in storage;
//! it is the virtual "Uncategorized" bucket derived from bookmarks whose
//! category reference is zero.

use std::fmt;

use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};

/// Numeric category identifier assigned by storage.
pub type CategoryId = i64;

/// Numeric user identifier yielded by the session store.
pub type UserId = i64;

/// Reserved id of the "Uncategorized" pseudo-category.
pub const UNCATEGORIZED_ID: CategoryId = 0;

/// Display name of the "Uncategorized" pseudo-category.
pub const UNCATEGORIZED_NAME: &str = "Uncategorized";

/// Maximum category name length, in characters.
pub const MAX_CATEGORY_NAME_LEN: usize = 15;

/// Sentinel returned by the resolver for names that can never be stored.
pub const INVALID_CATEGORY_ID: CategoryId = -1;

/// A category as listed to its owner, with its live bookmark count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    pub count: i64,
}

impl Category {
    /// The synthetic "Uncategorized" entry.
    pub fn uncategorized(count: i64) -> Self {
        Self {
            id: UNCATEGORIZED_ID,
            name: UNCATEGORIZED_NAME.to_string(),
            count,
        }
    }

    pub fn is_uncategorized(&self) -> bool {
        self.id == UNCATEGORIZED_ID
    }
}

/// Length in characters, the unit the 15-character limit is expressed in.
pub fn name_length(name: &str) -> usize {
    name.chars().count()
}

/// Postgres text columns cannot hold NUL.
pub fn has_unstorable_chars(name: &str) -> bool {
    name.contains('\0')
}

/// A category name that passed the empty, length and character checks.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CategoryName(String);

impl CategoryName {
    /// Validate a raw name.
    ///
    /// Rules run in order: empty, length, characters. The first failure wins.
    pub fn parse(raw: &str) -> std::result::Result<Self, CategoryRejection> {
        if raw.is_empty() {
            return Err(CategoryRejection::EmptyName);
        }
        if name_length(raw) > MAX_CATEGORY_NAME_LEN {
            return Err(CategoryRejection::LengthExceeded);
        }
        if has_unstorable_chars(raw) {
            return Err(CategoryRejection::InvalidCharacters);
        }
        Ok(Self(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl AsRef<str> for CategoryName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CategoryName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Result of resolving a category name to an id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolvedCategory {
    /// Empty input: the bookmark has no category.
    Uncategorized,
    /// Name that can never be stored; callers treat it as no category.
    Invalid,
    /// A category with that name already existed.
    Existing(CategoryId),
    /// The category was created by this call.
    Created(CategoryId),
}

impl ResolvedCategory {
    /// The raw id stored on a bookmark: `0`, `-1`, or the category id.
    pub fn as_id(&self) -> CategoryId {
        match self {
            ResolvedCategory::Uncategorized => UNCATEGORIZED_ID,
            ResolvedCategory::Invalid => INVALID_CATEGORY_ID,
            ResolvedCategory::Existing(id) | ResolvedCategory::Created(id) => *id,
        }
    }
}

/// Closed set of user-correctable validation failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CategoryRejection {
    EmptyName,
    EmptyNewName,
    SameAsOld,
    LengthExceeded,
    InvalidCharacters,
    AlreadyExists(String),
}

impl CategoryRejection {
    /// Human-readable reason shown to the caller.
    pub fn message(&self) -> String {
        match self {
            CategoryRejection::EmptyName => "Category name is empty.".to_string(),
            CategoryRejection::EmptyNewName => "New category name is empty.".to_string(),
            CategoryRejection::SameAsOld => "New category is same as old category.".to_string(),
            CategoryRejection::LengthExceeded => {
                "Category name exceeded length limit.".to_string()
            }
            CategoryRejection::InvalidCharacters => {
                "Category name contains invalid characters.".to_string()
            }
            CategoryRejection::AlreadyExists(name) => {
                format!("Category {} already exists.", name)
            }
        }
    }

    /// Whether the caller should render the rejection as an error state.
    ///
    /// Renaming a category to its current name is acknowledged, not an error.
    pub fn is_error(&self) -> bool {
        !matches!(self, CategoryRejection::SameAsOld)
    }
}

impl fmt::Display for CategoryRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message())
    }
}

/// Outcome of a create / rename / delete request.
///
/// Serializes to `{"status":1}` on success and
/// `{"status":0,"message":..,"error":0|1}` on rejection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CategoryOutcome {
    Success,
    Rejected(CategoryRejection),
}

impl CategoryOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, CategoryOutcome::Success)
    }

    pub fn rejection(&self) -> Option<&CategoryRejection> {
        match self {
            CategoryOutcome::Success => None,
            CategoryOutcome::Rejected(r) => Some(r),
        }
    }
}

impl From<CategoryRejection> for CategoryOutcome {
    fn from(rejection: CategoryRejection) -> Self {
        CategoryOutcome::Rejected(rejection)
    }
}

impl Serialize for CategoryOutcome {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            CategoryOutcome::Success => {
                let mut s = serializer.serialize_struct("CategoryOutcome", 1)?;
                s.serialize_field("status", &1u8)?;
                s.end()
            }
            CategoryOutcome::Rejected(rejection) => {
                let mut s = serializer.serialize_struct("CategoryOutcome", 3)?;
                s.serialize_field("status", &0u8)?;
                s.serialize_field("message", &rejection.message())?;
                s.serialize_field("error", &u8::from(rejection.is_error()))?;
                s.end()
            }
        }
    }
}

/// Wire payload for create and rename: `{"name": "..."}`.
#[derive(Debug, Clone, Deserialize)]
pub struct CategoryNameBody {
    pub name: String,
}
