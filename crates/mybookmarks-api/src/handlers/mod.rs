//! HTTP handlers for mybookmarks-api.

pub mod categories;
pub mod health;

pub use categories::{create_category, delete_category, list_categories, update_category};
pub use health::health_check;
