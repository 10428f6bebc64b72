//! # mybookmarks-core
//!
//! Core types, traits, and abstractions for the mybookmarks category service.
//!
//! This crate provides the domain types and the storage / session trait
//! definitions that the other mybookmarks crates depend on.

pub mod error;
pub mod models;
pub mod traits;

// Re-export commonly used types at crate root
pub use error::{Error, Result};
pub use models::*;
pub use traits::*;
