//! Service layer for category business rules.

pub mod category_directory;
pub mod category_mutator;
pub mod category_resolver;

pub use category_directory::CategoryDirectory;
pub use category_mutator::CategoryMutator;
pub use category_resolver::CategoryResolver;
