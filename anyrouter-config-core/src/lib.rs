//! `AnyRouter` Config Core Library
//!
//! Platform-independent state management for the sign-in configuration editor:
//! - Edit model of accounts and providers, mutated through typed commands
//! - Referential integrity between provider keys and account references
//! - Versioned persistence with migration from older document schemas
//! - Export projections and atomic import validation
//!
//! Storage is abstracted through the [`DocumentStore`] trait; the platform layer
//! injects a concrete implementation via [`ServiceContext`].

pub mod error;
pub mod model;
pub mod services;
pub mod traits;
pub mod types;
pub mod utils;

#[cfg(test)]
mod test_utils;

// Re-export common types
pub use error::{CoreError, CoreResult};
pub use model::ConfigModel;
pub use services::{ConfigSession, MigrationResult, ServiceContext};
pub use traits::{DocumentStore, InMemoryDocumentStore};
