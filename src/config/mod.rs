//! Configuration module for HTML imports
//!
//! This module provides the `ImportConfig` struct, its type-safe builder,
//! pre-flight validation against the repository and the session slot used
//! to resume an edited configuration.

// Sub-modules
pub mod builder;
pub mod getters;
pub mod session;
pub mod types;
pub mod validation;

// Re-exports for public API
pub use builder::{Complete, ImportConfigBuilder, WithSource};
pub use session::ImportSession;
pub use types::{ImportConfig, ImportSource};
pub use validation::validate_config;
