//! # notestack-core
//!
//! Core types, traits, and abstractions for the notestack backend.
//!
//! This crate provides the data model (users, notes, tags and their links),
//! the repository traits every store implements, the ownership predicate
//! shared by all single-resource handlers, and the common error type.

pub mod error;
pub mod logging;
pub mod models;
pub mod ownership;
pub mod traits;

// Re-export commonly used types at crate root
pub use error::{Error, Result};
pub use models::*;
pub use ownership::{ensure_owned, Owned};
pub use traits::*;
