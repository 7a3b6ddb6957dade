//! # contur-core
//!
//! Core types, traits and errors shared by the Contur likelihood crates.
//!
//! Higher-level crates (`contur-likelihood`, `contur-cli`) depend on the
//! abstractions defined here, not on each other's internals.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod traits;
pub mod types;

pub use error::{Error, Result};
pub use types::{Expectation, ModelConfig};

/// Workspace version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
