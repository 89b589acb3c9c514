//! rxc compiler - Common Types and Utilities
//!
//! This crate contains shared types, error definitions, and target
//! configuration used across all components of the rxc compiler.

pub mod error;
pub mod types;
pub mod source_loc;
pub mod target;

pub use error::CompilerError;
pub use types::*;
pub use source_loc::SourceLocation;
