//! Prelude module for convenient imports
//!
//! This module re-exports the most commonly used types and traits from
//! restructure. Importing this module with a wildcard import brings the core
//! types into scope:
//!
//! ```
//! use restructure::prelude::*;
//! ```
//!
//! With the `derive` feature the `Schema` and `Capability` derive macros come
//! along with their traits.

// ============================================================================
// Core Types
// ============================================================================

pub use crate::pattern::{compile, find, must_compile, Pattern};
pub use crate::schema::{Descriptor, Schema, SchemaBuilder};
pub use crate::submatch::{Pos, Submatch};

// ============================================================================
// Unions
// ============================================================================

pub use crate::union::{register_union, Capability, Variant};

// ============================================================================
// Configuration and Errors
// ============================================================================

pub use crate::error::{CompileError, Error, MatchError};
pub use crate::options::Options;

// ============================================================================
// Derive Macros
// ============================================================================

#[cfg(feature = "derive")]
pub use crate::derive::{Capability, Schema};
