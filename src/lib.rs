//! Restructure - typed values from regular expressions
//!
//! A caller describes the shape of some text as a schema: a struct whose
//! fields each carry a small pattern fragment. Restructure compiles the
//! schema into a single regular expression and inflates every match back
//! into a value of that struct. It provides:
//! - Scalar fields captured as `String`, `Vec<u8>` or [`Submatch`]
//! - Optional nested structs that stay `None` when their region is absent
//! - Zero-width position markers ([`Pos`])
//! - Polymorphic fields resolved through a registry of variant schemas
//! - Hidden separators that must match but are never stored
//! - A stencil that maps every capture group back to its destination
//!
//! ## Quick Start
//!
//! ```rust
//! use restructure::{Descriptor, Pattern, Schema, SchemaBuilder};
//!
//! #[derive(Default)]
//! struct Email {
//!     user: String,
//!     host: String,
//! }
//!
//! impl Schema for Email {
//!     fn descriptor() -> Descriptor {
//!         SchemaBuilder::<Self>::new("Email")
//!             .scalar("user", r"[a-z.]+", |v| &mut v.user)
//!             .separator("@")
//!             .scalar("host", r"[a-z.]+", |v| &mut v.host)
//!             .build()
//!     }
//! }
//!
//! let pattern = Pattern::<Email>::compile().unwrap();
//! let email = pattern.parse("mail jane.doe@example.com today").unwrap().unwrap();
//! assert_eq!(email.user, "jane.doe");
//! assert_eq!(email.host, "example.com");
//! ```
//!
//! ## Using the Derive Macro
//!
//! ```rust
//! # #[cfg(feature = "derive")]
//! # {
//! use restructure::prelude::*;
//!
//! #[derive(Schema, Default)]
//! struct Email {
//!     #[restructure(r"[a-z.]+")]
//!     user: String,
//!     #[restructure("@")]
//!     _at: (),
//!     #[restructure(r"[a-z.]+")]
//!     host: String,
//! }
//!
//! let mut email = Email::default();
//! assert!(restructure::find(&mut email, "jane@example.com").unwrap());
//! assert_eq!(email.host, "example.com");
//! # }
//! ```
//!
//! ## Feature Flags
//!
//! - `derive` (default) - `#[derive(Schema)]` and `#[derive(Capability)]`
//! - `parallel` - Batch matching on rayon's thread pool
//! - `logging` - Enable debug logging using the `log` crate

// Lint configuration for production quality
#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![warn(clippy::all)]
#![allow(clippy::new_without_default)]
#![allow(clippy::module_inception)]

// Lets derive output name `::restructure` from inside this crate's tests
extern crate self as restructure;

/// Logging macros - no-op when logging feature is disabled
#[cfg(not(feature = "logging"))]
macro_rules! log_debug {
    ($($arg:tt)*) => {};
}

/// Logging macros - use log crate when logging feature is enabled
#[cfg(feature = "logging")]
macro_rules! log_debug {
    ($($arg:tt)*) => { log::debug!($($arg)*) };
}

// Prelude module for convenient imports
pub mod prelude;

// Derive macro support (requires derive feature)
#[cfg(feature = "derive")]
pub mod derive;

pub mod builder;
pub mod debug;
pub mod error;
pub mod inflate;
pub mod options;
pub mod parallel;
pub mod pattern;
pub mod pattern_cache;
pub mod schema;
pub mod stencil;
pub mod submatch;
pub mod syntax;
pub mod union;

// ============================================================================
// Core Types
// ============================================================================

pub use builder::Compiler;
pub use inflate::{inflate, Match};
pub use pattern::{compile, compile_with, find, must_compile, Pattern};
pub use schema::{Cardinality, Descriptor, FieldDescriptor, Role, Schema, SchemaBuilder, Visibility};
pub use stencil::{FieldStencil, Repr, Stencil, StructStencil, UnionStencil, VariantStencil};
pub use submatch::{Pos, Region, Submatch};
pub use syntax::Expr;

// ============================================================================
// Unions
// ============================================================================

pub use union::{
    is_registered, lookup_union, register_union, try_register_union, Capability, UnionEntry,
    UnionRegistry, Variant, VariantEntry,
};

// ============================================================================
// Configuration and Errors
// ============================================================================

pub use debug::StencilPrinter;
pub use error::{CompileError, Error, MatchError, UnionError};
pub use options::Options;

// Derive macros share their names with the traits they implement
#[cfg(feature = "derive")]
pub use restructure_derive::{Capability, Schema};
