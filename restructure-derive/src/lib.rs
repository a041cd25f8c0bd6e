//! Derive macros for restructure
//!
//! This crate provides derive macros that generate schema descriptors and
//! capability registrations from annotated Rust types.
//!
//! # Available Macros
//!
//! ## `Schema`
//!
//! Describes a struct's fields so it can be compiled into a pattern.
//!
//! ## `Capability`
//!
//! Marks an enum of single-field tuple variants as a polymorphic type and
//! lists its variants for registration.
//!
//! # Example
//!
//! ```rust,ignore
//! use restructure::prelude::*;
//!
//! #[derive(Schema, Default)]
//! struct Phone {
//!     #[restructure("[0-9]{3}")]
//!     area: String,
//!     #[restructure("-")]
//!     _dash: (),
//!     #[restructure("[0-9]{3}-[0-9]{4}")]
//!     number: String,
//! }
//!
//! #[derive(Capability)]
//! enum Contact {
//!     Phone(Phone),
//! }
//!
//! restructure::register_union(Contact::variants());
//! ```

use proc_macro::TokenStream;
use syn::{parse_macro_input, DeriveInput};

mod attrs;
mod capability;
mod schema;

/// Derive macro for the `Schema` trait
///
/// # Container attributes
///
/// - `#[restructure(name = "Name")]` - Schema name used in errors and as the
///   envelope capture name (defaults to the struct name)
///
/// # Field attributes
///
/// - `#[restructure("fragment")]` - Scalar field captured by `fragment`; an
///   empty fragment declares a structural field
/// - `#[restructure("?")]` or `#[restructure(optional)]` - Optional nested
///   schema, the field must be `Option<T>` or `Option<Box<T>>`
/// - `#[restructure(nested)]` / `#[restructure(nested = "?")]` - Nested
///   schema with an explicit cardinality marker
/// - `#[restructure(union)]` / `#[restructure(union = "?")]` - Polymorphic
///   field of type `Option<C>` where `C` is a registered capability
/// - `#[restructure(pos)]` - Zero-width position marker, inferred for fields
///   of type `Pos`
/// - `#[restructure(name = "...")]` - Capture name recorded for the field
///
/// Fields whose name starts with `_` are hidden separators: their fragment
/// must match but nothing is stored. Fields without an attribute are not
/// part of the pattern.
///
/// # Example
///
/// ```rust,ignore
/// #[derive(Schema, Default)]
/// struct DotExpr {
///     #[restructure("^")]
///     _start: (),
///     #[restructure(r"\w+")]
///     head: String,
///     #[restructure("?")]
///     tail: Option<DotName>,
///     #[restructure("$")]
///     _end: (),
/// }
/// ```
#[proc_macro_derive(Schema, attributes(restructure))]
pub fn derive_schema(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    schema::derive_schema_impl(&input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

/// Derive macro for the `Capability` trait
///
/// Every variant must wrap exactly one schema type. Besides the trait impl,
/// the macro generates `variants()`, the variant list in declaration order,
/// ready for `register_union`.
///
/// # Container attributes
///
/// - `#[restructure(name = "Name")]` - Name used in errors and logs
#[proc_macro_derive(Capability, attributes(restructure))]
pub fn derive_capability(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    capability::derive_capability_impl(&input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}
