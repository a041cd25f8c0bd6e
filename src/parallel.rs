//! Batch matching
//!
//! Runs one compiled [`Pattern`] over many independent inputs. With the
//! `parallel` feature the inputs are spread over rayon's thread pool; without
//! it the same functions run sequentially. Results are always in input order.
//!
//! # Example
//!
//! ```rust
//! use restructure::{parallel::parse_batch, Descriptor, Pattern, Schema, SchemaBuilder};
//!
//! #[derive(Default)]
//! struct Number {
//!     digits: String,
//! }
//!
//! impl Schema for Number {
//!     fn descriptor() -> Descriptor {
//!         SchemaBuilder::<Self>::new("Number")
//!             .scalar("digits", "[0-9]+", |v| &mut v.digits)
//!             .build()
//!     }
//! }
//!
//! let pattern = Pattern::<Number>::compile().unwrap();
//! let results = parse_batch(&pattern, &["a1", "b", "c22"]);
//! assert_eq!(results.len(), 3);
//! assert!(results[1].as_ref().unwrap().is_none());
//! ```

use crate::error::MatchError;
use crate::pattern::Pattern;
use crate::schema::Schema;

#[cfg(feature = "rayon")]
use rayon::prelude::*;

/// Parse the leftmost match of every input in parallel
#[cfg(feature = "rayon")]
pub fn parse_batch<T: Schema>(
    pattern: &Pattern<T>,
    inputs: &[&str],
) -> Vec<Result<Option<T>, MatchError>> {
    inputs.par_iter().map(|input| pattern.parse(input)).collect()
}

/// Parse the leftmost match of every input sequentially (fallback when rayon
/// is not available)
#[cfg(not(feature = "rayon"))]
pub fn parse_batch<T: Schema>(
    pattern: &Pattern<T>,
    inputs: &[&str],
) -> Vec<Result<Option<T>, MatchError>> {
    inputs.iter().map(|input| pattern.parse(input)).collect()
}

/// Collect up to `limit` matches from every input in parallel
#[cfg(feature = "rayon")]
pub fn find_all_batch<T: Schema>(
    pattern: &Pattern<T>,
    inputs: &[&str],
    limit: Option<usize>,
) -> Vec<Result<Vec<T>, MatchError>> {
    inputs
        .par_iter()
        .map(|input| pattern.find_all(input, limit))
        .collect()
}

/// Collect up to `limit` matches from every input sequentially (fallback)
#[cfg(not(feature = "rayon"))]
pub fn find_all_batch<T: Schema>(
    pattern: &Pattern<T>,
    inputs: &[&str],
    limit: Option<usize>,
) -> Vec<Result<Vec<T>, MatchError>> {
    inputs
        .iter()
        .map(|input| pattern.find_all(input, limit))
        .collect()
}
