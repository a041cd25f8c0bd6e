//! Compiled patterns
//!
//! [`Pattern<T>`] bundles everything compilation produces for a schema type:
//! the stencil, the pattern tree, the engine regex and the options it was
//! built with. It holds no per-match state, so one pattern may be shared by
//! any number of threads.
//!
//! Inputs are `&str`, so matching runs over valid UTF-8 only. Offsets in
//! [`Submatch`](crate::Submatch) and [`Pos`](crate::Pos) are byte offsets
//! into that text, and `Vec<u8>` fields receive the matched bytes unchanged.
//! Arbitrary byte input would need the engine's `regex::bytes` API.
//!
//! # Example
//!
//! ```rust
//! use restructure::{Descriptor, Pattern, Schema, SchemaBuilder};
//!
//! #[derive(Default)]
//! struct Assignment {
//!     name: String,
//!     value: String,
//! }
//!
//! impl Schema for Assignment {
//!     fn descriptor() -> Descriptor {
//!         SchemaBuilder::<Self>::new("Assignment")
//!             .scalar("name", r"\w+", |v| &mut v.name)
//!             .separator(r"\s*=\s*")
//!             .scalar("value", r"[0-9]+", |v| &mut v.value)
//!             .build()
//!     }
//! }
//!
//! let pattern = Pattern::<Assignment>::compile().unwrap();
//! let mut dest = Assignment::default();
//! assert!(pattern.find(&mut dest, "x = 42").unwrap());
//! assert_eq!(dest.name, "x");
//! assert_eq!(dest.value, "42");
//! ```

use std::any::{type_name, Any};
use std::fmt;
use std::marker::PhantomData;

use regex::Regex;

use crate::builder::{Compiled, Compiler};
use crate::error::{CompileError, Error, MatchError};
use crate::inflate::{inflate, Match};
use crate::options::Options;
use crate::pattern_cache;
use crate::schema::Schema;
use crate::stencil::StructStencil;
use crate::syntax::Expr;
use crate::union::UnionRegistry;

/// A schema compiled into an engine regex
pub struct Pattern<T> {
    stencil: StructStencil,
    expr: Expr,
    regex: Regex,
    options: Options,
    _dest: PhantomData<fn() -> T>,
}

impl<T: Schema> Pattern<T> {
    /// Compile `T` with default options
    pub fn compile() -> Result<Self, CompileError> {
        Self::compile_with(Options::default())
    }

    /// Compile `T` with the given options
    pub fn compile_with(options: Options) -> Result<Self, CompileError> {
        let compiled = Compiler::with_options(options).build(&T::descriptor())?;
        Ok(Self::from_compiled(compiled, options))
    }

    /// Compile `T`, resolving polymorphic fields in `registry` instead of the
    /// process-wide registry
    pub fn compile_with_registry(
        options: Options,
        registry: &UnionRegistry,
    ) -> Result<Self, CompileError> {
        let compiled = Compiler::with_registry(options, registry).build(&T::descriptor())?;
        Ok(Self::from_compiled(compiled, options))
    }

    /// Compile `T` with default options, aborting on error
    ///
    /// # Panics
    ///
    /// Panics with the compile error's message if `T` cannot be compiled.
    pub fn must_compile() -> Self {
        match Self::compile() {
            Ok(pattern) => pattern,
            Err(err) => panic!("{}", err),
        }
    }

    fn from_compiled(compiled: Compiled, options: Options) -> Self {
        Self {
            stencil: compiled.stencil,
            expr: compiled.expr,
            regex: compiled.regex,
            options,
            _dest: PhantomData,
        }
    }

    /// Match the leftmost occurrence in `input` and inflate it into `dest`
    ///
    /// Returns `Ok(false)` and leaves `dest` untouched when nothing matches.
    pub fn find(&self, dest: &mut T, input: &str) -> Result<bool, MatchError> {
        let mut locations = self.regex.capture_locations();
        if self.regex.captures_read(&mut locations, input).is_none() {
            return Ok(false);
        }
        let m = Match::from_locations(input, &locations);
        inflate(&self.stencil, &m, dest)?;
        Ok(true)
    }

    /// Type-erased [`find`](Self::find)
    ///
    /// # Panics
    ///
    /// Panics if `dest` is not a `T`.
    pub fn find_dyn(&self, dest: &mut dyn Any, input: &str) -> Result<bool, MatchError> {
        match dest.downcast_mut::<T>() {
            Some(dest) => self.find(dest, input),
            None => panic!(
                "{}",
                MatchError::DestinationTypeMismatch {
                    expected: type_name::<T>()
                }
            ),
        }
    }

    /// Match the leftmost occurrence in `input` into a fresh value
    pub fn parse(&self, input: &str) -> Result<Option<T>, MatchError> {
        let mut dest = T::default();
        if self.find(&mut dest, input)? {
            Ok(Some(dest))
        } else {
            Ok(None)
        }
    }

    /// Collect up to `limit` non-overlapping matches, unbounded when `None`
    pub fn find_all(&self, input: &str, limit: Option<usize>) -> Result<Vec<T>, MatchError> {
        let mut out = Vec::new();
        self.find_all_into(&mut out, input, limit)?;
        Ok(out)
    }

    /// Replace the contents of `dest` with up to `limit` non-overlapping
    /// matches, in input order
    ///
    /// Each match is inflated into a fresh `T` and converted into the element
    /// type, so `dest` may hold `T` itself or a handle such as `Box<T>`.
    /// When nothing matches `dest` is left empty.
    pub fn find_all_into<E: From<T>>(
        &self,
        dest: &mut Vec<E>,
        input: &str,
        limit: Option<usize>,
    ) -> Result<(), MatchError> {
        dest.clear();
        let limit = limit.unwrap_or(usize::MAX);
        for captures in self.regex.captures_iter(input).take(limit) {
            let m = Match::from_captures(input, &captures);
            let mut value = T::default();
            inflate(&self.stencil, &m, &mut value)?;
            dest.push(E::from(value));
        }
        Ok(())
    }
}

impl<T> Pattern<T> {
    /// Whether `input` contains a match
    pub fn is_match(&self, input: &str) -> bool {
        self.regex.is_match(input)
    }

    /// The rendered pattern text
    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }

    /// The pattern tree
    pub fn expr(&self) -> &Expr {
        &self.expr
    }

    /// The root stencil
    pub fn stencil(&self) -> &StructStencil {
        &self.stencil
    }

    /// Number of capture slots, including slot 0
    pub fn captures_len(&self) -> usize {
        self.regex.captures_len()
    }

    /// Options the pattern was compiled with
    pub fn options(&self) -> &Options {
        &self.options
    }

    /// The underlying engine regex
    pub fn regex(&self) -> &Regex {
        &self.regex
    }
}

impl<T> Clone for Pattern<T> {
    fn clone(&self) -> Self {
        Self {
            stencil: self.stencil.clone(),
            expr: self.expr.clone(),
            regex: self.regex.clone(),
            options: self.options,
            _dest: PhantomData,
        }
    }
}

impl<T> fmt::Debug for Pattern<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pattern")
            .field("schema", &self.stencil.name())
            .field("pattern", &self.regex.as_str())
            .field("options", &self.options)
            .finish()
    }
}

impl<T> fmt::Display for Pattern<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.regex.as_str())
    }
}

/// Compile `T` with default options
pub fn compile<T: Schema>() -> Result<Pattern<T>, CompileError> {
    Pattern::compile()
}

/// Compile `T` with the given options
pub fn compile_with<T: Schema>(options: Options) -> Result<Pattern<T>, CompileError> {
    Pattern::compile_with(options)
}

/// Compile `T` with default options, aborting on error
///
/// # Panics
///
/// Panics if `T` cannot be compiled.
pub fn must_compile<T: Schema>() -> Pattern<T> {
    Pattern::must_compile()
}

/// Compile `T` on first use in this thread and match `input` into `dest`
pub fn find<T: Schema>(dest: &mut T, input: &str) -> Result<bool, Error> {
    let pattern = pattern_cache::get_or_compile::<T>(Options::default())?;
    Ok(pattern.find(dest, input)?)
}
