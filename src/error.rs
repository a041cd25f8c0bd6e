//! Error types
//!
//! Errors are split by the phase that produces them:
//!
//! - [`CompileError`] - lowering a schema into a pattern
//! - [`UnionError`] - registering a capability and its variants
//! - [`MatchError`] - inflating a match into a destination
//!
//! [`Error`] wraps the compile and match errors for entry points that do both.

use std::fmt;

/// Error produced while compiling a schema
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompileError {
    /// A field's fragment is not valid pattern syntax
    PatternSyntax {
        /// Schema containing the field
        schema: String,
        /// Field name
        field: String,
        /// The offending fragment
        pattern: String,
        /// Parser message
        message: String,
    },

    /// A scalar field's destination type cannot hold a captured span
    UnsupportedFieldType {
        /// Schema containing the field
        schema: String,
        /// Field name
        field: String,
        /// Name of the destination type
        type_name: &'static str,
    },

    /// `"?"` was declared on a field whose destination cannot be absent
    MisplacedOptionalMarker {
        /// Schema containing the field
        schema: String,
        /// Field name
        field: String,
    },

    /// A cardinality marker other than `""` or `"?"`
    InvalidMarker {
        /// Schema containing the field
        schema: String,
        /// Field name
        field: String,
        /// The marker found
        marker: String,
    },

    /// A polymorphic field refers to a capability that was never registered
    UnregisteredCapability {
        /// Schema containing the field
        schema: String,
        /// Field name
        field: String,
        /// Name of the capability type
        capability: &'static str,
    },

    /// A schema contains itself, which a regular pattern cannot express
    RecursiveSchema {
        /// Schema found twice on the compilation path
        schema: String,
    },

    /// The engine rejected the composed pattern
    Engine {
        /// Root schema
        schema: String,
        /// Engine message
        message: String,
    },

    /// The engine reports a different number of groups than slots allocated
    SlotCountMismatch {
        /// Root schema
        schema: String,
        /// Slots allocated by the compiler
        slots: usize,
        /// Groups reported by the engine
        groups: usize,
    },
}

impl CompileError {
    /// The field this error refers to, if any
    pub fn field(&self) -> Option<&str> {
        match self {
            CompileError::PatternSyntax { field, .. }
            | CompileError::UnsupportedFieldType { field, .. }
            | CompileError::MisplacedOptionalMarker { field, .. }
            | CompileError::InvalidMarker { field, .. }
            | CompileError::UnregisteredCapability { field, .. } => Some(field),
            _ => None,
        }
    }
}

impl fmt::Display for CompileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompileError::PatternSyntax {
                schema,
                field,
                pattern,
                message,
            } => write!(
                f,
                "{}.{}: {} (pattern was \"{}\")",
                schema, field, message, pattern
            ),
            CompileError::UnsupportedFieldType {
                schema,
                field,
                type_name,
            } => write!(f, "{}.{}: unable to capture into {}", schema, field, type_name),
            CompileError::MisplacedOptionalMarker { schema, field } => write!(
                f,
                "{}.{} is marked with \"?\" but cannot be absent",
                schema, field
            ),
            CompileError::InvalidMarker {
                schema,
                field,
                marker,
            } => write!(f, "invalid marker \"{}\" on {}.{}", marker, schema, field),
            CompileError::UnregisteredCapability {
                schema,
                field,
                capability,
            } => write!(
                f,
                "{}.{}: capability {} has no registered variants",
                schema, field, capability
            ),
            CompileError::RecursiveSchema { schema } => {
                write!(f, "{} contains itself", schema)
            }
            CompileError::Engine { schema, message } => {
                write!(f, "failed to compile pattern for {}: {}", schema, message)
            }
            CompileError::SlotCountMismatch {
                schema,
                slots,
                groups,
            } => write!(
                f,
                "pattern for {} allocated {} slots but the engine reports {} groups",
                schema, slots, groups
            ),
        }
    }
}

impl std::error::Error for CompileError {}

/// Error produced while registering a union
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnionError {
    /// The capability already has a registered variant list
    DuplicateRegistration {
        /// Name of the capability type
        capability: &'static str,
    },

    /// No variants were supplied
    EmptyVariantList {
        /// Name of the capability type
        capability: &'static str,
    },

    /// The same schema was listed twice
    DuplicateVariant {
        /// Name of the capability type
        capability: &'static str,
        /// Name of the repeated variant
        variant: &'static str,
    },
}

impl fmt::Display for UnionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnionError::DuplicateRegistration { capability } => {
                write!(f, "{} already registered", capability)
            }
            UnionError::EmptyVariantList { capability } => {
                write!(f, "{} registered without variants", capability)
            }
            UnionError::DuplicateVariant {
                capability,
                variant,
            } => write!(f, "{} lists {} more than once", capability, variant),
        }
    }
}

impl std::error::Error for UnionError {}

/// Error produced while inflating a match
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchError {
    /// The destination is not the type the pattern was compiled for
    DestinationTypeMismatch {
        /// Expected destination type
        expected: &'static str,
    },

    /// A scalar destination cannot hold the captured span
    UnsupportedFieldRepresentation {
        /// Field name
        field: String,
        /// Name of the destination type
        type_name: &'static str,
    },
}

impl fmt::Display for MatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchError::DestinationTypeMismatch { expected } => {
                write!(f, "expected destination to be {}", expected)
            }
            MatchError::UnsupportedFieldRepresentation { field, type_name } => {
                write!(f, "{}: unable to capture into {}", field, type_name)
            }
        }
    }
}

impl std::error::Error for MatchError {}

/// Any error raised by compiling and matching in one step
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Compilation failed
    Compile(CompileError),
    /// Inflation failed
    Match(MatchError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Compile(e) => write!(f, "{}", e),
            Error::Match(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Compile(e) => Some(e),
            Error::Match(e) => Some(e),
        }
    }
}

impl From<CompileError> for Error {
    fn from(e: CompileError) -> Self {
        Error::Compile(e)
    }
}

impl From<MatchError> for Error {
    fn from(e: MatchError) -> Self {
        Error::Match(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pattern_syntax_message_names_field() {
        let err = CompileError::PatternSyntax {
            schema: "Malformed".to_string(),
            field: "x".to_string(),
            pattern: "[a-".to_string(),
            message: "unclosed character class".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.starts_with("Malformed.x:"));
        assert!(msg.contains("[a-"));
        assert_eq!(err.field(), Some("x"));
    }

    #[test]
    fn test_error_wraps_sources() {
        let err: Error = MatchError::DestinationTypeMismatch { expected: "Foo" }.into();
        assert!(matches!(err, Error::Match(_)));
        assert!(std::error::Error::source(&err).is_some());
        assert_eq!(err.to_string(), "expected destination to be Foo");
    }

    #[test]
    fn test_union_error_display() {
        let err = UnionError::DuplicateRegistration { capability: "Scalar" };
        assert_eq!(err.to_string(), "Scalar already registered");
    }
}
