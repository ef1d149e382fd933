//! Error taxonomy for the routing core.
//!
//! Compile and registry errors are returned to whoever is registering routes and never leave the
//! registry half-updated. Coercion errors are per-capture and travel with the request instead.

use std::num::ParseIntError;
use thiserror::Error;

/// Errors produced while compiling a path template.
#[derive(Debug, Clone, Error)]
pub enum CompileError {
    /// The same capture name appears in more than one placeholder.
    #[error("capture `{name}` is used more than once in template `{template}`")]
    DuplicateCapture { template: String, name: String },

    /// The template, after placeholder substitution, is not a valid regular expression.
    #[error("template `{template}` does not compile to a valid pattern: {source}")]
    InvalidPattern {
        template: String,
        #[source]
        source: regex::Error,
    },
}

/// Errors produced by route registry mutations.
#[derive(Debug, Clone, Error)]
pub enum RegistryError {
    #[error("a route named `{0}` is already registered")]
    DuplicateName(String),

    #[error("no route named `{0}` is registered")]
    NotFound(String),

    #[error(transparent)]
    Compile(#[from] CompileError),
}

/// Conversion failure for a single captured value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoercionError {
    #[error("capture `{name}` value `{raw}` is not a valid integer: {source}")]
    IntegerParseFailure {
        name: String,
        raw: String,
        #[source]
        source: ParseIntError,
    },
}

impl CoercionError {
    /// Name of the capture that failed to convert.
    pub fn capture_name(&self) -> &str {
        match self {
            CoercionError::IntegerParseFailure { name, .. } => name,
        }
    }

    /// The raw text that was captured.
    pub fn raw(&self) -> &str {
        match self {
            CoercionError::IntegerParseFailure { raw, .. } => raw,
        }
    }
}
