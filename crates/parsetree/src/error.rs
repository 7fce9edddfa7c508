//! Error types for parse tree construction and validation.
//!
//! The tree itself is inert data. Errors arise only when a producer asks a
//! construction helper for a node that would break a shape invariant, when
//! configuration cannot be loaded, or when the validator rejects a tree.

use thiserror::Error;

use crate::validate::Violation;

/// Result type alias for parse tree operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for parse tree operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid configuration: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("{layer} tuple needs at least 2 elements, found {found}")]
    TupleArity { layer: &'static str, found: usize },

    #[error("{construct} needs at least one clause")]
    EmptyCases { construct: &'static str },

    #[error("{what} must not be empty")]
    EmptySequence { what: &'static str },

    #[error("type constraint carries neither an annotation nor a coercion")]
    EmptyConstraint,

    #[error("default argument on parameter `{label}` which is not optional")]
    DefaultWithoutOptionalLabel { label: String },

    #[error("invalid long identifier: {0:?}")]
    InvalidLongident(String),

    #[error("tree failed validation with {} violation(s)", .0.len())]
    Validation(Vec<Violation>),
}
