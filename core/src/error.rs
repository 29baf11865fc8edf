//! Error types for parsing a token stream against a [`Parser`](crate::Parser).
//!
//! Every variant aborts the current parse call; no partial result is
//! returned alongside an error.

use thiserror::Error;

/// Errors raised while scanning a token sequence.
///
/// # Examples
///
/// ```
/// use cla_core::{ErrorCategory, ParameterSpec, ParseError, Parser};
///
/// let mut parser = Parser::new();
/// parser.add_parameter(ParameterSpec::flag("v"));
///
/// let err = parser.parse(&["-x"]).unwrap_err();
/// assert_eq!(err, ParseError::UnknownParameter("-x".into()));
/// assert_eq!(err.category(), ErrorCategory::Token);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// A token in marker position matches no registered parameter.
    #[error("unknown parameter \"{0}\"")]
    UnknownParameter(String),

    /// A parameter marker appeared more than once in one parse call.
    #[error("duplicate parameter \"{0}\"")]
    DuplicateParameter(String),

    /// Fewer tokens remain than the parameter's minimum value count.
    #[error("not enough values for parameter \"{name}\": needs at least {min_values}, {available} left")]
    InsufficientValues {
        /// Parameter name (without affixes).
        name: String,
        /// Effective minimum value count.
        min_values: usize,
        /// Tokens remaining after the marker.
        available: usize,
    },

    /// A value is not a member of the parameter's fixed-value set.
    #[error("value \"{value}\" invalid for parameter \"{name}\"")]
    InvalidValue {
        /// The rejected value.
        value: String,
        /// Parameter name (without affixes).
        name: String,
    },

    /// A required parameter never appeared in the token stream.
    #[error("parameter \"{0}\" required")]
    MissingRequiredParameter(String),
}

/// Coarse grouping of [`ParseError`] kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// A token could not be matched to a parameter.
    Token,
    /// A value count constraint was violated.
    Count,
    /// A value or occurrence was rejected.
    Value,
}

impl ParseError {
    /// Returns the family this error belongs to.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::UnknownParameter(_) => ErrorCategory::Token,
            Self::InsufficientValues { .. } | Self::MissingRequiredParameter(_) => {
                ErrorCategory::Count
            }
            Self::InvalidValue { .. } | Self::DuplicateParameter(_) => ErrorCategory::Value,
        }
    }
}

/// Convenience alias for results with [`ParseError`].
pub type Result<T> = std::result::Result<T, ParseError>;
