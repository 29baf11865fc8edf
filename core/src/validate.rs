//! Parameter and registry validation.
//!
//! Registration never rejects a parameter, so definitions that cannot parse
//! sensibly (a minimum above the maximum, two parameters sharing a marker)
//! are only caught when a caller asks for it.
//!
//! # Examples
//!
//! ```
//! use cla_core::*;
//!
//! let mut parser = Parser::new();
//! parser.add_parameter(ParameterSpec::new("n").with_values(1, 2));
//! assert!(parser.validate().is_empty());
//!
//! // Invalid: more values required than allowed
//! parser.add_parameter(ParameterSpec::new("bad").with_values(3, 1));
//! assert!(!parser.validate().is_empty());
//! ```

use std::collections::HashSet;

use thiserror::Error;

use crate::{ParameterSpec, Parser};

/// Parameter/registry validation errors.
///
/// Each variant describes a specific structural problem found during
/// validation. The `Display` impl provides a human-readable message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Parameter name is empty or whitespace-only.
    #[error("parameter name cannot be empty")]
    EmptyName,
    /// Declared minimum value count exceeds the declared maximum.
    #[error("parameter \"{name}\" requires {min} values but allows at most {max}")]
    InvalidCardinality {
        /// Parameter name.
        name: String,
        /// Declared minimum.
        min: usize,
        /// Declared maximum.
        max: usize,
    },
    /// Two parameters produce the same marker token.
    #[error("duplicate parameter marker: {0}")]
    DuplicateMarker(String),
}

/// Validates a single parameter definition.
///
/// # Examples
///
/// ```
/// use cla_core::*;
///
/// assert!(validate_parameter(&ParameterSpec::new("x").with_values(0, 1)).is_empty());
///
/// let errors = validate_parameter(&ParameterSpec::new("x").with_values(2, 1));
/// assert!(matches!(errors[0], ValidationError::InvalidCardinality { .. }));
/// ```
pub fn validate_parameter(parameter: &ParameterSpec) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if parameter.name().trim().is_empty() {
        errors.push(ValidationError::EmptyName);
        return errors;
    }

    let (min, max) = (
        parameter.declared_min_values(),
        parameter.declared_max_values(),
    );
    if min > max {
        errors.push(ValidationError::InvalidCardinality {
            name: parameter.name().to_string(),
            min,
            max,
        });
    }

    errors
}

/// Validates every registered parameter and checks that markers are
/// unique across the registry.
///
/// Parameters are checked in name order, so a shared marker is reported on
/// the later name.
pub fn validate_parser(parser: &Parser) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    let mut seen = HashSet::new();

    for parameter in parser.list_parameters() {
        errors.extend(validate_parameter(parameter));

        let marker = parameter.marker();
        if !seen.insert(marker.clone()) {
            errors.push(ValidationError::DuplicateMarker(marker));
        }
    }

    errors
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_parameter_rejects_empty_name() {
        let errors = validate_parameter(&ParameterSpec::new("  "));
        assert_eq!(errors, vec![ValidationError::EmptyName]);
    }

    #[test]
    fn test_validate_parameter_uses_declared_counts() {
        // The fixed set caps the effective counts, but the declaration is
        // still inconsistent.
        let parameter = ParameterSpec::new("c")
            .with_values(4, 2)
            .with_fixed_values(["x"]);

        assert_eq!(
            validate_parameter(&parameter),
            vec![ValidationError::InvalidCardinality {
                name: "c".to_string(),
                min: 4,
                max: 2,
            }]
        );
    }

    #[test]
    fn test_validate_parser_rejects_shared_marker() {
        let mut parser = Parser::new();
        parser
            .add_parameter(ParameterSpec::new("ab").with_prefix("-"))
            .add_parameter(ParameterSpec::new("b").with_prefix("-a"));

        let errors = validate_parser(&parser);
        assert_eq!(
            errors,
            vec![ValidationError::DuplicateMarker("-ab".to_string())]
        );
    }

    #[test]
    fn test_validate_parser_accepts_valid_registry() {
        let mut parser = Parser::new();
        parser
            .add_parameter(ParameterSpec::flag("v"))
            .add_parameter(ParameterSpec::new("v").with_prefix("--"))
            .add_parameter(ParameterSpec::new("files").with_values(1, ParameterSpec::UNBOUNDED));

        // "v" was replaced, so only two parameters remain.
        assert_eq!(parser.len(), 2);
        assert!(validate_parser(&parser).is_empty());
    }
}
