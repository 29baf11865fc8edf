//! Declarative command-line parameter parsing.
//!
//! Callers register named parameters with cardinality and value constraints,
//! then hand a [`Parser`] a raw token sequence (or a single string to be
//! tokenized) to validate and decompose into a [`ParsedResult`].
//!
//! - [`ParameterSpec`]: one recognized parameter: marker affixes,
//!   `(min, max)` value counts, an optional fixed vocabulary, a required
//!   flag, and an optional post-parse action with its order key.
//! - [`Parser`]: the registry plus the single-pass scanner
//!   ([`Parser::parse`]) and action dispatch ([`Parser::run`]).
//! - [`ParsedResult`]: matched names mapped to their values, plus any
//!   advisory [`ValueWarning`]s.
//! - [`ParserDefinition`]: JSON/YAML description of a registry.
//!
//! Values are never coerced; everything stays raw text. Combined short
//! flags (`-abc`), environment variables, and config-file merging are not
//! supported.
//!
//! # Example
//!
//! ```
//! use cla_core::*;
//!
//! let mut parser = Parser::new();
//! parser
//!     .add_parameter(ParameterSpec::flag("v").with_description("Verbose"))
//!     .add_parameter(
//!         ParameterSpec::new("format")
//!             .with_prefix("--")
//!             .with_values(1, 1)
//!             .with_fixed_values(["json", "yaml"]),
//!     )
//!     .add_parameter(ParameterSpec::new("in").with_values(1, 4).required());
//!
//! let result = parser
//!     .parse(&["-in", "a.txt", "b.txt", "--format", "json", "-v"])
//!     .unwrap();
//! assert_eq!(result.values_for("in").unwrap(), ["a.txt", "b.txt"]);
//! assert_eq!(result.values_for("format").unwrap(), ["json"]);
//! assert!(result.contains("v"));
//!
//! let err = parser.parse(&["-in", "a.txt", "--format", "xml"]).unwrap_err();
//! assert!(matches!(err, ParseError::InvalidValue { .. }));
//! ```

mod definition;
mod error;
mod help;
mod parameter;
mod parser;
mod result;
mod tokenize;
mod validate;

pub use definition::{DefinitionError, HelpDef, ParameterDef, ParserDefinition};
pub use error::{ErrorCategory, ParseError, Result};
pub use help::HELP_DESCRIPTION;
pub use parameter::{Action, Invocation, ParameterSpec};
pub use parser::Parser;
pub use result::{ParsedResult, ValueWarning};
pub use tokenize::tokenize;
pub use validate::{ValidationError, validate_parameter, validate_parser};
