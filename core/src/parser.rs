//! The parameter registry and the single-pass token scanner.
//!
//! [`Parser::parse`] walks the token sequence once, front to back. Each
//! step reads a marker, then consumes that parameter's values in two
//! phases:
//!
//! 1. **Mandatory**: exactly `min_values` tokens, taken unconditionally even
//!    if they look like markers (such values raise a [`ValueWarning`]).
//! 2. **Optional**: further tokens up to `max_values`, stopping at the first
//!    token that is a registered marker.
//!
//! Values are never reinterpreted once consumed and the scan never
//! backtracks.

use std::collections::BTreeMap;

use tracing::{debug, warn};

use crate::error::{ParseError, Result};
use crate::parameter::{Invocation, ParameterSpec};
use crate::result::{ParsedResult, ValueWarning};
use crate::tokenize::tokenize;
use crate::validate::{ValidationError, validate_parser};

/// Registry of [`ParameterSpec`]s keyed by name.
///
/// Parameters are kept in name order, so when two parameters share a
/// marker the one with the lowest name always wins.
///
/// Set up the registry first, then parse. Registering or removing
/// parameters while holding a result from an earlier parse is allowed, but
/// [`run`](Parser::run) resolves actions against the registry as it is at
/// dispatch time.
///
/// # Examples
///
/// ```
/// use cla_core::{ParameterSpec, ParseError, Parser};
///
/// let mut parser = Parser::new();
/// parser
///     .add_parameter(ParameterSpec::new("in").with_values(1, 1).required())
///     .add_parameter(ParameterSpec::new("tags").with_values(0, 3));
///
/// let result = parser.parse_line("-in data.csv -tags a b").unwrap();
/// assert_eq!(result.values_for("tags").unwrap(), ["a", "b"]);
///
/// let err = parser.parse(&["-tags", "x"]).unwrap_err();
/// assert_eq!(err, ParseError::MissingRequiredParameter("in".into()));
/// ```
#[derive(Debug, Clone, Default)]
pub struct Parser {
    parameters: BTreeMap<String, ParameterSpec>,
}

impl Parser {
    /// Creates a parser with no registered parameters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a parameter, replacing any existing one with the same name.
    ///
    /// Registration never fails; use [`validate`](Parser::validate) to check
    /// the registry for inconsistent definitions.
    pub fn add_parameter(&mut self, parameter: ParameterSpec) -> &mut Self {
        if let Some(previous) = self
            .parameters
            .insert(parameter.name().to_string(), parameter)
        {
            debug!(parameter = previous.name(), "Replaced parameter definition");
        }
        self
    }

    /// Looks up a parameter by name (without affixes).
    pub fn get_parameter(&self, name: &str) -> Option<&ParameterSpec> {
        self.parameters.get(name)
    }

    /// Removes and returns the parameter registered under `name`.
    ///
    /// The name is the registry key, so registered parameters are edited by
    /// removing them, changing them and registering them again.
    pub fn remove_parameter(&mut self, name: &str) -> Option<ParameterSpec> {
        self.parameters.remove(name)
    }

    /// All registered parameters, sorted by name.
    pub fn list_parameters(&self) -> Vec<&ParameterSpec> {
        self.parameters.values().collect()
    }

    /// Number of registered parameters.
    pub fn len(&self) -> usize {
        self.parameters.len()
    }

    /// Returns `true` if no parameters are registered.
    pub fn is_empty(&self) -> bool {
        self.parameters.is_empty()
    }

    /// Finds the parameter whose marker is exactly `token`, preferring the
    /// lowest name if several share it.
    ///
    /// # Examples
    ///
    /// ```
    /// use cla_core::{ParameterSpec, Parser};
    ///
    /// let mut parser = Parser::new();
    /// parser.add_parameter(ParameterSpec::new("all").with_prefix("--"));
    ///
    /// assert_eq!(parser.parameter_for_marker("--all").unwrap().name(), "all");
    /// assert!(parser.parameter_for_marker("-all").is_none());
    /// ```
    pub fn parameter_for_marker(&self, token: &str) -> Option<&ParameterSpec> {
        self.parameters.values().find(|p| p.matches(token))
    }

    /// Checks the registry for definitions that cannot parse sensibly.
    pub fn validate(&self) -> Vec<ValidationError> {
        validate_parser(self)
    }

    /// Parses a token sequence.
    ///
    /// # Errors
    ///
    /// - [`ParseError::UnknownParameter`] when a token in marker position
    ///   matches no registered parameter.
    /// - [`ParseError::DuplicateParameter`] when a marker appears twice.
    /// - [`ParseError::InsufficientValues`] when fewer tokens remain than a
    ///   parameter's minimum.
    /// - [`ParseError::InvalidValue`] when a value falls outside a fixed
    ///   vocabulary.
    /// - [`ParseError::MissingRequiredParameter`] when a required parameter
    ///   never appears, including for an empty token sequence.
    pub fn parse<S: AsRef<str>>(&self, tokens: &[S]) -> Result<ParsedResult> {
        let mut result = ParsedResult::new();

        let mut index = 0;
        while index < tokens.len() {
            let token = tokens[index].as_ref();
            index += 1;

            let parameter = self
                .parameter_for_marker(token)
                .ok_or_else(|| ParseError::UnknownParameter(token.to_string()))?;
            let name = parameter.name();

            if !result.insert(name) {
                return Err(ParseError::DuplicateParameter(name.to_string()));
            }
            debug!(parameter = name, position = index - 1, "Matched parameter");

            let max_values = parameter.max_values();
            if max_values == 0 {
                continue;
            }

            let min_values = parameter.min_values();
            let available = tokens.len() - index;
            if available < min_values {
                return Err(ParseError::InsufficientValues {
                    name: name.to_string(),
                    min_values,
                    available,
                });
            }

            for value in &tokens[index..index + min_values] {
                let value = value.as_ref();
                check_value(parameter, value)?;
                if let Some(shadowed) = self.parameter_for_marker(value) {
                    warn!(
                        parameter = name,
                        value,
                        shadowed = shadowed.name(),
                        "Value equals a parameter marker"
                    );
                    result.push_warning(ValueWarning {
                        parameter: name.to_string(),
                        value: value.to_string(),
                        shadowed: shadowed.name().to_string(),
                    });
                }
                result.push_value(name, value);
            }
            index += min_values;

            let mut collected = min_values;
            while index < tokens.len() && collected < max_values {
                let value = tokens[index].as_ref();
                if self.parameter_for_marker(value).is_some() {
                    break;
                }
                index += 1;
                check_value(parameter, value)?;
                collected = result.push_value(name, value);
            }
        }

        if let Some(name) = self
            .parameters
            .values()
            .find(|p| p.is_required() && !result.contains(p.name()))
            .map(ParameterSpec::name)
        {
            return Err(ParseError::MissingRequiredParameter(name.to_string()));
        }

        Ok(result)
    }

    /// Tokenizes `input` with [`tokenize`] and parses the tokens.
    pub fn parse_line(&self, input: &str) -> Result<ParsedResult> {
        self.parse(&tokenize(input))
    }

    /// Dispatches the actions of every matched parameter that has one,
    /// lowest order key first. Equal keys run in match order.
    ///
    /// Names in `result` that are no longer registered are skipped.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::cell::RefCell;
    /// use std::rc::Rc;
    ///
    /// use cla_core::{ParameterSpec, Parser};
    ///
    /// let log = Rc::new(RefCell::new(Vec::new()));
    /// let mut parser = Parser::new();
    /// for (name, key) in [("a", 5), ("b", -10), ("c", 0)] {
    ///     let log = Rc::clone(&log);
    ///     parser.add_parameter(
    ///         ParameterSpec::flag(name)
    ///             .with_action(key, move |call| log.borrow_mut().push(call.parameter.order_key())),
    ///     );
    /// }
    ///
    /// parser.parse_and_run(&["-a", "-b", "-c"]).unwrap();
    /// assert_eq!(*log.borrow(), vec![-10, 0, 5]);
    /// ```
    pub fn run(&self, result: &ParsedResult) {
        let mut pending: Vec<(&ParameterSpec, &[String])> = result
            .iter()
            .filter_map(|(name, values)| {
                let parameter = self.parameters.get(name)?;
                parameter.action().map(|_| (parameter, values))
            })
            .collect();
        pending.sort_by_key(|(parameter, _)| parameter.order_key());

        for (parameter, values) in pending {
            if let Some(action) = parameter.action() {
                debug!(
                    parameter = parameter.name(),
                    order_key = parameter.order_key(),
                    "Dispatching action"
                );
                action(&Invocation {
                    parameter,
                    values,
                    parser: self,
                });
            }
        }
    }

    /// [`parse`](Parser::parse) followed by [`run`](Parser::run).
    pub fn parse_and_run<S: AsRef<str>>(&self, tokens: &[S]) -> Result<ParsedResult> {
        let result = self.parse(tokens)?;
        self.run(&result);
        Ok(result)
    }

    /// [`parse_line`](Parser::parse_line) followed by [`run`](Parser::run).
    pub fn parse_line_and_run(&self, input: &str) -> Result<ParsedResult> {
        let result = self.parse_line(input)?;
        self.run(&result);
        Ok(result)
    }
}

fn check_value(parameter: &ParameterSpec, value: &str) -> Result<()> {
    if parameter.accepts(value) {
        Ok(())
    } else {
        Err(ParseError::InvalidValue {
            value: value.to_string(),
            name: parameter.name().to_string(),
        })
    }
}
