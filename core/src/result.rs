//! Parse output: matched parameter names mapped to their collected values.

use std::collections::HashMap;
use std::fmt;

use serde::Serialize;

/// Advisory raised when a mandatory value equals another parameter's
/// marker. Parsing continues; the value is still collected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValueWarning {
    /// Parameter that consumed the value.
    pub parameter: String,
    /// The consumed value.
    pub value: String,
    /// Parameter whose marker the value matches.
    pub shadowed: String,
}

impl fmt::Display for ValueWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "value \"{}\" for parameter \"{}\" equals parameter \"{}\", maybe an error?",
            self.value, self.parameter, self.shadowed
        )
    }
}

/// Values collected by one [`Parser::parse`](crate::Parser::parse) call.
///
/// A name present with an empty value list means the parameter was
/// supplied without values; an absent name means it was not supplied.
///
/// # Examples
///
/// ```
/// use cla_core::{ParameterSpec, Parser};
///
/// let mut parser = Parser::new();
/// parser
///     .add_parameter(ParameterSpec::flag("v"))
///     .add_parameter(ParameterSpec::new("o").with_values(1, 1));
///
/// let result = parser.parse(&["-o", "out.txt", "-v"]).unwrap();
/// assert_eq!(result.names(), vec!["o", "v"]);
/// assert_eq!(result.values_for("o"), Some(&["out.txt".to_string()][..]));
/// assert_eq!(result.values_for("v"), Some(&[][..]));
/// assert!(!result.contains("q"));
/// ```
#[derive(Debug, Clone, Default, Serialize)]
pub struct ParsedResult {
    #[serde(rename = "parameters")]
    values: HashMap<String, Vec<String>>,
    #[serde(skip)]
    order: Vec<String>,
    warnings: Vec<ValueWarning>,
}

impl ParsedResult {
    /// Creates an empty result.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `name` as matched with no values yet.
    ///
    /// Returns `false` if the name was already present.
    pub(crate) fn insert(&mut self, name: &str) -> bool {
        if self.values.contains_key(name) {
            return false;
        }
        self.values.insert(name.to_string(), Vec::new());
        self.order.push(name.to_string());
        true
    }

    /// Appends a value to an already recorded parameter and returns its
    /// new value count.
    pub(crate) fn push_value(&mut self, name: &str, value: &str) -> usize {
        match self.values.get_mut(name) {
            Some(values) => {
                values.push(value.to_string());
                values.len()
            }
            None => 0,
        }
    }

    pub(crate) fn push_warning(&mut self, warning: ValueWarning) {
        self.warnings.push(warning);
    }

    /// Matched parameter names, in the order their markers appeared.
    pub fn names(&self) -> Vec<&str> {
        self.order.iter().map(String::as_str).collect()
    }

    /// Values collected for `name`, or `None` if it was not supplied.
    pub fn values_for(&self, name: &str) -> Option<&[String]> {
        self.values.get(name).map(Vec::as_slice)
    }

    /// Returns `true` if `name` was supplied.
    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Number of matched parameters.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Advisories raised during the parse.
    pub fn warnings(&self) -> &[ValueWarning] {
        &self.warnings
    }

    /// Iterates `(name, values)` pairs in match order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.order.iter().filter_map(|name| {
            self.values
                .get(name)
                .map(|values| (name.as_str(), values.as_slice()))
        })
    }
}

impl fmt::Display for ParsedResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let entries: Vec<String> = self
            .iter()
            .map(|(name, values)| format!("{name} [{}]", values.join(", ")))
            .collect();
        write!(f, "[Parsed input: {}]", entries.join(","))
    }
}
