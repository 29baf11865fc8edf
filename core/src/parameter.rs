//! Parameter definitions.
//!
//! A [`ParameterSpec`] describes one recognized command-line parameter: the
//! marker token that introduces it, how many value tokens it consumes, an
//! optional fixed vocabulary for those values, and an optional deferred
//! action dispatched after parsing.

use std::collections::BTreeSet;
use std::fmt;
use std::rc::Rc;

use crate::Parser;

/// Deferred behavior attached to a parameter, dispatched by
/// [`Parser::run`] after a successful parse.
pub type Action = Rc<dyn Fn(&Invocation<'_>)>;

/// Arguments handed to an [`Action`] when it is dispatched.
#[derive(Clone, Copy)]
pub struct Invocation<'a> {
    /// The matched parameter.
    pub parameter: &'a ParameterSpec,
    /// Values collected for the parameter, in token order.
    pub values: &'a [String],
    /// The parser that produced the result being dispatched.
    pub parser: &'a Parser,
}

/// Definition of a single recognized parameter.
///
/// The marker is `prefix + name + suffix`. Cardinality is the inclusive
/// `(min, max)` bound on value tokens following the marker; `max == 0`
/// makes the parameter a bare flag. When the fixed-value set is non-empty,
/// the effective cardinality is capped at the size of the set.
///
/// # Examples
///
/// ```
/// use cla_core::ParameterSpec;
///
/// let mode = ParameterSpec::new("mode")
///     .with_prefix("--")
///     .with_values(1, 3)
///     .with_fixed_values(["fast", "safe"])
///     .required();
///
/// assert_eq!(mode.marker(), "--mode");
/// assert_eq!(mode.declared_max_values(), 3);
/// assert_eq!(mode.max_values(), 2); // capped by the two fixed values
/// assert!(mode.accepts("fast"));
/// assert!(!mode.accepts("slow"));
/// ```
#[derive(Clone)]
pub struct ParameterSpec {
    name: String,
    description: Option<String>,
    prefix: String,
    suffix: String,
    min_values: usize,
    max_values: usize,
    fixed_values: BTreeSet<String>,
    required: bool,
    action: Option<Action>,
    order_key: i32,
}

impl ParameterSpec {
    /// Maximum value count meaning "no upper bound".
    pub const UNBOUNDED: usize = usize::MAX;

    /// Default marker prefix.
    pub const DEFAULT_PREFIX: &'static str = "-";

    /// Creates an optional bare flag with prefix `-` and no suffix.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            prefix: Self::DEFAULT_PREFIX.to_string(),
            suffix: String::new(),
            min_values: 0,
            max_values: 0,
            fixed_values: BTreeSet::new(),
            required: false,
            action: None,
            order_key: 0,
        }
    }

    /// Alias for [`new`](Self::new) that reads better at call sites
    /// registering value-less switches.
    pub fn flag(name: impl Into<String>) -> Self {
        Self::new(name)
    }

    /// Sets the marker prefix.
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// Sets the marker suffix.
    pub fn with_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.suffix = suffix.into();
        self
    }

    /// Adds a description shown in help output.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Marks the parameter as required.
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Sets the declared `(min, max)` value counts.
    pub fn with_values(mut self, min: usize, max: usize) -> Self {
        self.min_values = min;
        self.max_values = max;
        self
    }

    /// Restricts accepted values to the given vocabulary.
    pub fn with_fixed_values<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fixed_values.extend(values.into_iter().map(Into::into));
        self
    }

    /// Attaches an action dispatched after parsing, ordered by `order_key`
    /// (lowest first).
    pub fn with_action<F>(mut self, order_key: i32, action: F) -> Self
    where
        F: Fn(&Invocation<'_>) + 'static,
    {
        self.action = Some(Rc::new(action));
        self.order_key = order_key;
        self
    }

    /// Parameter name, without affixes.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Description shown in help output, if any.
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Marker prefix (default `-`).
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Marker suffix (default empty).
    pub fn suffix(&self) -> &str {
        &self.suffix
    }

    /// Returns `true` if parsing fails when the parameter is absent.
    pub fn is_required(&self) -> bool {
        self.required
    }

    /// The exact token identifying this parameter: `prefix + name + suffix`.
    ///
    /// # Examples
    ///
    /// ```
    /// use cla_core::ParameterSpec;
    ///
    /// assert_eq!(ParameterSpec::new("v").marker(), "-v");
    /// assert_eq!(
    ///     ParameterSpec::new("out").with_prefix("/").with_suffix(":").marker(),
    ///     "/out:"
    /// );
    /// ```
    pub fn marker(&self) -> String {
        format!("{}{}{}", self.prefix, self.name, self.suffix)
    }

    /// Returns `true` if `token` is this parameter's marker.
    pub fn matches(&self, token: &str) -> bool {
        token.len() == self.prefix.len() + self.name.len() + self.suffix.len()
            && token
                .strip_prefix(self.prefix.as_str())
                .and_then(|rest| rest.strip_suffix(self.suffix.as_str()))
                == Some(self.name.as_str())
    }

    /// Effective minimum value count.
    ///
    /// Recomputed on every call so edits to the fixed-value set are
    /// reflected immediately.
    pub fn min_values(&self) -> usize {
        self.cap(self.min_values)
    }

    /// Effective maximum value count, capped like
    /// [`min_values`](Self::min_values).
    pub fn max_values(&self) -> usize {
        self.cap(self.max_values)
    }

    fn cap(&self, declared: usize) -> usize {
        if self.fixed_values.is_empty() {
            declared
        } else {
            declared.min(self.fixed_values.len())
        }
    }

    /// Minimum value count as declared, ignoring the fixed-value cap.
    pub fn declared_min_values(&self) -> usize {
        self.min_values
    }

    /// Maximum value count as declared, ignoring the fixed-value cap.
    pub fn declared_max_values(&self) -> usize {
        self.max_values
    }

    /// Returns `true` if values are restricted to a fixed vocabulary.
    pub fn has_fixed_values(&self) -> bool {
        !self.fixed_values.is_empty()
    }

    /// Fixed vocabulary in sorted order (empty for free-form parameters).
    pub fn fixed_values(&self) -> impl Iterator<Item = &str> {
        self.fixed_values.iter().map(String::as_str)
    }

    /// Returns `true` if `value` may be collected for this parameter.
    pub fn accepts(&self, value: &str) -> bool {
        self.fixed_values.is_empty() || self.fixed_values.contains(value)
    }

    /// Action dispatched by [`Parser::run`], if any.
    pub fn action(&self) -> Option<&Action> {
        self.action.as_ref()
    }

    /// Dispatch position of the action; lower keys run first.
    pub fn order_key(&self) -> i32 {
        self.order_key
    }

    /// Renames the parameter. The registry keys parameters by name, so
    /// rename before registering.
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn set_description(&mut self, description: Option<String>) {
        self.description = description;
    }

    pub fn set_prefix(&mut self, prefix: impl Into<String>) {
        self.prefix = prefix.into();
    }

    pub fn set_suffix(&mut self, suffix: impl Into<String>) {
        self.suffix = suffix.into();
    }

    pub fn set_required(&mut self, required: bool) {
        self.required = required;
    }

    pub fn set_min_values(&mut self, min: usize) {
        self.min_values = min;
    }

    pub fn set_max_values(&mut self, max: usize) {
        self.max_values = max;
    }

    /// Adds one value to the fixed vocabulary.
    pub fn add_fixed_value(&mut self, value: impl Into<String>) {
        self.fixed_values.insert(value.into());
    }

    pub fn set_action(&mut self, action: Option<Action>) {
        self.action = action;
    }

    pub fn set_order_key(&mut self, order_key: i32) {
        self.order_key = order_key;
    }

    fn cardinality(&self) -> String {
        let (min, max) = (self.min_values(), self.max_values());
        if max == 0 {
            String::new()
        } else if min == max {
            format!("{{{min}}}")
        } else if max == Self::UNBOUNDED {
            format!("{{{min}-inf}}")
        } else {
            format!("{{{min}-{max}}}")
        }
    }
}

impl fmt::Debug for ParameterSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParameterSpec")
            .field("name", &self.name)
            .field("description", &self.description)
            .field("prefix", &self.prefix)
            .field("suffix", &self.suffix)
            .field("min_values", &self.min_values)
            .field("max_values", &self.max_values)
            .field("fixed_values", &self.fixed_values)
            .field("required", &self.required)
            .field("action", &self.action.as_ref().map(|_| "<action>"))
            .field("order_key", &self.order_key)
            .finish()
    }
}

/// Renders the help line for this parameter.
///
/// ```
/// use cla_core::ParameterSpec;
///
/// let size = ParameterSpec::new("size")
///     .with_values(1, 2)
///     .with_description("Window size")
///     .required();
/// assert_eq!(size.to_string(), "-size value{1-2}   \"Window size\"   <<required>>");
/// ```
impl fmt::Display for ParameterSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.marker())?;

        if self.has_fixed_values() {
            let values: Vec<&str> = self.fixed_values().collect();
            write!(f, " [{}]", values.join("|"))?;
        } else if self.max_values() > 0 {
            f.write_str(" value")?;
        }
        f.write_str(&self.cardinality())?;

        if let Some(desc) = self.description.as_deref().filter(|d| !d.is_empty()) {
            write!(f, "   \"{desc}\"")?;
        }
        if self.required {
            f.write_str("   <<required>>")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let spec = ParameterSpec::new("verbose");

        assert_eq!(spec.marker(), "-verbose");
        assert_eq!(spec.min_values(), 0);
        assert_eq!(spec.max_values(), 0);
        assert!(!spec.is_required());
        assert!(!spec.has_fixed_values());
        assert!(spec.action().is_none());
        assert_eq!(spec.order_key(), 0);
    }

    #[test]
    fn test_matches_exact_marker_only() {
        let spec = ParameterSpec::new("out").with_prefix("--").with_suffix("=");

        assert!(spec.matches("--out="));
        assert!(!spec.matches("--out"));
        assert!(!spec.matches("-out="));
        assert!(!spec.matches("--outx="));
    }

    #[test]
    fn test_fixed_values_cap_cardinality() {
        let mut spec = ParameterSpec::new("color")
            .with_values(2, 5)
            .with_fixed_values(["red"]);

        assert_eq!(spec.min_values(), 1);
        assert_eq!(spec.max_values(), 1);

        spec.add_fixed_value("green");
        spec.add_fixed_value("blue");
        assert_eq!(spec.min_values(), 2);
        assert_eq!(spec.max_values(), 3);
        assert_eq!(spec.declared_max_values(), 5);
    }

    #[test]
    fn test_free_values_accept_anything() {
        let spec = ParameterSpec::new("file").with_values(1, 1);
        assert!(spec.accepts("anything at all"));
    }

    #[test]
    fn test_setters() {
        let mut spec = ParameterSpec::new("a");
        spec.set_name("b");
        spec.set_prefix("+");
        spec.set_suffix("!");
        spec.set_required(true);
        spec.set_min_values(1);
        spec.set_max_values(4);
        spec.set_order_key(7);
        spec.set_description(Some("desc".into()));

        assert_eq!(spec.marker(), "+b!");
        assert!(spec.is_required());
        assert_eq!((spec.min_values(), spec.max_values()), (1, 4));
        assert_eq!(spec.order_key(), 7);
        assert_eq!(spec.description(), Some("desc"));
    }

    #[test]
    fn test_display_flag() {
        assert_eq!(ParameterSpec::flag("q").to_string(), "-q");
    }

    #[test]
    fn test_display_fixed_values_and_unbounded() {
        let spec = ParameterSpec::new("level").with_fixed_values(["low", "high"]).with_values(1, 1);
        assert_eq!(spec.to_string(), "-level [high|low]{1}");

        let spec = ParameterSpec::new("files").with_values(0, ParameterSpec::UNBOUNDED);
        assert_eq!(spec.to_string(), "-files value{0-inf}");
    }

    #[test]
    fn test_debug_hides_action_body() {
        let spec = ParameterSpec::new("x").with_action(3, |_| {});
        let debug = format!("{spec:?}");
        assert!(debug.contains("<action>"));
        assert!(debug.contains("order_key: 3"));
    }
}
