//! Built-in help parameter.

use std::cell::RefCell;
use std::io::{self, Write};

use tracing::error;

use crate::{ParameterSpec, Parser};

const RULE: &str = "==================================================";
const SEPARATOR: &str = "__________________________________________________";

/// Description given to the parameter registered by
/// [`Parser::add_default_help_parameter`].
pub const HELP_DESCRIPTION: &str = "Help about this command";

impl Parser {
    /// Writes a listing of every registered parameter to `out`, sorted
    /// case-insensitively by name.
    ///
    /// # Examples
    ///
    /// ```
    /// use cla_core::{ParameterSpec, Parser};
    ///
    /// let mut parser = Parser::new();
    /// parser
    ///     .add_parameter(ParameterSpec::new("b").with_values(1, 1))
    ///     .add_parameter(ParameterSpec::flag("A").with_description("first"));
    ///
    /// let mut out = Vec::new();
    /// parser.render_help("Sorts things.", &mut out).unwrap();
    /// let text = String::from_utf8(out).unwrap();
    ///
    /// let a = text.find("-A   \"first\"").unwrap();
    /// let b = text.find("-b value{1}").unwrap();
    /// assert!(a < b);
    /// ```
    pub fn render_help<W: Write + ?Sized>(&self, description: &str, out: &mut W) -> io::Result<()> {
        let mut parameters = self.list_parameters();
        parameters.sort_by(|a, b| {
            a.name()
                .to_lowercase()
                .cmp(&b.name().to_lowercase())
                .then_with(|| a.name().cmp(b.name()))
        });

        writeln!(out, "{RULE}")?;
        writeln!(out, "Help:")?;
        writeln!(out, "{description}")?;
        writeln!(out, "parameter [values{{cardinality}}]   \"description\"")?;
        writeln!(out, "{SEPARATOR}")?;
        for parameter in parameters {
            writeln!(out, "{parameter}")?;
        }
        writeln!(out, "{RULE}")?;
        out.flush()
    }

    /// Registers a value-less, optional help parameter whose action writes
    /// [`render_help`](Parser::render_help) output to `out`.
    ///
    /// The action's order key is `i32::MIN`, so help runs before any other
    /// action matched in the same call. Returns a copy of the registered
    /// parameter.
    ///
    /// # Examples
    ///
    /// ```
    /// use cla_core::Parser;
    ///
    /// let mut parser = Parser::new();
    /// let help = parser.add_default_help_parameter(std::io::sink(), "demo", "help", "--");
    ///
    /// assert_eq!(help.marker(), "--help");
    /// assert_eq!(help.order_key(), i32::MIN);
    /// assert!(parser.get_parameter("help").is_some());
    /// ```
    pub fn add_default_help_parameter<W>(
        &mut self,
        out: W,
        description: &str,
        name: &str,
        prefix: &str,
    ) -> ParameterSpec
    where
        W: Write + 'static,
    {
        let out = RefCell::new(out);
        let description = description.to_string();

        let help = ParameterSpec::new(name)
            .with_prefix(prefix)
            .with_description(HELP_DESCRIPTION)
            .with_action(i32::MIN, move |call| {
                let mut out = out.borrow_mut();
                if let Err(err) = call.parser.render_help(&description, &mut *out) {
                    error!(error = %err, "Failed to write help");
                }
            });

        self.add_parameter(help.clone());
        help
    }
}
