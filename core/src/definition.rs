//! Serializable parser definitions.
//!
//! A [`ParserDefinition`] describes a parameter registry in JSON or YAML so
//! tools can build a [`Parser`] without code. Actions cannot be serialized;
//! the only behavior a definition can wire up is the built-in help
//! parameter.
//!
//! # Example YAML
//!
//! ```yaml
//! description: Copies files
//! help:
//!   name: help
//!   prefix: "--"
//! parameters:
//!   - name: src
//!     required: true
//!     min_values: 1
//!     max_values: inf
//!   - name: mode
//!     min_values: 1
//!     max_values: 1
//!     values: [fast, safe]
//!   - name: v
//! ```

use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{ParameterSpec, Parser};

/// Errors that can occur while loading or saving a definition.
#[derive(Debug, Error)]
pub enum DefinitionError {
    /// File I/O failure.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON parsing or serialization failure.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// YAML parsing or serialization failure.
    #[error("YAML error: {0}")]
    YamlError(#[from] serde_yaml::Error),

    /// File extension is neither JSON nor YAML.
    #[error("unsupported definition format: {0}")]
    UnsupportedFormat(String),
}

fn default_prefix() -> String {
    ParameterSpec::DEFAULT_PREFIX.to_string()
}

fn default_help_name() -> String {
    "help".to_string()
}

/// Serializable form of a [`ParameterSpec`], without its action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterDef {
    pub name: String,
    #[serde(default = "default_prefix")]
    pub prefix: String,
    #[serde(default)]
    pub suffix: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub min_values: usize,
    /// Upper value count; `inf` or `unbounded` in files means
    /// [`ParameterSpec::UNBOUNDED`].
    #[serde(default, with = "value_count")]
    pub max_values: usize,
    /// Fixed vocabulary; empty means free-form values.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub values: Vec<String>,
}

impl ParameterDef {
    /// Builds the runtime parameter.
    pub fn into_spec(self) -> ParameterSpec {
        let mut spec = ParameterSpec::new(self.name)
            .with_prefix(self.prefix)
            .with_suffix(self.suffix)
            .with_values(self.min_values, self.max_values)
            .with_fixed_values(self.values);
        spec.set_description(self.description);
        spec.set_required(self.required);
        spec
    }
}

impl From<&ParameterSpec> for ParameterDef {
    fn from(spec: &ParameterSpec) -> Self {
        Self {
            name: spec.name().to_string(),
            prefix: spec.prefix().to_string(),
            suffix: spec.suffix().to_string(),
            description: spec.description().map(String::from),
            required: spec.is_required(),
            min_values: spec.declared_min_values(),
            max_values: spec.declared_max_values(),
            values: spec.fixed_values().map(String::from).collect(),
        }
    }
}

/// Value counts written as a number, or `inf`/`unbounded` for no limit.
mod value_count {
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serializer};

    use crate::ParameterSpec;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Count(usize),
        Word(String),
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<usize, D::Error> {
        match Raw::deserialize(deserializer)? {
            Raw::Count(count) => Ok(count),
            Raw::Word(word) if word == "inf" || word == "unbounded" => {
                Ok(ParameterSpec::UNBOUNDED)
            }
            Raw::Word(word) => Err(D::Error::custom(format!(
                "invalid value count \"{word}\", expected a number, \"inf\" or \"unbounded\""
            ))),
        }
    }

    pub fn serialize<S: Serializer>(count: &usize, serializer: S) -> Result<S::Ok, S::Error> {
        if *count == ParameterSpec::UNBOUNDED {
            serializer.serialize_str("inf")
        } else {
            serializer.serialize_u64(*count as u64)
        }
    }
}

/// Settings for the built-in help parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HelpDef {
    #[serde(default = "default_help_name")]
    pub name: String,
    #[serde(default = "default_prefix")]
    pub prefix: String,
}

impl Default for HelpDef {
    fn default() -> Self {
        Self {
            name: default_help_name(),
            prefix: default_prefix(),
        }
    }
}

/// A complete parameter registry description.
///
/// # Examples
///
/// ```
/// use cla_core::ParserDefinition;
///
/// let def = ParserDefinition::from_yaml_str(
///     "parameters:\n  - name: n\n    min_values: 1\n    max_values: 1\n",
/// )
/// .unwrap();
/// let parser = def.into_parser(std::io::sink());
///
/// let result = parser.parse(&["-n", "7"]).unwrap();
/// assert_eq!(result.values_for("n").unwrap(), ["7"]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParserDefinition {
    /// Text shown at the top of the help listing.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Registers the built-in help parameter when present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub help: Option<HelpDef>,
    #[serde(default)]
    pub parameters: Vec<ParameterDef>,
}

enum Format {
    Json,
    Yaml,
}

impl Format {
    fn from_path(path: &Path) -> Result<Self, DefinitionError> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Ok(Self::Json),
            Some("yaml" | "yml") => Ok(Self::Yaml),
            other => Err(DefinitionError::UnsupportedFormat(
                other.unwrap_or("<none>").to_string(),
            )),
        }
    }
}

impl ParserDefinition {
    /// Loads a definition, choosing JSON or YAML by file extension.
    ///
    /// # Errors
    ///
    /// Returns [`UnsupportedFormat`](DefinitionError::UnsupportedFormat) for
    /// extensions other than `.json`, `.yaml` and `.yml`,
    /// [`IoError`](DefinitionError::IoError) if the file cannot be read, or
    /// a JSON/YAML error if parsing fails.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, DefinitionError> {
        let path = path.as_ref();
        let format = Format::from_path(path)?;
        let reader = BufReader::new(std::fs::File::open(path)?);
        let definition = match format {
            Format::Json => serde_json::from_reader(reader)?,
            Format::Yaml => serde_yaml::from_reader(reader)?,
        };
        Ok(definition)
    }

    /// Saves the definition, choosing JSON or YAML by file extension.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), DefinitionError> {
        let path = path.as_ref();
        let format = Format::from_path(path)?;
        let mut writer = BufWriter::new(std::fs::File::create(path)?);
        match format {
            Format::Json => serde_json::to_writer_pretty(&mut writer, self)?,
            Format::Yaml => serde_yaml::to_writer(&mut writer, self)?,
        }
        writer.flush()?;
        Ok(())
    }

    pub fn from_json_str(input: &str) -> Result<Self, DefinitionError> {
        Ok(serde_json::from_str(input)?)
    }

    pub fn from_yaml_str(input: &str) -> Result<Self, DefinitionError> {
        Ok(serde_yaml::from_str(input)?)
    }

    /// Captures the parameters currently registered in `parser`, sorted by
    /// name. Help wiring and actions are not captured.
    pub fn from_parser(parser: &Parser) -> Self {
        let parameters = parser
            .list_parameters()
            .into_iter()
            .map(ParameterDef::from)
            .collect();
        Self {
            description: None,
            help: None,
            parameters,
        }
    }

    /// Builds a parser. When [`help`](Self::help) is set, the help parameter
    /// is registered last and writes to `help_out`.
    pub fn into_parser<W: Write + 'static>(self, help_out: W) -> Parser {
        let mut parser = Parser::new();
        for parameter in self.parameters {
            parser.add_parameter(parameter.into_spec());
        }
        if let Some(help) = self.help {
            parser.add_default_help_parameter(
                help_out,
                self.description.as_deref().unwrap_or_default(),
                &help.name,
                &help.prefix,
            );
        }
        parser
    }
}
