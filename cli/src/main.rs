use std::io::Write;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use cla_core::{ParsedResult, ParserDefinition};
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Output format for parse results.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum OutputFormat {
    Json,
    Yaml,
    Table,
}

#[derive(Debug, Parser)]
#[command(name = "cla", disable_help_subcommand = true)]
#[command(about = "Check command lines against declarative parameter definitions")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Parse a command line and print the collected values.
    Parse(ParseArgs),
    /// Check a definition file for inconsistent parameters.
    Validate(DefinitionArgs),
    /// Print the help listing for a definition file.
    Help(DefinitionArgs),
}

#[derive(Debug, Args)]
struct DefinitionArgs {
    /// Parameter definition file (.json, .yaml or .yml).
    #[arg(long)]
    definition: PathBuf,
}

#[derive(Debug, Args)]
struct ParseArgs {
    #[command(flatten)]
    definition: DefinitionArgs,
    /// Parse this string instead of the tokens after `--`.
    #[arg(long, conflicts_with = "tokens", allow_hyphen_values = true)]
    line: Option<String>,
    /// Dispatch parameter actions (such as help) after parsing.
    #[arg(long)]
    run: bool,
    /// Output format.
    #[arg(long, default_value = "json")]
    format: OutputFormat,
    /// Tokens to parse.
    #[arg(last = true)]
    tokens: Vec<String>,
}

/// Why a subcommand failed; decides the exit code.
enum Failure {
    /// Bad definition, I/O, or serialization problem.
    Error(String),
    /// The command line was rejected by the parser.
    Rejected(String),
}

impl From<String> for Failure {
    fn from(message: String) -> Self {
        Self::Error(message)
    }
}

fn main() {
    init_tracing();
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Parse(args) => run_parse(args),
        Command::Validate(args) => run_validate(args).map_err(Failure::from),
        Command::Help(args) => run_help(args).map_err(Failure::from),
    };

    match result {
        Ok(()) => {}
        Err(Failure::Error(err)) => {
            eprintln!("error: {err}");
            std::process::exit(1);
        }
        Err(Failure::Rejected(err)) => {
            eprintln!("error: {err}");
            std::process::exit(2);
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_definition(args: &DefinitionArgs) -> Result<ParserDefinition, String> {
    ParserDefinition::load(&args.definition).map_err(|err| {
        format!(
            "Failed to load definition '{}': {err}",
            args.definition.display()
        )
    })
}

fn run_parse(args: ParseArgs) -> Result<(), Failure> {
    let definition = load_definition(&args.definition)?;
    let parser = definition.into_parser(std::io::stdout());

    let tokens = match &args.line {
        Some(line) => cla_core::tokenize(line),
        None => args.tokens,
    };
    debug!(tokens = ?tokens, "Parsing command line");

    let result = parser
        .parse(&tokens)
        .map_err(|err| Failure::Rejected(err.to_string()))?;
    if args.run {
        parser.run(&result);
    }

    let rendered = format_result(&result, args.format)?;
    println!("{rendered}");
    Ok(())
}

fn format_result(result: &ParsedResult, format: OutputFormat) -> Result<String, String> {
    match format {
        OutputFormat::Json => serde_json::to_string_pretty(result)
            .map_err(|e| format!("JSON serialization failed: {e}")),
        OutputFormat::Yaml => {
            serde_yaml::to_string(result).map_err(|e| format!("YAML serialization failed: {e}"))
        }
        OutputFormat::Table => Ok(result_to_table(result)),
    }
}

fn result_to_table(result: &ParsedResult) -> String {
    let width = result.names().iter().map(|n| n.len()).max().unwrap_or(0);
    let mut out = String::new();

    for (name, values) in result.iter() {
        out.push_str(&format!("{name:<width$}  {}\n", values.join(" ")));
    }
    for warning in result.warnings() {
        out.push_str(&format!("warning: {warning}\n"));
    }

    out.trim_end().to_string()
}

fn run_validate(args: DefinitionArgs) -> Result<(), String> {
    let definition = load_definition(&args)?;
    let parser = definition.into_parser(std::io::sink());

    let errors = parser.validate();
    if errors.is_empty() {
        println!(
            "{}: {} parameters OK",
            args.definition.display(),
            parser.len()
        );
        return Ok(());
    }

    for err in &errors {
        eprintln!("  {err}");
    }
    Err(format!(
        "{} validation error(s) in '{}'",
        errors.len(),
        args.definition.display()
    ))
}

fn run_help(args: DefinitionArgs) -> Result<(), String> {
    let definition = load_definition(&args)?;
    let description = definition.description.clone().unwrap_or_default();
    let parser = definition.into_parser(std::io::sink());

    let mut stdout = std::io::stdout().lock();
    parser
        .render_help(&description, &mut stdout)
        .and_then(|()| stdout.flush())
        .map_err(|e| format!("Failed to write help: {e}"))
}
