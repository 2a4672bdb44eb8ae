//! esparse: parse ECMAScript and print the syntax tree as JSON.
//!
//! Usage:
//!   esparse [options] [FILE]
//!
//! Reads FILE, or stdin when it is absent or `-`, and writes the Babel-shaped
//! tree to stdout. Errors are rendered to stderr.

mod logging;
mod report;

use std::io::Read;
use std::path::PathBuf;
use std::process::ExitCode;

use bumpalo::Bump;
use clap::{Parser as ClapParser, ValueEnum};
use esparse_parser::{parse, parse_expression, ParseFailure, ParserOptions, SourceTypeOption};
use miette::{IntoDiagnostic, WrapErr};
use report::SyntaxReport;
use tracing::debug;

#[derive(ClapParser, Debug)]
#[command(name = "esparse", version, about = "esparse - an extensible ECMAScript parser")]
struct Cli {
    /// Source file to parse. Reads stdin when absent or `-`.
    #[arg(value_name = "FILE")]
    file: Option<PathBuf>,

    /// How to interpret the input.
    #[arg(long = "source-type", value_enum)]
    source_type: Option<SourceTypeArg>,

    /// Enable a plugin (repeatable), e.g. `--plugin jsx --plugin typescript`.
    #[arg(long = "plugin", value_name = "NAME")]
    plugins: Vec<String>,

    /// Read parser options from a JSON file. Flags override it.
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Collect recoverable errors instead of stopping at the first.
    #[arg(long = "error-recovery")]
    error_recovery: bool,

    /// Include the token list in the output.
    #[arg(long)]
    tokens: bool,

    /// Attach comments to nodes.
    #[arg(long = "attach-comment", value_name = "BOOL")]
    attach_comment: Option<bool>,

    /// Shorthand for `--plugin estree`.
    #[arg(long)]
    estree: bool,

    /// Parse a single expression instead of a program.
    #[arg(long)]
    expression: bool,

    /// Print JSON on one line.
    #[arg(long)]
    compact: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum SourceTypeArg {
    Script,
    Module,
    Unambiguous,
}

impl From<SourceTypeArg> for SourceTypeOption {
    fn from(arg: SourceTypeArg) -> Self {
        match arg {
            SourceTypeArg::Script => SourceTypeOption::Script,
            SourceTypeArg::Module => SourceTypeOption::Module,
            SourceTypeArg::Unambiguous => SourceTypeOption::Unambiguous,
        }
    }
}

fn main() -> miette::Result<ExitCode> {
    logging::init_tracing();
    let cli = Cli::parse();

    let (name, source) = read_input(cli.file.as_ref())?;
    let options = build_options(&cli, &name)?;
    debug!(file = %name, plugins = options.plugins.len(), expression = cli.expression, "parsing");

    let arena = Bump::new();
    let outcome = if cli.expression {
        parse_expression(&arena, &source, &options).map(|file| {
            let errors = file.errors.clone();
            (to_json(&file, cli.compact), errors)
        })
    } else {
        parse(&arena, &source, &options).map(|file| {
            let errors = file.errors.clone();
            (to_json(&file, cli.compact), errors)
        })
    };

    match outcome {
        Ok((json, errors)) => {
            println!("{}", json?);
            for diag in &errors {
                eprintln!("{:?}", miette::Report::new(SyntaxReport::new(diag, &name, &source)));
            }
            Ok(if errors.is_empty() { ExitCode::SUCCESS } else { ExitCode::FAILURE })
        }
        Err(ParseFailure::Syntax(diag)) => Err(SyntaxReport::new(&diag, &name, &source).into()),
        Err(failure @ ParseFailure::Config(_)) => Err::<ExitCode, _>(failure).into_diagnostic().wrap_err("invalid parser configuration"),
    }
}

/// The display name and text of the input.
fn read_input(file: Option<&PathBuf>) -> miette::Result<(String, String)> {
    match file {
        Some(path) if path.as_os_str() != "-" => {
            let source = std::fs::read_to_string(path)
                .into_diagnostic()
                .wrap_err_with(|| format!("cannot read {}", path.display()))?;
            Ok((path.display().to_string(), source))
        }
        _ => {
            let mut source = String::new();
            std::io::stdin().read_to_string(&mut source).into_diagnostic().wrap_err("cannot read stdin")?;
            Ok(("<stdin>".to_string(), source))
        }
    }
}

/// Options from `--config`, then the individual flags on top.
fn build_options(cli: &Cli, name: &str) -> miette::Result<ParserOptions> {
    let mut options = match &cli.config {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .into_diagnostic()
                .wrap_err_with(|| format!("cannot read {}", path.display()))?;
            ParserOptions::from_json(&json)
                .into_diagnostic()
                .wrap_err_with(|| format!("invalid options in {}", path.display()))?
        }
        None => ParserOptions::default(),
    };

    if let Some(source_type) = cli.source_type {
        options = options.with_source_type(source_type.into());
    }
    options = options.with_plugins(cli.plugins.iter().cloned());
    if cli.estree && !options.plugins.iter().any(|entry| entry.name() == "estree") {
        options = options.with_plugin("estree");
    }
    if cli.error_recovery {
        options = options.with_error_recovery(true);
    }
    if cli.tokens {
        options = options.with_tokens(true);
    }
    if let Some(attach) = cli.attach_comment {
        options = options.with_attach_comment(attach);
    }
    if options.source_filename.is_none() {
        options = options.with_source_filename(name);
    }
    Ok(options)
}

fn to_json<T: serde::Serialize>(value: &T, compact: bool) -> miette::Result<String> {
    let json = if compact { serde_json::to_string(value) } else { serde_json::to_string_pretty(value) };
    json.into_diagnostic().wrap_err("cannot serialize the syntax tree")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_become_options() {
        let cli = Cli::parse_from([
            "esparse",
            "--source-type",
            "module",
            "--plugin",
            "jsx",
            "--plugin",
            "typescript",
            "--estree",
            "--tokens",
            "--attach-comment",
            "false",
            "input.tsx",
        ]);
        let options = build_options(&cli, "input.tsx").unwrap();
        assert_eq!(options.source_type, SourceTypeOption::Module);
        let names: Vec<&str> = options.plugins.iter().map(|entry| entry.name()).collect();
        assert_eq!(names, ["jsx", "typescript", "estree"]);
        assert!(options.tokens);
        assert!(!options.attach_comment);
        assert_eq!(options.source_filename.as_deref(), Some("input.tsx"));
    }

    #[test]
    fn test_defaults_without_flags() {
        let cli = Cli::parse_from(["esparse"]);
        let options = build_options(&cli, "<stdin>").unwrap();
        assert_eq!(options.source_type, SourceTypeOption::Script);
        assert!(options.plugins.is_empty());
        assert!(options.attach_comment);
        assert!(!options.error_recovery);
    }
}
