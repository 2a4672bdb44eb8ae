//! esparse_parser: single-pass recursive descent parser for ECMAScript.
//!
//! Produces an arena-allocated Babel-shaped AST from source text. Plugins
//! such as `jsx`, `typescript` and `estree` are composed as grammar overlays
//! over the base grammar.
//!
//! ```no_run
//! use bumpalo::Bump;
//! use esparse_parser::{parse, ParserOptions};
//!
//! let arena = Bump::new();
//! let options = ParserOptions::default().with_plugin("jsx");
//! let file = parse(&arena, "<a href={x} />", &options).unwrap();
//! assert_eq!(file.program.body.len(), 1);
//! ```

mod class;
mod comments;
mod error;
mod expression;
mod lval;
mod module;
mod options;
mod overlay;
mod parser;
mod state;
mod statement;
mod utilities;

pub use error::{ConfigError, ParseFailure};
pub use options::{ParserOptions, PluginEntry, PluginSet, Plugins, SourceTypeOption};

use parser::Parser;

use bumpalo::Bump;
use esparse_ast::{ExpressionFile, File, Program, TokenKind};
use tracing::{debug, info_span};

/// What a finished module parse saw, for `sourceType: "unambiguous"`.
struct ModuleEvidence {
    saw_esm: bool,
    script_differs: bool,
}

/// Parse a whole program.
///
/// Configuration problems are reported as [`ParseFailure::Config`] before
/// any input is read. Without `error_recovery` the first syntax error is
/// returned as [`ParseFailure::Syntax`]; with it, recoverable errors are
/// collected in [`File::errors`] instead.
pub fn parse<'a>(arena: &'a Bump, source: &str, options: &ParserOptions) -> Result<File<'a>, ParseFailure> {
    let plugins = options.resolve_plugins()?;
    let _span = info_span!("parse", source_type = ?options.source_type, len = source.len()).entered();

    match options.source_type {
        SourceTypeOption::Script => Ok(parse_program(arena, source, options, plugins, false, false)?.0),
        SourceTypeOption::Module => Ok(parse_program(arena, source, options, plugins, true, false)?.0),
        SourceTypeOption::Unambiguous => parse_unambiguous(arena, source, options, plugins),
    }
}

/// Try a module first. A tree without module syntax is reported as a
/// script, reparsed as one when script grammar would read it differently.
fn parse_unambiguous<'a>(
    arena: &'a Bump,
    source: &str,
    options: &ParserOptions,
    plugins: PluginSet,
) -> Result<File<'a>, ParseFailure> {
    match parse_program(arena, source, options, plugins, true, true) {
        Ok((file, evidence)) => {
            if evidence.saw_esm || !evidence.script_differs {
                return Ok(file);
            }
            debug!("no module syntax and script grammar differs; reparsing as script");
            Ok(parse_program(arena, source, options, plugins, false, false).map(|(file, _)| file).unwrap_or(file))
        }
        Err(module_error) => {
            debug!(error = %module_error, "module parse failed; retrying as script");
            parse_program(arena, source, options, plugins, false, false)
                .map(|(file, _)| file)
                .map_err(|_| module_error)
        }
    }
}

fn parse_program<'a>(
    arena: &'a Bump,
    source: &str,
    options: &ParserOptions,
    plugins: PluginSet,
    in_module: bool,
    unambiguous: bool,
) -> Result<(File<'a>, ModuleEvidence), ParseFailure> {
    let mut parser = Parser::new(arena, source, options, plugins, in_module);
    parser.unambiguous = unambiguous;
    let filename = options.source_filename.clone();

    let program = parser
        .begin()
        .and_then(|()| parser.parse_top_level())
        .map_err(|diag| ParseFailure::Syntax(diag.with_file(filename.clone())))?;

    let evidence = ModuleEvidence {
        saw_esm: parser.state.saw_unambiguous_esm,
        script_differs: parser.state.ambiguous_script_different_ast,
    };
    Ok((finish_file(&mut parser, program, filename), evidence))
}

fn finish_file<'a>(parser: &mut Parser<'a>, program: &'a Program<'a>, filename: Option<String>) -> File<'a> {
    let errors: Vec<_> = parser.scanner.take_errors().into_iter().map(|e| e.with_file(filename.clone())).collect();
    let comments = parser.scanner.take_comments();
    let tokens = parser.options.tokens.then(|| parser.scanner.take_tokens());
    let comment_attachments =
        if parser.options.attach_comment { comments::attach_to_program(program, &comments) } else { Vec::new() };
    debug!(
        statements = program.body.len(),
        comments = comments.len(),
        errors = errors.len(),
        "parse finished"
    );
    File {
        data: program.data.clone(),
        program,
        comments,
        tokens,
        errors,
        comment_attachments,
        source_filename: filename,
    }
}

/// Parse a single expression that must span the whole input.
pub fn parse_expression<'a>(
    arena: &'a Bump,
    source: &str,
    options: &ParserOptions,
) -> Result<ExpressionFile<'a>, ParseFailure> {
    let plugins = options.resolve_plugins()?;
    let _span = info_span!("parse_expression", len = source.len()).entered();
    let in_module = options.source_type == SourceTypeOption::Module;
    let mut parser = Parser::new(arena, source, options, plugins, in_module);
    let filename = options.source_filename.clone();

    let expression = parser
        .begin()
        .and_then(|()| parser.parse_expression())
        .and_then(|expr| if parser.is(TokenKind::Eof) { Ok(expr) } else { Err(parser.unexpected()) })
        .map_err(|diag| ParseFailure::Syntax(diag.with_file(filename.clone())))?;

    let errors = parser.scanner.take_errors().into_iter().map(|e| e.with_file(filename.clone())).collect();
    let comments = parser.scanner.take_comments();
    let tokens = parser.options.tokens.then(|| parser.scanner.take_tokens());
    let comment_attachments =
        if parser.options.attach_comment { comments::attach_to_expression(&expression, &comments) } else { Vec::new() };
    Ok(ExpressionFile { expression, comments, tokens, errors, comment_attachments })
}
