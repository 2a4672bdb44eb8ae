//! Error reporting integration tests.
//!
//! Verifies reason codes, locations, the recovery policy and configuration
//! failures.

use bumpalo::Bump;
use esparse_ast::{Expression, LogicalOperator, Statement};
use esparse_diagnostics::{Diagnostic, ErrorCode, ErrorKind};
use esparse_parser::{parse, ConfigError, ParseFailure, ParserOptions, SourceTypeOption};

/// Helper: the syntax error a script fails with.
fn parse_err(source: &str) -> Diagnostic {
    parse_err_with(source, &ParserOptions::default())
}

fn parse_err_with(source: &str, options: &ParserOptions) -> Diagnostic {
    let arena = Bump::new();
    match parse(&arena, source, options) {
        Ok(_) => panic!("expected a syntax error for {source:?}"),
        Err(ParseFailure::Syntax(diag)) => diag,
        Err(other) => panic!("expected a syntax error for {source:?}, got {other}"),
    }
}

/// Helper: the reason code a script fails with.
fn reason(source: &str) -> &'static str {
    parse_err(source).reason_code()
}

/// Helper: the reason codes collected in recovery mode.
fn recovered(source: &str) -> Vec<&'static str> {
    let arena = Bump::new();
    let options = ParserOptions::default().with_error_recovery(true);
    let file = parse(&arena, source, &options).unwrap_or_else(|err| panic!("{source}: {err}"));
    file.errors.iter().map(Diagnostic::reason_code).collect()
}

// ============================================================================
// Lexical errors
// ============================================================================

#[test]
fn test_unterminated_tokens() {
    assert_eq!(reason("'abc"), "UnterminatedString");
    assert_eq!(reason("`abc"), "UnterminatedTemplate");
    assert_eq!(reason("/* abc"), "UnterminatedComment");
}

#[test]
fn test_lexical_errors_are_fatal_in_recovery() {
    let arena = Bump::new();
    let options = ParserOptions::default().with_error_recovery(true);
    let err = parse(&arena, "x;\n'abc", &options).unwrap_err();
    let diag = err.diagnostic().expect("syntax failure");
    assert_eq!(diag.kind(), ErrorKind::Lexical);
}

// ============================================================================
// Expressions
// ============================================================================

#[test]
fn test_operator_mixing() {
    assert_eq!(reason("a ?? b || c;"), "MixingCoalesceWithLogical");
    assert_eq!(reason("-x ** 2;"), "UnexpectedTokenUnaryExponentiation");
}

#[test]
fn test_optional_chain_errors() {
    assert_eq!(reason("new a?.b();"), "OptionalChainingNoNew");
    assert_eq!(reason("a?.b`c`;"), "OptionalChainingNoTemplate");
}

#[test]
fn test_invalid_targets() {
    assert_eq!(reason("1 = 2;"), "InvalidLhs");
    assert_eq!(reason("({ a = 1 });"), "InvalidCoverInitializedName");
    assert_eq!(reason("import(a, b, c);"), "ImportCallArity");
}

#[test]
fn test_meta_properties_and_super() {
    assert_eq!(reason("new.target;"), "UnexpectedNewTarget");
    assert_eq!(reason("import.meta;"), "ImportMetaOutsideModule");
    assert_eq!(reason("super();"), "SuperNotAllowed");
}

// ============================================================================
// Statements and bindings
// ============================================================================

#[test]
fn test_statement_errors() {
    assert_eq!(reason("return 1;"), "IllegalReturn");
    assert_eq!(reason("try {}"), "NoCatchOrFinally");
    assert_eq!(reason("throw\nx;"), "NewlineAfterThrow");
    assert_eq!(reason("switch (x) { default: default: }"), "MultipleDefaultsInSwitch");
    assert_eq!(reason("a: a: ;"), "LabelRedeclaration");
    assert_eq!(reason("if (x) const y = 1;"), "UnexpectedLexicalDeclaration");
    assert_eq!(reason("while (x) async function f() {}"), "AsyncFunctionInSingleStatementContext");
}

#[test]
fn test_strict_mode_errors() {
    assert_eq!(reason("'use strict'; delete x;"), "StrictDelete");
    assert_eq!(reason("'use strict'; with (a) {}"), "StrictWith");
    assert_eq!(reason("function f(a, a) { 'use strict'; }"), "ParamDupe");
    assert_eq!(reason("(a, a) => 1;"), "ParamDupe");
}

#[test]
fn test_redeclaration() {
    let diag = parse_err("let x;\nlet x;");
    assert_eq!(diag.reason_code(), "VarRedeclaration");
    assert_eq!(diag.kind(), ErrorKind::Binding);
    assert_eq!((diag.loc.line, diag.loc.column), (2, 4));
    assert_eq!(diag.args, vec!["x".to_string()]);

    let arena = Bump::new();
    assert!(parse(&arena, "var x; var x;", &ParserOptions::default()).is_ok());
}

#[test]
fn test_top_level_redeclaration() {
    assert_eq!(reason("let x; { var x; }"), "VarRedeclaration");
    assert_eq!(reason("const a = 1; function a() {}"), "VarRedeclaration");
    let module = ParserOptions::default().with_source_type(SourceTypeOption::Module);
    assert_eq!(parse_err_with("import a from 'm'; let a;", &module).reason_code(), "VarRedeclaration");
    assert_eq!(parse_err_with("function f() {} function f() {}", &module).reason_code(), "VarRedeclaration");

    let arena = Bump::new();
    assert!(parse(&arena, "function f() {} function f() {}", &ParserOptions::default()).is_ok());
}

#[test]
fn test_unresolved_private_name() {
    assert_eq!(reason("class A { m() { return this.#p; } }"), "InvalidPrivateFieldResolution");
    let arena = Bump::new();
    let nested = "class A { #p; m() { class B { n(o) { return o.#p; } } } }";
    assert!(parse(&arena, nested, &ParserOptions::default()).is_ok());
}

// ============================================================================
// Modules
// ============================================================================

#[test]
fn test_module_syntax_in_script() {
    let diag = parse_err("import x from 'x';");
    assert_eq!(diag.reason_code(), "ImportOutsideModule");
    assert_eq!(diag.code(), ErrorCode::SourceTypeModuleError);
}

#[test]
fn test_module_export_errors() {
    let module = ParserOptions::default().with_source_type(SourceTypeOption::Module);
    assert_eq!(parse_err_with("export { missing };", &module).reason_code(), "ModuleExportUndefined");
    assert_eq!(parse_err_with("export const a = 1; export { a };", &module).reason_code(), "DuplicateExport");

    let arena = Bump::new();
    let lenient = ParserOptions { allow_undeclared_exports: true, ..module };
    assert!(parse(&arena, "export { missing };", &lenient).is_ok());
}

// ============================================================================
// Capabilities and configuration
// ============================================================================

#[test]
fn test_missing_plugin() {
    let diag = parse_err("<div />;");
    assert_eq!(diag.reason_code(), "MissingOneOfPlugins");
    assert_eq!(diag.kind(), ErrorKind::Capability);
    assert_eq!(diag.missing_plugins, vec!["jsx", "flow", "typescript"]);

    let arena = Bump::new();
    assert!(parse(&arena, "<div />;", &ParserOptions::default().with_plugin("jsx")).is_ok());
}

#[test]
fn test_capability_errors_are_fatal_in_recovery() {
    let arena = Bump::new();
    let options = ParserOptions::default().with_error_recovery(true);
    let err = parse(&arena, "<div />;", &options).unwrap_err();
    assert_eq!(err.diagnostic().map(Diagnostic::reason_code), Some("MissingOneOfPlugins"));
}

#[test]
fn test_incompatible_plugins() {
    let arena = Bump::new();
    let options = ParserOptions::default().with_plugin("flow").with_plugin("typescript");
    match parse(&arena, "", &options) {
        Err(ParseFailure::Config(ConfigError::IncompatiblePlugins { .. })) => {}
        other => panic!("expected a configuration error, got {other:?}"),
    }
}

#[test]
fn test_unknown_plugin() {
    let arena = Bump::new();
    let options = ParserOptions::default().with_plugin("pipelineOperator");
    match parse(&arena, "x", &options) {
        Err(ParseFailure::Config(ConfigError::UnknownPlugin(name))) => assert_eq!(name, "pipelineOperator"),
        other => panic!("expected an unknown plugin error, got {other:?}"),
    }
}

// ============================================================================
// Error recovery
// ============================================================================

#[test]
fn test_recovery_collects_errors() {
    assert_eq!(recovered("'use strict'; delete a; delete b;"), vec!["StrictDelete", "StrictDelete"]);
    assert_eq!(recovered("let x; let x; var y = 1;"), vec!["VarRedeclaration"]);
    assert!(recovered("let a = 1; a + 1;").is_empty());
}

#[test]
fn test_recovery_continues_after_operator_mixing() {
    let arena = Bump::new();
    let options = ParserOptions::default().with_error_recovery(true);
    let file = parse(&arena, "a ?? b || c; let y = 1;", &options).unwrap();
    let codes: Vec<_> = file.errors.iter().map(Diagnostic::reason_code).collect();
    assert_eq!(codes, ["MixingCoalesceWithLogical"]);
    assert_eq!(file.program.body.len(), 2);
    let Statement::Expression(stmt) = file.program.body[0] else { panic!("expression") };
    let Expression::Logical(or) = stmt.expression else { panic!("logical") };
    assert_eq!(or.operator, LogicalOperator::Or);
    assert!(matches!(or.left, Expression::Logical(inner) if inner.operator == LogicalOperator::Coalesce));
}

#[test]
fn test_recovery_continues_after_string_import_binding() {
    let arena = Bump::new();
    let options = ParserOptions::default().with_source_type(SourceTypeOption::Module).with_error_recovery(true);
    let file = parse(&arena, "import { 'a-b' } from 'm'; x;", &options).unwrap();
    let codes: Vec<_> = file.errors.iter().map(Diagnostic::reason_code).collect();
    assert_eq!(codes, ["ImportBindingIsString"]);
    assert_eq!(file.program.body.len(), 2);
}

#[test]
fn test_later_error_replaces_one_at_the_same_offset() {
    // `await` is first reported as a reserved word, then as an await outside
    // an async function
    let arena = Bump::new();
    let options = ParserOptions::default().with_source_type(SourceTypeOption::Module).with_error_recovery(true);
    let file = parse(&arena, "function f() { await x; }", &options).unwrap();
    let codes: Vec<_> = file.errors.iter().map(Diagnostic::reason_code).collect();
    assert_eq!(codes, ["AwaitNotInAsyncFunction"]);
    assert_eq!((file.errors[0].loc.line, file.errors[0].loc.column), (1, 15));
}

#[test]
fn test_recovery_keeps_the_tree() {
    let arena = Bump::new();
    let options = ParserOptions::default().with_error_recovery(true);
    let file = parse(&arena, "let x; let x; var y = 1;", &options).unwrap();
    assert_eq!(file.program.body.len(), 3);
}

#[test]
fn test_message_rendering() {
    let options = ParserOptions::default().with_source_filename("input.js");
    let diag = parse_err_with("let x;\nlet x;", &options);
    assert_eq!(diag.file.as_deref(), Some("input.js"));
    let rendered = diag.to_string();
    assert!(rendered.starts_with("input.js: "), "{rendered}");
    assert!(rendered.ends_with("(2:4)"), "{rendered}");
    assert!(rendered.contains("'x'"), "{rendered}");
}

// ============================================================================
// Nesting depth
// ============================================================================

fn nested(open: &str, inner: &str, close: &str, depth: usize) -> String {
    format!("{}{}{}", open.repeat(depth), inner, close.repeat(depth))
}

#[test]
fn test_deep_nesting_hits_the_recursion_limit() {
    let sources = [
        nested("(", "1", ")", 5_000),
        nested("[", "1", "]", 5_000),
        nested("{", "", "}", 5_000),
        nested("`${", "x", "}`", 3_000),
        nested("!", "x", "", 20_000),
        nested("new ", "X", "", 20_000),
        format!("let {} = y;", nested("[", "a", "]", 5_000)),
        nested("a = ", "1", "", 20_000),
    ];
    for source in &sources {
        let diag = parse_err(source);
        assert_eq!(diag.reason_code(), "RecursionLimit", "{}", &source[..20]);
    }
}

#[test]
fn test_recursion_limit_is_fatal_in_recovery() {
    let options = ParserOptions::default().with_error_recovery(true);
    let diag = parse_err_with(&nested("(", "1", ")", 5_000), &options);
    assert_eq!(diag.reason_code(), "RecursionLimit");
}

#[test]
fn test_moderate_nesting_parses() {
    let arena = Bump::new();
    for source in [
        format!("{};", nested("(", "1", ")", 150)),
        format!("{};", nested("[", "1", "]", 150)),
        nested("{", "", "}", 300),
        format!("{};", nested("`${", "x", "}`", 100)),
    ] {
        let file = parse(&arena, &source, &ParserOptions::default()).unwrap_or_else(|err| panic!("{err}"));
        assert_eq!(file.program.body.len(), 1);
    }
}
