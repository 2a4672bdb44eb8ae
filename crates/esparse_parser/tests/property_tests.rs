//! Whole-parser properties, checked over tables of inputs.
//!
//! Each test states a property that must hold for every entry of its table
//! rather than a single expected tree.

use bumpalo::Bump;
use esparse_ast::*;
use esparse_core::text::Span;
use esparse_diagnostics::ErrorKind;
use esparse_parser::{parse, parse_expression, ConfigError, ParseFailure, ParserOptions, SourceTypeOption};

/// Programs that are valid scripts without any plugin.
const VALID_SCRIPTS: &[&str] = &[
    "var a = 1, b = a + 2 * 3;",
    "let [x, , ...rest] = list; const { p, q: { r = 1 } } = obj;",
    "function f(a, b = 1, ...c) { return a ? b : c; }",
    "function* g() { yield 1; yield* other(); }",
    "async function h() { await x; for await (const y of z) {} }",
    "class A extends B { #p = 1; static s; constructor() { super(); } get v() { return this.#p; } static { init(); } }",
    "label: for (let i = 0; i < 10; i++) { if (i) continue label; else break; }",
    "switch (k) { case 1: f(); break; default: g(); }",
    "try { risky(); } catch ({ message }) { log(message); } finally { done(); }",
    "do x++; while (x < 5)",
    "for (const key in obj) delete obj[key];",
    "a = b ? (c, d) : e => e * 2;",
    "x ??= y; x ||= z; x &&= w; x **= 2;",
    "obj?.a?.[b]?.(c);",
    "tag`a${b}c${`nested${d}`}`;",
    "const re = /[/]+/giu; const n = 0b1010 + 0o17 + 0xff + 1_000n;",
    "new Foo; new Foo.Bar(); new (getClass())();",
    "({ a, b: 1, [c]: 2, d() {}, get e() { return 1; }, set e(v) {}, async *f() {}, ...g });",
    "if (a) function decl() {}",
    "var yield_ = 1, let_ = 2, async = 3; async; let\nfoo = 4;",
    "x = function () { 'use strict'; return this; };",
    "with (scope) { value; }",
    "<!-- html comment\nx;\n--> also a comment",
];

/// Programs that are valid modules without any plugin.
const VALID_MODULES: &[&str] = &[
    "import a, { b as c } from 'x'; export { a, c };",
    "import * as ns from 'y'; export default ns;",
    "export * from 'z'; export * as w from 'w';",
    "export const one = 1; export function two() {} export class Three {}",
    "const value = await fetch(url); export { value as 'string name' };",
    "import.meta.url; import('dynamic');",
];

fn module() -> ParserOptions {
    ParserOptions::default().with_source_type(SourceTypeOption::Module)
}

/// Helper: parse, panicking on any failure.
fn parse_ok<'a>(arena: &'a Bump, source: &str, options: &ParserOptions) -> File<'a> {
    parse(arena, source, options).unwrap_or_else(|err| panic!("{source:?}: {err}"))
}

/// The text a span covers. Offsets are in characters.
fn text(source: &str, span: Span) -> String {
    let start = span.start.index as usize;
    let end = span.end.index as usize;
    source.chars().skip(start).take(end - start).collect()
}

/// Collects every node span, and every identifier with its span.
#[derive(Default)]
struct SpanCollector<'a> {
    stack: Vec<Span>,
    spans: Vec<Span>,
    nesting_violations: Vec<(Span, Span)>,
    identifiers: Vec<(&'a str, Span)>,
}

impl<'a> AstVisitor<'a> for SpanCollector<'a> {
    fn enter(&mut self, span: Span) {
        if let Some(parent) = self.stack.last() {
            if span.start.index < parent.start.index || span.end.index > parent.end.index {
                self.nesting_violations.push((*parent, span));
            }
        }
        self.spans.push(span);
        self.stack.push(span);
    }

    fn leave(&mut self, _span: Span) {
        self.stack.pop();
    }

    fn visit_identifier(&mut self, node: &Identifier<'a>) {
        self.identifiers.push((node.name, node.data.span));
        self.enter(node.data.span);
        self.leave(node.data.span);
    }
}

fn collect<'a>(file: &File<'a>) -> SpanCollector<'a> {
    let mut collector = SpanCollector::default();
    collector.visit_program(&file.program);
    collector
}

// ============================================================================
// Determinism and validity
// ============================================================================

#[test]
fn test_parsing_is_pure() {
    for source in VALID_SCRIPTS {
        let first = Bump::new();
        let second = Bump::new();
        let a = serde_json::to_string(&parse_ok(&first, source, &ParserOptions::default())).unwrap();
        let b = serde_json::to_string(&parse_ok(&second, source, &ParserOptions::default())).unwrap();
        assert_eq!(a, b, "{source}");
    }
}

#[test]
fn test_valid_programs_never_error() {
    let arena = Bump::new();
    for source in VALID_SCRIPTS {
        let file = parse_ok(&arena, source, &ParserOptions::default());
        assert!(file.errors.is_empty(), "{source}: {:?}", file.errors);
        let recovered = parse_ok(&arena, source, &ParserOptions::default().with_error_recovery(true));
        assert!(recovered.errors.is_empty(), "{source}: {:?}", recovered.errors);
    }
    for source in VALID_MODULES {
        let file = parse_ok(&arena, source, &module());
        assert!(file.errors.is_empty(), "{source}: {:?}", file.errors);
    }
}

// ============================================================================
// Locations
// ============================================================================

#[test]
fn test_spans_are_ordered_and_nested() {
    let arena = Bump::new();
    for source in VALID_SCRIPTS {
        let file = parse_ok(&arena, source, &ParserOptions::default());
        let collector = collect(&file);
        let length = source.chars().count() as u32;
        for span in &collector.spans {
            assert!(span.end.index >= span.start.index, "{source}: {span:?}");
            assert!(span.end.index <= length, "{source}: {span:?}");
            assert!(span.start.line >= 1, "{source}: {span:?}");
        }
        assert!(collector.nesting_violations.is_empty(), "{source}: {:?}", collector.nesting_violations);
    }
}

#[test]
fn test_identifier_spans_cover_their_name() {
    let arena = Bump::new();
    for source in VALID_SCRIPTS.iter().chain(VALID_MODULES) {
        let options = if VALID_MODULES.contains(source) { module() } else { ParserOptions::default() };
        let file = parse_ok(&arena, source, &options);
        for (name, span) in collect(&file).identifiers {
            assert_eq!(text(source, span), name, "{source}");
        }
    }
}

#[test]
fn test_literal_spans_cover_their_raw_text() {
    let arena = Bump::new();
    for source in ["0x1F", "1_000", ".5e3", "'a\\nb'", "\"q\"", "12n", "/x+/y"] {
        let file = parse_expression(&arena, source, &ParserOptions::default()).unwrap();
        let (span, raw) = match file.expression {
            Expression::NumericLiteral(lit) => (lit.data.span, Some(lit.raw)),
            Expression::StringLiteral(lit) => (lit.data.span, Some(lit.raw)),
            Expression::BigIntLiteral(lit) => (lit.data.span, Some(lit.raw)),
            Expression::RegExpLiteral(lit) => (lit.data.span, None),
            other => panic!("{source}: {other:?}"),
        };
        assert_eq!(text(source, span), source);
        if let Some(raw) = raw {
            assert_eq!(raw, source);
        }
    }
}

#[test]
fn test_tokens_match_per_statement_reparse() {
    let source = "let a = 1;\nfunction f(x) { return x / 2; }\nconst r = /ab+c/g.test(s);\n\
                  class C { m() { return `t${a}u`; } }\nif (a) b = a++ / 2;\nfor (const k of [1, 2]) {}";
    let options = ParserOptions::default().with_tokens(true);
    let arena = Bump::new();
    let file = parse_ok(&arena, source, &options);
    let all_tokens = file.tokens.as_ref().expect("tokens requested");

    for statement in file.program.body {
        let span = statement.span();
        let (start, end) = (span.start.index, span.end.index);
        let expected: Vec<(u32, u32)> = all_tokens
            .iter()
            .map(TokenOrComment::span)
            .filter(|s| s.start.index >= start && s.end.index <= end)
            .map(|s| (s.start.index - start, s.end.index - start))
            .collect();

        let piece = text(source, span);
        let sub_arena = Bump::new();
        let alone = parse_ok(&sub_arena, &piece, &options);
        let actual: Vec<(u32, u32)> = alone
            .tokens
            .as_ref()
            .expect("tokens requested")
            .iter()
            .map(|t| (t.span().start.index, t.span().end.index))
            .collect();
        assert_eq!(actual, expected, "{piece}");
    }
}

// ============================================================================
// Grammar invariants
// ============================================================================

#[test]
fn test_parenthesized_pair_before_arrow_is_always_an_arrow() {
    let plugin_sets: &[&[&str]] = &[
        &[],
        &["jsx"],
        &["typescript"],
        &["flow"],
        &["jsx", "typescript"],
        &["flow", "jsx"],
        &["estree"],
        &["decorators"],
        &["v8intrinsic"],
        &["placeholders"],
    ];
    for plugins in plugin_sets {
        let arena = Bump::new();
        let options = ParserOptions::default().with_plugins(plugins.iter().copied());
        let file = parse_ok(&arena, "(a,b)=>a+b;", &options);
        let Statement::Expression(stmt) = file.program.body[0] else { panic!("{plugins:?}: statement") };
        match stmt.expression {
            Expression::ArrowFunction(arrow) => {
                assert_eq!(arrow.params.len(), 2, "{plugins:?}");
                assert!(arrow.expression, "{plugins:?}");
            }
            other => panic!("{plugins:?}: {other:?}"),
        }
    }
}

#[test]
fn test_lexical_redeclaration_in_every_scope() {
    let conflicts = [
        "let x; let x;",
        "const x = 1; var x;",
        "{ let x; var x; }",
        "function f() { let x; let x; }",
        "function f(x) { let x; }",
        "try {} catch (e) { let e; }",
        "class C {} let C;",
    ];
    for source in conflicts {
        let arena = Bump::new();
        match parse(&arena, source, &ParserOptions::default()) {
            Err(ParseFailure::Syntax(diag)) => {
                assert_eq!(diag.reason_code(), "VarRedeclaration", "{source}");
                assert_eq!(diag.kind(), ErrorKind::Binding, "{source}");
            }
            other => panic!("{source}: expected a redeclaration, got {other:?}"),
        }
    }
    let allowed = ["var x; var x;", "function f() {} var f;", "let x; { let x; }", "function f(x) { var x; }"];
    for source in allowed {
        let arena = Bump::new();
        assert!(parse(&arena, source, &ParserOptions::default()).is_ok(), "{source}");
    }
}

#[test]
fn test_private_names_resolve_through_nesting() {
    let resolved = [
        "class A { #x; m() { return this.#x; } }",
        "class A { m() { return this.#x; } #x; }",
        "class A { #x; m() { class B { n(o) { return o.#x; } } } }",
        "class A { #x; m() { return #x in this; } }",
        "class A { static #s() {} m() { return () => A.#s(); } }",
    ];
    for source in resolved {
        let arena = Bump::new();
        assert!(parse(&arena, source, &ParserOptions::default()).is_ok(), "{source}");
    }
    let unresolved = ["class A { m() { class B { #y; } return this.#y; } }", "this.#z;"];
    for source in unresolved {
        let arena = Bump::new();
        assert!(parse(&arena, source, &ParserOptions::default()).is_err(), "{source}");
    }
}

// ============================================================================
// Configuration
// ============================================================================

#[test]
fn test_jsx_needs_the_plugin() {
    for source in ["<a />;", "x = <b>text</b>;", "<></>;"] {
        let arena = Bump::new();
        match parse(&arena, source, &ParserOptions::default()) {
            Err(ParseFailure::Syntax(diag)) => assert_eq!(diag.kind(), ErrorKind::Capability, "{source}"),
            other => panic!("{source}: {other:?}"),
        }
        assert!(parse(&arena, source, &ParserOptions::default().with_plugin("jsx")).is_ok(), "{source}");
    }
}

#[test]
fn test_flow_and_typescript_conflict_in_either_order() {
    for pair in [["flow", "typescript"], ["typescript", "flow"]] {
        let arena = Bump::new();
        let options = ParserOptions::default().with_plugins(pair);
        match parse(&arena, "", &options) {
            Err(ParseFailure::Config(ConfigError::IncompatiblePlugins { .. })) => {}
            other => panic!("{pair:?}: {other:?}"),
        }
    }
}

#[test]
fn test_unambiguous_source_type() {
    let options = ParserOptions::default().with_source_type(SourceTypeOption::Unambiguous);
    let cases = [
        ("import x from 'x';", SourceType::Module),
        ("export const a = 1;", SourceType::Module),
        ("import.meta.url;", SourceType::Module),
        ("var a = 1;", SourceType::Script),
        ("import('x');", SourceType::Script),
        ("", SourceType::Script),
    ];
    for (source, expected) in cases {
        let arena = Bump::new();
        let file = parse_ok(&arena, source, &options);
        assert_eq!(file.program.source_type, expected, "{source}");
    }
}

// ============================================================================
// Comments
// ============================================================================

#[test]
fn test_every_comment_is_attached() {
    let sources = [
        "/* lead */ x;",
        "x; // trail",
        "function f() { /* inner */ }",
        "a(/* arg */);",
        "const o = { /* empty */ };",
        "/* one */ a /* two */ + b; // three",
    ];
    for source in sources {
        let arena = Bump::new();
        let file = parse_ok(&arena, source, &ParserOptions::default());
        for index in 0..file.comments.len() as u32 {
            let attached = file
                .comment_attachments
                .iter()
                .any(|entry| entry.leading.contains(&index) || entry.trailing.contains(&index) || entry.inner.contains(&index));
            assert!(attached, "{source}: comment {index} is unattached");
        }
    }
}
