//! Parser integration tests.
//!
//! Verifies that the parser builds Babel-shaped trees for the core grammar.

use bumpalo::Bump;
use esparse_ast::*;
use esparse_parser::{parse, parse_expression, ParserOptions, SourceTypeOption};

/// Helper: parse a script, panicking with the source on failure.
fn parse_script<'a>(arena: &'a Bump, source: &str) -> File<'a> {
    parse(arena, source, &ParserOptions::default()).unwrap_or_else(|err| panic!("{source}: {err}"))
}

/// Helper: parse a module, panicking with the source on failure.
fn parse_module<'a>(arena: &'a Bump, source: &str) -> File<'a> {
    let options = ParserOptions::default().with_source_type(SourceTypeOption::Module);
    parse(arena, source, &options).unwrap_or_else(|err| panic!("{source}: {err}"))
}

/// Helper: the expression of the first statement.
fn first_expression<'a>(file: &File<'a>) -> Expression<'a> {
    match file.program.body[0] {
        Statement::Expression(stmt) => stmt.expression,
        ref other => panic!("expected an expression statement, got {other:?}"),
    }
}

/// Helper: the slice of `source` a span covers.
fn text<'s>(source: &'s str, span: esparse_core::text::Span) -> &'s str {
    &source[span.start.index as usize..span.end.index as usize]
}

// ============================================================================
// Declarations
// ============================================================================

#[test]
fn test_variable_declarations() {
    let arena = Bump::new();
    let file = parse_script(&arena, "var a = 1; let b = 2, c; const d = 3;");
    let kinds: Vec<_> = file
        .program
        .body
        .iter()
        .map(|stmt| match stmt {
            Statement::Variable(var) => (var.kind, var.declarations.len()),
            other => panic!("{other:?}"),
        })
        .collect();
    assert_eq!(kinds, vec![(VariableKind::Var, 1), (VariableKind::Let, 2), (VariableKind::Const, 1)]);
}

#[test]
fn test_destructuring_declaration() {
    let arena = Bump::new();
    let file = parse_script(&arena, "const { a, b: [c, ...d], e = 1 } = obj;");
    let Statement::Variable(var) = file.program.body[0] else { panic!("variable") };
    let Pattern::Object(object) = var.declarations[0].id else { panic!("object pattern") };
    assert_eq!(object.properties.len(), 3);
}

#[test]
fn test_function_forms() {
    let arena = Bump::new();
    let file = parse_script(&arena, "function f(a, b = 1, ...c) {}\nasync function g() {}\nfunction* h() { yield 1; }");
    let functions: Vec<_> = file
        .program
        .body
        .iter()
        .map(|stmt| match stmt {
            Statement::Function(f) => (f.params.len(), f.is_async, f.generator),
            other => panic!("{other:?}"),
        })
        .collect();
    assert_eq!(functions, vec![(3, false, false), (0, true, false), (0, false, true)]);
}

#[test]
fn test_class_members() {
    let arena = Bump::new();
    let src = "class A extends B {\n  static x = 1;\n  #y;\n  constructor() { super(); }\n  get z() { return this.#y; }\n  set z(v) {}\n  static { init(); }\n  async *gen() {}\n}";
    let file = parse_script(&arena, src);
    let Statement::Class(class) = file.program.body[0] else { panic!("class") };
    assert!(class.super_class.is_some());
    let ClassBodyOrPlaceholder::Body(body) = class.body else { panic!("body") };
    assert_eq!(body.body.len(), 7);
    assert!(matches!(body.body[0], ClassMember::Property(prop) if prop.is_static));
    assert!(matches!(body.body[2], ClassMember::Method(method) if method.kind == MethodKind::Constructor));
    assert!(matches!(body.body[3], ClassMember::Method(method) if method.kind == MethodKind::Get));
    assert!(matches!(body.body[6], ClassMember::Method(method) if method.is_async && method.generator));
}

// ============================================================================
// Expressions
// ============================================================================

#[test]
fn test_operator_precedence() {
    let arena = Bump::new();
    let file = parse_script(&arena, "1 + 2 * 3;");
    let Expression::Binary(add) = first_expression(&file) else { panic!("binary") };
    assert_eq!(add.operator, BinaryOperator::Addition);
    assert!(matches!(add.right, Expression::Binary(mul) if mul.operator == BinaryOperator::Multiplication));
}

#[test]
fn test_exponent_is_right_associative() {
    let arena = Bump::new();
    let file = parse_script(&arena, "2 ** 3 ** 2;");
    let Expression::Binary(outer) = first_expression(&file) else { panic!("binary") };
    assert!(matches!(outer.left, Expression::NumericLiteral(n) if n.value == 2.0));
    assert!(matches!(outer.right, Expression::Binary(inner) if inner.operator == BinaryOperator::Exponential));
}

#[test]
fn test_logical_and_coalesce() {
    let arena = Bump::new();
    let file = parse_script(&arena, "a ?? (b || c);");
    let Expression::Logical(logical) = first_expression(&file) else { panic!("logical") };
    assert_eq!(logical.operator, LogicalOperator::Coalesce);
    assert!(matches!(logical.right, Expression::Logical(inner) if inner.operator == LogicalOperator::Or));
}

#[test]
fn test_arrow_functions() {
    let arena = Bump::new();
    let file = parse_script(&arena, "(a, b) => a + b;\nasync x => x;\nasync (y) => { await y; };");
    let arrows: Vec<_> = file
        .program
        .body
        .iter()
        .map(|stmt| match stmt {
            Statement::Expression(stmt) => match stmt.expression {
                Expression::ArrowFunction(arrow) => (arrow.params.len(), arrow.is_async, arrow.expression),
                other => panic!("{other:?}"),
            },
            other => panic!("{other:?}"),
        })
        .collect();
    assert_eq!(arrows, vec![(2, false, true), (1, true, true), (1, true, false)]);
}

#[test]
fn test_async_as_identifier() {
    let arena = Bump::new();
    let file = parse_script(&arena, "async(1, 2);");
    assert!(matches!(first_expression(&file), Expression::Call(call) if call.arguments.len() == 2));
}

#[test]
fn test_parenthesized_sequence_is_not_an_arrow() {
    let arena = Bump::new();
    let file = parse_script(&arena, "(a, b);");
    let Expression::Sequence(seq) = first_expression(&file) else { panic!("sequence") };
    assert_eq!(seq.expressions.len(), 2);
    assert!(seq.data.is_parenthesized());
}

#[test]
fn test_destructuring_assignment() {
    let arena = Bump::new();
    let file = parse_script(&arena, "[a, { b }] = c;");
    let Expression::Assignment(assign) = first_expression(&file) else { panic!("assignment") };
    assert!(matches!(assign.left, Pattern::Array(array) if array.elements.len() == 2));
}

#[test]
fn test_optional_chain() {
    let arena = Bump::new();
    let file = parse_script(&arena, "a?.b;");
    let Expression::Member(member) = first_expression(&file) else { panic!("member") };
    assert_eq!(member.kind, MemberType::OptionalMemberExpression);
    assert_eq!(member.optional, Some(true));
}

#[test]
fn test_template_literal() {
    let arena = Bump::new();
    let file = parse_script(&arena, "`a${b}c${d}`;");
    let Expression::TemplateLiteral(template) = first_expression(&file) else { panic!("template") };
    assert_eq!(template.quasis.len(), 3);
    assert_eq!(template.expressions.len(), 2);
    assert!(template.quasis[2].tail);
    assert_eq!(template.quasis[0].value.cooked, Some("a"));
}

#[test]
fn test_template_substitutions() {
    let arena = Bump::new();
    let file = parse_script(&arena, "f`a${b}c`;\n`${`${x}`}`;\n`${ {a: 1}.a }!`;\nfunction* g() { `${yield}`; }");

    let Expression::TaggedTemplate(tagged) = first_expression(&file) else { panic!("tagged template") };
    assert!(matches!(tagged.tag, Expression::Identifier(id) if id.name == "f"));
    assert_eq!(tagged.quasi.expressions.len(), 1);
    assert_eq!(tagged.quasi.quasis[1].value.raw, "c");

    let Statement::Expression(nested) = file.program.body[1] else { panic!("expression") };
    let Expression::TemplateLiteral(outer) = nested.expression else { panic!("template") };
    assert!(matches!(outer.expressions[0], Expression::TemplateLiteral(inner) if inner.expressions.len() == 1));

    let Statement::Expression(object) = file.program.body[2] else { panic!("expression") };
    let Expression::TemplateLiteral(template) = object.expression else { panic!("template") };
    assert!(matches!(template.expressions[0], Expression::Member(_)));
    assert_eq!(template.quasis[1].value.cooked, Some("!"));
    assert_eq!(file.program.body.len(), 4);
}

#[test]
fn test_empty_substitution_is_an_error() {
    let arena = Bump::new();
    assert!(parse(&arena, "`a${}b`;", &ParserOptions::default()).is_err());
}

#[test]
fn test_regex_versus_division() {
    let arena = Bump::new();
    let file = parse_script(&arena, "a / b / c;\nif (x) /re+/gi.test(y);");
    assert!(matches!(first_expression(&file), Expression::Binary(_)));
    let Statement::If(stmt) = file.program.body[1] else { panic!("if") };
    let Statement::Expression(body) = stmt.consequent else { panic!("expression") };
    let Expression::Call(call) = body.expression else { panic!("call") };
    let Expression::Member(member) = call.callee else { panic!("member") };
    match member.object {
        Expression::RegExpLiteral(re) => {
            assert_eq!(re.pattern, "re+");
            assert_eq!(re.flags, "gi");
        }
        other => panic!("{other:?}"),
    }
}

#[test]
fn test_numeric_literals() {
    let arena = Bump::new();
    let file = parse_script(&arena, "[0x10, 1_000, .5, 1e3, 0b101, 10n];");
    let Expression::Array(array) = first_expression(&file) else { panic!("array") };
    let values: Vec<f64> = array
        .elements
        .iter()
        .filter_map(|el| match el {
            Some(ExprOrSpread::Expression(Expression::NumericLiteral(n))) => Some(n.value),
            _ => None,
        })
        .collect();
    assert_eq!(values, vec![16.0, 1000.0, 0.5, 1000.0, 5.0]);
    assert!(matches!(array.elements[5], Some(ExprOrSpread::Expression(Expression::BigIntLiteral(b))) if b.raw == "10n"));
}

#[test]
fn test_string_escapes() {
    let arena = Bump::new();
    // Parenthesized so the string is an expression, not a directive
    let file = parse_script(&arena, r#"('a\nb\x41\u0041');"#);
    let Expression::StringLiteral(lit) = first_expression(&file) else { panic!("string") };
    assert_eq!(lit.value, "a\nbAA");
    assert_eq!(lit.raw, r#"'a\nb\x41\u0041'"#);
}

#[test]
fn test_object_literal_members() {
    let arena = Bump::new();
    let file = parse_script(&arena, "({ a, b: 1, [c]: 2, d() {}, get e() { return 1; }, ...f });");
    let Expression::Object(object) = first_expression(&file) else { panic!("object") };
    assert_eq!(object.properties.len(), 6);
    assert!(matches!(object.properties[0], ObjectMember::Property(p) if p.shorthand));
    assert!(matches!(object.properties[2], ObjectMember::Property(p) if p.computed));
    assert!(matches!(object.properties[3], ObjectMember::Method(m) if m.kind == MethodKind::Method));
    assert!(matches!(object.properties[4], ObjectMember::Method(m) if m.kind == MethodKind::Get));
    assert!(matches!(object.properties[5], ObjectMember::Spread(_)));
}

#[test]
fn test_new_target_and_import_meta() {
    let arena = Bump::new();
    let file = parse_script(&arena, "function f() { return new.target; }");
    assert_eq!(file.program.body.len(), 1);
    let file = parse_module(&arena, "import.meta.url;");
    let Expression::Member(member) = first_expression(&file) else { panic!("member") };
    assert!(matches!(member.object, Expression::MetaProperty(meta) if meta.property.name == "meta"));
}

// ============================================================================
// Statements
// ============================================================================

#[test]
fn test_loops() {
    let arena = Bump::new();
    let src = "for (let i = 0; i < n; i++) {}\nfor (const k in o) {}\nfor (x of xs) {}\nasync function f() { for await (const y of ys) {} }\nwhile (a) break;\ndo {} while (b)";
    let file = parse_script(&arena, src);
    assert!(matches!(file.program.body[0], Statement::For(_)));
    assert!(matches!(file.program.body[1], Statement::ForIn(_)));
    assert!(matches!(file.program.body[2], Statement::ForOf(stmt) if !stmt.is_await));
    let Statement::Function(f) = file.program.body[3] else { panic!("function") };
    let body = f.body.expect("body");
    assert!(matches!(body.body[0], Statement::ForOf(stmt) if stmt.is_await));
    assert!(matches!(file.program.body[4], Statement::While(_)));
    assert!(matches!(file.program.body[5], Statement::DoWhile(_)));
}

#[test]
fn test_labels_and_jumps() {
    let arena = Bump::new();
    let file = parse_script(&arena, "outer: for (;;) { inner: for (;;) { continue outer; break inner; } }");
    let Statement::Labeled(labeled) = file.program.body[0] else { panic!("labeled") };
    assert_eq!(labeled.label.name, "outer");
}

#[test]
fn test_try_switch_throw() {
    let arena = Bump::new();
    let src = "try { a(); } catch { b(); } finally { c(); }\nswitch (x) { case 1: case 2: y(); break; default: z(); }\nthrow new Error('e');";
    let file = parse_script(&arena, src);
    let Statement::Try(stmt) = file.program.body[0] else { panic!("try") };
    assert!(stmt.handler.is_some_and(|h| h.param.is_none()));
    assert!(stmt.finalizer.is_some());
    let Statement::Switch(switch) = file.program.body[1] else { panic!("switch") };
    assert_eq!(switch.cases.len(), 3);
    assert!(switch.cases[2].test.is_none());
    assert!(matches!(file.program.body[2], Statement::Throw(_)));
}

#[test]
fn test_automatic_semicolon_insertion() {
    let arena = Bump::new();
    let file = parse_script(&arena, "a\n++b\nreturn_value()\nlet x = 1\nx");
    assert_eq!(file.program.body.len(), 5);
}

#[test]
fn test_sloppy_mode_contextual_names() {
    let arena = Bump::new();
    let file = parse_script(&arena, "var yield = 1; let = 2; var async = 3; var of = 4;");
    assert_eq!(file.program.body.len(), 4);
}

#[test]
fn test_directives() {
    let arena = Bump::new();
    let file = parse_script(&arena, "'use strict';\n'other';\nx;");
    assert_eq!(file.program.directives.len(), 2);
    assert_eq!(file.program.body.len(), 1);
}

// ============================================================================
// Modules and source types
// ============================================================================

#[test]
fn test_imports_and_exports() {
    let arena = Bump::new();
    let src = "import a, { b as c, 'd' as d } from 'm';\nimport * as ns from 'n';\nexport const e = 1;\nexport { a as default };\nexport * from 'o';\nexport * as p from 'p';";
    let file = parse_module(&arena, src);
    assert_eq!(file.program.source_type, SourceType::Module);
    let Statement::Module(ModuleItem::Import(import)) = file.program.body[0] else { panic!("import") };
    assert_eq!(import.specifiers.len(), 3);
    assert_eq!(import.source.value, "m");
    assert!(matches!(file.program.body[4], Statement::Module(ModuleItem::ExportAll(_))));
}

#[test]
fn test_local_exports_resolve_to_top_level_bindings() {
    let arena = Bump::new();
    for src in [
        "const x = 1; export { x };",
        "function f() {} export { f };",
        "export { f as g }; function f() {}",
        "export { C, v }; class C {} var v;",
    ] {
        let file = parse_module(&arena, src);
        assert!(file.errors.is_empty(), "{src}");
    }
}

#[test]
fn test_export_default_forms() {
    let arena = Bump::new();
    for src in ["export default function () {}", "export default class {}", "export default 1 + 2;"] {
        let file = parse_module(&arena, src);
        assert!(matches!(file.program.body[0], Statement::Module(ModuleItem::ExportDefault(_))), "{src}");
    }
}

#[test]
fn test_unambiguous_source_type() {
    let arena = Bump::new();
    let options = ParserOptions::default().with_source_type(SourceTypeOption::Unambiguous);
    let file = parse(&arena, "import x from 'x';", &options).unwrap();
    assert_eq!(file.program.source_type, SourceType::Module);
    let file = parse(&arena, "var x = 1;", &options).unwrap();
    assert_eq!(file.program.source_type, SourceType::Script);
    let file = parse(&arena, "with (a) {}", &options).unwrap();
    assert_eq!(file.program.source_type, SourceType::Script);
}

#[test]
fn test_interpreter_and_html_comments() {
    let arena = Bump::new();
    let file = parse_script(&arena, "#!/usr/bin/env node\na <!-- hidden\n--> also hidden\nb;");
    assert_eq!(file.program.interpreter.map(|i| i.value), Some("/usr/bin/env node"));
    assert_eq!(file.program.body.len(), 2);
}

// ============================================================================
// Entry points and outputs
// ============================================================================

#[test]
fn test_parse_expression_entry() {
    let arena = Bump::new();
    let file = parse_expression(&arena, "a + b", &ParserOptions::default()).unwrap();
    assert!(matches!(file.expression, Expression::Binary(_)));
    assert!(parse_expression(&arena, "a b", &ParserOptions::default()).is_err());
}

#[test]
fn test_tokens_and_comments() {
    let arena = Bump::new();
    let options = ParserOptions::default().with_tokens(true);
    let src = "/* lead */ x = 1; // tail";
    let file = parse(&arena, src, &options).unwrap();
    assert_eq!(file.comments.len(), 2);
    assert_eq!(file.comments[0].kind, CommentKind::Block);
    assert_eq!(file.comments[0].value, " lead ");
    let tokens = file.tokens.expect("tokens were requested");
    let texts: Vec<_> = tokens.iter().map(|t| text(src, t.span())).collect();
    assert_eq!(texts, vec!["/* lead */", "x", "=", "1", ";", "// tail"]);
}

#[test]
fn test_start_position_offsets_locations() {
    let arena = Bump::new();
    let options = ParserOptions::default().with_start_position(10, 4);
    let file = parse(&arena, "x;\ny;", &options).unwrap();
    let Statement::Expression(first) = file.program.body[0] else { panic!("statement") };
    assert_eq!(first.data.span.start.line, 10);
    assert_eq!(first.data.span.start.column, 4);
    let Statement::Expression(second) = file.program.body[1] else { panic!("statement") };
    assert_eq!(second.data.span.start.line, 11);
    assert_eq!(second.data.span.start.column, 0);
}

#[test]
fn test_json_serialization_uses_babel_names() {
    let arena = Bump::new();
    let file = parse_script(&arena, "let x = 1;");
    let json = serde_json::to_value(&file).unwrap();
    assert_eq!(json["type"], "File");
    assert_eq!(json["program"]["type"], "Program");
    assert_eq!(json["program"]["body"][0]["type"], "VariableDeclaration");
    assert_eq!(json["program"]["body"][0]["kind"], "let");
    assert_eq!(json["program"]["body"][0]["declarations"][0]["init"]["type"], "NumericLiteral");
}
