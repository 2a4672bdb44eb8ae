//! Plugin overlay integration tests.
//!
//! Exercises plugin combinations through the public entry points and checks
//! the serialized tree shapes the overlays produce.

use std::collections::BTreeSet;

use bumpalo::Bump;
use esparse_ast::*;
use esparse_parser::{parse, ParseFailure, ParserOptions, SourceTypeOption};

/// Helper: parse with the given plugins, panicking on failure.
fn parse_with<'a>(arena: &'a Bump, source: &str, plugins: &[&str]) -> File<'a> {
    let options = ParserOptions::default().with_plugins(plugins.iter().copied());
    parse(arena, source, &options).unwrap_or_else(|err| panic!("{source}: {err}"))
}

/// Helper: the reason code a source fails with under the given options.
fn reason_with(source: &str, options: &ParserOptions) -> &'static str {
    let arena = Bump::new();
    match parse(&arena, source, options) {
        Ok(_) => panic!("expected an error for {source:?}"),
        Err(ParseFailure::Syntax(diag)) => diag.reason_code(),
        Err(other) => panic!("expected a syntax error for {source:?}, got {other}"),
    }
}

fn expression_of<'a>(statement: &Statement<'a>) -> Expression<'a> {
    match statement {
        Statement::Expression(stmt) => stmt.expression,
        other => panic!("expected an expression statement, got {other:?}"),
    }
}

/// Every `"type"` string in a serialized tree.
fn node_types(value: &serde_json::Value, out: &mut BTreeSet<String>) {
    match value {
        serde_json::Value::Object(map) => {
            if let Some(serde_json::Value::String(ty)) = map.get("type") {
                out.insert(ty.clone());
            }
            map.values().for_each(|child| node_types(child, out));
        }
        serde_json::Value::Array(items) => items.iter().for_each(|child| node_types(child, out)),
        _ => {}
    }
}

fn serialized_types(file: &File<'_>) -> BTreeSet<String> {
    let json = serde_json::to_value(file).unwrap();
    let mut types = BTreeSet::new();
    node_types(&json, &mut types);
    types
}

// ============================================================================
// ESTree shape
// ============================================================================

#[test]
fn test_estree_node_types() {
    let arena = Bump::new();
    let source = "x = 'str';\ny = { a: 1, b };\nimport('m');\na?.b.c;\nz = /re/g;";
    let file = parse_with(&arena, source, &["estree"]);
    let types = serialized_types(&file);
    for expected in ["Literal", "Property", "ImportExpression", "ChainExpression"] {
        assert!(types.contains(expected), "missing {expected} in {types:?}");
    }
    for absent in ["StringLiteral", "NumericLiteral", "RegExpLiteral", "ObjectProperty", "OptionalMemberExpression"] {
        assert!(!types.contains(absent), "unexpected {absent} in {types:?}");
    }
}

#[test]
fn test_without_estree_keeps_babel_types() {
    let arena = Bump::new();
    let file = parse_with(&arena, "x = 'str';\ny = { a: 1 };\na?.b;", &[]);
    let types = serialized_types(&file);
    for expected in ["StringLiteral", "NumericLiteral", "ObjectProperty", "OptionalMemberExpression"] {
        assert!(types.contains(expected), "missing {expected} in {types:?}");
    }
    assert!(!types.contains("Literal"));
}

#[test]
fn test_estree_class_members() {
    let arena = Bump::new();
    let file = parse_with(&arena, "class A { m() {} static x = 1 }", &["estree"]);
    let types = serialized_types(&file);
    assert!(types.contains("MethodDefinition"));
    assert!(types.contains("PropertyDefinition"));
    assert!(!types.contains("ClassMethod"));
}

// ============================================================================
// JSX with type plugins
// ============================================================================

#[test]
fn test_tsx_expression_children() {
    let arena = Bump::new();
    let file = parse_with(&arena, "const el = <div>{(value as string).length}</div>;", &["jsx", "typescript"]);
    let Statement::Variable(var) = file.program.body[0] else { panic!("variable") };
    assert!(matches!(
        var.declarations[0].init,
        Some(Expression::Extension(ExpressionExtension::JsxElement(_)))
    ));
}

#[test]
fn test_tsx_generic_arrow_is_not_an_element() {
    let arena = Bump::new();
    let file = parse_with(&arena, "const id = <T,>(x: T): T => x;", &["jsx", "typescript"]);
    let Statement::Variable(var) = file.program.body[0] else { panic!("variable") };
    match var.declarations[0].init {
        Some(Expression::ArrowFunction(arrow)) => assert!(arrow.type_parameters.is_some()),
        other => panic!("{other:?}"),
    }
}

#[test]
fn test_type_assertion_without_jsx() {
    let arena = Bump::new();
    let file = parse_with(&arena, "<number>value;", &["typescript"]);
    assert!(matches!(
        expression_of(&file.program.body[0]),
        Expression::Extension(ExpressionExtension::TsTypeAssertion(_))
    ));
}

#[test]
fn test_flow_with_jsx() {
    let arena = Bump::new();
    let file = parse_with(&arena, "const el: Element = <Button onClick={(e: Event) => go(e)} />;", &["flow", "jsx"]);
    let Statement::Variable(var) = file.program.body[0] else { panic!("variable") };
    assert!(matches!(
        var.declarations[0].init,
        Some(Expression::Extension(ExpressionExtension::JsxElement(_)))
    ));
}

// ============================================================================
// Type plugins
// ============================================================================

#[test]
fn test_typescript_declarations() {
    let arena = Bump::new();
    let source = "interface P { x: number }\ntype Q = P | null;\nenum E { A, B = 2 }\nlet p: P = { x: 1 };";
    let file = parse_with(&arena, source, &["typescript"]);
    assert!(matches!(file.program.body[0], Statement::Extension(StatementExtension::TsInterface(_))));
    assert!(matches!(file.program.body[1], Statement::Extension(StatementExtension::TsTypeAlias(_))));
    assert!(matches!(file.program.body[2], Statement::Extension(StatementExtension::TsEnum(_))));
    assert!(matches!(file.program.body[3], Statement::Variable(_)));
}

#[test]
fn test_flow_declarations() {
    let arena = Bump::new();
    let source = "type T = { a: number };\nopaque type O = string;\ninterface I { m(): void }\ndeclare var v: T;";
    let file = parse_with(&arena, source, &["flow"]);
    assert!(matches!(file.program.body[0], Statement::Extension(StatementExtension::FlowTypeAlias(_))));
    assert!(matches!(file.program.body[1], Statement::Extension(StatementExtension::FlowOpaqueType(_))));
    assert!(matches!(file.program.body[2], Statement::Extension(StatementExtension::FlowInterface(_))));
    assert!(matches!(file.program.body[3], Statement::Extension(StatementExtension::FlowDeclareVariable(_))));
}

#[test]
fn test_type_syntax_needs_a_plugin() {
    let arena = Bump::new();
    assert!(parse(&arena, "let x: number = 1;", &ParserOptions::default()).is_err());
    assert!(parse(&arena, "let x: number = 1;", &ParserOptions::default().with_plugin("typescript")).is_ok());
    assert!(parse(&arena, "let x: number = 1;", &ParserOptions::default().with_plugin("flow")).is_ok());
}

#[test]
fn test_declaration_file_is_ambient() {
    let arena = Bump::new();
    let options = ParserOptions::from_json(r#"{ "plugins": [["typescript", { "dts": true }]] }"#).unwrap();
    let file = parse(&arena, "const x: number;\nfunction f(a: string): void;", &options).unwrap();
    assert_eq!(file.program.body.len(), 2);
    assert_eq!(
        reason_with("const x: number;", &ParserOptions::default().with_plugin("typescript")),
        "DeclarationMissingInitializer"
    );
}

// ============================================================================
// Decorators
// ============================================================================

#[test]
fn test_class_and_member_decorators() {
    let arena = Bump::new();
    let source = "@sealed class A { @observable x = 1; @action.bound m() {} }";
    let file = parse_with(&arena, source, &["decorators"]);
    let Statement::Class(class) = file.program.body[0] else { panic!("class") };
    assert_eq!(class.decorators.len(), 1);
    let ClassBodyOrPlaceholder::Body(body) = class.body else { panic!("body") };
    match body.body[0] {
        ClassMember::Property(prop) => assert_eq!(prop.decorators.len(), 1),
        other => panic!("{other:?}"),
    }
    match body.body[1] {
        ClassMember::Method(method) => {
            assert!(matches!(method.decorators[0].expression, Expression::Member(_)));
        }
        other => panic!("{other:?}"),
    }
}

#[test]
fn test_decorators_around_export() {
    let module = ParserOptions::default()
        .with_source_type(SourceTypeOption::Module)
        .with_plugin("decorators");
    let arena = Bump::new();
    assert!(parse(&arena, "@a export class A {}", &module).is_ok());
    assert!(parse(&arena, "export @b class B {}", &module).is_ok());
    assert_eq!(reason_with("@a export @b class C {}", &module), "DecoratorsBeforeAfterExport");
}

#[test]
fn test_decorator_placement_errors() {
    let options = ParserOptions::default().with_plugin("decorators");
    assert_eq!(reason_with("@dec function f() {}", &options), "UnexpectedLeadingDecorator");
    assert_eq!(reason_with("class A { @dec constructor() {} }", &options), "DecoratorConstructor");
    assert_eq!(reason_with("class A { @dec }", &options), "TrailingDecorator");
    assert_eq!(reason_with("({ @dec a: 1 });", &options), "UnsupportedPropertyDecorator");
    assert_eq!(reason_with("@dec class A {}", &ParserOptions::default()), "MissingOneOfPlugins");
}

#[test]
fn test_legacy_decorators_take_expressions() {
    let arena = Bump::new();
    let file = parse_with(&arena, "@(cond ? a : b) @factory(1)[0] class A {}", &["decorators-legacy"]);
    let Statement::Class(class) = file.program.body[0] else { panic!("class") };
    assert_eq!(class.decorators.len(), 2);
}

// ============================================================================
// Intrinsics and placeholders
// ============================================================================

#[test]
fn test_v8_intrinsic_in_expressions() {
    let arena = Bump::new();
    let file = parse_with(&arena, "x = %GetOptimizationStatus(f) % 2;", &["v8intrinsic"]);
    let Expression::Assignment(assign) = expression_of(&file.program.body[0]) else { panic!("assignment") };
    let Expression::Binary(binary) = assign.right else { panic!("binary") };
    let Expression::Call(call) = binary.left else { panic!("call") };
    assert!(matches!(call.callee, Expression::Extension(ExpressionExtension::V8Intrinsic(id)) if id.name == "GetOptimizationStatus"));
}

#[test]
fn test_placeholders_in_templates() {
    let arena = Bump::new();
    let file = parse_with(&arena, "const %%id%% = %%init%%;\n%%stmt%%;", &["placeholders"]);
    assert_eq!(file.program.body.len(), 2);
    let types = serialized_types(&file);
    assert!(types.contains("Placeholder"));
}

// ============================================================================
// Plugin configuration
// ============================================================================

#[test]
fn test_plugins_from_json() {
    let arena = Bump::new();
    let options = ParserOptions::from_json(
        r#"{ "sourceType": "module", "plugins": ["jsx", ["typescript", { "dts": false }]], "tokens": true }"#,
    )
    .unwrap();
    let file = parse(&arena, "export const el = <div /> as unknown;", &options).unwrap();
    assert_eq!(file.program.source_type, SourceType::Module);
    assert!(file.tokens.is_some());
}

#[test]
fn test_plugin_conflicts() {
    for (first, second) in [("flow", "typescript"), ("jsx", "placeholders"), ("v8intrinsic", "placeholders"), ("decorators", "decorators-legacy")] {
        let arena = Bump::new();
        let options = ParserOptions::default().with_plugin(first).with_plugin(second);
        assert!(
            matches!(parse(&arena, "x;", &options), Err(ParseFailure::Config(_))),
            "{first} + {second} should conflict"
        );
    }
}
