//! The `estree` plugin: reshape finished Babel nodes into their ESTree
//! counterparts.
//!
//! Nothing here changes what is accepted. Literals become `Literal`, object
//! members become `Property`, class members become `MethodDefinition` and
//! `PropertyDefinition`, optional chains are wrapped in `ChainExpression`,
//! `import()` becomes `ImportExpression` and directives turn back into
//! expression statements.

use super::{Layer, Overlay};
use crate::parser::{PResult, Parser};
use crate::utilities::{span_end, span_start};
use esparse_ast::ext::estree::{
    ChainExpression, ImportExpression, Literal, LiteralValue, MethodDefinition, MethodDefinitionKind, Property,
    PropertyDefinition, PropertyKind, PropertyValue, RegexInfo,
};
use esparse_ast::*;
use esparse_core::text::Span;
use esparse_diagnostics::messages;

pub(crate) struct EstreeOverlay;

impl Overlay for EstreeOverlay {
    fn name(&self) -> &'static str {
        "estree"
    }

    fn finish_literal<'a>(&self, p: &mut Parser<'a>, _layer: Layer, expr: Expression<'a>) -> PResult<Option<Expression<'a>>> {
        let span = expr.span();
        let raw = p.source(span_start(span), span_end(span));
        let (value, regex, bigint) = match expr {
            Expression::StringLiteral(lit) => (LiteralValue::String(lit.value), None, None),
            Expression::NumericLiteral(lit) => (LiteralValue::Number(lit.value), None, None),
            Expression::BooleanLiteral(lit) => (LiteralValue::Boolean(lit.value), None, None),
            Expression::NullLiteral(_) => (LiteralValue::Null, None, None),
            Expression::BigIntLiteral(lit) => (LiteralValue::Opaque, None, Some(lit.value)),
            Expression::RegExpLiteral(lit) => {
                (LiteralValue::Opaque, Some(RegexInfo { pattern: lit.pattern, flags: lit.flags }), None)
            }
            _ => return Ok(None),
        };
        let literal = p.alloc(Literal { data: NodeData::new(span), value, raw, regex, bigint });
        Ok(Some(Expression::Extension(p.alloc(ExpressionExtension::EstreeLiteral(literal)))))
    }

    fn finish_object_member<'a>(
        &self,
        p: &mut Parser<'a>,
        _layer: Layer,
        member: ObjectMember<'a>,
    ) -> PResult<Option<ObjectMember<'a>>> {
        let property = match member {
            ObjectMember::Property(prop) => Property {
                data: NodeData::new(prop.data.span),
                key: prop.key,
                value: PropertyValue::Expression(prop.value),
                kind: PropertyKind::Init,
                method: false,
                shorthand: prop.shorthand,
                computed: prop.computed,
            },
            ObjectMember::Method(method) => {
                let function = p.alloc(Function {
                    kind: FunctionType::FunctionExpression,
                    data: NodeData::new(method.data.span),
                    id: None,
                    generator: method.generator,
                    is_async: method.is_async,
                    params: method.params,
                    body: Some(method.body),
                    declare: false,
                    type_parameters: method.type_parameters,
                    return_type: method.return_type,
                });
                let kind = match method.kind {
                    MethodKind::Get => PropertyKind::Get,
                    MethodKind::Set => PropertyKind::Set,
                    MethodKind::Method | MethodKind::Constructor => PropertyKind::Init,
                };
                Property {
                    data: NodeData::new(method.data.span),
                    key: method.key,
                    value: PropertyValue::Expression(Expression::Function(function)),
                    kind,
                    method: method.kind == MethodKind::Method,
                    shorthand: false,
                    computed: method.computed,
                }
            }
            ObjectMember::Spread(_) | ObjectMember::Extension(_) => return Ok(None),
        };
        let property = p.alloc(property);
        Ok(Some(ObjectMember::Extension(p.alloc(ObjectMemberExtension::EstreeProperty(property)))))
    }

    fn finish_pattern_property<'a>(
        &self,
        p: &mut Parser<'a>,
        _layer: Layer,
        property: &'a PatternProperty<'a>,
    ) -> PResult<Option<ObjectPatternMember<'a>>> {
        let converted = p.alloc(Property {
            data: NodeData::new(property.data.span),
            key: property.key,
            value: PropertyValue::Pattern(property.value),
            kind: PropertyKind::Init,
            method: false,
            shorthand: property.shorthand,
            computed: property.computed,
        });
        Ok(Some(ObjectPatternMember::Estree(converted)))
    }

    fn finish_class_member<'a>(
        &self,
        p: &mut Parser<'a>,
        _layer: Layer,
        member: ClassMember<'a>,
    ) -> PResult<Option<ClassMember<'a>>> {
        let extension = match member {
            ClassMember::Method(method) => {
                let Some(body) = method.body else { return Ok(None) };
                let value = p.alloc(Function {
                    kind: FunctionType::FunctionExpression,
                    data: NodeData::new(method.data.span),
                    id: None,
                    generator: method.generator,
                    is_async: method.is_async,
                    params: method.params,
                    body: Some(body),
                    declare: false,
                    type_parameters: method.type_parameters,
                    return_type: method.return_type,
                });
                let kind = match method.kind {
                    MethodKind::Constructor => MethodDefinitionKind::Constructor,
                    MethodKind::Method => MethodDefinitionKind::Method,
                    MethodKind::Get => MethodDefinitionKind::Get,
                    MethodKind::Set => MethodDefinitionKind::Set,
                };
                ClassMemberExtension::EstreeMethod(p.alloc(MethodDefinition {
                    data: NodeData::new(method.data.span),
                    decorators: method.decorators,
                    is_static: method.is_static,
                    key: method.key,
                    computed: method.computed,
                    kind,
                    value,
                }))
            }
            ClassMember::Property(property) => ClassMemberExtension::EstreeProperty(p.alloc(PropertyDefinition {
                data: NodeData::new(property.data.span),
                decorators: property.decorators,
                is_static: property.is_static,
                key: property.key,
                computed: property.computed,
                value: property.value,
            })),
            ClassMember::StaticBlock(_) | ClassMember::Extension(_) => return Ok(None),
        };
        Ok(Some(ClassMember::Extension(p.alloc(extension))))
    }

    fn finish_import_call<'a>(
        &self,
        p: &mut Parser<'a>,
        _layer: Layer,
        span: Span,
        source: Expression<'a>,
        options: Option<Expression<'a>>,
    ) -> PResult<Option<Expression<'a>>> {
        let import = p.alloc(ImportExpression { data: NodeData::new(span), source, options });
        Ok(Some(Expression::Extension(p.alloc(ExpressionExtension::EstreeImport(import)))))
    }

    fn finish_optional_chain<'a>(
        &self,
        p: &mut Parser<'a>,
        _layer: Layer,
        expr: Expression<'a>,
    ) -> PResult<Option<Expression<'a>>> {
        let chain = p.alloc(ChainExpression { data: NodeData::new(expr.span()), expression: expr });
        Ok(Some(Expression::Extension(p.alloc(ExpressionExtension::EstreeChain(chain)))))
    }

    fn finish_directives<'a>(
        &self,
        p: &mut Parser<'a>,
        _layer: Layer,
        directives: &'a [Directive<'a>],
    ) -> PResult<Option<Vec<Statement<'a>>>> {
        let statements = directives
            .iter()
            .map(|directive| {
                let literal = directive.value;
                let raw = literal.raw;
                let unquoted = raw.get(1..raw.len().saturating_sub(1)).unwrap_or("");
                let expression = p.alloc(Literal {
                    data: NodeData::new(literal.data.span),
                    value: LiteralValue::String(literal.value),
                    raw,
                    regex: None,
                    bigint: None,
                });
                let expression = Expression::Extension(p.alloc(ExpressionExtension::EstreeLiteral(expression)));
                Statement::Expression(p.alloc(ExpressionStatement {
                    data: NodeData::new(directive.data.span),
                    expression,
                    directive: Some(unquoted),
                }))
            })
            .collect();
        Ok(Some(statements))
    }

    fn to_assignable_member<'a>(
        &self,
        p: &mut Parser<'a>,
        _layer: Layer,
        member: &'a ObjectMemberExtension<'a>,
        is_binding: bool,
    ) -> PResult<Option<ObjectPatternMember<'a>>> {
        let ObjectMemberExtension::EstreeProperty(property) = *member;
        let value = match property.value {
            PropertyValue::Pattern(pattern) => pattern,
            PropertyValue::Expression(_) if property.kind != PropertyKind::Init => {
                return Err(p.error_at(&messages::PATTERN_HAS_ACCESSOR, span_start(property.key.span()), &[]));
            }
            PropertyValue::Expression(_) if property.method => {
                return Err(p.error_at(&messages::PATTERN_HAS_METHOD, span_start(property.key.span()), &[]));
            }
            PropertyValue::Expression(expr) => p.to_assignable(expr, !is_binding)?,
        };
        let converted = p.alloc(Property {
            data: NodeData::new(property.data.span),
            key: property.key,
            value: PropertyValue::Pattern(value),
            kind: PropertyKind::Init,
            method: false,
            shorthand: property.shorthand,
            computed: property.computed,
        });
        Ok(Some(ObjectPatternMember::Estree(converted)))
    }
}

#[cfg(test)]
mod tests {
    use crate::options::ParserOptions;
    use bumpalo::Bump;
    use esparse_ast::ext::estree::{LiteralValue, PropertyKind, PropertyValue};
    use esparse_ast::*;

    fn estree() -> ParserOptions {
        ParserOptions::default().with_plugin("estree")
    }

    fn first_expression<'a>(file: &File<'a>) -> Expression<'a> {
        match file.program.body.first() {
            Some(Statement::Expression(stmt)) => stmt.expression,
            other => panic!("expected an expression statement, got {other:?}"),
        }
    }

    #[test]
    fn test_literals_become_literal() {
        let arena = Bump::new();
        let file = crate::parse(&arena, "/ab+c/gi;", &estree()).unwrap();
        match first_expression(&file) {
            Expression::Extension(ExpressionExtension::EstreeLiteral(lit)) => {
                assert_eq!(lit.raw, "/ab+c/gi");
                let regex = lit.regex.expect("regex info");
                assert_eq!((regex.pattern, regex.flags), ("ab+c", "gi"));
                assert_eq!(lit.value, LiteralValue::Opaque);
            }
            other => panic!("{other:?}"),
        }
        let file = crate::parse(&arena, "'x';\n1;", &estree()).unwrap();
        assert_eq!(file.program.body.len(), 2);
        match file.program.body[0] {
            Statement::Expression(stmt) => assert_eq!(stmt.directive, Some("x")),
            other => panic!("{other:?}"),
        }
    }

    #[test]
    fn test_object_members_become_property() {
        let arena = Bump::new();
        let file = crate::parse(&arena, "({ a: 1, get b() { return 2 }, c() {} });", &estree()).unwrap();
        let Expression::Object(object) = first_expression(&file) else { panic!("object") };
        let kinds: Vec<(PropertyKind, bool)> = object
            .properties
            .iter()
            .map(|member| match member {
                ObjectMember::Extension(ObjectMemberExtension::EstreeProperty(p)) => (p.kind, p.method),
                other => panic!("{other:?}"),
            })
            .collect();
        assert_eq!(kinds, vec![(PropertyKind::Init, false), (PropertyKind::Get, false), (PropertyKind::Init, true)]);
    }

    #[test]
    fn test_destructuring_through_property() {
        let arena = Bump::new();
        let file = crate::parse(&arena, "({ a, b: [c] } = x);", &estree()).unwrap();
        let Expression::Assignment(assign) = first_expression(&file) else { panic!("assignment") };
        let Pattern::Object(pattern) = assign.left else { panic!("object pattern") };
        match pattern.properties[1] {
            ObjectPatternMember::Estree(property) => {
                assert!(matches!(property.value, PropertyValue::Pattern(Pattern::Array(_))));
            }
            other => panic!("{other:?}"),
        }
        let err = crate::parse(&arena, "({ get a() {} } = x);", &estree()).unwrap_err();
        assert_eq!(err.diagnostic().map(|d| d.reason_code()), Some("PatternHasAccessor"));
    }

    #[test]
    fn test_chain_and_import_expression() {
        let arena = Bump::new();
        let file = crate::parse(&arena, "a?.b.c;", &estree()).unwrap();
        match first_expression(&file) {
            Expression::Extension(ExpressionExtension::EstreeChain(chain)) => {
                assert!(matches!(chain.expression, Expression::Member(_)));
            }
            other => panic!("{other:?}"),
        }
        let file = crate::parse(&arena, "import('m');", &estree()).unwrap();
        assert!(matches!(first_expression(&file), Expression::Extension(ExpressionExtension::EstreeImport(_))));
    }

    #[test]
    fn test_class_members_become_definitions() {
        let arena = Bump::new();
        let file = crate::parse(&arena, "class A { constructor() {} x = 1 }", &estree()).unwrap();
        let Some(Statement::Class(class)) = file.program.body.first() else { panic!("class") };
        let ClassBodyOrPlaceholder::Body(body) = class.body else { panic!("body") };
        assert!(matches!(body.body[0], ClassMember::Extension(ClassMemberExtension::EstreeMethod(_))));
        assert!(matches!(body.body[1], ClassMember::Extension(ClassMemberExtension::EstreeProperty(_))));
    }
}
