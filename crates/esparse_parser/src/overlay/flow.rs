//! The `flow` plugin: annotations, the Flow type grammar, type casts and
//! the `type`, `opaque type`, `interface` and `declare` forms.

use super::{annotate_pattern, import_kind_applies, Layer, Overlay};
use crate::class::{MemberModifiers, PropertyTypeInfo};
use crate::expression::{ExpressionErrors, SubscriptState};
use crate::lval::BindingPosition;
use crate::parser::{PResult, Parser};
use crate::statement::StatementContext;
use crate::utilities::{span_end, span_start};
use esparse_ast::flow::{
    ArrayTypeAnnotation, BooleanLiteralTypeAnnotation, DeclareFunction, DeclareModuleExports, DeclareVariable,
    FlowKeywordKind, FlowKeywordType, FlowType, FlowTypeAnnotation, FlowTypeId, FlowTypeParameter,
    FlowTypeParameterDeclaration, FlowTypeParameterInstantiation, FunctionTypeAnnotation, FunctionTypeParam,
    GenericTypeAnnotation, InterfaceDeclaration, InterfaceExtends, InterfaceKind, IntersectionTypeAnnotation,
    NullableTypeAnnotation, NumberLiteralTypeAnnotation, ObjectTypeAnnotation, ObjectTypeCallProperty,
    ObjectTypeIndexer, ObjectTypeMember, ObjectTypeProperty, ObjectTypeSpreadProperty, OpaqueType, OpaqueTypeKind,
    QualifiedTypeIdentifier, StringLiteralTypeAnnotation, TupleTypeAnnotation, TypeAlias, TypeAliasKind,
    TypeCastExpression, TypeofTypeAnnotation, UnionTypeAnnotation, Variance, VarianceKind,
};
use esparse_ast::*;
use esparse_diagnostics::messages;
use esparse_scanner::LexerFeatures;
use esparse_scope::BindingFlags;
use tracing::trace;

pub(crate) struct FlowOverlay;

/// Names that cannot be declared as types.
const RESERVED_TYPES: &[&str] = &[
    "any", "bool", "boolean", "empty", "extends", "false", "interface", "mixed", "null", "number", "static", "string",
    "true", "typeof", "void", "symbol", "bigint",
];

/// What `{ ... }` may contain where it is parsed.
#[derive(Clone, Copy)]
struct ObjectTypeOptions {
    allow_static: bool,
    allow_inexact: bool,
}

impl FlowOverlay {
    fn check_reserved_type(p: &mut Parser<'_>, name: &str, pos: usize, declaration: bool) -> PResult<()> {
        if !RESERVED_TYPES.contains(&name) {
            return Ok(());
        }
        let message =
            if declaration { &messages::FLOW_ASSIGN_RESERVED_TYPE } else { &messages::FLOW_UNEXPECTED_RESERVED_TYPE };
        p.raise(message, pos, &[name])
    }

    // ========================================================================
    // Annotations
    // ========================================================================

    /// `: T` at the current colon.
    fn parse_type_annotation<'a>(p: &mut Parser<'a>) -> PResult<&'a FlowTypeAnnotation<'a>> {
        let start = p.start();
        p.in_type(|p| {
            p.expect(TokenKind::Colon)?;
            let type_annotation = Self::parse_type(p)?;
            Ok(p.alloc(FlowTypeAnnotation { data: p.finish(start), type_annotation }))
        })
    }

    /// Parse with anonymous `T => U` function types allowed, as inside any
    /// bracketing.
    fn with_anon_function_types<'a, T>(
        p: &mut Parser<'a>,
        f: impl FnOnce(&mut Parser<'a>) -> PResult<T>,
    ) -> PResult<T> {
        let old = std::mem::replace(&mut p.state.no_anon_function_type, false);
        let result = f(p);
        p.state.no_anon_function_type = old;
        result
    }

    // ========================================================================
    // Types
    // ========================================================================

    fn parse_type<'a>(p: &mut Parser<'a>) -> PResult<FlowType<'a>> {
        p.with_recursion_guard(|p| {
            let start = p.start();
            p.eat(TokenKind::BitwiseOr)?;
            let first = Self::parse_intersection_type(p)?;
            if !p.is(TokenKind::BitwiseOr) {
                return Ok(first);
            }
            let mut types = vec![first];
            while p.eat(TokenKind::BitwiseOr)? {
                types.push(Self::parse_intersection_type(p)?);
            }
            Ok(FlowType::Union(p.alloc(UnionTypeAnnotation { data: p.finish(start), types: p.alloc_vec(types) })))
        })
    }

    fn parse_intersection_type<'a>(p: &mut Parser<'a>) -> PResult<FlowType<'a>> {
        let start = p.start();
        p.eat(TokenKind::BitwiseAnd)?;
        let first = Self::parse_anon_function_without_parens(p)?;
        if !p.is(TokenKind::BitwiseAnd) {
            return Ok(first);
        }
        let mut types = vec![first];
        while p.eat(TokenKind::BitwiseAnd)? {
            types.push(Self::parse_anon_function_without_parens(p)?);
        }
        Ok(FlowType::Intersection(p.alloc(IntersectionTypeAnnotation { data: p.finish(start), types: p.alloc_vec(types) })))
    }

    /// `T => U` with a single unparenthesized parameter.
    fn parse_anon_function_without_parens<'a>(p: &mut Parser<'a>) -> PResult<FlowType<'a>> {
        let start = p.start();
        let param = Self::parse_prefix_type(p)?;
        if p.state.no_anon_function_type || !p.eat(TokenKind::Arrow)? {
            return Ok(param);
        }
        let param = p.alloc(FunctionTypeParam {
            data: NodeData::new(param.span()),
            name: None,
            optional: false,
            type_annotation: param,
        });
        let return_type = Self::parse_type(p)?;
        Ok(FlowType::Function(p.alloc(FunctionTypeAnnotation {
            data: p.finish(start),
            type_parameters: None,
            params: p.alloc_vec(vec![&*param]),
            rest: None,
            return_type,
        })))
    }

    /// `?T`.
    fn parse_prefix_type<'a>(p: &mut Parser<'a>) -> PResult<FlowType<'a>> {
        let start = p.start();
        if !p.eat(TokenKind::Question)? {
            return Self::parse_postfix_type(p);
        }
        let type_annotation = Self::parse_prefix_type(p)?;
        Ok(FlowType::Nullable(p.alloc(NullableTypeAnnotation { data: p.finish(start), type_annotation })))
    }

    /// `T[]`.
    fn parse_postfix_type<'a>(p: &mut Parser<'a>) -> PResult<FlowType<'a>> {
        let start = p.start();
        let mut ty = Self::parse_primary_type(p)?;
        while p.is(TokenKind::BracketL) && !p.has_preceding_line_break() {
            p.next()?;
            p.expect(TokenKind::BracketR)?;
            ty = FlowType::Array(p.alloc(ArrayTypeAnnotation { data: p.finish(start), element_type: ty }));
        }
        Ok(ty)
    }

    fn keyword<'a>(p: &mut Parser<'a>, kind: FlowKeywordKind) -> PResult<FlowType<'a>> {
        let start = p.start();
        p.next()?;
        Ok(FlowType::Keyword(p.alloc(FlowKeywordType { kind, data: p.finish(start) })))
    }

    fn parse_primary_type<'a>(p: &mut Parser<'a>) -> PResult<FlowType<'a>> {
        let start = p.start();
        match p.token() {
            TokenKind::Name => {
                if let Some(kind) = FlowKeywordKind::from_text(p.word()) {
                    if !p.scanner.contains_esc() {
                        return Self::keyword(p, kind);
                    }
                }
                let id = Self::parse_qualified_type_id(p, false)?;
                let type_parameters = Self::parse_type_arguments_opt(p)?;
                Ok(FlowType::Generic(p.alloc(GenericTypeAnnotation { data: p.finish(start), id, type_parameters })))
            }
            TokenKind::Void => Self::keyword(p, FlowKeywordKind::Void),
            TokenKind::Null => Self::keyword(p, FlowKeywordKind::Null),
            TokenKind::This => Self::keyword(p, FlowKeywordKind::This),
            TokenKind::Star => Self::keyword(p, FlowKeywordKind::Exists),
            TokenKind::Typeof => {
                p.next()?;
                let argument = Self::parse_primary_type(p)?;
                Ok(FlowType::Typeof(p.alloc(TypeofTypeAnnotation { data: p.finish(start), argument })))
            }
            TokenKind::String => {
                let value = p.token_str();
                let raw = p.source(start, p.token_end());
                p.next()?;
                Ok(FlowType::StringLiteral(p.alloc(StringLiteralTypeAnnotation { data: p.finish(start), value, raw })))
            }
            TokenKind::Num => Self::parse_number_literal_type(p, start, false),
            TokenKind::PlusMin if p.char_at(start) == Some('-') => {
                p.next()?;
                if !p.is(TokenKind::Num) {
                    return Err(p.unexpected());
                }
                Self::parse_number_literal_type(p, start, true)
            }
            TokenKind::True | TokenKind::False => {
                let value = p.is(TokenKind::True);
                p.next()?;
                Ok(FlowType::BooleanLiteral(p.alloc(BooleanLiteralTypeAnnotation { data: p.finish(start), value })))
            }
            TokenKind::BraceL | TokenKind::BraceBarL => {
                let options = ObjectTypeOptions { allow_static: false, allow_inexact: true };
                Ok(FlowType::Object(Self::parse_object_type(p, options)?))
            }
            TokenKind::BracketL => Self::with_anon_function_types(p, Self::parse_tuple_type),
            TokenKind::Lt => {
                let type_parameters = Self::parse_type_parameter_declaration(p)?;
                p.expect(TokenKind::ParenL)?;
                let function = Self::parse_function_type_rest(p, start, Some(type_parameters), Vec::new(), TokenKind::Arrow)?;
                Ok(FlowType::Function(function))
            }
            TokenKind::ParenL => Self::parse_parenthesized_or_function_type(p),
            _ => Err(p.unexpected()),
        }
    }

    fn parse_number_literal_type<'a>(p: &mut Parser<'a>, start: usize, negative: bool) -> PResult<FlowType<'a>> {
        let TokenValue::Number(value) = p.token_value() else { return Err(p.unexpected()) };
        let raw = p.source(start, p.token_end());
        p.next()?;
        let value = if negative { -value } else { value };
        Ok(FlowType::NumberLiteral(p.alloc(NumberLiteralTypeAnnotation { data: p.finish(start), value, raw })))
    }

    /// `A` or `A.B.C` naming a type.
    fn parse_qualified_type_id<'a>(p: &mut Parser<'a>, restricted: bool) -> PResult<FlowTypeId<'a>> {
        let start = p.start();
        if restricted {
            let word = p.word();
            Self::check_reserved_type(p, word, start, false)?;
        }
        let mut id = FlowTypeId::Identifier(p.parse_identifier(true)?);
        while p.eat(TokenKind::Dot)? {
            let right = p.parse_identifier(true)?;
            id = FlowTypeId::Qualified(p.alloc(QualifiedTypeIdentifier {
                data: p.finish(start),
                qualification: id,
                id: right,
            }));
        }
        Ok(id)
    }

    fn parse_tuple_type<'a>(p: &mut Parser<'a>) -> PResult<FlowType<'a>> {
        let start = p.start();
        p.expect(TokenKind::BracketL)?;
        let mut types = Vec::new();
        while !p.is(TokenKind::BracketR) {
            types.push(Self::parse_type(p)?);
            if !p.is(TokenKind::BracketR) {
                p.expect(TokenKind::Comma)?;
            }
        }
        p.expect(TokenKind::BracketR)?;
        Ok(FlowType::Tuple(p.alloc(TupleTypeAnnotation { data: p.finish(start), types: p.alloc_vec(types) })))
    }

    /// After `(`: a grouped type, or the parameters of a function type.
    fn parse_parenthesized_or_function_type<'a>(p: &mut Parser<'a>) -> PResult<FlowType<'a>> {
        let start = p.start();
        p.expect(TokenKind::ParenL)?;
        let is_grouped = if matches!(p.token(), TokenKind::ParenR | TokenKind::Ellipsis) {
            false
        } else if p.token().is_keyword_or_name() {
            !matches!(p.lookahead()?.kind, TokenKind::Question | TokenKind::Colon)
        } else {
            true
        };
        let mut params = Vec::new();
        if is_grouped {
            let ty = Self::with_anon_function_types(p, Self::parse_type)?;
            let unnamed_param = !p.state.no_anon_function_type
                && (p.is(TokenKind::Comma) || (p.is(TokenKind::ParenR) && p.lookahead()?.kind == TokenKind::Arrow));
            if !unnamed_param {
                p.expect(TokenKind::ParenR)?;
                return Ok(ty);
            }
            p.eat(TokenKind::Comma)?;
            params.push(&*p.alloc(FunctionTypeParam {
                data: NodeData::new(ty.span()),
                name: None,
                optional: false,
                type_annotation: ty,
            }));
        }
        Ok(FlowType::Function(Self::parse_function_type_rest(p, start, None, params, TokenKind::Arrow)?))
    }

    /// Parameters after `(`, then `separator` and the return type. Function
    /// types use `=>`; methods and `declare function` use `:`.
    fn parse_function_type_rest<'a>(
        p: &mut Parser<'a>,
        start: usize,
        type_parameters: Option<&'a FlowTypeParameterDeclaration<'a>>,
        mut params: Vec<&'a FunctionTypeParam<'a>>,
        separator: TokenKind,
    ) -> PResult<&'a FunctionTypeAnnotation<'a>> {
        let rest = Self::with_anon_function_types(p, |p| {
            while !matches!(p.token(), TokenKind::ParenR | TokenKind::Ellipsis) {
                params.push(Self::parse_function_type_param(p)?);
                if !p.is(TokenKind::ParenR) {
                    p.expect(TokenKind::Comma)?;
                }
            }
            let rest = if p.eat(TokenKind::Ellipsis)? {
                let rest = Self::parse_function_type_param(p)?;
                p.eat(TokenKind::Comma)?;
                Some(rest)
            } else {
                None
            };
            p.expect(TokenKind::ParenR)?;
            Ok(rest)
        })?;
        p.expect(separator)?;
        let return_type = Self::parse_type(p)?;
        Ok(p.alloc(FunctionTypeAnnotation {
            data: p.finish(start),
            type_parameters,
            params: p.alloc_vec(params),
            rest,
            return_type,
        }))
    }

    /// `name?: T` or a bare `T`.
    fn parse_function_type_param<'a>(p: &mut Parser<'a>) -> PResult<&'a FunctionTypeParam<'a>> {
        let start = p.start();
        let named = p.token().is_keyword_or_name()
            && matches!(p.lookahead()?.kind, TokenKind::Colon | TokenKind::Question);
        if !named {
            let type_annotation = Self::parse_type(p)?;
            return Ok(p.alloc(FunctionTypeParam { data: p.finish(start), name: None, optional: false, type_annotation }));
        }
        let name = p.parse_identifier(true)?;
        let optional = p.eat(TokenKind::Question)?;
        p.expect(TokenKind::Colon)?;
        let type_annotation = Self::parse_type(p)?;
        Ok(p.alloc(FunctionTypeParam { data: p.finish(start), name: Some(name), optional, type_annotation }))
    }

    // ========================================================================
    // Object types
    // ========================================================================

    fn parse_variance<'a>(p: &mut Parser<'a>) -> PResult<Option<&'a Variance>> {
        if !p.is(TokenKind::PlusMin) {
            return Ok(None);
        }
        let start = p.start();
        let kind = if p.char_at(start) == Some('+') { VarianceKind::Plus } else { VarianceKind::Minus };
        p.next()?;
        Ok(Some(p.alloc(Variance { data: p.finish(start), kind })))
    }

    /// `{ ... }` or exact `{| ... |}` at the current brace.
    fn parse_object_type<'a>(p: &mut Parser<'a>, options: ObjectTypeOptions) -> PResult<&'a ObjectTypeAnnotation<'a>> {
        Self::with_anon_function_types(p, |p| Self::parse_object_type_inner(p, options))
    }

    fn parse_object_type_inner<'a>(
        p: &mut Parser<'a>,
        options: ObjectTypeOptions,
    ) -> PResult<&'a ObjectTypeAnnotation<'a>> {
        let start = p.start();
        let exact = p.is(TokenKind::BraceBarL);
        let end = if exact { TokenKind::BraceBarR } else { TokenKind::BraceR };
        p.next()?;

        let mut properties = Vec::new();
        let mut indexers = Vec::new();
        let mut call_properties = Vec::new();
        let mut inexact = false;

        while !p.is(end) {
            let member_start = p.start();
            let mut is_static = false;
            if options.allow_static && p.is_contextual("static") && !p.scanner.contains_esc() {
                let la = p.lookahead()?;
                if !matches!(la.kind, TokenKind::Colon | TokenKind::Question | TokenKind::ParenL | TokenKind::Lt) {
                    p.next()?;
                    is_static = true;
                }
            }
            let variance = Self::parse_variance(p)?;

            if p.eat(TokenKind::BracketL)? {
                let id = if p.token().is_keyword_or_name() && p.lookahead()?.kind == TokenKind::Colon {
                    let id = p.parse_identifier(true)?;
                    p.next()?;
                    Some(id)
                } else {
                    None
                };
                let key = Self::parse_type(p)?;
                p.expect(TokenKind::BracketR)?;
                p.expect(TokenKind::Colon)?;
                let value = Self::parse_type(p)?;
                indexers.push(&*p.alloc(ObjectTypeIndexer {
                    data: p.finish(member_start),
                    id,
                    key,
                    value,
                    is_static,
                    variance,
                }));
            } else if matches!(p.token(), TokenKind::ParenL | TokenKind::Lt) {
                let value = Self::parse_method_type(p, member_start)?;
                call_properties.push(&*p.alloc(ObjectTypeCallProperty { data: p.finish(member_start), value, is_static }));
            } else if p.eat(TokenKind::Ellipsis)? {
                if p.is(end) || matches!(p.token(), TokenKind::Comma | TokenKind::Semi) {
                    if !options.allow_inexact || exact {
                        p.raise(&messages::FLOW_INEXACT_INSIDE_EXACT, member_start, &[])?;
                    }
                    if !p.eat(TokenKind::Comma)? {
                        p.eat(TokenKind::Semi)?;
                    }
                    if !p.is(end) {
                        p.raise(&messages::FLOW_EXPLICIT_INEXACT_NOT_LAST, member_start, &[])?;
                    }
                    inexact = true;
                    continue;
                }
                let argument = Self::parse_type(p)?;
                properties.push(ObjectTypeMember::Spread(
                    p.alloc(ObjectTypeSpreadProperty { data: p.finish(member_start), argument }),
                ));
            } else {
                properties.push(ObjectTypeMember::Property(Self::parse_object_type_property(
                    p,
                    member_start,
                    is_static,
                    variance,
                )?));
            }

            if !p.eat(TokenKind::Semi)? && !p.eat(TokenKind::Comma)? && !p.is(end) {
                return Err(p.unexpected());
            }
        }
        p.expect(end)?;

        Ok(p.alloc(ObjectTypeAnnotation {
            data: p.finish(start),
            properties: p.alloc_vec(properties),
            indexers: p.alloc_vec(indexers),
            call_properties: p.alloc_vec(call_properties),
            exact,
            inexact,
        }))
    }

    fn parse_object_type_property<'a>(
        p: &mut Parser<'a>,
        start: usize,
        is_static: bool,
        variance: Option<&'a Variance>,
    ) -> PResult<&'a ObjectTypeProperty<'a>> {
        let mut kind = "init";
        if (p.is_contextual("get") || p.is_contextual("set")) && !p.scanner.contains_esc() {
            let la = p.lookahead()?;
            if la.kind.is_keyword_or_name() || matches!(la.kind, TokenKind::String | TokenKind::Num) {
                kind = if p.is_contextual("get") { "get" } else { "set" };
                p.next()?;
            }
        }
        let key = match p.token() {
            TokenKind::String => Expression::StringLiteral(p.parse_string_literal()?),
            TokenKind::Num => p.parse_literal_atom()?,
            _ => Expression::Identifier(p.parse_identifier(true)?),
        };
        if kind != "init" || matches!(p.token(), TokenKind::ParenL | TokenKind::Lt) {
            let value = FlowType::Function(Self::parse_method_type(p, start)?);
            return Ok(p.alloc(ObjectTypeProperty {
                data: p.finish(start),
                key,
                value,
                optional: false,
                is_static,
                method: kind == "init",
                kind,
                variance,
            }));
        }
        let optional = p.eat(TokenKind::Question)?;
        p.expect(TokenKind::Colon)?;
        let value = Self::parse_type(p)?;
        Ok(p.alloc(ObjectTypeProperty {
            data: p.finish(start),
            key,
            value,
            optional,
            is_static,
            method: false,
            kind,
            variance,
        }))
    }

    /// `<T>(x: T): U` of a method or call property.
    fn parse_method_type<'a>(p: &mut Parser<'a>, start: usize) -> PResult<&'a FunctionTypeAnnotation<'a>> {
        let type_parameters = if p.is(TokenKind::Lt) { Some(Self::parse_type_parameter_declaration(p)?) } else { None };
        p.expect(TokenKind::ParenL)?;
        Self::parse_function_type_rest(p, start, type_parameters, Vec::new(), TokenKind::Colon)
    }

    // ========================================================================
    // Type parameters and arguments
    // ========================================================================

    /// `<+T: Bound = Default>` at the current `<`.
    fn parse_type_parameter_declaration<'a>(p: &mut Parser<'a>) -> PResult<&'a FlowTypeParameterDeclaration<'a>> {
        let start = p.start();
        p.scanner.rescan_lt();
        p.in_type(|p| {
            p.expect(TokenKind::Lt)?;
            let mut params = Vec::new();
            while !p.is(TokenKind::Gt) {
                let param_start = p.start();
                let variance = Self::parse_variance(p)?;
                let name = p.parse_identifier(false)?.name;
                let bound = if p.is(TokenKind::Colon) { Some(Self::parse_type_annotation(p)?) } else { None };
                let default = if p.eat(TokenKind::Eq)? { Some(Self::parse_type(p)?) } else { None };
                params.push(FlowTypeParameter { data: p.finish(param_start), name, variance, bound, default });
                if !p.is(TokenKind::Gt) {
                    p.expect(TokenKind::Comma)?;
                }
            }
            p.expect(TokenKind::Gt)?;
            Ok(p.alloc(FlowTypeParameterDeclaration { data: p.finish(start), params: p.alloc_vec(params) }))
        })
    }

    /// `<A, B>` at the current `<`, in type or expression position.
    fn parse_type_argument_list<'a>(p: &mut Parser<'a>) -> PResult<&'a FlowTypeParameterInstantiation<'a>> {
        let start = p.start();
        p.scanner.rescan_lt();
        p.in_type(|p| {
            Self::with_anon_function_types(p, |p| {
                p.expect(TokenKind::Lt)?;
                let mut params = Vec::new();
                while !p.is(TokenKind::Gt) {
                    params.push(Self::parse_type(p)?);
                    if !p.is(TokenKind::Gt) {
                        p.expect(TokenKind::Comma)?;
                    }
                }
                p.expect(TokenKind::Gt)?;
                Ok(p.alloc(FlowTypeParameterInstantiation { data: p.finish(start), params: p.alloc_vec(params) }))
            })
        })
    }

    fn parse_type_arguments_opt<'a>(p: &mut Parser<'a>) -> PResult<Option<&'a FlowTypeParameterInstantiation<'a>>> {
        if !p.is(TokenKind::Lt) {
            return Ok(None);
        }
        Ok(Some(Self::parse_type_argument_list(p)?))
    }

    // ========================================================================
    // Expressions
    // ========================================================================

    /// `<T>(params): R => body` at the `<`, or at a tag start when JSX is on.
    fn parse_generic_arrow<'a>(p: &mut Parser<'a>, start: usize, is_async: bool) -> PResult<Expression<'a>> {
        if p.is(TokenKind::JsxTagStart) {
            p.scanner.pop_context();
            p.scanner.replace_token(TokenKind::Lt);
        }
        let type_parameters = Self::parse_type_parameter_declaration(p)?;
        let (_, params) = p.parse_function_params(false)?;
        let return_type = if p.is(TokenKind::Colon) { Some(p.parse_arrow_return_type()?) } else { None };
        if !p.is(TokenKind::Arrow) {
            return Err(p.unexpected());
        }
        if p.has_preceding_line_break() {
            return Err(p.error_at(&messages::LINE_TERMINATOR_BEFORE_ARROW, p.start(), &[]));
        }
        p.next()?;
        p.parse_arrow_expression(
            start,
            params.to_vec(),
            is_async,
            Some(TypeParameters::Flow(type_parameters)),
            return_type,
        )
    }

    // ========================================================================
    // Declarations
    // ========================================================================

    fn parse_declaration<'a>(p: &mut Parser<'a>, start: usize) -> PResult<Option<Statement<'a>>> {
        if !p.is(TokenKind::Name) || p.scanner.contains_esc() {
            return Ok(None);
        }
        let la = p.lookahead()?;
        let statement = match p.word() {
            "type" if la.kind == TokenKind::Name => Self::parse_type_alias(p, start, false)?,
            "opaque" if la.is_contextual("type") && !la.has_line_break_before => {
                p.next()?;
                Self::parse_opaque_type(p, start, false)?
            }
            "interface" if la.kind == TokenKind::Name => {
                p.next()?;
                Self::parse_interfaceish(p, start, InterfaceKind::InterfaceDeclaration)?
            }
            "declare" if !la.has_line_break_before && Self::starts_declare(p, &la) => {
                p.next()?;
                Self::parse_declare(p, start)?
            }
            _ => return Ok(None),
        };
        Ok(Some(statement))
    }

    fn starts_declare(p: &Parser<'_>, la: &esparse_scanner::Lookahead<'_>) -> bool {
        match la.kind {
            TokenKind::Class | TokenKind::Function | TokenKind::Var | TokenKind::Const => true,
            TokenKind::Name => {
                ["let", "type", "opaque", "interface"].iter().any(|word| la.is_contextual(word))
                    || (la.is_contextual("module") && p.char_at(la.end) == Some('.'))
            }
            _ => false,
        }
    }

    /// Everything after `declare`.
    fn parse_declare<'a>(p: &mut Parser<'a>, start: usize) -> PResult<Statement<'a>> {
        trace!(start, "flow declare");
        match p.token() {
            TokenKind::Class => {
                p.next()?;
                Self::parse_interfaceish(p, start, InterfaceKind::DeclareClass)
            }
            TokenKind::Function => Self::parse_declare_function(p, start),
            TokenKind::Var => Self::parse_declare_variable(p, start, BindingFlags::TYPE_VAR),
            TokenKind::Const => Self::parse_declare_variable(p, start, BindingFlags::TYPE_LEXICAL),
            _ => match p.word() {
                "let" => Self::parse_declare_variable(p, start, BindingFlags::TYPE_LEXICAL),
                "type" => Self::parse_type_alias(p, start, true),
                "opaque" => {
                    p.next()?;
                    Self::parse_opaque_type(p, start, true)
                }
                "interface" => {
                    p.next()?;
                    Self::parse_interfaceish(p, start, InterfaceKind::DeclareInterface)
                }
                "module" => {
                    p.next()?;
                    p.expect(TokenKind::Dot)?;
                    p.expect_contextual("exports")?;
                    let type_annotation = Self::parse_type_annotation(p)?;
                    p.semicolon()?;
                    let node = p.alloc(DeclareModuleExports { data: p.finish(start), type_annotation });
                    Ok(Statement::Extension(p.alloc(StatementExtension::FlowDeclareModuleExports(node))))
                }
                _ => Err(p.unexpected()),
            },
        }
    }

    /// `declare var x: T;` and its `let`/`const` forms.
    fn parse_declare_variable<'a>(p: &mut Parser<'a>, start: usize, binding: BindingFlags) -> PResult<Statement<'a>> {
        p.next()?;
        let id_start = p.start();
        let name = p.parse_identifier(false)?.name;
        p.declare_name(name, binding, id_start)?;
        let annotation = Self::parse_type_annotation(p)?;
        let id = p.alloc(Identifier {
            data: p.finish(id_start),
            name,
            optional: false,
            type_annotation: Some(TypeAnnotation::Flow(annotation)),
        });
        p.semicolon()?;
        let node = p.alloc(DeclareVariable { data: p.finish(start), id });
        Ok(Statement::Extension(p.alloc(StatementExtension::FlowDeclareVariable(node))))
    }

    /// `declare function f<T>(x: T): U;`. The signature becomes the
    /// identifier's function type annotation.
    fn parse_declare_function<'a>(p: &mut Parser<'a>, start: usize) -> PResult<Statement<'a>> {
        p.next()?;
        let id_start = p.start();
        let name = p.parse_identifier(false)?.name;
        p.declare_name(name, BindingFlags::TYPE_FLOW_DECLARE_FN, id_start)?;
        let type_start = p.start();
        let function = p.in_type(|p| {
            let type_parameters =
                if p.is(TokenKind::Lt) { Some(Self::parse_type_parameter_declaration(p)?) } else { None };
            p.expect(TokenKind::ParenL)?;
            Self::parse_function_type_rest(p, type_start, type_parameters, Vec::new(), TokenKind::Colon)
        })?;
        let annotation =
            p.alloc(FlowTypeAnnotation { data: p.finish(type_start), type_annotation: FlowType::Function(function) });
        let id = p.alloc(Identifier {
            data: p.finish(id_start),
            name,
            optional: false,
            type_annotation: Some(TypeAnnotation::Flow(annotation)),
        });
        p.semicolon()?;
        let node = p.alloc(DeclareFunction { data: p.finish(start), id });
        Ok(Statement::Extension(p.alloc(StatementExtension::FlowDeclareFunction(node))))
    }

    /// A declared type name: checked against the reserved types and bound
    /// lexically.
    fn parse_type_declaration_id<'a>(p: &mut Parser<'a>, binding: BindingFlags) -> PResult<&'a Identifier<'a>> {
        let pos = p.start();
        let word = p.word();
        Self::check_reserved_type(p, word, pos, true)?;
        let id = p.parse_identifier(false)?;
        p.declare_name(id.name, binding, pos)?;
        Ok(id)
    }

    /// `type A<T> = T;` at the `type` word.
    fn parse_type_alias<'a>(p: &mut Parser<'a>, start: usize, declare: bool) -> PResult<Statement<'a>> {
        p.next()?;
        let id = Self::parse_type_declaration_id(p, BindingFlags::TYPE_LEXICAL)?;
        let type_parameters = if p.is(TokenKind::Lt) { Some(Self::parse_type_parameter_declaration(p)?) } else { None };
        let right = p.in_type(|p| {
            p.expect(TokenKind::Eq)?;
            Self::parse_type(p)
        })?;
        p.semicolon()?;
        let kind = if declare { TypeAliasKind::DeclareTypeAlias } else { TypeAliasKind::TypeAlias };
        let alias = p.alloc(TypeAlias { kind, data: p.finish(start), id, type_parameters, right });
        Ok(Statement::Extension(p.alloc(StatementExtension::FlowTypeAlias(alias))))
    }

    /// `opaque type A: Super = T;` at the `type` word. The declared form
    /// has no right-hand side.
    fn parse_opaque_type<'a>(p: &mut Parser<'a>, start: usize, declare: bool) -> PResult<Statement<'a>> {
        p.next()?;
        let id = Self::parse_type_declaration_id(p, BindingFlags::TYPE_LEXICAL)?;
        let type_parameters = if p.is(TokenKind::Lt) { Some(Self::parse_type_parameter_declaration(p)?) } else { None };
        let supertype = if p.is(TokenKind::Colon) { Some(Self::parse_type_annotation(p)?.type_annotation) } else { None };
        let impltype = if declare {
            None
        } else {
            Some(p.in_type(|p| {
                p.expect(TokenKind::Eq)?;
                Self::parse_type(p)
            })?)
        };
        p.semicolon()?;
        let kind = if declare { OpaqueTypeKind::DeclareOpaqueType } else { OpaqueTypeKind::OpaqueType };
        let node = p.alloc(OpaqueType { kind, data: p.finish(start), id, type_parameters, supertype, impltype });
        Ok(Statement::Extension(p.alloc(StatementExtension::FlowOpaqueType(node))))
    }

    /// `interface`, `declare interface` and `declare class`, after the
    /// introducing keyword.
    fn parse_interfaceish<'a>(p: &mut Parser<'a>, start: usize, kind: InterfaceKind) -> PResult<Statement<'a>> {
        let is_class = kind == InterfaceKind::DeclareClass;
        let binding = if is_class { BindingFlags::TYPE_FUNCTION } else { BindingFlags::TYPE_LEXICAL };
        let id = Self::parse_type_declaration_id(p, binding)?;
        let type_parameters = if p.is(TokenKind::Lt) { Some(Self::parse_type_parameter_declaration(p)?) } else { None };

        let mut extends = Vec::new();
        if p.eat(TokenKind::Extends)? {
            loop {
                extends.push(Self::parse_interface_extends(p)?);
                if is_class || !p.eat(TokenKind::Comma)? {
                    break;
                }
            }
        }
        let implements = if is_class && p.eat_contextual("implements")? { Self::parse_implements_list(p)? } else { Vec::new() };

        let options = ObjectTypeOptions { allow_static: is_class, allow_inexact: false };
        let body = p.in_type(|p| Self::parse_object_type(p, options))?;
        let node = p.alloc(InterfaceDeclaration {
            kind,
            data: p.finish(start),
            id,
            type_parameters,
            extends: p.alloc_vec(extends),
            implements: p.alloc_vec(implements),
            body,
        });
        Ok(Statement::Extension(p.alloc(StatementExtension::FlowInterface(node))))
    }

    fn parse_interface_extends<'a>(p: &mut Parser<'a>) -> PResult<&'a InterfaceExtends<'a>> {
        let start = p.start();
        let id = Self::parse_qualified_type_id(p, true)?;
        let type_parameters = Self::parse_type_arguments_opt(p)?;
        Ok(p.alloc(InterfaceExtends { data: p.finish(start), id, type_parameters }))
    }

    /// `A<T>, B` after `implements`.
    fn parse_implements_list<'a>(p: &mut Parser<'a>) -> PResult<Vec<&'a flow::ClassImplements<'a>>> {
        let mut list = Vec::new();
        loop {
            let start = p.start();
            let word = p.word();
            Self::check_reserved_type(p, word, start, false)?;
            let id = p.parse_identifier(true)?;
            let type_parameters = Self::parse_type_arguments_opt(p)?;
            list.push(&*p.alloc(flow::ClassImplements { data: p.finish(start), id, type_parameters }));
            if !p.eat(TokenKind::Comma)? {
                break;
            }
        }
        Ok(list)
    }
}

impl Overlay for FlowOverlay {
    fn name(&self) -> &'static str {
        "flow"
    }

    fn lexer_features(&self) -> LexerFeatures {
        LexerFeatures::FLOW
    }

    // ========================================================================
    // Expressions
    // ========================================================================

    fn parse_maybe_assign<'a>(
        &self,
        p: &mut Parser<'a>,
        _layer: Layer,
        _errors: Option<&mut ExpressionErrors>,
    ) -> PResult<Option<Expression<'a>>> {
        if !matches!(p.token(), TokenKind::Lt | TokenKind::JsxTagStart) {
            return Ok(None);
        }
        let start = p.start();
        p.try_parse(|p| Self::parse_generic_arrow(p, start, false))
    }

    /// `(x?: T) => x`: leave the `?` for the list item.
    fn parse_conditional<'a>(
        &self,
        p: &mut Parser<'a>,
        _layer: Layer,
        expr: Expression<'a>,
        _start: usize,
        errors: Option<&mut ExpressionErrors>,
    ) -> PResult<Option<Expression<'a>>> {
        let Some(errors) = errors else { return Ok(None) };
        if !p.state.maybe_in_arrow_parameters || !p.is(TokenKind::Question) {
            return Ok(None);
        }
        if !matches!(p.lookahead_char(), Some(',' | ')' | ':' | '=')) {
            return Ok(None);
        }
        if errors.optional_parameters.is_none() {
            errors.optional_parameters = Some(p.start());
        }
        Ok(Some(expr))
    }

    /// `f<T>(x)` and `async <T>(x) => x`.
    fn parse_subscript<'a>(
        &self,
        p: &mut Parser<'a>,
        _layer: Layer,
        base: Expression<'a>,
        start: usize,
        state: &mut SubscriptState,
    ) -> PResult<Option<Expression<'a>>> {
        if state.no_calls || !matches!(p.token(), TokenKind::Lt | TokenKind::BitShiftL) {
            return Ok(None);
        }
        if state.maybe_async_arrow {
            if let Some(arrow) = p.try_parse(|p| Self::parse_generic_arrow(p, start, true))? {
                state.stop = true;
                return Ok(Some(arrow));
            }
        }
        let outer = *state;
        let result = p.try_parse(|p| {
            let type_arguments = Self::parse_type_argument_list(p)?;
            if !p.is(TokenKind::ParenL) {
                return Err(p.unexpected());
            }
            let mut inner = outer;
            let call = p.parse_call_tail(base, start, &mut inner, false, Some(TypeArguments::Flow(type_arguments)))?;
            Ok((call, inner))
        })?;
        Ok(result.map(|(call, inner)| {
            *state = inner;
            call
        }))
    }

    /// `(expr: T)` becomes a type cast; `(x?: T)` marks an optional
    /// parameter.
    fn parse_paren_item<'a>(
        &self,
        p: &mut Parser<'a>,
        _layer: Layer,
        expr: Expression<'a>,
        start: usize,
    ) -> PResult<Option<Expression<'a>>> {
        let optional = p.eat(TokenKind::Question)?;
        let expr = match expr {
            Expression::Identifier(id) if optional => Expression::Identifier(p.alloc(Identifier {
                data: p.finish(span_start(id.data.span)),
                name: id.name,
                optional: true,
                type_annotation: None,
            })),
            _ if optional => {
                p.raise(&messages::FLOW_OPTIONAL_BINDING_PATTERN, span_start(expr.span()), &[])?;
                expr
            }
            _ => expr,
        };
        if !p.is(TokenKind::Colon) {
            return Ok(optional.then_some(expr));
        }
        let type_annotation = Self::parse_type_annotation(p)?;
        let cast = p.alloc(TypeCastExpression { data: p.finish(start), expression: expr, type_annotation });
        Ok(Some(Expression::Extension(p.alloc(ExpressionExtension::FlowTypeCast(cast)))))
    }

    fn parse_type_arguments<'a>(&self, p: &mut Parser<'a>, _layer: Layer) -> PResult<Option<TypeArguments<'a>>> {
        Ok(Some(TypeArguments::Flow(Self::parse_type_argument_list(p)?)))
    }

    // ========================================================================
    // Patterns and functions
    // ========================================================================

    fn parse_binding_annotation<'a>(
        &self,
        p: &mut Parser<'a>,
        _layer: Layer,
        pattern: Pattern<'a>,
        position: BindingPosition,
    ) -> PResult<Option<(Pattern<'a>, bool)>> {
        let optional = position == BindingPosition::Parameter && p.eat(TokenKind::Question)?;
        if optional && !matches!(pattern, Pattern::Identifier(_)) {
            p.raise(&messages::FLOW_OPTIONAL_BINDING_PATTERN, span_start(pattern.span()), &[])?;
        }
        let annotation =
            if p.is(TokenKind::Colon) { Some(TypeAnnotation::Flow(Self::parse_type_annotation(p)?)) } else { None };
        if !optional && annotation.is_none() {
            return Ok(None);
        }
        Ok(Some((annotate_pattern(p, pattern, optional, annotation, p.last_end()), false)))
    }

    fn parse_type_parameters<'a>(&self, p: &mut Parser<'a>, _layer: Layer) -> PResult<Option<TypeParameters<'a>>> {
        Ok(Some(TypeParameters::Flow(Self::parse_type_parameter_declaration(p)?)))
    }

    fn parse_return_type<'a>(&self, p: &mut Parser<'a>, _layer: Layer) -> PResult<Option<TypeAnnotation<'a>>> {
        Ok(Some(TypeAnnotation::Flow(Self::parse_type_annotation(p)?)))
    }

    // ========================================================================
    // Classes
    // ========================================================================

    fn parse_class_implements<'a>(
        &self,
        p: &mut Parser<'a>,
        _layer: Layer,
    ) -> PResult<Option<&'a [ClassImplements<'a>]>> {
        if !p.is_contextual("implements") || p.scanner.contains_esc() {
            return Ok(None);
        }
        p.next()?;
        let list = Self::parse_implements_list(p)?;
        Ok(Some(p.alloc_vec(list.into_iter().map(ClassImplements::Flow).collect())))
    }

    /// `declare` fields and `+`/`-` variance.
    fn parse_class_member_modifiers<'a>(
        &self,
        p: &mut Parser<'a>,
        _layer: Layer,
        modifiers: &mut MemberModifiers<'a>,
    ) -> PResult<Option<()>> {
        let mut any = false;
        if p.is_contextual("declare") && !p.scanner.contains_esc() {
            let la = p.lookahead()?;
            if !la.has_line_break_before && (la.kind.is_keyword_or_name() || la.kind == TokenKind::PlusMin) {
                p.next()?;
                modifiers.declare = true;
                any = true;
            }
        }
        if p.is_contextual("static") && !p.scanner.contains_esc() && p.lookahead()?.kind == TokenKind::PlusMin {
            p.next()?;
            modifiers.is_static = true;
            any = true;
        }
        if let Some(variance) = Self::parse_variance(p)? {
            modifiers.variance = Some(variance);
            any = true;
        }
        Ok(any.then_some(()))
    }

    fn parse_class_property_type<'a>(&self, p: &mut Parser<'a>, _layer: Layer) -> PResult<Option<PropertyTypeInfo<'a>>> {
        if !p.is(TokenKind::Colon) {
            return Ok(None);
        }
        let type_annotation = Some(TypeAnnotation::Flow(Self::parse_type_annotation(p)?));
        Ok(Some(PropertyTypeInfo { type_annotation, ..PropertyTypeInfo::default() }))
    }

    // ========================================================================
    // Statements and modules
    // ========================================================================

    fn parse_statement<'a>(
        &self,
        p: &mut Parser<'a>,
        _layer: Layer,
        context: StatementContext,
    ) -> PResult<Option<Statement<'a>>> {
        if !context.contains(StatementContext::ALLOW_DECLARATION) {
            return Ok(None);
        }
        let start = p.start();
        Self::parse_declaration(p, start)
    }

    fn parse_export_declaration<'a>(&self, p: &mut Parser<'a>, _layer: Layer) -> PResult<Option<Statement<'a>>> {
        let start = p.start();
        Self::parse_declaration(p, start)
    }

    fn parse_import_kind<'a>(&self, p: &mut Parser<'a>, _layer: Layer, in_specifier: bool) -> PResult<Option<ImportKind>> {
        let kind = if p.is(TokenKind::Typeof) {
            ImportKind::Typeof
        } else if p.is_contextual("type") && !p.scanner.contains_esc() {
            ImportKind::Type
        } else {
            return Ok(None);
        };
        if !import_kind_applies(p, in_specifier)? {
            return Ok(None);
        }
        p.next()?;
        Ok(Some(kind))
    }

    // ========================================================================
    // Assignment targets
    // ========================================================================

    fn to_assignable_extension<'a>(
        &self,
        p: &mut Parser<'a>,
        _layer: Layer,
        ext: &'a ExpressionExtension<'a>,
        is_binding: bool,
    ) -> PResult<Option<Pattern<'a>>> {
        let ExpressionExtension::FlowTypeCast(cast) = *ext else { return Ok(None) };
        let inner = p.to_assignable(cast.expression, !is_binding)?;
        let annotation = Some(TypeAnnotation::Flow(cast.type_annotation));
        Ok(Some(annotate_pattern(p, inner, false, annotation, span_end(cast.data.span))))
    }
}

#[cfg(test)]
mod tests {
    use crate::options::{ParserOptions, SourceTypeOption};
    use bumpalo::Bump;
    use esparse_ast::flow::*;
    use esparse_ast::{
        ClassBodyOrPlaceholder, ClassMember, Expression, ExpressionExtension, ImportKind, ModuleItem, Pattern,
        Statement, StatementExtension, TypeAnnotation,
    };

    fn options() -> ParserOptions {
        ParserOptions::default().with_plugin("flow")
    }

    fn reason(src: &str) -> Option<&'static str> {
        let arena = Bump::new();
        let err = crate::parse(&arena, src, &options()).expect_err("should fail");
        err.diagnostic().map(|d| d.reason_code())
    }

    fn flow_type<'a>(annotation: Option<TypeAnnotation<'a>>) -> FlowType<'a> {
        match annotation {
            Some(TypeAnnotation::Flow(annotation)) => annotation.type_annotation,
            other => panic!("expected a Flow annotation, got {other:?}"),
        }
    }

    fn alias_right<'a>(stmt: &Statement<'a>) -> FlowType<'a> {
        match stmt {
            Statement::Extension(StatementExtension::FlowTypeAlias(alias)) => alias.right,
            other => panic!("expected a type alias, got {other:?}"),
        }
    }

    // ========================================================================
    // Annotations and types
    // ========================================================================

    #[test]
    fn test_function_annotations() {
        let arena = Bump::new();
        let src = "function f(x: ?number, y?: string): Array<string> { return [] }";
        let file = crate::parse(&arena, src, &options()).unwrap();
        let Statement::Function(f) = file.program.body[0] else { panic!("function") };
        let Pattern::Identifier(x) = f.params[0] else { panic!("x") };
        assert!(matches!(flow_type(x.type_annotation), FlowType::Nullable(_)));
        let Pattern::Identifier(y) = f.params[1] else { panic!("y") };
        assert!(y.optional);
        match flow_type(f.return_type) {
            FlowType::Generic(generic) => assert_eq!(generic.type_parameters.map(|args| args.params.len()), Some(1)),
            other => panic!("{other:?}"),
        }
    }

    #[test]
    fn test_type_grammar() {
        let arena = Bump::new();
        let src = "type A = {| a: number, b?: string |} | ((x: number) => void) | string[] | typeof x | 'lit' | -1 | true | [number, string] | A.B<C> & D;";
        let file = crate::parse(&arena, src, &options()).unwrap();
        let FlowType::Union(union) = alias_right(&file.program.body[0]) else { panic!("union") };
        assert!(matches!(union.types[0], FlowType::Object(object) if object.exact && object.properties.len() == 2));
        assert!(matches!(union.types[1], FlowType::Function(function) if function.params.len() == 1));
        assert!(matches!(union.types[2], FlowType::Array(_)));
        assert!(matches!(union.types[3], FlowType::Typeof(_)));
        assert!(matches!(union.types[4], FlowType::StringLiteral(lit) if lit.value == "lit"));
        assert!(matches!(union.types[5], FlowType::NumberLiteral(lit) if lit.value == -1.0 && lit.raw == "-1"));
        assert!(matches!(union.types[6], FlowType::BooleanLiteral(lit) if lit.value));
        assert!(matches!(union.types[7], FlowType::Tuple(tuple) if tuple.types.len() == 2));
        assert!(matches!(union.types[8], FlowType::Intersection(_)));
    }

    #[test]
    fn test_object_type_members() {
        let arena = Bump::new();
        let src = "type O = { ...B, +ro: number, [k: string]: mixed, (): void, m(x: T): U, get g(): number, ... };";
        let file = crate::parse(&arena, src, &options()).unwrap();
        let FlowType::Object(object) = alias_right(&file.program.body[0]) else { panic!("object") };
        assert!(object.inexact);
        assert_eq!(object.indexers.len(), 1);
        assert_eq!(object.call_properties.len(), 1);
        assert!(matches!(object.properties[0], ObjectTypeMember::Spread(_)));
        match object.properties[1] {
            ObjectTypeMember::Property(prop) => {
                assert_eq!(prop.variance.map(|v| v.kind), Some(VarianceKind::Plus));
            }
            other => panic!("{other:?}"),
        }
        assert!(matches!(object.properties[2], ObjectTypeMember::Property(prop) if prop.method));
        assert!(matches!(object.properties[3], ObjectTypeMember::Property(prop) if prop.kind == "get"));
    }

    #[test]
    fn test_inexact_errors() {
        assert_eq!(reason("type A = {| a: number, ... |};"), Some("InexactInsideExact"));
        assert_eq!(reason("type B = { ..., a: number };"), Some("UnexpectedExplicitInexactInObject"));
        assert_eq!(reason("type number = string;"), Some("AssignReservedType"));
    }

    // ========================================================================
    // Declarations
    // ========================================================================

    #[test]
    fn test_opaque_interface_and_declare_forms() {
        let arena = Bump::new();
        let src = "opaque type Id: string = string;\n\
                   interface Shape extends Base { area(): number }\n\
                   declare var v: number;\n\
                   declare function f(x: number): string;\n\
                   declare class C extends D { static m(): void; p: string }\n\
                   declare type T = number;\n\
                   declare opaque type O;\n\
                   declare module.exports: { a: number };";
        let file = crate::parse(&arena, src, &options()).unwrap();
        let body = file.program.body;
        assert!(matches!(body[0], Statement::Extension(StatementExtension::FlowOpaqueType(o)) if o.supertype.is_some() && o.impltype.is_some()));
        assert!(matches!(body[1], Statement::Extension(StatementExtension::FlowInterface(i)) if i.kind == InterfaceKind::InterfaceDeclaration && i.extends.len() == 1));
        match body[2] {
            Statement::Extension(StatementExtension::FlowDeclareVariable(v)) => {
                assert!(matches!(flow_type(v.id.type_annotation), FlowType::Keyword(k) if k.kind == FlowKeywordKind::Number));
            }
            other => panic!("{other:?}"),
        }
        match body[3] {
            Statement::Extension(StatementExtension::FlowDeclareFunction(f)) => {
                assert!(matches!(flow_type(f.id.type_annotation), FlowType::Function(function) if function.params.len() == 1));
            }
            other => panic!("{other:?}"),
        }
        match body[4] {
            Statement::Extension(StatementExtension::FlowInterface(class)) => {
                assert_eq!(class.kind, InterfaceKind::DeclareClass);
                let ObjectTypeMember::Property(m) = class.body.properties[0] else { panic!("method") };
                assert!(m.is_static && m.method);
            }
            other => panic!("{other:?}"),
        }
        assert!(matches!(body[5], Statement::Extension(StatementExtension::FlowTypeAlias(a)) if a.kind == TypeAliasKind::DeclareTypeAlias));
        assert!(matches!(body[6], Statement::Extension(StatementExtension::FlowOpaqueType(o)) if o.impltype.is_none()));
        assert!(matches!(body[7], Statement::Extension(StatementExtension::FlowDeclareModuleExports(_))));
    }

    #[test]
    fn test_type_as_identifier() {
        let arena = Bump::new();
        let file = crate::parse(&arena, "type = 1; declare\nfoo;", &options()).unwrap();
        assert_eq!(file.program.body.len(), 3);
    }

    // ========================================================================
    // Expressions and classes
    // ========================================================================

    #[test]
    fn test_type_cast() {
        let arena = Bump::new();
        let file = crate::parse(&arena, "(x: any);", &options()).unwrap();
        let Statement::Expression(stmt) = file.program.body[0] else { panic!("statement") };
        assert!(matches!(stmt.expression, Expression::Extension(ExpressionExtension::FlowTypeCast(_))));
        assert_eq!(reason("f(x: any);"), Some("TypeCastInPattern"));
    }

    #[test]
    fn test_arrows() {
        let arena = Bump::new();
        let src = "const f = <T>(x: T): T => x;\nconst g = (x: number, y?: string): string => String(x);\nconst h = (cb: number => void) => cb;";
        let file = crate::parse(&arena, src, &options()).unwrap();
        let init = |i: usize| match file.program.body[i] {
            Statement::Variable(var) => var.declarations[0].init,
            ref other => panic!("{other:?}"),
        };
        assert!(matches!(init(0), Some(Expression::ArrowFunction(arrow)) if arrow.type_parameters.is_some()));
        match init(1) {
            Some(Expression::ArrowFunction(arrow)) => {
                assert!(matches!(arrow.params[1], Pattern::Identifier(id) if id.optional));
                assert!(matches!(flow_type(arrow.return_type), FlowType::Keyword(_)));
            }
            other => panic!("{other:?}"),
        }
        match init(2) {
            Some(Expression::ArrowFunction(arrow)) => {
                let Pattern::Identifier(cb) = arrow.params[0] else { panic!("cb") };
                assert!(matches!(flow_type(cb.type_annotation), FlowType::Function(_)));
            }
            other => panic!("{other:?}"),
        }
    }

    #[test]
    fn test_generic_arrow_with_jsx() {
        let arena = Bump::new();
        let options = ParserOptions::default().with_plugin("flow").with_plugin("jsx");
        let file = crate::parse(&arena, "const f = <T>(x: T) => x;\nconst e = <div />;", &options).unwrap();
        let Statement::Variable(var) = file.program.body[0] else { panic!("variable") };
        assert!(matches!(var.declarations[0].init, Some(Expression::ArrowFunction(_))));
        let Statement::Variable(var) = file.program.body[1] else { panic!("variable") };
        assert!(matches!(var.declarations[0].init, Some(Expression::Extension(_))));
    }

    #[test]
    fn test_generic_call() {
        let arena = Bump::new();
        let file = crate::parse(&arena, "f<string>(x);\nnew C<number>();", &options()).unwrap();
        let Statement::Expression(stmt) = file.program.body[0] else { panic!("statement") };
        assert!(matches!(stmt.expression, Expression::Call(call) if call.type_parameters.is_some()));
        let Statement::Expression(stmt) = file.program.body[1] else { panic!("statement") };
        assert!(matches!(stmt.expression, Expression::New(new) if new.type_parameters.is_some()));
    }

    #[test]
    fn test_class_annotations() {
        let arena = Bump::new();
        let src = "class A<+T> extends B<T> implements I<T>, J {\n  +x: T;\n  declare y: number;\n  static +z: string = '';\n  m<U>(u: U): void {}\n}";
        let file = crate::parse(&arena, src, &options()).unwrap();
        let Statement::Class(class) = file.program.body[0] else { panic!("class") };
        assert_eq!(class.implements.len(), 2);
        assert!(class.super_type_parameters.is_some());
        let ClassBodyOrPlaceholder::Body(body) = class.body else { panic!("body") };
        match body.body[0] {
            ClassMember::Property(prop) => {
                assert_eq!(prop.variance.map(|v| v.kind), Some(VarianceKind::Plus));
                assert!(prop.type_annotation.is_some());
            }
            other => panic!("{other:?}"),
        }
        assert!(matches!(body.body[1], ClassMember::Property(prop) if prop.declare));
        assert!(matches!(body.body[2], ClassMember::Property(prop) if prop.is_static && prop.variance.is_some()));
        assert!(matches!(body.body[3], ClassMember::Method(method) if method.type_parameters.is_some()));
    }

    #[test]
    fn test_import_kinds() {
        let arena = Bump::new();
        let options = ParserOptions { source_type: SourceTypeOption::Module, ..options() };
        let src = "import type { A } from 'a';\nimport typeof B from 'b';\nimport { type C, typeof D } from 'c';\nexport type E = number;";
        let file = crate::parse(&arena, src, &options).unwrap();
        let kinds: Vec<_> = file
            .program
            .body
            .iter()
            .map(|stmt| match stmt {
                Statement::Module(ModuleItem::Import(decl)) => decl.import_kind,
                Statement::Module(ModuleItem::ExportNamed(decl)) => decl.export_kind,
                other => panic!("{other:?}"),
            })
            .collect();
        assert_eq!(kinds, vec![Some(ImportKind::Type), Some(ImportKind::Typeof), Some(ImportKind::Value), Some(ImportKind::Type)]);
    }
}
