//! The `typescript` plugin: type annotations, the type grammar, type-level
//! expressions and the declaration forms TypeScript adds.

use super::{annotate_pattern, import_kind_applies, Layer, Overlay};
use crate::class::{ClassHead, MemberModifiers, PropertyTypeInfo};
use crate::expression::{ExpressionErrors, SubscriptState};
use crate::lval::{BindingPosition, ListFlags};
use crate::options::Plugins;
use crate::parser::{PResult, Parser};
use crate::statement::{FunctionFlags, StatementContext};
use crate::utilities::{span_end, span_start};
use esparse_ast::ts::*;
use esparse_ast::*;
use esparse_diagnostics::messages;
use esparse_scope::{BindingFlags, ParamFlags, ScopeFlags};
use tracing::trace;

pub(crate) struct TypeScriptOverlay;

fn accessibility_text(accessibility: Accessibility) -> &'static str {
    match accessibility {
        Accessibility::Public => "public",
        Accessibility::Private => "private",
        Accessibility::Protected => "protected",
    }
}

/// Tokens that may follow a modifier keyword when it really is one.
fn can_follow_modifier(kind: TokenKind) -> bool {
    kind.is_keyword_or_name()
        || matches!(
            kind,
            TokenKind::BracketL
                | TokenKind::BraceL
                | TokenKind::Star
                | TokenKind::Ellipsis
                | TokenKind::PrivateName
                | TokenKind::String
                | TokenKind::Num
                | TokenKind::BigInt
        )
}

impl TypeScriptOverlay {
    // ========================================================================
    // Annotations
    // ========================================================================

    /// `: T` at the current colon. Return positions also admit type
    /// predicates.
    fn parse_type_annotation<'a>(p: &mut Parser<'a>, allow_predicate: bool) -> PResult<&'a TsTypeAnnotation<'a>> {
        let start = p.start();
        p.in_type(|p| {
            p.expect(TokenKind::Colon)?;
            let type_annotation = Self::with_conditional_types(p, true, |p| {
                if allow_predicate {
                    Self::parse_type_or_predicate(p)
                } else {
                    Self::parse_type(p)
                }
            })?;
            Ok(p.alloc(TsTypeAnnotation { data: p.finish(start), type_annotation }))
        })
    }

    fn with_conditional_types<'a, T>(
        p: &mut Parser<'a>,
        allowed: bool,
        f: impl FnOnce(&mut Parser<'a>) -> PResult<T>,
    ) -> PResult<T> {
        let old = std::mem::replace(&mut p.state.in_disallow_conditional_types, !allowed);
        let result = f(p);
        p.state.in_disallow_conditional_types = old;
        result
    }

    fn parse_nested_type<'a>(p: &mut Parser<'a>) -> PResult<TsType<'a>> {
        Self::with_conditional_types(p, true, Self::parse_type)
    }

    /// A type, or `const` after `as` and inside `<...>` assertions.
    fn parse_type_or_const<'a>(p: &mut Parser<'a>) -> PResult<TsType<'a>> {
        if !p.is(TokenKind::Const) {
            return Self::parse_type(p);
        }
        let start = p.start();
        let id = p.parse_identifier(true)?;
        Ok(TsType::TypeReference(p.alloc(TsTypeReference {
            data: p.finish(start),
            type_name: TsEntityName::Identifier(id),
            type_parameters: None,
        })))
    }

    // ========================================================================
    // Types
    // ========================================================================

    fn parse_type<'a>(p: &mut Parser<'a>) -> PResult<TsType<'a>> {
        p.with_recursion_guard(|p| {
            let start = p.start();
            let check_type = Self::parse_non_conditional_type(p)?;
            if p.state.in_disallow_conditional_types || p.has_preceding_line_break() || !p.is(TokenKind::Extends) {
                return Ok(check_type);
            }
            p.next()?;
            let extends_type = Self::with_conditional_types(p, false, Self::parse_non_conditional_type)?;
            p.expect(TokenKind::Question)?;
            let true_type = Self::parse_nested_type(p)?;
            p.expect(TokenKind::Colon)?;
            let false_type = Self::parse_nested_type(p)?;
            Ok(TsType::Conditional(p.alloc(TsConditionalType {
                data: p.finish(start),
                check_type,
                extends_type,
                true_type,
                false_type,
            })))
        })
    }

    fn parse_non_conditional_type<'a>(p: &mut Parser<'a>) -> PResult<TsType<'a>> {
        if Self::is_start_of_function_type(p)? {
            return Self::parse_function_type(p, TsFunctionTypeKind::Function);
        }
        if p.is(TokenKind::New) || (p.is_contextual("abstract") && p.lookahead()?.kind == TokenKind::New) {
            return Self::parse_function_type(p, TsFunctionTypeKind::Constructor);
        }
        Self::parse_union_type(p)
    }

    fn is_start_of_function_type(p: &mut Parser<'_>) -> PResult<bool> {
        if p.is(TokenKind::Lt) {
            return Ok(true);
        }
        if !p.is(TokenKind::ParenL) {
            return Ok(false);
        }
        let checkpoint = p.checkpoint();
        let result = Self::skip_function_type_head(p);
        p.restore(checkpoint);
        Ok(result.unwrap_or(false))
    }

    /// After `(`: whether this can only be a parameter list.
    fn skip_function_type_head(p: &mut Parser<'_>) -> PResult<bool> {
        p.next()?;
        if matches!(p.token(), TokenKind::ParenR | TokenKind::Ellipsis) {
            return Ok(true);
        }
        let skipped_parameter = if p.token().is_keyword_or_name() {
            p.next()?;
            true
        } else if matches!(p.token(), TokenKind::BraceL | TokenKind::BracketL) {
            p.try_parse(|p| p.parse_binding_atom())?.is_some()
        } else {
            false
        };
        if !skipped_parameter {
            return Ok(false);
        }
        if matches!(p.token(), TokenKind::Colon | TokenKind::Comma | TokenKind::Question | TokenKind::Eq) {
            return Ok(true);
        }
        Ok(p.eat(TokenKind::ParenR)? && p.is(TokenKind::Arrow))
    }

    fn parse_function_type<'a>(p: &mut Parser<'a>, kind: TsFunctionTypeKind) -> PResult<TsType<'a>> {
        let start = p.start();
        let mut is_abstract = false;
        if kind == TsFunctionTypeKind::Constructor {
            is_abstract = p.eat_contextual("abstract")?;
            p.expect(TokenKind::New)?;
        }
        let type_parameters = Self::parse_type_parameters_opt(p)?;
        let parameters = Self::parse_signature_params(p)?;
        let return_start = p.start();
        p.expect(TokenKind::Arrow)?;
        let return_type = Self::parse_type_or_predicate(p)?;
        let type_annotation = p.alloc(TsTypeAnnotation { data: p.finish(return_start), type_annotation: return_type });
        Ok(TsType::Function(p.alloc(TsFunctionType {
            kind,
            data: p.finish(start),
            type_parameters,
            parameters,
            type_annotation: Some(type_annotation),
            is_abstract,
        })))
    }

    /// `(a: T, b?: U)` of a signature.
    fn parse_signature_params<'a>(p: &mut Parser<'a>) -> PResult<&'a [Pattern<'a>]> {
        p.expect(TokenKind::ParenL)?;
        let old_in_parameters = std::mem::replace(&mut p.state.in_parameters, true);
        let params = p.parse_binding_list(TokenKind::ParenR, ')', ListFlags::IS_FUNCTION_PARAMS);
        p.state.in_parameters = old_in_parameters;
        let params: Vec<Pattern<'a>> = params?.into_iter().flatten().collect();
        Ok(p.alloc_vec(params))
    }

    /// A return type: `x is T`, `asserts x`, `asserts x is T` or a type.
    fn parse_type_or_predicate<'a>(p: &mut Parser<'a>) -> PResult<TsType<'a>> {
        let start = p.start();
        if p.is_contextual("asserts") && !p.scanner.contains_esc() {
            let la = p.lookahead()?;
            if la.kind.is_keyword_or_name() && !la.has_line_break_before && !la.is_contextual("is") {
                p.next()?;
                let parameter_name = Self::parse_predicate_name(p)?;
                let type_annotation = Self::parse_predicate_type(p)?;
                return Ok(TsType::TypePredicate(p.alloc(TsTypePredicate {
                    data: p.finish(start),
                    parameter_name,
                    type_annotation,
                    asserts: true,
                })));
            }
        }
        if p.token().is_keyword_or_name() {
            let la = p.lookahead()?;
            if la.is_contextual("is") && !la.has_line_break_before {
                let parameter_name = Self::parse_predicate_name(p)?;
                let type_annotation = Self::parse_predicate_type(p)?;
                return Ok(TsType::TypePredicate(p.alloc(TsTypePredicate {
                    data: p.finish(start),
                    parameter_name,
                    type_annotation,
                    asserts: false,
                })));
            }
        }
        Self::parse_type(p)
    }

    fn parse_predicate_name<'a>(p: &mut Parser<'a>) -> PResult<TsPredicateName<'a>> {
        if p.is(TokenKind::This) {
            let start = p.start();
            p.next()?;
            return Ok(TsPredicateName::This(p.alloc(TsThisType { data: p.finish(start) })));
        }
        Ok(TsPredicateName::Identifier(p.parse_identifier(true)?))
    }

    /// `is T` after a predicate name, if present.
    fn parse_predicate_type<'a>(p: &mut Parser<'a>) -> PResult<Option<&'a TsTypeAnnotation<'a>>> {
        if !p.is_contextual("is") || p.has_preceding_line_break() {
            return Ok(None);
        }
        p.next()?;
        let start = p.start();
        let type_annotation = Self::parse_type(p)?;
        Ok(Some(p.alloc(TsTypeAnnotation { data: p.finish(start), type_annotation })))
    }

    fn parse_union_type<'a>(p: &mut Parser<'a>) -> PResult<TsType<'a>> {
        let start = p.start();
        let leading = p.eat(TokenKind::BitwiseOr)?;
        let mut types = vec![Self::parse_intersection_type(p)?];
        while p.eat(TokenKind::BitwiseOr)? {
            types.push(Self::parse_intersection_type(p)?);
        }
        if types.len() == 1 && !leading {
            return Ok(types[0]);
        }
        Ok(TsType::Union(p.alloc(TsUnionType { data: p.finish(start), types: p.alloc_vec(types) })))
    }

    fn parse_intersection_type<'a>(p: &mut Parser<'a>) -> PResult<TsType<'a>> {
        let start = p.start();
        let leading = p.eat(TokenKind::BitwiseAnd)?;
        let mut types = vec![Self::parse_type_operator(p)?];
        while p.eat(TokenKind::BitwiseAnd)? {
            types.push(Self::parse_type_operator(p)?);
        }
        if types.len() == 1 && !leading {
            return Ok(types[0]);
        }
        Ok(TsType::Intersection(p.alloc(TsIntersectionType { data: p.finish(start), types: p.alloc_vec(types) })))
    }

    fn parse_type_operator<'a>(p: &mut Parser<'a>) -> PResult<TsType<'a>> {
        let start = p.start();
        let is_operator =
            p.is(TokenKind::Name) && !p.scanner.contains_esc() && matches!(p.word(), "keyof" | "unique" | "readonly");
        if is_operator {
            let operator = p.word();
            p.next()?;
            let type_annotation = Self::parse_type_operator(p)?;
            if operator == "readonly" && !matches!(type_annotation, TsType::Array(_) | TsType::Tuple(_)) {
                p.raise(&messages::TS_UNEXPECTED_READONLY, start, &[])?;
            }
            return Ok(TsType::TypeOperator(p.alloc(TsTypeOperator { data: p.finish(start), operator, type_annotation })));
        }
        if p.is_contextual("infer") {
            return Self::parse_infer_type(p);
        }
        Self::with_conditional_types(p, true, Self::parse_array_type_or_higher)
    }

    fn parse_infer_type<'a>(p: &mut Parser<'a>) -> PResult<TsType<'a>> {
        let start = p.start();
        p.next()?;
        let param_start = p.start();
        let name = p.parse_identifier_name(true)?;
        // `infer U extends X ? A : B` reads `extends` as the conditional.
        let constraint = if p.is(TokenKind::Extends) {
            p.try_parse(|p| {
                p.next()?;
                let constraint = Self::with_conditional_types(p, false, Self::parse_type)?;
                if !p.state.in_disallow_conditional_types && p.is(TokenKind::Question) {
                    return Err(p.unexpected());
                }
                Ok(constraint)
            })?
        } else {
            None
        };
        let type_parameter = p.alloc(TsTypeParameter {
            data: p.finish(param_start),
            name,
            is_in: false,
            is_out: false,
            is_const: false,
            constraint,
            default: None,
        });
        Ok(TsType::Infer(p.alloc(TsInferType { data: p.finish(start), type_parameter })))
    }

    fn parse_array_type_or_higher<'a>(p: &mut Parser<'a>) -> PResult<TsType<'a>> {
        let start = p.start();
        let mut ty = Self::parse_non_array_type(p)?;
        while !p.has_preceding_line_break() && p.eat(TokenKind::BracketL)? {
            if p.eat(TokenKind::BracketR)? {
                ty = TsType::Array(p.alloc(TsArrayType { data: p.finish(start), element_type: ty }));
            } else {
                let index_type = Self::parse_nested_type(p)?;
                p.expect(TokenKind::BracketR)?;
                ty = TsType::IndexedAccess(p.alloc(TsIndexedAccessType {
                    data: p.finish(start),
                    object_type: ty,
                    index_type,
                }));
            }
        }
        Ok(ty)
    }

    fn parse_non_array_type<'a>(p: &mut Parser<'a>) -> PResult<TsType<'a>> {
        let start = p.start();
        match p.token() {
            TokenKind::Name => {
                if let Some(kind) = TsKeywordKind::from_text(p.word()) {
                    if !p.scanner.contains_esc() && p.lookahead()?.kind != TokenKind::Dot {
                        p.next()?;
                        return Ok(TsType::Keyword(p.alloc(TsKeywordType { kind, data: p.finish(start) })));
                    }
                }
                Self::parse_type_reference(p)
            }
            TokenKind::Void | TokenKind::Null => {
                let kind = if p.is(TokenKind::Void) { TsKeywordKind::Void } else { TsKeywordKind::Null };
                p.next()?;
                Ok(TsType::Keyword(p.alloc(TsKeywordType { kind, data: p.finish(start) })))
            }
            TokenKind::This => {
                p.next()?;
                Ok(TsType::This(p.alloc(TsThisType { data: p.finish(start) })))
            }
            TokenKind::Typeof => {
                p.next()?;
                let expr_name = Self::parse_entity_name(p)?;
                let type_parameters = if !p.has_preceding_line_break() && p.is(TokenKind::Lt) {
                    Some(Self::parse_type_argument_list(p)?)
                } else {
                    None
                };
                Ok(TsType::TypeQuery(p.alloc(TsTypeQuery { data: p.finish(start), expr_name, type_parameters })))
            }
            TokenKind::String | TokenKind::Num | TokenKind::BigInt | TokenKind::True | TokenKind::False => {
                let literal = p.parse_literal_atom()?;
                Ok(TsType::Literal(p.alloc(TsLiteralType { data: p.finish(start), literal })))
            }
            TokenKind::PlusMin if p.char_at(start) == Some('-') => {
                p.next()?;
                if !matches!(p.token(), TokenKind::Num | TokenKind::BigInt) {
                    return Err(p.unexpected());
                }
                let argument = p.parse_literal_atom()?;
                let literal = Expression::Unary(p.alloc(UnaryExpression {
                    data: p.finish(start),
                    operator: UnaryOperator::Minus,
                    prefix: true,
                    argument,
                }));
                Ok(TsType::Literal(p.alloc(TsLiteralType { data: p.finish(start), literal })))
            }
            _ if p.at_template_start() => {
                let template = p.parse_template(false)?;
                let literal = Expression::TemplateLiteral(template);
                Ok(TsType::Literal(p.alloc(TsLiteralType { data: p.finish(start), literal })))
            }
            TokenKind::BraceL => {
                if Self::is_start_of_mapped_type(p)? {
                    return Self::parse_mapped_type(p);
                }
                let members = Self::parse_object_type_members(p)?;
                Ok(TsType::TypeLiteral(p.alloc(TsTypeLiteral { data: p.finish(start), members })))
            }
            TokenKind::BracketL => Self::parse_tuple_type(p),
            TokenKind::ParenL => {
                p.next()?;
                let type_annotation = Self::parse_nested_type(p)?;
                p.expect(TokenKind::ParenR)?;
                Ok(TsType::Parenthesized(p.alloc(TsParenthesizedType { data: p.finish(start), type_annotation })))
            }
            _ => Err(p.unexpected()),
        }
    }

    fn parse_type_reference<'a>(p: &mut Parser<'a>) -> PResult<TsType<'a>> {
        let start = p.start();
        let type_name = Self::parse_entity_name(p)?;
        let type_parameters = if !p.has_preceding_line_break() && p.is(TokenKind::Lt) {
            Some(Self::parse_type_argument_list(p)?)
        } else {
            None
        };
        Ok(TsType::TypeReference(p.alloc(TsTypeReference { data: p.finish(start), type_name, type_parameters })))
    }

    /// `A` or `A.B.C`.
    fn parse_entity_name<'a>(p: &mut Parser<'a>) -> PResult<TsEntityName<'a>> {
        let start = p.start();
        let mut name = TsEntityName::Identifier(p.parse_identifier(true)?);
        while p.eat(TokenKind::Dot)? {
            let right = p.parse_identifier(true)?;
            name = TsEntityName::Qualified(p.alloc(TsQualifiedName { data: p.finish(start), left: name, right }));
        }
        Ok(name)
    }

    fn parse_tuple_type<'a>(p: &mut Parser<'a>) -> PResult<TsType<'a>> {
        let start = p.start();
        p.expect(TokenKind::BracketL)?;
        let mut element_types = Vec::new();
        let mut seen_optional = false;
        while !p.eat(TokenKind::BracketR)? {
            let element_start = p.start();
            let rest = p.eat(TokenKind::Ellipsis)?;
            let la = p.lookahead()?;
            let labeled = p.token().is_keyword_or_name()
                && (la.kind == TokenKind::Colon || (la.kind == TokenKind::Question && p.char_at(la.end) == Some(':')));
            let (element, optional) = if labeled {
                let label = p.parse_identifier(true)?;
                let optional = p.eat(TokenKind::Question)?;
                p.expect(TokenKind::Colon)?;
                let element_type = Self::parse_nested_type(p)?;
                let member = p.alloc(TsNamedTupleMember {
                    data: p.finish(element_start),
                    label,
                    optional,
                    element_type,
                });
                (TsType::NamedTupleMember(member), optional)
            } else {
                let element_type = Self::parse_nested_type(p)?;
                if p.eat(TokenKind::Question)? {
                    let optional = p.alloc(TsOptionalType { data: p.finish(element_start), type_annotation: element_type });
                    (TsType::Optional(optional), true)
                } else {
                    (element_type, false)
                }
            };
            let element = if rest {
                TsType::Rest(p.alloc(TsRestType { data: p.finish(element_start), type_annotation: element }))
            } else {
                element
            };
            if optional {
                seen_optional = true;
            } else if seen_optional && !rest {
                p.raise(&messages::TS_OPTIONAL_TYPE_BEFORE_REQUIRED, element_start, &[])?;
            }
            element_types.push(element);
            if !p.is(TokenKind::BracketR) {
                p.expect(TokenKind::Comma)?;
            }
        }
        Ok(TsType::Tuple(p.alloc(TsTupleType { data: p.finish(start), element_types: p.alloc_vec(element_types) })))
    }

    // ========================================================================
    // Object types
    // ========================================================================

    fn is_start_of_mapped_type(p: &mut Parser<'_>) -> PResult<bool> {
        let checkpoint = p.checkpoint();
        let result = Self::skip_mapped_type_head(p);
        p.restore(checkpoint);
        Ok(result.unwrap_or(false))
    }

    fn skip_mapped_type_head(p: &mut Parser<'_>) -> PResult<bool> {
        p.next()?;
        if p.eat(TokenKind::PlusMin)? {
            return Ok(p.is_contextual("readonly"));
        }
        if p.is_contextual("readonly") {
            p.next()?;
        }
        if !p.eat(TokenKind::BracketL)? || !p.token().is_keyword_or_name() {
            return Ok(false);
        }
        p.next()?;
        Ok(p.is(TokenKind::In))
    }

    /// `{ readonly [K in T as N]?: V }`.
    fn parse_mapped_type<'a>(p: &mut Parser<'a>) -> PResult<TsType<'a>> {
        let start = p.start();
        p.expect(TokenKind::BraceL)?;
        let readonly = Self::parse_mapped_modifier(p, true)?;
        p.expect(TokenKind::BracketL)?;
        let param_start = p.start();
        let name = p.parse_identifier_name(true)?;
        p.expect(TokenKind::In)?;
        let constraint = Self::parse_nested_type(p)?;
        let type_parameter = p.alloc(TsTypeParameter {
            data: p.finish(param_start),
            name,
            is_in: false,
            is_out: false,
            is_const: false,
            constraint: Some(constraint),
            default: None,
        });
        let name_type = if p.eat_contextual("as")? { Some(Self::parse_nested_type(p)?) } else { None };
        p.expect(TokenKind::BracketR)?;
        let optional = Self::parse_mapped_modifier(p, false)?;
        let type_annotation = if p.eat(TokenKind::Colon)? { Some(Self::parse_nested_type(p)?) } else { None };
        if !p.eat(TokenKind::Semi)? {
            p.eat(TokenKind::Comma)?;
        }
        p.expect(TokenKind::BraceR)?;
        Ok(TsType::Mapped(p.alloc(TsMappedType {
            data: p.finish(start),
            readonly,
            type_parameter,
            name_type,
            optional,
            type_annotation,
        })))
    }

    /// `readonly`/`?`, optionally prefixed with `+` or `-`.
    fn parse_mapped_modifier(p: &mut Parser<'_>, readonly: bool) -> PResult<Option<TsMappedModifier>> {
        let at_modifier =
            |p: &Parser<'_>| if readonly { p.is_contextual("readonly") } else { p.is(TokenKind::Question) };
        if p.is(TokenKind::PlusMin) {
            let modifier =
                if p.char_at(p.start()) == Some('+') { TsMappedModifier::Plus } else { TsMappedModifier::Minus };
            p.next()?;
            if !at_modifier(&*p) {
                return Err(p.unexpected());
            }
            p.next()?;
            return Ok(Some(modifier));
        }
        if at_modifier(&*p) {
            p.next()?;
            return Ok(Some(TsMappedModifier::Present));
        }
        Ok(None)
    }

    /// `{ ... }` of a type literal or interface body.
    fn parse_object_type_members<'a>(p: &mut Parser<'a>) -> PResult<&'a [TsTypeElement<'a>]> {
        p.expect(TokenKind::BraceL)?;
        let mut members = Vec::new();
        while !p.eat(TokenKind::BraceR)? {
            members.push(Self::parse_type_member(p)?);
        }
        Ok(p.alloc_vec(members))
    }

    fn next_token_can_follow_modifier(p: &mut Parser<'_>) -> PResult<bool> {
        let la = p.lookahead()?;
        Ok(!la.has_line_break_before && can_follow_modifier(la.kind))
    }

    fn parse_type_member<'a>(p: &mut Parser<'a>) -> PResult<TsTypeElement<'a>> {
        let start = p.start();
        if matches!(p.token(), TokenKind::ParenL | TokenKind::Lt) {
            return Self::parse_signature_member(p, start, TsSignatureKind::Call);
        }
        if p.is(TokenKind::New) && matches!(p.lookahead()?.kind, TokenKind::ParenL | TokenKind::Lt) {
            p.next()?;
            return Self::parse_signature_member(p, start, TsSignatureKind::Construct);
        }

        let mut readonly = false;
        while p.is(TokenKind::Name) && !p.scanner.contains_esc() && Self::next_token_can_follow_modifier(p)? {
            let modifier = p.word();
            match modifier {
                "readonly" if readonly => p.raise(&messages::TS_DUPLICATE_MODIFIER, p.start(), &["readonly"])?,
                "readonly" => readonly = true,
                "public" | "private" | "protected" | "static" | "declare" | "abstract" | "override" => {
                    p.raise(&messages::TS_INVALID_MODIFIER_ON_TYPE_MEMBER, p.start(), &[modifier])?
                }
                _ => break,
            }
            p.next()?;
        }

        if let Some((parameters, type_annotation)) = Self::try_parse_index_signature(p)? {
            Self::parse_type_member_separator(p)?;
            return Ok(TsTypeElement::Index(p.alloc(TsIndexSignature {
                data: p.finish(start),
                parameters,
                type_annotation,
                readonly,
                is_static: false,
            })));
        }

        let mut kind = TsMethodSignatureKind::Method;
        if (p.is_contextual("get") || p.is_contextual("set")) && Self::next_token_can_follow_modifier(p)? {
            kind = if p.is_contextual("get") { TsMethodSignatureKind::Get } else { TsMethodSignatureKind::Set };
            p.next()?;
        }
        let (key, computed) = p.parse_property_name(None, false)?;
        let optional = p.eat(TokenKind::Question)?;

        if kind != TsMethodSignatureKind::Method || matches!(p.token(), TokenKind::ParenL | TokenKind::Lt) {
            if readonly {
                p.raise(&messages::TS_READONLY_FOR_METHOD_SIGNATURE, start, &[])?;
            }
            let type_parameters = Self::parse_type_parameters_opt(p)?;
            let parameters = Self::parse_signature_params(p)?;
            let type_annotation =
                if p.is(TokenKind::Colon) { Some(Self::parse_type_annotation(p, true)?) } else { None };
            Self::parse_type_member_separator(p)?;
            return Ok(TsTypeElement::Method(p.alloc(TsMethodSignature {
                data: p.finish(start),
                key,
                computed,
                optional,
                kind,
                type_parameters,
                parameters,
                type_annotation,
            })));
        }

        let type_annotation = if p.is(TokenKind::Colon) { Some(Self::parse_type_annotation(p, false)?) } else { None };
        Self::parse_type_member_separator(p)?;
        Ok(TsTypeElement::Property(p.alloc(TsPropertySignature {
            data: p.finish(start),
            key,
            computed,
            optional,
            readonly,
            type_annotation,
        })))
    }

    fn parse_signature_member<'a>(p: &mut Parser<'a>, start: usize, kind: TsSignatureKind) -> PResult<TsTypeElement<'a>> {
        let type_parameters = Self::parse_type_parameters_opt(p)?;
        let parameters = Self::parse_signature_params(p)?;
        let type_annotation = if p.is(TokenKind::Colon) { Some(Self::parse_type_annotation(p, true)?) } else { None };
        Self::parse_type_member_separator(p)?;
        Ok(TsTypeElement::Signature(p.alloc(TsSignatureDeclaration {
            kind,
            data: p.finish(start),
            type_parameters,
            parameters,
            type_annotation,
        })))
    }

    fn parse_type_member_separator(p: &mut Parser<'_>) -> PResult<()> {
        if p.eat(TokenKind::Comma)? || p.eat(TokenKind::Semi)? || p.is(TokenKind::BraceR) || p.has_preceding_line_break()
        {
            return Ok(());
        }
        Err(p.unexpected())
    }

    /// `[key: T]` and the optional `: U` after it. `None` when the bracket
    /// starts something else, such as a computed key.
    #[allow(clippy::type_complexity)]
    fn try_parse_index_signature<'a>(
        p: &mut Parser<'a>,
    ) -> PResult<Option<(&'a [&'a Identifier<'a>], Option<&'a TsTypeAnnotation<'a>>)>> {
        if !p.is(TokenKind::BracketL) {
            return Ok(None);
        }
        let checkpoint = p.checkpoint();
        p.next()?;
        if !p.token().is_keyword_or_name() {
            p.restore(checkpoint);
            return Ok(None);
        }
        let id_start = p.start();
        let name = p.parse_identifier_name(true)?;
        if !p.is(TokenKind::Colon) {
            p.restore(checkpoint);
            return Ok(None);
        }
        let annotation = Self::parse_type_annotation(p, false)?;
        let id = p.alloc(Identifier {
            data: p.finish(id_start),
            name,
            optional: false,
            type_annotation: Some(TypeAnnotation::Ts(annotation)),
        });
        p.expect(TokenKind::BracketR)?;
        let type_annotation = if p.is(TokenKind::Colon) { Some(Self::parse_type_annotation(p, false)?) } else { None };
        Ok(Some((p.alloc_vec(vec![id]), type_annotation)))
    }

    // ========================================================================
    // Type parameters and arguments
    // ========================================================================

    fn parse_type_parameters_opt<'a>(p: &mut Parser<'a>) -> PResult<Option<&'a TsTypeParameterDeclaration<'a>>> {
        if !matches!(p.token(), TokenKind::Lt | TokenKind::BitShiftL) {
            return Ok(None);
        }
        Ok(Some(Self::parse_type_parameter_declaration(p)?))
    }

    /// `<T extends U = V, in out W>` at the current `<`.
    fn parse_type_parameter_declaration<'a>(p: &mut Parser<'a>) -> PResult<&'a TsTypeParameterDeclaration<'a>> {
        let start = p.start();
        p.scanner.rescan_lt();
        p.in_type(|p| {
            p.expect(TokenKind::Lt)?;
            let mut params = Vec::new();
            while !p.is(TokenKind::Gt) {
                params.push(Self::parse_type_parameter(p)?);
                if !p.is(TokenKind::Gt) {
                    p.expect(TokenKind::Comma)?;
                }
            }
            if params.is_empty() {
                p.raise(&messages::TS_EMPTY_TYPE_PARAMETERS, start, &[])?;
            }
            p.expect(TokenKind::Gt)?;
            Ok(p.alloc(TsTypeParameterDeclaration { data: p.finish(start), params: p.alloc_vec(params) }))
        })
    }

    fn parse_type_parameter<'a>(p: &mut Parser<'a>) -> PResult<TsTypeParameter<'a>> {
        let start = p.start();
        let (mut is_in, mut is_out, mut is_const) = (false, false, false);
        while p.lookahead()?.kind.is_keyword_or_name() {
            match p.token() {
                TokenKind::Const if !is_const => is_const = true,
                TokenKind::In if !is_in => is_in = true,
                TokenKind::Name if p.is_contextual("out") && !is_out => is_out = true,
                _ => break,
            }
            p.next()?;
        }
        let name = p.parse_identifier_name(false)?;
        let constraint = if p.eat(TokenKind::Extends)? { Some(Self::parse_nested_type(p)?) } else { None };
        let default = if p.eat(TokenKind::Eq)? { Some(Self::parse_nested_type(p)?) } else { None };
        Ok(TsTypeParameter { data: p.finish(start), name, is_in, is_out, is_const, constraint, default })
    }

    /// `<A, B>` with the scanner already in type context.
    fn parse_type_argument_list<'a>(p: &mut Parser<'a>) -> PResult<&'a TsTypeParameterInstantiation<'a>> {
        let start = p.start();
        p.expect(TokenKind::Lt)?;
        let mut params = Vec::new();
        while !p.is(TokenKind::Gt) {
            params.push(Self::parse_nested_type(p)?);
            if !p.eat(TokenKind::Comma)? {
                break;
            }
        }
        if params.is_empty() {
            p.raise(&messages::TS_EMPTY_TYPE_ARGUMENTS, start, &[])?;
        }
        p.expect(TokenKind::Gt)?;
        Ok(p.alloc(TsTypeParameterInstantiation { data: p.finish(start), params: p.alloc_vec(params) }))
    }

    /// `<A, B>` where the `<` was read as an operator.
    fn parse_type_arguments_in_expression<'a>(p: &mut Parser<'a>) -> PResult<&'a TsTypeParameterInstantiation<'a>> {
        p.scanner.rescan_lt();
        p.in_type(Self::parse_type_argument_list)
    }

    /// `A<T>, B` after `extends` or `implements`.
    fn parse_heritage_list<'a>(
        p: &mut Parser<'a>,
        keyword: &str,
        keyword_pos: usize,
    ) -> PResult<Vec<&'a TsExpressionWithTypeArguments<'a>>> {
        if p.is(TokenKind::BraceL) {
            p.raise(&messages::TS_EMPTY_HERITAGE_CLAUSE_TYPE, keyword_pos, &[keyword])?;
            return Ok(Vec::new());
        }
        let mut list = Vec::new();
        loop {
            let start = p.start();
            let expression = Self::parse_entity_name(p)?;
            let type_parameters = if matches!(p.token(), TokenKind::Lt | TokenKind::BitShiftL) {
                Some(Self::parse_type_arguments_in_expression(p)?)
            } else {
                None
            };
            list.push(&*p.alloc(TsExpressionWithTypeArguments { data: p.finish(start), expression, type_parameters }));
            if !p.eat(TokenKind::Comma)? {
                break;
            }
        }
        Ok(list)
    }

    // ========================================================================
    // Expressions
    // ========================================================================

    /// `<T,>` or `<T extends U>` where a TSX element would otherwise start.
    fn at_tsx_type_parameters(p: &mut Parser<'_>) -> bool {
        let checkpoint = p.checkpoint();
        p.scanner.pop_context();
        p.scanner.replace_token(TokenKind::Lt);
        let result = p.in_type(|p| {
            p.next()?;
            if p.is(TokenKind::Const) {
                p.next()?;
            }
            if !p.token().is_keyword_or_name() {
                return Ok(false);
            }
            p.next()?;
            Ok(matches!(p.token(), TokenKind::Comma | TokenKind::Extends))
        });
        p.restore(checkpoint);
        result.unwrap_or(false)
    }

    /// `<T>(params): R => body` at the `<`.
    fn parse_generic_arrow<'a>(p: &mut Parser<'a>, start: usize, is_async: bool) -> PResult<Expression<'a>> {
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
        p.parse_arrow_expression(start, params.to_vec(), is_async, Some(TypeParameters::Ts(type_parameters)), return_type)
    }

    fn mark_optional<'a>(p: &mut Parser<'a>, expr: Expression<'a>) -> PResult<Expression<'a>> {
        match expr {
            Expression::Identifier(id) => Ok(Expression::Identifier(p.alloc(Identifier {
                data: p.finish(span_start(id.data.span)),
                name: id.name,
                optional: true,
                type_annotation: None,
            }))),
            _ => {
                p.raise(&messages::TS_PATTERN_IS_OPTIONAL, span_start(expr.span()), &[])?;
                Ok(expr)
            }
        }
    }

    // ========================================================================
    // Declarations
    // ========================================================================

    /// A TypeScript declaration at the current token, shared by statement
    /// and `export` positions.
    fn parse_declaration<'a>(p: &mut Parser<'a>, start: usize) -> PResult<Option<Statement<'a>>> {
        if p.is(TokenKind::Const) {
            if !p.lookahead()?.is_contextual("enum") {
                return Ok(None);
            }
            p.next()?;
            return Self::parse_enum(p, start, true, false).map(Some);
        }
        if !p.is(TokenKind::Name) || p.scanner.contains_esc() {
            return Ok(None);
        }
        let la = p.lookahead()?;
        let same_line = !la.has_line_break_before;
        let statement = match p.word() {
            "interface" if la.kind.is_keyword_or_name() => Self::parse_interface(p, start, false)?,
            "type" if la.kind == TokenKind::Name => Self::parse_type_alias(p, start, false)?,
            "enum" if la.kind == TokenKind::Name => Self::parse_enum(p, start, false, false)?,
            "abstract" if same_line && la.kind == TokenKind::Class => {
                p.next()?;
                Statement::Class(p.parse_class_with(start, &[], true, false, ClassHead::ABSTRACT)?)
            }
            "namespace" if same_line && la.kind == TokenKind::Name => {
                p.next()?;
                let declaration = Self::parse_namespace(p, start, TsModuleKind::Namespace, false, false)?;
                Self::module_statement(p, declaration)
            }
            "module" if same_line && la.kind == TokenKind::String => {
                p.next()?;
                let declaration = Self::parse_ambient_module(p, start, false)?;
                Self::module_statement(p, declaration)
            }
            "module" if same_line && la.kind == TokenKind::Name => {
                p.next()?;
                let declaration = Self::parse_namespace(p, start, TsModuleKind::Module, false, false)?;
                Self::module_statement(p, declaration)
            }
            "declare" if same_line && Self::starts_ambient_declaration(&la) => {
                p.next()?;
                Self::parse_declare(p, start)?
            }
            _ => return Ok(None),
        };
        Ok(Some(statement))
    }

    fn starts_ambient_declaration(la: &esparse_scanner::Lookahead<'_>) -> bool {
        match la.kind {
            TokenKind::Function | TokenKind::Class | TokenKind::Var | TokenKind::Const => true,
            TokenKind::Name => ["let", "abstract", "interface", "type", "enum", "namespace", "module", "global"]
                .iter()
                .any(|word| la.is_contextual(word)),
            _ => false,
        }
    }

    fn module_statement<'a>(p: &Parser<'a>, declaration: &'a TsModuleDeclaration<'a>) -> Statement<'a> {
        Statement::Extension(p.alloc(StatementExtension::TsModule(declaration)))
    }

    /// Everything after `declare`.
    fn parse_declare<'a>(p: &mut Parser<'a>, start: usize) -> PResult<Statement<'a>> {
        let old_ambient = std::mem::replace(&mut p.state.in_ambient_context, true);
        let result = Self::parse_ambient_declaration(p, start);
        p.state.in_ambient_context = old_ambient;
        result
    }

    fn parse_ambient_declaration<'a>(p: &mut Parser<'a>, start: usize) -> PResult<Statement<'a>> {
        trace!(start, "ambient declaration");
        match p.token() {
            TokenKind::Function => {
                p.next()?;
                Ok(Statement::Function(p.parse_function(start, FunctionFlags::DECLARATION | FunctionFlags::DECLARE)?))
            }
            TokenKind::Class => Ok(Statement::Class(p.parse_class_with(start, &[], true, false, ClassHead::DECLARE)?)),
            TokenKind::Var => Ok(Statement::Variable(p.parse_var_statement(start, VariableKind::Var, true)?)),
            TokenKind::Const if p.lookahead()?.is_contextual("enum") => {
                p.next()?;
                Self::parse_enum(p, start, true, true)
            }
            TokenKind::Const => Ok(Statement::Variable(p.parse_var_statement(start, VariableKind::Const, true)?)),
            TokenKind::Name => match p.word() {
                "let" => Ok(Statement::Variable(p.parse_var_statement(start, VariableKind::Let, true)?)),
                "abstract" => {
                    p.next()?;
                    let head = ClassHead::ABSTRACT | ClassHead::DECLARE;
                    Ok(Statement::Class(p.parse_class_with(start, &[], true, false, head)?))
                }
                "interface" => Self::parse_interface(p, start, true),
                "type" => Self::parse_type_alias(p, start, true),
                "enum" => Self::parse_enum(p, start, false, true),
                "namespace" => {
                    p.next()?;
                    let declaration = Self::parse_namespace(p, start, TsModuleKind::Namespace, true, false)?;
                    Ok(Self::module_statement(p, declaration))
                }
                "module" => {
                    p.next()?;
                    let declaration = if p.is(TokenKind::String) {
                        Self::parse_ambient_module(p, start, true)?
                    } else {
                        Self::parse_namespace(p, start, TsModuleKind::Module, true, false)?
                    };
                    Ok(Self::module_statement(p, declaration))
                }
                "global" => {
                    let id = p.parse_identifier(true)?;
                    let body = TsModuleBody::Block(Self::parse_module_block(p)?);
                    let declaration = p.alloc(TsModuleDeclaration {
                        data: p.finish(start),
                        id: TsModuleName::Identifier(id),
                        kind: TsModuleKind::Global,
                        body: Some(body),
                        declare: true,
                    });
                    Ok(Self::module_statement(p, declaration))
                }
                _ => Err(p.unexpected()),
            },
            _ => Err(p.unexpected()),
        }
    }

    fn parse_interface<'a>(p: &mut Parser<'a>, start: usize, declare: bool) -> PResult<Statement<'a>> {
        p.next()?;
        if !p.is(TokenKind::Name) {
            return Err(p.error_at(&messages::TS_MISSING_INTERFACE_NAME, p.start(), &[]));
        }
        let id = p.parse_identifier(false)?;
        p.declare_name(id.name, BindingFlags::TYPE_TS_INTERFACE, span_start(id.data.span))?;
        let type_parameters = Self::parse_type_parameters_opt(p)?;
        let extends = if p.is(TokenKind::Extends) {
            let keyword_pos = p.start();
            p.next()?;
            let list = Self::parse_heritage_list(p, "extends", keyword_pos)?;
            p.alloc_vec(list)
        } else {
            &[]
        };
        let body_start = p.start();
        let members = p.in_type(Self::parse_object_type_members)?;
        let body = p.alloc(TsInterfaceBody { data: p.finish(body_start), body: members });
        let declaration =
            p.alloc(TsInterfaceDeclaration { data: p.finish(start), id, type_parameters, extends, body, declare });
        Ok(Statement::Extension(p.alloc(StatementExtension::TsInterface(declaration))))
    }

    fn parse_type_alias<'a>(p: &mut Parser<'a>, start: usize, declare: bool) -> PResult<Statement<'a>> {
        p.next()?;
        let id = p.parse_identifier(false)?;
        p.declare_name(id.name, BindingFlags::TYPE_TS_TYPE, span_start(id.data.span))?;
        let type_parameters = Self::parse_type_parameters_opt(p)?;
        let type_annotation = p.in_type(|p| {
            p.expect(TokenKind::Eq)?;
            Self::parse_type(p)
        })?;
        p.semicolon()?;
        let declaration =
            p.alloc(TsTypeAliasDeclaration { data: p.finish(start), id, type_parameters, type_annotation, declare });
        Ok(Statement::Extension(p.alloc(StatementExtension::TsTypeAlias(declaration))))
    }

    /// `enum E { A, B = 1, "c" }` at the `enum` word.
    fn parse_enum<'a>(p: &mut Parser<'a>, start: usize, is_const: bool, declare: bool) -> PResult<Statement<'a>> {
        p.next()?;
        let id = p.parse_identifier(false)?;
        let binding = if is_const { BindingFlags::TYPE_TS_CONST_ENUM } else { BindingFlags::TYPE_TS_ENUM };
        p.declare_name(id.name, binding, span_start(id.data.span))?;
        p.expect(TokenKind::BraceL)?;
        let mut members = Vec::new();
        while !p.eat(TokenKind::BraceR)? {
            let member_start = p.start();
            let member_id = if p.is(TokenKind::String) {
                Expression::StringLiteral(p.parse_string_literal()?)
            } else {
                Expression::Identifier(p.parse_identifier(true)?)
            };
            let initializer = if p.eat(TokenKind::Eq)? { Some(p.parse_maybe_assign_allow_in(None)?) } else { None };
            members.push(TsEnumMember { data: p.finish(member_start), id: member_id, initializer });
            if !p.is(TokenKind::BraceR) {
                p.expect(TokenKind::Comma)?;
            }
        }
        let declaration = p.alloc(TsEnumDeclaration {
            data: p.finish(start),
            id,
            members: p.alloc_vec(members),
            is_const,
            declare,
        });
        Ok(Statement::Extension(p.alloc(StatementExtension::TsEnum(declaration))))
    }

    /// `A.B.C { ... }` after `namespace` or `module`.
    fn parse_namespace<'a>(
        p: &mut Parser<'a>,
        start: usize,
        kind: TsModuleKind,
        declare: bool,
        nested: bool,
    ) -> PResult<&'a TsModuleDeclaration<'a>> {
        let id = p.parse_identifier(false)?;
        if !nested {
            p.declare_name(id.name, BindingFlags::TYPE_TS_NAMESPACE, span_start(id.data.span))?;
        }
        let body = if p.eat(TokenKind::Dot)? {
            let inner_start = p.start();
            TsModuleBody::Declaration(Self::parse_namespace(p, inner_start, kind, false, true)?)
        } else {
            TsModuleBody::Block(Self::parse_module_block(p)?)
        };
        Ok(p.alloc(TsModuleDeclaration {
            data: p.finish(start),
            id: TsModuleName::Identifier(id),
            kind,
            body: Some(body),
            declare,
        }))
    }

    /// `module "name" { ... }` or the bodiless `module "name";`.
    fn parse_ambient_module<'a>(p: &mut Parser<'a>, start: usize, declare: bool) -> PResult<&'a TsModuleDeclaration<'a>> {
        let name = p.parse_string_literal()?;
        let body = if p.is(TokenKind::BraceL) {
            Some(TsModuleBody::Block(Self::parse_module_block(p)?))
        } else {
            p.semicolon()?;
            None
        };
        Ok(p.alloc(TsModuleDeclaration {
            data: p.finish(start),
            id: TsModuleName::String(name),
            kind: TsModuleKind::Module,
            body,
            declare,
        }))
    }

    /// A namespace body: its own var scope and export list.
    fn parse_module_block<'a>(p: &mut Parser<'a>) -> PResult<&'a TsModuleBlock<'a>> {
        let start = p.start();
        p.expect(TokenKind::BraceL)?;
        p.scope.enter(ScopeFlags::TS_MODULE);
        p.prod_param.enter(ParamFlags::NONE);
        let outer_exports = std::mem::take(&mut p.exported_names);
        let body = p.parse_block_body(TokenKind::BraceR, false, true, |_, _| Ok(()));
        p.exported_names = outer_exports;
        p.prod_param.exit();
        p.scope.exit();
        let (body, _) = body?;
        Ok(p.alloc(TsModuleBlock { data: p.finish(start), body }))
    }

    // ========================================================================
    // Class members
    // ========================================================================

    fn check_private_accessibility(
        p: &mut Parser<'_>,
        key: &Expression<'_>,
        accessibility: Option<Accessibility>,
    ) -> PResult<()> {
        if let (Expression::PrivateName(name), Some(accessibility)) = (key, accessibility) {
            p.raise(
                &messages::TS_PRIVATE_ELEMENT_HAS_ACCESSIBILITY,
                span_start(name.data.span),
                &[accessibility_text(accessibility)],
            )?;
        }
        Ok(())
    }
}

impl Overlay for TypeScriptOverlay {
    fn name(&self) -> &'static str {
        "typescript"
    }

    // ========================================================================
    // Expressions
    // ========================================================================

    /// Generic arrow functions. In TSX the `<` arrives as a tag start and is
    /// only taken over for `<T,>` and `<T extends U>`.
    fn parse_maybe_assign<'a>(
        &self,
        p: &mut Parser<'a>,
        _layer: Layer,
        _errors: Option<&mut ExpressionErrors>,
    ) -> PResult<Option<Expression<'a>>> {
        let jsx_head = p.is(TokenKind::JsxTagStart);
        if !p.is(TokenKind::Lt) && !(jsx_head && Self::at_tsx_type_parameters(p)) {
            return Ok(None);
        }
        let start = p.start();
        p.try_parse(|p| {
            if jsx_head {
                p.scanner.pop_context();
                p.scanner.replace_token(TokenKind::Lt);
            }
            Self::parse_generic_arrow(p, start, false)
        })
    }

    /// `(a?)` and `(a?: T)` in what may be arrow parameters: leave the `?`
    /// for the list item.
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

    /// `x as T`, `x as const` and `x satisfies T`, at relational precedence.
    fn parse_expr_op<'a>(
        &self,
        p: &mut Parser<'a>,
        _layer: Layer,
        left: Expression<'a>,
        left_start: usize,
        min_prec: u8,
    ) -> PResult<Option<Expression<'a>>> {
        let is_as = p.is_contextual("as");
        if !(is_as || p.is_contextual("satisfies")) || p.scanner.contains_esc() || p.has_preceding_line_break() {
            return Ok(None);
        }
        if TokenKind::In.binop().unwrap_or(7) <= min_prec {
            return Ok(None);
        }
        let type_annotation = p.in_type(|p| {
            p.next()?;
            if is_as {
                Self::parse_type_or_const(p)
            } else {
                Self::parse_type(p)
            }
        })?;
        let data = p.finish(left_start);
        let ext = if is_as {
            ExpressionExtension::TsAs(p.alloc(TsAsExpression { data, expression: left, type_annotation }))
        } else {
            ExpressionExtension::TsSatisfies(p.alloc(TsSatisfiesExpression { data, expression: left, type_annotation }))
        };
        Ok(Some(Expression::Extension(p.alloc(ext))))
    }

    /// `<T>expr`, which TSX reads as an element instead.
    fn parse_maybe_unary<'a>(&self, p: &mut Parser<'a>, _layer: Layer) -> PResult<Option<Expression<'a>>> {
        if p.has_plugin(Plugins::JSX) || !p.is(TokenKind::Lt) {
            return Ok(None);
        }
        let start = p.start();
        let type_annotation = p.in_type(|p| {
            p.next()?;
            let ty = Self::parse_type_or_const(p)?;
            p.expect(TokenKind::Gt)?;
            Ok(ty)
        })?;
        let expression = p.parse_maybe_unary(None, false)?;
        let assertion = p.alloc(TsTypeAssertion { data: p.finish(start), type_annotation, expression });
        Ok(Some(Expression::Extension(p.alloc(ExpressionExtension::TsTypeAssertion(assertion)))))
    }

    /// `x!`, `f<T>(..)`, `` f<T>`..` ``, `f<T>` and `async <T>(x) => x`.
    fn parse_subscript<'a>(
        &self,
        p: &mut Parser<'a>,
        _layer: Layer,
        base: Expression<'a>,
        start: usize,
        state: &mut SubscriptState,
    ) -> PResult<Option<Expression<'a>>> {
        if p.is(TokenKind::Bang) && !p.has_preceding_line_break() {
            p.next()?;
            let node = p.alloc(TsNonNullExpression { data: p.finish(start), expression: base });
            return Ok(Some(Expression::Extension(p.alloc(ExpressionExtension::TsNonNull(node)))));
        }
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
            let type_arguments = Self::parse_type_arguments_in_expression(p)?;
            let mut inner = outer;
            if p.at_template_start() {
                let expr = p.parse_tagged_template(base, start, &inner, Some(TypeArguments::Ts(type_arguments)))?;
                return Ok((expr, inner));
            }
            if p.is(TokenKind::ParenL) {
                let expr = p.parse_call_tail(base, start, &mut inner, false, Some(TypeArguments::Ts(type_arguments)))?;
                return Ok((expr, inner));
            }
            let next = p.token();
            if matches!(next, TokenKind::Gt | TokenKind::BitShiftR | TokenKind::Relational)
                || (p.token_starts_expr() && !p.has_preceding_line_break())
            {
                return Err(p.unexpected());
            }
            let node = p.alloc(TsInstantiationExpression {
                data: p.finish(start),
                expression: base,
                type_parameters: type_arguments,
            });
            Ok((Expression::Extension(p.alloc(ExpressionExtension::TsInstantiation(node))), inner))
        })?;
        Ok(result.map(|(expr, inner)| {
            *state = inner;
            expr
        }))
    }

    /// `(a?: T)` inside parentheses becomes an optional identifier wrapped
    /// in a type cast.
    fn parse_paren_item<'a>(
        &self,
        p: &mut Parser<'a>,
        _layer: Layer,
        expr: Expression<'a>,
        start: usize,
    ) -> PResult<Option<Expression<'a>>> {
        let optional = p.eat(TokenKind::Question)?;
        let expr = if optional { Self::mark_optional(p, expr)? } else { expr };
        if !p.is(TokenKind::Colon) {
            return Ok(optional.then_some(expr));
        }
        let type_annotation = Self::parse_type_annotation(p, false)?;
        let cast = p.alloc(TsTypeCastExpression { data: p.finish(start), expression: expr, type_annotation });
        Ok(Some(Expression::Extension(p.alloc(ExpressionExtension::TsTypeCast(cast)))))
    }

    fn parse_type_arguments<'a>(&self, p: &mut Parser<'a>, _layer: Layer) -> PResult<Option<TypeArguments<'a>>> {
        Ok(Some(TypeArguments::Ts(Self::parse_type_arguments_in_expression(p)?)))
    }

    // ========================================================================
    // Patterns and functions
    // ========================================================================

    /// A leading `this` parameter.
    fn parse_binding_atom<'a>(&self, p: &mut Parser<'a>, _layer: Layer) -> PResult<Option<Pattern<'a>>> {
        if !p.is(TokenKind::This) || !p.state.in_parameters {
            return Ok(None);
        }
        let start = p.start();
        p.next()?;
        Ok(Some(Pattern::Identifier(p.identifier_at(start, p.last_end(), "this"))))
    }

    /// Parameter properties: `constructor(private readonly x: T)`.
    fn parse_assignable_list_item<'a>(
        &self,
        p: &mut Parser<'a>,
        _layer: Layer,
        decorators: &'a [&'a Decorator<'a>],
    ) -> PResult<Option<Pattern<'a>>> {
        let start = decorators.first().map_or(p.start(), |first| span_start(first.data.span));
        let modifier_start = p.start();
        let mut accessibility = None;
        let mut readonly = false;
        let mut is_override = false;
        let mut any = false;
        while p.is(TokenKind::Name) && !p.scanner.contains_esc() {
            let la = p.lookahead()?;
            if la.has_line_break_before
                || !(la.kind.is_keyword_or_name() || matches!(la.kind, TokenKind::BraceL | TokenKind::BracketL))
            {
                break;
            }
            match p.word() {
                "public" | "private" | "protected" if accessibility.is_none() => {
                    accessibility = Accessibility::from_text(p.word());
                }
                "readonly" if !readonly => readonly = true,
                "override" if !is_override => is_override = true,
                _ => break,
            }
            any = true;
            p.next()?;
        }
        if !any {
            return Ok(None);
        }
        if !p.state.parameter_modifiers_allowed {
            p.raise(&messages::TS_UNEXPECTED_PARAMETER_MODIFIER, modifier_start, &[])?;
        }
        let left_start = p.start();
        let left = p.parse_binding_atom()?;
        let (left, _) = p.parse_binding_annotation(left, BindingPosition::Parameter)?;
        let parameter = p.parse_maybe_default(left_start, left)?;
        let simple = match parameter {
            Pattern::Identifier(_) => true,
            Pattern::Assignment(assign) => matches!(assign.left, Pattern::Identifier(_)),
            _ => false,
        };
        if !simple {
            p.raise(&messages::TS_UNSUPPORTED_PARAMETER_PROPERTY_KIND, left_start, &[])?;
        }
        let property = p.alloc(TsParameterProperty {
            data: p.finish(start),
            decorators,
            accessibility,
            readonly,
            is_override,
            parameter,
        });
        Ok(Some(Pattern::Extension(p.alloc(PatternExtension::TsParameterProperty(property)))))
    }

    fn parse_binding_annotation<'a>(
        &self,
        p: &mut Parser<'a>,
        _layer: Layer,
        pattern: Pattern<'a>,
        position: BindingPosition,
    ) -> PResult<Option<(Pattern<'a>, bool)>> {
        let optional = position == BindingPosition::Parameter && p.eat(TokenKind::Question)?;
        let mut definite = false;
        if position == BindingPosition::VariableDeclarator && p.is(TokenKind::Bang) && !p.has_preceding_line_break() {
            p.next()?;
            definite = true;
        }
        let annotation =
            if p.is(TokenKind::Colon) { Some(TypeAnnotation::Ts(Self::parse_type_annotation(p, false)?)) } else { None };
        if !optional && !definite && annotation.is_none() {
            return Ok(None);
        }
        if optional && !matches!(pattern, Pattern::Identifier(_)) && !p.state.in_ambient_context {
            p.raise(&messages::TS_PATTERN_IS_OPTIONAL, span_start(pattern.span()), &[])?;
        }
        Ok(Some((annotate_pattern(p, pattern, optional, annotation, p.last_end()), definite)))
    }

    fn parse_type_parameters<'a>(&self, p: &mut Parser<'a>, _layer: Layer) -> PResult<Option<TypeParameters<'a>>> {
        Ok(Some(TypeParameters::Ts(Self::parse_type_parameter_declaration(p)?)))
    }

    fn parse_return_type<'a>(&self, p: &mut Parser<'a>, _layer: Layer) -> PResult<Option<TypeAnnotation<'a>>> {
        Ok(Some(TypeAnnotation::Ts(Self::parse_type_annotation(p, true)?)))
    }

    /// Overload signatures and ambient functions have no body.
    fn allows_missing_body(&self, _p: &Parser<'_>) -> bool {
        true
    }

    // ========================================================================
    // Classes
    // ========================================================================

    fn parse_class_implements<'a>(
        &self,
        p: &mut Parser<'a>,
        _layer: Layer,
    ) -> PResult<Option<&'a [ClassImplements<'a>]>> {
        if !p.is_contextual("implements") {
            return Ok(None);
        }
        let keyword_pos = p.start();
        p.next()?;
        let list = Self::parse_heritage_list(p, "implements", keyword_pos)?;
        Ok(Some(p.alloc_vec(list.into_iter().map(ClassImplements::Ts).collect())))
    }

    fn parse_class_member_modifiers<'a>(
        &self,
        p: &mut Parser<'a>,
        _layer: Layer,
        modifiers: &mut MemberModifiers<'a>,
    ) -> PResult<Option<()>> {
        let mut any = false;
        loop {
            if !p.is(TokenKind::Name) || p.scanner.contains_esc() {
                break;
            }
            let word = p.word();
            if !matches!(word, "public" | "private" | "protected" | "readonly" | "abstract" | "override" | "declare" | "static")
                || !Self::next_token_can_follow_modifier(p)?
            {
                break;
            }
            let pos = p.start();
            match word {
                "public" | "private" | "protected" => {
                    if modifiers.accessibility.is_some() {
                        p.raise(&messages::TS_DUPLICATE_ACCESSIBILITY_MODIFIER, pos, &[])?;
                    } else if modifiers.is_override {
                        p.raise(&messages::TS_INVALID_MODIFIERS_ORDER, pos, &[word, "override"])?;
                    } else if modifiers.is_static {
                        p.raise(&messages::TS_INVALID_MODIFIERS_ORDER, pos, &[word, "static"])?;
                    } else if modifiers.readonly {
                        p.raise(&messages::TS_INVALID_MODIFIERS_ORDER, pos, &[word, "readonly"])?;
                    }
                    modifiers.accessibility = Accessibility::from_text(word);
                }
                "static" => {
                    if modifiers.is_static {
                        p.raise(&messages::TS_DUPLICATE_MODIFIER, pos, &[word])?;
                    } else if modifiers.readonly {
                        p.raise(&messages::TS_INVALID_MODIFIERS_ORDER, pos, &["static", "readonly"])?;
                    } else if modifiers.is_override {
                        p.raise(&messages::TS_INVALID_MODIFIERS_ORDER, pos, &["static", "override"])?;
                    }
                    modifiers.is_static = true;
                }
                "override" => {
                    if modifiers.is_override {
                        p.raise(&messages::TS_DUPLICATE_MODIFIER, pos, &[word])?;
                    } else if modifiers.readonly {
                        p.raise(&messages::TS_INVALID_MODIFIERS_ORDER, pos, &["override", "readonly"])?;
                    }
                    modifiers.is_override = true;
                }
                "readonly" => {
                    if modifiers.readonly {
                        p.raise(&messages::TS_DUPLICATE_MODIFIER, pos, &[word])?;
                    }
                    modifiers.readonly = true;
                }
                "abstract" => {
                    if modifiers.is_abstract {
                        p.raise(&messages::TS_DUPLICATE_MODIFIER, pos, &[word])?;
                    }
                    modifiers.is_abstract = true;
                }
                _ => {
                    if modifiers.declare {
                        p.raise(&messages::TS_DUPLICATE_MODIFIER, pos, &[word])?;
                    }
                    modifiers.declare = true;
                }
            }
            any = true;
            p.next()?;
        }
        if modifiers.declare && modifiers.is_override {
            p.raise(&messages::TS_INCOMPATIBLE_MODIFIERS, p.start(), &["declare", "override"])?;
        }
        if modifiers.is_abstract && modifiers.is_static {
            p.raise(&messages::TS_INCOMPATIBLE_MODIFIERS, p.start(), &["static", "abstract"])?;
        }
        Ok(any.then_some(()))
    }

    /// `[key: string]: T` as a class member.
    fn parse_class_member_extension<'a>(
        &self,
        p: &mut Parser<'a>,
        _layer: Layer,
        start: usize,
        modifiers: &MemberModifiers<'a>,
    ) -> PResult<Option<ClassMember<'a>>> {
        let Some((parameters, type_annotation)) = Self::try_parse_index_signature(p)? else { return Ok(None) };
        if !p.eat(TokenKind::Comma)? {
            p.semicolon()?;
        }
        let signature = p.alloc(TsIndexSignature {
            data: p.finish(start),
            parameters,
            type_annotation,
            readonly: modifiers.readonly,
            is_static: modifiers.is_static,
        });
        Ok(Some(ClassMember::Extension(p.alloc(ClassMemberExtension::TsIndexSignature(signature)))))
    }

    fn parse_class_property_type<'a>(&self, p: &mut Parser<'a>, _layer: Layer) -> PResult<Option<PropertyTypeInfo<'a>>> {
        let mut info = PropertyTypeInfo::default();
        if p.is(TokenKind::Bang) && !p.has_preceding_line_break() {
            p.next()?;
            info.definite = true;
        }
        if p.is(TokenKind::Colon) {
            info.type_annotation = Some(TypeAnnotation::Ts(Self::parse_type_annotation(p, false)?));
        }
        Ok(Some(info))
    }

    fn finish_class_member<'a>(
        &self,
        p: &mut Parser<'a>,
        _layer: Layer,
        member: ClassMember<'a>,
    ) -> PResult<Option<ClassMember<'a>>> {
        match member {
            ClassMember::Method(method) => {
                if method.kind == MethodKind::Constructor && method.type_parameters.is_some() {
                    p.raise(&messages::TS_CONSTRUCTOR_HAS_TYPE_PARAMETERS, span_start(method.data.span), &[])?;
                }
                Self::check_private_accessibility(p, &method.key, method.accessibility)?;
            }
            ClassMember::Property(property) => {
                Self::check_private_accessibility(p, &property.key, property.accessibility)?;
            }
            _ => {}
        }
        Ok(None)
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
        if !p.is_contextual("type") || p.scanner.contains_esc() || !import_kind_applies(p, in_specifier)? {
            return Ok(None);
        }
        p.next()?;
        Ok(Some(ImportKind::Type))
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
        let pattern = match *ext {
            ExpressionExtension::TsTypeCast(cast) => {
                if !is_binding && !p.state.maybe_in_arrow_parameters {
                    p.raise(&messages::TS_UNEXPECTED_TYPE_ANNOTATION, span_start(cast.type_annotation.data.span), &[])?;
                }
                let inner = p.to_assignable(cast.expression, !is_binding)?;
                let annotation = Some(TypeAnnotation::Ts(cast.type_annotation));
                annotate_pattern(p, inner, false, annotation, span_end(cast.data.span))
            }
            ExpressionExtension::TsAs(node) if !is_binding => Pattern::Extension(p.alloc(PatternExtension::TsAs(node))),
            ExpressionExtension::TsSatisfies(node) if !is_binding => {
                Pattern::Extension(p.alloc(PatternExtension::TsSatisfies(node)))
            }
            ExpressionExtension::TsNonNull(node) if !is_binding => {
                Pattern::Extension(p.alloc(PatternExtension::TsNonNull(node)))
            }
            ExpressionExtension::TsTypeAssertion(node) => {
                if is_binding {
                    p.raise(&messages::TS_UNEXPECTED_TYPE_CAST_IN_PARAMETER, span_start(node.data.span), &[])?;
                }
                Pattern::Extension(p.alloc(PatternExtension::TsTypeAssertion(node)))
            }
            _ => return Ok(None),
        };
        Ok(Some(pattern))
    }
}

#[cfg(test)]
mod tests {
    use crate::options::{ParserOptions, SourceTypeOption};
    use bumpalo::Bump;
    use esparse_ast::ts::*;
    use esparse_ast::*;

    fn options() -> ParserOptions {
        ParserOptions::default().with_plugin("typescript")
    }

    fn module() -> ParserOptions {
        ParserOptions { source_type: SourceTypeOption::Module, ..options() }
    }

    fn reason(src: &str) -> Option<&'static str> {
        let arena = Bump::new();
        let err = crate::parse(&arena, src, &options()).expect_err("should fail");
        err.diagnostic().map(|d| d.reason_code())
    }

    fn expression<'a>(stmt: &Statement<'a>) -> Expression<'a> {
        match stmt {
            Statement::Expression(stmt) => stmt.expression,
            other => panic!("expected an expression statement, got {other:?}"),
        }
    }

    fn ts_type<'a>(annotation: Option<TypeAnnotation<'a>>) -> TsType<'a> {
        match annotation {
            Some(TypeAnnotation::Ts(annotation)) => annotation.type_annotation,
            other => panic!("expected a TypeScript annotation, got {other:?}"),
        }
    }

    // ========================================================================
    // Annotations and types
    // ========================================================================

    #[test]
    fn test_variable_and_function_annotations() {
        let arena = Bump::new();
        let src = "let x: number = 1;\nfunction f(a: string, b?: boolean): void {}";
        let file = crate::parse(&arena, src, &options()).unwrap();
        let Statement::Variable(var) = file.program.body[0] else { panic!("variable") };
        let Pattern::Identifier(id) = var.declarations[0].id else { panic!("identifier") };
        assert!(matches!(ts_type(id.type_annotation), TsType::Keyword(k) if k.kind == TsKeywordKind::Number));

        let Statement::Function(f) = file.program.body[1] else { panic!("function") };
        let Pattern::Identifier(b) = f.params[1] else { panic!("param") };
        assert!(b.optional);
        assert!(matches!(ts_type(f.return_type), TsType::Keyword(k) if k.kind == TsKeywordKind::Void));
    }

    #[test]
    fn test_type_grammar() {
        let arena = Bump::new();
        let src = "type A<T> = T extends (infer U)[] ? U : keyof T | [x: string, y?: number] | { readonly [K in keyof T]?: T[K] } | ((a: T) => void) & typeof x.y | -1 | `t`;";
        let file = crate::parse(&arena, src, &options()).unwrap();
        let Statement::Extension(StatementExtension::TsTypeAlias(alias)) = file.program.body[0] else {
            panic!("type alias")
        };
        let TsType::Conditional(conditional) = alias.type_annotation else { panic!("conditional") };
        assert!(matches!(conditional.extends_type, TsType::Array(_)));
        let TsType::Union(union) = conditional.false_type else { panic!("union") };
        assert!(matches!(union.types[0], TsType::TypeOperator(op) if op.operator == "keyof"));
        assert!(matches!(union.types[1], TsType::Tuple(t) if t.element_types.len() == 2));
        assert!(matches!(union.types[2], TsType::Mapped(m) if m.optional == Some(TsMappedModifier::Present)));
        assert!(matches!(union.types[3], TsType::Intersection(_)));
        assert!(matches!(union.types[4], TsType::Literal(l) if matches!(l.literal, Expression::Unary(_))));
        assert!(matches!(union.types[5], TsType::Literal(l) if matches!(l.literal, Expression::TemplateLiteral(_))));
    }

    #[test]
    fn test_type_predicates() {
        let arena = Bump::new();
        let src = "function isS(x: unknown): x is string { return true }\nfunction check(x): asserts x {}";
        let file = crate::parse(&arena, src, &options()).unwrap();
        let Statement::Function(f) = file.program.body[0] else { panic!("function") };
        assert!(matches!(ts_type(f.return_type), TsType::TypePredicate(pred) if !pred.asserts));
        let Statement::Function(f) = file.program.body[1] else { panic!("function") };
        assert!(matches!(ts_type(f.return_type), TsType::TypePredicate(pred) if pred.asserts && pred.type_annotation.is_none()));
    }

    // ========================================================================
    // Declarations
    // ========================================================================

    #[test]
    fn test_interface_enum_and_namespace() {
        let arena = Bump::new();
        let src = "interface Point<T> extends Base { x: T; move(dx: number): void; readonly [k: string]: any }\n\
                   const enum Color { Red, Green = 2 }\n\
                   namespace A.B { export const x = 1; }";
        let file = crate::parse(&arena, src, &module()).unwrap();
        let Statement::Extension(StatementExtension::TsInterface(iface)) = file.program.body[0] else {
            panic!("interface")
        };
        assert_eq!(iface.id.name, "Point");
        assert_eq!(iface.extends.len(), 1);
        assert_eq!(iface.body.body.len(), 3);
        assert!(matches!(iface.body.body[1], TsTypeElement::Method(_)));
        assert!(matches!(iface.body.body[2], TsTypeElement::Index(sig) if sig.readonly));

        let Statement::Extension(StatementExtension::TsEnum(e)) = file.program.body[1] else { panic!("enum") };
        assert!(e.is_const);
        assert_eq!(e.members.len(), 2);
        assert!(e.members[1].initializer.is_some());

        let Statement::Extension(StatementExtension::TsModule(ns)) = file.program.body[2] else { panic!("namespace") };
        assert_eq!(ns.kind, TsModuleKind::Namespace);
        assert!(matches!(ns.body, Some(TsModuleBody::Declaration(inner)) if matches!(inner.body, Some(TsModuleBody::Block(_)))));
    }

    #[test]
    fn test_declare_forms() {
        let arena = Bump::new();
        let src = "declare function f(x: number): string;\ndeclare const c: number;\ndeclare module \"m\" { export function g(): void; }\ndeclare global { interface Window {} }";
        let file = crate::parse(&arena, src, &module()).unwrap();
        match file.program.body[0] {
            Statement::Function(f) => {
                assert!(f.declare);
                assert!(f.body.is_none());
            }
            other => panic!("{other:?}"),
        }
        assert!(matches!(file.program.body[1], Statement::Variable(v) if v.declare));
        assert!(matches!(file.program.body[2], Statement::Extension(StatementExtension::TsModule(m)) if m.declare));
        assert!(matches!(
            file.program.body[3],
            Statement::Extension(StatementExtension::TsModule(m)) if m.kind == TsModuleKind::Global
        ));
    }

    #[test]
    fn test_declare_function_with_body() {
        assert_eq!(reason("declare function f() {}"), Some("DeclareFunctionHasImplementation"));
    }

    #[test]
    fn test_type_and_interface_are_still_identifiers() {
        let arena = Bump::new();
        let file = crate::parse(&arena, "type = 1; interface; declare\nfoo;", &options()).unwrap();
        assert_eq!(file.program.body.len(), 4);
        assert!(matches!(expression(&file.program.body[0]), Expression::Assignment(_)));
    }

    // ========================================================================
    // Expressions
    // ========================================================================

    #[test]
    fn test_as_satisfies_and_non_null() {
        let arena = Bump::new();
        let src = "x as any as string;\ny satisfies T;\nz!.w;\nc = [1] as const;";
        let file = crate::parse(&arena, src, &options()).unwrap();
        match expression(&file.program.body[0]) {
            Expression::Extension(ExpressionExtension::TsAs(outer)) => {
                assert!(matches!(outer.expression, Expression::Extension(ExpressionExtension::TsAs(_))));
            }
            other => panic!("{other:?}"),
        }
        assert!(matches!(expression(&file.program.body[1]), Expression::Extension(ExpressionExtension::TsSatisfies(_))));
        match expression(&file.program.body[2]) {
            Expression::Member(member) => {
                assert!(matches!(member.object, Expression::Extension(ExpressionExtension::TsNonNull(_))));
            }
            other => panic!("{other:?}"),
        }
    }

    #[test]
    fn test_generic_calls_and_instantiation() {
        let arena = Bump::new();
        let src = "f<string>(x);\nnew Map<string, number>();\nconst g = f<number>;\na < b > c;";
        let file = crate::parse(&arena, src, &options()).unwrap();
        match expression(&file.program.body[0]) {
            Expression::Call(call) => assert!(call.type_parameters.is_some()),
            other => panic!("{other:?}"),
        }
        match expression(&file.program.body[1]) {
            Expression::New(new) => assert!(new.type_parameters.is_some()),
            other => panic!("{other:?}"),
        }
        let Statement::Variable(var) = file.program.body[2] else { panic!("variable") };
        assert!(matches!(var.declarations[0].init, Some(Expression::Extension(ExpressionExtension::TsInstantiation(_)))));
        assert!(matches!(expression(&file.program.body[3]), Expression::Binary(_)));
    }

    #[test]
    fn test_generic_and_annotated_arrows() {
        let arena = Bump::new();
        let src = "const id = <T>(x: T): T => x;\nconst opt = (a?: number, b: string = \"\") => a;\nconst af = async <T>(x: T) => x;";
        let file = crate::parse(&arena, src, &options()).unwrap();
        let init = |i: usize| match file.program.body[i] {
            Statement::Variable(var) => var.declarations[0].init,
            ref other => panic!("{other:?}"),
        };
        match init(0) {
            Some(Expression::ArrowFunction(arrow)) => {
                assert!(arrow.type_parameters.is_some());
                assert!(arrow.return_type.is_some());
            }
            other => panic!("{other:?}"),
        }
        match init(1) {
            Some(Expression::ArrowFunction(arrow)) => {
                assert!(matches!(arrow.params[0], Pattern::Identifier(id) if id.optional && id.type_annotation.is_some()));
                assert!(matches!(arrow.params[1], Pattern::Assignment(_)));
            }
            other => panic!("{other:?}"),
        }
        assert!(matches!(init(2), Some(Expression::ArrowFunction(arrow)) if arrow.is_async && arrow.type_parameters.is_some()));
    }

    #[test]
    fn test_tsx_generic_arrow() {
        let arena = Bump::new();
        let options = ParserOptions::default().with_plugin("typescript").with_plugin("jsx");
        let file = crate::parse(&arena, "const f = <T,>(x: T) => <div>{x}</div>;", &options).unwrap();
        let Statement::Variable(var) = file.program.body[0] else { panic!("variable") };
        assert!(matches!(var.declarations[0].init, Some(Expression::ArrowFunction(_))));
    }

    #[test]
    fn test_type_assertion() {
        let arena = Bump::new();
        let file = crate::parse(&arena, "<any>window;", &options()).unwrap();
        assert!(matches!(expression(&file.program.body[0]), Expression::Extension(ExpressionExtension::TsTypeAssertion(_))));
    }

    #[test]
    fn test_type_annotation_outside_parameters() {
        assert_eq!(reason("(a: number);"), Some("UnexpectedTypeAnnotation"));
    }

    // ========================================================================
    // Classes and modules
    // ========================================================================

    #[test]
    fn test_class_members_and_parameter_properties() {
        let arena = Bump::new();
        let src = "abstract class A<T> extends B<T> implements I, J<T> {\n\
                   private readonly x: number = 1;\n\
                   declare y?: string;\n\
                   z!: T;\n\
                   [key: string]: any;\n\
                   constructor(public a: string, protected b = 1) { super() }\n\
                   abstract m(): void;\n\
                   }";
        let file = crate::parse(&arena, src, &options()).unwrap();
        let Statement::Class(class) = file.program.body[0] else { panic!("class") };
        assert!(class.is_abstract);
        assert_eq!(class.implements.len(), 2);
        assert!(class.super_type_parameters.is_some());
        let ClassBodyOrPlaceholder::Body(body) = class.body else { panic!("body") };
        let members = body.body;
        match members[0] {
            ClassMember::Property(prop) => {
                assert_eq!(prop.accessibility, Some(Accessibility::Private));
                assert!(prop.readonly);
                assert!(prop.type_annotation.is_some());
            }
            other => panic!("{other:?}"),
        }
        assert!(matches!(members[1], ClassMember::Property(prop) if prop.declare && prop.optional));
        assert!(matches!(members[2], ClassMember::Property(prop) if prop.definite));
        assert!(matches!(members[3], ClassMember::Extension(ClassMemberExtension::TsIndexSignature(_))));
        match members[4] {
            ClassMember::Method(ctor) => {
                assert_eq!(ctor.params.len(), 2);
                assert!(ctor.params.iter().all(|param| matches!(param, Pattern::Extension(PatternExtension::TsParameterProperty(_)))));
            }
            other => panic!("{other:?}"),
        }
        assert!(matches!(members[5], ClassMember::Method(m) if m.is_abstract && m.body.is_none()));
    }

    #[test]
    fn test_modifier_errors() {
        assert_eq!(reason("class A { public public x }"), Some("DuplicateAccessibilityModifier"));
        assert_eq!(reason("class A { static public x }"), Some("InvalidModifiersOrder"));
        assert_eq!(reason("function f(private x) {}"), Some("UnexpectedParameterModifier"));
        assert_eq!(reason("class A { m() { abstract class B { abstract m() {} } } }"), Some("AbstractMethodHasImplementation"));
    }

    #[test]
    fn test_import_and_export_type() {
        let arena = Bump::new();
        let src = "import type { A } from \"a\";\nimport { type B, C } from \"b\";\nimport type from \"c\";\nexport type { A };\nexport interface D {}\nexport type E = A;";
        let file = crate::parse(&arena, src, &module()).unwrap();
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
        assert_eq!(
            kinds,
            vec![
                Some(ImportKind::Type),
                Some(ImportKind::Value),
                Some(ImportKind::Value),
                Some(ImportKind::Type),
                Some(ImportKind::Type),
                Some(ImportKind::Type),
            ]
        );
        let Statement::Module(ModuleItem::Import(decl)) = file.program.body[1] else { panic!("import") };
        match decl.specifiers[0] {
            ImportSpecifierKind::Named(spec) => assert_eq!(spec.import_kind, Some(ImportKind::Type)),
            other => panic!("{other:?}"),
        }
    }
}
