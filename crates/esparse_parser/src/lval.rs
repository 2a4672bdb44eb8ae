//! Assignment targets and binding patterns.
//!
//! Expressions that turn out to be targets are converted with
//! [`Parser::to_assignable`]; binding positions are parsed directly as
//! patterns. Both are then validated by [`Parser::check_lval`], which also
//! declares the bound names in the current scope.

use crate::expression::ExpressionErrors;
use crate::overlay::{dispatch, Layer};
use crate::parser::{PResult, Parser};
use crate::utilities::*;
use bitflags::bitflags;
use esparse_ast::*;
use esparse_core::collections::FxHashSet;
use esparse_diagnostics::messages;
use esparse_scope::BindingFlags;

/// Where a binding pattern appears, for the annotation hook.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindingPosition {
    Parameter,
    VariableDeclarator,
    CatchParam,
}

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub(crate) struct ListFlags: u8 {
        /// Holes are allowed, as in array patterns.
        const ALLOW_EMPTY           = 1 << 0;
        const IS_FUNCTION_PARAMS    = 1 << 1;
        /// Parameter properties are allowed.
        const IS_CONSTRUCTOR_PARAMS = 1 << 2;
    }
}

/// What a target is validated as.
#[derive(Debug, Clone, Copy)]
pub(crate) struct LvalTarget {
    /// The construct holding the target, for messages.
    pub(crate) description: &'static str,
    /// `TYPE_NONE` for assignment targets.
    pub(crate) binding: BindingFlags,
    /// A `"use strict"` in the body made the enclosing function strict.
    pub(crate) strict_mode_changed: bool,
}

impl LvalTarget {
    pub(crate) fn assign(description: &'static str) -> Self {
        Self { description, binding: BindingFlags::TYPE_NONE, strict_mode_changed: false }
    }

    pub(crate) fn binding(description: &'static str, binding: BindingFlags) -> Self {
        Self { description, binding, strict_mode_changed: false }
    }

    fn is_binding(&self) -> bool {
        self.binding != BindingFlags::TYPE_NONE
    }
}

/// Strip `ParenthesizedExpression` wrappers.
pub(crate) fn unwrap_parenthesized(expr: Expression<'_>) -> Expression<'_> {
    match expr {
        Expression::Parenthesized(paren) => unwrap_parenthesized(paren.expression),
        _ => expr,
    }
}

/// Node data for a pattern converted from an expression, keeping its
/// parenthesized flag.
fn pattern_data(data: &NodeData) -> NodeData {
    let converted = NodeData::new(data.span);
    if data.is_parenthesized() {
        converted.set_flag(NodeFlags::PARENTHESIZED);
    }
    converted
}

impl<'a> Parser<'a> {
    // ========================================================================
    // Expression to pattern conversion
    // ========================================================================

    /// Convert an expression that turned out to be a target. `is_lhs` is
    /// set for assignment targets and unset for arrow parameters.
    pub(crate) fn to_assignable(&mut self, expr: Expression<'a>, is_lhs: bool) -> PResult<Pattern<'a>> {
        let description = if is_lhs { "assignment expression" } else { "function parameter list" };
        self.to_assignable_in(expr, is_lhs, description)
    }

    pub(crate) fn to_assignable_in(
        &mut self,
        expr: Expression<'a>,
        is_lhs: bool,
        description: &'static str,
    ) -> PResult<Pattern<'a>> {
        if expr.is_parenthesized() || matches!(expr, Expression::Parenthesized(_)) {
            let inner = unwrap_parenthesized(expr);
            let allowed = is_lhs && matches!(inner, Expression::Identifier(_) | Expression::Member(_));
            if !allowed {
                self.raise(&messages::INVALID_PARENTHESIZED_ASSIGNMENT, span_start(expr.span()), &[])?;
            }
        }

        match expr {
            Expression::Parenthesized(paren) => self.to_assignable_in(paren.expression, is_lhs, description),
            Expression::Identifier(id) => Ok(Pattern::Identifier(id)),
            Expression::Member(member) => Ok(Pattern::Member(member)),
            Expression::Object(object) => self.object_to_assignable(object, is_lhs, description),
            Expression::Array(array) => {
                let trailing_comma = self.trailing_comma_of(span_start(array.data.span));
                let elements = self.to_assignable_list_in(array.elements, trailing_comma, is_lhs, description)?;
                let elements = self.alloc_vec(elements);
                Ok(Pattern::Array(self.alloc(ArrayPattern {
                    data: pattern_data(&array.data),
                    elements,
                    type_annotation: None,
                })))
            }
            Expression::Assignment(assign) => {
                if assign.operator != AssignmentOperator::Assign {
                    self.raise(&messages::MISSING_EQ_IN_ASSIGNMENT, span_end(assign.left.span()), &[])?;
                }
                Ok(Pattern::Assignment(self.alloc(AssignmentPattern {
                    data: pattern_data(&assign.data),
                    left: assign.left,
                    right: assign.right,
                })))
            }
            Expression::Extension(ext) => {
                match dispatch!(self, Layer::OUTERMOST, to_assignable_extension(ext, !is_lhs)) {
                    Some(pattern) => Ok(pattern),
                    None => Err(self.invalid_lhs(expr.span(), is_lhs, description)),
                }
            }
            _ => Err(self.invalid_lhs(expr.span(), is_lhs, description)),
        }
    }

    fn invalid_lhs(&self, span: esparse_core::text::Span, is_lhs: bool, description: &str) -> esparse_diagnostics::Diagnostic {
        let message = if is_lhs { &messages::INVALID_LHS } else { &messages::INVALID_LHS_BINDING };
        self.error_at(message, span_start(span), &[description])
    }

    fn object_to_assignable(
        &mut self,
        object: &'a ObjectExpression<'a>,
        is_lhs: bool,
        description: &'static str,
    ) -> PResult<Pattern<'a>> {
        let trailing_comma = self.trailing_comma_of(span_start(object.data.span));
        let last = object.properties.len().saturating_sub(1);
        let mut properties = Vec::with_capacity(object.properties.len());
        for (index, member) in object.properties.iter().enumerate() {
            match *member {
                ObjectMember::Property(property) => {
                    let value = self.to_assignable_in(property.value, is_lhs, description)?;
                    let converted = self.alloc(PatternProperty {
                        data: pattern_data(&property.data),
                        method: false,
                        key: property.key,
                        computed: property.computed,
                        shorthand: property.shorthand,
                        value,
                    });
                    let converted = dispatch!(self, Layer::OUTERMOST, finish_pattern_property(converted))
                        .unwrap_or(ObjectPatternMember::Property(converted));
                    properties.push(converted);
                }
                ObjectMember::Method(method) => {
                    let message = if matches!(method.kind, MethodKind::Get | MethodKind::Set) {
                        &messages::PATTERN_HAS_ACCESSOR
                    } else {
                        &messages::PATTERN_HAS_METHOD
                    };
                    self.raise(message, span_start(method.key.span()), &[])?;
                }
                ObjectMember::Spread(spread) => {
                    self.check_to_rest_conversion(spread.argument, false)?;
                    let argument = self.to_assignable_in(spread.argument, is_lhs, description)?;
                    if index < last {
                        self.raise(&messages::REST_TRAILING_COMMA, span_start(spread.data.span), &[])?;
                    } else if let Some(pos) = trailing_comma {
                        self.raise(&messages::REST_TRAILING_COMMA, pos, &[])?;
                    }
                    properties.push(ObjectPatternMember::Rest(self.alloc(RestElement {
                        data: pattern_data(&spread.data),
                        argument,
                        type_annotation: None,
                    })));
                }
                ObjectMember::Extension(ext) => {
                    match dispatch!(self, Layer::OUTERMOST, to_assignable_member(ext, !is_lhs)) {
                        Some(converted) => properties.push(converted),
                        None => return Err(self.invalid_lhs(ext.data().span, is_lhs, description)),
                    }
                }
            }
        }
        let properties = self.alloc_vec(properties);
        Ok(Pattern::Object(self.alloc(ObjectPattern {
            data: pattern_data(&object.data),
            properties,
            type_annotation: None,
        })))
    }

    /// Convert array elements or call arguments. A spread becomes a rest
    /// element, which must come last without a trailing comma.
    pub(crate) fn to_assignable_list(
        &mut self,
        items: &[Option<ExprOrSpread<'a>>],
        trailing_comma: Option<usize>,
        is_lhs: bool,
    ) -> PResult<Vec<Option<Pattern<'a>>>> {
        let description = if is_lhs { "assignment expression" } else { "function parameter list" };
        self.to_assignable_list_in(items, trailing_comma, is_lhs, description)
    }

    fn to_assignable_list_in(
        &mut self,
        items: &[Option<ExprOrSpread<'a>>],
        trailing_comma: Option<usize>,
        is_lhs: bool,
        description: &'static str,
    ) -> PResult<Vec<Option<Pattern<'a>>>> {
        let last = items.len().saturating_sub(1);
        let mut patterns = Vec::with_capacity(items.len());
        for (index, item) in items.iter().enumerate() {
            let pattern = match *item {
                None => None,
                Some(ExprOrSpread::Expression(expr)) => Some(self.to_assignable_in(expr, is_lhs, description)?),
                Some(ExprOrSpread::Spread(spread)) => {
                    self.check_to_rest_conversion(spread.argument, true)?;
                    let argument = self.to_assignable_in(spread.argument, is_lhs, description)?;
                    if index < last {
                        self.raise(&messages::REST_TRAILING_COMMA, span_start(spread.data.span), &[])?;
                    } else if let Some(pos) = trailing_comma {
                        self.raise(&messages::REST_TRAILING_COMMA, pos, &[])?;
                    }
                    Some(Pattern::Rest(self.alloc(RestElement {
                        data: pattern_data(&spread.data),
                        argument,
                        type_annotation: None,
                    })))
                }
            };
            patterns.push(pattern);
        }
        Ok(patterns)
    }

    fn check_to_rest_conversion(&mut self, argument: Expression<'a>, allow_pattern: bool) -> PResult<()> {
        match unwrap_parenthesized(argument) {
            Expression::Identifier(_) | Expression::Member(_) | Expression::Extension(_) => Ok(()),
            Expression::Array(_) | Expression::Object(_) if allow_pattern => Ok(()),
            _ => self.raise(&messages::INVALID_REST_ASSIGNMENT_PATTERN, span_start(argument.span()), &[]),
        }
    }

    /// The trailing comma recorded for the literal starting at `start`.
    fn trailing_comma_of(&self, start: usize) -> Option<usize> {
        self.state
            .trailing_commas
            .iter()
            .rev()
            .find(|(literal, _)| *literal == start)
            .map(|&(_, comma)| comma)
    }

    /// Expressions that stay expressions: type casts are only valid as
    /// arrow parameters, or alone in parentheses in Flow.
    pub(crate) fn to_referenced_list(&mut self, exprs: &[Expression<'a>], is_parenthesized: bool) -> PResult<()> {
        for expr in exprs {
            match *expr {
                Expression::Extension(ExpressionExtension::TsTypeCast(cast)) => {
                    self.raise(
                        &messages::TS_UNEXPECTED_TYPE_ANNOTATION,
                        span_start(cast.type_annotation.data.span),
                        &[],
                    )?;
                }
                Expression::Extension(ExpressionExtension::FlowTypeCast(cast))
                    if !cast.data.is_parenthesized() && (exprs.len() > 1 || !is_parenthesized) =>
                {
                    self.raise(
                        &messages::FLOW_TYPE_CAST_IN_PATTERN,
                        span_start(cast.type_annotation.data.span),
                        &[],
                    )?;
                }
                _ => {}
            }
        }
        Ok(())
    }

    pub(crate) fn to_referenced_arguments(&mut self, arguments: &[ExprOrSpread<'a>]) -> PResult<()> {
        let exprs: Vec<Expression<'a>> = arguments
            .iter()
            .map(|argument| match *argument {
                ExprOrSpread::Expression(expr) => expr,
                ExprOrSpread::Spread(spread) => spread.argument,
            })
            .collect();
        self.to_referenced_list(&exprs, false)
    }

    /// The target of a compound assignment, which must be simple.
    pub(crate) fn simple_target(&mut self, expr: Expression<'a>, description: &'static str) -> PResult<Pattern<'a>> {
        match unwrap_parenthesized(expr) {
            Expression::Identifier(id) => Ok(Pattern::Identifier(id)),
            Expression::Member(member) if member.kind == MemberType::MemberExpression => Ok(Pattern::Member(member)),
            Expression::Extension(ext) if self.is_simple_assign_target(&expr) => {
                match dispatch!(self, Layer::OUTERMOST, to_assignable_extension(ext, false)) {
                    Some(pattern) => Ok(pattern),
                    None => Err(self.invalid_lhs(expr.span(), true, description)),
                }
            }
            _ => Err(self.invalid_lhs(expr.span(), true, description)),
        }
    }

    /// The operand of `++` or `--`.
    pub(crate) fn check_simple_target(&mut self, expr: &Expression<'a>, description: &'static str) -> PResult<()> {
        if !self.is_simple_assign_target(expr) {
            return self.raise(&messages::INVALID_LHS, span_start(expr.span()), &[description]);
        }
        if let Expression::Identifier(id) = unwrap_parenthesized(*expr) {
            self.check_identifier(id, BindingFlags::TYPE_NONE, false)?;
        }
        Ok(())
    }

    // ========================================================================
    // Validation
    // ========================================================================

    /// Validate a target and declare the names it binds. `clashes` collects
    /// names where duplicates are errors.
    pub(crate) fn check_lval(
        &mut self,
        pattern: &Pattern<'a>,
        target: LvalTarget,
        mut clashes: Option<&mut FxHashSet<&'a str>>,
    ) -> PResult<()> {
        match *pattern {
            Pattern::Identifier(id) => {
                self.check_identifier(id, target.binding, target.strict_mode_changed)?;
                if let Some(seen) = clashes {
                    if !seen.insert(id.name) {
                        self.raise(&messages::PARAM_DUPE, span_start(id.data.span), &[])?;
                    }
                }
                Ok(())
            }
            Pattern::Member(member) => {
                if member.kind == MemberType::OptionalMemberExpression {
                    self.raise(&messages::INVALID_LHS, span_start(member.data.span), &[target.description])?;
                }
                if target.is_binding() {
                    self.raise(&messages::INVALID_PROPERTY_BINDING_PATTERN, span_start(member.data.span), &[])?;
                }
                Ok(())
            }
            Pattern::Object(object) => {
                for member in object.properties {
                    match *member {
                        ObjectPatternMember::Property(property) => {
                            self.check_lval(&property.value, target, clashes.as_deref_mut())?
                        }
                        ObjectPatternMember::Rest(rest) => self.check_lval(&rest.argument, target, clashes.as_deref_mut())?,
                        ObjectPatternMember::Estree(property) => {
                            if let esparse_ast::ext::estree::PropertyValue::Pattern(value) = property.value {
                                self.check_lval(&value, target, clashes.as_deref_mut())?;
                            }
                        }
                    }
                }
                Ok(())
            }
            Pattern::Array(array) => {
                for element in array.elements.iter().flatten() {
                    self.check_lval(element, target, clashes.as_deref_mut())?;
                }
                Ok(())
            }
            Pattern::Assignment(assign) => self.check_lval(&assign.left, target, clashes),
            Pattern::Rest(rest) => self.check_lval(&rest.argument, target, clashes),
            Pattern::Extension(ext) => match *ext {
                PatternExtension::TsParameterProperty(property) => self.check_lval(&property.parameter, target, clashes),
                PatternExtension::TsAs(node) => self.check_type_wrapped_target(node.expression, target),
                PatternExtension::TsSatisfies(node) => self.check_type_wrapped_target(node.expression, target),
                PatternExtension::TsNonNull(node) => self.check_type_wrapped_target(node.expression, target),
                PatternExtension::TsTypeAssertion(node) => self.check_type_wrapped_target(node.expression, target),
                PatternExtension::Placeholder(_) => Ok(()),
            },
        }
    }

    /// `x as T = v` and friends: only assignment targets, never bindings.
    fn check_type_wrapped_target(&mut self, expr: Expression<'a>, target: LvalTarget) -> PResult<()> {
        if target.is_binding() {
            return self.raise(&messages::INVALID_LHS_BINDING, span_start(expr.span()), &[target.description]);
        }
        match unwrap_parenthesized(expr) {
            Expression::Identifier(id) => self.check_identifier(id, BindingFlags::TYPE_NONE, false),
            Expression::Member(_) => Ok(()),
            inner if self.is_simple_assign_target(&inner) => Ok(()),
            _ => self.raise(&messages::INVALID_LHS, span_start(expr.span()), &[target.description]),
        }
    }

    /// Strict-mode name checks, then the scope declaration.
    pub(crate) fn check_identifier(
        &mut self,
        id: &'a Identifier<'a>,
        binding: BindingFlags,
        strict_mode_changed: bool,
    ) -> PResult<()> {
        let name = id.name;
        let pos = span_start(id.data.span);
        if self.is_strict() {
            let reserved = if strict_mode_changed {
                is_strict_bind_reserved_word(name, self.in_module)
            } else {
                is_strict_bind_only_reserved_word(name)
            };
            if reserved {
                if binding == BindingFlags::TYPE_NONE {
                    self.raise(&messages::STRICT_EVAL_ARGUMENTS, pos, &[name])?;
                } else {
                    self.raise(&messages::STRICT_EVAL_ARGUMENTS_BINDING, pos, &[name])?;
                }
            }
        }
        if binding.contains(BindingFlags::FLAG_NO_LET_IN_LEXICAL) && name == "let" {
            self.raise(&messages::LET_IN_LEXICAL_BINDING, pos, &[])?;
        }
        if !binding.is_unrecorded() {
            self.declare_name(name, binding, pos)?;
        }
        Ok(())
    }

    /// Record a binding, reporting a clash with an earlier one.
    pub(crate) fn declare_name(&mut self, name: &str, binding: BindingFlags, pos: usize) -> PResult<()> {
        let atom = self.intern(name);
        if let Err(clash) = self.scope.declare_name(atom, binding, pos as u32) {
            self.raise(&messages::VAR_REDECLARATION, clash.pos as usize, &[name])?;
        }
        Ok(())
    }

    // ========================================================================
    // Binding patterns
    // ========================================================================

    pub(crate) fn parse_binding_atom(&mut self) -> PResult<Pattern<'a>> {
        self.with_recursion_guard(|p| {
            if let Some(pattern) = dispatch!(p, Layer::OUTERMOST, parse_binding_atom()) {
                return Ok(pattern);
            }
            p.base_parse_binding_atom()
        })
    }

    pub(crate) fn base_parse_binding_atom(&mut self) -> PResult<Pattern<'a>> {
        match self.token() {
            TokenKind::BracketL => {
                let start = self.start();
                self.next()?;
                let elements = self.parse_binding_list(TokenKind::BracketR, ']', ListFlags::ALLOW_EMPTY)?;
                let elements = self.alloc_vec(elements);
                Ok(Pattern::Array(self.alloc(ArrayPattern { data: self.finish(start), elements, type_annotation: None })))
            }
            TokenKind::BraceL => self.parse_object_pattern(),
            _ => Ok(Pattern::Identifier(self.parse_identifier(false)?)),
        }
    }

    fn parse_object_pattern(&mut self) -> PResult<Pattern<'a>> {
        let start = self.start();
        self.next()?;
        let mut properties = Vec::new();
        let mut first = true;
        while !self.eat(TokenKind::BraceR)? {
            if first {
                first = false;
            } else {
                self.expect(TokenKind::Comma)?;
                if self.eat(TokenKind::BraceR)? {
                    break;
                }
            }
            if self.is(TokenKind::Ellipsis) {
                let rest_start = self.start();
                self.next()?;
                let argument = Pattern::Identifier(self.parse_identifier(false)?);
                self.check_comma_after_rest('}')?;
                properties.push(ObjectPatternMember::Rest(self.alloc(RestElement {
                    data: self.finish(rest_start),
                    argument,
                    type_annotation: None,
                })));
                continue;
            }
            properties.push(self.parse_binding_property()?);
        }
        let properties = self.alloc_vec(properties);
        Ok(Pattern::Object(self.alloc(ObjectPattern { data: self.finish(start), properties, type_annotation: None })))
    }

    fn parse_binding_property(&mut self) -> PResult<ObjectPatternMember<'a>> {
        let start = self.start();
        let mut errors = ExpressionErrors::default();
        let (key, computed) = self.parse_property_name(Some(&mut errors), false)?;
        if let Some(pos) = errors.private_key {
            return Err(self.missing_plugins(pos, &["destructuringPrivate"]));
        }
        let (value, shorthand) = if self.eat(TokenKind::Colon)? {
            let value_start = self.start();
            let value = self.parse_binding_atom()?;
            (self.parse_maybe_default(value_start, value)?, false)
        } else {
            let Expression::Identifier(id) = key else { return Err(self.unexpected()) };
            if computed {
                return Err(self.unexpected());
            }
            self.check_reserved_word(id.name, start, true, true)?;
            let value = Pattern::Identifier(self.alloc(Identifier::new(id.data.span, id.name)));
            (self.parse_maybe_default(start, value)?, true)
        };
        let property = self.alloc(PatternProperty {
            data: self.finish(start),
            method: false,
            key,
            computed,
            shorthand,
            value,
        });
        Ok(dispatch!(self, Layer::OUTERMOST, finish_pattern_property(property))
            .unwrap_or(ObjectPatternMember::Property(property)))
    }

    /// Elements up to `close`, which is consumed.
    pub(crate) fn parse_binding_list(
        &mut self,
        close: TokenKind,
        close_char: char,
        flags: ListFlags,
    ) -> PResult<Vec<Option<Pattern<'a>>>> {
        let position = if flags.contains(ListFlags::IS_FUNCTION_PARAMS) {
            BindingPosition::Parameter
        } else {
            BindingPosition::VariableDeclarator
        };
        let old_modifiers = std::mem::replace(
            &mut self.state.parameter_modifiers_allowed,
            flags.contains(ListFlags::IS_CONSTRUCTOR_PARAMS),
        );
        let elements = self.parse_binding_list_items(close, close_char, flags, position);
        self.state.parameter_modifiers_allowed = old_modifiers;
        elements
    }

    fn parse_binding_list_items(
        &mut self,
        close: TokenKind,
        close_char: char,
        flags: ListFlags,
        position: BindingPosition,
    ) -> PResult<Vec<Option<Pattern<'a>>>> {
        let mut elements = Vec::new();
        let mut first = true;
        while !self.eat(close)? {
            if first {
                first = false;
            } else {
                self.expect(TokenKind::Comma)?;
            }
            if flags.contains(ListFlags::ALLOW_EMPTY) && self.is(TokenKind::Comma) {
                elements.push(None);
            } else if self.eat(close)? {
                break;
            } else if self.is(TokenKind::Ellipsis) {
                let rest = self.parse_rest_binding()?;
                let (rest, _) = self.parse_binding_annotation(rest, position)?;
                elements.push(Some(rest));
                if !self.check_comma_after_rest(close_char)? {
                    self.expect(close)?;
                    break;
                }
            } else {
                let decorators = self.parse_parameter_decorators()?;
                elements.push(Some(self.parse_assignable_list_item(position, decorators)?));
            }
        }
        Ok(elements)
    }

    fn parse_parameter_decorators(&mut self) -> PResult<&'a [&'a Decorator<'a>]> {
        if !self.is(TokenKind::At) {
            return Ok(&[]);
        }
        if self.has_plugin(crate::options::Plugins::DECORATORS) {
            self.raise(&messages::UNSUPPORTED_PARAMETER_DECORATOR, self.start(), &[])?;
        }
        self.parse_decorators()
    }

    /// A parameter or array pattern element with its annotation and default.
    fn parse_assignable_list_item(
        &mut self,
        position: BindingPosition,
        decorators: &'a [&'a Decorator<'a>],
    ) -> PResult<Pattern<'a>> {
        if let Some(pattern) = dispatch!(self, Layer::OUTERMOST, parse_assignable_list_item(decorators)) {
            return Ok(pattern);
        }
        let start = self.start();
        let left = self.parse_binding_atom()?;
        let (left, _) = self.parse_binding_annotation(left, position)?;
        self.parse_maybe_default(start, left)
    }

    /// `?` and `: T` after a binding, when an overlay supplies them.
    pub(crate) fn parse_binding_annotation(
        &mut self,
        pattern: Pattern<'a>,
        position: BindingPosition,
    ) -> PResult<(Pattern<'a>, bool)> {
        Ok(dispatch!(self, Layer::OUTERMOST, parse_binding_annotation(pattern, position)).unwrap_or((pattern, false)))
    }

    /// `...pattern`, at the `...`.
    pub(crate) fn parse_rest_binding(&mut self) -> PResult<Pattern<'a>> {
        let start = self.start();
        self.next()?;
        let argument = self.parse_binding_atom()?;
        Ok(Pattern::Rest(self.alloc(RestElement { data: self.finish(start), argument, type_annotation: None })))
    }

    /// After a rest element. Reports a following comma and returns whether
    /// there was one.
    pub(crate) fn check_comma_after_rest(&mut self, close: char) -> PResult<bool> {
        if !self.is(TokenKind::Comma) {
            return Ok(false);
        }
        let message = if self.lookahead_char() == Some(close) {
            &messages::REST_TRAILING_COMMA
        } else {
            &messages::ELEMENT_AFTER_REST
        };
        self.raise(message, self.start(), &[])?;
        Ok(true)
    }

    /// `left = default`, or `left` alone.
    pub(crate) fn parse_maybe_default(&mut self, start: usize, left: Pattern<'a>) -> PResult<Pattern<'a>> {
        if !self.eat(TokenKind::Eq)? {
            return Ok(left);
        }
        let right = self.parse_maybe_assign_allow_in(None)?;
        Ok(Pattern::Assignment(self.alloc(AssignmentPattern { data: self.finish(start), left, right })))
    }
}
