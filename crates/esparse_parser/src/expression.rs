//! Expression grammar.
//!
//! Parenthesized lists, call arguments and object or array literals are
//! parsed as expressions first and converted to patterns once an arrow or
//! an `=` shows they were targets. [`ExpressionErrors`] carries the errors
//! that only apply if the cover grammar stays an expression.

use crate::lval::{BindingPosition, ListFlags, LvalTarget};
use crate::options::Plugins;
use crate::overlay::{dispatch, Layer};
use crate::parser::{PResult, Parser};
use crate::statement::FunctionFlags;
use crate::utilities::*;
use esparse_ast::*;
use esparse_core::collections::FxHashSet;
use esparse_diagnostics::messages;
use esparse_scope::{BindingFlags, ParamFlags, ScopeFlags};
use tracing::trace;

/// Errors a cover grammar defers until it is known to be an expression.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExpressionErrors {
    /// `{ a = 1 }` outside a pattern.
    pub shorthand_assign: Option<usize>,
    /// A second `__proto__: v` property.
    pub double_proto: Option<usize>,
    /// `#x` used as an object key.
    pub private_key: Option<usize>,
    /// `(a?)` that turned out not to be arrow parameters.
    pub optional_parameters: Option<usize>,
}

/// Progress through a chain of member accesses and calls.
#[derive(Debug, Clone, Copy, Default)]
pub struct SubscriptState {
    /// The chain contains `?.`.
    pub optional_chain_member: bool,
    /// The base is `async` and a `(` here may start arrow parameters.
    pub maybe_async_arrow: bool,
    pub stop: bool,
    /// Calls end the chain, as in a `new` callee.
    pub no_calls: bool,
}

/// An entry of a parenthesized list.
#[derive(Debug, Clone, Copy)]
enum ParenItem<'a> {
    Expression(Expression<'a>),
    Rest(Pattern<'a>),
}

/// What a function body needs to know about its function.
#[derive(Debug, Clone, Copy)]
pub(crate) struct FunctionBodyContext<'a> {
    pub(crate) params: &'a [Pattern<'a>],
    pub(crate) id: Option<&'a Identifier<'a>>,
    pub(crate) is_arrow: bool,
    pub(crate) is_method: bool,
    /// Where a `"use strict"` conflicting with the parameters is reported.
    pub(crate) directive_error_pos: usize,
}

/// How a method's parameters and body are parsed.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct MethodContext {
    pub(crate) generator: bool,
    pub(crate) is_async: bool,
    pub(crate) is_constructor: bool,
    pub(crate) allow_direct_super: bool,
    pub(crate) in_class: bool,
    pub(crate) allow_bodiless: bool,
    pub(crate) directive_error_pos: usize,
}

/// The parsed parts of a method.
#[derive(Debug, Clone, Copy)]
pub(crate) struct MethodParts<'a> {
    pub(crate) type_parameters: Option<TypeParameters<'a>>,
    pub(crate) params: &'a [Pattern<'a>],
    pub(crate) return_type: Option<TypeAnnotation<'a>>,
    pub(crate) body: Option<&'a BlockStatement<'a>>,
}

impl<'a> Parser<'a> {
    // ========================================================================
    // `in` handling
    // ========================================================================

    pub(crate) fn allow_in_and<T>(&mut self, f: impl FnOnce(&mut Self) -> PResult<T>) -> PResult<T> {
        let flags = self.prod_param.current_flags();
        if flags.contains(ParamFlags::IN) {
            return f(self);
        }
        self.prod_param.enter(flags | ParamFlags::IN);
        let result = f(self);
        self.prod_param.exit();
        result
    }

    pub(crate) fn disallow_in_and<T>(&mut self, f: impl FnOnce(&mut Self) -> PResult<T>) -> PResult<T> {
        let flags = self.prod_param.current_flags();
        if !flags.contains(ParamFlags::IN) {
            return f(self);
        }
        self.prod_param.enter(flags - ParamFlags::IN);
        let result = f(self);
        self.prod_param.exit();
        result
    }

    // ========================================================================
    // Comma and assignment
    // ========================================================================

    /// Expression with `in` allowed, including sequences.
    pub(crate) fn parse_expression(&mut self) -> PResult<Expression<'a>> {
        self.allow_in_and(|p| p.parse_expression_base(None))
    }

    pub(crate) fn parse_expression_base(&mut self, mut errors: Option<&mut ExpressionErrors>) -> PResult<Expression<'a>> {
        let start = self.start();
        let expr = self.parse_maybe_assign(errors.as_deref_mut())?;
        if !self.is(TokenKind::Comma) {
            return Ok(expr);
        }
        let mut expressions = vec![expr];
        while self.eat(TokenKind::Comma)? {
            expressions.push(self.parse_maybe_assign(errors.as_deref_mut())?);
        }
        self.to_referenced_list(&expressions, false)?;
        let expressions = self.alloc_vec(expressions);
        Ok(Expression::Sequence(self.alloc(SequenceExpression { data: self.finish(start), expressions })))
    }

    pub(crate) fn parse_maybe_assign_allow_in(&mut self, errors: Option<&mut ExpressionErrors>) -> PResult<Expression<'a>> {
        self.allow_in_and(|p| p.parse_maybe_assign(errors))
    }

    pub(crate) fn parse_maybe_assign_disallow_in(
        &mut self,
        errors: Option<&mut ExpressionErrors>,
    ) -> PResult<Expression<'a>> {
        self.disallow_in_and(|p| p.parse_maybe_assign(errors))
    }

    #[inline]
    pub(crate) fn parse_maybe_assign(&mut self, errors: Option<&mut ExpressionErrors>) -> PResult<Expression<'a>> {
        self.parse_maybe_assign_from(Layer::OUTERMOST, errors)
    }

    pub(crate) fn parse_maybe_assign_from(
        &mut self,
        layer: Layer,
        mut errors: Option<&mut ExpressionErrors>,
    ) -> PResult<Expression<'a>> {
        self.with_recursion_guard(|p| {
            if let Some(expr) = dispatch!(p, layer, parse_maybe_assign(errors.as_deref_mut())) {
                return Ok(expr);
            }
            p.base_parse_maybe_assign(errors, false)
        })
    }

    /// An item of a parenthesized list, array or argument list, where an
    /// overlay may attach `?` or a type annotation after the expression.
    pub(crate) fn parse_maybe_assign_list_item(
        &mut self,
        mut errors: Option<&mut ExpressionErrors>,
    ) -> PResult<Expression<'a>> {
        self.with_recursion_guard(|p| {
            if let Some(expr) = dispatch!(p, Layer::OUTERMOST, parse_maybe_assign(errors.as_deref_mut())) {
                return p.parse_paren_item(expr, span_start(expr.span()));
            }
            p.base_parse_maybe_assign(errors, true)
        })
    }

    pub(crate) fn base_parse_maybe_assign(
        &mut self,
        errors: Option<&mut ExpressionErrors>,
        paren_item: bool,
    ) -> PResult<Expression<'a>> {
        let start = self.start();
        if self.is_contextual("yield") && self.prod_param.has_yield() {
            let expr = self.parse_yield(start)?;
            return if paren_item { self.parse_paren_item(expr, start) } else { Ok(expr) };
        }

        let mut own = ExpressionErrors::default();
        let owns_errors = errors.is_none();
        let errors = match errors {
            Some(errors) => errors,
            None => &mut own,
        };

        if matches!(self.token(), TokenKind::ParenL | TokenKind::Name) {
            self.state.potential_arrow_at = Some(start);
        }
        let mut left = self.parse_maybe_conditional(Some(&mut *errors))?;
        if paren_item {
            left = self.parse_paren_item(left, start)?;
        }

        if !self.token().is_assign() {
            if owns_errors {
                self.check_expression_errors(errors, true)?;
            }
            return Ok(left);
        }

        let operator = if self.is(TokenKind::Eq) {
            AssignmentOperator::Assign
        } else {
            AssignmentOperator::from_text(self.token_str()).ok_or_else(|| self.unexpected())?
        };
        let target = if operator == AssignmentOperator::Assign {
            let target = self.to_assignable(left, true)?;
            if errors.double_proto.is_some_and(|pos| pos >= start) {
                errors.double_proto = None;
            }
            if errors.shorthand_assign.is_some_and(|pos| pos >= start) {
                errors.shorthand_assign = None;
            }
            if let Some(pos) = errors.private_key.filter(|&pos| pos >= start) {
                self.raise(&messages::UNEXPECTED_PRIVATE_FIELD, pos, &[])?;
                errors.private_key = None;
            }
            target
        } else {
            self.simple_target(left, "assignment expression")?
        };
        self.next()?;
        let right = self.parse_maybe_assign(None)?;
        self.check_lval(&target, LvalTarget::assign("assignment expression"), None)?;
        Ok(Expression::Assignment(self.alloc(AssignmentExpression {
            data: self.finish(start),
            operator,
            left: target,
            right,
        })))
    }

    /// The paren-item hook, for `(a?: T) => {}` style parameters.
    fn parse_paren_item(&mut self, expr: Expression<'a>, start: usize) -> PResult<Expression<'a>> {
        Ok(dispatch!(self, Layer::OUTERMOST, parse_paren_item(expr, start)).unwrap_or(expr))
    }

    // ========================================================================
    // Conditional and binary operators
    // ========================================================================

    fn parse_maybe_conditional(&mut self, mut errors: Option<&mut ExpressionErrors>) -> PResult<Expression<'a>> {
        let start = self.start();
        let potential_arrow_at = self.state.potential_arrow_at;
        let expr = self.parse_expr_ops(errors.as_deref_mut())?;
        if should_exit_descending(&expr, potential_arrow_at) {
            return Ok(expr);
        }
        self.parse_conditional_from(Layer::OUTERMOST, expr, start, errors)
    }

    pub(crate) fn parse_conditional_from(
        &mut self,
        layer: Layer,
        expr: Expression<'a>,
        start: usize,
        mut errors: Option<&mut ExpressionErrors>,
    ) -> PResult<Expression<'a>> {
        if let Some(result) = dispatch!(self, layer, parse_conditional(expr, start, errors.as_deref_mut())) {
            return Ok(result);
        }
        self.base_parse_conditional(expr, start)
    }

    pub(crate) fn base_parse_conditional(&mut self, test: Expression<'a>, start: usize) -> PResult<Expression<'a>> {
        if !self.eat(TokenKind::Question)? {
            return Ok(test);
        }
        let consequent = self.parse_maybe_assign_allow_in(None)?;
        self.expect(TokenKind::Colon)?;
        let alternate = self.parse_maybe_assign(None)?;
        Ok(Expression::Conditional(self.alloc(ConditionalExpression {
            data: self.finish(start),
            test,
            consequent,
            alternate,
        })))
    }

    fn parse_expr_ops(&mut self, errors: Option<&mut ExpressionErrors>) -> PResult<Expression<'a>> {
        let start = self.start();
        let potential_arrow_at = self.state.potential_arrow_at;
        let expr = self.parse_maybe_unary_or_private(errors)?;
        if should_exit_descending(&expr, potential_arrow_at) {
            return Ok(expr);
        }
        self.parse_expr_op(expr, start, 0)
    }

    fn parse_maybe_unary_or_private(&mut self, errors: Option<&mut ExpressionErrors>) -> PResult<Expression<'a>> {
        if self.is(TokenKind::PrivateName) {
            return Ok(Expression::PrivateName(self.parse_private_name()?));
        }
        self.parse_maybe_unary(errors, false)
    }

    /// Binary operators binding tighter than `min_prec`, applied to `left`.
    pub(crate) fn parse_expr_op(&mut self, left: Expression<'a>, left_start: usize, min_prec: u8) -> PResult<Expression<'a>> {
        let mut left = left;
        loop {
            if let Some(expr) = dispatch!(self, Layer::OUTERMOST, parse_expr_op(left, left_start, min_prec)) {
                left = expr;
                continue;
            }
            match self.base_parse_expr_op(left, left_start, min_prec)? {
                Some(expr) => left = expr,
                None => return Ok(left),
            }
        }
    }

    /// One operator step. `None` when the current token does not continue
    /// the expression at this precedence.
    fn base_parse_expr_op(
        &mut self,
        left: Expression<'a>,
        left_start: usize,
        min_prec: u8,
    ) -> PResult<Option<Expression<'a>>> {
        let in_prec = TokenKind::In.binop().unwrap_or(7);
        if let Expression::PrivateName(name) = left {
            // `#x in obj`
            if min_prec >= in_prec || !self.prod_param.has_in() || !self.is(TokenKind::In) {
                self.raise(&messages::PRIVATE_IN_EXPECTED_IN, left_start, &[name.id.name])?;
            }
            self.use_private_name(name)?;
        }

        let op = self.token();
        let Some(mut prec) = op.binop() else { return Ok(None) };
        if op == TokenKind::In && !self.prod_param.has_in() {
            return Ok(None);
        }
        if prec <= min_prec {
            return Ok(None);
        }
        let text = self.word();
        let logical = matches!(op, TokenKind::LogicalOr | TokenKind::LogicalAnd);
        let coalesce = op == TokenKind::NullishCoalescing;
        if coalesce {
            prec = TokenKind::LogicalAnd.binop().unwrap_or(prec);
        }
        self.next()?;

        let right_start = self.start();
        let right = self.parse_maybe_unary_or_private(None)?;
        let right = self.parse_expr_op(right, right_start, if op.right_assoc() { prec - 1 } else { prec })?;

        let node = if logical || coalesce {
            let operator = LogicalOperator::from_text(text).ok_or_else(|| self.unexpected())?;
            Expression::Logical(self.alloc(LogicalExpression { data: self.finish(left_start), operator, left, right }))
        } else {
            let operator = BinaryOperator::from_text(text).ok_or_else(|| self.unexpected())?;
            Expression::Binary(self.alloc(BinaryExpression { data: self.finish(left_start), operator, left, right }))
        };

        // `a ?? b || c` needs parentheses
        let next = self.token();
        if (coalesce && matches!(next, TokenKind::LogicalOr | TokenKind::LogicalAnd))
            || (logical && next == TokenKind::NullishCoalescing)
        {
            self.raise(&messages::MIXING_COALESCE_WITH_LOGICAL, self.start(), &[])?;
        }
        Ok(Some(node))
    }

    // ========================================================================
    // Unary, update, await and yield
    // ========================================================================

    pub(crate) fn parse_maybe_unary(
        &mut self,
        errors: Option<&mut ExpressionErrors>,
        saw_unary: bool,
    ) -> PResult<Expression<'a>> {
        self.with_recursion_guard(|p| {
            if let Some(expr) = dispatch!(p, Layer::OUTERMOST, parse_maybe_unary()) {
                return Ok(expr);
            }
            p.base_parse_maybe_unary(errors, saw_unary)
        })
    }

    pub(crate) fn base_parse_maybe_unary(
        &mut self,
        errors: Option<&mut ExpressionErrors>,
        saw_unary: bool,
    ) -> PResult<Expression<'a>> {
        let start = self.start();
        let is_await = self.is_contextual("await");
        if is_await && self.prod_param.has_await() {
            self.next()?;
            let expr = self.parse_await(start)?;
            if !saw_unary {
                self.check_exponential_after_unary(&expr)?;
            }
            return Ok(expr);
        }

        let kind = self.token();
        if kind.is_prefix() {
            let text = self.word();
            let is_delete = kind == TokenKind::Delete;
            self.next()?;
            let argument = self.parse_maybe_unary(None, true)?;
            if kind == TokenKind::IncDec {
                self.check_simple_target(&argument, "prefix operation")?;
                let operator = UpdateOperator::from_text(text).ok_or_else(|| self.unexpected())?;
                return Ok(Expression::Update(self.alloc(UpdateExpression {
                    data: self.finish(start),
                    operator,
                    prefix: true,
                    argument,
                })));
            }
            if is_delete && self.is_strict() {
                if matches!(argument, Expression::Identifier(_)) {
                    self.raise(&messages::STRICT_DELETE, start, &[])?;
                } else if has_private_property(&argument) {
                    self.raise(&messages::DELETE_PRIVATE_FIELD, start, &[])?;
                }
            }
            let operator = UnaryOperator::from_text(text).ok_or_else(|| self.unexpected())?;
            let expr = Expression::Unary(self.alloc(UnaryExpression {
                data: self.finish(start),
                operator,
                prefix: true,
                argument,
            }));
            if !saw_unary {
                self.check_exponential_after_unary(&expr)?;
            }
            return Ok(expr);
        }

        let expr = self.parse_update(start, errors)?;
        if is_await {
            // `await x` outside an async function
            let kind = self.token();
            let starts_expr = self.token_starts_expr() && (kind != TokenKind::Modulo || self.has_plugin(Plugins::V8INTRINSIC));
            if starts_expr && !self.is_ambiguous_await() {
                let message = if self.scope.in_function() {
                    &messages::AWAIT_NOT_IN_ASYNC_FUNCTION
                } else {
                    &messages::AWAIT_NOT_IN_ASYNC_CONTEXT
                };
                self.raise_overwrite(message, start, &[])?;
                return self.parse_await(start);
            }
        }
        Ok(expr)
    }

    fn parse_update(&mut self, start: usize, mut errors: Option<&mut ExpressionErrors>) -> PResult<Expression<'a>> {
        let mut expr = self.parse_expr_subscripts(errors.as_deref_mut())?;
        if let Some(errors) = errors {
            if self.check_expression_errors(errors, false)? {
                return Ok(expr);
            }
        }
        while self.token().is_postfix() && !self.can_insert_semicolon() {
            let operator = UpdateOperator::from_text(self.token_str()).ok_or_else(|| self.unexpected())?;
            self.next()?;
            self.check_simple_target(&expr, "postfix operation")?;
            expr = Expression::Update(self.alloc(UpdateExpression {
                data: self.finish(start),
                operator,
                prefix: false,
                argument: expr,
            }));
        }
        Ok(expr)
    }

    fn check_exponential_after_unary(&mut self, expr: &Expression<'a>) -> PResult<()> {
        if !self.is(TokenKind::Exponent) {
            return Ok(());
        }
        let argument_start = match expr {
            Expression::Unary(unary) => span_start(unary.argument.span()),
            Expression::Await(await_expr) => span_start(await_expr.argument.span()),
            _ => return Ok(()),
        };
        self.raise(&messages::UNEXPECTED_TOKEN_UNARY_EXPONENTIATION, argument_start, &[])
    }

    /// After `await` in a context where it could also be an identifier.
    fn is_ambiguous_await(&self) -> bool {
        if self.has_preceding_line_break() {
            return true;
        }
        let kind = self.token();
        matches!(
            kind,
            TokenKind::PlusMin
                | TokenKind::ParenL
                | TokenKind::BracketL
                | TokenKind::Slash
                | TokenKind::Regexp
        ) || self.at_template_start()
            || (kind == TokenKind::Modulo && self.has_plugin(Plugins::V8INTRINSIC))
    }

    /// `await` has been consumed.
    fn parse_await(&mut self, start: usize) -> PResult<Expression<'a>> {
        if self.state.in_parameters {
            self.raise(&messages::AWAIT_EXPRESSION_FORMAL_PARAMETER, start, &[])?;
        } else if self.state.maybe_in_arrow_parameters {
            self.state.await_pos.get_or_insert(start);
        }
        if !self.scope.in_function() && !self.options.allow_await_outside_function {
            if self.is_ambiguous_await() {
                self.state.ambiguous_script_different_ast = true;
            } else {
                self.state.saw_unambiguous_esm = true;
            }
        }
        let argument = self.parse_maybe_unary(None, true)?;
        Ok(Expression::Await(self.alloc(AwaitExpression { data: self.finish(start), argument })))
    }

    /// `yield` is the current token.
    fn parse_yield(&mut self, start: usize) -> PResult<Expression<'a>> {
        if self.state.in_parameters {
            self.raise(&messages::YIELD_IN_PARAMETER, start, &[])?;
        } else if self.state.maybe_in_arrow_parameters {
            self.state.yield_pos.get_or_insert(start);
        }
        self.next()?;
        let mut delegate = false;
        let mut argument = None;
        if !self.has_preceding_line_break() {
            delegate = self.eat(TokenKind::Star)?;
            let at_end = ends_yield_argument(self.token()) || self.scanner.token_resumes_template();
            if delegate || !at_end {
                argument = Some(self.parse_maybe_assign(None)?);
            }
        }
        Ok(Expression::Yield(self.alloc(YieldExpression { data: self.finish(start), delegate, argument })))
    }
}

impl<'a> Parser<'a> {
    // ========================================================================
    // Member access and calls
    // ========================================================================

    pub(crate) fn parse_expr_subscripts(&mut self, errors: Option<&mut ExpressionErrors>) -> PResult<Expression<'a>> {
        let start = self.start();
        let potential_arrow_at = self.state.potential_arrow_at;
        let expr = self.parse_expr_atom(errors)?;
        if should_exit_descending(&expr, potential_arrow_at) {
            return Ok(expr);
        }
        self.parse_subscripts(expr, start, false)
    }

    pub(crate) fn parse_subscripts(&mut self, base: Expression<'a>, start: usize, no_calls: bool) -> PResult<Expression<'a>> {
        let mut state = SubscriptState {
            optional_chain_member: false,
            maybe_async_arrow: self.at_possible_async_arrow(&base),
            stop: false,
            no_calls,
        };
        let mut base = base;
        loop {
            base = self.parse_subscript_from(Layer::OUTERMOST, base, start, &mut state)?;
            state.maybe_async_arrow = false;
            if state.stop {
                break;
            }
        }
        if state.optional_chain_member {
            if let Some(chain) = dispatch!(self, Layer::OUTERMOST, finish_optional_chain(base)) {
                return Ok(chain);
            }
        }
        Ok(base)
    }

    /// `async` directly followed by something that may be arrow parameters.
    fn at_possible_async_arrow(&self, base: &Expression<'a>) -> bool {
        let Expression::Identifier(id) = base else { return false };
        let span = id.data.span;
        id.name == "async"
            && self.last_end() == span_end(span)
            && !self.can_insert_semicolon()
            && span_end(span) - span_start(span) == 5
            && self.state.potential_arrow_at == Some(span_start(span))
    }

    pub(crate) fn parse_subscript_from(
        &mut self,
        layer: Layer,
        base: Expression<'a>,
        start: usize,
        state: &mut SubscriptState,
    ) -> PResult<Expression<'a>> {
        if let Some(expr) = dispatch!(self, layer, parse_subscript(base, start, &mut *state)) {
            return Ok(expr);
        }
        self.base_parse_subscript(base, start, state)
    }

    fn base_parse_subscript(
        &mut self,
        base: Expression<'a>,
        start: usize,
        state: &mut SubscriptState,
    ) -> PResult<Expression<'a>> {
        if self.at_template_start() {
            return self.parse_tagged_template(base, start, state, None);
        }
        let mut optional = false;
        if self.is(TokenKind::QuestionDot) {
            if state.no_calls {
                self.raise(&messages::OPTIONAL_CHAINING_NO_NEW, self.start(), &[])?;
                if self.lookahead_char() == Some('(') {
                    state.stop = true;
                    return Ok(base);
                }
            }
            state.optional_chain_member = true;
            optional = true;
            self.next()?;
        }
        if !state.no_calls && self.is(TokenKind::ParenL) {
            return self.parse_call_tail(base, start, state, optional, None);
        }
        let computed = self.eat(TokenKind::BracketL)?;
        if computed || optional || self.eat(TokenKind::Dot)? {
            return self.parse_member(base, start, state, computed, optional);
        }
        state.stop = true;
        Ok(base)
    }

    /// After `.`, `?.` or `[`.
    pub(crate) fn parse_member(
        &mut self,
        object: Expression<'a>,
        start: usize,
        state: &SubscriptState,
        computed: bool,
        optional: bool,
    ) -> PResult<Expression<'a>> {
        let property = if computed {
            let property = self.parse_expression()?;
            self.expect(TokenKind::BracketR)?;
            property
        } else if self.is(TokenKind::PrivateName) {
            if matches!(object, Expression::Super(_)) {
                self.raise(&messages::SUPER_PRIVATE_FIELD, start, &[])?;
            }
            let name = self.parse_private_name()?;
            self.use_private_name(name)?;
            Expression::PrivateName(name)
        } else {
            Expression::Identifier(self.parse_identifier(true)?)
        };
        let kind = if state.optional_chain_member && !self.has_plugin(Plugins::ESTREE) {
            MemberType::OptionalMemberExpression
        } else {
            MemberType::MemberExpression
        };
        Ok(Expression::Member(self.alloc(MemberExpression {
            kind,
            data: self.finish(start),
            object,
            computed,
            property,
            optional: state.optional_chain_member.then_some(optional),
        })))
    }

    /// A call whose `(` is the current token. Also covers the head of
    /// `async (a) => {}`.
    pub(crate) fn parse_call_tail(
        &mut self,
        callee: Expression<'a>,
        start: usize,
        state: &mut SubscriptState,
        optional: bool,
        type_parameters: Option<TypeArguments<'a>>,
    ) -> PResult<Expression<'a>> {
        let old_maybe_in_arrow = self.state.maybe_in_arrow_parameters;
        let outer = self.take_arrow_positions();
        self.state.maybe_in_arrow_parameters = true;
        self.next()?;

        let maybe_async_arrow = state.maybe_async_arrow;
        let mut errors = ExpressionErrors::default();
        let is_import = matches!(callee, Expression::Import(_));
        let (arguments, trailing_comma) = self.parse_call_arguments(
            TokenKind::ParenR,
            if maybe_async_arrow && !optional { Some(&mut errors) } else { None },
        )?;

        if maybe_async_arrow && self.should_parse_async_arrow() && !optional {
            state.stop = true;
            trace!(pos = start, "async arrow head");
            self.check_arrow_positions(true)?;
            if let Some(pos) = errors.private_key {
                self.raise(&messages::UNEXPECTED_PRIVATE_FIELD, pos, &[])?;
            }
            let items: Vec<Option<ExprOrSpread<'a>>> = arguments.into_iter().map(Some).collect();
            let params = self.to_assignable_list(&items, trailing_comma, false)?;
            let params = params.into_iter().flatten().collect();
            let return_type = if self.is(TokenKind::Colon) {
                Some(self.parse_arrow_return_type()?)
            } else {
                None
            };
            if self.has_preceding_line_break() && self.is(TokenKind::Arrow) {
                self.raise(&messages::LINE_TERMINATOR_BEFORE_ARROW, self.start(), &[])?;
            }
            self.expect(TokenKind::Arrow)?;
            let arrow = self.parse_arrow_expression(start, params, true, None, return_type)?;
            self.restore_arrow_positions(outer, old_maybe_in_arrow);
            self.state.maybe_in_arrow_parameters = old_maybe_in_arrow;
            return Ok(arrow);
        }

        if maybe_async_arrow {
            self.check_expression_errors(&errors, true)?;
        }
        self.to_referenced_arguments(&arguments)?;
        let span = self.span(start, self.last_end());
        let call = if is_import {
            self.finish_import_call_arguments(span, callee, &arguments, optional, state)?
        } else {
            let arguments = self.alloc_vec(arguments);
            Expression::Call(self.alloc(CallExpression {
                kind: if state.optional_chain_member && !self.has_plugin(Plugins::ESTREE) {
                    CallType::OptionalCallExpression
                } else {
                    CallType::CallExpression
                },
                data: self.finish(start),
                callee,
                arguments,
                optional: state.optional_chain_member.then_some(optional),
                type_parameters,
            }))
        };
        self.restore_arrow_positions(outer, old_maybe_in_arrow);
        self.state.maybe_in_arrow_parameters = old_maybe_in_arrow;
        Ok(call)
    }

    /// `import(source)` or `import(source, options)`.
    fn finish_import_call_arguments(
        &mut self,
        span: esparse_core::text::Span,
        callee: Expression<'a>,
        arguments: &[ExprOrSpread<'a>],
        optional: bool,
        state: &SubscriptState,
    ) -> PResult<Expression<'a>> {
        let start = span_start(span);
        if arguments.is_empty() || arguments.len() > 2 {
            self.raise(&messages::IMPORT_CALL_ARITY, start, &[])?;
        } else {
            let mut all_plain = true;
            for argument in arguments {
                if let ExprOrSpread::Spread(spread) = argument {
                    self.raise(&messages::IMPORT_CALL_SPREAD_ARGUMENT, span_start(spread.data.span), &[])?;
                    all_plain = false;
                }
            }
            if all_plain {
                let source = match arguments[0] {
                    ExprOrSpread::Expression(expr) => expr,
                    ExprOrSpread::Spread(spread) => spread.argument,
                };
                let options = arguments.get(1).map(|argument| match *argument {
                    ExprOrSpread::Expression(expr) => expr,
                    ExprOrSpread::Spread(spread) => spread.argument,
                });
                if let Some(expr) = dispatch!(self, Layer::OUTERMOST, finish_import_call(span, source, options)) {
                    return Ok(expr);
                }
            }
        }
        let arguments = self.alloc_vec(arguments.to_vec());
        Ok(Expression::Call(self.alloc(CallExpression {
            kind: CallType::CallExpression,
            data: NodeData::new(span),
            callee,
            arguments,
            optional: state.optional_chain_member.then_some(optional),
            type_parameters: None,
        })))
    }

    fn should_parse_async_arrow(&self) -> bool {
        (self.is(TokenKind::Arrow) && !self.can_insert_semicolon())
            || (self.is(TokenKind::Colon) && self.has_type_plugin())
            || (self.is(TokenKind::Arrow) && self.has_preceding_line_break())
    }

    /// Arguments up to `close`, which is consumed. Returns the position of a
    /// trailing comma, if any.
    pub(crate) fn parse_call_arguments(
        &mut self,
        close: TokenKind,
        mut errors: Option<&mut ExpressionErrors>,
    ) -> PResult<(Vec<ExprOrSpread<'a>>, Option<usize>)> {
        let mut arguments = Vec::new();
        let mut trailing_comma = None;
        let mut first = true;
        self.allow_in_and(|p| {
            while !p.eat(close)? {
                if first {
                    first = false;
                } else {
                    p.expect(TokenKind::Comma)?;
                    if p.is(close) {
                        trailing_comma = Some(p.last_start());
                        p.next()?;
                        break;
                    }
                }
                arguments.push(p.parse_expr_list_item(errors.as_deref_mut())?);
            }
            Ok(())
        })?;
        Ok((arguments, trailing_comma))
    }

    /// An array element or argument.
    fn parse_expr_list_item(&mut self, errors: Option<&mut ExpressionErrors>) -> PResult<ExprOrSpread<'a>> {
        if self.is(TokenKind::Ellipsis) {
            return Ok(ExprOrSpread::Spread(self.parse_spread(errors)?));
        }
        Ok(ExprOrSpread::Expression(self.parse_maybe_assign_list_item(errors)?))
    }

    pub(crate) fn parse_spread(&mut self, errors: Option<&mut ExpressionErrors>) -> PResult<&'a SpreadElement<'a>> {
        let start = self.start();
        self.next()?;
        let argument = self.parse_maybe_assign_allow_in(errors)?;
        let argument = self.parse_paren_item(argument, span_start(argument.span()))?;
        Ok(self.alloc(SpreadElement { data: self.finish(start), argument }))
    }

    /// The template is the current token.
    pub(crate) fn parse_tagged_template(
        &mut self,
        tag: Expression<'a>,
        start: usize,
        state: &SubscriptState,
        type_parameters: Option<TypeArguments<'a>>,
    ) -> PResult<Expression<'a>> {
        if state.optional_chain_member {
            self.raise(&messages::OPTIONAL_CHAINING_NO_TEMPLATE, self.start(), &[])?;
        }
        let quasi = self.parse_template(true)?;
        Ok(Expression::TaggedTemplate(self.alloc(TaggedTemplateExpression {
            data: self.finish(start),
            tag,
            quasi,
            type_parameters,
        })))
    }

    /// Type arguments when the current token may open them.
    pub(crate) fn parse_type_arguments_opt(&mut self) -> PResult<Option<TypeArguments<'a>>> {
        if !matches!(self.token(), TokenKind::Lt | TokenKind::BitShiftL) {
            return Ok(None);
        }
        Ok(dispatch!(self, Layer::OUTERMOST, parse_type_arguments()))
    }

    // ========================================================================
    // new, super and import
    // ========================================================================

    fn parse_new_or_new_target(&mut self) -> PResult<Expression<'a>> {
        let start = self.start();
        self.next()?;
        if self.is(TokenKind::Dot) {
            let meta = self.identifier_at(start, self.last_end(), "new");
            self.next()?;
            let meta_property = self.parse_meta_property(start, meta, "target")?;
            if !self.scope.in_non_arrow_function()
                && !self.scope.in_class()
                && !self.options.allow_new_target_outside_function
            {
                self.raise(&messages::UNEXPECTED_NEW_TARGET, start, &[])?;
            }
            return Ok(meta_property);
        }

        let callee_start = self.start();
        let atom = self.parse_expr_atom(None)?;
        let callee = self.parse_subscripts(atom, callee_start, true)?;
        if matches!(callee, Expression::Import(_)) {
            self.raise(&messages::IMPORT_CALL_NOT_NEW_EXPRESSION, callee_start, &[])?;
        }
        let type_parameters = self.parse_type_arguments_opt()?;
        let arguments = if self.is(TokenKind::ParenL) {
            self.next()?;
            let (arguments, _) = self.parse_call_arguments(TokenKind::ParenR, None)?;
            self.to_referenced_arguments(&arguments)?;
            arguments
        } else {
            Vec::new()
        };
        let arguments = self.alloc_vec(arguments);
        Ok(Expression::New(self.alloc(NewExpression {
            data: self.finish(start),
            callee,
            arguments,
            type_parameters,
        })))
    }

    /// The property of `new.target` or `import.meta`.
    fn parse_meta_property(&mut self, start: usize, meta: &'a Identifier<'a>, property_name: &str) -> PResult<Expression<'a>> {
        let contains_esc = self.scanner.contains_esc();
        let property = self.parse_identifier(true)?;
        if property.name != property_name || contains_esc {
            self.raise(
                &messages::UNSUPPORTED_META_PROPERTY,
                span_start(property.data.span),
                &[meta.name, property_name],
            )?;
        }
        Ok(Expression::MetaProperty(self.alloc(MetaProperty { data: self.finish(start), meta, property })))
    }

    fn parse_super(&mut self) -> PResult<Expression<'a>> {
        let start = self.start();
        self.next()?;
        let allow_outside = self.options.allow_super_outside_method;
        if self.is(TokenKind::ParenL) && !self.scope.allow_direct_super() && !allow_outside {
            self.raise(&messages::SUPER_NOT_ALLOWED, start, &[])?;
        } else if !self.scope.allow_super() && !allow_outside {
            self.raise(&messages::UNEXPECTED_SUPER, start, &[])?;
        }
        if !matches!(self.token(), TokenKind::ParenL | TokenKind::BracketL | TokenKind::Dot) {
            self.raise(&messages::UNSUPPORTED_SUPER, start, &[])?;
        }
        Ok(Expression::Super(self.alloc(Super { data: self.finish(start) })))
    }

    /// `import` in expression position: `import.meta` or the callee of a
    /// dynamic import.
    fn parse_import_atom(&mut self) -> PResult<Expression<'a>> {
        let start = self.start();
        self.next()?;
        if self.is(TokenKind::Dot) {
            let meta = self.identifier_at(start, self.last_end(), "import");
            self.next()?;
            if self.is_contextual("meta") {
                if !self.in_module {
                    self.raise(&messages::IMPORT_META_OUTSIDE_MODULE, start, &[])?;
                }
                self.state.saw_unambiguous_esm = true;
            }
            return self.parse_meta_property(start, meta, "meta");
        }
        if !self.is(TokenKind::ParenL) {
            self.raise(&messages::UNSUPPORTED_IMPORT, self.last_start(), &[])?;
        }
        Ok(Expression::Import(self.alloc(Import { data: self.finish(start) })))
    }
}

impl<'a> Parser<'a> {
    // ========================================================================
    // Atoms
    // ========================================================================

    pub(crate) fn parse_expr_atom(&mut self, errors: Option<&mut ExpressionErrors>) -> PResult<Expression<'a>> {
        self.with_recursion_guard(|p| {
            if let Some(expr) = dispatch!(p, Layer::OUTERMOST, parse_expr_atom()) {
                return Ok(expr);
            }
            p.base_parse_expr_atom(errors)
        })
    }

    pub(crate) fn base_parse_expr_atom(&mut self, errors: Option<&mut ExpressionErrors>) -> PResult<Expression<'a>> {
        let start = self.start();
        let can_be_arrow = self.state.potential_arrow_at == Some(start);
        match self.token() {
            TokenKind::Super => self.parse_super(),
            TokenKind::Import => self.parse_import_atom(),
            TokenKind::This => {
                self.next()?;
                Ok(Expression::This(self.alloc(ThisExpression { data: self.finish(start) })))
            }
            TokenKind::Name => self.parse_name_atom(start, can_be_arrow),
            TokenKind::Num
            | TokenKind::String
            | TokenKind::BigInt
            | TokenKind::Regexp
            | TokenKind::Null
            | TokenKind::True
            | TokenKind::False => self.parse_literal_atom(),
            TokenKind::Slash | TokenKind::SlashAssign => {
                self.scanner.read_regexp()?;
                self.parse_literal_atom()
            }
            TokenKind::ParenL => self.parse_paren_and_distinguish(can_be_arrow),
            TokenKind::BracketL => self.parse_array_like(errors),
            TokenKind::BraceL => self.parse_object_like(errors),
            TokenKind::Function => {
                self.next()?;
                Ok(Expression::Function(self.parse_function(start, FunctionFlags::empty())?))
            }
            TokenKind::Class => Ok(Expression::Class(self.parse_class(start, &[], false, true)?)),
            TokenKind::At => {
                let decorators = self.parse_decorators()?;
                if !self.is(TokenKind::Class) {
                    return Err(self.error_at(&messages::UNEXPECTED_LEADING_DECORATOR, start, &[]));
                }
                Ok(Expression::Class(self.parse_class(start, decorators, false, true)?))
            }
            TokenKind::New => self.parse_new_or_new_target(),
            TokenKind::TemplateTail | TokenKind::TemplateNonTail if self.at_template_start() => {
                Ok(Expression::TemplateLiteral(self.parse_template(false)?))
            }
            TokenKind::Lt => Err(self.missing_plugins(start, &["jsx", "flow", "typescript"])),
            TokenKind::Modulo => {
                if self.lookahead_char() == Some('%') {
                    Err(self.missing_plugins(start, &["placeholders"]))
                } else {
                    Err(self.missing_plugins(start, &["v8intrinsic"]))
                }
            }
            TokenKind::Placeholder => Err(self.missing_plugins(start, &["placeholders"])),
            _ => Err(self.unexpected()),
        }
    }

    /// An identifier atom, which may also open an async function or an arrow.
    fn parse_name_atom(&mut self, start: usize, can_be_arrow: bool) -> PResult<Expression<'a>> {
        let contains_esc = self.scanner.contains_esc();
        let id = self.parse_identifier(false)?;
        if !contains_esc && id.name == "async" && !self.can_insert_semicolon() {
            if self.is(TokenKind::Function) {
                self.next()?;
                return Ok(Expression::Function(self.parse_function(start, FunctionFlags::ASYNC)?));
            }
            if self.is(TokenKind::Name) {
                // `async x => x`
                if self.lookahead_char() == Some('=') {
                    return self.parse_async_arrow_unary(start);
                }
                return Ok(Expression::Identifier(id));
            }
        }
        if can_be_arrow && self.is(TokenKind::Arrow) && !self.can_insert_semicolon() {
            self.next()?;
            return self.parse_arrow_expression(start, vec![Pattern::Identifier(id)], false, None, None);
        }
        Ok(Expression::Identifier(id))
    }

    fn parse_async_arrow_unary(&mut self, start: usize) -> PResult<Expression<'a>> {
        self.prod_param.enter(ParamFlags::for_function(true, self.prod_param.has_yield()));
        let param = self.parse_identifier(false)?;
        self.prod_param.exit();
        if self.has_preceding_line_break() {
            self.raise(&messages::LINE_TERMINATOR_BEFORE_ARROW, self.start(), &[])?;
        }
        self.expect(TokenKind::Arrow)?;
        self.parse_arrow_expression(start, vec![Pattern::Identifier(param)], true, None, None)
    }

    /// A literal token, after the literal hook has had its say.
    pub(crate) fn parse_literal_atom(&mut self) -> PResult<Expression<'a>> {
        let start = self.start();
        let end = self.token_end();
        let data = self.finish_at(start, end);
        let expr = match (self.token(), self.token_value()) {
            (TokenKind::Num, TokenValue::Number(value)) => {
                Expression::NumericLiteral(self.alloc(NumericLiteral { data, value, raw: self.source(start, end) }))
            }
            (TokenKind::String, value) => Expression::StringLiteral(self.alloc(StringLiteral {
                data,
                value: value.as_str().unwrap_or(""),
                raw: self.source(start, end),
            })),
            (TokenKind::BigInt, value) => Expression::BigIntLiteral(self.alloc(BigIntLiteral {
                data,
                value: value.as_str().unwrap_or(""),
                raw: self.source(start, end),
            })),
            (TokenKind::Regexp, TokenValue::Regex { pattern, flags }) => {
                Expression::RegExpLiteral(self.alloc(RegExpLiteral { data, pattern, flags }))
            }
            (TokenKind::Null, _) => Expression::NullLiteral(self.alloc(NullLiteral { data })),
            (TokenKind::True, _) => Expression::BooleanLiteral(self.alloc(BooleanLiteral { data, value: true })),
            (TokenKind::False, _) => Expression::BooleanLiteral(self.alloc(BooleanLiteral { data, value: false })),
            _ => return Err(self.unexpected()),
        };
        self.next()?;
        Ok(dispatch!(self, Layer::OUTERMOST, finish_literal(expr)).unwrap_or(expr))
    }

    /// A string literal in a module position, such as an import source.
    pub(crate) fn parse_string_literal(&mut self) -> PResult<&'a StringLiteral<'a>> {
        if !self.is(TokenKind::String) {
            return Err(self.unexpected());
        }
        let start = self.start();
        let end = self.token_end();
        let literal = self.alloc(StringLiteral {
            data: self.finish_at(start, end),
            value: self.token_str(),
            raw: self.source(start, end),
        });
        self.next()?;
        Ok(literal)
    }

    // ========================================================================
    // Templates
    // ========================================================================

    pub(crate) fn parse_template(&mut self, is_tagged: bool) -> PResult<&'a TemplateLiteral<'a>> {
        let start = self.start();
        let mut quasis = Vec::new();
        let mut expressions = Vec::new();
        loop {
            let element = self.parse_template_element(is_tagged)?;
            let tail = element.tail;
            quasis.push(element);
            if tail {
                break;
            }
            expressions.push(self.parse_expression()?);
        }
        let quasis = self.alloc_vec(quasis);
        let expressions = self.alloc_vec(expressions);
        Ok(self.alloc(TemplateLiteral { data: self.finish(start), quasis, expressions }))
    }

    fn parse_template_element(&mut self, is_tagged: bool) -> PResult<TemplateElement<'a>> {
        let tail = match self.token() {
            TokenKind::TemplateTail => true,
            TokenKind::TemplateNonTail => false,
            _ => return Err(self.unexpected_expected("}")),
        };
        let TokenValue::Template { raw, cooked } = self.token_value() else {
            return Err(self.unexpected());
        };
        // The token includes the opening `` ` `` or `}` and the closing `` ` `` or `${`
        let start = self.start() + 1;
        let end = if tail { self.token_end() - 1 } else { self.token_end() - 2 };
        if cooked.is_none() && !is_tagged {
            let pos = self.scanner.first_invalid_template_escape().unwrap_or(start);
            self.raise(&messages::INVALID_ESCAPE_SEQUENCE_TEMPLATE, pos, &[])?;
        }
        let element = TemplateElement {
            data: self.finish_at(start, end),
            value: TemplateElementValue { raw, cooked },
            tail,
        };
        self.next()?;
        Ok(element)
    }

    // ========================================================================
    // Parenthesized lists and arrows
    // ========================================================================

    /// `(` starts either a parenthesized expression or arrow parameters.
    fn parse_paren_and_distinguish(&mut self, can_be_arrow: bool) -> PResult<Expression<'a>> {
        let start = self.start();
        self.next()?;
        let old_maybe_in_arrow = self.state.maybe_in_arrow_parameters;
        let outer = self.take_arrow_positions();
        self.state.maybe_in_arrow_parameters = true;

        let inner_start = self.start();
        let mut items: Vec<ParenItem<'a>> = Vec::new();
        let mut errors = ExpressionErrors::default();
        let mut optional_comma = None;
        let mut spread_start = None;
        self.allow_in_and(|p| {
            let mut first = true;
            while !p.is(TokenKind::ParenR) {
                if first {
                    first = false;
                } else {
                    if !p.is(TokenKind::Comma) {
                        if let Some(pos) = errors.optional_parameters {
                            return Err(p.error_at(&messages::UNEXPECTED_TOKEN, pos, &[]));
                        }
                    }
                    p.expect(TokenKind::Comma)?;
                    if p.is(TokenKind::ParenR) {
                        optional_comma = Some(p.last_start());
                        break;
                    }
                }
                if p.is(TokenKind::Ellipsis) {
                    spread_start = Some(p.start());
                    let rest = p.parse_rest_binding()?;
                    let (rest, _) = p.parse_binding_annotation(rest, BindingPosition::Parameter)?;
                    items.push(ParenItem::Rest(rest));
                    if !p.check_comma_after_rest(')')? {
                        break;
                    }
                } else {
                    items.push(ParenItem::Expression(p.parse_maybe_assign_list_item(Some(&mut errors))?));
                }
                if p.is(TokenKind::Colon) && !p.has_type_plugin() {
                    return Err(p.missing_plugins(p.start(), &["flow", "typescript"]));
                }
            }
            Ok(())
        })?;

        let inner_end = self.last_end();
        self.expect(TokenKind::ParenR)?;
        self.state.maybe_in_arrow_parameters = old_maybe_in_arrow;

        if can_be_arrow {
            let return_type = if self.is(TokenKind::Colon) && self.has_type_plugin() {
                self.try_parse(|p| {
                    let return_type = p.parse_arrow_return_type()?;
                    if p.can_insert_semicolon() || !p.is(TokenKind::Arrow) {
                        return Err(p.unexpected());
                    }
                    Ok(return_type)
                })?
            } else {
                None
            };
            if self.is(TokenKind::Arrow) {
                if self.has_preceding_line_break() {
                    self.raise(&messages::LINE_TERMINATOR_BEFORE_ARROW, self.start(), &[])?;
                }
                trace!(pos = start, params = items.len(), "arrow parameters");
                self.check_arrow_positions(false)?;
                if let Some(pos) = errors.private_key {
                    self.raise(&messages::UNEXPECTED_PRIVATE_FIELD, pos, &[])?;
                }
                let params = self.paren_items_to_params(&items)?;
                self.next()?;
                let arrow = self.parse_arrow_expression(start, params, false, None, return_type)?;
                self.restore_arrow_positions(outer, old_maybe_in_arrow);
                return Ok(arrow);
            }
        }

        if items.is_empty() {
            return Err(self.error_at(&messages::UNEXPECTED_TOKEN, self.last_start(), &[]));
        }
        if let Some(pos) = optional_comma.or(spread_start) {
            return Err(self.error_at(&messages::UNEXPECTED_TOKEN, pos, &[]));
        }
        self.check_expression_errors(&errors, true)?;
        let expressions: Vec<Expression<'a>> = items
            .iter()
            .filter_map(|item| match *item {
                ParenItem::Expression(expr) => Some(expr),
                ParenItem::Rest(_) => None,
            })
            .collect();
        self.to_referenced_list(&expressions, true)?;
        let expression = match expressions.as_slice() {
            [single] => *single,
            _ => {
                let data = self.finish_at(inner_start, inner_end);
                let expressions = self.alloc_vec(expressions);
                Expression::Sequence(self.alloc(SequenceExpression { data, expressions }))
            }
        };
        self.restore_arrow_positions(outer, old_maybe_in_arrow);
        Ok(self.wrap_parenthesis(start, expression))
    }

    fn paren_items_to_params(&mut self, items: &[ParenItem<'a>]) -> PResult<Vec<Pattern<'a>>> {
        items
            .iter()
            .map(|item| match *item {
                ParenItem::Expression(expr) => self.to_assignable(expr, false),
                ParenItem::Rest(rest) => Ok(rest),
            })
            .collect()
    }

    /// Keep parentheses as a node or as a flag, depending on the options.
    pub(crate) fn wrap_parenthesis(&mut self, start: usize, expression: Expression<'a>) -> Expression<'a> {
        if self.options.create_parenthesized_expressions {
            return Expression::Parenthesized(self.alloc(ParenthesizedExpression { data: self.finish(start), expression }));
        }
        expression.data().set_flag(NodeFlags::PARENTHESIZED);
        expression
    }

    // ========================================================================
    // Array and object literals
    // ========================================================================

    fn parse_array_like(&mut self, mut errors: Option<&mut ExpressionErrors>) -> PResult<Expression<'a>> {
        let start = self.start();
        self.next()?;
        let mut elements = Vec::new();
        self.allow_in_and(|p| {
            let mut first = true;
            while !p.eat(TokenKind::BracketR)? {
                if first {
                    first = false;
                } else {
                    p.expect(TokenKind::Comma)?;
                    if p.is(TokenKind::BracketR) {
                        p.state.trailing_commas.push((start, p.last_start()));
                        p.next()?;
                        break;
                    }
                }
                if p.is(TokenKind::Comma) {
                    elements.push(None);
                } else {
                    elements.push(Some(p.parse_expr_list_item(errors.as_deref_mut())?));
                }
            }
            Ok(())
        })?;
        let elements = self.alloc_vec(elements);
        Ok(Expression::Array(self.alloc(ArrayExpression { data: self.finish(start), elements })))
    }

    fn parse_object_like(&mut self, mut errors: Option<&mut ExpressionErrors>) -> PResult<Expression<'a>> {
        let start = self.start();
        self.next()?;
        let mut properties = Vec::new();
        let mut proto_seen = false;
        self.allow_in_and(|p| {
            let mut first = true;
            while !p.eat(TokenKind::BraceR)? {
                if first {
                    first = false;
                } else {
                    p.expect(TokenKind::Comma)?;
                    if p.is(TokenKind::BraceR) {
                        p.state.trailing_commas.push((start, p.last_start()));
                        p.next()?;
                        break;
                    }
                }
                let member = p.parse_property_definition(errors.as_deref_mut())?;
                p.check_proto(&member, &mut proto_seen, errors.as_deref_mut())?;
                let member = dispatch!(p, Layer::OUTERMOST, finish_object_member(member)).unwrap_or(member);
                properties.push(member);
            }
            Ok(())
        })?;
        let properties = self.alloc_vec(properties);
        Ok(Expression::Object(self.alloc(ObjectExpression { data: self.finish(start), properties })))
    }

    /// A second `__proto__: v` is an error unless the literal becomes a
    /// pattern.
    fn check_proto(
        &mut self,
        member: &ObjectMember<'a>,
        proto_seen: &mut bool,
        errors: Option<&mut ExpressionErrors>,
    ) -> PResult<()> {
        let ObjectMember::Property(property) = member else { return Ok(()) };
        if property.computed || property.shorthand {
            return Ok(());
        }
        let (name, pos) = match property.key {
            Expression::Identifier(id) => (id.name, span_start(id.data.span)),
            Expression::StringLiteral(literal) => (literal.value, span_start(literal.data.span)),
            _ => return Ok(()),
        };
        if name != "__proto__" {
            return Ok(());
        }
        if *proto_seen {
            match errors {
                Some(errors) => {
                    errors.double_proto.get_or_insert(pos);
                }
                None => self.raise(&messages::DUPLICATE_PROTO, pos, &[])?,
            }
        }
        *proto_seen = true;
        Ok(())
    }

    fn parse_property_definition(&mut self, errors: Option<&mut ExpressionErrors>) -> PResult<ObjectMember<'a>> {
        if self.is(TokenKind::At) {
            if self.plugins.has_decorators() {
                self.raise(&messages::UNSUPPORTED_PROPERTY_DECORATOR, self.start(), &[])?;
                self.parse_decorators()?;
            } else {
                return Err(self.missing_plugins(self.start(), &["decorators", "decorators-legacy"]));
            }
        }
        let start = self.start();
        if self.is(TokenKind::Ellipsis) {
            return Ok(ObjectMember::Spread(self.parse_spread(None)?));
        }

        let mut generator = self.eat(TokenKind::Star)?;
        let mut is_async = false;
        let mut accessor = None;
        let contains_esc = self.scanner.contains_esc();
        let mut errors = errors;
        let (mut key, mut computed) = self.parse_property_name(errors.as_deref_mut(), false)?;

        if !generator && !contains_esc && !computed {
            if let Expression::Identifier(id) = key {
                let next = self.token();
                let continues = next.is_literal_property_name() || matches!(next, TokenKind::BracketL | TokenKind::Star);
                if continues && id.name == "async" && !self.has_preceding_line_break() {
                    is_async = true;
                    generator = self.eat(TokenKind::Star)?;
                    (key, computed) = self.parse_property_name(errors.as_deref_mut(), false)?;
                } else if continues && matches!(id.name, "get" | "set") {
                    accessor = Some(if id.name == "get" { MethodKind::Get } else { MethodKind::Set });
                    if self.is(TokenKind::Star) {
                        self.raise(&messages::ACCESSOR_IS_GENERATOR, self.start(), &[id.name])?;
                        self.next()?;
                    }
                    (key, computed) = self.parse_property_name(errors.as_deref_mut(), false)?;
                }
            }
        }

        if let Some(kind) = accessor {
            let parts = self.parse_method(MethodContext { directive_error_pos: self.last_end(), ..MethodContext::default() })?;
            self.check_getter_setter_params(kind, parts.params, start)?;
            return self.finish_object_method(start, kind, key, computed, false, false, parts);
        }
        if is_async || generator || self.is(TokenKind::ParenL) || (self.is(TokenKind::Lt) && self.has_type_plugin()) {
            let parts = self.parse_method(MethodContext {
                generator,
                is_async,
                directive_error_pos: self.last_end(),
                ..MethodContext::default()
            })?;
            return self.finish_object_method(start, MethodKind::Method, key, computed, generator, is_async, parts);
        }
        if self.eat(TokenKind::Colon)? {
            let value = self.parse_maybe_assign_allow_in(errors)?;
            return Ok(ObjectMember::Property(self.alloc(ObjectProperty {
                data: self.finish(start),
                method: false,
                key,
                computed,
                shorthand: false,
                value,
            })));
        }

        let Expression::Identifier(id) = key else { return Err(self.unexpected()) };
        if computed {
            return Err(self.unexpected());
        }
        // Shorthand `{ a }` or cover-grammar `{ a = 1 }`
        self.check_reserved_word(id.name, span_start(id.data.span), true, false)?;
        let value = if self.is(TokenKind::Eq) {
            match errors {
                Some(errors) => {
                    errors.shorthand_assign.get_or_insert(self.start());
                }
                None => self.raise(&messages::INVALID_COVER_INITIALIZED_NAME, self.start(), &[])?,
            }
            self.next()?;
            let right = self.parse_maybe_assign_allow_in(None)?;
            let left = Pattern::Identifier(self.alloc(Identifier::new(id.data.span, id.name)));
            Expression::Assignment(self.alloc(AssignmentExpression {
                data: self.finish(start),
                operator: AssignmentOperator::Assign,
                left,
                right,
            }))
        } else {
            Expression::Identifier(self.alloc(Identifier::new(id.data.span, id.name)))
        };
        Ok(ObjectMember::Property(self.alloc(ObjectProperty {
            data: self.finish(start),
            method: false,
            key,
            computed: false,
            shorthand: true,
            value,
        })))
    }

    #[allow(clippy::too_many_arguments)]
    fn finish_object_method(
        &mut self,
        start: usize,
        kind: MethodKind,
        key: Expression<'a>,
        computed: bool,
        generator: bool,
        is_async: bool,
        parts: MethodParts<'a>,
    ) -> PResult<ObjectMember<'a>> {
        let body = parts.body.ok_or_else(|| self.unexpected())?;
        Ok(ObjectMember::Method(self.alloc(ObjectMethod {
            data: self.finish(start),
            kind,
            method: kind == MethodKind::Method,
            key,
            computed,
            generator,
            is_async,
            params: parts.params,
            body,
            type_parameters: parts.type_parameters,
            return_type: parts.return_type,
        })))
    }

    /// A property key. Returns the key and whether it was computed.
    pub(crate) fn parse_property_name(
        &mut self,
        errors: Option<&mut ExpressionErrors>,
        allow_private: bool,
    ) -> PResult<(Expression<'a>, bool)> {
        if self.eat(TokenKind::BracketL)? {
            let key = self.parse_maybe_assign_allow_in(None)?;
            self.expect(TokenKind::BracketR)?;
            return Ok((key, true));
        }
        let key = match self.token() {
            TokenKind::Num | TokenKind::String | TokenKind::BigInt => self.parse_literal_atom()?,
            TokenKind::PrivateName => {
                if !allow_private {
                    let pos = self.start();
                    match errors {
                        Some(errors) => {
                            errors.private_key.get_or_insert(pos);
                        }
                        None => self.raise(&messages::UNEXPECTED_PRIVATE_FIELD, pos, &[])?,
                    }
                }
                Expression::PrivateName(self.parse_private_name()?)
            }
            kind if kind.is_keyword_or_name() => Expression::Identifier(self.parse_identifier(true)?),
            _ => return Err(self.unexpected()),
        };
        Ok((key, false))
    }

    // ========================================================================
    // Functions
    // ========================================================================

    /// Parameters and body of an object or class method. The key has been
    /// parsed.
    pub(crate) fn parse_method(&mut self, ctx: MethodContext) -> PResult<MethodParts<'a>> {
        let mut scope_flags = ScopeFlags::for_function(false, true, ctx.allow_direct_super);
        if ctx.in_class {
            scope_flags |= ScopeFlags::CLASS;
        }
        self.scope.enter(scope_flags);
        self.prod_param.enter(ParamFlags::for_function(ctx.is_async, ctx.generator));
        let old_maybe_in_arrow = std::mem::replace(&mut self.state.maybe_in_arrow_parameters, false);

        let (type_parameters, params) = self.parse_function_params(ctx.is_constructor)?;
        let body_ctx = FunctionBodyContext {
            params,
            id: None,
            is_arrow: false,
            is_method: true,
            directive_error_pos: ctx.directive_error_pos,
        };
        let (return_type, body) = self.parse_function_tail(body_ctx, ctx.allow_bodiless)?;

        self.state.maybe_in_arrow_parameters = old_maybe_in_arrow;
        self.prod_param.exit();
        self.scope.exit();
        Ok(MethodParts { type_parameters, params, return_type, body })
    }

    /// Getters take no parameters and setters exactly one, not counting a
    /// leading `this` parameter in a type dialect.
    pub(crate) fn check_getter_setter_params(&mut self, kind: MethodKind, params: &[Pattern<'a>], start: usize) -> PResult<()> {
        let mut expected = if kind == MethodKind::Get { 0 } else { 1 };
        if self.has_type_plugin() {
            if let Some(Pattern::Identifier(first)) = params.first() {
                if first.name == "this" {
                    expected += 1;
                }
            }
        }
        if params.len() != expected {
            let message = if kind == MethodKind::Get { &messages::BAD_GETTER_ARITY } else { &messages::BAD_SETTER_ARITY };
            self.raise(message, start, &[])?;
        }
        if kind == MethodKind::Set && matches!(params.last(), Some(Pattern::Rest(_))) {
            self.raise(&messages::BAD_SETTER_REST_PARAMETER, start, &[])?;
        }
        Ok(())
    }

    /// An arrow function after its `=>`.
    pub(crate) fn parse_arrow_expression(
        &mut self,
        start: usize,
        params: Vec<Pattern<'a>>,
        is_async: bool,
        type_parameters: Option<TypeParameters<'a>>,
        return_type: Option<TypeAnnotation<'a>>,
    ) -> PResult<Expression<'a>> {
        self.scope.enter(ScopeFlags::for_function(true, false, false));
        let mut flags = ParamFlags::for_function(is_async, false);
        if !self.is(TokenKind::BraceL) && self.prod_param.has_in() {
            flags |= ParamFlags::IN;
        }
        self.prod_param.enter(flags);
        let old_maybe_in_arrow = std::mem::replace(&mut self.state.maybe_in_arrow_parameters, false);
        let old_in_parameters = std::mem::replace(&mut self.state.in_parameters, false);

        let params = self.alloc_vec(params);
        let (body, expression) = if self.is(TokenKind::BraceL) {
            let body = self.parse_function_body_block(FunctionBodyContext {
                params,
                id: None,
                is_arrow: true,
                is_method: false,
                directive_error_pos: start,
            })?;
            (ArrowBody::Block(body), false)
        } else {
            let body = self.parse_maybe_assign(None)?;
            self.check_params(params, false, false)?;
            (ArrowBody::Expression(body), true)
        };

        self.state.in_parameters = old_in_parameters;
        self.state.maybe_in_arrow_parameters = old_maybe_in_arrow;
        self.prod_param.exit();
        self.scope.exit();
        Ok(Expression::ArrowFunction(self.alloc(ArrowFunctionExpression {
            data: self.finish(start),
            id: None,
            generator: false,
            is_async,
            params,
            body,
            expression,
            type_parameters,
            return_type,
        })))
    }

    /// Optional type parameters and the parenthesized parameter list.
    /// `allow_modifiers` admits parameter properties on constructors.
    pub(crate) fn parse_function_params(
        &mut self,
        allow_modifiers: bool,
    ) -> PResult<(Option<TypeParameters<'a>>, &'a [Pattern<'a>])> {
        let type_parameters = if self.is(TokenKind::Lt) {
            dispatch!(self, Layer::OUTERMOST, parse_type_parameters())
        } else {
            None
        };
        self.expect(TokenKind::ParenL)?;
        let old_in_parameters = std::mem::replace(&mut self.state.in_parameters, true);
        let mut list_flags = ListFlags::IS_FUNCTION_PARAMS;
        if allow_modifiers {
            list_flags |= ListFlags::IS_CONSTRUCTOR_PARAMS;
        }
        let params = self.parse_binding_list(TokenKind::ParenR, ')', list_flags)?;
        self.state.in_parameters = old_in_parameters;
        let params: Vec<Pattern<'a>> = params.into_iter().flatten().collect();
        Ok((type_parameters, self.alloc_vec(params)))
    }

    pub(crate) fn parse_return_type_annotation(&mut self) -> PResult<TypeAnnotation<'a>> {
        match dispatch!(self, Layer::OUTERMOST, parse_return_type()) {
            Some(annotation) => Ok(annotation),
            None => Err(self.missing_plugins(self.start(), &["flow", "typescript"])),
        }
    }

    /// An arrow's return type, where `=>` ends the type rather than
    /// starting a function type.
    pub(crate) fn parse_arrow_return_type(&mut self) -> PResult<TypeAnnotation<'a>> {
        let old = std::mem::replace(&mut self.state.no_anon_function_type, true);
        let result = self.parse_return_type_annotation();
        self.state.no_anon_function_type = old;
        result
    }

    /// The return type and body after a parameter list. A body may be
    /// missing only where `allow_bodiless` and an overlay both permit it.
    pub(crate) fn parse_function_tail(
        &mut self,
        ctx: FunctionBodyContext<'a>,
        allow_bodiless: bool,
    ) -> PResult<(Option<TypeAnnotation<'a>>, Option<&'a BlockStatement<'a>>)> {
        let return_type = if self.is(TokenKind::Colon) {
            Some(self.parse_return_type_annotation()?)
        } else {
            None
        };
        if allow_bodiless && !self.is(TokenKind::BraceL) && self.bodiless_allowed() && self.is_line_terminator()? {
            return Ok((return_type, None));
        }
        let body = self.parse_function_body_block(ctx)?;
        Ok((return_type, Some(body)))
    }

    /// A `{ ... }` function body. Parameters are checked once the body's
    /// directives are known.
    pub(crate) fn parse_function_body_block(&mut self, ctx: FunctionBodyContext<'a>) -> PResult<&'a BlockStatement<'a>> {
        let was_strict = self.is_strict();
        let old_labels = std::mem::take(&mut self.state.labels);
        let old_in_parameters = std::mem::replace(&mut self.state.in_parameters, false);
        self.prod_param.enter(self.prod_param.current_flags() | ParamFlags::RETURN);

        let body = self.parse_block_with(true, false, |p, has_strict_directive| {
            let simple = ctx.params.iter().all(Pattern::is_simple_parameter);
            if has_strict_directive && !simple {
                p.raise(&messages::ILLEGAL_LANGUAGE_MODE_DIRECTIVE, ctx.directive_error_pos, &[])?;
            }
            let strict = p.is_strict();
            let strict_mode_changed = !was_strict && strict;
            let allow_duplicates = !strict && !ctx.is_arrow && !ctx.is_method && simple;
            p.check_params(ctx.params, allow_duplicates, strict_mode_changed)?;
            if strict {
                if let Some(id) = ctx.id {
                    p.check_identifier(id, BindingFlags::TYPE_OUTSIDE, strict_mode_changed)?;
                }
            }
            Ok(())
        })?;

        self.prod_param.exit();
        self.state.in_parameters = old_in_parameters;
        self.state.labels = old_labels;
        Ok(body)
    }

    /// Declare every parameter in the function scope.
    pub(crate) fn check_params(
        &mut self,
        params: &'a [Pattern<'a>],
        allow_duplicates: bool,
        strict_mode_changed: bool,
    ) -> PResult<()> {
        let mut clashes: FxHashSet<&'a str> = FxHashSet::default();
        for (index, param) in params.iter().enumerate() {
            if index == 0 && self.is_typescript() && matches!(param, Pattern::Identifier(id) if id.name == "this") {
                continue;
            }
            let target = LvalTarget {
                strict_mode_changed,
                ..LvalTarget::binding("function parameter list", BindingFlags::TYPE_VAR)
            };
            self.check_lval(param, target, if allow_duplicates { None } else { Some(&mut clashes) })?;
        }
        Ok(())
    }

    // ========================================================================
    // Identifiers
    // ========================================================================

    pub(crate) fn parse_identifier(&mut self, liberal: bool) -> PResult<&'a Identifier<'a>> {
        let start = self.start();
        let name = self.parse_identifier_name(liberal)?;
        Ok(self.identifier_at(start, self.last_end(), name))
    }

    /// The name of an identifier-like token, which is consumed. `liberal`
    /// accepts keywords, as after `.`.
    pub(crate) fn parse_identifier_name(&mut self, liberal: bool) -> PResult<&'a str> {
        let kind = self.token();
        if !kind.is_keyword_or_name() {
            return Err(self.unexpected());
        }
        let name = self.word();
        if liberal {
            if kind.is_keyword() {
                self.scanner.replace_token(TokenKind::Name);
            }
        } else {
            self.check_reserved_word(name, self.start(), kind.is_keyword(), false)?;
        }
        self.next()?;
        Ok(name)
    }

    pub(crate) fn check_reserved_word(
        &mut self,
        word: &str,
        pos: usize,
        check_keywords: bool,
        is_binding: bool,
    ) -> PResult<()> {
        if word.len() > 10 {
            return Ok(());
        }
        if check_keywords && is_keyword(word) {
            return self.raise(&messages::UNEXPECTED_KEYWORD, pos, &[word]);
        }
        let reserved = if !self.is_strict() {
            is_reserved_word(word, self.in_module)
        } else if is_binding {
            is_strict_bind_reserved_word(word, self.in_module)
        } else {
            is_strict_reserved_word(word, self.in_module)
        };
        if reserved {
            return self.raise(&messages::UNEXPECTED_RESERVED_WORD, pos, &[word]);
        }
        match word {
            "yield" if self.prod_param.has_yield() => self.raise(&messages::YIELD_BINDING_IDENTIFIER, pos, &[]),
            "await" => {
                if self.prod_param.has_await() {
                    return self.raise(&messages::AWAIT_BINDING_IDENTIFIER, pos, &[]);
                }
                if self.scope.in_static_block() {
                    return self.raise(&messages::AWAIT_BINDING_IDENTIFIER_IN_STATIC_BLOCK, pos, &[]);
                }
                if self.state.maybe_in_arrow_parameters {
                    self.state.await_ident_pos.get_or_insert(pos);
                }
                Ok(())
            }
            "arguments" if self.scope.in_class_and_not_in_non_arrow_function() => {
                self.raise(&messages::ARGUMENTS_IN_CLASS, pos, &[])
            }
            _ => Ok(()),
        }
    }

    /// `#name`, the current token.
    pub(crate) fn parse_private_name(&mut self) -> PResult<&'a PrivateName<'a>> {
        let start = self.start();
        let end = self.token_end();
        let id = self.identifier_at(start + 1, end, self.token_str());
        self.next()?;
        Ok(self.alloc(PrivateName { data: self.finish_at(start, end), id }))
    }
}

/// An arrow function starting where the arrow candidate was marked ends
/// the descent; no operator can follow its body.
fn should_exit_descending(expr: &Expression<'_>, potential_arrow_at: Option<usize>) -> bool {
    matches!(expr, Expression::ArrowFunction(_)) && Some(span_start(expr.span())) == potential_arrow_at
}

/// `a.#x` or `a?.#x`.
fn has_private_property(expr: &Expression<'_>) -> bool {
    matches!(expr, Expression::Member(member) if matches!(member.property, Expression::PrivateName(_)))
}
