//! Statements, blocks and the program body.

use crate::expression::{ExpressionErrors, FunctionBodyContext};
use crate::lval::{BindingPosition, LvalTarget};
use crate::overlay::{dispatch, Layer};
use crate::parser::{PResult, Parser};
use crate::state::{Label, LabelKind};
use crate::utilities::*;
use bitflags::bitflags;
use esparse_ast::*;
use esparse_diagnostics::messages;
use esparse_scope::{BindingFlags, ParamFlags, ScopeFlags};
use tracing::trace;

bitflags! {
    /// What a statement position admits besides plain statements.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct StatementContext: u8 {
        const ALLOW_IMPORT_EXPORT        = 1 << 0;
        const ALLOW_DECLARATION          = 1 << 1;
        const ALLOW_FUNCTION_DECLARATION = 1 << 2;
        /// `l: function f() {}` in sloppy code.
        const ALLOW_LABELED_FUNCTION     = 1 << 3;

        const STATEMENT_LIST_ITEM = Self::ALLOW_DECLARATION.bits() | Self::ALLOW_FUNCTION_DECLARATION.bits();
        const MODULE_ITEM = Self::ALLOW_IMPORT_EXPORT.bits()
            | Self::ALLOW_DECLARATION.bits()
            | Self::ALLOW_FUNCTION_DECLARATION.bits()
            | Self::ALLOW_LABELED_FUNCTION.bits();
    }
}

impl StatementContext {
    /// The body of `if`, a loop or `with`.
    pub const STATEMENT_ONLY: Self = Self::empty();
}

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub(crate) struct FunctionFlags: u8 {
        const DECLARATION         = 1 << 0;
        /// A declaration that is the whole body of an `if` or a label.
        const HANGING_DECLARATION = 1 << 1;
        /// `export default function () {}`.
        const NULLABLE_ID         = 1 << 2;
        const ASYNC               = 1 << 3;
        /// `declare function f(): void;`
        const DECLARE             = 1 << 4;
    }
}

/// A loop label pushed for an unlabeled loop.
fn loop_label(start: usize) -> Label {
    Label { name: None, kind: Some(LabelKind::Loop), statement_start: start }
}

impl<'a> Parser<'a> {
    // ========================================================================
    // Program
    // ========================================================================

    pub(crate) fn parse_top_level(&mut self) -> PResult<&'a Program<'a>> {
        let interpreter = self.parse_interpreter_directive()?;
        let (body, directives) = self.parse_block_body(TokenKind::Eof, true, true, |_, _| Ok(()))?;

        if self.in_module && !self.options.allow_undeclared_exports {
            let undefined: Vec<_> = self.scope.undefined_exports().collect();
            for (atom, pos) in undefined {
                let name = self.interner.resolve(atom).to_owned();
                self.raise(&messages::MODULE_EXPORT_UNDEFINED, pos as usize, &[&name])?;
            }
        }

        let source_type = if self.in_module && !(self.unambiguous && !self.state.saw_unambiguous_esm) {
            SourceType::Module
        } else {
            SourceType::Script
        };
        Ok(self.alloc(Program {
            data: self.finish_at(0, self.scanner.text_len()),
            source_type,
            interpreter,
            body,
            directives,
        }))
    }

    fn parse_interpreter_directive(&mut self) -> PResult<Option<&'a InterpreterDirective<'a>>> {
        if !self.is(TokenKind::Interpreter) {
            return Ok(None);
        }
        let start = self.start();
        let value = self.token_str();
        self.next()?;
        Ok(Some(self.alloc(InterpreterDirective { data: self.finish(start), value })))
    }

    // ========================================================================
    // Entry points
    // ========================================================================

    /// A statement in a single-statement position.
    pub(crate) fn parse_statement(&mut self) -> PResult<Statement<'a>> {
        self.parse_statement_like(StatementContext::STATEMENT_ONLY)
    }

    pub(crate) fn parse_statement_list_item(&mut self) -> PResult<Statement<'a>> {
        let mut ctx = StatementContext::STATEMENT_LIST_ITEM;
        if !self.is_strict() {
            ctx |= StatementContext::ALLOW_LABELED_FUNCTION;
        }
        self.parse_statement_like(ctx)
    }

    pub(crate) fn parse_module_item(&mut self) -> PResult<Statement<'a>> {
        self.parse_statement_like(StatementContext::MODULE_ITEM)
    }

    /// The body of `if` or a label, where sloppy code may still declare a
    /// plain function.
    fn parse_statement_or_annex_b_function(&mut self, allow_labeled: bool) -> PResult<Statement<'a>> {
        let mut ctx = StatementContext::STATEMENT_ONLY;
        if !self.is_strict() {
            ctx |= StatementContext::ALLOW_FUNCTION_DECLARATION;
            if allow_labeled {
                ctx |= StatementContext::ALLOW_LABELED_FUNCTION;
            }
        }
        self.parse_statement_like(ctx)
    }

    pub(crate) fn parse_statement_like(&mut self, ctx: StatementContext) -> PResult<Statement<'a>> {
        self.with_recursion_guard(|p| {
            if p.is(TokenKind::At) {
                let decorators = p.parse_decorators()?;
                return p.parse_decorated_statement(ctx, decorators);
            }
            p.parse_statement_from(Layer::OUTERMOST, ctx)
        })
    }

    /// Run the statement hooks from `layer` on, then the base grammar.
    pub(crate) fn parse_statement_from(&mut self, layer: Layer, ctx: StatementContext) -> PResult<Statement<'a>> {
        if let Some(stmt) = dispatch!(self, layer, parse_statement(ctx)) {
            return Ok(stmt);
        }
        self.base_parse_statement(ctx)
    }

    /// Only a class, or an export of one, may follow leading decorators.
    fn parse_decorated_statement(
        &mut self,
        ctx: StatementContext,
        decorators: &'a [&'a Decorator<'a>],
    ) -> PResult<Statement<'a>> {
        let start = decorators.first().map_or(self.start(), |d| span_start(d.data.span));
        match self.token() {
            TokenKind::Class if ctx.contains(StatementContext::ALLOW_DECLARATION) => {
                Ok(Statement::Class(self.parse_class(start, decorators, true, false)?))
            }
            TokenKind::Export if ctx.contains(StatementContext::ALLOW_IMPORT_EXPORT) => {
                self.next()?;
                let item = self.parse_export(start, decorators)?;
                self.finish_module_item(start, item)
            }
            _ if self.is_typescript() && self.is_contextual("abstract") => {
                let lookahead = self.lookahead()?;
                if lookahead.kind != TokenKind::Class || lookahead.has_line_break_before {
                    return Err(self.error_at(&messages::UNEXPECTED_LEADING_DECORATOR, start, &[]));
                }
                self.next()?;
                let class = self.parse_class_with(start, decorators, true, false, crate::class::ClassHead::ABSTRACT)?;
                Ok(Statement::Class(class))
            }
            _ => Err(self.error_at(&messages::UNEXPECTED_LEADING_DECORATOR, start, &[])),
        }
    }

    pub(crate) fn base_parse_statement(&mut self, ctx: StatementContext) -> PResult<Statement<'a>> {
        let start = self.start();
        let allow_declaration = ctx.contains(StatementContext::ALLOW_DECLARATION);
        let allow_function = ctx.contains(StatementContext::ALLOW_FUNCTION_DECLARATION);
        let hanging = !allow_declaration && allow_function;

        match self.token() {
            TokenKind::Break => return self.parse_break_continue(start, true),
            TokenKind::Continue => return self.parse_break_continue(start, false),
            TokenKind::Debugger => {
                self.next()?;
                self.semicolon()?;
                return Ok(Statement::Debugger(self.alloc(DebuggerStatement { data: self.finish(start) })));
            }
            TokenKind::Do => return self.parse_do_while(start),
            TokenKind::For => return self.parse_for_statement(start),
            TokenKind::Function => {
                if !allow_function {
                    let message =
                        if self.is_strict() { &messages::STRICT_FUNCTION } else { &messages::SLOPPY_FUNCTION_ANNEX_B };
                    self.raise(message, start, &[])?;
                }
                self.next()?;
                let mut flags = FunctionFlags::DECLARATION;
                if hanging {
                    flags |= FunctionFlags::HANGING_DECLARATION;
                }
                return Ok(Statement::Function(self.parse_function(start, flags)?));
            }
            TokenKind::Class => {
                if !allow_declaration {
                    return Err(self.unexpected());
                }
                return Ok(Statement::Class(self.parse_class(start, &[], true, false)?));
            }
            TokenKind::If => return self.parse_if(start),
            TokenKind::Return => return self.parse_return(start),
            TokenKind::Switch => return self.parse_switch(start),
            TokenKind::Throw => return self.parse_throw(start),
            TokenKind::Try => return self.parse_try(start),
            TokenKind::Const | TokenKind::Var => {
                let kind = if self.is(TokenKind::Var) { VariableKind::Var } else { VariableKind::Const };
                if !allow_declaration && kind != VariableKind::Var {
                    self.raise(&messages::UNEXPECTED_LEXICAL_DECLARATION, start, &[])?;
                }
                return Ok(Statement::Variable(self.parse_var_statement(start, kind, false)?));
            }
            TokenKind::Name if self.is_contextual("let") && self.starts_let_declaration(allow_declaration)? => {
                if !allow_declaration {
                    self.raise(&messages::UNEXPECTED_LEXICAL_DECLARATION, start, &[])?;
                }
                return Ok(Statement::Variable(self.parse_var_statement(start, VariableKind::Let, false)?));
            }
            TokenKind::While => return self.parse_while(start),
            TokenKind::With => return self.parse_with(start),
            TokenKind::BraceL => return Ok(Statement::Block(self.parse_block()?)),
            TokenKind::Semi => {
                self.next()?;
                return Ok(Statement::Empty(self.alloc(EmptyStatement { data: self.finish(start) })));
            }
            TokenKind::Import | TokenKind::Export => {
                let is_import = self.is(TokenKind::Import);
                if !is_import || !matches!(self.lookahead_char(), Some('(') | Some('.')) {
                    return self.parse_module_statement(start, ctx, is_import);
                }
            }
            TokenKind::Name if self.is_async_function()? => {
                if !allow_declaration {
                    self.raise(&messages::ASYNC_FUNCTION_IN_SINGLE_STATEMENT_CONTEXT, start, &[])?;
                }
                self.next()?;
                self.next()?;
                let mut flags = FunctionFlags::DECLARATION | FunctionFlags::ASYNC;
                if hanging {
                    flags |= FunctionFlags::HANGING_DECLARATION;
                }
                return Ok(Statement::Function(self.parse_function(start, flags)?));
            }
            _ => {}
        }

        let starts_with_name = self.is(TokenKind::Name);
        let expr = self.parse_expression()?;
        if starts_with_name {
            if let Expression::Identifier(label) = expr {
                if self.eat(TokenKind::Colon)? {
                    return self.parse_labeled_statement(start, label, ctx);
                }
            }
        }
        self.parse_expression_statement(start, expr)
    }

    pub(crate) fn parse_expression_statement(&mut self, start: usize, expression: Expression<'a>) -> PResult<Statement<'a>> {
        self.semicolon()?;
        Ok(Statement::Expression(self.alloc(ExpressionStatement {
            data: self.finish(start),
            expression,
            directive: None,
        })))
    }

    /// `let` followed by something that can only be a declaration here.
    fn starts_let_declaration(&mut self, allow_declaration: bool) -> PResult<bool> {
        if self.scanner.contains_esc() {
            return Ok(false);
        }
        let next = self.lookahead()?;
        if next.kind == TokenKind::BracketL {
            return Ok(true);
        }
        if !allow_declaration && next.has_line_break_before {
            return Ok(false);
        }
        Ok(next.kind == TokenKind::BraceL || starts_binding_identifier(next.kind))
    }

    /// `async function` with no line break in between.
    pub(crate) fn is_async_function(&mut self) -> PResult<bool> {
        if !self.is_contextual("async") {
            return Ok(false);
        }
        let next = self.lookahead()?;
        Ok(next.kind == TokenKind::Function && !next.has_line_break_before && !next.contains_esc)
    }

    /// `[`, `{` or a binding name follows the current token.
    fn has_following_binding_atom(&mut self) -> PResult<bool> {
        let next = self.lookahead()?;
        Ok(matches!(next.kind, TokenKind::BracketL | TokenKind::BraceL) || starts_binding_identifier(next.kind))
    }

    fn parse_module_statement(&mut self, start: usize, ctx: StatementContext, is_import: bool) -> PResult<Statement<'a>> {
        if !self.options.allow_import_export_everywhere && !ctx.contains(StatementContext::ALLOW_IMPORT_EXPORT) {
            self.raise(&messages::UNEXPECTED_IMPORT_EXPORT, start, &[])?;
        }
        self.next()?;
        let item = if is_import {
            ModuleItem::Import(self.parse_import(start)?)
        } else {
            self.parse_export(start, &[])?
        };
        self.finish_module_item(start, item)
    }

    /// Record module syntax for `unambiguous` and reject it in scripts.
    fn finish_module_item(&mut self, start: usize, item: ModuleItem<'a>) -> PResult<Statement<'a>> {
        let is_value = |kind: Option<ImportKind>| matches!(kind, None | Some(ImportKind::Value));
        let marks_module = match item {
            ModuleItem::Import(decl) => is_value(decl.import_kind),
            ModuleItem::ExportNamed(decl) => is_value(decl.export_kind),
            ModuleItem::ExportAll(decl) => is_value(decl.export_kind),
            ModuleItem::ExportDefault(_) => true,
        };
        if marks_module {
            self.state.saw_unambiguous_esm = true;
        }
        if !self.options.allow_import_export_everywhere && !self.in_module {
            self.raise(&messages::IMPORT_OUTSIDE_MODULE, start, &[])?;
        }
        Ok(Statement::Module(item))
    }

    // ========================================================================
    // Blocks and directives
    // ========================================================================

    pub(crate) fn parse_block(&mut self) -> PResult<&'a BlockStatement<'a>> {
        self.parse_block_with(false, true, |_, _| Ok(()))
    }

    /// A `{ ... }` block. `after` runs once the body is read, with whether a
    /// `"use strict"` directive was found, before strictness is restored.
    pub(crate) fn parse_block_with(
        &mut self,
        allow_directives: bool,
        create_scope: bool,
        after: impl FnOnce(&mut Self, bool) -> PResult<()>,
    ) -> PResult<&'a BlockStatement<'a>> {
        let start = self.start();
        if allow_directives {
            self.scanner.clear_strict_errors();
        }
        self.expect(TokenKind::BraceL)?;
        if create_scope {
            self.scope.enter(ScopeFlags::OTHER);
        }
        let (body, directives) = self.parse_block_body(TokenKind::BraceR, allow_directives, false, after)?;
        if create_scope {
            self.scope.exit();
        }
        Ok(self.alloc(BlockStatement { data: self.finish(start), body, directives }))
    }

    /// Statements up to `end`, which is consumed. A leading run of string
    /// statements becomes the directive prologue when `allow_directives`.
    pub(crate) fn parse_block_body(
        &mut self,
        end: TokenKind,
        allow_directives: bool,
        top_level: bool,
        after: impl FnOnce(&mut Self, bool) -> PResult<()>,
    ) -> PResult<(&'a [Statement<'a>], &'a [Directive<'a>])> {
        let was_strict = self.is_strict();
        let mut body = Vec::new();
        let mut directives = Vec::new();
        let mut has_strict_directive = false;
        let mut parsed_non_directive = !allow_directives;

        while !self.is(end) {
            if self.is(TokenKind::Eof) {
                return Err(self.unexpected());
            }
            let stmt = if top_level { self.parse_module_item()? } else { self.parse_statement_list_item()? };
            if !parsed_non_directive {
                if let Some(directive) = self.statement_to_directive(&stmt) {
                    if !has_strict_directive && is_use_strict(&directive) {
                        has_strict_directive = true;
                        trace!(pos = span_start(directive.data.span), "use strict directive");
                        self.scanner.set_strict(true)?;
                    }
                    directives.push(directive);
                    continue;
                }
                parsed_non_directive = true;
                self.scanner.clear_strict_errors();
            }
            body.push(stmt);
        }

        after(self, has_strict_directive)?;
        if !was_strict {
            self.scanner.set_strict(false)?;
        }
        if end != TokenKind::Eof {
            self.next()?;
        }

        let mut directives = self.alloc_vec(directives);
        if !directives.is_empty() {
            if let Some(mut statements) = dispatch!(self, Layer::OUTERMOST, finish_directives(directives)) {
                statements.extend(body);
                body = statements;
                directives = &[];
            }
        }
        Ok((self.alloc_vec(body), directives))
    }

    /// A statement that is an unparenthesized string literal, as a
    /// directive.
    fn statement_to_directive(&self, stmt: &Statement<'a>) -> Option<Directive<'a>> {
        let Statement::Expression(expr_stmt) = stmt else { return None };
        let literal_data = match expr_stmt.expression {
            Expression::StringLiteral(literal) if !literal.data.is_parenthesized() => &literal.data,
            Expression::Extension(ExpressionExtension::EstreeLiteral(literal))
                if !literal.data.is_parenthesized()
                    && matches!(literal.value, esparse_ast::ext::estree::LiteralValue::String(_)) =>
            {
                &literal.data
            }
            _ => return None,
        };
        let span = literal_data.span;
        let raw = self.source(span_start(span), span_end(span));
        let value = raw.get(1..raw.len().saturating_sub(1)).unwrap_or("");
        let literal = self.alloc(DirectiveLiteral { data: NodeData::new(span), value, raw });
        Some(Directive { data: NodeData::new(expr_stmt.data.span), value: literal })
    }

    // ========================================================================
    // Functions
    // ========================================================================

    /// A function after its `function` keyword (and `async`). `start` is
    /// where the function began.
    pub(crate) fn parse_function(&mut self, start: usize, flags: FunctionFlags) -> PResult<&'a Function<'a>> {
        let is_declaration = flags.contains(FunctionFlags::DECLARATION);
        let hanging = flags.contains(FunctionFlags::HANGING_DECLARATION);
        let require_id = is_declaration && !flags.contains(FunctionFlags::NULLABLE_ID);
        let is_async = flags.contains(FunctionFlags::ASYNC);

        let mut generator = false;
        if self.is(TokenKind::Star) {
            if hanging {
                self.raise(&messages::GENERATOR_IN_SINGLE_STATEMENT_CONTEXT, self.start(), &[])?;
            }
            self.next()?;
            generator = true;
        }

        let mut id = if is_declaration { self.parse_function_id(require_id)? } else { None };

        let old_maybe_in_arrow = std::mem::replace(&mut self.state.maybe_in_arrow_parameters, false);
        self.scope.enter(ScopeFlags::FUNCTION);
        self.prod_param.enter(ParamFlags::for_function(is_async, generator));
        if !is_declaration {
            id = self.parse_function_id(false)?;
        }

        let (type_parameters, params) = self.parse_function_params(false)?;
        let ctx = FunctionBodyContext {
            params,
            id: id.and_then(|id| id.as_identifier()),
            is_arrow: false,
            is_method: false,
            directive_error_pos: start,
        };
        let (return_type, body) = self.parse_function_tail(ctx, is_declaration)?;
        self.prod_param.exit();
        self.scope.exit();
        self.state.maybe_in_arrow_parameters = old_maybe_in_arrow;

        let declare = flags.contains(FunctionFlags::DECLARE);
        if body.is_some() && is_declaration && (declare || self.state.in_ambient_context) {
            self.raise(&messages::TS_DECLARE_FUNCTION_HAS_IMPLEMENTATION, start, &[])?;
        }
        let kind = match (body, is_declaration) {
            (None, _) => FunctionType::TsDeclareFunction,
            (Some(_), true) => FunctionType::FunctionDeclaration,
            (Some(_), false) => FunctionType::FunctionExpression,
        };
        let function = self.alloc(Function {
            kind,
            data: self.finish(start),
            id,
            generator,
            is_async,
            params,
            body,
            declare,
            type_parameters,
            return_type,
        });
        if is_declaration && !hanging {
            self.register_function_statement_id(function)?;
        }
        Ok(function)
    }

    fn parse_function_id(&mut self, require_id: bool) -> PResult<Option<BindingName<'a>>> {
        if let Some(id) = dispatch!(self, Layer::OUTERMOST, parse_declaration_id()) {
            return Ok(Some(id));
        }
        if require_id || self.is(TokenKind::Name) {
            return Ok(Some(BindingName::Identifier(self.parse_identifier(false)?)));
        }
        Ok(None)
    }

    /// Declare a function statement's name. Sloppy plain functions get the
    /// looser block-level function binding.
    fn register_function_statement_id(&mut self, function: &'a Function<'a>) -> PResult<()> {
        let Some(id) = function.id.and_then(|id| id.as_identifier()) else { return Ok(()) };
        if function.kind == FunctionType::TsDeclareFunction {
            return Ok(());
        }
        let binding = if self.is_strict() || function.generator || function.is_async {
            if self.scope.treat_functions_as_var() {
                BindingFlags::TYPE_VAR
            } else {
                BindingFlags::TYPE_LEXICAL
            }
        } else {
            BindingFlags::TYPE_FUNCTION
        };
        self.declare_name(id.name, binding, span_start(id.data.span))
    }

    // ========================================================================
    // Variable declarations
    // ========================================================================

    /// `var`, `let` or `const` is the current token.
    pub(crate) fn parse_var_statement(
        &mut self,
        start: usize,
        kind: VariableKind,
        declare: bool,
    ) -> PResult<&'a VariableDeclaration<'a>> {
        self.next()?;
        let declarations = self.parse_var(false, kind)?;
        self.semicolon()?;
        Ok(self.alloc(VariableDeclaration { data: self.finish(start), kind, declarations, declare }))
    }

    fn parse_var(&mut self, is_for: bool, kind: VariableKind) -> PResult<&'a [VariableDeclarator<'a>]> {
        let mut declarations = Vec::new();
        let binding = if kind == VariableKind::Var { BindingFlags::TYPE_VAR } else { BindingFlags::TYPE_LEXICAL };
        loop {
            let start = self.start();
            let id = self.parse_binding_atom()?;
            let (id, definite) = self.parse_binding_annotation(id, BindingPosition::VariableDeclarator)?;
            self.check_lval(&id, LvalTarget::binding("variable declaration", binding), None)?;

            let init = if !self.eat(TokenKind::Eq)? {
                None
            } else if is_for {
                Some(self.parse_maybe_assign_disallow_in(None)?)
            } else {
                Some(self.parse_maybe_assign_allow_in(None)?)
            };
            if init.is_none() && !self.state.in_ambient_context {
                let in_for_in_of = is_for && (self.is(TokenKind::In) || self.is_contextual("of"));
                if !matches!(id, Pattern::Identifier(_)) && !in_for_in_of {
                    self.raise(&messages::DECLARATION_MISSING_INITIALIZER, self.last_end(), &["destructuring"])?;
                } else if kind == VariableKind::Const && !(self.is(TokenKind::In) || self.is_contextual("of")) {
                    self.raise(&messages::DECLARATION_MISSING_INITIALIZER, self.last_end(), &["const"])?;
                }
            }
            declarations.push(VariableDeclarator { data: self.finish(start), id, init, definite });
            if !self.eat(TokenKind::Comma)? {
                break;
            }
        }
        Ok(self.alloc_vec(declarations))
    }

    // ========================================================================
    // Loops
    // ========================================================================

    /// `(` expression `)`.
    fn parse_header_expression(&mut self) -> PResult<Expression<'a>> {
        self.expect(TokenKind::ParenL)?;
        let expr = self.parse_expression()?;
        self.expect(TokenKind::ParenR)?;
        Ok(expr)
    }

    fn parse_for_statement(&mut self, start: usize) -> PResult<Statement<'a>> {
        self.next()?;
        self.state.labels.push(loop_label(start));

        let mut await_at = None;
        if self.is_contextual("await") && self.record_await_if_allowed() {
            await_at = Some(self.start());
            self.next()?;
        }
        self.scope.enter(ScopeFlags::OTHER);
        self.expect(TokenKind::ParenL)?;

        if self.is(TokenKind::Semi) {
            if let Some(pos) = await_at {
                return Err(self.error_at(&messages::UNEXPECTED_TOKEN, pos, &[]));
            }
            return self.parse_for(start, None);
        }

        let starts_with_let = self.is_contextual("let");
        let is_let = starts_with_let && self.has_following_binding_atom()?;
        if self.is(TokenKind::Var) || self.is(TokenKind::Const) || is_let {
            let init_start = self.start();
            let kind = match self.token() {
                TokenKind::Var => VariableKind::Var,
                TokenKind::Const => VariableKind::Const,
                _ => VariableKind::Let,
            };
            self.next()?;
            let declarations = self.parse_var(true, kind)?;
            let init = self.alloc(VariableDeclaration {
                data: self.finish(init_start),
                kind,
                declarations,
                declare: false,
            });
            let is_for_in = self.is(TokenKind::In);
            if is_for_in || self.is_contextual("of") {
                if declarations.len() == 1 {
                    return self.parse_for_in(start, ForLeft::Variable(init), await_at);
                }
                let head = if is_for_in { "for-in" } else { "for-of" };
                self.raise(&messages::INVALID_FOR_IN_OF_DECLARATION_COUNT, init_start, &[head])?;
                return self.parse_for_in(start, ForLeft::Variable(init), await_at);
            }
            if let Some(pos) = await_at {
                return Err(self.error_at(&messages::UNEXPECTED_TOKEN, pos, &[]));
            }
            return self.parse_for(start, Some(ForInit::Variable(init)));
        }

        let starts_with_async = self.is_contextual("async");
        let mut errors = ExpressionErrors::default();
        let init = self.disallow_in_and(|p| p.parse_expression_base(Some(&mut errors)))?;
        let is_for_of = self.is_contextual("of");
        if is_for_of {
            let init_start = span_start(init.span());
            if starts_with_let {
                self.raise(&messages::FOR_OF_LET, init_start, &[])?;
            }
            if await_at.is_none() && starts_with_async && matches!(init, Expression::Identifier(_)) {
                self.raise(&messages::FOR_OF_ASYNC, init_start, &[])?;
            }
        }
        if is_for_of || self.is(TokenKind::In) {
            if let Some(pos) = errors.private_key {
                self.raise(&messages::UNEXPECTED_PRIVATE_FIELD, pos, &[])?;
            }
            let pattern = self.to_assignable(init, true)?;
            let description = if is_for_of { "for-of statement" } else { "for-in statement" };
            self.check_lval(&pattern, LvalTarget::assign(description), None)?;
            return self.parse_for_in(start, ForLeft::Pattern(pattern), await_at);
        }
        self.check_expression_errors(&errors, true)?;
        if let Some(pos) = await_at {
            return Err(self.error_at(&messages::UNEXPECTED_TOKEN, pos, &[]));
        }
        self.parse_for(start, Some(ForInit::Expression(init)))
    }

    /// `for await` is allowed where `await` expressions are.
    fn record_await_if_allowed(&mut self) -> bool {
        let allowed =
            self.prod_param.has_await() || (self.options.allow_await_outside_function && !self.scope.in_function());
        if allowed && !self.scope.in_function() && !self.options.allow_await_outside_function {
            self.state.saw_unambiguous_esm = true;
        }
        allowed
    }

    /// The rest of a `for (init; test; update)` after its init.
    fn parse_for(&mut self, start: usize, init: Option<ForInit<'a>>) -> PResult<Statement<'a>> {
        self.expect(TokenKind::Semi)?;
        let test = if self.is(TokenKind::Semi) { None } else { Some(self.parse_expression()?) };
        self.expect(TokenKind::Semi)?;
        let update = if self.is(TokenKind::ParenR) { None } else { Some(self.parse_expression()?) };
        self.expect(TokenKind::ParenR)?;
        let body = self.parse_statement()?;
        self.scope.exit();
        self.state.labels.pop();
        Ok(Statement::For(self.alloc(ForStatement { data: self.finish(start), init, test, update, body })))
    }

    /// The rest of a for-in or for-of after its left side.
    fn parse_for_in(&mut self, start: usize, left: ForLeft<'a>, await_at: Option<usize>) -> PResult<Statement<'a>> {
        let is_for_in = self.is(TokenKind::In);
        self.next()?;
        if is_for_in {
            if let Some(pos) = await_at {
                return Err(self.error_at(&messages::UNEXPECTED_TOKEN, pos, &[]));
            }
        }

        match left {
            ForLeft::Variable(decl) => {
                if let Some(first) = decl.declarations.first() {
                    let annex_b_allowed = is_for_in
                        && !self.is_strict()
                        && decl.kind == VariableKind::Var
                        && matches!(first.id, Pattern::Identifier(_));
                    if first.init.is_some() && !annex_b_allowed {
                        let head = if is_for_in { "for-in" } else { "for-of" };
                        self.raise(&messages::FOR_IN_OF_LOOP_INITIALIZER, span_start(decl.data.span), &[head])?;
                    }
                }
            }
            ForLeft::Pattern(Pattern::Assignment(assign)) => {
                self.raise(&messages::INVALID_LHS, span_start(assign.data.span), &["for-loop"])?;
            }
            ForLeft::Pattern(_) => {}
        }

        let right = if is_for_in { self.parse_expression()? } else { self.parse_maybe_assign_allow_in(None)? };
        self.expect(TokenKind::ParenR)?;
        let body = self.parse_statement()?;
        self.scope.exit();
        self.state.labels.pop();

        let data = self.finish(start);
        Ok(if is_for_in {
            Statement::ForIn(self.alloc(ForInStatement { data, left, right, body }))
        } else {
            Statement::ForOf(self.alloc(ForOfStatement { data, is_await: await_at.is_some(), left, right, body }))
        })
    }

    fn parse_while(&mut self, start: usize) -> PResult<Statement<'a>> {
        self.next()?;
        let test = self.parse_header_expression()?;
        self.state.labels.push(loop_label(start));
        let body = self.parse_statement()?;
        self.state.labels.pop();
        Ok(Statement::While(self.alloc(WhileStatement { data: self.finish(start), test, body })))
    }

    fn parse_do_while(&mut self, start: usize) -> PResult<Statement<'a>> {
        self.next()?;
        self.state.labels.push(loop_label(start));
        let body = self.parse_statement()?;
        self.state.labels.pop();
        self.expect(TokenKind::While)?;
        let test = self.parse_header_expression()?;
        self.eat(TokenKind::Semi)?;
        Ok(Statement::DoWhile(self.alloc(DoWhileStatement { data: self.finish(start), body, test })))
    }

    // ========================================================================
    // Control flow
    // ========================================================================

    fn parse_if(&mut self, start: usize) -> PResult<Statement<'a>> {
        self.next()?;
        let test = self.parse_header_expression()?;
        let consequent = self.parse_statement_or_annex_b_function(false)?;
        let alternate =
            if self.eat(TokenKind::Else)? { Some(self.parse_statement_or_annex_b_function(false)?) } else { None };
        Ok(Statement::If(self.alloc(IfStatement { data: self.finish(start), test, consequent, alternate })))
    }

    fn parse_return(&mut self, start: usize) -> PResult<Statement<'a>> {
        if !self.prod_param.has_return() {
            self.raise(&messages::ILLEGAL_RETURN, start, &[])?;
        }
        self.next()?;
        let argument = if self.is_line_terminator()? {
            None
        } else {
            let argument = self.parse_expression()?;
            self.semicolon()?;
            Some(argument)
        };
        Ok(Statement::Return(self.alloc(ReturnStatement { data: self.finish(start), argument })))
    }

    fn parse_switch(&mut self, start: usize) -> PResult<Statement<'a>> {
        self.next()?;
        let discriminant = self.parse_header_expression()?;
        self.expect(TokenKind::BraceL)?;
        self.state.labels.push(Label { name: None, kind: Some(LabelKind::Switch), statement_start: start });
        self.scope.enter(ScopeFlags::OTHER);

        let mut cases = Vec::new();
        let mut current: Option<(usize, Option<Expression<'a>>, Vec<Statement<'a>>)> = None;
        let mut saw_default = false;
        while !self.is(TokenKind::BraceR) {
            if self.is(TokenKind::Case) || self.is(TokenKind::Default) {
                let is_case = self.is(TokenKind::Case);
                if let Some((case_start, test, consequent)) = current.take() {
                    cases.push(self.finish_switch_case(case_start, test, consequent));
                }
                let case_start = self.start();
                self.next()?;
                let test = if is_case {
                    Some(self.parse_expression()?)
                } else {
                    if saw_default {
                        self.raise(&messages::MULTIPLE_DEFAULTS_IN_SWITCH, self.last_start(), &[])?;
                    }
                    saw_default = true;
                    None
                };
                self.expect(TokenKind::Colon)?;
                current = Some((case_start, test, Vec::new()));
            } else {
                match current.as_mut() {
                    Some((_, _, consequent)) => consequent.push(self.parse_statement_list_item()?),
                    None => return Err(self.unexpected()),
                }
            }
        }
        self.scope.exit();
        if let Some((case_start, test, consequent)) = current.take() {
            cases.push(self.finish_switch_case(case_start, test, consequent));
        }
        self.next()?;
        self.state.labels.pop();
        let cases = self.alloc_vec(cases);
        Ok(Statement::Switch(self.alloc(SwitchStatement { data: self.finish(start), discriminant, cases })))
    }

    fn finish_switch_case(
        &self,
        start: usize,
        test: Option<Expression<'a>>,
        consequent: Vec<Statement<'a>>,
    ) -> SwitchCase<'a> {
        SwitchCase { data: self.finish(start), test, consequent: self.alloc_vec(consequent) }
    }

    fn parse_throw(&mut self, start: usize) -> PResult<Statement<'a>> {
        self.next()?;
        if self.has_preceding_line_break() {
            self.raise(&messages::NEWLINE_AFTER_THROW, self.last_end(), &[])?;
        }
        let argument = self.parse_expression()?;
        self.semicolon()?;
        Ok(Statement::Throw(self.alloc(ThrowStatement { data: self.finish(start), argument })))
    }

    fn parse_try(&mut self, start: usize) -> PResult<Statement<'a>> {
        self.next()?;
        let block = self.parse_block()?;
        let handler = if self.is(TokenKind::Catch) { Some(self.parse_catch_clause()?) } else { None };
        let finalizer = if self.eat(TokenKind::Finally)? { Some(self.parse_block()?) } else { None };
        if handler.is_none() && finalizer.is_none() {
            self.raise(&messages::NO_CATCH_OR_FINALLY, start, &[])?;
        }
        Ok(Statement::Try(self.alloc(TryStatement { data: self.finish(start), block, handler, finalizer })))
    }

    fn parse_catch_clause(&mut self) -> PResult<&'a CatchClause<'a>> {
        let start = self.start();
        self.next()?;
        let param = if self.eat(TokenKind::ParenL)? {
            let param = self.parse_binding_atom()?;
            let (param, _) = self.parse_binding_annotation(param, BindingPosition::CatchParam)?;
            let flags = if matches!(param, Pattern::Identifier(_)) { ScopeFlags::SIMPLE_CATCH } else { ScopeFlags::OTHER };
            self.scope.enter(flags);
            self.check_lval(&param, LvalTarget::binding("catch clause", BindingFlags::TYPE_CATCH_PARAM), None)?;
            self.expect(TokenKind::ParenR)?;
            Some(param)
        } else {
            self.scope.enter(ScopeFlags::OTHER);
            None
        };
        let body = self.parse_block_with(false, false, |_, _| Ok(()))?;
        self.scope.exit();
        Ok(self.alloc(CatchClause { data: self.finish(start), param, body }))
    }

    fn parse_with(&mut self, start: usize) -> PResult<Statement<'a>> {
        if self.is_strict() {
            self.raise(&messages::STRICT_WITH, start, &[])?;
        }
        self.next()?;
        let object = self.parse_header_expression()?;
        let body = self.parse_statement()?;
        Ok(Statement::With(self.alloc(WithStatement { data: self.finish(start), object, body })))
    }

    // ========================================================================
    // Labels
    // ========================================================================

    /// The `:` after `label` has been consumed.
    fn parse_labeled_statement(
        &mut self,
        start: usize,
        label: &'a Identifier<'a>,
        ctx: StatementContext,
    ) -> PResult<Statement<'a>> {
        let name = self.intern(label.name);
        if self.state.labels.iter().any(|l| l.name == Some(name)) {
            self.raise(&messages::LABEL_REDECLARATION, span_start(label.data.span), &[label.name])?;
        }
        let kind = if self.token().is_loop() {
            Some(LabelKind::Loop)
        } else if self.is(TokenKind::Switch) {
            Some(LabelKind::Switch)
        } else {
            None
        };
        let body_start = self.start();
        for existing in self.state.labels.iter_mut().rev() {
            if existing.statement_start != start {
                break;
            }
            existing.statement_start = body_start;
            existing.kind = kind;
        }
        self.state.labels.push(Label { name: Some(name), kind, statement_start: body_start });
        let body = if ctx.contains(StatementContext::ALLOW_LABELED_FUNCTION) {
            self.parse_statement_or_annex_b_function(true)?
        } else {
            self.parse_statement()?
        };
        self.state.labels.pop();
        Ok(Statement::Labeled(self.alloc(LabeledStatement { data: self.finish(start), label, body })))
    }

    fn parse_break_continue(&mut self, start: usize, is_break: bool) -> PResult<Statement<'a>> {
        self.next()?;
        let label = if self.is_line_terminator()? {
            None
        } else {
            let label = self.parse_identifier(false)?;
            self.semicolon()?;
            Some(label)
        };
        self.verify_break_continue(start, label, is_break)?;
        let data = self.finish(start);
        Ok(if is_break {
            Statement::Break(self.alloc(BreakStatement { data, label }))
        } else {
            Statement::Continue(self.alloc(ContinueStatement { data, label }))
        })
    }

    /// A `break` needs an enclosing breakable statement or a matching label;
    /// a `continue` needs an enclosing loop.
    fn verify_break_continue(&mut self, start: usize, label: Option<&'a Identifier<'a>>, is_break: bool) -> PResult<()> {
        let name = label.map(|l| self.intern(l.name));
        let found = self.state.labels.iter().any(|existing| {
            if name.is_some() && existing.name != name {
                return false;
            }
            match existing.kind {
                Some(kind) if is_break || kind == LabelKind::Loop => true,
                _ => name.is_some() && is_break,
            }
        });
        if !found {
            let keyword = if is_break { "break" } else { "continue" };
            self.raise(&messages::ILLEGAL_BREAK_CONTINUE, start, &[keyword])?;
        }
        Ok(())
    }
}

/// A token that can start a binding identifier: a name, or a keyword
/// other than the relational ones.
fn starts_binding_identifier(kind: TokenKind) -> bool {
    kind == TokenKind::Name || (kind.is_keyword() && !matches!(kind, TokenKind::In | TokenKind::Instanceof))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::ParserOptions;
    use crate::parse;

    fn body_of<'a>(file: &'a File<'a>) -> &'a [Statement<'a>] {
        file.program.body
    }

    // ========================================================================
    // Context flags
    // ========================================================================

    #[test]
    fn test_statement_context_sets() {
        assert!(StatementContext::STATEMENT_LIST_ITEM.contains(StatementContext::ALLOW_DECLARATION));
        assert!(!StatementContext::STATEMENT_LIST_ITEM.contains(StatementContext::ALLOW_IMPORT_EXPORT));
        assert!(StatementContext::MODULE_ITEM.contains(StatementContext::ALLOW_IMPORT_EXPORT));
        assert!(StatementContext::STATEMENT_ONLY.is_empty());
    }

    #[test]
    fn test_binding_identifier_starts() {
        assert!(starts_binding_identifier(TokenKind::Name));
        assert!(starts_binding_identifier(TokenKind::Function));
        assert!(!starts_binding_identifier(TokenKind::In));
        assert!(!starts_binding_identifier(TokenKind::Instanceof));
        assert!(!starts_binding_identifier(TokenKind::ParenL));
    }

    // ========================================================================
    // Statements
    // ========================================================================

    #[test]
    fn test_let_as_identifier_and_declaration() {
        let arena = bumpalo::Bump::new();
        let options = ParserOptions::default();
        let file = parse(&arena, "let = 1; let\nx = 2; let [a] = [1];", &options).unwrap();
        let body = body_of(&file);
        assert!(matches!(body[0], Statement::Expression(_)));
        assert!(matches!(body[1], Statement::Variable(decl) if decl.kind == VariableKind::Let));
        assert!(matches!(body[2], Statement::Variable(_)));
    }

    #[test]
    fn test_labels_and_breaks() {
        let arena = bumpalo::Bump::new();
        let options = ParserOptions::default();
        let file = parse(&arena, "outer: for (;;) { inner: while (1) { continue outer; break inner; } }", &options).unwrap();
        assert!(matches!(body_of(&file)[0], Statement::Labeled(_)));

        let arena = bumpalo::Bump::new();
        let err = parse(&arena, "a: { continue a; }", &options).unwrap_err();
        assert_eq!(err.diagnostic().map(|d| d.reason_code()), Some("IllegalBreakContinue"));
    }

    #[test]
    fn test_directive_prologue_turns_strict() {
        let arena = bumpalo::Bump::new();
        let options = ParserOptions::default();
        let file = parse(&arena, "'use strict'; x;", &options).unwrap();
        assert_eq!(file.program.directives.len(), 1);
        assert_eq!(file.program.directives[0].value.value, "use strict");
        assert_eq!(file.program.body.len(), 1);

        let arena = bumpalo::Bump::new();
        let err = parse(&arena, "'use strict'; with (a) {}", &options).unwrap_err();
        assert_eq!(err.diagnostic().map(|d| d.reason_code()), Some("StrictWith"));
    }

    #[test]
    fn test_for_heads() {
        let arena = bumpalo::Bump::new();
        let options = ParserOptions::default();
        let file = parse(&arena, "for (var i = 0 in o); for (const k of ks); for (;;) break;", &options).unwrap();
        let body = body_of(&file);
        assert!(matches!(body[0], Statement::ForIn(_)));
        assert!(matches!(body[1], Statement::ForOf(stmt) if !stmt.is_await));
        assert!(matches!(body[2], Statement::For(_)));

        let arena = bumpalo::Bump::new();
        let err = parse(&arena, "for (let x = 1 of xs);", &options).unwrap_err();
        assert_eq!(err.diagnostic().map(|d| d.reason_code()), Some("ForInOfLoopInitializer"));
    }

    #[test]
    fn test_const_requires_initializer() {
        let arena = bumpalo::Bump::new();
        let options = ParserOptions::default();
        let err = parse(&arena, "const x;", &options).unwrap_err();
        assert_eq!(err.diagnostic().map(|d| d.reason_code()), Some("DeclarationMissingInitializer"));
    }
}
