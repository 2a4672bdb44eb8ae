//! The parser core: token helpers, error policy, checkpoints and the entry
//! into the grammar.
//!
//! The grammar itself is split over `expression`, `statement`, `lval`,
//! `class` and `module`, each adding methods to [`Parser`]. Overlays reach
//! the same methods through the hook points declared in [`crate::overlay`].

use crate::options::{ParserOptions, PluginSet, Plugins};
use crate::overlay::{self, Layer, Overlay};
use crate::state::ParserState;
use bumpalo::Bump;
use esparse_ast::{Identifier, NodeData, TokenKind, TokenValue};
use esparse_core::collections::FxHashSet;
use esparse_core::intern::{Atom, Interner};
use esparse_core::text::Span;
use esparse_diagnostics::{messages, Diagnostic, DiagnosticMessage};
use esparse_scanner::{Lookahead, ScannerCheckpoint, ScannerOptions, Scanner};
use esparse_scope::{ClassScopeHandler, ParamFlags, ProductionParamHandler, ScopeDialect, ScopeFlags, ScopeHandler};
use tracing::{debug, trace};

/// Maximum nesting of guarded productions before the parse is abandoned.
pub(crate) const MAX_RECURSION_DEPTH: u32 = 1000;

/// Stack left when a guarded production grows onto a fresh segment.
const STACK_RED_ZONE: usize = 256 * 1024;
const STACK_SEGMENT_SIZE: usize = 2 * 1024 * 1024;

/// Result of a grammar production. `Err` carries the error that stopped the
/// parse.
pub type PResult<T> = Result<T, Diagnostic>;

/// Everything a speculative parse may change.
pub(crate) struct Checkpoint<'a> {
    scanner: ScannerCheckpoint<'a>,
    scope: ScopeHandler,
    class_scope: ClassScopeHandler,
    prod_param: ProductionParamHandler,
    state: ParserState,
    exported_names: FxHashSet<Atom>,
    recursion_depth: u32,
}

impl Checkpoint<'_> {
    #[inline]
    pub(crate) fn token_start(&self) -> usize {
        self.scanner.token_start()
    }
}

/// The parser produces a `File` from ECMAScript source text.
pub struct Parser<'a> {
    pub(crate) arena: &'a Bump,
    pub(crate) scanner: Scanner<'a>,
    pub(crate) options: ParserOptions,
    pub(crate) plugins: PluginSet,
    /// Composed overlays, outermost first.
    pub(crate) overlays: &'a [&'static dyn Overlay],
    pub(crate) interner: Interner,
    pub(crate) scope: ScopeHandler,
    pub(crate) class_scope: ClassScopeHandler,
    pub(crate) prod_param: ProductionParamHandler,
    pub(crate) state: ParserState,
    /// Names exported so far, for duplicate detection.
    pub(crate) exported_names: FxHashSet<Atom>,
    /// Tracks recursion depth to prevent stack overflow on deeply nested input.
    recursion_depth: u32,
    pub(crate) in_module: bool,
    /// Parsing as a module on behalf of `sourceType: "unambiguous"`.
    pub(crate) unambiguous: bool,
}

impl<'a> Parser<'a> {
    /// Build a parser. `plugins` must come from
    /// [`ParserOptions::resolve_plugins`], which rejects incompatible sets.
    pub fn new(arena: &'a Bump, source: &str, options: &ParserOptions, plugins: PluginSet, in_module: bool) -> Self {
        let composed = overlay::compose(&plugins);
        let features = composed
            .iter()
            .fold(Default::default(), |features, layer| features | layer.lexer_features());
        debug!(
            overlays = ?composed.iter().map(|o| o.name()).collect::<Vec<_>>(),
            module = in_module,
            "composed parser overlays"
        );
        let scanner_options = ScannerOptions {
            features,
            module: in_module,
            error_recovery: options.error_recovery,
            tokens: options.tokens,
            start_line: options.start_line,
            start_column: options.start_column,
        };
        let dialect = if plugins.has(Plugins::TYPESCRIPT) {
            ScopeDialect::TypeScript
        } else if plugins.has(Plugins::FLOW) {
            ScopeDialect::Flow
        } else {
            ScopeDialect::Plain
        };
        Self {
            arena,
            scanner: Scanner::new(arena, source, scanner_options),
            options: options.clone(),
            plugins,
            overlays: arena.alloc_slice_copy(&composed),
            interner: Interner::new(),
            scope: ScopeHandler::new(in_module, dialect),
            class_scope: ClassScopeHandler::new(),
            prod_param: ProductionParamHandler::new(),
            state: ParserState { in_ambient_context: plugins.dts, ..ParserState::new() },
            exported_names: FxHashSet::default(),
            recursion_depth: 0,
            in_module,
            unambiguous: false,
        }
    }

    /// Read the first token and set up the top-level strictness and
    /// production parameters.
    pub(crate) fn begin(&mut self) -> PResult<()> {
        let strict = self.options.strict_mode.unwrap_or(self.in_module);
        self.scanner.set_strict(strict)?;
        self.scanner.next_token()?;
        let mut params = ParamFlags::NONE;
        if self.in_module || self.options.allow_await_outside_function {
            params |= ParamFlags::AWAIT;
        }
        if self.options.allow_return_outside_function {
            params |= ParamFlags::RETURN;
        }
        self.prod_param.enter(params);
        self.scope.enter(ScopeFlags::PROGRAM);
        Ok(())
    }

    #[inline]
    pub(crate) fn has_plugin(&self, plugin: Plugins) -> bool {
        self.plugins.has(plugin)
    }

    #[inline]
    pub(crate) fn is_typescript(&self) -> bool {
        self.plugins.has(Plugins::TYPESCRIPT)
    }

    #[inline]
    pub(crate) fn is_flow(&self) -> bool {
        self.plugins.has(Plugins::FLOW)
    }

    // ========================================================================
    // Token management
    // ========================================================================

    #[inline]
    pub(crate) fn token(&self) -> TokenKind {
        self.scanner.token()
    }

    #[inline]
    pub(crate) fn token_value(&self) -> TokenValue<'a> {
        self.scanner.token_value()
    }

    /// A template literal opens at the current token.
    #[inline]
    pub(crate) fn at_template_start(&self) -> bool {
        self.token().is_template() && !self.scanner.token_resumes_template()
    }

    /// The current token starts an expression. A template chunk resumed
    /// after a substitution does not.
    #[inline]
    pub(crate) fn token_starts_expr(&self) -> bool {
        self.token().starts_expr() && !self.scanner.token_resumes_template()
    }

    /// The string payload of the current token, or `""`.
    #[inline]
    pub(crate) fn token_str(&self) -> &'a str {
        self.scanner.token_value().as_str().unwrap_or("")
    }

    #[inline]
    pub(crate) fn start(&self) -> usize {
        self.scanner.token_start()
    }

    #[inline]
    pub(crate) fn token_end(&self) -> usize {
        self.scanner.token_end()
    }

    #[inline]
    pub(crate) fn last_end(&self) -> usize {
        self.scanner.last_tok_end()
    }

    #[inline]
    pub(crate) fn is(&self, kind: TokenKind) -> bool {
        self.scanner.token() == kind
    }

    #[inline]
    pub(crate) fn is_contextual(&self, name: &str) -> bool {
        self.scanner.is_contextual(name)
    }

    #[inline]
    pub(crate) fn next(&mut self) -> PResult<()> {
        self.scanner.next()
    }

    pub(crate) fn eat(&mut self, kind: TokenKind) -> PResult<bool> {
        if self.is(kind) {
            self.next()?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    pub(crate) fn expect(&mut self, kind: TokenKind) -> PResult<()> {
        if self.eat(kind)? {
            Ok(())
        } else {
            Err(self.unexpected_expected(kind.label()))
        }
    }

    pub(crate) fn eat_contextual(&mut self, name: &str) -> PResult<bool> {
        if self.is_contextual(name) {
            self.next()?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    pub(crate) fn expect_contextual(&mut self, name: &str) -> PResult<()> {
        if self.eat_contextual(name)? {
            Ok(())
        } else {
            Err(self.unexpected_expected(name))
        }
    }

    #[inline]
    pub(crate) fn lookahead(&mut self) -> PResult<Lookahead<'a>> {
        self.scanner.lookahead()
    }

    #[inline]
    pub(crate) fn lookahead_char(&self) -> Option<char> {
        self.scanner.lookahead_char()
    }

    #[inline]
    pub(crate) fn has_preceding_line_break(&self) -> bool {
        self.scanner.has_preceding_line_break()
    }

    /// Whether the next token follows the current one without a line break.
    pub(crate) fn next_is_on_same_line(&self) -> bool {
        let next = self.scanner.next_token_in_line_start();
        next == self.scanner.next_token_start()
    }

    pub(crate) fn can_insert_semicolon(&self) -> bool {
        self.is(TokenKind::Eof) || self.is(TokenKind::BraceR) || self.has_preceding_line_break()
    }

    pub(crate) fn is_line_terminator(&mut self) -> PResult<bool> {
        Ok(self.eat(TokenKind::Semi)? || self.can_insert_semicolon())
    }

    /// Consume a statement terminator, inserting one where allowed.
    pub(crate) fn semicolon(&mut self) -> PResult<()> {
        if !self.is_line_terminator()? {
            self.raise(&messages::MISSING_SEMICOLON, self.last_end(), &[])?;
        }
        Ok(())
    }

    // ========================================================================
    // Nodes
    // ========================================================================

    #[inline]
    pub(crate) fn alloc<T>(&self, value: T) -> &'a T {
        self.arena.alloc(value)
    }

    #[inline]
    pub(crate) fn alloc_vec<T>(&self, items: Vec<T>) -> &'a [T] {
        esparse_core::alloc_vec(self.arena, items)
    }

    #[inline]
    pub(crate) fn alloc_str(&self, s: &str) -> &'a str {
        self.arena.alloc_str(s)
    }

    #[inline]
    pub(crate) fn span(&self, start: usize, end: usize) -> Span {
        self.scanner.span(start, end)
    }

    /// Node data from `start` to the end of the last consumed token.
    #[inline]
    pub(crate) fn finish(&self, start: usize) -> NodeData {
        NodeData::new(self.scanner.span(start, self.scanner.last_tok_end()))
    }

    #[inline]
    pub(crate) fn finish_at(&self, start: usize, end: usize) -> NodeData {
        NodeData::new(self.scanner.span(start, end))
    }

    /// Source text between two offsets, copied into the arena.
    #[inline]
    pub(crate) fn source(&self, start: usize, end: usize) -> &'a str {
        self.scanner.alloc_slice(start, end)
    }

    pub(crate) fn identifier_at(&self, start: usize, end: usize, name: &'a str) -> &'a Identifier<'a> {
        self.alloc(Identifier::new(self.span(start, end), name))
    }

    #[inline]
    pub(crate) fn intern(&mut self, name: &str) -> Atom {
        self.interner.intern(name)
    }

    // ========================================================================
    // Errors
    // ========================================================================

    /// Report an error at `pos`. Returns `Err` unless the error can be
    /// recorded under error recovery.
    pub(crate) fn raise(&mut self, message: &'static DiagnosticMessage, pos: usize, args: &[&str]) -> PResult<()> {
        let diag = self.scanner.error_at(message, pos, args);
        self.scanner.raise(diag)
    }

    /// Like [`Parser::raise`], but replaces an error already recorded at the
    /// same offset.
    pub(crate) fn raise_overwrite(
        &mut self,
        message: &'static DiagnosticMessage,
        pos: usize,
        args: &[&str],
    ) -> PResult<()> {
        let diag = self.scanner.error_at(message, pos, args);
        self.scanner.raise_overwrite(diag)
    }

    #[inline]
    pub(crate) fn error_at(&self, message: &'static DiagnosticMessage, pos: usize, args: &[&str]) -> Diagnostic {
        self.scanner.error_at(message, pos, args)
    }

    /// An "unexpected token" error at the current token.
    pub(crate) fn unexpected(&self) -> Diagnostic {
        self.error_at(&messages::UNEXPECTED_TOKEN, self.start(), &[])
    }

    pub(crate) fn unexpected_expected(&self, expected: &str) -> Diagnostic {
        self.error_at(&messages::UNEXPECTED_TOKEN_EXPECTED, self.start(), &[expected])
    }

    /// A capability error naming the plugins that would accept the
    /// construct at `pos`.
    pub(crate) fn missing_plugins(&self, pos: usize, plugins: &[&'static str]) -> Diagnostic {
        Diagnostic::missing_plugins(self.scanner.position_of(pos), plugins)
    }

    // ========================================================================
    // Speculative parsing
    // ========================================================================

    pub(crate) fn checkpoint(&self) -> Checkpoint<'a> {
        Checkpoint {
            scanner: self.scanner.checkpoint(),
            scope: self.scope.clone(),
            class_scope: self.class_scope.clone(),
            prod_param: self.prod_param.clone(),
            state: self.state.clone(),
            exported_names: self.exported_names.clone(),
            recursion_depth: self.recursion_depth,
        }
    }

    pub(crate) fn restore(&mut self, checkpoint: Checkpoint<'a>) {
        trace!(pos = checkpoint.token_start(), "restore checkpoint");
        self.scanner.restore(checkpoint.scanner);
        self.scope = checkpoint.scope;
        self.class_scope = checkpoint.class_scope;
        self.prod_param = checkpoint.prod_param;
        self.state = checkpoint.state;
        self.exported_names = checkpoint.exported_names;
        self.recursion_depth = checkpoint.recursion_depth;
    }

    /// Run `f` speculatively. On success without new errors the result is
    /// kept; otherwise everything is rewound and the first error is handed
    /// back. Only the recursion limit escapes as `Err`.
    pub(crate) fn try_parse_with_error<T>(
        &mut self,
        f: impl FnOnce(&mut Self) -> PResult<T>,
    ) -> PResult<Result<T, Diagnostic>> {
        let checkpoint = self.checkpoint();
        let errors = checkpoint.scanner.error_count();
        match f(self) {
            Ok(value) if self.scanner.error_count() == errors => Ok(Ok(value)),
            Ok(_) => {
                let first = self.scanner.errors()[errors].clone();
                self.restore(checkpoint);
                Ok(Err(first))
            }
            Err(diag) if diag.is(&messages::RECURSION_LIMIT) => Err(diag),
            Err(diag) => {
                self.restore(checkpoint);
                Ok(Err(diag))
            }
        }
    }

    pub(crate) fn try_parse<T>(&mut self, f: impl FnOnce(&mut Self) -> PResult<T>) -> PResult<Option<T>> {
        Ok(self.try_parse_with_error(f)?.ok())
    }

    /// Run `f` one nesting level deeper, failing once the depth limit is hit.
    pub(crate) fn with_recursion_guard<T>(&mut self, f: impl FnOnce(&mut Self) -> PResult<T>) -> PResult<T> {
        if self.recursion_depth >= MAX_RECURSION_DEPTH {
            debug!(pos = self.start(), depth = self.recursion_depth, "recursion limit reached");
            return Err(self.error_at(&messages::RECURSION_LIMIT, self.start(), &[]));
        }
        self.recursion_depth += 1;
        let result = stacker::maybe_grow(STACK_RED_ZONE, STACK_SEGMENT_SIZE, || f(self));
        self.recursion_depth -= 1;
        result
    }

    /// Run `f` with the scanner in type context. Tokens read inside see
    /// `<` and `>` as single characters; the token after the type is
    /// re-read as an ordinary operator.
    pub(crate) fn in_type<T>(&mut self, f: impl FnOnce(&mut Self) -> PResult<T>) -> PResult<T> {
        let old = self.scanner.set_in_type(true);
        let result = f(self);
        self.scanner.set_in_type(old);
        if !old && matches!(self.token(), TokenKind::Lt | TokenKind::Gt) {
            self.scanner.rescan_lt_gt()?;
        }
        result
    }

    // ========================================================================
    // Overlay plumbing
    // ========================================================================

    /// The layer an overlay hook should resume from to reach the base.
    #[inline]
    pub(crate) fn outermost(&self) -> Layer {
        Layer::OUTERMOST
    }
}
