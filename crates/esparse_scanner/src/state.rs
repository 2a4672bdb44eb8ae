//! Scanner state snapshots for lookahead and backtracking.

use crate::context::TokContext;
use esparse_ast::{TokenKind, TokenValue};
use esparse_core::collections::OrderedMap;
use esparse_diagnostics::Diagnostic;

/// Everything the scanner needs to resume from a given token.
#[derive(Debug, Clone)]
pub struct LexerState<'a> {
    /// Current position in the text.
    pub pos: usize,
    /// The current token kind.
    pub kind: TokenKind,
    /// The payload of the current token.
    pub value: TokenValue<'a>,
    /// Start of the current token.
    pub start: usize,
    /// End of the current token.
    pub end: usize,
    /// Kind of the previously consumed token.
    pub last_tok_kind: TokenKind,
    pub last_tok_start: usize,
    pub last_tok_end: usize,
    /// Context stack. Never empty.
    pub context: Vec<TokContext>,
    /// Whether a `<` here may open a JSX element.
    pub can_start_jsx: bool,
    /// Whether the current word token was written with escapes.
    pub contains_esc: bool,
    pub strict: bool,
    /// Errors that only apply in strict mode, keyed by offset. They are
    /// raised if a later `"use strict"` directive turns strict mode on.
    pub strict_errors: OrderedMap<u32, Diagnostic>,
    /// Inside a type annotation: `<` and `>` are always single characters.
    pub in_type: bool,
    /// Offset of the first invalid escape in the current template chunk.
    pub first_invalid_template_escape: Option<usize>,
}

impl<'a> LexerState<'a> {
    pub fn new() -> Self {
        Self {
            pos: 0,
            kind: TokenKind::Eof,
            value: TokenValue::None,
            start: 0,
            end: 0,
            last_tok_kind: TokenKind::Eof,
            last_tok_start: 0,
            last_tok_end: 0,
            context: vec![TokContext::Brace],
            can_start_jsx: true,
            contains_esc: false,
            strict: false,
            strict_errors: OrderedMap::new(),
            in_type: false,
            first_invalid_template_escape: None,
        }
    }

    #[inline]
    pub fn cur_context(&self) -> TokContext {
        self.context.last().copied().unwrap_or(TokContext::Brace)
    }
}

impl Default for LexerState<'_> {
    fn default() -> Self {
        Self::new()
    }
}

/// A saved scanner position. Restoring it rewinds the state and truncates
/// the error, comment and token lists to their lengths at capture time.
#[derive(Debug, Clone)]
pub struct ScannerCheckpoint<'a> {
    pub(crate) state: LexerState<'a>,
    pub(crate) errors: usize,
    pub(crate) comments: usize,
    pub(crate) tokens: usize,
}

impl ScannerCheckpoint<'_> {
    /// Number of errors recorded when the checkpoint was taken.
    #[inline]
    pub fn error_count(&self) -> usize {
        self.errors
    }

    /// Offset of the current token at capture time.
    #[inline]
    pub fn token_start(&self) -> usize {
        self.state.start
    }
}

/// One token read past the current one.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Lookahead<'a> {
    pub kind: TokenKind,
    pub value: TokenValue<'a>,
    pub start: usize,
    pub end: usize,
    pub contains_esc: bool,
    /// A line terminator separates it from the current token.
    pub has_line_break_before: bool,
}

impl<'a> Lookahead<'a> {
    /// Whether this is the unescaped contextual keyword `name`.
    #[inline]
    pub fn is_contextual(&self, name: &str) -> bool {
        self.kind == TokenKind::Name && !self.contains_esc && self.value.as_str() == Some(name)
    }
}
