//! The ECMAScript lexer.
//!
//! The scanner produces one token at a time on demand. Ambiguous code points
//! (`/`, `}`, `<`) are resolved with the context stack and with parser-driven
//! rescans such as [`Scanner::read_regexp`]. It also owns the error list of a
//! parse so that a checkpoint restore can truncate it together with the
//! token and comment lists.

use crate::char_codes::*;
use crate::context::{LexerFeatures, ScannerOptions, TokContext};
use crate::state::{LexerState, Lookahead, ScannerCheckpoint};
use bumpalo::Bump;
use esparse_ast::{Comment, CommentKind, Token, TokenKind, TokenOrComment, TokenValue};
use esparse_core::text::{LineMap, Position, Span};
use esparse_diagnostics::{messages, Diagnostic, DiagnosticMessage};
use tracing::{debug, trace};

/// Result of a scanner operation. `Err` carries a fatal diagnostic.
pub type ScanResult<T> = Result<T, Diagnostic>;

/// The result of reading one escape sequence.
enum Escape {
    Char(char),
    /// A line continuation.
    Empty,
    /// Not a valid escape in a template; the chunk has no cooked value.
    Invalid,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum StringKind {
    Quoted(char),
    Template,
}

/// Decoded contents of a string or template chunk.
struct StringContents {
    cooked: String,
    first_invalid: Option<usize>,
}

/// The scanner converts ECMAScript source text into tokens.
pub struct Scanner<'a> {
    /// Arena that owns token strings.
    arena: &'a Bump,
    /// The source text being scanned.
    text: Vec<char>,
    line_map: LineMap,
    options: ScannerOptions,
    state: LexerState<'a>,
    /// Comments in source order.
    comments: Vec<Comment<'a>>,
    /// Tokens and comments in source order, when requested.
    tokens: Vec<TokenOrComment<'a>>,
    /// Errors collected in recovery mode.
    errors: Vec<Diagnostic>,
    /// Set while reading a lookahead token: contexts are frozen and nothing
    /// is recorded.
    is_lookahead: bool,
}

impl<'a> Scanner<'a> {
    /// Create a new scanner for the given source text. Call
    /// [`Scanner::next_token`] once to read the first token.
    pub fn new(arena: &'a Bump, source: &str, options: ScannerOptions) -> Self {
        let text: Vec<char> = source.chars().collect();
        let line_map = LineMap::new(&text, options.start_line, options.start_column);
        Self {
            arena,
            text,
            line_map,
            options,
            state: LexerState::new(),
            comments: Vec::new(),
            tokens: Vec::new(),
            errors: Vec::new(),
            is_lookahead: false,
        }
    }

    #[inline]
    pub fn options(&self) -> &ScannerOptions {
        &self.options
    }

    #[inline]
    pub fn features(&self) -> LexerFeatures {
        self.options.features
    }

    #[inline]
    pub fn arena(&self) -> &'a Bump {
        self.arena
    }

    /// Get the full source text length in characters.
    #[inline]
    pub fn text_len(&self) -> usize {
        self.text.len()
    }

    // ========================================================================
    // Current token
    // ========================================================================

    /// Get the current token kind.
    #[inline]
    pub fn token(&self) -> TokenKind {
        self.state.kind
    }

    /// Get the current token's payload.
    #[inline]
    pub fn token_value(&self) -> TokenValue<'a> {
        self.state.value
    }

    /// Get the start offset of the current token.
    #[inline]
    pub fn token_start(&self) -> usize {
        self.state.start
    }

    /// Get the end offset of the current token.
    #[inline]
    pub fn token_end(&self) -> usize {
        self.state.end
    }

    /// Whether the current token continues a template after the `}` that
    /// closes a substitution, rather than opening one at a backquote.
    #[inline]
    pub fn token_resumes_template(&self) -> bool {
        self.state.kind.is_template() && self.text.get(self.state.start) == Some(&'}')
    }

    #[inline]
    pub fn start_loc(&self) -> Position {
        self.position_of(self.state.start)
    }

    #[inline]
    pub fn end_loc(&self) -> Position {
        self.position_of(self.state.end)
    }

    #[inline]
    pub fn last_tok_kind(&self) -> TokenKind {
        self.state.last_tok_kind
    }

    #[inline]
    pub fn last_tok_start(&self) -> usize {
        self.state.last_tok_start
    }

    #[inline]
    pub fn last_tok_end(&self) -> usize {
        self.state.last_tok_end
    }

    #[inline]
    pub fn last_tok_end_loc(&self) -> Position {
        self.position_of(self.state.last_tok_end)
    }

    /// Whether the current word token was written with unicode escapes.
    #[inline]
    pub fn contains_esc(&self) -> bool {
        self.state.contains_esc
    }

    /// The current token as a value.
    pub fn current_token(&self) -> Token<'a> {
        Token {
            kind: self.state.kind,
            value: self.state.value,
            span: self.span(self.state.start, self.state.end),
        }
    }

    /// Whether the current token is the unescaped contextual keyword `name`.
    #[inline]
    pub fn is_contextual(&self, name: &str) -> bool {
        self.state.kind == TokenKind::Name
            && !self.state.contains_esc
            && self.state.value.as_str() == Some(name)
    }

    /// Whether a line terminator occurs between the previous token and the
    /// current one.
    pub fn has_preceding_line_break(&self) -> bool {
        let from = self.state.last_tok_end.min(self.text.len());
        let to = self.state.start.min(self.text.len()).max(from);
        self.text[from..to].iter().any(|&c| is_line_break(c))
    }

    /// Whether a line terminator occurs between `from` and the current token.
    pub fn has_line_break_between(&self, from: usize, to: usize) -> bool {
        let from = from.min(self.text.len());
        let to = to.min(self.text.len()).max(from);
        self.text[from..to].iter().any(|&c| is_line_break(c))
    }

    // ========================================================================
    // Positions and text
    // ========================================================================

    #[inline]
    pub fn position_of(&self, index: usize) -> Position {
        self.line_map.position_of(index as u32)
    }

    #[inline]
    pub fn span(&self, start: usize, end: usize) -> Span {
        Span::new(self.position_of(start), self.position_of(end.max(start)))
    }

    /// The character at an absolute offset.
    #[inline]
    pub fn char_at_index(&self, index: usize) -> Option<char> {
        self.text.get(index).copied()
    }

    /// Copy a range of the source into a `String`.
    pub fn slice(&self, start: usize, end: usize) -> String {
        let end = end.min(self.text.len());
        let start = start.min(end);
        self.text[start..end].iter().collect()
    }

    /// Copy a range of the source into the arena.
    pub fn alloc_slice(&self, start: usize, end: usize) -> &'a str {
        let s = self.slice(start, end);
        self.arena.alloc_str(&s)
    }

    #[inline]
    pub fn alloc_str(&self, s: &str) -> &'a str {
        self.arena.alloc_str(s)
    }

    // ========================================================================
    // Context and modes
    // ========================================================================

    #[inline]
    pub fn cur_context(&self) -> TokContext {
        self.state.cur_context()
    }

    /// Pop the top context. The bottom entry is never removed.
    pub fn pop_context(&mut self) {
        if self.state.context.len() > 1 {
            self.state.context.pop();
        }
    }

    pub fn push_context(&mut self, context: TokContext) {
        self.state.context.push(context);
    }

    #[inline]
    pub fn can_start_jsx(&self) -> bool {
        self.state.can_start_jsx
    }

    #[inline]
    pub fn set_can_start_jsx(&mut self, value: bool) {
        self.state.can_start_jsx = value;
    }

    #[inline]
    pub fn in_type(&self) -> bool {
        self.state.in_type
    }

    /// Enter or leave type context. Returns the previous value.
    #[inline]
    pub fn set_in_type(&mut self, in_type: bool) -> bool {
        std::mem::replace(&mut self.state.in_type, in_type)
    }

    #[inline]
    pub fn is_strict(&self) -> bool {
        self.state.strict
    }

    /// Switch strict mode. Turning it on raises every deferred strict-mode
    /// error collected so far.
    pub fn set_strict(&mut self, strict: bool) -> ScanResult<()> {
        self.state.strict = strict;
        if strict && !self.state.strict_errors.is_empty() {
            debug!(count = self.state.strict_errors.len(), "flushing deferred strict-mode errors");
            let pending: Vec<Diagnostic> = self.state.strict_errors.drain().map(|(_, diag)| diag).collect();
            for diag in pending {
                self.raise(diag)?;
            }
        }
        Ok(())
    }

    /// Switch strict mode without raising deferred errors, as a class body
    /// does. Returns the previous setting.
    pub fn replace_strict(&mut self, strict: bool) -> bool {
        std::mem::replace(&mut self.state.strict, strict)
    }

    /// Forget deferred strict-mode errors once a prologue has ended.
    pub fn clear_strict_errors(&mut self) {
        self.state.strict_errors.clear();
    }

    /// Offset of the first invalid escape in the current template chunk.
    #[inline]
    pub fn first_invalid_template_escape(&self) -> Option<usize> {
        self.state.first_invalid_template_escape
    }

    // ========================================================================
    // Errors
    // ========================================================================

    /// Build a diagnostic at an offset.
    pub fn error_at(&self, message: &'static DiagnosticMessage, index: usize, args: &[&str]) -> Diagnostic {
        Diagnostic::new(message, self.position_of(index), args)
    }

    /// Report an error. In recovery mode a recoverable error is recorded and
    /// scanning continues; otherwise it is returned as `Err`.
    pub fn raise(&mut self, diag: Diagnostic) -> ScanResult<()> {
        if !self.options.error_recovery || diag.kind().is_always_fatal() {
            return Err(diag);
        }
        if !self.is_lookahead {
            self.errors.push(diag);
        }
        Ok(())
    }

    pub fn raise_at(&mut self, message: &'static DiagnosticMessage, index: usize, args: &[&str]) -> ScanResult<()> {
        let diag = self.error_at(message, index, args);
        self.raise(diag)
    }

    /// Replace an already recorded error at the same offset, or raise a new
    /// one. Errors are ordered by offset, so the walk from the newest stops
    /// at the first one that starts earlier.
    pub fn raise_overwrite(&mut self, diag: Diagnostic) -> ScanResult<()> {
        let index = diag.loc.index;
        for i in (0..self.errors.len()).rev() {
            let existing = self.errors[i].loc.index;
            if existing == index {
                self.errors[i] = diag;
                return Ok(());
            }
            if existing < index {
                break;
            }
        }
        self.raise(diag)
    }

    /// Record an error that only applies in strict code. In strict code it
    /// is raised immediately; otherwise it waits for a `"use strict"`.
    pub(crate) fn record_strict_mode_error(&mut self, message: &'static DiagnosticMessage, index: usize) -> ScanResult<()> {
        let key = index as u32;
        if self.state.strict && !self.state.strict_errors.contains_key(&key) {
            return self.raise_at(message, index, &[]);
        }
        let diag = self.error_at(message, index, &[]);
        self.state.strict_errors.insert(key, diag);
        Ok(())
    }

    #[inline]
    pub fn errors(&self) -> &[Diagnostic] {
        &self.errors
    }

    #[inline]
    pub fn error_count(&self) -> usize {
        self.errors.len()
    }

    pub fn take_errors(&mut self) -> Vec<Diagnostic> {
        std::mem::take(&mut self.errors)
    }

    // ========================================================================
    // Checkpoints
    // ========================================================================

    /// Save the scanner state.
    pub fn checkpoint(&self) -> ScannerCheckpoint<'a> {
        ScannerCheckpoint {
            state: self.state.clone(),
            errors: self.errors.len(),
            comments: self.comments.len(),
            tokens: self.tokens.len(),
        }
    }

    /// Rewind to a saved state, dropping everything recorded since.
    pub fn restore(&mut self, checkpoint: ScannerCheckpoint<'a>) {
        trace!(from = self.state.start, to = checkpoint.state.start, "scanner rewind");
        self.state = checkpoint.state;
        self.errors.truncate(checkpoint.errors);
        self.comments.truncate(checkpoint.comments);
        self.tokens.truncate(checkpoint.tokens);
    }

    // ========================================================================
    // Comments and tokens
    // ========================================================================

    #[inline]
    pub fn comments(&self) -> &[Comment<'a>] {
        &self.comments
    }

    pub fn take_comments(&mut self) -> Vec<Comment<'a>> {
        std::mem::take(&mut self.comments)
    }

    pub fn take_tokens(&mut self) -> Vec<TokenOrComment<'a>> {
        std::mem::take(&mut self.tokens)
    }

    // ========================================================================
    // Core scanning
    // ========================================================================

    /// Look at the character at the current position without advancing.
    #[inline]
    fn current_char(&self) -> Option<char> {
        self.text.get(self.state.pos).copied()
    }

    /// Look at the character at position pos + offset.
    #[inline]
    fn char_at(&self, offset: usize) -> Option<char> {
        self.text.get(self.state.pos + offset).copied()
    }

    /// Whether we've reached the end of the text.
    #[inline]
    fn is_eof(&self) -> bool {
        self.state.pos >= self.text.len()
    }

    /// Consume the current token and read the next one.
    pub fn next(&mut self) -> ScanResult<()> {
        self.check_keyword_escapes()?;
        if self.options.tokens {
            let token = self.current_token();
            self.tokens.push(TokenOrComment::Token(token));
        }
        self.state.last_tok_kind = self.state.kind;
        self.state.last_tok_start = self.state.start;
        self.state.last_tok_end = self.state.end;
        self.next_token()
    }

    fn check_keyword_escapes(&mut self) -> ScanResult<()> {
        let kind = self.state.kind;
        if kind.is_keyword() && self.state.contains_esc {
            return self.raise_at(&messages::INVALID_ESCAPED_RESERVED_WORD, self.state.start, &[kind.label()]);
        }
        Ok(())
    }

    /// Read the next token into the current-token slot without committing
    /// the previous one.
    pub fn next_token(&mut self) -> ScanResult<()> {
        let context = self.state.cur_context();
        if !context.preserves_space() {
            self.skip_space()?;
        }
        self.state.start = self.state.pos;
        self.state.contains_esc = false;
        if self.is_eof() {
            self.finish_token(TokenKind::Eof, TokenValue::None);
            return Ok(());
        }
        match context {
            TokContext::JsxExpression => self.read_jsx_token(),
            TokContext::JsxOpenTag | TokContext::JsxCloseTag => self.read_jsx_tag_token(context),
            TokContext::Brace | TokContext::Template => self.read_token(),
        }
    }

    /// Read one token past the current one without moving the cursor.
    pub fn lookahead(&mut self) -> ScanResult<Lookahead<'a>> {
        let saved = self.state.clone();
        self.is_lookahead = true;
        let result = self.next_token();
        let token = Lookahead {
            kind: self.state.kind,
            value: self.state.value,
            start: self.state.start,
            end: self.state.end,
            contains_esc: self.state.contains_esc,
            has_line_break_before: self.has_line_break_between(saved.end, self.state.start),
        };
        self.is_lookahead = false;
        self.state = saved;
        result.map(|_| token)
    }

    /// Offset of the next token start after the current token, skipping
    /// whitespace and comments.
    pub fn next_token_start(&self) -> usize {
        self.skip_trivia_from(self.state.pos, true)
    }

    /// Like [`Scanner::next_token_start`], but stops at a line terminator.
    pub fn next_token_in_line_start(&self) -> usize {
        self.skip_trivia_from(self.state.pos, false)
    }

    /// The first character of the next token.
    pub fn lookahead_char(&self) -> Option<char> {
        self.char_at_index(self.next_token_start())
    }

    /// The first character of the next token on the same line.
    pub fn lookahead_in_line_char(&self) -> Option<char> {
        self.char_at_index(self.next_token_in_line_start())
    }

    fn skip_trivia_from(&self, mut pos: usize, cross_lines: bool) -> usize {
        loop {
            let Some(&ch) = self.text.get(pos) else { return pos };
            if is_white_space_single_line(ch) {
                pos += 1;
            } else if is_line_break(ch) {
                if !cross_lines {
                    return pos;
                }
                pos += 1;
            } else if ch == '/' {
                match self.text.get(pos + 1) {
                    Some('/') => {
                        pos += 2;
                        while pos < self.text.len() && !is_line_break(self.text[pos]) {
                            pos += 1;
                        }
                    }
                    Some('*') => {
                        let Some(end) = self.find_block_comment_end(pos + 2) else { return pos };
                        if !cross_lines && self.text[pos + 2..end].iter().any(|&c| is_line_break(c)) {
                            return pos;
                        }
                        pos = end + 2;
                    }
                    _ => return pos,
                }
            } else {
                return pos;
            }
        }
    }

    fn find_block_comment_end(&self, from: usize) -> Option<usize> {
        let mut i = from;
        while i + 1 < self.text.len() {
            if self.text[i] == '*' && self.text[i + 1] == '/' {
                return Some(i);
            }
            i += 1;
        }
        None
    }

    fn finish_token(&mut self, kind: TokenKind, value: TokenValue<'a>) {
        self.state.end = self.state.pos;
        let prev = self.state.kind;
        self.state.kind = kind;
        self.state.value = value;
        if !self.is_lookahead {
            self.update_context(Some(prev));
        }
    }

    /// Finish an operator token of `size` characters, keeping its spelling.
    fn finish_op(&mut self, kind: TokenKind, size: usize) {
        let start = self.state.pos;
        self.state.pos += size;
        let op = self.alloc_slice(start, self.state.pos);
        self.finish_token(kind, TokenValue::Str(op));
    }

    /// Change the kind of the current token, e.g. `<` to `JsxTagStart`.
    pub fn replace_token(&mut self, kind: TokenKind) {
        self.state.kind = kind;
        self.update_context(None);
    }

    fn update_context(&mut self, prev: Option<TokenKind>) {
        let kind = self.state.kind;
        let jsx = self.options.features.contains(LexerFeatures::JSX);
        match kind {
            TokenKind::BraceL | TokenKind::BraceBarL => {
                self.state.context.push(TokContext::Brace);
                self.state.can_start_jsx = true;
            }
            TokenKind::BraceR | TokenKind::BraceBarR => {
                self.pop_context();
                self.state.can_start_jsx = self.state.cur_context() == TokContext::JsxExpression;
            }
            TokenKind::TemplateNonTail | TokenKind::TemplateTail => {
                let resumed = self.text.get(self.state.start) == Some(&'}');
                if kind == TokenKind::TemplateNonTail && !resumed {
                    self.state.context.push(TokContext::Template);
                } else if kind == TokenKind::TemplateTail && resumed && self.state.cur_context() == TokContext::Template {
                    self.pop_context();
                }
                self.state.can_start_jsx = kind.before_expr();
            }
            TokenKind::Slash if jsx && prev == Some(TokenKind::JsxTagStart) => {
                let keep = self.state.context.len().saturating_sub(2).max(1);
                self.state.context.truncate(keep);
                self.state.context.push(TokContext::JsxCloseTag);
                self.state.can_start_jsx = false;
            }
            TokenKind::JsxTagStart => {
                self.state.context.push(TokContext::JsxOpenTag);
            }
            TokenKind::JsxTagEnd => {
                let out = self.state.cur_context();
                if (out == TokContext::JsxOpenTag && prev == Some(TokenKind::Slash)) || out == TokContext::JsxCloseTag {
                    self.pop_context();
                    self.state.can_start_jsx = self.state.cur_context() == TokContext::JsxExpression;
                } else {
                    if let Some(top) = self.state.context.last_mut() {
                        *top = TokContext::JsxExpression;
                    }
                    self.state.can_start_jsx = true;
                }
            }
            _ => {
                self.state.can_start_jsx = kind.before_expr();
            }
        }
    }

    /// Skip whitespace and comments, recording comments.
    fn skip_space(&mut self) -> ScanResult<()> {
        let space_start = self.state.pos;
        let mut saw_line_break = false;
        while let Some(ch) = self.current_char() {
            match ch {
                '\r' => {
                    if self.char_at(1) == Some('\n') {
                        self.state.pos += 1;
                    }
                    self.state.pos += 1;
                    saw_line_break = true;
                }
                '\n' | '\u{2028}' | '\u{2029}' => {
                    self.state.pos += 1;
                    saw_line_break = true;
                }
                '/' => match self.char_at(1) {
                    Some('*') => {
                        if self.skip_block_comment()? {
                            saw_line_break = true;
                        }
                    }
                    Some('/') => self.skip_line_comment(2),
                    _ => break,
                },
                '-' if !self.options.module
                    && self.char_at(1) == Some('-')
                    && self.char_at(2) == Some('>')
                    && (space_start == 0 || saw_line_break) =>
                {
                    self.skip_line_comment(3);
                }
                '<' if !self.options.module
                    && self.char_at(1) == Some('!')
                    && self.char_at(2) == Some('-')
                    && self.char_at(3) == Some('-') =>
                {
                    self.skip_line_comment(4);
                }
                c if is_white_space_single_line(c) => {
                    self.state.pos += 1;
                }
                _ => break,
            }
        }
        Ok(())
    }

    /// Skip a `/* */` comment. Returns whether it spans a line break.
    fn skip_block_comment(&mut self) -> ScanResult<bool> {
        let start = self.state.pos;
        let Some(end) = self.find_block_comment_end(start + 2) else {
            return Err(self.error_at(&messages::UNTERMINATED_COMMENT, start, &[]));
        };
        self.state.pos = end + 2;
        let multiline = self.text[start + 2..end].iter().any(|&c| is_line_break(c));
        self.add_comment(CommentKind::Block, start, start + 2, end, self.state.pos);
        Ok(multiline)
    }

    /// Skip a comment running to the end of the line. `start_skip` is the
    /// length of its opening delimiter.
    fn skip_line_comment(&mut self, start_skip: usize) {
        let start = self.state.pos;
        self.state.pos += start_skip;
        while let Some(ch) = self.current_char() {
            if is_line_break(ch) {
                break;
            }
            self.state.pos += 1;
        }
        let end = self.state.pos;
        self.add_comment(CommentKind::Line, start, start + start_skip, end, end);
    }

    fn add_comment(&mut self, kind: CommentKind, start: usize, value_start: usize, value_end: usize, end: usize) {
        if self.is_lookahead {
            return;
        }
        let comment = Comment {
            kind,
            value: self.alloc_slice(value_start, value_end),
            span: self.span(start, end),
        };
        if self.options.tokens {
            self.tokens.push(TokenOrComment::Comment(comment));
        }
        self.comments.push(comment);
    }

    /// Read a token in an ordinary code context.
    pub(crate) fn read_token(&mut self) -> ScanResult<()> {
        let ch = self.text[self.state.pos];
        let features = self.options.features;

        if self.state.in_type {
            match ch {
                '<' => {
                    self.finish_op(TokenKind::Lt, 1);
                    return Ok(());
                }
                '>' => {
                    self.finish_op(TokenKind::Gt, 1);
                    return Ok(());
                }
                '?' if features.contains(LexerFeatures::FLOW) => {
                    if self.char_at(1) == Some('.') {
                        self.state.pos += 2;
                        self.finish_token(TokenKind::QuestionDot, TokenValue::None);
                    } else {
                        self.state.pos += 1;
                        self.finish_token(TokenKind::Question, TokenValue::None);
                    }
                    return Ok(());
                }
                _ => {}
            }
        }

        if ch == '<'
            && features.contains(LexerFeatures::JSX)
            && self.state.can_start_jsx
            && self.char_at(1) != Some('!')
        {
            self.state.pos += 1;
            self.finish_token(TokenKind::JsxTagStart, TokenValue::None);
            return Ok(());
        }
        if ch == '{' && self.char_at(1) == Some('|') && features.contains(LexerFeatures::FLOW) {
            self.finish_op(TokenKind::BraceBarL, 2);
            return Ok(());
        }
        if ch == '%' && self.char_at(1) == Some('%') && features.contains(LexerFeatures::PLACEHOLDERS) {
            self.finish_op(TokenKind::Placeholder, 2);
            return Ok(());
        }

        self.get_token_from_code(ch)
    }

    fn get_token_from_code(&mut self, ch: char) -> ScanResult<()> {
        match ch {
            '.' => self.read_token_dot(),
            '(' => self.finish_punct(TokenKind::ParenL),
            ')' => self.finish_punct(TokenKind::ParenR),
            ';' => self.finish_punct(TokenKind::Semi),
            ',' => self.finish_punct(TokenKind::Comma),
            '[' => self.finish_punct(TokenKind::BracketL),
            ']' => self.finish_punct(TokenKind::BracketR),
            '{' => self.finish_punct(TokenKind::BraceL),
            '}' => {
                if self.state.cur_context() == TokContext::Template {
                    self.read_template_token()
                } else {
                    self.finish_punct(TokenKind::BraceR)
                }
            }
            ':' => self.finish_punct(TokenKind::Colon),
            '?' => self.read_token_question(),
            '@' => self.finish_punct(TokenKind::At),
            '`' => self.read_template_token(),
            '0' => match self.char_at(1) {
                Some('x' | 'X') => self.read_radix_number(16),
                Some('o' | 'O') => self.read_radix_number(8),
                Some('b' | 'B') => self.read_radix_number(2),
                _ => self.read_number(false),
            },
            '1'..='9' => self.read_number(false),
            '"' | '\'' => self.read_string(ch),
            '/' => self.read_token_slash(),
            '%' | '*' => self.read_token_mult_modulo(ch),
            '|' | '&' => self.read_token_pipe_amp(ch),
            '^' => self.read_token_caret(),
            '+' | '-' => self.read_token_plus_min(ch),
            '<' => self.read_token_lt(),
            '>' => self.read_token_gt(),
            '=' | '!' => self.read_token_eq_excl(ch),
            '~' => {
                self.finish_op(TokenKind::Tilde, 1);
                Ok(())
            }
            '#' => self.read_token_number_sign(),
            '\\' => self.read_word(None),
            _ if is_identifier_start(ch) => self.read_word(Some(ch)),
            _ => Err(self.error_at(&messages::INVALID_OR_UNEXPECTED_TOKEN, self.state.pos, &[&ch.to_string()])),
        }
    }

    // ========================================================================
    // Token-specific scanning methods
    // ========================================================================

    fn finish_punct(&mut self, kind: TokenKind) -> ScanResult<()> {
        self.state.pos += 1;
        self.finish_token(kind, TokenValue::None);
        Ok(())
    }

    fn read_token_dot(&mut self) -> ScanResult<()> {
        let next = self.char_at(1);
        if next.map_or(false, is_digit) {
            return self.read_number(true);
        }
        if next == Some('.') && self.char_at(2) == Some('.') {
            self.state.pos += 3;
            self.finish_token(TokenKind::Ellipsis, TokenValue::None);
        } else {
            self.state.pos += 1;
            self.finish_token(TokenKind::Dot, TokenValue::None);
        }
        Ok(())
    }

    fn read_token_question(&mut self) -> ScanResult<()> {
        let next = self.char_at(1);
        let next2 = self.char_at(2);
        if next == Some('?') {
            if next2 == Some('=') {
                self.finish_op(TokenKind::Assign, 3);
            } else {
                self.finish_op(TokenKind::NullishCoalescing, 2);
            }
        } else if next == Some('.') && !next2.map_or(false, is_digit) {
            self.state.pos += 2;
            self.finish_token(TokenKind::QuestionDot, TokenValue::None);
        } else {
            self.state.pos += 1;
            self.finish_token(TokenKind::Question, TokenValue::None);
        }
        Ok(())
    }

    fn read_token_slash(&mut self) -> ScanResult<()> {
        if self.char_at(1) == Some('=') {
            self.finish_op(TokenKind::SlashAssign, 2);
        } else {
            self.finish_op(TokenKind::Slash, 1);
        }
        Ok(())
    }

    fn read_token_mult_modulo(&mut self, ch: char) -> ScanResult<()> {
        let mut kind = if ch == '*' { TokenKind::Star } else { TokenKind::Modulo };
        let mut width = 1;
        let mut next = self.char_at(1);
        if ch == '*' && next == Some('*') {
            width += 1;
            next = self.char_at(2);
            kind = TokenKind::Exponent;
        }
        if next == Some('=') && !self.state.in_type {
            width += 1;
            kind = TokenKind::Assign;
        }
        self.finish_op(kind, width);
        Ok(())
    }

    fn read_token_pipe_amp(&mut self, ch: char) -> ScanResult<()> {
        let next = self.char_at(1);
        if next == Some(ch) {
            if self.char_at(2) == Some('=') {
                self.finish_op(TokenKind::Assign, 3);
            } else if ch == '|' {
                self.finish_op(TokenKind::LogicalOr, 2);
            } else {
                self.finish_op(TokenKind::LogicalAnd, 2);
            }
            return Ok(());
        }
        if ch == '|' && next == Some('}') && self.options.features.contains(LexerFeatures::FLOW) {
            self.finish_op(TokenKind::BraceBarR, 2);
            return Ok(());
        }
        if next == Some('=') {
            self.finish_op(TokenKind::Assign, 2);
            return Ok(());
        }
        let kind = if ch == '|' { TokenKind::BitwiseOr } else { TokenKind::BitwiseAnd };
        self.finish_op(kind, 1);
        Ok(())
    }

    fn read_token_caret(&mut self) -> ScanResult<()> {
        if self.char_at(1) == Some('=') && !self.state.in_type {
            self.finish_op(TokenKind::Assign, 2);
        } else {
            self.finish_op(TokenKind::BitwiseXor, 1);
        }
        Ok(())
    }

    fn read_token_plus_min(&mut self, ch: char) -> ScanResult<()> {
        let next = self.char_at(1);
        if next == Some(ch) {
            self.finish_op(TokenKind::IncDec, 2);
        } else if next == Some('=') {
            self.finish_op(TokenKind::Assign, 2);
        } else {
            self.finish_op(TokenKind::PlusMin, 1);
        }
        Ok(())
    }

    fn read_token_lt(&mut self) -> ScanResult<()> {
        let next = self.char_at(1);
        if next == Some('<') {
            if self.char_at(2) == Some('=') {
                self.finish_op(TokenKind::Assign, 3);
            } else {
                self.finish_op(TokenKind::BitShiftL, 2);
            }
        } else if next == Some('=') {
            self.finish_op(TokenKind::Relational, 2);
        } else {
            self.finish_op(TokenKind::Lt, 1);
        }
        Ok(())
    }

    fn read_token_gt(&mut self) -> ScanResult<()> {
        let next = self.char_at(1);
        if next == Some('>') {
            let size = if self.char_at(2) == Some('>') { 3 } else { 2 };
            if self.char_at(size) == Some('=') {
                self.finish_op(TokenKind::Assign, size + 1);
            } else {
                self.finish_op(TokenKind::BitShiftR, size);
            }
        } else if next == Some('=') {
            self.finish_op(TokenKind::Relational, 2);
        } else {
            self.finish_op(TokenKind::Gt, 1);
        }
        Ok(())
    }

    fn read_token_eq_excl(&mut self, ch: char) -> ScanResult<()> {
        let next = self.char_at(1);
        if next == Some('=') {
            let size = if self.char_at(2) == Some('=') { 3 } else { 2 };
            self.finish_op(TokenKind::Equality, size);
        } else if ch == '=' && next == Some('>') {
            self.state.pos += 2;
            self.finish_token(TokenKind::Arrow, TokenValue::None);
        } else if ch == '=' {
            self.finish_op(TokenKind::Eq, 1);
        } else {
            self.finish_op(TokenKind::Bang, 1);
        }
        Ok(())
    }

    fn read_token_number_sign(&mut self) -> ScanResult<()> {
        if self.state.pos == 0 && self.char_at(1) == Some('!') {
            self.read_interpreter();
            return Ok(());
        }
        let next = self.char_at(1);
        match next {
            Some(c) if is_digit(c) => Err(self.error_at(&messages::UNEXPECTED_DIGIT_AFTER_HASH, self.state.pos + 1, &[])),
            Some(c) if is_identifier_start(c) => {
                self.state.pos += 1;
                let name = self.read_word1(Some(c))?;
                let name = self.alloc_str(&name);
                self.finish_token(TokenKind::PrivateName, TokenValue::Str(name));
                Ok(())
            }
            Some('\\') => {
                self.state.pos += 1;
                let name = self.read_word1(None)?;
                let name = self.alloc_str(&name);
                self.finish_token(TokenKind::PrivateName, TokenValue::Str(name));
                Ok(())
            }
            _ => self.finish_punct(TokenKind::Hash),
        }
    }

    /// `#!` on the very first line.
    fn read_interpreter(&mut self) {
        let start = self.state.pos;
        self.state.pos += 2;
        while let Some(ch) = self.current_char() {
            if is_line_break(ch) {
                break;
            }
            self.state.pos += 1;
        }
        let value = self.alloc_slice(start + 2, self.state.pos);
        self.finish_token(TokenKind::Interpreter, TokenValue::Str(value));
    }

    /// Re-read a `<<` token as a single `<`, for type arguments.
    pub fn rescan_lt(&mut self) -> TokenKind {
        if self.state.kind == TokenKind::BitShiftL {
            self.state.pos = self.state.start;
            self.finish_op(TokenKind::Lt, 1);
        }
        self.state.kind
    }

    /// Re-read a `<` or `>` read in type context as an ordinary operator.
    pub fn rescan_lt_gt(&mut self) -> ScanResult<TokenKind> {
        match self.state.kind {
            TokenKind::Lt => {
                self.state.pos = self.state.start;
                self.read_token_lt()?;
            }
            TokenKind::Gt => {
                self.state.pos = self.state.start;
                self.read_token_gt()?;
            }
            _ => {}
        }
        Ok(self.state.kind)
    }

    // ========================================================================
    // Regular expressions
    // ========================================================================

    /// Re-read the current `/` or `/=` token as a regular expression
    /// literal.
    pub fn read_regexp(&mut self) -> ScanResult<()> {
        let start = self.state.start + 1;
        let mut escaped = false;
        let mut in_class = false;
        let mut pos = self.state.pos;
        loop {
            let Some(&ch) = self.text.get(pos) else {
                return Err(self.error_at(&messages::UNTERMINATED_REGEXP, start, &[]));
            };
            if is_line_break(ch) {
                return Err(self.error_at(&messages::UNTERMINATED_REGEXP, start, &[]));
            }
            if escaped {
                escaped = false;
            } else {
                if ch == '[' {
                    in_class = true;
                } else if ch == ']' && in_class {
                    in_class = false;
                } else if ch == '/' && !in_class {
                    break;
                }
                escaped = ch == '\\';
            }
            pos += 1;
        }
        let pattern = self.alloc_slice(start, pos);
        pos += 1;

        let mut flags = String::new();
        while let Some(&ch) = self.text.get(pos) {
            if matches!(ch, 'd' | 'g' | 'i' | 'm' | 's' | 'u' | 'v' | 'y') {
                if (ch == 'v' && flags.contains('u')) || (ch == 'u' && flags.contains('v')) {
                    self.raise_at(&messages::INCOMPATIBLE_REGEXP_UV_FLAGS, pos + 1, &[])?;
                }
                if flags.contains(ch) {
                    self.raise_at(&messages::DUPLICATE_REGEXP_FLAGS, pos + 1, &[])?;
                }
            } else if is_identifier_char(ch) || ch == '\\' {
                self.raise_at(&messages::MALFORMED_REGEXP_FLAGS, pos + 1, &[])?;
            } else {
                break;
            }
            flags.push(ch);
            pos += 1;
        }
        self.state.pos = pos;
        let flags = self.alloc_str(&flags);
        self.finish_token(TokenKind::Regexp, TokenValue::Regex { pattern, flags });
        Ok(())
    }

    // ========================================================================
    // Numbers
    // ========================================================================

    /// Read digits in `radix`. `len` forces an exact digit count for escape
    /// sequences. Returns `None` when no valid digits were read.
    fn read_int(
        &mut self,
        radix: u32,
        len: Option<usize>,
        force_len: bool,
        allow_separator: bool,
        bail_on_error: bool,
    ) -> ScanResult<Option<f64>> {
        let start = self.state.pos;
        let limit = len.unwrap_or(usize::MAX);
        let mut invalid = false;
        let mut total = 0f64;
        let mut i = 0;
        while i < limit {
            let ch = self.current_char();
            if ch == Some('_') {
                let pos = self.state.pos;
                let prev = if pos > 0 { self.text.get(pos - 1).copied() } else { None };
                let next = self.char_at(1);
                if !allow_separator {
                    if bail_on_error {
                        return Ok(None);
                    }
                    self.raise_at(&messages::NUMERIC_SEPARATOR_IN_ESCAPE_SEQUENCE, pos, &[])?;
                } else if next.map_or(true, |c| {
                    !is_allowed_separator_sibling(radix, c) || is_forbidden_separator_sibling(radix, c)
                }) || prev.map_or(false, |c| is_forbidden_separator_sibling(radix, c))
                {
                    if bail_on_error {
                        return Ok(None);
                    }
                    self.raise_at(&messages::UNEXPECTED_NUMERIC_SEPARATOR, pos, &[])?;
                }
                self.state.pos += 1;
                i += 1;
                continue;
            }

            let mut val = ch.map_or(u32::MAX, digit_value);
            if val >= radix {
                if val <= 9 && bail_on_error {
                    return Ok(None);
                } else if val <= 9 && self.invalid_digit(radix)? {
                    val = 0;
                } else if force_len {
                    val = 0;
                    invalid = true;
                } else {
                    break;
                }
            }
            self.state.pos += 1;
            total = total * radix as f64 + val as f64;
            i += 1;
        }
        let read = self.state.pos - start;
        if read == 0 || len.map_or(false, |l| read != l) || invalid {
            return Ok(None);
        }
        Ok(Some(total))
    }

    /// A digit too large for the radix. In recovery mode it is reported and
    /// read as zero.
    fn invalid_digit(&mut self, radix: u32) -> ScanResult<bool> {
        if !self.options.error_recovery {
            return Ok(false);
        }
        self.raise_at(&messages::INVALID_DIGIT, self.state.pos, &[&radix.to_string()])?;
        Ok(true)
    }

    fn read_radix_number(&mut self, radix: u32) -> ScanResult<()> {
        let start = self.state.pos;
        self.state.pos += 2;
        let value = self.read_int(radix, None, false, true, false)?;
        if value.is_none() {
            self.raise_at(&messages::INVALID_DIGIT, start + 2, &[&radix.to_string()])?;
        }
        let mut is_bigint = false;
        if self.current_char() == Some('n') {
            self.state.pos += 1;
            is_bigint = true;
        }
        if self.current_char().map_or(false, is_identifier_start) {
            return Err(self.error_at(&messages::NUMBER_IDENTIFIER, self.state.pos, &[]));
        }
        if is_bigint {
            let digits: String = self.text[start..self.state.pos].iter().filter(|&&c| c != '_' && c != 'n').collect();
            let digits = self.alloc_str(&digits);
            self.finish_token(TokenKind::BigInt, TokenValue::BigInt(digits));
            return Ok(());
        }
        self.finish_token(TokenKind::Num, TokenValue::Number(value.unwrap_or(f64::NAN)));
        Ok(())
    }

    fn read_number(&mut self, starts_with_dot: bool) -> ScanResult<()> {
        let start = self.state.pos;
        let mut is_float = false;
        let mut is_octal = false;
        if !starts_with_dot && self.read_int(10, None, false, true, false)?.is_none() {
            self.raise_at(&messages::INVALID_NUMBER, self.state.pos, &[])?;
        }
        let has_leading_zero = self.state.pos - start >= 2 && self.text[start] == '0';
        if has_leading_zero {
            let integer = &self.text[start..self.state.pos];
            let underscore = integer.iter().position(|&c| c == '_');
            let has_decimal_digit = integer.iter().any(|&c| c == '8' || c == '9');
            self.record_strict_mode_error(&messages::STRICT_OCTAL_LITERAL, start)?;
            if !self.state.strict {
                if let Some(offset) = underscore.filter(|&o| o > 0) {
                    self.raise_at(&messages::ZERO_DIGIT_NUMERIC_SEPARATOR, start + offset, &[])?;
                }
            }
            is_octal = !has_decimal_digit;
        }

        let mut next = self.current_char();
        if next == Some('.') && !is_octal {
            self.state.pos += 1;
            self.read_int(10, None, false, true, false)?;
            is_float = true;
            next = self.current_char();
        }
        if matches!(next, Some('e' | 'E')) && !is_octal {
            self.state.pos += 1;
            if matches!(self.current_char(), Some('+' | '-')) {
                self.state.pos += 1;
            }
            if self.read_int(10, None, false, true, false)?.is_none() {
                self.raise_at(&messages::INVALID_OR_MISSING_EXPONENT, start, &[])?;
            }
            is_float = true;
            next = self.current_char();
        }
        let mut is_bigint = false;
        if next == Some('n') {
            if is_float || has_leading_zero {
                self.raise_at(&messages::INVALID_BIGINT_LITERAL, start, &[])?;
            }
            self.state.pos += 1;
            is_bigint = true;
        }
        if self.current_char().map_or(false, is_identifier_start) {
            return Err(self.error_at(&messages::NUMBER_IDENTIFIER, self.state.pos, &[]));
        }

        let digits: String = self.text[start..self.state.pos].iter().filter(|&&c| c != '_' && c != 'n').collect();
        if is_bigint {
            let digits = self.alloc_str(&digits);
            self.finish_token(TokenKind::BigInt, TokenValue::BigInt(digits));
            return Ok(());
        }
        let value = if is_octal {
            digits.chars().fold(0f64, |acc, c| acc * 8.0 + c.to_digit(8).unwrap_or(0) as f64)
        } else {
            parse_float(&digits)
        };
        self.finish_token(TokenKind::Num, TokenValue::Number(value));
        Ok(())
    }

    // ========================================================================
    // Strings and templates
    // ========================================================================

    fn read_string(&mut self, quote: char) -> ScanResult<()> {
        self.state.pos += 1;
        let contents = self.read_string_contents(StringKind::Quoted(quote))?;
        self.state.pos += 1;
        let value = self.alloc_str(&contents.cooked);
        self.finish_token(TokenKind::String, TokenValue::Str(value));
        Ok(())
    }

    /// Read a template chunk starting at a backquote or at the `}` closing a
    /// substitution. The token spans both delimiters.
    fn read_template_token(&mut self) -> ScanResult<()> {
        self.state.pos += 1;
        let raw_start = self.state.pos;
        let contents = self.read_string_contents(StringKind::Template)?;
        let raw_end = self.state.pos;
        self.state.first_invalid_template_escape = contents.first_invalid;

        let raw = normalize_line_endings(&self.text[raw_start..raw_end]);
        let raw = self.alloc_str(&raw);
        let cooked = match contents.first_invalid {
            Some(_) => None,
            None => Some(self.alloc_str(&contents.cooked)),
        };
        if self.current_char() == Some('`') {
            self.state.pos += 1;
            self.finish_token(TokenKind::TemplateTail, TokenValue::Template { raw, cooked });
        } else {
            self.state.pos += 2;
            self.finish_token(TokenKind::TemplateNonTail, TokenValue::Template { raw, cooked });
        }
        Ok(())
    }

    fn read_string_contents(&mut self, kind: StringKind) -> ScanResult<StringContents> {
        let initial = self.state.pos;
        let in_template = kind == StringKind::Template;
        let mut out = String::new();
        let mut first_invalid = None;
        loop {
            let Some(ch) = self.current_char() else {
                return Err(self.unterminated(kind, initial));
            };
            let at_end = match kind {
                StringKind::Quoted(quote) => ch == quote,
                StringKind::Template => ch == '`' || (ch == '$' && self.char_at(1) == Some('{')),
            };
            if at_end {
                break;
            }
            match ch {
                '\\' => {
                    let escape_start = self.state.pos;
                    match self.read_escaped_char(in_template)? {
                        Escape::Char(c) => out.push(c),
                        Escape::Empty => {}
                        Escape::Invalid => {
                            if first_invalid.is_none() {
                                first_invalid = Some(escape_start);
                            }
                        }
                    }
                }
                '\n' | '\r' => {
                    if !in_template {
                        return Err(self.unterminated(kind, initial));
                    }
                    out.push('\n');
                    self.state.pos += 1;
                    if ch == '\r' && self.current_char() == Some('\n') {
                        self.state.pos += 1;
                    }
                }
                _ => {
                    out.push(ch);
                    self.state.pos += 1;
                }
            }
        }
        Ok(StringContents { cooked: out, first_invalid })
    }

    fn unterminated(&self, kind: StringKind, initial: usize) -> Diagnostic {
        let message = match kind {
            StringKind::Quoted(_) => &messages::UNTERMINATED_STRING,
            StringKind::Template => &messages::UNTERMINATED_TEMPLATE,
        };
        self.error_at(message, initial.saturating_sub(1), &[])
    }

    fn read_escaped_char(&mut self, in_template: bool) -> ScanResult<Escape> {
        let throw_on_invalid = !in_template;
        self.state.pos += 1;
        let Some(ch) = self.current_char() else {
            return Ok(Escape::Empty);
        };
        self.state.pos += 1;
        let escape = match ch {
            'n' => Escape::Char('\n'),
            'r' => Escape::Char('\r'),
            't' => Escape::Char('\t'),
            'b' => Escape::Char('\u{0008}'),
            'v' => Escape::Char('\u{000B}'),
            'f' => Escape::Char('\u{000C}'),
            'x' => match self.read_hex_char(2, false, throw_on_invalid)? {
                Some(code) => Escape::Char(char::from_u32(code).unwrap_or(char::REPLACEMENT_CHARACTER)),
                None => Escape::Invalid,
            },
            'u' => match self.read_code_point(throw_on_invalid)? {
                Some(code) => Escape::Char(self.code_point_to_char(code)?),
                None => Escape::Invalid,
            },
            '\r' => {
                if self.current_char() == Some('\n') {
                    self.state.pos += 1;
                }
                Escape::Empty
            }
            '\n' | '\u{2028}' | '\u{2029}' => Escape::Empty,
            '8' | '9' => {
                if in_template {
                    return Ok(Escape::Invalid);
                }
                self.record_strict_mode_error(&messages::STRICT_NUMERIC_ESCAPE, self.state.pos - 1)?;
                Escape::Char(ch)
            }
            '0'..='7' => {
                let start = self.state.pos - 1;
                let mut len = 1;
                while len < 3 && self.text.get(start + len).map_or(false, |&c| is_octal_digit(c)) {
                    len += 1;
                }
                let mut octal = octal_value(&self.text[start..start + len]);
                if octal > 255 {
                    len -= 1;
                    octal = octal_value(&self.text[start..start + len]);
                }
                self.state.pos = start + len;
                let next = self.current_char();
                if len > 1 || ch != '0' || matches!(next, Some('8' | '9')) {
                    if in_template {
                        return Ok(Escape::Invalid);
                    }
                    self.record_strict_mode_error(&messages::STRICT_NUMERIC_ESCAPE, start)?;
                }
                Escape::Char(char::from_u32(octal).unwrap_or(char::REPLACEMENT_CHARACTER))
            }
            other => Escape::Char(other),
        };
        Ok(escape)
    }

    /// Combine a high surrogate with a following `\uXXXX` low surrogate.
    /// Unpaired surrogates become U+FFFD.
    fn code_point_to_char(&mut self, code: u32) -> ScanResult<char> {
        if (0xD800..=0xDBFF).contains(&code)
            && self.current_char() == Some('\\')
            && self.char_at(1) == Some('u')
            && (2..6).all(|i| self.char_at(i).map_or(false, is_hex_digit))
        {
            let low: String = (2..6).filter_map(|i| self.char_at(i)).collect();
            if let Ok(low) = u32::from_str_radix(&low, 16) {
                if (0xDC00..=0xDFFF).contains(&low) {
                    self.state.pos += 6;
                    let combined = 0x10000 + ((code - 0xD800) << 10) + (low - 0xDC00);
                    return Ok(char::from_u32(combined).unwrap_or(char::REPLACEMENT_CHARACTER));
                }
            }
        }
        Ok(char::from_u32(code).unwrap_or(char::REPLACEMENT_CHARACTER))
    }

    fn read_hex_char(&mut self, len: usize, force_len: bool, throw_on_invalid: bool) -> ScanResult<Option<u32>> {
        let initial = self.state.pos;
        let n = self.read_int(16, Some(len), force_len, false, !throw_on_invalid)?;
        match n {
            Some(value) => Ok(Some(value as u32)),
            None => {
                if throw_on_invalid {
                    self.raise_at(&messages::INVALID_ESCAPE_SEQUENCE, initial, &[])?;
                } else {
                    self.state.pos = initial - 1;
                }
                Ok(None)
            }
        }
    }

    /// Read the body of a `\u` escape: `XXXX` or `{X...}`.
    fn read_code_point(&mut self, throw_on_invalid: bool) -> ScanResult<Option<u32>> {
        if self.current_char() != Some('{') {
            return self.read_hex_char(4, false, throw_on_invalid);
        }
        self.state.pos += 1;
        let len = self.text[self.state.pos..]
            .iter()
            .position(|&c| c == '}')
            .unwrap_or(0);
        let code = self.read_hex_char(len, true, throw_on_invalid)?;
        self.state.pos += 1;
        match code {
            Some(c) if c > 0x10FFFF => {
                if throw_on_invalid {
                    self.raise_at(&messages::INVALID_CODE_POINT, self.state.pos, &[])?;
                    Ok(Some(char::REPLACEMENT_CHARACTER as u32))
                } else {
                    Ok(None)
                }
            }
            other => Ok(other),
        }
    }

    // ========================================================================
    // Identifiers and keywords
    // ========================================================================

    /// Read an identifier, decoding `\u` escapes. `first` is an already
    /// validated first character at the current position.
    fn read_word1(&mut self, first: Option<char>) -> ScanResult<String> {
        self.state.contains_esc = false;
        let mut word = String::new();
        let start = self.state.pos;
        if let Some(ch) = first {
            word.push(ch);
            self.state.pos += 1;
        }
        while let Some(ch) = self.current_char() {
            if is_identifier_char(ch) {
                word.push(ch);
                self.state.pos += 1;
            } else if ch == '\\' {
                self.state.contains_esc = true;
                let escape_start = self.state.pos;
                let at_start = self.state.pos == start;
                self.state.pos += 1;
                if self.current_char() != Some('u') {
                    self.raise_at(&messages::MISSING_UNICODE_ESCAPE, self.state.pos, &[])?;
                    continue;
                }
                self.state.pos += 1;
                if let Some(code) = self.read_code_point(true)? {
                    let valid = char::from_u32(code).filter(|&c| {
                        if at_start {
                            is_identifier_start(c)
                        } else {
                            is_identifier_char(c)
                        }
                    });
                    match valid {
                        Some(c) => word.push(c),
                        None => {
                            self.raise_at(&messages::ESCAPED_CHAR_NOT_AN_IDENTIFIER, escape_start, &[])?;
                            word.push(char::from_u32(code).unwrap_or(char::REPLACEMENT_CHARACTER));
                        }
                    }
                }
            } else {
                break;
            }
        }
        Ok(word)
    }

    fn read_word(&mut self, first: Option<char>) -> ScanResult<()> {
        let word = self.read_word1(first)?;
        match TokenKind::from_keyword(&word) {
            Some(kind) => self.finish_token(kind, TokenValue::Str(kind.label())),
            None => {
                let name = self.alloc_str(&word);
                self.finish_token(TokenKind::Name, TokenValue::Str(name));
            }
        }
        Ok(())
    }

    /// Position helpers for the JSX reader.
    #[inline]
    pub(crate) fn pos(&self) -> usize {
        self.state.pos
    }

    #[inline]
    pub(crate) fn set_pos(&mut self, pos: usize) {
        self.state.pos = pos;
    }

    #[inline]
    pub(crate) fn peek(&self, offset: usize) -> Option<char> {
        self.char_at(offset)
    }

    #[inline]
    pub(crate) fn finish(&mut self, kind: TokenKind, value: TokenValue<'a>) {
        self.finish_token(kind, value);
    }
}

fn digit_value(ch: char) -> u32 {
    match ch {
        '0'..='9' => ch as u32 - '0' as u32,
        'a'..='z' => ch as u32 - 'a' as u32 + 10,
        'A'..='Z' => ch as u32 - 'A' as u32 + 10,
        _ => u32::MAX,
    }
}

fn octal_value(digits: &[char]) -> u32 {
    digits.iter().fold(0, |acc, c| acc * 8 + c.to_digit(8).unwrap_or(0))
}

/// Parse a decimal literal with separators already removed.
fn parse_float(digits: &str) -> f64 {
    if let Ok(value) = digits.parse::<f64>() {
        return value;
    }
    // Forms like `1.e5` that the standard parser rejects.
    let normalized = digits.replace(".e", ".0e").replace(".E", ".0E");
    normalized.parse::<f64>().unwrap_or(f64::NAN)
}

/// Turn `\r\n` and lone `\r` into `\n`.
fn normalize_line_endings(chars: &[char]) -> String {
    let mut out = String::with_capacity(chars.len());
    let mut i = 0;
    while i < chars.len() {
        if chars[i] == '\r' {
            out.push('\n');
            if chars.get(i + 1) == Some(&'\n') {
                i += 1;
            }
        } else {
            out.push(chars[i]);
        }
        i += 1;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options() -> ScannerOptions {
        ScannerOptions::default()
    }

    fn scan_kinds(source: &str, options: ScannerOptions) -> Vec<TokenKind> {
        let arena = Bump::new();
        let mut scanner = Scanner::new(&arena, source, options);
        scanner.next_token().unwrap();
        let mut kinds = Vec::new();
        while scanner.token() != TokenKind::Eof {
            kinds.push(scanner.token());
            scanner.next().unwrap();
        }
        kinds
    }

    fn first_value<'a>(arena: &'a Bump, source: &str) -> TokenValue<'a> {
        let mut scanner = Scanner::new(arena, source, options());
        scanner.next_token().unwrap();
        scanner.token_value()
    }

    fn first_error(source: &str) -> Diagnostic {
        let arena = Bump::new();
        let mut scanner = Scanner::new(&arena, source, options());
        let mut result = scanner.next_token();
        while result.is_ok() && scanner.token() != TokenKind::Eof {
            result = scanner.next();
        }
        result.unwrap_err()
    }

    #[test]
    fn test_scan_simple_tokens() {
        use TokenKind::*;
        assert_eq!(
            scan_kinds("( ) { } [ ] ; , : ? ?. ... @ #", options()),
            vec![ParenL, ParenR, BraceL, BraceR, BracketL, BracketR, Semi, Comma, Colon, Question, QuestionDot, Ellipsis, At, Hash]
        );
    }

    #[test]
    fn test_scan_operators() {
        use TokenKind::*;
        assert_eq!(
            scan_kinds("+ ++ += - -- * ** *= **= / /= % %= === !== == != = => !", options()),
            vec![
                PlusMin, IncDec, Assign, PlusMin, IncDec, Star, Exponent, Assign, Assign, Slash, SlashAssign, Modulo,
                Assign, Equality, Equality, Equality, Equality, Eq, Arrow, Bang
            ]
        );
        assert_eq!(
            scan_kinds("< << <<= <= > >> >>> >>= >>>= >=", options()),
            vec![Lt, BitShiftL, Assign, Relational, Gt, BitShiftR, BitShiftR, Assign, Assign, Relational]
        );
        assert_eq!(
            scan_kinds("| || ||= & && &&= ^ ^= ?? ??= ~", options()),
            vec![BitwiseOr, LogicalOr, Assign, BitwiseAnd, LogicalAnd, Assign, BitwiseXor, Assign, NullishCoalescing, Assign, Tilde]
        );
    }

    #[test]
    fn test_scan_optional_chaining_before_digit() {
        use TokenKind::*;
        assert_eq!(scan_kinds("a?.5:b", options()), vec![Name, Question, Num, Colon, Name]);
    }

    #[test]
    fn test_scan_identifier_and_keyword() {
        let arena = Bump::new();
        let mut scanner = Scanner::new(&arena, "let x = typeof y;", options());
        scanner.next_token().unwrap();
        assert_eq!(scanner.token(), TokenKind::Name);
        assert_eq!(scanner.token_value().as_str(), Some("let"));
        scanner.next().unwrap();
        assert_eq!(scanner.token_value().as_str(), Some("x"));
        scanner.next().unwrap();
        assert_eq!(scanner.token(), TokenKind::Eq);
        scanner.next().unwrap();
        assert_eq!(scanner.token(), TokenKind::Typeof);
    }

    #[test]
    fn test_scan_escaped_identifier() {
        let arena = Bump::new();
        let mut scanner = Scanner::new(&arena, "\\u0061bc \\u{62}", options());
        scanner.next_token().unwrap();
        assert_eq!(scanner.token_value().as_str(), Some("abc"));
        assert!(scanner.contains_esc());
        scanner.next().unwrap();
        assert_eq!(scanner.token_value().as_str(), Some("b"));
    }

    #[test]
    fn test_scan_escaped_keyword_is_an_error() {
        let diag = first_error("\\u0069f");
        assert!(diag.is(&messages::INVALID_ESCAPED_RESERVED_WORD));
        assert_eq!(diag.args, vec!["if".to_string()]);
    }

    #[test]
    fn test_scan_number_formats() {
        let arena = Bump::new();
        assert_eq!(first_value(&arena, "42"), TokenValue::Number(42.0));
        assert_eq!(first_value(&arena, "1_000"), TokenValue::Number(1000.0));
        assert_eq!(first_value(&arena, ".5"), TokenValue::Number(0.5));
        assert_eq!(first_value(&arena, "1.5e3"), TokenValue::Number(1500.0));
        assert_eq!(first_value(&arena, "0xff"), TokenValue::Number(255.0));
        assert_eq!(first_value(&arena, "0o17"), TokenValue::Number(15.0));
        assert_eq!(first_value(&arena, "0b101"), TokenValue::Number(5.0));
        assert_eq!(first_value(&arena, "017"), TokenValue::Number(15.0));
        assert_eq!(first_value(&arena, "089"), TokenValue::Number(89.0));
        assert_eq!(first_value(&arena, "5."), TokenValue::Number(5.0));
    }

    #[test]
    fn test_scan_bigint() {
        let arena = Bump::new();
        assert_eq!(first_value(&arena, "123n"), TokenValue::BigInt("123"));
        assert_eq!(first_value(&arena, "0xFFn"), TokenValue::BigInt("0xFF"));
        assert_eq!(first_value(&arena, "1_0n"), TokenValue::BigInt("10"));
    }

    #[test]
    fn test_scan_number_errors() {
        assert!(first_error("1_").is(&messages::UNEXPECTED_NUMERIC_SEPARATOR));
        assert!(first_error("1__0").is(&messages::UNEXPECTED_NUMERIC_SEPARATOR));
        assert!(first_error("0x_1").is(&messages::UNEXPECTED_NUMERIC_SEPARATOR));
        assert!(first_error("1.5n").is(&messages::INVALID_BIGINT_LITERAL));
        assert!(first_error("3in x").is(&messages::NUMBER_IDENTIFIER));
        assert!(first_error("0b2").is(&messages::INVALID_DIGIT));
        assert!(first_error("1e").is(&messages::INVALID_OR_MISSING_EXPONENT));
    }

    #[test]
    fn test_scan_string_literal() {
        let arena = Bump::new();
        assert_eq!(first_value(&arena, r#""hello""#), TokenValue::Str("hello"));
        assert_eq!(first_value(&arena, r"'a\nb'"), TokenValue::Str("a\nb"));
        assert_eq!(first_value(&arena, r"'\x41B\u{43}'"), TokenValue::Str("ABC"));
        assert_eq!(first_value(&arena, "'a\\\nb'"), TokenValue::Str("ab"));
        assert_eq!(first_value(&arena, r"'😀'"), TokenValue::Str("\u{1F600}"));
        assert_eq!(first_value(&arena, r"'\uD800'"), TokenValue::Str("\u{FFFD}"));
        assert_eq!(first_value(&arena, r"'\0'"), TokenValue::Str("\0"));
    }

    #[test]
    fn test_scan_unterminated_string() {
        let diag = first_error("'abc");
        assert!(diag.is(&messages::UNTERMINATED_STRING));
        assert_eq!(diag.loc.index, 0);
        assert!(first_error("'a\nb'").is(&messages::UNTERMINATED_STRING));
    }

    #[test]
    fn test_octal_escape_is_deferred_until_strict() {
        let arena = Bump::new();
        let mut scanner = Scanner::new(&arena, r"'\07'", options());
        scanner.next_token().unwrap();
        assert_eq!(scanner.token_value(), TokenValue::Str("\u{7}"));
        let diag = scanner.set_strict(true).unwrap_err();
        assert!(diag.is(&messages::STRICT_NUMERIC_ESCAPE));
    }

    #[test]
    fn test_scan_template_literal() {
        let arena = Bump::new();
        let mut scanner = Scanner::new(&arena, "`a${b}c${ {d} }e`", options());
        scanner.next_token().unwrap();
        assert_eq!(scanner.token(), TokenKind::TemplateNonTail);
        assert_eq!(scanner.token_value(), TokenValue::Template { raw: "a", cooked: Some("a") });
        scanner.next().unwrap();
        assert_eq!(scanner.token(), TokenKind::Name);
        scanner.next().unwrap();
        assert_eq!(scanner.token(), TokenKind::TemplateNonTail);
        assert_eq!(scanner.token_start(), 5);
        scanner.next().unwrap();
        assert_eq!(scanner.token(), TokenKind::BraceL);
        scanner.next().unwrap();
        scanner.next().unwrap();
        assert_eq!(scanner.token(), TokenKind::BraceR);
        scanner.next().unwrap();
        assert_eq!(scanner.token(), TokenKind::TemplateTail);
        assert_eq!(scanner.token_value(), TokenValue::Template { raw: "e", cooked: Some("e") });
        scanner.next().unwrap();
        assert_eq!(scanner.token(), TokenKind::Eof);
        assert_eq!(scanner.cur_context(), TokContext::Brace);
    }

    #[test]
    fn test_template_invalid_escape_has_no_cooked_value() {
        let arena = Bump::new();
        let mut scanner = Scanner::new(&arena, r"`\unicode and \u{55}`", options());
        scanner.next_token().unwrap();
        assert_eq!(
            scanner.token_value(),
            TokenValue::Template { raw: r"\unicode and \u{55}", cooked: None }
        );
        assert_eq!(scanner.first_invalid_template_escape(), Some(1));
    }

    #[test]
    fn test_template_chunk_after_substitution_resumes() {
        let arena = Bump::new();
        let mut scanner = Scanner::new(&arena, "`a${b}c`", options());
        scanner.next_token().unwrap();
        assert_eq!(scanner.token(), TokenKind::TemplateNonTail);
        assert!(!scanner.token_resumes_template());
        scanner.next().unwrap();
        assert_eq!(scanner.token(), TokenKind::Name);
        assert!(!scanner.token_resumes_template());
        scanner.next().unwrap();
        assert_eq!(scanner.token(), TokenKind::TemplateTail);
        assert!(scanner.token_resumes_template());
    }

    #[test]
    fn test_template_raw_normalizes_crlf() {
        let arena = Bump::new();
        assert_eq!(
            first_value(&arena, "`a\r\nb`"),
            TokenValue::Template { raw: "a\nb", cooked: Some("a\nb") }
        );
    }

    #[test]
    fn test_scan_regexp() {
        let arena = Bump::new();
        let mut scanner = Scanner::new(&arena, "/[/]a\\/b/gi", options());
        scanner.next_token().unwrap();
        assert_eq!(scanner.token(), TokenKind::Slash);
        scanner.read_regexp().unwrap();
        assert_eq!(scanner.token(), TokenKind::Regexp);
        assert_eq!(scanner.token_value(), TokenValue::Regex { pattern: "[/]a\\/b", flags: "gi" });
        assert_eq!(scanner.token_end(), 11);
    }

    #[test]
    fn test_regexp_flag_errors() {
        let arena = Bump::new();
        let recovering = ScannerOptions { error_recovery: true, ..options() };
        let mut scanner = Scanner::new(&arena, "/a/gg", recovering);
        scanner.next_token().unwrap();
        scanner.read_regexp().unwrap();
        assert!(scanner.errors()[0].is(&messages::DUPLICATE_REGEXP_FLAGS));

        let mut scanner = Scanner::new(&arena, "/a/uv", recovering);
        scanner.next_token().unwrap();
        scanner.read_regexp().unwrap();
        assert!(scanner.errors()[0].is(&messages::INCOMPATIBLE_REGEXP_UV_FLAGS));

        let mut scanner = Scanner::new(&arena, "/a\n/", options());
        scanner.next_token().unwrap();
        assert!(scanner.read_regexp().unwrap_err().is(&messages::UNTERMINATED_REGEXP));
    }

    #[test]
    fn test_scan_comments() {
        let arena = Bump::new();
        let mut scanner = Scanner::new(&arena, "/* block */ a // line\nb", options());
        scanner.next_token().unwrap();
        scanner.next().unwrap();
        assert!(scanner.has_preceding_line_break());
        let comments = scanner.comments();
        assert_eq!(comments.len(), 2);
        assert_eq!(comments[0].kind, CommentKind::Block);
        assert_eq!(comments[0].value, " block ");
        assert_eq!(comments[1].kind, CommentKind::Line);
        assert_eq!(comments[1].value, " line");
        assert_eq!(comments[1].span.start.index, 14);
    }

    #[test]
    fn test_unterminated_comment_is_fatal() {
        assert!(first_error("a /* b").is(&messages::UNTERMINATED_COMMENT));
    }

    #[test]
    fn test_html_comments_only_in_scripts() {
        use TokenKind::*;
        assert_eq!(scan_kinds("a <!-- b\n--> c\nd", options()), vec![Name, Name]);
        let module = ScannerOptions { module: true, ..options() };
        assert_eq!(scan_kinds("a <!-- b", module), vec![Name, Lt, Bang, IncDec, Name]);
    }

    #[test]
    fn test_shebang() {
        let arena = Bump::new();
        let mut scanner = Scanner::new(&arena, "#!/usr/bin/env node\nlet x", options());
        scanner.next_token().unwrap();
        assert_eq!(scanner.token(), TokenKind::Interpreter);
        assert_eq!(scanner.token_value(), TokenValue::Str("/usr/bin/env node"));
        scanner.next().unwrap();
        assert_eq!(scanner.token_value().as_str(), Some("let"));
    }

    #[test]
    fn test_private_name_and_hash_digit() {
        let arena = Bump::new();
        let mut scanner = Scanner::new(&arena, "#field", options());
        scanner.next_token().unwrap();
        assert_eq!(scanner.token(), TokenKind::PrivateName);
        assert_eq!(scanner.token_value(), TokenValue::Str("field"));
        assert!(first_error("#1").is(&messages::UNEXPECTED_DIGIT_AFTER_HASH));
    }

    #[test]
    fn test_unexpected_character() {
        let diag = first_error("a ¬ b");
        assert!(diag.is(&messages::INVALID_OR_UNEXPECTED_TOKEN));
        assert_eq!(diag.loc.column, 2);
    }

    #[test]
    fn test_lookahead_does_not_move() {
        let arena = Bump::new();
        let mut scanner = Scanner::new(&arena, "a /* c */\n b", options());
        scanner.next_token().unwrap();
        let next = scanner.lookahead().unwrap();
        assert_eq!(next.kind, TokenKind::Name);
        assert_eq!(next.value.as_str(), Some("b"));
        assert!(next.has_line_break_before);
        assert_eq!(scanner.token_value().as_str(), Some("a"));
        assert!(scanner.comments().is_empty());
        assert_eq!(scanner.next_token_start(), 11);
        assert_eq!(scanner.lookahead_char(), Some('b'));
        assert_eq!(scanner.lookahead_in_line_char(), Some('\n'));
    }

    #[test]
    fn test_checkpoint_restore_truncates_errors() {
        let arena = Bump::new();
        let recovering = ScannerOptions { error_recovery: true, ..options() };
        let mut scanner = Scanner::new(&arena, "a 1_ b", recovering);
        scanner.next_token().unwrap();
        let checkpoint = scanner.checkpoint();
        scanner.next().unwrap();
        assert_eq!(scanner.error_count(), 1);
        scanner.restore(checkpoint);
        assert_eq!(scanner.error_count(), 0);
        assert_eq!(scanner.token_value().as_str(), Some("a"));
    }

    #[test]
    fn test_raise_overwrite_replaces_same_offset() {
        let arena = Bump::new();
        let recovering = ScannerOptions { error_recovery: true, ..options() };
        let mut scanner = Scanner::new(&arena, "abc", recovering);
        scanner.raise_at(&messages::UNEXPECTED_TOKEN, 1, &[]).unwrap();
        let replacement = scanner.error_at(&messages::MISSING_SEMICOLON, 1, &[]);
        scanner.raise_overwrite(replacement).unwrap();
        assert_eq!(scanner.errors().len(), 1);
        assert!(scanner.errors()[0].is(&messages::MISSING_SEMICOLON));
    }

    #[test]
    fn test_in_type_splits_angle_brackets() {
        let arena = Bump::new();
        let mut scanner = Scanner::new(&arena, "a>>b", options());
        scanner.next_token().unwrap();
        scanner.set_in_type(true);
        scanner.next().unwrap();
        assert_eq!(scanner.token(), TokenKind::Gt);
        scanner.next().unwrap();
        assert_eq!(scanner.token(), TokenKind::Gt);
        scanner.set_in_type(false);
        assert_eq!(scanner.rescan_lt_gt().unwrap(), TokenKind::Gt);
    }

    #[test]
    fn test_rescan_lt() {
        let arena = Bump::new();
        let mut scanner = Scanner::new(&arena, "<<T>", options());
        scanner.next_token().unwrap();
        assert_eq!(scanner.token(), TokenKind::BitShiftL);
        assert_eq!(scanner.rescan_lt(), TokenKind::Lt);
        assert_eq!(scanner.token_end(), 1);
        scanner.next().unwrap();
        assert_eq!(scanner.token(), TokenKind::Lt);
    }

    #[test]
    fn test_positions_honor_start_line() {
        let arena = Bump::new();
        let shifted = ScannerOptions { start_line: 10, start_column: 4, ..options() };
        let mut scanner = Scanner::new(&arena, "a\n b", shifted);
        scanner.next_token().unwrap();
        assert_eq!(scanner.start_loc(), Position::new(10, 4, 0));
        scanner.next().unwrap();
        assert_eq!(scanner.start_loc(), Position::new(11, 1, 3));
    }
}
