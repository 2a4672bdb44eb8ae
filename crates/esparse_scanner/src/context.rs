//! Lexical contexts and lexer feature flags.

use bitflags::bitflags;

/// An entry of the scanner's context stack.
///
/// The top of the stack decides how the next code point is read: as
/// ordinary tokens, as JSX tag contents, or as JSX child text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokContext {
    /// A `{` block, object literal or expression container.
    Brace,
    /// A `${` template substitution. Its closing `}` resumes the template.
    Template,
    /// Inside `<tag ...`.
    JsxOpenTag,
    /// Inside `</tag ...`.
    JsxCloseTag,
    /// Between the tags of an element, where text is read verbatim.
    JsxExpression,
}

impl TokContext {
    /// Contexts in which whitespace belongs to the next token.
    #[inline]
    pub fn preserves_space(self) -> bool {
        matches!(self, TokContext::JsxExpression)
    }

    #[inline]
    pub fn is_jsx_tag(self) -> bool {
        matches!(self, TokContext::JsxOpenTag | TokContext::JsxCloseTag)
    }
}

bitflags! {
    /// Token-level behaviour contributed by the enabled overlays.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct LexerFeatures: u8 {
        /// `<` may start a JSX element; JSX contexts are tracked.
        const JSX = 1 << 0;
        /// `{|` and `|}` exact object type delimiters.
        const FLOW = 1 << 1;
        /// `%%` placeholder delimiters.
        const PLACEHOLDERS = 1 << 2;
    }
}

/// Scanner configuration derived from the parser options.
#[derive(Debug, Clone, Copy)]
pub struct ScannerOptions {
    pub features: LexerFeatures,
    /// Module code: HTML-like comments are not comments.
    pub module: bool,
    /// Collect recoverable errors instead of failing on the first one.
    pub error_recovery: bool,
    /// Keep every token and comment in source order.
    pub tokens: bool,
    pub start_line: u32,
    pub start_column: u32,
}

impl Default for ScannerOptions {
    fn default() -> Self {
        Self {
            features: LexerFeatures::empty(),
            module: false,
            error_recovery: false,
            tokens: false,
            start_line: 1,
            start_column: 0,
        }
    }
}
