//! TokenKind enum and the static token metadata table.
//!
//! Every token kind has one entry in [`TOKEN_INFO`], indexed by
//! `kind as usize`. The table is built at compile time; nothing registers
//! token types at runtime.

use serde::{Serialize, Serializer};
use std::fmt;

/// The kind of a lexical token.
///
/// Contextual keywords (`let`, `async`, `of`, `yield`, ...) are plain
/// [`TokenKind::Name`] tokens; only reserved words get their own kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum TokenKind {
    // ========================================================================
    // Punctuation
    // ========================================================================
    BracketL,
    BracketR,
    BraceL,
    /// `{|`, the exact object type opener.
    BraceBarL,
    BraceR,
    /// `|}`
    BraceBarR,
    ParenL,
    ParenR,
    Comma,
    Semi,
    Colon,
    Dot,
    Question,
    QuestionDot,
    Arrow,
    Ellipsis,
    /// The last chunk of a template literal, ending at the backquote.
    TemplateTail,
    /// A template chunk ending at `${`.
    TemplateNonTail,
    At,
    Hash,
    /// `#!` interpreter directive on the first line.
    Interpreter,

    // ========================================================================
    // Operators
    // ========================================================================
    Eq,
    /// Compound assignment other than `/=`. The value holds the operator.
    Assign,
    SlashAssign,
    IncDec,
    Bang,
    Tilde,
    NullishCoalescing,
    LogicalOr,
    LogicalAnd,
    BitwiseOr,
    BitwiseXor,
    BitwiseAnd,
    Equality,
    Lt,
    Gt,
    /// `<=` and `>=`.
    Relational,
    BitShiftL,
    BitShiftR,
    PlusMin,
    Modulo,
    Star,
    Slash,
    Exponent,
    /// `%%`, the placeholder delimiter.
    Placeholder,

    // ========================================================================
    // JSX
    // ========================================================================
    JsxName,
    JsxText,
    JsxTagStart,
    JsxTagEnd,

    // ========================================================================
    // Literals and names
    // ========================================================================
    Num,
    BigInt,
    String,
    Regexp,
    PrivateName,
    Name,
    Eof,

    // ========================================================================
    // Keywords
    // ========================================================================
    Break,
    Case,
    Catch,
    Continue,
    Debugger,
    Default,
    Do,
    Else,
    Finally,
    For,
    Function,
    If,
    Return,
    Switch,
    Throw,
    Try,
    Var,
    Const,
    While,
    With,
    New,
    This,
    Super,
    Class,
    Extends,
    Export,
    Import,
    Null,
    True,
    False,
    Typeof,
    Void,
    Delete,
    In,
    Instanceof,
}

/// Static metadata for one token kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenInfo {
    pub label: &'static str,
    pub keyword: Option<&'static str>,
    /// An expression may follow this token, so `/` after it starts a regex
    /// and `<` may start a JSX element.
    pub before_expr: bool,
    pub starts_expr: bool,
    pub right_assoc: bool,
    pub is_loop: bool,
    pub is_assign: bool,
    pub prefix: bool,
    pub postfix: bool,
    /// Binary operator precedence, if this is a binary operator.
    pub binop: Option<u8>,
    pub is_template: bool,
}

impl TokenInfo {
    const fn new(label: &'static str) -> Self {
        Self {
            label,
            keyword: None,
            before_expr: false,
            starts_expr: false,
            right_assoc: false,
            is_loop: false,
            is_assign: false,
            prefix: false,
            postfix: false,
            binop: None,
            is_template: false,
        }
    }

    const fn keyword(name: &'static str) -> Self {
        let mut info = Self::new(name);
        info.keyword = Some(name);
        info
    }

    const fn before_expr(mut self) -> Self {
        self.before_expr = true;
        self
    }

    const fn starts_expr(mut self) -> Self {
        self.starts_expr = true;
        self
    }

    const fn right_assoc(mut self) -> Self {
        self.right_assoc = true;
        self
    }

    const fn is_loop(mut self) -> Self {
        self.is_loop = true;
        self
    }

    const fn assign(mut self) -> Self {
        self.is_assign = true;
        self.before_expr = true;
        self
    }

    const fn prefix(mut self) -> Self {
        self.prefix = true;
        self
    }

    const fn postfix(mut self) -> Self {
        self.postfix = true;
        self
    }

    const fn binop(mut self, prec: u8) -> Self {
        self.binop = Some(prec);
        self
    }

    const fn template(mut self) -> Self {
        self.is_template = true;
        self
    }
}

const fn binop(label: &'static str, prec: u8) -> TokenInfo {
    TokenInfo::new(label).before_expr().binop(prec)
}

/// Token metadata indexed by `TokenKind as usize`.
pub const TOKEN_INFO: [TokenInfo; TokenKind::COUNT] = [
    // Punctuation
    TokenInfo::new("[").before_expr().starts_expr(),
    TokenInfo::new("]"),
    TokenInfo::new("{").before_expr().starts_expr(),
    TokenInfo::new("{|").before_expr().starts_expr(),
    TokenInfo::new("}"),
    TokenInfo::new("|}"),
    TokenInfo::new("(").before_expr().starts_expr(),
    TokenInfo::new(")"),
    TokenInfo::new(",").before_expr(),
    TokenInfo::new(";").before_expr(),
    TokenInfo::new(":").before_expr(),
    TokenInfo::new("."),
    TokenInfo::new("?").before_expr(),
    TokenInfo::new("?."),
    TokenInfo::new("=>").before_expr(),
    TokenInfo::new("...").before_expr(),
    TokenInfo::new("...`").starts_expr().template(),
    TokenInfo::new("...${").before_expr().starts_expr().template(),
    TokenInfo::new("@"),
    TokenInfo::new("#").starts_expr(),
    TokenInfo::new("#!..."),
    // Operators
    TokenInfo::new("=").before_expr().assign(),
    TokenInfo::new("_=").before_expr().assign(),
    TokenInfo::new("_=").before_expr().assign(),
    TokenInfo::new("++/--").prefix().postfix().starts_expr(),
    TokenInfo::new("!").before_expr().prefix().starts_expr(),
    TokenInfo::new("~").before_expr().prefix().starts_expr(),
    binop("??", 1),
    binop("||", 1),
    binop("&&", 2),
    binop("|", 3),
    binop("^", 4),
    binop("&", 5),
    binop("==/!=/===/!==", 6),
    binop("</>/<=/>=", 7),
    binop("</>/<=/>=", 7),
    binop("</>/<=/>=", 7),
    binop("<</>>/>>>", 8),
    binop("<</>>/>>>", 8),
    binop("+/-", 9).prefix().starts_expr(),
    TokenInfo::new("%").binop(10).starts_expr(),
    TokenInfo::new("*").binop(10),
    binop("/", 10),
    binop("**", 11).right_assoc(),
    TokenInfo::new("%%").starts_expr(),
    // JSX
    TokenInfo::new("jsxName"),
    TokenInfo::new("jsxText").before_expr(),
    TokenInfo::new("jsxTagStart").starts_expr(),
    TokenInfo::new("jsxTagEnd"),
    // Literals and names
    TokenInfo::new("num").starts_expr(),
    TokenInfo::new("bigint").starts_expr(),
    TokenInfo::new("string").starts_expr(),
    TokenInfo::new("regexp").starts_expr(),
    TokenInfo::new("#name").starts_expr(),
    TokenInfo::new("name").starts_expr(),
    TokenInfo::new("eof"),
    // Keywords
    TokenInfo::keyword("break"),
    TokenInfo::keyword("case").before_expr(),
    TokenInfo::keyword("catch"),
    TokenInfo::keyword("continue"),
    TokenInfo::keyword("debugger"),
    TokenInfo::keyword("default").before_expr(),
    TokenInfo::keyword("do").is_loop().before_expr(),
    TokenInfo::keyword("else").before_expr(),
    TokenInfo::keyword("finally"),
    TokenInfo::keyword("for").is_loop(),
    TokenInfo::keyword("function").starts_expr(),
    TokenInfo::keyword("if"),
    TokenInfo::keyword("return").before_expr(),
    TokenInfo::keyword("switch"),
    TokenInfo::keyword("throw").before_expr().prefix().starts_expr(),
    TokenInfo::keyword("try"),
    TokenInfo::keyword("var"),
    TokenInfo::keyword("const"),
    TokenInfo::keyword("while").is_loop(),
    TokenInfo::keyword("with"),
    TokenInfo::keyword("new").before_expr().starts_expr(),
    TokenInfo::keyword("this").starts_expr(),
    TokenInfo::keyword("super").starts_expr(),
    TokenInfo::keyword("class").starts_expr(),
    TokenInfo::keyword("extends").before_expr(),
    TokenInfo::keyword("export"),
    TokenInfo::keyword("import").starts_expr(),
    TokenInfo::keyword("null").starts_expr(),
    TokenInfo::keyword("true").starts_expr(),
    TokenInfo::keyword("false").starts_expr(),
    TokenInfo::keyword("typeof").before_expr().prefix().starts_expr(),
    TokenInfo::keyword("void").before_expr().prefix().starts_expr(),
    TokenInfo::keyword("delete").before_expr().prefix().starts_expr(),
    TokenInfo::keyword("in").before_expr().binop(7),
    TokenInfo::keyword("instanceof").before_expr().binop(7),
];

impl TokenKind {
    /// Number of token kinds.
    pub const COUNT: usize = TokenKind::Instanceof as usize + 1;

    #[inline]
    pub fn info(self) -> &'static TokenInfo {
        &TOKEN_INFO[self as usize]
    }

    #[inline]
    pub fn label(self) -> &'static str {
        self.info().label
    }

    #[inline]
    pub fn is_keyword(self) -> bool {
        self >= TokenKind::Break
    }

    /// Names and reserved words, i.e. anything usable as a property name
    /// after a dot.
    #[inline]
    pub fn is_keyword_or_name(self) -> bool {
        self == TokenKind::Name || self.is_keyword()
    }

    /// Tokens that may appear as a non-computed property key.
    #[inline]
    pub fn is_literal_property_name(self) -> bool {
        self.is_keyword_or_name()
            || matches!(self, TokenKind::String | TokenKind::Num | TokenKind::BigInt)
    }

    #[inline]
    pub fn before_expr(self) -> bool {
        self.info().before_expr
    }

    #[inline]
    pub fn starts_expr(self) -> bool {
        self.info().starts_expr
    }

    #[inline]
    pub fn is_assign(self) -> bool {
        self.info().is_assign
    }

    #[inline]
    pub fn is_loop(self) -> bool {
        self.info().is_loop
    }

    #[inline]
    pub fn is_prefix(self) -> bool {
        self.info().prefix
    }

    #[inline]
    pub fn is_postfix(self) -> bool {
        self.info().postfix
    }

    #[inline]
    pub fn right_assoc(self) -> bool {
        self.info().right_assoc
    }

    #[inline]
    pub fn binop(self) -> Option<u8> {
        self.info().binop
    }

    #[inline]
    pub fn is_template(self) -> bool {
        self.info().is_template
    }

    /// Whether an expression can end with this token. A `/` after such a
    /// token is division.
    #[inline]
    pub fn can_end_expression(self) -> bool {
        !self.before_expr()
    }

    /// Look up a reserved word.
    pub fn from_keyword(text: &str) -> Option<TokenKind> {
        let kind = match text {
            "break" => TokenKind::Break,
            "case" => TokenKind::Case,
            "catch" => TokenKind::Catch,
            "continue" => TokenKind::Continue,
            "debugger" => TokenKind::Debugger,
            "default" => TokenKind::Default,
            "do" => TokenKind::Do,
            "else" => TokenKind::Else,
            "finally" => TokenKind::Finally,
            "for" => TokenKind::For,
            "function" => TokenKind::Function,
            "if" => TokenKind::If,
            "return" => TokenKind::Return,
            "switch" => TokenKind::Switch,
            "throw" => TokenKind::Throw,
            "try" => TokenKind::Try,
            "var" => TokenKind::Var,
            "const" => TokenKind::Const,
            "while" => TokenKind::While,
            "with" => TokenKind::With,
            "new" => TokenKind::New,
            "this" => TokenKind::This,
            "super" => TokenKind::Super,
            "class" => TokenKind::Class,
            "extends" => TokenKind::Extends,
            "export" => TokenKind::Export,
            "import" => TokenKind::Import,
            "null" => TokenKind::Null,
            "true" => TokenKind::True,
            "false" => TokenKind::False,
            "typeof" => TokenKind::Typeof,
            "void" => TokenKind::Void,
            "delete" => TokenKind::Delete,
            "in" => TokenKind::In,
            "instanceof" => TokenKind::Instanceof,
            _ => return None,
        };
        Some(kind)
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for TokenKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_is_aligned_with_enum() {
        assert_eq!(TokenKind::BracketL.label(), "[");
        assert_eq!(TokenKind::Interpreter.label(), "#!...");
        assert_eq!(TokenKind::Placeholder.label(), "%%");
        assert_eq!(TokenKind::Eof.label(), "eof");
        assert_eq!(TokenKind::Break.label(), "break");
        assert_eq!(TokenKind::Instanceof.label(), "instanceof");
        for kind in [TokenKind::Break, TokenKind::Typeof, TokenKind::Instanceof] {
            assert_eq!(TokenKind::from_keyword(kind.label()), Some(kind));
        }
    }

    #[test]
    fn test_operator_metadata() {
        assert_eq!(TokenKind::NullishCoalescing.binop(), Some(1));
        assert_eq!(TokenKind::LogicalAnd.binop(), Some(2));
        assert_eq!(TokenKind::Exponent.binop(), Some(11));
        assert!(TokenKind::Exponent.right_assoc());
        assert!(TokenKind::In.binop().is_some());
        assert!(TokenKind::Eq.is_assign());
        assert!(TokenKind::IncDec.is_prefix() && TokenKind::IncDec.is_postfix());
        assert!(TokenKind::Do.is_loop() && TokenKind::While.is_loop());
        assert!(!TokenKind::Star.before_expr());
    }

    #[test]
    fn test_expression_boundaries() {
        assert!(TokenKind::Name.can_end_expression());
        assert!(TokenKind::ParenR.can_end_expression());
        assert!(!TokenKind::ParenL.can_end_expression());
        assert!(!TokenKind::Return.can_end_expression());
        assert!(TokenKind::TemplateNonTail.is_template());
    }

    #[test]
    fn test_contextual_words_are_not_keywords() {
        for word in ["let", "async", "await", "yield", "of", "static", "as"] {
            assert_eq!(TokenKind::from_keyword(word), None);
        }
    }
}
