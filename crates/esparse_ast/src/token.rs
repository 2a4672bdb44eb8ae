//! Tokens and comments as retained in the output when requested.

use crate::token_kind::TokenKind;
use esparse_core::text::Span;
use serde::ser::{SerializeStruct, Serializer};
use serde::Serialize;

/// The payload carried by a token.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TokenValue<'a> {
    None,
    /// Names, strings, private names, JSX text and operator spellings.
    Str(&'a str),
    Number(f64),
    /// BigInt digits with separators and the `n` suffix removed.
    BigInt(&'a str),
    Regex { pattern: &'a str, flags: &'a str },
    /// A template chunk. `cooked` is `None` when it holds an invalid escape.
    Template { raw: &'a str, cooked: Option<&'a str> },
}

impl<'a> TokenValue<'a> {
    /// The string payload, if any.
    #[inline]
    pub fn as_str(&self) -> Option<&'a str> {
        match *self {
            TokenValue::Str(s) | TokenValue::BigInt(s) => Some(s),
            _ => None,
        }
    }
}

impl Serialize for TokenValue<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match *self {
            TokenValue::None => serializer.serialize_none(),
            TokenValue::Str(s) | TokenValue::BigInt(s) => serializer.serialize_str(s),
            TokenValue::Number(n) => serializer.serialize_f64(n),
            TokenValue::Regex { pattern, flags } => {
                let mut state = serializer.serialize_struct("RegexValue", 2)?;
                state.serialize_field("pattern", pattern)?;
                state.serialize_field("flags", flags)?;
                state.end()
            }
            TokenValue::Template { cooked, .. } => cooked.serialize(serializer),
        }
    }
}

/// A lexical token with its location.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Token<'a> {
    pub kind: TokenKind,
    pub value: TokenValue<'a>,
    pub span: Span,
}

impl Serialize for Token<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Token", 5)?;
        state.serialize_field("type", &self.kind)?;
        state.serialize_field("value", &self.value)?;
        state.serialize_field("start", &self.span.start.index)?;
        state.serialize_field("end", &self.span.end.index)?;
        state.serialize_field("loc", &self.span)?;
        state.end()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CommentKind {
    #[serde(rename = "CommentBlock")]
    Block,
    #[serde(rename = "CommentLine")]
    Line,
}

/// A source comment. `value` excludes the delimiters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Comment<'a> {
    pub kind: CommentKind,
    pub value: &'a str,
    pub span: Span,
}

impl Serialize for Comment<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Comment", 5)?;
        state.serialize_field("type", &self.kind)?;
        state.serialize_field("value", self.value)?;
        state.serialize_field("start", &self.span.start.index)?;
        state.serialize_field("end", &self.span.end.index)?;
        state.serialize_field("loc", &self.span)?;
        state.end()
    }
}

/// Either a token or a comment, in source order, for the `tokens` output.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TokenOrComment<'a> {
    Token(Token<'a>),
    Comment(Comment<'a>),
}

impl TokenOrComment<'_> {
    pub fn span(&self) -> Span {
        match self {
            TokenOrComment::Token(t) => t.span,
            TokenOrComment::Comment(c) => c.span,
        }
    }
}

impl Serialize for TokenOrComment<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            TokenOrComment::Token(t) => t.serialize(serializer),
            TokenOrComment::Comment(c) => c.serialize(serializer),
        }
    }
}
