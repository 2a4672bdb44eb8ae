//! Parser utility functions: word classes, offsets and small checks shared
//! by the grammar modules.

use crate::expression::ExpressionErrors;
use crate::parser::{PResult, Parser};
use esparse_ast::*;
use esparse_core::text::Span;
use esparse_diagnostics::messages;

/// Char offset where a span starts.
#[inline]
pub(crate) fn span_start(span: Span) -> usize {
    span.start.index as usize
}

/// Char offset where a span ends.
#[inline]
pub(crate) fn span_end(span: Span) -> usize {
    span.end.index as usize
}

/// Words reserved only in strict mode code.
const STRICT_RESERVED: [&str; 9] =
    ["implements", "interface", "let", "package", "private", "protected", "public", "static", "yield"];

#[inline]
pub(crate) fn is_keyword(word: &str) -> bool {
    TokenKind::from_keyword(word).is_some()
}

/// Reserved outside strict mode too. `await` only in modules.
pub(crate) fn is_reserved_word(word: &str, in_module: bool) -> bool {
    word == "enum" || (in_module && word == "await")
}

pub(crate) fn is_strict_reserved_word(word: &str, in_module: bool) -> bool {
    is_reserved_word(word, in_module) || STRICT_RESERVED.contains(&word)
}

/// `eval` and `arguments` may be referenced but not bound in strict code.
#[inline]
pub(crate) fn is_strict_bind_only_reserved_word(word: &str) -> bool {
    word == "eval" || word == "arguments"
}

pub(crate) fn is_strict_bind_reserved_word(word: &str, in_module: bool) -> bool {
    is_strict_reserved_word(word, in_module) || is_strict_bind_only_reserved_word(word)
}

/// Tokens that end a `yield` with no argument.
pub(crate) fn ends_yield_argument(kind: TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::Semi
            | TokenKind::Eof
            | TokenKind::BraceR
            | TokenKind::ParenR
            | TokenKind::BracketR
            | TokenKind::BraceBarR
            | TokenKind::Colon
            | TokenKind::Comma
    )
}

/// Whether a statement list entry is a `"use strict"` directive.
pub(crate) fn is_use_strict(directive: &Directive<'_>) -> bool {
    directive.value.value == "use strict"
}

impl<'a> Parser<'a> {
    /// Start offset of the previous token.
    #[inline]
    pub(crate) fn last_start(&self) -> usize {
        self.scanner.last_tok_start()
    }

    #[inline]
    pub(crate) fn is_strict(&self) -> bool {
        self.scanner.is_strict()
    }

    /// Either type dialect is enabled.
    #[inline]
    pub(crate) fn has_type_plugin(&self) -> bool {
        self.is_typescript() || self.is_flow()
    }

    /// Whether an overlay lets a function end without a body here.
    pub(crate) fn bodiless_allowed(&self) -> bool {
        self.state.in_ambient_context || self.overlays.iter().any(|overlay| overlay.allows_missing_body(self))
    }

    #[inline]
    pub(crate) fn char_at(&self, index: usize) -> Option<char> {
        self.scanner.char_at_index(index)
    }

    /// The name held by an identifier-like token.
    pub(crate) fn word(&self) -> &'a str {
        if self.token().is_keyword() {
            self.token().label()
        } else {
            self.token_str()
        }
    }

    /// Whether `expr` can be the target of `++`, `--` or a compound
    /// assignment.
    pub(crate) fn is_simple_assign_target(&self, expr: &Expression<'a>) -> bool {
        match expr {
            Expression::Identifier(_) => true,
            Expression::Member(member) => member.kind == MemberType::MemberExpression,
            Expression::Parenthesized(paren) => self.is_simple_assign_target(&paren.expression),
            Expression::Extension(ext) => match ext {
                ExpressionExtension::TsAs(n) => self.is_simple_assign_target(&n.expression),
                ExpressionExtension::TsSatisfies(n) => self.is_simple_assign_target(&n.expression),
                ExpressionExtension::TsNonNull(n) => self.is_simple_assign_target(&n.expression),
                ExpressionExtension::TsTypeAssertion(n) => self.is_simple_assign_target(&n.expression),
                ExpressionExtension::TsTypeCast(n) => self.is_simple_assign_target(&n.expression),
                ExpressionExtension::FlowTypeCast(n) => self.is_simple_assign_target(&n.expression),
                ExpressionExtension::Placeholder(p) => {
                    matches!(p.expected_node, PlaceholderKind::Expression | PlaceholderKind::Identifier)
                }
                _ => false,
            },
            _ => false,
        }
    }

    /// Report what a cover grammar left unresolved. With `and_throw` unset,
    /// only answers whether there is anything to report.
    pub(crate) fn check_expression_errors(&mut self, errors: &ExpressionErrors, and_throw: bool) -> PResult<bool> {
        let has_errors = errors.shorthand_assign.is_some()
            || errors.double_proto.is_some()
            || errors.private_key.is_some()
            || errors.optional_parameters.is_some();
        if !and_throw {
            return Ok(has_errors);
        }
        if let Some(pos) = errors.shorthand_assign {
            self.raise(&messages::INVALID_COVER_INITIALIZED_NAME, pos, &[])?;
        }
        if let Some(pos) = errors.double_proto {
            self.raise(&messages::DUPLICATE_PROTO, pos, &[])?;
        }
        if let Some(pos) = errors.private_key {
            self.raise(&messages::UNEXPECTED_PRIVATE_FIELD, pos, &[])?;
        }
        if let Some(pos) = errors.optional_parameters {
            return Err(self.error_at(&messages::UNEXPECTED_TOKEN, pos, &[]));
        }
        Ok(has_errors)
    }

    /// Take the `yield`/`await` positions recorded so far, leaving none.
    pub(crate) fn take_arrow_positions(&mut self) -> ArrowPositions {
        ArrowPositions {
            yield_pos: self.state.yield_pos.take(),
            await_pos: self.state.await_pos.take(),
            await_ident_pos: self.state.await_ident_pos.take(),
        }
    }

    /// Put back the positions of an enclosing list. When that list may
    /// itself be arrow parameters, positions seen inside carry over.
    pub(crate) fn restore_arrow_positions(&mut self, outer: ArrowPositions, merge: bool) {
        if merge {
            self.state.yield_pos = outer.yield_pos.or(self.state.yield_pos);
            self.state.await_pos = outer.await_pos.or(self.state.await_pos);
            self.state.await_ident_pos = outer.await_ident_pos.or(self.state.await_ident_pos);
        } else {
            self.state.yield_pos = outer.yield_pos;
            self.state.await_pos = outer.await_pos;
            self.state.await_ident_pos = outer.await_ident_pos;
        }
    }

    /// A list turned out to be arrow parameters: report `yield` and `await`
    /// seen inside it.
    pub(crate) fn check_arrow_positions(&mut self, is_async: bool) -> PResult<()> {
        if let Some(pos) = self.state.yield_pos {
            self.raise(&messages::YIELD_IN_PARAMETER, pos, &[])?;
        }
        if let Some(pos) = self.state.await_pos {
            self.raise(&messages::AWAIT_EXPRESSION_FORMAL_PARAMETER, pos, &[])?;
        }
        if is_async {
            if let Some(pos) = self.state.await_ident_pos {
                self.raise(&messages::AWAIT_BINDING_IDENTIFIER, pos, &[])?;
            }
        }
        self.state.yield_pos = None;
        self.state.await_pos = None;
        self.state.await_ident_pos = None;
        Ok(())
    }
}

/// `yield`/`await` positions saved across a possible arrow parameter list.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct ArrowPositions {
    yield_pos: Option<usize>,
    await_pos: Option<usize>,
    await_ident_pos: Option<usize>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reserved_word_classes() {
        assert!(is_reserved_word("enum", false));
        assert!(!is_reserved_word("await", false));
        assert!(is_reserved_word("await", true));
        assert!(is_strict_reserved_word("yield", false));
        assert!(!is_strict_reserved_word("eval", false));
        assert!(is_strict_bind_reserved_word("eval", false));
        assert!(is_keyword("instanceof"));
        assert!(!is_keyword("let"));
    }

    #[test]
    fn test_yield_argument_terminators() {
        assert!(ends_yield_argument(TokenKind::ParenR));
        assert!(!ends_yield_argument(TokenKind::Name));
        assert!(!ends_yield_argument(TokenKind::Star));
    }
}
