//! Scanner integration tests.
//!
//! Verifies that the scanner tokenizes complete snippets the way the parser
//! expects to consume them.

use bumpalo::Bump;
use esparse_ast::{TokenKind, TokenOrComment};
use esparse_scanner::{LexerFeatures, Scanner, ScannerOptions};

/// Helper: scan all tokens from source and return them as (kind, text) pairs.
fn scan_all(source: &str, options: ScannerOptions) -> Vec<(TokenKind, String)> {
    let arena = Bump::new();
    let mut scanner = Scanner::new(&arena, source, options);
    scanner.next_token().unwrap();
    let mut tokens = Vec::new();
    while scanner.token() != TokenKind::Eof {
        tokens.push((scanner.token(), scanner.slice(scanner.token_start(), scanner.token_end())));
        scanner.next().unwrap();
    }
    tokens
}

/// Helper: scan all token kinds.
fn scan_kinds(source: &str) -> Vec<TokenKind> {
    scan_all(source, ScannerOptions::default()).into_iter().map(|(k, _)| k).collect()
}

// ============================================================================
// Basics
// ============================================================================

#[test]
fn test_empty_source() {
    assert!(scan_all("", ScannerOptions::default()).is_empty());
}

#[test]
fn test_whitespace_only() {
    assert!(scan_all("   \n\t \u{FEFF} \u{2028}", ScannerOptions::default()).is_empty());
}

#[test]
fn test_statement_tokens() {
    use TokenKind::*;
    assert_eq!(
        scan_kinds("const x = a?.b ?? 10n;"),
        vec![Const, Name, Eq, Name, QuestionDot, Name, NullishCoalescing, BigInt, Semi]
    );
}

#[test]
fn test_token_text_spans() {
    let tokens = scan_all("foo >>>= `a${1}b`", ScannerOptions::default());
    let texts: Vec<_> = tokens.iter().map(|(_, t)| t.as_str()).collect();
    assert_eq!(texts, vec!["foo", ">>>=", "`a${", "1", "}b`"]);
}

#[test]
fn test_unicode_offsets_count_characters() {
    let arena = Bump::new();
    let mut scanner = Scanner::new(&arena, "'ü' x", ScannerOptions::default());
    scanner.next_token().unwrap();
    scanner.next().unwrap();
    assert_eq!(scanner.token_start(), 4);
    assert_eq!(scanner.start_loc().column, 4);
}

// ============================================================================
// Token list
// ============================================================================

#[test]
fn test_token_list_interleaves_comments() {
    let arena = Bump::new();
    let options = ScannerOptions { tokens: true, ..ScannerOptions::default() };
    let mut scanner = Scanner::new(&arena, "a /* c */ b", options);
    scanner.next_token().unwrap();
    while scanner.token() != TokenKind::Eof {
        scanner.next().unwrap();
    }
    let tokens = scanner.take_tokens();
    assert_eq!(tokens.len(), 3);
    assert!(matches!(tokens[0], TokenOrComment::Token(t) if t.kind == TokenKind::Name));
    assert!(matches!(tokens[1], TokenOrComment::Comment(c) if c.value == " c "));
    assert!(matches!(tokens[2], TokenOrComment::Token(t) if t.kind == TokenKind::Name));
}

// ============================================================================
// Dialect features
// ============================================================================

#[test]
fn test_flow_exact_object_delimiters() {
    use TokenKind::*;
    let flow = ScannerOptions { features: LexerFeatures::FLOW, ..ScannerOptions::default() };
    let kinds: Vec<_> = scan_all("{| a |}", flow).into_iter().map(|(k, _)| k).collect();
    assert_eq!(kinds, vec![BraceBarL, Name, BraceBarR]);
    assert_eq!(scan_kinds("{| a |}"), vec![BraceL, BitwiseOr, Name, BitwiseOr, BraceR]);
}

#[test]
fn test_placeholder_delimiters() {
    use TokenKind::*;
    let placeholders = ScannerOptions { features: LexerFeatures::PLACEHOLDERS, ..ScannerOptions::default() };
    let kinds: Vec<_> = scan_all("%%name%%", placeholders).into_iter().map(|(k, _)| k).collect();
    assert_eq!(kinds, vec![Placeholder, Name, Placeholder]);
    assert_eq!(scan_kinds("a %% b"), vec![Name, Modulo, Modulo, Name]);
}

#[test]
fn test_jsx_inside_template_substitution() {
    use TokenKind::*;
    let jsx = ScannerOptions { features: LexerFeatures::JSX, ..ScannerOptions::default() };
    let kinds: Vec<_> = scan_all("`${<a>{b}</a>}`", jsx).into_iter().map(|(k, _)| k).collect();
    assert_eq!(
        kinds,
        vec![
            TemplateNonTail, JsxTagStart, JsxName, JsxTagEnd, BraceL, Name, BraceR, JsxTagStart, Slash, JsxName,
            JsxTagEnd, TemplateTail
        ]
    );
}

// ============================================================================
// Error recovery
// ============================================================================

#[test]
fn test_recovery_collects_multiple_errors() {
    let arena = Bump::new();
    let options = ScannerOptions { error_recovery: true, ..ScannerOptions::default() };
    let mut scanner = Scanner::new(&arena, "1_; 0b12; 2_", options);
    scanner.next_token().unwrap();
    while scanner.token() != TokenKind::Eof {
        scanner.next().unwrap();
    }
    let codes: Vec<_> = scanner.errors().iter().map(|d| d.reason_code()).collect();
    assert_eq!(codes, vec!["UnexpectedNumericSeparator", "InvalidDigit", "UnexpectedNumericSeparator"]);
}

#[test]
fn test_lexical_errors_are_fatal_even_in_recovery() {
    let arena = Bump::new();
    let options = ScannerOptions { error_recovery: true, ..ScannerOptions::default() };
    let mut scanner = Scanner::new(&arena, "a 'unterminated", options);
    scanner.next_token().unwrap();
    let diag = scanner.next().unwrap_err();
    assert_eq!(diag.reason_code(), "UnterminatedString");
    assert_eq!(diag.to_string(), "Unterminated string constant. (1:2)");
}
