//! JSX lexing: child text, tag names, attribute strings and entities.

use crate::char_codes::{is_digit, is_hex_digit, is_identifier_char, is_identifier_start, is_line_break};
use crate::context::TokContext;
use crate::scanner::{ScanResult, Scanner};
use esparse_ast::{TokenKind, TokenValue};
use esparse_diagnostics::messages;

impl<'a> Scanner<'a> {
    /// Read a token between the tags of an element: text up to the next `<`
    /// or `{`, or the punctuation itself.
    pub(crate) fn read_jsx_token(&mut self) -> ScanResult<()> {
        let start = self.pos();
        let mut out = String::new();
        let mut chunk_start = start;
        loop {
            let Some(ch) = self.peek(0) else {
                return Err(self.error_at(&messages::UNTERMINATED_JSX_CONTENT, start, &[]));
            };
            match ch {
                '<' | '{' => {
                    if self.pos() == start {
                        if ch == '<' && self.jsx_can_start_tag() {
                            self.set_pos(start + 1);
                            self.finish(TokenKind::JsxTagStart, TokenValue::None);
                            return Ok(());
                        }
                        return self.read_token();
                    }
                    out.push_str(&self.slice(chunk_start, self.pos()));
                    let text = self.alloc_str(&out);
                    self.finish(TokenKind::JsxText, TokenValue::Str(text));
                    return Ok(());
                }
                '>' | '}' => {
                    let entity = if ch == '}' { "&rbrace;" } else { "&gt;" };
                    let unexpected = ch.to_string();
                    self.raise_at(&messages::JSX_UNEXPECTED_TOKEN, self.pos(), &[&unexpected, entity])?;
                    self.set_pos(self.pos() + 1);
                }
                '&' => {
                    out.push_str(&self.slice(chunk_start, self.pos()));
                    out.push_str(&self.read_jsx_entity());
                    chunk_start = self.pos();
                }
                c if is_line_break(c) => {
                    out.push_str(&self.slice(chunk_start, self.pos()));
                    out.push_str(&self.read_jsx_new_line(true));
                    chunk_start = self.pos();
                }
                _ => self.set_pos(self.pos() + 1),
            }
        }
    }

    fn jsx_can_start_tag(&self) -> bool {
        self.can_start_jsx() && self.peek(1) != Some('!')
    }

    /// Read a token inside `<tag ...>` or `</tag>`.
    pub(crate) fn read_jsx_tag_token(&mut self, context: TokContext) -> ScanResult<()> {
        let Some(ch) = self.peek(0) else {
            return self.read_token();
        };
        if is_identifier_start(ch) {
            self.read_jsx_word();
            return Ok(());
        }
        if ch == '>' {
            self.set_pos(self.pos() + 1);
            self.finish(TokenKind::JsxTagEnd, TokenValue::None);
            return Ok(());
        }
        if (ch == '"' || ch == '\'') && context == TokContext::JsxOpenTag {
            return self.read_jsx_string(ch);
        }
        self.read_token()
    }

    /// A JSX identifier may contain `-`.
    fn read_jsx_word(&mut self) {
        let start = self.pos();
        let mut pos = start + 1;
        while self.char_at_index(pos).map_or(false, |c| is_identifier_char(c) || c == '-') {
            pos += 1;
        }
        self.set_pos(pos);
        let name = self.alloc_slice(start, pos);
        self.finish(TokenKind::JsxName, TokenValue::Str(name));
    }

    /// Attribute strings have no escapes but decode entities.
    fn read_jsx_string(&mut self, quote: char) -> ScanResult<()> {
        let start = self.pos();
        self.set_pos(start + 1);
        let mut out = String::new();
        let mut chunk_start = self.pos();
        loop {
            let Some(ch) = self.peek(0) else {
                return Err(self.error_at(&messages::UNTERMINATED_STRING, start, &[]));
            };
            if ch == quote {
                break;
            }
            if ch == '&' {
                out.push_str(&self.slice(chunk_start, self.pos()));
                out.push_str(&self.read_jsx_entity());
                chunk_start = self.pos();
            } else if is_line_break(ch) {
                out.push_str(&self.slice(chunk_start, self.pos()));
                out.push_str(&self.read_jsx_new_line(false));
                chunk_start = self.pos();
            } else {
                self.set_pos(self.pos() + 1);
            }
        }
        out.push_str(&self.slice(chunk_start, self.pos()));
        self.set_pos(self.pos() + 1);
        let value = self.alloc_str(&out);
        self.finish(TokenKind::String, TokenValue::Str(value));
        Ok(())
    }

    fn read_jsx_new_line(&mut self, normalize_crlf: bool) -> String {
        let ch = self.peek(0).unwrap_or('\n');
        self.set_pos(self.pos() + 1);
        if ch == '\r' && self.peek(0) == Some('\n') {
            self.set_pos(self.pos() + 1);
            return if normalize_crlf { "\n".to_string() } else { "\r\n".to_string() };
        }
        ch.to_string()
    }

    /// Decode `&name;`, `&#123;` or `&#x7B;`. An unknown or malformed
    /// reference is kept as a literal `&`.
    fn read_jsx_entity(&mut self) -> String {
        let start = self.pos() + 1;
        let mut pos = start;
        if self.char_at_index(pos) == Some('#') {
            pos += 1;
            let mut radix = 10;
            if self.char_at_index(pos) == Some('x') {
                radix = 16;
                pos += 1;
            }
            let digits_start = pos;
            let mut code: u32 = 0;
            let mut overflow = false;
            while let Some(c) = self.char_at_index(pos) {
                let is_valid = if radix == 16 { is_hex_digit(c) } else { is_digit(c) };
                if !is_valid {
                    break;
                }
                match code.checked_mul(radix).and_then(|v| v.checked_add(c.to_digit(radix).unwrap_or(0))) {
                    Some(v) => code = v,
                    None => overflow = true,
                }
                pos += 1;
            }
            if pos > digits_start && !overflow && self.char_at_index(pos) == Some(';') {
                if let Some(decoded) = char::from_u32(code) {
                    self.set_pos(pos + 1);
                    return decoded.to_string();
                }
            }
        } else {
            let mut count = 0;
            while count < 10 && pos < self.text_len() && self.char_at_index(pos) != Some(';') {
                pos += 1;
                count += 1;
            }
            if self.char_at_index(pos) == Some(';') {
                let name = self.slice(start, pos);
                if let Some(decoded) = crate::entities::xhtml_entity(&name) {
                    self.set_pos(pos + 1);
                    return decoded.to_string();
                }
            }
        }
        self.set_pos(start);
        "&".to_string()
    }
}

#[cfg(test)]
mod tests {
    use crate::context::{LexerFeatures, ScannerOptions};
    use crate::scanner::Scanner;
    use bumpalo::Bump;
    use esparse_ast::{TokenKind, TokenValue};
    use esparse_diagnostics::messages;

    fn jsx_options() -> ScannerOptions {
        ScannerOptions {
            features: LexerFeatures::JSX,
            ..ScannerOptions::default()
        }
    }

    fn scan_tokens<'a>(arena: &'a Bump, source: &str) -> Vec<(TokenKind, TokenValue<'a>)> {
        let mut scanner = Scanner::new(arena, source, jsx_options());
        scanner.next_token().unwrap();
        let mut tokens = Vec::new();
        while scanner.token() != TokenKind::Eof {
            tokens.push((scanner.token(), scanner.token_value()));
            scanner.next().unwrap();
        }
        tokens
    }

    fn kinds(source: &str) -> Vec<TokenKind> {
        let arena = Bump::new();
        scan_tokens(&arena, source).into_iter().map(|(kind, _)| kind).collect()
    }

    #[test]
    fn test_scan_jsx_element() {
        use TokenKind::*;
        assert_eq!(
            kinds("<div>hi</div>"),
            vec![JsxTagStart, JsxName, JsxTagEnd, JsxText, JsxTagStart, Slash, JsxName, JsxTagEnd]
        );
    }

    #[test]
    fn test_scan_jsx_attributes_and_expression() {
        use TokenKind::*;
        assert_eq!(
            kinds(r#"<a data-x="1" b={c}>{d}</a>"#),
            vec![
                JsxTagStart, JsxName, JsxName, Eq, String, JsxName, Eq, BraceL, Name, BraceR, JsxTagEnd, BraceL, Name,
                BraceR, JsxTagStart, Slash, JsxName, JsxTagEnd
            ]
        );
    }

    #[test]
    fn test_scan_jsx_self_closing_and_nested() {
        use TokenKind::*;
        assert_eq!(
            kinds("<a><b/></a>"),
            vec![
                JsxTagStart, JsxName, JsxTagEnd, JsxTagStart, JsxName, Slash, JsxTagEnd, JsxTagStart, Slash, JsxName,
                JsxTagEnd
            ]
        );
    }

    #[test]
    fn test_scan_jsx_text_preserves_whitespace_and_entities() {
        let arena = Bump::new();
        let tokens = scan_tokens(&arena, "<p> a &amp; &#x41;&#66; &bogus; </p>");
        assert_eq!(tokens[3], (TokenKind::JsxText, TokenValue::Str(" a & AB &bogus; ")));
    }

    #[test]
    fn test_scan_jsx_attribute_string_keeps_backslash() {
        let arena = Bump::new();
        let tokens = scan_tokens(&arena, r#"<a b="x\n&lt;"/>"#);
        assert_eq!(tokens[4], (TokenKind::String, TokenValue::Str("x\\n<")));
    }

    #[test]
    fn test_less_than_after_name_is_comparison() {
        use TokenKind::*;
        assert_eq!(kinds("a < b"), vec![Name, Lt, Name]);
    }

    #[test]
    fn test_unterminated_jsx_content() {
        let arena = Bump::new();
        let mut scanner = Scanner::new(&arena, "<a>text", jsx_options());
        scanner.next_token().unwrap();
        scanner.next().unwrap();
        scanner.next().unwrap();
        let diag = scanner.next().unwrap_err();
        assert!(diag.is(&messages::UNTERMINATED_JSX_CONTENT));
    }

    #[test]
    fn test_greater_than_in_text_is_reported() {
        let arena = Bump::new();
        let options = ScannerOptions { error_recovery: true, ..jsx_options() };
        let mut scanner = Scanner::new(&arena, "<a>></a>", options);
        scanner.next_token().unwrap();
        while scanner.token() != TokenKind::Eof {
            scanner.next().unwrap();
        }
        assert!(scanner.errors()[0].is(&messages::JSX_UNEXPECTED_TOKEN));
        assert_eq!(scanner.errors()[0].message_text(), "Unexpected token `>`. Did you mean `&gt;`?");
    }
}
