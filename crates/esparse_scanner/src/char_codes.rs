//! Character classification used by the scanner.

use unicode_xid::UnicodeXID;

pub const ZWNJ: char = '\u{200C}';
pub const ZWJ: char = '\u{200D}';
pub const BOM: char = '\u{FEFF}';

/// Check if a character is a line terminator.
#[inline]
pub fn is_line_break(ch: char) -> bool {
    matches!(ch, '\n' | '\r' | '\u{2028}' | '\u{2029}')
}

/// Check if a character is single-line whitespace (not a line break).
#[inline]
pub fn is_white_space_single_line(ch: char) -> bool {
    matches!(
        ch,
        ' ' | '\t'
            | '\u{000B}'
            | '\u{000C}'
            | '\u{00A0}'
            | '\u{1680}'
            | '\u{2000}'..='\u{200A}'
            | '\u{202F}'
            | '\u{205F}'
            | '\u{3000}'
            | BOM
    )
}

#[inline]
pub fn is_digit(ch: char) -> bool {
    ch.is_ascii_digit()
}

#[inline]
pub fn is_octal_digit(ch: char) -> bool {
    matches!(ch, '0'..='7')
}

#[inline]
pub fn is_hex_digit(ch: char) -> bool {
    ch.is_ascii_hexdigit()
}

/// Whether `ch` may start an identifier.
#[inline]
pub fn is_identifier_start(ch: char) -> bool {
    if ch.is_ascii() {
        return ch.is_ascii_alphabetic() || ch == '$' || ch == '_';
    }
    UnicodeXID::is_xid_start(ch)
}

/// Whether `ch` may continue an identifier.
#[inline]
pub fn is_identifier_char(ch: char) -> bool {
    if ch.is_ascii() {
        return ch.is_ascii_alphanumeric() || ch == '$' || ch == '_';
    }
    UnicodeXID::is_xid_continue(ch) || ch == ZWNJ || ch == ZWJ
}

/// Whether a whole string is a valid identifier name.
pub fn is_identifier_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if is_identifier_start(first) => chars.all(is_identifier_char),
        _ => false,
    }
}

/// Digits allowed to sit on either side of a numeric separator.
pub fn is_allowed_separator_sibling(radix: u32, ch: char) -> bool {
    match radix {
        16 => is_hex_digit(ch),
        10 => is_digit(ch),
        8 => is_octal_digit(ch),
        _ => matches!(ch, '0' | '1'),
    }
}

/// Characters that may never be adjacent to a numeric separator.
pub fn is_forbidden_separator_sibling(radix: u32, ch: char) -> bool {
    if radix == 16 {
        matches!(ch, '.' | 'X' | '_' | 'x')
    } else {
        matches!(ch, '.' | 'B' | 'E' | 'O' | '_' | 'b' | 'e' | 'o')
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identifier_classes() {
        assert!(is_identifier_start('$'));
        assert!(is_identifier_start('_'));
        assert!(is_identifier_start('é'));
        assert!(!is_identifier_start('1'));
        assert!(is_identifier_char('1'));
        assert!(is_identifier_char(ZWJ));
        assert!(!is_identifier_start(ZWJ));
        assert!(is_identifier_name("ünïcode_1"));
        assert!(!is_identifier_name("1abc"));
        assert!(!is_identifier_name(""));
    }

    #[test]
    fn test_separator_siblings() {
        assert!(is_allowed_separator_sibling(16, 'f'));
        assert!(!is_allowed_separator_sibling(8, '8'));
        assert!(is_forbidden_separator_sibling(10, 'e'));
        assert!(!is_forbidden_separator_sibling(16, 'e'));
    }

    #[test]
    fn test_whitespace() {
        assert!(is_white_space_single_line('\u{00A0}'));
        assert!(is_white_space_single_line(BOM));
        assert!(!is_white_space_single_line('\n'));
        assert!(is_line_break('\u{2028}'));
    }
}
