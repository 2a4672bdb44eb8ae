//! esparse_scanner: Lexer for ECMAScript source text.
//!
//! Produces tokens on demand for the parser, with support for:
//! - All ECMAScript punctuators, literals and keywords
//! - Template literals and regular expressions (parser-driven)
//! - JSX text, names and attribute strings
//! - Type-context angle brackets and Flow's exact-object delimiters
//! - Deferred strict-mode errors and recoverable error collection

mod char_codes;
mod context;
mod entities;
mod jsx;
mod scanner;
mod state;

pub use char_codes::{is_identifier_char, is_identifier_name, is_identifier_start, is_line_break};
pub use context::{LexerFeatures, ScannerOptions, TokContext};
pub use scanner::{ScanResult, Scanner};
pub use state::{LexerState, Lookahead, ScannerCheckpoint};
