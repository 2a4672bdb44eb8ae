//! Rendering parser diagnostics as `miette` reports.

use esparse_diagnostics::{Diagnostic, ErrorKind};
use miette::{NamedSource, SourceSpan};
use thiserror::Error;

/// A syntax error pointing into the input.
#[derive(Debug, Error, miette::Diagnostic)]
#[error("{message}")]
#[diagnostic(code(esparse::syntax))]
pub struct SyntaxReport {
    message: String,
    #[source_code]
    source_code: NamedSource<String>,
    #[label("{reason}")]
    span: SourceSpan,
    reason: &'static str,
    #[help]
    help: Option<String>,
}

impl SyntaxReport {
    pub fn new(diag: &Diagnostic, name: &str, source: &str) -> Self {
        let help = match diag.kind() {
            ErrorKind::Capability if !diag.missing_plugins.is_empty() => {
                Some(format!("enable one of the plugins: {}", diag.missing_plugins.join(", ")))
            }
            ErrorKind::Configuration => Some("check the plugin list and parser options".to_string()),
            _ => None,
        };
        Self {
            message: format!("{} ({})", diag.message_text(), diag.loc),
            source_code: NamedSource::new(name, source.to_string()),
            span: span_at(source, diag.loc.index as usize),
            reason: diag.reason_code(),
            help,
        }
    }
}

/// The byte span of the character at `char_index`, empty at end of input.
fn span_at(source: &str, char_index: usize) -> SourceSpan {
    match source.char_indices().nth(char_index) {
        Some((offset, ch)) => (offset, ch.len_utf8()).into(),
        None => (source.len(), 0).into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_span_counts_characters() {
        assert_eq!(span_at("a = 1", 2), SourceSpan::from((2, 1)));
        assert_eq!(span_at("é = 1", 2), SourceSpan::from((3, 1)));
        assert_eq!(span_at("x", 5), SourceSpan::from((1, 0)));
    }
}
