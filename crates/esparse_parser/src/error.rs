//! Errors returned by the parser entry points.

use esparse_diagnostics::Diagnostic;
use thiserror::Error;

/// An invalid parser configuration, detected before any input is read.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot combine the '{first}' and '{second}' plugins")]
    IncompatiblePlugins { first: &'static str, second: &'static str },

    #[error("unknown parser plugin '{0}'")]
    UnknownPlugin(String),

    #[error("invalid options for plugin '{plugin}': {message}")]
    InvalidOption { plugin: String, message: String },

    #[error("invalid parser options: {0}")]
    Json(#[from] serde_json::Error),
}

/// Why a parse produced no tree.
#[derive(Debug, Error)]
pub enum ParseFailure {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Syntax(#[from] Diagnostic),
}

impl ParseFailure {
    /// The syntax error, if the failure happened while parsing.
    pub fn diagnostic(&self) -> Option<&Diagnostic> {
        match self {
            ParseFailure::Syntax(diag) => Some(diag),
            ParseFailure::Config(_) => None,
        }
    }
}
