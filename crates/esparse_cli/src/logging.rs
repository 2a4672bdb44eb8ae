//! Tracing setup for the `esparse` binary.
//!
//! The subscriber is only installed when `ESPARSE_LOG` (or `RUST_LOG`) is
//! set. `ESPARSE_LOG_FORMAT=json` switches to one JSON object per event.
//!
//! ```bash
//! ESPARSE_LOG=esparse_parser=debug esparse input.js
//! ESPARSE_LOG=trace ESPARSE_LOG_FORMAT=json esparse --plugin jsx app.jsx
//! ```

use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LogFormat {
    Text,
    Json,
}

impl LogFormat {
    fn from_env() -> Self {
        match std::env::var("ESPARSE_LOG_FORMAT").unwrap_or_default().to_lowercase().as_str() {
            "json" => Self::Json,
            _ => Self::Text,
        }
    }
}

/// `ESPARSE_LOG` wins over `RUST_LOG`.
fn build_filter() -> Option<EnvFilter> {
    if let Ok(value) = std::env::var("ESPARSE_LOG") {
        return Some(EnvFilter::builder().parse_lossy(value));
    }
    std::env::var("RUST_LOG").ok().map(|_| EnvFilter::from_default_env())
}

/// Install the global subscriber. Output goes to stderr so the JSON tree on
/// stdout stays clean.
pub fn init_tracing() {
    let Some(filter) = build_filter() else {
        return;
    };
    match LogFormat::from_env() {
        LogFormat::Json => {
            tracing_subscriber::fmt().json().with_env_filter(filter).with_writer(std::io::stderr).init();
        }
        LogFormat::Text => {
            tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
        }
    }
}
