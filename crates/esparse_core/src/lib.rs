//! esparse_core: Core utilities for the esparse ECMAScript parser.
//!
//! Provides source positions and spans, the AST arena helpers, identifier
//! interning, and the small collections shared by the scanner, the scope
//! tracker and the parser.

pub mod arena;
pub mod collections;
pub mod intern;
pub mod text;

// Re-export commonly used types
pub use arena::alloc_vec;
pub use intern::{Atom, Interner};
pub use text::{LineMap, Position, Span};
