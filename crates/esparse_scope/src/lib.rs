//! esparse_scope: Binding and scope analysis for the esparse parser.
//!
//! The parser consults these handlers at every binding site and name use:
//! - [`ScopeHandler`] keeps the stack of lexical scopes and detects
//!   redeclarations and exports of undeclared names
//! - [`ClassScopeHandler`] tracks private names per class body
//! - [`ProductionParamHandler`] tracks the `yield`/`await`/`return`/`in`
//!   grammar parameters of the enclosing function
//!
//! Handlers never raise errors themselves. They return what went wrong and
//! the parser reports it under its own error policy.

mod class_scope;
mod flags;
mod production;
mod scope;

pub use class_scope::{ClassScope, ClassScopeHandler, PrivateNameError};
pub use flags::{BindingFlags, ClassElementKind, ParamFlags, ScopeFlags};
pub use production::ProductionParamHandler;
pub use scope::{NameFlags, Redeclaration, Scope, ScopeDialect, ScopeHandler};
