//! Mutable parser state that is saved and restored with checkpoints.

use esparse_core::intern::Atom;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelKind {
    Loop,
    Switch,
}

/// An enclosing label or breakable statement.
#[derive(Debug, Clone, Copy)]
pub struct Label {
    /// `None` for an unlabeled loop or switch.
    pub name: Option<Atom>,
    pub kind: Option<LabelKind>,
    pub statement_start: usize,
}

/// Parser fields that a speculative parse must be able to rewind.
#[derive(Debug, Clone, Default)]
pub struct ParserState {
    pub labels: Vec<Label>,
    /// Start of an expression that may turn out to be arrow parameters.
    pub potential_arrow_at: Option<usize>,
    pub maybe_in_arrow_parameters: bool,
    /// Positions of `yield`/`await` seen while parsing possible arrow
    /// parameters, reported once they turn out to be parameters.
    pub yield_pos: Option<usize>,
    pub await_pos: Option<usize>,
    pub await_ident_pos: Option<usize>,
    /// Inside a formal parameter list, where `yield` and `await`
    /// expressions are errors.
    pub in_parameters: bool,
    /// Inside a constructor parameter list, where parameter properties
    /// such as `private x` are allowed.
    pub parameter_modifiers_allowed: bool,
    /// `(literal start, comma offset)` for array and object literals that
    /// end in a trailing comma. A rest element may not be followed by one
    /// once the literal becomes a pattern.
    pub trailing_commas: Vec<(usize, usize)>,
    /// Inside a type annotation where a bare function type is not allowed.
    pub no_anon_function_type: bool,
    pub in_ambient_context: bool,
    pub in_disallow_conditional_types: bool,
    /// Module syntax was seen, for `unambiguous` source type.
    pub saw_unambiguous_esm: bool,
    /// A construct parsed differently in module mode than it would in
    /// script mode.
    pub ambiguous_script_different_ast: bool,
}

impl ParserState {
    pub fn new() -> Self {
        Self::default()
    }
}
