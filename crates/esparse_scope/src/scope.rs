//! The lexical scope stack.

use crate::flags::{BindingFlags, ScopeFlags};
use bitflags::bitflags;
use esparse_core::collections::OrderedMap;
use esparse_core::intern::Atom;
use rustc_hash::FxHashMap;
use tracing::trace;

bitflags! {
    /// How a name is bound within one scope.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct NameFlags: u16 {
        const VAR         = 1 << 0;
        const LEXICAL     = 1 << 1;
        const FUNCTION    = 1 << 2;
        /// Bound in the type namespace.
        const TYPE        = 1 << 3;
        const ENUM        = 1 << 4;
        const CONST_ENUM  = 1 << 5;
        const CLASS       = 1 << 6;
        /// A `declare` or namespace binding: only visible to exports.
        const EXPORT_ONLY = 1 << 7;
        const IMPORT      = 1 << 8;
        /// `declare function f(): T;`
        const DECLARE_FN  = 1 << 9;
    }
}

/// Which dialect's redeclaration rules apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScopeDialect {
    #[default]
    Plain,
    TypeScript,
    Flow,
}

/// One frame of the scope stack.
#[derive(Debug, Clone)]
pub struct Scope {
    pub flags: ScopeFlags,
    names: FxHashMap<Atom, NameFlags>,
    /// The first lexical name declared here. A simple catch parameter is
    /// the only lexical name a `var` may shadow.
    first_lexical_name: Option<Atom>,
}

impl Scope {
    pub fn new(flags: ScopeFlags) -> Self {
        Self {
            flags,
            names: FxHashMap::default(),
            first_lexical_name: None,
        }
    }

    /// How `name` is bound in this frame, if at all.
    #[inline]
    pub fn name_flags(&self, name: Atom) -> NameFlags {
        self.names.get(&name).copied().unwrap_or_default()
    }

    #[inline]
    pub fn has_name(&self, name: Atom) -> bool {
        self.names.contains_key(&name)
    }

    fn add(&mut self, name: Atom, flags: NameFlags) {
        *self.names.entry(name).or_default() |= flags;
    }
}

/// A name declared twice in an incompatible way.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Redeclaration {
    pub name: Atom,
    pub pos: u32,
}

/// Tracks declared names across nested scopes.
#[derive(Debug, Clone)]
pub struct ScopeHandler {
    stack: Vec<Scope>,
    in_module: bool,
    dialect: ScopeDialect,
    /// Names exported from the module before (or without) being declared,
    /// with the offset of their first export.
    undefined_exports: OrderedMap<Atom, u32>,
}

impl ScopeHandler {
    pub fn new(in_module: bool, dialect: ScopeDialect) -> Self {
        Self {
            stack: Vec::new(),
            in_module,
            dialect,
            undefined_exports: OrderedMap::new(),
        }
    }

    // ========================================================================
    // Stack
    // ========================================================================

    pub fn enter(&mut self, flags: ScopeFlags) {
        trace!(flags = ?flags, depth = self.stack.len(), "enter scope");
        self.stack.push(Scope::new(flags));
    }

    pub fn exit(&mut self) -> Option<Scope> {
        let scope = self.stack.pop();
        trace!(depth = self.stack.len(), "exit scope");
        scope
    }

    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    pub fn current_scope(&self) -> Option<&Scope> {
        self.stack.last()
    }

    #[inline]
    pub fn in_module(&self) -> bool {
        self.in_module
    }

    #[inline]
    pub fn dialect(&self) -> ScopeDialect {
        self.dialect
    }

    fn current_flags(&self) -> ScopeFlags {
        self.stack.last().map_or(ScopeFlags::OTHER, |s| s.flags)
    }

    /// Flags of the innermost scope that owns `var` declarations.
    pub fn current_var_scope_flags(&self) -> ScopeFlags {
        self.stack
            .iter()
            .rev()
            .map(|s| s.flags)
            .find(|f| f.is_var_scope())
            .unwrap_or(ScopeFlags::OTHER)
    }

    /// Flags of the innermost scope that defines `this`.
    pub fn current_this_scope_flags(&self) -> ScopeFlags {
        self.stack
            .iter()
            .rev()
            .map(|s| s.flags)
            .find(|f| f.is_this_scope())
            .unwrap_or(ScopeFlags::OTHER)
    }

    // ========================================================================
    // Context queries
    // ========================================================================

    pub fn in_top_level(&self) -> bool {
        self.current_flags().contains(ScopeFlags::PROGRAM)
    }

    pub fn in_function(&self) -> bool {
        self.current_var_scope_flags().contains(ScopeFlags::FUNCTION)
    }

    pub fn allow_super(&self) -> bool {
        self.current_this_scope_flags().contains(ScopeFlags::SUPER)
    }

    pub fn allow_direct_super(&self) -> bool {
        self.current_this_scope_flags().contains(ScopeFlags::DIRECT_SUPER)
    }

    pub fn in_class(&self) -> bool {
        self.current_this_scope_flags().contains(ScopeFlags::CLASS)
    }

    /// In a class body or field initializer, not inside a method.
    pub fn in_class_and_not_in_non_arrow_function(&self) -> bool {
        let flags = self.current_this_scope_flags();
        flags.contains(ScopeFlags::CLASS) && !flags.contains(ScopeFlags::FUNCTION)
    }

    pub fn in_static_block(&self) -> bool {
        for scope in self.stack.iter().rev() {
            if scope.flags.contains(ScopeFlags::STATIC_BLOCK) {
                return true;
            }
            if scope.flags.intersects(ScopeFlags::VAR | ScopeFlags::CLASS) {
                return false;
            }
        }
        false
    }

    pub fn in_non_arrow_function(&self) -> bool {
        self.current_this_scope_flags().contains(ScopeFlags::FUNCTION)
    }

    /// Whether a function declaration in the current scope binds like `var`.
    pub fn treat_functions_as_var(&self) -> bool {
        self.stack.last().map_or(false, |s| self.treat_functions_as_var_in(s))
    }

    fn treat_functions_as_var_in(&self, scope: &Scope) -> bool {
        scope.flags.intersects(ScopeFlags::FUNCTION | ScopeFlags::STATIC_BLOCK)
            || (!self.in_module && scope.flags.contains(ScopeFlags::PROGRAM))
    }

    // ========================================================================
    // Declarations
    // ========================================================================

    /// Record a binding of `name` at offset `pos`.
    ///
    /// The name is recorded even when it clashes with an earlier binding;
    /// the clash is returned so the caller can report it.
    pub fn declare_name(&mut self, name: Atom, binding: BindingFlags, pos: u32) -> Result<(), Redeclaration> {
        if self.stack.is_empty() || binding.is_unrecorded() {
            return Ok(());
        }
        match self.dialect {
            ScopeDialect::TypeScript => self.declare_name_ts(name, binding, pos),
            ScopeDialect::Flow if binding.contains(BindingFlags::FLAG_FLOW_DECLARE_FN) => {
                let top = self.stack.len() - 1;
                let clash = self.check_redeclaration(top, name, binding, pos);
                self.maybe_export_defined(top, name);
                self.stack[top].add(name, NameFlags::DECLARE_FN);
                clash
            }
            _ => self.declare_name_base(name, binding, pos),
        }
    }

    fn declare_name_base(&mut self, name: Atom, binding: BindingFlags, pos: u32) -> Result<(), Redeclaration> {
        let mut result = Ok(());
        let top = self.stack.len() - 1;
        if binding.is_lexical() || binding.is_function() {
            result = self.check_redeclaration(top, name, binding, pos);
            let scope = &mut self.stack[top];
            if binding.is_function() {
                scope.add(name, NameFlags::FUNCTION);
            } else {
                if scope.first_lexical_name.is_none() {
                    scope.first_lexical_name = Some(name);
                }
                scope.add(name, NameFlags::LEXICAL);
            }
            if binding.is_function() {
                self.maybe_export_defined(top, name);
            }
        } else if binding.is_var() {
            for idx in (0..=top).rev() {
                let clash = self.check_redeclaration(idx, name, binding, pos);
                if result.is_ok() {
                    result = clash;
                }
                self.stack[idx].add(name, NameFlags::VAR);
                self.maybe_export_defined(idx, name);
                if self.stack[idx].flags.is_var_scope() {
                    break;
                }
            }
        }
        if self.in_module && self.stack[top].flags.contains(ScopeFlags::PROGRAM) {
            self.undefined_exports.remove(&name);
        }
        result
    }

    fn declare_name_ts(&mut self, name: Atom, binding: BindingFlags, pos: u32) -> Result<(), Redeclaration> {
        let top = self.stack.len() - 1;
        if binding.contains(BindingFlags::FLAG_TS_IMPORT) {
            let clash = if self.stack[top].name_flags(name).contains(NameFlags::IMPORT) {
                Err(Redeclaration { name, pos })
            } else {
                Ok(())
            };
            let mut flags = NameFlags::IMPORT;
            if binding.is_type() {
                flags |= NameFlags::TYPE;
            }
            self.stack[top].add(name, flags);
            return clash;
        }
        if binding.contains(BindingFlags::FLAG_TS_EXPORT_ONLY) {
            self.maybe_export_defined(top, name);
            self.stack[top].add(name, NameFlags::EXPORT_ONLY);
            return Ok(());
        }

        let mut result = self.declare_name_base(name, binding, pos);
        let mut flags = NameFlags::empty();
        if binding.is_type() {
            if !binding.is_value() {
                let clash = self.check_redeclaration(top, name, binding, pos);
                if result.is_ok() {
                    result = clash;
                }
                self.maybe_export_defined(top, name);
            }
            flags |= NameFlags::TYPE;
        }
        if binding.contains(BindingFlags::FLAG_TS_ENUM) {
            flags |= NameFlags::ENUM;
        }
        if binding.contains(BindingFlags::FLAG_TS_CONST_ENUM) {
            flags |= NameFlags::CONST_ENUM;
        }
        if binding.contains(BindingFlags::FLAG_CLASS) {
            flags |= NameFlags::CLASS;
        }
        if !flags.is_empty() {
            self.stack[top].add(name, flags);
        }
        result
    }

    fn maybe_export_defined(&mut self, idx: usize, name: Atom) {
        if self.in_module && self.stack[idx].flags.contains(ScopeFlags::PROGRAM) {
            self.undefined_exports.remove(&name);
        }
    }

    fn check_redeclaration(&self, idx: usize, name: Atom, binding: BindingFlags, pos: u32) -> Result<(), Redeclaration> {
        if self.is_redeclared_in_scope(&self.stack[idx], name, binding) {
            Err(Redeclaration { name, pos })
        } else {
            Ok(())
        }
    }

    /// Whether binding `name` as `binding` in `scope` clashes with what is
    /// already there.
    pub fn is_redeclared_in_scope(&self, scope: &Scope, name: Atom, binding: BindingFlags) -> bool {
        let existing = scope.name_flags(name);
        match self.dialect {
            ScopeDialect::TypeScript => {
                if existing.contains(NameFlags::ENUM) {
                    if binding.contains(BindingFlags::FLAG_TS_ENUM) {
                        let is_const = binding.contains(BindingFlags::FLAG_TS_CONST_ENUM);
                        return is_const != existing.contains(NameFlags::CONST_ENUM);
                    }
                    return true;
                }
                if binding.contains(BindingFlags::FLAG_CLASS) && existing.contains(NameFlags::CLASS) {
                    return existing.contains(NameFlags::LEXICAL) && binding.is_value();
                }
                if binding.is_type() && existing.contains(NameFlags::TYPE) {
                    return true;
                }
            }
            ScopeDialect::Flow => {
                if binding.contains(BindingFlags::FLAG_FLOW_DECLARE_FN) && !existing.contains(NameFlags::DECLARE_FN) {
                    return existing.intersects(NameFlags::FUNCTION | NameFlags::LEXICAL);
                }
            }
            ScopeDialect::Plain => {}
        }
        self.is_redeclared_base(scope, name, existing, binding)
    }

    fn is_redeclared_base(&self, scope: &Scope, name: Atom, existing: NameFlags, binding: BindingFlags) -> bool {
        if !binding.is_value() {
            return false;
        }
        let value_names = NameFlags::VAR | NameFlags::LEXICAL | NameFlags::FUNCTION;
        if binding.is_lexical() {
            return existing.intersects(value_names);
        }
        if binding.is_function() {
            return existing.contains(NameFlags::LEXICAL)
                || (!self.treat_functions_as_var_in(scope) && existing.contains(NameFlags::VAR));
        }
        let shadows_catch_param =
            scope.flags.contains(ScopeFlags::SIMPLE_CATCH) && scope.first_lexical_name == Some(name);
        (existing.contains(NameFlags::LEXICAL) && !shadows_catch_param)
            || (!self.treat_functions_as_var_in(scope) && existing.contains(NameFlags::FUNCTION))
    }

    // ========================================================================
    // Exports
    // ========================================================================

    /// Record an export of a local name. Names not yet declared at the top
    /// level are remembered until a declaration shows up.
    pub fn check_local_export(&mut self, name: Atom, pos: u32) {
        match self.dialect {
            ScopeDialect::TypeScript => {
                if self.stack.last().map_or(false, |s| s.name_flags(name).contains(NameFlags::IMPORT)) {
                    return;
                }
                let type_only = NameFlags::TYPE | NameFlags::EXPORT_ONLY;
                if self.stack.iter().rev().any(|s| s.name_flags(name).intersects(type_only)) {
                    return;
                }
            }
            ScopeDialect::Flow => {
                if self.stack.first().map_or(false, |s| s.name_flags(name).contains(NameFlags::DECLARE_FN)) {
                    return;
                }
            }
            ScopeDialect::Plain => {}
        }
        let declared = self.stack.first().map_or(false, |top| {
            top.name_flags(name)
                .intersects(NameFlags::VAR | NameFlags::LEXICAL | NameFlags::FUNCTION)
        });
        if !declared && !self.undefined_exports.contains_key(&name) {
            self.undefined_exports.insert(name, pos);
        }
    }

    /// Exported names that were never declared, in first-export order.
    pub fn undefined_exports(&self) -> impl Iterator<Item = (Atom, u32)> + '_ {
        self.undefined_exports.iter().map(|(name, pos)| (*name, *pos))
    }

    pub fn has_undefined_exports(&self) -> bool {
        !self.undefined_exports.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use esparse_core::intern::Interner;

    fn program(in_module: bool) -> ScopeHandler {
        let mut scope = ScopeHandler::new(in_module, ScopeDialect::Plain);
        scope.enter(ScopeFlags::PROGRAM);
        scope
    }

    #[test]
    fn test_catch_parameter_may_be_shadowed_by_var() {
        let mut interner = Interner::new();
        let e = interner.intern("e");
        let mut scope = program(false);
        scope.enter(ScopeFlags::SIMPLE_CATCH);
        scope.declare_name(e, BindingFlags::TYPE_CATCH_PARAM, 7).unwrap();
        scope.enter(ScopeFlags::OTHER);
        assert!(scope.declare_name(e, BindingFlags::TYPE_VAR, 20).is_ok());
    }

    #[test]
    fn test_var_is_recorded_in_every_frame_up_to_function() {
        let mut interner = Interner::new();
        let x = interner.intern("x");
        let mut scope = program(false);
        scope.enter(ScopeFlags::OTHER);
        scope.declare_name(x, BindingFlags::TYPE_VAR, 0).unwrap();
        scope.exit();
        let err = scope.declare_name(x, BindingFlags::TYPE_LEXICAL, 9).unwrap_err();
        assert_eq!(err, Redeclaration { name: x, pos: 9 });
    }

    #[test]
    fn test_static_block_detection_stops_at_functions() {
        let mut scope = program(false);
        scope.enter(ScopeFlags::CLASS);
        scope.enter(ScopeFlags::STATIC_BLOCK | ScopeFlags::SUPER);
        assert!(scope.in_static_block());
        scope.enter(ScopeFlags::FUNCTION);
        assert!(!scope.in_static_block());
    }
}
