//! Private-name tracking for class bodies.

use crate::flags::ClassElementKind;
use esparse_core::collections::{FxHashSet, FxMap, OrderedMap};
use esparse_core::intern::Atom;

/// Private names of one class body.
#[derive(Debug, Clone, Default)]
pub struct ClassScope {
    private_names: FxHashSet<Atom>,
    /// Accessors declared without their counterpart so far.
    lone_accessors: FxMap<Atom, ClassElementKind>,
    /// Names used before their declaration, with the offset of first use.
    undefined_private_names: OrderedMap<Atom, u32>,
}

impl ClassScope {
    pub fn declares(&self, name: Atom) -> bool {
        self.private_names.contains(&name)
    }
}

/// A private name error found by the handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrivateNameError {
    /// `#x` declared twice (other than a getter/setter pair).
    Redeclaration { name: Atom, pos: u32 },
    /// `#x` used but declared by no enclosing class.
    Unresolved { name: Atom, pos: u32 },
}

#[derive(Debug, Clone, Default)]
pub struct ClassScopeHandler {
    stack: Vec<ClassScope>,
}

impl ClassScopeHandler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn enter(&mut self) {
        self.stack.push(ClassScope::default());
    }

    /// Leave a class body. Unresolved names move to the enclosing class,
    /// which may still declare them; at the outermost class they are
    /// returned as errors.
    pub fn exit(&mut self) -> Vec<PrivateNameError> {
        let Some(mut old) = self.stack.pop() else {
            return Vec::new();
        };
        let mut errors = Vec::new();
        match self.stack.last_mut() {
            Some(current) => {
                for (name, pos) in old.undefined_private_names.drain() {
                    if !current.undefined_private_names.contains_key(&name) {
                        current.undefined_private_names.insert(name, pos);
                    }
                }
            }
            None => {
                for (name, pos) in old.undefined_private_names.drain() {
                    errors.push(PrivateNameError::Unresolved { name, pos });
                }
            }
        }
        errors
    }

    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    #[inline]
    pub fn in_class(&self) -> bool {
        !self.stack.is_empty()
    }

    /// Declare `#name` in the innermost class. A getter and a setter of the
    /// same static-ness may share a name; anything else is a redeclaration.
    pub fn declare_private_name(
        &mut self,
        name: Atom,
        kind: ClassElementKind,
        pos: u32,
    ) -> Result<(), PrivateNameError> {
        let Some(scope) = self.stack.last_mut() else {
            return Err(PrivateNameError::Unresolved { name, pos });
        };
        let mut redefined = scope.private_names.contains(&name);
        if kind.is_accessor() {
            let lone = if redefined { scope.lone_accessors.get(&name).copied() } else { None };
            match lone {
                Some(previous) => {
                    redefined = previous.accessor_kind() == kind.accessor_kind()
                        || previous.is_static() != kind.is_static();
                    if !redefined {
                        scope.lone_accessors.remove(&name);
                    }
                }
                None if !redefined => {
                    scope.lone_accessors.insert(name, kind);
                }
                None => {}
            }
        }
        scope.private_names.insert(name);
        scope.undefined_private_names.remove(&name);
        if redefined {
            return Err(PrivateNameError::Redeclaration { name, pos });
        }
        Ok(())
    }

    /// Record a use of `#name`. Outside any class this is an immediate
    /// error; otherwise resolution waits until the class bodies close.
    pub fn use_private_name(&mut self, name: Atom, pos: u32) -> Result<(), PrivateNameError> {
        if self.stack.iter().any(|scope| scope.declares(name)) {
            return Ok(());
        }
        match self.stack.last_mut() {
            Some(innermost) => {
                if !innermost.undefined_private_names.contains_key(&name) {
                    innermost.undefined_private_names.insert(name, pos);
                }
                Ok(())
            }
            None => Err(PrivateNameError::Unresolved { name, pos }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use esparse_core::intern::Interner;

    #[test]
    fn test_getter_setter_pair_shares_a_name() {
        let mut interner = Interner::new();
        let x = interner.intern("x");
        let mut classes = ClassScopeHandler::new();
        classes.enter();
        classes.declare_private_name(x, ClassElementKind::KIND_GETTER, 1).unwrap();
        classes.declare_private_name(x, ClassElementKind::KIND_SETTER, 5).unwrap();
        let err = classes.declare_private_name(x, ClassElementKind::KIND_GETTER, 9).unwrap_err();
        assert_eq!(err, PrivateNameError::Redeclaration { name: x, pos: 9 });
    }

    #[test]
    fn test_static_mismatch_is_a_redeclaration() {
        let mut interner = Interner::new();
        let x = interner.intern("x");
        let mut classes = ClassScopeHandler::new();
        classes.enter();
        classes.declare_private_name(x, ClassElementKind::STATIC_GETTER, 1).unwrap();
        assert!(classes.declare_private_name(x, ClassElementKind::KIND_SETTER, 5).is_err());
    }

    #[test]
    fn test_use_before_declaration_resolves() {
        let mut interner = Interner::new();
        let x = interner.intern("x");
        let mut classes = ClassScopeHandler::new();
        classes.enter();
        classes.use_private_name(x, 3).unwrap();
        classes.declare_private_name(x, ClassElementKind::OTHER, 10).unwrap();
        assert!(classes.exit().is_empty());
    }
}
