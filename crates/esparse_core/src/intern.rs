//! Identifier interning.
//!
//! The scope tracker compares binding names constantly; interning turns
//! every name into a `u32` handle so those comparisons and hash lookups are
//! integer operations.

use lasso::{Rodeo, Spur};
use std::fmt;

/// An interned name. Comparing two atoms is an integer comparison.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct Atom(Spur);

impl Atom {
    #[inline]
    pub fn from_spur(spur: Spur) -> Self {
        Self(spur)
    }

    #[inline]
    pub fn as_spur(self) -> Spur {
        self.0
    }
}

impl fmt::Debug for Atom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Atom({:?})", self.0)
    }
}

/// Single-threaded string interner owned by one parse.
#[derive(Default)]
pub struct Interner {
    rodeo: Rodeo,
}

impl Interner {
    pub fn new() -> Self {
        Self { rodeo: Rodeo::new() }
    }

    /// Intern a string, returning the existing handle if already present.
    #[inline]
    pub fn intern(&mut self, s: &str) -> Atom {
        Atom::from_spur(self.rodeo.get_or_intern(s))
    }

    /// Intern a static string without copying it.
    #[inline]
    pub fn intern_static(&mut self, s: &'static str) -> Atom {
        Atom::from_spur(self.rodeo.get_or_intern_static(s))
    }

    /// Look up an already-interned string without interning it if absent.
    #[inline]
    pub fn get(&self, s: &str) -> Option<Atom> {
        self.rodeo.get(s).map(Atom::from_spur)
    }

    /// Resolve a handle back to its text.
    #[inline]
    pub fn resolve(&self, atom: Atom) -> &str {
        self.rodeo.resolve(&atom.as_spur())
    }

    pub fn len(&self) -> usize {
        self.rodeo.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rodeo.is_empty()
    }
}

impl fmt::Debug for Interner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Interner").field("len", &self.len()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intern_and_resolve() {
        let mut interner = Interner::new();
        let a = interner.intern("value");
        let b = interner.intern("value");
        let c = interner.intern("other");
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(interner.resolve(a), "value");
        assert_eq!(interner.resolve(c), "other");
        assert_eq!(interner.len(), 2);
    }

    #[test]
    fn test_get_does_not_intern() {
        let mut interner = Interner::new();
        assert!(interner.get("x").is_none());
        let x = interner.intern_static("x");
        assert_eq!(interner.get("x"), Some(x));
    }
}
