//! Arena allocation for the AST.
//!
//! All AST nodes are allocated from a bump arena owned by the caller of the
//! parser. Lists are built in a `Vec` while parsing and moved into the arena
//! once complete.

use bumpalo::Bump;

/// Move a `Vec` into the arena as a slice.
#[inline]
pub fn alloc_vec<T>(arena: &Bump, vec: Vec<T>) -> &[T] {
    if vec.is_empty() {
        return &[];
    }
    arena.alloc_slice_fill_iter(vec)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alloc_vec_moves_elements() {
        let arena = Bump::new();
        let names = vec![String::from("a"), String::from("b")];
        let slice = alloc_vec(&arena, names);
        assert_eq!(slice, &["a".to_string(), "b".to_string()][..]);
    }

    #[test]
    fn test_alloc_empty_vec() {
        let arena = Bump::new();
        let slice: &[u32] = alloc_vec(&arena, Vec::new());
        assert!(slice.is_empty());
    }
}
