//! Flag sets describing scopes, bindings, class elements and grammar
//! parameters.

use bitflags::bitflags;

bitflags! {
    /// What kind of construct opened a scope.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct ScopeFlags: u16 {
        const OTHER        = 0;
        const PROGRAM      = 1 << 0;
        const FUNCTION     = 1 << 1;
        const ARROW        = 1 << 2;
        /// A `catch (e)` clause whose parameter is a plain identifier.
        const SIMPLE_CATCH = 1 << 3;
        /// `super.x` is allowed.
        const SUPER        = 1 << 4;
        /// `super()` is allowed.
        const DIRECT_SUPER = 1 << 5;
        const CLASS        = 1 << 6;
        const STATIC_BLOCK = 1 << 7;
        const TS_MODULE    = 1 << 8;

        /// Scopes that own `var` declarations.
        const VAR = Self::PROGRAM.bits()
            | Self::FUNCTION.bits()
            | Self::STATIC_BLOCK.bits()
            | Self::TS_MODULE.bits();
    }
}

impl ScopeFlags {
    #[inline]
    pub fn is_var_scope(self) -> bool {
        self.intersects(ScopeFlags::VAR)
    }

    /// Scopes that define `this`: var scopes and class bodies, but not
    /// arrows.
    #[inline]
    pub fn is_this_scope(self) -> bool {
        self.intersects(ScopeFlags::VAR | ScopeFlags::CLASS) && !self.contains(ScopeFlags::ARROW)
    }

    /// Flags for a function body.
    pub fn for_function(is_arrow: bool, allow_super: bool, allow_direct_super: bool) -> Self {
        let mut flags = ScopeFlags::FUNCTION;
        if is_arrow {
            flags |= ScopeFlags::ARROW;
        }
        if allow_super {
            flags |= ScopeFlags::SUPER;
        }
        if allow_direct_super {
            flags |= ScopeFlags::DIRECT_SUPER;
        }
        flags
    }
}

bitflags! {
    /// How a name is being bound.
    ///
    /// The low bits say which namespace (value, type) and which scope rule
    /// (var, lexical, function) apply; the high bits carry dialect details.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct BindingFlags: u16 {
        const KIND_VALUE           = 1 << 0;
        const KIND_TYPE            = 1 << 1;
        const SCOPE_VAR            = 1 << 2;
        const SCOPE_LEXICAL        = 1 << 3;
        const SCOPE_FUNCTION       = 1 << 4;
        const SCOPE_OUTSIDE        = 1 << 5;
        /// Checked for validity but never recorded.
        const FLAG_NONE            = 1 << 6;
        const FLAG_CLASS           = 1 << 7;
        const FLAG_TS_ENUM         = 1 << 8;
        const FLAG_TS_CONST_ENUM   = 1 << 9;
        const FLAG_TS_EXPORT_ONLY  = 1 << 10;
        const FLAG_FLOW_DECLARE_FN = 1 << 11;
        const FLAG_TS_IMPORT       = 1 << 12;
        /// `let` may not be the bound name.
        const FLAG_NO_LET_IN_LEXICAL = 1 << 13;

        const TYPE_CLASS = Self::KIND_VALUE.bits()
            | Self::KIND_TYPE.bits()
            | Self::SCOPE_LEXICAL.bits()
            | Self::FLAG_CLASS.bits()
            | Self::FLAG_NO_LET_IN_LEXICAL.bits();
        const TYPE_LEXICAL = Self::KIND_VALUE.bits()
            | Self::SCOPE_LEXICAL.bits()
            | Self::FLAG_NO_LET_IN_LEXICAL.bits();
        const TYPE_CATCH_PARAM = Self::KIND_VALUE.bits() | Self::SCOPE_LEXICAL.bits();
        const TYPE_VAR = Self::KIND_VALUE.bits() | Self::SCOPE_VAR.bits();
        const TYPE_FUNCTION = Self::KIND_VALUE.bits() | Self::SCOPE_FUNCTION.bits();
        const TYPE_TS_INTERFACE = Self::KIND_TYPE.bits() | Self::FLAG_CLASS.bits();
        const TYPE_TS_TYPE = Self::KIND_TYPE.bits();
        const TYPE_TS_ENUM = Self::KIND_VALUE.bits()
            | Self::KIND_TYPE.bits()
            | Self::SCOPE_LEXICAL.bits()
            | Self::FLAG_TS_ENUM.bits()
            | Self::FLAG_NO_LET_IN_LEXICAL.bits();
        const TYPE_TS_CONST_ENUM = Self::TYPE_TS_ENUM.bits() | Self::FLAG_TS_CONST_ENUM.bits();
        const TYPE_TS_AMBIENT = Self::FLAG_TS_EXPORT_ONLY.bits();
        const TYPE_TS_NAMESPACE = Self::FLAG_TS_EXPORT_ONLY.bits();
        const TYPE_TS_TYPE_IMPORT = Self::KIND_TYPE.bits() | Self::FLAG_TS_IMPORT.bits();
        const TYPE_TS_VALUE_IMPORT = Self::FLAG_TS_IMPORT.bits();
        const TYPE_NONE = Self::FLAG_NONE.bits();
        const TYPE_OUTSIDE = Self::KIND_VALUE.bits() | Self::FLAG_NONE.bits();
        const TYPE_FLOW_DECLARE_FN = Self::FLAG_FLOW_DECLARE_FN.bits();
    }
}

impl BindingFlags {
    #[inline]
    pub fn is_value(self) -> bool {
        self.contains(BindingFlags::KIND_VALUE)
    }

    #[inline]
    pub fn is_type(self) -> bool {
        self.contains(BindingFlags::KIND_TYPE)
    }

    #[inline]
    pub fn is_lexical(self) -> bool {
        self.contains(BindingFlags::SCOPE_LEXICAL)
    }

    #[inline]
    pub fn is_function(self) -> bool {
        self.contains(BindingFlags::SCOPE_FUNCTION)
    }

    #[inline]
    pub fn is_var(self) -> bool {
        self.contains(BindingFlags::SCOPE_VAR)
    }

    /// Validated as a binding but not recorded in any scope.
    #[inline]
    pub fn is_unrecorded(self) -> bool {
        self.contains(BindingFlags::FLAG_NONE)
    }
}

bitflags! {
    /// The kind of a private class element, for accessor pairing.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct ClassElementKind: u8 {
        const OTHER       = 0;
        const FLAG_STATIC = 1 << 0;
        const KIND_GETTER = 1 << 1;
        const KIND_SETTER = 1 << 2;
        const KIND_ACCESSOR = Self::KIND_GETTER.bits() | Self::KIND_SETTER.bits();

        const STATIC_GETTER = Self::FLAG_STATIC.bits() | Self::KIND_GETTER.bits();
        const STATIC_SETTER = Self::FLAG_STATIC.bits() | Self::KIND_SETTER.bits();
    }
}

impl ClassElementKind {
    #[inline]
    pub fn is_static(self) -> bool {
        self.contains(ClassElementKind::FLAG_STATIC)
    }

    #[inline]
    pub fn is_accessor(self) -> bool {
        self.intersects(ClassElementKind::KIND_ACCESSOR)
    }

    /// The getter/setter part without the static bit.
    #[inline]
    pub fn accessor_kind(self) -> ClassElementKind {
        self & ClassElementKind::KIND_ACCESSOR
    }
}

bitflags! {
    /// Grammar parameters of the enclosing production.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct ParamFlags: u8 {
        const NONE   = 0;
        /// Inside a generator: `yield` is an operator.
        const YIELD  = 1 << 0;
        /// Inside an async function: `await` is an operator.
        const AWAIT  = 1 << 1;
        const RETURN = 1 << 2;
        /// `in` is a binary operator (false in a for-loop head).
        const IN     = 1 << 3;
    }
}

impl ParamFlags {
    /// Parameters for a function body.
    pub fn for_function(is_async: bool, is_generator: bool) -> Self {
        let mut flags = ParamFlags::NONE;
        if is_async {
            flags |= ParamFlags::AWAIT;
        }
        if is_generator {
            flags |= ParamFlags::YIELD;
        }
        flags
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_var_scope_membership() {
        assert!(ScopeFlags::PROGRAM.is_var_scope());
        assert!(ScopeFlags::STATIC_BLOCK.is_var_scope());
        assert!(!ScopeFlags::CLASS.is_var_scope());
        assert!(!(ScopeFlags::FUNCTION | ScopeFlags::ARROW).is_this_scope());
        assert!(ScopeFlags::CLASS.is_this_scope());
    }

    #[test]
    fn test_binding_composites() {
        assert!(BindingFlags::TYPE_CLASS.is_value());
        assert!(BindingFlags::TYPE_CLASS.is_type());
        assert!(BindingFlags::TYPE_CLASS.is_lexical());
        assert!(!BindingFlags::TYPE_TS_INTERFACE.is_value());
        assert!(BindingFlags::TYPE_OUTSIDE.is_unrecorded());
        assert!(BindingFlags::TYPE_TS_CONST_ENUM.contains(BindingFlags::FLAG_TS_ENUM));
    }

    #[test]
    fn test_accessor_kind_strips_static() {
        assert_eq!(ClassElementKind::STATIC_GETTER.accessor_kind(), ClassElementKind::KIND_GETTER);
        assert!(ClassElementKind::STATIC_SETTER.is_static());
        assert!(!ClassElementKind::OTHER.is_accessor());
    }

    #[test]
    fn test_function_param_flags() {
        assert_eq!(ParamFlags::for_function(true, true), ParamFlags::AWAIT | ParamFlags::YIELD);
        assert_eq!(ParamFlags::for_function(false, false), ParamFlags::NONE);
    }
}
