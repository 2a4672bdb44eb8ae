//! Scope tracker integration tests.
//!
//! Drives the handlers the way the parser does and checks which bindings
//! clash.

use esparse_core::intern::{Atom, Interner};
use esparse_scope::{
    BindingFlags, ClassElementKind, ClassScopeHandler, PrivateNameError, ScopeDialect, ScopeFlags, ScopeHandler,
};

fn script() -> ScopeHandler {
    let mut scope = ScopeHandler::new(false, ScopeDialect::Plain);
    scope.enter(ScopeFlags::PROGRAM);
    scope
}

fn module(dialect: ScopeDialect) -> ScopeHandler {
    let mut scope = ScopeHandler::new(true, dialect);
    scope.enter(ScopeFlags::PROGRAM);
    scope
}

fn atoms<const N: usize>(interner: &mut Interner, names: [&str; N]) -> [Atom; N] {
    names.map(|n| interner.intern(n))
}

// ============================================================================
// Redeclaration
// ============================================================================

#[test]
fn test_let_twice_is_redeclaration() {
    let mut interner = Interner::new();
    let [x] = atoms(&mut interner, ["x"]);
    let mut scope = script();
    assert!(scope.declare_name(x, BindingFlags::TYPE_LEXICAL, 4).is_ok());
    let err = scope.declare_name(x, BindingFlags::TYPE_LEXICAL, 11).unwrap_err();
    assert_eq!(err.pos, 11);
    assert_eq!(interner.resolve(err.name), "x");
}

#[test]
fn test_var_twice_is_fine() {
    let mut interner = Interner::new();
    let [x] = atoms(&mut interner, ["x"]);
    let mut scope = script();
    assert!(scope.declare_name(x, BindingFlags::TYPE_VAR, 4).is_ok());
    assert!(scope.declare_name(x, BindingFlags::TYPE_VAR, 11).is_ok());
}

#[test]
fn test_var_after_let_in_same_scope_clashes() {
    let mut interner = Interner::new();
    let [x] = atoms(&mut interner, ["x"]);
    let mut scope = script();
    scope.declare_name(x, BindingFlags::TYPE_LEXICAL, 0).unwrap();
    assert!(scope.declare_name(x, BindingFlags::TYPE_VAR, 10).is_err());
}

#[test]
fn test_var_in_block_hoists_past_outer_let() {
    let mut interner = Interner::new();
    let [x] = atoms(&mut interner, ["x"]);
    let mut scope = script();
    scope.declare_name(x, BindingFlags::TYPE_LEXICAL, 0).unwrap();
    scope.enter(ScopeFlags::OTHER);
    assert!(scope.declare_name(x, BindingFlags::TYPE_VAR, 20).is_err());
}

#[test]
fn test_let_in_inner_block_shadows() {
    let mut interner = Interner::new();
    let [x] = atoms(&mut interner, ["x"]);
    let mut scope = script();
    scope.declare_name(x, BindingFlags::TYPE_LEXICAL, 0).unwrap();
    scope.enter(ScopeFlags::OTHER);
    assert!(scope.declare_name(x, BindingFlags::TYPE_LEXICAL, 20).is_ok());
}

#[test]
fn test_var_stops_at_function_boundary() {
    let mut interner = Interner::new();
    let [x] = atoms(&mut interner, ["x"]);
    let mut scope = script();
    scope.declare_name(x, BindingFlags::TYPE_LEXICAL, 0).unwrap();
    scope.enter(ScopeFlags::FUNCTION);
    assert!(scope.declare_name(x, BindingFlags::TYPE_VAR, 20).is_ok());
}

#[test]
fn test_functions_are_var_like_in_script_top_level_only() {
    let mut interner = Interner::new();
    let [f] = atoms(&mut interner, ["f"]);

    let mut sloppy = script();
    sloppy.declare_name(f, BindingFlags::TYPE_FUNCTION, 0).unwrap();
    assert!(sloppy.declare_name(f, BindingFlags::TYPE_FUNCTION, 20).is_ok());
    assert!(sloppy.declare_name(f, BindingFlags::TYPE_VAR, 40).is_ok());

    let mut in_module = module(ScopeDialect::Plain);
    in_module.declare_name(f, BindingFlags::TYPE_FUNCTION, 0).unwrap();
    assert!(in_module.declare_name(f, BindingFlags::TYPE_VAR, 20).is_err());

    let mut block = script();
    block.enter(ScopeFlags::OTHER);
    block.declare_name(f, BindingFlags::TYPE_FUNCTION, 0).unwrap();
    assert!(block.declare_name(f, BindingFlags::TYPE_FUNCTION, 20).is_ok());
    assert!(block.declare_name(f, BindingFlags::TYPE_LEXICAL, 40).is_err());
}

#[test]
fn test_catch_param_clashes_with_let_in_body() {
    let mut interner = Interner::new();
    let [e] = atoms(&mut interner, ["e"]);
    let mut scope = script();
    scope.enter(ScopeFlags::SIMPLE_CATCH);
    scope.declare_name(e, BindingFlags::TYPE_CATCH_PARAM, 7).unwrap();
    assert!(scope.declare_name(e, BindingFlags::TYPE_LEXICAL, 15).is_err());
    assert!(scope.declare_name(e, BindingFlags::TYPE_VAR, 25).is_ok());
}

#[test]
fn test_outside_bindings_are_not_recorded() {
    let mut interner = Interner::new();
    let [x] = atoms(&mut interner, ["x"]);
    let mut scope = script();
    scope.declare_name(x, BindingFlags::TYPE_OUTSIDE, 0).unwrap();
    assert!(scope.declare_name(x, BindingFlags::TYPE_LEXICAL, 5).is_ok());
}

// ============================================================================
// Context queries
// ============================================================================

#[test]
fn test_this_scope_skips_arrows() {
    let mut scope = script();
    scope.enter(ScopeFlags::for_function(false, true, false));
    scope.enter(ScopeFlags::for_function(true, false, false));
    assert!(scope.allow_super());
    assert!(scope.in_function());
    assert!(scope.in_non_arrow_function());
    assert!(!scope.allow_direct_super());
}

#[test]
fn test_class_field_context() {
    let mut scope = script();
    scope.enter(ScopeFlags::CLASS | ScopeFlags::SUPER);
    assert!(scope.in_class());
    assert!(scope.in_class_and_not_in_non_arrow_function());
    scope.enter(ScopeFlags::FUNCTION | ScopeFlags::SUPER);
    assert!(!scope.in_class_and_not_in_non_arrow_function());
}

// ============================================================================
// Exports
// ============================================================================

#[test]
fn test_export_before_declaration_resolves() {
    let mut interner = Interner::new();
    let [a, b] = atoms(&mut interner, ["a", "b"]);
    let mut scope = module(ScopeDialect::Plain);
    scope.check_local_export(a, 9);
    scope.check_local_export(b, 12);
    scope.declare_name(a, BindingFlags::TYPE_LEXICAL, 30).unwrap();
    let missing: Vec<_> = scope.undefined_exports().collect();
    assert_eq!(missing, vec![(b, 12)]);
}

#[test]
fn test_export_of_inner_declaration_stays_undefined() {
    let mut interner = Interner::new();
    let [a] = atoms(&mut interner, ["a"]);
    let mut scope = module(ScopeDialect::Plain);
    scope.check_local_export(a, 9);
    scope.enter(ScopeFlags::OTHER);
    scope.declare_name(a, BindingFlags::TYPE_LEXICAL, 30).unwrap();
    scope.exit();
    assert!(scope.has_undefined_exports());
}

#[test]
fn test_typescript_type_exports_are_defined() {
    let mut interner = Interner::new();
    let [t] = atoms(&mut interner, ["T"]);
    let mut scope = module(ScopeDialect::TypeScript);
    scope.declare_name(t, BindingFlags::TYPE_TS_TYPE, 5).unwrap();
    scope.check_local_export(t, 20);
    assert!(!scope.has_undefined_exports());
}

#[test]
fn test_typescript_interface_merges_with_class() {
    let mut interner = Interner::new();
    let [c, t] = atoms(&mut interner, ["C", "T"]);
    let mut scope = module(ScopeDialect::TypeScript);
    scope.declare_name(c, BindingFlags::TYPE_TS_INTERFACE, 0).unwrap();
    assert!(scope.declare_name(c, BindingFlags::TYPE_CLASS, 20).is_ok());
    scope.declare_name(t, BindingFlags::TYPE_TS_TYPE, 40).unwrap();
    assert!(scope.declare_name(t, BindingFlags::TYPE_TS_TYPE, 60).is_err());
}

#[test]
fn test_typescript_enum_merging_requires_same_constness() {
    let mut interner = Interner::new();
    let [e] = atoms(&mut interner, ["E"]);
    let mut scope = module(ScopeDialect::TypeScript);
    scope.declare_name(e, BindingFlags::TYPE_TS_ENUM, 0).unwrap();
    assert!(scope.declare_name(e, BindingFlags::TYPE_TS_ENUM, 20).is_ok());
    assert!(scope.declare_name(e, BindingFlags::TYPE_TS_CONST_ENUM, 40).is_err());
}

#[test]
fn test_flow_declare_function_then_function() {
    let mut interner = Interner::new();
    let [f] = atoms(&mut interner, ["f"]);
    let mut scope = module(ScopeDialect::Flow);
    scope.declare_name(f, BindingFlags::TYPE_FLOW_DECLARE_FN, 0).unwrap();
    assert!(scope.declare_name(f, BindingFlags::TYPE_FUNCTION, 30).is_ok());
}

// ============================================================================
// Private names
// ============================================================================

#[test]
fn test_private_name_resolves_through_nested_classes() {
    let mut interner = Interner::new();
    let [p] = atoms(&mut interner, ["p"]);
    let mut classes = ClassScopeHandler::new();
    classes.enter();
    classes.enter();
    classes.use_private_name(p, 40).unwrap();
    assert!(classes.exit().is_empty());
    classes.declare_private_name(p, ClassElementKind::OTHER, 60).unwrap();
    assert!(classes.exit().is_empty());
}

#[test]
fn test_unresolved_private_name_reported_at_outermost_exit() {
    let mut interner = Interner::new();
    let [p, q] = atoms(&mut interner, ["p", "q"]);
    let mut classes = ClassScopeHandler::new();
    classes.enter();
    classes.use_private_name(p, 10).unwrap();
    classes.use_private_name(q, 20).unwrap();
    classes.use_private_name(p, 30).unwrap();
    let errors = classes.exit();
    assert_eq!(
        errors,
        vec![
            PrivateNameError::Unresolved { name: p, pos: 10 },
            PrivateNameError::Unresolved { name: q, pos: 20 },
        ]
    );
}

#[test]
fn test_private_name_outside_class_is_immediate_error() {
    let mut interner = Interner::new();
    let [p] = atoms(&mut interner, ["p"]);
    let mut classes = ClassScopeHandler::new();
    assert_eq!(
        classes.use_private_name(p, 3),
        Err(PrivateNameError::Unresolved { name: p, pos: 3 })
    );
}
