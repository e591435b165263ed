use super::{func, program};
use crate::ast::{Block, Expr, Stmt, Type};
use crate::ast_to_ir::{FunctionRegistry, ScopeChain, TransformError};
use pretty_assertions::assert_eq;

#[test]
fn test_lookup_prefers_innermost() {
    let mut chain = ScopeChain::new(Type::Int32);
    chain.declare("x", Type::Int32);

    {
        let mut inner = chain.enter(Type::Float64);
        assert_eq!(inner.lookup("x"), Some(Type::Int32));

        inner.declare("x", Type::Str);
        assert_eq!(inner.lookup("x"), Some(Type::Str));
        assert_eq!(inner.returns(), Type::Float64);
        assert_eq!(inner.depth(), 2);
    }

    assert_eq!(chain.depth(), 1);
    assert_eq!(chain.lookup("x"), Some(Type::Int32));
    assert_eq!(chain.returns(), Type::Int32);
}

#[test]
fn test_guard_pops_on_early_exit() {
    fn fails(chain: &mut ScopeChain) -> Result<(), TransformError> {
        let mut inner = chain.enter(Type::Void);
        inner.declare("tmp", Type::Int32);
        Err(TransformError::UnboundName("tmp".to_string()))
    }

    let mut chain = ScopeChain::new(Type::Int32);
    assert!(fails(&mut chain).is_err());
    assert_eq!(chain.depth(), 1);
    assert_eq!(chain.lookup("tmp"), None);
}

#[test]
fn test_top_level_table_never_dropped() {
    let mut chain = ScopeChain::new(Type::Int32);
    chain.declare("g", Type::Float64);
    chain.push(Type::Void);
    chain.truncate(0);

    assert_eq!(chain.depth(), 1);
    assert_eq!(chain.lookup("g"), Some(Type::Float64));
}

#[test]
fn test_redeclaration_replaces_binding() {
    let mut chain = ScopeChain::new(Type::Int32);
    chain.declare("v", Type::Int32);
    chain.declare("v", Type::Str);

    let table = chain.innermost().unwrap();
    assert_eq!(table.len(), 1);
    assert_eq!(table.get("v"), Some(Type::Str));
}

#[test]
fn test_registry_collects_nested_functions() {
    let program = program(vec![
        func(
            "outer",
            &[],
            Type::Int32,
            vec![
                func("inner", &[], Type::Float64, vec![Stmt::expr(Expr::double(1.0))]),
                Stmt::ret(Some(Expr::int(0))),
            ],
        ),
        Stmt::if_else(
            Expr::int(1),
            Block::new(vec![func("branchy", &[], Type::Void, vec![])]),
            None,
        ),
    ]);

    let registry = FunctionRegistry::collect(&program).unwrap();
    let names: Vec<&str> = registry.iter().map(|decl| decl.name.as_str()).collect();
    assert_eq!(names, vec!["outer", "inner", "branchy"]);
    assert_eq!(registry.return_type("inner"), Some(Type::Float64));
    assert!(registry.contains("branchy"));
    assert!(!registry.contains("printi"));
}

#[test]
fn test_registry_reports_every_duplicate() {
    let program = program(vec![
        func("a", &[], Type::Void, vec![]),
        func("a", &[], Type::Void, vec![]),
        func("main", &[], Type::Int32, vec![Stmt::ret(Some(Expr::int(0)))]),
    ]);

    let diagnostics = FunctionRegistry::collect(&program).unwrap_err();
    let errors: Vec<TransformError> = diagnostics.into_iter().map(|d| d.error).collect();
    assert_eq!(
        errors,
        vec![
            TransformError::DuplicateFunction("a".to_string()),
            TransformError::DuplicateFunction("main".to_string()),
        ]
    );
}
