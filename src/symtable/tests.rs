//! Unit tests for the symbol table and scope chain.

use super::{
    scope::ScopeChain,
    symtable::{SymbolData, SymbolTable},
};
use crate::DataType;

#[test]
fn test_insert_and_search() {
    let mut table = SymbolTable::new();

    table
        .insert("x".to_string(), SymbolData::variable(DataType::Integer))
        .unwrap();
    table
        .insert("y".to_string(), SymbolData::variable(DataType::Str))
        .unwrap();

    assert_eq!(table.search("x").unwrap().data_type, DataType::Integer);
    assert_eq!(table.search("y").unwrap().data_type, DataType::Str);
    assert!(table.search("z").is_none());
}

#[test]
fn test_insert_duplicate_is_error() {
    let mut table = SymbolTable::new();

    table
        .insert("x".to_string(), SymbolData::variable(DataType::Integer))
        .unwrap();
    let result = table.insert("x".to_string(), SymbolData::variable(DataType::Number));

    assert!(result.is_err());
    assert_eq!(
        result.err().unwrap().get_error_name(),
        "VariableAlreadyDeclared"
    );
}

#[test]
fn test_search_is_ordered() {
    // Keys on both sides of the root must stay reachable.
    let mut table = SymbolTable::new();

    for name in ["m", "d", "t", "a", "f", "p", "z"] {
        table
            .insert(name.to_string(), SymbolData::variable(DataType::Integer))
            .unwrap();
    }

    assert_eq!(table.len(), 7);
    for name in ["a", "d", "f", "m", "p", "t", "z"] {
        assert!(table.search(name).is_some(), "missing key {}", name);
    }
}

#[test]
fn test_search_mut_updates_entry() {
    let mut table = SymbolTable::new();

    let mut data = SymbolData::new();
    data.declared = true;
    table.insert("f".to_string(), data).unwrap();

    table.search_mut("f").unwrap().defined = true;

    assert!(table.search("f").unwrap().defined);
}

#[test]
fn test_param_and_return_order_is_preserved() {
    let mut data = SymbolData::new();
    data.declared = true;

    data.add_param("a".to_string(), DataType::Integer);
    data.add_param("b".to_string(), DataType::Str);
    data.add_param_type(DataType::Integer);
    data.add_param_type(DataType::Str);
    data.add_return_def(DataType::Number);
    data.add_return(DataType::Number);

    let names: Vec<&str> = data.params().iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["a", "b"]);
    assert_eq!(
        data.param_types(),
        &[DataType::Integer, DataType::Str]
    );
    assert_eq!(data.returns_def(), &[DataType::Number]);

    assert_eq!(data.params_count(), 2);
    assert_eq!(data.param_types_count(), 2);
    assert_eq!(data.returns_def_count(), 1);
    assert_eq!(data.returns_count(), 1);
}

#[test]
fn test_is_function_shape() {
    let variable = SymbolData::variable(DataType::Integer);
    assert!(!variable.is_function());

    let mut function = SymbolData::new();
    function.declared = true;
    function.add_return_def(DataType::Integer);
    assert!(function.is_function());
}

#[test]
fn test_chain_lookup_walks_outward() {
    let mut chain = ScopeChain::new();

    chain
        .insert("g", SymbolData::variable(DataType::Str))
        .unwrap();
    chain.push_scope();
    chain
        .insert("x", SymbolData::variable(DataType::Integer))
        .unwrap();

    // Inner scope sees both names.
    assert_eq!(chain.identifier_type("x"), Some(DataType::Integer));
    assert_eq!(chain.identifier_type("g"), Some(DataType::Str));
    assert_eq!(chain.identifier_type("missing"), None);
}

#[test]
fn test_chain_shadowing() {
    let mut chain = ScopeChain::new();

    chain
        .insert("x", SymbolData::variable(DataType::Str))
        .unwrap();
    chain.push_scope();
    chain
        .insert("x", SymbolData::variable(DataType::Integer))
        .unwrap();

    // The inner declaration wins while its scope is open.
    assert_eq!(chain.identifier_type("x"), Some(DataType::Integer));

    chain.pop_scope();

    // After the inner scope closes the outer declaration is visible again.
    assert_eq!(chain.identifier_type("x"), Some(DataType::Str));
}

#[test]
fn test_chain_same_scope_duplicate_is_error() {
    let mut chain = ScopeChain::new();

    chain
        .insert("x", SymbolData::variable(DataType::Integer))
        .unwrap();

    assert!(chain
        .insert("x", SymbolData::variable(DataType::Integer))
        .is_err());
}

#[test]
fn test_global_scope_is_never_popped() {
    let mut chain = ScopeChain::new();

    chain
        .insert("g", SymbolData::variable(DataType::Nil))
        .unwrap();
    chain.pop_scope();
    chain.pop_scope();

    assert_eq!(chain.depth(), 1);
    assert_eq!(chain.identifier_type("g"), Some(DataType::Nil));
}

#[test]
fn test_is_function_and_is_defined_are_total() {
    let mut chain = ScopeChain::new();

    assert!(!chain.is_function("nope"));
    assert!(!chain.is_defined("nope"));

    let mut declared_only = SymbolData::new();
    declared_only.declared = true;
    chain.insert("fwd", declared_only).unwrap();

    assert!(!chain.is_defined("fwd"));

    let mut function = SymbolData::new();
    function.declared = true;
    function.defined = true;
    function.add_param("n".to_string(), DataType::Integer);
    function.add_return_def(DataType::Integer);
    chain.insert("f", function).unwrap();

    assert!(chain.is_function("f"));
    assert!(chain.is_defined("f"));
}
