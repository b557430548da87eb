use crate::{
    errors::errors::{Error, ErrorImpl},
    DataType, Position,
};

use super::symtable::{SymbolData, SymbolTable};

/// The chain of symbol tables for the lexically nested scopes, innermost
/// first for lookup. The global scope sits at the bottom and is never
/// removed; insertion always targets the innermost scope.
pub struct ScopeChain {
    // Innermost scope is the last element.
    scopes: Vec<SymbolTable>,
}

impl ScopeChain {
    /// A fresh chain holding only the global scope.
    pub fn new() -> Self {
        ScopeChain {
            scopes: vec![SymbolTable::new()],
        }
    }

    pub fn depth(&self) -> usize {
        self.scopes.len()
    }

    /// Opens a new innermost scope.
    pub fn push_scope(&mut self) {
        self.scopes.push(SymbolTable::new());
    }

    /// Closes the innermost local scope. The global scope stays.
    pub fn pop_scope(&mut self) {
        if self.scopes.len() > 1 {
            self.scopes.pop();
        }
    }

    /// Inserts into the innermost scope. Redeclaring a name that already
    /// exists in that scope is an error; shadowing an outer scope is not.
    pub fn insert(&mut self, name: &str, data: SymbolData) -> Result<(), Error> {
        self.scopes
            .last_mut()
            .ok_or_else(|| {
                Error::new(
                    ErrorImpl::Internal {
                        detail: String::from("scope chain is empty"),
                    },
                    Position::null(),
                )
            })?
            .insert(String::from(name), data)
    }

    /// Finds the entry for `name` in the nearest enclosing scope.
    pub fn lookup(&self, name: &str) -> Option<&SymbolData> {
        self.scopes.iter().rev().find_map(|scope| scope.search(name))
    }

    pub fn lookup_mut(&mut self, name: &str) -> Option<&mut SymbolData> {
        self.scopes
            .iter_mut()
            .rev()
            .find_map(|scope| scope.search_mut(name))
    }

    /// Whether `name` resolves to a function. Total: an unknown name is
    /// simply not a function, never an error.
    pub fn is_function(&self, name: &str) -> bool {
        self.lookup(name).is_some_and(|data| data.is_function())
    }

    /// The declared type of `name`, if it resolves at all.
    pub fn identifier_type(&self, name: &str) -> Option<DataType> {
        self.lookup(name).map(|data| data.data_type)
    }

    /// Whether `name` resolves to a defined (not merely forward-declared)
    /// symbol.
    pub fn is_defined(&self, name: &str) -> bool {
        self.lookup(name).is_some_and(|data| data.defined)
    }
}

impl Default for ScopeChain {
    fn default() -> Self {
        ScopeChain::new()
    }
}
