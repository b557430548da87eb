//! Symbol table and scope management.
//!
//! This module holds the name registry the front end resolves identifiers
//! against:
//!
//! - `SymbolData` entries with declaration state, a data type, and ordered
//!   parameter/return descriptor lists for function signatures
//! - A per-scope binary search tree keyed on the symbol name, with nodes
//!   stored in an index arena
//! - A scope chain for shadowing-aware, innermost-first lookup

pub mod scope;
pub mod symtable;

#[cfg(test)]
mod tests;
