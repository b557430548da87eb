use std::cmp::Ordering;

use crate::{
    errors::errors::{Error, ErrorImpl},
    DataType, Position,
};

/// A named parameter descriptor. Order within a signature is positional and
/// semantically significant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Param {
    pub name: String,
    pub param_type: DataType,
}

/// The data attached to one symbol: declaration state, a data type for plain
/// variables, and the four ordered signature lists a function accumulates.
/// Declared and supplied parameter/return lists are kept separately so that
/// arity/type mismatches between a declaration and its uses can be detected
/// before a call site is fully parsed.
#[derive(Debug, Clone, Default)]
pub struct SymbolData {
    pub declared: bool,
    pub defined: bool,
    pub data_type: DataType,
    params: Vec<Param>,
    param_types: Vec<DataType>,
    returns_def: Vec<DataType>,
    returns: Vec<DataType>,
}

impl SymbolData {
    pub fn new() -> Self {
        SymbolData::default()
    }

    /// A declared and defined plain variable of the given type.
    pub fn variable(data_type: DataType) -> Self {
        SymbolData {
            declared: true,
            defined: true,
            data_type,
            ..SymbolData::default()
        }
    }

    pub fn add_param(&mut self, name: String, param_type: DataType) {
        self.params.push(Param { name, param_type });
    }

    pub fn add_param_type(&mut self, param_type: DataType) {
        self.param_types.push(param_type);
    }

    pub fn add_return_def(&mut self, return_type: DataType) {
        self.returns_def.push(return_type);
    }

    pub fn add_return(&mut self, return_type: DataType) {
        self.returns.push(return_type);
    }

    pub fn params(&self) -> &[Param] {
        &self.params
    }

    pub fn param_types(&self) -> &[DataType] {
        &self.param_types
    }

    pub fn returns_def(&self) -> &[DataType] {
        &self.returns_def
    }

    pub fn returns(&self) -> &[DataType] {
        &self.returns
    }

    pub fn params_count(&self) -> usize {
        self.params.len()
    }

    pub fn param_types_count(&self) -> usize {
        self.param_types.len()
    }

    pub fn returns_def_count(&self) -> usize {
        self.returns_def.len()
    }

    pub fn returns_count(&self) -> usize {
        self.returns.len()
    }

    /// A name denotes a function when any signature list is populated;
    /// a plain variable keeps all four lists empty.
    pub fn is_function(&self) -> bool {
        !self.params.is_empty()
            || !self.param_types.is_empty()
            || !self.returns_def.is_empty()
            || !self.returns.is_empty()
    }
}

struct TreeNode {
    key: String,
    data: SymbolData,
    left: Option<usize>,
    right: Option<usize>,
}

/// One scope's symbol registry: a binary search tree ordered
/// lexicographically on the key. Nodes live in an index arena, so disposing
/// the whole scope is a plain drop. Duplicate keys within one scope are
/// rejected; shadowing is the scope chain's concern.
pub struct SymbolTable {
    nodes: Vec<TreeNode>,
    root: Option<usize>,
}

impl SymbolTable {
    pub fn new() -> Self {
        SymbolTable {
            nodes: vec![],
            root: None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn insert(&mut self, key: String, data: SymbolData) -> Result<(), Error> {
        let new_index = self.nodes.len();

        match self.root {
            None => {
                self.nodes.push(TreeNode {
                    key,
                    data,
                    left: None,
                    right: None,
                });
                self.root = Some(new_index);
                Ok(())
            }
            Some(mut current) => loop {
                match key.cmp(&self.nodes[current].key) {
                    Ordering::Equal => {
                        return Err(Error::new(
                            ErrorImpl::VariableAlreadyDeclared { variable: key },
                            Position::null(),
                        ));
                    }
                    Ordering::Less => match self.nodes[current].left {
                        Some(left) => current = left,
                        None => {
                            self.nodes.push(TreeNode {
                                key,
                                data,
                                left: None,
                                right: None,
                            });
                            self.nodes[current].left = Some(new_index);
                            return Ok(());
                        }
                    },
                    Ordering::Greater => match self.nodes[current].right {
                        Some(right) => current = right,
                        None => {
                            self.nodes.push(TreeNode {
                                key,
                                data,
                                left: None,
                                right: None,
                            });
                            self.nodes[current].right = Some(new_index);
                            return Ok(());
                        }
                    },
                }
            },
        }
    }

    fn find(&self, key: &str) -> Option<usize> {
        let mut current = self.root;
        while let Some(index) = current {
            let node = &self.nodes[index];
            match key.cmp(node.key.as_str()) {
                Ordering::Equal => return Some(index),
                Ordering::Less => current = node.left,
                Ordering::Greater => current = node.right,
            }
        }
        None
    }

    pub fn search(&self, key: &str) -> Option<&SymbolData> {
        self.find(key).map(|index| &self.nodes[index].data)
    }

    pub fn search_mut(&mut self, key: &str) -> Option<&mut SymbolData> {
        self.find(key).map(|index| &mut self.nodes[index].data)
    }
}

impl Default for SymbolTable {
    fn default() -> Self {
        SymbolTable::new()
    }
}
