use crate::ast::Type;
use std::collections::HashMap;
use std::ops::{Deref, DerefMut};

/// Name bindings of one function, plus the return type its `return`
/// statements are checked against.
#[derive(Debug, Clone, PartialEq)]
pub struct SymbolTable {
    bindings: HashMap<String, Type>,
    returns: Type,
}

impl SymbolTable {
    pub fn new(returns: Type) -> Self {
        Self {
            bindings: HashMap::new(),
            returns,
        }
    }

    pub fn get(&self, name: &str) -> Option<Type> {
        self.bindings.get(name).copied()
    }

    pub fn returns(&self) -> Type {
        self.returns
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

/// Stack of symbol tables, innermost last.
///
/// Scope is flat per function: a declaration always lands in the table of the
/// function being checked, whatever block it appears in.
#[derive(Debug, Clone, PartialEq)]
pub struct ScopeChain {
    tables: Vec<SymbolTable>,
}

impl ScopeChain {
    /// A chain holding only the top-level table.
    pub fn new(returns: Type) -> Self {
        Self {
            tables: vec![SymbolTable::new(returns)],
        }
    }

    pub fn lookup(&self, name: &str) -> Option<Type> {
        self.tables.iter().rev().find_map(|table| table.get(name))
    }

    pub fn declare(&mut self, name: impl Into<String>, ty: Type) {
        if let Some(table) = self.tables.last_mut() {
            table.bindings.insert(name.into(), ty);
        }
    }

    /// Declared return type of the innermost function.
    pub fn returns(&self) -> Type {
        self.tables
            .last()
            .map(SymbolTable::returns)
            .unwrap_or(Type::Void)
    }

    pub fn depth(&self) -> usize {
        self.tables.len()
    }

    pub fn innermost(&self) -> Option<&SymbolTable> {
        self.tables.last()
    }

    /// Pushes a table for a function body. The table is popped when the guard
    /// goes out of scope, including on early returns.
    pub fn enter(&mut self, returns: Type) -> ScopeGuard<'_> {
        let depth = self.push(returns);
        ScopeGuard { chain: self, depth }
    }

    pub(crate) fn push(&mut self, returns: Type) -> usize {
        let depth = self.tables.len();
        self.tables.push(SymbolTable::new(returns));
        depth
    }

    pub(crate) fn truncate(&mut self, depth: usize) {
        self.tables.truncate(depth.max(1));
    }
}

pub struct ScopeGuard<'a> {
    chain: &'a mut ScopeChain,
    depth: usize,
}

impl Deref for ScopeGuard<'_> {
    type Target = ScopeChain;

    fn deref(&self) -> &ScopeChain {
        self.chain
    }
}

impl DerefMut for ScopeGuard<'_> {
    fn deref_mut(&mut self) -> &mut ScopeChain {
        self.chain
    }
}

impl Drop for ScopeGuard<'_> {
    fn drop(&mut self) {
        self.chain.truncate(self.depth);
    }
}
