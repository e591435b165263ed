use super::errors::{Diagnostic, TransformError};
use crate::ast::{self, Block, FunctionDecl, Type};
use indexmap::IndexMap;

/// Name the top-level block is compiled under.
pub const ENTRY_FUNCTION: &str = "main";

/// Every function declared anywhere in a program, by name.
///
/// Declarations may appear at any nesting depth and may be called before
/// they appear, so the registry is collected up front.
#[derive(Debug, Default)]
pub struct FunctionRegistry<'a> {
    functions: IndexMap<&'a str, &'a FunctionDecl>,
}

impl<'a> FunctionRegistry<'a> {
    pub fn collect(program: &'a Block) -> Result<Self, Vec<Diagnostic>> {
        let mut functions = IndexMap::new();
        let mut diagnostics = Vec::new();

        for decl in ast::nested_functions(program) {
            if decl.name == ENTRY_FUNCTION || functions.contains_key(decl.name.as_str()) {
                diagnostics.push(Diagnostic::new(
                    decl.name.as_str(),
                    decl.header(),
                    TransformError::DuplicateFunction(decl.name.clone()),
                ));
                continue;
            }
            functions.insert(decl.name.as_str(), decl);
        }

        if diagnostics.is_empty() {
            Ok(Self { functions })
        } else {
            Err(diagnostics)
        }
    }

    pub fn get(&self, name: &str) -> Option<&'a FunctionDecl> {
        self.functions.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.functions.contains_key(name)
    }

    pub fn return_type(&self, name: &str) -> Option<Type> {
        self.get(name).map(|decl| decl.returns)
    }

    pub fn len(&self) -> usize {
        self.functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a FunctionDecl> + '_ {
        self.functions.values().copied()
    }
}
