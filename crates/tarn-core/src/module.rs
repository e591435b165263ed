use crate::function::Function;
use crate::types::Type;
use crate::values::StringId;
use crate::{IrError, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A function provided by the runtime and linked by name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExternalFunction {
    pub name: String,
    pub params: Vec<Type>,
    pub returns: Type,
    pub is_variadic: bool,
}

impl ExternalFunction {
    pub fn new(name: impl Into<String>, params: Vec<Type>, returns: Type) -> Self {
        Self {
            name: name.into(),
            params,
            returns,
            is_variadic: false,
        }
    }

    pub fn variadic(mut self) -> Self {
        self.is_variadic = true;
        self
    }

    pub fn fixed_arity(&self) -> usize {
        self.params.len()
    }

    pub fn accepts_arity(&self, count: usize) -> bool {
        if self.is_variadic {
            count >= self.params.len()
        } else {
            count == self.params.len()
        }
    }
}

/// One compilation unit: defined functions, linked externals and the
/// read-only string buffers referenced by `Value::Str`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Module {
    pub name: String,
    pub functions: IndexMap<String, Function>,
    pub externals: IndexMap<String, ExternalFunction>,
    pub strings: Vec<String>,
}

impl Module {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            functions: IndexMap::new(),
            externals: IndexMap::new(),
            strings: Vec::new(),
        }
    }

    /// A module with every runtime prototype already declared.
    pub fn with_runtime(name: impl Into<String>) -> Self {
        let mut module = Self::new(name);
        for external in crate::runtime::prototypes() {
            module.declare_external(external);
        }
        module
    }

    pub fn declare_external(&mut self, external: ExternalFunction) {
        if self.functions.contains_key(&external.name) {
            return;
        }
        self.externals.insert(external.name.clone(), external);
    }

    /// Adds a defined function. A definition shadows an external of the same name.
    pub fn add_function(&mut self, function: Function) -> Result<()> {
        let name = function.name().to_string();
        if self.functions.contains_key(&name) {
            return Err(IrError::DuplicateFunction(name));
        }
        self.externals.shift_remove(&name);
        self.functions.insert(name, function);
        Ok(())
    }

    pub fn get_function(&self, name: &str) -> Option<&Function> {
        self.functions.get(name)
    }

    pub fn lookup_external_function(&self, name: &str) -> Option<&ExternalFunction> {
        self.externals.get(name)
    }

    pub fn add_string(&mut self, text: impl Into<String>) -> StringId {
        let id = StringId(self.strings.len() as u32);
        self.strings.push(text.into());
        id
    }

    pub fn string(&self, id: StringId) -> Option<&str> {
        self.strings.get(id.0 as usize).map(String::as_str)
    }

    pub fn strings(&self) -> impl Iterator<Item = (StringId, &str)> {
        self.strings
            .iter()
            .enumerate()
            .map(|(i, s)| (StringId(i as u32), s.as_str()))
    }
}
