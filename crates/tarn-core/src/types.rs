use cranelift::codegen::ir::types as clif_types;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Machine-level value types carried by the IR.
///
/// `Bool` is the result of a comparison and never crosses a function
/// boundary; `Ptr` is the address of a read-only string buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Type {
    Bool,
    I32,
    F64,
    Ptr,
    Void,
}

impl Type {
    pub fn to_cranelift(&self, pointer_type: clif_types::Type) -> Option<clif_types::Type> {
        match self {
            Type::Bool => Some(clif_types::I8),
            Type::I32 => Some(clif_types::I32),
            Type::F64 => Some(clif_types::F64),
            Type::Ptr => Some(pointer_type),
            Type::Void => None,
        }
    }

    pub fn size_bytes(&self) -> usize {
        match self {
            Type::Bool => 1,
            Type::I32 => 4,
            Type::F64 => 8,
            Type::Ptr => 8,
            Type::Void => 0,
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, Type::I32 | Type::F64)
    }

    pub fn is_float(&self) -> bool {
        matches!(self, Type::F64)
    }

    pub fn is_void(&self) -> bool {
        matches!(self, Type::Void)
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Bool => write!(f, "bool"),
            Type::I32 => write!(f, "i32"),
            Type::F64 => write!(f, "f64"),
            Type::Ptr => write!(f, "ptr"),
            Type::Void => write!(f, "void"),
        }
    }
}
