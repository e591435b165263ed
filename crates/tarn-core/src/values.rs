use crate::types::Type;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Value {
    Temp(TempId),
    Param(ParamId),
    Constant(Constant),
    Str(StringId),
}

impl Value {
    pub fn is_constant(&self) -> bool {
        matches!(self, Value::Constant(_))
    }

    pub fn as_constant(&self) -> Option<&Constant> {
        match self {
            Value::Constant(c) => Some(c),
            _ => None,
        }
    }

    pub fn int(value: i32) -> Self {
        Value::Constant(Constant::I32(value))
    }

    pub fn float(value: f64) -> Self {
        Value::Constant(Constant::float(value))
    }

    pub fn bool(value: bool) -> Self {
        Value::Constant(Constant::Bool(value))
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Temp(id) => write!(f, "{}", id),
            Value::Param(id) => write!(f, "{}", id),
            Value::Constant(c) => write!(f, "{}", c),
            Value::Str(id) => write!(f, "{}", id),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TempId(pub u32);

impl std::fmt::Display for TempId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "t{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ParamId(pub u32);

impl std::fmt::Display for ParamId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "p{}", self.0)
    }
}

/// A fixed-size storage cell created by an `alloca`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SlotId(pub u32);

impl std::fmt::Display for SlotId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "slot{}", self.0)
    }
}

/// Index into the module's string table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct StringId(pub u32);

impl StringId {
    pub fn symbol(&self) -> String {
        format!("_str{}", self.0)
    }
}

impl std::fmt::Display for StringId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "@{}", self.symbol())
    }
}

/// Immediate operands. Floats are kept as raw bits so constants stay hashable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Constant {
    Bool(bool),
    I32(i32),
    F64(u64),
}

impl Constant {
    pub fn float(value: f64) -> Self {
        Constant::F64(value.to_bits())
    }

    pub fn zero(ty: Type) -> Option<Self> {
        match ty {
            Type::Bool => Some(Constant::Bool(false)),
            Type::I32 => Some(Constant::I32(0)),
            Type::F64 => Some(Constant::float(0.0)),
            Type::Ptr | Type::Void => None,
        }
    }

    pub fn ty(&self) -> Type {
        match self {
            Constant::Bool(_) => Type::Bool,
            Constant::I32(_) => Type::I32,
            Constant::F64(_) => Type::F64,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Constant::F64(bits) => Some(f64::from_bits(*bits)),
            _ => None,
        }
    }

    pub fn as_i32(&self) -> Option<i32> {
        match self {
            Constant::I32(v) => Some(*v),
            _ => None,
        }
    }
}

impl std::fmt::Display for Constant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Constant::Bool(b) => write!(f, "{}", b),
            Constant::I32(v) => write!(f, "{}", v),
            Constant::F64(bits) => write!(f, "{:?}", f64::from_bits(*bits)),
        }
    }
}
