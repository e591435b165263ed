//! Prototypes of the functions generated code may call without defining them.

use crate::module::ExternalFunction;
use crate::types::Type;

pub const PRINTI: &str = "printi";
pub const PRINTD: &str = "printd";
pub const PRINT: &str = "print";
pub const PRINTLN: &str = "println";
pub const READI: &str = "readi";
pub const READD: &str = "readd";
pub const READLINE: &str = "readline";
pub const FABS: &str = "fabs";
pub const POW: &str = "pow";
pub const SQRT: &str = "sqrt";
pub const SIN: &str = "sin";
pub const COS: &str = "cos";
pub const PI: &str = "pi";

pub fn prototypes() -> Vec<ExternalFunction> {
    vec![
        ExternalFunction::new(PRINTI, vec![Type::I32], Type::I32),
        ExternalFunction::new(PRINTD, vec![Type::F64], Type::I32),
        ExternalFunction::new(PRINT, vec![Type::Ptr], Type::I32).variadic(),
        ExternalFunction::new(PRINTLN, vec![Type::Ptr], Type::I32).variadic(),
        ExternalFunction::new(READI, vec![], Type::I32),
        ExternalFunction::new(READD, vec![], Type::F64),
        ExternalFunction::new(READLINE, vec![], Type::Ptr),
        ExternalFunction::new(FABS, vec![Type::F64], Type::F64),
        ExternalFunction::new(POW, vec![Type::F64, Type::F64], Type::F64),
        ExternalFunction::new(SQRT, vec![Type::F64], Type::F64),
        ExternalFunction::new(SIN, vec![Type::F64], Type::F64),
        ExternalFunction::new(COS, vec![Type::F64], Type::F64),
        ExternalFunction::new(PI, vec![], Type::F64),
    ]
}

pub fn lookup(name: &str) -> Option<ExternalFunction> {
    prototypes().into_iter().find(|p| p.name == name)
}
