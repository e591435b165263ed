use crate::types::Type;
use crate::values::{Constant, Value};
use cranelift_codegen::ir::types;
use pretty_assertions::assert_eq;

#[test]
fn test_cranelift_mapping() {
    assert_eq!(Type::Bool.to_cranelift(types::I64), Some(types::I8));
    assert_eq!(Type::I32.to_cranelift(types::I64), Some(types::I32));
    assert_eq!(Type::F64.to_cranelift(types::I64), Some(types::F64));
    assert_eq!(Type::Ptr.to_cranelift(types::I64), Some(types::I64));
    assert_eq!(Type::Void.to_cranelift(types::I64), None);
}

#[test]
fn test_type_predicates() {
    assert!(Type::I32.is_numeric());
    assert!(Type::F64.is_float());
    assert!(!Type::Bool.is_float());
    assert!(Type::Void.is_void());
    assert_eq!(Type::F64.size_bytes(), 8);
}

#[test]
fn test_constant_display_and_zero() {
    assert_eq!(Value::int(-3).to_string(), "-3");
    assert_eq!(Value::float(2.0).to_string(), "2.0");
    assert_eq!(Value::bool(true).to_string(), "true");

    assert_eq!(Constant::zero(Type::F64), Some(Constant::float(0.0)));
    assert_eq!(Constant::zero(Type::Void), None);
    assert_eq!(Constant::float(1.5).as_f64(), Some(1.5));
    assert_eq!(Constant::I32(9).ty(), Type::I32);
}
