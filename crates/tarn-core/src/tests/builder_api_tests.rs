use crate::block::{BlockId, Terminator};
use crate::builder::FunctionBuilder;
use crate::function::Parameter;
use crate::types::Type;
use crate::values::Value;
use crate::IrError;
use pretty_assertions::assert_eq;

#[test]
fn test_new_builder_starts_in_entry() {
    let builder = FunctionBuilder::new("f", vec![], Type::Void);

    assert_eq!(builder.current_block(), Some(BlockId(0)));
    assert_eq!(builder.entry_block(), BlockId(0));
    assert_eq!(builder.function().block_count(), 1);
    assert_eq!(builder.function().body.blocks[&BlockId(0)].label, "entry");
}

#[test]
fn test_blocks_get_fresh_ids_and_labels() {
    let mut builder = FunctionBuilder::new("f", vec![], Type::Void);
    let then_block = builder.create_block("then");
    let else_block = builder.create_block("else");

    assert_eq!(then_block, BlockId(1));
    assert_eq!(else_block, BlockId(2));
    assert_eq!(builder.function().blocks_labelled("then").len(), 1);
}

#[test]
fn test_switch_to_missing_block_fails() {
    let mut builder = FunctionBuilder::new("f", vec![], Type::Void);

    let result = builder.switch_to_block(BlockId(7));
    assert!(matches!(result, Err(IrError::BuilderError(_))));
}

#[test]
fn test_double_termination_is_rejected() {
    let mut builder = FunctionBuilder::new("f", vec![], Type::Void);
    builder.ins().unwrap().return_void().unwrap();

    assert!(builder.is_terminated());
    let second = builder.ins().unwrap().return_void();
    assert!(second.is_err());
}

#[test]
fn test_build_returns_identity_function() {
    let mut builder = FunctionBuilder::new(
        "id",
        vec![Parameter::new("x", Type::I32)],
        Type::I32,
    );
    let x = builder.get_param(0);
    builder.ins().unwrap().return_value(x.clone()).unwrap();

    let function = builder.build().unwrap();
    assert_eq!(function.name(), "id");
    assert_eq!(
        function.body.blocks[&function.entry_block()].terminator,
        Terminator::Return(Some(x))
    );
}

#[test]
fn test_temps_are_numbered_in_order() {
    let mut builder = FunctionBuilder::new("f", vec![], Type::I32);
    let mut ins = builder.ins().unwrap();
    let a = ins.add(Value::int(1), Value::int(2), Type::I32);
    let b = ins.mul(a.clone(), Value::int(3), Type::I32);

    assert_eq!(a.to_string(), "t0");
    assert_eq!(b.to_string(), "t1");
}
