use super::{bin, block_labelled, call, entry, func, lower, program};
use crate::ast::{BinaryOp, Block, Expr, Stmt, Type};
use crate::ast_to_ir::{
    lower_program, transform_ast_to_ir, Diagnostic, TransformError, ELSE, IF_CONT, LOOP_BODY,
    LOOP_COND, LOOP_EXIT, THEN,
};
use pretty_assertions::assert_eq;
use tarn_core::{Instruction, Terminator, Type as IrType, Value};

fn counting_loop(body: Vec<Stmt>) -> Block {
    program(vec![
        Stmt::var("i", Type::Int32, None),
        Stmt::for_loop(
            vec![Expr::assign("i", Expr::int(0))],
            bin(BinaryOp::Lt, Expr::ident("i"), Expr::int(3)),
            vec![Expr::assign(
                "i",
                bin(BinaryOp::Add, Expr::ident("i"), Expr::int(1)),
            )],
            Block::new(body),
        ),
    ])
}

#[test]
fn test_top_level_becomes_main() {
    let module = lower(&program(vec![Stmt::var("x", Type::Int32, Some(Expr::int(1)))]));

    let main = module.get_function("main").unwrap();
    assert_eq!(main.signature.returns, IrType::I32);
    assert!(main.signature.params.is_empty());
    assert_eq!(main.block_count(), 1);
    assert_eq!(entry(main).terminator, Terminator::Return(Some(Value::int(0))));
}

#[test]
fn test_mixed_operands_cast_before_add() {
    let module = lower(&program(vec![func(
        "f",
        &[],
        Type::Float64,
        vec![Stmt::ret(Some(bin(
            BinaryOp::Add,
            Expr::int(1),
            Expr::double(2.5),
        )))],
    )]));

    let f = module.get_function("f").unwrap();
    let insts = &entry(f).instructions;
    assert_eq!(insts.len(), 2);
    assert!(matches!(
        &insts[0],
        Instruction::Cast {
            from: IrType::I32,
            to: IrType::F64,
            ..
        }
    ));
    assert!(matches!(&insts[1], Instruction::Add { ty: IrType::F64, .. }));
}

#[test]
fn test_if_emits_three_blocks() {
    let module = lower(&program(vec![
        Stmt::var("x", Type::Int32, Some(Expr::int(1))),
        Stmt::if_else(
            Expr::ident("x"),
            Block::new(vec![Stmt::expr(Expr::assign("x", Expr::int(2)))]),
            None,
        ),
    ]));

    let main = module.get_function("main").unwrap();
    assert_eq!(main.block_count(), 4);

    let then_block = block_labelled(main, THEN);
    let else_block = block_labelled(main, ELSE);
    let merge = block_labelled(main, IF_CONT);

    assert!(then_block.terminator.is_jump_to(merge.id));
    assert!(else_block.terminator.is_jump_to(merge.id));
    assert!(else_block.instructions.is_empty());
    assert!(matches!(
        &entry(main).terminator,
        Terminator::Branch { then_block: t, else_block: e, .. }
            if *t == then_block.id && *e == else_block.id
    ));
    assert!(entry(main)
        .instructions
        .iter()
        .any(|inst| matches!(inst, Instruction::Ne { ty: IrType::I32, .. })));
}

#[test]
fn test_for_loop_shape() {
    let module = lower(&counting_loop(vec![call("printi", vec![Expr::ident("i")])]));

    let main = module.get_function("main").unwrap();
    assert_eq!(main.block_count(), 4);

    let cond = block_labelled(main, LOOP_COND);
    let body = block_labelled(main, LOOP_BODY);
    let exit = block_labelled(main, LOOP_EXIT);

    assert!(entry(main).terminator.is_jump_to(cond.id));
    assert!(matches!(
        &cond.terminator,
        Terminator::Branch { then_block, else_block, .. }
            if *then_block == body.id && *else_block == exit.id
    ));
    assert!(body.terminator.is_jump_to(cond.id));
    assert_eq!(exit.terminator, Terminator::Return(Some(Value::int(0))));

    assert!(cond
        .instructions
        .iter()
        .any(|inst| matches!(inst, Instruction::Lt { ty: IrType::I32, .. })));
    assert!(body.instructions.iter().any(Instruction::is_call));
}

#[test]
fn test_allocas_hoisted_to_entry() {
    let module = lower(&counting_loop(vec![Stmt::var(
        "t",
        Type::Float64,
        Some(Expr::ident("i")),
    )]));

    let main = module.get_function("main").unwrap();
    let names: Vec<&str> = entry(main)
        .instructions
        .iter()
        .filter_map(|inst| match inst {
            Instruction::Alloca { name, .. } => Some(name.as_str()),
            _ => None,
        })
        .collect();
    assert_eq!(names, vec!["i", "t"]);

    let body = block_labelled(main, LOOP_BODY);
    assert!(!body.instructions.iter().any(Instruction::is_alloca));
}

#[test]
fn test_parameters_copied_into_slots() {
    let module = lower(&program(vec![func(
        "id",
        &[("x", Type::Int32)],
        Type::Int32,
        vec![Stmt::ret(Some(Expr::ident("x")))],
    )]));

    let f = module.get_function("id").unwrap();
    let insts = &entry(f).instructions;
    assert!(matches!(&insts[0], Instruction::Alloca { name, ty: IrType::I32, .. } if name == "x"));
    assert!(matches!(
        &insts[1],
        Instruction::Store { value: Value::Param(_), .. }
    ));
    assert!(matches!(&insts[2], Instruction::Load { .. }));
}

#[test]
fn test_code_after_return_is_dropped() {
    let module = lower(&program(vec![func(
        "f",
        &[],
        Type::Int32,
        vec![
            Stmt::ret(Some(Expr::int(1))),
            call("printi", vec![Expr::int(2)]),
        ],
    )]));

    let f = module.get_function("f").unwrap();
    assert_eq!(f.block_count(), 1);
    assert_eq!(entry(f).terminator, Terminator::Return(Some(Value::int(1))));
    assert!(!entry(f).instructions.iter().any(Instruction::is_call));
}

#[test]
fn test_returns_on_both_branches() {
    let module = lower(&program(vec![func(
        "sign",
        &[("x", Type::Int32)],
        Type::Int32,
        vec![Stmt::if_else(
            bin(BinaryOp::Lt, Expr::ident("x"), Expr::int(0)),
            Block::new(vec![Stmt::ret(Some(Expr::neg(Expr::int(1))))]),
            Some(Block::new(vec![Stmt::ret(Some(Expr::int(1)))])),
        )],
    )]));

    let f = module.get_function("sign").unwrap();
    assert!(f.blocks_labelled(IF_CONT).is_empty());
    assert!(block_labelled(f, THEN).terminator.is_return());
    assert!(block_labelled(f, ELSE).terminator.is_return());
}

#[test]
fn test_comparison_value_widened() {
    let module = lower(&program(vec![Stmt::var(
        "b",
        Type::Int32,
        Some(bin(BinaryOp::Lt, Expr::int(1), Expr::int(2))),
    )]));

    let main = module.get_function("main").unwrap();
    assert!(entry(main).instructions.iter().any(|inst| matches!(
        inst,
        Instruction::Cast {
            from: IrType::Bool,
            to: IrType::I32,
            ..
        }
    )));
}

#[test]
fn test_void_function_discards_body_value() {
    let module = lower(&program(vec![func(
        "f",
        &[],
        Type::Void,
        vec![Stmt::expr(bin(BinaryOp::Add, Expr::int(1), Expr::int(2)))],
    )]));

    let f = module.get_function("f").unwrap();
    assert_eq!(f.signature.returns, IrType::Void);
    assert_eq!(entry(f).terminator, Terminator::Return(None));
}

#[test]
fn test_body_value_is_converted_and_returned() {
    let module = lower(&program(vec![func(
        "half",
        &[],
        Type::Int32,
        vec![Stmt::expr(Expr::double(2.5))],
    )]));

    let f = module.get_function("half").unwrap();
    let insts = &entry(f).instructions;
    assert!(matches!(
        &insts[0],
        Instruction::Cast {
            from: IrType::F64,
            to: IrType::I32,
            ..
        }
    ));
    assert!(matches!(&entry(f).terminator, Terminator::Return(Some(Value::Temp(_)))));
}

#[test]
fn test_nested_functions_are_hoisted() {
    let outer = func(
        "outer",
        &[],
        Type::Int32,
        vec![
            func(
                "inner",
                &[("y", Type::Int32)],
                Type::Int32,
                vec![Stmt::ret(Some(bin(
                    BinaryOp::Mul,
                    Expr::ident("y"),
                    Expr::int(2),
                )))],
            ),
            Stmt::ret(Some(Expr::call("inner", vec![Expr::int(3)]))),
        ],
    );
    let module = lower(&program(vec![outer]));

    let names: Vec<&str> = module.functions.keys().map(String::as_str).collect();
    assert_eq!(names, vec!["inner", "outer", "main"]);
}

#[test]
fn test_local_definition_shadows_runtime() {
    let module = lower(&program(vec![
        func(
            "sqrt",
            &[("x", Type::Float64)],
            Type::Float64,
            vec![Stmt::ret(Some(Expr::ident("x")))],
        ),
        call("sqrt", vec![Expr::double(4.0)]),
    ]));

    assert!(module.get_function("sqrt").is_some());
    assert!(module.lookup_external_function("sqrt").is_none());
    assert!(module.lookup_external_function("printi").is_some());
}

#[test]
fn test_variadic_call_arguments() {
    let module = lower(&program(vec![call(
        "println",
        vec![
            Expr::string("%d %f"),
            bin(BinaryOp::Lt, Expr::int(1), Expr::int(2)),
            Expr::double(2.5),
        ],
    )]));

    assert_eq!(module.strings, vec!["%d %f".to_string()]);

    let main = module.get_function("main").unwrap();
    let call = entry(main)
        .instructions
        .iter()
        .find(|inst| inst.is_call())
        .unwrap();
    match call {
        Instruction::Call { callee, args, .. } => {
            assert_eq!(callee, "println");
            assert_eq!(args.len(), 3);
            assert!(matches!(args[0], Value::Str(_)));
            assert!(matches!(args[1], Value::Temp(_)));
            assert_eq!(args[2], Value::float(2.5));
        }
        other => panic!("expected a call, got {:?}", other),
    }
}

#[test]
fn test_one_string_per_literal_site() {
    let module = lower(&program(vec![
        call("print", vec![Expr::string("a")]),
        call("print", vec![Expr::string("a")]),
    ]));
    assert_eq!(module.strings, vec!["a".to_string(), "a".to_string()]);
}

#[test]
fn test_outer_variable_has_no_storage() {
    let program = program(vec![
        Stmt::var("x", Type::Int32, Some(Expr::int(1))),
        func("f", &[], Type::Int32, vec![Stmt::ret(Some(Expr::ident("x")))]),
    ]);

    assert_eq!(
        transform_ast_to_ir(&program, "test"),
        Err(vec![Diagnostic {
            function: "f".to_string(),
            node: "return x;".to_string(),
            error: TransformError::UnboundStorage("x".to_string()),
        }])
    );
}

#[test]
fn test_unknown_callee_fails_lowering() {
    let program = program(vec![call("foo", vec![Expr::int(1)])]);

    assert_eq!(
        lower_program(&program, "test"),
        Err(Diagnostic {
            function: "main".to_string(),
            node: "foo(1);".to_string(),
            error: TransformError::UnknownCallee("foo".to_string()),
        })
    );
}

#[test]
fn test_transform_stops_at_type_errors() {
    let program = program(vec![call("foo", vec![Expr::int(1), Expr::int(2)])]);
    let diagnostics = transform_ast_to_ir(&program, "test").unwrap_err();
    assert_eq!(
        diagnostics[0].error,
        TransformError::UnknownCallee("foo".to_string())
    );
}

#[test]
fn test_module_name_is_kept() {
    let module = transform_ast_to_ir(&program(vec![]), "named").unwrap();
    assert_eq!(module.name, "named");
    assert_eq!(module.functions.len(), 1);
}
