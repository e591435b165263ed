use tarn_core::{
    codegen::{CodegenOptions, JitSession, ModuleBuilder},
    BinOp, FunctionBuilder, Module, Parameter, Type, Value,
};

fn add_function() -> tarn_core::Function {
    let mut func = FunctionBuilder::new(
        "add",
        vec![Parameter::new("a", Type::I32), Parameter::new("b", Type::I32)],
        Type::I32,
    );
    let a = func.get_param(0);
    let b = func.get_param(1);
    let result = func.ins().unwrap().add(a, b, Type::I32);
    func.ins().unwrap().return_value(result).unwrap();
    func.build().unwrap()
}

/// `main` computes `add(40, 2)` and adds one more if `1.5 < 2.0`.
fn main_function() -> tarn_core::Function {
    let mut func = FunctionBuilder::new("main", vec![], Type::I32);
    let slot = func.alloca("acc", Type::I32).unwrap();
    let then_block = func.create_block("then");
    let done = func.create_block("ifcont");

    {
        let mut ins = func.ins().unwrap();
        let sum = ins
            .call("add", vec![Value::int(40), Value::int(2)], Type::I32)
            .unwrap();
        ins.store(slot, sum, Type::I32);
        let cond = ins.binary(BinOp::Lt, Value::float(1.5), Value::float(2.0), Type::F64);
        ins.branch(cond, then_block, done).unwrap();
    }

    func.switch_to_block(then_block).unwrap();
    {
        let mut ins = func.ins().unwrap();
        let current = ins.load(slot, Type::I32);
        let bumped = ins.add(current, Value::int(1), Type::I32);
        ins.store(slot, bumped, Type::I32);
        ins.jump(done).unwrap();
    }

    func.switch_to_block(done).unwrap();
    {
        let mut ins = func.ins().unwrap();
        let result = ins.load(slot, Type::I32);
        ins.return_value(result).unwrap();
    }

    func.build().unwrap()
}

fn program() -> Module {
    let mut module = Module::new("test");
    module.add_function(add_function()).unwrap();
    module.add_function(main_function()).unwrap();
    module
}

#[test]
fn test_simple_add_object() {
    let mut module = Module::new("test");
    module.add_function(add_function()).unwrap();

    let artifact = ModuleBuilder::new("test", CodegenOptions::default())
        .unwrap()
        .compile_module(&module)
        .unwrap();

    assert!(!artifact.bytes.is_empty());
    assert!(artifact.clif.is_empty());
}

#[test]
fn test_object_with_string_data() {
    let mut module = program();
    module.add_string("hello\n");

    let artifact = ModuleBuilder::new("strings", CodegenOptions::default())
        .unwrap()
        .compile_module(&module)
        .unwrap();

    assert!(!artifact.bytes.is_empty());
}

#[test]
fn test_print_clif_collects_text() {
    let options = CodegenOptions {
        optimize: false,
        print_clif: true,
    };

    let artifact = ModuleBuilder::new("clif", options)
        .unwrap()
        .compile_module(&program())
        .unwrap();

    assert_eq!(artifact.clif.len(), 2);
    assert!(artifact.clif[0].contains("iadd"));
    assert!(artifact.clif[1].contains("fcmp"));
}

#[test]
fn test_jit_runs_main() {
    let session = JitSession::new(&program(), &CodegenOptions::default(), &[]).unwrap();

    assert_eq!(session.run_main().unwrap(), 43);
}

#[test]
fn test_jit_twice_in_one_process() {
    for _ in 0..2 {
        let session = JitSession::new(&program(), &CodegenOptions::default(), &[]).unwrap();
        assert_eq!(session.run_main().unwrap(), 43);
    }
}

#[test]
fn test_jit_without_main_fails() {
    let mut module = Module::new("nomain");
    module.add_function(add_function()).unwrap();

    let session = JitSession::new(&module, &CodegenOptions::default(), &[]).unwrap();
    assert!(session.run_main().is_err());
}
