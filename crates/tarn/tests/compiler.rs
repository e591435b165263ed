use pretty_assertions::assert_eq;
use tarn::ast::{BinaryOp, Block, Expr, FunctionDecl, Param, Stmt, Type};
use tarn::runtime::capture_output;
use tarn::transform::TransformError;
use tarn::{CompileError, Compiler, CompilerConfig, EmitterConfig};

fn run(program: &Block) -> (i32, String) {
    let compiler = Compiler::default();
    let module = compiler.lower(program, "test").unwrap();
    let (exit_code, output) = capture_output(|| compiler.execute(&module));
    (exit_code.unwrap(), output)
}

fn call(callee: &str, args: Vec<Expr>) -> Stmt {
    Stmt::expr(Expr::call(callee, args))
}

fn identity_program() -> Block {
    Block::new(vec![
        Stmt::function(FunctionDecl::new(
            "f",
            vec![Param::new("x", Type::Int32)],
            Type::Int32,
            Block::new(vec![Stmt::ret(Some(Expr::ident("x")))]),
        )),
        Stmt::ret(Some(Expr::call("f", vec![Expr::int(5)]))),
    ])
}

#[test]
fn test_function_result_becomes_exit_code() {
    assert_eq!(run(&identity_program()), (5, String::new()));
}

#[test]
fn test_mixed_arithmetic_prints_double() {
    let program = Block::new(vec![call(
        "printd",
        vec![Expr::binary(BinaryOp::Add, Expr::int(1), Expr::double(2.5))],
    )]);
    assert_eq!(run(&program), (0, "3.500000\n".to_string()));
}

#[test]
fn test_for_loop_counts() {
    let program = Block::new(vec![
        Stmt::var("i", Type::Int32, None),
        Stmt::for_loop(
            vec![Expr::assign("i", Expr::int(0))],
            Expr::binary(BinaryOp::Lt, Expr::ident("i"), Expr::int(3)),
            vec![Expr::assign(
                "i",
                Expr::binary(BinaryOp::Add, Expr::ident("i"), Expr::int(1)),
            )],
            Block::new(vec![call(
                "println",
                vec![Expr::string("%d"), Expr::ident("i")],
            )]),
        ),
    ]);
    assert_eq!(run(&program), (0, "0\n1\n2\n".to_string()));
}

#[test]
fn test_recursive_function() {
    let n = || Expr::ident("n");
    let fib_of = |k: i32| {
        Expr::call(
            "fib",
            vec![Expr::binary(BinaryOp::Sub, n(), Expr::int(k))],
        )
    };
    let program = Block::new(vec![
        Stmt::function(FunctionDecl::new(
            "fib",
            vec![Param::new("n", Type::Int32)],
            Type::Int32,
            Block::new(vec![
                Stmt::if_else(
                    Expr::binary(BinaryOp::Lt, n(), Expr::int(2)),
                    Block::new(vec![Stmt::ret(Some(n()))]),
                    None,
                ),
                Stmt::ret(Some(Expr::binary(BinaryOp::Add, fib_of(1), fib_of(2)))),
            ]),
        )),
        Stmt::ret(Some(Expr::call("fib", vec![Expr::int(10)]))),
    ]);
    assert_eq!(run(&program).0, 55);
}

#[test]
fn test_double_parameters_and_narrowing() {
    let program = Block::new(vec![
        Stmt::function(FunctionDecl::new(
            "half",
            vec![Param::new("x", Type::Float64)],
            Type::Float64,
            Block::new(vec![Stmt::ret(Some(Expr::binary(
                BinaryOp::Div,
                Expr::ident("x"),
                Expr::int(2),
            )))]),
        )),
        call("printd", vec![Expr::call("half", vec![Expr::int(5)])]),
        Stmt::var("truncated", Type::Int32, Some(Expr::double(2.9))),
        Stmt::ret(Some(Expr::ident("truncated"))),
    ]);
    assert_eq!(run(&program), (2, "2.500000\n".to_string()));
}

#[test]
fn test_comparison_stored_as_int() {
    let program = Block::new(vec![
        Stmt::var(
            "b",
            Type::Int32,
            Some(Expr::binary(BinaryOp::Gt, Expr::int(3), Expr::int(2))),
        ),
        Stmt::ret(Some(Expr::ident("b"))),
    ]);
    assert_eq!(run(&program).0, 1);
}

#[test]
fn test_variadic_print_mixes_types() {
    let program = Block::new(vec![call(
        "println",
        vec![
            Expr::string("%d and %s, %.1f"),
            Expr::int(7),
            Expr::string("two"),
            Expr::double(2.5),
        ],
    )]);
    assert_eq!(run(&program), (0, "7 and two, 2.5\n".to_string()));
}

#[test]
fn test_same_program_runs_twice() {
    let compiler = Compiler::default();
    let module = compiler.lower(&identity_program(), "twice").unwrap();
    assert_eq!(compiler.execute(&module).unwrap(), 5);
    assert_eq!(compiler.execute(&module).unwrap(), 5);
}

#[test]
fn test_type_errors_stop_before_lowering() {
    let program = Block::new(vec![call("foo", vec![Expr::int(1), Expr::int(2)])]);
    let compiler = Compiler::default();

    let err = compiler.lower(&program, "bad").unwrap_err();
    assert!(matches!(err, CompileError::TypeCheck(_)));
    assert_eq!(err.diagnostics().len(), 1);
    assert_eq!(
        err.diagnostics()[0].error,
        TransformError::UnknownCallee("foo".to_string())
    );
}

#[test]
fn test_type_check_is_repeatable() {
    let compiler = Compiler::default();
    let program = identity_program();
    assert!(compiler.type_check(&program).is_ok());
    assert!(compiler.type_check(&program).is_ok());
}

#[test]
fn test_object_file_written() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("identity.o");

    let compiler = Compiler::default();
    let module = compiler.lower(&identity_program(), "identity").unwrap();
    let written = compiler.emit_object(&module, Some(&path)).unwrap();

    assert_eq!(written, path);
    let bytes = std::fs::read(&path).unwrap();
    assert!(!bytes.is_empty());
    #[cfg(target_os = "linux")]
    assert_eq!(&bytes[..4], b"\x7fELF");
}

#[test]
fn test_object_goes_to_configured_output() {
    let dir = tempfile::tempdir().unwrap();
    let config = CompilerConfig {
        output: dir.path().join("configured.o"),
        ..CompilerConfig::default()
    };
    let compiler = Compiler::new(config);
    let module = compiler.lower(&identity_program(), "identity").unwrap();

    let written = compiler.emit_object(&module, None).unwrap();
    assert_eq!(written, dir.path().join("configured.o"));
    assert!(written.exists());
}

#[test]
fn test_ir_text_and_clif_listing() {
    let compiler = Compiler::new(CompilerConfig {
        emitter: EmitterConfig::plain(),
        ..CompilerConfig::default()
    });
    let module = compiler.lower(&identity_program(), "identity").unwrap();

    let text = compiler.emit_ir(&module).unwrap();
    assert!(text.starts_with("; module identity\n"));
    assert!(text.contains("function @f(p0: i32) -> i32 {\n"));
    assert!(text.contains("function @main() -> i32 {\n"));

    let clif = compiler.clif_listing(&module).unwrap();
    assert!(clif.contains("function"));
    assert!(clif.contains("iconst.i32 5"));
}

#[test]
fn test_config_loads_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tarn.json");
    std::fs::write(&path, r#"{ "optimize": true, "output": "prog.o" }"#).unwrap();

    let config = CompilerConfig::load(&path).unwrap();
    assert!(config.optimize);
    assert_eq!(config.output, std::path::PathBuf::from("prog.o"));
    assert_eq!(config.emitter, EmitterConfig::default());
}

#[test]
fn test_bad_config_reports_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tarn.json");
    std::fs::write(&path, r#"{ "optimize": "yes" }"#).unwrap();

    let err = CompilerConfig::load(&path).unwrap_err();
    assert!(matches!(err, CompileError::Config { .. }));
    assert!(err.to_string().contains("tarn.json"));
}
