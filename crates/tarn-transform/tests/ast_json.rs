use pretty_assertions::assert_eq;
use tarn_transform::ast::{self, BinaryOp, Block, Expr, FunctionDecl, Param, Stmt, Type};
use tarn_transform::{transform_ast_to_ir, type_check};

const SQUARE_PROGRAM: &str = r#"{
  "stmts": [
    {
      "kind": "function",
      "name": "square",
      "params": [{ "name": "x", "type": "double" }],
      "returns": "double",
      "body": {
        "stmts": [
          {
            "kind": "return",
            "value": {
              "kind": "binary",
              "op": "*",
              "lhs": { "kind": "ident", "name": "x" },
              "rhs": { "kind": "ident", "name": "x" }
            }
          }
        ]
      }
    },
    {
      "kind": "expr",
      "expr": {
        "kind": "call",
        "callee": "printd",
        "args": [
          {
            "kind": "call",
            "callee": "square",
            "args": [{ "kind": "int", "value": 3 }]
          }
        ]
      }
    }
  ]
}"#;

fn square_program() -> Block {
    Block::new(vec![
        Stmt::function(FunctionDecl::new(
            "square",
            vec![Param::new("x", Type::Float64)],
            Type::Float64,
            Block::new(vec![Stmt::ret(Some(Expr::binary(
                BinaryOp::Mul,
                Expr::ident("x"),
                Expr::ident("x"),
            )))]),
        )),
        Stmt::expr(Expr::call(
            "printd",
            vec![Expr::call("square", vec![Expr::int(3)])],
        )),
    ])
}

#[test]
fn test_program_reads_from_json() {
    let program = ast::from_json(SQUARE_PROGRAM).unwrap();
    assert_eq!(program, square_program());
}

#[test]
fn test_json_encoding_reads_back() {
    let text = ast::to_json(&square_program()).unwrap();
    assert_eq!(ast::from_json(&text).unwrap(), square_program());
}

#[test]
fn test_optional_fields_default() {
    let program = ast::from_json(
        r#"{ "stmts": [
            { "kind": "var", "name": "n", "type": "int" },
            { "kind": "return" },
            { "kind": "for", "cond": { "kind": "int", "value": 0 }, "body": {} }
        ] }"#,
    )
    .unwrap();

    assert_eq!(
        program,
        Block::new(vec![
            Stmt::var("n", Type::Int32, None),
            Stmt::ret(None),
            Stmt::for_loop(vec![], Expr::int(0), vec![], Block::default()),
        ])
    );
}

#[test]
fn test_unknown_kind_rejected() {
    assert!(ast::from_json(r#"{ "stmts": [{ "kind": "while" }] }"#).is_err());
}

#[test]
fn test_program_renders_as_source() {
    let rendered = ast::render_program(&square_program());
    assert_eq!(
        rendered,
        "double square(double x) {\n    return x * x;\n}\nprintd(square(3));\n"
    );
}

#[test]
fn test_expressions_render_with_grouping() {
    let expr = Expr::binary(
        BinaryOp::Mul,
        Expr::binary(BinaryOp::Add, Expr::int(1), Expr::double(2.0)),
        Expr::neg(Expr::ident("y")),
    );
    assert_eq!(expr.to_string(), "(1 + 2.0) * -y");

    let stmt = Stmt::if_else(
        Expr::binary(BinaryOp::Le, Expr::ident("a"), Expr::int(0)),
        Block::new(vec![Stmt::expr(Expr::assign("a", Expr::string("s")))]),
        Some(Block::default()),
    );
    assert_eq!(stmt.to_string(), "if (a <= 0) {\n    a = \"s\";\n} else { }");
    assert_eq!(stmt.summary(), "if (a <= 0)");
}

#[test]
fn test_json_program_lowers() {
    let program = ast::from_json(SQUARE_PROGRAM).unwrap();
    assert_eq!(type_check(&program), Ok(()));

    let module = transform_ast_to_ir(&program, "square").unwrap();
    let names: Vec<&str> = module.functions.keys().map(String::as_str).collect();
    assert_eq!(names, vec!["square", "main"]);
}
