/*! Tests for type resolution and lowering.
 *
 * Programs are assembled with the tree constructors rather than parsed, so every case states
 * exactly the tree it feeds in.
 */

#![allow(unused_imports)]

mod lowering_tests;
mod scope_tests;

use crate::ast::{BinaryOp, Block, Expr, FunctionDecl, Param, Stmt, Type};
use crate::ast_to_ir::{transform_ast_to_ir, type_check, Diagnostic, TransformError};
use tarn_core::{BasicBlock, Function, Instruction, Module};

pub(super) fn program(stmts: Vec<Stmt>) -> Block {
    Block::new(stmts)
}

pub(super) fn func(name: &str, params: &[(&str, Type)], returns: Type, body: Vec<Stmt>) -> Stmt {
    Stmt::function(FunctionDecl::new(
        name,
        params
            .iter()
            .map(|(name, ty)| Param::new(*name, *ty))
            .collect(),
        returns,
        Block::new(body),
    ))
}

pub(super) fn bin(op: BinaryOp, lhs: Expr, rhs: Expr) -> Expr {
    Expr::binary(op, lhs, rhs)
}

pub(super) fn call(name: &str, args: Vec<Expr>) -> Stmt {
    Stmt::expr(Expr::call(name, args))
}

pub(super) fn errors_of(program: &Block) -> Vec<TransformError> {
    type_check(program)
        .err()
        .unwrap_or_default()
        .into_iter()
        .map(|diagnostic| diagnostic.error)
        .collect()
}

pub(super) fn lower(program: &Block) -> Module {
    match transform_ast_to_ir(program, "test") {
        Ok(module) => module,
        Err(diagnostics) => panic!("lowering failed: {:?}", diagnostics),
    }
}

pub(super) fn block_labelled<'f>(function: &'f Function, label: &str) -> &'f BasicBlock {
    let blocks = function.blocks_labelled(label);
    assert_eq!(blocks.len(), 1, "expected one `{}` block", label);
    blocks[0]
}

pub(super) fn entry(function: &Function) -> &BasicBlock {
    &function.body.blocks[&function.entry_block()]
}
