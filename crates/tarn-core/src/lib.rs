/*! Core IR types, builders and code generation for the tarn compiler.
 *
 * Lowered programs are held in a small basic-block IR: typed stack slots, arithmetic and
 * comparisons, calls and three terminators. This crate owns that representation, the builder the
 * front end emits through, the verifier that gates code generation, and the Cranelift backends
 * that turn a verified module into an object file or run it in-process.
 */

pub mod analysis;
pub mod block;
pub mod builder;
pub mod codegen;
pub mod function;
pub mod instructions;
pub mod module;
pub mod runtime;
pub mod types;
pub mod values;

pub use block::{BasicBlock, BlockId, Terminator};
pub use builder::FunctionBuilder;
pub use function::{Function, FunctionBody, FunctionSignature, Parameter};
pub use instructions::{BinOp, Instruction};
pub use module::{ExternalFunction, Module};
pub use types::Type;
pub use values::{Constant, SlotId, StringId, Value};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum IrError {
    #[error("Type error: {0}")]
    TypeError(String),
    #[error("Invalid instruction: {0}")]
    InvalidInstruction(String),
    #[error("Builder error: {0}")]
    BuilderError(String),
    #[error("Verification of `{function}` failed: {message}")]
    VerifyError { function: String, message: String },
    #[error("Function `{0}` is defined twice")]
    DuplicateFunction(String),
    #[error("Unknown function: {0}")]
    UnknownFunction(String),
    #[error("Cranelift error: {0}")]
    CraneliftError(String),
}

pub type Result<T> = std::result::Result<T, IrError>;

#[cfg(test)]
mod tests;
