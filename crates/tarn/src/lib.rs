/*! The tarn compiler in one crate.
 *
 * Re-exports the syntax tree, the IR, the emitter and the runtime, and adds the [`Compiler`]
 * driver that chains them: type check, lower, then either run the program in-process or write
 * an object file.
 *
 * ```no_run
 * use tarn::{Compiler, CompilerConfig};
 *
 * let compiler = Compiler::new(CompilerConfig::default());
 * let program = compiler.load("square.json".as_ref())?;
 * let module = compiler.lower(&program, "square")?;
 * let exit_code = compiler.execute(&module)?;
 * println!("exited with {}", exit_code);
 * # Ok::<(), tarn::CompileError>(())
 * ```
 */

mod compiler;
mod config;
mod error;

pub use tarn_core as core;
pub use tarn_emit as emit;
pub use tarn_runtime as runtime;
pub use tarn_transform as transform;

pub use tarn_core::{
    block::{BasicBlock, BlockId, Terminator},
    function::Function,
    instructions::Instruction,
    module::Module,
    types::Type,
    values::Value,
};

pub use tarn_emit::{EmitterConfig, TarnEmitter, VerbosityLevel};

pub use tarn_transform::{ast, transform_ast_to_ir, type_check, Diagnostic};

pub use compiler::{runtime_symbols, Compiler};
pub use config::{CompilerConfig, DEFAULT_OUTPUT};
pub use error::{CompileError, Result};
