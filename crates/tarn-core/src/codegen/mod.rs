/*! Lower tarn IR to Cranelift for compilation.
 *
 * The same translation feeds two backends: an object module for ahead-of-time builds and a JIT
 * module for immediate execution. Stack slots become Cranelift variables, string buffers become
 * local data objects and runtime functions are imported by name.
 */

pub mod context;
pub mod jit;
pub mod lowering;
pub mod module;

pub use context::{build_native_isa, CodegenContext, CodegenOptions};
pub use jit::{JitSession, RuntimeSymbol, ENTRY_POINT};
pub use lowering::{Declarations, FunctionLowering};
pub use module::{compile_into_module, CompiledModule, ModuleBuilder, ObjectArtifact};
