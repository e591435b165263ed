use cranelift_jit::{JITBuilder, JITModule};
use cranelift_module::FuncId;
use std::collections::HashMap;
use tracing::debug;

use crate::{
    codegen::context::{build_native_isa, module_error, CodegenOptions},
    codegen::module::compile_into_module,
    module::Module,
    IrError, Result,
};

/// Name of the function the JIT calls to run a program.
pub const ENTRY_POINT: &str = "main";

/// A runtime symbol the generated code may call, resolved by name.
#[derive(Debug, Clone, Copy)]
pub struct RuntimeSymbol {
    pub name: &'static str,
    pub address: *const u8,
}

/// One just-in-time execution. Every session owns a fresh `JITModule`, so
/// compiling the same program twice in one process never clashes on symbols.
pub struct JitSession {
    module: JITModule,
    functions: HashMap<String, FuncId>,
    clif: Vec<String>,
}

impl JitSession {
    pub fn new(ir: &Module, options: &CodegenOptions, symbols: &[RuntimeSymbol]) -> Result<Self> {
        let isa = build_native_isa(options, false)?;
        let mut jit_builder = JITBuilder::with_isa(isa, cranelift_module::default_libcall_names());
        for symbol in symbols {
            jit_builder.symbol(symbol.name, symbol.address);
        }

        let mut module = JITModule::new(jit_builder);
        let compiled = compile_into_module(&mut module, ir, options)?;
        module.finalize_definitions().map_err(module_error)?;

        Ok(Self {
            module,
            functions: compiled.functions,
            clif: compiled.clif,
        })
    }

    pub fn clif(&self) -> &[String] {
        &self.clif
    }

    /// Runs the entry point and releases the compiled code afterwards.
    pub fn run_main(self) -> Result<i32> {
        let main_id = self
            .functions
            .get(ENTRY_POINT)
            .copied()
            .ok_or_else(|| IrError::UnknownFunction(ENTRY_POINT.to_string()))?;

        let code = self.module.get_finalized_function(main_id);
        // SAFETY: the entry point is always defined as `fn() -> i32`.
        let main_fn: extern "C" fn() -> i32 = unsafe { std::mem::transmute(code) };
        let exit_code = main_fn();
        debug!(exit_code, "program finished");

        // SAFETY: no pointer into the JIT memory outlives this call.
        unsafe { self.module.free_memory() };
        Ok(exit_code)
    }
}
