use crate::config::CompilerConfig;
use crate::error::{CompileError, Result};
use std::path::{Path, PathBuf};
use tarn_core::codegen::{CodegenOptions, JitSession, ModuleBuilder, RuntimeSymbol};
use tarn_core::Module;
use tarn_emit::{Emitter, TarnEmitter};
use tarn_transform::ast::{self, Block};
use tracing::{debug, info};

/// The runtime functions generated code links against, in the form the JIT
/// registers them.
pub fn runtime_symbols() -> Vec<RuntimeSymbol> {
    tarn_runtime::symbols()
        .into_iter()
        .map(|(name, address)| RuntimeSymbol { name, address })
        .collect()
}

/// Drives a syntax tree through checking, lowering and one of the back ends.
///
/// Checking always happens before lowering; a program with type errors never
/// reaches code generation.
pub struct Compiler {
    config: CompilerConfig,
}

impl Compiler {
    pub fn new(config: CompilerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CompilerConfig {
        &self.config
    }

    pub fn parse(&self, text: &str) -> Result<Block> {
        Ok(ast::from_json(text)?)
    }

    pub fn load(&self, path: &Path) -> Result<Block> {
        let text = std::fs::read_to_string(path).map_err(|e| CompileError::io(path, e))?;
        debug!(path = %path.display(), bytes = text.len(), "read syntax tree");
        self.parse(&text)
    }

    pub fn type_check(&self, program: &Block) -> Result<()> {
        tarn_transform::type_check(program).map_err(CompileError::TypeCheck)
    }

    pub fn lower(&self, program: &Block, name: &str) -> Result<Module> {
        self.type_check(program)?;
        let module = tarn_transform::lower_program(program, name)?;
        info!(
            module = %module.name,
            functions = module.functions.len(),
            "program lowered"
        );
        Ok(module)
    }

    /// JIT-compiles `module` in a fresh session and runs its `main`.
    pub fn execute(&self, module: &Module) -> Result<i32> {
        let session = JitSession::new(module, &self.config.codegen_options(), &runtime_symbols())?;
        self.dump_clif(session.clif());
        let exit_code = session.run_main()?;
        info!(module = %module.name, exit_code, "execution finished");
        Ok(exit_code)
    }

    /// Writes a relocatable object for `module`, to `path` or to the
    /// configured output, and returns where it went.
    pub fn emit_object(&self, module: &Module, path: Option<&Path>) -> Result<PathBuf> {
        let path = path.unwrap_or(self.config.output.as_path()).to_path_buf();
        let artifact =
            ModuleBuilder::new(&module.name, self.config.codegen_options())?.compile_module(module)?;
        self.dump_clif(&artifact.clif);

        std::fs::write(&path, &artifact.bytes).map_err(|e| CompileError::io(&path, e))?;
        info!(path = %path.display(), bytes = artifact.bytes.len(), "object written");
        Ok(path)
    }

    pub fn emit_ir(&self, module: &Module) -> Result<String> {
        TarnEmitter::new(self.config.emitter.clone())
            .emit_to_string(module)
            .map_err(|e| CompileError::Emit(e.to_string()))
    }

    /// The Cranelift IR of every function, regardless of `print_clif`.
    pub fn clif_listing(&self, module: &Module) -> Result<String> {
        let options = CodegenOptions {
            print_clif: true,
            ..self.config.codegen_options()
        };
        let artifact = ModuleBuilder::new(&module.name, options)?.compile_module(module)?;
        Ok(artifact.clif.join("\n"))
    }

    fn dump_clif(&self, functions: &[String]) {
        if self.config.print_clif {
            for text in functions {
                eprintln!("{}", text);
            }
        }
    }
}

impl Default for Compiler {
    fn default() -> Self {
        Self::new(CompilerConfig::default())
    }
}
