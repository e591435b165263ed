use crate::error::{CompileError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tarn_core::codegen::CodegenOptions;
use tarn_emit::EmitterConfig;

/// Object file written by `build` when no path is given.
pub const DEFAULT_OUTPUT: &str = "output.o";

/// Driver settings. Every field has a default, so a JSON file only needs the
/// keys it overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompilerConfig {
    pub optimize: bool,
    /// Dump the Cranelift IR of every function to stderr while compiling.
    pub print_clif: bool,
    pub output: PathBuf,
    pub emitter: EmitterConfig,
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            optimize: false,
            print_clif: false,
            output: PathBuf::from(DEFAULT_OUTPUT),
            emitter: EmitterConfig::default(),
        }
    }
}

impl CompilerConfig {
    pub fn from_json(text: &str) -> std::result::Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| CompileError::io(path, e))?;
        Self::from_json(&text).map_err(|source| CompileError::Config {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn codegen_options(&self) -> CodegenOptions {
        CodegenOptions {
            optimize: self.optimize,
            print_clif: self.print_clif,
        }
    }
}
