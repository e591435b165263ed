use std::path::PathBuf;
use tarn_core::IrError;
use tarn_transform::Diagnostic;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CompileError {
    #[error("invalid syntax tree: {0}")]
    Syntax(#[from] serde_json::Error),

    #[error("type check failed with {} error(s)", .0.len())]
    TypeCheck(Vec<Diagnostic>),

    #[error("lowering failed {0}")]
    Lowering(#[from] Diagnostic),

    #[error("code generation failed: {0}")]
    Codegen(#[from] IrError),

    #[error("could not render IR: {0}")]
    Emit(String),

    #[error("invalid configuration in {path}: {source}")]
    Config {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("{path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl CompileError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Every diagnostic carried by this error, in report order.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        match self {
            Self::TypeCheck(diagnostics) => diagnostics,
            Self::Lowering(diagnostic) => std::slice::from_ref(diagnostic),
            _ => &[],
        }
    }
}

pub type Result<T> = std::result::Result<T, CompileError>;
