use crate::ast::Type;
use std::fmt;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum TransformError {
    #[error("Unbound name `{0}`")]
    UnboundName(String),

    #[error("No storage slot for `{0}` in the current function")]
    UnboundStorage(String),

    #[error("Type mismatch: `{op}` cannot combine {left} and {right}")]
    TypeMismatch {
        op: String,
        left: Type,
        right: Type,
    },

    #[error("Invalid operand of type {ty} for {op}")]
    InvalidOperand { op: String, ty: Type },

    #[error("Cannot assign {found} to `{name}` of type {expected}")]
    IncompatibleAssignment {
        name: String,
        expected: Type,
        found: Type,
    },

    #[error("Function `{function}` returns {found} but is declared {expected}")]
    ReturnTypeMismatch {
        function: String,
        expected: Type,
        found: Type,
    },

    #[error("`{callee}` expects {}{expected} argument(s), got {found}", at_least(.variadic))]
    ArityMismatch {
        callee: String,
        expected: usize,
        found: usize,
        variadic: bool,
    },

    #[error("Argument {index} of `{callee}` is {found}, expected {expected}")]
    ArgumentTypeMismatch {
        callee: String,
        index: usize,
        expected: Type,
        found: Type,
    },

    #[error("Unknown function `{0}`")]
    UnknownCallee(String),

    #[error("Emission error: {0}")]
    EmissionError(String),

    #[error("`{0}` cannot have type void")]
    VoidBinding(String),

    #[error("Function `{0}` is declared more than once")]
    DuplicateFunction(String),

    #[error("IR builder error: {0}")]
    BuilderError(String),

    #[error("{0}")]
    Located(Box<Diagnostic>),
}

fn at_least(variadic: &bool) -> &'static str {
    if *variadic {
        "at least "
    } else {
        ""
    }
}

impl From<tarn_core::IrError> for TransformError {
    fn from(err: tarn_core::IrError) -> Self {
        TransformError::BuilderError(err.to_string())
    }
}

impl From<Diagnostic> for TransformError {
    fn from(diagnostic: Diagnostic) -> Self {
        TransformError::Located(Box::new(diagnostic))
    }
}

/// A failure pinned to the function and the node it was found in.
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    pub function: String,
    pub node: String,
    pub error: TransformError,
}

impl Diagnostic {
    pub fn new(function: impl Into<String>, node: impl Into<String>, error: TransformError) -> Self {
        match error {
            TransformError::Located(inner) => *inner,
            error => Self {
                function: function.into(),
                node: node.into(),
                error,
            },
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "in `{}`: {} at `{}`", self.function, self.error, self.node)
    }
}

impl std::error::Error for Diagnostic {}

pub type TransformResult<T> = std::result::Result<T, Diagnostic>;
