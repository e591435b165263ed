/*! Syntax tree consumed by the type resolver and the lowering engine.
 *
 * The tree is built once by an external parser and handed over as JSON. Expressions and statements
 * are closed sum types; every node pretty-prints back to C-like source, which is also how
 * diagnostics point at the offending node.
 */

mod display;
mod walk;

pub use display::render_program;
pub use walk::{nested_functions, outer_functions};

use serde::{Deserialize, Serialize};

/// Semantic types of the source language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Type {
    #[serde(rename = "int")]
    Int32,
    #[serde(rename = "double")]
    Float64,
    #[serde(rename = "string")]
    Str,
    #[serde(rename = "void")]
    Void,
}

impl Type {
    pub fn is_numeric(&self) -> bool {
        matches!(self, Type::Int32 | Type::Float64)
    }

    /// Storage representation in the IR.
    pub fn to_ir(self) -> tarn_core::Type {
        match self {
            Type::Int32 => tarn_core::Type::I32,
            Type::Float64 => tarn_core::Type::F64,
            Type::Str => tarn_core::Type::Ptr,
            Type::Void => tarn_core::Type::Void,
        }
    }

    /// Semantic type of a runtime signature slot.
    pub fn from_ir(ty: tarn_core::Type) -> Self {
        match ty {
            tarn_core::Type::I32 | tarn_core::Type::Bool => Type::Int32,
            tarn_core::Type::F64 => Type::Float64,
            tarn_core::Type::Ptr => Type::Str,
            tarn_core::Type::Void => Type::Void,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BinaryOp {
    #[serde(rename = "+")]
    Add,
    #[serde(rename = "-")]
    Sub,
    #[serde(rename = "*")]
    Mul,
    #[serde(rename = "/")]
    Div,
    #[serde(rename = "==")]
    Eq,
    #[serde(rename = "!=")]
    Ne,
    #[serde(rename = ">")]
    Gt,
    #[serde(rename = ">=")]
    Ge,
    #[serde(rename = "<")]
    Lt,
    #[serde(rename = "<=")]
    Le,
}

impl BinaryOp {
    pub fn is_comparison(&self) -> bool {
        !matches!(
            self,
            BinaryOp::Add | BinaryOp::Sub | BinaryOp::Mul | BinaryOp::Div
        )
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Eq => "==",
            BinaryOp::Ne => "!=",
            BinaryOp::Gt => ">",
            BinaryOp::Ge => ">=",
            BinaryOp::Lt => "<",
            BinaryOp::Le => "<=",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnaryOp {
    #[serde(rename = "-")]
    Neg,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Expr {
    Int {
        value: i32,
    },
    Double {
        value: f64,
    },
    Str {
        value: String,
    },
    Ident {
        name: String,
    },
    Unary {
        op: UnaryOp,
        operand: Box<Expr>,
    },
    Binary {
        op: BinaryOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
    Assign {
        target: String,
        value: Box<Expr>,
    },
    Call {
        callee: String,
        #[serde(default)]
        args: Vec<Expr>,
    },
    /// A statement sequence whose value is its last statement's value.
    Block(Block),
}

impl Expr {
    pub fn int(value: i32) -> Self {
        Expr::Int { value }
    }

    pub fn double(value: f64) -> Self {
        Expr::Double { value }
    }

    pub fn string(value: impl Into<String>) -> Self {
        Expr::Str {
            value: value.into(),
        }
    }

    pub fn ident(name: impl Into<String>) -> Self {
        Expr::Ident { name: name.into() }
    }

    pub fn neg(operand: Expr) -> Self {
        Expr::Unary {
            op: UnaryOp::Neg,
            operand: Box::new(operand),
        }
    }

    pub fn binary(op: BinaryOp, lhs: Expr, rhs: Expr) -> Self {
        Expr::Binary {
            op,
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        }
    }

    pub fn assign(target: impl Into<String>, value: Expr) -> Self {
        Expr::Assign {
            target: target.into(),
            value: Box::new(value),
        }
    }

    pub fn call(callee: impl Into<String>, args: Vec<Expr>) -> Self {
        Expr::Call {
            callee: callee.into(),
            args,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Block {
    #[serde(default)]
    pub stmts: Vec<Stmt>,
}

impl Block {
    pub fn new(stmts: Vec<Stmt>) -> Self {
        Self { stmts }
    }

    pub fn is_empty(&self) -> bool {
        self.stmts.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Param {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: Type,
}

impl Param {
    pub fn new(name: impl Into<String>, ty: Type) -> Self {
        Self {
            name: name.into(),
            ty,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VarDecl {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: Type,
    #[serde(default)]
    pub init: Option<Expr>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionDecl {
    pub name: String,
    #[serde(default)]
    pub params: Vec<Param>,
    pub returns: Type,
    pub body: Block,
}

impl FunctionDecl {
    pub fn new(name: impl Into<String>, params: Vec<Param>, returns: Type, body: Block) -> Self {
        Self {
            name: name.into(),
            params,
            returns,
            body,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Stmt {
    Expr {
        expr: Expr,
    },
    Var(VarDecl),
    Function(FunctionDecl),
    Return {
        #[serde(default)]
        value: Option<Expr>,
    },
    If {
        cond: Expr,
        then_block: Block,
        #[serde(default)]
        else_block: Option<Block>,
    },
    For {
        #[serde(default)]
        init: Vec<Expr>,
        cond: Expr,
        #[serde(default)]
        post: Vec<Expr>,
        body: Block,
    },
}

impl Stmt {
    pub fn expr(expr: Expr) -> Self {
        Stmt::Expr { expr }
    }

    pub fn var(name: impl Into<String>, ty: Type, init: Option<Expr>) -> Self {
        Stmt::Var(VarDecl {
            name: name.into(),
            ty,
            init,
        })
    }

    pub fn function(decl: FunctionDecl) -> Self {
        Stmt::Function(decl)
    }

    pub fn ret(value: Option<Expr>) -> Self {
        Stmt::Return { value }
    }

    pub fn if_else(cond: Expr, then_block: Block, else_block: Option<Block>) -> Self {
        Stmt::If {
            cond,
            then_block,
            else_block,
        }
    }

    pub fn for_loop(init: Vec<Expr>, cond: Expr, post: Vec<Expr>, body: Block) -> Self {
        Stmt::For {
            init,
            cond,
            post,
            body,
        }
    }

    /// Whether every path through this statement ends in a `return`.
    pub fn definitely_returns(&self) -> bool {
        match self {
            Stmt::Return { .. } => true,
            Stmt::If {
                then_block,
                else_block: Some(else_block),
                ..
            } => then_block.definitely_returns() && else_block.definitely_returns(),
            _ => false,
        }
    }
}

impl Block {
    pub fn definitely_returns(&self) -> bool {
        self.stmts.last().is_some_and(Stmt::definitely_returns)
    }
}

/// Reads a top-level block from its JSON encoding.
pub fn from_json(text: &str) -> Result<Block, serde_json::Error> {
    serde_json::from_str(text)
}

pub fn to_json(program: &Block) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(program)
}
