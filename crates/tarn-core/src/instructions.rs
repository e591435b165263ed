use crate::types::Type;
use crate::values::{SlotId, Value};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Instruction {
    Alloca {
        slot: SlotId,
        ty: Type,
        name: String,
    },
    Load {
        result: Value,
        slot: SlotId,
        ty: Type,
    },
    Store {
        slot: SlotId,
        value: Value,
        ty: Type,
    },

    Add {
        result: Value,
        left: Value,
        right: Value,
        ty: Type,
    },
    Sub {
        result: Value,
        left: Value,
        right: Value,
        ty: Type,
    },
    Mul {
        result: Value,
        left: Value,
        right: Value,
        ty: Type,
    },
    Div {
        result: Value,
        left: Value,
        right: Value,
        ty: Type,
    },
    Neg {
        result: Value,
        operand: Value,
        ty: Type,
    },

    // Comparisons carry the operand type; their result is always `Bool`.
    Eq {
        result: Value,
        left: Value,
        right: Value,
        ty: Type,
    },
    Ne {
        result: Value,
        left: Value,
        right: Value,
        ty: Type,
    },
    Lt {
        result: Value,
        left: Value,
        right: Value,
        ty: Type,
    },
    Gt {
        result: Value,
        left: Value,
        right: Value,
        ty: Type,
    },
    Le {
        result: Value,
        left: Value,
        right: Value,
        ty: Type,
    },
    Ge {
        result: Value,
        left: Value,
        right: Value,
        ty: Type,
    },

    Cast {
        result: Value,
        value: Value,
        from: Type,
        to: Type,
    },

    Call {
        result: Option<Value>,
        callee: String,
        args: Vec<Value>,
        returns: Type,
    },
}

impl Instruction {
    pub fn result(&self) -> Option<&Value> {
        match self {
            Instruction::Load { result, .. }
            | Instruction::Add { result, .. }
            | Instruction::Sub { result, .. }
            | Instruction::Mul { result, .. }
            | Instruction::Div { result, .. }
            | Instruction::Neg { result, .. }
            | Instruction::Eq { result, .. }
            | Instruction::Ne { result, .. }
            | Instruction::Lt { result, .. }
            | Instruction::Gt { result, .. }
            | Instruction::Le { result, .. }
            | Instruction::Ge { result, .. }
            | Instruction::Cast { result, .. } => Some(result),
            Instruction::Call { result, .. } => result.as_ref(),
            Instruction::Alloca { .. } | Instruction::Store { .. } => None,
        }
    }

    /// Type of the value this instruction defines, `Void` when it defines none.
    pub fn result_type(&self) -> Type {
        match self {
            Instruction::Load { ty, .. }
            | Instruction::Add { ty, .. }
            | Instruction::Sub { ty, .. }
            | Instruction::Mul { ty, .. }
            | Instruction::Div { ty, .. }
            | Instruction::Neg { ty, .. } => *ty,
            Instruction::Eq { .. }
            | Instruction::Ne { .. }
            | Instruction::Lt { .. }
            | Instruction::Gt { .. }
            | Instruction::Le { .. }
            | Instruction::Ge { .. } => Type::Bool,
            Instruction::Cast { to, .. } => *to,
            Instruction::Call { returns, .. } => *returns,
            Instruction::Alloca { .. } | Instruction::Store { .. } => Type::Void,
        }
    }

    pub fn operands(&self) -> Vec<&Value> {
        match self {
            Instruction::Alloca { .. } | Instruction::Load { .. } => Vec::new(),
            Instruction::Store { value, .. } => vec![value],
            Instruction::Add { left, right, .. }
            | Instruction::Sub { left, right, .. }
            | Instruction::Mul { left, right, .. }
            | Instruction::Div { left, right, .. }
            | Instruction::Eq { left, right, .. }
            | Instruction::Ne { left, right, .. }
            | Instruction::Lt { left, right, .. }
            | Instruction::Gt { left, right, .. }
            | Instruction::Le { left, right, .. }
            | Instruction::Ge { left, right, .. } => vec![left, right],
            Instruction::Neg { operand, .. } => vec![operand],
            Instruction::Cast { value, .. } => vec![value],
            Instruction::Call { args, .. } => args.iter().collect(),
        }
    }

    pub fn is_alloca(&self) -> bool {
        matches!(self, Instruction::Alloca { .. })
    }

    pub fn is_comparison(&self) -> bool {
        matches!(
            self,
            Instruction::Eq { .. }
                | Instruction::Ne { .. }
                | Instruction::Lt { .. }
                | Instruction::Gt { .. }
                | Instruction::Le { .. }
                | Instruction::Ge { .. }
        )
    }

    pub fn is_call(&self) -> bool {
        matches!(self, Instruction::Call { .. })
    }

    pub fn mnemonic(&self) -> &'static str {
        match self {
            Instruction::Alloca { .. } => "alloca",
            Instruction::Load { .. } => "load",
            Instruction::Store { .. } => "store",
            Instruction::Add { .. } => "add",
            Instruction::Sub { .. } => "sub",
            Instruction::Mul { .. } => "mul",
            Instruction::Div { .. } => "div",
            Instruction::Neg { .. } => "neg",
            Instruction::Eq { .. } => "eq",
            Instruction::Ne { .. } => "ne",
            Instruction::Lt { .. } => "lt",
            Instruction::Gt { .. } => "gt",
            Instruction::Le { .. } => "le",
            Instruction::Ge { .. } => "ge",
            Instruction::Cast { .. } => "cast",
            Instruction::Call { .. } => "call",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    Eq,
    Ne,
    Lt,
    Gt,
    Le,
    Ge,
}

impl BinOp {
    pub fn is_comparison(&self) -> bool {
        !matches!(self, BinOp::Add | BinOp::Sub | BinOp::Mul | BinOp::Div)
    }

    pub fn build(self, result: Value, left: Value, right: Value, ty: Type) -> Instruction {
        match self {
            BinOp::Add => Instruction::Add { result, left, right, ty },
            BinOp::Sub => Instruction::Sub { result, left, right, ty },
            BinOp::Mul => Instruction::Mul { result, left, right, ty },
            BinOp::Div => Instruction::Div { result, left, right, ty },
            BinOp::Eq => Instruction::Eq { result, left, right, ty },
            BinOp::Ne => Instruction::Ne { result, left, right, ty },
            BinOp::Lt => Instruction::Lt { result, left, right, ty },
            BinOp::Gt => Instruction::Gt { result, left, right, ty },
            BinOp::Le => Instruction::Le { result, left, right, ty },
            BinOp::Ge => Instruction::Ge { result, left, right, ty },
        }
    }
}
