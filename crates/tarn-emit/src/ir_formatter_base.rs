use tarn_core::{
    block::Terminator,
    instructions::Instruction,
    types::Type,
    values::{Constant, Value},
};

/// Stateless text for the individual pieces of the IR. Layout, colors and
/// annotations are left to the emitter.
pub struct IRFormatterBase;

impl IRFormatterBase {
    pub fn format_type(ty: &Type) -> String {
        ty.to_string()
    }

    fn suffix(ty: &Type, include_types: bool) -> String {
        if include_types {
            format!(".{}", ty)
        } else {
            String::new()
        }
    }

    pub fn format_value(value: &Value) -> String {
        match value {
            Value::Constant(c) => Self::format_constant(c),
            other => other.to_string(),
        }
    }

    pub fn format_constant(constant: &Constant) -> String {
        constant.to_string()
    }

    /// A string buffer as a quoted literal with escapes.
    pub fn format_string(text: &str) -> String {
        format!("{:?}", text)
    }

    pub fn format_signature(params: &[Type], returns: &Type, variadic: bool) -> String {
        let mut parts: Vec<String> = params.iter().map(Self::format_type).collect();
        if variadic {
            parts.push("...".to_string());
        }
        format!("({}) -> {}", parts.join(", "), Self::format_type(returns))
    }

    fn format_values(values: &[Value]) -> String {
        values
            .iter()
            .map(Self::format_value)
            .collect::<Vec<_>>()
            .join(", ")
    }

    pub fn format_instruction(inst: &Instruction, include_types: bool) -> String {
        match inst {
            Instruction::Alloca { slot, ty, .. } => format!("{} = alloca {}", slot, ty),
            Instruction::Load { result, slot, ty } => format!(
                "{} = load{} {}",
                result,
                Self::suffix(ty, include_types),
                slot
            ),
            Instruction::Store { slot, value, ty } => format!(
                "store{} {}, {}",
                Self::suffix(ty, include_types),
                slot,
                Self::format_value(value)
            ),
            Instruction::Add { result, left, right, ty }
            | Instruction::Sub { result, left, right, ty }
            | Instruction::Mul { result, left, right, ty }
            | Instruction::Div { result, left, right, ty }
            | Instruction::Eq { result, left, right, ty }
            | Instruction::Ne { result, left, right, ty }
            | Instruction::Lt { result, left, right, ty }
            | Instruction::Gt { result, left, right, ty }
            | Instruction::Le { result, left, right, ty }
            | Instruction::Ge { result, left, right, ty } => format!(
                "{} = {}{} {}, {}",
                result,
                inst.mnemonic(),
                Self::suffix(ty, include_types),
                Self::format_value(left),
                Self::format_value(right)
            ),
            Instruction::Neg { result, operand, ty } => format!(
                "{} = neg{} {}",
                result,
                Self::suffix(ty, include_types),
                Self::format_value(operand)
            ),
            Instruction::Cast { result, value, from, to } => format!(
                "{} = cast {}, {} -> {}",
                result,
                Self::format_value(value),
                from,
                to
            ),
            Instruction::Call {
                result,
                callee,
                args,
                returns,
            } => match result {
                Some(result) => format!(
                    "{} = call{} @{}({})",
                    result,
                    Self::suffix(returns, include_types),
                    callee,
                    Self::format_values(args)
                ),
                None => format!("call @{}({})", callee, Self::format_values(args)),
            },
        }
    }

    pub fn format_terminator(terminator: &Terminator) -> String {
        match terminator {
            Terminator::Return(None) => "return".to_string(),
            Terminator::Return(Some(value)) => format!("return {}", Self::format_value(value)),
            Terminator::Jump(target) => format!("jump {}", target),
            Terminator::Branch {
                condition,
                then_block,
                else_block,
            } => format!(
                "br {}, {}, {}",
                Self::format_value(condition),
                then_block,
                else_block
            ),
            Terminator::Invalid => "invalid".to_string(),
        }
    }
}
