use crate::{
    block::Terminator,
    function::Function,
    instructions::Instruction,
    types::Type,
    values::{TempId, Value},
    IrError, Result,
};
use std::collections::HashMap;

/// Structural checks run on every finished function before code generation.
///
/// Rejects unterminated blocks, dangling branch targets, misplaced allocas,
/// uses of undefined temporaries and returns that disagree with the signature.
pub fn verify_function(function: &Function) -> Result<()> {
    let body = &function.body;
    let name = function.name();
    let returns = function.signature.returns;

    let mut temps: HashMap<TempId, Type> = HashMap::new();
    for block in body.blocks.values() {
        for inst in &block.instructions {
            if let Some(Value::Temp(id)) = inst.result() {
                if temps.insert(*id, inst.result_type()).is_some() {
                    return Err(verify_error(name, format!("{} is defined twice", id)));
                }
            }
        }
    }

    let value_type = |value: &Value| -> Result<Type> {
        match value {
            Value::Temp(id) => temps
                .get(id)
                .copied()
                .ok_or_else(|| verify_error(name, format!("use of undefined value {}", id))),
            Value::Param(id) => function
                .signature
                .params
                .get(id.0 as usize)
                .map(|p| p.param_type)
                .ok_or_else(|| verify_error(name, format!("no parameter {}", id))),
            Value::Constant(c) => Ok(c.ty()),
            Value::Str(_) => Ok(Type::Ptr),
        }
    };

    for (block_id, block) in &body.blocks {
        let is_entry = *block_id == body.entry_block;
        let mut allocas_done = false;

        for inst in &block.instructions {
            if inst.is_alloca() {
                if !is_entry || allocas_done {
                    return Err(verify_error(
                        name,
                        format!("alloca outside the entry prologue in {}", block_id),
                    ));
                }
            } else {
                allocas_done = true;
            }

            for operand in inst.operands() {
                value_type(operand)?;
            }

            match inst {
                Instruction::Load { slot, ty, .. } | Instruction::Store { slot, ty, .. } => {
                    let declared = body
                        .slot(*slot)
                        .ok_or_else(|| verify_error(name, format!("unknown {}", slot)))?;
                    if declared.ty != *ty {
                        return Err(verify_error(
                            name,
                            format!("{} holds {} but is accessed as {}", slot, declared.ty, ty),
                        ));
                    }
                    if let Instruction::Store { value, .. } = inst {
                        let stored = value_type(value)?;
                        if stored != *ty {
                            return Err(verify_error(
                                name,
                                format!("{} value stored into {} slot {}", stored, ty, slot),
                            ));
                        }
                    }
                }
                _ => {}
            }
        }

        match &block.terminator {
            Terminator::Invalid => {
                return Err(verify_error(
                    name,
                    format!("{} ({}) is not terminated", block_id, block.label),
                ));
            }
            Terminator::Return(value) => match (value, returns) {
                (None, Type::Void) => {}
                (None, expected) => {
                    return Err(verify_error(
                        name,
                        format!("void return in function returning {}", expected),
                    ));
                }
                (Some(_), Type::Void) => {
                    return Err(verify_error(name, "value returned from void function"));
                }
                (Some(v), expected) => {
                    let found = value_type(v)?;
                    if found != expected {
                        return Err(verify_error(
                            name,
                            format!("returns {} but is declared {}", found, expected),
                        ));
                    }
                }
            },
            Terminator::Branch { condition, .. } => {
                if value_type(condition)? != Type::Bool {
                    return Err(verify_error(name, "branch condition is not a bool"));
                }
            }
            Terminator::Jump(_) => {}
        }

        for succ in block.successors() {
            if !body.blocks.contains_key(&succ) {
                return Err(verify_error(
                    name,
                    format!("{} branches to missing {}", block_id, succ),
                ));
            }
        }
    }

    Ok(())
}

fn verify_error(function: &str, message: impl Into<String>) -> IrError {
    IrError::VerifyError {
        function: function.to_string(),
        message: message.into(),
    }
}
