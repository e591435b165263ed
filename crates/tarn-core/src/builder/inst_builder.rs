use crate::{
    block::{BlockId, Terminator},
    function::FunctionBody,
    instructions::{BinOp, Instruction},
    types::Type,
    values::{SlotId, Value},
    IrError, Result,
};

/// Appends instructions to one block of a function body.
pub struct FunctionInstBuilder<'a> {
    block_id: BlockId,
    body: &'a mut FunctionBody,
}

impl<'a> FunctionInstBuilder<'a> {
    pub(crate) fn new(block_id: BlockId, body: &'a mut FunctionBody) -> Self {
        Self { block_id, body }
    }

    pub fn block(&self) -> BlockId {
        self.block_id
    }

    pub fn load(&mut self, slot: SlotId, ty: Type) -> Value {
        let result = self.body.next_temp();
        self.insert_inst(Instruction::Load {
            result: result.clone(),
            slot,
            ty,
        });
        result
    }

    pub fn store(&mut self, slot: SlotId, value: Value, ty: Type) {
        self.insert_inst(Instruction::Store { slot, value, ty });
    }

    pub fn binary(&mut self, op: BinOp, left: Value, right: Value, ty: Type) -> Value {
        let result = self.body.next_temp();
        self.insert_inst(op.build(result.clone(), left, right, ty));
        result
    }

    pub fn add(&mut self, left: Value, right: Value, ty: Type) -> Value {
        self.binary(BinOp::Add, left, right, ty)
    }

    pub fn sub(&mut self, left: Value, right: Value, ty: Type) -> Value {
        self.binary(BinOp::Sub, left, right, ty)
    }

    pub fn mul(&mut self, left: Value, right: Value, ty: Type) -> Value {
        self.binary(BinOp::Mul, left, right, ty)
    }

    pub fn div(&mut self, left: Value, right: Value, ty: Type) -> Value {
        self.binary(BinOp::Div, left, right, ty)
    }

    pub fn lt(&mut self, left: Value, right: Value, ty: Type) -> Value {
        self.binary(BinOp::Lt, left, right, ty)
    }

    pub fn ne(&mut self, left: Value, right: Value, ty: Type) -> Value {
        self.binary(BinOp::Ne, left, right, ty)
    }

    pub fn neg(&mut self, operand: Value, ty: Type) -> Value {
        let result = self.body.next_temp();
        self.insert_inst(Instruction::Neg {
            result: result.clone(),
            operand,
            ty,
        });
        result
    }

    /// Converts between numeric representations. Identity casts emit nothing.
    pub fn cast(&mut self, value: Value, from: Type, to: Type) -> Result<Value> {
        if from == to {
            return Ok(value);
        }

        let supported = matches!(
            (from, to),
            (Type::I32, Type::F64)
                | (Type::F64, Type::I32)
                | (Type::Bool, Type::I32)
                | (Type::Bool, Type::F64)
        );
        if !supported {
            return Err(IrError::TypeError(format!(
                "no conversion from {} to {}",
                from, to
            )));
        }

        let result = self.body.next_temp();
        self.insert_inst(Instruction::Cast {
            result: result.clone(),
            value,
            from,
            to,
        });
        Ok(result)
    }

    pub fn call(&mut self, callee: &str, args: Vec<Value>, returns: Type) -> Option<Value> {
        let result = if returns.is_void() {
            None
        } else {
            Some(self.body.next_temp())
        };
        self.insert_inst(Instruction::Call {
            result: result.clone(),
            callee: callee.to_string(),
            args,
            returns,
        });
        result
    }

    pub fn branch(
        &mut self,
        condition: Value,
        then_block: BlockId,
        else_block: BlockId,
    ) -> Result<()> {
        self.set_terminator(Terminator::Branch {
            condition,
            then_block,
            else_block,
        })
    }

    pub fn jump(&mut self, target: BlockId) -> Result<()> {
        self.set_terminator(Terminator::Jump(target))
    }

    pub fn return_value(&mut self, value: Value) -> Result<()> {
        self.set_terminator(Terminator::Return(Some(value)))
    }

    pub fn return_void(&mut self) -> Result<()> {
        self.set_terminator(Terminator::Return(None))
    }

    fn insert_inst(&mut self, inst: Instruction) {
        if let Some(block) = self.body.blocks.get_mut(&self.block_id) {
            block.instructions.push(inst);
        }
    }

    fn set_terminator(&mut self, term: Terminator) -> Result<()> {
        if let Some(block) = self.body.blocks.get_mut(&self.block_id) {
            if block.is_terminated() {
                return Err(IrError::BuilderError(format!(
                    "Block {} already terminated",
                    self.block_id
                )));
            }
            block.terminator = term;
            Ok(())
        } else {
            Err(IrError::BuilderError("Block not found".into()))
        }
    }
}
