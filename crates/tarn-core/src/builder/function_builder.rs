use super::FunctionInstBuilder;
use crate::{
    analysis::{verify_function, ControlFlowGraph},
    block::BlockId,
    function::{Function, FunctionSignature, Parameter},
    instructions::Instruction,
    types::Type,
    values::{ParamId, SlotId, Value},
    IrError, Result,
};

pub struct FunctionBuilder {
    function: Function,
    current_block: Option<BlockId>,
}

impl FunctionBuilder {
    /// Creates a function whose insertion point is its (empty) entry block.
    pub fn new(name: impl Into<String>, params: Vec<Parameter>, returns: Type) -> Self {
        let function = Function::new(FunctionSignature::new(name, params, returns));
        let entry = function.entry_block();

        Self {
            function,
            current_block: Some(entry),
        }
    }

    pub fn name(&self) -> &str {
        self.function.name()
    }

    pub fn signature(&self) -> &FunctionSignature {
        &self.function.signature
    }

    pub fn returns(&self) -> Type {
        self.function.signature.returns
    }

    pub fn function(&self) -> &Function {
        &self.function
    }

    pub fn create_block(&mut self, label: &str) -> BlockId {
        self.function.body.create_block(label)
    }

    pub fn entry_block(&self) -> BlockId {
        self.function.body.entry_block
    }

    pub fn switch_to_block(&mut self, block_id: BlockId) -> Result<()> {
        if !self.function.body.blocks.contains_key(&block_id) {
            return Err(IrError::BuilderError(format!(
                "Block {} does not exist in `{}`",
                block_id,
                self.name()
            )));
        }

        self.current_block = Some(block_id);
        Ok(())
    }

    pub fn current_block(&self) -> Option<BlockId> {
        self.current_block
    }

    pub fn is_terminated(&self) -> bool {
        self.current_block
            .and_then(|id| self.function.body.get_block(id))
            .map(|b| b.is_terminated())
            .unwrap_or(false)
    }

    pub fn is_reachable(&self, block: BlockId) -> bool {
        ControlFlowGraph::from_function(&self.function.body).is_reachable(block)
    }

    pub fn get_param(&self, index: usize) -> Value {
        Value::Param(ParamId(index as u32))
    }

    pub fn param_count(&self) -> usize {
        self.function.signature.params.len()
    }

    /// Reserves a storage slot. The alloca always lands at the top of the
    /// entry block, after any earlier allocas, wherever the cursor is.
    pub fn alloca(&mut self, name: &str, ty: Type) -> Result<SlotId> {
        if ty.is_void() {
            return Err(IrError::TypeError(format!(
                "cannot allocate storage of type void for `{}`",
                name
            )));
        }

        let slot = self.function.body.add_slot(name, ty);
        let entry = self.function.body.entry_block;
        let block = self
            .function
            .body
            .get_block_mut(entry)
            .ok_or_else(|| IrError::BuilderError("Entry block missing".into()))?;

        let position = block
            .instructions
            .iter()
            .take_while(|inst| inst.is_alloca())
            .count();
        block.instructions.insert(
            position,
            Instruction::Alloca {
                slot,
                ty,
                name: name.to_string(),
            },
        );

        Ok(slot)
    }

    pub fn ins(&mut self) -> Result<FunctionInstBuilder<'_>> {
        let block_id = self.current_block.ok_or_else(|| {
            IrError::BuilderError("No current block - call switch_to_block first".into())
        })?;

        Ok(FunctionInstBuilder::new(block_id, &mut self.function.body))
    }

    /// Removes blocks that cannot be reached from the entry block.
    pub fn remove_unreachable_blocks(&mut self) -> usize {
        let reachable = ControlFlowGraph::from_function(&self.function.body).reachable_blocks();
        let removed = self.function.body.retain_blocks(&reachable);
        if let Some(current) = self.current_block {
            if !self.function.body.blocks.contains_key(&current) {
                self.current_block = None;
            }
        }
        removed
    }

    pub fn build(self) -> Result<Function> {
        verify_function(&self.function)?;
        Ok(self.function)
    }
}
