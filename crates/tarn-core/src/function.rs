use crate::block::{BasicBlock, BlockId};
use crate::types::Type;
use crate::values::{SlotId, TempId, Value};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Function {
    pub signature: FunctionSignature,
    pub body: FunctionBody,
}

impl Function {
    pub fn new(signature: FunctionSignature) -> Self {
        Self {
            signature,
            body: FunctionBody::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.signature.name
    }

    pub fn entry_block(&self) -> BlockId {
        self.body.entry_block()
    }

    pub fn block_count(&self) -> usize {
        self.body.blocks.len()
    }

    pub fn blocks_labelled(&self, label: &str) -> Vec<&BasicBlock> {
        self.body
            .blocks
            .values()
            .filter(|block| block.label == label)
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionSignature {
    pub name: String,
    pub params: Vec<Parameter>,
    pub returns: Type,
}

impl FunctionSignature {
    pub fn new(name: impl Into<String>, params: Vec<Parameter>, returns: Type) -> Self {
        Self {
            name: name.into(),
            params,
            returns,
        }
    }

    pub fn param_types(&self) -> Vec<Type> {
        self.params.iter().map(|p| p.param_type).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
    pub name: String,
    pub param_type: Type,
}

impl Parameter {
    pub fn new(name: impl Into<String>, param_type: Type) -> Self {
        Self {
            name: name.into(),
            param_type,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StackSlot {
    pub id: SlotId,
    pub name: String,
    pub ty: Type,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionBody {
    pub entry_block: BlockId,
    pub blocks: IndexMap<BlockId, BasicBlock>,
    pub slots: Vec<StackSlot>,
    next_block_id: u32,
    next_temp_id: u32,
}

impl FunctionBody {
    pub fn new() -> Self {
        let entry_block = BlockId(0);
        let mut blocks = IndexMap::new();
        blocks.insert(entry_block, BasicBlock::new(entry_block, "entry"));

        Self {
            entry_block,
            blocks,
            slots: Vec::new(),
            next_block_id: 1,
            next_temp_id: 0,
        }
    }

    pub fn create_block(&mut self, label: impl Into<String>) -> BlockId {
        let id = BlockId(self.next_block_id);
        self.next_block_id += 1;
        self.blocks.insert(id, BasicBlock::new(id, label));
        id
    }

    pub fn get_block(&self, id: BlockId) -> Option<&BasicBlock> {
        self.blocks.get(&id)
    }

    pub fn get_block_mut(&mut self, id: BlockId) -> Option<&mut BasicBlock> {
        self.blocks.get_mut(&id)
    }

    pub fn entry_block(&self) -> BlockId {
        self.entry_block
    }

    pub fn add_slot(&mut self, name: impl Into<String>, ty: Type) -> SlotId {
        let id = SlotId(self.slots.len() as u32);
        self.slots.push(StackSlot {
            id,
            name: name.into(),
            ty,
        });
        id
    }

    pub fn slot(&self, id: SlotId) -> Option<&StackSlot> {
        self.slots.get(id.0 as usize)
    }

    pub fn next_temp(&mut self) -> Value {
        let id = TempId(self.next_temp_id);
        self.next_temp_id += 1;
        Value::Temp(id)
    }

    /// Drops every block not in `keep`. The entry block is always kept.
    pub fn retain_blocks(&mut self, keep: &HashSet<BlockId>) -> usize {
        let entry = self.entry_block;
        let before = self.blocks.len();
        self.blocks
            .retain(|id, _| *id == entry || keep.contains(id));
        before - self.blocks.len()
    }
}

impl Default for FunctionBody {
    fn default() -> Self {
        Self::new()
    }
}
