use crate::block::BlockId;
use crate::function::FunctionBody;
use std::collections::{HashMap, HashSet, VecDeque};

#[derive(Debug, Clone)]
pub struct ControlFlowGraph {
    pub edges: HashMap<BlockId, Vec<BlockId>>,
    pub reverse_edges: HashMap<BlockId, Vec<BlockId>>,
    pub entry: BlockId,
}

impl ControlFlowGraph {
    pub fn from_function(body: &FunctionBody) -> Self {
        let mut edges = HashMap::new();
        let mut reverse_edges = HashMap::new();

        for (block_id, block) in &body.blocks {
            let successors = block.terminator.successors();
            edges.insert(*block_id, successors.clone());

            for succ in successors {
                reverse_edges
                    .entry(succ)
                    .or_insert_with(Vec::new)
                    .push(*block_id);
            }
        }

        Self {
            edges,
            reverse_edges,
            entry: body.entry_block,
        }
    }

    pub fn predecessors(&self, block: BlockId) -> &[BlockId] {
        self.reverse_edges
            .get(&block)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    pub fn successors(&self, block: BlockId) -> &[BlockId] {
        self.edges.get(&block).map(|v| v.as_slice()).unwrap_or(&[])
    }

    pub fn is_reachable(&self, block: BlockId) -> bool {
        self.reachable_blocks().contains(&block)
    }

    pub fn reachable_blocks(&self) -> HashSet<BlockId> {
        let mut visited = HashSet::new();
        let mut queue = VecDeque::new();
        queue.push_back(self.entry);

        while let Some(current) = queue.pop_front() {
            if visited.insert(current) {
                for &succ in self.successors(current) {
                    queue.push_back(succ);
                }
            }
        }

        visited
    }

    /// Blocks with a back edge into them, i.e. loop headers.
    pub fn loop_headers(&self) -> HashSet<BlockId> {
        let mut headers = HashSet::new();
        let mut on_stack = HashSet::new();
        let mut visited = HashSet::new();
        self.find_back_edges(self.entry, &mut visited, &mut on_stack, &mut headers);
        headers
    }

    fn find_back_edges(
        &self,
        block: BlockId,
        visited: &mut HashSet<BlockId>,
        on_stack: &mut HashSet<BlockId>,
        headers: &mut HashSet<BlockId>,
    ) {
        visited.insert(block);
        on_stack.insert(block);

        for &succ in self.successors(block) {
            if on_stack.contains(&succ) {
                headers.insert(succ);
            } else if !visited.contains(&succ) {
                self.find_back_edges(succ, visited, on_stack, headers);
            }
        }

        on_stack.remove(&block);
    }
}
