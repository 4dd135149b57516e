use std::collections::HashMap;

use crate::block::{Block, BlockId};

/// Collapsed/expanded flags for code and math blocks, keyed by block id.
/// Purely presentational: folding never touches block content.
#[derive(Debug, Clone, Default)]
pub struct FoldState {
    folded: HashMap<BlockId, bool>,
}

impl FoldState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flip the flag for `block` and return the new state.
    /// Lines cannot be folded and always report `false`.
    pub fn toggle(&mut self, block: &Block) -> bool {
        if !block.is_fenced() {
            return false;
        }
        let entry = self.folded.entry(block.id).or_insert(false);
        *entry = !*entry;
        *entry
    }

    pub fn is_folded(&self, id: BlockId) -> bool {
        self.folded.get(&id).copied().unwrap_or(false)
    }

    /// Forget blocks that no longer exist
    pub fn retain(&mut self, blocks: &[Block]) {
        self.folded.retain(|id, _| blocks.iter().any(|b| b.id == *id));
    }

    pub fn clear(&mut self) {
        self.folded.clear();
    }
}
