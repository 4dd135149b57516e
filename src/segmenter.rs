// Segmenter
// Turns note text into blocks in a single forward pass. Fence lines are
// consumed here and re-created by the serializer.

use crate::block::{Block, FenceKind, IdAllocator};

/// Segment `text` using fresh block ids
pub fn segment(text: &str) -> Vec<Block> {
    segment_with(text, &mut IdAllocator::new())
}

/// Segment `text`, taking block ids from `ids`.
///
/// Always returns at least one block: empty input yields a single empty line.
/// A fence that is never closed runs to the end of the input.
pub fn segment_with(text: &str, ids: &mut IdAllocator) -> Vec<Block> {
    let lines: Vec<&str> = text.split('\n').collect();
    let mut blocks = Vec::new();
    let mut i = 0;

    while i < lines.len() {
        let line = lines[i];

        let Some(kind) = FenceKind::opened_by(line) else {
            blocks.push(Block::line(ids.next_id(), line));
            i += 1;
            continue;
        };

        let language = match kind {
            FenceKind::Code => {
                let tag = line[kind.token().len()..].trim();
                (!tag.is_empty()).then(|| tag.to_string())
            }
            FenceKind::Math => None,
        };

        i += 1;
        let start = i;
        while i < lines.len() && !lines[i].starts_with(kind.token()) {
            i += 1;
        }
        let body = lines[start..i].join("\n");
        // skip the closer (a no-op past the end of an unterminated fence)
        i += 1;

        let mut block = Block::fenced(ids.next_id(), kind, language);
        block.content = body;
        blocks.push(block);
    }

    log::debug!("segmented {} lines into {} blocks", lines.len(), blocks.len());
    blocks
}
