// Serializer
// Flattens blocks back to note text, re-creating the fence lines.

use crate::block::{Block, BlockKind, CODE_FENCE, MATH_FENCE};

/// Join blocks back into newline-separated text
pub fn serialize(blocks: &[Block]) -> String {
    let mut lines: Vec<&str> = Vec::with_capacity(blocks.len());
    // opening code fences need an owned "```lang" string
    let openers: Vec<String> = blocks
        .iter()
        .map(|block| match &block.kind {
            BlockKind::Code { language } => {
                format!("{}{}", CODE_FENCE, language.as_deref().unwrap_or(""))
            }
            _ => String::new(),
        })
        .collect();

    for (block, opener) in blocks.iter().zip(&openers) {
        match block.kind {
            BlockKind::Line => lines.push(&block.content),
            BlockKind::Code { .. } => {
                lines.push(opener);
                lines.extend(block.content.split('\n'));
                lines.push(CODE_FENCE);
            }
            BlockKind::Math => {
                lines.push(MATH_FENCE);
                lines.extend(block.content.split('\n'));
                lines.push(MATH_FENCE);
            }
        }
    }

    lines.join("\n")
}
