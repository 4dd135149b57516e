// Document
// One open note: the block sequence plus cursor, selection, fold and search
// state. Every edit goes through the operations below, each of which leaves
// at least one block in place and the active index pointing at a block.

use std::fmt;

use crate::block::{Block, BlockKind, FenceKind, IdAllocator};
use crate::cursor::{Cursor, Selection, SelectionRange, TextSpan};
use crate::error::{EditError, EditResult};
use crate::fold::FoldState;
use crate::patterns;
use crate::search::SearchState;
use crate::segmenter::segment_with;
use crate::serializer::serialize;
use crate::text;

/// Content put on a line by `create_task`
pub const NEW_TASK: &str = "- [ ] New task";

const INDENT: &str = "  ";

pub struct Document {
    blocks: Vec<Block>,
    ids: IdAllocator,
    cursor: Cursor,
    selection: Option<Selection>,
    folds: FoldState,
    search: SearchState,
}

impl Document {
    /// A document holding a single empty line
    pub fn new() -> Self {
        Self::from_text("")
    }

    /// Segment `text` into a fresh document, caret at the end of the first block
    pub fn from_text(text: &str) -> Self {
        let mut ids = IdAllocator::new();
        let blocks = segment_with(text, &mut ids);
        let caret = text::char_len(&blocks[0].content);
        Document {
            blocks,
            ids,
            cursor: Cursor::new(0, caret),
            selection: None,
            folds: FoldState::new(),
            search: SearchState::new(),
        }
    }

    /// Replace everything with a new segmentation of `text`.
    /// Block ids are not preserved, so fold state is dropped with them.
    pub fn reload(&mut self, text: &str) {
        let visible = self.search.visible;
        *self = Self::from_text(text);
        self.search.visible = visible;
    }

    /// The note text for persisting
    pub fn to_text(&self) -> String {
        serialize(&self.blocks)
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn block(&self, index: usize) -> Option<&Block> {
        self.blocks.get(index)
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// Never true: a document always holds at least one block
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    pub fn active_block(&self) -> &Block {
        &self.blocks[self.cursor.active]
    }

    pub fn selection(&self) -> Option<Selection> {
        self.selection
    }

    pub fn folds(&self) -> &FoldState {
        &self.folds
    }

    pub fn search_state(&self) -> &SearchState {
        &self.search
    }

    // ----- editing -----

    /// Split the active line into `before` (kept) and `after` (new next line)
    pub fn split_line(&mut self, before: &str, after: &str) -> EditResult {
        let index = self.active_line()?;
        if before.contains('\n') || after.contains('\n') {
            return Err(EditError::MultilineContent);
        }

        self.blocks[index].content = before.to_string();
        let line = self.new_line(after);
        self.blocks.insert(index + 1, line);
        self.cursor = Cursor::new(index + 1, 0);
        self.changed();
        Ok(())
    }

    /// Split the active line at the caret
    pub fn split_at_caret(&mut self) -> EditResult {
        let index = self.active_line()?;
        let content = self.blocks[index].content.clone();
        let (before, after) = text::split_at(&content, self.cursor.caret);
        log::debug!("splitting block {} at {}", index, self.cursor.caret);
        self.split_line(before, after)
    }

    /// Enter at the end of a list or task item.
    ///
    /// An empty item ends the list by clearing the line; otherwise a new item
    /// with the same indent and marker follows. Returns whether anything
    /// happened; nothing does unless the caret is at the end of the line.
    pub fn continue_list(&mut self) -> EditResult<bool> {
        let index = self.active_line()?;
        let content = &self.blocks[index].content;
        if self.cursor.caret != text::char_len(content) {
            return Ok(false);
        }

        let Some((ends_list, next_item)) =
            patterns::list_item(content).map(|item| (item.text().is_empty(), item.continuation()))
        else {
            return Ok(false);
        };

        if ends_list {
            self.blocks[index].content.clear();
            self.cursor.caret = 0;
        } else {
            let caret = text::char_len(&next_item);
            let line = self.new_line(next_item);
            self.blocks.insert(index + 1, line);
            self.cursor = Cursor::new(index + 1, caret);
        }
        self.changed();
        Ok(true)
    }

    /// Turn a typed fence opener into an opener line, an empty fenced block
    /// and a closer line, with the cursor in the fenced block.
    pub fn open_fence(&mut self, kind: FenceKind, language: Option<&str>) -> EditResult {
        let index = self.active_line()?;
        let typed_language = match patterns::fence_opener(&self.blocks[index].content) {
            Some((opened, typed)) if opened == kind => typed,
            _ => return Err(EditError::NotAFenceOpener(index)),
        };

        // an explicit language wins over the one typed after the fence
        let language = match kind {
            FenceKind::Code => language
                .map(str::trim)
                .filter(|l| !l.is_empty())
                .map(String::from)
                .or(typed_language),
            FenceKind::Math => None,
        };

        self.blocks[index].content = patterns::open_marker(kind, language.as_deref());
        let fenced = Block::fenced(self.ids.next_id(), kind, language);
        let closer = self.new_line(kind.token());
        self.blocks.splice(index + 1..index + 1, [fenced, closer]);
        self.cursor = Cursor::new(index + 1, 0);
        log::debug!("opened {:?} fence at block {}", kind, index + 1);
        self.changed();
        Ok(())
    }

    /// Leave a code or math block, landing on a new empty line after its
    /// closer line (or right after the block when no closer line follows).
    pub fn exit_fence(&mut self) -> EditResult {
        let index = self.cursor.active;
        let Some(kind) = self.blocks[index].kind.fence() else {
            return Err(EditError::NotAFenceBlock(index));
        };

        let has_closer = self
            .blocks
            .get(index + 1)
            .is_some_and(|b| b.is_line() && b.content.starts_with(kind.token()));
        let at = if has_closer { index + 2 } else { index + 1 };

        let line = self.new_line("");
        self.blocks.insert(at, line);
        self.cursor = Cursor::new(at, 0);
        self.changed();
        Ok(())
    }

    /// Check or uncheck the active task item
    pub fn toggle_task(&mut self) -> EditResult<bool> {
        let index = self.active_line()?;
        let Some(toggled) = patterns::toggle_task(&self.blocks[index].content) else {
            return Ok(false);
        };
        self.blocks[index].content = toggled;
        self.clamp_caret();
        self.changed();
        Ok(true)
    }

    pub fn indent(&mut self) -> EditResult {
        let index = self.active_line()?;
        self.blocks[index].content.insert_str(0, INDENT);
        self.cursor.caret += INDENT.len();
        self.changed();
        Ok(())
    }

    /// Remove two leading spaces; a no-op when they are not there
    pub fn outdent(&mut self) -> EditResult<bool> {
        let index = self.active_line()?;
        if !self.blocks[index].content.starts_with(INDENT) {
            return Ok(false);
        }
        self.blocks[index].content.drain(..INDENT.len());
        self.cursor.caret = self.cursor.caret.saturating_sub(INDENT.len());
        self.changed();
        Ok(true)
    }

    /// Insert an empty line after `index` and make it active
    pub fn insert_block_after(&mut self, index: usize) -> EditResult {
        self.check_index(index)?;
        let line = self.new_line("");
        self.blocks.insert(index + 1, line);
        self.cursor = Cursor::new(index + 1, 0);
        self.selection = None;
        self.changed();
        Ok(())
    }

    /// Remove the block at `index`. The last remaining block is never
    /// removed; that case returns `Ok(false)`.
    pub fn delete_block(&mut self, index: usize) -> EditResult<bool> {
        self.check_index(index)?;
        if self.blocks.len() <= 1 {
            return Ok(false);
        }

        let next_active = index.min(self.blocks.len() - 2);
        self.blocks.remove(index);
        self.focus(next_active);
        self.selection = None;
        self.removed();
        Ok(true)
    }

    /// Delete every block in the inclusive range, in either order
    pub fn delete_range(&mut self, range: SelectionRange) -> EditResult {
        self.check_index(range.start)?;
        self.check_index(range.end)?;
        let (first, last) = range.normalized();

        self.blocks.drain(first..=last);
        if self.blocks.is_empty() {
            let line = self.new_line("");
            self.blocks.push(line);
        }
        log::debug!("deleted blocks {}..={}", first, last);

        self.focus(first.min(self.blocks.len() - 1));
        self.selection = None;
        self.removed();
        Ok(())
    }

    /// Delete dragged-over text. The first block keeps what precedes the
    /// span, the last block keeps what follows it, and blocks in between go.
    /// A span covering its blocks entirely deletes them like `delete_range`.
    pub fn delete_span(&mut self, span: TextSpan) -> EditResult {
        self.check_index(span.start.block)?;
        self.check_index(span.end.block)?;
        let (start, end) = span.normalized();

        let end_len = text::char_len(&self.blocks[end.block].content);
        if start.offset == 0 && end.offset >= end_len {
            return self.delete_range(span.blocks());
        }

        let tail = {
            let (_, after) = text::split_at(&self.blocks[end.block].content, end.offset);
            after.to_string()
        };
        let head = {
            let (before, _) = text::split_at(&self.blocks[start.block].content, start.offset);
            before.to_string()
        };

        if start.block == end.block {
            self.blocks[start.block].content = head + &tail;
        } else if end.offset >= end_len {
            // the last block is covered completely and goes with the middle ones
            self.blocks[start.block].content = head;
            self.blocks.drain(start.block + 1..=end.block);
        } else {
            self.blocks[start.block].content = head;
            self.blocks[end.block].content = tail;
            self.blocks.drain(start.block + 1..end.block);
        }

        self.cursor = Cursor::new(start.block, start.offset);
        self.clamp_caret();
        self.selection = None;
        self.removed();
        Ok(())
    }

    /// Delete whatever is selected. Returns `Ok(false)` without a selection.
    pub fn delete_selection(&mut self) -> EditResult<bool> {
        match self.selection {
            None => Ok(false),
            Some(Selection::Blocks(range)) => self.delete_range(range).map(|_| true),
            Some(Selection::Text(span)) => self.delete_span(span).map(|_| true),
        }
    }

    /// Replace the content of a block, keeping its kind
    pub fn update_content(&mut self, index: usize, content: &str) -> EditResult {
        self.check_index(index)?;
        if self.blocks[index].is_line() && content.contains('\n') {
            return Err(EditError::MultilineContent);
        }
        self.blocks[index].content = content.to_string();
        if index == self.cursor.active {
            self.clamp_caret();
        }
        self.changed();
        Ok(())
    }

    /// Set the language tag of a code block; a blank tag removes it
    pub fn update_language(&mut self, index: usize, language: &str) -> EditResult {
        self.check_index(index)?;
        let BlockKind::Code { language: tag } = &mut self.blocks[index].kind else {
            return Err(EditError::NotACodeBlock(index));
        };
        let language = language.trim();
        *tag = (!language.is_empty()).then(|| language.to_string());
        Ok(())
    }

    /// Type `text` at the caret of the active line
    pub fn insert_text(&mut self, text: &str) -> EditResult {
        let index = self.active_line()?;
        if text.contains('\n') {
            return Err(EditError::MultilineContent);
        }
        text::insert_at(&mut self.blocks[index].content, self.cursor.caret, text);
        self.cursor.caret += text::char_len(text);
        self.clamp_caret();
        self.changed();
        Ok(())
    }

    /// Split the active line at the caret and put an empty fenced block
    /// between the two halves
    pub fn insert_fence_at_caret(&mut self, kind: FenceKind, language: Option<&str>) -> EditResult {
        let index = self.active_line()?;
        let content = self.blocks[index].content.clone();
        let (before, after) = text::split_at(&content, self.cursor.caret);

        let language = language.map(String::from);
        self.blocks[index].content = before.to_string();
        let fenced = Block::fenced(self.ids.next_id(), kind, language);
        let rest = self.new_line(after);
        self.blocks.splice(index + 1..index + 1, [fenced, rest]);
        self.cursor = Cursor::new(index + 1, 0);
        self.changed();
        Ok(())
    }

    /// Turn the active line into a fresh task item
    pub fn create_task(&mut self) -> EditResult {
        let index = self.active_line()?;
        self.blocks[index].content = NEW_TASK.to_string();
        self.cursor.caret = text::char_len(NEW_TASK);
        self.changed();
        Ok(())
    }

    /// Reset to a single empty line
    pub fn clear_all(&mut self) {
        self.blocks = vec![self.new_line("")];
        self.cursor = Cursor::default();
        self.selection = None;
        self.folds.clear();
        self.changed();
    }

    // ----- cursor and selection -----

    /// Make `index` the active block with the caret at its end
    pub fn set_active(&mut self, index: usize) -> EditResult {
        self.check_index(index)?;
        self.focus(index);
        self.selection = None;
        Ok(())
    }

    pub fn set_caret(&mut self, offset: usize) {
        self.cursor.caret = offset;
        self.clamp_caret();
    }

    /// Move to the previous block. Returns false on the first block.
    pub fn move_up(&mut self) -> bool {
        if self.cursor.active == 0 {
            return false;
        }
        self.focus(self.cursor.active - 1);
        true
    }

    /// Move to the next block, appending an empty line when on the last one
    pub fn move_down(&mut self) {
        let index = self.cursor.active;
        if index + 1 < self.blocks.len() {
            self.focus(index + 1);
        } else {
            let line = self.new_line("");
            self.blocks.push(line);
            self.cursor = Cursor::new(index + 1, 0);
            self.changed();
        }
    }

    /// Select whole blocks
    pub fn select_blocks(&mut self, range: SelectionRange) -> EditResult {
        self.check_index(range.start)?;
        self.check_index(range.end)?;
        self.selection = Some(Selection::Blocks(range));
        Ok(())
    }

    /// Shift-click on `index`: move the end of the current selection there,
    /// or select from the active block to `index`.
    pub fn extend_block_selection(&mut self, index: usize) -> EditResult {
        self.check_index(index)?;
        let start = match self.selection {
            Some(selection) => selection.range().start,
            None => self.cursor.active,
        };
        self.selection = Some(Selection::Blocks(SelectionRange::new(start, index)));
        Ok(())
    }

    /// Select text dragged across one or more blocks
    pub fn select_text(&mut self, span: TextSpan) -> EditResult {
        self.check_index(span.start.block)?;
        self.check_index(span.end.block)?;
        self.selection = Some(Selection::Text(span));
        Ok(())
    }

    pub fn select_all(&mut self) {
        self.selection = Some(Selection::Blocks(SelectionRange::new(0, self.blocks.len() - 1)));
    }

    pub fn clear_selection(&mut self) {
        self.selection = None;
    }

    // ----- folding and search -----

    /// Fold or unfold a code or math block; returns the new state
    pub fn toggle_fold(&mut self, index: usize) -> EditResult<bool> {
        self.check_index(index)?;
        if !self.blocks[index].is_fenced() {
            return Err(EditError::NotAFenceBlock(index));
        }
        Ok(self.folds.toggle(&self.blocks[index]))
    }

    pub fn is_folded(&self, index: usize) -> bool {
        self.blocks
            .get(index)
            .is_some_and(|b| self.folds.is_folded(b.id))
    }

    /// Search for `term` and jump to the first match
    pub fn search(&mut self, term: &str) -> Option<usize> {
        self.search.set_term(&self.blocks, term);
        let found = self.search.current_block();
        if let Some(index) = found {
            self.focus(index);
        }
        found
    }

    pub fn next_match(&mut self) -> Option<usize> {
        let found = self.search.next();
        if let Some(index) = found {
            self.focus(index);
        }
        found
    }

    pub fn prev_match(&mut self) -> Option<usize> {
        let found = self.search.prev();
        if let Some(index) = found {
            self.focus(index);
        }
        found
    }

    pub fn toggle_search(&mut self) {
        self.search.toggle();
    }

    pub fn hide_search(&mut self) {
        self.search.visible = false;
    }

    // ----- helpers -----

    fn new_line(&mut self, content: impl Into<String>) -> Block {
        Block::line(self.ids.next_id(), content)
    }

    fn check_index(&self, index: usize) -> EditResult {
        if index < self.blocks.len() {
            Ok(())
        } else {
            Err(EditError::InvalidBlockIndex {
                index,
                len: self.blocks.len(),
            })
        }
    }

    /// Index of the active block, which must be a line
    fn active_line(&self) -> EditResult<usize> {
        let index = self.cursor.active;
        if self.blocks[index].is_line() {
            Ok(index)
        } else {
            Err(EditError::NotALine(index))
        }
    }

    fn focus(&mut self, index: usize) {
        self.cursor = Cursor::new(index, text::char_len(&self.blocks[index].content));
    }

    fn clamp_caret(&mut self) {
        let len = text::char_len(&self.blocks[self.cursor.active].content);
        self.cursor.caret = self.cursor.caret.min(len);
    }

    fn changed(&mut self) {
        self.search.refresh(&self.blocks);
    }

    fn removed(&mut self) {
        self.cursor.clamp_to(self.blocks.len());
        self.folds.retain(&self.blocks);
        self.changed();
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Document ({} blocks, active {}, caret {}):",
            self.blocks.len(),
            self.cursor.active,
            self.cursor.caret
        )?;
        for (i, block) in self.blocks.iter().enumerate() {
            write!(f, "\n  [{}] {}", i, block)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cursor::Position;

    /// A document whose only line is `line`, as if typed rather than loaded
    fn typed(line: &str) -> Document {
        let mut doc = Document::new();
        doc.update_content(0, line).unwrap();
        doc.set_caret(usize::MAX);
        doc
    }

    fn contents(doc: &Document) -> Vec<&str> {
        doc.blocks().iter().map(|b| b.content.as_str()).collect()
    }

    #[test]
    fn test_new_document_has_one_empty_line() {
        let doc = Document::new();
        assert_eq!(doc.len(), 1);
        assert!(doc.active_block().is_line());
        assert_eq!(doc.to_text(), "");
    }

    #[test]
    fn test_split_line() {
        let mut doc = Document::from_text("hello world");
        doc.split_line("hello", " world").unwrap();
        assert_eq!(contents(&doc), vec!["hello", " world"]);
        assert_eq!(doc.cursor(), Cursor::new(1, 0));
    }

    #[test]
    fn test_split_at_caret_edges() {
        let mut doc = Document::from_text("abc");
        doc.set_caret(0);
        doc.split_at_caret().unwrap();
        assert_eq!(contents(&doc), vec!["", "abc"]);

        doc.set_caret(3);
        doc.split_at_caret().unwrap();
        assert_eq!(contents(&doc), vec!["", "abc", ""]);
        assert_eq!(doc.cursor().active, 2);
    }

    #[test]
    fn test_split_then_delete_restores_text() {
        let mut doc = Document::from_text("one\ntwo words\nthree");
        doc.set_active(1).unwrap();
        doc.set_caret(3);
        doc.split_at_caret().unwrap();
        assert_eq!(doc.len(), 4);

        doc.delete_block(2).unwrap();
        doc.update_content(1, "two words").unwrap();
        assert_eq!(doc.to_text(), "one\ntwo words\nthree");
    }

    #[test]
    fn test_split_line_rejects_code_blocks() {
        let mut doc = Document::from_text("```\nx\n```");
        assert_eq!(doc.split_line("a", "b"), Err(EditError::NotALine(0)));
        assert_eq!(doc.to_text(), "```\nx\n```");
    }

    #[test]
    fn test_continue_task_list() {
        let mut doc = Document::from_text("- [ ] buy milk");
        assert!(doc.continue_list().unwrap());
        assert_eq!(contents(&doc), vec!["- [ ] buy milk", "- [ ] "]);
        assert_eq!(doc.cursor(), Cursor::new(1, 6));
    }

    #[test]
    fn test_continue_checked_task_restarts_unchecked() {
        let mut doc = Document::from_text("  - [x] done");
        assert!(doc.continue_list().unwrap());
        assert_eq!(doc.blocks()[1].content, "  - [ ] ");
    }

    #[test]
    fn test_continue_bullet_list() {
        let mut doc = Document::from_text("  * eggs");
        assert!(doc.continue_list().unwrap());
        assert_eq!(doc.blocks()[1].content, "  * ");
    }

    #[test]
    fn test_empty_item_ends_list() {
        let mut doc = Document::from_text("- [ ] milk\n- [ ] ");
        doc.set_active(1).unwrap();
        assert!(doc.continue_list().unwrap());
        assert_eq!(contents(&doc), vec!["- [ ] milk", ""]);
        assert_eq!(doc.cursor(), Cursor::new(1, 0));

        let mut doc = Document::from_text("1. ");
        assert!(doc.continue_list().unwrap());
        assert_eq!(contents(&doc), vec![""]);
    }

    #[test]
    fn test_continue_list_needs_caret_at_end() {
        let mut doc = Document::from_text("- milk");
        doc.set_caret(2);
        assert!(!doc.continue_list().unwrap());
        assert_eq!(doc.len(), 1);

        let mut doc = Document::from_text("not a list");
        assert!(!doc.continue_list().unwrap());
    }

    #[test]
    fn test_open_code_fence() {
        let mut doc = Document::from_text("intro\nx");
        doc.update_content(1, "```python").unwrap();
        doc.set_active(1).unwrap();
        doc.open_fence(FenceKind::Code, Some(" python ")).unwrap();

        assert_eq!(doc.len(), 4);
        assert_eq!(doc.blocks()[1], Block::line(doc.blocks()[1].id, "```python"));
        assert_eq!(doc.blocks()[2].kind, BlockKind::Code { language: Some("python".into()) });
        assert_eq!(doc.blocks()[2].content, "");
        assert_eq!(doc.blocks()[3].content, "```");
        assert_eq!(doc.cursor().active, 2);
    }

    #[test]
    fn test_open_fence_keeps_typed_language() {
        let mut doc = typed("``` python");
        doc.open_fence(FenceKind::Code, None).unwrap();
        assert_eq!(contents(&doc), vec!["```python", "", "```"]);
        assert_eq!(doc.blocks()[1].language_tag(), Some("python"));

        let mut doc = typed("```python");
        doc.open_fence(FenceKind::Code, Some("rust")).unwrap();
        assert_eq!(doc.blocks()[1].language_tag(), Some("rust"));
    }

    #[test]
    fn test_open_math_fence() {
        let mut doc = typed("$$");
        doc.open_fence(FenceKind::Math, None).unwrap();
        assert_eq!(contents(&doc), vec!["$$", "", "$$"]);
        assert_eq!(doc.blocks()[1].kind, BlockKind::Math);
        assert_eq!(doc.cursor().active, 1);
    }

    #[test]
    fn test_open_fence_requires_opener() {
        let mut doc = Document::from_text("plain");
        assert_eq!(
            doc.open_fence(FenceKind::Code, None),
            Err(EditError::NotAFenceOpener(0))
        );
        let mut doc = typed("```");
        assert_eq!(
            doc.open_fence(FenceKind::Math, None),
            Err(EditError::NotAFenceOpener(0))
        );
    }

    #[test]
    fn test_exit_fence_after_closer() {
        let mut doc = typed("```");
        doc.open_fence(FenceKind::Code, None).unwrap();
        doc.exit_fence().unwrap();
        assert_eq!(contents(&doc), vec!["```", "", "```", ""]);
        assert!(doc.blocks()[3].is_line());
        assert_eq!(doc.cursor(), Cursor::new(3, 0));
    }

    #[test]
    fn test_exit_loaded_fence_without_closer_line() {
        let mut doc = Document::from_text("$$\nx\n$$\nafter");
        doc.exit_fence().unwrap();
        assert_eq!(contents(&doc), vec!["x", "", "after"]);
        assert_eq!(doc.cursor().active, 1);
    }

    #[test]
    fn test_exit_fence_from_line_fails() {
        let mut doc = Document::new();
        assert_eq!(doc.exit_fence(), Err(EditError::NotAFenceBlock(0)));
    }

    #[test]
    fn test_toggle_task() {
        let mut doc = Document::from_text("- [ ] call bob");
        assert!(doc.toggle_task().unwrap());
        assert_eq!(doc.blocks()[0].content, "- [x] call bob");
        assert!(doc.toggle_task().unwrap());
        assert_eq!(doc.blocks()[0].content, "- [ ] call bob");

        let mut doc = Document::from_text("call bob");
        assert!(!doc.toggle_task().unwrap());
        assert_eq!(doc.blocks()[0].content, "call bob");
    }

    #[test]
    fn test_indent_and_outdent() {
        let mut doc = Document::from_text("- item");
        doc.indent().unwrap();
        assert_eq!(doc.blocks()[0].content, "  - item");
        assert_eq!(doc.cursor().caret, 8);
        assert!(doc.outdent().unwrap());
        assert_eq!(doc.blocks()[0].content, "- item");
        assert_eq!(doc.cursor().caret, 6);
    }

    #[test]
    fn test_outdent_without_indent_is_noop() {
        let mut doc = Document::from_text("abc");
        assert!(!doc.outdent().unwrap());
        assert_eq!(doc.blocks()[0].content, "abc");

        let mut doc = Document::from_text(" x");
        assert!(!doc.outdent().unwrap());
        assert_eq!(doc.blocks()[0].content, " x");
    }

    #[test]
    fn test_insert_block_after() {
        let mut doc = Document::from_text("a\nb");
        doc.insert_block_after(0).unwrap();
        assert_eq!(contents(&doc), vec!["a", "", "b"]);
        assert_eq!(doc.cursor().active, 1);
        assert_eq!(
            doc.insert_block_after(3),
            Err(EditError::InvalidBlockIndex { index: 3, len: 3 })
        );
    }

    #[test]
    fn test_delete_block_clamps_active() {
        let mut doc = Document::from_text("a\nb\nc");
        assert!(doc.delete_block(2).unwrap());
        assert_eq!(contents(&doc), vec!["a", "b"]);
        assert_eq!(doc.cursor().active, 1);

        assert!(doc.delete_block(0).unwrap());
        assert_eq!(contents(&doc), vec!["b"]);
        assert_eq!(doc.cursor().active, 0);
    }

    #[test]
    fn test_delete_last_block_is_noop() {
        let mut doc = Document::from_text("only");
        assert!(!doc.delete_block(0).unwrap());
        assert_eq!(contents(&doc), vec!["only"]);
    }

    #[test]
    fn test_delete_range() {
        let mut doc = Document::from_text("b0\nb1\nb2\nb3\nb4");
        let first = doc.blocks()[0].clone();
        let last = doc.blocks()[4].clone();

        doc.delete_range(SelectionRange::new(1, 3)).unwrap();
        assert_eq!(doc.blocks(), &[first, last]);
        assert_eq!(doc.cursor().active, 1);
    }

    #[test]
    fn test_delete_range_normalizes_order() {
        let mut doc = Document::from_text("b0\nb1\nb2\nb3");
        doc.delete_range(SelectionRange::new(2, 1)).unwrap();
        assert_eq!(contents(&doc), vec!["b0", "b3"]);
    }

    #[test]
    fn test_delete_everything_leaves_empty_line() {
        let mut doc = Document::from_text("a\n$$\nx\n$$");
        doc.delete_range(SelectionRange::new(0, 1)).unwrap();
        assert_eq!(doc.len(), 1);
        assert!(doc.blocks()[0].is_line());
        assert_eq!(doc.to_text(), "");
    }

    #[test]
    fn test_delete_span_across_blocks() {
        let mut doc = Document::from_text("hello world\nmiddle\ngood bye");
        let span = TextSpan::new(Position::new(2, 5), Position::new(0, 6));
        doc.delete_span(span).unwrap();
        assert_eq!(contents(&doc), vec!["hello ", "bye"]);
        assert_eq!(doc.cursor(), Cursor::new(0, 6));
    }

    #[test]
    fn test_delete_span_through_end_of_last_block() {
        let mut doc = Document::from_text("hello world\nmiddle\nbye\nnext");
        doc.delete_span(TextSpan::new(Position::new(0, 6), Position::new(2, 3)))
            .unwrap();
        assert_eq!(contents(&doc), vec!["hello ", "next"]);
        assert_eq!(doc.cursor(), Cursor::new(0, 6));

        let mut doc = Document::from_text("intro text\n$$\nx\n$$\nafter");
        doc.delete_span(TextSpan::new(Position::new(0, 5), Position::new(1, 1)))
            .unwrap();
        assert_eq!(contents(&doc), vec!["intro", "after"]);
        assert!(doc.blocks().iter().all(Block::is_line));
    }

    #[test]
    fn test_failed_delete_keeps_selection() {
        let mut doc = Document::from_text("a\nb");
        // a selection left over from a longer document
        doc.selection = Some(Selection::Blocks(SelectionRange::new(0, 4)));

        assert_eq!(
            doc.delete_selection(),
            Err(EditError::InvalidBlockIndex { index: 4, len: 2 })
        );
        assert_eq!(
            doc.selection(),
            Some(Selection::Blocks(SelectionRange::new(0, 4)))
        );
        assert_eq!(contents(&doc), vec!["a", "b"]);
    }

    #[test]
    fn test_delete_span_within_block() {
        let mut doc = Document::from_text("abcdef");
        doc.delete_span(TextSpan::new(Position::new(0, 1), Position::new(0, 4)))
            .unwrap();
        assert_eq!(contents(&doc), vec!["aef"]);
        assert_eq!(doc.cursor(), Cursor::new(0, 1));
    }

    #[test]
    fn test_delete_span_covering_whole_blocks() {
        let mut doc = Document::from_text("a\nbb\nc");
        doc.delete_span(TextSpan::new(Position::new(0, 0), Position::new(1, 2)))
            .unwrap();
        assert_eq!(contents(&doc), vec!["c"]);
    }

    #[test]
    fn test_delete_selection() {
        let mut doc = Document::from_text("a\nb\nc");
        assert!(!doc.delete_selection().unwrap());

        doc.set_active(2).unwrap();
        doc.extend_block_selection(1).unwrap();
        assert!(doc.delete_selection().unwrap());
        assert_eq!(contents(&doc), vec!["a"]);
        assert_eq!(doc.selection(), None);
    }

    #[test]
    fn test_extend_drag_selection_by_shift_click() {
        let mut doc = Document::from_text("a\nb\nc\nd");
        doc.select_text(TextSpan::new(Position::new(1, 0), Position::new(2, 1)))
            .unwrap();
        doc.extend_block_selection(3).unwrap();
        assert_eq!(
            doc.selection(),
            Some(Selection::Blocks(SelectionRange::new(1, 3)))
        );
    }

    #[test]
    fn test_update_content_and_language() {
        let mut doc = Document::from_text("x\n```\ncode\n```");
        doc.update_content(1, "fn main() {}\n").unwrap();
        doc.update_language(1, " rust ").unwrap();
        assert_eq!(doc.to_text(), "x\n```rust\nfn main() {}\n\n```");

        doc.update_language(1, "").unwrap();
        assert_eq!(doc.blocks()[1].language(), Some("text"));
        assert_eq!(doc.update_language(0, "rust"), Err(EditError::NotACodeBlock(0)));
        assert_eq!(doc.update_content(0, "a\nb"), Err(EditError::MultilineContent));
    }

    #[test]
    fn test_insert_fence_at_caret() {
        let mut doc = Document::from_text("beforeafter");
        doc.set_caret(6);
        doc.insert_fence_at_caret(FenceKind::Code, Some("javascript"))
            .unwrap();
        assert_eq!(contents(&doc), vec!["before", "", "after"]);
        assert_eq!(doc.blocks()[1].language_tag(), Some("javascript"));
        assert_eq!(doc.cursor().active, 1);
    }

    #[test]
    fn test_move_down_appends_at_end() {
        let mut doc = Document::from_text("a\nb");
        doc.move_down();
        assert_eq!(doc.cursor().active, 1);
        doc.move_down();
        assert_eq!(contents(&doc), vec!["a", "b", ""]);
        assert_eq!(doc.cursor().active, 2);
        assert!(doc.move_up());
        assert_eq!(doc.cursor(), Cursor::new(1, 1));
    }

    #[test]
    fn test_folding_only_fenced_blocks() {
        let mut doc = Document::from_text("a\n$$\nx\n$$");
        assert!(doc.toggle_fold(1).unwrap());
        assert!(doc.is_folded(1));
        assert_eq!(doc.toggle_fold(0), Err(EditError::NotAFenceBlock(0)));
        assert_eq!(doc.to_text(), "a\n$$\nx\n$$");
    }

    #[test]
    fn test_search_moves_active_block() {
        let mut doc = Document::from_text("Apple\nbanana\napple pie");
        assert_eq!(doc.search("APPLE"), Some(0));
        assert_eq!(doc.next_match(), Some(2));
        assert_eq!(doc.cursor().active, 2);
        assert_eq!(doc.next_match(), Some(0));
        assert_eq!(doc.prev_match(), Some(2));
    }

    #[test]
    fn test_search_refreshes_after_edit() {
        let mut doc = Document::from_text("apple\nbanana");
        doc.search("apple");
        doc.update_content(1, "apple tart").unwrap();
        assert_eq!(doc.search_state().matches(), &[0, 1]);
        assert_eq!(doc.cursor().active, 0);
    }

    #[test]
    fn test_reload_resets_state() {
        let mut doc = Document::from_text("a\n$$\nx\n$$");
        doc.toggle_fold(1).unwrap();
        doc.set_active(1).unwrap();
        doc.reload("fresh");
        assert_eq!(doc.len(), 1);
        assert_eq!(doc.cursor(), Cursor::new(0, 5));
        assert!(!doc.is_folded(0));
    }

    #[test]
    fn test_clear_all() {
        let mut doc = Document::from_text("a\nb\nc");
        doc.select_all();
        doc.clear_all();
        assert_eq!(doc.len(), 1);
        assert_eq!(doc.selection(), None);
        assert_eq!(doc.to_text(), "");
    }

    #[test]
    fn test_operations_never_empty_document() {
        let mut doc = Document::from_text("a\nb");
        for _ in 0..5 {
            let _ = doc.delete_block(0);
            assert!(!doc.is_empty());
        }
        doc.select_all();
        doc.delete_selection().unwrap();
        assert_eq!(doc.len(), 1);
        doc.delete_range(SelectionRange::new(0, 0)).unwrap();
        assert_eq!(doc.len(), 1);
        assert!(doc.cursor().active < doc.len());
    }
}
