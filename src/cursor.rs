// Cursor and selection state
// The active block, the caret inside it, and the two ways a multi-block
// selection can be made: shift-clicking whole blocks or dragging across text.

/// The block receiving keystrokes and the caret within it.
///
/// `caret` counts characters and only applies to line blocks; code and math
/// blocks keep their own multi-line caret in the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Cursor {
    pub active: usize,
    pub caret: usize,
}

impl Cursor {
    pub fn new(active: usize, caret: usize) -> Self {
        Cursor { active, caret }
    }

    /// Keep `active` inside a document of `len` blocks
    pub fn clamp_to(&mut self, len: usize) {
        self.active = self.active.min(len.saturating_sub(1));
    }
}

/// A position inside the text of a block
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Position {
    pub block: usize,
    pub offset: usize,
}

impl Position {
    pub fn new(block: usize, offset: usize) -> Self {
        Position { block, offset }
    }
}

/// Inclusive range of whole blocks; `start` may be after `end`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectionRange {
    pub start: usize,
    pub end: usize,
}

impl SelectionRange {
    pub fn new(start: usize, end: usize) -> Self {
        SelectionRange { start, end }
    }

    /// (first, last) block index
    pub fn normalized(&self) -> (usize, usize) {
        (self.start.min(self.end), self.start.max(self.end))
    }

    pub fn contains(&self, index: usize) -> bool {
        let (first, last) = self.normalized();
        (first..=last).contains(&index)
    }
}

/// Text selected by dragging, possibly starting and ending mid-block
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextSpan {
    pub start: Position,
    pub end: Position,
}

impl TextSpan {
    pub fn new(start: Position, end: Position) -> Self {
        TextSpan { start, end }
    }

    /// Endpoints in document order
    pub fn normalized(&self) -> (Position, Position) {
        if self.start <= self.end {
            (self.start, self.end)
        } else {
            (self.end, self.start)
        }
    }

    /// Blocks touched by this span
    pub fn blocks(&self) -> SelectionRange {
        SelectionRange::new(self.start.block, self.end.block)
    }
}

/// The current multi-block selection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    Blocks(SelectionRange),
    Text(TextSpan),
}

impl Selection {
    /// Blocks highlighted by this selection
    pub fn range(&self) -> SelectionRange {
        match self {
            Selection::Blocks(range) => *range,
            Selection::Text(span) => span.blocks(),
        }
    }
}
