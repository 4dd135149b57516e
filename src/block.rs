// Block Model
// The atomic units a note is made of: single lines, fenced code and fenced math.
// Fence lines are not blocks of their own; they only exist in the text form.

use std::fmt;

/// Unique identifier for a block within one document
pub type BlockId = usize;

/// Language shown for code blocks without a tag
pub const DEFAULT_LANGUAGE: &str = "text";

pub const CODE_FENCE: &str = "```";
pub const MATH_FENCE: &str = "$$";

/// The two kinds of fenced regions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FenceKind {
    Code,
    Math,
}

impl FenceKind {
    /// The token that opens and closes this kind of region
    pub fn token(self) -> &'static str {
        match self {
            FenceKind::Code => CODE_FENCE,
            FenceKind::Math => MATH_FENCE,
        }
    }

    /// Fence kind opened by a raw text line, if any
    pub fn opened_by(line: &str) -> Option<FenceKind> {
        if line.starts_with(CODE_FENCE) {
            Some(FenceKind::Code)
        } else if line.starts_with(MATH_FENCE) {
            Some(FenceKind::Math)
        } else {
            None
        }
    }
}

/// What a block is, carrying only the data relevant to that kind
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockKind {
    Line,
    Code { language: Option<String> },
    Math,
}

impl BlockKind {
    pub fn fence(&self) -> Option<FenceKind> {
        match self {
            BlockKind::Line => None,
            BlockKind::Code { .. } => Some(FenceKind::Code),
            BlockKind::Math => Some(FenceKind::Math),
        }
    }
}

/// A block of content
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    pub id: BlockId,
    pub kind: BlockKind,
    pub content: String,
}

impl Block {
    pub fn new(id: BlockId, kind: BlockKind, content: impl Into<String>) -> Self {
        Block {
            id,
            kind,
            content: content.into(),
        }
    }

    pub fn line(id: BlockId, content: impl Into<String>) -> Self {
        Self::new(id, BlockKind::Line, content)
    }

    pub fn code(id: BlockId, language: Option<String>, content: impl Into<String>) -> Self {
        Self::new(id, BlockKind::Code { language }, content)
    }

    pub fn math(id: BlockId, content: impl Into<String>) -> Self {
        Self::new(id, BlockKind::Math, content)
    }

    /// Empty block of the given fence kind
    pub fn fenced(id: BlockId, kind: FenceKind, language: Option<String>) -> Self {
        match kind {
            FenceKind::Code => Self::code(id, language, ""),
            FenceKind::Math => Self::math(id, ""),
        }
    }

    pub fn is_line(&self) -> bool {
        matches!(self.kind, BlockKind::Line)
    }

    pub fn is_fenced(&self) -> bool {
        self.kind.fence().is_some()
    }

    /// Language tag as written in the fence, if any
    pub fn language_tag(&self) -> Option<&str> {
        match &self.kind {
            BlockKind::Code { language } => language.as_deref(),
            _ => None,
        }
    }

    /// Language used for highlighting; only meaningful for code blocks
    pub fn language(&self) -> Option<&str> {
        match &self.kind {
            BlockKind::Code { language } => Some(language.as_deref().unwrap_or(DEFAULT_LANGUAGE)),
            _ => None,
        }
    }
}

impl fmt::Display for Block {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            BlockKind::Line => write!(f, "Line")?,
            BlockKind::Code { language } => {
                write!(f, "Code({})", language.as_deref().unwrap_or(""))?
            }
            BlockKind::Math => write!(f, "Math")?,
        }
        write!(f, ": {:?}", self.content)
    }
}

/// Hands out block ids for one document
#[derive(Debug, Clone)]
pub struct IdAllocator {
    next: BlockId,
}

impl IdAllocator {
    pub fn new() -> Self {
        IdAllocator { next: 1 }
    }

    pub fn next_id(&mut self) -> BlockId {
        let id = self.next;
        self.next += 1;
        id
    }
}

impl Default for IdAllocator {
    fn default() -> Self {
        Self::new()
    }
}
