// Library exports for blockpad

pub mod autosave;
pub mod block;
pub mod config;
pub mod content;
pub mod cursor;
pub mod document;
pub mod error;
pub mod fold;
pub mod keymap;
pub mod patterns;
pub mod search;
pub mod segmenter;
pub mod serializer;
pub mod session;
pub mod store;
pub mod text;

pub use block::{Block, BlockId, BlockKind, FenceKind};
pub use cursor::{Cursor, Position, Selection, SelectionRange, TextSpan};
pub use document::Document;
pub use error::{EditError, EditResult, StoreError};
pub use keymap::{Key, KeyEvent, KeyOptions, KeyOutcome, Modifiers};
