// In-document search
// Case-insensitive substring search over block contents with a wrapping
// "current match" pointer.

use crate::block::Block;

/// Terms shorter than this never match
pub const MIN_TERM_LEN: usize = 2;

/// Indices of blocks whose content contains `term`, ignoring case
pub fn find_matches(blocks: &[Block], term: &str) -> Vec<usize> {
    if term.chars().count() < MIN_TERM_LEN {
        return Vec::new();
    }
    let needle = term.to_lowercase();
    blocks
        .iter()
        .enumerate()
        .filter(|(_, block)| block.content.to_lowercase().contains(&needle))
        .map(|(i, _)| i)
        .collect()
}

#[derive(Debug, Clone, Default)]
pub struct SearchState {
    pub visible: bool,
    term: String,
    matches: Vec<usize>,
    current: usize,
}

impl SearchState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn term(&self) -> &str {
        &self.term
    }

    pub fn matches(&self) -> &[usize] {
        &self.matches
    }

    /// Position of the current match within `matches()`
    pub fn current(&self) -> usize {
        self.current
    }

    /// Block index of the current match
    pub fn current_block(&self) -> Option<usize> {
        self.matches.get(self.current).copied()
    }

    /// Start a new search; the pointer restarts at the first match
    pub fn set_term(&mut self, blocks: &[Block], term: &str) {
        self.term = term.to_string();
        self.matches = find_matches(blocks, term);
        self.current = 0;
    }

    /// Re-run the current term after the blocks changed
    pub fn refresh(&mut self, blocks: &[Block]) {
        if self.term.is_empty() {
            return;
        }
        self.matches = find_matches(blocks, &self.term);
        self.current = self.current.min(self.matches.len().saturating_sub(1));
    }

    pub fn next(&mut self) -> Option<usize> {
        if self.matches.is_empty() {
            return None;
        }
        self.current = if self.current + 1 >= self.matches.len() { 0 } else { self.current + 1 };
        self.current_block()
    }

    pub fn prev(&mut self) -> Option<usize> {
        if self.matches.is_empty() {
            return None;
        }
        self.current = if self.current == 0 { self.matches.len() - 1 } else { self.current - 1 };
        self.current_block()
    }

    /// Show or hide the search bar; either way the term is cleared
    pub fn toggle(&mut self) {
        self.visible = !self.visible;
        self.clear();
    }

    pub fn clear(&mut self) {
        self.term.clear();
        self.matches.clear();
        self.current = 0;
    }
}
