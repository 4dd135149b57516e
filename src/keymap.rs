// Keymap
// Keyboard shortcuts for the block editor. The host forwards key events and
// applies its own default behaviour when a key comes back `Ignored`.

use std::fmt;
use std::str::FromStr;

use crate::block::FenceKind;
use crate::cursor::Cursor;
use crate::document::Document;
use crate::error::{EditResult, ParseKeyError};
use crate::patterns;
use crate::text;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Enter,
    Tab,
    Escape,
    Backspace,
    Delete,
    ArrowUp,
    ArrowDown,
    Char(char),
}

/// Command and meta fold into `ctrl`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Modifiers {
    pub ctrl: bool,
    pub shift: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    pub key: Key,
    pub modifiers: Modifiers,
}

impl KeyEvent {
    pub fn new(key: Key) -> Self {
        KeyEvent {
            key,
            modifiers: Modifiers::default(),
        }
    }

    pub fn ctrl(mut self) -> Self {
        self.modifiers.ctrl = true;
        self
    }

    pub fn shift(mut self) -> Self {
        self.modifiers.shift = true;
        self
    }

    fn is(&self, key: Key, ctrl: bool, shift: bool) -> bool {
        self.key == key && self.modifiers.ctrl == ctrl && self.modifiers.shift == shift
    }

    fn is_shortcut(&self, c: char, shift: bool) -> bool {
        matches!(self.key, Key::Char(k) if k.eq_ignore_ascii_case(&c))
            && self.modifiers.ctrl
            && self.modifiers.shift == shift
    }
}

impl FromStr for KeyEvent {
    type Err = ParseKeyError;

    /// Parse descriptions like `Enter`, `Shift+Enter` or `Ctrl+Shift+K`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(ParseKeyError::Empty);
        }

        let (mods, key) = match s.strip_suffix("++") {
            Some(mods) => (mods, "+"),
            None => match s.rsplit_once('+') {
                Some((mods, key)) if !key.is_empty() => (mods, key),
                Some(_) => return Err(ParseKeyError::UnknownKey(s.to_string())),
                None => ("", s),
            },
        };

        let mut modifiers = Modifiers::default();
        for m in mods.split('+').filter(|m| !m.is_empty()) {
            match m.to_ascii_lowercase().as_str() {
                "ctrl" | "control" | "cmd" | "command" | "meta" | "super" => modifiers.ctrl = true,
                "shift" => modifiers.shift = true,
                _ => return Err(ParseKeyError::UnknownModifier(m.to_string())),
            }
        }

        let key = match key.to_ascii_lowercase().as_str() {
            "enter" | "return" => Key::Enter,
            "tab" => Key::Tab,
            "escape" | "esc" => Key::Escape,
            "backspace" => Key::Backspace,
            "delete" | "del" => Key::Delete,
            "arrowup" | "up" => Key::ArrowUp,
            "arrowdown" | "down" => Key::ArrowDown,
            _ => {
                let mut chars = key.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Key::Char(c),
                    _ => return Err(ParseKeyError::UnknownKey(key.to_string())),
                }
            }
        };

        Ok(KeyEvent { key, modifiers })
    }
}

impl fmt::Display for KeyEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.modifiers.ctrl {
            write!(f, "Ctrl+")?;
        }
        if self.modifiers.shift {
            write!(f, "Shift+")?;
        }
        match self.key {
            Key::Char(c) => write!(f, "{}", c.to_ascii_uppercase()),
            key => write!(f, "{:?}", key),
        }
    }
}

/// Whether the editor consumed a key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOutcome {
    Handled,
    /// The host should apply its default behaviour
    Ignored,
}

impl From<bool> for KeyOutcome {
    fn from(handled: bool) -> Self {
        if handled {
            KeyOutcome::Handled
        } else {
            KeyOutcome::Ignored
        }
    }
}

/// Settings that shape how shortcuts behave
#[derive(Debug, Clone)]
pub struct KeyOptions {
    /// Language tag for code blocks inserted with Ctrl+Shift+K
    pub code_language: String,
}

impl Default for KeyOptions {
    fn default() -> Self {
        KeyOptions {
            code_language: "javascript".to_string(),
        }
    }
}

impl Document {
    /// Dispatch a key event to the matching edit operation.
    ///
    /// Rules are tried in a fixed order and the first one that applies wins.
    pub fn handle_key(&mut self, event: KeyEvent, options: &KeyOptions) -> EditResult<KeyOutcome> {
        use KeyOutcome::*;

        let KeyEvent { key, modifiers } = event;
        let on_line = self.active_block().is_line();
        let Cursor { caret, .. } = self.cursor();

        if matches!(key, Key::Delete | Key::Backspace) && self.selection().is_some() {
            self.delete_selection()?;
            return Ok(Handled);
        }
        if event.is(Key::Backspace, true, true) {
            self.clear_all();
            return Ok(Handled);
        }
        if event.is_shortcut('a', false) {
            self.select_all();
            return Ok(Handled);
        }
        if event.is_shortcut('f', false) {
            self.toggle_search();
            return Ok(Handled);
        }
        if key == Key::Escape && self.search_state().visible {
            self.hide_search();
            return Ok(Handled);
        }
        if key == Key::Tab && on_line {
            self.insert_text("\t")?;
            return Ok(Handled);
        }

        if key == Key::Enter {
            let content = self.active_block().content.as_str();

            if modifiers.ctrl && on_line && patterns::toggle_task(content).is_some() {
                self.toggle_task()?;
                return Ok(Handled);
            }

            if on_line {
                if modifiers.shift {
                    self.split_at_caret()?;
                    return Ok(Handled);
                }
                if caret == text::char_len(content) && patterns::list_item(content).is_some() {
                    self.continue_list()?;
                    return Ok(Handled);
                }
                if let Some((kind, language)) = patterns::fence_opener(content) {
                    log::debug!("enter on {:?} fence opener", kind);
                    self.open_fence(kind, language.as_deref())?;
                    return Ok(Handled);
                }
                self.split_at_caret()?;
                return Ok(Handled);
            }

            if modifiers.shift {
                self.exit_fence()?;
                return Ok(Handled);
            }
            return Ok(Ignored);
        }

        if on_line {
            let len = text::char_len(&self.active_block().content);
            if key == Key::ArrowUp && caret == 0 {
                return Ok(self.move_up().into());
            }
            if key == Key::ArrowDown && caret == len {
                self.move_down();
                return Ok(Handled);
            }

            if event.is_shortcut('[', false) {
                self.indent()?;
                return Ok(Handled);
            }
            if event.is_shortcut(']', false) {
                return Ok(self.outdent()?.into());
            }
            if event.is_shortcut('k', true) {
                self.insert_fence_at_caret(FenceKind::Code, Some(&options.code_language))?;
                return Ok(Handled);
            }
            if event.is_shortcut('m', true) {
                self.insert_fence_at_caret(FenceKind::Math, None)?;
                return Ok(Handled);
            }
            if event.is_shortcut('t', true) {
                self.create_task()?;
                return Ok(Handled);
            }
        }

        Ok(Ignored)
    }
}
