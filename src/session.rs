// Edit session
// What a host keeps around while one note is open: the document, its
// autosave bookkeeping and the user's key settings. Changes are written
// once the configured quiet period has passed, or when the editor loses
// focus.

use std::time::{Duration, SystemTime};

use crate::autosave::AutoSaveState;
use crate::config::Config;
use crate::document::Document;
use crate::error::{EditResult, StoreError};
use crate::keymap::{Key, KeyEvent, KeyOptions, KeyOutcome};
use crate::store::NoteStore;

pub struct EditSession<'a> {
    store: &'a NoteStore,
    document: Document,
    autosave: AutoSaveState,
    options: KeyOptions,
    delay: Duration,
}

impl<'a> EditSession<'a> {
    /// Load `name` from `store` with the caret at the end of the last block
    pub fn open(store: &'a NoteStore, name: &str, config: &Config) -> Result<Self, StoreError> {
        let note = store.load(name)?;
        let mut document = Document::from_text(&note.content);
        let last = document.len() - 1;
        // the last block always exists
        let _ = document.set_active(last);

        let mut autosave = AutoSaveState::new();
        autosave.reset_for_note(&note.name, &note.content);

        Ok(EditSession {
            store,
            document,
            autosave,
            options: config.key_options(),
            delay: config.autosave_delay(),
        })
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Run an edit on the document, noting a change when the text differs
    pub fn edit<R>(&mut self, f: impl FnOnce(&mut Document) -> EditResult<R>) -> EditResult<R> {
        let before = self.document.to_text();
        let result = f(&mut self.document)?;
        if self.document.to_text() != before {
            self.autosave.mark_changed();
        }
        Ok(result)
    }

    /// Handle a key press, typing plain characters the editor leaves alone
    pub fn press(&mut self, event: KeyEvent) -> EditResult<KeyOutcome> {
        let options = self.options.clone();
        self.edit(|doc| {
            let outcome = doc.handle_key(event, &options)?;
            if outcome == KeyOutcome::Handled {
                return Ok(outcome);
            }
            match event.key {
                Key::Char(c) if !event.modifiers.ctrl && doc.active_block().is_line() => {
                    doc.insert_text(c.encode_utf8(&mut [0; 4]))?;
                    Ok(KeyOutcome::Handled)
                }
                _ => {
                    log::debug!("key {} ignored", event);
                    Ok(outcome)
                }
            }
        })
    }

    /// Save if the quiet period since the last change has passed
    pub fn tick(&mut self, now: SystemTime) -> Result<bool, StoreError> {
        if !self.autosave.is_due(now, self.delay) {
            return Ok(false);
        }
        self.autosave.flush(&self.document, self.store)
    }

    /// The editor lost focus: save pending changes right away
    pub fn blur(&mut self) -> Result<bool, StoreError> {
        self.autosave.flush(&self.document, self.store)
    }

    pub fn status_text(&self) -> String {
        self.autosave.status_text()
    }
}
