use std::time::{Duration, SystemTime};

use chrono::{DateTime, Local};

use crate::content::ContentProvider;
use crate::error::StoreError;
use crate::store::NoteStore;

/// Save bookkeeping for the open note.
///
/// Changes are flushed when the editor loses focus or once the debounce
/// delay has passed since the last change. Content identical to what was
/// loaded or last saved is never written.
pub struct AutoSaveState {
    /// When the content was last changed
    pub last_change_time: Option<SystemTime>,
    /// When the content was last successfully saved
    pub last_save_time: Option<SystemTime>,
    /// Whether there are changes not yet flushed
    pub pending_save: bool,
    /// Content as loaded or last saved
    pub original_content: String,
    /// Name of the note being edited
    pub current_note: String,
}

impl AutoSaveState {
    pub fn new() -> Self {
        AutoSaveState {
            last_change_time: None,
            last_save_time: None,
            pending_save: false,
            original_content: String::new(),
            current_note: String::new(),
        }
    }

    /// Reset state when opening another note
    pub fn reset_for_note(&mut self, name: &str, content: &str) {
        self.current_note = name.to_string();
        self.original_content = content.to_string();
        self.last_change_time = None;
        self.last_save_time = None;
        self.pending_save = false;
    }

    pub fn mark_changed(&mut self) {
        self.mark_changed_at(SystemTime::now());
    }

    pub fn mark_changed_at(&mut self, time: SystemTime) {
        self.last_change_time = Some(time);
        self.pending_save = true;
    }

    /// Whether `delay` has passed since the last unsaved change
    pub fn is_due(&self, now: SystemTime, delay: Duration) -> bool {
        match self.last_change_time {
            Some(changed) if self.pending_save => now
                .duration_since(changed)
                .map(|elapsed| elapsed >= delay)
                .unwrap_or(false),
            _ => false,
        }
    }

    /// Write the editor's content if it differs from what is on disk.
    /// Returns whether a write happened.
    pub fn flush<T: ContentProvider + ?Sized>(
        &mut self,
        editor: &T,
        store: &NoteStore,
    ) -> Result<bool, StoreError> {
        let current_content = editor.get_content();
        self.pending_save = false;

        if current_content == self.original_content {
            return Ok(false);
        }

        let mut note = store.load(&self.current_note)?;
        note.content = current_content;
        if let Err(e) = store.save(&note) {
            self.pending_save = true;
            return Err(e);
        }

        self.last_save_time = Some(SystemTime::now());
        self.original_content = note.content;
        Ok(true)
    }

    /// Status line text, such as "saved 2 min ago"
    pub fn status_text(&self) -> String {
        if let Some(save_time) = self.last_save_time {
            format_time_since(save_time, SystemTime::now())
        } else if self.pending_save {
            "not saved".to_string()
        } else {
            String::new()
        }
    }
}

impl Default for AutoSaveState {
    fn default() -> Self {
        Self::new()
    }
}

/// Format the time between `time` and `now` as a human-readable string
pub fn format_time_since(time: SystemTime, now: SystemTime) -> String {
    let Ok(duration) = now.duration_since(time) else {
        return "saved just now".to_string();
    };
    let secs = duration.as_secs();

    let (count, unit) = match secs {
        0..60 => return "saved just now".to_string(),
        60..3600 => (secs / 60, "min"),
        3600..86400 => (secs / 3600, "hour"),
        86400..604800 => (secs / 86400, "day"),
        // a week or more: show the date
        _ => return format_absolute_date(time),
    };

    if count == 1 || unit == "min" {
        format!("saved {} {} ago", count, unit)
    } else {
        format!("saved {} {}s ago", count, unit)
    }
}

fn format_absolute_date(time: SystemTime) -> String {
    let date: DateTime<Local> = time.into();
    format!("saved {}", date.format("%Y-%m-%d"))
}
