// Common content access traits so a host can flush and load notes without
// knowing how the editor stores them.

use crate::document::Document;

/// Provides read access to the current note text.
///
/// Implementations should return text suitable for saving.
pub trait ContentProvider {
    fn get_content(&self) -> String;
}

impl ContentProvider for Document {
    fn get_content(&self) -> String {
        self.to_text()
    }
}

/// Loads note text into an editor, replacing what it held
pub trait ContentLoader {
    fn set_content_from_markdown(&mut self, markdown: &str);
}

impl ContentLoader for Document {
    fn set_content_from_markdown(&mut self, markdown: &str) {
        self.reload(markdown);
    }
}
