use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use walkdir::WalkDir;

use crate::error::StoreError;

/// Extension given to notes saved without one
pub const NOTE_EXTENSION: &str = "md";

#[derive(Debug, Clone)]
pub struct Note {
    pub name: String,
    pub path: PathBuf,
    pub content: String,
    pub modified_time: Option<SystemTime>,
}

/// Notes stored as files below a base directory, addressed by relative
/// name such as `project-a/standup`
pub struct NoteStore {
    base_path: PathBuf,
}

impl NoteStore {
    pub fn new(base_path: PathBuf) -> Self {
        NoteStore { base_path }
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Path of the file backing `name`; `.md` is added when no extension is given
    pub fn path_for(&self, name: &str) -> PathBuf {
        let mut path = self.base_path.join(name);
        if path.extension().is_none() {
            path.set_extension(NOTE_EXTENSION);
        }
        path
    }

    /// Load a note by name.
    /// A missing file yields an empty note that is created on first save.
    pub fn load(&self, name: &str) -> Result<Note, StoreError> {
        let path = self.path_for(name);

        let (content, modified_time) = if path.exists() {
            let content = fs::read_to_string(&path).map_err(|source| StoreError::Read {
                name: name.to_string(),
                source,
            })?;
            let mtime = fs::metadata(&path).ok().and_then(|m| m.modified().ok());
            (content, mtime)
        } else {
            (String::new(), None)
        };

        Ok(Note {
            name: name.to_string(),
            path,
            content,
            modified_time,
        })
    }

    /// Write a note, creating parent directories as needed
    pub fn save(&self, note: &Note) -> Result<(), StoreError> {
        let write_err = |source| StoreError::Write {
            name: note.name.clone(),
            source,
        };

        if let Some(parent) = note.path.parent() {
            fs::create_dir_all(parent).map_err(write_err)?;
        }
        fs::write(&note.path, &note.content).map_err(write_err)?;

        log::info!("saved '{}' ({} bytes)", note.name, note.content.len());
        Ok(())
    }

    /// Every note below the base directory, sorted by relative name
    pub fn list_all(&self) -> Result<Vec<String>, StoreError> {
        if !self.base_path.exists() {
            return Ok(Vec::new());
        }

        let mut names = Vec::new();
        for entry in WalkDir::new(&self.base_path).follow_links(true) {
            let entry = entry.map_err(|source| StoreError::List {
                path: self.base_path.clone(),
                source,
            })?;
            let path = entry.path();
            if !entry.file_type().is_file()
                || path.extension().and_then(|e| e.to_str()) != Some(NOTE_EXTENSION)
            {
                continue;
            }
            if let Some(name) = self.name_for(path) {
                names.push(name);
            }
        }

        names.sort();
        Ok(names)
    }

    fn name_for(&self, path: &Path) -> Option<String> {
        let relative = path.strip_prefix(&self.base_path).ok()?.with_extension("");
        let parts: Vec<&str> = relative
            .components()
            .map(|c| c.as_os_str().to_str())
            .collect::<Option<_>>()?;
        Some(parts.join("/"))
    }
}
