// Note persistence
// `NoteStore` is the contract the rest of the app relies on. `LocalNoteStore`
// keeps one TOML file per note in a directory; `MemoryNoteStore` keeps notes
// for the lifetime of the process.

use crate::identity::UserId;
use crate::note::{Note, NoteDraft, NotePatch};
use chrono::Utc;
use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use uuid::Uuid;

const NOTE_EXTENSION: &str = "toml";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("note '{0}' not found")]
    NotFound(String),
    #[error("note has neither a title nor content")]
    EmptyNote,
    #[error("failed to access '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to serialize note '{id}': {source}")]
    Serialize {
        id: String,
        #[source]
        source: toml::ser::Error,
    },
    #[error("failed to parse note file '{}': {source}", .path.display())]
    Deserialize {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Create, read, update and delete notes, partitioned by owner
pub trait NoteStore {
    /// Store a new note and return its id. Blank drafts are rejected.
    fn create(&mut self, draft: NoteDraft, owner: &UserId) -> StoreResult<String>;

    /// All notes of `owner`, newest first
    fn list(&self, owner: &UserId) -> StoreResult<Vec<Note>>;

    fn get(&self, id: &str) -> StoreResult<Note>;

    fn update(&mut self, id: &str, patch: NotePatch) -> StoreResult<()>;

    fn delete(&mut self, id: &str) -> StoreResult<()>;
}

fn new_note(draft: NoteDraft, owner: &UserId) -> StoreResult<Note> {
    if draft.is_blank() {
        return Err(StoreError::EmptyNote);
    }
    let id = Uuid::new_v4().simple().to_string();
    Ok(Note::from_draft(id, owner.clone(), draft, Utc::now()))
}

// Newest first. `sort_by` is stable, so equal timestamps keep input order.
fn sort_newest_first(notes: &mut [Note]) {
    notes.sort_by(|a, b| b.created_at.cmp(&a.created_at));
}

/// Notes stored as `<dir>/<id>.toml`
pub struct LocalNoteStore {
    base_path: PathBuf,
}

impl LocalNoteStore {
    pub fn new(base_path: PathBuf) -> Self {
        LocalNoteStore { base_path }
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Path of the file for `id`, or `None` if `id` could not name a note
    fn note_path(&self, id: &str) -> Option<PathBuf> {
        let valid = !id.is_empty() && id.chars().all(|c| c.is_ascii_alphanumeric() || c == '-');
        valid.then(|| self.base_path.join(format!("{}.{}", id, NOTE_EXTENSION)))
    }

    fn existing_note_path(&self, id: &str) -> StoreResult<PathBuf> {
        self.note_path(id)
            .filter(|path| path.is_file())
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    fn read_note(&self, path: &Path) -> StoreResult<Note> {
        let contents = fs::read_to_string(path).map_err(|source| StoreError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&contents).map_err(|source| StoreError::Deserialize {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Write a note, creating the notes directory if needed
    fn write_note(&self, note: &Note) -> StoreResult<()> {
        fs::create_dir_all(&self.base_path).map_err(|source| StoreError::Io {
            path: self.base_path.clone(),
            source,
        })?;

        let toml = toml::to_string_pretty(note).map_err(|source| StoreError::Serialize {
            id: note.id.clone(),
            source,
        })?;

        let path = self
            .note_path(&note.id)
            .ok_or_else(|| StoreError::NotFound(note.id.clone()))?;
        fs::write(&path, toml).map_err(|source| StoreError::Io { path, source })
    }

    /// Every readable note file in the directory (non-recursive)
    fn all_notes(&self) -> StoreResult<Vec<Note>> {
        if !self.base_path.exists() {
            return Ok(Vec::new());
        }

        let entries = fs::read_dir(&self.base_path).map_err(|source| StoreError::Io {
            path: self.base_path.clone(),
            source,
        })?;

        let mut notes = Vec::new();
        for entry in entries.flatten() {
            let path = entry.path();
            if !path.is_file() || path.extension().and_then(|s| s.to_str()) != Some(NOTE_EXTENSION)
            {
                continue;
            }
            match self.read_note(&path) {
                Ok(note) => notes.push(note),
                Err(err) => tracing::warn!(error = %err, "skipping unreadable note file"),
            }
        }
        Ok(notes)
    }
}

impl NoteStore for LocalNoteStore {
    fn create(&mut self, draft: NoteDraft, owner: &UserId) -> StoreResult<String> {
        let note = new_note(draft, owner)?;
        self.write_note(&note)?;
        tracing::debug!(id = %note.id, owner = %owner, "created note");
        Ok(note.id)
    }

    fn list(&self, owner: &UserId) -> StoreResult<Vec<Note>> {
        let mut notes: Vec<Note> = self
            .all_notes()?
            .into_iter()
            .filter(|note| &note.owner_id == owner)
            .collect();
        notes.sort_by(|a, b| a.id.cmp(&b.id));
        sort_newest_first(&mut notes);
        tracing::debug!(owner = %owner, count = notes.len(), "listed notes");
        Ok(notes)
    }

    fn get(&self, id: &str) -> StoreResult<Note> {
        let path = self.existing_note_path(id)?;
        self.read_note(&path)
    }

    fn update(&mut self, id: &str, patch: NotePatch) -> StoreResult<()> {
        let mut note = self.get(id)?;
        note.apply(patch, Utc::now());
        self.write_note(&note)?;
        tracing::debug!(id = %id, "updated note");
        Ok(())
    }

    fn delete(&mut self, id: &str) -> StoreResult<()> {
        let path = self.existing_note_path(id)?;
        fs::remove_file(&path).map_err(|source| StoreError::Io { path, source })?;
        tracing::debug!(id = %id, "deleted note");
        Ok(())
    }
}

/// Notes kept in memory, in creation order
#[derive(Default)]
pub struct MemoryNoteStore {
    notes: Vec<Note>,
    index: HashMap<String, usize>,
}

impl MemoryNoteStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn position(&self, id: &str) -> StoreResult<usize> {
        self.index
            .get(id)
            .copied()
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    fn reindex(&mut self) {
        self.index = self
            .notes
            .iter()
            .enumerate()
            .map(|(i, note)| (note.id.clone(), i))
            .collect();
    }
}

impl NoteStore for MemoryNoteStore {
    fn create(&mut self, draft: NoteDraft, owner: &UserId) -> StoreResult<String> {
        let note = new_note(draft, owner)?;
        let id = note.id.clone();
        self.index.insert(id.clone(), self.notes.len());
        self.notes.push(note);
        tracing::debug!(id = %id, owner = %owner, "created note in memory");
        Ok(id)
    }

    fn list(&self, owner: &UserId) -> StoreResult<Vec<Note>> {
        // Reverse creation order first so notes created in the same instant
        // still come out newest first.
        let mut notes: Vec<Note> = self
            .notes
            .iter()
            .rev()
            .filter(|note| &note.owner_id == owner)
            .cloned()
            .collect();
        sort_newest_first(&mut notes);
        Ok(notes)
    }

    fn get(&self, id: &str) -> StoreResult<Note> {
        let pos = self.position(id)?;
        Ok(self.notes[pos].clone())
    }

    fn update(&mut self, id: &str, patch: NotePatch) -> StoreResult<()> {
        let pos = self.position(id)?;
        self.notes[pos].apply(patch, Utc::now());
        Ok(())
    }

    fn delete(&mut self, id: &str) -> StoreResult<()> {
        let pos = self.position(id)?;
        self.notes.remove(pos);
        self.reindex();
        Ok(())
    }
}
