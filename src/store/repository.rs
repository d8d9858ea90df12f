//! NoteRepository trait and result types.

use crate::domain::{LabelWithCount, NewNote, Note, NoteId, Section};
use crate::search::{SearchStage, SnippetOptions};
use serde::Serialize;
use std::collections::BTreeSet;
use std::path::PathBuf;
use thiserror::Error;

// ===========================================
// StoreError Type
// ===========================================

/// Errors that can occur during store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The requested note does not exist.
    #[error("note not found: {id}")]
    NoteNotFound { id: String },

    /// A database error occurred.
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// The query is invalid.
    #[error("invalid query: {0}")]
    InvalidQuery(String),

    /// A stored value could not be decoded.
    #[error("invalid stored data: {0}")]
    InvalidData(String),

    /// An I/O error occurred.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

// ===========================================
// SearchHit
// ===========================================

/// A note matched by a search, with its rendered snippet.
#[derive(Debug, Clone, Serialize)]
pub struct SearchHit {
    note: Note,
    snippet: String,
}

impl SearchHit {
    pub fn new(note: Note, snippet: impl Into<String>) -> Self {
        Self {
            note,
            snippet: snippet.into(),
        }
    }

    pub fn note(&self) -> &Note {
        &self.note
    }

    /// Returns the rendered snippet; empty when no keyword occurs in the note text.
    pub fn snippet(&self) -> &str {
        &self.snippet
    }
}

/// All hits of one search plus the keywords used to find them.
#[derive(Debug, Clone, Serialize)]
pub struct SearchOutcome {
    pub hits: Vec<SearchHit>,
    pub keywords: Vec<String>,
    pub found_whole_phrase: bool,
    pub stage: SearchStage,
}

// ===========================================
// NoteRepository Trait
// ===========================================

/// Repository of notes and their shared tag/book rows.
///
/// Every mutating method runs in one transaction: either all of its writes
/// land or none do.
pub trait NoteRepository {
    /// Creates a note, deriving its index fields and linking its book and tags.
    fn create_note(&mut self, draft: &NewNote) -> StoreResult<Note>;

    /// Changes the title and/or content and recomputes the derived fields.
    fn update_note(
        &mut self,
        id: &NoteId,
        title: Option<&str>,
        content: Option<&str>,
    ) -> StoreResult<Note>;

    /// Retrieves a single note by ID.
    fn get_note(&self, id: &NoteId) -> StoreResult<Option<Note>>;

    /// Lists the notes of a section, most recently updated first.
    fn list_notes(&self, section: &Section) -> StoreResult<Vec<Note>>;

    /// Deletes a note, collecting tags and books nothing references anymore.
    ///
    /// Returns false if the note did not exist.
    fn delete_note(&mut self, id: &NoteId) -> StoreResult<bool>;

    /// Sets the note's tags to exactly `names`. Returns false if the note does not exist.
    fn sync_tags(&mut self, id: &NoteId, names: &BTreeSet<String>) -> StoreResult<bool>;

    /// Sets or clears the note's book. Returns false if the note does not exist.
    fn sync_book(&mut self, id: &NoteId, name: Option<&str>) -> StoreResult<bool>;

    /// Returns the section's tags with reference counts, by name.
    fn all_tags(&self, section: &Section) -> StoreResult<Vec<LabelWithCount>>;

    /// Returns the section's books with reference counts, by name.
    fn all_books(&self, section: &Section) -> StoreResult<Vec<LabelWithCount>>;

    /// Searches a section with keyword relaxation and renders a snippet per hit.
    fn search(
        &self,
        section: &Section,
        term: &str,
        options: SnippetOptions,
    ) -> StoreResult<SearchOutcome>;

    /// Stores each hit's snippet as its note's cached preview.
    fn refresh_previews(&mut self, hits: &[SearchHit]) -> StoreResult<()>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn note_not_found_displays_id() {
        let err = StoreError::NoteNotFound {
            id: "01HQ3K5M7NXJK4QZPW8V2R6T9Y".to_string(),
        };
        assert_eq!(err.to_string(), "note not found: 01HQ3K5M7NXJK4QZPW8V2R6T9Y");
    }

    #[test]
    fn invalid_query_displays_reason() {
        let err = StoreError::InvalidQuery("unbalanced quote".to_string());
        assert_eq!(err.to_string(), "invalid query: unbalanced quote");
    }

    #[test]
    fn database_error_converts() {
        let err: StoreError = rusqlite::Error::QueryReturnedNoRows.into();
        assert!(matches!(err, StoreError::Database(_)));
    }

    #[test]
    fn store_error_is_std_error() {
        fn assert_error<E: std::error::Error>(_: &E) {}
        assert_error(&StoreError::InvalidData("x".to_string()));
    }
}
