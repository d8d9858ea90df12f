//! Core types: Note, NoteId (ULID), Section, and tag/book labels

mod label;
mod note;
mod note_id;
mod section;

pub use label::{Label, LabelKind, LabelWithCount, label_key};
pub use note::{DerivedText, NewNote, Note, NoteBuilder, PREVIEW_LIMIT};
pub use note_id::{NoteId, ParseNoteIdError};
pub use section::{ParseSectionError, Section};
