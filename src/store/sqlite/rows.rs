//! Row decoding shared by the store, queries and synchronizers.

use crate::domain::{DerivedText, Note, NoteId, Section};
use crate::store::{StoreError, StoreResult};
use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::{Connection, OptionalExtension};

/// Formats a timestamp so that string order matches time order.
pub(crate) fn format_timestamp(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn parse_timestamp(s: &str, column: &str) -> StoreResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| StoreError::InvalidData(format!("invalid {column} timestamp: {e}")))
}

/// Returns the section of a note, or `None` if the note does not exist.
pub(crate) fn note_section(conn: &Connection, id: &NoteId) -> StoreResult<Option<String>> {
    Ok(conn
        .query_row(
            "SELECT section FROM notes WHERE id = ?",
            [id.to_string()],
            |row| row.get::<_, String>(0),
        )
        .optional()?)
}

/// Loads a note with its book name and tag names resolved.
pub(crate) fn load_note(conn: &Connection, id: &NoteId) -> StoreResult<Option<Note>> {
    let row = conn
        .query_row(
            "SELECT n.section, n.title, n.content, n.title_index, n.content_index,
                    n.preview, n.created, n.updated, b.name
             FROM notes n LEFT JOIN books b ON b.id = n.book_id
             WHERE n.id = ?",
            [id.to_string()],
            |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    DerivedText {
                        title_index: row.get(3)?,
                        content_index: row.get(4)?,
                        preview: row.get(5)?,
                    },
                    row.get::<_, String>(6)?,
                    row.get::<_, String>(7)?,
                    row.get::<_, Option<String>>(8)?,
                ))
            },
        )
        .optional()?;

    let Some((section, title, content, derived, created, updated, book)) = row else {
        return Ok(None);
    };

    let section = Section::new(&section)
        .map_err(|e| StoreError::InvalidData(format!("invalid section for note {id}: {e}")))?;

    let tags: Vec<String> = conn
        .prepare(
            "SELECT t.name FROM tags t JOIN note_tags nt ON t.id = nt.tag_id
             WHERE nt.note_id = ?",
        )?
        .query_map([id.to_string()], |row| row.get::<_, String>(0))?
        .collect::<Result<_, _>>()?;

    let note = Note::builder(
        *id,
        section,
        title,
        parse_timestamp(&created, "created")?,
        parse_timestamp(&updated, "updated")?,
    )
    .content(content)
    .stored_text(derived)
    .book(book)
    .tags(tags)
    .build();

    Ok(Some(note))
}

/// Loads notes by id in the given order, skipping ids that vanished.
pub(crate) fn load_notes(conn: &Connection, ids: &[NoteId]) -> StoreResult<Vec<Note>> {
    let mut notes = Vec::with_capacity(ids.len());
    for id in ids {
        if let Some(note) = load_note(conn, id)? {
            notes.push(note);
        }
    }
    Ok(notes)
}

/// Parses a note id read from the database.
pub(crate) fn parse_note_id(s: &str) -> StoreResult<NoteId> {
    s.parse()
        .map_err(|e| StoreError::InvalidData(format!("invalid note ID in database: {e}")))
}
