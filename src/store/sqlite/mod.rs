//! SQLite-backed note store implementation.

mod connection;
mod query;
mod repo_impl;
mod rows;
mod transaction;


use rusqlite::Connection;

pub use query::NoteQuery;
pub use transaction::Transaction;

pub(crate) use rows::note_section;

/// SQLite-backed note store.
///
/// Owns the database connection; all reads and writes of notes, tags and
/// books go through it or through a [`Transaction`] opened on it.
pub struct NoteStore {
    pub(crate) conn: Connection,
}
