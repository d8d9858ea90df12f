//! Connection management for NoteStore.

use super::NoteStore;
use super::transaction::Transaction;
use crate::store::{StoreError, StoreResult, create_schema};
use rusqlite::{Connection, InterruptHandle};
use std::fs;
use std::path::Path;
use tracing::debug;

impl NoteStore {
    /// Opens an in-memory SQLite database with the note schema.
    ///
    /// Useful for tests and throwaway stores.
    pub fn open_in_memory() -> StoreResult<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        create_schema(&conn)?;
        Ok(Self { conn })
    }

    /// Opens or creates a SQLite database at the given path.
    ///
    /// Creates parent directories if they don't exist and initializes the
    /// schema on a new database.
    pub fn open(path: &Path) -> StoreResult<Self> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            fs::create_dir_all(parent).map_err(|e| StoreError::Io {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        debug!(path = %path.display(), "opening note store");
        let conn = Connection::open(path)?;
        conn.execute_batch("PRAGMA foreign_keys = ON; PRAGMA busy_timeout = 5000;")?;
        create_schema(&conn)?;
        Ok(Self { conn })
    }

    /// Returns a reference to the underlying SQLite connection.
    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Begins a write transaction.
    ///
    /// The transaction rolls back on drop unless `commit()` is called.
    /// Pass it to the synchronizers in [`crate::store::sync`] to group
    /// several changes into one atomic unit.
    pub fn transaction(&mut self) -> StoreResult<Transaction<'_>> {
        Transaction::begin(&self.conn)
    }

    /// Returns a handle that aborts the statement currently running on this store.
    ///
    /// The interrupted call fails with a database error and its transaction
    /// rolls back, so nothing is partially written.
    pub fn interrupt_handle(&self) -> InterruptHandle {
        self.conn.get_interrupt_handle()
    }
}
