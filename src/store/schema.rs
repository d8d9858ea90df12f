//! SQLite schema creation for the note store.

use rusqlite::Connection;

/// Current schema version recorded in `schema_version`.
pub const SCHEMA_VERSION: i64 = 1;

/// Creates the database schema.
///
/// Idempotent; calling it on an existing database is safe.
///
/// # Tables Created
/// - `notes` - Notes with their derived index fields and optional book
/// - `tags` / `books` - Shared names, unique per section by lowercase key
/// - `note_tags` - Many-to-many junction for notes and tags
/// - `notes_fts` - FTS5 token index over the derived index fields
/// - `schema_version` - Schema version tracking
pub fn create_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;

    // ===========================================
    // Label tables
    // ===========================================
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS tags (
            id INTEGER PRIMARY KEY,
            section TEXT NOT NULL,
            name TEXT NOT NULL,
            name_key TEXT NOT NULL,
            UNIQUE(section, name_key)
        );
        CREATE TABLE IF NOT EXISTS books (
            id INTEGER PRIMARY KEY,
            section TEXT NOT NULL,
            name TEXT NOT NULL,
            name_key TEXT NOT NULL,
            UNIQUE(section, name_key)
        );",
    )?;

    // ===========================================
    // Notes Table
    // ===========================================
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS notes (
            id TEXT PRIMARY KEY,
            section TEXT NOT NULL,
            title TEXT NOT NULL,
            content TEXT NOT NULL DEFAULT '',
            title_index TEXT NOT NULL DEFAULT '',
            content_index TEXT NOT NULL DEFAULT '',
            preview TEXT NOT NULL DEFAULT '',
            book_id INTEGER REFERENCES books(id) ON DELETE SET NULL,
            created TEXT NOT NULL,
            updated TEXT NOT NULL
        );",
    )?;

    // ===========================================
    // Note-Tags Junction
    // ===========================================
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS note_tags (
            note_id TEXT NOT NULL REFERENCES notes(id) ON DELETE CASCADE,
            tag_id INTEGER NOT NULL REFERENCES tags(id) ON DELETE CASCADE,
            PRIMARY KEY (note_id, tag_id)
        );",
    )?;

    // ===========================================
    // Indexes
    // ===========================================
    conn.execute_batch(
        "CREATE INDEX IF NOT EXISTS idx_notes_section_updated ON notes(section, updated);
         CREATE INDEX IF NOT EXISTS idx_notes_book ON notes(book_id);
         CREATE INDEX IF NOT EXISTS idx_note_tags_tag ON note_tags(tag_id);",
    )?;

    // ===========================================
    // FTS5 Virtual Table
    // ===========================================
    // Column names must match the notes table for external content to resolve
    conn.execute_batch(
        "CREATE VIRTUAL TABLE IF NOT EXISTS notes_fts USING fts5(
            title_index,
            content_index,
            content='notes',
            content_rowid='rowid'
        );",
    )?;

    conn.execute_batch(
        "CREATE TRIGGER IF NOT EXISTS notes_fts_insert
        AFTER INSERT ON notes BEGIN
            INSERT INTO notes_fts(rowid, title_index, content_index)
            VALUES (NEW.rowid, NEW.title_index, NEW.content_index);
        END;",
    )?;

    conn.execute_batch(
        "CREATE TRIGGER IF NOT EXISTS notes_fts_delete
        AFTER DELETE ON notes BEGIN
            INSERT INTO notes_fts(notes_fts, rowid, title_index, content_index)
            VALUES ('delete', OLD.rowid, OLD.title_index, OLD.content_index);
        END;",
    )?;

    // Only index changes re-tokenize; preview and book updates leave FTS alone
    conn.execute_batch(
        "CREATE TRIGGER IF NOT EXISTS notes_fts_update
        AFTER UPDATE OF title_index, content_index ON notes BEGIN
            INSERT INTO notes_fts(notes_fts, rowid, title_index, content_index)
            VALUES ('delete', OLD.rowid, OLD.title_index, OLD.content_index);
            INSERT INTO notes_fts(rowid, title_index, content_index)
            VALUES (NEW.rowid, NEW.title_index, NEW.content_index);
        END;",
    )?;

    // ===========================================
    // Schema Version Table
    // ===========================================
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL
        );",
    )?;

    conn.execute(
        "INSERT OR IGNORE INTO schema_version (version, applied_at) VALUES (?1, datetime('now'))",
        [SCHEMA_VERSION],
    )?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn names(conn: &Connection, kind: &str) -> Vec<String> {
        conn.prepare("SELECT name FROM sqlite_master WHERE type = ?1 ORDER BY name")
            .unwrap()
            .query_map([kind], |row| row.get(0))
            .unwrap()
            .filter_map(|r| r.ok())
            .collect()
    }

    #[test]
    fn creates_all_tables() {
        let conn = Connection::open_in_memory().unwrap();
        create_schema(&conn).unwrap();

        let tables = names(&conn, "table");
        for table in ["notes", "tags", "books", "note_tags", "notes_fts", "schema_version"] {
            assert!(tables.contains(&table.to_string()), "missing table {table}");
        }
    }

    #[test]
    fn creates_triggers() {
        let conn = Connection::open_in_memory().unwrap();
        create_schema(&conn).unwrap();

        assert_eq!(
            names(&conn, "trigger"),
            vec!["notes_fts_delete", "notes_fts_insert", "notes_fts_update"]
        );
    }

    #[test]
    fn is_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        create_schema(&conn).unwrap();
        create_schema(&conn).unwrap();

        let versions: i64 = conn
            .query_row("SELECT COUNT(*) FROM schema_version", [], |row| row.get(0))
            .unwrap();
        assert_eq!(versions, 1);
    }

    #[test]
    fn label_key_is_unique_per_section() {
        let conn = Connection::open_in_memory().unwrap();
        create_schema(&conn).unwrap();

        conn.execute(
            "INSERT INTO tags (section, name, name_key) VALUES ('a', 'Rust', 'rust')",
            [],
        )
        .unwrap();
        let dup = conn.execute(
            "INSERT INTO tags (section, name, name_key) VALUES ('a', 'RUST', 'rust')",
            [],
        );
        assert!(dup.is_err(), "same key in same section must be rejected");

        conn.execute(
            "INSERT INTO tags (section, name, name_key) VALUES ('b', 'RUST', 'rust')",
            [],
        )
        .unwrap();
    }
}
