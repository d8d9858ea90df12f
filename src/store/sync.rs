//! Tag and book synchronization with reference-counted cleanup.
//!
//! Tags and books are shared rows keyed by `(section, lowercase name)`. A
//! row is created the first time a note in the section uses the name and
//! deleted as soon as no note in the section references it. The casing of
//! the first request that created a row is kept for every later reuse.
//!
//! The synchronizers run inside a caller-supplied [`Transaction`]: if any
//! step fails the caller drops the transaction and every write of the call
//! rolls back.

use crate::domain::{LabelKind, NoteId, label_key};
use crate::store::sqlite::{Transaction, note_section};
use crate::store::{StoreError, StoreResult};
use rusqlite::{Connection, OptionalExtension, params};
use std::collections::BTreeSet;
use tracing::{debug, info, trace};

/// Makes the note's tags exactly `names`.
///
/// Returns `Ok(false)` without writing if the note does not exist. If
/// `names` equals the note's current tag names exactly, nothing is written.
/// Names are matched to existing tags of the note's section ignoring case;
/// blank names are skipped. Tags that lose their last link are deleted.
pub fn sync_tags(
    tx: &Transaction<'_>,
    note_id: &NoteId,
    names: &BTreeSet<String>,
) -> StoreResult<bool> {
    let conn = tx.conn();
    let Some(section) = note_section(conn, note_id)? else {
        return Ok(false);
    };
    let id_str = note_id.to_string();

    let current: Vec<(i64, String)> = conn
        .prepare(
            "SELECT t.id, t.name FROM tags t JOIN note_tags nt ON t.id = nt.tag_id
             WHERE nt.note_id = ?",
        )?
        .query_map([&id_str], |row| Ok((row.get(0)?, row.get(1)?)))?
        .collect::<Result<_, _>>()?;

    let current_names: BTreeSet<String> = current.iter().map(|(_, name)| name.clone()).collect();
    if &current_names == names {
        trace!(note = %note_id, "tags unchanged");
        return Ok(true);
    }

    let mut wanted = BTreeSet::new();
    for name in names {
        if label_key(name).is_empty() {
            continue;
        }
        wanted.insert(resolve_label(conn, LabelKind::Tag, &section, name)?);
    }
    let linked: BTreeSet<i64> = current.iter().map(|(id, _)| *id).collect();

    let added: Vec<i64> = wanted.difference(&linked).copied().collect();
    let removed: Vec<i64> = linked.difference(&wanted).copied().collect();

    for tag_id in &added {
        conn.execute(
            "INSERT OR IGNORE INTO note_tags (note_id, tag_id) VALUES (?1, ?2)",
            params![id_str, tag_id],
        )?;
    }
    for tag_id in &removed {
        conn.execute(
            "DELETE FROM note_tags WHERE note_id = ?1 AND tag_id = ?2",
            params![id_str, tag_id],
        )?;
    }
    for tag_id in &removed {
        collect_if_unused(conn, LabelKind::Tag, *tag_id)?;
    }

    debug!(
        note = %note_id,
        added = added.len(),
        removed = removed.len(),
        "synchronized tags"
    );
    Ok(true)
}

/// Sets the note's book to `name`, or clears it for `None` or a blank name.
///
/// Returns `Ok(false)` without writing if the note does not exist. Setting
/// the current name again writes nothing. The previous book is deleted if
/// no other note in the section references it.
pub fn sync_book(tx: &Transaction<'_>, note_id: &NoteId, name: Option<&str>) -> StoreResult<bool> {
    let conn = tx.conn();
    let id_str = note_id.to_string();

    let row: Option<(String, Option<i64>, Option<String>)> = conn
        .query_row(
            "SELECT n.section, b.id, b.name FROM notes n LEFT JOIN books b ON b.id = n.book_id
             WHERE n.id = ?",
            [&id_str],
            |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
        )
        .optional()?;
    let Some((section, current_id, current_name)) = row else {
        return Ok(false);
    };

    let target = name.filter(|n| !label_key(n).is_empty());
    if current_name.as_deref() == target {
        trace!(note = %note_id, "book unchanged");
        return Ok(true);
    }

    let target_id = target
        .map(|n| resolve_label(conn, LabelKind::Book, &section, n))
        .transpose()?;

    if target_id != current_id {
        conn.execute(
            "UPDATE notes SET book_id = ?1 WHERE id = ?2",
            params![target_id, id_str],
        )?;
        if let Some(previous) = current_id {
            collect_if_unused(conn, LabelKind::Book, previous)?;
        }
        debug!(note = %note_id, book = ?target, "synchronized book");
    }
    Ok(true)
}

/// Returns the id of the label matching `name` in `section`, creating it if needed.
///
/// Creation is insert-or-fetch against the `(section, name_key)` uniqueness
/// constraint, so a row created concurrently is reused rather than duplicated.
fn resolve_label(
    conn: &Connection,
    kind: LabelKind,
    section: &str,
    name: &str,
) -> StoreResult<i64> {
    let key = label_key(name);
    if let Some(id) = find_label(conn, kind, section, &key)? {
        return Ok(id);
    }

    let inserted = conn.execute(
        &format!(
            "INSERT INTO {} (section, name, name_key) VALUES (?1, ?2, ?3)
             ON CONFLICT(section, name_key) DO NOTHING",
            kind.table()
        ),
        params![section, name.trim(), key],
    )?;
    if inserted > 0 {
        debug!(%kind, section, name = name.trim(), "created label");
    }

    find_label(conn, kind, section, &key)?.ok_or_else(|| {
        StoreError::InvalidData(format!("{kind} '{name}' vanished after insert in section {section}"))
    })
}

fn find_label(conn: &Connection, kind: LabelKind, section: &str, key: &str) -> StoreResult<Option<i64>> {
    Ok(conn
        .query_row(
            &format!(
                "SELECT id FROM {} WHERE section = ?1 AND name_key = ?2",
                kind.table()
            ),
            params![section, key],
            |row| row.get(0),
        )
        .optional()?)
}

/// Deletes the label if no note of its section references it anymore.
///
/// Returns true if the row was deleted.
fn collect_if_unused(conn: &Connection, kind: LabelKind, label_id: i64) -> StoreResult<bool> {
    let count_sql = match kind {
        LabelKind::Tag => {
            "SELECT COUNT(*) FROM note_tags nt JOIN notes n ON n.id = nt.note_id
             WHERE nt.tag_id = ?1 AND n.section = (SELECT section FROM tags WHERE id = ?1)"
        }
        LabelKind::Book => {
            "SELECT COUNT(*) FROM notes n
             WHERE n.book_id = ?1 AND n.section = (SELECT section FROM books WHERE id = ?1)"
        }
    };
    let references: i64 = conn.query_row(count_sql, [label_id], |row| row.get(0))?;
    if references > 0 {
        return Ok(false);
    }

    conn.execute(
        &format!("DELETE FROM {} WHERE id = ?1", kind.table()),
        [label_id],
    )?;
    info!(%kind, id = label_id, "deleted unreferenced label");
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{NewNote, Section};
    use crate::store::{NoteRepository, NoteStore};
    use pretty_assertions::assert_eq;

    fn names(items: &[&str]) -> BTreeSet<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn store_with_note(section: &str) -> (NoteStore, NoteId) {
        let mut store = NoteStore::open_in_memory().unwrap();
        let note = store
            .create_note(&NewNote::new(Section::new(section).unwrap(), "Note"))
            .unwrap();
        (store, *note.id())
    }

    fn total_changes(store: &NoteStore) -> i64 {
        store
            .conn()
            .query_row("SELECT total_changes()", [], |row| row.get(0))
            .unwrap()
    }

    fn tag_rows(store: &NoteStore) -> Vec<(String, String)> {
        store
            .conn()
            .prepare("SELECT section, name FROM tags ORDER BY section, name")
            .unwrap()
            .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))
            .unwrap()
            .filter_map(|r| r.ok())
            .collect()
    }

    #[test]
    fn missing_note_returns_false_without_writes() {
        let mut store = NoteStore::open_in_memory().unwrap();
        let before = total_changes(&store);

        let tx = store.transaction().unwrap();
        assert!(!sync_tags(&tx, &NoteId::new(), &names(&["a"])).unwrap());
        assert!(!sync_book(&tx, &NoteId::new(), Some("b")).unwrap());
        tx.commit().unwrap();

        assert_eq!(total_changes(&store), before);
        assert!(tag_rows(&store).is_empty());
    }

    #[test]
    fn unchanged_tags_write_nothing() {
        let (mut store, id) = store_with_note("work");
        let tx = store.transaction().unwrap();
        assert!(sync_tags(&tx, &id, &names(&["a", "b"])).unwrap());
        tx.commit().unwrap();
        let before = total_changes(&store);

        let tx = store.transaction().unwrap();
        assert!(sync_tags(&tx, &id, &names(&["a", "b"])).unwrap());
        tx.commit().unwrap();

        assert_eq!(total_changes(&store), before);
    }

    #[test]
    fn same_key_in_one_call_links_once() {
        let (mut store, id) = store_with_note("work");
        let tx = store.transaction().unwrap();
        sync_tags(&tx, &id, &names(&["Rust", "rust", "  "])).unwrap();
        tx.commit().unwrap();

        assert_eq!(tag_rows(&store), vec![("work".to_string(), "Rust".to_string())]);
        let note = store.get_note(&id).unwrap().unwrap();
        assert_eq!(note.tags(), &["Rust"]);
    }

    #[test]
    fn dropped_transaction_rolls_back() {
        let (mut store, id) = store_with_note("work");
        {
            let tx = store.transaction().unwrap();
            sync_tags(&tx, &id, &names(&["temp"])).unwrap();
            sync_book(&tx, &id, Some("Draft")).unwrap();
            // dropped without commit
        }

        assert!(tag_rows(&store).is_empty());
        let books: i64 = store
            .conn()
            .query_row("SELECT COUNT(*) FROM books", [], |row| row.get(0))
            .unwrap();
        assert_eq!(books, 0);
        let note = store.get_note(&id).unwrap().unwrap();
        assert!(note.tags().is_empty());
        assert_eq!(note.book(), None);
    }

    #[test]
    fn failure_mid_sync_leaves_nothing_behind() {
        let (mut store, id) = store_with_note("work");
        store
            .conn()
            .execute_batch(
                "CREATE TRIGGER reject_link BEFORE INSERT ON note_tags
                 WHEN (SELECT name FROM tags WHERE id = NEW.tag_id) = 'boom'
                 BEGIN SELECT RAISE(ABORT, 'rejected'); END;",
            )
            .unwrap();

        let result = store.sync_tags(&id, &names(&["aaa", "boom"]));
        assert!(result.is_err());

        assert!(tag_rows(&store).is_empty(), "created tags must roll back");
        let links: i64 = store
            .conn()
            .query_row("SELECT COUNT(*) FROM note_tags", [], |row| row.get(0))
            .unwrap();
        assert_eq!(links, 0);
    }

    #[test]
    fn book_reuses_first_casing_and_clears() {
        let mut store = NoteStore::open_in_memory().unwrap();
        let section = Section::new("home").unwrap();
        let a = *store.create_note(&NewNote::new(section.clone(), "a")).unwrap().id();
        let b = *store.create_note(&NewNote::new(section, "b")).unwrap().id();

        assert!(store.sync_book(&a, Some("Recipes")).unwrap());
        assert!(store.sync_book(&b, Some("RECIPES")).unwrap());
        assert_eq!(store.get_note(&b).unwrap().unwrap().book(), Some("Recipes"));

        assert!(store.sync_book(&a, None).unwrap());
        let books = store.all_books(&Section::new("home").unwrap()).unwrap();
        assert_eq!(books.len(), 1, "still referenced by b");

        assert!(store.sync_book(&b, Some("")).unwrap());
        let books = store.all_books(&Section::new("home").unwrap()).unwrap();
        assert!(books.is_empty(), "unreferenced book is collected");
    }

    #[test]
    fn switching_book_collects_previous() {
        let (mut store, id) = store_with_note("home");
        store.sync_book(&id, Some("Old")).unwrap();
        store.sync_book(&id, Some("New")).unwrap();

        let books = store.all_books(&Section::new("home").unwrap()).unwrap();
        let names: Vec<&str> = books.iter().map(|b| b.label().name()).collect();
        assert_eq!(names, vec!["New"]);
    }

    #[test]
    fn same_book_again_writes_nothing() {
        let (mut store, id) = store_with_note("home");
        store.sync_book(&id, Some("Journal")).unwrap();
        let before = total_changes(&store);
        store.sync_book(&id, Some("Journal")).unwrap();
        assert_eq!(total_changes(&store), before);
    }

    #[test]
    fn labels_are_scoped_per_section() {
        let mut store = NoteStore::open_in_memory().unwrap();
        let a = *store
            .create_note(&NewNote::new(Section::new("one").unwrap(), "a"))
            .unwrap()
            .id();
        let b = *store
            .create_note(&NewNote::new(Section::new("two").unwrap(), "b"))
            .unwrap()
            .id();

        store.sync_tags(&a, &names(&["Shared"])).unwrap();
        store.sync_tags(&b, &names(&["shared"])).unwrap();

        assert_eq!(
            tag_rows(&store),
            vec![
                ("one".to_string(), "Shared".to_string()),
                ("two".to_string(), "shared".to_string()),
            ]
        );

        store.sync_tags(&a, &BTreeSet::new()).unwrap();
        assert_eq!(tag_rows(&store), vec![("two".to_string(), "shared".to_string())]);
    }
}
