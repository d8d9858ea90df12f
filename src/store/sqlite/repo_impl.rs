//! NoteRepository trait implementation for NoteStore.

use super::NoteStore;
use super::query::NoteQuery;
use super::rows::{format_timestamp, load_note};
use crate::domain::{
    DerivedText, Label, LabelKind, LabelWithCount, NewNote, Note, NoteId, Section,
};
use crate::search::{self, SnippetOptions, extract_snippet};
use crate::store::{
    NoteRepository, SearchHit, SearchOutcome, StoreError, StoreResult, sync,
};
use chrono::Utc;
use rusqlite::params;
use std::collections::BTreeSet;
use tracing::debug;

impl NoteRepository for NoteStore {
    fn create_note(&mut self, draft: &NewNote) -> StoreResult<Note> {
        let id = NoteId::new();
        let now = format_timestamp(Utc::now());
        let derived = DerivedText::compute(draft.title(), draft.content_text());

        let tx = self.transaction()?;
        tx.execute(
            "INSERT INTO notes (id, section, title, content, title_index, content_index,
                                preview, created, updated)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?8)",
            params![
                id.to_string(),
                draft.section().as_str(),
                draft.title(),
                draft.content_text(),
                derived.title_index,
                derived.content_index,
                derived.preview,
                now,
            ],
        )?;

        sync::sync_book(&tx, &id, draft.book_name())?;
        let tags: BTreeSet<String> = draft.tag_names().iter().cloned().collect();
        sync::sync_tags(&tx, &id, &tags)?;

        let note = load_note(tx.conn(), &id)?.ok_or_else(|| StoreError::NoteNotFound {
            id: id.to_string(),
        })?;
        tx.commit()?;

        debug!(note = %id, section = %draft.section(), "created note");
        Ok(note)
    }

    fn update_note(
        &mut self,
        id: &NoteId,
        title: Option<&str>,
        content: Option<&str>,
    ) -> StoreResult<Note> {
        let tx = self.transaction()?;
        let current = load_note(tx.conn(), id)?.ok_or_else(|| StoreError::NoteNotFound {
            id: id.to_string(),
        })?;

        let title = title.unwrap_or(current.title());
        let content = content.unwrap_or(current.content());
        let derived = DerivedText::compute(title, content);

        tx.execute(
            "UPDATE notes SET title = ?1, content = ?2, title_index = ?3, content_index = ?4,
                              preview = ?5, updated = ?6
             WHERE id = ?7",
            params![
                title,
                content,
                derived.title_index,
                derived.content_index,
                derived.preview,
                format_timestamp(Utc::now()),
                id.to_string(),
            ],
        )?;

        let note = load_note(tx.conn(), id)?.ok_or_else(|| StoreError::NoteNotFound {
            id: id.to_string(),
        })?;
        tx.commit()?;

        debug!(note = %id, "updated note");
        Ok(note)
    }

    fn get_note(&self, id: &NoteId) -> StoreResult<Option<Note>> {
        load_note(&self.conn, id)
    }

    fn list_notes(&self, section: &Section) -> StoreResult<Vec<Note>> {
        NoteQuery::in_section(&self.conn, section).fetch()
    }

    fn delete_note(&mut self, id: &NoteId) -> StoreResult<bool> {
        let tx = self.transaction()?;
        if !sync::sync_tags(&tx, id, &BTreeSet::new())? {
            return Ok(false);
        }
        sync::sync_book(&tx, id, None)?;
        tx.execute("DELETE FROM notes WHERE id = ?", [id.to_string()])?;
        tx.commit()?;

        debug!(note = %id, "deleted note");
        Ok(true)
    }

    fn sync_tags(&mut self, id: &NoteId, names: &BTreeSet<String>) -> StoreResult<bool> {
        let tx = self.transaction()?;
        let found = sync::sync_tags(&tx, id, names)?;
        tx.commit()?;
        Ok(found)
    }

    fn sync_book(&mut self, id: &NoteId, name: Option<&str>) -> StoreResult<bool> {
        let tx = self.transaction()?;
        let found = sync::sync_book(&tx, id, name)?;
        tx.commit()?;
        Ok(found)
    }

    fn all_tags(&self, section: &Section) -> StoreResult<Vec<LabelWithCount>> {
        self.labels_with_counts(
            LabelKind::Tag,
            section,
            "SELECT t.id, t.name, COUNT(nt.note_id)
             FROM tags t LEFT JOIN note_tags nt ON nt.tag_id = t.id
             WHERE t.section = ?
             GROUP BY t.id
             ORDER BY t.name_key",
        )
    }

    fn all_books(&self, section: &Section) -> StoreResult<Vec<LabelWithCount>> {
        self.labels_with_counts(
            LabelKind::Book,
            section,
            "SELECT b.id, b.name, COUNT(n.id)
             FROM books b LEFT JOIN notes n ON n.book_id = b.id
             WHERE b.section = ?
             GROUP BY b.id
             ORDER BY b.name_key",
        )
    }

    fn search(
        &self,
        section: &Section,
        term: &str,
        options: SnippetOptions,
    ) -> StoreResult<SearchOutcome> {
        let result = search::search(NoteQuery::in_section(&self.conn, section), term)?;
        let keywords = result.keywords().to_vec();
        let found_whole_phrase = result.found_whole_phrase();
        let stage = result.stage();
        let options = options.whole_phrase(found_whole_phrase);

        let hits = result
            .into_records()
            .fetch()?
            .into_iter()
            .map(|note| {
                let mut snippet = extract_snippet(&keywords, note.content_index(), options);
                if snippet.is_empty() {
                    snippet = extract_snippet(&keywords, note.title_index(), options);
                }
                SearchHit::new(note, snippet)
            })
            .collect::<Vec<_>>();

        debug!(
            section = %section,
            term,
            hits = hits.len(),
            ?stage,
            "search finished"
        );
        Ok(SearchOutcome {
            hits,
            keywords,
            found_whole_phrase,
            stage,
        })
    }

    fn refresh_previews(&mut self, hits: &[SearchHit]) -> StoreResult<()> {
        let tx = self.transaction()?;
        for hit in hits.iter().filter(|h| !h.snippet().is_empty()) {
            tx.execute(
                "UPDATE notes SET preview = ?1 WHERE id = ?2",
                params![hit.snippet(), hit.note().id().to_string()],
            )?;
        }
        tx.commit()
    }
}

impl NoteStore {
    fn labels_with_counts(
        &self,
        kind: LabelKind,
        section: &Section,
        sql: &str,
    ) -> StoreResult<Vec<LabelWithCount>> {
        let mut stmt = self.conn.prepare(sql)?;
        let rows = stmt.query_map([section.as_str()], |row| {
            Ok((
                row.get::<_, i64>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, u32>(2)?,
            ))
        })?;

        let mut labels = Vec::new();
        for row in rows {
            let (id, name, count) = row?;
            labels.push(LabelWithCount::new(
                Label::new(id, kind, section.as_str(), name),
                count,
            ));
        }
        Ok(labels)
    }
}
