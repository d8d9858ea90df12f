//! Section-scoped, composable note queries.

use super::rows::{load_notes, parse_note_id};
use crate::domain::{Note, NoteId, Section};
use crate::search::RecordSet;
use crate::store::{StoreError, StoreResult};
use rusqlite::Connection;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Clause {
    /// Every needle is a substring of the title or content index.
    ContainsAll(Vec<String>),
    /// Every token is present in the FTS5 index.
    TokensAll(Vec<String>),
}

/// A lazily evaluated set of notes in one section.
///
/// Filters return a new query with one more clause; nothing runs until
/// [`fetch`](Self::fetch), [`ids`](Self::ids) or
/// [`count`](Self::count) is called.
#[derive(Clone)]
pub struct NoteQuery<'a> {
    conn: &'a Connection,
    section: String,
    clauses: Vec<Clause>,
}

impl<'a> NoteQuery<'a> {
    /// All notes of `section`.
    pub fn in_section(conn: &'a Connection, section: &Section) -> Self {
        Self {
            conn,
            section: section.as_str().to_string(),
            clauses: Vec::new(),
        }
    }

    fn with(&self, clause: Clause) -> Self {
        let mut next = self.clone();
        next.clauses.push(clause);
        next
    }

    /// Keeps notes whose title or content index contains every needle.
    pub fn containing_all(&self, needles: &[String]) -> Self {
        self.with(Clause::ContainsAll(lowercase(needles)))
    }

    /// Keeps notes whose FTS5 index holds every token as a whole word.
    ///
    /// The FTS5 tokenizer drops punctuation, so a token with any other
    /// character (`c++`) must also match literally as a substring. Tokens
    /// without any letter or digit are matched as substrings only.
    pub fn with_tokens(&self, tokens: &[String]) -> Self {
        let tokens = lowercase(tokens);
        let indexable: Vec<String> = tokens
            .iter()
            .filter(|t| t.chars().any(char::is_alphanumeric))
            .cloned()
            .collect();
        let literal: Vec<String> = tokens
            .into_iter()
            .filter(|t| !t.chars().all(char::is_alphanumeric))
            .collect();
        let mut next = self.clone();
        if !indexable.is_empty() {
            next.clauses.push(Clause::TokensAll(indexable));
        }
        if !literal.is_empty() {
            next.clauses.push(Clause::ContainsAll(literal));
        }
        next
    }

    /// Builds the WHERE clause and its positional parameters.
    fn where_sql(&self) -> (String, Vec<String>) {
        let mut params = vec![self.section.clone()];
        let mut sql = String::from("n.section = ?1");

        for clause in &self.clauses {
            match clause {
                Clause::ContainsAll(needles) => {
                    for needle in needles {
                        params.push(needle.clone());
                        let n = params.len();
                        sql.push_str(&format!(
                            " AND (instr(n.title_index, ?{n}) > 0 OR instr(n.content_index, ?{n}) > 0)"
                        ));
                    }
                }
                Clause::TokensAll(tokens) => {
                    params.push(fts_query(tokens));
                    let n = params.len();
                    sql.push_str(&format!(
                        " AND n.rowid IN (SELECT rowid FROM notes_fts WHERE notes_fts MATCH ?{n})"
                    ));
                }
            }
        }

        (sql, params)
    }

    /// Returns matching note ids, most recently updated first.
    pub fn ids(&self) -> StoreResult<Vec<NoteId>> {
        let (where_sql, params) = self.where_sql();
        let sql = format!(
            "SELECT n.id FROM notes n WHERE {where_sql} ORDER BY n.updated DESC, n.id DESC"
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt
            .query_map(rusqlite::params_from_iter(params.iter()), |row| {
                row.get::<_, String>(0)
            })
            .map_err(map_fts_error)?;

        let mut ids = Vec::new();
        for row in rows {
            ids.push(parse_note_id(&row.map_err(map_fts_error)?)?);
        }
        Ok(ids)
    }

    /// Loads the matching notes, most recently updated first.
    pub fn fetch(&self) -> StoreResult<Vec<Note>> {
        load_notes(self.conn, &self.ids()?)
    }

    /// Counts the matching notes.
    pub fn count(&self) -> StoreResult<usize> {
        let (where_sql, params) = self.where_sql();
        let sql = format!("SELECT COUNT(*) FROM notes n WHERE {where_sql}");
        let count: i64 = self
            .conn
            .query_row(&sql, rusqlite::params_from_iter(params.iter()), |row| {
                row.get(0)
            })
            .map_err(map_fts_error)?;
        Ok(count as usize)
    }
}

impl RecordSet for NoteQuery<'_> {
    type Error = StoreError;

    fn filter_containing_all(&self, needles: &[String]) -> StoreResult<Self> {
        Ok(self.containing_all(needles))
    }

    fn supports_token_index(&self) -> bool {
        true
    }

    fn filter_tokens_all(&self, tokens: &[String]) -> StoreResult<Self> {
        Ok(self.with_tokens(tokens))
    }

    fn is_empty(&self) -> StoreResult<bool> {
        let (where_sql, params) = self.where_sql();
        let sql = format!("SELECT EXISTS(SELECT 1 FROM notes n WHERE {where_sql})");
        let exists: bool = self
            .conn
            .query_row(&sql, rusqlite::params_from_iter(params.iter()), |row| {
                row.get(0)
            })
            .map_err(map_fts_error)?;
        Ok(!exists)
    }
}

fn lowercase(items: &[String]) -> Vec<String> {
    items.iter().map(|s| s.to_lowercase()).collect()
}

/// Quotes every token as an FTS5 string so operators in user input stay literal.
fn fts_query(tokens: &[String]) -> String {
    tokens
        .iter()
        .map(|t| format!("\"{}\"", t.replace('"', "\"\"")))
        .collect::<Vec<_>>()
        .join(" AND ")
}

fn map_fts_error(e: rusqlite::Error) -> StoreError {
    let msg = e.to_string();
    if msg.contains("fts5") || msg.contains("syntax") {
        StoreError::InvalidQuery(format!("invalid FTS query: {e}"))
    } else {
        StoreError::Database(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn fts_query_quotes_tokens() {
        let tokens = vec!["rust".to_string(), "say \"hi\"".to_string(), "or".to_string()];
        assert_eq!(fts_query(&tokens), r#""rust" AND "say ""hi""" AND "or""#);
    }
}
