//! Note resolution utilities.

use anyhow::{Context, Result, bail};

use crate::domain::{Note, NoteId, Section};
use crate::store::NoteRepository;

/// Result of resolving a note identifier.
#[derive(Debug)]
pub enum ResolveResult {
    /// Exactly one note matched.
    Unique(Note),
    /// Multiple notes matched (ambiguous).
    Ambiguous(Vec<Note>),
    /// No notes matched.
    NotFound,
}

/// Prints the candidates of an ambiguous identifier to stderr.
pub(crate) fn print_ambiguous_notes(identifier: &str, notes: &[Note]) {
    eprintln!("Ambiguous: '{}' matches {} notes:", identifier, notes.len());
    for note in notes {
        eprintln!("  {} - {}", note.id().short(), note.title());
        if !note.tags().is_empty() {
            eprintln!("      tags: {}", note.tags().join(", "));
        }
    }
    eprintln!();
    eprintln!("Use the ID prefix to specify which note you mean.");
}

/// Resolves a note identifier within a section.
///
/// Resolution order:
/// 1. Full ID
/// 2. ID prefix (if input looks like a ULID prefix)
/// 3. Title, ignoring case
///
/// An ID or a unique ID prefix wins outright; otherwise prefix and title
/// matches are pooled.
pub fn resolve_note<R: NoteRepository>(
    store: &R,
    section: &Section,
    identifier: &str,
) -> Result<ResolveResult> {
    let identifier = identifier.trim();

    if let Ok(id) = identifier.parse::<NoteId>()
        && let Some(note) = store.get_note(&id).context("failed to look up note")?
        && note.section() == section
    {
        return Ok(ResolveResult::Unique(note));
    }

    let notes = store
        .list_notes(section)
        .context("failed to list notes")?;

    let looks_like_id =
        identifier.len() >= 4 && identifier.chars().all(|c| c.is_ascii_alphanumeric());
    let mut candidates: Vec<Note> = Vec::new();

    if looks_like_id {
        let prefix = identifier.to_ascii_uppercase();
        let mut id_matches: Vec<Note> = notes
            .iter()
            .filter(|n| n.id().to_string().starts_with(&prefix))
            .cloned()
            .collect();
        if id_matches.len() == 1 {
            return Ok(ResolveResult::Unique(id_matches.remove(0)));
        }
        candidates.extend(id_matches);
    }

    let wanted = identifier.to_lowercase();
    candidates.extend(
        notes
            .into_iter()
            .filter(|n| n.title().to_lowercase() == wanted),
    );

    candidates.sort_by_key(|n| *n.id());
    candidates.dedup_by(|a, b| a.id() == b.id());

    match candidates.len() {
        0 => Ok(ResolveResult::NotFound),
        1 => Ok(ResolveResult::Unique(candidates.remove(0))),
        _ => Ok(ResolveResult::Ambiguous(candidates)),
    }
}

/// Resolves an identifier to exactly one note or fails with a readable error.
pub(crate) fn require_note<R: NoteRepository>(
    store: &R,
    section: &Section,
    identifier: &str,
) -> Result<Note> {
    match resolve_note(store, section, identifier)? {
        ResolveResult::Unique(note) => Ok(note),
        ResolveResult::Ambiguous(notes) => {
            print_ambiguous_notes(identifier, &notes);
            bail!("ambiguous note identifier");
        }
        ResolveResult::NotFound => bail!("note not found: '{}'", identifier),
    }
}
