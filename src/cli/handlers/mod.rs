//! Command handlers for the CLI.

mod labels;
mod notes;
mod resolve;
mod search;


use anyhow::{Context, Result};
use std::path::Path;

use crate::store::NoteStore;

// Re-export public items
pub use labels::{handle_book, handle_books, handle_tag, handle_tags};
pub use notes::{handle_add, handle_edit, handle_list, handle_rm, handle_show};
pub use resolve::{ResolveResult, resolve_note};
pub use search::handle_search;

// ===========================================
// Shared Utilities
// ===========================================

/// Opens the note store, creating the database on first use.
pub(crate) fn open_store(db_path: &Path) -> Result<NoteStore> {
    NoteStore::open(db_path)
        .with_context(|| format!("failed to open database at {}", db_path.display()))
}

/// Truncates a string to a maximum display width, adding ellipsis if needed.
pub(crate) fn truncate_str(s: &str, max_width: usize) -> String {
    if s.chars().count() <= max_width {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max_width.saturating_sub(1)).collect();
        format!("{}…", truncated)
    }
}
