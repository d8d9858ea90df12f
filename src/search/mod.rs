//! Text indexing, relaxed search and snippet rendering.
//!
//! Everything here is pure: the only I/O happens behind [`RecordSet`]
//! implementations such as the SQLite-backed `NoteQuery`.

mod indexer;
mod records;
mod relax;
mod snippet;

pub use indexer::index_text;
pub use records::{RecordSet, Searchable};
pub use relax::{PREFIX_LEN, SearchResult, SearchStage, search, tokenize};
pub use snippet::{CONTEXT_CHARS, DEFAULT_WINDOW_LIMIT, SnippetOptions, extract_snippet};
