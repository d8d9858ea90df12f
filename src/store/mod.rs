//! SQLite note store, composable queries and tag/book synchronization

mod repository;
mod schema;
mod sqlite;
pub mod sync;

pub use repository::{NoteRepository, SearchHit, SearchOutcome, StoreError, StoreResult};
pub use schema::{SCHEMA_VERSION, create_schema};
pub use sqlite::{NoteQuery, NoteStore, Transaction};
