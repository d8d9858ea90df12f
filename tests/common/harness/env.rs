//! Isolated test environment with a temporary database.

use super::QuillCommand;
use quill::domain::{NewNote, Note, Section};
use quill::store::{NoteRepository, NoteStore};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Isolated test environment with a temporary home and database.
///
/// Creates a temp directory that is automatically cleaned up on drop.
/// Notes can be seeded through the library and then inspected through
/// the CLI, or the other way round.
pub struct TestEnv {
    /// The temporary directory (kept for lifetime management)
    _temp_dir: TempDir,
    /// Path used as the home directory
    home: PathBuf,
}

impl TestEnv {
    /// Creates a new isolated test environment.
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let home = temp_dir.path().to_path_buf();
        Self {
            _temp_dir: temp_dir,
            home,
        }
    }

    /// Returns the path of the temporary home directory.
    pub fn home(&self) -> &Path {
        &self.home
    }

    /// Returns the path of the SQLite database.
    pub fn db_path(&self) -> PathBuf {
        self.home.join("notes.db")
    }

    /// Opens the environment's database through the library.
    pub fn store(&self) -> NoteStore {
        NoteStore::open(&self.db_path()).expect("Failed to open store")
    }

    /// Creates a note in the `default` section.
    pub fn add_note(&self, title: &str, content: &str) -> Note {
        self.add(NewNote::new(Section::new("default").unwrap(), title).content(content))
    }

    /// Creates a note from a full draft.
    pub fn add(&self, draft: NewNote) -> Note {
        self.store()
            .create_note(&draft)
            .expect("Failed to create test note")
    }

    /// Writes the config file that the CLI reads from this home.
    pub fn write_config(&self, contents: &str) -> PathBuf {
        let dir = self.home.join("config").join("quill");
        std::fs::create_dir_all(&dir).expect("Failed to create config directory");
        let path = dir.join("config.toml");
        std::fs::write(&path, contents).expect("Failed to write config");
        path
    }

    /// Creates a QuillCommand configured for this test environment.
    pub fn cmd(&self) -> QuillCommand {
        QuillCommand::new().home(&self.home).db(&self.db_path())
    }
}

impl Default for TestEnv {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_creates_temp_directory() {
        let env = TestEnv::new();
        assert!(env.home().is_dir(), "home directory should exist");
    }

    #[test]
    fn test_env_cleanup_on_drop() {
        let path = {
            let env = TestEnv::new();
            env.home().to_path_buf()
        };
        assert!(!path.exists(), "temp directory should be cleaned up on drop");
    }

    #[test]
    fn test_env_provides_command() {
        let env = TestEnv::new();
        let cmd = env.cmd();
        let args = cmd.get_args();
        assert_eq!(args[0], "--db");
        assert_eq!(args[1], env.db_path().to_string_lossy());
    }

    #[test]
    fn test_env_add_note_is_listed() {
        let env = TestEnv::new();
        env.add_note("First", "one");
        env.add_note("Second", "two");

        let notes = env
            .store()
            .list_notes(&Section::new("default").unwrap())
            .unwrap();
        assert_eq!(notes.len(), 2);
    }
}
