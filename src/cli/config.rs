//! Configuration file support.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::domain::Section;
use crate::search::DEFAULT_WINDOW_LIMIT;

/// Section used when neither the CLI nor the config file names one.
pub const DEFAULT_SECTION: &str = "default";

/// Application configuration loaded from config file.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Database file
    pub database: Option<PathBuf>,

    /// Default section
    pub section: Option<String>,

    /// Maximum snippet windows per search hit
    pub snippet_limit: Option<usize>,

    /// Wrap search matches in <em> markup
    pub highlight: bool,
}

impl Config {
    /// Load configuration from the default config file location.
    ///
    /// Returns default config if the file doesn't exist.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path())
    }

    /// Load configuration from a specific file.
    pub fn load_from(config_path: &Path) -> Result<Self> {
        if !config_path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(config_path)
            .with_context(|| format!("failed to read config file: {}", config_path.display()))?;

        toml::from_str(&contents)
            .with_context(|| format!("failed to parse config file: {}", config_path.display()))
    }

    /// Returns the path to the config file.
    ///
    /// Default: `~/.config/quill/config.toml`
    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("quill")
            .join("config.toml")
    }

    /// Resolve the database file, with CLI argument taking precedence.
    ///
    /// Precedence order:
    /// 1. CLI `--db` argument
    /// 2. Config file `database` setting
    /// 3. `notes.db` in the platform data directory
    pub fn database_path(&self, cli_db: Option<&PathBuf>) -> PathBuf {
        cli_db
            .cloned()
            .or_else(|| self.database.clone())
            .unwrap_or_else(|| {
                dirs::data_dir()
                    .unwrap_or_else(|| PathBuf::from("."))
                    .join("quill")
                    .join("notes.db")
            })
    }

    /// Resolve the section, with CLI argument taking precedence.
    pub fn section(&self, cli_section: Option<&str>) -> Result<Section> {
        let name = cli_section
            .or(self.section.as_deref())
            .unwrap_or(DEFAULT_SECTION);
        Section::new(name).with_context(|| format!("invalid section: '{name}'"))
    }

    /// Resolve the snippet window limit, with CLI argument taking precedence.
    pub fn snippet_limit(&self, cli_limit: Option<usize>) -> usize {
        cli_limit
            .or(self.snippet_limit)
            .unwrap_or(DEFAULT_WINDOW_LIMIT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    #[test]
    fn default_config_is_empty() {
        let config = Config::default();
        assert!(config.database.is_none());
        assert!(config.section.is_none());
        assert!(!config.highlight);
    }

    #[test]
    fn database_prefers_cli_arg() {
        let config = Config {
            database: Some(PathBuf::from("/config/notes.db")),
            ..Config::default()
        };
        let cli_db = PathBuf::from("/cli/notes.db");
        assert_eq!(config.database_path(Some(&cli_db)), cli_db);
    }

    #[test]
    fn database_falls_back_to_config() {
        let config = Config {
            database: Some(PathBuf::from("/config/notes.db")),
            ..Config::default()
        };
        assert_eq!(config.database_path(None), PathBuf::from("/config/notes.db"));
    }

    #[test]
    fn database_defaults_to_data_dir() {
        let path = Config::default().database_path(None);
        assert!(path.ends_with("quill/notes.db"));
    }

    #[test]
    fn section_precedence() {
        let config = Config {
            section: Some("work".to_string()),
            ..Config::default()
        };
        assert_eq!(config.section(Some("home")).unwrap().as_str(), "home");
        assert_eq!(config.section(None).unwrap().as_str(), "work");
        assert_eq!(Config::default().section(None).unwrap().as_str(), DEFAULT_SECTION);
    }

    #[test]
    fn blank_section_is_rejected() {
        assert!(Config::default().section(Some("  ")).is_err());
    }

    #[test]
    fn snippet_limit_precedence() {
        let config = Config {
            snippet_limit: Some(3),
            ..Config::default()
        };
        assert_eq!(config.snippet_limit(Some(1)), 1);
        assert_eq!(config.snippet_limit(None), 3);
        assert_eq!(Config::default().snippet_limit(None), DEFAULT_WINDOW_LIMIT);
    }

    #[test]
    fn loads_from_toml_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "database = \"/tmp/q.db\"\nsection = \"work\"\nsnippet_limit = 4\nhighlight = true\n",
        )
        .unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.database, Some(PathBuf::from("/tmp/q.db")));
        assert_eq!(config.section.as_deref(), Some("work"));
        assert_eq!(config.snippet_limit, Some(4));
        assert!(config.highlight);
    }

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("absent.toml")).unwrap();
        assert!(config.database.is_none());
    }

    #[test]
    fn invalid_toml_is_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "snippet_limit = \"many\"").unwrap();
        assert!(Config::load_from(&path).is_err());
    }

    #[test]
    fn config_path_is_in_config_dir() {
        assert!(Config::config_path().ends_with("quill/config.toml"));
    }
}
