//! Output format types for CLI commands.

use clap::ValueEnum;
use serde::Serialize;

use crate::domain::{LabelWithCount, Note};
use crate::search::SearchStage;
use crate::store::SearchHit;

/// Output format for command results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable output (default)
    #[default]
    Human,
    /// JSON output for programmatic consumption
    Json,
}

/// Wrapper for serializable command output.
#[derive(Debug, Serialize)]
pub struct Output<T: Serialize> {
    pub data: T,
}

impl<T: Serialize> Output<T> {
    pub fn new(data: T) -> Self {
        Self { data }
    }
}

/// A single note in listing output.
#[derive(Debug, Serialize)]
pub struct NoteListing {
    pub id: String,
    pub title: String,
    pub preview: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub book: Option<String>,
    pub tags: Vec<String>,
    pub updated: String,
}

impl From<&Note> for NoteListing {
    fn from(note: &Note) -> Self {
        Self {
            id: note.id().to_string(),
            title: note.title().to_string(),
            preview: note.preview().to_string(),
            book: note.book().map(str::to_string),
            tags: note.tags().to_vec(),
            updated: note.updated().to_rfc3339(),
        }
    }
}

/// A tag or book with optional count.
#[derive(Debug, Serialize)]
pub struct LabelListing {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<u32>,
}

impl LabelListing {
    pub fn new(label: &LabelWithCount, counts: bool) -> Self {
        Self {
            name: label.label().name().to_string(),
            count: counts.then_some(label.count()),
        }
    }
}

/// A single search hit.
#[derive(Debug, Serialize)]
pub struct HitListing {
    pub id: String,
    pub title: String,
    pub snippet: String,
}

impl From<&SearchHit> for HitListing {
    fn from(hit: &SearchHit) -> Self {
        Self {
            id: hit.note().id().to_string(),
            title: hit.note().title().to_string(),
            snippet: hit.snippet().to_string(),
        }
    }
}

/// Search output: the hits plus how they were found.
#[derive(Debug, Serialize)]
pub struct SearchListing {
    pub keywords: Vec<String>,
    pub found_whole_phrase: bool,
    pub stage: SearchStage,
    pub hits: Vec<HitListing>,
}
