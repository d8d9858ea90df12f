//! Note entity and the draft used to create one.

use crate::domain::{NoteId, Section};
use crate::search::index_text;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Maximum length of the preview stored when a note's content changes.
pub const PREVIEW_LIMIT: usize = 120;

/// The search-derived fields of a note.
///
/// These are a pure function of the title and content and are recomputed
/// every time either changes; nothing else writes them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DerivedText {
    pub title_index: String,
    pub content_index: String,
    pub preview: String,
}

impl DerivedText {
    /// Computes the lowercased indexes and the cased preview.
    pub fn compute(title: &str, content: &str) -> Self {
        Self {
            title_index: index_text(title, true, None),
            content_index: index_text(content, true, None),
            preview: index_text(content, false, Some(PREVIEW_LIMIT)),
        }
    }
}

/// A stored note.
///
/// # Examples
///
/// ```
/// use quill::domain::{Note, NoteId, Section};
/// use chrono::Utc;
///
/// let now = Utc::now();
/// let note = Note::builder(NoteId::new(), Section::new("work").unwrap(), "Plan", now, now)
///     .content("<p>Ship</p><p>it</p>")
///     .build();
/// assert_eq!(note.content_index(), "ship it");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Note {
    id: NoteId,
    section: Section,
    title: String,
    content: String,
    title_index: String,
    content_index: String,
    preview: String,
    book: Option<String>,
    tags: Vec<String>,
    created: DateTime<Utc>,
    updated: DateTime<Utc>,
}

impl Note {
    /// Starts building a note; the derived text fields are computed in `build`
    /// unless stored values are supplied with `stored_text`.
    pub fn builder(
        id: NoteId,
        section: Section,
        title: impl Into<String>,
        created: DateTime<Utc>,
        updated: DateTime<Utc>,
    ) -> NoteBuilder {
        NoteBuilder {
            id,
            section,
            title: title.into(),
            content: String::new(),
            stored: None,
            book: None,
            tags: Vec::new(),
            created,
            updated,
        }
    }

    pub fn id(&self) -> &NoteId {
        &self.id
    }

    pub fn section(&self) -> &Section {
        &self.section
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the rich (HTML) content as entered.
    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn title_index(&self) -> &str {
        &self.title_index
    }

    pub fn content_index(&self) -> &str {
        &self.content_index
    }

    /// Returns the cached preview: the last rendered snippet, or the start
    /// of the content if the note has not been found by a search yet.
    pub fn preview(&self) -> &str {
        &self.preview
    }

    pub fn book(&self) -> Option<&str> {
        self.book.as_deref()
    }

    /// Returns tag names sorted case-insensitively.
    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    pub fn created(&self) -> DateTime<Utc> {
        self.created
    }

    pub fn updated(&self) -> DateTime<Utc> {
        self.updated
    }
}

/// Builder for [`Note`].
pub struct NoteBuilder {
    id: NoteId,
    section: Section,
    title: String,
    content: String,
    stored: Option<DerivedText>,
    book: Option<String>,
    tags: Vec<String>,
    created: DateTime<Utc>,
    updated: DateTime<Utc>,
}

impl NoteBuilder {
    pub fn content(mut self, content: impl Into<String>) -> Self {
        self.content = content.into();
        self
    }

    /// Uses derived text loaded from storage instead of recomputing it.
    pub fn stored_text(mut self, derived: DerivedText) -> Self {
        self.stored = Some(derived);
        self
    }

    pub fn book(mut self, book: Option<String>) -> Self {
        self.book = book;
        self
    }

    pub fn tags(mut self, mut tags: Vec<String>) -> Self {
        tags.sort_by_key(|t| t.to_lowercase());
        self.tags = tags;
        self
    }

    pub fn build(self) -> Note {
        let derived = self
            .stored
            .unwrap_or_else(|| DerivedText::compute(&self.title, &self.content));
        Note {
            id: self.id,
            section: self.section,
            title: self.title,
            content: self.content,
            title_index: derived.title_index,
            content_index: derived.content_index,
            preview: derived.preview,
            book: self.book,
            tags: self.tags,
            created: self.created,
            updated: self.updated,
        }
    }
}

/// Everything needed to create a note.
///
/// ```
/// use quill::domain::{NewNote, Section};
///
/// let draft = NewNote::new(Section::new("work").unwrap(), "Standup")
///     .content("<p>notes</p>")
///     .book("Meetings")
///     .tag("daily");
/// assert_eq!(draft.tag_names(), &["daily".to_string()]);
/// ```
#[derive(Debug, Clone)]
pub struct NewNote {
    section: Section,
    title: String,
    content: String,
    book: Option<String>,
    tags: Vec<String>,
}

impl NewNote {
    pub fn new(section: Section, title: impl Into<String>) -> Self {
        Self {
            section,
            title: title.into(),
            content: String::new(),
            book: None,
            tags: Vec::new(),
        }
    }

    pub fn content(mut self, content: impl Into<String>) -> Self {
        self.content = content.into();
        self
    }

    pub fn book(mut self, book: impl Into<String>) -> Self {
        self.book = Some(book.into());
        self
    }

    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }

    pub fn tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags.extend(tags.into_iter().map(Into::into));
        self
    }

    pub fn section(&self) -> &Section {
        &self.section
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn content_text(&self) -> &str {
        &self.content
    }

    pub fn book_name(&self) -> Option<&str> {
        self.book.as_deref()
    }

    pub fn tag_names(&self) -> &[String] {
        &self.tags
    }
}
