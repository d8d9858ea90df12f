//! Tag and book rows: shared, section-scoped, reference-counted names.

use serde::Serialize;
use std::fmt;

/// Which shared-name table a label lives in.
///
/// Tags and books behave identically except for cardinality: a note links
/// to any number of tags but at most one book.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LabelKind {
    Tag,
    Book,
}

impl LabelKind {
    /// Table holding the label rows.
    pub(crate) fn table(self) -> &'static str {
        match self {
            Self::Tag => "tags",
            Self::Book => "books",
        }
    }
}

impl fmt::Display for LabelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Tag => write!(f, "tag"),
            Self::Book => write!(f, "book"),
        }
    }
}

/// Returns the deduplication key for a label name.
///
/// Two names with the same key in the same section resolve to the same row.
///
/// ```
/// use quill::domain::label_key;
///
/// assert_eq!(label_key("  NewTag "), "newtag");
/// assert_eq!(label_key("newTag"), label_key("NEWTAG"));
/// ```
pub fn label_key(name: &str) -> String {
    name.trim().to_lowercase()
}

/// A stored tag or book row.
///
/// `name` keeps the casing of the first request that created the row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Label {
    id: i64,
    kind: LabelKind,
    section: String,
    name: String,
}

impl Label {
    pub fn new(id: i64, kind: LabelKind, section: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id,
            kind,
            section: section.into(),
            name: name.into(),
        }
    }

    pub fn id(&self) -> i64 {
        self.id
    }

    pub fn kind(&self) -> LabelKind {
        self.kind
    }

    pub fn section(&self) -> &str {
        &self.section
    }

    /// Returns the authoritative display name.
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// A label together with the number of notes referencing it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LabelWithCount {
    label: Label,
    count: u32,
}

impl LabelWithCount {
    pub fn new(label: Label, count: u32) -> Self {
        Self { label, count }
    }

    pub fn label(&self) -> &Label {
        &self.label
    }

    /// Returns the reference count.
    pub fn count(&self) -> u32 {
        self.count
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn key_folds_case_and_trims() {
        assert_eq!(label_key("Rust"), "rust");
        assert_eq!(label_key("  Mixed Case  "), "mixed case");
        assert_eq!(label_key("ÄRGER"), "ärger");
    }

    #[test]
    fn kind_maps_to_table() {
        assert_eq!(LabelKind::Tag.table(), "tags");
        assert_eq!(LabelKind::Book.table(), "books");
        assert_eq!(LabelKind::Book.to_string(), "book");
    }

    #[test]
    fn label_accessors() {
        let label = Label::new(7, LabelKind::Tag, "work", "newTag");
        let counted = LabelWithCount::new(label.clone(), 2);
        assert_eq!(counted.label(), &label);
        assert_eq!(counted.count(), 2);
        assert_eq!(label.name(), "newTag");
        assert_eq!(label.section(), "work");
    }
}
