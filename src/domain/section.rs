//! Section names partitioning notes, tags and books.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A namespace that partitions notes, tags and books.
///
/// Tag and book names are unique per section, so the same name in two
/// sections refers to two different rows. Section names are compared
/// exactly; only surrounding whitespace is trimmed.
///
/// # Examples
///
/// ```
/// use quill::domain::Section;
///
/// let section = Section::new("  work ").unwrap();
/// assert_eq!(section.as_str(), "work");
/// assert!(Section::new("   ").is_err());
/// ```
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Section(String);

/// Error returned when a section name is empty.
#[derive(Debug, Clone)]
pub struct ParseSectionError(String);

impl fmt::Display for ParseSectionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for ParseSectionError {}

impl Section {
    /// Creates a section from a name, trimming surrounding whitespace.
    ///
    /// # Errors
    ///
    /// Returns `ParseSectionError` if the name is empty after trimming.
    pub fn new(s: &str) -> Result<Self, ParseSectionError> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(ParseSectionError("section cannot be empty".to_string()));
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Returns the section name.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Debug for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Section(\"{}\")", self.0)
    }
}

impl FromStr for Section {
    type Err = ParseSectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl Serialize for Section {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for Section {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
