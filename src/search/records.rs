//! The record-source seam the relaxation engine filters through.

use std::convert::Infallible;

/// A filterable set of records with indexed text.
///
/// Filters never mutate `self`; each returns a narrower set so the engine
/// can retry from the original set at every stage. Needles and tokens are
/// passed lowercased and matched case-insensitively.
pub trait RecordSet: Sized {
    type Error;

    /// Keeps records whose indexed text contains every needle as a substring.
    fn filter_containing_all(&self, needles: &[String]) -> Result<Self, Self::Error>;

    /// Whether [`filter_tokens_all`](Self::filter_tokens_all) is backed by a token index.
    fn supports_token_index(&self) -> bool {
        false
    }

    /// Keeps records whose token index holds every token.
    ///
    /// Only called when [`supports_token_index`](Self::supports_token_index)
    /// returns true.
    fn filter_tokens_all(&self, tokens: &[String]) -> Result<Self, Self::Error> {
        self.filter_containing_all(tokens)
    }

    /// Whether the set holds no records.
    fn is_empty(&self) -> Result<bool, Self::Error>;
}

/// A record whose indexed text can be searched in memory.
pub trait Searchable {
    /// The indexed text fields; a needle matches if any field contains it.
    fn search_fields(&self) -> Vec<&str>;

    /// Case-insensitive containment of a lowercased needle.
    fn contains_needle(&self, needle: &str) -> bool {
        self.search_fields()
            .iter()
            .any(|field| field.to_lowercase().contains(needle))
    }
}

impl Searchable for String {
    fn search_fields(&self) -> Vec<&str> {
        vec![self.as_str()]
    }
}

impl Searchable for &str {
    fn search_fields(&self) -> Vec<&str> {
        vec![*self]
    }
}

impl Searchable for crate::domain::Note {
    fn search_fields(&self) -> Vec<&str> {
        vec![self.title_index(), self.content_index()]
    }

    // Index fields are stored lowercased already.
    fn contains_needle(&self, needle: &str) -> bool {
        self.title_index().contains(needle) || self.content_index().contains(needle)
    }
}

/// In-memory record sets keep their original order.
impl<T: Searchable + Clone> RecordSet for Vec<T> {
    type Error = Infallible;

    fn filter_containing_all(&self, needles: &[String]) -> Result<Self, Self::Error> {
        Ok(self
            .iter()
            .filter(|record| needles.iter().all(|n| record.contains_needle(n)))
            .cloned()
            .collect())
    }

    fn is_empty(&self) -> Result<bool, Self::Error> {
        Ok(<[T]>::is_empty(self))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn needles(words: &[&str]) -> Vec<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    #[test]
    fn filter_requires_every_needle() {
        let records = vec![
            "alpha beta".to_string(),
            "alpha gamma".to_string(),
            "Beta Alpha".to_string(),
        ];
        let found = records.filter_containing_all(&needles(&["alpha", "beta"])).unwrap();
        assert_eq!(found, vec!["alpha beta".to_string(), "Beta Alpha".to_string()]);
    }

    #[test]
    fn filter_matches_substrings() {
        let records = vec!["understanding"];
        let found = records.filter_containing_all(&needles(&["stand"])).unwrap();
        assert_eq!(found.len(), 1);
    }

    #[test]
    fn in_memory_sets_have_no_token_index() {
        let records: Vec<String> = Vec::new();
        assert!(!records.supports_token_index());
        assert!(RecordSet::is_empty(&records).unwrap());
    }
}
