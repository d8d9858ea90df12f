//! Multi-stage search with progressive keyword relaxation.

use super::records::RecordSet;
use serde::Serialize;
use tracing::debug;

/// Tokens are never shrunk below this many characters.
pub const PREFIX_LEN: usize = 3;

/// The stage that produced a [`SearchResult`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchStage {
    /// The term was empty; nothing was filtered.
    Unfiltered,
    /// The whole term matched verbatim.
    Phrase,
    /// Every token matched through the token index.
    TokenIndex,
    /// Every token matched as a substring.
    Tokens,
    /// A leading subset of the tokens matched.
    DroppedTokens,
    /// Tokens shortened towards their prefix matched.
    Prefix,
    /// No attempt matched.
    Exhausted,
}

/// Outcome of [`search`].
///
/// `keywords` is the set the accepting attempt used (or the last failing
/// attempt, when nothing matched). It is meant for highlighting only.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchResult<R> {
    records: R,
    keywords: Vec<String>,
    found_whole_phrase: bool,
    stage: SearchStage,
}

impl<R> SearchResult<R> {
    fn new(records: R, keywords: Vec<String>, stage: SearchStage) -> Self {
        Self {
            records,
            keywords,
            found_whole_phrase: stage == SearchStage::Phrase,
            stage,
        }
    }

    pub fn records(&self) -> &R {
        &self.records
    }

    /// Returns the keywords in the order they were tried.
    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }

    pub fn found_whole_phrase(&self) -> bool {
        self.found_whole_phrase
    }

    pub fn stage(&self) -> SearchStage {
        self.stage
    }

    pub fn into_records(self) -> R {
        self.records
    }
}

/// Splits a term into lowercased whitespace-separated tokens.
///
/// Order is preserved and duplicates are dropped.
///
/// ```
/// use quill::search::tokenize;
///
/// assert_eq!(tokenize("  Text  some TEXT "), vec!["text", "some"]);
/// ```
pub fn tokenize(term: &str) -> Vec<String> {
    let mut tokens: Vec<String> = Vec::new();
    for token in term.split_whitespace().map(str::to_lowercase) {
        if !tokens.contains(&token) {
            tokens.push(token);
        }
    }
    tokens
}

/// Finds records matching `term`, relaxing the query until something matches.
///
/// Stages, each filtering the original `records`:
/// 1. the whole term as a substring;
/// 2. every token through the token index, if the set has one;
/// 3. every token as a substring;
/// 4. dropping tokens from the end while more than one remains;
/// 5. shortening the remaining first token one character at a time, down
///    to [`PREFIX_LEN`];
/// 6. for multi-token terms, starting over from all tokens and shortening
///    every token longer than [`PREFIX_LEN`] by one character per round.
///
/// An empty term returns `records` unfiltered with no keywords.
///
/// ```
/// use quill::search::search;
///
/// let notes = vec!["This contains longkey".to_string()];
/// let result = search(notes, "longkeyword").unwrap();
/// assert_eq!(result.records().len(), 1);
/// assert_eq!(result.keywords(), &["longkey".to_string()]);
/// assert!(!result.found_whole_phrase());
/// ```
pub fn search<R: RecordSet>(records: R, term: &str) -> Result<SearchResult<R>, R::Error> {
    let tokens = tokenize(term);
    if tokens.is_empty() {
        return Ok(SearchResult::new(records, Vec::new(), SearchStage::Unfiltered));
    }

    let phrase = term.split_whitespace().collect::<Vec<_>>().join(" ").to_lowercase();
    let phrase_keywords = vec![phrase];
    let hits = records.filter_containing_all(&phrase_keywords)?;
    if !hits.is_empty()? {
        debug!(keywords = ?phrase_keywords, "search matched whole phrase");
        return Ok(SearchResult::new(hits, phrase_keywords, SearchStage::Phrase));
    }

    if records.supports_token_index() {
        let hits = records.filter_tokens_all(&tokens)?;
        if !hits.is_empty()? {
            debug!(keywords = ?tokens, "search matched through token index");
            return Ok(SearchResult::new(hits, tokens, SearchStage::TokenIndex));
        }
    }

    let mut last = records.filter_containing_all(&tokens)?;
    let mut last_keywords = tokens.clone();
    if !last.is_empty()? {
        debug!(keywords = ?tokens, "search matched all tokens");
        return Ok(SearchResult::new(last, tokens, SearchStage::Tokens));
    }

    let mut kept = tokens.clone();
    while kept.len() > 1 {
        kept.pop();
        last = records.filter_containing_all(&kept)?;
        last_keywords = kept.clone();
        if !last.is_empty()? {
            debug!(keywords = ?kept, "search matched after dropping tokens");
            return Ok(SearchResult::new(last, kept, SearchStage::DroppedTokens));
        }
    }

    let mut single = kept;
    while shrink_tokens(&mut single) {
        last = records.filter_containing_all(&single)?;
        last_keywords = single.clone();
        if !last.is_empty()? {
            debug!(keywords = ?single, "search matched shortened first token");
            return Ok(SearchResult::new(last, single, SearchStage::Prefix));
        }
    }
    if tokens.len() == 1 {
        debug!(keywords = ?last_keywords, "search exhausted relaxation");
        return Ok(SearchResult::new(last, last_keywords, SearchStage::Exhausted));
    }

    let mut shrunk = tokens;
    while shrink_tokens(&mut shrunk) {
        last = records.filter_containing_all(&shrunk)?;
        last_keywords = shrunk.clone();
        if !last.is_empty()? {
            debug!(keywords = ?shrunk, "search matched shortened tokens");
            return Ok(SearchResult::new(last, shrunk, SearchStage::Prefix));
        }
    }

    debug!(keywords = ?last_keywords, "search exhausted relaxation");
    Ok(SearchResult::new(last, last_keywords, SearchStage::Exhausted))
}

/// Removes the last character of every token longer than [`PREFIX_LEN`].
///
/// Returns false once no token can be shortened. Tokens that become equal
/// are merged, keeping the first.
fn shrink_tokens(tokens: &mut Vec<String>) -> bool {
    let mut changed = false;
    for token in tokens.iter_mut() {
        if token.chars().count() > PREFIX_LEN {
            token.pop();
            changed = true;
        }
    }
    if changed {
        let mut seen: Vec<String> = Vec::with_capacity(tokens.len());
        tokens.retain(|t| {
            if seen.contains(t) {
                false
            } else {
                seen.push(t.clone());
                true
            }
        });
    }
    changed
}
