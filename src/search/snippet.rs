//! Highlighted, length-bounded previews around search matches.

/// Characters of context kept on each side of a match.
pub const CONTEXT_CHARS: usize = 15;

/// Default maximum number of windows in keyword mode.
pub const DEFAULT_WINDOW_LIMIT: usize = 10;

const HIGHLIGHT_OPEN: &str = "<em>";
const HIGHLIGHT_CLOSE: &str = "</em>";
const ELLIPSIS: &str = "...";

/// How a snippet is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SnippetOptions {
    /// Maximum number of windows in keyword mode.
    pub limit: usize,
    /// Render one window around the whole phrase instead of per keyword.
    pub found_whole_phrase: bool,
    /// Wrap matches in `<em>` markup.
    pub highlight: bool,
}

impl Default for SnippetOptions {
    fn default() -> Self {
        Self {
            limit: DEFAULT_WINDOW_LIMIT,
            found_whole_phrase: false,
            highlight: false,
        }
    }
}

impl SnippetOptions {
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    pub fn whole_phrase(mut self, found_whole_phrase: bool) -> Self {
        self.found_whole_phrase = found_whole_phrase;
        self
    }

    pub fn highlight(mut self, highlight: bool) -> Self {
        self.highlight = highlight;
        self
    }
}

/// Renders a preview of `text` around the occurrences of `keywords`.
///
/// In whole-phrase mode the first keyword is the phrase and a single window
/// is returned. Otherwise every occurrence of any keyword, left to right,
/// gets its own window, up to `options.limit` windows. Each window ends in
/// `...`. Returns an empty string when there are no keywords, the text is
/// empty, or nothing matches.
///
/// ```
/// use quill::search::{SnippetOptions, extract_snippet};
///
/// let snippet = extract_snippet(
///     &["hello world".to_string()],
///     "This is a test for Hello World highlighting.",
///     SnippetOptions::default().whole_phrase(true).highlight(true),
/// );
/// assert_eq!(snippet, "is a test for <em>Hello World</em> highlighting....");
/// ```
pub fn extract_snippet(keywords: &[String], text: &str, options: SnippetOptions) -> String {
    if keywords.is_empty() || text.is_empty() {
        return String::new();
    }

    let chars: Vec<char> = text.chars().collect();
    let folded = FoldedText::new(&chars);

    if options.found_whole_phrase {
        let phrase = fold_str(&keywords[0]);
        return find_all(&folded.chars, &phrase)
            .first()
            .map(|&start| {
                let (start, end) = folded.original_span(start, phrase.len());
                render_window(&chars, start, end, options.highlight)
            })
            .unwrap_or_default();
    }

    let mut matches: Vec<(usize, usize)> = Vec::new();
    for keyword in keywords {
        let needle = fold_str(keyword);
        matches.extend(
            find_all(&folded.chars, &needle)
                .into_iter()
                .map(|start| folded.original_span(start, needle.len())),
        );
    }
    // Leftmost first; at the same position the longer keyword wins.
    matches.sort_by(|a, b| a.0.cmp(&b.0).then(b.1.cmp(&a.1)));

    let mut windows = Vec::new();
    let mut covered_until = 0;
    for (start, end) in matches {
        if windows.len() >= options.limit {
            break;
        }
        if start < covered_until {
            continue;
        }
        windows.push(render_window(&chars, start, end, options.highlight));
        covered_until = end;
    }
    windows.join(" ")
}

/// Lowercased text, with each folded char mapped back to its source char.
///
/// Some chars lowercase to several (`'İ'` becomes `"i\u{307}"`), so folded
/// positions and source positions can differ.
struct FoldedText {
    chars: Vec<char>,
    source: Vec<usize>,
}

impl FoldedText {
    fn new(text: &[char]) -> Self {
        let mut chars = Vec::with_capacity(text.len());
        let mut source = Vec::with_capacity(text.len());
        for (i, &c) in text.iter().enumerate() {
            for lower in fold(c) {
                chars.push(lower);
                source.push(i);
            }
        }
        Self { chars, source }
    }

    /// Maps a folded match to the source chars it covers.
    fn original_span(&self, start: usize, len: usize) -> (usize, usize) {
        (self.source[start], self.source[start + len - 1] + 1)
    }
}

fn fold(c: char) -> impl Iterator<Item = char> {
    // Final sigma depends on context in `str::to_lowercase`; fold both forms alike.
    c.to_lowercase().map(|l| if l == 'ς' { 'σ' } else { l })
}

fn fold_str(s: &str) -> Vec<char> {
    s.chars().flat_map(fold).collect()
}

/// Start positions of non-overlapping occurrences of `needle`.
fn find_all(haystack: &[char], needle: &[char]) -> Vec<usize> {
    let mut found = Vec::new();
    if needle.is_empty() || needle.len() > haystack.len() {
        return found;
    }
    let mut i = 0;
    while i + needle.len() <= haystack.len() {
        if haystack[i..i + needle.len()] == *needle {
            found.push(i);
            i += needle.len();
        } else {
            i += 1;
        }
    }
    found
}

/// Renders `chars[start..end]` with up to [`CONTEXT_CHARS`] on each side.
///
/// A word cut by a window edge is dropped if the context has a space to cut
/// at; edges clip at the ends of the text.
fn render_window(chars: &[char], start: usize, end: usize, highlight: bool) -> String {
    let len = chars.len();
    let mut from = start.saturating_sub(CONTEXT_CHARS);
    let mut to = (end + CONTEXT_CHARS).min(len);

    if from > 0
        && !chars[from - 1].is_whitespace()
        && !chars[from].is_whitespace()
        && let Some(ws) = chars[from..start].iter().position(|c| c.is_whitespace())
    {
        from += ws;
    }
    if to < len
        && !chars[to].is_whitespace()
        && !chars[to - 1].is_whitespace()
        && let Some(ws) = chars[end..to].iter().rposition(|c| c.is_whitespace())
    {
        to = end + ws;
    }

    let before: String = chars[from..start].iter().collect();
    let matched: String = chars[start..end].iter().collect();
    let after: String = chars[end..to].iter().collect();

    let (open, close) = if highlight {
        (HIGHLIGHT_OPEN, HIGHLIGHT_CLOSE)
    } else {
        ("", "")
    };
    format!(
        "{}{open}{matched}{close}{}{ELLIPSIS}",
        before.trim_start(),
        after.trim_end()
    )
}
