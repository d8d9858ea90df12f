//! Rich-text to plain-text index conversion.

use regex::Regex;
use std::sync::LazyLock;

static SCRIPT_OR_STYLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<script\b[^>]*>.*?</script\s*>|<style\b[^>]*>.*?</style\s*>")
        .expect("script/style pattern is valid")
});

static MARKUP_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<[^>]*>").expect("tag pattern is valid"));

static ENTITY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"&(#[0-9]{1,7}|#[xX][0-9a-fA-F]{1,6}|[a-zA-Z]{2,6});").expect("entity pattern is valid")
});

/// Converts rich (HTML) text into a searchable plain-text string.
///
/// Every markup tag becomes a word separator, so `<p>Hello</p><p>world</p>`
/// yields `Hello world`. Whitespace runs collapse to one space and the ends
/// are trimmed. With `lowercase` the result is case-folded. With a `limit`,
/// longer results are cut to `limit` characters and suffixed with `...`.
///
/// ```
/// use quill::search::index_text;
///
/// assert_eq!(index_text("<p>Hello</p>   <p>world</p>", true, None), "hello world");
/// assert_eq!(index_text("<p>Hello</p><p>world</p>", false, None), "Hello world");
/// assert_eq!(index_text("<p>Hello</p>   <p>World</p>", true, Some(6)), "hello...");
/// assert_eq!(index_text("", true, None), "");
/// ```
pub fn index_text(raw: &str, lowercase: bool, limit: Option<usize>) -> String {
    if raw.is_empty() {
        return String::new();
    }

    let without_code = SCRIPT_OR_STYLE.replace_all(raw, " ");
    let without_tags = MARKUP_TAG.replace_all(&without_code, " ");
    let decoded = decode_entities(&without_tags);

    let mut text = decoded.split_whitespace().collect::<Vec<_>>().join(" ");
    if lowercase {
        text = text.to_lowercase();
    }

    match limit {
        Some(limit) if text.chars().count() > limit => {
            let cut: String = text.chars().take(limit).collect();
            format!("{}...", cut.trim_end())
        }
        _ => text,
    }
}

/// Decodes the character references that commonly appear in editor output.
///
/// Unknown named references are left untouched.
fn decode_entities(s: &str) -> String {
    if !s.contains('&') {
        return s.to_string();
    }

    ENTITY
        .replace_all(s, |caps: &regex::Captures<'_>| {
            let body = &caps[1];
            let decoded = if let Some(hex) = body.strip_prefix("#x").or_else(|| body.strip_prefix("#X")) {
                u32::from_str_radix(hex, 16).ok().and_then(char::from_u32)
            } else if let Some(dec) = body.strip_prefix('#') {
                dec.parse::<u32>().ok().and_then(char::from_u32)
            } else {
                match body {
                    "amp" => Some('&'),
                    "lt" => Some('<'),
                    "gt" => Some('>'),
                    "quot" => Some('"'),
                    "apos" => Some('\''),
                    "nbsp" => Some(' '),
                    _ => None,
                }
            };
            decoded.map_or_else(|| caps[0].to_string(), |c| c.to_string())
        })
        .into_owned()
}
