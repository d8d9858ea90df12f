//! Search command handler.

use anyhow::{Context, Result};
use std::fmt::Write;

use super::truncate_str;
use crate::cli::SearchArgs;
use crate::cli::config::Config;
use crate::cli::output::{HitListing, Output, OutputFormat, SearchListing};
use crate::domain::Section;
use crate::search::SnippetOptions;
use crate::store::{NoteRepository, SearchOutcome};

pub fn handle_search<R: NoteRepository>(
    args: &SearchArgs,
    store: &mut R,
    section: &Section,
    config: &Config,
) -> Result<()> {
    let options = SnippetOptions::default()
        .limit(config.snippet_limit(args.limit))
        .highlight(args.highlight || config.highlight);

    let outcome = store
        .search(section, &args.term, options)
        .with_context(|| format!("search failed for term: {}", args.term))?;

    if !args.no_save_previews {
        store
            .refresh_previews(&outcome.hits)
            .with_context(|| "failed to store previews")?;
    }

    print!("{}", render_search(&outcome, args.format)?);
    Ok(())
}

/// Renders search hits with their snippets.
pub(crate) fn render_search(outcome: &SearchOutcome, format: OutputFormat) -> Result<String> {
    let mut out = String::new();
    match format {
        OutputFormat::Human => {
            if outcome.hits.is_empty() {
                writeln!(out, "No matching notes found.")?;
                return Ok(out);
            }
            for hit in &outcome.hits {
                let note = hit.note();
                writeln!(out, "{}  {}", note.id().short(), truncate_str(note.title(), 40))?;
                if !hit.snippet().is_empty() {
                    writeln!(out, "  {}", hit.snippet())?;
                }
            }
            writeln!(out)?;
            writeln!(
                out,
                "{} result(s) for: {}",
                outcome.hits.len(),
                outcome.keywords.join(" ")
            )?;
        }
        OutputFormat::Json => {
            let listing = SearchListing {
                keywords: outcome.keywords.clone(),
                found_whole_phrase: outcome.found_whole_phrase,
                stage: outcome.stage,
                hits: outcome.hits.iter().map(HitListing::from).collect(),
            };
            writeln!(out, "{}", serde_json::to_string_pretty(&Output::new(listing))?)?;
        }
    }
    Ok(out)
}
