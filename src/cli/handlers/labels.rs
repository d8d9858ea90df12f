//! Tag and book command handlers (tag, book, tags, books).

use anyhow::{Context, Result};
use std::collections::BTreeSet;
use std::fmt::Write;

use super::resolve::require_note;
use crate::cli::output::{LabelListing, Output, OutputFormat};
use crate::cli::{BookArgs, LabelsArgs, TagArgs};
use crate::domain::{LabelKind, LabelWithCount, Section};
use crate::store::NoteRepository;

pub fn handle_tag<R: NoteRepository>(args: &TagArgs, store: &mut R, section: &Section) -> Result<()> {
    let note = require_note(store, section, &args.note)?;
    let names: BTreeSet<String> = args.tags.iter().cloned().collect();

    store
        .sync_tags(note.id(), &names)
        .with_context(|| format!("failed to update tags of note {}", note.id()))?;

    if names.is_empty() {
        println!("Cleared tags: {} [{}]", note.title(), note.id().short());
    } else {
        println!("Tagged: {} [{}]", note.title(), note.id().short());
    }
    Ok(())
}

pub fn handle_book<R: NoteRepository>(args: &BookArgs, store: &mut R, section: &Section) -> Result<()> {
    let note = require_note(store, section, &args.note)?;

    store
        .sync_book(note.id(), args.book.as_deref())
        .with_context(|| format!("failed to update book of note {}", note.id()))?;

    match args.book.as_deref().map(str::trim).filter(|b| !b.is_empty()) {
        Some(book) => println!("Filed: {} [{}] in {}", note.title(), note.id().short(), book),
        None => println!("Cleared book: {} [{}]", note.title(), note.id().short()),
    }
    Ok(())
}

pub fn handle_tags<R: NoteRepository>(args: &LabelsArgs, store: &R, section: &Section) -> Result<()> {
    let tags = store
        .all_tags(section)
        .with_context(|| "failed to list tags")?;
    print!("{}", render_labels(LabelKind::Tag, &tags, args)?);
    Ok(())
}

pub fn handle_books<R: NoteRepository>(args: &LabelsArgs, store: &R, section: &Section) -> Result<()> {
    let books = store
        .all_books(section)
        .with_context(|| "failed to list books")?;
    print!("{}", render_labels(LabelKind::Book, &books, args)?);
    Ok(())
}

pub(crate) fn render_labels(
    kind: LabelKind,
    labels: &[LabelWithCount],
    args: &LabelsArgs,
) -> Result<String> {
    let mut out = String::new();
    match args.format {
        OutputFormat::Human => {
            if labels.is_empty() {
                writeln!(out, "No {kind}s found.")?;
            }
            for l in labels {
                if args.counts {
                    writeln!(out, "{} ({})", l.label().name(), l.count())?;
                } else {
                    writeln!(out, "{}", l.label().name())?;
                }
            }
        }
        OutputFormat::Json => {
            let listings: Vec<LabelListing> = labels
                .iter()
                .map(|l| LabelListing::new(l, args.counts))
                .collect();
            writeln!(out, "{}", serde_json::to_string_pretty(&Output::new(listings))?)?;
        }
    }
    Ok(out)
}
