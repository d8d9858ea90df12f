//! Note command handlers (add, edit, show, rm, ls).

use anyhow::{Context, Result};
use std::fmt::Write;

use super::resolve::require_note;
use super::truncate_str;
use crate::cli::output::{NoteListing, Output, OutputFormat};
use crate::cli::{AddArgs, EditArgs, ListArgs, RmArgs, ShowArgs};
use crate::domain::{NewNote, Note, Section, label_key};
use crate::search::index_text;
use crate::store::NoteRepository;

pub fn handle_add<R: NoteRepository>(args: &AddArgs, store: &mut R, section: &Section) -> Result<()> {
    let mut draft = NewNote::new(section.clone(), &args.title)
        .content(&args.content)
        .tags(&args.tags);
    if let Some(book) = &args.book {
        draft = draft.book(book);
    }

    let note = store
        .create_note(&draft)
        .with_context(|| format!("failed to create note '{}'", args.title))?;

    match args.format {
        OutputFormat::Human => println!("Created: {} [{}]", note.title(), note.id().short()),
        OutputFormat::Json => {
            let out = Output::new(NoteListing::from(&note));
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
    }
    Ok(())
}

pub fn handle_edit<R: NoteRepository>(args: &EditArgs, store: &mut R, section: &Section) -> Result<()> {
    let note = require_note(store, section, &args.note)?;
    if args.title.is_none() && args.content.is_none() {
        println!("Nothing to change: {} [{}]", note.title(), note.id().short());
        return Ok(());
    }

    let updated = store
        .update_note(note.id(), args.title.as_deref(), args.content.as_deref())
        .with_context(|| format!("failed to update note {}", note.id()))?;
    println!("Edited: {} [{}]", updated.title(), updated.id().short());
    Ok(())
}

pub fn handle_show<R: NoteRepository>(args: &ShowArgs, store: &R, section: &Section) -> Result<()> {
    let note = require_note(store, section, &args.note)?;
    print!("{}", render_note(&note, args.format)?);
    Ok(())
}

pub fn handle_rm<R: NoteRepository>(args: &RmArgs, store: &mut R, section: &Section) -> Result<()> {
    let note = require_note(store, section, &args.note)?;
    store
        .delete_note(note.id())
        .with_context(|| format!("failed to delete note {}", note.id()))?;
    println!("Deleted: {} [{}]", note.title(), note.id().short());
    Ok(())
}

pub fn handle_list<R: NoteRepository>(args: &ListArgs, store: &R, section: &Section) -> Result<()> {
    let mut notes = store
        .list_notes(section)
        .with_context(|| format!("failed to list notes in section {section}"))?;

    // Tags and books compare by key, like the synchronizers do
    for tag in &args.tags {
        let key = label_key(tag);
        notes.retain(|n| n.tags().iter().any(|t| label_key(t) == key));
    }
    if let Some(book) = &args.book {
        let key = label_key(book);
        notes.retain(|n| n.book().is_some_and(|b| label_key(b) == key));
    }

    print!("{}", render_note_list(&notes, args.format)?);
    Ok(())
}

/// Renders a single note.
pub(crate) fn render_note(note: &Note, format: OutputFormat) -> Result<String> {
    let mut out = String::new();
    match format {
        OutputFormat::Human => {
            writeln!(out, "# {}", note.title())?;
            writeln!(out)?;
            writeln!(
                out,
                "ID: {}  Created: {}  Updated: {}",
                note.id().short(),
                note.created().format("%Y-%m-%d"),
                note.updated().format("%Y-%m-%d")
            )?;
            if let Some(book) = note.book() {
                writeln!(out, "Book: {book}")?;
            }
            if !note.tags().is_empty() {
                writeln!(out, "Tags: {}", note.tags().join(", "))?;
            }
            let body = index_text(note.content(), false, None);
            if !body.is_empty() {
                writeln!(out)?;
                writeln!(out, "{body}")?;
            }
        }
        OutputFormat::Json => {
            writeln!(out, "{}", serde_json::to_string_pretty(&Output::new(note))?)?;
        }
    }
    Ok(out)
}

/// Renders a list of notes.
pub(crate) fn render_note_list(notes: &[Note], format: OutputFormat) -> Result<String> {
    let mut out = String::new();
    match format {
        OutputFormat::Human => {
            if notes.is_empty() {
                writeln!(out, "No notes found.")?;
            }
            for note in notes {
                writeln!(out, "{}  {}", note.id().short(), truncate_str(note.title(), 40))?;
                if !note.preview().is_empty() {
                    writeln!(out, "  {}", truncate_str(note.preview(), 76))?;
                }
            }
        }
        OutputFormat::Json => {
            let listings: Vec<NoteListing> = notes.iter().map(NoteListing::from).collect();
            writeln!(out, "{}", serde_json::to_string_pretty(&Output::new(listings))?)?;
        }
    }
    Ok(out)
}
