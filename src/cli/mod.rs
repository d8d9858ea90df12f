//! CLI command definitions and handlers

pub mod config;
pub mod handlers;
pub mod output;

use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

use output::OutputFormat;

/// quill - notes with relaxed search, tags and books
#[derive(Parser, Debug)]
#[command(name = "quill", version, about, long_about = None)]
pub struct Cli {
    /// Database file (overrides config file)
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    /// Section to work in (overrides config file)
    #[arg(short, long, global = true)]
    pub section: Option<String>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create a new note
    Add(AddArgs),

    /// Change a note's title or content
    Edit(EditArgs),

    /// Show a note
    Show(ShowArgs),

    /// Delete a note
    Rm(RmArgs),

    /// Search notes, relaxing the term until something matches
    Search(SearchArgs),

    /// Replace a note's tags
    Tag(TagArgs),

    /// Set or clear a note's book
    Book(BookArgs),

    /// List tags in the section
    Tags(LabelsArgs),

    /// List books in the section
    Books(LabelsArgs),

    /// List notes in the section
    #[command(name = "ls")]
    List(ListArgs),
}

/// Arguments for the `add` command
#[derive(Parser, Debug)]
pub struct AddArgs {
    /// Note title
    pub title: String,

    /// Note content (HTML or plain text)
    #[arg(short, long, default_value = "")]
    pub content: String,

    /// Book to file the note under
    #[arg(short, long)]
    pub book: Option<String>,

    /// Tag for the note (can be specified multiple times)
    #[arg(short, long = "tag", action = ArgAction::Append)]
    pub tags: Vec<String>,

    /// Output format
    #[arg(short = 'f', long, value_enum, default_value_t = OutputFormat::Human)]
    pub format: OutputFormat,
}

/// Arguments for the `edit` command
#[derive(Parser, Debug)]
pub struct EditArgs {
    /// Note ID, ID prefix or title
    pub note: String,

    /// New title
    #[arg(short, long)]
    pub title: Option<String>,

    /// New content
    #[arg(short, long)]
    pub content: Option<String>,
}

/// Arguments for the `show` command
#[derive(Parser, Debug)]
pub struct ShowArgs {
    /// Note ID, ID prefix or title
    pub note: String,

    /// Output format
    #[arg(short = 'f', long, value_enum, default_value_t = OutputFormat::Human)]
    pub format: OutputFormat,
}

/// Arguments for the `rm` command
#[derive(Parser, Debug)]
pub struct RmArgs {
    /// Note ID, ID prefix or title
    pub note: String,
}

/// Arguments for the `search` command
#[derive(Parser, Debug)]
pub struct SearchArgs {
    /// Search term
    pub term: String,

    /// Maximum snippet windows per note (overrides config file)
    #[arg(short, long)]
    pub limit: Option<usize>,

    /// Wrap matches in <em> markup
    #[arg(long)]
    pub highlight: bool,

    /// Leave note previews untouched instead of caching each snippet
    #[arg(long)]
    pub no_save_previews: bool,

    /// Output format
    #[arg(short = 'f', long, value_enum, default_value_t = OutputFormat::Human)]
    pub format: OutputFormat,
}

/// Arguments for the `tag` command
#[derive(Parser, Debug)]
pub struct TagArgs {
    /// Note ID, ID prefix or title
    pub note: String,

    /// Tags the note should have; none clears them
    pub tags: Vec<String>,
}

/// Arguments for the `book` command
#[derive(Parser, Debug)]
pub struct BookArgs {
    /// Note ID, ID prefix or title
    pub note: String,

    /// Book name; omit to clear
    pub book: Option<String>,
}

/// Arguments for the `tags` and `books` commands
#[derive(Parser, Debug)]
pub struct LabelsArgs {
    /// Show note counts
    #[arg(long)]
    pub counts: bool,

    /// Output format
    #[arg(short = 'f', long, value_enum, default_value_t = OutputFormat::Human)]
    pub format: OutputFormat,
}

/// Arguments for the `ls` command
#[derive(Parser, Debug)]
pub struct ListArgs {
    /// Only notes with this tag (can be specified multiple times)
    #[arg(short, long = "tag", action = ArgAction::Append)]
    pub tags: Vec<String>,

    /// Only notes in this book
    #[arg(short, long)]
    pub book: Option<String>,

    /// Output format
    #[arg(short = 'f', long, value_enum, default_value_t = OutputFormat::Human)]
    pub format: OutputFormat,
}
