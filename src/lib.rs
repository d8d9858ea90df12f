//! quill - notes with relaxed search, snippets and shared tags/books

pub mod cli;
pub mod domain;
pub mod search;
pub mod store;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use cli::{
    Cli, Command,
    config::Config,
    handlers::{
        handle_add, handle_book, handle_books, handle_edit, handle_list, handle_rm,
        handle_search, handle_show, handle_tag, handle_tags, open_store,
    },
};

/// Main entry point for the CLI application.
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = Config::load()?;
    let section = config.section(cli.section.as_deref())?;
    let mut store = open_store(&config.database_path(cli.db.as_ref()))?;

    match &cli.command {
        Command::Add(args) => handle_add(args, &mut store, &section),
        Command::Edit(args) => handle_edit(args, &mut store, &section),
        Command::Show(args) => handle_show(args, &store, &section),
        Command::Rm(args) => handle_rm(args, &mut store, &section),
        Command::Search(args) => handle_search(args, &mut store, &section, &config),
        Command::Tag(args) => handle_tag(args, &mut store, &section),
        Command::Book(args) => handle_book(args, &mut store, &section),
        Command::Tags(args) => handle_tags(args, &store, &section),
        Command::Books(args) => handle_books(args, &store, &section),
        Command::List(args) => handle_list(args, &store, &section),
    }
}

/// Installs the stderr log subscriber.
///
/// `RUST_LOG` wins when set; otherwise each `-v` raises the level one step
/// from `warn`.
fn init_logging(verbose: u8) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_log_level(verbose)));

    // A second init (e.g. from tests) keeps the first subscriber
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn default_log_level(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbosity_maps_to_levels() {
        assert_eq!(default_log_level(0), "warn");
        assert_eq!(default_log_level(1), "info");
        assert_eq!(default_log_level(2), "debug");
        assert_eq!(default_log_level(3), "trace");
        assert_eq!(default_log_level(9), "trace");
    }
}
