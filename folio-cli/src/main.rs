//! Folio CLI - terminal e-book reader

mod commands;
mod renderer;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use folio_core::render::Spread;
use folio_core::{BookKind, ReaderConfig};
use std::num::NonZeroUsize;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Parse and validate jobs argument (must be at least 1)
fn parse_jobs(s: &str) -> Result<usize, String> {
    let n: usize = s.parse().map_err(|_| format!("'{}' is not a valid number", s))?;
    if n < 1 {
        Err("jobs must be at least 1".to_string())
    } else {
        Ok(n)
    }
}

/// Parse a book kind name or MIME type
fn parse_kind(s: &str) -> Result<BookKind, String> {
    s.parse().map_err(|e: folio_core::LoadError| e.to_string())
}

/// Parse an EPUB spread mode
fn parse_spread(s: &str) -> Result<Spread, String> {
    s.parse().map_err(|e: folio_core::RenderError| e.to_string())
}

#[derive(Parser)]
#[command(name = "folio")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(flatten)]
    settings: Settings,

    #[command(subcommand)]
    command: Commands,
}

/// Overrides for the reader configuration
#[derive(Args)]
struct Settings {
    /// Lines per page for plain-text books
    #[arg(long, global = true)]
    page_size: Option<NonZeroUsize>,

    /// Directory relative book paths are resolved against
    #[arg(long, global = true)]
    root: Option<PathBuf>,

    /// Fetch relative book paths from this URL instead of disk
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Encoding tried when a text file is not valid UTF-8
    #[arg(long, global = true)]
    encoding: Option<String>,

    /// EPUB layout: "none" shows one section, "auto" two side by side
    #[arg(long, global = true, value_parser = parse_spread)]
    spread: Option<Spread>,
}

impl Settings {
    /// Environment configuration with command-line overrides applied
    fn into_config(self) -> Result<ReaderConfig> {
        let mut config = ReaderConfig::from_env();
        if let Some(page_size) = self.page_size {
            config.page_size = page_size;
        }
        if let Some(root) = self.root {
            config.library_root = root;
        }
        if let Some(base_url) = self.base_url {
            config.base_url = Some(base_url);
        }
        if let Some(encoding) = self.encoding {
            config.fallback_encoding = encoding;
        }
        if let Some(spread) = self.spread {
            config.render.spread = spread;
        }
        config.validate().context("Invalid reader configuration")?;
        Ok(config)
    }
}

/// Book selection shared by the reading commands
#[derive(Args)]
struct BookArgs {
    /// Book path, URL, or title/path in the catalog
    book: String,

    /// Book kind (plain-text, epub); inferred from the extension by default
    #[arg(short, long, value_parser = parse_kind)]
    kind: Option<BookKind>,

    /// Library catalog (JSON) to look the book up in
    #[arg(long)]
    catalog: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Read a book interactively
    Read {
        #[command(flatten)]
        book: BookArgs,
    },

    /// Print a single page of a book
    Page {
        #[command(flatten)]
        book: BookArgs,

        /// Page number to print (1-based)
        #[arg(short, long, default_value = "1")]
        page: String,
    },

    /// Display information about a book
    Info {
        #[command(flatten)]
        book: BookArgs,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// List the books in a library
    Library {
        /// Library catalog (JSON)
        #[arg(long, conflicts_with = "dir")]
        catalog: Option<PathBuf>,

        /// Directory to scan for books
        #[arg(long)]
        dir: Option<PathBuf>,

        /// Load plain-text books and count their pages
        #[arg(long)]
        pages: bool,

        /// Output as JSON
        #[arg(long)]
        json: bool,

        /// Number of parallel jobs (must be at least 1)
        #[arg(short, long, default_value = "4", value_parser = parse_jobs)]
        jobs: usize,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing; stdout is reserved for book content
    let filter = if cli.verbose {
        "folio_cli=debug,folio_core=debug"
    } else {
        "folio_cli=info,folio_core=warn"
    };

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(filter))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = cli.settings.into_config()?;

    match cli.command {
        Commands::Read { book } => {
            commands::read(&config, &book.book, book.kind, book.catalog.as_deref()).await
        }

        Commands::Page { book, page } => {
            commands::page(&config, &book.book, book.kind, book.catalog.as_deref(), &page).await
        }

        Commands::Info { book, json } => {
            commands::info(&config, &book.book, book.kind, book.catalog.as_deref(), json).await
        }

        Commands::Library {
            catalog,
            dir,
            pages,
            json,
            jobs,
        } => {
            commands::library(&config, catalog.as_deref(), dir.as_deref(), pages, json, jobs)
                .await
        }
    }
}
