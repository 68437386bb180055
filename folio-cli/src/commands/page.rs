//! Page command implementation

use super::{load_with_spinner, loader_for, resolve_book, status_line};
use crate::renderer::{read_sections, TerminalRendition};
use anyhow::{bail, Context, Result};
use folio_core::render::Rendition;
use folio_core::{BookKind, Completion, ReaderConfig, ReadingSession};
use std::path::Path;

/// Print one page of a book
pub async fn page(
    config: &ReaderConfig,
    input: &str,
    kind: Option<BookKind>,
    catalog: Option<&Path>,
    page: &str,
) -> Result<()> {
    let resolved = resolve_book(config, input, kind, catalog).await?;
    let loader = loader_for(config, resolved.shelf.as_deref())?;
    let book = resolved.book;
    let loaded = load_with_spinner(&loader, &book)
        .await
        .with_context(|| format!("Failed to load {}", book.source))?;

    let mut session = ReadingSession::new(config.page_size);
    let ticket = session.begin_load(&book);

    match session.complete_load(ticket, Ok(loaded)) {
        Completion::Ready => {
            if let Err(e) = session.submit_page_input(page) {
                bail!("Cannot show page: {}", e);
            }
            for line in session.current_window() {
                println!("{}", line);
            }
            if let Some(status) = session.status() {
                println!("{}", status_line(&status));
            }
            Ok(())
        }
        Completion::Delegated { bytes } => {
            // Renderer locations stand in for pages
            let requested: usize = page
                .trim()
                .parse()
                .ok()
                .filter(|n| *n >= 1)
                .with_context(|| format!("'{}' is not a page number", page))?;

            let (title, sections) =
                read_sections(&bytes).context("EPUB renderer could not open the book")?;
            if requested > sections.len() {
                bail!(
                    "Cannot show page: section {} is outside 1..={}",
                    requested,
                    sections.len()
                );
            }

            let mut rendition =
                TerminalRendition::new(title, sections, &config.render, std::io::stdout())
                    .starting_at(requested - 1);
            rendition.display()?;
            Ok(())
        }
        Completion::Failed | Completion::Stale => bail!("Failed to open {}", book.source),
    }
}
