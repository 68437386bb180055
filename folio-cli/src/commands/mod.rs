//! CLI command implementations

mod info;
mod library;
mod page;
mod read;

pub use info::info;
pub use library::library;
pub use page::page;
pub use read::read;

use anyhow::{Context, Result};
use folio_core::source::{HttpSource, LocalSource};
use folio_core::{BookKind, BookRef, BookSource, Library, LoadedBook, Loader, ReaderConfig};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

/// A book named on the command line, with the directory a catalog confines it to
#[derive(Debug)]
pub(crate) struct ResolvedBook {
    pub book: BookRef,

    /// Catalog directory; catalog entries may not be read from outside it
    pub shelf: Option<PathBuf>,
}

/// Resolve the book named on the command line
///
/// With a catalog, `book` is looked up by title or path and the entry's
/// path stays relative to the catalog's directory. Otherwise it is a URL or
/// a path under the library root (or under the base URL when one is
/// configured).
pub(crate) async fn resolve_book(
    config: &ReaderConfig,
    book: &str,
    kind: Option<BookKind>,
    catalog: Option<&Path>,
) -> Result<ResolvedBook> {
    let (location, catalog_kind, shelf) = match catalog {
        Some(path) => {
            let library = Library::load(path)
                .await
                .with_context(|| format!("Failed to read catalog: {}", path.display()))?;
            let entry = library
                .find(book)
                .with_context(|| format!("No book '{}' in {}", book, path.display()))?;
            let shelf = path
                .parent()
                .map(Path::to_path_buf)
                .unwrap_or_else(|| config.library_root.clone());
            (entry.path.clone(), Some(entry.kind), Some(shelf))
        }
        None => (book.to_string(), None, None),
    };

    let kind = match kind.or(catalog_kind) {
        Some(kind) => kind,
        None => BookKind::infer(&location)
            .with_context(|| format!("Could not determine the kind of {}", location))?,
    };

    let source = match BookSource::from_location(&location) {
        BookSource::Path(path) if shelf.is_none() && config.base_url.is_none() => {
            BookSource::Path(config.library_root.join(path))
        }
        other => other,
    };

    Ok(ResolvedBook {
        book: BookRef::new(source, kind),
        shelf,
    })
}

/// Loader for a resolved book
///
/// Catalog entries are read through a loader confined to the catalog's
/// directory. Paths typed by the user are read as given.
pub(crate) fn loader_for(config: &ReaderConfig, shelf: Option<&Path>) -> Result<Loader> {
    if let Some(dir) = shelf {
        return shelf_loader(config, dir.to_path_buf());
    }
    let loader = match config.base_url {
        Some(_) => Loader::from_config(config)?,
        None => Loader::new(
            Arc::new(LocalSource::unrestricted()),
            Arc::new(HttpSource::new()),
        )
        .with_decoder(config.text_decoder()?),
    };
    Ok(loader)
}

/// Loader confined to a library directory
pub(crate) fn shelf_loader(config: &ReaderConfig, root: PathBuf) -> Result<Loader> {
    if config.base_url.is_some() {
        return Ok(Loader::from_config(config)?);
    }
    Ok(Loader::new(Arc::new(LocalSource::new(root)), Arc::new(HttpSource::new()))
        .with_decoder(config.text_decoder()?))
}

/// Load a book behind a spinner
pub(crate) async fn load_with_spinner(
    loader: &Loader,
    book: &BookRef,
) -> folio_core::Result<LoadedBook> {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.enable_steady_tick(Duration::from_millis(100));
    pb.set_message(format!("Loading {}...", book.source));

    let result = loader.load(book).await;
    pb.finish_and_clear();
    result
}

/// One-line navigation status, e.g. `Page 2 of 5 [####------] 40%`
pub(crate) fn status_line(status: &folio_core::PageStatus) -> String {
    const WIDTH: usize = 20;
    let filled = (status.progress * WIDTH as f64).round() as usize;
    let filled = filled.min(WIDTH);
    format!(
        "{} Page {} of {} [{}{}] {:.0}% {}",
        if status.has_previous { "<" } else { " " },
        status.page,
        status.total_pages,
        "#".repeat(filled),
        "-".repeat(WIDTH - filled),
        status.progress * 100.0,
        if status.has_next { ">" } else { " " },
    )
}
