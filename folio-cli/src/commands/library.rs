//! Library command implementation

use super::shelf_loader;
use anyhow::{Context, Result};
use folio_core::{BookKind, Library, LibraryEntry, LoadedBook, Loader, Paginator, ReaderConfig};
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use serde::Serialize;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};

/// One row of the library listing
#[derive(Debug, Serialize)]
struct ShelfRow {
    title: String,
    path: String,
    kind: BookKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pages: Option<usize>,
}

/// List the books in a catalog, a scanned directory, or the sample shelf
pub async fn library(
    config: &ReaderConfig,
    catalog: Option<&Path>,
    dir: Option<&Path>,
    pages: bool,
    json: bool,
    jobs: usize,
) -> Result<()> {
    let (library, root) = match (catalog, dir) {
        (Some(path), _) => {
            let library = Library::load(path)
                .await
                .with_context(|| format!("Failed to read catalog: {}", path.display()))?;
            let root = path
                .parent()
                .map(Path::to_path_buf)
                .unwrap_or_else(|| config.library_root.clone());
            (library, root)
        }
        (None, Some(dir)) => {
            let library = Library::scan(dir)
                .await
                .with_context(|| format!("Failed to scan {}", dir.display()))?;
            (library, dir.to_path_buf())
        }
        (None, None) => (Library::sample(), config.library_root.clone()),
    };

    if library.is_empty() {
        println!("No books found");
        return Ok(());
    }

    let counts = if pages {
        let loader = shelf_loader(config, root)?;
        Some(count_pages(&loader, config, &library.entries, jobs))
    } else {
        None
    };

    let rows: Vec<ShelfRow> = library
        .entries
        .iter()
        .enumerate()
        .map(|(i, entry)| ShelfRow {
            title: entry.title.clone(),
            path: entry.path.clone(),
            kind: entry.kind,
            pages: counts.as_ref().and_then(|c| c[i]),
        })
        .collect();

    if json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    let title_width = rows.iter().map(|r| r.title.chars().count()).max().unwrap_or(0).max(5);
    for row in &rows {
        let pages = match (pages, row.pages) {
            (false, _) => String::new(),
            (true, Some(n)) => format!("  {:>5}", n),
            (true, None) => format!("  {:>5}", "-"),
        };
        println!(
            "{:<width$}  {:<10}{}  {}",
            row.title,
            row.kind.to_string(),
            pages,
            row.path,
            width = title_width
        );
    }

    Ok(())
}

/// Load every plain-text entry in parallel and count its pages
///
/// EPUB entries and failed loads have no page count.
fn count_pages(
    loader: &Loader,
    config: &ReaderConfig,
    entries: &[LibraryEntry],
    jobs: usize,
) -> Vec<Option<usize>> {
    let pb = ProgressBar::new(entries.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos:>7}/{len:7} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("##-"),
    );

    rayon::ThreadPoolBuilder::new()
        .num_threads(jobs)
        .build_global()
        .ok(); // Ignore if already configured

    let handle = tokio::runtime::Handle::current();
    let failures = AtomicUsize::new(0);

    let counts = tokio::task::block_in_place(|| {
        entries
            .par_iter()
            .map(|entry| {
                let count = match entry.kind {
                    BookKind::Epub => None,
                    BookKind::PlainText => match handle.block_on(loader.load(&entry.book_ref())) {
                        Ok(LoadedBook::Text { document, .. }) => Some(
                            Paginator::new(document.line_count(), config.page_size).total_pages(),
                        ),
                        Ok(LoadedBook::Epub { .. }) => None,
                        Err(e) => {
                            failures.fetch_add(1, Ordering::Relaxed);
                            tracing::error!("Failed to load {:?}: {}", entry.path, e);
                            None
                        }
                    },
                };
                pb.inc(1);
                count
            })
            .collect::<Vec<_>>()
    });

    pb.finish_and_clear();

    let failures = failures.load(Ordering::Relaxed);
    if failures > 0 {
        tracing::warn!("{} of {} books could not be loaded", failures, entries.len());
    }

    counts
}
