//! Info command implementation

use super::{load_with_spinner, loader_for, resolve_book};
use anyhow::{Context, Result};
use folio_core::{BookKind, LoadedBook, Paginator, ReaderConfig};
use serde::Serialize;
use std::path::Path;

/// Book info output
#[derive(Serialize)]
struct BookInfo {
    title: String,
    kind: BookKind,
    mime_type: &'static str,
    source: String,
    encoding: Option<String>,
    lines: Option<usize>,
    page_size: Option<usize>,
    pages: Option<usize>,
    bytes: Option<usize>,
}

/// Display information about a book
pub async fn info(
    config: &ReaderConfig,
    input: &str,
    kind: Option<BookKind>,
    catalog: Option<&Path>,
    json: bool,
) -> Result<()> {
    let resolved = resolve_book(config, input, kind, catalog).await?;
    let loader = loader_for(config, resolved.shelf.as_deref())?;
    let book = resolved.book;
    let loaded = load_with_spinner(&loader, &book)
        .await
        .with_context(|| format!("Failed to load {}", book.source))?;

    let info = match &loaded {
        LoadedBook::Text { document, encoding } => {
            let pager = Paginator::new(document.line_count(), config.page_size);
            BookInfo {
                title: document.title.clone(),
                kind: BookKind::PlainText,
                mime_type: BookKind::PlainText.mime_type(),
                source: book.source.to_string(),
                encoding: Some(encoding.to_string()),
                lines: Some(document.line_count()),
                page_size: Some(config.page_size.get()),
                pages: Some(pager.total_pages()),
                bytes: None,
            }
        }
        LoadedBook::Epub { document, bytes } => BookInfo {
            title: document.title.clone(),
            kind: BookKind::Epub,
            mime_type: BookKind::Epub.mime_type(),
            source: book.source.to_string(),
            encoding: None,
            lines: None,
            page_size: None,
            pages: None,
            bytes: Some(bytes.len()),
        },
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&info)?);
    } else {
        println!("Title:       {}", info.title);
        println!("Kind:        {} ({})", info.kind, info.mime_type);
        println!("Source:      {}", info.source);
        if let Some(encoding) = &info.encoding {
            println!("Encoding:    {}", encoding);
        }
        if let (Some(lines), Some(page_size), Some(pages)) =
            (info.lines, info.page_size, info.pages)
        {
            println!("Lines:       {}", lines);
            println!("Page size:   {}", page_size);
            println!("Pages:       {}", pages);
        }
        if let Some(bytes) = info.bytes {
            println!("Size:        {} bytes", bytes);
            println!("Rendering:   delegated to EPUB renderer");
        }
    }

    Ok(())
}
