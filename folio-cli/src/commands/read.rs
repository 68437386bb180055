//! Interactive reader

use super::{load_with_spinner, loader_for, resolve_book, status_line};
use crate::renderer::TerminalRenderer;
use anyhow::{bail, Context, Result};
use folio_core::render::{dispatch_key, EpubRenderer, NavKey, Rendition};
use folio_core::{BookKind, Completion, ReaderConfig, ReadingSession, SessionState};
use std::io::{BufRead, Write};
use std::path::Path;

const TEXT_HELP: &str = "n/Enter: next  p: previous  <number>: go to page  q: quit";
const EPUB_HELP: &str = "n/Enter/space: next  p: previous  q: quit";

/// A line of reader input
#[derive(Debug, Clone, PartialEq, Eq)]
enum Input {
    Next,
    Previous,
    Page(String),
    Quit,
    Help,
    Unknown(String),
}

fn parse_input(line: &str) -> Input {
    let trimmed = line.trim_end_matches(['\r', '\n']);
    match trimmed.trim() {
        "" | "n" | "next" | "right" => Input::Next,
        "p" | "prev" | "previous" | "left" => Input::Previous,
        "q" | "quit" | "exit" => Input::Quit,
        "h" | "help" | "?" => Input::Help,
        other if other.starts_with(|c: char| c.is_ascii_digit()) => Input::Page(other.to_string()),
        other => Input::Unknown(other.to_string()),
    }
}

/// Read a book interactively from standard input
pub async fn read(
    config: &ReaderConfig,
    input: &str,
    kind: Option<BookKind>,
    catalog: Option<&Path>,
) -> Result<()> {
    let resolved = resolve_book(config, input, kind, catalog).await?;
    let loader = loader_for(config, resolved.shelf.as_deref())?;
    let book = resolved.book;
    let mut session = ReadingSession::new(config.page_size);

    let ticket = session.begin_load(&book);
    let result = load_with_spinner(&loader, &book).await;

    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    match session.complete_load(ticket, result) {
        Completion::Ready => run_text(&mut session, stdin.lock(), stdout.lock()),
        Completion::Delegated { bytes } => {
            let mut rendition = TerminalRenderer
                .render(&bytes, &config.render)
                .context("EPUB renderer could not open the book")?;
            run_epub(rendition.as_mut(), stdin.lock(), &mut stdout.lock())
        }
        Completion::Failed => match session.state() {
            SessionState::Failed { message } => {
                bail!("Failed to load {}: {}", book.source, message)
            }
            _ => bail!("Failed to load {}", book.source),
        },
        Completion::Stale => bail!("Load of {} was superseded", book.source),
    }
}

/// Paginated reading loop for plain text
fn run_text(session: &mut ReadingSession, input: impl BufRead, mut out: impl Write) -> Result<()> {
    show_page(session, &mut out)?;

    for line in input.lines() {
        let changed = match parse_input(&line?) {
            Input::Next => session.next(),
            Input::Previous => session.previous(),
            Input::Page(number) => session.submit_page_input(&number).is_ok(),
            Input::Quit => break,
            Input::Help => {
                writeln!(out, "{}", TEXT_HELP)?;
                false
            }
            Input::Unknown(command) => {
                writeln!(out, "Unknown command '{}' ({})", command, TEXT_HELP)?;
                false
            }
        };
        if changed {
            show_page(session, &mut out)?;
        }
    }

    Ok(())
}

fn show_page(session: &ReadingSession, out: &mut impl Write) -> Result<()> {
    for line in session.current_window() {
        writeln!(out, "{}", line)?;
    }
    if let Some(status) = session.status() {
        writeln!(out, "{}", status_line(&status))?;
    }
    out.flush()?;
    Ok(())
}

/// Reading loop for an EPUB; navigation belongs to the rendition
fn run_epub(
    rendition: &mut dyn Rendition,
    input: impl BufRead,
    out: &mut impl Write,
) -> Result<()> {
    rendition.display()?;

    for line in input.lines() {
        let line = line?;
        let key = match parse_input(&line) {
            Input::Quit => break,
            Input::Previous => NavKey::ArrowLeft,
            Input::Next if line.starts_with(' ') => NavKey::Space,
            Input::Next => NavKey::ArrowRight,
            Input::Help | Input::Page(_) | Input::Unknown(_) => {
                writeln!(out, "{}", EPUB_HELP)?;
                out.flush()?;
                continue;
            }
        };
        dispatch_key(rendition, key)?;
    }

    Ok(())
}
