//! Terminal EPUB renderer backed by the `epub` crate
//!
//! Each spine item is shown as one screen of text. The reader core never
//! looks inside the EPUB; this module is the external renderer it delegates to.

use folio_core::error::RenderError;
use folio_core::render::{EpubRenderer, RenderOptions, Rendition};
use scraper::{Html, Selector};
use std::io::{Cursor, Write};

const DEFAULT_COLUMNS: usize = 72;

/// A spine item converted to text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub lines: Vec<String>,
}

/// Renders EPUBs to standard output
pub struct TerminalRenderer;

impl EpubRenderer for TerminalRenderer {
    fn render(
        &self,
        bytes: &[u8],
        options: &RenderOptions,
    ) -> Result<Box<dyn Rendition>, RenderError> {
        let (title, sections) = read_sections(bytes)?;
        Ok(Box::new(TerminalRendition::new(
            title,
            sections,
            options,
            std::io::stdout(),
        )))
    }
}

/// Open an EPUB and convert its spine to text sections
pub fn read_sections(bytes: &[u8]) -> Result<(String, Vec<Section>), RenderError> {
    let mut doc = epub::doc::EpubDoc::from_reader(Cursor::new(bytes.to_vec()))
        .map_err(|e| RenderError::InvalidBook(e.to_string()))?;

    let title = doc
        .mdata("title")
        .map(|item| item.value.clone())
        .unwrap_or_else(|| "Untitled".to_string());

    let spine: Vec<String> = doc.spine.iter().map(|item| item.idref.clone()).collect();
    let mut sections = Vec::new();
    for id in spine {
        match doc.get_resource_str(&id) {
            Some((content, _mime)) => sections.push(Section {
                lines: html_to_lines(&content),
            }),
            None => tracing::warn!("Skipping missing spine item '{}'", id),
        }
    }

    if sections.is_empty() {
        return Err(RenderError::InvalidBook("EPUB has no readable spine items".into()));
    }
    Ok((title, sections))
}

/// Extract readable lines from an XHTML chapter
pub fn html_to_lines(html: &str) -> Vec<String> {
    let document = Html::parse_document(html);
    let Ok(blocks) = Selector::parse("h1, h2, h3, h4, h5, h6, p, li, pre") else {
        return Vec::new();
    };

    let lines: Vec<String> = document
        .select(&blocks)
        .map(|el| collapse_whitespace(&el.text().collect::<String>()))
        .filter(|line| !line.is_empty())
        .collect();

    if !lines.is_empty() {
        return lines;
    }

    // No block markup: fall back to all body text
    let Ok(body) = Selector::parse("body") else {
        return Vec::new();
    };
    document
        .select(&body)
        .map(|el| collapse_whitespace(&el.text().collect::<String>()))
        .filter(|line| !line.is_empty())
        .collect()
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Rendition that writes one section at a time
pub struct TerminalRendition<W: Write> {
    title: String,
    sections: Vec<Section>,
    index: usize,
    /// Sections shown per screen
    step: usize,
    columns: usize,
    out: W,
}

impl<W: Write> TerminalRendition<W> {
    pub fn new(title: String, sections: Vec<Section>, options: &RenderOptions, out: W) -> Self {
        // Percentages mean "whole terminal"; plain numbers are columns
        let columns = options
            .width
            .trim()
            .parse::<usize>()
            .ok()
            .filter(|c| *c > 0)
            .unwrap_or(DEFAULT_COLUMNS);
        Self {
            title,
            sections,
            index: 0,
            step: options.spread.locations(),
            columns,
            out,
        }
    }

    /// Start on the section at `index`, clamped to the last section
    pub fn starting_at(mut self, index: usize) -> Self {
        self.index = index.min(self.sections.len().saturating_sub(1));
        self
    }

    /// Zero-based index of the section on screen
    pub fn position(&self) -> usize {
        self.index
    }

    pub fn into_output(self) -> W {
        self.out
    }

    fn write_current(&mut self) -> std::io::Result<()> {
        let total = self.sections.len();
        let end = (self.index + self.step).min(total);
        let rule = "-".repeat(self.columns);

        writeln!(self.out, "{}", rule)?;
        if end > self.index + 1 {
            writeln!(
                self.out,
                "{} (sections {}-{} of {})",
                self.title,
                self.index + 1,
                end,
                total
            )?;
        } else {
            writeln!(self.out, "{} (section {} of {})", self.title, self.index + 1, total)?;
        }
        writeln!(self.out, "{}", rule)?;

        for (i, section) in self.sections[self.index.min(end)..end].iter().enumerate() {
            if i > 0 {
                writeln!(self.out)?;
            }
            for line in &section.lines {
                writeln!(self.out, "{}", line)?;
            }
        }
        self.out.flush()
    }
}

impl<W: Write> Rendition for TerminalRendition<W> {
    fn display(&mut self) -> Result<(), RenderError> {
        self.write_current()
            .map_err(|e| RenderError::Navigation(e.to_string()))
    }

    fn next(&mut self) -> Result<(), RenderError> {
        if self.index + self.step < self.sections.len() {
            self.index += self.step;
            self.display()?;
        }
        Ok(())
    }

    fn prev(&mut self) -> Result<(), RenderError> {
        if self.index > 0 {
            self.index = self.index.saturating_sub(self.step);
            self.display()?;
        }
        Ok(())
    }
}
