//! The decoded document a reading session works on

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Where the content of a document lives
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DocumentOrigin {
    /// Lines were decoded here and are paginated by the reader
    PlainText,

    /// Rendering is owned by an external EPUB renderer; no lines are held
    EpubDelegated,
}

/// A loaded book
/// Created once per selection and discarded when another book is selected
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Document {
    /// Unique identifier for this load
    pub id: Uuid,

    /// Display title
    pub title: String,

    /// How the content is rendered
    pub origin: DocumentOrigin,

    /// Decoded lines, in source order
    pub lines: Vec<String>,
}

impl Document {
    /// Create a plain-text document from decoded lines
    pub fn plain_text(title: impl Into<String>, lines: Vec<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            origin: DocumentOrigin::PlainText,
            lines,
        }
    }

    /// Create a marker document for an EPUB handed to a renderer
    pub fn epub_delegated(title: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            origin: DocumentOrigin::EpubDelegated,
            lines: Vec::new(),
        }
    }

    /// Number of lines held by this document
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    pub fn is_delegated(&self) -> bool {
        self.origin == DocumentOrigin::EpubDelegated
    }
}
