//! The closed set of book kinds the reader understands

use crate::error::LoadError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// Kind of a book, resolved once when the book is selected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BookKind {
    /// Paginated line by line in the reader
    #[serde(alias = "txt", alias = "text")]
    PlainText,

    /// Handed to an external renderer
    Epub,
}

impl BookKind {
    /// Resolve a kind from a file extension
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "txt" | "text" => Some(Self::PlainText),
            "epub" => Some(Self::Epub),
            _ => None,
        }
    }

    /// Resolve a kind from a declared MIME type
    pub fn from_mime_type(mime: &str) -> Option<Self> {
        // Parameters such as "; charset=utf-8" do not affect the kind
        let essence = mime.split(';').next().unwrap_or("").trim();
        match essence.to_lowercase().as_str() {
            "text/plain" => Some(Self::PlainText),
            "application/epub+zip" => Some(Self::Epub),
            _ => None,
        }
    }

    /// Infer the kind from the extension of a path or URL
    pub fn infer(location: &str) -> Result<Self, LoadError> {
        // Ignore any query string or fragment on URLs
        let trimmed = location.split(['?', '#']).next().unwrap_or(location);
        Path::new(trimmed)
            .extension()
            .and_then(|e| e.to_str())
            .and_then(Self::from_extension)
            .ok_or_else(|| LoadError::UnsupportedKind(location.to_string()))
    }

    /// MIME type for this kind
    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::PlainText => "text/plain",
            Self::Epub => "application/epub+zip",
        }
    }
}

impl fmt::Display for BookKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PlainText => f.write_str("plain-text"),
            Self::Epub => f.write_str("epub"),
        }
    }
}

impl std::str::FromStr for BookKind {
    type Err = LoadError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "plain-text" | "plain" | "txt" | "text" => Ok(Self::PlainText),
            "epub" => Ok(Self::Epub),
            other => Self::from_mime_type(other)
                .ok_or_else(|| LoadError::UnsupportedKind(s.to_string())),
        }
    }
}
