//! Error types for Folio Core

use thiserror::Error;

/// Result type alias using FolioError
pub type Result<T> = std::result::Result<T, FolioError>;

/// Top-level error type for a book load attempt
#[derive(Debug, Error)]
pub enum FolioError {
    #[error("Load error: {0}")]
    Load(#[from] LoadError),

    #[error("Decode error: {0}")]
    Decode(#[from] DecodeError),

    #[error("Render error: {0}")]
    Render(#[from] RenderError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised while obtaining the raw bytes of a book
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Fetch failed: {0}")]
    Fetch(String),

    #[error("Request to {url} failed with status {status}")]
    Status { url: String, status: u16 },

    #[error("Path traversal attempt detected: {0}")]
    PathTraversal(String),

    #[error("Unsupported book kind: {0}")]
    UnsupportedKind(String),

    #[error("Invalid library catalog: {0}")]
    Catalog(String),
}

/// Errors raised while turning bytes into text lines
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("Text is neither valid UTF-8 nor valid {fallback}")]
    Undecodable { fallback: &'static str },

    #[error("Unknown text encoding: {0}")]
    UnknownEncoding(String),
}

/// A page jump request that was rejected; state is left untouched
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidNavigationInput {
    #[error("'{0}' is not a page number")]
    NotANumber(String),

    #[error("Page {requested} is outside 1..={total}")]
    OutOfRange { requested: usize, total: usize },
}

/// Errors reported by an external EPUB renderer
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Invalid EPUB: {0}")]
    InvalidBook(String),

    #[error("Navigation failed: {0}")]
    Navigation(String),

    #[error("Invalid render option: {0}")]
    InvalidOption(String),
}
