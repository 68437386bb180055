//! References to a selected book, before it is loaded

use super::BookKind;
use crate::error::LoadError;
use std::fmt;
use std::path::{Path, PathBuf};

/// Where the bytes of a book come from
#[derive(Clone, PartialEq, Eq)]
pub enum BookSource {
    /// An uploaded or dropped file, already in memory
    Memory { name: String, bytes: Vec<u8> },

    /// A file relative to the library root
    Path(PathBuf),

    /// A book fetched with a single GET request
    Url(String),
}

impl BookSource {
    /// Build a source from a user supplied location
    /// `http://` and `https://` locations become URLs, everything else a path
    pub fn from_location(location: &str) -> Self {
        if is_url(location) {
            Self::Url(location.to_string())
        } else {
            Self::Path(PathBuf::from(location))
        }
    }

    /// Human readable name, used as the default document title
    pub fn name(&self) -> String {
        match self {
            Self::Memory { name, .. } => name.clone(),
            Self::Path(path) => file_stem(path),
            Self::Url(url) => {
                let trimmed = url.split(['?', '#']).next().unwrap_or(url);
                file_stem(Path::new(trimmed.rsplit('/').next().unwrap_or(trimmed)))
            }
        }
    }
}

// Memory handles can be large; keep Debug output to the byte count
impl fmt::Debug for BookSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Memory { name, bytes } => f
                .debug_struct("Memory")
                .field("name", name)
                .field("len", &bytes.len())
                .finish(),
            Self::Path(path) => f.debug_tuple("Path").field(path).finish(),
            Self::Url(url) => f.debug_tuple("Url").field(url).finish(),
        }
    }
}

impl fmt::Display for BookSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Memory { name, .. } => write!(f, "memory:{}", name),
            Self::Path(path) => write!(f, "{}", path.display()),
            Self::Url(url) => f.write_str(url),
        }
    }
}

/// A selected book: its source and its resolved kind
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookRef {
    pub source: BookSource,
    pub kind: BookKind,
}

impl BookRef {
    pub fn new(source: BookSource, kind: BookKind) -> Self {
        Self { source, kind }
    }

    /// Reference a path or URL, inferring the kind from its extension
    pub fn from_location(location: &str) -> Result<Self, LoadError> {
        let kind = BookKind::infer(location)?;
        Ok(Self::new(BookSource::from_location(location), kind))
    }

    /// Reference an in-memory file handle with a declared MIME type
    pub fn from_upload(
        name: impl Into<String>,
        mime: &str,
        bytes: Vec<u8>,
    ) -> Result<Self, LoadError> {
        let kind = BookKind::from_mime_type(mime)
            .ok_or_else(|| LoadError::UnsupportedKind(mime.to_string()))?;
        Ok(Self::new(
            BookSource::Memory {
                name: name.into(),
                bytes,
            },
            kind,
        ))
    }

    /// Title to show for this book until something better is known
    pub fn title(&self) -> String {
        self.source.name()
    }
}

fn is_url(location: &str) -> bool {
    let lower = location.to_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .and_then(|s| s.to_str())
        .map(str::to_string)
        .unwrap_or_else(|| path.display().to_string())
}
