//! Content loader: book reference in, document out

use crate::config::ReaderConfig;
use crate::decoder::TextDecoder;
use crate::error::{DecodeError, LoadError, Result};
use crate::source::{ContentSource, HttpSource, LocalSource};
use crate::types::{BookKind, BookRef, BookSource, Document};
use std::sync::Arc;

/// Result of a successful load
#[derive(Debug, Clone, PartialEq)]
pub enum LoadedBook {
    /// Decoded plain text, ready to paginate
    Text {
        document: Document,
        /// Encoding that decoded the text
        encoding: &'static str,
    },

    /// EPUB bytes to hand to a renderer, untouched
    Epub { document: Document, bytes: Vec<u8> },
}

impl LoadedBook {
    pub fn document(&self) -> &Document {
        match self {
            Self::Text { document, .. } | Self::Epub { document, .. } => document,
        }
    }

    pub fn kind(&self) -> BookKind {
        match self {
            Self::Text { .. } => BookKind::PlainText,
            Self::Epub { .. } => BookKind::Epub,
        }
    }
}

/// Loads books from memory, disk or HTTP
#[derive(Clone)]
pub struct Loader {
    /// Backend for `BookSource::Path`
    paths: Arc<dyn ContentSource>,
    /// Backend for `BookSource::Url`
    urls: Arc<dyn ContentSource>,
    decoder: TextDecoder,
}

impl Loader {
    /// Create a loader from explicit backends
    pub fn new(paths: Arc<dyn ContentSource>, urls: Arc<dyn ContentSource>) -> Self {
        Self {
            paths,
            urls,
            decoder: TextDecoder::new(),
        }
    }

    /// Loader reading relative paths from `root` on disk
    pub fn local(root: impl Into<std::path::PathBuf>) -> Self {
        Self::new(Arc::new(LocalSource::new(root)), Arc::new(HttpSource::new()))
    }

    /// Build the loader described by a configuration
    ///
    /// With a `base_url`, book paths are fetched from the web host; otherwise
    /// they are read under `library_root`.
    pub fn from_config(config: &ReaderConfig) -> std::result::Result<Self, DecodeError> {
        let paths: Arc<dyn ContentSource> = match &config.base_url {
            Some(base) => Arc::new(HttpSource::with_base_url(base.clone())),
            None => Arc::new(LocalSource::new(config.library_root.clone())),
        };
        Ok(Self::new(paths, Arc::new(HttpSource::new())).with_decoder(config.text_decoder()?))
    }

    /// Replace the text decoder
    pub fn with_decoder(mut self, decoder: TextDecoder) -> Self {
        self.decoder = decoder;
        self
    }

    /// Read the raw bytes of a book
    pub async fn fetch(&self, source: &BookSource) -> std::result::Result<Vec<u8>, LoadError> {
        match source {
            BookSource::Memory { bytes, .. } => Ok(bytes.clone()),
            BookSource::Path(path) => self.paths.read(&path.to_string_lossy()).await,
            BookSource::Url(url) => self.urls.read(url).await,
        }
    }

    /// Name of the backend that serves `source`
    pub fn backend(&self, source: &BookSource) -> &'static str {
        match source {
            BookSource::Memory { .. } => "memory",
            BookSource::Path(_) => self.paths.name(),
            BookSource::Url(_) => self.urls.name(),
        }
    }

    /// Turn fetched bytes into a loaded book
    pub fn decode(&self, book: &BookRef, bytes: Vec<u8>) -> Result<LoadedBook> {
        let title = book.title();
        match book.kind {
            BookKind::PlainText => {
                let decoded = self.decoder.decode(&bytes)?;
                tracing::debug!(
                    %title,
                    encoding = decoded.encoding,
                    lines = decoded.lines.len(),
                    "Decoded plain text"
                );
                Ok(LoadedBook::Text {
                    document: Document::plain_text(title, decoded.lines),
                    encoding: decoded.encoding,
                })
            }
            BookKind::Epub => Ok(LoadedBook::Epub {
                document: Document::epub_delegated(title),
                bytes,
            }),
        }
    }

    /// Load a book
    /// Failures are logged here and returned; they never panic
    pub async fn load(&self, book: &BookRef) -> Result<LoadedBook> {
        let result = match self.fetch(&book.source).await {
            Ok(bytes) => self.decode(book, bytes),
            Err(e) => Err(e.into()),
        };

        let backend = self.backend(&book.source);
        match &result {
            Ok(loaded) => tracing::info!(
                backend,
                "Loaded {} book '{}' from {}",
                loaded.kind(),
                loaded.document().title,
                book.source
            ),
            Err(e) => tracing::error!(backend, "Failed to load {}: {}", book.source, e),
        }
        result
    }
}
