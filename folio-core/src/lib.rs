//! Folio Core Library
//!
//! This crate provides the document model, content loading and page navigation
//! for the Folio e-book reader. Plain-text books are decoded into lines and
//! paginated here; EPUB books are passed through to an external renderer.

pub mod config;
pub mod decoder;
pub mod error;
pub mod library;
pub mod loader;
pub mod paginator;
pub mod render;
pub mod session;
pub mod source;
pub mod types;

pub use config::ReaderConfig;
pub use error::{
    DecodeError, FolioError, InvalidNavigationInput, LoadError, RenderError, Result,
};
pub use library::{Library, LibraryEntry};
pub use loader::{LoadedBook, Loader};
pub use paginator::{PageStatus, Paginator, DEFAULT_PAGE_SIZE};
pub use session::{Completion, LoadTicket, ReadingSession, SessionState};
pub use types::{BookKind, BookRef, BookSource, Document, DocumentOrigin};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_defaults_to_reader_page_size() {
        let session = ReadingSession::default();
        assert_eq!(session.page_size(), ReaderConfig::default().page_size);
        assert_eq!(session.page_size().get(), 180);
    }
}
