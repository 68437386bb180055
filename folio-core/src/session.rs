//! Reading session: the single owner of the loaded document and its page state

use crate::error::{InvalidNavigationInput, Result};
use crate::loader::{LoadedBook, Loader};
use crate::paginator::{PageStatus, Paginator};
use crate::types::{BookRef, Document};
use std::num::NonZeroUsize;
use std::result::Result as StdResult;

/// Identifies one load request; only the latest ticket may change the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LoadTicket(u64);

/// What the session currently shows
#[derive(Debug, Clone, PartialEq)]
pub enum SessionState {
    /// No book selected
    Idle,

    /// Waiting for a load to finish; the content area is empty
    Loading { ticket: LoadTicket, title: String },

    /// A plain-text book being paginated
    Reading {
        document: Document,
        paginator: Paginator,
    },

    /// An EPUB whose rendering belongs to an external renderer
    Delegated { document: Document },

    /// The latest load failed; nothing is shown
    Failed { message: String },
}

/// Outcome of completing a load
#[derive(Debug, Clone, PartialEq)]
pub enum Completion {
    /// Plain text installed, positioned on the first page
    Ready,

    /// EPUB accepted; hand these bytes to the renderer
    Delegated { bytes: Vec<u8> },

    /// The load failed and the session shows nothing
    Failed,

    /// A newer load superseded this one; the session was not touched
    Stale,
}

/// Reading session for one reader view
#[derive(Debug, Clone)]
pub struct ReadingSession {
    page_size: NonZeroUsize,
    generation: u64,
    state: SessionState,
}

impl ReadingSession {
    pub fn new(page_size: NonZeroUsize) -> Self {
        Self {
            page_size,
            generation: 0,
            state: SessionState::Idle,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn page_size(&self) -> NonZeroUsize {
        self.page_size
    }

    /// Start loading `book`, discarding whatever was shown
    /// Any earlier ticket becomes stale
    pub fn begin_load(&mut self, book: &BookRef) -> LoadTicket {
        self.generation += 1;
        let ticket = LoadTicket(self.generation);
        self.state = SessionState::Loading {
            ticket,
            title: book.title(),
        };
        ticket
    }

    /// Whether `ticket` belongs to the most recent load request
    pub fn is_current(&self, ticket: LoadTicket) -> bool {
        ticket.0 == self.generation
            && matches!(self.state, SessionState::Loading { ticket: t, .. } if t == ticket)
    }

    /// Apply the result of a load started with `begin_load`
    pub fn complete_load(&mut self, ticket: LoadTicket, result: Result<LoadedBook>) -> Completion {
        if !self.is_current(ticket) {
            tracing::debug!(?ticket, "Discarding result of superseded load");
            return Completion::Stale;
        }

        match result {
            Ok(LoadedBook::Text { document, .. }) => {
                let paginator = Paginator::new(document.line_count(), self.page_size);
                tracing::debug!(
                    title = %document.title,
                    total_pages = paginator.total_pages(),
                    "Paginated document"
                );
                self.state = SessionState::Reading {
                    document,
                    paginator,
                };
                Completion::Ready
            }
            Ok(LoadedBook::Epub { document, bytes }) => {
                self.state = SessionState::Delegated { document };
                Completion::Delegated { bytes }
            }
            Err(e) => {
                tracing::warn!("Reader shows no content after failed load: {}", e);
                self.state = SessionState::Failed {
                    message: e.to_string(),
                };
                Completion::Failed
            }
        }
    }

    /// Load `book` with `loader` and apply the result
    pub async fn load(&mut self, loader: &Loader, book: &BookRef) -> Completion {
        let ticket = self.begin_load(book);
        let result = loader.load(book).await;
        self.complete_load(ticket, result)
    }

    /// Leave the reader view; pending loads become stale
    pub fn close(&mut self) {
        self.generation += 1;
        self.state = SessionState::Idle;
    }

    pub fn document(&self) -> Option<&Document> {
        match &self.state {
            SessionState::Reading { document, .. } | SessionState::Delegated { document } => {
                Some(document)
            }
            _ => None,
        }
    }

    /// Page state, present only while paginating plain text
    pub fn paginator(&self) -> Option<&Paginator> {
        match &self.state {
            SessionState::Reading { paginator, .. } => Some(paginator),
            _ => None,
        }
    }

    fn paginator_mut(&mut self) -> Option<&mut Paginator> {
        match &mut self.state {
            SessionState::Reading { paginator, .. } => Some(paginator),
            _ => None,
        }
    }

    /// Next page; ignored without a paginated document
    pub fn next(&mut self) -> bool {
        self.paginator_mut().is_some_and(Paginator::next)
    }

    /// Previous page; ignored without a paginated document
    pub fn previous(&mut self) -> bool {
        self.paginator_mut().is_some_and(Paginator::previous)
    }

    /// Jump to a 1-based page
    pub fn jump_to_page(&mut self, requested: usize) -> StdResult<(), InvalidNavigationInput> {
        match self.paginator_mut() {
            Some(paginator) => paginator.jump_to_page(requested),
            None => Err(InvalidNavigationInput::OutOfRange { requested, total: 0 }),
        }
    }

    /// Jump to a page typed into the page box
    pub fn submit_page_input(&mut self, input: &str) -> StdResult<(), InvalidNavigationInput> {
        let result = match self.paginator_mut() {
            Some(paginator) => paginator.jump_to_input(input),
            None => Err(InvalidNavigationInput::OutOfRange {
                requested: 0,
                total: 0,
            }),
        };
        if let Err(e) = &result {
            tracing::debug!("Rejected page input: {}", e);
        }
        result
    }

    /// Lines visible on the current page; empty unless paginating
    pub fn current_window(&self) -> &[String] {
        match &self.state {
            SessionState::Reading {
                document,
                paginator,
            } => paginator.window(&document.lines),
            _ => &[],
        }
    }

    pub fn status(&self) -> Option<PageStatus> {
        self.paginator().map(Paginator::status)
    }
}

impl Default for ReadingSession {
    fn default() -> Self {
        Self::new(crate::paginator::DEFAULT_PAGE_SIZE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{FolioError, LoadError};
    use crate::types::BookKind;

    fn text_book(name: &str, lines: usize) -> (BookRef, LoadedBook) {
        let text: Vec<String> = (0..lines).map(|i| format!("{} line {}", name, i)).collect();
        let book = BookRef::from_upload(name, "text/plain", text.join("\n").into_bytes()).unwrap();
        let loaded = LoadedBook::Text {
            document: Document::plain_text(name, text),
            encoding: "UTF-8",
        };
        (book, loaded)
    }

    fn session(page_size: usize) -> ReadingSession {
        ReadingSession::new(NonZeroUsize::new(page_size).unwrap())
    }

    #[test]
    fn test_navigation_ignored_without_document() {
        let mut session = session(30);
        assert!(!session.next());
        assert!(!session.previous());
        assert!(session.jump_to_page(1).is_err());
        assert!(session.submit_page_input("1").is_err());
        assert!(session.current_window().is_empty());
        assert!(session.status().is_none());
        assert_eq!(session.state(), &SessionState::Idle);
    }

    #[test]
    fn test_navigation_ignored_while_loading() {
        let mut session = session(30);
        let (book, _) = text_book("a", 100);
        session.begin_load(&book);
        assert!(!session.next());
        assert!(session.current_window().is_empty());
    }

    #[test]
    fn test_reload_resets_to_first_page() {
        let mut session = session(10);
        let (book, loaded) = text_book("first", 100);
        let ticket = session.begin_load(&book);
        assert_eq!(session.complete_load(ticket, Ok(loaded)), Completion::Ready);

        session.jump_to_page(6).unwrap();
        assert_eq!(session.paginator().unwrap().current_index(), 5);

        let (book, loaded) = text_book("second", 25);
        let ticket = session.begin_load(&book);
        session.complete_load(ticket, Ok(loaded));

        let paginator = session.paginator().unwrap();
        assert_eq!(paginator.current_index(), 0);
        assert_eq!(paginator.total_pages(), 3);
        assert_eq!(session.current_window()[0], "second line 0");
    }

    #[test]
    fn test_stale_completion_is_discarded() {
        let mut session = session(10);
        let (first, first_loaded) = text_book("first", 50);
        let (second, second_loaded) = text_book("second", 20);

        let stale = session.begin_load(&first);
        let latest = session.begin_load(&second);

        assert_eq!(session.complete_load(stale, Ok(first_loaded)), Completion::Stale);
        assert!(matches!(session.state(), SessionState::Loading { .. }));

        assert_eq!(session.complete_load(latest, Ok(second_loaded)), Completion::Ready);
        assert_eq!(session.document().unwrap().title, "second");
        assert_eq!(session.status().unwrap().total_pages, 2);
    }

    #[test]
    fn test_completion_after_close_is_stale() {
        let mut session = session(10);
        let (book, loaded) = text_book("a", 5);
        let ticket = session.begin_load(&book);
        session.close();
        assert_eq!(session.complete_load(ticket, Ok(loaded)), Completion::Stale);
        assert_eq!(session.state(), &SessionState::Idle);
    }

    #[test]
    fn test_ticket_applies_once() {
        let mut session = session(10);
        let (book, loaded) = text_book("a", 5);
        let ticket = session.begin_load(&book);
        session.complete_load(ticket, Ok(loaded.clone()));
        assert_eq!(session.complete_load(ticket, Ok(loaded)), Completion::Stale);
    }

    #[test]
    fn test_failed_load_shows_nothing() {
        let mut session = session(10);
        let (book, loaded) = text_book("a", 5);
        let ticket = session.begin_load(&book);
        session.complete_load(ticket, Ok(loaded));

        let book = BookRef::from_location("gone.txt").unwrap();
        let ticket = session.begin_load(&book);
        let err = FolioError::Load(LoadError::NotFound("gone.txt".into()));
        assert_eq!(session.complete_load(ticket, Err(err)), Completion::Failed);

        assert!(matches!(session.state(), SessionState::Failed { .. }));
        assert!(session.current_window().is_empty());
        assert!(!session.next());
    }

    #[test]
    fn test_epub_is_delegated() {
        let mut session = session(10);
        let book = BookRef::from_upload("b.epub", "application/epub+zip", vec![1, 2, 3]).unwrap();
        assert_eq!(book.kind, BookKind::Epub);

        let ticket = session.begin_load(&book);
        let loaded = LoadedBook::Epub {
            document: Document::epub_delegated("b"),
            bytes: vec![1, 2, 3],
        };
        assert_eq!(
            session.complete_load(ticket, Ok(loaded)),
            Completion::Delegated {
                bytes: vec![1, 2, 3]
            }
        );
        assert!(session.document().unwrap().is_delegated());
        assert!(session.paginator().is_none());
        assert!(!session.next());
    }

    #[tokio::test]
    async fn test_load_through_loader() {
        let loader = Loader::local(".");
        let mut session = session(2);
        let book = BookRef::from_upload("n.txt", "text/plain", b"1\n2\n3".to_vec()).unwrap();

        assert_eq!(session.load(&loader, &book).await, Completion::Ready);
        assert_eq!(session.current_window(), &["1".to_string(), "2".to_string()]);
        assert!(session.next());
        assert_eq!(session.current_window(), &["3".to_string()]);
    }
}
