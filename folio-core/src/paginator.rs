//! Page navigation over a fixed-size window of text lines

use crate::error::InvalidNavigationInput;
use serde::Serialize;
use std::num::NonZeroUsize;
use std::ops::Range;

/// Default number of lines shown per page
pub const DEFAULT_PAGE_SIZE: NonZeroUsize = match NonZeroUsize::new(180) {
    Some(n) => n,
    None => unreachable!(),
};

/// Pagination state for one document
///
/// `current` always satisfies `current < max(total_pages, 1)`; every
/// operation below preserves that, so no navigation call can fail or
/// index out of bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Paginator {
    current: usize,
    page_size: NonZeroUsize,
    line_count: usize,
    total_pages: usize,
}

/// Snapshot of the navigation surface for a front end
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PageStatus {
    /// 1-based page number shown to the reader
    pub page: usize,
    pub total_pages: usize,
    pub has_previous: bool,
    pub has_next: bool,
    /// Fraction in `0.0..=1.0`
    pub progress: f64,
}

impl Paginator {
    /// Paginate `line_count` lines, starting on the first page
    pub fn new(line_count: usize, page_size: NonZeroUsize) -> Self {
        Self {
            current: 0,
            page_size,
            line_count,
            total_pages: line_count.div_ceil(page_size.get()),
        }
    }

    /// Re-paginate for a new document and go back to the first page
    pub fn reset(&mut self, line_count: usize) {
        *self = Self::new(line_count, self.page_size);
    }

    /// Zero-based index of the current page
    pub fn current_index(&self) -> usize {
        self.current
    }

    /// 1-based number of the current page
    pub fn current_page(&self) -> usize {
        self.current + 1
    }

    pub fn total_pages(&self) -> usize {
        self.total_pages
    }

    pub fn page_size(&self) -> NonZeroUsize {
        self.page_size
    }

    pub fn line_count(&self) -> usize {
        self.line_count
    }

    pub fn has_next(&self) -> bool {
        self.current + 1 < self.total_pages
    }

    pub fn has_previous(&self) -> bool {
        self.current > 0
    }

    /// Advance one page; a no-op on the last page
    /// Returns whether the page changed
    pub fn next(&mut self) -> bool {
        if self.has_next() {
            self.current += 1;
            true
        } else {
            false
        }
    }

    /// Go back one page; a no-op on the first page
    /// Returns whether the page changed
    pub fn previous(&mut self) -> bool {
        if self.has_previous() {
            self.current -= 1;
            true
        } else {
            false
        }
    }

    /// Jump to a 1-based page number
    pub fn jump_to_page(&mut self, requested: usize) -> Result<(), InvalidNavigationInput> {
        if requested == 0 || requested > self.total_pages {
            return Err(InvalidNavigationInput::OutOfRange {
                requested,
                total: self.total_pages,
            });
        }
        self.current = requested - 1;
        Ok(())
    }

    /// Jump to a page typed by the reader
    pub fn jump_to_input(&mut self, input: &str) -> Result<(), InvalidNavigationInput> {
        let requested = parse_page_number(input)?;
        self.jump_to_page(requested)
    }

    /// Line range covered by the current page, clipped to the document
    pub fn window_range(&self) -> Range<usize> {
        self.page_range(self.current)
    }

    /// Line range covered by the page at `index`
    pub fn page_range(&self, index: usize) -> Range<usize> {
        let start = index
            .saturating_mul(self.page_size.get())
            .min(self.line_count);
        let end = start.saturating_add(self.page_size.get()).min(self.line_count);
        start..end
    }

    /// Slice of `lines` visible on the current page
    pub fn window<'a, T>(&self, lines: &'a [T]) -> &'a [T] {
        let range = self.window_range();
        let end = range.end.min(lines.len());
        &lines[range.start.min(end)..end]
    }

    /// `(current + 1) / total_pages`, or 0 for an empty document
    pub fn progress(&self) -> f64 {
        if self.total_pages == 0 {
            0.0
        } else {
            self.current_page() as f64 / self.total_pages as f64
        }
    }

    pub fn status(&self) -> PageStatus {
        PageStatus {
            page: self.current_page(),
            total_pages: self.total_pages,
            has_previous: self.has_previous(),
            has_next: self.has_next(),
            progress: self.progress(),
        }
    }
}

/// Parse a 1-based page number from user input
fn parse_page_number(input: &str) -> Result<usize, InvalidNavigationInput> {
    let trimmed = input.trim();
    if trimmed.is_empty() || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
        return Err(InvalidNavigationInput::NotANumber(input.to_string()));
    }
    // All digits but too large for usize: certainly past the last page
    Ok(trimmed.parse().unwrap_or(usize::MAX))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn size(n: usize) -> NonZeroUsize {
        NonZeroUsize::new(n).unwrap()
    }

    #[test]
    fn test_total_pages_rounds_up() {
        assert_eq!(Paginator::new(181, size(180)).total_pages(), 2);
        assert_eq!(Paginator::new(180, size(180)).total_pages(), 1);
        assert_eq!(Paginator::new(1, size(180)).total_pages(), 1);
        assert_eq!(Paginator::new(0, size(180)).total_pages(), 0);
    }

    #[test]
    fn test_short_last_page() {
        let lines: Vec<String> = (0..181).map(|i| i.to_string()).collect();
        let mut pager = Paginator::new(lines.len(), size(180));

        assert_eq!(pager.window(&lines).len(), 180);
        assert!(pager.next());
        assert_eq!(pager.window(&lines), &["180".to_string()]);
    }

    #[test]
    fn test_boundaries_are_no_ops() {
        let mut pager = Paginator::new(60, size(30));
        assert!(!pager.previous());
        assert_eq!(pager.current_index(), 0);

        assert!(pager.next());
        assert!(!pager.next());
        assert_eq!(pager.current_index(), 1);
        assert!(!pager.has_next());
        assert!(pager.has_previous());
    }

    #[test]
    fn test_empty_document() {
        let mut pager = Paginator::new(0, size(30));
        let lines: Vec<String> = Vec::new();

        assert!(pager.window(&lines).is_empty());
        assert!(!pager.next());
        assert!(!pager.previous());
        assert_eq!(pager.current_index(), 0);
        assert_eq!(pager.progress(), 0.0);
        assert!(pager.jump_to_page(1).is_err());
    }

    #[test]
    fn test_jump_validation() {
        let mut pager = Paginator::new(100, size(10));

        assert_eq!(
            pager.jump_to_page(0),
            Err(InvalidNavigationInput::OutOfRange {
                requested: 0,
                total: 10
            })
        );
        assert!(pager.jump_to_page(11).is_err());
        assert_eq!(pager.current_index(), 0);

        pager.jump_to_page(10).unwrap();
        assert_eq!(pager.current_index(), 9);
        pager.jump_to_page(1).unwrap();
        assert_eq!(pager.current_index(), 0);
    }

    #[test]
    fn test_jump_to_input() {
        let mut pager = Paginator::new(100, size(10));

        pager.jump_to_input(" 4 ").unwrap();
        assert_eq!(pager.current_page(), 4);

        for bad in ["", "abc", "-1", "2.5", "1e3", "99999999999999999999999"] {
            assert!(pager.jump_to_input(bad).is_err(), "accepted {:?}", bad);
            assert_eq!(pager.current_page(), 4);
        }
        assert!(matches!(
            pager.jump_to_input("x"),
            Err(InvalidNavigationInput::NotANumber(_))
        ));
    }

    #[test]
    fn test_progress() {
        let mut pager = Paginator::new(40, size(10));
        assert_eq!(pager.progress(), 0.25);
        pager.jump_to_page(4).unwrap();
        assert_eq!(pager.progress(), 1.0);
    }

    #[test]
    fn test_reset_returns_to_first_page() {
        let mut pager = Paginator::new(1000, size(10));
        pager.jump_to_page(6).unwrap();
        pager.reset(25);
        assert_eq!(pager.current_index(), 0);
        assert_eq!(pager.total_pages(), 3);
    }

    #[test]
    fn test_status() {
        let pager = Paginator::new(30, size(10));
        let status = pager.status();
        assert_eq!(status.page, 1);
        assert_eq!(status.total_pages, 3);
        assert!(!status.has_previous);
        assert!(status.has_next);
    }
}
