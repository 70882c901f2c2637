//! ui::pagination
//!
//! Cursor over the commit history, advanced one page at a time.
//!
//! The controller holds all paging state explicitly. The browser shell
//! keeps an identical object in JavaScript; the CLI `log --all` loop uses
//! this one directly.

/// Commits requested per page.
pub const PAGE_SIZE: usize = 50;

/// Start the next page when the scroll position is this close (in pixels)
/// to the bottom of the list.
pub const SCROLL_THRESHOLD_PX: u32 = 100;

/// Paging state for one history list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaginationController {
    page_size: usize,
    next_skip: usize,
    has_more: bool,
    loading: bool,
}

/// The page to request next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub skip: usize,
    pub count: usize,
}

impl Default for PaginationController {
    fn default() -> Self {
        Self::new(PAGE_SIZE)
    }
}

impl PaginationController {
    /// A fresh cursor. A zero page size is treated as one.
    pub fn new(page_size: usize) -> Self {
        Self {
            page_size: page_size.max(1),
            next_skip: 0,
            has_more: true,
            loading: false,
        }
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn next_skip(&self) -> usize {
        self.next_skip
    }

    pub fn has_more(&self) -> bool {
        self.has_more
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Start loading the next page.
    ///
    /// Returns `None` while a page is already loading or once the history
    /// is exhausted.
    pub fn begin(&mut self) -> Option<PageRequest> {
        if self.loading || !self.has_more {
            return None;
        }
        self.loading = true;
        Some(PageRequest {
            skip: self.next_skip,
            count: self.page_size,
        })
    }

    /// Record a page of `received` commits.
    ///
    /// A short page means the history is exhausted.
    pub fn finish(&mut self, received: usize) {
        self.loading = false;
        self.next_skip += received;
        self.has_more = received == self.page_size;
    }

    /// Record a failed load. Paging stops until [`reset`](Self::reset).
    pub fn fail(&mut self) {
        self.loading = false;
        self.has_more = false;
    }

    /// Start over from the newest commit.
    pub fn reset(&mut self) {
        *self = Self::new(self.page_size);
    }

    /// Whether a scroll position should trigger the next page.
    pub fn should_load(&self, scroll_top: u32, client_height: u32, scroll_height: u32) -> bool {
        self.has_more
            && !self.loading
            && scroll_top.saturating_add(client_height).saturating_add(SCROLL_THRESHOLD_PX)
                >= scroll_height
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn eighty_commits_in_two_pages() {
        let mut pager = PaginationController::default();

        let first = pager.begin().unwrap();
        assert_eq!(first, PageRequest { skip: 0, count: 50 });
        pager.finish(50);
        assert!(pager.has_more());

        let second = pager.begin().unwrap();
        assert_eq!(second, PageRequest { skip: 50, count: 50 });
        pager.finish(30);
        assert!(!pager.has_more());
        assert_eq!(pager.next_skip(), 80);
        assert_eq!(pager.begin(), None);
    }

    #[test]
    fn no_concurrent_loads() {
        let mut pager = PaginationController::new(10);
        assert!(pager.begin().is_some());
        assert!(pager.is_loading());
        assert_eq!(pager.begin(), None);
    }

    #[test]
    fn failure_stops_paging_until_reset() {
        let mut pager = PaginationController::new(10);
        pager.begin();
        pager.fail();
        assert_eq!(pager.begin(), None);

        pager.reset();
        assert_eq!(pager.begin(), Some(PageRequest { skip: 0, count: 10 }));
    }

    #[test]
    fn scroll_trigger() {
        let pager = PaginationController::default();
        assert!(pager.should_load(850, 100, 1000));
        assert!(pager.should_load(800, 100, 1000));
        assert!(!pager.should_load(799, 100, 1000));
    }

    proptest! {
        #[test]
        fn pages_never_overlap(total in 0usize..500, page in 1usize..80) {
            let mut pager = PaginationController::new(page);
            let mut seen = Vec::new();
            while let Some(req) = pager.begin() {
                let received = total.saturating_sub(req.skip).min(req.count);
                seen.extend(req.skip..req.skip + received);
                pager.finish(received);
            }
            prop_assert_eq!(seen, (0..total).collect::<Vec<_>>());
        }
    }
}
