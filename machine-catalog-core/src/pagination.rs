use crate::catalog::models::{Machine, PageEnvelope};
use tracing::debug;

/// Client-side pagination state for the machine grid.
///
/// All mutation flows through `request_page_change` plus the two completion
/// handlers, so the navigation rules stay testable without a renderer.
/// Every fetch is tagged with the sequence number handed out by
/// `begin_request`; a completion carrying anything but the latest sequence
/// is discarded, so a slow response can never overwrite a newer page.
#[derive(Debug, Clone)]
pub struct PageState {
    pub current_page: u64,
    pub total_pages: u64,
    pub next_page: Option<u64>,
    pub prev_page: Option<u64>,
    pub machines: Vec<Machine>,
    pub last_error: Option<String>,
    latest_request: u64,
}

impl PageState {
    pub fn new() -> Self {
        PageState {
            current_page: 1,
            total_pages: 0,
            next_page: None,
            prev_page: None,
            machines: Vec::new(),
            last_error: None,
            latest_request: 0,
        }
    }

    /// Hand out the sequence number tagging the next fetch.
    pub fn begin_request(&mut self) -> u64 {
        self.latest_request += 1;
        self.latest_request
    }

    pub fn latest_request(&self) -> u64 {
        self.latest_request
    }

    fn is_stale(&self, seq: u64) -> bool {
        seq != self.latest_request
    }

    /// Move `current_page` to `target` if it names an existing page.
    ///
    /// Accepts any integer or the absent sentinel; everything outside
    /// `[1, total_pages]` is a no-op. Returns whether the change was
    /// accepted, which is the caller's cue to issue a fetch.
    pub fn request_page_change(&mut self, target: Option<i64>) -> bool {
        let Some(target) = target else {
            return false;
        };
        if target < 1 || target as u64 > self.total_pages {
            return false;
        }

        self.current_page = target as u64;
        true
    }

    /// Fold a successful fetch into the state. Returns false when the
    /// response is stale and was ignored.
    pub fn apply_success(&mut self, seq: u64, envelope: PageEnvelope, limit: u64) -> bool {
        if self.is_stale(seq) {
            debug!(
                "discarding stale page response (seq {}, latest {})",
                seq, self.latest_request
            );
            return false;
        }

        self.total_pages = envelope.total_pages(limit);
        self.next_page = envelope.next.map(|cursor| cursor.page);
        self.prev_page = envelope.previous.map(|cursor| cursor.page);
        self.machines = envelope.results;
        self.last_error = None;
        true
    }

    /// Fold a failed fetch into the state. The grid is cleared but
    /// `current_page`, `total_pages` and the cursors are carried over so
    /// the user can navigate again to recover.
    pub fn apply_failure(&mut self, seq: u64, message: String) -> bool {
        if self.is_stale(seq) {
            debug!(
                "discarding stale page failure (seq {}, latest {})",
                seq, self.latest_request
            );
            return false;
        }

        self.machines.clear();
        self.last_error = Some(message);
        true
    }

    pub fn can_go_prev(&self) -> bool {
        self.prev_page.is_some()
    }

    pub fn can_go_next(&self) -> bool {
        self.next_page.is_some()
    }
}

impl Default for PageState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::models::PageCursor;

    const LIMIT: u64 = 12;

    fn machine(title: &str) -> Machine {
        Machine {
            title: title.to_string(),
            image: format!("http://localhost:3000/img/{}.jpg", title),
            class_label: "Heavy".to_string(),
        }
    }

    fn envelope(
        titles: &[&str],
        total: u64,
        next: Option<u64>,
        previous: Option<u64>,
    ) -> PageEnvelope {
        PageEnvelope {
            results: titles.iter().map(|t| machine(t)).collect(),
            total,
            next: next.map(|page| PageCursor { page }),
            previous: previous.map(|page| PageCursor { page }),
        }
    }

    fn loaded_state(total: u64) -> PageState {
        let mut state = PageState::new();
        let seq = state.begin_request();
        let next = if total > LIMIT { Some(2) } else { None };
        assert!(state.apply_success(seq, envelope(&["A"], total, next, None), LIMIT));
        state
    }

    #[test]
    fn test_initial_state() {
        let state = PageState::new();
        assert_eq!(state.current_page, 1);
        assert_eq!(state.total_pages, 0);
        assert!(state.machines.is_empty());
        assert!(state.last_error.is_none());
        assert!(!state.can_go_prev());
        assert!(!state.can_go_next());
    }

    #[test]
    fn test_mount_scenario() {
        // First fetch: {results:[A], total:13, next:{page:2}, previous:null}
        let mut state = PageState::new();
        let seq = state.begin_request();
        assert!(state.apply_success(seq, envelope(&["A"], 13, Some(2), None), LIMIT));

        assert_eq!(state.total_pages, 2);
        assert_eq!(state.next_page, Some(2));
        assert_eq!(state.prev_page, None);
        assert!(!state.can_go_prev());
        assert!(state.can_go_next());
        assert_eq!(state.machines.len(), 1);
        assert_eq!(state.machines[0].title, "A");
    }

    #[test]
    fn test_next_page_scenario() {
        let mut state = loaded_state(13);

        // Clicking "Next" requests the page named by the next cursor.
        let target = state.next_page.map(|p| p as i64);
        assert!(state.request_page_change(target));
        assert_eq!(state.current_page, 2);

        let seq = state.begin_request();
        assert!(state.apply_success(seq, envelope(&["B"], 13, None, Some(1)), LIMIT));
        assert_eq!(state.next_page, None);
        assert!(!state.can_go_next());
        assert!(state.can_go_prev());
    }

    #[test]
    fn test_total_pages_derivation() {
        assert_eq!(loaded_state(25).total_pages, 3);
        assert_eq!(loaded_state(13).total_pages, 2);
        assert_eq!(loaded_state(12).total_pages, 1);
        assert_eq!(loaded_state(0).total_pages, 0);
    }

    #[test]
    fn test_valid_page_change_accepted() {
        let mut state = loaded_state(25);
        for page in 1..=3 {
            assert!(state.request_page_change(Some(page)));
            assert_eq!(state.current_page, page as u64);
        }
    }

    #[test]
    fn test_out_of_range_targets_are_noops() {
        let mut state = loaded_state(25);
        state.request_page_change(Some(2));

        for target in [None, Some(0), Some(-1), Some(4), Some(i64::MAX)] {
            assert!(!state.request_page_change(target));
            assert_eq!(state.current_page, 2);
        }
    }

    #[test]
    fn test_no_navigation_before_first_fetch() {
        let mut state = PageState::new();
        assert!(!state.request_page_change(Some(1)));
        assert_eq!(state.current_page, 1);
    }

    #[test]
    fn test_failure_clears_grid_and_carries_pagination() {
        let mut state = loaded_state(25);
        state.request_page_change(Some(2));

        let seq = state.begin_request();
        assert!(state.apply_failure(seq, "HTTP error: 500 Internal Server Error".to_string()));

        assert!(state.machines.is_empty());
        assert_eq!(
            state.last_error.as_deref(),
            Some("HTTP error: 500 Internal Server Error")
        );
        // current_page and the derived fields survive the failure
        assert_eq!(state.current_page, 2);
        assert_eq!(state.total_pages, 3);
        assert_eq!(state.next_page, Some(2));
    }

    #[test]
    fn test_success_clears_previous_error() {
        let mut state = loaded_state(13);
        let seq = state.begin_request();
        state.apply_failure(seq, "Network error: connection refused".to_string());

        let seq = state.begin_request();
        assert!(state.apply_success(seq, envelope(&["A", "B"], 13, Some(2), None), LIMIT));
        assert!(state.last_error.is_none());
        assert_eq!(state.machines.len(), 2);
    }

    #[test]
    fn test_empty_results_accepted() {
        let mut state = loaded_state(13);
        let seq = state.begin_request();
        assert!(state.apply_success(seq, envelope(&[], 13, Some(2), None), LIMIT));
        assert!(state.machines.is_empty());
        assert!(state.last_error.is_none());
    }

    #[test]
    fn test_stale_success_is_discarded() {
        let mut state = loaded_state(13);

        // Two fetches in flight; the older one resolves after the newer one.
        let old_seq = state.begin_request();
        let new_seq = state.begin_request();

        assert!(state.apply_success(new_seq, envelope(&["B"], 13, None, Some(1)), LIMIT));
        assert!(!state.apply_success(old_seq, envelope(&["A"], 13, Some(2), None), LIMIT));

        assert_eq!(state.machines[0].title, "B");
        assert_eq!(state.next_page, None);
    }

    #[test]
    fn test_stale_failure_is_discarded() {
        let mut state = loaded_state(13);

        let old_seq = state.begin_request();
        let new_seq = state.begin_request();

        assert!(state.apply_success(new_seq, envelope(&["B"], 13, None, Some(1)), LIMIT));
        assert!(!state.apply_failure(old_seq, "Network error: timed out".to_string()));

        assert_eq!(state.machines.len(), 1);
        assert!(state.last_error.is_none());
    }
}
