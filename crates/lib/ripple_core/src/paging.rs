//! The paged-window state machine.
//!
//! A [`PagedWindow`] is the client's materialized view of one server-paged
//! collection: the items fetched so far, the server totals, and the load
//! state. It is a pure value (fetching lives a layer up), so every state
//! transition here is synchronous and testable without I/O.
//!
//! Invariants maintained across any operation sequence:
//! - no two items share an id;
//! - `items.len() <= total_elements`;
//! - `total_elements` never goes negative;
//! - while `loading_more` is set, `begin_more` refuses to start another load.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::models::page::PageSlice;

/// Items a window can hold: identified by the server-assigned id.
pub trait Identified {
    fn id(&self) -> i64;
}

/// Window-level error kind, derived from the transport failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LoadError {
    Network,
    Server,
    NotFound,
    Forbidden,
    Other,
}

impl LoadError {
    /// Transient failures keep previously loaded items; terminal ones
    /// (missing or forbidden resource) clear the window.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Network | Self::Server)
    }

    /// Whether the error panel should offer a Retry affordance.
    pub fn retryable(&self) -> bool {
        self.is_transient()
    }
}

/// Where a locally created item lands in the window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Position {
    Head,
    Tail,
}

/// Materialized view of a server-paged collection.
#[derive(Debug, Clone)]
pub struct PagedWindow<T> {
    pub items: Vec<T>,
    pub page: u32,
    pub page_size: u32,
    pub total_elements: u64,
    pub has_more: bool,
    pub loading_initial: bool,
    pub loading_more: bool,
    pub error: Option<LoadError>,
}

impl<T> PagedWindow<T> {
    pub fn new(page_size: u32) -> Self {
        Self {
            items: Vec::new(),
            page: 0,
            page_size,
            total_elements: 0,
            has_more: false,
            loading_initial: false,
            loading_more: false,
            error: None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }
}

impl<T: Identified> PagedWindow<T> {
    /// Start the first-page load. Returns `false` (no-op) if one is already
    /// in flight. Previous items stay visible until the result arrives, so a
    /// transient failure can fall back to them.
    pub fn begin_initial(&mut self) -> bool {
        if self.loading_initial {
            return false;
        }
        self.loading_initial = true;
        self.error = None;
        self.page = 0;
        true
    }

    /// Apply a successful first page: replaces the window contents.
    pub fn complete_initial(&mut self, slice: PageSlice<T>) {
        self.items.clear();
        self.append_unique(slice.content);
        self.page = slice.current_page;
        self.total_elements = slice.total_elements;
        self.has_more = slice.has_more && !self.items.is_empty();
        self.loading_initial = false;
        self.error = None;
        self.clamp_total();
    }

    /// Record a failed first page. Transient errors keep whatever was loaded
    /// before; terminal ones (404/403) empty the window.
    pub fn fail_initial(&mut self, error: LoadError) {
        self.loading_initial = false;
        self.error = Some(error);
        if !error.is_transient() {
            self.items.clear();
            self.total_elements = 0;
            self.has_more = false;
        }
    }

    /// Whether a load-more may start now.
    pub fn can_load_more(&self) -> bool {
        self.has_more && !self.loading_more && !self.loading_initial
    }

    /// Start a load-more. Returns `false` when the precondition fails — the
    /// caller must treat that as a no-op, not an error.
    pub fn begin_more(&mut self) -> bool {
        if !self.can_load_more() {
            return false;
        }
        self.loading_more = true;
        self.error = None;
        true
    }

    /// The page index a load-more should request next.
    pub fn next_page(&self) -> u32 {
        if self.items.is_empty() { 0 } else { self.page + 1 }
    }

    /// Apply a successful load-more: appends unique content and takes the
    /// server's totals as truth.
    pub fn complete_more(&mut self, slice: PageSlice<T>) {
        let got_any = !slice.content.is_empty();
        self.append_unique(slice.content);
        self.page = slice.current_page;
        self.total_elements = slice.total_elements;
        // An empty page while the server claimed more is an inconsistency;
        // stop paging rather than loop on it.
        if !got_any && self.has_more {
            warn!(page = slice.current_page, "empty page despite hasMore; ending stream");
            self.has_more = false;
        } else {
            self.has_more = slice.has_more;
        }
        self.loading_more = false;
        self.clamp_total();
    }

    /// Record a failed load-more; items already shown are kept.
    pub fn fail_more(&mut self, error: LoadError) {
        self.loading_more = false;
        self.error = Some(error);
    }

    /// Place a locally created item at the chosen end and bump the total.
    /// If the id is already present the existing entry is replaced instead.
    pub fn insert(&mut self, item: T, position: Position) {
        if let Some(existing) = self.items.iter_mut().find(|i| i.id() == item.id()) {
            warn!(id = item.id(), "insert of known id; replacing in place");
            *existing = item;
            return;
        }
        match position {
            Position::Head => self.items.insert(0, item),
            Position::Tail => self.items.push(item),
        }
        self.total_elements += 1;
    }

    /// Replace an item in place by id; totals are untouched. No-op when the
    /// id is not in the window.
    pub fn replace(&mut self, item: T) {
        if let Some(existing) = self.items.iter_mut().find(|i| i.id() == item.id()) {
            *existing = item;
        }
    }

    /// Remove by id. Returns whether anything was removed; the total is
    /// decremented only on an actual removal and never goes negative.
    pub fn remove(&mut self, id: i64) -> bool {
        let before = self.items.len();
        self.items.retain(|i| i.id() != id);
        let removed = self.items.len() < before;
        if removed {
            self.total_elements = self.total_elements.saturating_sub(1);
        }
        removed
    }

    /// Apply a shallow patch to one item by id (like counters, follow flags).
    pub fn mutate(&mut self, id: i64, patch: impl FnOnce(&mut T)) -> bool {
        match self.items.iter_mut().find(|i| i.id() == id) {
            Some(item) => {
                patch(item);
                true
            }
            None => false,
        }
    }

    /// Append content, dropping duplicates: the item already in the window
    /// wins over the one arriving from a later page.
    fn append_unique(&mut self, content: Vec<T>) {
        for item in content {
            if self.items.iter().any(|i| i.id() == item.id()) {
                warn!(id = item.id(), "duplicate id across pages; keeping first");
                continue;
            }
            self.items.push(item);
        }
    }

    /// The server owns totals, but `items.len() <= total_elements` must hold
    /// even against an inconsistent server.
    fn clamp_total(&mut self) {
        let len = self.items.len() as u64;
        if self.total_elements < len {
            self.total_elements = len;
        }
    }
}
