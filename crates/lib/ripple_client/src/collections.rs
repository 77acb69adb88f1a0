//! Fetcher-driven paged collections.
//!
//! [`PagedCollection`] wires a [`PagedWindow`] to an endpoint fetcher and
//! publishes every transition through a watch channel. Views subscribe and
//! re-render on change; screen models call the mutation hooks after accepted
//! actions instead of refetching.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::watch;

use ripple_core::models::PageSlice;
use ripple_core::paging::{Identified, PagedWindow, Position};

use crate::error::{ApiError, ApiResult};

/// One server-paged endpoint, normalized to [`PageSlice`].
#[async_trait]
pub trait PageFetcher<T>: Send + Sync {
    async fn fetch(&self, page: u32, size: u32) -> ApiResult<PageSlice<T>>;
}

/// Outcome of a `load_more` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadMore {
    /// A page was fetched and appended.
    Loaded,
    /// The precondition failed (end of stream or a load already in flight);
    /// nothing was issued.
    Skipped,
}

/// A windowed view of one server-paged collection.
pub struct PagedCollection<T> {
    state: watch::Sender<PagedWindow<T>>,
    fetcher: Arc<dyn PageFetcher<T>>,
    page_size: u32,
}

impl<T> PagedCollection<T>
where
    T: Identified + Clone + Send + Sync + 'static,
{
    pub fn new(page_size: u32, fetcher: Arc<dyn PageFetcher<T>>) -> Self {
        let (state, _) = watch::channel(PagedWindow::new(page_size));
        Self {
            state,
            fetcher,
            page_size,
        }
    }

    /// Current window snapshot.
    pub fn window(&self) -> PagedWindow<T> {
        self.state.borrow().clone()
    }

    /// Subscribe to window changes.
    pub fn subscribe(&self) -> watch::Receiver<PagedWindow<T>> {
        self.state.subscribe()
    }

    /// Load (or reload) the first page. Repeated while one is already in
    /// flight is a no-op.
    pub async fn load_first(&self) -> ApiResult<()> {
        let mut started = false;
        self.state.send_modify(|w| started = w.begin_initial());
        if !started {
            return Ok(());
        }

        match self.fetcher.fetch(0, self.page_size).await {
            Ok(slice) => {
                self.state.send_modify(|w| w.complete_initial(slice));
                Ok(())
            }
            Err(err) => {
                self.fail_initial(&err);
                Err(err)
            }
        }
    }

    /// Fetch the next page, if there is one and none is pending. The window
    /// flips `loading_more` atomically, so a concurrent second call skips
    /// without issuing a request.
    pub async fn load_more(&self) -> ApiResult<LoadMore> {
        let mut started = false;
        let mut next_page = 0;
        self.state.send_modify(|w| {
            started = w.begin_more();
            next_page = w.next_page();
        });
        if !started {
            return Ok(LoadMore::Skipped);
        }

        match self.fetcher.fetch(next_page, self.page_size).await {
            Ok(slice) => {
                self.state.send_modify(|w| w.complete_more(slice));
                Ok(LoadMore::Loaded)
            }
            Err(err) => {
                self.state.send_modify(|w| w.fail_more(err.load_error()));
                Err(err)
            }
        }
    }

    fn fail_initial(&self, err: &ApiError) {
        self.state.send_modify(|w| w.fail_initial(err.load_error()));
    }

    /// Place a locally created item (a comment just posted, a report just
    /// filed) without refetching.
    pub fn insert(&self, item: T, position: Position) {
        self.state.send_modify(|w| w.insert(item, position));
    }

    /// Swap in the server's post-edit version of an item.
    pub fn replace(&self, item: T) {
        self.state.send_modify(|w| w.replace(item));
    }

    /// Drop an item everywhere this window shows it.
    pub fn remove(&self, id: i64) -> bool {
        let mut removed = false;
        self.state.send_modify(|w| removed = w.remove(id));
        removed
    }

    /// Patch one item in place (canonical like counters, follow flags).
    pub fn mutate(&self, id: i64, patch: impl FnOnce(&mut T)) -> bool {
        let mut patched = false;
        self.state.send_modify(|w| patched = w.mutate(id, patch));
        patched
    }
}
