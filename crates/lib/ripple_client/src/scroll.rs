//! Infinite-scroll binding.
//!
//! A view renders a sentinel element below its list and reports every time
//! the sentinel enters the viewport. The binding turns those reports into
//! `load_more` calls on a background worker, which the window's single-flight
//! guard keeps at one outstanding request; events that land while a load is
//! pending degrade to no-ops. Dropping the binding cancels the worker, so an
//! abandoned screen stops producing loads.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use ripple_core::paging::{Identified, PagedWindow};

use crate::collections::PagedCollection;

/// Observer tuning for the view layer: fire as soon as any pixel would be
/// visible, 200 pixels before the end of the list.
pub const SENTINEL_ROOT_MARGIN_PX: u32 = 200;
pub const SENTINEL_THRESHOLD: f64 = 0.0;

/// Whether the sentinel should be rendered at all. Keeping it out of the
/// tree past the end of the stream stops the observer from re-firing.
pub fn sentinel_active<T>(window: &PagedWindow<T>) -> bool {
    window.has_more
}

/// Handle pairing a paged collection with its (single) scroll sentinel.
pub struct InfiniteScroll {
    events: mpsc::UnboundedSender<()>,
    cancel: CancellationToken,
}

impl InfiniteScroll {
    /// Spawn the worker for `collection`. One binding per collection view.
    pub fn bind<T>(collection: Arc<PagedCollection<T>>) -> Self
    where
        T: Identified + Clone + Send + Sync + 'static,
    {
        let (events, mut rx) = mpsc::unbounded_channel::<()>();
        let cancel = CancellationToken::new();
        let worker_cancel = cancel.clone();

        tokio::spawn(async move {
            loop {
                tokio::select! {
                    event = rx.recv() => {
                        match event {
                            Some(()) => {
                                // can_load_more re-checks inside load_more;
                                // a pending load turns this into a skip.
                                if let Err(e) = collection.load_more().await {
                                    debug!("sentinel-triggered load failed: {e}");
                                }
                            }
                            None => break,
                        }
                    }
                    _ = worker_cancel.cancelled() => break,
                }
            }
        });

        Self { events, cancel }
    }

    /// The sentinel entered the viewport.
    pub fn sentinel_visible(&self) {
        let _ = self.events.send(());
    }
}

impl Drop for InfiniteScroll {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;
    use std::time::Duration;

    use ripple_core::models::PageSlice;

    use crate::collections::PageFetcher;
    use crate::error::ApiResult;

    #[derive(Debug, Clone)]
    struct Row(i64);

    impl Identified for Row {
        fn id(&self) -> i64 {
            self.0
        }
    }

    struct Script(Mutex<Vec<PageSlice<Row>>>);

    #[async_trait]
    impl PageFetcher<Row> for Script {
        async fn fetch(&self, _page: u32, _size: u32) -> ApiResult<PageSlice<Row>> {
            Ok(self.0.lock().unwrap_or_else(|e| e.into_inner()).remove(0))
        }
    }

    fn page(ids: &[i64], page_no: u32, total: u64, has_more: bool) -> PageSlice<Row> {
        PageSlice {
            content: ids.iter().map(|&id| Row(id)).collect(),
            current_page: page_no,
            total_elements: total,
            has_more,
        }
    }

    async fn wait_for_len(collection: &PagedCollection<Row>, len: usize) {
        tokio::time::timeout(Duration::from_secs(2), async {
            let mut rx = collection.subscribe();
            loop {
                if collection.window().len() >= len {
                    return;
                }
                rx.changed().await.expect("window channel open");
            }
        })
        .await
        .expect("window reached expected length");
    }

    #[tokio::test]
    async fn sentinel_events_page_through_the_stream() {
        let fetcher = Arc::new(Script(Mutex::new(vec![
            page(&[1, 2], 0, 4, true),
            page(&[3, 4], 1, 4, false),
        ])));
        let feed = Arc::new(PagedCollection::new(2, fetcher as Arc<dyn PageFetcher<Row>>));
        feed.load_first().await.expect("page 0");
        assert!(sentinel_active(&feed.window()));

        let scroll = InfiniteScroll::bind(Arc::clone(&feed));
        scroll.sentinel_visible();
        wait_for_len(&feed, 4).await;

        let window = feed.window();
        assert!(!window.has_more);
        assert!(!sentinel_active(&window));

        // Past the end: the event drains as a no-op; no slice remains to pop,
        // so a real fetch would panic the script.
        scroll.sentinel_visible();
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(feed.window().len(), 4);
    }
}
