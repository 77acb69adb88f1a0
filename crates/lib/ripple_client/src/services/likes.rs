//! The like toggle — a single-flight bistable action.
//!
//! While a toggle for a given post is in flight, further toggles on that
//! post are suppressed rather than queued. This is what keeps a double-tap
//! from racing the server and drifting the count off by one; the response's
//! counters are canonical and overwrite whatever the view showed.

use dashmap::DashMap;

use ripple_core::models::{LikeResponse, Post};

use crate::error::ApiResult;
use crate::transport::Transport;

pub struct LikeService {
    transport: Transport,
    in_flight: DashMap<i64, ()>,
}

/// Clears the in-flight mark even when the toggle future is dropped mid-way.
struct FlightGuard<'a> {
    map: &'a DashMap<i64, ()>,
    id: i64,
}

impl Drop for FlightGuard<'_> {
    fn drop(&mut self) {
        self.map.remove(&self.id);
    }
}

impl LikeService {
    pub fn new(transport: Transport) -> Self {
        Self {
            transport,
            in_flight: DashMap::new(),
        }
    }

    /// Toggle the like on a post. Returns `Ok(None)` when a toggle for the
    /// same post is already in flight (the call was suppressed, nothing was
    /// sent).
    pub async fn toggle(&self, post_id: i64) -> ApiResult<Option<LikeResponse>> {
        use dashmap::mapref::entry::Entry;
        match self.in_flight.entry(post_id) {
            Entry::Occupied(_) => return Ok(None),
            Entry::Vacant(slot) => {
                slot.insert(());
            }
        }
        let _guard = FlightGuard {
            map: &self.in_flight,
            id: post_id,
        };

        let response: LikeResponse = self
            .transport
            .post_empty(&format!("/api/post/{post_id}/like"))
            .await?;
        Ok(Some(response))
    }

    /// Whether a toggle for `post_id` is currently in flight (views disable
    /// the button off this).
    pub fn is_toggling(&self, post_id: i64) -> bool {
        self.in_flight.contains_key(&post_id)
    }
}

/// Fold the server's canonical like state into a post. Screen models use
/// this through `PagedCollection::mutate` so every window showing the post
/// agrees.
pub fn apply(post: &mut Post, like: LikeResponse) {
    post.is_liked_by_current_user = like.is_liked;
    post.likes_count = like.likes_count;
}
