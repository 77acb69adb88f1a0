//! The notifications surface.
//!
//! Process-wide state the navigation bar reads: the notification list and
//! the unread counter. Mark-as-read is optimistic — the local patch lands
//! first, the server commit follows, and a failed commit keeps the patch
//! (the server action is idempotent; the next refresh reconciles).

use tokio::sync::watch;
use tracing::debug;

use ripple_core::models::Notification;

use crate::error::ApiResult;
use crate::transport::Transport;

/// Observable notification state.
#[derive(Debug, Clone, Default)]
pub struct NotificationState {
    pub notifications: Vec<Notification>,
    pub unread_count: u64,
    pub loading: bool,
}

pub struct NotificationCenter {
    transport: Transport,
    state: watch::Sender<NotificationState>,
}

impl NotificationCenter {
    pub fn new(transport: Transport) -> Self {
        let (state, _) = watch::channel(NotificationState::default());
        Self { transport, state }
    }

    pub fn state(&self) -> NotificationState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<NotificationState> {
        self.state.subscribe()
    }

    /// Fetch the list and the unread counter. Called on session start and on
    /// bell-open; no polling in between.
    pub async fn refresh(&self, unread_only: bool) -> ApiResult<()> {
        self.state.send_modify(|s| s.loading = true);

        let result: ApiResult<(Vec<Notification>, u64)> = async {
            let notifications = self
                .transport
                .get(
                    "/api/notifications",
                    &[("unreadOnly", unread_only.to_string())],
                )
                .await?;
            let unread_count = self
                .transport
                .get("/api/notifications/unread-count", &[])
                .await?;
            Ok((notifications, unread_count))
        }
        .await;

        match result {
            Ok((notifications, unread_count)) => {
                self.state.send_modify(|s| {
                    s.notifications = notifications;
                    s.unread_count = unread_count;
                    s.loading = false;
                });
                Ok(())
            }
            Err(err) => {
                self.state.send_modify(|s| s.loading = false);
                Err(err)
            }
        }
    }

    /// Mark one notification read. The counter drops and the row flips
    /// locally before the commit; the server's echo replaces the row when it
    /// arrives.
    pub async fn mark_as_read(&self, notification_id: i64) -> ApiResult<()> {
        self.state.send_modify(|s| {
            if let Some(n) = s
                .notifications
                .iter_mut()
                .find(|n| n.id == notification_id)
                && !n.is_read
            {
                n.is_read = true;
                s.unread_count = s.unread_count.saturating_sub(1);
            }
        });

        match self
            .transport
            .put_empty::<Notification>(&format!("/api/notifications/{notification_id}/read"))
            .await
        {
            Ok(updated) => {
                self.state.send_modify(|s| {
                    if let Some(n) = s.notifications.iter_mut().find(|n| n.id == updated.id) {
                        *n = updated;
                    }
                });
                Ok(())
            }
            Err(err) => {
                debug!("mark-as-read commit failed; keeping optimistic patch: {err}");
                Err(err)
            }
        }
    }

    /// Mark everything read. Idempotent: a second call leaves the counter at
    /// zero and every row read.
    pub async fn mark_all_read(&self) -> ApiResult<()> {
        self.state.send_modify(|s| {
            for n in &mut s.notifications {
                n.is_read = true;
            }
            s.unread_count = 0;
        });

        match self
            .transport
            .put_empty_unit("/api/notifications/mark-all-read")
            .await
        {
            Ok(()) => Ok(()),
            Err(err) => {
                debug!("mark-all-read commit failed; keeping optimistic patch: {err}");
                Err(err)
            }
        }
    }
}
