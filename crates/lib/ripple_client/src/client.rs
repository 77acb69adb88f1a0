//! The assembled client.

use std::sync::Arc;

use tracing::debug;

use crate::config::ClientConfig;
use crate::routes::Navigator;
use crate::services::admin::AdminService;
use crate::services::comments::CommentService;
use crate::services::likes::LikeService;
use crate::services::notifications::NotificationCenter;
use crate::services::posts::PostService;
use crate::services::reports::ReportService;
use crate::services::users::UserService;
use crate::session::{Session, SessionCell};
use crate::storage::TokenStore;
use crate::transport::Transport;

/// Everything a front end needs, wired together: one transport, one session,
/// one navigator, and a service per backend surface.
pub struct RippleClient {
    navigator: Arc<Navigator>,
    session: Arc<Session>,
    transport: Transport,
    pub posts: PostService,
    pub likes: LikeService,
    pub comments: CommentService,
    pub users: UserService,
    pub notifications: NotificationCenter,
    pub reports: ReportService,
    pub admin: AdminService,
}

impl RippleClient {
    pub fn new(config: ClientConfig, store: Arc<dyn TokenStore>) -> Self {
        let navigator = Arc::new(Navigator::new());
        let cell = Arc::new(SessionCell::new());
        let transport = Transport::new(
            config.base_url.clone(),
            Arc::clone(&store),
            Arc::clone(&cell),
            Arc::clone(&navigator),
        );
        let session = Arc::new(Session::new(
            transport.clone(),
            store,
            cell,
            Arc::clone(&navigator),
        ));

        Self {
            navigator,
            session,
            posts: PostService::new(transport.clone()),
            likes: LikeService::new(transport.clone()),
            comments: CommentService::new(transport.clone()),
            users: UserService::new(transport.clone()),
            notifications: NotificationCenter::new(transport.clone()),
            reports: ReportService::new(transport.clone()),
            admin: AdminService::new(transport.clone()),
            transport,
        }
    }

    pub fn navigator(&self) -> &Arc<Navigator> {
        &self.navigator
    }

    pub fn session(&self) -> &Arc<Session> {
        &self.session
    }

    pub fn transport(&self) -> &Transport {
        &self.transport
    }

    /// Session-start background read: prefetch the notification surface when
    /// a usable credential is already persisted. Failures are logged, not
    /// surfaced — the bell refreshes again on open.
    pub async fn bootstrap(&self) {
        if self.session.stored_token().is_none() {
            return;
        }
        if let Err(e) = self.notifications.refresh(false).await {
            debug!("notification prefetch failed: {e}");
        }
    }
}
