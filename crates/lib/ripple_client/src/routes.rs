//! Route table and navigation state.
//!
//! The published route surface, plus a watch-backed `Navigator` the rest of
//! the client observes. Views subscribe to the current route; admission and
//! the transport's 401 recovery drive it.

use std::sync::Mutex;

use tokio::sync::watch;
use tracing::debug;

/// A published route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Login,
    Register,
    Home,
    /// The signed-in user's own profile.
    ProfileSelf,
    Profile(String),
    PostCreate,
    PostDetail(i64),
    AdminDashboard,
}

impl Route {
    /// Path this route is published under.
    pub fn path(&self) -> String {
        match self {
            Self::Login => "/auth/login".to_string(),
            Self::Register => "/auth/register".to_string(),
            Self::Home => "/home".to_string(),
            Self::ProfileSelf => "/profile".to_string(),
            Self::Profile(username) => format!("/profile/{username}"),
            Self::PostCreate => "/api/posts/create".to_string(),
            Self::PostDetail(id) => format!("/api/posts/{id}"),
            Self::AdminDashboard => "/admin/dashboard".to_string(),
        }
    }

    /// Match a path against the route table. `/` resolves to Home; anything
    /// unknown falls back to the login page.
    pub fn resolve(path: &str) -> Route {
        let trimmed = path.trim_end_matches('/');
        match trimmed {
            "" => return Route::Home,
            "/auth/login" => return Route::Login,
            "/auth/register" => return Route::Register,
            "/home" => return Route::Home,
            "/profile" => return Route::ProfileSelf,
            "/api/posts/create" => return Route::PostCreate,
            "/admin/dashboard" => return Route::AdminDashboard,
            _ => {}
        }
        if let Some(username) = trimmed.strip_prefix("/profile/")
            && !username.is_empty()
            && !username.contains('/')
        {
            return Route::Profile(username.to_string());
        }
        if let Some(id) = trimmed.strip_prefix("/api/posts/")
            && let Ok(id) = id.parse::<i64>()
        {
            return Route::PostDetail(id);
        }
        Route::Login
    }
}

/// Centralized navigation state: current route, history, and the one-shot
/// notice a redirect may leave for the next screen (the banned-on-login
/// message).
pub struct Navigator {
    current: watch::Sender<Route>,
    history: Mutex<Vec<Route>>,
    notice: Mutex<Option<String>>,
}

impl Navigator {
    pub fn new() -> Self {
        let (current, _) = watch::channel(Route::Login);
        Self {
            current,
            history: Mutex::new(Vec::new()),
            notice: Mutex::new(None),
        }
    }

    pub fn current(&self) -> Route {
        self.current.borrow().clone()
    }

    /// Subscribe to route changes.
    pub fn subscribe(&self) -> watch::Receiver<Route> {
        self.current.subscribe()
    }

    pub fn navigate(&self, route: Route) {
        debug!(to = %route.path(), "navigate");
        let previous = self.current.borrow().clone();
        if previous != route {
            self.history
                .lock()
                .unwrap_or_else(|e| e.into_inner())
                .push(previous);
        }
        // send_replace updates the cell even with no subscribers.
        self.current.send_replace(route);
    }

    /// Navigate and leave a message for the destination screen to pick up.
    pub fn navigate_with_notice(&self, route: Route, notice: String) {
        *self.notice.lock().unwrap_or_else(|e| e.into_inner()) = Some(notice);
        self.navigate(route);
    }

    /// Take the pending notice, if any. Reading consumes it.
    pub fn take_notice(&self) -> Option<String> {
        self.notice
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .take()
    }

    /// Pop back to the previous route; stays put when history is empty.
    pub fn back(&self) {
        let previous = self
            .history
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .pop();
        if let Some(route) = previous {
            self.current.send_replace(route);
        }
    }
}

impl Default for Navigator {
    fn default() -> Self {
        Self::new()
    }
}
