//! Route admission.
//!
//! Every route entry runs one of three async predicates before the screen
//! mounts. A predicate never errors out to the router: every failure folds
//! into a deny-with-redirect, and any navigation it implies has already
//! happened by the time it returns.

use tracing::debug;

use ripple_core::token;

use crate::routes::{Navigator, Route};
use crate::session::Session;

/// Outcome of a route-entry decision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Admission {
    Allow,
    Redirect(Route),
}

impl Admission {
    pub fn allowed(&self) -> bool {
        matches!(self, Self::Allow)
    }
}

/// Gate for routes that require a signed-in user.
///
/// Order matters: a missing token denies immediately, an expired one logs
/// out without touching the network, and only then is the identity resolved
/// if a reload emptied the session.
pub async fn authenticated(session: &Session, navigator: &Navigator) -> Admission {
    let Some(stored) = raw_token(session) else {
        navigator.navigate(Route::Login);
        return Admission::Redirect(Route::Login);
    };

    if token::is_expired(&stored) {
        debug!("stored token expired; logging out");
        session.logout();
        return Admission::Redirect(Route::Login);
    }

    if session.current_user().is_some() {
        return Admission::Allow;
    }

    match session.resolve_identity().await {
        Ok(_) => Admission::Allow,
        Err(err) => {
            debug!("identity resolution failed during admission: {err}");
            session.logout();
            Admission::Redirect(Route::Login)
        }
    }
}

/// Gate for the auth-entry pages: a signed-in user does not get to see the
/// login form again, but a stale credential must not lock them out of it.
pub async fn guest_only(session: &Session, navigator: &Navigator) -> Admission {
    match raw_token(session) {
        None => Admission::Allow,
        Some(stored) if token::is_expired(&stored) => Admission::Allow,
        Some(_) => {
            navigator.navigate(Route::Home);
            Admission::Redirect(Route::Home)
        }
    }
}

/// Gate for the admin console. Composes after [`authenticated`], which also
/// covers the cold-load case: the role check only runs once the identity is
/// actually resolved, so an admin reloading the dashboard is not bounced to
/// home just because the user record has not arrived yet.
pub async fn admin_only(session: &Session, navigator: &Navigator) -> Admission {
    match authenticated(session, navigator).await {
        Admission::Allow => {}
        deny => return deny,
    }

    // authenticated() leaves a resolved user behind; resolve once more only
    // if something cleared it in between.
    let user = match session.current_user() {
        Some(user) => Some(user),
        None => session.resolve_identity().await.ok(),
    };

    match user {
        Some(user) if user.is_admin() => Admission::Allow,
        _ => {
            navigator.navigate(Route::Home);
            Admission::Redirect(Route::Home)
        }
    }
}

/// Apply the route table's guard for `route`.
pub async fn admit(route: &Route, session: &Session, navigator: &Navigator) -> Admission {
    match route {
        Route::Login | Route::Register => guest_only(session, navigator).await,
        Route::AdminDashboard => admin_only(session, navigator).await,
        Route::Home
        | Route::ProfileSelf
        | Route::Profile(_)
        | Route::PostCreate
        | Route::PostDetail(_) => authenticated(session, navigator).await,
    }
}

/// The persisted token without the expiry filter — admission distinguishes
/// "absent" from "present but stale".
fn raw_token(session: &Session) -> Option<String> {
    session.raw_stored_token()
}
