//! Route guard and navigator.

use storefront_types::{Session, View};
use tokio::sync::watch;
use tracing::debug;

use crate::session::SessionStore;

/// Outcome of gating a navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteDecision {
    /// Render the requested view.
    Allow(View),
    /// Render this view instead.
    Redirect(View),
}

impl RouteDecision {
    /// The view that ends up rendered.
    pub fn view(self) -> View {
        match self {
            RouteDecision::Allow(view) | RouteDecision::Redirect(view) => view,
        }
    }

    pub fn is_redirect(self) -> bool {
        matches!(self, RouteDecision::Redirect(_))
    }
}

/// Decides whether `requested` may be shown for the given session.
///
/// - protected view without a session → login
/// - login view with a session → catalog
/// - anything else → allowed
pub fn route_guard(session: Option<&Session>, requested: View) -> RouteDecision {
    match (requested, session) {
        (view, None) if view.is_protected() => RouteDecision::Redirect(View::Login),
        (View::Login, Some(_)) => RouteDecision::Redirect(View::Catalog),
        (view, _) => RouteDecision::Allow(view),
    }
}

/// Resolves a path to a view and gates it. Unknown paths go to login, which
/// in turn forwards to the catalog when signed in.
pub fn resolve_path(session: Option<&Session>, path: &str) -> RouteDecision {
    match View::from_path(path) {
        Some(view) => route_guard(session, view),
        None => RouteDecision::Redirect(route_guard(session, View::Login).view()),
    }
}

/// Tracks the rendered view and follows session changes.
#[derive(Debug)]
pub struct Navigator {
    current: View,
    session: watch::Receiver<Option<Session>>,
}

impl Navigator {
    /// Starts on the view the guard picks for the login path.
    pub fn new(store: &SessionStore) -> Self {
        let session = store.subscribe();
        let current = route_guard(session.borrow().as_ref(), View::Login).view();
        Self { current, session }
    }

    pub fn current(&self) -> View {
        self.current
    }

    /// Navigates to `path`, applying the guard.
    pub fn navigate(&mut self, path: &str) -> RouteDecision {
        let decision = {
            let session = self.session.borrow_and_update();
            resolve_path(session.as_ref(), path)
        };
        debug!(path, ?decision, "navigate");
        self.current = decision.view();
        decision
    }

    /// Navigates to `view`, applying the guard.
    pub fn go(&mut self, view: View) -> RouteDecision {
        self.navigate(view.path())
    }

    /// Re-evaluates the current view if the session changed since the last
    /// navigation. Returns the decision only when it moves the view.
    pub fn sync(&mut self) -> Option<RouteDecision> {
        if !self.session.has_changed().unwrap_or(false) {
            return None;
        }
        let decision = {
            let session = self.session.borrow_and_update();
            route_guard(session.as_ref(), self.current)
        };
        if decision.view() == self.current {
            return None;
        }
        debug!(from = %self.current, ?decision, "session change moved view");
        self.current = decision.view();
        Some(decision)
    }
}
