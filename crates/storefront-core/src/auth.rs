//! Auth gateway: login/logout against the identity endpoint.
//!
//! Login and logout write only through the session store and hand back the
//! view to navigate to; they never hold a copy of the session themselves.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use storefront_types::{Session, View};
use tracing::{info, warn};

use crate::api::ApiClient;
use crate::session::SessionHandle;

/// Login failure. Rejected credentials and unreachable endpoints are not
/// distinguished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthError {
    InvalidCredentials,
    /// Another login is still pending.
    LoginInProgress,
}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthError::InvalidCredentials => write!(f, "Login failed"),
            AuthError::LoginInProgress => write!(f, "Login already in progress"),
        }
    }
}

impl std::error::Error for AuthError {}

/// Navigation side effect requested by an auth operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Navigate(pub View);

#[derive(Clone)]
pub struct AuthGateway {
    session: SessionHandle,
    api: ApiClient,
    in_flight: Arc<AtomicBool>,
}

impl AuthGateway {
    pub fn new(session: SessionHandle, api: ApiClient) -> Self {
        Self {
            session,
            api,
            in_flight: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Whether a login call is currently pending.
    pub fn is_logging_in(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Authenticates and stores the returned identity.
    ///
    /// # Errors
    /// - [`AuthError::LoginInProgress`] if another login is pending.
    /// - [`AuthError::InvalidCredentials`] for blank input, any transport or
    ///   status failure, a response without a token, or a session that could
    ///   not be persisted. The session store is untouched in every case.
    pub async fn login(&self, username: &str, password: &str) -> Result<Navigate, AuthError> {
        let _guard = LoginGuard::acquire(&self.in_flight)?;

        if username.trim().is_empty() || password.is_empty() {
            warn!("login rejected: missing username or password");
            return Err(AuthError::InvalidCredentials);
        }

        let body = self.api.login(username.trim(), password).await.map_err(|err| {
            warn!(error = %err, "login request failed");
            AuthError::InvalidCredentials
        })?;

        let session = Session::from_login_response(body).ok_or_else(|| {
            warn!("login response carried no access token");
            AuthError::InvalidCredentials
        })?;

        self.session.set(session).map_err(|err| {
            warn!(error = %format!("{err:#}"), "could not store session");
            AuthError::InvalidCredentials
        })?;

        info!("login succeeded");
        Ok(Navigate(View::Catalog))
    }

    /// Clears the session. Never fails.
    pub fn logout(&self) -> Navigate {
        self.session.clear();
        info!("logged out");
        Navigate(View::Login)
    }
}

/// Marks a login as in flight for as long as it is alive.
struct LoginGuard<'a> {
    flag: &'a AtomicBool,
}

impl<'a> LoginGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Result<Self, AuthError> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_already_set| AuthError::LoginInProgress)?;
        Ok(Self { flag })
    }
}

impl Drop for LoginGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}
