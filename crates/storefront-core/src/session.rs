//! Session store: the single owner of the authenticated identity.
//!
//! The in-memory value lives in a `watch` channel so that route decisions can
//! be re-evaluated as soon as the session changes. Every write is mirrored to
//! the blob store before the new value is published.

use std::sync::Arc;

use anyhow::{Context, Result};
use storefront_types::Session;
use tokio::sync::watch;
use tracing::{info, warn};

use crate::blob::BlobStore;

/// Blob key holding the serialized session.
pub const SESSION_KEY: &str = "user";

/// Shared handle passed to every component that reads or writes the session.
pub type SessionHandle = Arc<SessionStore>;

pub struct SessionStore {
    blob: Arc<dyn BlobStore>,
    current: watch::Sender<Option<Session>>,
}

impl SessionStore {
    /// Opens the store, restoring a previously persisted session if one is
    /// present and readable.
    pub fn open(blob: Arc<dyn BlobStore>) -> Self {
        let restored = restore(blob.as_ref());
        let (current, _) = watch::channel(restored);
        Self { blob, current }
    }

    /// Opens the store and wraps it in a shareable handle.
    pub fn handle(blob: Arc<dyn BlobStore>) -> SessionHandle {
        Arc::new(Self::open(blob))
    }

    pub fn get(&self) -> Option<Session> {
        self.current.borrow().clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.current.borrow().is_some()
    }

    /// Persists and publishes a new session.
    ///
    /// # Errors
    /// Returns an error if the session cannot be written to the blob store;
    /// the in-memory value is left unchanged in that case.
    pub fn set(&self, session: Session) -> Result<()> {
        let serialized = serde_json::to_string(&session).context("Failed to serialize session")?;
        self.blob
            .put(SESSION_KEY, &serialized)
            .context("Failed to persist session")?;
        self.current.send_replace(Some(session));
        info!("session stored");
        Ok(())
    }

    /// Deletes the persisted session and publishes "no session".
    ///
    /// Never fails. If the record cannot be deleted it is overwritten with
    /// `null`, which reads back as "no session"; remaining errors are logged
    /// and the in-memory session is cleared regardless.
    pub fn clear(&self) {
        if let Err(err) = self.blob.remove(SESSION_KEY) {
            warn!(error = %format!("{err:#}"), "failed to delete persisted session");
            if let Err(err) = self.blob.put(SESSION_KEY, "null") {
                warn!(error = %format!("{err:#}"), "failed to blank persisted session");
            }
        }
        self.current.send_replace(None);
        info!("session cleared");
    }

    /// Subscribes to session changes.
    pub fn subscribe(&self) -> watch::Receiver<Option<Session>> {
        self.current.subscribe()
    }
}

fn restore(blob: &dyn BlobStore) -> Option<Session> {
    let raw = match blob.get(SESSION_KEY) {
        Ok(Some(raw)) => raw,
        Ok(None) => return None,
        Err(err) => {
            warn!(error = %format!("{err:#}"), "failed to read persisted session");
            return None;
        }
    };

    match serde_json::from_str::<Option<Session>>(&raw) {
        Ok(Some(session)) if !session.access_token.trim().is_empty() => Some(session),
        Ok(None) => None,
        Ok(Some(_)) => {
            warn!("persisted session has no access token; starting signed out");
            None
        }
        Err(err) => {
            warn!(error = %err, "persisted session is malformed; starting signed out");
            None
        }
    }
}
