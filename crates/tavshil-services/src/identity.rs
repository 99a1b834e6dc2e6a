//! # Identity
//!
//! The consumed contract of the external auth collaborator.
//!
//! Tavshil never implements login; it only asks "who is this?" and reacts.
//! [`IdentityProvider`] is that seam. [`Session`] keeps the latest answer
//! in shared state, refreshed by an explicit polling task (the original
//! re-fetched the current user on an ambient 30-second timer; here the
//! task is owned and can be shut down).

use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tokio::sync::RwLock;
use tracing::debug;

use crate::refresh::{spawn_refresh, RefreshHandle};
use tavshil_core::UserRole;

// =============================================================================
// Identity
// =============================================================================

/// The authenticated principal as the auth collaborator reports it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub email: String,
    pub full_name: Option<String>,
    pub phone: Option<String>,
    pub role: UserRole,
}

/// Errors from the auth collaborator.
#[derive(Debug, Error)]
pub enum AuthError {
    /// No current session; the view layer redirects to login.
    #[error("not authenticated")]
    Unauthenticated,

    /// The collaborator itself failed.
    #[error("auth service unavailable: {0}")]
    Unavailable(String),
}

/// The auth collaborator's read side.
///
/// Implementations wrap whatever hosted service the deployment uses;
/// [`StaticIdentityProvider`] serves tests.
pub trait IdentityProvider: Send + Sync + 'static {
    /// Returns the current identity, or fails when unauthenticated.
    fn me(&self) -> impl std::future::Future<Output = Result<Identity, AuthError>> + Send;
}

/// Fixed-answer provider for tests and local tooling.
#[derive(Debug, Clone)]
pub struct StaticIdentityProvider {
    identity: Option<Identity>,
}

impl StaticIdentityProvider {
    /// Always answers with the given identity.
    pub fn logged_in(identity: Identity) -> Self {
        StaticIdentityProvider {
            identity: Some(identity),
        }
    }

    /// Always answers `Unauthenticated`.
    pub fn logged_out() -> Self {
        StaticIdentityProvider { identity: None }
    }
}

impl IdentityProvider for StaticIdentityProvider {
    async fn me(&self) -> Result<Identity, AuthError> {
        self.identity.clone().ok_or(AuthError::Unauthenticated)
    }
}

// =============================================================================
// Session
// =============================================================================

/// Shared view of the most recent `me()` answer.
///
/// `None` means logged out (or the collaborator failing closed, matching
/// the platform's silent-fallback error posture).
#[derive(Debug, Clone, Default)]
pub struct Session {
    current: Arc<RwLock<Option<Identity>>>,
}

impl Session {
    /// The latest known identity.
    pub async fn current(&self) -> Option<Identity> {
        self.current.read().await.clone()
    }

    /// Whether anyone is signed in as of the last refresh.
    pub async fn is_authenticated(&self) -> bool {
        self.current.read().await.is_some()
    }

    async fn store(&self, identity: Option<Identity>) {
        *self.current.write().await = identity;
    }
}

/// Spawns the session refresh task: asks the provider immediately, then
/// on every tick, and exposes the rolling answer through [`Session`].
///
/// Dropping the handle does not stop the task; call
/// [`RefreshHandle::shutdown`] when the session scope ends.
pub fn spawn_session_refresh<P: IdentityProvider>(
    provider: Arc<P>,
    period: Duration,
) -> (Session, RefreshHandle) {
    let session = Session::default();
    let shared = session.clone();

    let handle = spawn_refresh("session", period, move || {
        let provider = provider.clone();
        let shared = shared.clone();
        async move {
            match provider.me().await {
                Ok(identity) => {
                    debug!(email = %identity.email, "Session refreshed");
                    shared.store(Some(identity)).await;
                }
                Err(AuthError::Unauthenticated) => shared.store(None).await,
                Err(AuthError::Unavailable(reason)) => {
                    // Keep the last known identity; the collaborator may recover
                    debug!(%reason, "Auth collaborator unavailable, keeping cached session");
                }
            }
        }
    });

    (session, handle)
}

// =============================================================================
// Unit Tests
// =============================================================================
