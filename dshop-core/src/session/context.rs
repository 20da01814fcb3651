//! Shared auth context with change notification.
//!
//! `AuthContext` wraps the current [`Session`] behind `Arc<RwLock<_>>` and
//! keeps a version counter on a `watch` channel so views can react to
//! login and logout without polling.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use dshop_sdk::client::{AdminClient, ShopClient};
use dshop_sdk::objects::User;
use tokio::sync::{RwLock, watch};
use tracing::{info, warn};

use super::storage::SessionStorage;
use super::{Session, SessionError};
use crate::validation::{LoginForm, RegisterForm};

/// Process-wide authentication state, passed explicitly to the components
/// that need it. Cloning is cheap and shares the same state.
pub struct AuthContext {
    inner: Arc<AuthContextInner>,
}

struct AuthContextInner {
    session: RwLock<Option<Session>>,
    storage: Box<dyn SessionStorage>,
    client: ShopClient,
    version: AtomicU64,
    version_tx: watch::Sender<u64>,
}

/// Receives a notification whenever the user logs in or out.
pub struct SessionWatcher {
    version_rx: watch::Receiver<u64>,
}

impl AuthContext {
    /// Initialise from persisted storage.
    ///
    /// `client` is the anonymous API client; authenticated copies are
    /// derived from it with [`client`](Self::client).
    pub async fn load(
        client: ShopClient,
        storage: impl SessionStorage + 'static,
    ) -> Result<Self, SessionError> {
        let session = match storage.load().await {
            Ok(session) => session,
            Err(SessionError::Corrupt(e)) => {
                warn!(error = %e, "Discarding unreadable session");
                storage.clear().await?;
                None
            }
            Err(e) => return Err(e),
        };
        let (version_tx, _) = watch::channel(0u64);
        Ok(Self {
            inner: Arc::new(AuthContextInner {
                session: RwLock::new(session),
                storage: Box::new(storage),
                client: client.without_token(),
                version: AtomicU64::new(0),
                version_tx,
            }),
        })
    }

    /// Validate the form, exchange the credentials for a token and persist
    /// the new session.
    pub async fn login(&self, form: &LoginForm) -> Result<Session, SessionError> {
        let credentials = form.validate()?;
        let response = self.inner.client.login(&credentials).await?;
        let session = Session {
            token: response.token,
            email: credentials.email,
            user: response.user,
        };
        self.replace(Some(session.clone())).await?;
        info!(email = %session.email, "Logged in");
        Ok(session)
    }

    /// Validate the form and create the account. When the backend does not
    /// hand back a token the new credentials are used to log in.
    pub async fn register(&self, form: &RegisterForm) -> Result<Session, SessionError> {
        let payload = form.validate()?;
        let response = self.inner.client.register(&payload).await?;
        match response.token {
            Some(token) => {
                let session = Session {
                    token,
                    email: payload.email,
                    user: response.user,
                };
                self.replace(Some(session.clone())).await?;
                info!(email = %session.email, "Registered and logged in");
                Ok(session)
            }
            None => self.login(&form.login_form()).await,
        }
    }

    /// Forget the session, in memory and in storage.
    pub async fn logout(&self) -> Result<(), SessionError> {
        self.replace(None).await?;
        info!("Logged out");
        Ok(())
    }

    pub async fn current(&self) -> Option<Session> {
        self.inner.session.read().await.clone()
    }

    pub async fn user(&self) -> Option<User> {
        self.inner
            .session
            .read()
            .await
            .as_ref()
            .and_then(|s| s.user.clone())
    }

    pub async fn is_authenticated(&self) -> bool {
        self.inner.session.read().await.is_some()
    }

    pub async fn is_admin(&self) -> bool {
        self.inner
            .session
            .read()
            .await
            .as_ref()
            .is_some_and(Session::is_admin)
    }

    /// The session, or [`SessionError::NotAuthenticated`].
    pub async fn require(&self) -> Result<Session, SessionError> {
        self.current().await.ok_or(SessionError::NotAuthenticated)
    }

    /// An API client carrying the bearer token when one is present.
    pub async fn client(&self) -> ShopClient {
        match self.inner.session.read().await.as_ref() {
            Some(session) => self.inner.client.clone().with_token(&session.token),
            None => self.inner.client.clone(),
        }
    }

    /// An admin API client. Requires a signed-in administrator.
    pub async fn admin_client(&self) -> Result<AdminClient, SessionError> {
        let session = self.require().await?;
        if !session.is_admin() {
            return Err(SessionError::NotAdmin);
        }
        let shop = self.inner.client.clone().with_token(session.token);
        Ok(AdminClient::from_shop(&shop)?)
    }

    /// Subscribe to login/logout notifications.
    pub fn subscribe(&self) -> SessionWatcher {
        SessionWatcher {
            version_rx: self.inner.version_tx.subscribe(),
        }
    }

    async fn replace(&self, session: Option<Session>) -> Result<(), SessionError> {
        match &session {
            Some(s) => self.inner.storage.save(s).await?,
            None => self.inner.storage.clear().await?,
        }
        let mut guard = self.inner.session.write().await;
        *guard = session;
        let new_version = self.inner.version.fetch_add(1, Ordering::Relaxed) + 1;
        // Release the lock first; watchers read the session right away.
        drop(guard);
        let _ = self.inner.version_tx.send(new_version);
        Ok(())
    }
}

impl Clone for AuthContext {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl SessionWatcher {
    /// Wait until the session changes.
    ///
    /// Returns `Err` once every [`AuthContext`] clone has been dropped.
    pub async fn changed(&mut self) -> Result<(), watch::error::RecvError> {
        self.version_rx.changed().await
    }
}
