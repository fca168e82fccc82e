//! Session lifecycle: bootstrap from storage, login, refresh, and logout.
//!
//! [`SessionManager`] is built once per process and shared by `Arc`. It owns
//! the only [`RefreshCoordinator`], so every refresh (proactive or after a
//! 401) goes through the same single-flight slot.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use pitch_config::PitchConfig;
use pitch_core::CachedUser;
use tokio::sync::broadcast;

use crate::api::{AuthApi, AuthPayload, HttpAuthApi, LoginRequest, RegisterRequest};
use crate::claims;
use crate::error::AuthError;
use crate::refresh::{RefreshCoordinator, Refresher};
use crate::token_store::{self, CredentialStore, StoreTtl, TokenStore};

const EVENT_CAPACITY: usize = 16;

/// What the process currently believes about the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    Anonymous,
    /// Only a refresh token survived; the next request will try to refresh.
    Restoring,
    Authenticated { user: Option<CachedUser> },
}

impl SessionState {
    #[must_use]
    pub const fn is_anonymous(&self) -> bool {
        matches!(self, Self::Anonymous)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    LoggedIn { user: Option<CachedUser> },
    Refreshed,
    LoggedOut { redirect: bool },
}

/// How a logout was triggered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogoutMode {
    /// The user asked to log out. The refresh token is revoked server-side.
    UserInitiated,
    /// A refresh after a 401 failed. The user must sign in again.
    Expired,
    /// A proactive refresh failed before a request was sent. The request
    /// continues unauthenticated and nobody is sent to the login screen.
    Silent,
}

impl LogoutMode {
    #[must_use]
    pub const fn revokes(self) -> bool {
        matches!(self, Self::UserInitiated)
    }

    #[must_use]
    pub const fn redirects(self) -> bool {
        !matches!(self, Self::Silent)
    }
}

type LogoutHook = Box<dyn Fn(LogoutMode) + Send + Sync>;

/// Shared by the manager and the refresh task it spawns.
struct SessionCore {
    api: Arc<dyn AuthApi>,
    store: CredentialStore,
    state: Mutex<SessionState>,
    /// Bumped on every login and logout. A refresh started under an older
    /// epoch must not write its rotated pair.
    epoch: Mutex<u64>,
    events: broadcast::Sender<SessionEvent>,
}

impl SessionCore {
    fn state(&self) -> MutexGuard<'_, SessionState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn set_state(&self, next: SessionState) {
        *self.state() = next;
    }

    fn epoch(&self) -> MutexGuard<'_, u64> {
        self.epoch.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Start a new epoch and run `f` while holding it, so no refresh from the
    /// previous epoch can persist in between.
    fn advance<R>(&self, f: impl FnOnce() -> R) -> R {
        let mut epoch = self.epoch();
        *epoch = epoch.wrapping_add(1);
        f()
    }

    fn emit(&self, event: SessionEvent) {
        // No receivers is fine.
        let _ = self.events.send(event);
    }

    fn persist(&self, payload: &AuthPayload) -> Result<(), AuthError> {
        self.store.save_credentials(&payload.credentials)?;
        match &payload.user {
            Some(user) => {
                if let Err(error) = self.store.save_user(user) {
                    tracing::warn!(%error, "failed to cache user");
                }
            }
            None => self.store.clear_user(),
        }
        Ok(())
    }
}

#[async_trait]
impl Refresher for SessionCore {
    /// One rotation: exchange the stored refresh token and persist the new pair.
    /// Failure leaves storage alone; the caller decides whether to log out.
    async fn refresh(&self) -> Result<String, AuthError> {
        let started = *self.epoch();
        let refresh_token = self.store.refresh_token().ok_or(AuthError::NoRefreshToken)?;
        let payload = self.api.refresh(&refresh_token).await?;

        {
            let epoch = self.epoch();
            if *epoch != started {
                tracing::info!("session changed during refresh; discarding rotated tokens");
                return Err(AuthError::SessionEnded);
            }
            self.store.save_credentials(&payload.credentials)?;
            let user = match &payload.user {
                Some(user) => {
                    if let Err(error) = self.store.save_user(user) {
                        tracing::warn!(%error, "failed to cache user after refresh");
                    }
                    Some(user.clone())
                }
                None => self.store.cached_user(),
            };
            self.set_state(SessionState::Authenticated { user });
        }

        self.emit(SessionEvent::Refreshed);
        tracing::info!("access token refreshed");
        Ok(payload.credentials.access_token)
    }
}

pub struct SessionManager {
    core: Arc<SessionCore>,
    coordinator: RefreshCoordinator,
    hooks: Mutex<Vec<LogoutHook>>,
    expiry_margin: Duration,
}

impl std::fmt::Debug for SessionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionManager")
            .field("state", &self.state())
            .field("coordinator", &self.coordinator)
            .field("expiry_margin", &self.expiry_margin)
            .finish_non_exhaustive()
    }
}

impl SessionManager {
    #[must_use]
    pub fn new(
        api: Arc<dyn AuthApi>,
        store: CredentialStore,
        coordinator: RefreshCoordinator,
        expiry_margin: Duration,
    ) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            core: Arc::new(SessionCore {
                api,
                store,
                state: Mutex::new(SessionState::Anonymous),
                epoch: Mutex::new(0),
                events,
            }),
            coordinator,
            hooks: Mutex::new(Vec::new()),
            expiry_margin,
        }
    }

    /// Wire the HTTP backend and the configured store, then [`bootstrap`](Self::bootstrap).
    ///
    /// # Errors
    ///
    /// Returns `AuthError` if the store backend or HTTP client cannot be built.
    pub fn from_config(config: &PitchConfig) -> Result<Self, AuthError> {
        let api = Arc::new(HttpAuthApi::new(&config.api)?);
        let backend = token_store::from_config(config)?;
        let manager = Self::with_store(api, backend, config);
        manager.bootstrap();
        Ok(manager)
    }

    #[must_use]
    pub fn with_store(
        api: Arc<dyn AuthApi>,
        backend: Arc<dyn TokenStore>,
        config: &PitchConfig,
    ) -> Self {
        Self::new(
            api,
            CredentialStore::new(backend, StoreTtl::from(&config.session)),
            RefreshCoordinator::new(config.session.refresh_cooldown()),
            config.session.expiry_margin(),
        )
    }

    /// Hydrate the in-memory state from storage. No network I/O.
    pub fn bootstrap(&self) -> SessionState {
        let store = &self.core.store;
        let state = if store.access_token().is_some() {
            SessionState::Authenticated {
                user: store.cached_user(),
            }
        } else if store.refresh_token().is_some() {
            SessionState::Restoring
        } else {
            // A user snapshot without tokens belongs to nobody.
            store.clear_user();
            SessionState::Anonymous
        };
        tracing::debug!(?state, "session bootstrapped");
        self.core.set_state(state.clone());
        state
    }

    #[must_use]
    pub fn state(&self) -> SessionState {
        self.core.state().clone()
    }

    #[must_use]
    pub fn store(&self) -> &CredentialStore {
        &self.core.store
    }

    #[must_use]
    pub const fn coordinator(&self) -> &RefreshCoordinator {
        &self.coordinator
    }

    #[must_use]
    pub fn current_user(&self) -> Option<CachedUser> {
        match self.state() {
            SessionState::Authenticated { user } => user,
            _ => None,
        }
    }

    /// Whether `token` should be refreshed before use.
    #[must_use]
    pub fn is_expiring(&self, token: &str) -> bool {
        claims::is_expiring_within(token, self.expiry_margin, chrono::Utc::now())
    }

    /// # Errors
    ///
    /// `InvalidCredentials`, `TwoFactorRequired`, or any transport/backend error.
    pub async fn login(&self, request: &LoginRequest) -> Result<Option<CachedUser>, AuthError> {
        let payload = self.core.api.login(request).await?;
        self.establish(payload)
    }

    /// # Errors
    ///
    /// Any transport, backend, or storage error.
    pub async fn register(
        &self,
        request: &RegisterRequest,
    ) -> Result<Option<CachedUser>, AuthError> {
        let payload = self.core.api.register(request).await?;
        self.establish(payload)
    }

    fn establish(&self, payload: AuthPayload) -> Result<Option<CachedUser>, AuthError> {
        let user = payload.user.clone();
        self.core.advance(|| {
            self.core.persist(&payload)?;
            self.core
                .set_state(SessionState::Authenticated { user: user.clone() });
            Ok::<_, AuthError>(())
        })?;
        self.coordinator.reset();
        self.core.emit(SessionEvent::LoggedIn { user: user.clone() });
        tracing::info!(
            user = user.as_ref().map_or("<unknown>", |u| u.username.as_str()),
            "logged in"
        );
        Ok(user)
    }

    /// Refresh through the shared coordinator and return the new access token.
    ///
    /// # Errors
    ///
    /// `RateLimited` inside the cooldown, `NoRefreshToken` when nothing is
    /// stored, or whatever the backend round trip produced.
    pub async fn refresh_token(&self) -> Result<String, AuthError> {
        let core: Arc<dyn Refresher> = self.core.clone();
        self.coordinator.refresh_token(core).await
    }

    /// Tear the session down.
    ///
    /// Storage is cleared and the coordinator reset in every mode. Logout hooks
    /// and the `LoggedOut` event fire once per session: a second logout of an
    /// already anonymous session is a no-op for observers.
    pub async fn logout(&self, mode: LogoutMode) {
        if mode.revokes() {
            if let Some(refresh_token) = self.core.store.refresh_token() {
                if let Err(error) = self.core.api.revoke(&refresh_token).await {
                    tracing::warn!(%error, "refresh token revoke failed; clearing locally");
                }
            }
        }
        self.teardown(mode);
    }

    /// Revoke every session of this user on the server, then log out locally.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::NotAuthenticated` if there is no access token to
    /// authorize the call, or the backend error. Local state is cleared either way.
    pub async fn revoke_all(&self) -> Result<(), AuthError> {
        let result = match self.core.store.access_token() {
            Some(access_token) => self.core.api.revoke_all(&access_token).await,
            None => Err(AuthError::NotAuthenticated),
        };
        if let Err(error) = &result {
            tracing::warn!(%error, "revoke-all failed; clearing locally");
        }
        self.teardown(LogoutMode::UserInitiated);
        result
    }

    fn teardown(&self, mode: LogoutMode) {
        let had_session = self.core.advance(|| {
            let had_session =
                !self.core.state().is_anonymous() || self.core.store.has_session();
            self.core.store.clear_session();
            self.core.set_state(SessionState::Anonymous);
            had_session
        });
        self.coordinator.reset();

        if !had_session {
            tracing::debug!(?mode, "logout on an anonymous session");
            return;
        }
        tracing::info!(?mode, "logged out");
        self.core.emit(SessionEvent::LoggedOut {
            redirect: mode.redirects(),
        });
        let hooks = self.hooks.lock().unwrap_or_else(PoisonError::into_inner);
        for hook in hooks.iter() {
            hook(mode);
        }
    }

    /// Register a callback run synchronously on every logout.
    pub fn on_logout(&self, hook: impl Fn(LogoutMode) + Send + Sync + 'static) {
        self.hooks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(Box::new(hook));
    }

    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.core.events.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token_store::MemoryStore;
    use pitch_core::CredentialPair;

    struct NoBackend;

    #[async_trait]
    impl AuthApi for NoBackend {
        async fn login(&self, _: &LoginRequest) -> Result<AuthPayload, AuthError> {
            Err(AuthError::Transport("offline".into()))
        }
        async fn register(&self, _: &RegisterRequest) -> Result<AuthPayload, AuthError> {
            Err(AuthError::Transport("offline".into()))
        }
        async fn refresh(&self, _: &str) -> Result<AuthPayload, AuthError> {
            Err(AuthError::Transport("offline".into()))
        }
        async fn revoke(&self, _: &str) -> Result<(), AuthError> {
            Err(AuthError::Transport("offline".into()))
        }
        async fn revoke_all(&self, _: &str) -> Result<(), AuthError> {
            Err(AuthError::Transport("offline".into()))
        }
    }

    fn manager() -> SessionManager {
        SessionManager::with_store(
            Arc::new(NoBackend),
            Arc::new(MemoryStore::new()),
            &PitchConfig::default(),
        )
    }

    #[test]
    fn modes() {
        assert!(LogoutMode::UserInitiated.revokes());
        assert!(!LogoutMode::Expired.revokes());
        assert!(LogoutMode::Expired.redirects());
        assert!(!LogoutMode::Silent.redirects());
    }

    #[test]
    fn bootstrap_empty_store_is_anonymous() {
        assert_eq!(manager().bootstrap(), SessionState::Anonymous);
    }

    #[test]
    fn bootstrap_with_only_refresh_token_is_restoring() {
        let session = manager();
        session
            .store()
            .save_credentials(&CredentialPair::new(
                claims::make_jwt_with_exp(0),
                "rt",
            ))
            .expect("save");
        assert_eq!(session.bootstrap(), SessionState::Restoring);
    }

    #[test]
    fn orphan_user_is_dropped_on_bootstrap() {
        let session = manager();
        session
            .store()
            .save_user(&CachedUser {
                id: "1".into(),
                username: "ghost".into(),
                email: "ghost@club.test".into(),
                display_name: None,
                role: pitch_core::UserRole::User,
            })
            .expect("save user");

        assert_eq!(session.bootstrap(), SessionState::Anonymous);
        assert!(session.store().cached_user().is_none());
    }

    #[tokio::test]
    async fn refresh_without_token_fails_fast() {
        let session = manager();
        let err = session.refresh_token().await.expect_err("nothing stored");
        assert_eq!(err, AuthError::NoRefreshToken);
    }
}
