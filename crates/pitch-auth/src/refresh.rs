//! Single-flight token refresh with a start-to-start cooldown.
//!
//! At most one refresh runs at a time. Callers arriving while it runs join the
//! same shared outcome instead of issuing their own network call. A new refresh
//! may only start once `cooldown` has passed since the previous one *started*.
//!
//! The refresh itself runs on a spawned task, so dropping a waiter never
//! cancels it. A drop guard inside that task clears the in-flight slot whether
//! the refresh succeeds, fails, or panics.

use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use futures::FutureExt as _;
use futures::future::{BoxFuture, Shared};
use tokio::time::Instant;

use crate::error::AuthError;

/// Default minimum gap between refresh starts.
pub const DEFAULT_REFRESH_COOLDOWN: Duration = Duration::from_millis(5_000);

type SharedRefresh = Shared<BoxFuture<'static, Result<String, AuthError>>>;

/// Performs one refresh round trip and persists its result, returning the new
/// access token.
#[async_trait]
pub trait Refresher: Send + Sync {
    async fn refresh(&self) -> Result<String, AuthError>;
}

#[derive(Default)]
struct State {
    in_flight: Option<(u64, SharedRefresh)>,
    last_started: Option<Instant>,
    generation: u64,
}

/// Clears the in-flight slot when the refresh task finishes or unwinds.
struct ClearOnDrop {
    state: Arc<Mutex<State>>,
    generation: u64,
}

impl Drop for ClearOnDrop {
    fn drop(&mut self) {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        // A reset() may already have replaced the slot with a newer refresh.
        if state
            .in_flight
            .as_ref()
            .is_some_and(|(generation, _)| *generation == self.generation)
        {
            state.in_flight = None;
        }
    }
}

pub struct RefreshCoordinator {
    state: Arc<Mutex<State>>,
    cooldown: Duration,
}

impl Default for RefreshCoordinator {
    fn default() -> Self {
        Self::new(DEFAULT_REFRESH_COOLDOWN)
    }
}

impl std::fmt::Debug for RefreshCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RefreshCoordinator")
            .field("cooldown", &self.cooldown)
            .field("refreshing", &self.is_refreshing())
            .finish()
    }
}

impl RefreshCoordinator {
    #[must_use]
    pub fn new(cooldown: Duration) -> Self {
        Self {
            state: Arc::new(Mutex::new(State::default())),
            cooldown,
        }
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn remaining(&self, state: &State, now: Instant) -> Option<Duration> {
        let started = state.last_started?;
        let elapsed = now.saturating_duration_since(started);
        (elapsed < self.cooldown).then(|| self.cooldown - elapsed)
    }

    #[must_use]
    pub const fn cooldown(&self) -> Duration {
        self.cooldown
    }

    /// Whether a refresh is currently running.
    #[must_use]
    pub fn is_refreshing(&self) -> bool {
        self.lock().in_flight.is_some()
    }

    /// Time left before a new refresh may start, if any.
    #[must_use]
    pub fn cooldown_remaining(&self) -> Option<Duration> {
        let state = self.lock();
        self.remaining(&state, Instant::now())
    }

    /// True when nothing is in flight and the cooldown has elapsed.
    #[must_use]
    pub fn can_refresh(&self) -> bool {
        let state = self.lock();
        state.in_flight.is_none() && self.remaining(&state, Instant::now()).is_none()
    }

    /// Join the running refresh, or start one through `refresher`.
    ///
    /// # Errors
    ///
    /// `AuthError::RateLimited` if nothing is in flight and the cooldown has not
    /// elapsed; otherwise whatever the refresh itself returned, shared by every
    /// caller that joined it.
    pub async fn refresh_token(&self, refresher: Arc<dyn Refresher>) -> Result<String, AuthError> {
        self.refresh_with(move || async move { refresher.refresh().await })
            .await
    }

    /// Closure form of [`refresh_token`](Self::refresh_token). `start` is only
    /// invoked when this call actually begins a new refresh.
    ///
    /// # Errors
    ///
    /// See [`refresh_token`](Self::refresh_token).
    pub async fn refresh_with<F, Fut>(&self, start: F) -> Result<String, AuthError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<String, AuthError>> + Send + 'static,
    {
        let shared = {
            let mut state = self.lock();
            if let Some((_, running)) = &state.in_flight {
                tracing::debug!("joining in-flight token refresh");
                running.clone()
            } else {
                let now = Instant::now();
                if let Some(retry_in) = self.remaining(&state, now) {
                    tracing::debug!(?retry_in, "token refresh throttled");
                    return Err(AuthError::RateLimited { retry_in });
                }

                state.generation += 1;
                state.last_started = Some(now);
                let guard = ClearOnDrop {
                    state: Arc::clone(&self.state),
                    generation: state.generation,
                };
                let fut = start();
                let handle = tokio::spawn(async move {
                    let _guard = guard;
                    fut.await
                });
                let running: SharedRefresh = async move {
                    handle.await.unwrap_or_else(|e| {
                        Err(AuthError::Transport(format!("refresh task failed: {e}")))
                    })
                }
                .boxed()
                .shared();

                tracing::debug!(generation = state.generation, "token refresh started");
                state.in_flight = Some((state.generation, running.clone()));
                running
            }
        };
        shared.await
    }

    /// Forget the in-flight refresh and the cooldown. Used on logout.
    ///
    /// A refresh that is still running completes for the callers already
    /// waiting on it, but new callers will not join it.
    pub fn reset(&self) {
        let mut state = self.lock();
        state.generation += 1;
        state.in_flight = None;
        state.last_started = None;
    }
}
