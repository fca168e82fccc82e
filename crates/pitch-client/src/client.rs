//! The interceptor chain.
//!
//! Every request to a non-auth endpoint goes through two phases:
//!
//! 1. **Request**: make sure a usable access token is attached, refreshing
//!    first when the stored one is missing or about to expire.
//! 2. **Response**: on a 401, refresh once (or join a refresh already running)
//!    and replay the identical request with the new token.
//!
//! `/auth/*` endpoints bypass both phases.

use std::sync::Arc;

use pitch_auth::{AuthError, LogoutMode, SessionManager, is_auth_endpoint};
use pitch_config::ApiConfig;
use pitch_core::{ApiEnvelope, parse_envelope};
use reqwest::{Client, Method, Request, RequestBuilder, Response, StatusCode, header};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::ClientError;

/// Dashboard API client bound to one session.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
    session: Arc<SessionManager>,
}

fn attach(request: &mut Request, token: Option<&str>) {
    let headers = request.headers_mut();
    headers.remove(header::AUTHORIZATION);
    let Some(token) = token else { return };
    match header::HeaderValue::from_str(&format!("Bearer {token}")) {
        Ok(value) => {
            headers.insert(header::AUTHORIZATION, value);
        }
        Err(error) => tracing::warn!(%error, "stored access token is not a valid header value"),
    }
}

impl ApiClient {
    /// # Errors
    ///
    /// Returns `ClientError::Request` if the HTTP client cannot be built.
    pub fn new(config: &ApiConfig, session: Arc<SessionManager>) -> Result<Self, ClientError> {
        let http = Client::builder()
            .timeout(config.timeout())
            .user_agent(config.user_agent.as_str())
            .build()?;
        Ok(Self::with_client(http, config.base_url(), session))
    }

    #[must_use]
    pub fn with_client(http: Client, base_url: &str, session: Arc<SessionManager>) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            session,
        }
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    #[must_use]
    pub const fn session(&self) -> &Arc<SessionManager> {
        &self.session
    }

    /// Builder for `path` relative to the base URL. Send it with [`Self::execute`].
    #[must_use]
    pub fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.http.request(method, format!("{}{path}", self.base_url))
    }

    /// Send `request` through the interceptor chain.
    ///
    /// Non-401 responses are returned as-is, whatever their status.
    ///
    /// # Errors
    ///
    /// `ClientError::Request` on transport failure, or `ClientError::Auth` when
    /// a 401 triggered a refresh that failed (the session is logged out first).
    pub async fn execute(&self, mut request: Request) -> Result<Response, ClientError> {
        if is_auth_endpoint(request.url().path()) {
            return Ok(self.http.execute(request).await?);
        }

        let replay = request.try_clone();
        let sent = self.authorize().await;
        attach(&mut request, sent.as_deref());

        let response = self.http.execute(request).await?;
        if response.status() != StatusCode::UNAUTHORIZED {
            return Ok(response);
        }
        let Some(mut retry) = replay else {
            tracing::debug!("401 on a streaming request; not replayable");
            return Ok(response);
        };
        let Some(token) = self.recover(sent.as_deref()).await? else {
            return Ok(response);
        };

        tracing::debug!(url = %retry.url(), "replaying request with refreshed token");
        attach(&mut retry, Some(&token));
        Ok(self.http.execute(retry).await?)
    }

    /// Request phase: the token to attach, refreshing first if needed.
    async fn authorize(&self) -> Option<String> {
        let store = self.session.store();
        let coordinator = self.session.coordinator();
        let eligible = coordinator.can_refresh() || coordinator.is_refreshing();

        match store.access_token() {
            None if store.refresh_token().is_none() => None,
            None if eligible => match self.session.refresh_token().await {
                Ok(token) => Some(token),
                Err(AuthError::RateLimited { .. } | AuthError::SessionEnded) => {
                    store.access_token()
                }
                Err(error) => {
                    tracing::warn!(%error, "could not restore session; sending unauthenticated");
                    self.session.logout(LogoutMode::Silent).await;
                    None
                }
            },
            None => None,
            Some(token) if eligible && self.session.is_expiring(&token) => {
                match self.session.refresh_token().await {
                    Ok(fresh) => Some(fresh),
                    Err(AuthError::RateLimited { .. }) => store.access_token().or(Some(token)),
                    Err(AuthError::SessionEnded) => store.access_token(),
                    Err(error) => {
                        tracing::warn!(%error, "proactive refresh failed; sending stale token");
                        self.session.logout(LogoutMode::Silent).await;
                        Some(token)
                    }
                }
            }
            Some(token) => Some(token),
        }
    }

    /// Response phase: a token to replay with, or `None` to pass the 401 through.
    async fn recover(&self, sent: Option<&str>) -> Result<Option<String>, ClientError> {
        let store = self.session.store();
        let newer = store
            .access_token()
            .filter(|current| Some(current.as_str()) != sent && !self.session.is_expiring(current));
        if newer.is_some() {
            // Another request already rotated the pair while this one was in flight.
            return Ok(newer);
        }

        let coordinator = self.session.coordinator();
        let joinable = coordinator.is_refreshing();
        if !joinable && (!coordinator.can_refresh() || store.refresh_token().is_none()) {
            return Ok(None);
        }

        match self.session.refresh_token().await {
            Ok(token) => Ok(Some(token)),
            Err(AuthError::RateLimited { .. } | AuthError::SessionEnded) => Ok(store
                .access_token()
                .filter(|current| Some(current.as_str()) != sent)),
            Err(error) => {
                tracing::warn!(%error, "refresh after 401 failed; logging out");
                self.session.logout(LogoutMode::Expired).await;
                Err(ClientError::Auth(error))
            }
        }
    }

    /// The response body, or the status error it represents.
    async fn body(response: Response) -> Result<Vec<u8>, ClientError> {
        let status = response.status();
        let body = response.bytes().await?.to_vec();
        if !status.is_success() {
            let message = parse_envelope::<serde_json::Value>(&body)
                .ok()
                .and_then(|envelope| envelope.message)
                .or_else(|| {
                    let text = String::from_utf8_lossy(&body).trim().to_string();
                    (!text.is_empty()).then_some(text)
                })
                .unwrap_or_else(|| status.to_string());
            return Err(ClientError::from_status(status, message));
        }
        Ok(body)
    }

    async fn read<T: DeserializeOwned>(response: Response) -> Result<ApiEnvelope<T>, ClientError> {
        let body = Self::body(response).await?;
        Ok(parse_envelope(&body)?)
    }

    async fn send<T: DeserializeOwned>(
        &self,
        builder: RequestBuilder,
    ) -> Result<ApiEnvelope<T>, ClientError> {
        let response = self.execute(builder.build()?).await?;
        Self::read(response).await
    }

    /// `GET path` and unwrap the envelope's `data`.
    ///
    /// # Errors
    ///
    /// Status errors via [`ClientError::from_status`], `Rejected` for
    /// `success: false`, `Malformed` when `data` does not match `T`.
    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        Ok(self.send(self.request(Method::GET, path)).await?.into_data()?)
    }

    /// Send `body` as JSON and unwrap the envelope's `data`.
    ///
    /// # Errors
    ///
    /// See [`Self::get_json`].
    pub async fn send_json<B, T>(&self, method: Method, path: &str, body: &B) -> Result<T, ClientError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let builder = self.request(method, path).json(body);
        Ok(self.send(builder).await?.into_data()?)
    }

    /// Send a request whose response carries no payload.
    ///
    /// # Errors
    ///
    /// See [`Self::get_json`].
    pub async fn send_unit<B>(&self, method: Method, path: &str, body: Option<&B>) -> Result<(), ClientError>
    where
        B: Serialize + ?Sized,
    {
        let mut builder = self.request(method, path);
        if let Some(body) = body {
            builder = builder.json(body);
        }
        let response = self.execute(builder.build()?).await?;
        let body = Self::body(response).await?;
        if body.is_empty() {
            return Ok(());
        }
        Ok(parse_envelope::<serde_json::Value>(&body)?.into_unit()?)
    }
}
