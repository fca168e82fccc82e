//! Bindings for the backend's `/auth/*` endpoints.

use std::fmt;

use async_trait::async_trait;
use pitch_config::ApiConfig;
use pitch_core::{CachedUser, CredentialPair, parse_envelope};
use reqwest::{Client, StatusCode, header};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::AuthError;

pub const LOGIN_PATH: &str = "/auth/login";
pub const REGISTER_PATH: &str = "/auth/register";
pub const REFRESH_PATH: &str = "/auth/refresh-token";
pub const REVOKE_PATH: &str = "/auth/revoke-token";
pub const REVOKE_ALL_PATH: &str = "/auth/revoke-all-tokens";

/// Endpoints that manage the session themselves and must never be intercepted.
pub const AUTH_ENDPOINTS: [&str; 5] = [
    LOGIN_PATH,
    REGISTER_PATH,
    REFRESH_PATH,
    REVOKE_PATH,
    REVOKE_ALL_PATH,
];

#[derive(Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub two_factor_code: Option<String>,
}

impl fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginRequest")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("two_factor_code", &self.two_factor_code.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

#[derive(Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
}

impl fmt::Debug for RegisterRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisterRequest")
            .field("username", &self.username)
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .field("display_name", &self.display_name)
            .finish()
    }
}

/// Tokens and user returned by login, register, and refresh.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthPayload {
    pub credentials: CredentialPair,
    pub user: Option<CachedUser>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct TokenData {
    #[serde(default, alias = "token")]
    access_token: Option<String>,
    #[serde(default)]
    refresh_token: Option<String>,
    #[serde(default)]
    user: Option<CachedUser>,
    #[serde(default)]
    requires_two_factor: bool,
}

impl TokenData {
    fn into_payload(self) -> Result<AuthPayload, AuthError> {
        match (self.access_token, self.refresh_token) {
            (Some(access), Some(refresh)) if !access.is_empty() && !refresh.is_empty() => {
                Ok(AuthPayload {
                    credentials: CredentialPair::new(access, refresh),
                    user: self.user,
                })
            }
            _ if self.requires_two_factor => Err(AuthError::TwoFactorRequired),
            _ => Err(AuthError::MalformedResponse(
                "auth response is missing accessToken or refreshToken".into(),
            )),
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RefreshTokenBody<'a> {
    refresh_token: &'a str,
}

/// The auth backend as the session layer sees it.
#[async_trait]
pub trait AuthApi: Send + Sync {
    async fn login(&self, request: &LoginRequest) -> Result<AuthPayload, AuthError>;

    async fn register(&self, request: &RegisterRequest) -> Result<AuthPayload, AuthError>;

    /// Exchange a refresh token for a new pair. The old pair is invalid afterwards.
    async fn refresh(&self, refresh_token: &str) -> Result<AuthPayload, AuthError>;

    async fn revoke(&self, refresh_token: &str) -> Result<(), AuthError>;

    /// Revoke every refresh token of the user that owns `access_token`.
    async fn revoke_all(&self, access_token: &str) -> Result<(), AuthError>;
}

/// [`AuthApi`] over HTTP.
#[derive(Debug, Clone)]
pub struct HttpAuthApi {
    client: Client,
    base_url: String,
}

struct RawResponse {
    status: StatusCode,
    body: Vec<u8>,
}

impl RawResponse {
    /// Best human-readable message: the envelope's `message`, else the status reason.
    fn message(&self) -> String {
        parse_envelope::<serde_json::Value>(&self.body)
            .ok()
            .and_then(|envelope| envelope.message)
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| {
                self.status
                    .canonical_reason()
                    .unwrap_or("unknown error")
                    .to_string()
            })
    }

    fn backend_error(&self) -> AuthError {
        AuthError::Backend {
            status: self.status.as_u16(),
            message: self.message(),
        }
    }

    fn data<T: DeserializeOwned>(&self) -> Result<T, AuthError> {
        Ok(parse_envelope::<T>(&self.body)?.into_data()?)
    }

    fn unit(&self) -> Result<(), AuthError> {
        if self.body.is_empty() {
            return Ok(());
        }
        Ok(parse_envelope::<serde_json::Value>(&self.body)?.into_unit()?)
    }
}

impl HttpAuthApi {
    /// # Errors
    ///
    /// Returns `AuthError::Transport` if the HTTP client cannot be built.
    pub fn new(config: &ApiConfig) -> Result<Self, AuthError> {
        let client = Client::builder()
            .timeout(config.timeout())
            .user_agent(config.user_agent.as_str())
            .build()?;
        Ok(Self::with_client(client, config.base_url()))
    }

    #[must_use]
    pub fn with_client(client: Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn post<B: Serialize + Sync + ?Sized>(
        &self,
        path: &str,
        body: Option<&B>,
        bearer: Option<&str>,
    ) -> Result<RawResponse, AuthError> {
        let url = format!("{}{path}", self.base_url);
        let mut request = self.client.post(&url);
        if let Some(body) = body {
            request = request.json(body);
        }
        if let Some(token) = bearer {
            request = request.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }

        let response = request.send().await?;
        let status = response.status();
        let body = response.bytes().await?.to_vec();
        tracing::debug!(%url, status = status.as_u16(), "auth endpoint responded");
        Ok(RawResponse { status, body })
    }
}

#[async_trait]
impl AuthApi for HttpAuthApi {
    async fn login(&self, request: &LoginRequest) -> Result<AuthPayload, AuthError> {
        let raw = self.post(LOGIN_PATH, Some(request), None).await?;
        match raw.status {
            s if s.is_success() => raw.data::<TokenData>()?.into_payload(),
            StatusCode::UNAUTHORIZED => Err(AuthError::InvalidCredentials(raw.message())),
            _ => Err(raw.backend_error()),
        }
    }

    async fn register(&self, request: &RegisterRequest) -> Result<AuthPayload, AuthError> {
        let raw = self.post(REGISTER_PATH, Some(request), None).await?;
        if !raw.status.is_success() {
            return Err(raw.backend_error());
        }
        raw.data::<TokenData>()?.into_payload()
    }

    async fn refresh(&self, refresh_token: &str) -> Result<AuthPayload, AuthError> {
        let body = RefreshTokenBody { refresh_token };
        let raw = self.post(REFRESH_PATH, Some(&body), None).await?;
        match raw.status {
            s if s.is_success() => match raw.data::<TokenData>() {
                Ok(data) => data.into_payload(),
                Err(AuthError::Backend { message, .. }) => Err(AuthError::RefreshRejected(message)),
                Err(other) => Err(other),
            },
            StatusCode::BAD_REQUEST | StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                Err(AuthError::RefreshRejected(raw.message()))
            }
            _ => Err(raw.backend_error()),
        }
    }

    async fn revoke(&self, refresh_token: &str) -> Result<(), AuthError> {
        let body = RefreshTokenBody { refresh_token };
        let raw = self.post(REVOKE_PATH, Some(&body), None).await?;
        if !raw.status.is_success() {
            return Err(raw.backend_error());
        }
        raw.unit()
    }

    async fn revoke_all(&self, access_token: &str) -> Result<(), AuthError> {
        let raw = self
            .post::<()>(REVOKE_ALL_PATH, None, Some(access_token))
            .await?;
        if !raw.status.is_success() {
            return Err(raw.backend_error());
        }
        raw.unit()
    }
}
