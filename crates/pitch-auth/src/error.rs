use std::time::Duration;

use pitch_core::CoreError;
use thiserror::Error;

/// Every failure the session layer can surface.
///
/// `Clone` because one refresh outcome is handed to every caller waiting on it.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AuthError {
    #[error("malformed token: {0}")]
    Decode(String),

    #[error("token refresh attempted during cooldown; retry in {retry_in:?}")]
    RateLimited { retry_in: Duration },

    #[error("no refresh token stored; run `pitch auth login`")]
    NoRefreshToken,

    #[error("not signed in; run `pitch auth login`")]
    NotAuthenticated,

    #[error("session ended while a refresh was in flight")]
    SessionEnded,

    #[error("refresh token rejected: {0}")]
    RefreshRejected(String),

    #[error("invalid credentials: {0}")]
    InvalidCredentials(String),

    #[error("two-factor code required; pass --code")]
    TwoFactorRequired,

    #[error("request failed: {0}")]
    Transport(String),

    #[error("malformed response: {0}")]
    MalformedResponse(String),

    #[error("backend error {status}: {message}")]
    Backend { status: u16, message: String },

    #[error("token store error: {0}")]
    TokenStore(String),
}

impl AuthError {
    /// Whether this failure ends the session (as opposed to a retryable hiccup).
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::RefreshRejected(_) | Self::NoRefreshToken)
    }
}

impl From<CoreError> for AuthError {
    fn from(error: CoreError) -> Self {
        match error {
            CoreError::Rejected { message, errors } if errors.is_empty() => Self::Backend {
                status: 200,
                message,
            },
            CoreError::Rejected { message, errors } => Self::Backend {
                status: 200,
                message: format!("{message} ({})", errors.join("; ")),
            },
            CoreError::MissingData => Self::MalformedResponse("response envelope has no data".into()),
            CoreError::Malformed(reason) => Self::MalformedResponse(reason),
        }
    }
}

impl From<reqwest::Error> for AuthError {
    fn from(error: reqwest::Error) -> Self {
        Self::Transport(error.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejected_envelope_keeps_field_errors() {
        let error = AuthError::from(CoreError::Rejected {
            message: "Validation failed".into(),
            errors: vec!["password too short".into()],
        });
        assert_eq!(
            error,
            AuthError::Backend {
                status: 200,
                message: "Validation failed (password too short)".into(),
            }
        );
    }

    #[test]
    fn only_rejections_are_terminal() {
        assert!(AuthError::RefreshRejected("expired".into()).is_terminal());
        assert!(AuthError::NoRefreshToken.is_terminal());
        assert!(!AuthError::Transport("timeout".into()).is_terminal());
        assert!(
            !AuthError::RateLimited {
                retry_in: Duration::from_secs(1)
            }
            .is_terminal()
        );
    }
}
