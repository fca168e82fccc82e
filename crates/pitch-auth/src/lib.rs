//! # pitch-auth
//!
//! Session management for the Pitchside admin client.
//!
//! Stores the access/refresh token pair with cookie-style expiries
//! (`token_store`), decides when an access token is too close to expiry to
//! send (`claims`), runs at most one refresh at a time with a cooldown
//! (`refresh`), and ties it together with login and logout broadcasting
//! (`session`).

pub mod api;
pub mod claims;
pub mod error;
pub mod refresh;
pub mod session;
pub mod token_store;

pub use api::{AuthApi, AuthPayload, HttpAuthApi, LoginRequest, RegisterRequest};
pub use claims::{is_expiring_soon, is_expiring_within};
pub use error::AuthError;
pub use refresh::{RefreshCoordinator, Refresher};
pub use session::{LogoutMode, SessionEvent, SessionManager, SessionState};
pub use token_store::{CredentialStore, TokenKind, TokenStore};

/// Whether `path` targets one of the `/auth/*` endpoints that manage the
/// session themselves. Matches on the path suffix so any API prefix works.
#[must_use]
pub fn is_auth_endpoint(path: &str) -> bool {
    let path = path.split(['?', '#']).next().unwrap_or_default().trim_end_matches('/');
    api::AUTH_ENDPOINTS
        .iter()
        .any(|endpoint| path.ends_with(endpoint))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("/api/auth/login", true)]
    #[case("/auth/refresh-token", true)]
    #[case("/api/auth/revoke-all-tokens/", true)]
    #[case("/api/auth/register?next=/", true)]
    #[case("/api/footballmatch", false)]
    #[case("/api/profile/2fa/enable", false)]
    #[case("/api/auth/login-history", false)]
    fn auth_endpoint_detection(#[case] path: &str, #[case] expected: bool) {
        assert_eq!(is_auth_endpoint(path), expected);
    }
}
