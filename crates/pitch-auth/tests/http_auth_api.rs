//! `HttpAuthApi` against a mock backend.

use pitch_auth::{AuthApi, AuthError, HttpAuthApi, LoginRequest, RegisterRequest};
use pitch_core::{CredentialPair, UserRole};
use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn api(server: &MockServer) -> HttpAuthApi {
    HttpAuthApi::with_client(reqwest::Client::new(), &format!("{}/api/", server.uri()))
}

fn login(password: &str) -> LoginRequest {
    LoginRequest {
        username: "coach".into(),
        password: password.into(),
        two_factor_code: None,
    }
}

fn envelope(data: serde_json::Value) -> serde_json::Value {
    json!({
        "success": true,
        "message": "ok",
        "data": data,
        "errors": null,
        "timestamp": "2026-03-01T12:00:00Z"
    })
}

#[tokio::test]
async fn login_returns_pair_and_user() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .and(body_json(json!({"username": "coach", "password": "secret"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!({
            "accessToken": "jwt_1",
            "refreshToken": "rt_1",
            "user": {"id": "7", "username": "coach", "email": "c@club.test", "role": "Admin"}
        }))))
        .expect(1)
        .mount(&server)
        .await;

    let payload = api(&server).login(&login("secret")).await.expect("login");
    assert_eq!(payload.credentials, CredentialPair::new("jwt_1", "rt_1"));
    assert_eq!(payload.user.map(|u| u.role), Some(UserRole::Admin));
}

#[tokio::test]
async fn login_401_is_invalid_credentials() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "success": false,
            "message": "Invalid username or password",
            "data": null
        })))
        .mount(&server)
        .await;

    let err = api(&server).login(&login("wrong")).await.expect_err("rejected");
    assert_eq!(
        err,
        AuthError::InvalidCredentials("Invalid username or password".into())
    );
}

#[tokio::test]
async fn login_two_factor_challenge() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(envelope(json!({"requiresTwoFactor": true}))),
        )
        .mount(&server)
        .await;

    let err = api(&server).login(&login("secret")).await.expect_err("challenge");
    assert_eq!(err, AuthError::TwoFactorRequired);
}

#[tokio::test]
async fn refresh_sends_camel_case_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/refresh-token"))
        .and(body_json(json!({"refreshToken": "rt_old"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!({
            "accessToken": "jwt_new",
            "refreshToken": "rt_new"
        }))))
        .expect(1)
        .mount(&server)
        .await;

    let payload = api(&server).refresh("rt_old").await.expect("refresh");
    assert_eq!(payload.credentials, CredentialPair::new("jwt_new", "rt_new"));
}

#[tokio::test]
async fn refresh_rejections_are_terminal() {
    for status in [400, 401, 403] {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/auth/refresh-token"))
            .respond_with(ResponseTemplate::new(status).set_body_json(json!({
                "success": false,
                "message": "Refresh token expired"
            })))
            .mount(&server)
            .await;

        let err = api(&server).refresh("rt").await.expect_err("rejected");
        assert_eq!(err, AuthError::RefreshRejected("Refresh token expired".into()));
        assert!(err.is_terminal());
    }
}

#[tokio::test]
async fn refresh_success_false_is_rejection() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/refresh-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": false,
            "message": "Token revoked"
        })))
        .mount(&server)
        .await;

    let err = api(&server).refresh("rt").await.expect_err("rejected");
    assert_eq!(err, AuthError::RefreshRejected("Token revoked".into()));
}

#[tokio::test]
async fn server_errors_are_not_rejections() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/refresh-token"))
        .respond_with(ResponseTemplate::new(503).set_body_string("down"))
        .mount(&server)
        .await;

    let err = api(&server).refresh("rt").await.expect_err("unavailable");
    assert_eq!(
        err,
        AuthError::Backend {
            status: 503,
            message: "Service Unavailable".into(),
        }
    );
    assert!(!err.is_terminal());
}

#[tokio::test]
async fn mismatched_shape_is_malformed() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/refresh-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"token": "bare"})))
        .mount(&server)
        .await;

    let err = api(&server).refresh("rt").await.expect_err("malformed");
    assert!(matches!(err, AuthError::MalformedResponse(_)), "{err:?}");
}

#[tokio::test]
async fn register_sends_display_name() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/register"))
        .and(body_json(json!({
            "username": "analyst",
            "email": "analyst@club.test",
            "password": "pw",
            "displayName": "Data Analyst"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(envelope(json!({
            "accessToken": "jwt",
            "refreshToken": "rt"
        }))))
        .expect(1)
        .mount(&server)
        .await;

    let request = RegisterRequest {
        username: "analyst".into(),
        email: "analyst@club.test".into(),
        password: "pw".into(),
        display_name: Some("Data Analyst".into()),
    };
    api(&server).register(&request).await.expect("register");
}

#[tokio::test]
async fn revoke_all_uses_bearer_token() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/revoke-all-tokens"))
        .and(header("authorization", "Bearer jwt_current"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
        .expect(1)
        .mount(&server)
        .await;

    api(&server).revoke_all("jwt_current").await.expect("revoked");
}

#[tokio::test]
async fn revoke_accepts_empty_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/revoke-token"))
        .and(body_json(json!({"refreshToken": "rt"})))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    api(&server).revoke("rt").await.expect("revoked");
}

#[tokio::test]
async fn unreachable_backend_is_transport_error() {
    let api = HttpAuthApi::with_client(reqwest::Client::new(), "http://127.0.0.1:9/api");
    let err = api.refresh("rt").await.expect_err("no server");
    assert!(matches!(err, AuthError::Transport(_)));
}
