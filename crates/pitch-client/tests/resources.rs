//! Typed resource bindings.

mod common;

use chrono::{TimeZone, Utc};
use common::{Harness, bearer, envelope, jwt};
use pitch_client::ClientError;
use pitch_core::entities::{
    ChangePasswordRequest, FootballMatchUpdate, MatchStatus, NewCalendarEvent, NewFootballMatch,
    TwoFactorCode,
};
use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn signed_in(server: &MockServer) -> (Harness, String) {
    let harness = Harness::new(server);
    let token = jwt("editor", 3600);
    harness.seed(Some(&token), "rt");
    (harness, token)
}

fn fixture(id: i64, status: &str) -> serde_json::Value {
    json!({
        "id": id,
        "homeTeam": "Rovers",
        "awayTeam": "United",
        "matchDate": "2026-04-01T15:00:00Z",
        "venue": "Riverside",
        "homeScore": 2,
        "awayScore": 1,
        "status": status
    })
}

#[tokio::test]
async fn create_match_posts_camel_case_body() {
    let server = MockServer::start().await;
    let (harness, token) = signed_in(&server).await;

    Mock::given(method("POST"))
        .and(path("/api/footballmatch"))
        .and(header("authorization", bearer(&token).as_str()))
        .and(body_json(json!({
            "homeTeam": "Rovers",
            "awayTeam": "United",
            "matchDate": "2026-04-01T15:00:00Z",
            "venue": "Riverside"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(envelope(fixture(5, "scheduled"))))
        .expect(1)
        .mount(&server)
        .await;

    let created = harness
        .client
        .create_match(&NewFootballMatch {
            home_team: "Rovers".into(),
            away_team: "United".into(),
            match_date: Utc.with_ymd_and_hms(2026, 4, 1, 15, 0, 0).unwrap(),
            venue: Some("Riverside".into()),
            competition: None,
        })
        .await
        .expect("create");
    assert_eq!(created.id, 5);
    assert_eq!(created.scoreline().as_deref(), Some("2 - 1"));
}

#[tokio::test]
async fn update_match_sends_only_changed_fields() {
    let server = MockServer::start().await;
    let (harness, _) = signed_in(&server).await;

    Mock::given(method("PUT"))
        .and(path("/api/footballmatch/5"))
        .and(body_json(json!({"status": "live"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(fixture(5, "live"))))
        .expect(1)
        .mount(&server)
        .await;

    let updated = harness
        .client
        .update_match(
            5,
            &FootballMatchUpdate {
                status: Some(MatchStatus::Live),
                ..FootballMatchUpdate::default()
            },
        )
        .await
        .expect("update");
    assert_eq!(updated.status, MatchStatus::Live);
}

#[tokio::test]
async fn delete_accepts_no_content() {
    let server = MockServer::start().await;
    let (harness, _) = signed_in(&server).await;

    Mock::given(method("DELETE"))
        .and(path("/api/footballmatch/5"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    harness.client.delete_match(5).await.expect("deleted");
}

#[tokio::test]
async fn missing_resource_is_not_found() {
    let server = MockServer::start().await;
    let (harness, _) = signed_in(&server).await;

    Mock::given(method("GET"))
        .and(path("/api/calendarevent/404"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "success": false,
            "message": "Event not found"
        })))
        .mount(&server)
        .await;

    let err = harness.client.get_event(404).await.expect_err("missing");
    assert!(matches!(err, ClientError::NotFound(ref m) if m == "Event not found"));
    assert_eq!(err.status(), Some(404));
}

#[tokio::test]
async fn rejected_envelope_surfaces_field_errors() {
    let server = MockServer::start().await;
    let (harness, _) = signed_in(&server).await;

    Mock::given(method("POST"))
        .and(path("/api/calendarevent"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": false,
            "message": "Validation failed",
            "errors": ["title is required"]
        })))
        .mount(&server)
        .await;

    let err = harness
        .client
        .create_event(&NewCalendarEvent {
            title: String::new(),
            description: None,
            start_date: Utc.with_ymd_and_hms(2026, 5, 2, 9, 0, 0).unwrap(),
            end_date: None,
            location: None,
            all_day: true,
        })
        .await
        .expect_err("rejected");
    match err {
        ClientError::Rejected { message, errors } => {
            assert_eq!(message, "Validation failed");
            assert_eq!(errors, ["title is required"]);
        }
        other => panic!("unexpected {other:?}"),
    }
}

#[tokio::test]
async fn wrong_shape_is_malformed() {
    let server = MockServer::start().await;
    let (harness, _) = signed_in(&server).await;

    Mock::given(method("GET"))
        .and(path("/api/footballmatch"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!({"not": "a list"}))))
        .mount(&server)
        .await;

    let err = harness.client.list_matches().await.expect_err("malformed");
    assert!(matches!(err, ClientError::Malformed(_)), "{err:?}");
}

#[tokio::test]
async fn change_password_and_two_factor() {
    let server = MockServer::start().await;
    let (harness, _) = signed_in(&server).await;

    Mock::given(method("POST"))
        .and(path("/api/profile/change-password"))
        .and(body_json(json!({"currentPassword": "old", "newPassword": "new"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/profile/2fa/enable"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!({
            "secret": "JBSWY3DPEHPK3PXP",
            "otpauthUri": "otpauth://totp/Pitchside:coach?secret=JBSWY3DPEHPK3PXP"
        }))))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/profile/2fa/verify"))
        .and(body_json(json!({"code": "123456"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
        .expect(1)
        .mount(&server)
        .await;

    harness
        .client
        .change_password(&ChangePasswordRequest {
            current_password: "old".into(),
            new_password: "new".into(),
        })
        .await
        .expect("password changed");
    let setup = harness.client.enable_two_factor().await.expect("setup");
    assert!(setup.otpauth_uri.starts_with("otpauth://"));
    harness
        .client
        .verify_two_factor(&TwoFactorCode {
            code: "123456".into(),
        })
        .await
        .expect("verified");
}

#[tokio::test]
async fn revoke_all_sessions_clears_local_state() {
    let server = MockServer::start().await;
    let (harness, token) = signed_in(&server).await;

    Mock::given(method("POST"))
        .and(path("/api/auth/revoke-all-tokens"))
        .and(header("authorization", bearer(&token).as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
        .expect(1)
        .mount(&server)
        .await;

    harness.client.revoke_all_sessions().await.expect("revoked");
    assert!(!harness.session.store().has_session());
}
