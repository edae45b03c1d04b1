//! Integration tests for member registration and code verification

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

mod common;

use chrono::{DateTime, Duration, TimeZone, Utc};
use common::*;
use devclub_client::notify::Level;
use devclub_client::{RegistrationFlow, RegistrationState, Route};
use devclub_core::Error;
use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, ResponseTemplate};

fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 15, 10, 0, 0).unwrap()
}

fn oran_communes() -> serde_json::Value {
    json!([
        {"id": 2, "commune_name": "وهران", "commune_name_ascii": "Oran",
         "wilaya_code": "31", "wilaya_name": "وهران", "wilaya_name_ascii": "Oran"}
    ])
}

fn flow(app: &TestApp) -> RegistrationFlow {
    let mut flow = RegistrationFlow::new(app.api.clone(), app.notifier.clone());
    flow.set_draft(complete_draft());
    flow
}

async fn mount_register_ok(app: &TestApp) {
    Mock::given(method("POST"))
        .and(path("/api/auth/register"))
        .respond_with(ResponseTemplate::new(200).set_body_json(registered_user()))
        .expect(1)
        .mount(&app.server)
        .await;
}

#[tokio::test]
async fn test_register_then_verify_establishes_session() {
    let app = TestApp::start().await;
    mount_register_ok(&app).await;
    Mock::given(method("POST"))
        .and(path("/api/auth/verify-otp"))
        .and(body_json(json!({"email": "a@b.com", "otp_code": "482913"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(token_response(ISSUED_TOKEN)))
        .expect(1)
        .mount(&app.server)
        .await;

    let mut flow = flow(&app);

    let state = flow.submit(t0()).await.unwrap();
    assert_eq!(state, RegistrationState::AwaitingOtp);
    assert_eq!(app.token(), None);
    assert_eq!(flow.countdown().display(t0()), "05:00");

    for ch in "482913".chars() {
        flow.push_otp_char(ch).await.unwrap();
    }

    assert_eq!(flow.state(), RegistrationState::Verified);
    assert_eq!(app.token().as_deref(), Some(ISSUED_TOKEN));
    assert_eq!(app.route(), Route::Home);
    assert_eq!(
        app.notifier.last().map(|n| n.description),
        Some("Account verified successfully".to_string())
    );
}

#[tokio::test]
async fn test_partial_code_sends_nothing() {
    let app = TestApp::start().await;
    mount_register_ok(&app).await;
    Mock::given(method("POST"))
        .and(path("/api/auth/verify-otp"))
        .respond_with(ResponseTemplate::new(200).set_body_json(token_response(ISSUED_TOKEN)))
        .expect(0)
        .mount(&app.server)
        .await;

    let mut flow = flow(&app);
    flow.submit(t0()).await.unwrap();

    for ch in "48291".chars() {
        flow.push_otp_char(ch).await.unwrap();
    }
    flow.enter_otp("123").await.unwrap();

    assert_eq!(flow.state(), RegistrationState::AwaitingOtp);
    assert_eq!(flow.otp_input(), "123");
    assert_eq!(app.token(), None);
}

#[tokio::test]
async fn test_pasted_code_verifies_once() {
    let app = TestApp::start().await;
    mount_register_ok(&app).await;
    Mock::given(method("POST"))
        .and(path("/api/auth/verify-otp"))
        .respond_with(ResponseTemplate::new(200).set_body_json(token_response(ISSUED_TOKEN)))
        .expect(1)
        .mount(&app.server)
        .await;

    let mut flow = flow(&app);
    flow.submit(t0()).await.unwrap();

    let state = flow.enter_otp("482913").await.unwrap();
    assert_eq!(state, RegistrationState::Verified);

    // Further input after verification is refused, not re-sent
    assert!(flow.push_otp_char('1').await.is_err());
}

#[tokio::test]
async fn test_over_long_code_rejected_without_request() {
    let app = TestApp::start().await;
    mount_register_ok(&app).await;
    Mock::given(method("POST"))
        .and(path("/api/auth/verify-otp"))
        .respond_with(ResponseTemplate::new(200).set_body_json(token_response(ISSUED_TOKEN)))
        .expect(0)
        .mount(&app.server)
        .await;

    let mut flow = flow(&app);
    flow.submit(t0()).await.unwrap();

    let err = flow.enter_otp("4829130").await.unwrap_err();
    assert!(matches!(err, Error::Validation { .. }));
}

#[tokio::test]
async fn test_wrong_code_returns_to_code_entry() {
    let app = TestApp::start().await;
    mount_register_ok(&app).await;
    mount_json(
        &app.server,
        "POST",
        "/api/auth/verify-otp",
        400,
        json!({"detail": "Invalid OTP code"}),
    )
    .await;

    let mut flow = flow(&app);
    flow.submit(t0()).await.unwrap();

    let err = flow.enter_otp("000000").await.unwrap_err();

    assert_eq!(err.user_message(), "Invalid OTP code");
    assert_eq!(flow.state(), RegistrationState::AwaitingOtp);
    assert_eq!(flow.otp_input(), "");
    assert_eq!(app.token(), None);
    let last = app.notifier.last().unwrap();
    assert_eq!(last.level, Level::Error);
    assert_eq!(last.description, "Invalid OTP code");
}

#[tokio::test]
async fn test_verification_without_token_is_failure() {
    let app = TestApp::start().await;
    mount_register_ok(&app).await;
    mount_json(
        &app.server,
        "POST",
        "/api/auth/verify-otp",
        200,
        json!({"token_type": "bearer"}),
    )
    .await;

    let mut flow = flow(&app);
    flow.submit(t0()).await.unwrap();

    let err = flow.enter_otp("482913").await.unwrap_err();

    assert_eq!(err.user_message(), "No access token received");
    assert_eq!(flow.state(), RegistrationState::AwaitingOtp);
    assert_eq!(app.token(), None);
}

#[tokio::test]
async fn test_missing_field_blocks_submission() {
    let app = TestApp::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/register"))
        .respond_with(ResponseTemplate::new(200).set_body_json(registered_user()))
        .expect(0)
        .mount(&app.server)
        .await;

    let mut flow = flow(&app);
    flow.draft_mut().department_id = None;

    let err = flow.submit(t0()).await.unwrap_err();

    match err {
        Error::Validation { field, message } => {
            assert_eq!(field, "department_id");
            assert_eq!(message, "Department is required");
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(flow.state(), RegistrationState::Filling);
}

#[tokio::test]
async fn test_rejected_registration_keeps_draft() {
    let app = TestApp::start().await;
    mount_json(
        &app.server,
        "POST",
        "/api/auth/register",
        400,
        json!({"detail": "Email already registered"}),
    )
    .await;

    let mut flow = flow(&app);
    let err = flow.submit(t0()).await.unwrap_err();

    assert_eq!(err.user_message(), "Email already registered");
    assert_eq!(flow.state(), RegistrationState::Filling);
    assert_eq!(flow.draft(), &complete_draft());
}

#[tokio::test]
async fn test_resend_locked_then_unsupported() {
    let app = TestApp::start().await;
    mount_register_ok(&app).await;

    let mut flow = flow(&app);
    flow.submit(t0()).await.unwrap();
    flow.enter_otp("48").await.unwrap();

    let locked = flow.resend_otp(t0() + Duration::seconds(10)).unwrap_err();
    assert!(matches!(locked, Error::Validation { .. }));

    let later = t0() + Duration::seconds(301);
    let refused = flow.resend_otp(later).unwrap_err();
    assert!(matches!(refused, Error::NotImplemented { .. }));

    // Neither the countdown nor the typed code is touched
    assert_eq!(flow.countdown().remaining(later), 0);
    assert_eq!(flow.otp_input(), "48");
    assert_eq!(app.notifier.last().map(|n| n.level), Some(Level::Info));
}

#[tokio::test]
async fn test_reference_data_and_dependent_selectors() {
    let app = TestApp::start().await;
    mount_json(&app.server, "GET", "/api/data/cities", 200, cities()).await;
    mount_json(&app.server, "GET", "/api/data/faculties", 200, faculties()).await;
    mount_json(&app.server, "GET", "/api/data/departments/2", 200, json!([])).await;
    mount_json(&app.server, "GET", "/api/data/cities/31", 200, oran_communes()).await;

    let mut flow = flow(&app);
    flow.load_reference_data().await.unwrap();

    assert_eq!(flow.reference().faculties.len(), 2);
    assert_eq!(flow.reference().wilayas().len(), 2);

    flow.select_faculty(2).await.unwrap();
    assert_eq!(flow.draft().faculty_id, Some(2));
    assert_eq!(flow.draft().department_id, None);

    flow.select_wilaya("31").await.unwrap();
    assert_eq!(flow.draft().wilaya_code, "31");
    assert_eq!(flow.draft().commune_name, "");
    assert_eq!(flow.reference().communes.len(), 1);
}

#[tokio::test]
async fn test_reference_data_failure_notifies() {
    let app = TestApp::start().await;
    mount_json(&app.server, "GET", "/api/data/cities", 200, cities()).await;
    mount_json(&app.server, "GET", "/api/data/faculties", 500, json!({})).await;

    let mut flow = flow(&app);
    assert!(flow.load_reference_data().await.is_err());
    assert_eq!(
        app.notifier.last().map(|n| n.description),
        Some("Failed to load initial data".to_string())
    );
}

#[tokio::test]
async fn test_failed_department_load_clears_previous_faculty_choice() {
    let app = TestApp::start().await;
    mount_json(&app.server, "GET", "/api/data/departments/1", 200, departments()).await;
    mount_json(&app.server, "GET", "/api/data/departments/2", 500, json!({})).await;

    let mut flow = flow(&app);
    flow.select_faculty(1).await.unwrap();
    assert_eq!(flow.draft().department_id, Some(3));
    assert_eq!(flow.reference().departments.len(), 2);

    assert!(flow.select_faculty(2).await.is_err());

    assert_eq!(flow.draft().faculty_id, Some(2));
    assert_eq!(flow.draft().department_id, None);
    assert!(flow.reference().departments.is_empty());
    assert_eq!(
        app.notifier.last().map(|n| n.description),
        Some("Failed to load departments".to_string())
    );
}

#[tokio::test]
async fn test_reselecting_wilaya_keeps_transliterated_commune() {
    let app = TestApp::start().await;
    mount_json(&app.server, "GET", "/api/data/cities/31", 200, oran_communes()).await;

    let mut flow = flow(&app);
    flow.draft_mut().wilaya_code = "31".to_string();
    flow.draft_mut().commune_name = "Oran".to_string();

    flow.select_wilaya("31").await.unwrap();

    assert_eq!(flow.draft().commune_name, "Oran");
    assert_eq!(flow.reference().communes.len(), 1);
}

#[tokio::test]
async fn test_resumed_short_code_sends_nothing() {
    let app = TestApp::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/verify-otp"))
        .respond_with(ResponseTemplate::new(200).set_body_json(token_response(ISSUED_TOKEN)))
        .expect(0)
        .mount(&app.server)
        .await;

    let mut flow = RegistrationFlow::new(app.api.clone(), app.notifier.clone());
    flow.resume("a@b.com");

    let err = flow.submit_otp("123").await.unwrap_err();

    assert!(matches!(err, Error::Validation { .. }));
    assert_eq!(flow.state(), RegistrationState::AwaitingOtp);
    assert_eq!(app.token(), None);
    assert_eq!(
        app.notifier.last().map(|n| n.description),
        Some("Verification code must be 6 characters".to_string())
    );
}

#[tokio::test]
async fn test_resumed_full_code_verifies() {
    let app = TestApp::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/verify-otp"))
        .and(body_json(json!({"email": "a@b.com", "otp_code": "482913"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(token_response(ISSUED_TOKEN)))
        .expect(1)
        .mount(&app.server)
        .await;

    let mut flow = RegistrationFlow::new(app.api.clone(), app.notifier.clone());
    flow.resume(" a@b.com ");

    let state = flow.submit_otp(" 482913 ").await.unwrap();

    assert_eq!(state, RegistrationState::Verified);
    assert_eq!(app.token().as_deref(), Some(ISSUED_TOKEN));
    assert_eq!(app.route(), Route::Home);
}
