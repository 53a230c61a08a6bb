//! Integration tests for the recovery endpoints

use std::sync::Arc;

use actix_web::{
    http::{header, StatusCode},
    test, web,
};
use chrono::{Duration, Utc};
use serde_json::{json, Value};

use rc_api::{create_app, AppState};
use rc_core::domain::entities::Account;
use rc_core::repositories::{AccountRepository, InMemoryAccountRepository};
use rc_core::services::{ManualClock, RecoveryService, RecoveryServiceConfig};
use rc_infra::email::{EmailRecoveryNotifier, MockEmailService};
use rc_infra::session::JwtSessionAuthenticator;
use rc_shared::{CorsConfig, ServerConfig, SessionConfig};

struct Harness {
    repo: Arc<InMemoryAccountRepository>,
    mailbox: Arc<MockEmailService>,
    clock: Arc<ManualClock>,
    state: web::Data<AppState<InMemoryAccountRepository>>,
}

fn harness(conceal_account_state: bool, login_after_recovery: bool) -> Harness {
    let repo = Arc::new(InMemoryAccountRepository::new());
    let mailbox = Arc::new(MockEmailService::new());
    let clock = Arc::new(ManualClock::new(Utc::now()));
    let session = SessionConfig::new("api-test-secret");

    let notifier = Arc::new(EmailRecoveryNotifier::new(mailbox.clone(), "https://id.example.com"));
    let authenticator = Arc::new(JwtSessionAuthenticator::new(session.clone()));
    let config = RecoveryServiceConfig {
        login_after_recovery,
        password_hash_cost: 4,
        ..Default::default()
    };
    let service =
        RecoveryService::new(repo.clone(), notifier, authenticator, config).with_clock(clock.clone());

    let state = web::Data::new(AppState {
        recovery_service: Arc::new(service),
        conceal_account_state,
        session,
        database: None,
    });

    Harness {
        repo,
        mailbox,
        clock,
        state,
    }
}

async fn seed(harness: &Harness, email: &str) -> Account {
    let account = Account::new(email, Some("$2b$04$existinghashexistinghashexistinghashexistingha".to_string()));
    harness.repo.save(&account).await.unwrap();
    account
}

/// Pull the `key` out of the confirm link in the last email sent to `to`
async fn emailed_key(harness: &Harness, to: &str) -> String {
    let message = harness.mailbox.last_message_to(to).await.expect("recovery email");
    let marker = "/recover/confirm?key=";
    let start = message.text_body.find(marker).expect("confirm link") + marker.len();
    message.text_body[start..]
        .chars()
        .take_while(|c| c.is_ascii_alphanumeric() || *c == '-' || *c == '_')
        .collect()
}

macro_rules! app {
    ($harness:expr) => {
        test::init_service(create_app(
            $harness.state.clone(),
            &ServerConfig::default(),
            &CorsConfig::default(),
        ))
        .await
    };
}

#[actix_web::test]
async fn test_begin_for_known_account_sends_email() {
    let h = harness(true, false);
    seed(&h, "a@x.com").await;
    let app = app!(h);

    let req = test::TestRequest::post()
        .uri("/api/v1/recover")
        .set_json(json!({ "email": "A@X.com", "return_url": "/app" }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::ACCEPTED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["provider"], "x.com");
    assert_eq!(h.mailbox.sent_messages().await.len(), 1);
    assert!(!emailed_key(&h, "a@x.com").await.is_empty());
}

#[actix_web::test]
async fn test_begin_conceals_unknown_and_deactivated_accounts() {
    let h = harness(true, false);
    let mut inactive = Account::new("gone@x.com", None);
    inactive.deactivate(Utc::now());
    h.repo.save(&inactive).await.unwrap();
    seed(&h, "a@x.com").await;
    let app = app!(h);

    let mut bodies = Vec::new();
    for email in ["a@x.com", "nobody@x.com", "gone@x.com"] {
        let req = test::TestRequest::post()
            .uri("/api/v1/recover")
            .set_json(json!({ "email": email }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::ACCEPTED, "email {}", email);
        let body: Value = test::read_body_json(resp).await;
        bodies.push(body["data"].clone());
    }

    assert_eq!(bodies[0], bodies[1]);
    assert_eq!(bodies[0], bodies[2]);
    // Only the real, active account gets mail
    assert_eq!(h.mailbox.sent_messages().await.len(), 1);
}

#[actix_web::test]
async fn test_begin_reports_account_state_when_not_concealed() {
    let h = harness(false, false);
    let mut inactive = Account::new("gone@x.com", None);
    inactive.deactivate(Utc::now());
    h.repo.save(&inactive).await.unwrap();
    let app = app!(h);

    for email in ["nobody@x.com", "gone@x.com"] {
        let req = test::TestRequest::post()
            .uri("/api/v1/recover")
            .set_json(json!({ "email": email }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "VALIDATION_ERROR");
        assert!(body["details"]["fields"]["email"].is_array());
    }
    assert!(h.mailbox.sent_messages().await.is_empty());
}

#[actix_web::test]
async fn test_begin_rejects_invalid_input() {
    let h = harness(true, false);
    seed(&h, "a@x.com").await;
    let app = app!(h);

    let req = test::TestRequest::post()
        .uri("/api/v1/recover")
        .set_json(json!({ "email": "not-an-email" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let req = test::TestRequest::post()
        .uri("/api/v1/recover")
        .set_json(json!({ "email": "a@x.com", "return_url": "https://evil.example.net/" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = test::read_body_json(resp).await;
    assert!(body["details"]["fields"]["return_url"].is_array());

    assert!(h.mailbox.sent_messages().await.is_empty());
}

#[actix_web::test]
async fn test_malformed_json_is_bad_request() {
    let h = harness(true, false);
    let app = app!(h);

    let req = test::TestRequest::post()
        .uri("/api/v1/recover")
        .insert_header((header::CONTENT_TYPE, "application/json"))
        .set_payload("{\"email\":")
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "BAD_REQUEST");
}

#[actix_web::test]
async fn test_preview_shows_account_without_consuming_token() {
    let h = harness(true, false);
    seed(&h, "a@x.com").await;
    h.state.recovery_service.begin("a@x.com", None).await.unwrap();
    let key = emailed_key(&h, "a@x.com").await;
    let app = app!(h);

    for _ in 0..2 {
        let req = test::TestRequest::get()
            .uri(&format!("/api/v1/recover/confirm?key={}", key))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["data"]["email"], "a@x.com");
    }

    let stored = h.repo.find_by_email("a@x.com").await.unwrap().unwrap();
    assert!(stored.has_pending_verification());
}

#[actix_web::test]
async fn test_confirm_sets_password_and_redirects_to_login() {
    let h = harness(true, false);
    let account = seed(&h, "a@x.com").await;
    h.state.recovery_service.begin("a@x.com", Some("/app")).await.unwrap();
    let key = emailed_key(&h, "a@x.com").await;
    let app = app!(h);

    let req = test::TestRequest::post()
        .uri(&format!("/api/v1/recover/confirm?key={}", key))
        .set_json(json!({ "password": "n3w-password", "password_confirmation": "n3w-password" }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    assert!(resp.headers().get(header::SET_COOKIE).is_none());
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["signed_in"], false);
    assert_eq!(body["data"]["redirect_to"], "/login?returnUrl=/app");

    let stored = h.repo.find_by_email("a@x.com").await.unwrap().unwrap();
    assert!(!stored.has_pending_verification());
    assert_ne!(stored.password_hash, account.password_hash);

    // The link is single-use
    let req = test::TestRequest::post()
        .uri(&format!("/api/v1/recover/confirm?key={}", key))
        .set_json(json!({ "password": "an0ther-one", "password_confirmation": "an0ther-one" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "TOKEN_INVALID");
}

#[actix_web::test]
async fn test_confirm_signs_in_when_enabled() {
    let h = harness(true, true);
    seed(&h, "a@x.com").await;
    h.state.recovery_service.begin("a@x.com", Some("/app")).await.unwrap();
    let key = emailed_key(&h, "a@x.com").await;
    let app = app!(h);

    let req = test::TestRequest::post()
        .uri(&format!("/api/v1/recover/confirm?key={}", key))
        .set_json(json!({ "password": "n3w-password", "password_confirmation": "n3w-password" }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    let cookie = resp
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .unwrap()
        .to_string();
    assert!(cookie.starts_with("reclaim_session="));
    assert!(cookie.contains("HttpOnly"));

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["signed_in"], true);
    assert_eq!(body["data"]["redirect_to"], "/app");
}

#[actix_web::test]
async fn test_confirm_input_errors_keep_the_token() {
    let h = harness(true, false);
    seed(&h, "a@x.com").await;
    h.state.recovery_service.begin("a@x.com", None).await.unwrap();
    let key = emailed_key(&h, "a@x.com").await;
    let app = app!(h);

    let cases = [
        json!({ "password": "n3w-password", "password_confirmation": "different-1" }),
        json!({ "password": "short", "password_confirmation": "short" }),
        json!({ "password": "lettersonly", "password_confirmation": "lettersonly" }),
    ];
    for case in cases {
        let req = test::TestRequest::post()
            .uri(&format!("/api/v1/recover/confirm?key={}", key))
            .set_json(case)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    let stored = h.repo.find_by_email("a@x.com").await.unwrap().unwrap();
    assert!(stored.has_pending_verification());
}

#[actix_web::test]
async fn test_expired_and_unknown_links_look_the_same() {
    let h = harness(true, false);
    seed(&h, "a@x.com").await;
    h.state.recovery_service.begin("a@x.com", None).await.unwrap();
    let key = emailed_key(&h, "a@x.com").await;
    h.clock.advance(Duration::hours(2));
    let app = app!(h);

    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/recover/confirm?key={}", key))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let expired: Value = test::read_body_json(resp).await;

    let req = test::TestRequest::get()
        .uri("/api/v1/recover/confirm?key=not-a-real-key")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let unknown: Value = test::read_body_json(resp).await;

    assert_eq!(expired["error"], unknown["error"]);
    assert_eq!(expired["message"], unknown["message"]);
}

#[actix_web::test]
async fn test_cancel_clears_pending_recovery() {
    let h = harness(true, false);
    seed(&h, "a@x.com").await;
    h.state.recovery_service.begin("a@x.com", Some("/app")).await.unwrap();
    let key = emailed_key(&h, "a@x.com").await;
    let app = app!(h);

    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/recover/cancel?key={}", key))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["redirect_to"], "/login?returnUrl=/app");

    let stored = h.repo.find_by_email("a@x.com").await.unwrap().unwrap();
    assert!(!stored.has_pending_verification());

    let req = test::TestRequest::post()
        .uri(&format!("/api/v1/recover/confirm?key={}", key))
        .set_json(json!({ "password": "n3w-password", "password_confirmation": "n3w-password" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn test_cancel_without_key_is_rejected() {
    let h = harness(true, false);
    let app = app!(h);

    let req = test::TestRequest::get().uri("/api/v1/recover/cancel").to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "TOKEN_INVALID");
}

#[actix_web::test]
async fn test_health_and_unknown_route() {
    let h = harness(true, false);
    let app = app!(h);

    let req = test::TestRequest::get().uri("/health").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], "healthy");

    let req = test::TestRequest::get().uri("/api/v1/nothing-here").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
