//! End-to-end recovery with the email notifier and JWT sessions

use std::sync::Arc;

use rc_core::domain::entities::Account;
use rc_core::repositories::{AccountRepository, InMemoryAccountRepository};
use rc_core::services::{RecoveryService, RecoveryServiceConfig};
use rc_infra::email::{EmailRecoveryNotifier, MockEmailService};
use rc_infra::session::JwtSessionAuthenticator;
use rc_shared::SessionConfig;

fn extract_key(body: &str, marker: &str) -> String {
    let start = body.find(marker).expect("link present") + marker.len();
    body[start..]
        .chars()
        .take_while(|c| c.is_ascii_alphanumeric() || *c == '-' || *c == '_')
        .collect()
}

#[tokio::test]
async fn test_reset_via_emailed_link_signs_user_in() {
    let repo = Arc::new(InMemoryAccountRepository::new());
    let mailbox = Arc::new(MockEmailService::new());
    let notifier = Arc::new(EmailRecoveryNotifier::new(mailbox.clone(), "https://id.example.com"));
    let authenticator = Arc::new(JwtSessionAuthenticator::new(SessionConfig::new("integration-secret")));
    let config = RecoveryServiceConfig {
        login_after_recovery: true,
        password_hash_cost: 4,
        ..Default::default()
    };
    let service = RecoveryService::new(repo.clone(), notifier, authenticator.clone(), config);

    let account = Account::new("a@x.com", None);
    repo.save(&account).await.unwrap();

    service.begin("a@x.com", Some("/app")).await.unwrap();
    let email = mailbox.last_message_to("a@x.com").await.unwrap();
    let key = extract_key(&email.text_body, "/recover/confirm?key=");
    assert_eq!(key, extract_key(&email.text_body, "/recover/cancel?key="));

    let outcome = service.confirm(&key, "Secr3t!").await.unwrap();

    assert_eq!(outcome.redirect_to, "/app");
    let session = outcome.session.unwrap();
    let claims = authenticator.verify(&session.token).unwrap();
    assert_eq!(claims.sub, account.id.to_string());
}

#[tokio::test]
async fn test_failed_email_still_leaves_cancellable_token() {
    let repo = Arc::new(InMemoryAccountRepository::new());
    let notifier = Arc::new(EmailRecoveryNotifier::new(
        Arc::new(MockEmailService::failing()),
        "https://id.example.com",
    ));
    let authenticator = Arc::new(JwtSessionAuthenticator::new(SessionConfig::default()));
    let service = RecoveryService::new(repo.clone(), notifier, authenticator, RecoveryServiceConfig::default());

    repo.save(&Account::new("a@x.com", None)).await.unwrap();

    let outcome = service.begin("a@x.com", None).await.unwrap();

    assert!(!outcome.delivered);
    let stored = repo.find_by_email("a@x.com").await.unwrap().unwrap();
    assert!(stored.has_pending_verification());
}
