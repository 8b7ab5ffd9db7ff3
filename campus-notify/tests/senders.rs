use std::sync::Arc;

use campus_core::{
    CampusConfig, CampusError, CredentialResolver, ErrorKind, InMemoryTenantRepository, Tenant,
    TenantId,
};
use campus_notify::{Email, EmailSender, NotifyError, SmsSender};
use httpmock::prelude::*;
use serde_json::json;

fn resolver(env: &[(&str, &str)]) -> Arc<CredentialResolver> {
    let repo = InMemoryTenantRepository::with_tenants([
        Tenant::new("1", "St. John's")
            .with_sms_api_key("school_sms")
            .with_sms_sender_id("STJOHNS"),
        Tenant::new("2", "Hillside").with_email_api_key("school_resend"),
    ]);
    let config = CampusConfig::from_vars(env.iter().copied());
    Arc::new(CredentialResolver::new(Arc::new(repo), Arc::new(config.snapshot())))
}

fn all_defaults() -> Arc<CredentialResolver> {
    resolver(&[
        ("RESEND_API_KEY", "env_resend"),
        ("ARKESEL_API_KEY", "env_arkesel_key"),
        ("ARKESEL_SENDER_ID", "env_arkesel_sender"),
    ])
}

#[tokio::test]
async fn sms_uses_school_key_and_sender() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/api/v2/sms/send")
                .header("api-key", "school_sms")
                .json_body(json!({
                    "sender": "STJOHNS",
                    "message": "Fees are due on Friday",
                    "recipients": ["233200000001"]
                }));
            then.status(200).json_body(json!({ "status": "success" }));
        })
        .await;

    let sms = SmsSender::new(all_defaults()).with_base_url(server.base_url());
    let dispatch = sms
        .send(Some(&TenantId::from("1")), &["233200000001"], "Fees are due on Friday")
        .await
        .unwrap();

    mock.assert_async().await;
    assert!(dispatch.used_tenant_credentials);
    assert_eq!(dispatch.response["status"], "success");
}

#[tokio::test]
async fn sms_without_tenant_uses_env_defaults() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/api/v2/sms/send")
                .header("api-key", "env_arkesel_key")
                .json_body_partial(r#"{ "sender": "env_arkesel_sender" }"#);
            then.status(200).json_body(json!({ "status": "success" }));
        })
        .await;

    let sms = SmsSender::new(all_defaults()).with_base_url(server.base_url());
    let dispatch = sms.send(None, &["233200000002"], "Hello").await.unwrap();

    mock.assert_async().await;
    assert!(!dispatch.used_tenant_credentials);
}

#[tokio::test]
async fn sms_without_any_key_fails_before_calling_provider() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST);
            then.status(200);
        })
        .await;

    let sms = SmsSender::new(resolver(&[("ARKESEL_SENDER_ID", "env_arkesel_sender")]))
        .with_base_url(server.base_url());
    let err = sms
        .send(Some(&TenantId::from("2")), &["233200000003"], "Hello")
        .await
        .unwrap_err();

    assert!(matches!(err, NotifyError::MissingCredential("sms.api_key")));
    assert_eq!(mock.hits_async().await, 0);
}

#[tokio::test]
async fn sms_rejects_empty_recipient_list() {
    let sms = SmsSender::new(all_defaults()).with_base_url("http://127.0.0.1:9");
    let err = sms.send(None, &["  "], "Hello").await.unwrap_err();
    assert!(matches!(err, NotifyError::InvalidMessage(_)));
}

#[tokio::test]
async fn email_uses_default_key_when_school_has_none() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/emails")
                .header("authorization", "Bearer env_resend")
                .json_body(json!({
                    "from": "noreply@sjm.com",
                    "to": ["parent@example.com"],
                    "subject": "Term results",
                    "html": "<p>Ready</p>"
                }));
            then.status(200).json_body(json!({ "id": "email_123" }));
        })
        .await;

    let email = EmailSender::new(all_defaults()).with_base_url(server.base_url());
    let msg = Email::new("noreply@sjm.com", "parent@example.com", "Term results", "<p>Ready</p>");
    let dispatch = email.send(Some(&TenantId::from("1")), &msg).await.unwrap();

    mock.assert_async().await;
    assert!(!dispatch.used_tenant_credentials);
    assert_eq!(dispatch.response["id"], "email_123");
}

#[tokio::test]
async fn email_uses_school_key() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/emails")
                .header("authorization", "Bearer school_resend");
            then.status(200).json_body(json!({ "id": "email_456" }));
        })
        .await;

    let email = EmailSender::new(all_defaults()).with_base_url(server.base_url());
    let msg = Email::new("noreply@hillside.edu", "parent@example.com", "Fees", "<p>Due</p>");
    let dispatch = email.send(Some(&TenantId::from("2")), &msg).await.unwrap();

    mock.assert_async().await;
    assert!(dispatch.used_tenant_credentials);
}

#[tokio::test]
async fn provider_rejection_maps_to_bad_gateway() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/emails");
            then.status(422).body("{\"message\":\"Invalid `from` field\"}");
        })
        .await;

    let email = EmailSender::new(all_defaults()).with_base_url(server.base_url());
    let msg = Email::new("bad", "parent@example.com", "Fees", "<p>Due</p>");
    let err = email.send(None, &msg).await.unwrap_err();

    match &err {
        NotifyError::Provider { provider, status, .. } => {
            assert_eq!(*provider, "resend");
            assert_eq!(*status, 422);
        }
        other => panic!("unexpected error: {other:?}"),
    }

    let campus: CampusError = err.into();
    assert_eq!(campus.kind, ErrorKind::BadGateway);
    assert!(!campus.message.contains("Invalid"));
}

#[test]
fn missing_credential_maps_to_unavailable() {
    let campus: CampusError = NotifyError::MissingCredential("email_api_key").into();
    assert_eq!(campus.code(), 503);
}
