use campus_core::{TenantId, TenantRepository};
use campus_supabase::{StoreError, SupabaseTenantRepository, SCHOOL_COLUMNS};
use httpmock::prelude::*;
use serde_json::json;

#[tokio::test]
async fn finds_school_by_id_with_service_key() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/rest/v1/schools")
                .query_param("select", SCHOOL_COLUMNS)
                .query_param("id", "eq.7")
                .query_param("limit", "1")
                .header("apikey", "service-key")
                .header("authorization", "Bearer service-key");
            then.status(200).json_body(json!([{
                "id": 7,
                "name": "Hillside",
                "custom_domain": "hillside.edu.gh",
                "email_provider_api_key": null,
                "sms_provider_api_key": "school_sms",
                "sms_sender_id": null
            }]));
        })
        .await;

    let repo = SupabaseTenantRepository::new(&server.base_url(), "service-key").unwrap();
    let school = repo.find_by_id(&TenantId::from("7")).await.unwrap().unwrap();

    mock.assert_async().await;
    assert_eq!(school.id, "7");
    assert_eq!(school.custom_domain.as_deref(), Some("hillside.edu.gh"));
    assert_eq!(school.sms_provider_api_key.as_deref(), Some("school_sms"));
    assert_eq!(school.email_provider_api_key, None);
}

#[tokio::test]
async fn finds_school_by_custom_domain() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/rest/v1/schools")
                .query_param("custom_domain", "eq.portal.sjm.com");
            then.status(200)
                .json_body(json!([{ "id": "sjm", "name": "St. John's", "custom_domain": "portal.sjm.com" }]));
        })
        .await;

    let repo = SupabaseTenantRepository::new(&server.base_url(), "service-key").unwrap();
    let school = repo.find_by_domain("portal.sjm.com").await.unwrap();

    mock.assert_async().await;
    assert_eq!(school.map(|s| s.name), Some("St. John's".to_string()));
}

#[tokio::test]
async fn empty_result_is_none() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/rest/v1/schools");
            then.status(200).json_body(json!([]));
        })
        .await;

    let repo = SupabaseTenantRepository::new(&server.base_url(), "service-key").unwrap();
    assert!(repo.find_by_id(&TenantId::from("404")).await.unwrap().is_none());
}

#[tokio::test]
async fn error_status_is_surfaced_as_store_error() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/rest/v1/schools");
            then.status(401).body("{\"message\":\"Invalid API key\"}");
        })
        .await;

    let repo = SupabaseTenantRepository::new(&server.base_url(), "wrong").unwrap();
    let err = repo.find_by_id(&TenantId::from("1")).await.unwrap_err();

    match err.downcast_ref::<StoreError>() {
        Some(StoreError::Status { status, body }) => {
            assert_eq!(*status, 401);
            assert!(body.contains("Invalid API key"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn rejects_bad_configuration() {
    assert!(matches!(
        SupabaseTenantRepository::new("https://x.supabase.co", "  "),
        Err(StoreError::MissingKey)
    ));
    assert!(matches!(
        SupabaseTenantRepository::new("not a url", "key"),
        Err(StoreError::InvalidUrl(_))
    ));
    assert!(matches!(
        SupabaseTenantRepository::new("https://x.supabase.co", "bad\nkey"),
        Err(StoreError::InvalidKey)
    ));
}

#[tokio::test]
async fn project_url_path_is_kept_when_joining() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/proxy/rest/v1/schools")
                .query_param("custom_domain", "eq.portal.sjm.com");
            then.status(200).json_body(json!([{ "id": 1, "name": "St. John's" }]));
        })
        .await;

    let url = format!("{}/proxy", server.base_url());
    let repo = SupabaseTenantRepository::new(&url, "service-key").unwrap();
    let school = repo.find_by_domain("portal.sjm.com").await.unwrap().unwrap();

    mock.assert_async().await;
    assert_eq!(school.name, "St. John's");
}
