use anyhow::Result;
use async_trait::async_trait;
use campus_core::{Tenant, TenantId, TenantRepository};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION};
use tracing::debug;

use crate::error::{StoreError, StoreResult};

/// Columns read from the `schools` table.
pub const SCHOOL_COLUMNS: &str =
    "id,name,custom_domain,email_provider_api_key,sms_provider_api_key,sms_sender_id";

const DEFAULT_TABLE: &str = "schools";

/// Reads schools through PostgREST (`{url}/rest/v1/{table}`).
///
/// Uses the service-role key; rows hold provider secrets and are never
/// exposed to browsers.
#[derive(Clone)]
pub struct SupabaseTenantRepository {
    client: reqwest::Client,
    endpoint: url::Url,
}

impl SupabaseTenantRepository {
    pub fn new(project_url: &str, service_key: &str) -> StoreResult<Self> {
        Self::with_table(project_url, service_key, DEFAULT_TABLE)
    }

    pub fn with_table(project_url: &str, service_key: &str, table: &str) -> StoreResult<Self> {
        let service_key = service_key.trim();
        if service_key.is_empty() {
            return Err(StoreError::MissingKey);
        }

        let mut base = url::Url::parse(project_url.trim())
            .map_err(|e| StoreError::InvalidUrl(format!("{project_url}: {e}")))?;
        // `join` replaces the last segment unless the path ends in a slash
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        let endpoint = base
            .join(&format!("rest/v1/{table}"))
            .map_err(|e| StoreError::InvalidUrl(format!("{project_url}: {e}")))?;

        let mut headers = HeaderMap::new();
        let key = HeaderValue::from_str(service_key).map_err(|_| StoreError::InvalidKey)?;
        let bearer = HeaderValue::from_str(&format!("Bearer {service_key}"))
            .map_err(|_| StoreError::InvalidKey)?;
        headers.insert("apikey", key);
        headers.insert(AUTHORIZATION, bearer);
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;

        Ok(Self { client, endpoint })
    }

    /// At most one row where `column` equals `value`.
    async fn find_one(&self, column: &str, value: &str) -> StoreResult<Option<Tenant>> {
        let filter = format!("eq.{value}");
        let res = self
            .client
            .get(self.endpoint.clone())
            .query(&[("select", SCHOOL_COLUMNS), (column, filter.as_str()), ("limit", "1")])
            .send()
            .await?;

        let status = res.status();
        if !status.is_success() {
            let body = res.text().await.unwrap_or_default();
            return Err(StoreError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let mut rows: Vec<Tenant> = res.json().await?;
        debug!(column, value, rows = rows.len(), "school lookup");
        Ok(if rows.is_empty() { None } else { Some(rows.swap_remove(0)) })
    }
}

#[async_trait]
impl TenantRepository for SupabaseTenantRepository {
    async fn find_by_id(&self, id: &TenantId) -> Result<Option<Tenant>> {
        Ok(self.find_one("id", id.as_str()).await?)
    }

    async fn find_by_domain(&self, domain: &str) -> Result<Option<Tenant>> {
        Ok(self.find_one("custom_domain", domain).await?)
    }
}
