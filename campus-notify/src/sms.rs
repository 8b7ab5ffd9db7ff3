use std::sync::Arc;

use campus_core::{CredentialResolver, TenantId};
use serde::Serialize;
use tracing::info;

use crate::error::{NotifyError, NotifyResult};
use crate::Dispatch;

pub const ARKESEL_BASE_URL: &str = "https://sms.arkesel.com";

#[derive(Debug, Serialize)]
struct SendSms<'a> {
    sender: &'a str,
    message: &'a str,
    recipients: Vec<&'a str>,
}

/// Sends SMS through Arkesel with the school's key and sender id.
#[derive(Clone)]
pub struct SmsSender {
    client: reqwest::Client,
    base_url: String,
    credentials: Arc<CredentialResolver>,
}

impl SmsSender {
    pub fn new(credentials: Arc<CredentialResolver>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: ARKESEL_BASE_URL.to_string(),
            credentials,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Send `message` to every number in `recipients`.
    ///
    /// Needs both the SMS key and the sender id; either one missing
    /// fails with [`NotifyError::MissingCredential`] before any request.
    pub async fn send(
        &self,
        tenant: Option<&TenantId>,
        recipients: &[&str],
        message: &str,
    ) -> NotifyResult<Dispatch> {
        let recipients: Vec<&str> = recipients
            .iter()
            .map(|r| r.trim())
            .filter(|r| !r.is_empty())
            .collect();
        if recipients.is_empty() {
            return Err(NotifyError::InvalidMessage("no recipients".into()));
        }
        if message.trim().is_empty() {
            return Err(NotifyError::InvalidMessage("empty message".into()));
        }

        let creds = self.credentials.resolve(tenant).await;
        let api_key = creds
            .sms
            .api_key
            .value()
            .ok_or(NotifyError::MissingCredential("sms.api_key"))?;
        let sender = creds
            .sms
            .sender_id
            .value()
            .ok_or(NotifyError::MissingCredential("sms.sender_id"))?;

        let count = recipients.len();
        let res = self
            .client
            .post(format!("{}/api/v2/sms/send", self.base_url))
            .header("api-key", api_key)
            .json(&SendSms {
                sender,
                message,
                recipients,
            })
            .send()
            .await?;

        let status = res.status();
        if !status.is_success() {
            return Err(NotifyError::Provider {
                provider: "arkesel",
                status: status.as_u16(),
                body: res.text().await.unwrap_or_default(),
            });
        }
        let response = res.json::<serde_json::Value>().await?;

        let used_tenant_credentials = creds.sms.api_key.is_from_tenant();
        info!(
            tenant_id = tenant.map(TenantId::as_str).unwrap_or("-"),
            recipients = count,
            tenant_key = used_tenant_credentials,
            "sms sent"
        );

        Ok(Dispatch {
            provider: "arkesel",
            used_tenant_credentials,
            response,
        })
    }
}
