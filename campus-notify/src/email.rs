use std::sync::Arc;

use campus_core::{CredentialResolver, TenantId};
use serde::Serialize;
use tracing::info;

use crate::error::{NotifyError, NotifyResult};
use crate::Dispatch;

pub const RESEND_BASE_URL: &str = "https://api.resend.com";

/// One transactional email, in the provider's request shape.
#[derive(Debug, Clone, Serialize)]
pub struct Email {
    pub from: String,
    pub to: Vec<String>,
    pub subject: String,
    pub html: String,
}

impl Email {
    pub fn new(
        from: impl Into<String>,
        to: impl Into<String>,
        subject: impl Into<String>,
        html: impl Into<String>,
    ) -> Self {
        Self {
            from: from.into(),
            to: vec![to.into()],
            subject: subject.into(),
            html: html.into(),
        }
    }

    fn validate(&self) -> NotifyResult<()> {
        if self.to.iter().all(|t| t.trim().is_empty()) {
            return Err(NotifyError::InvalidMessage("no recipients".into()));
        }
        if self.from.trim().is_empty() {
            return Err(NotifyError::InvalidMessage("missing sender".into()));
        }
        Ok(())
    }
}

#[derive(Clone)]
pub struct EmailSender {
    client: reqwest::Client,
    base_url: String,
    credentials: Arc<CredentialResolver>,
}

impl EmailSender {
    pub fn new(credentials: Arc<CredentialResolver>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: RESEND_BASE_URL.to_string(),
            credentials,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub async fn send(&self, tenant: Option<&TenantId>, email: &Email) -> NotifyResult<Dispatch> {
        email.validate()?;

        let creds = self.credentials.resolve(tenant).await;
        let api_key = creds
            .email_api_key
            .value()
            .ok_or(NotifyError::MissingCredential("email_api_key"))?;

        let res = self
            .client
            .post(format!("{}/emails", self.base_url))
            .bearer_auth(api_key)
            .json(email)
            .send()
            .await?;

        let status = res.status();
        if !status.is_success() {
            return Err(NotifyError::Provider {
                provider: "resend",
                status: status.as_u16(),
                body: res.text().await.unwrap_or_default(),
            });
        }
        let response = res.json::<serde_json::Value>().await?;

        let used_tenant_credentials = creds.email_api_key.is_from_tenant();
        info!(
            tenant_id = tenant.map(TenantId::as_str).unwrap_or("-"),
            recipients = email.to.len(),
            tenant_key = used_tenant_credentials,
            "email sent"
        );

        Ok(Dispatch {
            provider: "resend",
            used_tenant_credentials,
            response,
        })
    }
}
