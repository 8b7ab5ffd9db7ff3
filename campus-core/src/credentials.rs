//! # Provider credentials
//!
//! Outbound email and SMS run with the school's own provider keys when
//! it has them and with the deployment defaults otherwise. Each field is
//! resolved on its own: a school may bring its SMS key and still use the
//! default email key.
//!
//! | field | school column | default (`ConfigKey`) |
//! |---|---|---|
//! | `email_api_key` | `email_provider_api_key` | `EMAIL_API_KEY` |
//! | `sms.api_key` | `sms_provider_api_key` | `SMS_API_KEY` |
//! | `sms.sender_id` | `sms_sender_id` | `SMS_SENDER_ID` |
//!
//! Resolution never fails. A missing id, a missing row and a lookup
//! error all mean "use the defaults"; the lookup is tried once.

use std::fmt;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::config::{ConfigKey, ConfigProvider};
use crate::repository::TenantRepository;
use crate::tenant::{Tenant, TenantId};

/// Where a resolved value came from.
#[derive(Clone, PartialEq, Eq)]
pub enum CredentialField {
    FromTenant(String),
    FromDefault(String),
    Absent,
}

impl CredentialField {
    pub fn value(&self) -> Option<&str> {
        match self {
            CredentialField::FromTenant(v) | CredentialField::FromDefault(v) => Some(v),
            CredentialField::Absent => None,
        }
    }

    pub fn is_from_tenant(&self) -> bool {
        matches!(self, CredentialField::FromTenant(_))
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, CredentialField::Absent)
    }

    fn source(&self) -> &'static str {
        match self {
            CredentialField::FromTenant(_) => "tenant",
            CredentialField::FromDefault(_) => "default",
            CredentialField::Absent => "absent",
        }
    }

    fn pick(tenant_value: Option<&str>, default: Option<String>) -> Self {
        match tenant_value.map(str::trim).filter(|v| !v.is_empty()) {
            Some(v) => CredentialField::FromTenant(v.to_string()),
            None => match default {
                Some(d) => CredentialField::FromDefault(d),
                None => CredentialField::Absent,
            },
        }
    }
}

// Secrets stay out of logs and panic messages.
impl fmt::Debug for CredentialField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CredentialField::FromTenant(_) => f.write_str("FromTenant(***)"),
            CredentialField::FromDefault(_) => f.write_str("FromDefault(***)"),
            CredentialField::Absent => f.write_str("Absent"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SmsCredentials {
    pub api_key: CredentialField,
    pub sender_id: CredentialField,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedCredentials {
    pub email_api_key: CredentialField,
    pub sms: SmsCredentials,
}

impl ResolvedCredentials {
    fn merge(tenant: Option<&Tenant>, config: &dyn ConfigProvider) -> Self {
        Self {
            email_api_key: CredentialField::pick(
                tenant.and_then(|t| t.email_provider_api_key.as_deref()),
                config.value(ConfigKey::EmailApiKey),
            ),
            sms: SmsCredentials {
                api_key: CredentialField::pick(
                    tenant.and_then(|t| t.sms_provider_api_key.as_deref()),
                    config.value(ConfigKey::SmsApiKey),
                ),
                sender_id: CredentialField::pick(
                    tenant.and_then(|t| t.sms_sender_id.as_deref()),
                    config.value(ConfigKey::SmsSenderId),
                ),
            },
        }
    }
}

/// Merges per-school provider keys over deployment defaults.
#[derive(Clone)]
pub struct CredentialResolver {
    repository: Arc<dyn TenantRepository>,
    config: Arc<dyn ConfigProvider>,
}

impl CredentialResolver {
    pub fn new(repository: Arc<dyn TenantRepository>, config: Arc<dyn ConfigProvider>) -> Self {
        Self { repository, config }
    }

    pub async fn resolve(&self, tenant_id: Option<&TenantId>) -> ResolvedCredentials {
        let tenant = match tenant_id {
            Some(id) => self.lookup(id).await,
            None => None,
        };

        let resolved = ResolvedCredentials::merge(tenant.as_ref(), self.config.as_ref());
        debug!(
            tenant_id = tenant_id.map(TenantId::as_str).unwrap_or("-"),
            email = resolved.email_api_key.source(),
            sms_key = resolved.sms.api_key.source(),
            sms_sender = resolved.sms.sender_id.source(),
            "resolved provider credentials"
        );
        resolved
    }

    async fn lookup(&self, id: &TenantId) -> Option<Tenant> {
        match self.repository.find_by_id(id).await {
            Ok(found) => found,
            Err(e) => {
                warn!(tenant_id = %id, error = %e, "school lookup failed; using default credentials");
                None
            }
        }
    }
}
