//! Core multi-tenant types for Campus.

use std::fmt;

/// A school identifier.
///
/// Numeric primary keys are carried as their decimal string.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct TenantId(pub String);

impl TenantId {
    pub fn new<S: Into<String>>(id: S) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TenantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TenantId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for TenantId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<i64> for TenantId {
    fn from(id: i64) -> Self {
        Self(id.to_string())
    }
}

/// One school row as read from the data store.
///
/// Field names match the `schools` table columns. Campus never
/// creates or mutates these rows; provisioning happens elsewhere.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tenant {
    #[cfg_attr(feature = "serde", serde(deserialize_with = "de::id_from_string_or_number"))]
    pub id: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub name: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub custom_domain: Option<String>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub email_provider_api_key: Option<String>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub sms_provider_api_key: Option<String>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub sms_sender_id: Option<String>,
}

impl Tenant {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn tenant_id(&self) -> TenantId {
        TenantId(self.id.clone())
    }

    pub fn with_custom_domain(mut self, domain: impl Into<String>) -> Self {
        self.custom_domain = Some(domain.into());
        self
    }

    pub fn with_email_api_key(mut self, key: impl Into<String>) -> Self {
        self.email_provider_api_key = Some(key.into());
        self
    }

    pub fn with_sms_api_key(mut self, key: impl Into<String>) -> Self {
        self.sms_provider_api_key = Some(key.into());
        self
    }

    pub fn with_sms_sender_id(mut self, sender: impl Into<String>) -> Self {
        self.sms_sender_id = Some(sender.into());
        self
    }
}

#[cfg(feature = "serde")]
mod de {
    use serde::{Deserialize, Deserializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Number(i64),
    }

    // The hosted store hands out bigint keys as JSON numbers.
    pub(super) fn id_from_string_or_number<'de, D>(d: D) -> Result<String, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match RawId::deserialize(d)? {
            RawId::Text(s) => s,
            RawId::Number(n) => n.to_string(),
        })
    }
}
