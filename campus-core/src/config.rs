//! # Campus Configuration
//!
//! Campus keeps configuration in a simple string key/value store, the
//! same `set` / `get` shape the rest of the stack uses. The resolvers
//! never read the process environment themselves: they receive a
//! read-only [`ConfigProvider`] and ask it for one of a fixed set of
//! [`ConfigKey`]s.
//!
//! ```rust
//! use campus_core::{CampusConfig, ConfigKey, ConfigProvider};
//!
//! let mut config = CampusConfig::new();
//! config.set("marketing.domain", "sjm.com");
//!
//! let snapshot = config.snapshot();
//! assert_eq!(snapshot.value(ConfigKey::MarketingDomain), Some("sjm.com".to_string()));
//! ```
//!
//! ## Environment
//! `CampusConfig::from_env()` reads each key's environment variable once:
//!
//! | key | store key | env var |
//! |---|---|---|
//! | `MARKETING_DOMAIN` | `marketing.domain` | `MARKETING_DOMAIN` |
//! | `EMAIL_API_KEY` | `email.api_key` | `RESEND_API_KEY` |
//! | `SMS_API_KEY` | `sms.api_key` | `ARKESEL_API_KEY` |
//! | `SMS_SENDER_ID` | `sms.sender_id` | `ARKESEL_SENDER_ID` |
//!
//! The env var names are the ones deployed installations already set.

use std::collections::HashMap;

/// The fixed key set the resolvers consume.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConfigKey {
    MarketingDomain,
    EmailApiKey,
    SmsApiKey,
    SmsSenderId,
}

impl ConfigKey {
    pub const ALL: [ConfigKey; 4] = [
        ConfigKey::MarketingDomain,
        ConfigKey::EmailApiKey,
        ConfigKey::SmsApiKey,
        ConfigKey::SmsSenderId,
    ];

    /// Canonical name, e.g. `MARKETING_DOMAIN`.
    pub fn name(&self) -> &'static str {
        match self {
            ConfigKey::MarketingDomain => "MARKETING_DOMAIN",
            ConfigKey::EmailApiKey => "EMAIL_API_KEY",
            ConfigKey::SmsApiKey => "SMS_API_KEY",
            ConfigKey::SmsSenderId => "SMS_SENDER_ID",
        }
    }

    /// Dotted key inside [`CampusConfig`].
    pub fn store_key(&self) -> &'static str {
        match self {
            ConfigKey::MarketingDomain => "marketing.domain",
            ConfigKey::EmailApiKey => "email.api_key",
            ConfigKey::SmsApiKey => "sms.api_key",
            ConfigKey::SmsSenderId => "sms.sender_id",
        }
    }

    /// Process environment variable holding the value.
    pub fn env_var(&self) -> &'static str {
        match self {
            ConfigKey::MarketingDomain => "MARKETING_DOMAIN",
            ConfigKey::EmailApiKey => "RESEND_API_KEY",
            ConfigKey::SmsApiKey => "ARKESEL_API_KEY",
            ConfigKey::SmsSenderId => "ARKESEL_SENDER_ID",
        }
    }
}

/// Read-only source of configuration values.
///
/// Implementations must return `None` for unset keys; empty strings
/// are treated as unset by [`ConfigProvider::value`].
pub trait ConfigProvider: Send + Sync {
    fn get(&self, key: ConfigKey) -> Option<String>;

    /// Trimmed, non-empty value for `key`.
    fn value(&self, key: ConfigKey) -> Option<String> {
        self.get(key)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }
}

#[derive(Debug, Default)]
pub struct CampusConfig {
    values: HashMap<String, String>,
}

impl CampusConfig {
    /// Create an empty config store.
    pub fn new() -> Self {
        Self {
            values: HashMap::new(),
        }
    }

    /// Load every [`ConfigKey`] from the process environment.
    pub fn from_env() -> Self {
        Self::from_vars(std::env::vars())
    }

    /// Load every [`ConfigKey`] from `(env var, value)` pairs.
    pub fn from_vars<I, K, V>(vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut config = Self::new();
        for (name, value) in vars {
            if let Some(key) = ConfigKey::ALL.iter().find(|k| k.env_var() == name.as_ref()) {
                config.set(key.store_key(), value);
            }
        }
        config
    }

    /// Set a configuration key to a string value.
    ///
    /// Example: config.set("http.port", "3000")
    pub fn set<K, V>(&mut self, key: K, value: V)
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.values.insert(key.into(), value.into());
    }

    /// Get a configuration value by key.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(|s| s.as_str())
    }

    pub fn has(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn snapshot(&self) -> CampusConfigSnapshot {
        CampusConfigSnapshot::new(self.values.clone())
    }
}

impl ConfigProvider for CampusConfig {
    fn get(&self, key: ConfigKey) -> Option<String> {
        self.values.get(key.store_key()).cloned()
    }
}

/// Immutable copy of a [`CampusConfig`], cheap to share behind an `Arc`.
#[derive(Debug, Clone, Default)]
pub struct CampusConfigSnapshot {
    map: HashMap<String, String>,
}

impl CampusConfigSnapshot {
    pub(crate) fn new(map: HashMap<String, String>) -> Self {
        Self { map }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.map.get(key).map(|s| s.as_str())
    }

    pub fn get_string(&self, key: &str) -> Option<String> {
        self.map.get(key).cloned()
    }

    pub fn get_u16(&self, key: &str) -> Option<u16> {
        self.get(key).and_then(|v| v.parse::<u16>().ok())
    }
}

impl ConfigProvider for CampusConfigSnapshot {
    fn get(&self, key: ConfigKey) -> Option<String> {
        self.get_string(key.store_key())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_vars_maps_deployed_env_names() {
        let config = CampusConfig::from_vars([
            ("RESEND_API_KEY", "env_resend"),
            ("ARKESEL_API_KEY", "env_arkesel_key"),
            ("ARKESEL_SENDER_ID", "env_arkesel_sender"),
            ("MARKETING_DOMAIN", "sjm.com"),
            ("UNRELATED", "ignored"),
        ]);

        assert_eq!(config.get("email.api_key"), Some("env_resend"));
        assert_eq!(config.get("sms.api_key"), Some("env_arkesel_key"));
        assert_eq!(config.get("sms.sender_id"), Some("env_arkesel_sender"));
        assert_eq!(config.get("marketing.domain"), Some("sjm.com"));
        assert!(!config.has("UNRELATED"));
    }

    #[test]
    fn blank_values_read_as_unset() {
        let mut config = CampusConfig::new();
        config.set("sms.api_key", "   ");
        config.set("email.api_key", " key ");

        let snap = config.snapshot();
        assert_eq!(snap.value(ConfigKey::SmsApiKey), None);
        assert_eq!(snap.value(ConfigKey::EmailApiKey), Some("key".to_string()));
        assert_eq!(snap.value(ConfigKey::SmsSenderId), None);
    }

    #[test]
    fn snapshot_is_detached_from_store() {
        let mut config = CampusConfig::new();
        config.set("http.port", "3000");
        let snap = config.snapshot();
        config.set("http.port", "4000");

        assert_eq!(snap.get_u16("http.port"), Some(3000));
        assert_eq!(config.get("http.port"), Some("4000"));
    }
}
