use std::collections::HashMap;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use campus_core::{CampusConfig, InMemoryTenantRepository, TenantRepository};
use campus_supabase::SupabaseTenantRepository;
use tracing::{info, warn};

/// Server settings on top of the resolver keys: (env var, store key, default).
const SERVER_SETTINGS: [(&str, &str, Option<&str>); 7] = [
    ("HTTP_HOST", "http.host", Some("127.0.0.1")),
    ("HTTP_PORT", "http.port", Some("3000")),
    ("SUPABASE_URL", "supabase.url", None),
    ("SUPABASE_SERVICE_ROLE_KEY", "supabase.service_key", None),
    ("INTERNAL_API_TOKEN", "notify.api_token", None),
    ("ARKESEL_BASE_URL", "sms.base_url", None),
    ("RESEND_BASE_URL", "email.base_url", None),
];

/// Load configuration from the process environment.
pub fn load() -> Result<CampusConfig> {
    load_from(std::env::vars())
}

/// Load configuration from `(env var, value)` pairs.
pub fn load_from<I, K, V>(vars: I) -> Result<CampusConfig>
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<String>,
{
    let vars: HashMap<String, String> = vars
        .into_iter()
        .map(|(k, v)| (k.into(), v.into()))
        .collect();

    let mut config = CampusConfig::from_vars(vars.iter().map(|(k, v)| (k.as_str(), v.as_str())));

    for (env, key, default) in SERVER_SETTINGS {
        match vars.get(env).map(|v| v.trim()).filter(|v| !v.is_empty()) {
            Some(value) => config.set(key, value),
            None => {
                if let Some(default) = default {
                    config.set(key, default);
                }
            }
        }
    }

    if let Some(port) = config.get("http.port") {
        if port.parse::<u16>().is_err() {
            bail!("HTTP_PORT must be a port number, got {port:?}");
        }
    }

    Ok(config)
}

/// Supabase when both settings are present, otherwise an empty in-memory directory.
pub fn tenant_repository(config: &CampusConfig) -> Result<Arc<dyn TenantRepository>> {
    match (config.get("supabase.url"), config.get("supabase.service_key")) {
        (Some(url), Some(key)) => {
            let repo = SupabaseTenantRepository::new(url, key)
                .context("invalid Supabase settings")?;
            info!(url, "school directory: supabase");
            Ok(Arc::new(repo))
        }
        _ => {
            warn!("SUPABASE_URL or SUPABASE_SERVICE_ROLE_KEY not set; no school domains will resolve");
            Ok(Arc::new(InMemoryTenantRepository::new()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_fill_http_settings() {
        let config = load_from([("MARKETING_DOMAIN", "sjm.com")]).unwrap();

        assert_eq!(config.get("http.host"), Some("127.0.0.1"));
        assert_eq!(config.get("http.port"), Some("3000"));
        assert_eq!(config.get("marketing.domain"), Some("sjm.com"));
        assert!(!config.has("supabase.url"));
    }

    #[test]
    fn blank_env_values_fall_back_to_defaults() {
        let config = load_from([("HTTP_PORT", "  "), ("INTERNAL_API_TOKEN", "")]).unwrap();

        assert_eq!(config.get("http.port"), Some("3000"));
        assert!(!config.has("notify.api_token"));
    }

    #[test]
    fn rejects_non_numeric_port() {
        let err = load_from([("HTTP_PORT", "eighty")]).unwrap_err();
        assert!(err.to_string().contains("HTTP_PORT"));
    }

    #[test]
    fn missing_supabase_settings_use_memory_directory() {
        let config = load_from([("SUPABASE_URL", "https://abc.supabase.co")]).unwrap();
        assert!(tenant_repository(&config).is_ok());
    }

    #[test]
    fn supabase_settings_build_remote_directory() {
        let config = load_from([
            ("SUPABASE_URL", "https://abc.supabase.co"),
            ("SUPABASE_SERVICE_ROLE_KEY", "service-role"),
        ])
        .unwrap();
        assert!(tenant_repository(&config).is_ok());
    }

    #[test]
    fn bad_supabase_url_is_an_error() {
        let config = load_from([
            ("SUPABASE_URL", "not a url"),
            ("SUPABASE_SERVICE_ROLE_KEY", "service-role"),
        ])
        .unwrap();
        let err = tenant_repository(&config).err().unwrap();
        assert!(err.to_string().contains("Supabase"));
    }
}
