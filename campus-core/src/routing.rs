//! # Host routing
//!
//! Every page request is classified by host and path before it reaches a
//! handler. Schools served on their own custom domain are rewritten to
//! `/{host}{path}` so that one handler keyed on the first path segment can
//! serve every school.
//!
//! Evaluation order, first match wins:
//! 1. reserved internal prefix on the path → [`RoutingDecision::InternalAppRoute`]
//! 2. host contains the preview marker → `Passthrough(PreviewHost)`
//! 3. marketing domain not configured → `Passthrough(Unconfigured)`, logged as an error
//! 4. host header missing or empty → `Passthrough(MissingHost)`
//! 5. host is the marketing domain (or its `www.` alias) → [`RoutingDecision::MainDomain`]
//! 6. anything else → [`RoutingDecision::TenantRewrite`]
//!
//! No branch fails: a broken rewrite must never take the marketing site down.

use tracing::error;

use crate::config::{ConfigKey, ConfigProvider};

/// Dashboards and authentication routes. Never captured by tenant rewriting.
pub const DEFAULT_RESERVED_PREFIXES: &[&str] = &[
    "/admin",
    "/teacher",
    "/student",
    "/super-admin",
    "/login",
    "/signup",
    "/auth",
    "/onboarding",
    "/unauthorized",
];

/// Substring that identifies ephemeral preview deployments.
pub const DEFAULT_PREVIEW_MARKER: &str = "vercel.app";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PassthroughReason {
    PreviewHost,
    MissingHost,
    Unconfigured,
    /// The rewritten path was not a valid URI; set by the HTTP layer.
    InvalidRewrite,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoutingDecision {
    /// Path is an internal application route; served unmodified.
    InternalAppRoute,
    /// Served unmodified without tenant handling.
    Passthrough(PassthroughReason),
    /// The marketing site; served unmodified.
    MainDomain,
    /// School traffic. `path` is `/{host}{path}` plus the original query.
    TenantRewrite { host: String, path: String },
}

impl RoutingDecision {
    /// Rewritten path-and-query, only for tenant traffic.
    pub fn rewritten_path(&self) -> Option<&str> {
        match self {
            RoutingDecision::TenantRewrite { path, .. } => Some(path),
            _ => None,
        }
    }

    /// Whether the request is served exactly as received.
    pub fn is_unmodified(&self) -> bool {
        self.rewritten_path().is_none()
    }

    pub fn kind(&self) -> &'static str {
        match self {
            RoutingDecision::InternalAppRoute => "internal_app_route",
            RoutingDecision::Passthrough(_) => "passthrough",
            RoutingDecision::MainDomain => "main_domain",
            RoutingDecision::TenantRewrite { .. } => "tenant_rewrite",
        }
    }
}

/// Static routing configuration.
#[derive(Debug, Clone)]
pub struct RoutingRules {
    reserved_prefixes: Vec<String>,
    preview_marker: String,
    marketing_domain: Option<String>,
}

impl RoutingRules {
    /// Default prefixes and preview marker with the given marketing domain.
    ///
    /// `marketing_domain` may be a bare hostname or a URL; anything that
    /// does not reduce to a hostname counts as not configured.
    pub fn new(marketing_domain: Option<&str>) -> Self {
        Self {
            reserved_prefixes: DEFAULT_RESERVED_PREFIXES
                .iter()
                .map(|p| p.to_string())
                .collect(),
            preview_marker: DEFAULT_PREVIEW_MARKER.to_string(),
            marketing_domain: marketing_domain.and_then(normalize_domain),
        }
    }

    pub fn from_config(config: &dyn ConfigProvider) -> Self {
        Self::new(config.value(ConfigKey::MarketingDomain).as_deref())
    }

    pub fn with_reserved_prefixes<I, S>(mut self, prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.reserved_prefixes = prefixes.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_preview_marker(mut self, marker: impl Into<String>) -> Self {
        self.preview_marker = marker.into();
        self
    }

    pub fn marketing_domain(&self) -> Option<&str> {
        self.marketing_domain.as_deref()
    }

    pub fn reserved_prefixes(&self) -> &[String] {
        &self.reserved_prefixes
    }

    /// Literal prefix match, no patterns.
    pub fn is_reserved(&self, path: &str) -> bool {
        self.reserved_prefixes
            .iter()
            .any(|p| path.starts_with(p.as_str()))
    }

    fn is_preview(&self, hostname: &str) -> bool {
        !self.preview_marker.is_empty() && hostname.contains(self.preview_marker.as_str())
    }

    fn is_marketing(&self, hostname: &str, domain: &str) -> bool {
        hostname == domain || hostname.strip_prefix("www.") == Some(domain)
    }
}

/// Classifies inbound requests. Stateless; share it behind an `Arc`.
#[derive(Debug, Clone)]
pub struct TenantResolver {
    rules: RoutingRules,
}

impl TenantResolver {
    pub fn new(rules: RoutingRules) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &RoutingRules {
        &self.rules
    }

    /// Classify one request.
    ///
    /// `host` is the raw `Host` header value (port allowed), `path` the
    /// request path and `query` the raw query string without `?`.
    pub fn resolve(&self, host: Option<&str>, path: &str, query: Option<&str>) -> RoutingDecision {
        if self.rules.is_reserved(path) {
            return RoutingDecision::InternalAppRoute;
        }

        let hostname = host.map(hostname_of).filter(|h| !h.is_empty());

        if hostname.is_some_and(|h| self.rules.is_preview(h)) {
            return RoutingDecision::Passthrough(PassthroughReason::PreviewHost);
        }

        let Some(domain) = self.rules.marketing_domain() else {
            error!(
                host = hostname.unwrap_or(""),
                path,
                "MARKETING_DOMAIN is not configured; tenant routing disabled"
            );
            return RoutingDecision::Passthrough(PassthroughReason::Unconfigured);
        };

        let Some(hostname) = hostname else {
            return RoutingDecision::Passthrough(PassthroughReason::MissingHost);
        };

        if self.rules.is_marketing(hostname, domain) {
            return RoutingDecision::MainDomain;
        }

        RoutingDecision::TenantRewrite {
            host: hostname.to_string(),
            path: rewrite_path(hostname, path, query),
        }
    }
}

/// Hostname part of a `Host` header value: port removed, surrounding
/// whitespace trimmed. Bracketed IPv6 literals keep their brackets.
pub fn hostname_of(host: &str) -> &str {
    let host = host.trim();
    if host.starts_with('[') {
        return match host.find(']') {
            Some(end) => &host[..=end],
            None => host,
        };
    }
    match host.rsplit_once(':') {
        Some((name, port)) if !port.is_empty() && port.bytes().all(|b| b.is_ascii_digit()) => name,
        _ => host,
    }
}

fn rewrite_path(hostname: &str, path: &str, query: Option<&str>) -> String {
    let mut out = String::with_capacity(hostname.len() + path.len() + 2);
    out.push('/');
    out.push_str(hostname);
    if !path.starts_with('/') {
        out.push('/');
    }
    out.push_str(path);
    if let Some(q) = query.filter(|q| !q.is_empty()) {
        out.push('?');
        out.push_str(q);
    }
    out
}

fn normalize_domain(raw: &str) -> Option<String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    let candidate = if raw.contains("://") {
        raw.to_string()
    } else {
        format!("http://{raw}")
    };
    url::Url::parse(&candidate)
        .ok()
        .and_then(|u| u.host_str().map(str::to_string))
        .filter(|h| !h.is_empty())
}
