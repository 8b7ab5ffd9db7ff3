use std::convert::Infallible;

use axum::{extract::FromRequestParts, http::request::Parts};
use campus_core::RoutingDecision;

/// The routing decision made by [`crate::TenantRewriteLayer`] for this
/// request, or `None` when the layer is not installed.
#[derive(Debug, Clone)]
pub struct Routing(pub Option<RoutingDecision>);

impl Routing {
    /// School host for rewritten traffic.
    pub fn tenant_host(&self) -> Option<&str> {
        match &self.0 {
            Some(RoutingDecision::TenantRewrite { host, .. }) => Some(host),
            _ => None,
        }
    }
}

impl<S> FromRequestParts<S> for Routing
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Routing(parts.extensions.get::<RoutingDecision>().cloned()))
    }
}
