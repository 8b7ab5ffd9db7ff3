use std::sync::Arc;
use std::task::{Context, Poll};

use axum::{
    body::Body,
    extract::Request,
    http::{header, uri::PathAndQuery, Uri},
};
use campus_core::{PassthroughReason, RoutingDecision, TenantResolver};
use tower::{Layer, Service};
use tracing::{debug, warn};

/// Rewrites school traffic to `/{host}{path}` before routing.
///
/// Axum matches routes before `Router::layer` middleware runs, so this
/// layer must wrap the page router itself, not be added to it:
///
/// ```rust,ignore
/// let pages = TenantRewriteLayer::new(resolver).layer(page_router);
/// let app = api_router.fallback_service(pages);
/// ```
///
/// The [`RoutingDecision`] is stored in the request extensions for
/// handlers downstream; see [`crate::Routing`].
#[derive(Clone)]
pub struct TenantRewriteLayer {
    resolver: Arc<TenantResolver>,
}

impl TenantRewriteLayer {
    pub fn new(resolver: Arc<TenantResolver>) -> Self {
        Self { resolver }
    }
}

impl<S> Layer<S> for TenantRewriteLayer {
    type Service = TenantRewrite<S>;

    fn layer(&self, inner: S) -> Self::Service {
        TenantRewrite {
            inner,
            resolver: Arc::clone(&self.resolver),
        }
    }
}

#[derive(Clone)]
pub struct TenantRewrite<S> {
    inner: S,
    resolver: Arc<TenantResolver>,
}

impl<S> Service<Request<Body>> for TenantRewrite<S>
where
    S: Service<Request<Body>>,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = S::Future;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: Request<Body>) -> Self::Future {
        let decision = {
            let host = req
                .headers()
                .get(header::HOST)
                .and_then(|v| v.to_str().ok())
                .or_else(|| req.uri().host());
            self.resolver
                .resolve(host, req.uri().path(), req.uri().query())
        };

        let decision = match decision.rewritten_path().map(|p| with_path_and_query(req.uri(), p)) {
            Some(Ok(uri)) => {
                debug!(from = %req.uri(), to = %uri, "tenant rewrite");
                *req.uri_mut() = uri;
                decision
            }
            Some(Err(e)) => {
                // host bytes that cannot form a path: serve unmodified
                warn!(
                    path = decision.rewritten_path().unwrap_or_default(),
                    error = %e,
                    "tenant rewrite produced an invalid uri"
                );
                RoutingDecision::Passthrough(PassthroughReason::InvalidRewrite)
            }
            None => {
                debug!(kind = decision.kind(), path = req.uri().path(), "routing");
                decision
            }
        };

        req.extensions_mut().insert(decision);
        self.inner.call(req)
    }
}

fn with_path_and_query(uri: &Uri, path: &str) -> Result<Uri, axum::http::Error> {
    let mut parts = uri.clone().into_parts();
    parts.path_and_query = Some(path.parse::<PathAndQuery>()?);
    Ok(Uri::from_parts(parts)?)
}
