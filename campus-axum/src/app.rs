use std::sync::Arc;

use axum::handler::Handler;
use axum::routing::get;
use axum::Router;
use tokio::net::{TcpListener, ToSocketAddrs};
use tower::{Layer, ServiceBuilder};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;

use crate::middlewares::TenantRewriteLayer;
use crate::site;
use crate::CampusState;

/// Routers under construction plus the shared state.
///
/// `router` holds page routes; they sit behind the tenant rewrite.
/// `api` holds routes matched first and never rewritten (health checks,
/// JSON endpoints).
#[derive(Clone)]
pub struct CampusApp {
    pub state: CampusState,
    pub router: Router<()>,
    pub api: Router<()>,
}

impl CampusApp {
    pub fn new(state: CampusState) -> Self {
        Self {
            state,
            router: Router::new(),
            api: Router::new(),
        }
    }

    pub fn merge(mut self, router: Router<()>) -> Self {
        self.router = self.router.merge(router);
        self
    }

    /// Page route, subject to tenant rewriting.
    pub fn use_get<H, T>(mut self, path: &str, handler: H) -> Self
    where
        H: Handler<T, ()> + Clone + Send + Sync + 'static,
        T: 'static,
    {
        self.router = self.router.route(path, get(handler));
        self
    }

    /// Mount the school site routes that rewritten requests land on.
    pub fn use_tenant_sites(self) -> Self {
        let sites = site::tenant_site_router(self.state.clone());
        self.merge(sites)
    }

    /// Handler for page requests no route matched, rewritten or not.
    pub fn use_fallback<H, T>(mut self, handler: H) -> Self
    where
        H: Handler<T, ()> + Clone + Send + Sync + 'static,
        T: 'static,
    {
        self.router = self.router.fallback(handler);
        self
    }

    /// Route matched before tenant rewriting.
    pub fn use_api(mut self, path: &str, router: Router<()>) -> Self {
        self.api = self.api.nest(path, router);
        self
    }

    pub fn use_api_get<H, T>(mut self, path: &str, handler: H) -> Self
    where
        H: Handler<T, ()> + Clone + Send + Sync + 'static,
        T: 'static,
    {
        self.api = self.api.route(path, get(handler));
        self
    }

    /// Finished router: api routes first, everything else through the
    /// tenant rewrite into the page router. Request ids and tracing wrap both.
    pub fn into_service(self) -> Router<()> {
        let pages = TenantRewriteLayer::new(Arc::clone(&self.state.resolver)).layer(self.router);

        self.api.fallback_service(pages).layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                .layer(TraceLayer::new_for_http())
                .layer(PropagateRequestIdLayer::x_request_id()),
        )
    }

    pub async fn listen<A>(self, addr: A) -> anyhow::Result<()>
    where
        A: ToSocketAddrs,
    {
        let listener = TcpListener::bind(addr).await?;
        axum::serve(listener, self.into_service()).await?;
        Ok(())
    }
}

pub fn axum(state: CampusState) -> CampusApp {
    CampusApp::new(state)
}
