pub mod config;
pub mod routes;

use std::sync::Arc;

use anyhow::Result;
use campus_axum::{axum, CampusApp, CampusState};
use campus_core::{CampusConfig, TenantRepository};

/// Build the app with the school directory chosen from `config`.
pub fn build(config: CampusConfig) -> Result<CampusApp> {
    let tenants = config::tenant_repository(&config)?;
    Ok(build_with(config, tenants))
}

pub fn build_with(config: CampusConfig, tenants: Arc<dyn TenantRepository>) -> CampusApp {
    let state = CampusState::new(config.snapshot(), tenants);
    let notify = routes::NotifyApi::new(&state);

    axum(state)
        .use_api_get("/health", routes::health)
        .use_api("/api/notify", routes::notify_router(notify))
        .use_get("/", routes::marketing)
        .use_tenant_sites()
        .use_fallback(routes::page_not_found)
}
