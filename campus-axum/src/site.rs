//! School site routes.
//!
//! These are the targets of the tenant rewrite: `/{domain}` and
//! `/{domain}/{*page}`. The first segment is the school's custom domain,
//! looked up literally in the `schools` table.

use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use campus_core::errors::CampusError;
use serde::Serialize;
use tracing::info;

use crate::{CampusAxumError, CampusState, Routing};

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct SchoolSite {
    pub id: String,
    pub name: String,
    pub domain: String,
    pub path: String,
}

pub fn tenant_site_router(state: CampusState) -> Router<()> {
    Router::new()
        .route("/{domain}", get(site_root))
        .route("/{domain}/", get(site_root))
        .route("/{domain}/{*page}", get(site_page))
        .with_state(state)
}

async fn site_root(
    State(state): State<CampusState>,
    routing: Routing,
    Path(domain): Path<String>,
) -> Result<Json<SchoolSite>, CampusAxumError> {
    render(&state, &routing, domain, "/".to_string()).await
}

async fn site_page(
    State(state): State<CampusState>,
    routing: Routing,
    Path((domain, page)): Path<(String, String)>,
) -> Result<Json<SchoolSite>, CampusAxumError> {
    render(&state, &routing, domain, format!("/{page}")).await
}

async fn render(
    state: &CampusState,
    routing: &Routing,
    domain: String,
    path: String,
) -> Result<Json<SchoolSite>, CampusAxumError> {
    // Only rewritten traffic for this exact host reaches a school site;
    // `sjm.com/portal.sjm.com/...` typed by hand does not.
    if routing.tenant_host() != Some(domain.as_str()) {
        return Err(CampusError::not_found("Page not found").into());
    }

    let school = state
        .tenants
        .find_by_domain(&domain)
        .await
        .map_err(|e| CampusError::bad_gateway("School directory is unavailable").with_source(e))?
        .ok_or_else(|| CampusError::not_found(format!("No school is served at {domain}")))?;

    info!(school_id = %school.id, domain = %domain, path = %path, "school site");

    Ok(Json(SchoolSite {
        id: school.id,
        name: school.name,
        domain,
        path,
    }))
}
