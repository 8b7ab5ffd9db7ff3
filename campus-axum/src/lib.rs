//! campus-axum: Axum adapter for Campus.
//!
//! Wraps a page router in the tenant rewrite middleware, mounts the
//! school site routes and maps `CampusError`s onto HTTP responses.

pub mod app;
pub mod extract;
pub mod middlewares;
pub mod site;
pub mod state;
mod error;

pub use app::{axum, CampusApp};
pub use error::CampusAxumError;
pub use extract::Routing;
pub use middlewares::{TenantRewrite, TenantRewriteLayer};
pub use state::CampusState;
