//! campus-core: framework-agnostic core for Campus.
//!
//! Holds the tenant model, the configuration store, structured errors,
//! the tenant repository port and the two resolvers that sit on every
//! request: host routing and per-school credential resolution.

pub mod config;
pub mod credentials;
pub mod errors;
pub mod repository;
pub mod routing;
pub mod tenant;

pub use config::{CampusConfig, CampusConfigSnapshot, ConfigKey, ConfigProvider};
pub use credentials::{CredentialField, CredentialResolver, ResolvedCredentials, SmsCredentials};
pub use errors::{CampusError, CampusResult, ErrorKind};
pub use repository::{InMemoryTenantRepository, TenantRepository};
pub use routing::{PassthroughReason, RoutingDecision, RoutingRules, TenantResolver};
pub use tenant::{Tenant, TenantId};
