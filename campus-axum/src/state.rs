use std::sync::Arc;

use campus_core::{
    CampusConfigSnapshot, ConfigProvider, CredentialResolver, RoutingRules, TenantRepository,
    TenantResolver,
};

/// Shared handles for handlers and middleware. Cloning is cheap.
#[derive(Clone)]
pub struct CampusState {
    pub config: Arc<CampusConfigSnapshot>,
    pub tenants: Arc<dyn TenantRepository>,
    pub resolver: Arc<TenantResolver>,
    pub credentials: Arc<CredentialResolver>,
}

impl CampusState {
    /// Builds both resolvers from one configuration snapshot and repository.
    pub fn new(config: CampusConfigSnapshot, tenants: Arc<dyn TenantRepository>) -> Self {
        let config = Arc::new(config);
        let resolver = Arc::new(TenantResolver::new(RoutingRules::from_config(&*config)));
        let provider: Arc<dyn ConfigProvider> = config.clone();
        let credentials = Arc::new(CredentialResolver::new(Arc::clone(&tenants), provider));

        Self {
            config,
            tenants,
            resolver,
            credentials,
        }
    }
}
