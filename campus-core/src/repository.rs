use std::collections::HashMap;
use std::sync::RwLock;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use tracing::warn;

use crate::tenant::{Tenant, TenantId};

/// Read-only access to the `schools` table.
///
/// `Ok(None)` means "no such school". Errors are transport or store
/// failures; callers decide whether to degrade or surface them.
#[async_trait]
pub trait TenantRepository: Send + Sync {
    /// Look up one school by primary key.
    async fn find_by_id(&self, id: &TenantId) -> Result<Option<Tenant>>;

    /// Look up the school whose custom domain equals `domain` exactly.
    async fn find_by_domain(&self, domain: &str) -> Result<Option<Tenant>>;
}

/// In-process repository for tests and local runs without a database.
#[derive(Debug, Default)]
pub struct InMemoryTenantRepository {
    tenants: RwLock<HashMap<String, Tenant>>,
}

impl InMemoryTenantRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tenants<I>(tenants: I) -> Self
    where
        I: IntoIterator<Item = Tenant>,
    {
        let repo = Self::new();
        for t in tenants {
            if let Err(e) = repo.insert(t) {
                warn!(error = %e, "skipping school");
            }
        }
        repo
    }

    /// Insert or replace a school, keyed by id.
    ///
    /// Rejects a second school claiming an already used custom domain.
    pub fn insert(&self, tenant: Tenant) -> Result<()> {
        let mut map = self
            .tenants
            .write()
            .map_err(|_| anyhow!("tenant store lock poisoned"))?;

        if let Some(domain) = tenant.custom_domain.as_deref() {
            let taken = map
                .values()
                .any(|t| t.id != tenant.id && t.custom_domain.as_deref() == Some(domain));
            if taken {
                return Err(anyhow!("custom domain already assigned: {domain}"));
            }
        }

        map.insert(tenant.id.clone(), tenant);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.tenants.read().map(|m| m.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl TenantRepository for InMemoryTenantRepository {
    async fn find_by_id(&self, id: &TenantId) -> Result<Option<Tenant>> {
        let map = self
            .tenants
            .read()
            .map_err(|_| anyhow!("tenant store lock poisoned"))?;
        Ok(map.get(id.as_str()).cloned())
    }

    async fn find_by_domain(&self, domain: &str) -> Result<Option<Tenant>> {
        let map = self
            .tenants
            .read()
            .map_err(|_| anyhow!("tenant store lock poisoned"))?;
        Ok(map
            .values()
            .find(|t| t.custom_domain.as_deref() == Some(domain))
            .cloned())
    }
}
