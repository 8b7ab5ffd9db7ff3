pub mod tenant_rewrite;

pub use tenant_rewrite::{TenantRewrite, TenantRewriteLayer};
