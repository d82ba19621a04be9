//! Request-scoped orchestration shared by the handlers

pub mod tenant_scope;

pub use tenant_scope::TenantScope;
