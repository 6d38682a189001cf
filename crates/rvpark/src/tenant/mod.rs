//! Tenant lifecycle and the tenant↔space binding.
//!
//! Binding and unbinding touch both the tenant and space aggregates without
//! a spanning transaction; [`saga`] holds the (action, compensation) step
//! executor those flows are written in.

pub mod domain;
pub mod repository;
pub mod router;
pub mod saga;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::{NewTenant, Tenant, TenantUpdate, TenantValidation};
pub use repository::TenantRepository;
pub use router::tenant_router;
pub use saga::{CompensationOutcome, Saga, SagaFailure};
pub use service::{StepError, TenantError, TenantService};
