use crate::repository::RepositoryError;

use super::domain::Tenant;

/// Storage abstraction for tenant records.
pub trait TenantRepository: Send + Sync {
    fn create(&self, tenant: Tenant) -> Result<(), RepositoryError>;
    fn get(&self, id: &str) -> Result<Option<Tenant>, RepositoryError>;
    fn update(&self, tenant: Tenant) -> Result<(), RepositoryError>;
    fn delete(&self, id: &str) -> Result<(), RepositoryError>;
    fn list(&self) -> Result<Vec<Tenant>, RepositoryError>;
    fn get_by_space(&self, space_id: &str) -> Result<Option<Tenant>, RepositoryError>;
}
