use chrono::{DateTime, Utc};

use crate::repository::RepositoryError;

use super::domain::Payment;

/// Storage abstraction for payment records.
///
/// Range queries are inclusive on both bounds and return records ordered by
/// due date descending. `delete` fails with `NotFound` for unknown IDs.
pub trait PaymentRepository: Send + Sync {
    fn create(&self, payment: Payment) -> Result<(), RepositoryError>;
    fn get(&self, id: &str) -> Result<Option<Payment>, RepositoryError>;
    fn update(&self, payment: Payment) -> Result<(), RepositoryError>;
    fn delete(&self, id: &str) -> Result<(), RepositoryError>;
    fn list_by_tenant(&self, tenant_id: &str) -> Result<Vec<Payment>, RepositoryError>;
    fn list_by_tenant_in_range(
        &self,
        tenant_id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Payment>, RepositoryError>;
    fn list_in_range(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Payment>, RepositoryError>;
    fn latest_by_tenant(&self, tenant_id: &str) -> Result<Option<Payment>, RepositoryError>;
}
