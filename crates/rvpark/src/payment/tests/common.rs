use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Duration, Utc};

use crate::payment::domain::{NewPayment, Payment};
use crate::payment::repository::PaymentRepository;
use crate::payment::service::PaymentService;
use crate::repository::RepositoryError;

#[derive(Default, Clone)]
pub(super) struct MemoryPaymentRepository {
    records: Arc<Mutex<HashMap<String, Payment>>>,
}

impl PaymentRepository for MemoryPaymentRepository {
    fn create(&self, payment: Payment) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if guard.contains_key(&payment.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(payment.id.clone(), payment);
        Ok(())
    }

    fn get(&self, id: &str) -> Result<Option<Payment>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn update(&self, payment: Payment) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if guard.contains_key(&payment.id) {
            guard.insert(payment.id.clone(), payment);
            Ok(())
        } else {
            Err(RepositoryError::NotFound)
        }
    }

    fn delete(&self, id: &str) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        guard
            .remove(id)
            .map(|_| ())
            .ok_or(RepositoryError::NotFound)
    }

    fn list_by_tenant(&self, tenant_id: &str) -> Result<Vec<Payment>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        let mut payments: Vec<Payment> = guard
            .values()
            .filter(|payment| payment.tenant_id == tenant_id)
            .cloned()
            .collect();
        payments.sort_by(|a, b| b.due_date.cmp(&a.due_date));
        Ok(payments)
    }

    fn list_by_tenant_in_range(
        &self,
        tenant_id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Payment>, RepositoryError> {
        Ok(self
            .list_by_tenant(tenant_id)?
            .into_iter()
            .filter(|payment| payment.due_date >= start && payment.due_date <= end)
            .collect())
    }

    fn list_in_range(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Payment>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        let mut payments: Vec<Payment> = guard
            .values()
            .filter(|payment| payment.due_date >= start && payment.due_date <= end)
            .cloned()
            .collect();
        payments.sort_by(|a, b| b.due_date.cmp(&a.due_date));
        Ok(payments)
    }

    fn latest_by_tenant(&self, tenant_id: &str) -> Result<Option<Payment>, RepositoryError> {
        Ok(self.list_by_tenant(tenant_id)?.into_iter().next())
    }
}

pub(super) fn service() -> (
    Arc<MemoryPaymentRepository>,
    PaymentService<MemoryPaymentRepository>,
) {
    let repo = Arc::new(MemoryPaymentRepository::default());
    let service = PaymentService::new(repo.clone());
    (repo, service)
}

/// A payment due at `now + offset_days` for 450.0.
pub(super) fn new_payment(tenant_id: &str, offset_days: i64) -> NewPayment {
    let due = Utc::now() + Duration::days(offset_days);
    NewPayment {
        id: None,
        tenant_id: tenant_id.to_string(),
        amount_due: 450.0,
        due_date: due,
        next_payment_date: due + Duration::days(30),
        payment_method: None,
    }
}
