use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::payment::status::{PaymentStatusSource, PaymentStatusSummary, TenantPaymentStatus};
use crate::repository::RepositoryError;
use crate::space::domain::Space;
use crate::space::repository::SpaceRepository;
use crate::space::service::SpaceService;

#[derive(Default, Clone)]
pub(super) struct MemorySpaceRepository {
    records: Arc<Mutex<HashMap<String, Space>>>,
}

impl SpaceRepository for MemorySpaceRepository {
    fn insert(&self, space: Space) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if guard.contains_key(&space.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(space.id.clone(), space);
        Ok(())
    }

    fn get(&self, id: &str) -> Result<Option<Space>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn update(&self, space: Space) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if guard.contains_key(&space.id) {
            guard.insert(space.id.clone(), space);
            Ok(())
        } else {
            Err(RepositoryError::NotFound)
        }
    }

    fn list(&self) -> Result<Vec<Space>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.values().cloned().collect())
    }
}

pub(super) struct StaticStatusSource(pub(super) PaymentStatusSummary);

impl PaymentStatusSource for StaticStatusSource {
    fn payment_status(&self, _tenant_id: &str) -> Result<PaymentStatusSummary, RepositoryError> {
        Ok(self.0)
    }
}

pub(super) fn paid_source() -> Arc<StaticStatusSource> {
    Arc::new(StaticStatusSource(PaymentStatusSummary {
        status: TenantPaymentStatus::Paid,
        past_due_amount: 0.0,
    }))
}

pub(super) fn overdue_source(amount: f64) -> Arc<StaticStatusSource> {
    Arc::new(StaticStatusSource(PaymentStatusSummary {
        status: TenantPaymentStatus::Overdue,
        past_due_amount: amount,
    }))
}

pub(super) fn service_with(
    spaces: Vec<Space>,
) -> (Arc<MemorySpaceRepository>, SpaceService<MemorySpaceRepository>) {
    let repo = Arc::new(MemorySpaceRepository::default());
    for space in spaces {
        repo.insert(space).expect("seed space");
    }
    let service = SpaceService::new(repo.clone(), paid_source());
    (repo, service)
}
