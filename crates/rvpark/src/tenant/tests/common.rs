use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::payment::status::{PaymentStatusSource, PaymentStatusSummary, TenantPaymentStatus};
use crate::repository::RepositoryError;
use crate::space::domain::Space;
use crate::space::repository::SpaceRepository;
use crate::space::service::SpaceService;
use crate::tenant::domain::{NewTenant, Tenant};
use crate::tenant::repository::TenantRepository;
use crate::tenant::service::TenantService;

#[derive(Default, Clone)]
pub(super) struct MemoryTenantRepository {
    records: Arc<Mutex<HashMap<String, Tenant>>>,
}

impl TenantRepository for MemoryTenantRepository {
    fn create(&self, tenant: Tenant) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if guard.contains_key(&tenant.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(tenant.id.clone(), tenant);
        Ok(())
    }

    fn get(&self, id: &str) -> Result<Option<Tenant>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn update(&self, tenant: Tenant) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if guard.contains_key(&tenant.id) {
            guard.insert(tenant.id.clone(), tenant);
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

    fn list(&self) -> Result<Vec<Tenant>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.values().cloned().collect())
    }

    fn get_by_space(&self, space_id: &str) -> Result<Option<Tenant>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard
            .values()
            .find(|tenant| tenant.space_id == space_id)
            .cloned())
    }
}

/// Space repository with an injectable per-ID update failure budget, so
/// tests can make a specific forward or compensating step fail.
#[derive(Default)]
pub(super) struct FlakySpaceRepository {
    records: Mutex<HashMap<String, Space>>,
    update_budgets: Mutex<HashMap<String, usize>>,
}

impl FlakySpaceRepository {
    /// Fail every update for `id` from now on.
    pub(super) fn fail_updates_for(&self, id: &str) {
        self.fail_updates_after(id, 0);
    }

    /// Allow `allowed` more successful updates for `id`, then fail.
    pub(super) fn fail_updates_after(&self, id: &str, allowed: usize) {
        self.update_budgets
            .lock()
            .expect("budget mutex poisoned")
            .insert(id.to_string(), allowed);
    }
}

impl SpaceRepository for FlakySpaceRepository {
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
        {
            let mut budgets = self.update_budgets.lock().expect("budget mutex poisoned");
            if let Some(remaining) = budgets.get_mut(&space.id) {
                if *remaining == 0 {
                    return Err(RepositoryError::Unavailable(
                        "injected update failure".to_string(),
                    ));
                }
                *remaining -= 1;
            }
        }

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

struct AlwaysPaidSource;

impl PaymentStatusSource for AlwaysPaidSource {
    fn payment_status(&self, _tenant_id: &str) -> Result<PaymentStatusSummary, RepositoryError> {
        Ok(PaymentStatusSummary {
            status: TenantPaymentStatus::Paid,
            past_due_amount: 0.0,
        })
    }
}

pub(super) struct Fixture {
    pub(super) space_repo: Arc<FlakySpaceRepository>,
    pub(super) tenant_repo: Arc<MemoryTenantRepository>,
    pub(super) spaces: Arc<SpaceService<FlakySpaceRepository>>,
    pub(super) tenants: TenantService<MemoryTenantRepository, FlakySpaceRepository>,
}

pub(super) fn fixture(space_ids: &[(&str, &str)]) -> Fixture {
    let space_repo = Arc::new(FlakySpaceRepository::default());
    for (id, section) in space_ids {
        space_repo
            .insert(Space::vacant(*id, *section))
            .expect("seed space");
    }

    let spaces = Arc::new(SpaceService::new(space_repo.clone(), Arc::new(AlwaysPaidSource)));
    let tenant_repo = Arc::new(MemoryTenantRepository::default());
    let tenants = TenantService::new(tenant_repo.clone(), spaces.clone());

    Fixture {
        space_repo,
        tenant_repo,
        spaces,
        tenants,
    }
}

pub(super) fn new_tenant(name: &str, space_id: &str) -> NewTenant {
    NewTenant {
        name: name.to_string(),
        phone: Some("555-0100".to_string()),
        space_id: space_id.to_string(),
        move_in_date: None,
    }
}
