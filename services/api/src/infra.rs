use chrono::{DateTime, Utc};
use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

use rvpark::payment::{Payment, PaymentRepository};
use rvpark::repository::RepositoryError;
use rvpark::space::{Space, SpaceRepository};
use rvpark::tenant::{Tenant, TenantRepository};
use rvpark::user::{Token, TokenRepository, User, UserRepository};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

#[derive(Default, Clone)]
pub(crate) struct InMemorySpaceRepository {
    records: Arc<Mutex<HashMap<String, Space>>>,
}

impl SpaceRepository for InMemorySpaceRepository {
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

#[derive(Default, Clone)]
pub(crate) struct InMemoryTenantRepository {
    records: Arc<Mutex<HashMap<String, Tenant>>>,
}

impl TenantRepository for InMemoryTenantRepository {
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

#[derive(Default, Clone)]
pub(crate) struct InMemoryPaymentRepository {
    records: Arc<Mutex<HashMap<String, Payment>>>,
}

impl PaymentRepository for InMemoryPaymentRepository {
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

#[derive(Default, Clone)]
pub(crate) struct InMemoryUserRepository {
    records: Arc<Mutex<HashMap<String, User>>>,
}

impl UserRepository for InMemoryUserRepository {
    fn create(&self, user: User) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if guard.contains_key(&user.id)
            || guard.values().any(|existing| existing.email == user.email)
        {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(user.id.clone(), user);
        Ok(())
    }

    fn get(&self, id: &str) -> Result<Option<User>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn get_by_email(&self, email: &str) -> Result<Option<User>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.values().find(|user| user.email == email).cloned())
    }

    fn update(&self, user: User) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if guard.contains_key(&user.id) {
            guard.insert(user.id.clone(), user);
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

    fn list(&self) -> Result<Vec<User>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.values().cloned().collect())
    }
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryTokenRepository {
    records: Arc<Mutex<HashMap<String, Token>>>,
}

impl TokenRepository for InMemoryTokenRepository {
    fn create(&self, token: Token) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if guard.contains_key(&token.token_hash) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(token.token_hash.clone(), token);
        Ok(())
    }

    fn get(&self, token_hash: &str) -> Result<Option<Token>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.get(token_hash).cloned())
    }

    fn revoke_all_for_user(&self, user_id: &str) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        for token in guard.values_mut() {
            if token.user_id == user_id {
                token.revoked = true;
            }
        }
        Ok(())
    }
}

/// Section layout seeded at startup. Spaces are created by data load, never
/// by the tenant flow.
const SECTIONS: &[(&str, &str, u32)] = &[
    ("Mane Street", "A", 12),
    ("River Loop", "B", 8),
    ("Prairie Circle", "C", 6),
];

pub(crate) fn seed_spaces(repo: &InMemorySpaceRepository) -> Result<(), RepositoryError> {
    for (section, prefix, count) in SECTIONS {
        for number in 1..=*count {
            repo.insert(Space::vacant(format!("{prefix}{number}"), *section))?;
        }
    }
    Ok(())
}
