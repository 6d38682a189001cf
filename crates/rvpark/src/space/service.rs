use std::collections::BTreeMap;
use std::sync::Arc;

use crate::payment::status::PaymentStatusSource;
use crate::repository::RepositoryError;

use super::domain::{compare_ids, Space, SpaceStatus, SpaceValidation, SpaceView};
use super::repository::SpaceRepository;

/// Owns the Vacant/Reserved/Occupied state machine for rental spaces.
///
/// Every transition is a read-check-write against a single row; a violated
/// precondition fails with [`SpaceError::StateConflict`] and leaves the
/// record untouched. Concurrent callers racing on the same ID can still lose
/// updates — there is deliberately no locking here, only per-call atomicity.
pub struct SpaceService<R> {
    repo: Arc<R>,
    payments: Arc<dyn PaymentStatusSource>,
}

impl<R> SpaceService<R>
where
    R: SpaceRepository + 'static,
{
    pub fn new(repo: Arc<R>, payments: Arc<dyn PaymentStatusSource>) -> Self {
        Self { repo, payments }
    }

    /// All spaces grouped by section, naturally sorted by ID within each
    /// section so "A2" lists before "A10".
    pub fn list_spaces(&self) -> Result<BTreeMap<String, Vec<Space>>, SpaceError> {
        let mut grouped: BTreeMap<String, Vec<Space>> = BTreeMap::new();
        for space in self.repo.list()? {
            grouped.entry(space.section.clone()).or_default().push(space);
        }
        for spaces in grouped.values_mut() {
            spaces.sort_by(|a, b| compare_ids(&a.id, &b.id));
        }
        Ok(grouped)
    }

    /// Raw record fetch used by the tenant manager and administrative edits.
    pub fn space(&self, id: &str) -> Result<Space, SpaceError> {
        self.find(id)?
            .ok_or_else(|| SpaceError::NotFound { id: id.to_string() })
    }

    /// Plain lookup for callers that distinguish "absent" from "failed".
    pub(crate) fn find(&self, id: &str) -> Result<Option<Space>, RepositoryError> {
        self.repo.get(id)
    }

    /// Display read: attaches the tenant's payment standing to an occupied
    /// space. The derived status and past-due amount are computed per call
    /// and never persisted.
    pub fn get_space(&self, id: &str) -> Result<SpaceView, SpaceError> {
        let mut space = self.space(id)?;

        let display_status = match (&space.status, &space.tenant_id) {
            (SpaceStatus::Occupied, Some(tenant_id)) => {
                let summary = self.payments.payment_status(tenant_id)?;
                space.past_due_amount = summary.past_due_amount;
                format!("Occupied ({})", summary.status.label())
            }
            _ => space.status.label().to_string(),
        };

        Ok(SpaceView {
            space,
            display_status,
        })
    }

    /// Strictly vacant spaces: no tenant bound and not reserved.
    pub fn vacant_spaces(&self) -> Result<Vec<Space>, SpaceError> {
        let mut vacant: Vec<Space> = self
            .repo
            .list()?
            .into_iter()
            .filter(|space| space.tenant_id.is_none() && !space.reserved)
            .collect();
        vacant.sort_by(|a, b| compare_ids(&a.id, &b.id));
        Ok(vacant)
    }

    pub fn reserve(&self, id: &str) -> Result<(), SpaceError> {
        let mut space = self.space(id)?;
        if space.status != SpaceStatus::Vacant {
            return Err(SpaceError::StateConflict {
                id: id.to_string(),
                current: space.status,
                required: "Vacant",
            });
        }

        space.status = SpaceStatus::Reserved;
        space.reserved = true;
        Ok(self.repo.update(space)?)
    }

    pub fn unreserve(&self, id: &str) -> Result<(), SpaceError> {
        let mut space = self.space(id)?;
        if space.status != SpaceStatus::Reserved {
            return Err(SpaceError::StateConflict {
                id: id.to_string(),
                current: space.status,
                required: "Reserved",
            });
        }

        space.status = SpaceStatus::Vacant;
        space.reserved = false;
        Ok(self.repo.update(space)?)
    }

    /// Bind a tenant. Reserved spaces may be moved into directly, which
    /// consumes the reservation.
    pub fn move_in(&self, id: &str, tenant_id: &str) -> Result<(), SpaceError> {
        let mut space = self.space(id)?;
        if !matches!(space.status, SpaceStatus::Vacant | SpaceStatus::Reserved) {
            return Err(SpaceError::StateConflict {
                id: id.to_string(),
                current: space.status,
                required: "Vacant or Reserved",
            });
        }

        space.status = SpaceStatus::Occupied;
        space.tenant_id = Some(tenant_id.to_string());
        space.reserved = false;
        Ok(self.repo.update(space)?)
    }

    pub fn move_out(&self, id: &str) -> Result<(), SpaceError> {
        let mut space = self.space(id)?;
        if space.status != SpaceStatus::Occupied {
            return Err(SpaceError::StateConflict {
                id: id.to_string(),
                current: space.status,
                required: "Occupied",
            });
        }

        space.status = SpaceStatus::Vacant;
        space.tenant_id = None;
        space.reserved = false;
        space.clear_payment_display();
        Ok(self.repo.update(space)?)
    }

    /// Administrative overwrite. The payload is re-validated against the
    /// status/flag/binding invariants rather than trusting the caller.
    pub fn update_space(&self, space: Space) -> Result<(), SpaceError> {
        space.check_invariants()?;
        // Reject edits to unknown IDs with NotFound rather than upserting.
        self.space(&space.id)?;
        Ok(self.repo.update(space)?)
    }
}

/// Errors surfaced by space lifecycle operations.
#[derive(Debug, thiserror::Error)]
pub enum SpaceError {
    #[error("space {id} not found")]
    NotFound { id: String },
    #[error("space {id} is {current}, operation requires {required}")]
    StateConflict {
        id: String,
        current: SpaceStatus,
        required: &'static str,
    },
    #[error(transparent)]
    Validation(#[from] SpaceValidation),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
