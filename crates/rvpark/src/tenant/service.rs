use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::repository::RepositoryError;
use crate::space::domain::{Space, SpaceStatus};
use crate::space::repository::SpaceRepository;
use crate::space::service::{SpaceError, SpaceService};

use super::domain::{NewTenant, Tenant, TenantUpdate, TenantValidation};
use super::repository::TenantRepository;
use super::saga::{CompensationOutcome, Saga};

const CREATE_RECORD_STEP: &str = "create tenant record";
const BIND_SPACE_STEP: &str = "bind space";
const VACATE_PREVIOUS_STEP: &str = "vacate previous space";
const BIND_NEW_SPACE_STEP: &str = "bind new space";
const VACATE_SPACE_STEP: &str = "vacate space";
const DELETE_RECORD_STEP: &str = "delete tenant record";

/// Orchestrates the tenant↔space binding.
///
/// This is the only service that touches two aggregates in one call. There
/// is no transaction spanning the tenant and space rows, so each mutating
/// flow runs as a saga of (action, compensation) steps; a failed
/// compensation is surfaced to the caller, never swallowed.
pub struct TenantService<T, S> {
    repo: Arc<T>,
    spaces: Arc<SpaceService<S>>,
}

impl<T, S> TenantService<T, S>
where
    T: TenantRepository + 'static,
    S: SpaceRepository + 'static,
{
    pub fn new(repo: Arc<T>, spaces: Arc<SpaceService<S>>) -> Self {
        Self { repo, spaces }
    }

    /// Create a tenant and bind it to a vacant or reserved space.
    ///
    /// The tenant row is written first and deleted again if the space
    /// binding fails — a create must not leave an orphaned tenant bound to
    /// nothing.
    pub fn create_tenant(&self, new: NewTenant) -> Result<Tenant, TenantError> {
        if new.name.trim().is_empty() {
            return Err(TenantValidation::NameRequired.into());
        }
        if new.space_id.trim().is_empty() {
            return Err(TenantValidation::SpaceRequired.into());
        }

        self.available_space(&new.space_id)?;

        let now = Utc::now();
        let tenant = Tenant {
            id: Uuid::new_v4().to_string(),
            name: new.name,
            phone: new.phone,
            move_in_date: new.move_in_date.unwrap_or(now),
            space_id: new.space_id,
            created_at: now,
            updated_at: now,
        };

        let outcome = Saga::new()
            .step_with_compensation(
                CREATE_RECORD_STEP,
                || self.repo.create(tenant.clone()).map_err(StepError::from),
                || self.repo.delete(&tenant.id).map_err(StepError::from),
            )
            .step(BIND_SPACE_STEP, || {
                self.spaces
                    .move_in(&tenant.space_id, &tenant.id)
                    .map_err(StepError::from)
            })
            .run();

        match outcome {
            Ok(()) => Ok(tenant),
            Err(failure) => Err(match failure.cause {
                StepError::Space(source) => TenantError::BindingFailed {
                    space_id: tenant.space_id.clone(),
                    source,
                    compensation: failure.compensation,
                },
                StepError::Record(source) => TenantError::Repository(source),
            }),
        }
    }

    pub fn get_tenant(&self, id: &str) -> Result<Tenant, TenantError> {
        self.repo
            .get(id)?
            .ok_or_else(|| TenantError::NotFound { id: id.to_string() })
    }

    pub fn list_tenants(&self) -> Result<Vec<Tenant>, TenantError> {
        Ok(self.repo.list()?)
    }

    pub fn get_tenant_by_space(&self, space_id: &str) -> Result<Tenant, TenantError> {
        self.repo
            .get_by_space(space_id)?
            .ok_or_else(|| TenantError::NotFoundBySpace {
                space_id: space_id.to_string(),
            })
    }

    /// Update a tenant's fields; a changed `space_id` runs the
    /// move-out/move-in flow with a best-effort rebind of the previous
    /// space on failure.
    pub fn update_tenant(&self, id: &str, update: TenantUpdate) -> Result<Tenant, TenantError> {
        let existing = self
            .repo
            .get(id)?
            .ok_or_else(|| TenantError::NotFound { id: id.to_string() })?;

        let tenant = Tenant {
            id: existing.id.clone(),
            name: update.name,
            phone: update.phone,
            move_in_date: existing.move_in_date,
            space_id: update.space_id,
            created_at: existing.created_at,
            updated_at: Utc::now(),
        };

        if tenant.space_id == existing.space_id {
            self.repo.update(tenant.clone())?;
            return Ok(tenant);
        }

        self.available_space(&tenant.space_id)?;

        let outcome = Saga::new()
            .step_with_compensation(
                VACATE_PREVIOUS_STEP,
                || {
                    self.spaces
                        .move_out(&existing.space_id)
                        .map_err(StepError::from)
                },
                || {
                    self.spaces
                        .move_in(&existing.space_id, &tenant.id)
                        .map_err(StepError::from)
                },
            )
            .step(BIND_NEW_SPACE_STEP, || {
                self.spaces
                    .move_in(&tenant.space_id, &tenant.id)
                    .map_err(StepError::from)
            })
            .run();

        match outcome {
            Ok(()) => {
                self.repo.update(tenant.clone())?;
                Ok(tenant)
            }
            Err(failure) => Err(match (failure.step, failure.cause) {
                (VACATE_PREVIOUS_STEP, StepError::Space(source)) => TenantError::UnbindFailed {
                    space_id: existing.space_id.clone(),
                    source,
                },
                (_, StepError::Space(source)) => TenantError::RebindFailed {
                    old_space_id: existing.space_id.clone(),
                    new_space_id: tenant.space_id.clone(),
                    source,
                    compensation: failure.compensation,
                },
                (_, StepError::Record(source)) => TenantError::Repository(source),
            }),
        }
    }

    /// Delete a tenant, vacating its space first. A tenant still shown as
    /// occupying a space is never deleted.
    pub fn delete_tenant(&self, id: &str) -> Result<(), TenantError> {
        let tenant = self
            .repo
            .get(id)?
            .ok_or_else(|| TenantError::NotFound { id: id.to_string() })?;

        let outcome = Saga::new()
            .step(VACATE_SPACE_STEP, || {
                self.spaces
                    .move_out(&tenant.space_id)
                    .map_err(StepError::from)
            })
            .step(DELETE_RECORD_STEP, || {
                self.repo.delete(id).map_err(StepError::from)
            })
            .run();

        match outcome {
            Ok(()) => Ok(()),
            Err(failure) => Err(match failure.cause {
                StepError::Space(source) => TenantError::UnbindFailed {
                    space_id: tenant.space_id.clone(),
                    source,
                },
                StepError::Record(source) => TenantError::Repository(source),
            }),
        }
    }

    /// Fetch a space and require it to accept a binding.
    fn available_space(&self, space_id: &str) -> Result<Space, TenantError> {
        let space = self
            .spaces
            .find(space_id)?
            .ok_or_else(|| TenantError::InvalidReference {
                space_id: space_id.to_string(),
            })?;

        if !matches!(space.status, SpaceStatus::Vacant | SpaceStatus::Reserved) {
            return Err(TenantError::SpaceUnavailable {
                space_id: space_id.to_string(),
                status: space.status,
            });
        }
        Ok(space)
    }
}

/// Error from a single forward or compensating step in a tenant↔space flow.
#[derive(Debug, thiserror::Error)]
pub enum StepError {
    #[error(transparent)]
    Space(#[from] SpaceError),
    #[error(transparent)]
    Record(#[from] RepositoryError),
}

/// Errors surfaced by tenant lifecycle operations.
///
/// The binding failures carry which step failed and whether its
/// compensation ran, so an operator can reconcile the one state the system
/// cannot self-heal: a rebind whose compensation also failed leaves the
/// tenant record bound to no space.
#[derive(Debug, thiserror::Error)]
pub enum TenantError {
    #[error(transparent)]
    Validation(#[from] TenantValidation),
    #[error("tenant {id} not found")]
    NotFound { id: String },
    #[error("no tenant occupies space {space_id}")]
    NotFoundBySpace { space_id: String },
    #[error("space {space_id} does not exist")]
    InvalidReference { space_id: String },
    #[error("space {space_id} is {status}, not available for binding")]
    SpaceUnavailable {
        space_id: String,
        status: SpaceStatus,
    },
    #[error("failed to bind space {space_id}: {source}; {compensation}")]
    BindingFailed {
        space_id: String,
        source: SpaceError,
        compensation: CompensationOutcome<StepError>,
    },
    #[error("failed to vacate space {space_id}: {source}")]
    UnbindFailed { space_id: String, source: SpaceError },
    #[error(
        "failed to bind space {new_space_id} after vacating {old_space_id}: {source}; {compensation}"
    )]
    RebindFailed {
        old_space_id: String,
        new_space_id: String,
        source: SpaceError,
        compensation: CompensationOutcome<StepError>,
    },
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
