use std::sync::Arc;

use chrono::{DateTime, Months, Utc};
use uuid::Uuid;

use crate::repository::RepositoryError;

use super::domain::{NewPayment, Payment, PaymentMethod, PaymentUpdate, PaymentValidation};
use super::repository::PaymentRepository;

/// Validates and persists individual payment records. No cross-entity
/// awareness — tenants are referenced by ID only and never looked up here.
pub struct PaymentService<R> {
    pub(super) repo: Arc<R>,
}

impl<R> PaymentService<R>
where
    R: PaymentRepository + 'static,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    pub fn create_payment(&self, new: NewPayment) -> Result<Payment, PaymentError> {
        if new.tenant_id.trim().is_empty() {
            return Err(PaymentValidation::TenantRequired.into());
        }
        validate_amounts(new.amount_due, new.due_date, new.next_payment_date)?;

        let now = Utc::now();
        let payment = Payment {
            id: new.id.unwrap_or_else(|| Uuid::new_v4().to_string()),
            tenant_id: new.tenant_id,
            amount_due: new.amount_due,
            due_date: new.due_date,
            paid_date: None,
            next_payment_date: new.next_payment_date,
            payment_method: new.payment_method,
            created_at: now,
            updated_at: now,
        };

        self.repo.create(payment.clone())?;
        Ok(payment)
    }

    pub fn get_payment(&self, id: &str) -> Result<Payment, PaymentError> {
        self.repo
            .get(id)?
            .ok_or_else(|| PaymentError::NotFound { id: id.to_string() })
    }

    pub fn update_payment(&self, id: &str, update: PaymentUpdate) -> Result<Payment, PaymentError> {
        let existing = self.get_payment(id)?;
        validate_amounts(update.amount_due, update.due_date, update.next_payment_date)?;

        let payment = Payment {
            id: existing.id,
            tenant_id: existing.tenant_id,
            amount_due: update.amount_due,
            due_date: update.due_date,
            paid_date: update.paid_date,
            next_payment_date: update.next_payment_date,
            payment_method: update.payment_method,
            created_at: existing.created_at,
            updated_at: Utc::now(),
        };

        self.repo.update(payment.clone())?;
        Ok(payment)
    }

    pub fn delete_payment(&self, id: &str) -> Result<(), PaymentError> {
        Ok(self.repo.delete(id)?)
    }

    /// The only path that marks a payment settled. Calling it again simply
    /// overwrites the paid date and method — no history accumulates.
    pub fn record_payment(
        &self,
        id: &str,
        method: PaymentMethod,
    ) -> Result<Payment, PaymentError> {
        let mut payment = self.get_payment(id)?;

        let now = Utc::now();
        payment.paid_date = Some(now);
        payment.payment_method = Some(method);
        payment.updated_at = now;

        self.repo.update(payment.clone())?;
        Ok(payment)
    }

    /// The tenant's payments over the trailing six calendar months, newest
    /// due date first. A deliberate default window, not an unbounded query.
    pub fn tenant_payments(&self, tenant_id: &str) -> Result<Vec<Payment>, PaymentError> {
        let end = Utc::now();
        let start = end.checked_sub_months(Months::new(6)).unwrap_or(end);
        Ok(self.repo.list_by_tenant_in_range(tenant_id, start, end)?)
    }

    pub fn payments_by_date_range(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Payment>, PaymentError> {
        Ok(self.repo.list_in_range(start, end)?)
    }

    pub fn latest_payment(&self, tenant_id: &str) -> Result<Payment, PaymentError> {
        self.repo
            .latest_by_tenant(tenant_id)?
            .ok_or_else(|| PaymentError::NoneForTenant {
                tenant_id: tenant_id.to_string(),
            })
    }
}

fn validate_amounts(
    amount_due: f64,
    due_date: DateTime<Utc>,
    next_payment_date: DateTime<Utc>,
) -> Result<(), PaymentValidation> {
    if amount_due <= 0.0 {
        return Err(PaymentValidation::NonPositiveAmount);
    }
    if next_payment_date < due_date {
        return Err(PaymentValidation::NextPaymentBeforeDue {
            due: due_date,
            next: next_payment_date,
        });
    }
    Ok(())
}

/// Errors surfaced by payment record operations.
#[derive(Debug, thiserror::Error)]
pub enum PaymentError {
    #[error(transparent)]
    Validation(#[from] PaymentValidation),
    #[error("payment {id} not found")]
    NotFound { id: String },
    #[error("no payments recorded for tenant {tenant_id}")]
    NoneForTenant { tenant_id: String },
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
