use chrono::Utc;
use serde::Serialize;

use crate::repository::RepositoryError;

use super::domain::PaymentState;
use super::repository::PaymentRepository;
use super::service::PaymentService;

/// A tenant's aggregate payment standing.
///
/// The amount is the sum of `amount_due` over every record currently
/// overdue — not a running balance. One overdue $50 payment next to ten
/// settled $500 payments reports ("Overdue", 50).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PaymentStatusSummary {
    pub status: TenantPaymentStatus,
    pub past_due_amount: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TenantPaymentStatus {
    Paid,
    Overdue,
}

impl TenantPaymentStatus {
    pub const fn label(self) -> &'static str {
        match self {
            TenantPaymentStatus::Paid => "Paid",
            TenantPaymentStatus::Overdue => "Overdue",
        }
    }
}

/// Seam through which the space manager reads a tenant's payment standing
/// for its display status, without depending on the payment service type.
pub trait PaymentStatusSource: Send + Sync {
    fn payment_status(&self, tenant_id: &str) -> Result<PaymentStatusSummary, RepositoryError>;
}

impl<R> PaymentStatusSource for PaymentService<R>
where
    R: PaymentRepository + 'static,
{
    fn payment_status(&self, tenant_id: &str) -> Result<PaymentStatusSummary, RepositoryError> {
        let now = Utc::now();
        let past_due_amount: f64 = self
            .repo
            .list_by_tenant(tenant_id)?
            .iter()
            .filter(|payment| payment.state(now) == PaymentState::Overdue)
            .map(|payment| payment.amount_due)
            .sum();

        Ok(if past_due_amount > 0.0 {
            PaymentStatusSummary {
                status: TenantPaymentStatus::Overdue,
                past_due_amount,
            }
        } else {
            PaymentStatusSummary {
                status: TenantPaymentStatus::Paid,
                past_due_amount: 0.0,
            }
        })
    }
}
