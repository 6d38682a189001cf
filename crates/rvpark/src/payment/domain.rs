use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// How a settled payment was made. Closed set — anything else is rejected at
/// the boundary instead of being stored as a freeform string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentMethod {
    Credit,
    Check,
    Cash,
}

impl PaymentMethod {
    pub const fn label(self) -> &'static str {
        match self {
            PaymentMethod::Credit => "CREDIT",
            PaymentMethod::Check => "CHECK",
            PaymentMethod::Cash => "CASH",
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for PaymentMethod {
    type Err = PaymentValidation;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_uppercase().as_str() {
            "CREDIT" => Ok(PaymentMethod::Credit),
            "CHECK" => Ok(PaymentMethod::Check),
            "CASH" => Ok(PaymentMethod::Cash),
            other => Err(PaymentValidation::InvalidMethod(other.to_string())),
        }
    }
}

/// A billing record owned by a tenant.
///
/// Settlement state is derived, not stored: a record with a `paid_date` is
/// settled, an unpaid record past its due date is overdue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payment {
    pub id: String,
    pub tenant_id: String,
    pub amount_due: f64,
    pub due_date: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paid_date: Option<DateTime<Utc>>,
    pub next_payment_date: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_method: Option<PaymentMethod>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Payment {
    pub fn state(&self, now: DateTime<Utc>) -> PaymentState {
        if self.paid_date.is_some() {
            PaymentState::Paid
        } else if self.due_date < now {
            PaymentState::Overdue
        } else {
            PaymentState::Due
        }
    }
}

/// Derived settlement state of a single payment at a point in time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PaymentState {
    Paid,
    Due,
    Overdue,
}

/// Payload for creating a payment. The ID is assigned server-side when
/// absent; timestamps always are.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct NewPayment {
    #[serde(default)]
    pub id: Option<String>,
    pub tenant_id: String,
    pub amount_due: f64,
    pub due_date: DateTime<Utc>,
    pub next_payment_date: DateTime<Utc>,
    #[serde(default)]
    pub payment_method: Option<PaymentMethod>,
}

/// Payload for updating a payment. The owning tenant and creation timestamp
/// are preserved from the stored record and cannot be reassigned here.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PaymentUpdate {
    pub amount_due: f64,
    pub due_date: DateTime<Utc>,
    pub next_payment_date: DateTime<Utc>,
    #[serde(default)]
    pub paid_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub payment_method: Option<PaymentMethod>,
}

/// Field constraints rejected before anything is persisted.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum PaymentValidation {
    #[error("tenant id is required")]
    TenantRequired,
    #[error("amount due must be greater than zero")]
    NonPositiveAmount,
    #[error("next payment date {next} precedes due date {due}")]
    NextPaymentBeforeDue {
        due: DateTime<Utc>,
        next: DateTime<Utc>,
    },
    #[error("invalid payment method: {0}")]
    InvalidMethod(String),
}
