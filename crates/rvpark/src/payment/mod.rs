//! Payment records and the derived Paid/Overdue standing.
//!
//! Records are validated and persisted here with no cross-entity awareness;
//! the status aggregation in [`status`] is the read-side the space manager
//! consumes for its display state.

pub mod domain;
pub mod repository;
pub mod router;
pub mod service;
pub mod status;

#[cfg(test)]
mod tests;

pub use domain::{
    NewPayment, Payment, PaymentMethod, PaymentState, PaymentUpdate, PaymentValidation,
};
pub use repository::PaymentRepository;
pub use router::payment_router;
pub use service::{PaymentError, PaymentService};
pub use status::{PaymentStatusSource, PaymentStatusSummary, TenantPaymentStatus};
