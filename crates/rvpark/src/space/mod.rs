//! Space lifecycle: the Vacant/Reserved/Occupied state machine, the vacancy
//! queries the front desk works from, and the administrative edit path.

pub mod domain;
pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::{PaymentCadence, Space, SpaceStatus, SpaceValidation, SpaceView};
pub use repository::SpaceRepository;
pub use router::space_router;
pub use service::{SpaceError, SpaceService};
