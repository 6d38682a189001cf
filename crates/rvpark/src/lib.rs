//! Property management backend for an RV park.
//!
//! The crate is organized around the three lifecycle managers that keep a
//! space's occupancy state, its tenant binding, and the tenant's payment
//! history mutually consistent:
//!
//! - [`space`] owns the Vacant/Reserved/Occupied state machine for rental
//!   spaces and the administrative edit path.
//! - [`tenant`] orchestrates the tenant↔space binding, issuing compensating
//!   actions when a multi-step flow fails partway.
//! - [`payment`] validates and persists payment records and derives a
//!   tenant's Paid/Overdue standing from them.
//! - [`user`] covers staff accounts, credential verification, and the opaque
//!   session tokens consumed by the HTTP layer's auth middleware.
//!
//! Persistence is abstracted behind per-entity repository traits so services
//! can be exercised against in-memory adapters in tests and wired to real
//! storage by the binary.

pub mod config;
pub mod error;
pub mod payment;
pub mod repository;
pub mod space;
pub mod telemetry;
pub mod tenant;
pub mod user;
