//! Triple-net (NNN) commercial lease economics.
//!
//! The engine is a pure transform: a raw parameter record is validated into
//! [`ValidatedLeaseInputs`], which drives the rent schedule, the pro-rata
//! expense allocation, the brokerage commissions and finally the lease-level
//! metrics. Nothing is cached or shared between calls.

pub mod analysis;
mod checked;
pub mod commissions;
pub mod error;
pub mod expenses;
pub mod inputs;
pub mod rent;
pub mod types;

pub use error::LeaseError;
pub use inputs::{FieldErrors, FieldId, RawLeaseInputs, ValidatedLeaseInputs, Violation};
pub use types::*;

/// Standard result type for all lease engine operations
pub type LeaseResult<T> = Result<T, LeaseError>;
