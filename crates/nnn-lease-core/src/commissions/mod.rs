pub mod brokerage;

pub use brokerage::{compute_commissions, CommissionPeriod, CommissionSummary};
