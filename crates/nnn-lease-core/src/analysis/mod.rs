pub mod aggregate;
pub mod pipeline;

pub use aggregate::{aggregate, LeaseAnalysis};
pub use pipeline::{analyze_lease, run_analysis, validate_lease, LeaseReport};
