use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// All monetary values. Wraps Decimal to prevent accidental f64 usage.
pub type Money = Decimal;

/// Rates expressed as decimals (0.05 = 5%). Never as percentages.
pub type Rate = Decimal;

/// Floor area in whatever [`AreaUnit`] the scenario uses.
pub type AreaSize = Decimal;

/// Whole calendar months, 1-indexed when used as a position in the term.
pub type Months = u32;

/// Unit the building and premises are measured in. Display only.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AreaUnit {
    #[default]
    SquareFeet,
    SquareMeters,
}

/// How the initial rent figure is quoted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RentUnit {
    /// Rate per area unit (e.g. $1.00 / sq ft)
    #[default]
    PerAreaUnit,
    /// Total rent for the premises
    PerMonth,
}

/// Period the initial rent figure covers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RentEntryFrequency {
    #[default]
    Monthly,
    Yearly,
}

/// How the rent rate steps up at each escalation boundary.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EscalationType {
    /// Multiply the rate by the escalation amount (1.03 = +3%)
    #[default]
    Percentage,
    /// Add the escalation amount to the rate
    Fixed,
}

/// Schedule policy. Only the front-loaded discount policy has a defined
/// rent walk; the reserved options are accepted by the parser but rejected
/// by validation and by the generator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EscalationOption {
    #[default]
    FrontLoadedDiscount,
    #[serde(rename = "reserved_2")]
    Reserved2,
    #[serde(rename = "reserved_3")]
    Reserved3,
}

impl EscalationOption {
    pub fn is_implemented(&self) -> bool {
        matches!(self, EscalationOption::FrontLoadedDiscount)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            EscalationOption::FrontLoadedDiscount => "front_loaded_discount",
            EscalationOption::Reserved2 => "reserved_2",
            EscalationOption::Reserved3 => "reserved_3",
        }
    }
}

/// Concession granted over the opening months of the lease.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IncentiveType {
    /// No rent is charged during the discount period
    #[default]
    FreeRent,
    /// Rent is reduced by `discount_percent` during the discount period
    Discount,
}

/// How the tenant improvement allowance is quoted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TiaType {
    #[default]
    PerAreaUnit,
    FixedAmount,
}

/// Standard computation output envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationOutput<T: Serialize> {
    pub result: T,
    pub methodology: String,
    pub assumptions: serde_json::Value,
    pub warnings: Vec<String>,
    pub metadata: ComputationMetadata,
}

/// Metadata for every computation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationMetadata {
    pub version: String,
    pub computation_time_us: u64,
    pub precision: String,
}

/// Helper to wrap computation results with metadata
pub fn with_metadata<T: Serialize>(
    methodology: &str,
    assumptions: &impl Serialize,
    warnings: Vec<String>,
    elapsed_us: u64,
    result: T,
) -> ComputationOutput<T> {
    ComputationOutput {
        result,
        methodology: methodology.to_string(),
        assumptions: serde_json::to_value(assumptions).unwrap_or_default(),
        warnings,
        metadata: ComputationMetadata {
            version: env!("CARGO_PKG_VERSION").to_string(),
            computation_time_us: elapsed_us,
            precision: "rust_decimal_128bit".to_string(),
        },
    }
}
