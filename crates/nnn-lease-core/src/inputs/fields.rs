//! Field schema for the lease parameter record.
//!
//! Every user-editable field has a stable identifier ([`FieldId::as_str`]),
//! which is both the key in the raw record and the key under which
//! violations are reported. Each field declares what kind of number it holds
//! and its lower/upper bounds; a bound may reference a sibling field so that
//! e.g. the rented area can never exceed the building area.

use std::collections::BTreeMap;
use std::fmt;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Longest lease the engine will schedule (50 years).
pub const MAX_TERM_MONTHS: Decimal = dec!(600);

const PERCENT_CEILING: Decimal = dec!(100);

// ---------------------------------------------------------------------------
// Field identifiers
// ---------------------------------------------------------------------------

/// Identifier of a validated field, in form order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldId {
    TotalSize,
    RentedSize,
    InitialRent,
    EscalationFreqInMonths,
    EscalationAmt,
    EscalationOption,
    TermLengthInMonths,
    DiscountLength,
    DiscountPercent,
    ManagementFee,
    CamExpense,
    InsuranceExpense,
    TaxExpense,
    ListingCommission,
    ProcuringCommission,
    Tia,
}

impl FieldId {
    pub const ALL: [FieldId; 16] = [
        FieldId::TotalSize,
        FieldId::RentedSize,
        FieldId::InitialRent,
        FieldId::EscalationFreqInMonths,
        FieldId::EscalationAmt,
        FieldId::EscalationOption,
        FieldId::TermLengthInMonths,
        FieldId::DiscountLength,
        FieldId::DiscountPercent,
        FieldId::ManagementFee,
        FieldId::CamExpense,
        FieldId::InsuranceExpense,
        FieldId::TaxExpense,
        FieldId::ListingCommission,
        FieldId::ProcuringCommission,
        FieldId::Tia,
    ];

    /// Stable identifier used as the record key and the error key.
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldId::TotalSize => "total_size",
            FieldId::RentedSize => "rented_size",
            FieldId::InitialRent => "initial_rent",
            FieldId::EscalationFreqInMonths => "escalation_freq_in_months",
            FieldId::EscalationAmt => "escalation_amt",
            FieldId::EscalationOption => "escalation_option",
            FieldId::TermLengthInMonths => "term_length_in_months",
            FieldId::DiscountLength => "discount_length",
            FieldId::DiscountPercent => "discount_percent",
            FieldId::ManagementFee => "management_fee",
            FieldId::CamExpense => "cam_expense",
            FieldId::InsuranceExpense => "insurance_expense",
            FieldId::TaxExpense => "tax_expense",
            FieldId::ListingCommission => "listing_commission",
            FieldId::ProcuringCommission => "procuring_commission",
            FieldId::Tia => "tia",
        }
    }

    /// Human-readable field name for messages.
    pub fn label(&self) -> &'static str {
        match self {
            FieldId::TotalSize => "Size of Property",
            FieldId::RentedSize => "Amount Renting",
            FieldId::InitialRent => "Initial Rent",
            FieldId::EscalationFreqInMonths => "Escalation Frequency In Months",
            FieldId::EscalationAmt => "Escalation Amount",
            FieldId::EscalationOption => "Escalation Option",
            FieldId::TermLengthInMonths => "Term Length In Months",
            FieldId::DiscountLength => "Discount Length",
            FieldId::DiscountPercent => "Discount Percent",
            FieldId::ManagementFee => "Management Fee",
            FieldId::CamExpense => "Common Area Maintenance",
            FieldId::InsuranceExpense => "Insurance",
            FieldId::TaxExpense => "Property Taxes",
            FieldId::ListingCommission => "Listing Commission",
            FieldId::ProcuringCommission => "Procuring Commission",
            FieldId::Tia => "Tenant Improvement Allowance",
        }
    }

    /// Look up a field by its stable identifier.
    pub fn parse(id: &str) -> Option<FieldId> {
        FieldId::ALL.into_iter().find(|f| f.as_str() == id)
    }

    pub fn spec(&self) -> FieldSpec {
        use Bound::*;
        use FieldKind::*;

        let zero = Decimal::ZERO;
        match self {
            FieldId::TotalSize => FieldSpec::new(Amount, Some(Exclusive(zero)), None),
            FieldId::RentedSize => FieldSpec::new(
                Amount,
                Some(Exclusive(zero)),
                Some(Field(FieldId::TotalSize)),
            ),
            FieldId::InitialRent => FieldSpec::new(Amount, Some(Inclusive(zero)), None),
            FieldId::EscalationFreqInMonths => FieldSpec::new(
                WholeMonths,
                Some(Inclusive(Decimal::ONE)),
                Some(Field(FieldId::TermLengthInMonths)),
            ),
            FieldId::EscalationAmt => FieldSpec::new(Amount, Some(Inclusive(zero)), None),
            FieldId::EscalationOption => FieldSpec::new(Choice, None, None),
            FieldId::TermLengthInMonths => FieldSpec::new(
                WholeMonths,
                Some(Inclusive(Decimal::ONE)),
                Some(Inclusive(MAX_TERM_MONTHS)),
            ),
            FieldId::DiscountLength => FieldSpec::new(
                WholeMonths,
                Some(Inclusive(zero)),
                Some(Field(FieldId::TermLengthInMonths)),
            ),
            FieldId::DiscountPercent
            | FieldId::ManagementFee
            | FieldId::ListingCommission
            | FieldId::ProcuringCommission => FieldSpec::new(
                Percent,
                Some(Inclusive(zero)),
                Some(Inclusive(PERCENT_CEILING)),
            ),
            FieldId::CamExpense | FieldId::InsuranceExpense | FieldId::TaxExpense | FieldId::Tia => {
                FieldSpec::new(Amount, Some(Inclusive(zero)), None)
            }
        }
    }
}

impl fmt::Display for FieldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Field specs
// ---------------------------------------------------------------------------

/// What a field's raw text must parse to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Any decimal (sizes, money, rates per area unit, factors)
    Amount,
    /// A whole number of months
    WholeMonths,
    /// A percentage entered in [0, 100], stored as a fraction
    Percent,
    /// An enumerated choice; only checked for being implemented
    Choice,
}

/// A lower or upper limit on a field's value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bound {
    Inclusive(Decimal),
    Exclusive(Decimal),
    /// Inclusive limit taken from the current value of a sibling field
    Field(FieldId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub kind: FieldKind,
    pub min: Option<Bound>,
    pub max: Option<Bound>,
}

impl FieldSpec {
    const fn new(kind: FieldKind, min: Option<Bound>, max: Option<Bound>) -> Self {
        FieldSpec { kind, min, max }
    }
}

// ---------------------------------------------------------------------------
// Violations
// ---------------------------------------------------------------------------

/// A single reason a field was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Violation {
    Missing,
    NotANumber,
    NotAWholeNumber,
    BelowMin { min: Decimal, inclusive: bool },
    AboveMax { max: Decimal },
    NotImplemented { option: String },
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Violation::Missing => f.write_str("is required"),
            Violation::NotANumber => f.write_str("is not a number"),
            Violation::NotAWholeNumber => f.write_str("must be a whole number of months"),
            Violation::BelowMin {
                min,
                inclusive: true,
            } => write!(f, "must be at least {min}"),
            Violation::BelowMin {
                min,
                inclusive: false,
            } => write!(f, "must be greater than {min}"),
            Violation::AboveMax { max } => write!(f, "must be at most {max}"),
            Violation::NotImplemented { option } => {
                write!(f, "option '{option}' is not implemented")
            }
        }
    }
}

impl std::error::Error for Violation {}

impl Violation {
    /// Terminal violations stop further checks on the same field.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Violation::Missing | Violation::NotANumber | Violation::NotAWholeNumber
        )
    }
}

/// Violations keyed by field, in form order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<FieldId, Vec<Violation>>);

impl FieldErrors {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of fields carrying at least one violation.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn get(&self, field: FieldId) -> &[Violation] {
        self.0.get(&field).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn contains(&self, field: FieldId) -> bool {
        self.0.contains_key(&field)
    }

    pub fn push(&mut self, field: FieldId, violation: Violation) {
        self.0.entry(field).or_default().push(violation);
    }

    /// Record a field's violations; an empty list leaves the map unchanged.
    pub fn extend(&mut self, field: FieldId, violations: Vec<Violation>) {
        if !violations.is_empty() {
            self.0.entry(field).or_default().extend(violations);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (FieldId, &[Violation])> {
        self.0.iter().map(|(f, v)| (*f, v.as_slice()))
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, violations) in self.iter() {
            for v in violations {
                if !first {
                    f.write_str("; ")?;
                }
                write!(f, "{field} {v}")?;
                first = false;
            }
        }
        Ok(())
    }
}
