//! Raw parameter record, validated record, and the validator between them.
//!
//! Validation never fails with an `Err` from a panic or a parse exception:
//! each field is checked in a fixed order (presence, parse, whole-number,
//! minimum, maximum) and every violation across the record is collected so
//! the caller can surface them together.

use std::collections::BTreeMap;
use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Deserializer, Serialize};
use tracing::debug;

use super::fields::{Bound, FieldErrors, FieldId, FieldKind, Violation};
use crate::checked;
use crate::types::{
    AreaSize, AreaUnit, EscalationOption, EscalationType, IncentiveType, Money, Months, Rate,
    RentEntryFrequency, RentUnit, TiaType,
};
use crate::LeaseResult;

const MONTHS_PER_YEAR: Decimal = dec!(12);
const PERCENT: Decimal = dec!(100);

// ---------------------------------------------------------------------------
// Input types
// ---------------------------------------------------------------------------

/// User-entered lease parameters. Numeric fields hold the text exactly as
/// entered (JSON numbers are accepted and kept as text); any of them may be
/// absent. Enumerated fields fall back to their defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawLeaseInputs {
    #[serde(default)]
    pub area_unit: AreaUnit,
    #[serde(default, deserialize_with = "raw_text", skip_serializing_if = "Option::is_none")]
    pub total_size: Option<String>,
    #[serde(default, deserialize_with = "raw_text", skip_serializing_if = "Option::is_none")]
    pub rented_size: Option<String>,

    #[serde(default)]
    pub rent_unit: RentUnit,
    #[serde(default)]
    pub rent_entry_frequency: RentEntryFrequency,
    #[serde(default, deserialize_with = "raw_text", skip_serializing_if = "Option::is_none")]
    pub initial_rent: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lease_start_date: Option<NaiveDate>,

    #[serde(default, deserialize_with = "raw_text", skip_serializing_if = "Option::is_none")]
    pub escalation_freq_in_months: Option<String>,
    #[serde(default, deserialize_with = "raw_text", skip_serializing_if = "Option::is_none")]
    pub escalation_amt: Option<String>,
    #[serde(default)]
    pub escalation_type: EscalationType,
    #[serde(default)]
    pub escalation_option: EscalationOption,
    #[serde(default, deserialize_with = "raw_text", skip_serializing_if = "Option::is_none")]
    pub term_length_in_months: Option<String>,

    #[serde(default)]
    pub incentive_type: IncentiveType,
    #[serde(default, deserialize_with = "raw_text", skip_serializing_if = "Option::is_none")]
    pub discount_length: Option<String>,
    #[serde(default, deserialize_with = "raw_text", skip_serializing_if = "Option::is_none")]
    pub discount_percent: Option<String>,

    #[serde(default, deserialize_with = "raw_text", skip_serializing_if = "Option::is_none")]
    pub management_fee: Option<String>,
    #[serde(default, deserialize_with = "raw_text", skip_serializing_if = "Option::is_none")]
    pub cam_expense: Option<String>,
    #[serde(default, deserialize_with = "raw_text", skip_serializing_if = "Option::is_none")]
    pub insurance_expense: Option<String>,
    #[serde(default, deserialize_with = "raw_text", skip_serializing_if = "Option::is_none")]
    pub tax_expense: Option<String>,

    #[serde(default, deserialize_with = "raw_text", skip_serializing_if = "Option::is_none")]
    pub listing_commission: Option<String>,
    #[serde(default, deserialize_with = "raw_text", skip_serializing_if = "Option::is_none")]
    pub procuring_commission: Option<String>,

    #[serde(default)]
    pub tia_type: TiaType,
    #[serde(default, deserialize_with = "raw_text", skip_serializing_if = "Option::is_none")]
    pub tia: Option<String>,
}

impl RawLeaseInputs {
    /// Raw text currently entered for a numeric field.
    pub fn raw(&self, field: FieldId) -> Option<&str> {
        let slot = match field {
            FieldId::TotalSize => &self.total_size,
            FieldId::RentedSize => &self.rented_size,
            FieldId::InitialRent => &self.initial_rent,
            FieldId::EscalationFreqInMonths => &self.escalation_freq_in_months,
            FieldId::EscalationAmt => &self.escalation_amt,
            FieldId::EscalationOption => return Some(self.escalation_option.as_str()),
            FieldId::TermLengthInMonths => &self.term_length_in_months,
            FieldId::DiscountLength => &self.discount_length,
            FieldId::DiscountPercent => &self.discount_percent,
            FieldId::ManagementFee => &self.management_fee,
            FieldId::CamExpense => &self.cam_expense,
            FieldId::InsuranceExpense => &self.insurance_expense,
            FieldId::TaxExpense => &self.tax_expense,
            FieldId::ListingCommission => &self.listing_commission,
            FieldId::ProcuringCommission => &self.procuring_commission,
            FieldId::Tia => &self.tia,
        };
        slot.as_deref()
    }

    /// Enter text into a numeric field. Choice fields are set directly.
    pub fn set(&mut self, field: FieldId, value: impl Into<String>) {
        let slot = match field {
            FieldId::TotalSize => &mut self.total_size,
            FieldId::RentedSize => &mut self.rented_size,
            FieldId::InitialRent => &mut self.initial_rent,
            FieldId::EscalationFreqInMonths => &mut self.escalation_freq_in_months,
            FieldId::EscalationAmt => &mut self.escalation_amt,
            FieldId::EscalationOption => return,
            FieldId::TermLengthInMonths => &mut self.term_length_in_months,
            FieldId::DiscountLength => &mut self.discount_length,
            FieldId::DiscountPercent => &mut self.discount_percent,
            FieldId::ManagementFee => &mut self.management_fee,
            FieldId::CamExpense => &mut self.cam_expense,
            FieldId::InsuranceExpense => &mut self.insurance_expense,
            FieldId::TaxExpense => &mut self.tax_expense,
            FieldId::ListingCommission => &mut self.listing_commission,
            FieldId::ProcuringCommission => &mut self.procuring_commission,
            FieldId::Tia => &mut self.tia,
        };
        *slot = Some(value.into());
    }

    /// Builder form of [`RawLeaseInputs::set`].
    pub fn with(mut self, field: FieldId, value: impl Into<String>) -> Self {
        self.set(field, value);
        self
    }
}

/// Accepts a JSON string, number or null for a raw numeric field.
fn raw_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Scalar {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(Option::<Scalar>::deserialize(deserializer)?.map(|s| match s {
        Scalar::Text(t) => t,
        Scalar::Number(n) => n.to_string(),
    }))
}

// ---------------------------------------------------------------------------
// Validated record
// ---------------------------------------------------------------------------

/// Fully populated lease parameters. Only [`validate`] can build one, so
/// holding a value proves every field passed its checks: both sizes are
/// positive, the rented area fits the building, and the discount period and
/// escalation frequency fit inside the term. Percentages are stored as
/// fractions.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidatedLeaseInputs {
    pub area_unit: AreaUnit,
    pub total_size: AreaSize,
    pub rented_size: AreaSize,
    pub rent_unit: RentUnit,
    pub rent_entry_frequency: RentEntryFrequency,
    /// Initial rent as entered, in `rent_unit` per `rent_entry_frequency`
    pub initial_rent: Money,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lease_start_date: Option<NaiveDate>,
    pub escalation_freq_in_months: Months,
    pub escalation_amt: Decimal,
    pub escalation_type: EscalationType,
    pub escalation_option: EscalationOption,
    pub term_length_in_months: Months,
    pub incentive_type: IncentiveType,
    pub discount_length: Months,
    pub discount_rate: Rate,
    pub management_fee_rate: Rate,
    pub cam_expense: Money,
    pub insurance_expense: Money,
    pub tax_expense: Money,
    pub listing_commission_rate: Rate,
    pub procuring_commission_rate: Rate,
    pub tia_type: TiaType,
    /// TIA as entered, in `tia_type` units
    pub tia: Money,
    #[serde(skip)]
    sealed: (),
}

impl ValidatedLeaseInputs {
    /// Starting rent normalised to a monthly rate per area unit.
    pub fn monthly_rate_per_area_unit(&self) -> LeaseResult<Rate> {
        let per_area = match self.rent_unit {
            RentUnit::PerAreaUnit => self.initial_rent,
            RentUnit::PerMonth => {
                checked::div(self.initial_rent, self.rented_size, "rent per area unit")?
            }
        };
        Ok(match self.rent_entry_frequency {
            RentEntryFrequency::Monthly => per_area,
            RentEntryFrequency::Yearly => per_area / MONTHS_PER_YEAR,
        })
    }

    /// Tenant improvement allowance in dollars.
    pub fn tia_total(&self) -> LeaseResult<Money> {
        match self.tia_type {
            TiaType::PerAreaUnit => checked::mul(self.tia, self.rented_size, "tenant improvements"),
            TiaType::FixedAmount => Ok(self.tia),
        }
    }

    /// Rented area as a fraction of the building, in (0, 1].
    pub fn proportionate_share(&self) -> Rate {
        self.rented_size / self.total_size
    }
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Validate the whole record. On failure every field's violations are
/// returned together.
pub fn validate(raw: &RawLeaseInputs) -> Result<ValidatedLeaseInputs, FieldErrors> {
    let parsed = parse_all(raw);
    let mut errors = FieldErrors::default();
    for field in FieldId::ALL {
        errors.extend(field, check_field(raw, field, &parsed));
    }

    if !errors.is_empty() {
        debug!(fields = errors.len(), "lease inputs rejected");
        return Err(errors);
    }

    Ok(assemble(raw, &parsed))
}

/// Validate a single field against the rest of the record, for live
/// feedback while the record is still being filled in.
pub fn validate_field(raw: &RawLeaseInputs, field: FieldId) -> Vec<Violation> {
    check_field(raw, field, &parse_all(raw))
}

// ---------------------------------------------------------------------------
// Field checks
// ---------------------------------------------------------------------------

fn parse_decimal(text: &str) -> Option<Decimal> {
    let t = text.trim();
    Decimal::from_str(t)
        .or_else(|_| Decimal::from_scientific(t))
        .ok()
}

/// Every numeric field whose text currently parses. Dynamic bounds read
/// their sibling values from here.
fn parse_all(raw: &RawLeaseInputs) -> BTreeMap<FieldId, Decimal> {
    FieldId::ALL
        .into_iter()
        .filter(|f| f.spec().kind != FieldKind::Choice)
        .filter_map(|f| raw.raw(f).and_then(parse_decimal).map(|d| (f, d)))
        .collect()
}

fn check_field(
    raw: &RawLeaseInputs,
    field: FieldId,
    parsed: &BTreeMap<FieldId, Decimal>,
) -> Vec<Violation> {
    let spec = field.spec();

    if spec.kind == FieldKind::Choice {
        return match field {
            FieldId::EscalationOption if !raw.escalation_option.is_implemented() => {
                vec![Violation::NotImplemented {
                    option: raw.escalation_option.as_str().to_string(),
                }]
            }
            _ => Vec::new(),
        };
    }

    let text = match raw.raw(field).map(str::trim) {
        Some(t) if !t.is_empty() => t,
        _ => return vec![Violation::Missing],
    };
    let value = match parsed.get(&field) {
        Some(v) => *v,
        None => {
            debug!(field = field.as_str(), text, "not a number");
            return vec![Violation::NotANumber];
        }
    };
    if spec.kind == FieldKind::WholeMonths && !value.fract().is_zero() {
        return vec![Violation::NotAWholeNumber];
    }

    let mut violations = Vec::new();
    match spec.min.and_then(|b| resolve(b, parsed)) {
        Some((min, true)) if value < min => violations.push(Violation::BelowMin {
            min,
            inclusive: true,
        }),
        Some((min, false)) if value <= min => violations.push(Violation::BelowMin {
            min,
            inclusive: false,
        }),
        _ => {}
    }
    if let Some((max, _)) = spec.max.and_then(|b| resolve(b, parsed)) {
        if value > max {
            violations.push(Violation::AboveMax { max });
        }
    }
    violations
}

/// Resolve a bound to `(value, inclusive)`. A sibling bound whose sibling
/// does not currently parse is skipped.
fn resolve(bound: Bound, parsed: &BTreeMap<FieldId, Decimal>) -> Option<(Decimal, bool)> {
    match bound {
        Bound::Inclusive(v) => Some((v, true)),
        Bound::Exclusive(v) => Some((v, false)),
        Bound::Field(sibling) => parsed.get(&sibling).map(|v| (*v, true)),
    }
}

// ---------------------------------------------------------------------------
// Assembly
// ---------------------------------------------------------------------------

/// Build the validated record. Only called after every field has passed
/// `check_field`: each numeric field parses, and every month count is a
/// whole number in `0..=MAX_TERM_MONTHS`.
fn assemble(raw: &RawLeaseInputs, parsed: &BTreeMap<FieldId, Decimal>) -> ValidatedLeaseInputs {
    let amount = |field: FieldId| parsed.get(&field).copied().unwrap_or_default();
    let months = |field: FieldId| amount(field).to_u32().unwrap_or_default();

    let total_size = amount(FieldId::TotalSize);
    let rented_size = amount(FieldId::RentedSize);
    let initial_rent = amount(FieldId::InitialRent);
    let escalation_amt = amount(FieldId::EscalationAmt);
    let discount_percent = amount(FieldId::DiscountPercent);
    let management_fee = amount(FieldId::ManagementFee);
    let cam_expense = amount(FieldId::CamExpense);
    let insurance_expense = amount(FieldId::InsuranceExpense);
    let tax_expense = amount(FieldId::TaxExpense);
    let listing = amount(FieldId::ListingCommission);
    let procuring = amount(FieldId::ProcuringCommission);
    let tia = amount(FieldId::Tia);

    let escalation_freq_in_months = months(FieldId::EscalationFreqInMonths);
    let term_length_in_months = months(FieldId::TermLengthInMonths);
    let discount_length = months(FieldId::DiscountLength);

    ValidatedLeaseInputs {
        area_unit: raw.area_unit,
        total_size,
        rented_size,
        rent_unit: raw.rent_unit,
        rent_entry_frequency: raw.rent_entry_frequency,
        initial_rent,
        lease_start_date: raw.lease_start_date,
        escalation_freq_in_months,
        escalation_amt,
        escalation_type: raw.escalation_type,
        escalation_option: raw.escalation_option,
        term_length_in_months,
        incentive_type: raw.incentive_type,
        discount_length,
        discount_rate: discount_percent / PERCENT,
        management_fee_rate: management_fee / PERCENT,
        cam_expense,
        insurance_expense,
        tax_expense,
        listing_commission_rate: listing / PERCENT,
        procuring_commission_rate: procuring / PERCENT,
        tia_type: raw.tia_type,
        tia,
        sealed: (),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
