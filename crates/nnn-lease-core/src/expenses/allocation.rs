//! Pro-rata recovery of building operating expenses.
//!
//! Under a triple-net lease the tenant reimburses its share of the
//! building's CAM, insurance and property taxes, plus a management fee
//! charged on the tenant's rent and recoveries. Each named expense is
//! allocated by the tenant's proportionate share; the management fee line is
//! derived afterwards from the sum of the other lines and the starting rent.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::checked;
use crate::error::LeaseError;
use crate::inputs::ValidatedLeaseInputs;
use crate::types::{AreaSize, Money, Rate};
use crate::LeaseResult;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

const MONTHS_PER_YEAR: Decimal = dec!(12);

pub const MANAGEMENT_FEE_LINE: &str = "Management Fee";

// ---------------------------------------------------------------------------
// Input types
// ---------------------------------------------------------------------------

/// A named building-level operating expense.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpenseItem {
    pub name: String,
    /// Building-wide annual amount
    pub annual_amount: Money,
}

/// Input for expense allocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpenseAllocationInput {
    pub rented_size: AreaSize,
    /// First month's base rent, before any concession
    pub starting_monthly_rent: Money,
    /// Rented area / building area
    pub proportionate_share: Rate,
    /// Management fee as a fraction of rent plus recoveries
    pub management_fee_rate: Rate,
    pub expenses: Vec<ExpenseItem>,
}

impl ExpenseAllocationInput {
    /// Allocation input for a validated lease: CAM, insurance and taxes.
    pub fn from_lease(inputs: &ValidatedLeaseInputs, starting_monthly_rent: Money) -> Self {
        ExpenseAllocationInput {
            rented_size: inputs.rented_size,
            starting_monthly_rent,
            proportionate_share: inputs.proportionate_share(),
            management_fee_rate: inputs.management_fee_rate,
            expenses: vec![
                ExpenseItem {
                    name: "CAM".to_string(),
                    annual_amount: inputs.cam_expense,
                },
                ExpenseItem {
                    name: "Insurance".to_string(),
                    annual_amount: inputs.insurance_expense,
                },
                ExpenseItem {
                    name: "Taxes".to_string(),
                    annual_amount: inputs.tax_expense,
                },
            ],
        }
    }
}

// ---------------------------------------------------------------------------
// Output types
// ---------------------------------------------------------------------------

/// One allocated expense.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpenseLine {
    pub name: String,
    pub building_annual_total: Money,
    pub pro_rata_annual_total: Money,
    pub building_monthly_total: Money,
    pub pro_rata_monthly_total: Money,
    /// Tenant's monthly share per rented area unit
    pub per_area_unit_monthly: Money,
}

/// All allocated expenses plus the resulting gross rent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpenseSummary {
    /// Named expenses in input order, management fee last
    pub lines: Vec<ExpenseLine>,
    pub building_annual_total_expenses: Money,
    pub pro_rata_annual_total_expenses: Money,
    pub pro_rata_monthly_total_expenses: Money,
    /// Monthly expenses per rented area unit
    pub total_expenses_per_unit: Money,
    /// Monthly base rent plus expenses, per rented area unit
    pub gross_rent_per_unit_monthly: Money,
    pub gross_rent_per_unit_annual: Money,
    pub gross_monthly_rent: Money,
    pub gross_annual_rent: Money,
}

impl ExpenseSummary {
    pub fn management_fee(&self) -> Option<&ExpenseLine> {
        self.lines.iter().find(|l| l.name == MANAGEMENT_FEE_LINE)
    }
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Allocate building expenses to the tenant and compute gross rent.
pub fn allocate_expenses(input: &ExpenseAllocationInput) -> LeaseResult<ExpenseSummary> {
    validate_input(input)?;

    let share = input.proportionate_share;
    let mut lines = input
        .expenses
        .iter()
        .map(|item| {
            // share is in (0, 1], so the pro-rata amounts cannot overflow
            let building_monthly = item.annual_amount / MONTHS_PER_YEAR;
            let pro_rata_monthly = building_monthly * share;
            Ok(ExpenseLine {
                name: item.name.clone(),
                building_annual_total: item.annual_amount,
                pro_rata_annual_total: item.annual_amount * share,
                building_monthly_total: building_monthly,
                pro_rata_monthly_total: pro_rata_monthly,
                per_area_unit_monthly: checked::div(
                    pro_rata_monthly,
                    input.rented_size,
                    "expense per area unit",
                )?,
            })
        })
        .collect::<LeaseResult<Vec<ExpenseLine>>>()?;

    let other_monthly = checked::sum(
        lines.iter().map(|l| l.pro_rata_monthly_total),
        "monthly recoveries",
    )?;
    let fee_monthly = checked::mul(
        checked::add(other_monthly, input.starting_monthly_rent, "management fee base")?,
        input.management_fee_rate,
        "management fee",
    )?;
    lines.push(ExpenseLine {
        name: MANAGEMENT_FEE_LINE.to_string(),
        building_annual_total: Decimal::ZERO,
        pro_rata_annual_total: checked::mul(fee_monthly, MONTHS_PER_YEAR, "management fee")?,
        building_monthly_total: Decimal::ZERO,
        pro_rata_monthly_total: fee_monthly,
        per_area_unit_monthly: checked::div(
            fee_monthly,
            input.rented_size,
            "management fee per area unit",
        )?,
    });

    let building_annual_total_expenses = checked::sum(
        lines.iter().map(|l| l.building_annual_total),
        "building expenses",
    )?;
    let pro_rata_annual_total_expenses = checked::sum(
        lines.iter().map(|l| l.pro_rata_annual_total),
        "annual recoveries",
    )?;
    let pro_rata_monthly_total_expenses = checked::sum(
        lines.iter().map(|l| l.pro_rata_monthly_total),
        "monthly recoveries",
    )?;
    let total_expenses_per_unit = checked::sum(
        lines.iter().map(|l| l.per_area_unit_monthly),
        "expenses per area unit",
    )?;

    let gross_rent_per_unit_monthly = checked::add(
        checked::div(
            input.starting_monthly_rent,
            input.rented_size,
            "rent per area unit",
        )?,
        total_expenses_per_unit,
        "gross rent per area unit",
    )?;
    let gross_monthly_rent =
        checked::mul(gross_rent_per_unit_monthly, input.rented_size, "gross rent")?;

    debug!(
        lines = lines.len(),
        %fee_monthly,
        %gross_monthly_rent,
        "expenses allocated"
    );

    Ok(ExpenseSummary {
        lines,
        building_annual_total_expenses,
        pro_rata_annual_total_expenses,
        pro_rata_monthly_total_expenses,
        total_expenses_per_unit,
        gross_rent_per_unit_monthly,
        gross_rent_per_unit_annual: checked::mul(
            gross_rent_per_unit_monthly,
            MONTHS_PER_YEAR,
            "gross rent per area unit",
        )?,
        gross_monthly_rent,
        gross_annual_rent: checked::mul(gross_monthly_rent, MONTHS_PER_YEAR, "gross rent")?,
    })
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate_input(input: &ExpenseAllocationInput) -> LeaseResult<()> {
    if input.rented_size <= Decimal::ZERO {
        return Err(LeaseError::InvalidInput {
            field: "rented_size".into(),
            reason: "Rented size must be positive".into(),
        });
    }
    if input.proportionate_share <= Decimal::ZERO || input.proportionate_share > Decimal::ONE {
        return Err(LeaseError::InvalidInput {
            field: "proportionate_share".into(),
            reason: format!(
                "Proportionate share must be in (0, 1], got {}",
                input.proportionate_share
            ),
        });
    }
    if input.management_fee_rate < Decimal::ZERO {
        return Err(LeaseError::InvalidInput {
            field: "management_fee_rate".into(),
            reason: "Management fee rate cannot be negative".into(),
        });
    }
    if let Some(item) = input.expenses.iter().find(|e| e.annual_amount < Decimal::ZERO) {
        return Err(LeaseError::InvalidInput {
            field: "expenses".into(),
            reason: format!("Expense '{}' has a negative annual amount", item.name),
        });
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inputs::fixtures::office_lease;
    use pretty_assertions::assert_eq;

    /// Helper: CAM 30k, insurance 30k, taxes 60k, 10% share, 3% fee
    fn office_expenses() -> ExpenseAllocationInput {
        ExpenseAllocationInput {
            rented_size: dec!(10000),
            starting_monthly_rent: dec!(10000),
            proportionate_share: dec!(0.1),
            management_fee_rate: dec!(0.03),
            expenses: vec![
                ExpenseItem {
                    name: "CAM".into(),
                    annual_amount: dec!(30000),
                },
                ExpenseItem {
                    name: "Insurance".into(),
                    annual_amount: dec!(30000),
                },
                ExpenseItem {
                    name: "Taxes".into(),
                    annual_amount: dec!(60000),
                },
            ],
        }
    }

    #[test]
    fn test_named_lines_allocated_by_share() {
        let s = allocate_expenses(&office_expenses()).unwrap();
        let cam = &s.lines[0];
        assert_eq!(cam.name, "CAM");
        assert_eq!(cam.building_monthly_total, dec!(2500));
        assert_eq!(cam.pro_rata_monthly_total, dec!(250));
        assert_eq!(cam.pro_rata_annual_total, dec!(3000));
        assert_eq!(cam.per_area_unit_monthly, dec!(0.025));
        assert_eq!(s.lines[2].pro_rata_monthly_total, dec!(500));
    }

    #[test]
    fn test_management_fee_on_rent_plus_recoveries() {
        let s = allocate_expenses(&office_expenses()).unwrap();
        assert_eq!(s.lines.len(), 4);
        let fee = s.lines.last().unwrap();
        assert_eq!(fee.name, MANAGEMENT_FEE_LINE);
        // (250 + 250 + 500 + 10,000) * 3%
        assert_eq!(fee.pro_rata_monthly_total, dec!(330));
        assert_eq!(fee.pro_rata_annual_total, dec!(3960));
        assert_eq!(fee.building_annual_total, Decimal::ZERO);
        assert_eq!(fee.building_monthly_total, Decimal::ZERO);
        assert_eq!(s.management_fee(), Some(fee));
    }

    #[test]
    fn test_totals_include_management_fee() {
        let s = allocate_expenses(&office_expenses()).unwrap();
        assert_eq!(s.pro_rata_monthly_total_expenses, dec!(1330));
        assert_eq!(s.pro_rata_annual_total_expenses, dec!(15960));
        assert_eq!(s.building_annual_total_expenses, dec!(120000));
        assert_eq!(s.total_expenses_per_unit, dec!(0.133));
    }

    #[test]
    fn test_gross_rent_figures() {
        let s = allocate_expenses(&office_expenses()).unwrap();
        // 10,000 / 10,000 + 0.133
        assert_eq!(s.gross_rent_per_unit_monthly, dec!(1.133));
        assert_eq!(s.gross_rent_per_unit_annual, dec!(13.596));
        assert_eq!(s.gross_monthly_rent, dec!(11330));
        assert_eq!(s.gross_annual_rent, dec!(135960));
    }

    #[test]
    fn test_zero_fee_rate_still_appends_fee_line() {
        let mut input = office_expenses();
        input.management_fee_rate = Decimal::ZERO;
        let s = allocate_expenses(&input).unwrap();
        assert_eq!(s.lines.len(), 4);
        assert_eq!(s.lines[3].pro_rata_monthly_total, Decimal::ZERO);
    }

    #[test]
    fn test_from_lease_uses_named_expenses() {
        let input = ExpenseAllocationInput::from_lease(&office_lease(), dec!(10000));
        assert_eq!(input, office_expenses());
    }

    #[test]
    fn test_rejects_zero_rented_size() {
        let mut input = office_expenses();
        input.rented_size = Decimal::ZERO;
        match allocate_expenses(&input).unwrap_err() {
            LeaseError::InvalidInput { field, .. } => assert_eq!(field, "rented_size"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_rejects_share_above_one() {
        let mut input = office_expenses();
        input.proportionate_share = dec!(1.5);
        assert!(allocate_expenses(&input).is_err());
    }

    #[test]
    fn test_huge_rent_overflows_as_error() {
        let mut input = office_expenses();
        input.starting_monthly_rent = Decimal::MAX;
        match allocate_expenses(&input).unwrap_err() {
            LeaseError::Overflow { context } => assert_eq!(context, "management fee base"),
            other => panic!("unexpected error: {other}"),
        }
    }
}
