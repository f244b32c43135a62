use serde::{Deserialize, Serialize};

use crate::checked;
use crate::commissions::CommissionSummary;
use crate::expenses::ExpenseSummary;
use crate::inputs::ValidatedLeaseInputs;
use crate::rent::RentSchedule;
use crate::types::{Money, Months, Rate};
use crate::LeaseResult;

/// Lease-level profitability metrics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaseAnalysis {
    pub term_length_in_months: Months,
    /// Rented area / building area
    pub proportionate_share: Rate,
    /// Tenant improvement allowance in dollars
    pub tia: Money,
    pub total_commission: Money,
    /// TIA plus commissions
    pub turnover_costs: Money,
    pub total_net_rent: Money,
    /// Net rent over the term less turnover costs
    pub full_term_noi: Money,
    pub net_effective_rent: Rate,
    /// First month's rent plus recoveries
    pub starting_gross_rent: Money,
    pub starting_gross_rent_per_unit: Money,
}

/// Combine the schedule, expense and commission results.
pub fn aggregate(
    inputs: &ValidatedLeaseInputs,
    schedule: &RentSchedule,
    expenses: &ExpenseSummary,
    commissions: &CommissionSummary,
) -> LeaseResult<LeaseAnalysis> {
    let tia = inputs.tia_total()?;
    let turnover_costs = checked::add(tia, commissions.total_commission, "turnover costs")?;

    Ok(LeaseAnalysis {
        term_length_in_months: schedule.total_term_length,
        proportionate_share: inputs.proportionate_share(),
        tia,
        total_commission: commissions.total_commission,
        turnover_costs,
        total_net_rent: schedule.total_net_rent,
        full_term_noi: checked::sub(schedule.total_net_rent, turnover_costs, "full-term NOI")?,
        net_effective_rent: schedule.net_effective_rent,
        starting_gross_rent: expenses.gross_monthly_rent,
        starting_gross_rent_per_unit: expenses.gross_rent_per_unit_monthly,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commissions::compute_commissions;
    use crate::expenses::{allocate_expenses, ExpenseAllocationInput};
    use crate::inputs::fixtures::office_lease;
    use crate::rent::generate_rent_schedule;
    use rust_decimal_macros::dec;

    #[test]
    fn test_office_lease_metrics() {
        let inputs = office_lease();
        let schedule = generate_rent_schedule(&inputs).unwrap();
        let expenses = allocate_expenses(&ExpenseAllocationInput::from_lease(
            &inputs,
            schedule.starting_monthly_rent,
        ))
        .unwrap();
        let commissions = compute_commissions(
            &schedule,
            inputs.listing_commission_rate,
            inputs.procuring_commission_rate,
        )
        .unwrap();

        let a = aggregate(&inputs, &schedule, &expenses, &commissions).unwrap();
        assert_eq!(a.proportionate_share, dec!(0.1));
        // $5 / sq ft on 10,000 sq ft
        assert_eq!(a.tia, dec!(50000));
        assert_eq!(a.turnover_costs, dec!(81354.81486));
        assert_eq!(a.full_term_noi, dec!(545741.48234));
        assert_eq!(a.starting_gross_rent, dec!(11330));
        assert_eq!(a.net_effective_rent, schedule.net_effective_rent);
    }
}
