//! Brokerage commissions on realized rent.
//!
//! The listing broker and the procuring (tenant) broker are each paid a
//! percentage of the consideration, which is the rent actually collected in
//! each rent period. Free-rent months therefore earn no commission.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::checked;
use crate::rent::RentSchedule;
use crate::types::{Money, Months, Rate};
use crate::LeaseResult;

/// Commission earned on one rent period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommissionPeriod {
    pub period_from: Months,
    pub period_to: Months,
    /// Rent collected over the period
    pub consideration_amount: Money,
    pub listing_amount: Money,
    pub procuring_amount: Money,
    /// Listing rate plus procuring rate
    pub total_percent: Rate,
    pub total_amount: Money,
}

/// Commissions for the whole term.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommissionSummary {
    pub periods: Vec<CommissionPeriod>,
    pub total_consideration: Money,
    pub total_listing: Money,
    pub total_procuring: Money,
    pub total_commission: Money,
}

/// Commission on every period of the schedule. Each side is paid at its own
/// rate.
pub fn compute_commissions(
    schedule: &RentSchedule,
    listing_rate: Rate,
    procuring_rate: Rate,
) -> LeaseResult<CommissionSummary> {
    let total_percent = checked::add(listing_rate, procuring_rate, "commission rate")?;
    let periods = schedule
        .periods
        .iter()
        .map(|p| {
            let consideration = p.total_rent_for_period;
            let listing_amount = checked::mul(listing_rate, consideration, "listing commission")?;
            let procuring_amount =
                checked::mul(procuring_rate, consideration, "procuring commission")?;
            Ok(CommissionPeriod {
                period_from: p.period_from,
                period_to: p.period_to,
                consideration_amount: consideration,
                listing_amount,
                procuring_amount,
                total_percent,
                total_amount: checked::add(
                    listing_amount,
                    procuring_amount,
                    "period commission",
                )?,
            })
        })
        .collect::<LeaseResult<Vec<CommissionPeriod>>>()?;

    let total_consideration = checked::sum(
        periods.iter().map(|c| c.consideration_amount),
        "total consideration",
    )?;
    let total_listing = checked::sum(
        periods.iter().map(|c| c.listing_amount),
        "listing commission",
    )?;
    let total_procuring = checked::sum(
        periods.iter().map(|c| c.procuring_amount),
        "procuring commission",
    )?;
    let total_commission = checked::add(total_listing, total_procuring, "total commission")?;

    debug!(periods = periods.len(), %total_commission, "commissions computed");

    Ok(CommissionSummary {
        periods,
        total_consideration,
        total_listing,
        total_procuring,
        total_commission,
    })
}
