//! Month-by-month rent schedule for a triple-net lease.
//!
//! The term is split into blocks of months that share one rate. The opening
//! block is the concession period (free or discounted rent). After it, rent
//! starts at the initial rate and steps up at every escalation boundary
//! (months 1, 1 + freq, 1 + 2·freq, ...). A block that starts between two
//! boundaries runs at the current, not-yet-escalated rate until the next
//! boundary; a block that starts on a boundary escalates first and then runs
//! a full interval. Blocks never run past the end of the term.

use chrono::{Months as CalendarMonths, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::escalation::{block_end, escalate, is_boundary};
use crate::checked;
use crate::error::LeaseError;
use crate::inputs::ValidatedLeaseInputs;
use crate::types::{AreaSize, EscalationOption, IncentiveType, Money, Months, Rate};
use crate::LeaseResult;

// ---------------------------------------------------------------------------
// Output types
// ---------------------------------------------------------------------------

/// One contiguous block of months charged at a single rate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RentPeriod {
    /// First month of the block (1-indexed, inclusive)
    pub period_from: Months,
    /// Last month of the block (inclusive)
    pub period_to: Months,
    pub months_length: Months,
    pub monthly_rate_per_area_unit: Rate,
    /// Rate times rented area
    pub monthly_base_rent: Money,
    pub total_rent_for_period: Money,
    /// Whether this is the opening concession period
    pub is_discount: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
}

/// Chronological rent periods covering months 1..=term.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RentSchedule {
    pub periods: Vec<RentPeriod>,
    pub total_term_length: Months,
    pub rented_size: AreaSize,
    /// Sum of every period's rent
    pub total_net_rent: Money,
    /// Average monthly rent per area unit over the whole term
    pub net_effective_rent: Rate,
    /// Undiscounted, unescalated monthly rate per area unit
    pub starting_rate_per_area_unit: Rate,
    /// Starting rate times rented area
    pub starting_monthly_rent: Money,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Build the rent schedule for a validated lease.
pub fn generate_rent_schedule(inputs: &ValidatedLeaseInputs) -> LeaseResult<RentSchedule> {
    let periods = match inputs.escalation_option {
        EscalationOption::FrontLoadedDiscount => front_loaded_discount(inputs)?,
        other => {
            return Err(LeaseError::UnsupportedEscalationOption(
                other.as_str().to_string(),
            ))
        }
    };

    let term = inputs.term_length_in_months;
    let total_net_rent = checked::sum(
        periods.iter().map(|p| p.total_rent_for_period),
        "total net rent",
    )?;
    let net_effective_rent = checked::div(
        checked::div(total_net_rent, Decimal::from(term), "net effective rent")?,
        inputs.rented_size,
        "net effective rent",
    )?;
    let starting_rate = inputs.monthly_rate_per_area_unit()?;

    debug!(
        periods = periods.len(),
        term,
        %total_net_rent,
        %net_effective_rent,
        "rent schedule generated"
    );

    Ok(RentSchedule {
        periods,
        total_term_length: term,
        rented_size: inputs.rented_size,
        total_net_rent,
        net_effective_rent,
        starting_rate_per_area_unit: starting_rate,
        starting_monthly_rent: checked::mul(starting_rate, inputs.rented_size, "starting rent")?,
    })
}

// ---------------------------------------------------------------------------
// Policies
// ---------------------------------------------------------------------------

fn front_loaded_discount(inputs: &ValidatedLeaseInputs) -> LeaseResult<Vec<RentPeriod>> {
    let term = inputs.term_length_in_months;
    let freq = inputs.escalation_freq_in_months;
    let initial_rate = inputs.monthly_rate_per_area_unit()?;
    let mut periods = Vec::new();

    if inputs.discount_length > 0 {
        let discount_rate = match inputs.incentive_type {
            IncentiveType::FreeRent => Decimal::ZERO,
            IncentiveType::Discount => checked::mul(
                initial_rate,
                Decimal::ONE - inputs.discount_rate,
                "discounted rent",
            )?,
        };
        periods.push(period(inputs, 1, inputs.discount_length, discount_rate, true)?);
    }

    let mut month = inputs.discount_length + 1;
    let mut rate = initial_rate;
    while month <= term {
        // month 1 is the start of the lease, not a step-up
        if month > 1 && is_boundary(month, freq) {
            rate = escalate(rate, inputs.escalation_type, inputs.escalation_amt)?;
        }
        let to = block_end(month, freq, term);
        periods.push(period(inputs, month, to, rate, false)?);
        month = to + 1;
    }

    Ok(periods)
}

fn period(
    inputs: &ValidatedLeaseInputs,
    from: Months,
    to: Months,
    rate: Rate,
    is_discount: bool,
) -> LeaseResult<RentPeriod> {
    let months_length = to - from + 1;
    let monthly_base_rent = checked::mul(rate, inputs.rented_size, "monthly base rent")?;
    let total_rent_for_period = checked::mul(
        Decimal::from(months_length),
        monthly_base_rent,
        "rent for period",
    )?;
    let (start_date, end_date) = match inputs.lease_start_date {
        Some(lease_start) => {
            let (s, e) = calendar_span(lease_start, from, to)?;
            (Some(s), Some(e))
        }
        None => (None, None),
    };

    Ok(RentPeriod {
        period_from: from,
        period_to: to,
        months_length,
        monthly_rate_per_area_unit: rate,
        monthly_base_rent,
        total_rent_for_period,
        is_discount,
        start_date,
        end_date,
    })
}

/// First and last calendar day of lease months `from..=to`.
fn calendar_span(
    lease_start: NaiveDate,
    from: Months,
    to: Months,
) -> LeaseResult<(NaiveDate, NaiveDate)> {
    let overflow =
        || LeaseError::DateError(format!("month {to} after {lease_start} is out of range"));
    let start = lease_start
        .checked_add_months(CalendarMonths::new(from - 1))
        .ok_or_else(overflow)?;
    let end = lease_start
        .checked_add_months(CalendarMonths::new(to))
        .and_then(|d| d.pred_opt())
        .ok_or_else(overflow)?;
    Ok((start, end))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
