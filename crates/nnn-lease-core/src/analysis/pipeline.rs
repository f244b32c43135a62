//! End-to-end lease analysis: validate, schedule, allocate, commission,
//! aggregate.

use std::time::Instant;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;
use tracing::{debug, warn};

use super::aggregate::{aggregate, LeaseAnalysis};
use crate::commissions::{compute_commissions, CommissionSummary};
use crate::expenses::{allocate_expenses, ExpenseAllocationInput, ExpenseSummary};
use crate::inputs::{validate, RawLeaseInputs, ValidatedLeaseInputs};
use crate::rent::{generate_rent_schedule, RentSchedule};
use crate::types::{with_metadata, ComputationOutput, EscalationType};
use crate::LeaseResult;

/// Percentage escalation factors above this almost always mean the user
/// typed a percent (3) where a factor (1.03) was expected.
const SUSPICIOUS_ESCALATION_FACTOR: Decimal = dec!(2);

/// Everything the engine produces for one scenario.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LeaseReport {
    pub inputs: ValidatedLeaseInputs,
    pub rent_schedule: RentSchedule,
    pub expenses: ExpenseSummary,
    pub commissions: CommissionSummary,
    pub analysis: LeaseAnalysis,
}

/// Validate a raw record, surfacing every field error at once.
pub fn validate_lease(raw: &RawLeaseInputs) -> LeaseResult<ValidatedLeaseInputs> {
    Ok(validate(raw)?)
}

/// Run every stage on an already validated record. Deterministic: the same
/// inputs always produce an identical report. Amounts too large for a
/// `Decimal` come back as [`LeaseError::Overflow`](crate::LeaseError).
pub fn run_analysis(inputs: &ValidatedLeaseInputs) -> LeaseResult<LeaseReport> {
    let rent_schedule = generate_rent_schedule(inputs)?;
    let expenses = allocate_expenses(&ExpenseAllocationInput::from_lease(
        inputs,
        rent_schedule.starting_monthly_rent,
    ))?;
    let commissions = compute_commissions(
        &rent_schedule,
        inputs.listing_commission_rate,
        inputs.procuring_commission_rate,
    )?;
    let analysis = aggregate(inputs, &rent_schedule, &expenses, &commissions)?;

    Ok(LeaseReport {
        inputs: inputs.clone(),
        rent_schedule,
        expenses,
        commissions,
        analysis,
    })
}

/// Validate and analyse a raw parameter record.
pub fn analyze_lease(raw: &RawLeaseInputs) -> LeaseResult<ComputationOutput<LeaseReport>> {
    let start = Instant::now();

    let inputs = validate_lease(raw)?;
    let report = run_analysis(&inputs)?;
    let warnings = collect_warnings(&report);
    for w in &warnings {
        warn!("{w}");
    }
    debug!(
        noi = %report.analysis.full_term_noi,
        ner = %report.analysis.net_effective_rent,
        "lease analysed"
    );

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "NNN lease economics: front-loaded concession, periodic escalation, pro-rata recoveries",
        raw,
        warnings,
        elapsed,
        report,
    ))
}

// ---------------------------------------------------------------------------
// Reasonableness warnings
// ---------------------------------------------------------------------------

fn collect_warnings(report: &LeaseReport) -> Vec<String> {
    let inputs = &report.inputs;
    let mut warnings = Vec::new();

    if inputs.escalation_type == EscalationType::Percentage {
        if inputs.escalation_amt < Decimal::ONE {
            warnings.push(format!(
                "Escalation factor {} is below 1: rent decreases at every escalation",
                inputs.escalation_amt
            ));
        } else if inputs.escalation_amt > SUSPICIOUS_ESCALATION_FACTOR {
            warnings.push(format!(
                "Escalation factor {} more than doubles rent at every escalation; \
                 a 3% increase is entered as 1.03",
                inputs.escalation_amt
            ));
        }
    }
    if inputs.discount_length == inputs.term_length_in_months {
        warnings.push("Concession period covers the entire term".to_string());
    }
    if report.analysis.full_term_noi < Decimal::ZERO {
        warnings.push(format!(
            "Turnover costs {} exceed total net rent {}",
            report.analysis.turnover_costs, report.analysis.total_net_rent
        ));
    }

    warnings
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LeaseError;
    use crate::inputs::fixtures::{office_lease, office_raw};
    use crate::inputs::{FieldId, Violation};

    #[test]
    fn test_report_is_deterministic() {
        let inputs = office_lease();
        let first = run_analysis(&inputs).unwrap();
        let second = run_analysis(&inputs).unwrap();
        assert_eq!(first, second);
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }

    #[test]
    fn test_analyze_wraps_report_in_envelope() {
        let out = analyze_lease(&office_raw()).unwrap();
        assert!(out.warnings.is_empty());
        assert_eq!(out.result.rent_schedule.periods.len(), 6);
        assert_eq!(out.assumptions["total_size"], "100000");
        assert_eq!(out.metadata.precision, "rust_decimal_128bit");
    }

    #[test]
    fn test_validation_failure_short_circuits() {
        let raw = office_raw().with(FieldId::RentedSize, "150000");
        match analyze_lease(&raw).unwrap_err() {
            LeaseError::Validation(errors) => {
                assert_eq!(
                    errors.get(FieldId::RentedSize),
                    &[Violation::AboveMax {
                        max: dec!(100000)
                    }]
                );
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_percent_typed_as_factor_warns() {
        let raw = office_raw().with(FieldId::EscalationAmt, "3");
        let out = analyze_lease(&raw).unwrap();
        assert_eq!(out.warnings.len(), 1);
        assert!(out.warnings[0].contains("1.03"));
    }

    #[test]
    fn test_whole_term_concession_warns() {
        let raw = office_raw().with(FieldId::DiscountLength, "60");
        let out = analyze_lease(&raw).unwrap();
        // no rent at all, so turnover costs also exceed rent
        assert_eq!(out.warnings.len(), 2);
        assert!(out.result.analysis.full_term_noi < Decimal::ZERO);
    }
}
