use nnn_lease_core::analysis::{analyze_lease, run_analysis, validate_lease};
use nnn_lease_core::commissions::compute_commissions;
use nnn_lease_core::expenses::allocation::MANAGEMENT_FEE_LINE;
use nnn_lease_core::expenses::{allocate_expenses, ExpenseAllocationInput, ExpenseItem};
use nnn_lease_core::inputs::validate;
use nnn_lease_core::rent::generate_rent_schedule;
use nnn_lease_core::{
    EscalationType, FieldId, IncentiveType, LeaseError, RawLeaseInputs, RentEntryFrequency,
    RentUnit, TiaType,
};
use pretty_assertions::assert_eq;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

// ===========================================================================
// Helpers
// ===========================================================================

/// Five-year lease of 10,000 sq ft in a 100,000 sq ft building: $1.00 per
/// sq ft per month, first month free, 3% annual bumps.
fn office_raw() -> RawLeaseInputs {
    RawLeaseInputs::default()
        .with(FieldId::TotalSize, "100000")
        .with(FieldId::RentedSize, "10000")
        .with(FieldId::InitialRent, "1.00")
        .with(FieldId::EscalationFreqInMonths, "12")
        .with(FieldId::EscalationAmt, "1.03")
        .with(FieldId::TermLengthInMonths, "60")
        .with(FieldId::DiscountLength, "1")
        .with(FieldId::DiscountPercent, "100")
        .with(FieldId::ManagementFee, "3")
        .with(FieldId::CamExpense, "30000")
        .with(FieldId::InsuranceExpense, "30000")
        .with(FieldId::TaxExpense, "60000")
        .with(FieldId::ListingCommission, "2.5")
        .with(FieldId::ProcuringCommission, "2.5")
        .with(FieldId::Tia, "5")
}

// ===========================================================================
// Rent schedule
// ===========================================================================

#[test]
fn test_office_lease_schedule() {
    let inputs = validate(&office_raw()).unwrap();
    let s = generate_rent_schedule(&inputs).unwrap();

    let spans: Vec<_> = s.periods.iter().map(|p| (p.period_from, p.period_to)).collect();
    assert_eq!(
        spans,
        vec![(1, 1), (2, 12), (13, 24), (25, 36), (37, 48), (49, 60)]
    );
    assert_eq!(s.periods[0].monthly_rate_per_area_unit, Decimal::ZERO);
    assert_eq!(s.periods[1].monthly_rate_per_area_unit, dec!(1.00));
    assert_eq!(s.periods[2].monthly_rate_per_area_unit, dec!(1.03));
    assert_eq!(s.periods[3].monthly_rate_per_area_unit, dec!(1.0609));

    // 11 x 10,000 + 12 x 10,300 + 12 x 10,609 + 12 x 10,927.27 + 12 x 11,255.0881
    assert_eq!(s.total_net_rent, dec!(627096.2972));
}

#[test]
fn test_periods_partition_the_term() {
    let cases = [("60", "12", "1"), ("37", "12", "0"), ("25", "6", "7"), ("1", "1", "1")];
    for (term, freq, discount) in cases {
        let raw = office_raw()
            .with(FieldId::TermLengthInMonths, term)
            .with(FieldId::EscalationFreqInMonths, freq)
            .with(FieldId::DiscountLength, discount);
        let s = generate_rent_schedule(&validate(&raw).unwrap()).unwrap();

        let mut expected_from = 1;
        for p in &s.periods {
            assert_eq!(p.period_from, expected_from, "term {term} freq {freq}");
            assert!(p.period_to >= p.period_from);
            assert_eq!(p.months_length, p.period_to - p.period_from + 1);
            expected_from = p.period_to + 1;
        }
        assert_eq!(expected_from - 1, s.total_term_length);
        let months: u32 = s.periods.iter().map(|p| p.months_length).sum();
        assert_eq!(months, s.total_term_length);
    }
}

#[test]
fn test_rates_never_fall_after_concession() {
    for escalation_type in [EscalationType::Percentage, EscalationType::Fixed] {
        let mut raw = office_raw().with(FieldId::TermLengthInMonths, "120");
        if escalation_type == EscalationType::Fixed {
            raw.set(FieldId::EscalationAmt, "0.05");
        }
        raw.escalation_type = escalation_type;
        let s = generate_rent_schedule(&validate(&raw).unwrap()).unwrap();

        let rates: Vec<_> = s
            .periods
            .iter()
            .filter(|p| !p.is_discount)
            .map(|p| p.monthly_rate_per_area_unit)
            .collect();
        assert!(rates.windows(2).all(|w| w[1] >= w[0]), "{rates:?}");
    }
}

#[test]
fn test_yearly_per_month_rent_is_normalised() {
    let mut raw = office_raw().with(FieldId::InitialRent, "120000");
    raw.rent_unit = RentUnit::PerMonth;
    raw.rent_entry_frequency = RentEntryFrequency::Yearly;
    let s = generate_rent_schedule(&validate(&raw).unwrap()).unwrap();
    // 120,000 / 10,000 sq ft / 12 months
    assert_eq!(s.starting_rate_per_area_unit, dec!(1));
    assert_eq!(s.starting_monthly_rent, dec!(10000));
}

#[test]
fn test_partial_discount_incentive() {
    let mut raw = office_raw()
        .with(FieldId::DiscountLength, "3")
        .with(FieldId::DiscountPercent, "50");
    raw.incentive_type = IncentiveType::Discount;
    let s = generate_rent_schedule(&validate(&raw).unwrap()).unwrap();
    assert_eq!(s.periods[0].monthly_rate_per_area_unit, dec!(0.50));
    assert_eq!(s.periods[0].total_rent_for_period, dec!(15000));
}

// ===========================================================================
// Expense allocation
// ===========================================================================

#[test]
fn test_expense_allocation_office() {
    let input = ExpenseAllocationInput {
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
    };
    let s = allocate_expenses(&input).unwrap();

    assert_eq!(s.lines[0].pro_rata_monthly_total, dec!(250));
    let named: Decimal = s.lines[..3].iter().map(|l| l.pro_rata_monthly_total).sum();
    assert_eq!(named, dec!(1000));
    assert_eq!(s.management_fee().unwrap().pro_rata_monthly_total, dec!(330));
}

#[test]
fn test_pro_rata_never_exceeds_building_total() {
    let raw = office_raw().with(FieldId::RentedSize, "100000");
    let report = run_analysis(&validate(&raw).unwrap()).unwrap();
    for line in report.expenses.lines.iter().filter(|l| l.name != MANAGEMENT_FEE_LINE) {
        assert!(line.pro_rata_annual_total <= line.building_annual_total);
    }
    assert_eq!(report.analysis.proportionate_share, Decimal::ONE);
}

// ===========================================================================
// Commissions
// ===========================================================================

#[test]
fn test_commission_rates_applied_independently() {
    let raw = office_raw()
        .with(FieldId::ListingCommission, "4")
        .with(FieldId::ProcuringCommission, "0");
    let schedule = generate_rent_schedule(&validate(&raw).unwrap()).unwrap();
    let c = compute_commissions(&schedule, dec!(0.04), Decimal::ZERO).unwrap();
    assert_eq!(c.total_procuring, Decimal::ZERO);
    assert_eq!(c.total_listing, schedule.total_net_rent * dec!(0.04));
    assert_eq!(c.total_commission, c.total_listing);
}

// ===========================================================================
// Full analysis
// ===========================================================================

#[test]
fn test_office_lease_analysis() {
    let out = analyze_lease(&office_raw()).unwrap();
    let a = &out.result.analysis;

    assert_eq!(a.term_length_in_months, 60);
    assert_eq!(a.tia, dec!(50000));
    assert_eq!(a.total_commission, dec!(31354.81486));
    assert_eq!(a.turnover_costs, a.tia + a.total_commission);
    assert_eq!(a.full_term_noi, a.total_net_rent - a.turnover_costs);
    assert_eq!(a.starting_gross_rent, dec!(11330));
    assert!(out.warnings.is_empty());
}

#[test]
fn test_fixed_tia_is_not_scaled_by_area() {
    let mut raw = office_raw().with(FieldId::Tia, "75000");
    raw.tia_type = TiaType::FixedAmount;
    let report = run_analysis(&validate_lease(&raw).unwrap()).unwrap();
    assert_eq!(report.analysis.tia, dec!(75000));
}

#[test]
fn test_oversized_rental_is_rejected_before_scheduling() {
    let raw = office_raw()
        .with(FieldId::TotalSize, "100000")
        .with(FieldId::RentedSize, "150000");
    let err = analyze_lease(&raw).unwrap_err();
    match err {
        LeaseError::Validation(errors) => {
            assert_eq!(errors.len(), 1);
            assert!(errors.contains(FieldId::RentedSize));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_analysis_from_json_record() {
    let json = r#"{
        "total_size": 100000,
        "rented_size": "10000",
        "initial_rent": 1.0,
        "escalation_freq_in_months": 12,
        "escalation_amt": "1.03",
        "escalation_type": "percentage",
        "term_length_in_months": 60,
        "discount_length": 1,
        "discount_percent": 100,
        "management_fee": 3,
        "cam_expense": 30000,
        "insurance_expense": 30000,
        "tax_expense": 60000,
        "listing_commission": 2.5,
        "procuring_commission": 2.5,
        "tia": 5,
        "lease_start_date": "2025-01-01"
    }"#;
    let raw: RawLeaseInputs = serde_json::from_str(json).unwrap();
    let out = analyze_lease(&raw).unwrap();

    assert_eq!(out.result.rent_schedule.total_net_rent, dec!(627096.2972));
    let last = out.result.rent_schedule.periods.last().unwrap();
    assert_eq!(
        last.end_date,
        chrono::NaiveDate::from_ymd_opt(2029, 12, 31)
    );
}

#[test]
fn test_repeated_runs_serialize_identically() {
    let inputs = validate_lease(&office_raw()).unwrap();
    let a = serde_json::to_value(run_analysis(&inputs).unwrap()).unwrap();
    let b = serde_json::to_value(run_analysis(&inputs).unwrap()).unwrap();
    assert_eq!(a, b);
}

// ===========================================================================
// Extreme magnitudes
// ===========================================================================

fn expect_overflow(raw: &RawLeaseInputs) {
    assert!(validate(raw).is_ok(), "record should pass validation");
    match analyze_lease(raw).unwrap_err() {
        LeaseError::Overflow { .. } => {}
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_monthly_tenfold_escalation_overflows_cleanly() {
    let raw = office_raw()
        .with(FieldId::EscalationAmt, "10")
        .with(FieldId::EscalationFreqInMonths, "1")
        .with(FieldId::TermLengthInMonths, "60");
    expect_overflow(&raw);
}

#[test]
fn test_building_near_decimal_max_overflows_cleanly() {
    let raw = office_raw()
        .with(FieldId::TotalSize, "1e27")
        .with(FieldId::RentedSize, "1e27")
        .with(FieldId::InitialRent, "1000");
    expect_overflow(&raw);
}

#[test]
fn test_tiny_premises_with_monthly_rent_overflows_cleanly() {
    let mut raw = office_raw()
        .with(FieldId::RentedSize, "0.0000000000000000000000001")
        .with(FieldId::InitialRent, "1000000000");
    raw.rent_unit = RentUnit::PerMonth;
    expect_overflow(&raw);
}

#[test]
fn test_large_but_representable_lease_succeeds() {
    // 30 years of monthly 1% bumps on a very large building
    let raw = office_raw()
        .with(FieldId::TotalSize, "1000000000")
        .with(FieldId::RentedSize, "1000000000")
        .with(FieldId::InitialRent, "1000")
        .with(FieldId::EscalationAmt, "1.01")
        .with(FieldId::EscalationFreqInMonths, "1")
        .with(FieldId::TermLengthInMonths, "360");
    let out = analyze_lease(&raw).unwrap();
    let periods = &out.result.rent_schedule.periods;
    assert_eq!(periods.last().map(|p| p.period_to), Some(360));
    assert!(out.result.analysis.full_term_noi > Decimal::ZERO);
}
