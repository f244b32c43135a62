use clap::Args;
use serde_json::{json, Value};
use std::time::Instant;

use nnn_lease_core::analysis::{self, validate_lease};
use nnn_lease_core::commissions::compute_commissions;
use nnn_lease_core::rent::generate_rent_schedule;
use nnn_lease_core::{with_metadata, FieldErrors, LeaseError, RawLeaseInputs};

use crate::input;

/// Arguments shared by every command that takes a lease record
#[derive(Args)]
pub struct LeaseArgs {
    /// Path to JSON or YAML lease record
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_validate(args: LeaseArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let raw: RawLeaseInputs = input::read_record(args.input.as_deref(), "validate")?;
    let inputs = validate_lease(&raw).map_err(describe)?;
    Ok(json!({
        "valid": true,
        "result": serde_json::to_value(&inputs)?,
    }))
}

pub fn run_schedule(args: LeaseArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let raw: RawLeaseInputs = input::read_record(args.input.as_deref(), "rent schedule")?;
    let start = Instant::now();
    let inputs = validate_lease(&raw).map_err(describe)?;
    let schedule = generate_rent_schedule(&inputs).map_err(describe)?;
    let output = with_metadata(
        "Front-loaded concession followed by periodic escalation",
        &raw,
        Vec::new(),
        start.elapsed().as_micros() as u64,
        schedule,
    );
    Ok(serde_json::to_value(output)?)
}

pub fn run_commissions(args: LeaseArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let raw: RawLeaseInputs = input::read_record(args.input.as_deref(), "commissions")?;
    let start = Instant::now();
    let inputs = validate_lease(&raw).map_err(describe)?;
    let schedule = generate_rent_schedule(&inputs).map_err(describe)?;
    let commissions = compute_commissions(
        &schedule,
        inputs.listing_commission_rate,
        inputs.procuring_commission_rate,
    )
    .map_err(describe)?;
    let output = with_metadata(
        "Listing and procuring commissions on rent collected per period",
        &raw,
        Vec::new(),
        start.elapsed().as_micros() as u64,
        commissions,
    );
    Ok(serde_json::to_value(output)?)
}

pub fn run_analyze(args: LeaseArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let raw: RawLeaseInputs = input::read_record(args.input.as_deref(), "lease analysis")?;
    let output = analysis::analyze_lease(&raw).map_err(describe)?;
    Ok(serde_json::to_value(output)?)
}

/// Render an engine error, listing every invalid field on its own line.
fn describe(e: LeaseError) -> Box<dyn std::error::Error> {
    match e {
        LeaseError::Validation(errors) => describe_fields(&errors).into(),
        other => other.into(),
    }
}

fn describe_fields(errors: &FieldErrors) -> String {
    let mut out = format!("{} field(s) failed validation", errors.len());
    for (field, violations) in errors.iter() {
        for v in violations {
            out.push_str(&format!("\n  {} ({}): {}", field.label(), field, v));
        }
    }
    out
}
