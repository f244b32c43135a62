use napi::Result as NapiResult;
use napi_derive::napi;
use serde_json::json;

use nnn_lease_core::analysis;
use nnn_lease_core::commissions::compute_commissions;
use nnn_lease_core::expenses::{allocate_expenses, ExpenseAllocationInput};
use nnn_lease_core::inputs::{validate, validate_field};
use nnn_lease_core::rent;
use nnn_lease_core::{FieldId, RawLeaseInputs};

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

fn parse_record(input_json: &str) -> NapiResult<RawLeaseInputs> {
    serde_json::from_str(input_json).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Validate a whole lease record. Field errors are returned as data
/// (`{"valid": false, "errors": {...}}`), not thrown.
#[napi]
pub fn validate_lease_inputs(input_json: String) -> NapiResult<String> {
    let raw = parse_record(&input_json)?;
    let body = match validate(&raw) {
        Ok(inputs) => json!({ "valid": true, "inputs": inputs }),
        Err(errors) => json!({ "valid": false, "errors": errors }),
    };
    serde_json::to_string(&body).map_err(to_napi_error)
}

/// Violations for one field, for live feedback while a form is filled in.
#[napi]
pub fn validate_lease_field(input_json: String, field: String) -> NapiResult<String> {
    let raw = parse_record(&input_json)?;
    let field = FieldId::parse(&field)
        .ok_or_else(|| to_napi_error(format!("Unknown lease field '{field}'")))?;
    serde_json::to_string(&validate_field(&raw, field)).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Calculations
// ---------------------------------------------------------------------------

#[napi]
pub fn generate_rent_schedule(input_json: String) -> NapiResult<String> {
    let raw = parse_record(&input_json)?;
    let inputs = analysis::validate_lease(&raw).map_err(to_napi_error)?;
    let output = rent::generate_rent_schedule(&inputs).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn allocate_lease_expenses(input_json: String) -> NapiResult<String> {
    let input: ExpenseAllocationInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = allocate_expenses(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn compute_lease_commissions(input_json: String) -> NapiResult<String> {
    let raw = parse_record(&input_json)?;
    let inputs = analysis::validate_lease(&raw).map_err(to_napi_error)?;
    let schedule = rent::generate_rent_schedule(&inputs).map_err(to_napi_error)?;
    let output = compute_commissions(
        &schedule,
        inputs.listing_commission_rate,
        inputs.procuring_commission_rate,
    )
    .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn analyze_lease(input_json: String) -> NapiResult<String> {
    let raw = parse_record(&input_json)?;
    let output = analysis::analyze_lease(&raw).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}
