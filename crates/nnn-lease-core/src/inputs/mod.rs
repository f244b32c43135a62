pub mod fields;
pub mod validation;

pub use fields::{Bound, FieldErrors, FieldId, FieldKind, FieldSpec, Violation};
pub use validation::{validate, validate_field, RawLeaseInputs, ValidatedLeaseInputs};
