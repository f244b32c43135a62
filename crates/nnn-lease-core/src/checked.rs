//! Overflow-checked decimal arithmetic. `Decimal`'s operators panic once a
//! result leaves the 96-bit range, so every engine calculation on
//! user-sized values goes through these instead.

use rust_decimal::Decimal;

use crate::error::LeaseError;
use crate::LeaseResult;

fn overflow(context: &str) -> LeaseError {
    LeaseError::Overflow {
        context: context.to_string(),
    }
}

pub(crate) fn mul(a: Decimal, b: Decimal, context: &str) -> LeaseResult<Decimal> {
    a.checked_mul(b).ok_or_else(|| overflow(context))
}

pub(crate) fn add(a: Decimal, b: Decimal, context: &str) -> LeaseResult<Decimal> {
    a.checked_add(b).ok_or_else(|| overflow(context))
}

pub(crate) fn sub(a: Decimal, b: Decimal, context: &str) -> LeaseResult<Decimal> {
    a.checked_sub(b).ok_or_else(|| overflow(context))
}

/// Division by zero is reported separately from overflow.
pub(crate) fn div(a: Decimal, b: Decimal, context: &str) -> LeaseResult<Decimal> {
    if b.is_zero() {
        return Err(LeaseError::DivisionByZero {
            context: context.to_string(),
        });
    }
    a.checked_div(b).ok_or_else(|| overflow(context))
}

pub(crate) fn sum<I>(values: I, context: &str) -> LeaseResult<Decimal>
where
    I: IntoIterator<Item = Decimal>,
{
    values
        .into_iter()
        .try_fold(Decimal::ZERO, |acc, v| add(acc, v, context))
}
