use crate::checked;
use crate::types::{EscalationType, Months, Rate};
use crate::LeaseResult;

/// Apply one escalation step to a rate.
pub fn escalate(rate: Rate, escalation_type: EscalationType, amount: Rate) -> LeaseResult<Rate> {
    match escalation_type {
        EscalationType::Fixed => checked::add(rate, amount, "fixed escalation"),
        EscalationType::Percentage => checked::mul(rate, amount, "percentage escalation"),
    }
}

/// Whether `month` (1-indexed) opens an escalation interval of `freq` months.
pub fn is_boundary(month: Months, freq: Months) -> bool {
    freq > 0 && (month - 1) % freq == 0
}

/// Last month of the block that starts at `month`: the month before the next
/// boundary, clamped to the end of the term.
pub fn block_end(month: Months, freq: Months, term: Months) -> Months {
    let freq = freq.max(1);
    let remaining_in_interval = freq - (month - 1) % freq;
    (month + remaining_in_interval - 1).min(term)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_fixed_escalation_adds() {
        assert_eq!(
            escalate(dec!(1.00), EscalationType::Fixed, dec!(0.25)).unwrap(),
            dec!(1.25)
        );
    }

    #[test]
    fn test_percentage_escalation_multiplies() {
        assert_eq!(
            escalate(dec!(1.03), EscalationType::Percentage, dec!(1.03)).unwrap(),
            dec!(1.0609)
        );
    }

    #[test]
    fn test_boundaries_every_twelve_months() {
        assert!(is_boundary(1, 12));
        assert!(!is_boundary(2, 12));
        assert!(!is_boundary(12, 12));
        assert!(is_boundary(13, 12));
        assert!(is_boundary(25, 12));
    }

    #[test]
    fn test_block_end_stops_before_next_boundary() {
        // partial year after a one-month discount
        assert_eq!(block_end(2, 12, 60), 12);
        // a block that starts on the last month of an interval is one month long
        assert_eq!(block_end(12, 12, 60), 12);
        assert_eq!(block_end(13, 12, 60), 24);
    }

    #[test]
    fn test_block_end_clamped_to_term() {
        assert_eq!(block_end(25, 12, 30), 30);
        assert_eq!(block_end(7, 6, 9), 9);
    }

    #[test]
    fn test_runaway_factor_overflows_instead_of_panicking() {
        let mut rate = dec!(1);
        let mut steps = 0;
        let err = loop {
            match escalate(rate, EscalationType::Percentage, dec!(10)) {
                Ok(next) => rate = next,
                Err(e) => break e,
            }
            steps += 1;
        };
        assert!(matches!(err, crate::error::LeaseError::Overflow { .. }));
        assert_eq!(steps, 28);
    }
}
