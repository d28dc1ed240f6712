//! Level-payment amortization.

use rust_decimal::{Decimal, MathematicalOps};
use rust_decimal_macros::dec;

use crate::error::LoanScopeError;
use crate::types::{Money, Percent};
use crate::LoanScopeResult;

const MONTHS_PER_YEAR: Decimal = dec!(12);
const PERCENT: Decimal = dec!(100);

/// Monthly payment for a loan of `principal` at a quoted annual rate over
/// `term_months`.
///
/// Interest-only loans pay `principal × rate / 12`. A zero rate degenerates
/// to straight-line principal (`principal / term_months`), not an error.
/// Negative inputs and a zero term are programmer errors and are rejected;
/// this function is also used to back out qualification math, so silent
/// clamping would corrupt callers.
///
/// Pure and deterministic: safe to memoize on its argument tuple.
pub fn monthly_payment(
    principal: Money,
    annual_rate: Percent,
    term_months: u32,
    interest_only: bool,
) -> LoanScopeResult<Money> {
    if principal < Decimal::ZERO {
        return Err(LoanScopeError::InvalidInput {
            field: "principal".into(),
            reason: "principal cannot be negative".into(),
        });
    }
    if annual_rate < Decimal::ZERO {
        return Err(LoanScopeError::InvalidInput {
            field: "annual_rate".into(),
            reason: "rate cannot be negative".into(),
        });
    }
    if term_months == 0 {
        return Err(LoanScopeError::InvalidInput {
            field: "term_months".into(),
            reason: "term must be at least one month".into(),
        });
    }

    let monthly_rate = annual_rate / PERCENT / MONTHS_PER_YEAR;

    if interest_only {
        return Ok(principal * monthly_rate);
    }

    if monthly_rate.is_zero() {
        return Ok(principal / Decimal::from(term_months));
    }

    let growth = (Decimal::ONE + monthly_rate).powi(term_months as i64);
    let denominator = growth - Decimal::ONE;
    if denominator.is_zero() {
        return Err(LoanScopeError::DivisionByZero {
            context: "amortization growth factor".into(),
        });
    }

    Ok(principal * monthly_rate * growth / denominator)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_rate_is_straight_line_exactly() {
        let payment = monthly_payment(dec!(360000), dec!(0), 360, false).unwrap();
        assert_eq!(payment, dec!(1000));
    }

    #[test]
    fn interest_only_payment() {
        let payment = monthly_payment(dec!(500000), dec!(6), 360, true).unwrap();
        assert_eq!(payment, dec!(2500));
    }

    #[test]
    fn thirty_year_level_payment() {
        // $300k at 6.000% for 30 years: $1,798.65
        let payment = monthly_payment(dec!(300000), dec!(6.000), 360, false).unwrap();
        assert!((payment - dec!(1798.65)).abs() < dec!(0.05), "got {payment}");
    }

    #[test]
    fn payment_is_positive_for_positive_principal() {
        for rate in [dec!(0), dec!(0.125), dec!(5.5), dec!(12)] {
            let payment = monthly_payment(dec!(100000), rate, 180, false).unwrap();
            assert!(payment > Decimal::ZERO);
        }
    }

    #[test]
    fn deterministic_on_identical_inputs() {
        let a = monthly_payment(dec!(638437.50), dec!(5.500), 360, false).unwrap();
        let b = monthly_payment(dec!(638437.50), dec!(5.500), 360, false).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn negative_principal_rejected() {
        let err = monthly_payment(dec!(-1), dec!(5), 360, false).unwrap_err();
        match err {
            LoanScopeError::InvalidInput { field, .. } => assert_eq!(field, "principal"),
            other => panic!("Expected InvalidInput, got {other:?}"),
        }
    }

    #[test]
    fn zero_term_rejected() {
        let err = monthly_payment(dec!(100000), dec!(5), 0, false).unwrap_err();
        match err {
            LoanScopeError::InvalidInput { field, .. } => assert_eq!(field, "term_months"),
            other => panic!("Expected InvalidInput, got {other:?}"),
        }
    }
}
