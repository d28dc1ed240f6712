//! VA funding-fee lookup.

use rust_decimal::Decimal;

use crate::error::LoanScopeError;
use crate::rules::{lookup_band, RuleSet};
use crate::types::{Percent, VaUsage};
use crate::LoanScopeResult;

/// Resolve the VA funding-fee rate (percent of the base loan, before any
/// financed fee is added) for a use history and down-payment percent.
///
/// A down payment exactly on a tier boundary takes the higher tier: the
/// schedule's bands are floor-inclusive.
pub fn resolve_funding_fee(
    usage: VaUsage,
    down_payment_pct: Percent,
    rules: &RuleSet,
) -> LoanScopeResult<Percent> {
    if down_payment_pct < Decimal::ZERO {
        return Err(LoanScopeError::InvalidInput {
            field: "down_payment_pct".into(),
            reason: "down payment cannot be negative".into(),
        });
    }
    lookup_band(
        "va_funding_fee",
        rules.funding_fee.bands_for(usage),
        down_payment_pct,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn first_use_schedule() {
        let rules = RuleSet::default();
        let fee = |dp| resolve_funding_fee(VaUsage::FirstUse, dp, &rules).unwrap();
        assert_eq!(fee(dec!(0)), dec!(2.15));
        assert_eq!(fee(dec!(3)), dec!(2.15));
        assert_eq!(fee(dec!(5)), dec!(1.50));
        assert_eq!(fee(dec!(9.999)), dec!(1.50));
        assert_eq!(fee(dec!(10)), dec!(1.25));
        assert_eq!(fee(dec!(25)), dec!(1.25));
    }

    #[test]
    fn subsequent_use_differs_only_below_five_percent() {
        let rules = RuleSet::default();
        let fee = |dp| resolve_funding_fee(VaUsage::Subsequent, dp, &rules).unwrap();
        assert_eq!(fee(dec!(0)), dec!(3.30));
        assert_eq!(fee(dec!(5)), dec!(1.50));
        assert_eq!(fee(dec!(10)), dec!(1.25));
    }

    #[test]
    fn negative_down_payment_rejected() {
        let rules = RuleSet::default();
        let err = resolve_funding_fee(VaUsage::FirstUse, dec!(-0.5), &rules).unwrap_err();
        match err {
            LoanScopeError::InvalidInput { field, .. } => {
                assert_eq!(field, "down_payment_pct")
            }
            other => panic!("Expected InvalidInput, got {other:?}"),
        }
    }
}
