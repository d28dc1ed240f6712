//! Mortgage-insurance rate resolution.
//!
//! VA loans never carry MI (the funding fee stands in for it). FHA is a flat
//! rate pair split at an LTV threshold. Conventional is a two-dimensional
//! grid over LTV and credit bands; a combination outside the grid resolves
//! to a zero rate with `fallback_applied` set, and the composer surfaces
//! that as a warning so the host can route it to manual quoting.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::LoanScopeError;
use crate::rules::{RuleSet, MAX_CREDIT_SCORE, MIN_CREDIT_SCORE};
use crate::types::{LoanProgram, Percent};
use crate::LoanScopeResult;

/// Conventional LTV at or below which no MI is required.
const NO_MI_LTV_CEILING: Decimal = dec!(80);

/// A resolved annual MI rate. The caller divides by 12 and applies it to the
/// base loan amount, never the financed total.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MiQuote {
    pub annual_rate: Percent,
    /// True when no grid cell matched and the rate degraded to zero.
    pub fallback_applied: bool,
}

impl MiQuote {
    fn rate(annual_rate: Percent) -> Self {
        MiQuote {
            annual_rate,
            fallback_applied: false,
        }
    }

    fn fallback() -> Self {
        MiQuote {
            annual_rate: Decimal::ZERO,
            fallback_applied: true,
        }
    }
}

/// Resolve the annual MI rate for a program, LTV, and credit score.
///
/// Out-of-range credit scores and negative LTVs are caller contract
/// violations and are rejected before any lookup.
pub fn resolve_mi(
    program: LoanProgram,
    ltv: Percent,
    credit_score: u16,
    rules: &RuleSet,
) -> LoanScopeResult<MiQuote> {
    if ltv < Decimal::ZERO {
        return Err(LoanScopeError::InvalidInput {
            field: "ltv".into(),
            reason: "LTV cannot be negative".into(),
        });
    }
    if !(MIN_CREDIT_SCORE..=MAX_CREDIT_SCORE).contains(&credit_score) {
        return Err(LoanScopeError::InvalidInput {
            field: "credit_score".into(),
            reason: format!("score must be {MIN_CREDIT_SCORE}-{MAX_CREDIT_SCORE}"),
        });
    }

    match program {
        LoanProgram::Va => Ok(MiQuote::rate(Decimal::ZERO)),
        LoanProgram::Fha => {
            let policy = &rules.fha_mi;
            if ltv <= policy.ltv_threshold {
                Ok(MiQuote::rate(policy.at_or_below))
            } else {
                Ok(MiQuote::rate(policy.above))
            }
        }
        LoanProgram::Conventional => {
            if ltv <= NO_MI_LTV_CEILING {
                return Ok(MiQuote::rate(Decimal::ZERO));
            }
            let table = &rules.conventional_mi;
            let Some(row) = table.row_for(ltv) else {
                return Ok(MiQuote::fallback());
            };
            let Some(column) = table.column_for(credit_score) else {
                return Ok(MiQuote::fallback());
            };
            match row.rates.get(column) {
                Some(rate) => Ok(MiQuote::rate(*rate)),
                None => Ok(MiQuote::fallback()),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn va_never_carries_mi() {
        let rules = RuleSet::default();
        let quote = resolve_mi(LoanProgram::Va, dec!(100), 580, &rules).unwrap();
        assert_eq!(quote.annual_rate, Decimal::ZERO);
        assert!(!quote.fallback_applied);
    }

    #[test]
    fn fha_splits_at_ltv_threshold() {
        let rules = RuleSet::default();
        let at = resolve_mi(LoanProgram::Fha, dec!(95), 700, &rules).unwrap();
        let above = resolve_mi(LoanProgram::Fha, dec!(95.001), 700, &rules).unwrap();
        assert_eq!(at.annual_rate, dec!(0.50));
        assert_eq!(above.annual_rate, dec!(0.55));
    }

    #[test]
    fn conventional_at_or_below_eighty_is_zero_for_any_credit() {
        let rules = RuleSet::default();
        for score in [620, 680, 720, 780, 850] {
            let quote = resolve_mi(LoanProgram::Conventional, dec!(80), score, &rules).unwrap();
            assert_eq!(quote.annual_rate, Decimal::ZERO);
            assert!(!quote.fallback_applied);
        }
    }

    #[test]
    fn conventional_grid_corners() {
        let rules = RuleSet::default();
        // Best cell: lowest MI band, top credit.
        let best = resolve_mi(LoanProgram::Conventional, dec!(81), 800, &rules).unwrap();
        assert_eq!(best.annual_rate, dec!(0.15));
        // Worst cell: highest LTV band, sub-660 credit.
        let worst = resolve_mi(LoanProgram::Conventional, dec!(97), 640, &rules).unwrap();
        assert_eq!(worst.annual_rate, dec!(1.52));
    }

    #[test]
    fn conventional_band_boundaries_are_high_inclusive() {
        let rules = RuleSet::default();
        // Exactly 90 LTV sits in the 85-90 row, not 90-95.
        let quote = resolve_mi(LoanProgram::Conventional, dec!(90), 750, &rules).unwrap();
        assert_eq!(quote.annual_rate, dec!(0.38));
        let next = resolve_mi(LoanProgram::Conventional, dec!(90.001), 750, &rules).unwrap();
        assert_eq!(next.annual_rate, dec!(0.53));
    }

    #[test]
    fn unmapped_ltv_degrades_to_zero_with_flag() {
        let rules = RuleSet::default();
        let quote = resolve_mi(LoanProgram::Conventional, dec!(98), 740, &rules).unwrap();
        assert_eq!(quote.annual_rate, Decimal::ZERO);
        assert!(quote.fallback_applied);
    }

    #[test]
    fn out_of_range_credit_rejected_before_lookup() {
        let rules = RuleSet::default();
        for score in [0, 299, 851] {
            let err = resolve_mi(LoanProgram::Conventional, dec!(90), score, &rules).unwrap_err();
            match err {
                LoanScopeError::InvalidInput { field, .. } => assert_eq!(field, "credit_score"),
                other => panic!("Expected InvalidInput, got {other:?}"),
            }
        }
    }

    #[test]
    fn negative_ltv_rejected() {
        let rules = RuleSet::default();
        assert!(resolve_mi(LoanProgram::Fha, dec!(-1), 700, &rules).is_err());
    }
}
