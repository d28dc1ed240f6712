//! Program rule tables and policy constants.
//!
//! Every number a lender or admin can tune lives in [`RuleSet`], which is
//! passed explicitly into each computation. Nothing in the engine reads
//! module-level state, so a client-specific rate sheet is just a different
//! `RuleSet` value. `RuleSet::default()` carries the reference tables.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::LoanScopeError;
use crate::fees::closing_costs::{ClosingCostSchedule, LineItem};
use crate::types::{LoanProgram, Percent, Ratio, VaUsage};
use crate::LoanScopeResult;

/// Lowest credit score the engine accepts before any table lookup.
pub const MIN_CREDIT_SCORE: u16 = 300;

/// Highest credit score the engine accepts before any table lookup.
pub const MAX_CREDIT_SCORE: u16 = 850;

// ---------------------------------------------------------------------------
// Banded tables
// ---------------------------------------------------------------------------

/// One row of a banded rate table. Bands are floor-inclusive; a `None`
/// ceiling means the band is open-ended upward.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeeBand {
    pub floor: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ceiling: Option<Decimal>,
    pub rate: Percent,
}

impl FeeBand {
    fn contains(&self, value: Decimal) -> bool {
        value >= self.floor && self.ceiling.is_none_or(|c| value < c)
    }
}

/// Resolve a banded table to exactly one rate.
pub(crate) fn lookup_band(
    table: &str,
    bands: &[FeeBand],
    value: Decimal,
) -> LoanScopeResult<Percent> {
    bands
        .iter()
        .find(|b| b.contains(value))
        .map(|b| b.rate)
        .ok_or_else(|| LoanScopeError::UnresolvedLookup {
            table: table.to_string(),
            context: format!("no band covers {value}"),
        })
}

fn validate_bands(table: &str, bands: &[FeeBand]) -> LoanScopeResult<()> {
    if bands.is_empty() {
        return Err(LoanScopeError::InvalidInput {
            field: table.to_string(),
            reason: "band table is empty".into(),
        });
    }
    for pair in bands.windows(2) {
        match pair[0].ceiling {
            Some(c) if c == pair[1].floor => {}
            Some(_) => {
                return Err(LoanScopeError::InvalidInput {
                    field: table.to_string(),
                    reason: "bands must be contiguous and non-overlapping".into(),
                });
            }
            None => {
                return Err(LoanScopeError::InvalidInput {
                    field: table.to_string(),
                    reason: "only the last band may be open-ended".into(),
                });
            }
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// VA funding fee
// ---------------------------------------------------------------------------

/// VA funding-fee schedule: one banded table per entitlement use history,
/// keyed by down-payment percent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FundingFeeSchedule {
    pub first_use: Vec<FeeBand>,
    pub subsequent: Vec<FeeBand>,
}

impl FundingFeeSchedule {
    pub fn bands_for(&self, usage: VaUsage) -> &[FeeBand] {
        match usage {
            VaUsage::FirstUse => &self.first_use,
            VaUsage::Subsequent => &self.subsequent,
        }
    }
}

// ---------------------------------------------------------------------------
// Mortgage insurance
// ---------------------------------------------------------------------------

/// One LTV row of the conventional MI grid with a rate per credit band,
/// best credit first.
///
/// LTV bands are the one low-exclusive table in the engine: exactly 80.000
/// LTV carries no MI, so each row covers `(ltv_floor, ltv_ceiling]`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MiLtvRow {
    pub ltv_floor: Percent,
    pub ltv_ceiling: Percent,
    pub rates: Vec<Percent>,
}

/// Two-dimensional conventional MI rate grid: LTV band x credit band.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MiRateTable {
    /// Credit-score floors, best first. A score maps to the first floor it
    /// meets or exceeds.
    pub credit_floors: Vec<u16>,
    pub rows: Vec<MiLtvRow>,
}

impl MiRateTable {
    pub(crate) fn column_for(&self, credit_score: u16) -> Option<usize> {
        self.credit_floors.iter().position(|f| credit_score >= *f)
    }

    pub(crate) fn row_for(&self, ltv: Percent) -> Option<&MiLtvRow> {
        self.rows
            .iter()
            .find(|r| ltv > r.ltv_floor && ltv <= r.ltv_ceiling)
    }
}

/// FHA annual MI policy: a flat rate pair split at an LTV threshold,
/// regardless of credit score.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FhaMiPolicy {
    pub ltv_threshold: Percent,
    pub at_or_below: Percent,
    pub above: Percent,
}

// ---------------------------------------------------------------------------
// Qualification policy
// ---------------------------------------------------------------------------

/// Back-end DTI ceilings per program, in percentage points.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DtiCeilings {
    pub conventional: Percent,
    pub fha: Percent,
    pub va: Percent,
}

impl DtiCeilings {
    pub fn for_program(&self, program: LoanProgram) -> Percent {
        match program {
            LoanProgram::Conventional => self.conventional,
            LoanProgram::Fha => self.fha,
            LoanProgram::Va => self.va,
        }
    }
}

/// DSCR verdict thresholds and the low-ratio repricing rule.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DscrPolicy {
    pub strong: Ratio,
    pub qualifies: Ratio,
    pub marginal: Ratio,
    /// Below this coverage at the requested rate, the scenario is repriced
    /// once at `fallback_rate` and reported under that rate.
    pub escalation_trigger: Ratio,
    pub fallback_rate: Percent,
}

/// Seller-concession caps per program, as a percentage of price.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SellerCreditCaps {
    pub conventional: Percent,
    pub fha: Percent,
    pub va: Percent,
}

impl SellerCreditCaps {
    pub fn for_program(&self, program: LoanProgram) -> Percent {
        match program {
            LoanProgram::Conventional => self.conventional,
            LoanProgram::Fha => self.fha,
            LoanProgram::Va => self.va,
        }
    }
}

/// Escrow prepaid/reserve multipliers and interim-interest day count.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReservePolicy {
    pub insurance_prepaid_months: u32,
    pub insurance_reserve_months: u32,
    pub tax_prepaid_months: u32,
    pub tax_reserve_months: u32,
    pub interim_interest_days: u32,
}

// ---------------------------------------------------------------------------
// RuleSet
// ---------------------------------------------------------------------------

/// The complete, injectable rule book for one scenario computation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleSet {
    pub funding_fee: FundingFeeSchedule,
    pub conventional_mi: MiRateTable,
    pub fha_mi: FhaMiPolicy,
    pub dti_ceilings: DtiCeilings,
    pub dscr: DscrPolicy,
    pub seller_credit_caps: SellerCreditCaps,
    pub reserves: ReservePolicy,
    pub closing_costs: ClosingCostSchedule,
}

impl RuleSet {
    /// Structural checks on an externally supplied rule set: band ordering,
    /// grid dimensions, threshold ordering.
    pub fn validate(&self) -> LoanScopeResult<()> {
        validate_bands("funding_fee.first_use", &self.funding_fee.first_use)?;
        validate_bands("funding_fee.subsequent", &self.funding_fee.subsequent)?;

        if self.conventional_mi.credit_floors.is_empty() {
            return Err(LoanScopeError::InvalidInput {
                field: "conventional_mi.credit_floors".into(),
                reason: "at least one credit band is required".into(),
            });
        }
        for pair in self.conventional_mi.credit_floors.windows(2) {
            if pair[0] <= pair[1] {
                return Err(LoanScopeError::InvalidInput {
                    field: "conventional_mi.credit_floors".into(),
                    reason: "credit floors must be strictly descending".into(),
                });
            }
        }
        for (i, row) in self.conventional_mi.rows.iter().enumerate() {
            if row.rates.len() != self.conventional_mi.credit_floors.len() {
                return Err(LoanScopeError::InvalidInput {
                    field: format!("conventional_mi.rows[{i}]"),
                    reason: "rate count must match credit band count".into(),
                });
            }
            if row.ltv_floor >= row.ltv_ceiling {
                return Err(LoanScopeError::InvalidInput {
                    field: format!("conventional_mi.rows[{i}]"),
                    reason: "LTV floor must be below ceiling".into(),
                });
            }
        }
        for pair in self.conventional_mi.rows.windows(2) {
            if pair[0].ltv_ceiling != pair[1].ltv_floor {
                return Err(LoanScopeError::InvalidInput {
                    field: "conventional_mi.rows".into(),
                    reason: "LTV bands must be contiguous and ascending".into(),
                });
            }
        }

        if self.dscr.strong <= self.dscr.qualifies
            || self.dscr.qualifies <= self.dscr.marginal
            || self.dscr.marginal <= self.dscr.escalation_trigger
        {
            return Err(LoanScopeError::InvalidInput {
                field: "dscr".into(),
                reason: "thresholds must descend strong > qualifies > marginal > trigger".into(),
            });
        }
        if self.dscr.fallback_rate < Decimal::ZERO {
            return Err(LoanScopeError::InvalidInput {
                field: "dscr.fallback_rate".into(),
                reason: "fallback rate cannot be negative".into(),
            });
        }

        Ok(())
    }
}

impl Default for RuleSet {
    fn default() -> Self {
        RuleSet {
            funding_fee: FundingFeeSchedule {
                first_use: vec![
                    FeeBand {
                        floor: dec!(0),
                        ceiling: Some(dec!(5)),
                        rate: dec!(2.15),
                    },
                    FeeBand {
                        floor: dec!(5),
                        ceiling: Some(dec!(10)),
                        rate: dec!(1.50),
                    },
                    FeeBand {
                        floor: dec!(10),
                        ceiling: None,
                        rate: dec!(1.25),
                    },
                ],
                subsequent: vec![
                    FeeBand {
                        floor: dec!(0),
                        ceiling: Some(dec!(5)),
                        rate: dec!(3.30),
                    },
                    FeeBand {
                        floor: dec!(5),
                        ceiling: Some(dec!(10)),
                        rate: dec!(1.50),
                    },
                    FeeBand {
                        floor: dec!(10),
                        ceiling: None,
                        rate: dec!(1.25),
                    },
                ],
            },
            conventional_mi: MiRateTable {
                credit_floors: vec![760, 740, 720, 700, 680, 660, MIN_CREDIT_SCORE],
                rows: vec![
                    MiLtvRow {
                        ltv_floor: dec!(80),
                        ltv_ceiling: dec!(85),
                        rates: vec![
                            dec!(0.15),
                            dec!(0.20),
                            dec!(0.25),
                            dec!(0.30),
                            dec!(0.38),
                            dec!(0.44),
                            dec!(0.55),
                        ],
                    },
                    MiLtvRow {
                        ltv_floor: dec!(85),
                        ltv_ceiling: dec!(90),
                        rates: vec![
                            dec!(0.28),
                            dec!(0.38),
                            dec!(0.46),
                            dec!(0.55),
                            dec!(0.66),
                            dec!(0.76),
                            dec!(0.90),
                        ],
                    },
                    MiLtvRow {
                        ltv_floor: dec!(90),
                        ltv_ceiling: dec!(95),
                        rates: vec![
                            dec!(0.38),
                            dec!(0.53),
                            dec!(0.66),
                            dec!(0.78),
                            dec!(0.96),
                            dec!(1.12),
                            dec!(1.25),
                        ],
                    },
                    MiLtvRow {
                        ltv_floor: dec!(95),
                        ltv_ceiling: dec!(97),
                        rates: vec![
                            dec!(0.58),
                            dec!(0.70),
                            dec!(0.87),
                            dec!(0.99),
                            dec!(1.21),
                            dec!(1.40),
                            dec!(1.52),
                        ],
                    },
                ],
            },
            fha_mi: FhaMiPolicy {
                ltv_threshold: dec!(95),
                at_or_below: dec!(0.50),
                above: dec!(0.55),
            },
            dti_ceilings: DtiCeilings {
                conventional: dec!(45),
                fha: dec!(56.9),
                va: dec!(50),
            },
            dscr: DscrPolicy {
                strong: dec!(1.25),
                qualifies: dec!(1.15),
                marginal: dec!(1.00),
                escalation_trigger: dec!(0.75),
                fallback_rate: dec!(8.000),
            },
            seller_credit_caps: SellerCreditCaps {
                conventional: dec!(3),
                fha: dec!(6),
                va: dec!(4),
            },
            reserves: ReservePolicy {
                insurance_prepaid_months: 12,
                insurance_reserve_months: 6,
                tax_prepaid_months: 6,
                tax_reserve_months: 3,
                interim_interest_days: 15,
            },
            closing_costs: ClosingCostSchedule {
                lender_fees: vec![
                    LineItem::new("Underwriting fee", dec!(995)),
                    LineItem::new("Processing fee", dec!(595)),
                    LineItem::new("Appraisal", dec!(650)),
                    LineItem::new("Credit report", dec!(75)),
                    LineItem::new("Flood certification", dec!(15)),
                    LineItem::new("Tax service", dec!(85)),
                ],
                shoppable_fees: vec![
                    LineItem::new("Settlement fee", dec!(495)),
                    LineItem::new("Lender's title insurance", dec!(1150)),
                    LineItem::new("Title search", dec!(250)),
                    LineItem::new("Survey", dec!(225)),
                ],
                government_fees: vec![LineItem::new("Recording fees", dec!(185))],
            },
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_rule_set_validates() {
        RuleSet::default().validate().unwrap();
    }

    #[test]
    fn band_gap_rejected() {
        let mut rules = RuleSet::default();
        rules.funding_fee.first_use[1].floor = dec!(6);
        let err = rules.validate().unwrap_err();
        match err {
            LoanScopeError::InvalidInput { field, .. } => {
                assert_eq!(field, "funding_fee.first_use")
            }
            other => panic!("Expected InvalidInput, got {other:?}"),
        }
    }

    #[test]
    fn ragged_mi_row_rejected() {
        let mut rules = RuleSet::default();
        rules.conventional_mi.rows[2].rates.pop();
        assert!(rules.validate().is_err());
    }

    #[test]
    fn disordered_dscr_thresholds_rejected() {
        let mut rules = RuleSet::default();
        rules.dscr.qualifies = dec!(1.30);
        assert!(rules.validate().is_err());
    }

    #[test]
    fn band_lookup_is_floor_inclusive() {
        let rules = RuleSet::default();
        let bands = rules.funding_fee.bands_for(VaUsage::FirstUse);
        assert_eq!(lookup_band("t", bands, dec!(4.999)).unwrap(), dec!(2.15));
        assert_eq!(lookup_band("t", bands, dec!(5)).unwrap(), dec!(1.50));
        assert_eq!(lookup_band("t", bands, dec!(10)).unwrap(), dec!(1.25));
        assert_eq!(lookup_band("t", bands, dec!(60)).unwrap(), dec!(1.25));
    }

    #[test]
    fn band_lookup_fails_below_floor() {
        let rules = RuleSet::default();
        let bands = rules.funding_fee.bands_for(VaUsage::FirstUse);
        let err = lookup_band("va_funding_fee", bands, dec!(-1)).unwrap_err();
        match err {
            LoanScopeError::UnresolvedLookup { table, .. } => {
                assert_eq!(table, "va_funding_fee")
            }
            other => panic!("Expected UnresolvedLookup, got {other:?}"),
        }
    }
}
