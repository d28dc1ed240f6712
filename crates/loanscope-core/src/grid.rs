//! Multi-scenario comparison grid.
//!
//! A dense cross product of price points and down-payment tiers, each cell
//! composed and qualified independently. Cells share no state; ordering is
//! rows ascending by price, columns ascending by tier, regardless of how the
//! tiers were supplied.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::LoanScopeError;
use crate::qualification::{self, QualificationOutput};
use crate::rules::RuleSet;
use crate::scenario::{self, LoanInputs, ScenarioResult};
use crate::types::{with_metadata, ComputationOutput, Money, Percent};
use crate::LoanScopeResult;

// ---------------------------------------------------------------------------
// Input / Output types
// ---------------------------------------------------------------------------

/// Grid request: inclusive price range with a step, plus the tiers to cross
/// it against. `base` supplies every other input for each cell.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GridRequest {
    pub price_min: Money,
    pub price_max: Money,
    pub price_step: Money,
    pub down_payment_tiers: Vec<Percent>,
    pub base: LoanInputs,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GridCell {
    pub price: Money,
    pub down_payment_pct: Percent,
    pub scenario: ScenarioResult,
    pub qualification: QualificationOutput,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioGrid {
    /// Row axis, ascending.
    pub prices: Vec<Money>,
    /// Column axis, ascending.
    pub down_payment_tiers: Vec<Percent>,
    /// Row-major: all tiers for the first price, then the next price.
    pub cells: Vec<GridCell>,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Build the full comparison grid for a price range and down-payment tiers.
pub fn build_grid(
    request: &GridRequest,
    rules: &RuleSet,
) -> LoanScopeResult<ComputationOutput<ScenarioGrid>> {
    let start = Instant::now();
    validate_request(request)?;

    let mut prices = Vec::new();
    let mut price = request.price_min;
    while price <= request.price_max {
        prices.push(price);
        price += request.price_step;
    }

    let mut tiers = request.down_payment_tiers.clone();
    tiers.sort();
    tiers.dedup();

    let mut warnings: Vec<String> = Vec::new();
    let mut cells = Vec::with_capacity(prices.len() * tiers.len());
    for price in &prices {
        for tier in &tiers {
            let mut cell_inputs = request.base.clone();
            cell_inputs.purchase_price = *price;
            cell_inputs.down_payment_pct = *tier;

            let (composed, cell_warnings) = scenario::compose(&cell_inputs, rules)?;
            let (qualified, qualify_warnings) =
                qualification::qualify_composed(&composed, &cell_inputs, rules)?;
            for w in cell_warnings.into_iter().chain(qualify_warnings) {
                let tagged = format!("price {price}, {tier}% down: {w}");
                if !warnings.contains(&tagged) {
                    warnings.push(tagged);
                }
            }
            cells.push(GridCell {
                price: *price,
                down_payment_pct: *tier,
                scenario: composed,
                qualification: qualified,
            });
        }
    }

    let grid = ScenarioGrid {
        prices,
        down_payment_tiers: tiers,
        cells,
    };
    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Scenario Comparison Grid",
        request,
        warnings,
        elapsed,
        grid,
    ))
}

fn validate_request(request: &GridRequest) -> LoanScopeResult<()> {
    if request.price_min <= Decimal::ZERO {
        return Err(LoanScopeError::InvalidInput {
            field: "price_min".into(),
            reason: "minimum price must be positive".into(),
        });
    }
    if request.price_max < request.price_min {
        return Err(LoanScopeError::InvalidInput {
            field: "price_max".into(),
            reason: "maximum price must be at or above the minimum".into(),
        });
    }
    if request.price_step <= Decimal::ZERO {
        return Err(LoanScopeError::InvalidInput {
            field: "price_step".into(),
            reason: "step must be positive".into(),
        });
    }
    if request.down_payment_tiers.is_empty() {
        return Err(LoanScopeError::InvalidInput {
            field: "down_payment_tiers".into(),
            reason: "at least one tier is required".into(),
        });
    }
    for tier in &request.down_payment_tiers {
        if *tier < Decimal::ZERO || *tier >= Decimal::ONE_HUNDRED {
            return Err(LoanScopeError::InvalidInput {
                field: "down_payment_tiers".into(),
                reason: "tiers must be at least 0% and below 100%".into(),
            });
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
