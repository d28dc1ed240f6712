//! Closing-cost line items.
//!
//! Three fixed sets: lender/third-party fees the borrower cannot shop,
//! title/settlement fees they can, and government recording charges. Totals
//! are summed in declared order so repeated compositions of the same
//! schedule produce bit-identical results.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::Money;

/// A single labelled closing-cost charge.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LineItem {
    pub label: String,
    pub amount: Money,
}

impl LineItem {
    pub fn new(label: &str, amount: Money) -> Self {
        LineItem {
            label: label.to_string(),
            amount,
        }
    }
}

/// The three fixed line-item sets of a rate sheet.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClosingCostSchedule {
    /// Lender and third-party fees the borrower cannot shop for.
    pub lender_fees: Vec<LineItem>,
    /// Title and settlement services the borrower may shop for.
    pub shoppable_fees: Vec<LineItem>,
    /// Government recording and transfer charges.
    pub government_fees: Vec<LineItem>,
}

fn sum(items: &[LineItem]) -> Money {
    items.iter().fold(Decimal::ZERO, |acc, i| acc + i.amount)
}

impl ClosingCostSchedule {
    pub fn lender_total(&self) -> Money {
        sum(&self.lender_fees)
    }

    pub fn shoppable_total(&self) -> Money {
        sum(&self.shoppable_fees)
    }

    pub fn government_total(&self) -> Money {
        sum(&self.government_fees)
    }

    /// Sum of all three fixed sets, before prepaids and unfinanced fees.
    pub fn fixed_total(&self) -> Money {
        self.lender_total() + self.shoppable_total() + self.government_total()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::RuleSet;
    use rust_decimal_macros::dec;

    #[test]
    fn reference_schedule_totals() {
        let schedule = RuleSet::default().closing_costs;
        assert_eq!(schedule.lender_total(), dec!(2415));
        assert_eq!(schedule.shoppable_total(), dec!(2120));
        assert_eq!(schedule.government_total(), dec!(185));
        assert_eq!(schedule.fixed_total(), dec!(4720));
    }

    #[test]
    fn partition_sums_to_fixed_total() {
        let schedule = RuleSet::default().closing_costs;
        assert_eq!(
            schedule.fixed_total(),
            schedule.lender_total() + schedule.shoppable_total() + schedule.government_total()
        );
    }
}
