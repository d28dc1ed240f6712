use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// All monetary values. Wraps Decimal to prevent accidental f64 usage.
pub type Money = Decimal;

/// Quoted percentage points (5.500 = 5.5%). Rate sheets, program ceilings,
/// and borrower-facing rates are all quoted this way, so the engine carries
/// them as-is instead of converting to fractions at the boundary.
pub type Percent = Decimal;

/// Unit multiples (e.g., 1.25 = 1.25x coverage).
pub type Ratio = Decimal;

/// Round a dollar amount to cents, midpoint away from zero.
pub fn round_cents(amount: Money) -> Money {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Loan program.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoanProgram {
    Conventional,
    Fha,
    Va,
}

/// VA entitlement use history.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VaUsage {
    #[default]
    FirstUse,
    Subsequent,
}

/// How annual property tax is derived.
///
/// `AnnualAmount` is a hard override: it is never re-derived from the price,
/// no matter how the price changes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaxBasis {
    /// Annual tax as a percentage of the purchase price.
    RateOfPrice(Percent),
    /// A fixed annual dollar amount.
    AnnualAmount(Money),
}

/// Income side of qualification: back-end DTI for owner-occupied
/// purchase/refinance, DSCR for investment property.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QualificationBasis {
    Dti {
        gross_monthly_income: Money,
        #[serde(default)]
        other_monthly_debts: Money,
    },
    Dscr {
        gross_monthly_rent: Money,
        /// Retained fraction of gross rent (0.80 keeps 80%), not a loss rate.
        vacancy_retention: Ratio,
    },
}

/// Envelope around every top-level computation. `warnings` carries soft
/// conditions (MI band fallback, seller-credit clamp, DSCR repricing) that
/// the host may log or surface without the engine doing I/O itself.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationOutput<T: Serialize> {
    pub result: T,
    pub methodology: String,
    /// Echo of the inputs the result was derived from.
    pub assumptions: serde_json::Value,
    pub warnings: Vec<String>,
    pub metadata: ComputationMetadata,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationMetadata {
    pub version: String,
    pub computation_time_us: u64,
    pub precision: String,
}

/// Wrap a result with methodology, input echo, and timing metadata.
pub fn with_metadata<T: Serialize>(
    methodology: &str,
    assumptions: &impl Serialize,
    warnings: Vec<String>,
    elapsed_us: u64,
    result: T,
) -> ComputationOutput<T> {
    ComputationOutput {
        result,
        methodology: methodology.into(),
        assumptions: serde_json::to_value(assumptions).unwrap_or_default(),
        warnings,
        metadata: ComputationMetadata {
            version: env!("CARGO_PKG_VERSION").into(),
            computation_time_us: elapsed_us,
            precision: "rust_decimal_128bit".into(),
        },
    }
}
