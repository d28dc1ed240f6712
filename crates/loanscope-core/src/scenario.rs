//! Scenario composition: one set of loan inputs in, a fully costed monthly
//! obligation and cash-to-close picture out.
//!
//! The composer is a pure function of [`LoanInputs`] and [`RuleSet`]. Every
//! derived figure is recomputed from scratch on each call; nothing is cached
//! or mutated in place, so a changed input can never leave a stale derived
//! value behind. Money fields are rounded to cents at this boundary and all
//! downstream ratios are computed from the rounded figures, so displayed
//! ratios always agree with displayed dollars.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::amortization::monthly_payment;
use crate::error::LoanScopeError;
use crate::fees::funding_fee::resolve_funding_fee;
use crate::fees::mortgage_insurance::resolve_mi;
use crate::rules::{RuleSet, MAX_CREDIT_SCORE, MIN_CREDIT_SCORE};
use crate::types::{
    round_cents, with_metadata, ComputationOutput, LoanProgram, Money, Percent,
    QualificationBasis, TaxBasis, VaUsage,
};
use crate::LoanScopeResult;

const PERCENT: Decimal = dec!(100);
const MONTHS_PER_YEAR: Decimal = dec!(12);
const DAYS_PER_YEAR: Decimal = dec!(365);

// ---------------------------------------------------------------------------
// Input type
// ---------------------------------------------------------------------------

/// Immutable per-scenario inputs. For a refinance, `purchase_price` is the
/// appraised value and the down-payment percent encodes the retained equity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoanInputs {
    pub purchase_price: Money,
    /// Down payment as a percent of price, 0 <= pct < 100.
    pub down_payment_pct: Percent,
    /// Quoted annual note rate, three decimal places (5.500 = 5.5%).
    pub annual_rate: Percent,
    pub term_months: u32,
    #[serde(default)]
    pub interest_only: bool,
    pub program: LoanProgram,
    pub credit_score: u16,
    pub tax_basis: TaxBasis,
    pub annual_insurance: Money,
    #[serde(default)]
    pub monthly_hoa: Money,
    #[serde(default)]
    pub seller_credit_requested: Money,
    /// Finance the VA funding fee into the loan rather than paying it at
    /// closing. Ignored for programs without a one-time fee.
    #[serde(default)]
    pub finance_fee: bool,
    #[serde(default)]
    pub va_usage: VaUsage,
    pub qualification: QualificationBasis,
}

// ---------------------------------------------------------------------------
// Output type
// ---------------------------------------------------------------------------

/// Fully composed scenario. Derived only: recompute from [`LoanInputs`] on
/// any change, never edit a field.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioResult {
    pub purchase_price: Money,
    pub down_payment: Money,
    pub base_loan: Money,
    pub ltv: Percent,
    /// One-time VA funding fee rate, percent of the base loan. Zero for
    /// non-VA programs.
    pub funding_fee_rate: Percent,
    pub funding_fee_amount: Money,
    /// Portion of the funding fee rolled into principal.
    pub financed_fee: Money,
    /// Portion of the funding fee due in cash at closing.
    pub fee_due_at_closing: Money,
    pub total_loan: Money,
    /// Annual MI rate, percent of the base loan. Recurring, not financed.
    pub mi_rate: Percent,
    pub monthly_principal_interest: Money,
    pub monthly_tax: Money,
    pub monthly_insurance: Money,
    pub monthly_hoa: Money,
    pub monthly_mi: Money,
    /// PITIA plus MI.
    pub total_monthly_obligation: Money,
    pub insurance_prepaid: Money,
    pub insurance_reserve: Money,
    pub tax_prepaid: Money,
    pub tax_reserve: Money,
    pub interim_interest: Money,
    pub prepaids_and_reserves: Money,
    pub lender_fees_total: Money,
    pub shoppable_fees_total: Money,
    pub government_fees_total: Money,
    pub total_closing_costs: Money,
    pub seller_credit_cap: Money,
    pub effective_seller_credit: Money,
    /// Requested credit beyond what closing costs could absorb.
    pub excess_seller_credit: Money,
    pub cash_at_closing: Money,
    /// Down payment plus cash at closing.
    pub total_cash_required: Money,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Compose a scenario from loan inputs under the given rules.
pub fn compose_scenario(
    inputs: &LoanInputs,
    rules: &RuleSet,
) -> LoanScopeResult<ComputationOutput<ScenarioResult>> {
    let start = Instant::now();
    let (result, warnings) = compose(inputs, rules)?;
    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Loan Scenario Composition",
        inputs,
        warnings,
        elapsed,
        result,
    ))
}

pub(crate) fn compose(
    inputs: &LoanInputs,
    rules: &RuleSet,
) -> LoanScopeResult<(ScenarioResult, Vec<String>)> {
    validate_inputs(inputs)?;
    let mut warnings: Vec<String> = Vec::new();

    let price = inputs.purchase_price;
    let down_payment = round_cents(price * inputs.down_payment_pct / PERCENT);
    let base_loan = price - down_payment;
    let ltv = base_loan / price * PERCENT;

    // One-time funding fee (VA) vs. recurring MI (Conventional/FHA). These
    // are structurally different: the fee changes principal or closing cash
    // once, MI rides the payment stack every month on the base loan.
    let (funding_fee_rate, funding_fee_amount) = match inputs.program {
        LoanProgram::Va => {
            let rate = resolve_funding_fee(inputs.va_usage, inputs.down_payment_pct, rules)?;
            (rate, round_cents(base_loan * rate / PERCENT))
        }
        _ => (Decimal::ZERO, Decimal::ZERO),
    };

    let mi = resolve_mi(inputs.program, ltv, inputs.credit_score, rules)?;
    if mi.fallback_applied {
        warnings.push(format!(
            "No MI band for LTV {} with credit score {}; premium defaulted to zero",
            ltv.round_dp(3),
            inputs.credit_score
        ));
    }
    let monthly_mi = round_cents(base_loan * mi.annual_rate / PERCENT / MONTHS_PER_YEAR);

    let (financed_fee, fee_due_at_closing) = if inputs.finance_fee {
        (funding_fee_amount, Decimal::ZERO)
    } else {
        (Decimal::ZERO, funding_fee_amount)
    };
    let total_loan = base_loan + financed_fee;

    let monthly_pi = round_cents(monthly_payment(
        total_loan,
        inputs.annual_rate,
        inputs.term_months,
        inputs.interest_only,
    )?);

    let annual_tax = match inputs.tax_basis {
        TaxBasis::RateOfPrice(rate) => price * rate / PERCENT,
        TaxBasis::AnnualAmount(amount) => amount,
    };
    let monthly_tax = round_cents(annual_tax / MONTHS_PER_YEAR);
    let monthly_insurance = round_cents(inputs.annual_insurance / MONTHS_PER_YEAR);
    let monthly_hoa = round_cents(inputs.monthly_hoa);

    let total_monthly_obligation =
        monthly_pi + monthly_tax + monthly_insurance + monthly_hoa + monthly_mi;

    // Prepaids and escrow reserves, from policy multipliers.
    let reserves = &rules.reserves;
    let insurance_prepaid = monthly_insurance * Decimal::from(reserves.insurance_prepaid_months);
    let insurance_reserve = monthly_insurance * Decimal::from(reserves.insurance_reserve_months);
    let tax_prepaid = monthly_tax * Decimal::from(reserves.tax_prepaid_months);
    let tax_reserve = monthly_tax * Decimal::from(reserves.tax_reserve_months);
    let interim_interest = round_cents(
        total_loan * inputs.annual_rate / PERCENT / DAYS_PER_YEAR
            * Decimal::from(reserves.interim_interest_days),
    );
    let prepaids_and_reserves =
        insurance_prepaid + insurance_reserve + tax_prepaid + tax_reserve + interim_interest;

    let lender_fees_total = rules.closing_costs.lender_total();
    let shoppable_fees_total = rules.closing_costs.shoppable_total();
    let government_fees_total = rules.closing_costs.government_total();
    let total_closing_costs = lender_fees_total
        + shoppable_fees_total
        + government_fees_total
        + prepaids_and_reserves
        + fee_due_at_closing;

    // Clamp the seller credit to the program cap before subtraction, so a
    // scenario can never show negative required cash beyond the true excess.
    let seller_credit_cap = round_cents(
        price * rules.seller_credit_caps.for_program(inputs.program) / PERCENT,
    );
    let effective_seller_credit = inputs.seller_credit_requested.min(seller_credit_cap);
    if effective_seller_credit < inputs.seller_credit_requested {
        warnings.push(format!(
            "Seller credit {} exceeds the program cap {}; clamped",
            inputs.seller_credit_requested, seller_credit_cap
        ));
    }

    let net = total_closing_costs - effective_seller_credit;
    let cash_at_closing = net.max(Decimal::ZERO);
    let excess_seller_credit = (-net).max(Decimal::ZERO);
    let total_cash_required = down_payment + cash_at_closing;

    let result = ScenarioResult {
        purchase_price: price,
        down_payment,
        base_loan,
        ltv: ltv.round_dp(3),
        funding_fee_rate,
        funding_fee_amount,
        financed_fee,
        fee_due_at_closing,
        total_loan,
        mi_rate: mi.annual_rate,
        monthly_principal_interest: monthly_pi,
        monthly_tax,
        monthly_insurance,
        monthly_hoa,
        monthly_mi,
        total_monthly_obligation,
        insurance_prepaid,
        insurance_reserve,
        tax_prepaid,
        tax_reserve,
        interim_interest,
        prepaids_and_reserves,
        lender_fees_total,
        shoppable_fees_total,
        government_fees_total,
        total_closing_costs,
        seller_credit_cap,
        effective_seller_credit,
        excess_seller_credit,
        cash_at_closing,
        total_cash_required,
    };
    Ok((result, warnings))
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

pub(crate) fn validate_inputs(inputs: &LoanInputs) -> LoanScopeResult<()> {
    if inputs.purchase_price <= Decimal::ZERO {
        return Err(LoanScopeError::InvalidInput {
            field: "purchase_price".into(),
            reason: "price must be positive".into(),
        });
    }
    if inputs.down_payment_pct < Decimal::ZERO || inputs.down_payment_pct >= PERCENT {
        return Err(LoanScopeError::InvalidInput {
            field: "down_payment_pct".into(),
            reason: "down payment must be at least 0% and below 100%".into(),
        });
    }
    if inputs.annual_rate < Decimal::ZERO {
        return Err(LoanScopeError::InvalidInput {
            field: "annual_rate".into(),
            reason: "rate cannot be negative".into(),
        });
    }
    if inputs.term_months == 0 {
        return Err(LoanScopeError::InvalidInput {
            field: "term_months".into(),
            reason: "term must be at least one month".into(),
        });
    }
    if !(MIN_CREDIT_SCORE..=MAX_CREDIT_SCORE).contains(&inputs.credit_score) {
        return Err(LoanScopeError::InvalidInput {
            field: "credit_score".into(),
            reason: format!("score must be {MIN_CREDIT_SCORE}-{MAX_CREDIT_SCORE}"),
        });
    }
    let tax_value = match inputs.tax_basis {
        TaxBasis::RateOfPrice(rate) => rate,
        TaxBasis::AnnualAmount(amount) => amount,
    };
    if tax_value < Decimal::ZERO {
        return Err(LoanScopeError::InvalidInput {
            field: "tax_basis".into(),
            reason: "tax cannot be negative".into(),
        });
    }
    if inputs.annual_insurance < Decimal::ZERO {
        return Err(LoanScopeError::InvalidInput {
            field: "annual_insurance".into(),
            reason: "insurance cannot be negative".into(),
        });
    }
    if inputs.monthly_hoa < Decimal::ZERO {
        return Err(LoanScopeError::InvalidInput {
            field: "monthly_hoa".into(),
            reason: "HOA dues cannot be negative".into(),
        });
    }
    if inputs.seller_credit_requested < Decimal::ZERO {
        return Err(LoanScopeError::InvalidInput {
            field: "seller_credit_requested".into(),
            reason: "seller credit cannot be negative".into(),
        });
    }
    match &inputs.qualification {
        QualificationBasis::Dti {
            gross_monthly_income,
            other_monthly_debts,
        } => {
            if *gross_monthly_income <= Decimal::ZERO {
                return Err(LoanScopeError::InvalidInput {
                    field: "gross_monthly_income".into(),
                    reason: "income must be positive".into(),
                });
            }
            if *other_monthly_debts < Decimal::ZERO {
                return Err(LoanScopeError::InvalidInput {
                    field: "other_monthly_debts".into(),
                    reason: "debts cannot be negative".into(),
                });
            }
        }
        QualificationBasis::Dscr {
            gross_monthly_rent,
            vacancy_retention,
        } => {
            if *gross_monthly_rent < Decimal::ZERO {
                return Err(LoanScopeError::InvalidInput {
                    field: "gross_monthly_rent".into(),
                    reason: "rent cannot be negative".into(),
                });
            }
            // Retained fraction, not a loss rate: 0.80 keeps 80% of rent.
            if *vacancy_retention <= Decimal::ZERO || *vacancy_retention > Decimal::ONE {
                return Err(LoanScopeError::InvalidInput {
                    field: "vacancy_retention".into(),
                    reason: "retention must be within (0, 1]".into(),
                });
            }
        }
    }
    Ok(())
}
