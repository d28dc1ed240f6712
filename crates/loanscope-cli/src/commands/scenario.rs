use clap::Args;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Deserialize;
use serde_json::Value;

use loanscope_core::qualification::evaluate_qualification;
use loanscope_core::rules::RuleSet;
use loanscope_core::scenario::{compose_scenario, LoanInputs};
use loanscope_core::types::{LoanProgram, Money, Percent, QualificationBasis, TaxBasis, VaUsage};

use super::{load_rules, read_request};

#[derive(Args)]
pub struct PurchaseArgs {
    /// Path to a LoanInputs file (JSON or YAML); stdin if omitted
    #[arg(long)]
    pub input: Option<String>,

    /// Path to a client rate sheet replacing the built-in rules
    #[arg(long)]
    pub rules: Option<String>,
}

#[derive(Args)]
pub struct RefinanceArgs {
    /// Path to a refinance request file (JSON or YAML); stdin if omitted
    #[arg(long)]
    pub input: Option<String>,

    /// Path to a client rate sheet replacing the built-in rules
    #[arg(long)]
    pub rules: Option<String>,
}

#[derive(Args)]
pub struct VaArgs {
    /// Path to a LoanInputs file (JSON or YAML); stdin if omitted
    #[arg(long)]
    pub input: Option<String>,

    /// Path to a client rate sheet replacing the built-in rules
    #[arg(long)]
    pub rules: Option<String>,
}

/// Refinance shape: appraised value and payoff balance instead of a price
/// and down payment. The retained equity becomes the down-payment percent.
#[derive(Debug, Deserialize)]
pub struct RefinanceRequest {
    pub appraised_value: Money,
    pub payoff_balance: Money,
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
    pub finance_fee: bool,
    #[serde(default)]
    pub va_usage: VaUsage,
    pub qualification: QualificationBasis,
}

pub fn run_purchase(args: PurchaseArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let inputs: LoanInputs = read_request(&args.input)?;
    let rules = load_rules(args.rules.as_deref())?;
    scenario_with_qualification(&inputs, &rules)
}

pub fn run_va(args: VaArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let mut inputs: LoanInputs = read_request(&args.input)?;
    inputs.program = LoanProgram::Va;
    let rules = load_rules(args.rules.as_deref())?;
    scenario_with_qualification(&inputs, &rules)
}

pub fn run_refinance(args: RefinanceArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let request: RefinanceRequest = read_request(&args.input)?;
    if request.appraised_value <= Decimal::ZERO {
        return Err("appraised value must be positive".into());
    }
    if request.payoff_balance <= Decimal::ZERO {
        return Err("payoff balance must be positive".into());
    }
    if request.payoff_balance >= request.appraised_value {
        return Err("payoff balance must be below the appraised value".into());
    }

    let equity_pct = (request.appraised_value - request.payoff_balance)
        / request.appraised_value
        * dec!(100);

    let inputs = LoanInputs {
        purchase_price: request.appraised_value,
        down_payment_pct: equity_pct,
        annual_rate: request.annual_rate,
        term_months: request.term_months,
        interest_only: request.interest_only,
        program: request.program,
        credit_score: request.credit_score,
        tax_basis: request.tax_basis,
        annual_insurance: request.annual_insurance,
        monthly_hoa: request.monthly_hoa,
        seller_credit_requested: Decimal::ZERO,
        finance_fee: request.finance_fee,
        va_usage: request.va_usage,
        qualification: request.qualification,
    };
    let rules = load_rules(args.rules.as_deref())?;
    scenario_with_qualification(&inputs, &rules)
}

fn scenario_with_qualification(
    inputs: &LoanInputs,
    rules: &RuleSet,
) -> Result<Value, Box<dyn std::error::Error>> {
    let scenario = compose_scenario(inputs, rules)?;
    let qualification = evaluate_qualification(inputs, rules)?;
    Ok(serde_json::json!({
        "scenario": scenario,
        "qualification": qualification,
    }))
}
