use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use loanscope_core::fees::funding_fee::resolve_funding_fee;
use loanscope_core::fees::mortgage_insurance::resolve_mi;
use loanscope_core::types::{LoanProgram, VaUsage};

use super::load_rules;

#[derive(Args)]
pub struct FundingFeeArgs {
    /// Use history: first-use or subsequent
    #[arg(long, default_value = "first-use")]
    pub usage: String,

    /// Down payment as a percent of price
    #[arg(long)]
    pub down_payment: String,

    /// Path to a client rate sheet replacing the built-in rules
    #[arg(long)]
    pub rules: Option<String>,
}

#[derive(Args)]
pub struct MiRateArgs {
    /// Loan program: conventional, fha, or va
    #[arg(long)]
    pub program: String,

    /// Loan-to-value percent
    #[arg(long)]
    pub ltv: String,

    /// Borrower credit score
    #[arg(long)]
    pub credit_score: u16,

    /// Path to a client rate sheet replacing the built-in rules
    #[arg(long)]
    pub rules: Option<String>,
}

fn parse_usage(s: &str) -> Result<VaUsage, Box<dyn std::error::Error>> {
    match s.to_lowercase().as_str() {
        "first-use" | "first_use" | "first" => Ok(VaUsage::FirstUse),
        "subsequent" => Ok(VaUsage::Subsequent),
        other => Err(format!("Unknown use history '{}': expected first-use or subsequent", other).into()),
    }
}

fn parse_program(s: &str) -> Result<LoanProgram, Box<dyn std::error::Error>> {
    match s.to_lowercase().as_str() {
        "conventional" => Ok(LoanProgram::Conventional),
        "fha" => Ok(LoanProgram::Fha),
        "va" => Ok(LoanProgram::Va),
        other => Err(format!("Unknown program '{}': expected conventional, fha, or va", other).into()),
    }
}

pub fn run_funding_fee(args: FundingFeeArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let usage = parse_usage(&args.usage)?;
    let down_payment: Decimal = args.down_payment.parse()?;
    let rules = load_rules(args.rules.as_deref())?;
    let rate = resolve_funding_fee(usage, down_payment, &rules)?;
    Ok(serde_json::json!({
        "usage": args.usage,
        "down_payment_pct": down_payment.to_string(),
        "funding_fee_rate": rate.to_string(),
    }))
}

pub fn run_mi_rate(args: MiRateArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let program = parse_program(&args.program)?;
    let ltv: Decimal = args.ltv.parse()?;
    let rules = load_rules(args.rules.as_deref())?;
    let quote = resolve_mi(program, ltv, args.credit_score, &rules)?;
    Ok(serde_json::json!({
        "program": args.program,
        "ltv": ltv.to_string(),
        "credit_score": args.credit_score,
        "annual_mi_rate": quote.annual_rate.to_string(),
        "fallback_applied": quote.fallback_applied,
    }))
}
