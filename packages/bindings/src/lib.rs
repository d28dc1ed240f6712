use std::str::FromStr;

use napi::Result as NapiResult;
use napi_derive::napi;
use rust_decimal::Decimal;

use loanscope_core::rules::RuleSet;
use loanscope_core::types::{LoanProgram, VaUsage};

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

fn parse_rules(rules_json: Option<String>) -> NapiResult<RuleSet> {
    let rules = match rules_json {
        Some(json) => serde_json::from_str(&json).map_err(to_napi_error)?,
        None => RuleSet::default(),
    };
    rules.validate().map_err(to_napi_error)?;
    Ok(rules)
}

fn parse_decimal(field: &str, value: &str) -> NapiResult<Decimal> {
    Decimal::from_str(value)
        .map_err(|e| to_napi_error(format!("{field}: {e}")))
}

// ---------------------------------------------------------------------------
// Scenario
// ---------------------------------------------------------------------------

#[napi]
pub fn compose_scenario(input_json: String, rules_json: Option<String>) -> NapiResult<String> {
    let input: loanscope_core::scenario::LoanInputs =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let rules = parse_rules(rules_json)?;
    let output =
        loanscope_core::scenario::compose_scenario(&input, &rules).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn evaluate_qualification(
    input_json: String,
    rules_json: Option<String>,
) -> NapiResult<String> {
    let input: loanscope_core::scenario::LoanInputs =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let rules = parse_rules(rules_json)?;
    let output = loanscope_core::qualification::evaluate_qualification(&input, &rules)
        .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn build_grid(request_json: String, rules_json: Option<String>) -> NapiResult<String> {
    let request: loanscope_core::grid::GridRequest =
        serde_json::from_str(&request_json).map_err(to_napi_error)?;
    let rules = parse_rules(rules_json)?;
    let output = loanscope_core::grid::build_grid(&request, &rules).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Raw rate lookups
// ---------------------------------------------------------------------------

#[napi]
pub fn resolve_funding_fee(
    usage: String,
    down_payment_pct: String,
    rules_json: Option<String>,
) -> NapiResult<String> {
    let usage = match usage.as_str() {
        "first_use" | "first-use" => VaUsage::FirstUse,
        "subsequent" => VaUsage::Subsequent,
        other => {
            return Err(to_napi_error(format!(
                "Unknown use history '{other}': expected first_use or subsequent"
            )))
        }
    };
    let down_payment = parse_decimal("down_payment_pct", &down_payment_pct)?;
    let rules = parse_rules(rules_json)?;
    let rate = loanscope_core::fees::funding_fee::resolve_funding_fee(usage, down_payment, &rules)
        .map_err(to_napi_error)?;
    Ok(rate.to_string())
}

#[napi]
pub fn resolve_mi_rate(
    program: String,
    ltv: String,
    credit_score: u32,
    rules_json: Option<String>,
) -> NapiResult<String> {
    let program = match program.as_str() {
        "conventional" => LoanProgram::Conventional,
        "fha" => LoanProgram::Fha,
        "va" => LoanProgram::Va,
        other => {
            return Err(to_napi_error(format!(
                "Unknown program '{other}': expected conventional, fha, or va"
            )))
        }
    };
    let credit_score = u16::try_from(credit_score)
        .map_err(|_| to_napi_error("credit_score is out of range"))?;
    let ltv = parse_decimal("ltv", &ltv)?;
    let rules = parse_rules(rules_json)?;
    let quote =
        loanscope_core::fees::mortgage_insurance::resolve_mi(program, ltv, credit_score, &rules)
            .map_err(to_napi_error)?;
    serde_json::to_string(&quote).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Rules
// ---------------------------------------------------------------------------

/// The built-in reference rule set, for hosts that want to display or edit
/// the tables before substituting their own.
#[napi]
pub fn default_rules() -> NapiResult<String> {
    serde_json::to_string(&RuleSet::default()).map_err(to_napi_error)
}
