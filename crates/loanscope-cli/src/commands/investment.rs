use clap::Args;
use serde_json::Value;

use loanscope_core::qualification::evaluate_qualification;
use loanscope_core::scenario::{compose_scenario, LoanInputs};
use loanscope_core::types::QualificationBasis;

use super::{load_rules, read_request};

#[derive(Args)]
pub struct InvestmentArgs {
    /// Path to a LoanInputs file with a dscr qualification basis
    #[arg(long)]
    pub input: Option<String>,

    /// Path to a client rate sheet replacing the built-in rules
    #[arg(long)]
    pub rules: Option<String>,
}

pub fn run_investment(args: InvestmentArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let inputs: LoanInputs = read_request(&args.input)?;
    if !matches!(inputs.qualification, QualificationBasis::Dscr { .. }) {
        return Err("investment scenarios require a dscr qualification basis".into());
    }

    let rules = load_rules(args.rules.as_deref())?;
    let scenario = compose_scenario(&inputs, &rules)?;
    let qualification = evaluate_qualification(&inputs, &rules)?;
    Ok(serde_json::json!({
        "scenario": scenario,
        "qualification": qualification,
    }))
}
