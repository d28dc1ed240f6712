use clap::Args;
use serde_json::Value;

use loanscope_core::grid::{build_grid, GridRequest};

use super::{load_rules, read_request};

#[derive(Args)]
pub struct GridArgs {
    /// Path to a GridRequest file (JSON or YAML); stdin if omitted
    #[arg(long)]
    pub input: Option<String>,

    /// Path to a client rate sheet replacing the built-in rules
    #[arg(long)]
    pub rules: Option<String>,
}

pub fn run_grid(args: GridArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let request: GridRequest = read_request(&args.input)?;
    let rules = load_rules(args.rules.as_deref())?;
    let result = build_grid(&request, &rules)?;
    Ok(serde_json::to_value(result)?)
}
