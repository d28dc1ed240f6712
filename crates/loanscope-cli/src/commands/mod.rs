pub mod grid;
pub mod investment;
pub mod rates;
pub mod scenario;

use serde::de::DeserializeOwned;

use loanscope_core::rules::RuleSet;

use crate::input;

/// Load a client rate sheet if one was supplied, otherwise the reference
/// rules. Externally supplied sheets are structurally validated up front.
pub fn load_rules(path: Option<&str>) -> Result<RuleSet, Box<dyn std::error::Error>> {
    let rules = match path {
        Some(p) => input::file::read_input::<RuleSet>(p)?,
        None => RuleSet::default(),
    };
    rules.validate()?;
    Ok(rules)
}

/// Read a typed request from --input or piped stdin.
pub fn read_request<T: DeserializeOwned>(
    path: &Option<String>,
) -> Result<T, Box<dyn std::error::Error>> {
    if let Some(ref path) = path {
        input::file::read_input(path)
    } else if let Some(data) = input::stdin::read_stdin()? {
        Ok(serde_json::from_value(data)?)
    } else {
        Err("--input <file.json|file.yaml> or stdin required".into())
    }
}
