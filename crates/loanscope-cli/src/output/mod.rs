pub mod csv_out;
pub mod json;
pub mod minimal;
pub mod table;

use crate::OutputFormat;
use serde_json::Value;

/// Dispatch output to the appropriate formatter.
pub fn format_output(format: &OutputFormat, value: &Value) {
    match format {
        OutputFormat::Json => json::print_json(value),
        OutputFormat::Table => table::print_table(value),
        OutputFormat::Csv => csv_out::print_csv(value),
        OutputFormat::Minimal => minimal::print_minimal(value),
    }
}

/// The scenario commands emit `{scenario, qualification}` envelope pairs;
/// everything else is a single envelope or a flat object.
pub(crate) fn envelope_sections(value: &Value) -> Vec<(&'static str, &Value)> {
    let mut sections = Vec::new();
    if let Value::Object(map) = value {
        if let Some(s) = map.get("scenario") {
            sections.push(("Scenario", s));
        }
        if let Some(q) = map.get("qualification") {
            sections.push(("Qualification", q));
        }
    }
    sections
}

/// Pull the verdict string out of a qualification result, either path.
pub(crate) fn verdict_of(qualification: &Value) -> Option<&str> {
    let inner = qualification
        .get("dti")
        .or_else(|| qualification.get("dscr"))?;
    inner.get("verdict")?.as_str()
}
