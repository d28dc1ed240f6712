use serde_json::Value;
use std::io;

use super::verdict_of;

/// Format output as CSV. A grid becomes one row per cell; any other object
/// is flattened to field,value pairs.
pub fn print_csv(value: &Value) {
    let result = value.get("result").unwrap_or(value);
    if let Some(cells) = result.get("cells").and_then(Value::as_array) {
        print_grid_csv(cells);
    } else {
        print_pairs_csv(value);
    }
}

fn print_grid_csv(cells: &[Value]) {
    let mut writer = csv::Writer::from_writer(io::stdout());
    let header = [
        "price",
        "down_payment_pct",
        "total_loan",
        "monthly_principal_interest",
        "total_monthly_obligation",
        "total_cash_required",
        "verdict",
    ];
    if writer.write_record(header).is_err() {
        return;
    }
    for cell in cells {
        let field = |pointer: &str| -> String {
            cell.pointer(pointer)
                .map(|v| match v {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                })
                .unwrap_or_default()
        };
        let verdict = cell
            .get("qualification")
            .and_then(verdict_of)
            .unwrap_or_default()
            .to_string();
        let record = [
            field("/price"),
            field("/down_payment_pct"),
            field("/scenario/total_loan"),
            field("/scenario/monthly_principal_interest"),
            field("/scenario/total_monthly_obligation"),
            field("/scenario/total_cash_required"),
            verdict,
        ];
        if writer.write_record(&record).is_err() {
            return;
        }
    }
    let _ = writer.flush();
}

fn print_pairs_csv(value: &Value) {
    let mut writer = csv::Writer::from_writer(io::stdout());
    if writer.write_record(["field", "value"]).is_err() {
        return;
    }
    write_pairs(&mut writer, "", value);
    let _ = writer.flush();
}

fn write_pairs(writer: &mut csv::Writer<io::Stdout>, prefix: &str, value: &Value) {
    match value {
        Value::Object(map) => {
            for (key, val) in map {
                let path = if prefix.is_empty() {
                    key.clone()
                } else {
                    format!("{prefix}.{key}")
                };
                write_pairs(writer, &path, val);
            }
        }
        Value::Array(arr) => {
            let _ = writer.write_record([prefix, &format!("[{} items]", arr.len())]);
        }
        Value::String(s) => {
            let _ = writer.write_record([prefix, s.as_str()]);
        }
        other => {
            let _ = writer.write_record([prefix, &other.to_string()]);
        }
    }
}
