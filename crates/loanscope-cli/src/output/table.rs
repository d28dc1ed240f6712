use serde_json::Value;
use tabled::{builder::Builder, Table};

use super::{envelope_sections, verdict_of};

/// Format output as a table using the tabled crate.
pub fn print_table(value: &Value) {
    let sections = envelope_sections(value);
    if !sections.is_empty() {
        for (heading, envelope) in sections {
            println!("{heading}");
            print_envelope(envelope);
            println!();
        }
        return;
    }

    match value {
        Value::Object(map) if map.contains_key("result") => print_envelope(value),
        Value::Object(_) => print_flat_object(value),
        Value::Array(arr) => print_array_table(arr),
        _ => println!("{}", value),
    }
}

fn print_envelope(envelope: &Value) {
    let Some(result) = envelope.get("result") else {
        print_flat_object(envelope);
        return;
    };

    // A grid result gets a pivot; everything else a field/value listing.
    if result.get("cells").is_some() {
        print_grid(result);
    } else if let Value::Object(res_map) = result {
        let mut builder = Builder::default();
        builder.push_record(["Field", "Value"]);
        for (key, val) in res_map {
            builder.push_record([key.as_str(), &format_value(val)]);
        }
        println!("{}", Table::from(builder));
    } else {
        print_flat_object(result);
    }

    if let Some(Value::Array(warnings)) = envelope.get("warnings") {
        if !warnings.is_empty() {
            println!("\nWarnings:");
            for w in warnings {
                if let Value::String(s) = w {
                    println!("  - {}", s);
                }
            }
        }
    }

    if let Some(Value::String(meth)) = envelope.get("methodology") {
        println!("\nMethodology: {}", meth);
    }
}

/// Pivot a scenario grid: prices down, tiers across, each cell showing the
/// total monthly obligation and the verdict.
fn print_grid(result: &Value) {
    let (Some(prices), Some(tiers), Some(cells)) = (
        result.get("prices").and_then(Value::as_array),
        result.get("down_payment_tiers").and_then(Value::as_array),
        result.get("cells").and_then(Value::as_array),
    ) else {
        print_flat_object(result);
        return;
    };

    let mut builder = Builder::default();
    let mut header = vec!["Price".to_string()];
    for tier in tiers {
        header.push(format!("{}% down", scalar(tier)));
    }
    builder.push_record(header);

    for (row, price) in prices.iter().enumerate() {
        let mut record = vec![scalar(price)];
        for col in 0..tiers.len() {
            let cell = &cells[row * tiers.len() + col];
            let payment = cell
                .pointer("/scenario/total_monthly_obligation")
                .map(scalar)
                .unwrap_or_default();
            let verdict = cell
                .get("qualification")
                .and_then(verdict_of)
                .unwrap_or("?");
            record.push(format!("{payment}/mo  {verdict}"));
        }
        builder.push_record(record);
    }
    println!("{}", Table::from(builder));
}

fn print_flat_object(value: &Value) {
    if let Value::Object(map) = value {
        let mut builder = Builder::default();
        builder.push_record(["Field", "Value"]);
        for (key, val) in map {
            builder.push_record([key.as_str(), &format_value(val)]);
        }
        println!("{}", Table::from(builder));
    } else {
        println!("{}", value);
    }
}

fn print_array_table(arr: &[Value]) {
    if arr.is_empty() {
        println!("(empty)");
        return;
    }
    let mut builder = Builder::default();
    if let Value::Object(first) = &arr[0] {
        let keys: Vec<&str> = first.keys().map(String::as_str).collect();
        builder.push_record(keys.clone());
        for item in arr {
            let record: Vec<String> = keys
                .iter()
                .map(|k| item.get(*k).map(format_value).unwrap_or_default())
                .collect();
            builder.push_record(record);
        }
    } else {
        for item in arr {
            builder.push_record([format_value(item)]);
        }
    }
    println!("{}", Table::from(builder));
}

/// Render a leaf value bare, without JSON quoting.
fn scalar(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn format_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Array(a) => format!("[{} items]", a.len()),
        Value::Object(_) => "{...}".to_string(),
        other => other.to_string(),
    }
}
