use serde_json::Value;

use super::envelope_sections;

/// Bare key=value lines: the result fields only, no envelope noise.
pub fn print_minimal(value: &Value) {
    let sections = envelope_sections(value);
    if !sections.is_empty() {
        for (_, envelope) in sections {
            print_result_lines(envelope.get("result").unwrap_or(envelope));
        }
        return;
    }
    print_result_lines(value.get("result").unwrap_or(value));
}

fn print_result_lines(result: &Value) {
    match result {
        Value::Object(map) => {
            for (key, val) in map {
                match val {
                    Value::Object(inner) => {
                        // One level of nesting covers the qualification enums.
                        for (k, v) in inner {
                            print_leaf(&format!("{key}.{k}"), v);
                        }
                    }
                    other => print_leaf(key, other),
                }
            }
        }
        other => println!("{}", other),
    }
}

fn print_leaf(key: &str, value: &Value) {
    match value {
        Value::String(s) => println!("{key}={s}"),
        Value::Array(a) => println!("{key}=[{} items]", a.len()),
        Value::Object(_) => {}
        other => println!("{key}={other}"),
    }
}
