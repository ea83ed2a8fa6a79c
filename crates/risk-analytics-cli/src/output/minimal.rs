use serde_json::Value;

use super::format_cell;

/// Headline figure of each command, in priority order.
const PRIORITY_KEYS: [&str; 8] = [
    "overall_risk_rating",
    "simulated_var",
    "available_capacity",
    "herfindahl_index",
    "lcr",
    "liquidation_risk",
    "net_borrowing_base",
    "id",
];

/// Print just the key answer value from the output.
///
/// Looks for well-known fields in priority order, then falls back to the
/// first field. Result arrays print one line per element.
pub fn print_minimal(value: &Value) {
    if let Some(Value::Array(results)) = value.get("results") {
        for item in results {
            println!("{}", headline(item));
        }
        return;
    }

    let result_obj = value.get("result").unwrap_or(value);
    println!("{}", headline(result_obj));
}

fn headline(value: &Value) -> String {
    let Value::Object(map) = value else {
        return format_cell(value);
    };

    for key in PRIORITY_KEYS {
        if let Some(val) = map.get(key) {
            if !val.is_null() {
                return format_cell(val);
            }
        }
    }

    map.iter()
        .next()
        .map(|(key, val)| format!("{}: {}", key, format_cell(val)))
        .unwrap_or_default()
}
