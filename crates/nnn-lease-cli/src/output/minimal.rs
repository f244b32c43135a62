use serde_json::Value;

use super::{format_scalar, result_of};

/// Headline figures, most specific first.
const PRIORITY_KEYS: [&str; 6] = [
    "full_term_noi",
    "net_effective_rent",
    "total_commission",
    "gross_monthly_rent",
    "total_net_rent",
    "term_length_in_months",
];

/// Print just the headline number of a result.
pub fn print_minimal(value: &Value) {
    println!("{}", headline(value));
}

fn headline(value: &Value) -> String {
    let result = result_of(value);
    // a full report carries its headline figures under "analysis"
    let result = result.get("analysis").unwrap_or(result);

    if let Value::Object(map) = result {
        if let Some(val) = PRIORITY_KEYS
            .iter()
            .filter_map(|k| map.get(*k))
            .find(|v| !v.is_null())
        {
            return format_scalar(val);
        }
        if let Some((key, val)) = map.iter().next() {
            return format!("{}: {}", key, format_scalar(val));
        }
    }
    format_scalar(result)
}
