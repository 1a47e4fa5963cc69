use serde_json::Value;

/// Key answer fields, most important first. Searched in the result and then
/// one level down (e.g. `result.investment.monthly_cash_flow`).
const PRIORITY_KEYS: [&str; 6] = [
    "monthly_cash_flow",
    "total_cash_flow",
    "tax_rate",
    "net_yield",
    "gross_yield",
    "default_tax_rate",
];

/// Print just the key answer value from the output.
pub fn print_minimal(value: &Value) {
    println!("{}", minimal_answer(value));
}

fn minimal_answer(value: &Value) -> String {
    let result_obj = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    let Value::Object(map) = result_obj else {
        return format_minimal(result_obj);
    };

    for key in PRIORITY_KEYS {
        if let Some(val) = map.get(key).filter(|v| !v.is_null()) {
            return format_minimal(val);
        }
    }
    for key in PRIORITY_KEYS {
        let nested = map
            .values()
            .filter_map(Value::as_object)
            .find_map(|inner| inner.get(key).filter(|v| !v.is_null()));
        if let Some(val) = nested {
            return format_minimal(val);
        }
    }

    match map.iter().next() {
        Some((key, val)) => format!("{}: {}", key, format_minimal(val)),
        None => String::new(),
    }
}

fn format_minimal(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        _ => serde_json::to_string(value).unwrap_or_default(),
    }
}
