use serde_json::{Map, Value};
use std::io;

/// Write output as CSV to stdout.
///
/// A result holding a single series (the projection points) is written one
/// row per period. Anything else becomes two-column `field,value` rows with
/// nested fields flattened to dotted keys (`investment.net_yield`,
/// `projection.0.cumulative_cash_flow`).
pub fn print_csv(value: &Value) {
    let stdout = io::stdout();
    let mut wtr = csv::Writer::from_writer(stdout.lock());

    let result = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    let written = match result {
        Value::Array(arr) => write_rows(&mut wtr, arr),
        Value::Object(map) => match single_series(map) {
            Some(series) => write_rows(&mut wtr, series),
            None => write_fields(&mut wtr, result),
        },
        _ => wtr.write_record([format_csv_value(result)]),
    };

    if let Err(e) = written.and_then(|_| wtr.flush().map_err(csv::Error::from)) {
        log::error!("failed to write CSV: {e}");
    }
}

/// The one array of objects in a result whose other fields are all scalars.
fn single_series(map: &Map<String, Value>) -> Option<&[Value]> {
    let mut series = None;
    for val in map.values() {
        match val {
            Value::Array(arr) if arr.first().is_some_and(Value::is_object) => {
                if series.is_some() {
                    return None;
                }
                series = Some(arr.as_slice());
            }
            Value::Array(_) | Value::Object(_) => return None,
            _ => {}
        }
    }
    series
}

fn write_rows<W: io::Write>(wtr: &mut csv::Writer<W>, arr: &[Value]) -> csv::Result<()> {
    let Some(Value::Object(first)) = arr.first() else {
        for item in arr {
            wtr.write_record([format_csv_value(item)])?;
        }
        return Ok(());
    };

    let headers: Vec<&str> = first.keys().map(String::as_str).collect();
    wtr.write_record(&headers)?;
    for map in arr.iter().filter_map(Value::as_object) {
        let row: Vec<String> = headers
            .iter()
            .map(|h| map.get(*h).map(format_csv_value).unwrap_or_default())
            .collect();
        wtr.write_record(&row)?;
    }
    Ok(())
}

fn write_fields<W: io::Write>(wtr: &mut csv::Writer<W>, value: &Value) -> csv::Result<()> {
    let mut rows = Vec::new();
    flatten("", value, &mut rows);
    wtr.write_record(["field", "value"])?;
    for (key, val) in rows {
        wtr.write_record([key, val])?;
    }
    Ok(())
}

fn flatten(prefix: &str, value: &Value, rows: &mut Vec<(String, String)>) {
    let join = |key: &str| {
        if prefix.is_empty() {
            key.to_string()
        } else {
            format!("{prefix}.{key}")
        }
    };
    match value {
        Value::Object(map) => {
            for (key, val) in map {
                flatten(&join(key), val, rows);
            }
        }
        Value::Array(arr) if arr.iter().any(|v| v.is_object() || v.is_array()) => {
            for (i, val) in arr.iter().enumerate() {
                flatten(&join(&i.to_string()), val, rows);
            }
        }
        _ => rows.push((prefix.to_string(), format_csv_value(value))),
    }
}

fn format_csv_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        Value::Array(arr) => arr
            .iter()
            .map(format_csv_value)
            .collect::<Vec<_>>()
            .join(";"),
        Value::Object(_) => serde_json::to_string(value).unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn render(f: impl FnOnce(&mut csv::Writer<Vec<u8>>) -> csv::Result<()>) -> String {
        let mut wtr = csv::Writer::from_writer(Vec::new());
        f(&mut wtr).unwrap();
        String::from_utf8(wtr.into_inner().unwrap()).unwrap()
    }

    #[test]
    fn test_nested_fields_use_dotted_keys() {
        let value = json!({
            "investment": {"net_yield": "0.05"},
            "projection": [{"year": 1, "period_cash_flow": "1200"}]
        });
        let out = render(|w| write_fields(w, &value));
        assert_eq!(
            out,
            "field,value\ninvestment.net_yield,0.05\nprojection.0.period_cash_flow,1200\nprojection.0.year,1\n"
        );
    }

    #[test]
    fn test_projection_series_written_as_rows() {
        let value = json!({
            "points": [
                {"period_label": "Year 1", "year": 1},
                {"period_label": "Year 2", "year": 2}
            ],
            "total_cash_flow": "2424"
        });
        let series = single_series(value.as_object().unwrap()).unwrap();
        let out = render(|w| write_rows(w, series));
        assert_eq!(out, "period_label,year\nYear 1,1\nYear 2,2\n");
    }

    #[test]
    fn test_mixed_sections_are_not_a_series() {
        let value = json!({"investment": {}, "projection": [{"year": 1}]});
        assert!(single_series(value.as_object().unwrap()).is_none());
    }
}
