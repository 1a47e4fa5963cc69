use serde_json::Value;
use std::io::{self, Read};

/// Read a JSON (or YAML) document from stdin when data is being piped.
/// Returns None if stdin is a TTY (interactive) or empty.
pub fn read_stdin() -> Result<Option<Value>, Box<dyn std::error::Error>> {
    if atty::is(atty::Stream::Stdin) {
        return Ok(None);
    }

    let mut buffer = String::new();
    io::stdin().read_to_string(&mut buffer)?;
    parse_document(&buffer)
}

fn parse_document(buffer: &str) -> Result<Option<Value>, Box<dyn std::error::Error>> {
    let trimmed = buffer.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    match serde_json::from_str(trimmed) {
        Ok(value) => Ok(Some(value)),
        Err(json_err) => {
            log::debug!("stdin is not JSON ({json_err}), trying YAML");
            let value: Value = serde_yaml::from_str(trimmed)
                .map_err(|_| format!("Failed to parse stdin as JSON: {json_err}"))?;
            Ok(Some(value))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input_is_none() {
        assert!(parse_document("  \n").unwrap().is_none());
    }

    #[test]
    fn test_json_and_yaml_documents() {
        let json = parse_document(r#"{"monthly_rent": 900}"#).unwrap().unwrap();
        assert_eq!(json["monthly_rent"], 900);

        let yaml = parse_document("monthly_rent: 900\nregion: Madrid\n")
            .unwrap()
            .unwrap();
        assert_eq!(yaml["monthly_rent"], 900);
        assert_eq!(yaml["region"], "Madrid");
    }

    #[test]
    fn test_garbage_is_an_error() {
        assert!(parse_document("{ not: [valid").is_err());
    }
}
