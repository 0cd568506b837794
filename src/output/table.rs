//! Compact table rendering for list and detail views

use std::io::Write;

use comfy_table::{presets::NOTHING, Table};
use serde_json::Value;

use crate::config::render::{ELLIPSIS, MAX_CELL_WIDTH};
use crate::error::Result;

/// Render a JSON array as a list table keyed by the first record's fields.
///
/// Field order follows the first record's key order; later records only
/// contribute values for those fields. An empty array prints "No records"
/// and no table.
pub fn render_list<W: Write>(out: &mut W, records: &[Value]) -> Result<()> {
    let first = match records.first().and_then(|r| r.as_object()) {
        Some(first) => first,
        None => {
            writeln!(out, "No records")?;
            return Ok(());
        }
    };

    let headers: Vec<String> = first.keys().cloned().collect();

    let mut table = Table::new();
    table.load_preset(NOTHING).set_header(headers.clone());

    for record in records {
        let row: Vec<String> = headers
            .iter()
            .map(|key| stringify(record.get(key).unwrap_or(&Value::Null)))
            .collect();
        table.add_row(row);
    }

    writeln!(out, "{}", table)?;
    Ok(())
}

/// Render a JSON object as a vertical two-column detail table, one
/// property/value pair per key, in the object's key order.
pub fn render_detail<W: Write>(out: &mut W, record: &Value) -> Result<()> {
    let fields = match record.as_object() {
        Some(fields) => fields,
        None => return Ok(()),
    };

    let mut table = Table::new();
    table.load_preset(NOTHING).set_header(vec!["Property", "Value"]);

    for (key, value) in fields {
        table.add_row(vec![key.clone(), stringify(value)]);
    }

    writeln!(out, "{}", table)?;
    Ok(())
}

/// Verticalize an object into ordered `(property, value)` pairs
pub fn verticalize(record: &Value) -> Vec<(String, String)> {
    match record.as_object() {
        Some(fields) => fields
            .iter()
            .map(|(key, value)| (key.clone(), stringify(value)))
            .collect(),
        None => Vec::new(),
    }
}

/// Stringify one cell value: booleans become literal text, nulls become
/// empty, composites collapse to compact JSON, newlines become escape
/// sequences, and long text is truncated at a whitespace boundary.
pub fn stringify(value: &Value) -> String {
    let text = match value {
        Value::Null => String::new(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.clone(),
        composite => serde_json::to_string(composite).unwrap_or_default(),
    };
    truncate(&text.replace('\n', "\\n"))
}

/// Shorten text over the width limit at a whitespace boundary, never mid-word
/// when a boundary exists, and append the ellipsis marker.
fn truncate(text: &str) -> String {
    if text.chars().count() <= MAX_CELL_WIDTH {
        return text.to_string();
    }

    let prefix: String = text.chars().take(MAX_CELL_WIDTH).collect();
    let head = match prefix.rfind(char::is_whitespace) {
        Some(boundary) => prefix[..boundary].trim_end(),
        None => &prefix,
    };
    format!("{}{}", head, ELLIPSIS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn rendered_list(records: Value) -> String {
        let mut out = Vec::new();
        render_list(&mut out, records.as_array().unwrap()).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_empty_list_prints_no_records() {
        assert_eq!(rendered_list(json!([])), "No records\n");
    }

    #[test]
    fn test_list_headers_follow_first_record_key_order() {
        let output = rendered_list(json!([
            {"id": 1, "name": "alpha", "active": true},
            {"id": 2, "name": "beta", "active": false}
        ]));
        let header_line = output.lines().next().unwrap();
        let id_pos = header_line.find("id").unwrap();
        let name_pos = header_line.find("name").unwrap();
        let active_pos = header_line.find("active").unwrap();
        assert!(id_pos < name_pos && name_pos < active_pos);
        assert!(output.contains("alpha"));
        assert!(output.contains("false"));
    }

    #[test]
    fn test_list_missing_keys_render_empty() {
        let output = rendered_list(json!([
            {"id": 1, "name": "alpha"},
            {"id": 2}
        ]));
        assert!(output.contains("alpha"));
        assert!(output.lines().count() >= 3);
    }

    #[test]
    fn test_detail_verticalizes_in_key_order() {
        let pairs = verticalize(&json!({"name": "x", "active": false}));
        assert_eq!(
            pairs,
            vec![
                ("name".to_string(), "x".to_string()),
                ("active".to_string(), "false".to_string())
            ]
        );
    }

    #[test]
    fn test_render_detail_has_property_value_header() {
        let mut out = Vec::new();
        render_detail(&mut out, &json!({"name": "x"})).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Property"));
        assert!(text.contains("Value"));
        assert!(text.contains("name"));
        assert!(text.contains('x'));
    }

    #[test]
    fn test_stringify_booleans_and_null() {
        assert_eq!(stringify(&json!(true)), "true");
        assert_eq!(stringify(&json!(false)), "false");
        assert_eq!(stringify(&Value::Null), "");
    }

    #[test]
    fn test_stringify_escapes_newlines() {
        assert_eq!(stringify(&json!("line1\nline2")), "line1\\nline2");
    }

    #[test]
    fn test_stringify_composites_as_compact_json() {
        assert_eq!(stringify(&json!({"a": 1})), r#"{"a":1}"#);
        assert_eq!(stringify(&json!([1, 2])), "[1,2]");
    }

    #[test]
    fn test_truncation_at_whitespace_boundary() {
        let words = "word ".repeat(30);
        let truncated = stringify(&json!(words));
        assert!(truncated.len() < words.len());
        assert!(truncated.ends_with("..."));
        // Never cut mid-word: strip the marker and every piece is intact
        let body = truncated.trim_end_matches("...");
        assert!(body.split(' ').all(|w| w.is_empty() || w == "word"));
    }

    #[test]
    fn test_truncation_without_whitespace_falls_back_to_hard_cut() {
        let long = "x".repeat(120);
        let truncated = stringify(&json!(long));
        assert!(truncated.ends_with("..."));
        assert_eq!(truncated.len(), 80 + 3);
    }

    #[test]
    fn test_short_text_is_untouched() {
        let text = "short enough";
        assert_eq!(stringify(&json!(text)), text);
    }

    #[test]
    fn test_exactly_80_chars_is_untouched() {
        let text = "y".repeat(80);
        assert_eq!(stringify(&json!(text.clone())), text);
    }
}
