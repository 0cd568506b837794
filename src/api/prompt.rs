//! Interactive collection of template parameters
//!
//! When no parameter file is given, the prompter walks the declared
//! parameters of each pattern and reads validated values from a line reader.
//! It is fully synchronous and performs no network calls; every value comes
//! from the already-fetched schema and local input.

use std::io::{self, BufRead, BufReader, Stderr, Stdin, Write};

use serde_json::{Map, Value};

use crate::error::{OrchError, Result};

/// Description prefix marking a server-computed parameter that must not be
/// prompted for.
const COMPUTED_MARKER: &str = "[computed]";

/// Walks a parameter schema and collects validated values from `input`.
pub struct Prompter<R, W> {
    input: R,
    output: W,
}

/// Prompter wired to the process's stdin/stderr
pub fn stdio_prompter() -> Prompter<BufReader<Stdin>, Stderr> {
    Prompter::new(BufReader::new(io::stdin()), io::stderr())
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Collect values for every declared parameter of every pattern, in
    /// schema order. Returns a tree shaped like the schema with parameter
    /// declarations replaced by their collected values.
    pub fn collect(&mut self, schema: &Value) -> Result<Value> {
        let patterns = match schema.as_object() {
            Some(patterns) => patterns,
            None => return Ok(Value::Object(Map::new())),
        };

        let mut tree = Map::new();
        for (pattern_name, declarations) in patterns {
            writeln!(self.output, "Input parameters of {}", pattern_name)?;
            let values = self.collect_group(declarations)?;
            tree.insert(pattern_name.clone(), values);
        }
        Ok(Value::Object(tree))
    }

    /// Collect one (possibly nested) group of parameter declarations
    fn collect_group(&mut self, declarations: &Value) -> Result<Value> {
        let entries = match declarations.as_object() {
            Some(entries) => entries,
            None => return Ok(Value::Object(Map::new())),
        };

        let mut values = Map::new();
        for (key, node) in entries {
            if is_declaration(node) {
                if is_computed(node) {
                    continue;
                }
                values.insert(key.clone(), self.collect_value(key, node)?);
            } else if node.is_object() {
                // Nested group (e.g. cloud_formation/terraform -> aws/openstack)
                values.insert(key.clone(), self.collect_group(node)?);
            }
        }
        Ok(Value::Object(values))
    }

    /// Prompt for a single parameter, looping until the value validates
    fn collect_value(&mut self, key: &str, declaration: &Value) -> Result<Value> {
        let description = declaration["Description"].as_str().unwrap_or("");
        let declared_type = declaration["Type"].as_str();
        let default = declaration.get("Default").filter(|d| !d.is_null());

        writeln!(self.output, "  {}: {}", key, description)?;

        loop {
            match default {
                Some(d) => write!(self.output, "  Default [{}] > ", display_value(d))?,
                None => write!(self.output, "  > ")?,
            }
            self.output.flush()?;

            let mut line = String::new();
            if self.input.read_line(&mut line)? == 0 {
                return Err(OrchError::Io(format!(
                    "input closed while reading parameter '{}'",
                    key
                )));
            }

            let trimmed = line.trim_end_matches(['\n', '\r']);
            let value = if trimmed.is_empty() {
                match default {
                    Some(d) => d.clone(),
                    None => Value::String(String::new()),
                }
            } else {
                Value::String(trimmed.to_string())
            };

            match validate(declared_type, &value) {
                Some(validated) => return Ok(validated),
                None => {
                    writeln!(
                        self.output,
                        "  Invalid {} value, try again",
                        declared_type.unwrap_or("")
                    )?;
                }
            }
        }
    }

    #[cfg(test)]
    pub fn into_parts(self) -> (R, W) {
        (self.input, self.output)
    }
}

/// Type-check one collected value against the declared parameter type.
///
/// Returns the (possibly coerced) value on success, `None` on failure:
/// `String` and `CommaDelimitedList` require a string-typed value, `Number`
/// requires an integer, anything else passes unconditionally.
pub(crate) fn validate(declared_type: Option<&str>, value: &Value) -> Option<Value> {
    match declared_type {
        Some("String") | Some("CommaDelimitedList") => {
            value.is_string().then(|| value.clone())
        }
        Some("Number") => match value {
            Value::Number(n) if n.is_i64() => Some(value.clone()),
            Value::String(s) => s.parse::<i64>().ok().map(|n| Value::Number(n.into())),
            _ => None,
        },
        _ => Some(value.clone()),
    }
}

/// True if this node is a parameter declaration rather than a nested group.
/// Shared with the default-baseline walk so both sides classify schema nodes
/// identically.
pub(crate) fn is_declaration(node: &Value) -> bool {
    node.is_object()
        && (node.get("Description").is_some()
            || node.get("Type").is_some()
            || node.get("Default").is_some())
}

fn is_computed(node: &Value) -> bool {
    node["Description"]
        .as_str()
        .map(|d| d.starts_with(COMPUTED_MARKER))
        .unwrap_or(false)
}

fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Cursor;

    fn collect_with_input(schema: Value, input: &str) -> (Result<Value>, String) {
        let mut prompter = Prompter::new(Cursor::new(input.to_string()), Vec::new());
        let result = prompter.collect(&schema);
        let (_, output) = prompter.into_parts();
        (result, String::from_utf8(output).unwrap())
    }

    #[test]
    fn test_collect_string_parameter() {
        let schema = json!({
            "web_pattern": {
                "KeyName": {"Description": "SSH key pair name", "Type": "String"}
            }
        });
        let (result, output) = collect_with_input(schema, "my-key\n");
        assert_eq!(
            result.unwrap(),
            json!({"web_pattern": {"KeyName": "my-key"}})
        );
        assert!(output.contains("Input parameters of web_pattern"));
        assert!(output.contains("KeyName: SSH key pair name"));
    }

    #[test]
    fn test_empty_line_substitutes_default() {
        let schema = json!({
            "web_pattern": {
                "InstanceType": {
                    "Description": "EC2 instance type",
                    "Type": "String",
                    "Default": "t2.small"
                }
            }
        });
        let (result, output) = collect_with_input(schema, "\n");
        assert_eq!(
            result.unwrap(),
            json!({"web_pattern": {"InstanceType": "t2.small"}})
        );
        assert!(output.contains("Default [t2.small]"));
    }

    #[test]
    fn test_number_validation_loops_until_integer() {
        let schema = json!({
            "db_pattern": {
                "NodeCount": {"Description": "Cluster size", "Type": "Number"}
            }
        });
        // Three invalid inputs, then a valid one, then a sentinel that must
        // remain unread: exactly four validation rounds.
        let input = "abc\ndef\nghi\n42\nsentinel\n";
        let mut prompter = Prompter::new(Cursor::new(input.to_string()), Vec::new());
        let result = prompter.collect(&json!(schema)).unwrap();
        assert_eq!(result, json!({"db_pattern": {"NodeCount": 42}}));

        let (mut reader, output) = prompter.into_parts();
        let mut rest = String::new();
        reader.read_line(&mut rest).unwrap();
        assert_eq!(rest, "sentinel\n");
        assert_eq!(String::from_utf8(output).unwrap().matches("Invalid").count(), 3);
    }

    #[test]
    fn test_computed_parameters_are_skipped() {
        let schema = json!({
            "web_pattern": {
                "SharedSecurityGroup": {
                    "Description": "[computed] filled in by the server",
                    "Type": "String"
                },
                "KeyName": {"Description": "SSH key pair name", "Type": "String"}
            }
        });
        let (result, _) = collect_with_input(schema, "my-key\n");
        assert_eq!(
            result.unwrap(),
            json!({"web_pattern": {"KeyName": "my-key"}})
        );
    }

    #[test]
    fn test_nested_groups_are_walked() {
        let schema = json!({
            "multi_pattern": {
                "terraform": {
                    "aws": {
                        "Region": {"Description": "Target region", "Type": "String"}
                    }
                }
            }
        });
        let (result, _) = collect_with_input(schema, "us-east-1\n");
        assert_eq!(
            result.unwrap(),
            json!({"multi_pattern": {"terraform": {"aws": {"Region": "us-east-1"}}}})
        );
    }

    #[test]
    fn test_untyped_parameter_passes_unconditionally() {
        let schema = json!({
            "p": {"Anything": {"Description": "free-form"}}
        });
        let (result, _) = collect_with_input(schema, "whatever\n");
        assert_eq!(result.unwrap(), json!({"p": {"Anything": "whatever"}}));
    }

    #[test]
    fn test_input_exhaustion_is_an_error() {
        let schema = json!({
            "p": {"K": {"Description": "d", "Type": "String"}}
        });
        let (result, _) = collect_with_input(schema, "");
        assert!(result.is_err());
    }

    #[test]
    fn test_empty_schema_collects_empty_tree() {
        let (result, output) = collect_with_input(json!({}), "");
        assert_eq!(result.unwrap(), json!({}));
        assert!(output.is_empty());
    }

    #[test]
    fn test_validate_string_accepts_strings_only() {
        assert!(validate(Some("String"), &json!("x")).is_some());
        assert!(validate(Some("String"), &json!(3)).is_none());
        assert!(validate(Some("CommaDelimitedList"), &json!("a,b")).is_some());
        assert!(validate(Some("CommaDelimitedList"), &json!(true)).is_none());
    }

    #[test]
    fn test_validate_number_parses_integers() {
        assert_eq!(validate(Some("Number"), &json!("42")), Some(json!(42)));
        assert_eq!(validate(Some("Number"), &json!(7)), Some(json!(7)));
        assert!(validate(Some("Number"), &json!("4.5")).is_none());
        assert!(validate(Some("Number"), &json!("abc")).is_none());
    }

    #[test]
    fn test_validate_unknown_type_passes() {
        assert!(validate(Some("Json"), &json!("x")).is_some());
        assert!(validate(None, &json!(3)).is_some());
    }
}
