//! Response rendering
//!
//! A response body is either echoed as raw JSON or parsed and laid out as a
//! compact table: arrays become list views, objects become vertical detail
//! views, scalars print directly.

mod json;
mod table;

use std::io::Write;

use serde_json::Value;

use crate::cli::OutputFormat;
use crate::error::{OrchError, Result};

pub use self::json::render_json;
pub use self::table::{render_detail, render_list, stringify, verticalize};

/// Render a response body in the requested format, dropping excluded keys
/// first. A body that fails to parse as JSON when a table was requested is a
/// fatal rendering error carrying the raw body.
pub fn render<W: Write>(
    out: &mut W,
    body: &str,
    format: OutputFormat,
    exclude: &[&str],
) -> Result<()> {
    match format {
        OutputFormat::Json => render_json(out, body),
        OutputFormat::Table => {
            let mut parsed: Value = serde_json::from_str(body).map_err(|_| {
                OrchError::MalformedResponse {
                    body: body.to_string(),
                }
            })?;
            exclude_keys(&mut parsed, exclude);
            match &parsed {
                Value::Array(records) => render_list(out, records),
                Value::Object(_) => render_detail(out, &parsed),
                scalar => {
                    writeln!(out, "{}", stringify(scalar))?;
                    Ok(())
                }
            }
        }
    }
}

/// Render to stdout
pub fn render_to_stdout(body: &str, format: OutputFormat, exclude: &[&str]) -> Result<()> {
    render(&mut std::io::stdout(), body, format, exclude)
}

/// Drop named keys before rendering: element-wise for arrays, directly for
/// objects. Other shapes are left alone.
fn exclude_keys(value: &mut Value, exclude: &[&str]) {
    if exclude.is_empty() {
        return;
    }
    match value {
        Value::Object(fields) => {
            for key in exclude {
                fields.remove(*key);
            }
        }
        Value::Array(items) => {
            for item in items {
                exclude_keys(item, exclude);
            }
        }
        _ => {}
    }
}
