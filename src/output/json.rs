//! Raw JSON output

use std::io::Write;

use crate::error::Result;

/// Print the response body verbatim, as the server sent it
pub fn render_json<W: Write>(out: &mut W, body: &str) -> Result<()> {
    writeln!(out, "{}", body)?;
    Ok(())
}
