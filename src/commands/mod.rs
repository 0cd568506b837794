//! Per-resource command definitions
//!
//! Thin call sites over the api core. Every verb follows the same four-step
//! pattern: resolve names to IDs, assemble a payload from flags, perform the
//! request, render the response.

pub mod account;
pub mod application;
pub mod assignment;
pub mod audit;
pub mod base_image;
pub mod blueprint;
pub mod cloud;
pub mod environment;
pub mod pattern;
pub mod project;
pub mod role;
pub mod system;

use serde_json::{Map, Value};

use crate::api::{collection_path, id_segment, resolve_name, Model, Scope, Session};
use crate::cli::OutputFormat;
use crate::error::Result;
use crate::output::render_to_stdout;

/// Coerce a `json!` object literal into a payload map
pub(crate) fn payload(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}

/// Render a response body, skipping empty bodies (204-style responses)
pub(crate) fn render_body(body: &str, format: OutputFormat, exclude: &[&str]) -> Result<()> {
    if body.trim().is_empty() {
        return Ok(());
    }
    render_to_stdout(body, format, exclude)
}

/// `GET /{plural}` (optionally scoped) and render the list
pub(crate) async fn list_records(
    session: &Session,
    model: Model,
    scope: Option<&Scope>,
    format: OutputFormat,
    exclude: &[&str],
) -> Result<()> {
    let response = session.get(&collection_path(model, scope), Map::new()).await?;
    render_body(&response.body, format, exclude)
}

/// Resolve a name and `GET /{plural}/{id}`
pub(crate) async fn show_record(
    session: &Session,
    model: Model,
    name: &str,
    scope: Option<&Scope>,
    format: OutputFormat,
    exclude: &[&str],
) -> Result<()> {
    let id = resolve_name(session, model, name, scope).await?;
    let path = format!("{}/{}", collection_path(model, None), id_segment(&id));
    let response = session.get(&path, Map::new()).await?;
    render_body(&response.body, format, exclude)
}

/// `POST /{plural}` and render the created record
pub(crate) async fn create_record(
    session: &Session,
    model: Model,
    body: Map<String, Value>,
    format: OutputFormat,
) -> Result<()> {
    let response = session.post(&collection_path(model, None), body).await?;
    render_body(&response.body, format, &[])
}

/// Resolve a name and `PUT /{plural}/{id}`
pub(crate) async fn update_record(
    session: &Session,
    model: Model,
    name: &str,
    scope: Option<&Scope>,
    body: Map<String, Value>,
    format: OutputFormat,
) -> Result<()> {
    let id = resolve_name(session, model, name, scope).await?;
    let path = format!("{}/{}", collection_path(model, None), id_segment(&id));
    let response = session.put(&path, body).await?;
    render_body(&response.body, format, &[])
}

/// Resolve a name and `DELETE /{plural}/{id}`
pub(crate) async fn delete_record(
    session: &Session,
    model: Model,
    name: &str,
    scope: Option<&Scope>,
) -> Result<()> {
    let id = resolve_name(session, model, name, scope).await?;
    let path = format!("{}/{}", collection_path(model, None), id_segment(&id));
    session.delete(&path, Map::new()).await?;
    println!("Deleted {} '{}'", model.label(), name);
    Ok(())
}

/// Resolve a parent name into a list scope
pub(crate) async fn resolve_scope(
    session: &Session,
    parent: Model,
    name: Option<&str>,
) -> Result<Option<Scope>> {
    match name {
        Some(name) => {
            let id = resolve_name(session, parent, name, None).await?;
            Ok(Some(Scope::new(parent, id)))
        }
        None => Ok(None),
    }
}
