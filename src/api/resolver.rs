//! Name-to-ID resolution over the Conductor API
//!
//! Every subcommand accepts either a human-readable name or a raw numeric ID
//! for its resource arguments. Resolution is a list-and-filter pass over the
//! model's collection; a miss is deliberately not an error — the original
//! value is passed through unchanged and the subsequent API call surfaces the
//! failure (typically as a 404).

use log::debug;
use serde_json::{Map, Value};

use crate::api::model::{collection_path, Model, Scope};
use crate::api::session::Session;
use crate::error::{OrchError, Result};

/// A transient view over one server record; always carries an `id` field
/// once retrieved.
pub type Record = Map<String, Value>;

/// List all records of a model, optionally constrained to a parent scope.
pub async fn list(session: &Session, model: Model, scope: Option<&Scope>) -> Result<Vec<Record>> {
    let path = collection_path(model, scope);
    let response = session.get(&path, Map::new()).await?;

    let parsed: Value = serde_json::from_str(&response.body)
        .map_err(|e| OrchError::Json(format!("{} list: {}", model.label(), e)))?;

    match parsed {
        Value::Array(items) => Ok(items
            .into_iter()
            .filter_map(|item| match item {
                Value::Object(record) => Some(record),
                _ => None,
            })
            .collect()),
        other => Err(OrchError::Json(format!(
            "{} list: expected a JSON array, got {}",
            model.label(),
            json_type_name(&other)
        ))),
    }
}

/// First record whose fields match every key/value in the filter, in
/// server-returned order. No secondary sort is applied.
pub async fn find_first(
    session: &Session,
    model: Model,
    filter: &Map<String, Value>,
    scope: Option<&Scope>,
) -> Result<Option<Record>> {
    let records = list(session, model, scope).await?;
    Ok(records
        .into_iter()
        .find(|record| filter.iter().all(|(k, v)| record.get(k) == Some(v))))
}

/// Resolve a name to the matching record's `id`.
///
/// When no record matches, the original value is returned unchanged so that
/// callers may pass a raw ID in place of a name. This conflates "not found"
/// with "already an ID"; a name colliding with a valid numeric ID string is a
/// known ambiguity and is resolved in the server's favor.
pub async fn resolve_id(
    session: &Session,
    model: Model,
    key: &str,
    value: &Value,
    scope: Option<&Scope>,
) -> Result<Value> {
    let mut filter = Map::new();
    filter.insert(key.to_string(), value.clone());

    match find_first(session, model, &filter, scope).await? {
        Some(record) => {
            let id = record.get("id").cloned().unwrap_or_else(|| value.clone());
            debug!("Resolved {} {}={} to id {}", model.label(), key, value, id);
            Ok(id)
        }
        None => {
            debug!(
                "No {} with {}={}; passing value through",
                model.label(),
                key,
                value
            );
            Ok(value.clone())
        }
    }
}

/// Resolve a name given as a plain string (the common CLI argument case)
pub async fn resolve_name(
    session: &Session,
    model: Model,
    name: &str,
    scope: Option<&Scope>,
) -> Result<Value> {
    resolve_id(session, model, "name", &Value::String(name.to_string()), scope).await
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
