//! Template-parameter assembly for environment creation and update
//!
//! Merges up to four sources in ascending priority: server-declared defaults,
//! the default set derived from a blueprint history, a caller-supplied JSON
//! file, and interactively collected values. The result travels as a
//! pre-serialized JSON blob nested inside the outer request payload.

use std::io::{BufRead, Write};
use std::path::PathBuf;

use log::debug;
use serde_json::{Map, Value};

use crate::api::model::{id_segment, Model, Scope};
use crate::api::prompt::{is_declaration, Prompter};
use crate::api::resolver::{find_first, list};
use crate::api::session::Session;
use crate::error::{OrchError, Result};

/// Parameter-source selection for one create/update invocation
#[derive(Debug, Clone, Default)]
pub struct ParameterOptions {
    /// Already-resolved blueprint ID to take the schema from; resolution
    /// happens once at the command layer
    pub blueprint_id: Option<Value>,
    /// Explicit blueprint history version; latest when absent
    pub version: Option<i64>,
    /// JSON file merged over the computed defaults
    pub parameter_file: Option<PathBuf>,
}

/// Deep-merge `over` onto `base`.
///
/// Objects merge key-recursively; at any other type boundary the overriding
/// value replaces the base outright (arrays are not concatenated). Keys absent
/// from `over` keep the base's value.
pub fn deep_merge(base: &Value, over: &Value) -> Value {
    match (base, over) {
        (Value::Object(base_map), Value::Object(over_map)) => {
            let mut merged = base_map.clone();
            for (key, over_value) in over_map {
                let merged_value = match merged.get(key) {
                    Some(base_value) => deep_merge(base_value, over_value),
                    None => over_value.clone(),
                };
                merged.insert(key.clone(), merged_value);
            }
            Value::Object(merged)
        }
        (_, over) => over.clone(),
    }
}

/// Build the final template-parameters JSON string.
///
/// With a parameter file the file is merged over the computed default
/// baseline; without one the values are collected interactively over the same
/// schema. No blueprint and no existing environment is the legitimate
/// create-time, no-history-yet path and yields `"{}"`.
pub async fn build_template_parameters<R: BufRead, W: Write>(
    session: &Session,
    environment_name: Option<&str>,
    options: &ParameterOptions,
    cloud_ids: &[Value],
    prompter: &mut Prompter<R, W>,
) -> Result<String> {
    let schema = match resolve_history(session, environment_name, options).await? {
        Some((blueprint_id, version)) => {
            fetch_parameter_schema(session, &blueprint_id, version, cloud_ids).await?
        }
        None => Value::Object(Map::new()),
    };

    let parameters = match &options.parameter_file {
        Some(path) => {
            let content = std::fs::read_to_string(path).map_err(|e| {
                OrchError::Io(format!("could not read parameter file {}: {}", path.display(), e))
            })?;
            let file_parameters: Value = serde_json::from_str(&content).map_err(|e| {
                OrchError::Json(format!("parameter file {}: {}", path.display(), e))
            })?;
            deep_merge(&default_parameters(&schema), &file_parameters)
        }
        None => prompter.collect(&schema)?,
    };

    Ok(serde_json::to_string(&parameters)?)
}

/// Resolve the `(blueprint_id, version)` pair the parameter schema hangs off.
///
/// Explicit version wins; otherwise the highest numeric version among the
/// blueprint's histories; otherwise the existing environment's current pair.
/// `None` means there is no history to fetch a schema from.
async fn resolve_history(
    session: &Session,
    environment_name: Option<&str>,
    options: &ParameterOptions,
) -> Result<Option<(Value, i64)>> {
    if let Some(blueprint_id) = &options.blueprint_id {
        let version = match options.version {
            Some(version) => Some(version),
            None => latest_history_version(session, blueprint_id).await?,
        };
        return Ok(version.map(|v| (blueprint_id.clone(), v)));
    }

    if let Some(name) = environment_name {
        let mut filter = Map::new();
        filter.insert("name".to_string(), Value::String(name.to_string()));
        if let Some(environment) = find_first(session, Model::Environment, &filter, None).await? {
            let blueprint_id = environment.get("blueprint_id").cloned();
            let version = environment.get("version").and_then(|v| v.as_i64());
            if let (Some(blueprint_id), Some(version)) = (blueprint_id, version) {
                return Ok(Some((blueprint_id, version)));
            }
        }
    }

    Ok(None)
}

/// Highest numeric `version` across a blueprint's histories, if any
async fn latest_history_version(session: &Session, blueprint_id: &Value) -> Result<Option<i64>> {
    let scope = Scope::new(Model::Blueprint, blueprint_id.clone());
    let histories = list(session, Model::BlueprintHistory, Some(&scope)).await?;
    let latest = histories
        .iter()
        .filter_map(|history| history.get("version").and_then(|v| v.as_i64()))
        .max();
    debug!("Latest history version for blueprint {}: {:?}", blueprint_id, latest);
    Ok(latest)
}

/// Fetch the declared parameter schema for one blueprint history
async fn fetch_parameter_schema(
    session: &Session,
    blueprint_id: &Value,
    version: i64,
    cloud_ids: &[Value],
) -> Result<Value> {
    let path = format!(
        "/blueprints/{}/histories/{}/parameters",
        id_segment(blueprint_id),
        version
    );

    let mut payload = Map::new();
    if !cloud_ids.is_empty() {
        let joined = cloud_ids
            .iter()
            .map(id_segment)
            .collect::<Vec<_>>()
            .join(",");
        payload.insert("cloud_ids".to_string(), Value::String(joined));
    }

    let response = session.get(&path, payload).await?;
    serde_json::from_str(&response.body)
        .map_err(|e| OrchError::Json(format!("parameter schema: {}", e)))
}

/// Extract the declared default of every leaf parameter, normalized into
/// `{"type": "static", "value": default}`. Parameters without a default are
/// omitted.
pub fn default_parameters(schema: &Value) -> Value {
    fn walk(node: &Value) -> Option<Value> {
        let entries = node.as_object()?;
        if is_declaration(node) {
            return entries.get("Default").filter(|d| !d.is_null()).map(|default| {
                let mut leaf = Map::new();
                leaf.insert("type".to_string(), Value::String("static".to_string()));
                leaf.insert("value".to_string(), default.clone());
                Value::Object(leaf)
            });
        }
        let mut collected = Map::new();
        for (key, child) in entries {
            if let Some(value) = walk(child) {
                collected.insert(key.clone(), value);
            }
        }
        Some(Value::Object(collected))
    }

    walk(schema).unwrap_or_else(|| Value::Object(Map::new()))
}
