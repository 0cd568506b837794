//! Environment commands
//!
//! Environments are running instantiations of a blueprint version under a
//! system. Create and update assemble the template-parameters blob from the
//! blueprint's declared schema, a parameter file, and interactive input, then
//! ship it as a nested JSON string inside the request payload.

use std::io::{BufRead, Write};
use std::path::PathBuf;

use clap::{Args, Subcommand};
use serde_json::{json, Map, Value};

use crate::api::{
    build_template_parameters, collection_path, id_segment, resolve_name, stdio_prompter, Model,
    ParameterOptions, Prompter, Scope, Session,
};
use crate::cli::OutputFormat;
use crate::commands::{
    delete_record, list_records, payload, render_body, resolve_scope, show_record,
};
use crate::error::{OrchError, Result};

/// Default deployment priority for a cloud given without an explicit one
const DEFAULT_CLOUD_PRIORITY: i64 = 10;

#[derive(Subcommand, Debug)]
pub enum EnvironmentCommand {
    /// List environments, optionally for one system
    List {
        #[arg(long)]
        system: Option<String>,
    },
    /// Show one environment by name or ID
    Show { name: String },
    /// Create an environment
    Create(CreateArgs),
    /// Update an environment
    Update(UpdateArgs),
    /// Delete an environment
    Delete { name: String },
    /// Rebuild an environment from its blueprint
    Rebuild(RebuildArgs),
    /// List the deployment events of an environment
    EventList { name: String },
    /// Show one deployment event with its task breakdown
    EventShow { name: String, event_id: String },
}

#[derive(Args, Debug)]
pub struct CreateArgs {
    #[arg(long)]
    pub system: String,
    #[arg(long)]
    pub name: String,
    #[arg(long)]
    pub description: Option<String>,
    /// Blueprint to instantiate
    #[arg(long)]
    pub blueprint: Option<String>,
    /// Blueprint history version; latest when omitted
    #[arg(long)]
    pub version: Option<i64>,
    /// Deployment target cloud, as NAME or NAME:PRIORITY (repeatable)
    #[arg(long = "clouds")]
    pub clouds: Vec<String>,
    /// JSON file with template parameters; suppresses interactive prompts
    #[arg(long)]
    pub parameter_file: Option<PathBuf>,
    /// JSON file with free-form user attributes
    #[arg(long = "user-attributes")]
    pub user_attribute_file: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct UpdateArgs {
    pub name: String,
    #[arg(long)]
    pub description: Option<String>,
    /// Switch to a different blueprint
    #[arg(long)]
    pub blueprint: Option<String>,
    #[arg(long)]
    pub version: Option<i64>,
    #[arg(long)]
    pub parameter_file: Option<PathBuf>,
    #[arg(long = "user-attributes")]
    pub user_attribute_file: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct RebuildArgs {
    pub name: String,
    /// Rebuild from a different blueprint
    #[arg(long)]
    pub blueprint: Option<String>,
    #[arg(long)]
    pub version: Option<i64>,
    #[arg(long)]
    pub description: Option<String>,
    #[arg(long)]
    pub parameter_file: Option<PathBuf>,
}

/// Parse one `--clouds` entry of the form `NAME` or `NAME:PRIORITY`
fn parse_candidate(entry: &str) -> Result<(&str, i64)> {
    match entry.rsplit_once(':') {
        Some((name, priority)) => {
            let priority = priority.parse().map_err(|_| {
                OrchError::Config(format!(
                    "invalid cloud entry '{}': priority must be an integer",
                    entry
                ))
            })?;
            Ok((name, priority))
        }
        None => Ok((entry, DEFAULT_CLOUD_PRIORITY)),
    }
}

/// Resolve `--clouds` entries into `(candidates_attributes, cloud_ids)`
async fn resolve_candidates(
    session: &Session,
    entries: &[String],
) -> Result<(Vec<Value>, Vec<Value>)> {
    let mut candidates = Vec::new();
    let mut cloud_ids = Vec::new();
    for entry in entries {
        let (name, priority) = parse_candidate(entry)?;
        let cloud_id = resolve_name(session, Model::Cloud, name, None).await?;
        candidates.push(json!({"cloud_id": cloud_id, "priority": priority}));
        cloud_ids.push(cloud_id);
    }
    Ok((candidates, cloud_ids))
}

/// Read and re-serialize a user-attribute file, validating it is JSON
fn read_user_attributes(path: &PathBuf) -> Result<String> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        OrchError::Io(format!(
            "could not read user attribute file {}: {}",
            path.display(),
            e
        ))
    })?;
    let attributes: Value = serde_json::from_str(&content)
        .map_err(|e| OrchError::Json(format!("user attribute file {}: {}", path.display(), e)))?;
    Ok(serde_json::to_string(&attributes)?)
}

fn environment_path(id: &Value) -> String {
    format!(
        "{}/{}",
        collection_path(Model::Environment, None),
        id_segment(id)
    )
}

async fn create_environment<R: BufRead, W: Write>(
    session: &Session,
    args: &CreateArgs,
    format: OutputFormat,
    prompter: &mut Prompter<R, W>,
) -> Result<()> {
    let system_id = resolve_name(session, Model::System, &args.system, None).await?;
    let blueprint_id = match &args.blueprint {
        Some(blueprint) => Some(resolve_name(session, Model::Blueprint, blueprint, None).await?),
        None => None,
    };
    let (candidates, cloud_ids) = resolve_candidates(session, &args.clouds).await?;

    let options = ParameterOptions {
        blueprint_id: blueprint_id.clone(),
        version: args.version,
        parameter_file: args.parameter_file.clone(),
    };
    let template_parameters =
        build_template_parameters(session, None, &options, &cloud_ids, prompter).await?;
    let user_attributes = match &args.user_attribute_file {
        Some(path) => Some(read_user_attributes(path)?),
        None => None,
    };

    let response = session
        .post(
            &collection_path(Model::Environment, None),
            payload(json!({
                "system_id": system_id,
                "name": args.name,
                "description": args.description,
                "blueprint_id": blueprint_id,
                "version": args.version,
                "candidates_attributes": candidates,
                "template_parameters": template_parameters,
                "user_attributes": user_attributes,
            })),
        )
        .await?;
    render_body(&response.body, format, &[])
}

async fn update_environment<R: BufRead, W: Write>(
    session: &Session,
    args: &UpdateArgs,
    format: OutputFormat,
    prompter: &mut Prompter<R, W>,
) -> Result<()> {
    let id = resolve_name(session, Model::Environment, &args.name, None).await?;
    let blueprint_id = match &args.blueprint {
        Some(blueprint) => Some(resolve_name(session, Model::Blueprint, blueprint, None).await?),
        None => None,
    };

    let options = ParameterOptions {
        blueprint_id: blueprint_id.clone(),
        version: args.version,
        parameter_file: args.parameter_file.clone(),
    };
    let template_parameters =
        build_template_parameters(session, Some(&args.name), &options, &[], prompter).await?;
    let user_attributes = match &args.user_attribute_file {
        Some(path) => Some(read_user_attributes(path)?),
        None => None,
    };

    let response = session
        .put(
            &environment_path(&id),
            payload(json!({
                "description": args.description,
                "blueprint_id": blueprint_id,
                "version": args.version,
                "template_parameters": template_parameters,
                "user_attributes": user_attributes,
            })),
        )
        .await?;
    render_body(&response.body, format, &[])
}

async fn rebuild_environment<R: BufRead, W: Write>(
    session: &Session,
    args: &RebuildArgs,
    format: OutputFormat,
    prompter: &mut Prompter<R, W>,
) -> Result<()> {
    let id = resolve_name(session, Model::Environment, &args.name, None).await?;
    let blueprint_id = match &args.blueprint {
        Some(blueprint) => Some(resolve_name(session, Model::Blueprint, blueprint, None).await?),
        None => None,
    };

    let options = ParameterOptions {
        blueprint_id: blueprint_id.clone(),
        version: args.version,
        parameter_file: args.parameter_file.clone(),
    };
    let template_parameters =
        build_template_parameters(session, Some(&args.name), &options, &[], prompter).await?;

    let response = session
        .post(
            &format!("{}/rebuild", environment_path(&id)),
            payload(json!({
                "blueprint_id": blueprint_id,
                "version": args.version,
                "description": args.description,
                "template_parameters": template_parameters,
            })),
        )
        .await?;
    render_body(&response.body, format, &[])
}

pub async fn run(
    session: &Session,
    command: &EnvironmentCommand,
    format: OutputFormat,
) -> Result<()> {
    match command {
        EnvironmentCommand::List { system } => {
            let scope = resolve_scope(session, Model::System, system.as_deref()).await?;
            list_records(
                session,
                Model::Environment,
                scope.as_ref(),
                format,
                &["template_parameters"],
            )
            .await
        }
        EnvironmentCommand::Show { name } => {
            show_record(session, Model::Environment, name, None, format, &[]).await
        }
        EnvironmentCommand::Create(args) => {
            create_environment(session, args, format, &mut stdio_prompter()).await
        }
        EnvironmentCommand::Update(args) => {
            update_environment(session, args, format, &mut stdio_prompter()).await
        }
        EnvironmentCommand::Delete { name } => {
            delete_record(session, Model::Environment, name, None).await
        }
        EnvironmentCommand::Rebuild(args) => {
            rebuild_environment(session, args, format, &mut stdio_prompter()).await
        }
        EnvironmentCommand::EventList { name } => {
            let id = resolve_name(session, Model::Environment, name, None).await?;
            let scope = Scope::new(Model::Environment, id);
            list_records(session, Model::Event, Some(&scope), format, &[]).await
        }
        EnvironmentCommand::EventShow { name, event_id } => {
            let id = resolve_name(session, Model::Environment, name, None).await?;
            let path = format!("{}/events/{}", environment_path(&id), event_id);
            let response = session.get(&path, Map::new()).await?;
            render_body(&response.body, format, &[])
        }
    }
}
