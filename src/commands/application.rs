//! Application commands
//!
//! Applications are deployable artifacts registered under a system. Deploy
//! pushes the latest registered version to an environment.

use clap::Subcommand;
use serde_json::{json, Map};

use crate::api::{collection_path, id_segment, resolve_name, Model, Scope, Session};
use crate::cli::OutputFormat;
use crate::commands::{
    delete_record, list_records, payload, render_body, resolve_scope, show_record, update_record,
};
use crate::error::Result;

#[derive(Subcommand, Debug)]
pub enum ApplicationCommand {
    /// List applications, optionally for one system
    List {
        #[arg(long)]
        system: Option<String>,
    },
    /// Show one application by name or ID
    Show { name: String },
    /// Register an application under a system
    Create {
        #[arg(long)]
        system: String,
        #[arg(long)]
        name: String,
        /// Artifact location (git or package URL)
        #[arg(long)]
        url: String,
        #[arg(long)]
        revision: Option<String>,
        #[arg(long)]
        description: Option<String>,
    },
    /// Update an application
    Update {
        name: String,
        #[arg(long)]
        url: Option<String>,
        #[arg(long)]
        revision: Option<String>,
        #[arg(long)]
        description: Option<String>,
    },
    /// Delete an application
    Delete { name: String },
    /// List the registered versions of an application
    HistoryList { name: String },
    /// Deploy the latest version to an environment
    Deploy {
        name: String,
        #[arg(long)]
        environment: String,
    },
    /// Promote the deployed version to serve production traffic
    Release { name: String },
}

pub async fn run(
    session: &Session,
    command: &ApplicationCommand,
    format: OutputFormat,
) -> Result<()> {
    match command {
        ApplicationCommand::List { system } => {
            let scope = resolve_scope(session, Model::System, system.as_deref()).await?;
            list_records(session, Model::Application, scope.as_ref(), format, &[]).await
        }
        ApplicationCommand::Show { name } => {
            show_record(session, Model::Application, name, None, format, &[]).await
        }
        ApplicationCommand::Create {
            system,
            name,
            url,
            revision,
            description,
        } => {
            let system_id = resolve_name(session, Model::System, system, None).await?;
            let response = session
                .post(
                    &collection_path(Model::Application, None),
                    payload(json!({
                        "system_id": system_id,
                        "name": name,
                        "url": url,
                        "revision": revision,
                        "description": description,
                    })),
                )
                .await?;
            render_body(&response.body, format, &[])
        }
        ApplicationCommand::Update {
            name,
            url,
            revision,
            description,
        } => {
            update_record(
                session,
                Model::Application,
                name,
                None,
                payload(json!({
                    "url": url,
                    "revision": revision,
                    "description": description,
                })),
                format,
            )
            .await
        }
        ApplicationCommand::Delete { name } => {
            delete_record(session, Model::Application, name, None).await
        }
        ApplicationCommand::HistoryList { name } => {
            let id = resolve_name(session, Model::Application, name, None).await?;
            let scope = Scope::new(Model::Application, id);
            list_records(session, Model::ApplicationHistory, Some(&scope), format, &[]).await
        }
        ApplicationCommand::Deploy { name, environment } => {
            let id = resolve_name(session, Model::Application, name, None).await?;
            let environment_id =
                resolve_name(session, Model::Environment, environment, None).await?;
            let path = format!(
                "{}/{}/deploy",
                collection_path(Model::Application, None),
                id_segment(&id)
            );
            let mut body = Map::new();
            body.insert("environment_id".to_string(), environment_id);
            let response = session.post(&path, body).await?;
            render_body(&response.body, format, &[])
        }
        ApplicationCommand::Release { name } => {
            let id = resolve_name(session, Model::Application, name, None).await?;
            let path = format!(
                "{}/{}/release",
                collection_path(Model::Application, None),
                id_segment(&id)
            );
            let response = session.post(&path, Map::new()).await?;
            render_body(&response.body, format, &[])
        }
    }
}
