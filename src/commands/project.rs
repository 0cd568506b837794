//! Project commands

use clap::Subcommand;
use serde_json::json;

use crate::api::{Model, Session};
use crate::cli::OutputFormat;
use crate::commands::{
    create_record, delete_record, list_records, payload, show_record, update_record,
};
use crate::error::Result;

#[derive(Subcommand, Debug)]
pub enum ProjectCommand {
    /// List all projects
    List,
    /// Show one project by name or ID
    Show { name: String },
    /// Create a project
    Create {
        #[arg(long)]
        name: String,
        #[arg(long)]
        description: Option<String>,
    },
    /// Update a project
    Update {
        name: String,
        #[arg(long)]
        description: Option<String>,
    },
    /// Delete a project
    Delete { name: String },
}

pub async fn run(session: &Session, command: &ProjectCommand, format: OutputFormat) -> Result<()> {
    match command {
        ProjectCommand::List => list_records(session, Model::Project, None, format, &[]).await,
        ProjectCommand::Show { name } => {
            show_record(session, Model::Project, name, None, format, &[]).await
        }
        ProjectCommand::Create { name, description } => {
            create_record(
                session,
                Model::Project,
                payload(json!({"name": name, "description": description})),
                format,
            )
            .await
        }
        ProjectCommand::Update { name, description } => {
            update_record(
                session,
                Model::Project,
                name,
                None,
                payload(json!({"description": description})),
                format,
            )
            .await
        }
        ProjectCommand::Delete { name } => {
            delete_record(session, Model::Project, name, None).await
        }
    }
}
