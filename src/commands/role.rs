//! Role commands

use clap::Subcommand;
use serde_json::json;

use crate::api::{resolve_name, Model, Scope, Session};
use crate::cli::OutputFormat;
use crate::commands::{
    create_record, delete_record, list_records, payload, show_record, update_record,
};
use crate::error::Result;

#[derive(Subcommand, Debug)]
pub enum RoleCommand {
    /// List all roles
    List,
    /// Show one role by name or ID
    Show { name: String },
    /// Create a role
    Create {
        #[arg(long)]
        name: String,
        #[arg(long)]
        description: Option<String>,
    },
    /// Update a role
    Update {
        name: String,
        #[arg(long)]
        description: Option<String>,
    },
    /// Delete a role
    Delete { name: String },
    /// List the permissions granted to a role
    PermissionList { name: String },
}

pub async fn run(session: &Session, command: &RoleCommand, format: OutputFormat) -> Result<()> {
    match command {
        RoleCommand::List => list_records(session, Model::Role, None, format, &[]).await,
        RoleCommand::Show { name } => {
            show_record(session, Model::Role, name, None, format, &[]).await
        }
        RoleCommand::Create { name, description } => {
            create_record(
                session,
                Model::Role,
                payload(json!({"name": name, "description": description})),
                format,
            )
            .await
        }
        RoleCommand::Update { name, description } => {
            update_record(
                session,
                Model::Role,
                name,
                None,
                payload(json!({"description": description})),
                format,
            )
            .await
        }
        RoleCommand::Delete { name } => delete_record(session, Model::Role, name, None).await,
        RoleCommand::PermissionList { name } => {
            let role_id = resolve_name(session, Model::Role, name, None).await?;
            let scope = Scope::new(Model::Role, role_id);
            list_records(session, Model::Permission, Some(&scope), format, &[]).await
        }
    }
}
