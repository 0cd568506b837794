//! Cloud commands

use clap::Subcommand;
use serde_json::json;

use crate::api::{collection_path, id_segment, resolve_name, Model, Session};
use crate::cli::OutputFormat;
use crate::commands::{delete_record, list_records, payload, render_body, show_record};
use crate::error::Result;

#[derive(Subcommand, Debug)]
pub enum CloudCommand {
    /// List all clouds
    List,
    /// Show one cloud by name or ID
    Show { name: String },
    /// Register a cloud
    Create {
        #[arg(long)]
        name: String,
        /// Cloud driver (aws or openstack)
        #[arg(long = "type")]
        cloud_type: String,
        /// API entry point (region name or endpoint URL)
        #[arg(long)]
        entry_point: String,
        #[arg(long)]
        key: String,
        #[arg(long)]
        secret: String,
        /// OpenStack tenant name
        #[arg(long)]
        tenant_name: Option<String>,
        #[arg(long)]
        description: Option<String>,
    },
    /// Update a cloud
    Update {
        name: String,
        #[arg(long)]
        entry_point: Option<String>,
        #[arg(long)]
        key: Option<String>,
        #[arg(long)]
        secret: Option<String>,
        #[arg(long)]
        tenant_name: Option<String>,
        #[arg(long)]
        description: Option<String>,
    },
    /// Unregister a cloud
    Delete { name: String },
}

/// Credential fields never shown in rendered output
const SECRET_FIELDS: &[&str] = &["key", "secret"];

pub async fn run(session: &Session, command: &CloudCommand, format: OutputFormat) -> Result<()> {
    match command {
        CloudCommand::List => {
            list_records(session, Model::Cloud, None, format, SECRET_FIELDS).await
        }
        CloudCommand::Show { name } => {
            show_record(session, Model::Cloud, name, None, format, SECRET_FIELDS).await
        }
        CloudCommand::Create {
            name,
            cloud_type,
            entry_point,
            key,
            secret,
            tenant_name,
            description,
        } => {
            let response = session
                .post(
                    &collection_path(Model::Cloud, None),
                    payload(json!({
                        "name": name,
                        "type": cloud_type,
                        "entry_point": entry_point,
                        "key": key,
                        "secret": secret,
                        "tenant_name": tenant_name,
                        "description": description,
                    })),
                )
                .await?;
            render_body(&response.body, format, SECRET_FIELDS)
        }
        CloudCommand::Update {
            name,
            entry_point,
            key,
            secret,
            tenant_name,
            description,
        } => {
            let id = resolve_name(session, Model::Cloud, name, None).await?;
            let path = format!("{}/{}", collection_path(Model::Cloud, None), id_segment(&id));
            let response = session
                .put(
                    &path,
                    payload(json!({
                        "entry_point": entry_point,
                        "key": key,
                        "secret": secret,
                        "tenant_name": tenant_name,
                        "description": description,
                    })),
                )
                .await?;
            render_body(&response.body, format, SECRET_FIELDS)
        }
        CloudCommand::Delete { name } => delete_record(session, Model::Cloud, name, None).await,
    }
}
