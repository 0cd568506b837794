//! Pattern commands

use clap::Subcommand;
use serde_json::json;

use crate::api::{Model, Session};
use crate::cli::OutputFormat;
use crate::commands::{
    create_record, delete_record, list_records, payload, show_record, update_record,
};
use crate::error::Result;

#[derive(Subcommand, Debug)]
pub enum PatternCommand {
    /// List all patterns
    List,
    /// Show one pattern by name or ID
    Show { name: String },
    /// Register a pattern from a git repository
    Create {
        /// Git repository URL
        #[arg(long)]
        url: String,
        /// Branch, tag, or commit to check out
        #[arg(long)]
        revision: Option<String>,
    },
    /// Update a pattern
    Update {
        name: String,
        #[arg(long)]
        url: Option<String>,
        #[arg(long)]
        revision: Option<String>,
    },
    /// Delete a pattern
    Delete { name: String },
}

pub async fn run(session: &Session, command: &PatternCommand, format: OutputFormat) -> Result<()> {
    match command {
        PatternCommand::List => list_records(session, Model::Pattern, None, format, &[]).await,
        PatternCommand::Show { name } => {
            show_record(session, Model::Pattern, name, None, format, &[]).await
        }
        PatternCommand::Create { url, revision } => {
            create_record(
                session,
                Model::Pattern,
                payload(json!({"url": url, "revision": revision})),
                format,
            )
            .await
        }
        PatternCommand::Update {
            name,
            url,
            revision,
        } => {
            update_record(
                session,
                Model::Pattern,
                name,
                None,
                payload(json!({"url": url, "revision": revision})),
                format,
            )
            .await
        }
        PatternCommand::Delete { name } => {
            delete_record(session, Model::Pattern, name, None).await
        }
    }
}
