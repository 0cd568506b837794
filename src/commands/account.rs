//! Account commands
//!
//! Accounts resolve by email rather than name.

use clap::Subcommand;
use serde_json::{json, Map, Value};

use crate::api::{collection_path, id_segment, resolve_id, Model, Session};
use crate::cli::OutputFormat;
use crate::commands::{create_record, list_records, payload, render_body};
use crate::error::Result;

#[derive(Subcommand, Debug)]
pub enum AccountCommand {
    /// List all accounts
    List,
    /// Show one account by email or ID
    Show { email: String },
    /// Create an account
    Create {
        #[arg(long)]
        email: String,
        #[arg(long)]
        name: String,
        #[arg(long)]
        password: String,
        /// Grant administrator privileges
        #[arg(long)]
        admin: bool,
    },
    /// Update an account
    Update {
        email: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        password: Option<String>,
    },
    /// Delete an account
    Delete { email: String },
}

async fn resolve_account(session: &Session, email: &str) -> Result<Value> {
    resolve_id(session, Model::Account, "email", &json!(email), None).await
}

fn account_path(id: &Value) -> String {
    format!("{}/{}", collection_path(Model::Account, None), id_segment(id))
}

pub async fn run(session: &Session, command: &AccountCommand, format: OutputFormat) -> Result<()> {
    match command {
        AccountCommand::List => list_records(session, Model::Account, None, format, &[]).await,
        AccountCommand::Show { email } => {
            let id = resolve_account(session, email).await?;
            let response = session.get(&account_path(&id), Map::new()).await?;
            render_body(&response.body, format, &[])
        }
        AccountCommand::Create {
            email,
            name,
            password,
            admin,
        } => {
            create_record(
                session,
                Model::Account,
                payload(json!({
                    "email": email,
                    "name": name,
                    "password": password,
                    "admin": if *admin { 1 } else { 0 },
                })),
                format,
            )
            .await
        }
        AccountCommand::Update {
            email,
            name,
            password,
        } => {
            let id = resolve_account(session, email).await?;
            let response = session
                .put(
                    &account_path(&id),
                    payload(json!({"name": name, "password": password})),
                )
                .await?;
            render_body(&response.body, format, &[])
        }
        AccountCommand::Delete { email } => {
            let id = resolve_account(session, email).await?;
            session.delete(&account_path(&id), Map::new()).await?;
            println!("Deleted account '{}'", email);
            Ok(())
        }
    }
}
