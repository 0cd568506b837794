//! Assignment commands
//!
//! An assignment links an account to a project; roles hang off the
//! assignment. Assignments are addressed by project plus account email.

use clap::Subcommand;
use serde_json::{json, Map, Value};

use crate::api::{
    collection_path, find_first, id_segment, resolve_id, resolve_name, Model, Scope, Session,
};
use crate::cli::OutputFormat;
use crate::commands::{list_records, payload, render_body, resolve_scope};
use crate::error::Result;

#[derive(Subcommand, Debug)]
pub enum AssignmentCommand {
    /// List assignments, optionally for one project
    List {
        #[arg(long)]
        project: Option<String>,
    },
    /// Show the assignment of an account within a project
    Show {
        account: String,
        #[arg(long)]
        project: String,
    },
    /// Assign an account to a project
    Create {
        #[arg(long)]
        project: String,
        #[arg(long)]
        account: String,
        /// Role names granted on creation
        #[arg(long)]
        roles: Vec<String>,
    },
    /// Replace the roles granted through an assignment
    Update {
        account: String,
        #[arg(long)]
        project: String,
        #[arg(long)]
        roles: Vec<String>,
    },
    /// Remove an account's assignment from a project
    Delete {
        account: String,
        #[arg(long)]
        project: String,
    },
    /// List the roles granted through an assignment
    RoleList {
        account: String,
        #[arg(long)]
        project: String,
    },
    /// Grant an additional role
    RoleAdd {
        account: String,
        #[arg(long)]
        project: String,
        #[arg(long)]
        role: String,
    },
    /// Revoke a granted role
    RoleRemove {
        account: String,
        #[arg(long)]
        project: String,
        #[arg(long)]
        role: String,
    },
}

/// Resolve `(project, account)` to the assignment's ID, falling back to the
/// account value itself when no assignment matches (resolver pass-through
/// semantics).
async fn resolve_assignment(session: &Session, project: &str, account: &str) -> Result<Value> {
    let project_id = resolve_name(session, Model::Project, project, None).await?;
    let account_id = resolve_id(session, Model::Account, "email", &json!(account), None).await?;

    let scope = Scope::new(Model::Project, project_id);
    let mut filter = Map::new();
    filter.insert("account_id".to_string(), account_id);

    match find_first(session, Model::Assignment, &filter, Some(&scope)).await? {
        Some(record) => Ok(record.get("id").cloned().unwrap_or_else(|| json!(account))),
        None => Ok(json!(account)),
    }
}

fn assignment_path(id: &Value) -> String {
    format!(
        "{}/{}",
        collection_path(Model::Assignment, None),
        id_segment(id)
    )
}

pub async fn run(
    session: &Session,
    command: &AssignmentCommand,
    format: OutputFormat,
) -> Result<()> {
    match command {
        AssignmentCommand::List { project } => {
            let scope = resolve_scope(session, Model::Project, project.as_deref()).await?;
            list_records(session, Model::Assignment, scope.as_ref(), format, &[]).await
        }
        AssignmentCommand::Show { account, project } => {
            let id = resolve_assignment(session, project, account).await?;
            let response = session.get(&assignment_path(&id), Map::new()).await?;
            render_body(&response.body, format, &[])
        }
        AssignmentCommand::Create {
            project,
            account,
            roles,
        } => {
            let project_id = resolve_name(session, Model::Project, project, None).await?;
            let account_id =
                resolve_id(session, Model::Account, "email", &json!(account), None).await?;
            let mut role_ids = Vec::new();
            for role in roles {
                role_ids.push(resolve_name(session, Model::Role, role, None).await?);
            }
            let response = session
                .post(
                    &collection_path(Model::Assignment, None),
                    payload(json!({
                        "project_id": project_id,
                        "account_id": account_id,
                        "role_ids": role_ids,
                    })),
                )
                .await?;
            render_body(&response.body, format, &[])
        }
        AssignmentCommand::Update {
            account,
            project,
            roles,
        } => {
            let id = resolve_assignment(session, project, account).await?;
            let mut role_ids = Vec::new();
            for role in roles {
                role_ids.push(resolve_name(session, Model::Role, role, None).await?);
            }
            let response = session
                .put(&assignment_path(&id), payload(json!({"role_ids": role_ids})))
                .await?;
            render_body(&response.body, format, &[])
        }
        AssignmentCommand::Delete { account, project } => {
            let id = resolve_assignment(session, project, account).await?;
            session.delete(&assignment_path(&id), Map::new()).await?;
            println!("Deleted assignment of '{}' in '{}'", account, project);
            Ok(())
        }
        AssignmentCommand::RoleList { account, project } => {
            let id = resolve_assignment(session, project, account).await?;
            let scope = Scope::new(Model::Assignment, id);
            list_records(session, Model::Role, Some(&scope), format, &[]).await
        }
        AssignmentCommand::RoleAdd {
            account,
            project,
            role,
        } => {
            let id = resolve_assignment(session, project, account).await?;
            let role_id = resolve_name(session, Model::Role, role, None).await?;
            let response = session
                .post(
                    &format!("{}/roles", assignment_path(&id)),
                    payload(json!({"role_id": role_id})),
                )
                .await?;
            render_body(&response.body, format, &[])
        }
        AssignmentCommand::RoleRemove {
            account,
            project,
            role,
        } => {
            let id = resolve_assignment(session, project, account).await?;
            let role_id = resolve_name(session, Model::Role, role, None).await?;
            session
                .delete(
                    &format!("{}/roles/{}", assignment_path(&id), id_segment(&role_id)),
                    Map::new(),
                )
                .await?;
            println!("Revoked role '{}' from '{}'", role, account);
            Ok(())
        }
    }
}
