//! Blueprint commands
//!
//! Blueprints bundle patterns into a deployable unit. Building a blueprint
//! snapshots it as a numbered history; environments are created from a
//! history, not from the blueprint itself.

use clap::Subcommand;
use serde_json::{json, Map, Value};

use crate::api::{collection_path, id_segment, resolve_name, Model, Scope, Session};
use crate::cli::OutputFormat;
use crate::commands::{
    create_record, delete_record, list_records, payload, render_body, show_record, update_record,
};
use crate::error::Result;

#[derive(Subcommand, Debug)]
pub enum BlueprintCommand {
    /// List all blueprints
    List,
    /// Show one blueprint by name or ID
    Show { name: String },
    /// Create a blueprint
    Create {
        #[arg(long)]
        name: String,
        #[arg(long)]
        description: Option<String>,
    },
    /// Update a blueprint
    Update {
        name: String,
        #[arg(long)]
        description: Option<String>,
    },
    /// Delete a blueprint
    Delete { name: String },
    /// List the patterns composing a blueprint
    PatternList { name: String },
    /// List the built versions of a blueprint
    HistoryList { name: String },
    /// Show one built version
    HistoryShow { name: String, version: i64 },
    /// Build the blueprint into a new version
    Build { name: String },
}

async fn blueprint_scope(session: &Session, name: &str) -> Result<Scope> {
    let id = resolve_name(session, Model::Blueprint, name, None).await?;
    Ok(Scope::new(Model::Blueprint, id))
}

pub async fn run(
    session: &Session,
    command: &BlueprintCommand,
    format: OutputFormat,
) -> Result<()> {
    match command {
        BlueprintCommand::List => list_records(session, Model::Blueprint, None, format, &[]).await,
        BlueprintCommand::Show { name } => {
            show_record(session, Model::Blueprint, name, None, format, &[]).await
        }
        BlueprintCommand::Create { name, description } => {
            create_record(
                session,
                Model::Blueprint,
                payload(json!({"name": name, "description": description})),
                format,
            )
            .await
        }
        BlueprintCommand::Update { name, description } => {
            update_record(
                session,
                Model::Blueprint,
                name,
                None,
                payload(json!({"description": description})),
                format,
            )
            .await
        }
        BlueprintCommand::Delete { name } => {
            delete_record(session, Model::Blueprint, name, None).await
        }
        BlueprintCommand::PatternList { name } => {
            let scope = blueprint_scope(session, name).await?;
            list_records(session, Model::Pattern, Some(&scope), format, &[]).await
        }
        BlueprintCommand::HistoryList { name } => {
            let scope = blueprint_scope(session, name).await?;
            list_records(session, Model::BlueprintHistory, Some(&scope), format, &[]).await
        }
        BlueprintCommand::HistoryShow { name, version } => {
            let scope = blueprint_scope(session, name).await?;
            let path = format!(
                "{}/{}",
                collection_path(Model::BlueprintHistory, Some(&scope)),
                version
            );
            let response = session.get(&path, Map::new()).await?;
            render_body(&response.body, format, &[])
        }
        BlueprintCommand::Build { name } => {
            let id = resolve_name(session, Model::Blueprint, name, None).await?;
            let path = format!(
                "{}/{}/build",
                collection_path(Model::Blueprint, None),
                id_segment(&id)
            );
            let response = session.post(&path, Map::new()).await?;
            render_body(&response.body, format, &[])
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn mount_blueprints(mock_server: &MockServer) {
        Mock::given(method("GET"))
            .and(path("/blueprints"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!([{"id": 4, "name": "web-stack"}])),
            )
            .mount(mock_server)
            .await;
    }

    #[tokio::test]
    async fn test_history_show_addresses_version_directly() {
        let mock_server = MockServer::start().await;
        mount_blueprints(&mock_server).await;

        Mock::given(method("GET"))
            .and(path("/blueprints/4/histories/3"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"id": 30, "version": 3, "status": "CREATE_COMPLETE"})),
            )
            .mount(&mock_server)
            .await;

        let session = Session::connect_to(&mock_server.uri(), None, None).await.unwrap();
        let command = BlueprintCommand::HistoryShow {
            name: "web-stack".to_string(),
            version: 3,
        };
        assert!(run(&session, &command, OutputFormat::Json).await.is_ok());
    }

    #[tokio::test]
    async fn test_build_posts_to_subresource() {
        let mock_server = MockServer::start().await;
        mount_blueprints(&mock_server).await;

        Mock::given(method("POST"))
            .and(path("/blueprints/4/build"))
            .respond_with(
                ResponseTemplate::new(202).set_body_json(json!({"version": 4})),
            )
            .mount(&mock_server)
            .await;

        let session = Session::connect_to(&mock_server.uri(), None, None).await.unwrap();
        let command = BlueprintCommand::Build {
            name: "web-stack".to_string(),
        };
        assert!(run(&session, &command, OutputFormat::Json).await.is_ok());
    }

    #[tokio::test]
    async fn test_unknown_blueprint_name_passes_through_to_server() {
        let mock_server = MockServer::start().await;
        mount_blueprints(&mock_server).await;

        Mock::given(method("GET"))
            .and(path("/blueprints/missing/histories"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({
                "error": "blueprint not found"
            })))
            .mount(&mock_server)
            .await;

        let session = Session::connect_to(&mock_server.uri(), None, None).await.unwrap();
        let command = BlueprintCommand::HistoryList {
            name: "missing".to_string(),
        };
        let err = run(&session, &command, OutputFormat::Json).await.unwrap_err();
        assert!(err.to_string().contains("404"));
    }
}
