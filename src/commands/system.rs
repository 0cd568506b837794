//! System commands
//!
//! A system is the long-lived unit users point DNS at; the `switch` verb
//! flips which environment serves it.

use clap::Subcommand;
use serde_json::{json, Map};

use crate::api::{collection_path, id_segment, resolve_name, Model, Scope, Session};
use crate::cli::OutputFormat;
use crate::commands::{
    create_record, delete_record, list_records, payload, render_body, resolve_scope, show_record,
    update_record,
};
use crate::error::Result;

#[derive(Subcommand, Debug)]
pub enum SystemCommand {
    /// List systems, optionally for one project
    List {
        #[arg(long)]
        project: Option<String>,
    },
    /// Show one system by name or ID
    Show { name: String },
    /// Create a system
    Create {
        #[arg(long)]
        project: String,
        #[arg(long)]
        name: String,
        /// DNS name served by the active environment
        #[arg(long)]
        domain: Option<String>,
        #[arg(long)]
        description: Option<String>,
    },
    /// Update a system
    Update {
        name: String,
        #[arg(long)]
        domain: Option<String>,
        #[arg(long)]
        description: Option<String>,
    },
    /// Delete a system
    Delete { name: String },
    /// Switch the system's active environment
    Switch {
        name: String,
        #[arg(long)]
        environment: String,
    },
}

pub async fn run(session: &Session, command: &SystemCommand, format: OutputFormat) -> Result<()> {
    match command {
        SystemCommand::List { project } => {
            let scope = resolve_scope(session, Model::Project, project.as_deref()).await?;
            list_records(session, Model::System, scope.as_ref(), format, &[]).await
        }
        SystemCommand::Show { name } => {
            show_record(session, Model::System, name, None, format, &[]).await
        }
        SystemCommand::Create {
            project,
            name,
            domain,
            description,
        } => {
            let project_id = resolve_name(session, Model::Project, project, None).await?;
            create_record(
                session,
                Model::System,
                payload(json!({
                    "project_id": project_id,
                    "name": name,
                    "domain": domain,
                    "description": description,
                })),
                format,
            )
            .await
        }
        SystemCommand::Update {
            name,
            domain,
            description,
        } => {
            update_record(
                session,
                Model::System,
                name,
                None,
                payload(json!({"domain": domain, "description": description})),
                format,
            )
            .await
        }
        SystemCommand::Delete { name } => delete_record(session, Model::System, name, None).await,
        SystemCommand::Switch { name, environment } => {
            let system_id = resolve_name(session, Model::System, name, None).await?;
            let scope = Scope::new(Model::System, system_id.clone());
            let environment_id =
                resolve_name(session, Model::Environment, environment, Some(&scope)).await?;
            let path = format!(
                "{}/{}/switch",
                collection_path(Model::System, None),
                id_segment(&system_id)
            );
            let mut body = Map::new();
            body.insert("environment_id".to_string(), environment_id);
            let response = session.put(&path, body).await?;
            render_body(&response.body, format, &[])
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_switch_resolves_environment_within_system() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/systems"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!([{"id": 7, "name": "shop"}])),
            )
            .mount(&mock_server)
            .await;

        Mock::given(method("GET"))
            .and(path("/systems/7/environments"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"id": 21, "name": "blue"},
                {"id": 22, "name": "green"}
            ])))
            .mount(&mock_server)
            .await;

        Mock::given(method("PUT"))
            .and(path("/systems/7/switch"))
            .and(body_json(json!({"environment_id": 22})))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"id": 7, "primary_environment_id": 22})),
            )
            .mount(&mock_server)
            .await;

        let session = Session::connect_to(&mock_server.uri(), None, None).await.unwrap();
        let command = SystemCommand::Switch {
            name: "shop".to_string(),
            environment: "green".to_string(),
        };
        assert!(run(&session, &command, OutputFormat::Json).await.is_ok());
    }

    #[tokio::test]
    async fn test_create_resolves_project() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/projects"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!([{"id": 1, "name": "web-prj"}])),
            )
            .mount(&mock_server)
            .await;

        Mock::given(method("POST"))
            .and(path("/systems"))
            .and(body_json(json!({
                "project_id": 1,
                "name": "shop",
                "domain": "shop.example.com"
            })))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": 7})))
            .mount(&mock_server)
            .await;

        let session = Session::connect_to(&mock_server.uri(), None, None).await.unwrap();
        let command = SystemCommand::Create {
            project: "web-prj".to_string(),
            name: "shop".to_string(),
            domain: Some("shop.example.com".to_string()),
            description: None,
        };
        assert!(run(&session, &command, OutputFormat::Json).await.is_ok());
    }
}
