//! Base image commands
//!
//! Base images carry no name of their own; they are addressed by their
//! provider-side source image identifier.

use clap::Subcommand;
use serde_json::{json, Map, Value};

use crate::api::{collection_path, id_segment, resolve_id, resolve_name, Model, Session};
use crate::cli::OutputFormat;
use crate::commands::{create_record, list_records, payload, render_body, resolve_scope};
use crate::error::Result;

#[derive(Subcommand, Debug)]
pub enum BaseImageCommand {
    /// List base images, optionally for one cloud
    List {
        #[arg(long)]
        cloud: Option<String>,
    },
    /// Show one base image by source image ID
    Show { source_image: String },
    /// Register a base image
    Create {
        /// Cloud the image lives in
        #[arg(long)]
        cloud: String,
        /// Provider-side image identifier (AMI ID or image UUID)
        #[arg(long)]
        source_image: String,
        #[arg(long, default_value = "ec2-user")]
        ssh_username: String,
        #[arg(long)]
        platform: Option<String>,
    },
    /// Update a base image
    Update {
        source_image: String,
        #[arg(long)]
        ssh_username: Option<String>,
    },
    /// Unregister a base image
    Delete { source_image: String },
}

async fn resolve_image(session: &Session, source_image: &str) -> Result<Value> {
    resolve_id(
        session,
        Model::BaseImage,
        "source_image",
        &json!(source_image),
        None,
    )
    .await
}

fn image_path(id: &Value) -> String {
    format!(
        "{}/{}",
        collection_path(Model::BaseImage, None),
        id_segment(id)
    )
}

pub async fn run(
    session: &Session,
    command: &BaseImageCommand,
    format: OutputFormat,
) -> Result<()> {
    match command {
        BaseImageCommand::List { cloud } => {
            let scope = resolve_scope(session, Model::Cloud, cloud.as_deref()).await?;
            list_records(session, Model::BaseImage, scope.as_ref(), format, &[]).await
        }
        BaseImageCommand::Show { source_image } => {
            let id = resolve_image(session, source_image).await?;
            let response = session.get(&image_path(&id), Map::new()).await?;
            render_body(&response.body, format, &[])
        }
        BaseImageCommand::Create {
            cloud,
            source_image,
            ssh_username,
            platform,
        } => {
            let cloud_id = resolve_name(session, Model::Cloud, cloud, None).await?;
            create_record(
                session,
                Model::BaseImage,
                payload(json!({
                    "cloud_id": cloud_id,
                    "source_image": source_image,
                    "ssh_username": ssh_username,
                    "platform": platform,
                })),
                format,
            )
            .await
        }
        BaseImageCommand::Update {
            source_image,
            ssh_username,
        } => {
            let id = resolve_image(session, source_image).await?;
            let response = session
                .put(
                    &image_path(&id),
                    payload(json!({"ssh_username": ssh_username})),
                )
                .await?;
            render_body(&response.body, format, &[])
        }
        BaseImageCommand::Delete { source_image } => {
            let id = resolve_image(session, source_image).await?;
            session.delete(&image_path(&id), Map::new()).await?;
            println!("Deleted base image '{}'", source_image);
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_list_scoped_by_cloud() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/clouds"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!([{"id": 5, "name": "aws-east"}])),
            )
            .mount(&mock_server)
            .await;

        Mock::given(method("GET"))
            .and(path("/clouds/5/base_images"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!([{"id": 1, "source_image": "ami-12345678"}])),
            )
            .mount(&mock_server)
            .await;

        let session = Session::connect_to(&mock_server.uri(), None, None).await.unwrap();
        let command = BaseImageCommand::List {
            cloud: Some("aws-east".to_string()),
        };
        assert!(run(&session, &command, OutputFormat::Json).await.is_ok());
    }

    #[tokio::test]
    async fn test_show_resolves_by_source_image() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/base_images"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!([{"id": 9, "source_image": "ami-12345678"}])),
            )
            .mount(&mock_server)
            .await;

        Mock::given(method("GET"))
            .and(path("/base_images/9"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"id": 9, "source_image": "ami-12345678"})),
            )
            .mount(&mock_server)
            .await;

        let session = Session::connect_to(&mock_server.uri(), None, None).await.unwrap();
        let command = BaseImageCommand::Show {
            source_image: "ami-12345678".to_string(),
        };
        assert!(run(&session, &command, OutputFormat::Json).await.is_ok());
    }
}
