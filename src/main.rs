//! Conductor management CLI - Main entry point

use clap::Parser;
use log::{debug, info};

use orchctl::api::{Config, Session};
use orchctl::cli::{Cli, Command};
use orchctl::commands;
use orchctl::error::Result;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(&cli.log_level))
        .init();

    info!("Starting orchctl v{}", env!("CARGO_PKG_VERSION"));

    if let Err(e) = run(cli).await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    debug!(
        "CLI args: host={:?}, port={}, auth_id={:?}, format={}",
        cli.host, cli.port, cli.auth_id, cli.format
    );

    // An auth ID without a password means interactive use; ask for it rather
    // than failing
    let auth_password = match (&cli.auth_id, cli.auth_password) {
        (Some(_), None) => Some(prompt_password()?),
        (_, password) => password,
    };

    let config = Config {
        host: cli.host,
        port: cli.port,
        auth_id: cli.auth_id,
        auth_password,
    };
    let session = Session::connect(&config).await?;

    match &cli.command {
        Command::Project(command) => commands::project::run(&session, command, cli.format).await,
        Command::Cloud(command) => commands::cloud::run(&session, command, cli.format).await,
        Command::BaseImage(command) => {
            commands::base_image::run(&session, command, cli.format).await
        }
        Command::Pattern(command) => commands::pattern::run(&session, command, cli.format).await,
        Command::Role(command) => commands::role::run(&session, command, cli.format).await,
        Command::Account(command) => commands::account::run(&session, command, cli.format).await,
        Command::Assignment(command) => {
            commands::assignment::run(&session, command, cli.format).await
        }
        Command::Blueprint(command) => {
            commands::blueprint::run(&session, command, cli.format).await
        }
        Command::System(command) => commands::system::run(&session, command, cli.format).await,
        Command::Environment(command) => {
            commands::environment::run(&session, command, cli.format).await
        }
        Command::Application(command) => {
            commands::application::run(&session, command, cli.format).await
        }
        Command::Audit(command) => commands::audit::run(&session, command, cli.format).await,
    }
}

fn prompt_password() -> Result<String> {
    dialoguer::Password::new()
        .with_prompt("Password")
        .interact()
        .map_err(|e| orchctl::error::OrchError::Io(format!("could not read password: {}", e)))
}
