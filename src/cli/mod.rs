//! CLI argument parsing

use clap::{Parser, Subcommand, ValueEnum};

use crate::commands::{
    account::AccountCommand, application::ApplicationCommand, assignment::AssignmentCommand,
    audit::AuditCommand, base_image::BaseImageCommand, blueprint::BlueprintCommand,
    cloud::CloudCommand, environment::EnvironmentCommand, pattern::PatternCommand,
    project::ProjectCommand, role::RoleCommand, system::SystemCommand,
};
use crate::config::{defaults, env_vars};

/// Conductor management CLI
#[derive(Parser, Debug)]
#[command(name = "orchctl")]
#[command(version)]
#[command(about = "Manage Conductor orchestration resources", long_about = None)]
pub struct Cli {
    /// Conductor host
    #[arg(short = 'H', long, env = env_vars::HOST, global = true)]
    pub host: Option<String>,

    /// Conductor port
    #[arg(short = 'p', long, env = env_vars::PORT, default_value_t = defaults::PORT, global = true)]
    pub port: u16,

    /// Account email used for authentication
    #[arg(long, env = env_vars::AUTH_ID, global = true)]
    pub auth_id: Option<String>,

    /// Account password used for authentication
    #[arg(long, env = env_vars::AUTH_PASSWORD, global = true)]
    pub auth_password: Option<String>,

    /// Output format
    #[arg(short = 'f', long, value_enum, default_value_t = OutputFormat::Table, global = true)]
    pub format: OutputFormat,

    /// Log level (error, warn, info, debug, trace)
    #[arg(short = 'l', long, default_value = defaults::LOG_LEVEL, global = true)]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Command,
}

/// Resource noun subcommand groups
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Manage projects
    #[command(subcommand)]
    Project(ProjectCommand),
    /// Manage clouds
    #[command(subcommand)]
    Cloud(CloudCommand),
    /// Manage base images
    #[command(subcommand, name = "base-image")]
    BaseImage(BaseImageCommand),
    /// Manage patterns
    #[command(subcommand)]
    Pattern(PatternCommand),
    /// Manage roles
    #[command(subcommand)]
    Role(RoleCommand),
    /// Manage accounts
    #[command(subcommand)]
    Account(AccountCommand),
    /// Manage role assignments
    #[command(subcommand)]
    Assignment(AssignmentCommand),
    /// Manage blueprints and their histories
    #[command(subcommand)]
    Blueprint(BlueprintCommand),
    /// Manage systems
    #[command(subcommand)]
    System(SystemCommand),
    /// Manage environments
    #[command(subcommand)]
    Environment(EnvironmentCommand),
    /// Manage applications
    #[command(subcommand)]
    Application(ApplicationCommand),
    /// Inspect the audit log
    #[command(subcommand)]
    Audit(AuditCommand),
}

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Compact table (default)
    Table,
    /// Raw JSON
    Json,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Table => write!(f, "table"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}
