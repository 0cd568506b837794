//! Audit log commands

use clap::Subcommand;

use crate::api::{Model, Session};
use crate::cli::OutputFormat;
use crate::commands::list_records;
use crate::error::Result;

#[derive(Subcommand, Debug)]
pub enum AuditCommand {
    /// List audit log entries
    List,
}

pub async fn run(session: &Session, command: &AuditCommand, format: OutputFormat) -> Result<()> {
    match command {
        AuditCommand::List => list_records(session, Model::Audit, None, format, &[]).await,
    }
}
