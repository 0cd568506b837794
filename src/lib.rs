//! orchctl - Manage Conductor orchestration resources
//!
//! A CLI client for the Conductor management API.
//!
//! # Features
//!
//! - Full CRUD over projects, clouds, base images, patterns, roles,
//!   accounts, assignments, blueprints, systems, environments, and
//!   applications
//! - Name-to-ID resolution on every command, with unresolved values
//!   passed through for the server to judge
//! - Interactive collection of blueprint template parameters, or bulk
//!   loading from a JSON file
//! - Table and JSON output formats
//!
//! # Example
//!
//! ```bash
//! # List environments of a system
//! orchctl environment list --system shop
//!
//! # Create an environment from a blueprint, prompting for parameters
//! orchctl environment create --system shop --name staging \
//!     --blueprint web-stack --clouds aws-east:20
//!
//! # Show one record as JSON
//! orchctl blueprint show web-stack -f json
//! ```

pub mod api;
pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod output;

pub use api::{
    build_template_parameters, collection_path, deep_merge, default_parameters, find_first,
    id_segment, list, resolve_id, resolve_name, stdio_prompter, ApiResponse, Config, Model,
    ParameterOptions, Prompter, Record, Scope, Session,
};
pub use cli::{Cli, Command, OutputFormat};
pub use error::{OrchError, Result};
pub use output::{render, render_to_stdout};
