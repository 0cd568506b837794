//! Conductor API client core
//!
//! Session, name resolution, and template-parameter assembly shared by every
//! command.

pub mod model;
pub mod params;
pub mod prompt;
pub mod resolver;
pub mod session;

pub use model::{collection_path, id_segment, Model, Scope};
pub use params::{build_template_parameters, deep_merge, default_parameters, ParameterOptions};
pub use prompt::{stdio_prompter, Prompter};
pub use resolver::{find_first, list, resolve_id, resolve_name, Record};
pub use session::{ApiResponse, Config, Session};
