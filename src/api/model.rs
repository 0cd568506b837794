//! Server-side resource models and list scopes

/// A server-side resource type exposed by the Conductor API.
///
/// The client never persists these; a model only knows the collection path
/// it lives under.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Model {
    Project,
    Cloud,
    BaseImage,
    Pattern,
    Role,
    Permission,
    Account,
    Assignment,
    Blueprint,
    BlueprintHistory,
    System,
    Environment,
    Event,
    Application,
    ApplicationHistory,
    Audit,
}

impl Model {
    /// Pluralized collection path segment for this model
    pub fn collection(&self) -> &'static str {
        match self {
            Model::Project => "projects",
            Model::Cloud => "clouds",
            Model::BaseImage => "base_images",
            Model::Pattern => "patterns",
            Model::Role => "roles",
            Model::Permission => "permissions",
            Model::Account => "accounts",
            Model::Assignment => "assignments",
            Model::Blueprint => "blueprints",
            Model::BlueprintHistory => "histories",
            Model::System => "systems",
            Model::Environment => "environments",
            Model::Event => "events",
            Model::Application => "applications",
            Model::ApplicationHistory => "histories",
            Model::Audit => "audits",
        }
    }

    /// Singular label for log and error messages
    pub fn label(&self) -> &'static str {
        match self {
            Model::Project => "project",
            Model::Cloud => "cloud",
            Model::BaseImage => "base image",
            Model::Pattern => "pattern",
            Model::Role => "role",
            Model::Permission => "permission",
            Model::Account => "account",
            Model::Assignment => "assignment",
            Model::Blueprint => "blueprint",
            Model::BlueprintHistory => "blueprint history",
            Model::System => "system",
            Model::Environment => "environment",
            Model::Event => "event",
            Model::Application => "application",
            Model::ApplicationHistory => "application history",
            Model::Audit => "audit",
        }
    }
}

/// A parent resource constraining a list query to its children.
///
/// Parent IDs must be resolved before any child query that depends on them;
/// the absence of a scope means an unscoped collection query.
#[derive(Debug, Clone)]
pub struct Scope {
    pub parent: Model,
    pub parent_id: serde_json::Value,
}

impl Scope {
    pub fn new(parent: Model, parent_id: serde_json::Value) -> Self {
        Self { parent, parent_id }
    }
}

/// Build the collection path for a model, under a parent scope when given.
pub fn collection_path(model: Model, scope: Option<&Scope>) -> String {
    match scope {
        Some(s) => format!(
            "/{}/{}/{}",
            s.parent.collection(),
            id_segment(&s.parent_id),
            model.collection()
        ),
        None => format!("/{}", model.collection()),
    }
}

/// Render an ID value as a path segment without JSON string quoting
pub fn id_segment(id: &serde_json::Value) -> String {
    match id {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
