/// Configuration constants for the Conductor API
pub mod api {
    /// Base path for the Conductor API
    pub const BASE_PATH: &str = "/api/v1";

    /// Authentication endpoint (POST {email, password} -> {auth_token})
    pub const TOKENS: &str = "tokens";

    /// Reserved payload key carrying the cached auth token
    pub const AUTH_TOKEN_KEY: &str = "auth_token";
}

/// Environment variable names consulted when the matching flag is absent
pub mod env_vars {
    /// Conductor host
    pub const HOST: &str = "ORCHCTL_HOST";

    /// Conductor port
    pub const PORT: &str = "ORCHCTL_PORT";

    /// Account email used for authentication
    pub const AUTH_ID: &str = "ORCHCTL_AUTH_ID";

    /// Account password used for authentication
    pub const AUTH_PASSWORD: &str = "ORCHCTL_AUTH_PASSWORD";
}

/// Default values for CLI
pub mod defaults {
    /// Default Conductor port
    pub const PORT: u16 = 80;

    /// Default log level
    pub const LOG_LEVEL: &str = "warn";
}

/// Rendering constants
pub mod render {
    /// Maximum cell width before truncation kicks in
    pub const MAX_CELL_WIDTH: usize = 80;

    /// Marker appended to truncated cell text
    pub const ELLIPSIS: &str = "...";
}
