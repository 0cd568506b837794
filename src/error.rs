use std::fmt;

/// Custom error type for Conductor API operations
#[derive(Debug)]
pub enum OrchError {
    /// Missing or invalid configuration (host, credentials)
    Config(String),
    /// Could not connect to the target URL
    Transport { url: String, message: String },
    /// Any other failure raised while performing a request
    UnexpectedTransport { kind: String, message: String },
    /// API returned a non-success status
    Api {
        method: String,
        path: String,
        status: u16,
        reason: String,
        message: Option<String>,
    },
    /// Response body was not valid JSON when table rendering was requested
    MalformedResponse { body: String },
    /// JSON parsing error outside the response path
    Json(String),
    /// File read error (parameter or user-attribute files)
    Io(String),
}

impl fmt::Display for OrchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrchError::Config(msg) => write!(f, "Configuration error: {}", msg),
            OrchError::Transport { url, message } => {
                write!(f, "Failed to connect to {}: {}", url, message)
            }
            OrchError::UnexpectedTransport { kind, message } => {
                write!(f, "UnexpectedError ({}): {}", kind, message)
            }
            OrchError::Api {
                method,
                path,
                status,
                reason,
                message,
            } => match message {
                Some(msg) => write!(f, "{} {}: {} {}: {}", method, path, status, reason, msg),
                None => write!(f, "{} {}: {} {}", method, path, status, reason),
            },
            OrchError::MalformedResponse { body } => {
                write!(f, "Response body is not valid JSON: {}", body)
            }
            OrchError::Json(msg) => write!(f, "JSON error: {}", msg),
            OrchError::Io(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for OrchError {}

impl From<serde_json::Error> for OrchError {
    fn from(err: serde_json::Error) -> Self {
        OrchError::Json(err.to_string())
    }
}

impl From<std::io::Error> for OrchError {
    fn from(err: std::io::Error) -> Self {
        OrchError::Io(err.to_string())
    }
}

/// Result type alias for Conductor operations
pub type Result<T> = std::result::Result<T, OrchError>;

/// Standard reason phrase for an HTTP status code, or "Unknown" when the
/// code has none registered.
pub fn reason_phrase(status: u16) -> &'static str {
    reqwest::StatusCode::from_u16(status)
        .ok()
        .and_then(|s| s.canonical_reason())
        .unwrap_or("Unknown")
}
