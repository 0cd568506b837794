//! Bearer-token-authorized HTTP session against the Conductor API
//!
//! The session is constructed once per command invocation and is read-only
//! afterwards; the auth token is fetched synchronously at construction and
//! merged into every subsequent request's payload.

use log::debug;
use reqwest::{Client, Method};
use serde_json::{Map, Value};

use crate::config::api;
use crate::error::{reason_phrase, OrchError, Result};

/// Fully-resolved connection settings, assembled at the CLI boundary.
///
/// Environment precedence (flag over env var) is decided by clap before this
/// struct is built; the core never consults the environment itself.
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub host: Option<String>,
    pub port: u16,
    pub auth_id: Option<String>,
    pub auth_password: Option<String>,
}

/// Raw HTTP result handed back to the renderer
#[derive(Debug)]
pub struct ApiResponse {
    pub status: u16,
    pub body: String,
}

/// Conductor API session
#[derive(Debug)]
pub struct Session {
    client: Client,
    base_url: String,
    auth_token: Option<String>,
}

impl Session {
    /// Connect to the Conductor API.
    ///
    /// The host is required. When an auth ID is given, a password is required
    /// too and `POST /tokens` is performed here; the returned token is cached
    /// for the session's lifetime. Without an auth ID the session operates
    /// unauthenticated.
    pub async fn connect(config: &Config) -> Result<Session> {
        let host = config.host.as_deref().ok_or_else(|| {
            OrchError::Config(format!(
                "no host given; pass --host or set {}",
                crate::config::env_vars::HOST
            ))
        })?;

        let base_url = format!("http://{}:{}{}", host, config.port, api::BASE_PATH);
        Self::connect_to(&base_url, config.auth_id.as_deref(), config.auth_password.as_deref())
            .await
    }

    /// Connect against an explicit base URL (also used by mock-server tests)
    pub async fn connect_to(
        base_url: &str,
        auth_id: Option<&str>,
        auth_password: Option<&str>,
    ) -> Result<Session> {
        let mut session = Session {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            auth_token: None,
        };

        if let Some(email) = auth_id {
            let password = auth_password.ok_or_else(|| {
                OrchError::Config(format!(
                    "no auth password given; pass --auth-password or set {}",
                    crate::config::env_vars::AUTH_PASSWORD
                ))
            })?;
            session.authenticate(email, password).await?;
        }

        Ok(session)
    }

    /// `POST /tokens` and cache the returned auth token
    async fn authenticate(&mut self, email: &str, password: &str) -> Result<()> {
        let mut payload = Map::new();
        payload.insert("email".to_string(), Value::String(email.to_string()));
        payload.insert("password".to_string(), Value::String(password.to_string()));

        let response = self
            .request(Method::POST, &format!("/{}", api::TOKENS), payload)
            .await?;

        let body: Value = serde_json::from_str(&response.body)?;
        let token = body[api::AUTH_TOKEN_KEY].as_str().ok_or_else(|| {
            OrchError::Config("authentication response carried no auth_token".to_string())
        })?;

        debug!("Authenticated as {}", email);
        self.auth_token = Some(token.to_string());
        Ok(())
    }

    /// Cached token, if this session is authenticated
    pub fn auth_token(&self) -> Option<&str> {
        self.auth_token.as_deref()
    }

    pub(crate) fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Perform one request against the API.
    ///
    /// Null-valued payload entries are stripped before sending and the cached
    /// auth token is merged in. GET and DELETE carry the payload as a query
    /// string; other verbs as a JSON body. A non-success status is mapped to
    /// an error combining method, path, status, reason phrase, and the
    /// server's `error`/`message` field when the body parses as JSON.
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        payload: Map<String, Value>,
    ) -> Result<ApiResponse> {
        let url = format!("{}{}", self.base_url, path);
        let payload = self.prepare_payload(payload);

        debug!("{} {} ({} payload entries)", method, url, payload.len());

        let builder = match method {
            Method::GET | Method::DELETE => {
                let full_url = append_query(&url, &payload);
                self.client.request(method.clone(), full_url)
            }
            _ => self.client.request(method.clone(), &url).json(&payload),
        };

        let response = builder.send().await.map_err(|e| {
            if e.is_connect() {
                OrchError::Transport {
                    url: url.clone(),
                    message: e.to_string(),
                }
            } else {
                OrchError::UnexpectedTransport {
                    kind: error_kind(&e).to_string(),
                    message: e.to_string(),
                }
            }
        })?;

        let status = response.status().as_u16();
        let body = response.text().await.map_err(|e| OrchError::UnexpectedTransport {
            kind: error_kind(&e).to_string(),
            message: e.to_string(),
        })?;

        if !(200..300).contains(&status) {
            return Err(OrchError::Api {
                method: method.to_string(),
                path: path.to_string(),
                status,
                reason: reason_phrase(status).to_string(),
                message: extract_server_message(&body),
            });
        }

        Ok(ApiResponse { status, body })
    }

    /// Issue a GET request
    pub async fn get(&self, path: &str, payload: Map<String, Value>) -> Result<ApiResponse> {
        self.request(Method::GET, path, payload).await
    }

    /// Issue a POST request
    pub async fn post(&self, path: &str, payload: Map<String, Value>) -> Result<ApiResponse> {
        self.request(Method::POST, path, payload).await
    }

    /// Issue a PUT request
    pub async fn put(&self, path: &str, payload: Map<String, Value>) -> Result<ApiResponse> {
        self.request(Method::PUT, path, payload).await
    }

    /// Issue a DELETE request
    pub async fn delete(&self, path: &str, payload: Map<String, Value>) -> Result<ApiResponse> {
        self.request(Method::DELETE, path, payload).await
    }

    /// Strip explicit nulls and merge the cached auth token
    fn prepare_payload(&self, payload: Map<String, Value>) -> Map<String, Value> {
        let mut prepared: Map<String, Value> = payload
            .into_iter()
            .filter(|(_, v)| !v.is_null())
            .collect();
        if let Some(token) = &self.auth_token {
            prepared.insert(
                api::AUTH_TOKEN_KEY.to_string(),
                Value::String(token.clone()),
            );
        }
        prepared
    }
}

/// Append payload entries to a URL as an encoded query string
fn append_query(url: &str, payload: &Map<String, Value>) -> String {
    if payload.is_empty() {
        return url.to_string();
    }
    let query: Vec<String> = payload
        .iter()
        .map(|(k, v)| {
            let text = match v {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            format!("{}={}", urlencoding::encode(k), urlencoding::encode(&text))
        })
        .collect();
    let separator = if url.contains('?') { "&" } else { "?" };
    format!("{}{}{}", url, separator, query.join("&"))
}

/// Best-effort extraction of the server's error text from a response body
fn extract_server_message(body: &str) -> Option<String> {
    let parsed: Value = serde_json::from_str(body).ok()?;
    for key in ["error", "message"] {
        if let Some(text) = parsed[key].as_str() {
            return Some(text.to_string());
        }
    }
    None
}

/// Coarse classification of a reqwest error for the UnexpectedTransport report
fn error_kind(e: &reqwest::Error) -> &'static str {
    if e.is_timeout() {
        "Timeout"
    } else if e.is_decode() {
        "Decode"
    } else if e.is_builder() {
        "Builder"
    } else if e.is_redirect() {
        "Redirect"
    } else {
        "Request"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn map(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    async fn unauthenticated(base_url: &str) -> Session {
        Session::connect_to(base_url, None, None).await.unwrap()
    }

    #[tokio::test]
    async fn test_connect_without_host_is_config_error() {
        let config = Config {
            host: None,
            port: 80,
            auth_id: None,
            auth_password: None,
        };
        let result = Session::connect(&config).await;
        match result.unwrap_err() {
            OrchError::Config(msg) => assert!(msg.contains("host")),
            other => panic!("Expected Config error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_connect_with_auth_id_but_no_password_is_config_error() {
        let result = Session::connect_to("http://localhost:9", Some("admin@example.com"), None).await;
        match result.unwrap_err() {
            OrchError::Config(msg) => assert!(msg.contains("password")),
            other => panic!("Expected Config error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_token_fetched_at_construction_and_merged_into_requests() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/tokens"))
            .and(body_json(json!({
                "email": "admin@example.com",
                "password": "secret"
            })))
            .respond_with(
                ResponseTemplate::new(201).set_body_json(json!({"auth_token": "abc123"})),
            )
            .mount(&mock_server)
            .await;

        Mock::given(method("GET"))
            .and(path("/projects"))
            .and(query_param("auth_token", "abc123"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .mount(&mock_server)
            .await;

        Mock::given(method("POST"))
            .and(path("/projects"))
            .and(body_json(json!({"name": "demo", "auth_token": "abc123"})))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": 1})))
            .mount(&mock_server)
            .await;

        let session =
            Session::connect_to(&mock_server.uri(), Some("admin@example.com"), Some("secret"))
                .await
                .unwrap();
        assert_eq!(session.auth_token(), Some("abc123"));

        let list = session.get("/projects", Map::new()).await.unwrap();
        assert_eq!(list.status, 200);

        let created = session
            .post("/projects", map(json!({"name": "demo"})))
            .await
            .unwrap();
        assert_eq!(created.status, 201);
    }

    #[tokio::test]
    async fn test_failed_authentication_surfaces_api_error() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/tokens"))
            .respond_with(
                ResponseTemplate::new(401).set_body_json(json!({"error": "Unauthorized"})),
            )
            .mount(&mock_server)
            .await;

        let result =
            Session::connect_to(&mock_server.uri(), Some("admin@example.com"), Some("wrong")).await;
        match result.unwrap_err() {
            OrchError::Api { status, message, .. } => {
                assert_eq!(status, 401);
                assert_eq!(message.as_deref(), Some("Unauthorized"));
            }
            other => panic!("Expected Api error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_null_payload_entries_are_stripped() {
        let mock_server = MockServer::start().await;

        // A null-valued description must never reach the wire
        Mock::given(method("POST"))
            .and(path("/projects"))
            .and(body_json(json!({"name": "demo"})))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": 1})))
            .mount(&mock_server)
            .await;

        let session = unauthenticated(&mock_server.uri()).await;
        let result = session
            .post("/projects", map(json!({"name": "demo", "description": null})))
            .await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_not_found_maps_to_api_error_with_server_message() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/projects/99"))
            .respond_with(
                ResponseTemplate::new(404).set_body_json(json!({"message": "not found"})),
            )
            .mount(&mock_server)
            .await;

        let session = unauthenticated(&mock_server.uri()).await;
        let err = session.get("/projects/99", Map::new()).await.unwrap_err();
        let text = err.to_string();
        assert!(text.contains("404"));
        assert!(text.contains("Not Found"));
        assert!(text.contains("not found"));
        assert!(text.contains("GET"));
        assert!(text.contains("/projects/99"));
    }

    #[tokio::test]
    async fn test_error_status_with_unparseable_body_still_reports() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/projects"))
            .respond_with(ResponseTemplate::new(500).set_body_string("<html>boom</html>"))
            .mount(&mock_server)
            .await;

        let session = unauthenticated(&mock_server.uri()).await;
        match session.get("/projects", Map::new()).await.unwrap_err() {
            OrchError::Api { status, message, .. } => {
                assert_eq!(status, 500);
                assert!(message.is_none());
            }
            other => panic!("Expected Api error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_connection_refused_maps_to_transport_error() {
        // Nothing listens on this port
        let session = unauthenticated("http://127.0.0.1:1").await;
        match session.get("/projects", Map::new()).await.unwrap_err() {
            OrchError::Transport { url, .. } => assert!(url.contains("127.0.0.1:1")),
            other => panic!("Expected Transport error, got {:?}", other),
        }
    }

    #[test]
    fn test_append_query_encodes_values() {
        let payload = map(json!({"name": "a b", "system_id": 3}));
        let url = append_query("http://h/api/v1/environments", &payload);
        assert!(url.contains("name=a%20b"));
        assert!(url.contains("system_id=3"));
        assert!(url.contains('?'));
    }

    #[test]
    fn test_append_query_empty_payload_leaves_url_untouched() {
        assert_eq!(append_query("http://h/x", &Map::new()), "http://h/x");
    }

    #[test]
    fn test_extract_server_message_prefers_error_key() {
        let body = r#"{"error": "denied", "message": "other"}"#;
        assert_eq!(extract_server_message(body).as_deref(), Some("denied"));
    }

    #[test]
    fn test_extract_server_message_falls_back_to_message_key() {
        let body = r#"{"message": "not found"}"#;
        assert_eq!(extract_server_message(body).as_deref(), Some("not found"));
    }

    #[test]
    fn test_extract_server_message_unparseable() {
        assert!(extract_server_message("<html>").is_none());
    }
}
