//! Runtime configuration for the tool server and its collaborators.

/// Base URL that relative screenshot paths are resolved against.
///
/// The `screenshot` tool accepts either a full URL or a path relative to a
/// local dev server; the latter is joined onto this base.
pub const LOCAL_BASE_URL: &str = "http://localhost:3000";

/// Configuration for the tool server.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// API key sent as a bearer token to the chat completions endpoint.
    pub openai_api_key: String,
    /// Model requested for architect plans.
    pub openai_model: String,
    /// Chat completions endpoint. Overridable so tests can point the client
    /// at a local mock server.
    pub openai_endpoint: String,
}

impl ServerConfig {
    /// Create a config with the given credentials and the default endpoint.
    pub fn new(openai_api_key: String, openai_model: String) -> Self {
        Self {
            openai_api_key,
            openai_model,
            openai_endpoint: crate::openai::DEFAULT_ENDPOINT.to_string(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self::new(String::new(), crate::openai::DEFAULT_MODEL.to_string())
    }
}
