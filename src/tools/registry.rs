//! Tool registry for managing MCP tool handlers.
//!
//! Provides a `ToolHandler` trait for implementing tools and a `ToolRegistry`
//! for registering and invoking them.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use rmcp::model::{CallToolResult, JsonObject, Tool as McpTool};

/// Error raised when dispatch cannot produce a result envelope.
///
/// Failures a tool reports inside its own output (a failed file read, an
/// upstream API error) never surface here; this type covers the conditions
/// that abort the call instead.
#[derive(Debug)]
pub enum ToolError {
    /// No handler is registered under the requested name.
    UnknownTool(String),
    /// The handler rejected its arguments before doing any work.
    InvalidArguments { tool: String, reason: String },
    /// The handler failed partway through, with nothing useful to return.
    Execution { tool: String, source: anyhow::Error },
}

impl std::fmt::Display for ToolError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ToolError::UnknownTool(name) => write!(f, "Unknown tool: {}", name),
            ToolError::InvalidArguments { tool, reason } => {
                write!(f, "Invalid arguments for {}: {}", tool, reason)
            }
            ToolError::Execution { tool, source } => {
                write!(f, "Tool {} failed: {}", tool, source)
            }
        }
    }
}

impl std::error::Error for ToolError {}

/// Trait for handling MCP tool invocations.
///
/// Each tool implements this trait to define its schema and execution logic.
pub trait ToolHandler: Send + Sync {
    /// Returns the tool's name (e.g., "read_file").
    fn name(&self) -> &str;

    /// Returns the tool's human-readable title.
    fn title(&self) -> Option<&str> {
        None
    }

    /// Returns the tool's description.
    fn description(&self) -> &str;

    /// Returns the input schema for this tool.
    fn input_schema(&self) -> JsonObject;

    /// Returns the output schema for this tool (optional).
    fn output_schema(&self) -> Option<JsonObject> {
        None
    }

    /// Executes the tool with the given arguments.
    fn execute(
        &self,
        args: JsonObject,
    ) -> Pin<Box<dyn Future<Output = Result<CallToolResult, ToolError>> + Send + '_>>;

    /// Converts this handler to an `McpTool` for use in `list_tools`.
    fn to_mcp_tool(&self) -> McpTool {
        use std::borrow::Cow;

        McpTool {
            name: Cow::Owned(self.name().to_string()),
            title: self.title().map(|s| s.to_string()),
            description: Some(Cow::Owned(self.description().to_string())),
            input_schema: Arc::new(self.input_schema()),
            output_schema: self.output_schema().map(Arc::new),
            annotations: None,
            icons: None,
            meta: None,
        }
    }
}

/// Registry for managing tool handlers.
///
/// Handlers are kept in registration order so the advertised catalog is
/// identical across `list_tools` calls; dispatch is by name, never position.
#[derive(Clone)]
pub struct ToolRegistry {
    handlers: Vec<Arc<dyn ToolHandler>>,
}

impl ToolRegistry {
    /// Create a new empty tool registry.
    pub fn new() -> Self {
        Self {
            handlers: Vec::new(),
        }
    }

    /// Register a tool handler, preserving registration order.
    ///
    /// A handler whose name is already taken is ignored; the first
    /// registration wins.
    pub fn register_handler<T: ToolHandler + 'static>(mut self, handler: T) -> Self {
        if self.contains(handler.name()) {
            tracing::warn!("duplicate tool registration ignored: {}", handler.name());
            return self;
        }
        self.handlers.push(Arc::new(handler));
        self
    }

    /// Get a tool handler by name.
    pub fn get(&self, name: &str) -> Option<Arc<dyn ToolHandler>> {
        self.handlers.iter().find(|h| h.name() == name).cloned()
    }

    /// List all registered tool names in registration order.
    pub fn list_names(&self) -> Vec<String> {
        self.handlers.iter().map(|h| h.name().to_string()).collect()
    }

    /// Get all registered tools as `McpTool` instances for `list_tools`.
    pub fn list_tools(&self) -> Vec<McpTool> {
        self.handlers.iter().map(|h| h.to_mcp_tool()).collect()
    }

    /// Execute a tool by name with the given arguments.
    pub async fn dispatch(
        &self,
        name: &str,
        args: JsonObject,
    ) -> Result<CallToolResult, ToolError> {
        let handler = self
            .get(name)
            .ok_or_else(|| ToolError::UnknownTool(name.to_string()))?;
        tracing::debug!("dispatching tool call: {}", name);
        handler.execute(args).await
    }

    /// Check if a tool with the given name is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.handlers.iter().any(|h| h.name() == name)
    }

    /// Return the number of registered tools.
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    /// Return `true` if no tools are registered.
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rmcp::model::Content;
    use serde_json::json;

    struct StaticHandler {
        name: &'static str,
    }

    impl StaticHandler {
        fn new(name: &'static str) -> Self {
            Self { name }
        }
    }

    impl ToolHandler for StaticHandler {
        fn name(&self) -> &str {
            self.name
        }

        fn description(&self) -> &str {
            "static test handler"
        }

        fn input_schema(&self) -> JsonObject {
            let mut schema = JsonObject::new();
            schema.insert("type".to_string(), json!("object"));
            schema
        }

        fn execute(
            &self,
            _args: JsonObject,
        ) -> Pin<Box<dyn Future<Output = Result<CallToolResult, ToolError>> + Send + '_>> {
            let name = self.name;
            Box::pin(async move {
                Ok(CallToolResult {
                    content: vec![Content::text(format!("ran {}", name))],
                    structured_content: None,
                    is_error: None,
                    meta: None,
                })
            })
        }
    }

    fn registry_of(names: &[&'static str]) -> ToolRegistry {
        names.iter().fold(ToolRegistry::new(), |reg, name| {
            reg.register_handler(StaticHandler::new(name))
        })
    }

    fn content_text(result: &CallToolResult, idx: usize) -> String {
        let value = serde_json::to_value(&result.content[idx]).expect("content serializes");
        value["text"].as_str().expect("text content").to_string()
    }

    #[test]
    fn list_tools_preserves_registration_order() {
        let registry = registry_of(&["alpha", "beta", "gamma"]);
        let names: Vec<String> = registry
            .list_tools()
            .iter()
            .map(|t| t.name.to_string())
            .collect();
        assert_eq!(names, vec!["alpha", "beta", "gamma"]);
    }

    #[test]
    fn list_tools_is_identical_across_calls() {
        let registry = registry_of(&["alpha", "beta", "gamma", "delta", "epsilon"]);
        let first: Vec<String> = registry
            .list_tools()
            .iter()
            .map(|t| t.name.to_string())
            .collect();
        let second: Vec<String> = registry
            .list_tools()
            .iter()
            .map(|t| t.name.to_string())
            .collect();
        assert_eq!(first, second);
    }

    #[test]
    fn duplicate_registration_keeps_first_handler() {
        let registry = registry_of(&["alpha", "alpha"]);
        assert_eq!(registry.len(), 1);
        assert!(registry.contains("alpha"));
    }

    #[tokio::test]
    async fn dispatch_routes_by_name() {
        let registry = registry_of(&["alpha", "beta"]);
        let result = registry.dispatch("beta", JsonObject::new()).await.unwrap();
        assert_eq!(content_text(&result, 0), "ran beta");
        assert_eq!(result.is_error, None);
    }

    #[tokio::test]
    async fn dispatch_unknown_tool_aborts() {
        let registry = registry_of(&["alpha"]);
        let err = registry
            .dispatch("nope", JsonObject::new())
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::UnknownTool(_)));
        assert_eq!(err.to_string(), "Unknown tool: nope");
    }
}
