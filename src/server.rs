//! MCP server implementation using rmcp.
//!
//! Exposes the tool registry over the MCP protocol, either on stdio or as a
//! Streamable HTTP endpoint.

use std::sync::Arc;

use anyhow::Result;
use axum::Router;
use rmcp::transport::streamable_http_server::{
    StreamableHttpService, session::local::LocalSessionManager,
};
use rmcp::{
    ErrorData as McpError,
    handler::server::ServerHandler,
    model::*,
    service::{RequestContext, RoleServer},
};

use crate::tools::{ToolError, ToolRegistry};

const INSTRUCTIONS: &str =
    "Developer tools for coding agents: capture page screenshots with headless Chrome, \
     draft step-by-step implementation plans with an OpenAI model, frame git diffs for \
     review, and read files from disk.";

/// MCP server that handles protocol requests and delegates to tool handlers.
#[derive(Clone)]
pub struct DevToolsServer {
    tool_registry: Arc<ToolRegistry>,
}

impl DevToolsServer {
    /// Create a new MCP server over the given tool registry.
    pub fn new(tool_registry: Arc<ToolRegistry>) -> Self {
        Self { tool_registry }
    }
}

impl ServerHandler for DevToolsServer {
    fn ping(
        &self,
        _context: RequestContext<RoleServer>,
    ) -> impl Future<Output = Result<(), McpError>> + Send + '_ {
        std::future::ready(Ok(()))
    }

    fn initialize(
        &self,
        _request: InitializeRequestParams,
        _context: RequestContext<RoleServer>,
    ) -> impl Future<Output = Result<InitializeResult, McpError>> + Send + '_ {
        std::future::ready(Ok(InitializeResult {
            protocol_version: ProtocolVersion::V_2025_06_18,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation::from_build_env(),
            instructions: Some(INSTRUCTIONS.to_string()),
        }))
    }

    fn list_tools(
        &self,
        _request: Option<PaginatedRequestParams>,
        _context: RequestContext<RoleServer>,
    ) -> impl Future<Output = Result<ListToolsResult, McpError>> + Send + '_ {
        let result = ListToolsResult {
            tools: self.tool_registry.list_tools(),
            next_cursor: None,
            ..Default::default()
        };
        std::future::ready(Ok(result))
    }

    fn call_tool(
        &self,
        request: CallToolRequestParams,
        _context: RequestContext<RoleServer>,
    ) -> impl Future<Output = Result<CallToolResult, McpError>> + Send + '_ {
        let tool_name = request.name.to_string();
        let args = request.arguments.unwrap_or_default();
        let registry = self.tool_registry.clone();

        async move {
            match registry.dispatch(&tool_name, args).await {
                Ok(result) => Ok(result),
                // -32602: Invalid params (unknown tool or rejected arguments)
                Err(err @ (ToolError::UnknownTool(_) | ToolError::InvalidArguments { .. })) => {
                    Err(McpError::invalid_params(err.to_string(), None))
                }
                // -32603: Internal error
                Err(ToolError::Execution { source, .. }) => Err(McpError::internal_error(
                    format!("Tool execution failed: {}", source),
                    None,
                )),
            }
        }
    }

    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2025_06_18,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation::from_build_env(),
            instructions: Some(INSTRUCTIONS.to_string()),
        }
    }
}

/// Start the developer tools server as an MCP Streamable HTTP server.
///
/// This exposes the MCP endpoint at `/mcp` on the given bind address,
/// e.g. `127.0.0.1:3947` or `0.0.0.0:3947`.
pub async fn start_mcp_http(server: DevToolsServer, bind: &str) -> Result<()> {
    let service = StreamableHttpService::new(
        {
            // Sessions share the registry; the handler itself is stateless.
            let server = server.clone();
            move || Ok(server.clone())
        },
        LocalSessionManager::default().into(),
        Default::default(),
    );

    let router = Router::new().nest_service("/mcp", service);
    let listener = tokio::net::TcpListener::bind(bind).await?;

    tracing::info!("MCP HTTP server listening on http://{}", bind);

    axum::serve(listener, router).await?;

    Ok(())
}
