// Core modules
mod config;
mod browser;
mod openai;
mod vcs;

// Tool handlers and protocol surface
mod tools;
pub mod server;


// Re-export key types and functions
pub use config::{LOCAL_BASE_URL, ServerConfig};
pub use openai::DEFAULT_MODEL;
pub use tools::{ToolError, ToolHandler, ToolRegistry};
pub use server::DevToolsServer;

use std::sync::Arc;
use anyhow::Result;
use browser::ChromeCapturer;
use openai::OpenAiClient;
use tools::{
    ArchitectHandler, CodeReviewHandler, ReadFileHandler, ReadMultipleFilesHandler,
    ScreenshotHandler,
};
use vcs::GitDiff;

/// Convenience function to create a fully configured MCP server.
///
/// This wires the default tools to their production collaborators and returns
/// a DevToolsServer that implements rmcp's ServerHandler. Tools are advertised
/// in the order they are registered here.
pub fn create_server(config: ServerConfig) -> Result<DevToolsServer> {
    let completion_client = OpenAiClient::with_endpoint(
        config.openai_api_key,
        config.openai_endpoint,
        config.openai_model,
    )?;

    let tool_registry = ToolRegistry::new()
        .register_handler(ScreenshotHandler::new(Arc::new(ChromeCapturer::new())))
        .register_handler(ArchitectHandler::new(Arc::new(completion_client)))
        .register_handler(CodeReviewHandler::new(Arc::new(GitDiff::new())))
        .register_handler(ReadFileHandler::new())
        .register_handler(ReadMultipleFilesHandler::new());

    Ok(DevToolsServer::new(Arc::new(tool_registry)))
}
